//! # Validation Settings
//!
//! Knobs the orchestration layer may set once per session. Everything has a
//! default, so an empty JSON object is a valid configuration.
//!
//! ```rust
//! use gdt_core::settings::ValidationSettings;
//! use gdt_core::process::ManufacturingProcess;
//!
//! let settings: ValidationSettings = serde_json::from_str(r#"{ "default_process": "turning" }"#).unwrap();
//! assert_eq!(settings.default_process, ManufacturingProcess::Turning);
//! assert_eq!(settings.capability_margin, 2.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{require_non_negative, GdtError, GdtResult};
use crate::process::ManufacturingProcess;

/// Session-wide validation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Process assumed for form checks when a frame names none
    pub default_process: ManufacturingProcess,

    /// Multiple of process capability below which a form tolerance is near-limit
    pub capability_margin: f64,

    /// Slack for the inclusive deviation ≤ total tolerance comparison
    pub boundary_epsilon: f64,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        ValidationSettings {
            default_process: ManufacturingProcess::Milling,
            capability_margin: 2.0,
            boundary_epsilon: 1e-9,
        }
    }
}

impl ValidationSettings {
    pub fn with_default_process(mut self, process: ManufacturingProcess) -> Self {
        self.default_process = process;
        self
    }

    pub fn validate(&self) -> GdtResult<()> {
        if !self.capability_margin.is_finite() || self.capability_margin < 1.0 {
            return Err(GdtError::invalid_input(
                "capability_margin",
                self.capability_margin.to_string(),
                "Margin must be at least 1.0",
            ));
        }
        require_non_negative("boundary_epsilon", self.boundary_epsilon)?;
        Ok(())
    }
}
