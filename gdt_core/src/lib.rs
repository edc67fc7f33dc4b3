//! # gdt_core - GD&T Validation Engine
//!
//! `gdt_core` checks Geometric Dimensioning and Tolerancing callouts against
//! ASME Y14.5-2018. Given a feature control frame extracted from a drawing,
//! and optionally a measured feature location, it decides whether the callout
//! is legal and manufacturable, computes bonus tolerance, virtual and
//! resultant condition for features of size, and reports findings as
//! severity-ranked issues that cite the standard.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take a frame and return a result
//! - **JSON-First**: All input and output records implement Serialize/Deserialize
//! - **Typed Callouts**: A frame is lowered into a sum type whose variants
//!   only carry the fields their kind may legally hold
//! - **Rich Errors**: Malformed input is a structured error; a GD&T rule
//!   violation is an issue in the result, never an error
//!
//! ## Quick Start
//!
//! ```rust
//! use gdt_core::{validate_feature_control_frame, FeatureControlFrame, PositionData, ToleranceType};
//! use gdt_core::tolerances::{FeatureType, MaterialCondition};
//!
//! let frame = FeatureControlFrame::new(ToleranceType::Position, 0.010)
//!     .with_material_condition(MaterialCondition::Mmc)
//!     .with_datum("A")
//!     .with_datum("B")
//!     .with_feature(FeatureType::Hole, 0.500, 0.010);
//! let measured = PositionData::new((1.000, 2.000), (1.012, 2.005));
//!
//! let result = validate_feature_control_frame(&frame, Some(&measured)).unwrap();
//! assert!(result.passes());
//!
//! // Serialize for the reporting layer
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! assert!(json.contains("\"total_checks\""));
//! ```
//!
//! ## Modules
//!
//! - [`tolerances`] - Tolerance kinds, feature control frames, datums and typed callouts
//! - [`checks`] - One checker per tolerance kind (form, orientation, location, runout, profile)
//! - [`validator`] - FCF-level validator and batch validation
//! - [`results`] - Issues, severities, counts and computed fields
//! - [`process`] - Manufacturing process capability table
//! - [`settings`] - Session-wide validation settings
//! - [`errors`] - Structured error types

pub mod checks;
pub mod errors;
pub mod process;
pub mod results;
pub mod settings;
pub mod tolerances;
pub mod validator;

// Re-export commonly used types at crate root for convenience
pub use errors::{GdtError, GdtResult};
pub use process::ManufacturingProcess;
pub use results::{GdtValidationResult, Severity, ValidationCounts, ValidationIssue};
pub use settings::ValidationSettings;
pub use tolerances::{FeatureControlFrame, PositionData, ToleranceType};
pub use validator::{
    validate_drawing, validate_feature_control_frame, DrawingValidation, FrameSubmission, GdtValidator,
};
