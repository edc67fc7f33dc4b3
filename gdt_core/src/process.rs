//! # Manufacturing Process Capability
//!
//! Typical achievable form tolerance per manufacturing process. Form checkers
//! compare a stated flatness/straightness/circularity/cylindricity tolerance
//! against this table to decide whether the callout can be produced at all.
//!
//! ## Capability Table
//!
//! | Process            | Capability |
//! |--------------------|------------|
//! | Grinding           | 0.0001     |
//! | Honing             | 0.0002     |
//! | Lapping            | 0.0001     |
//! | Precision turning  | 0.0005     |
//! | Turning            | 0.001      |
//! | Milling            | 0.002      |
//! | Drilling           | 0.003      |
//! | Casting            | 0.015      |
//! | Forging            | 0.030      |
//!
//! Values are in the drawing's linear unit. The engine never converts units,
//! so a session must use the unit the table was built for.
//!
//! ## Verdict Bands
//!
//! ```text
//! tolerance <  capability                 → Unachievable
//! capability ≤ tolerance < margin × cap   → NearLimit
//! tolerance ≥ margin × capability         → Achievable
//! ```

use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::GdtError;

/// Manufacturing process used to produce a toleranced feature.
///
/// Serializes as snake_case; deserializes through the alias table, so
/// `"grind"`, `"Precision Turning"` and `"machined"` are all accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ManufacturingProcess {
    Grinding,
    Honing,
    Lapping,
    PrecisionTurning,
    Turning,
    /// General machining; assumed when a callout names no process
    #[default]
    Milling,
    Drilling,
    Casting,
    Forging,
}

/// Accepted spellings, keyed by lowercase name. Built once on first lookup.
static PROCESS_ALIASES: Lazy<HashMap<&'static str, ManufacturingProcess>> = Lazy::new(|| {
    use ManufacturingProcess::*;
    HashMap::from([
        ("grinding", Grinding),
        ("grind", Grinding),
        ("ground", Grinding),
        ("honing", Honing),
        ("hone", Honing),
        ("honed", Honing),
        ("lapping", Lapping),
        ("lap", Lapping),
        ("lapped", Lapping),
        ("precision_turning", PrecisionTurning),
        ("precision turning", PrecisionTurning),
        ("precision-turning", PrecisionTurning),
        ("turning", Turning),
        ("turn", Turning),
        ("turned", Turning),
        ("lathe", Turning),
        ("milling", Milling),
        ("mill", Milling),
        ("milled", Milling),
        ("machining", Milling),
        ("machined", Milling),
        ("drilling", Drilling),
        ("drill", Drilling),
        ("drilled", Drilling),
        ("casting", Casting),
        ("cast", Casting),
        ("forging", Forging),
        ("forge", Forging),
        ("forged", Forging),
    ])
});

impl ManufacturingProcess {
    /// All processes, finest capability first
    pub const ALL: [ManufacturingProcess; 9] = [
        ManufacturingProcess::Grinding,
        ManufacturingProcess::Lapping,
        ManufacturingProcess::Honing,
        ManufacturingProcess::PrecisionTurning,
        ManufacturingProcess::Turning,
        ManufacturingProcess::Milling,
        ManufacturingProcess::Drilling,
        ManufacturingProcess::Casting,
        ManufacturingProcess::Forging,
    ];

    /// Typical achievable form tolerance for this process
    pub fn capability(&self) -> f64 {
        match self {
            ManufacturingProcess::Grinding => 0.0001,
            ManufacturingProcess::Honing => 0.0002,
            ManufacturingProcess::Lapping => 0.0001,
            ManufacturingProcess::PrecisionTurning => 0.0005,
            ManufacturingProcess::Turning => 0.001,
            ManufacturingProcess::Milling => 0.002,
            ManufacturingProcess::Drilling => 0.003,
            ManufacturingProcess::Casting => 0.015,
            ManufacturingProcess::Forging => 0.030,
        }
    }

    /// Display name for messages
    pub fn display_name(&self) -> &'static str {
        match self {
            ManufacturingProcess::Grinding => "grinding",
            ManufacturingProcess::Honing => "honing",
            ManufacturingProcess::Lapping => "lapping",
            ManufacturingProcess::PrecisionTurning => "precision turning",
            ManufacturingProcess::Turning => "turning",
            ManufacturingProcess::Milling => "milling",
            ManufacturingProcess::Drilling => "drilling",
            ManufacturingProcess::Casting => "casting",
            ManufacturingProcess::Forging => "forging",
        }
    }

    /// Finer processes that can hold `tolerance` comfortably, used in suggestions.
    pub fn capable_of(tolerance: f64, margin: f64) -> impl Iterator<Item = ManufacturingProcess> {
        Self::ALL
            .into_iter()
            .filter(move |p| tolerance >= p.capability() * margin)
    }

    /// Classify `tolerance` against this process.
    ///
    /// `scale` multiplies the base capability (cylindricity passes its
    /// length/diameter factor here; other checks pass 1.0). `margin` is the
    /// multiple of capability at which a tolerance stops being near-limit.
    pub fn assess(&self, tolerance: f64, scale: f64, margin: f64) -> CapabilityVerdict {
        let capability = self.capability() * scale;
        if tolerance < capability {
            CapabilityVerdict::Unachievable
        } else if tolerance < capability * margin {
            CapabilityVerdict::NearLimit
        } else {
            CapabilityVerdict::Achievable
        }
    }
}

impl std::fmt::Display for ManufacturingProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ManufacturingProcess {
    type Err = GdtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        PROCESS_ALIASES
            .get(key.as_str())
            .copied()
            .ok_or_else(|| GdtError::unknown_process(s))
    }
}

impl TryFrom<String> for ManufacturingProcess {
    type Error = GdtError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Outcome of comparing a form tolerance against process capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapabilityVerdict {
    /// Tighter than the process can produce
    Unachievable,
    /// Producible, but with little margin
    NearLimit,
    /// Comfortably producible
    Achievable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_table() {
        assert_eq!(ManufacturingProcess::Grinding.capability(), 0.0001);
        assert_eq!(ManufacturingProcess::Honing.capability(), 0.0002);
        assert_eq!(ManufacturingProcess::Lapping.capability(), 0.0001);
        assert_eq!(ManufacturingProcess::PrecisionTurning.capability(), 0.0005);
        assert_eq!(ManufacturingProcess::Turning.capability(), 0.001);
        assert_eq!(ManufacturingProcess::Milling.capability(), 0.002);
        assert_eq!(ManufacturingProcess::Drilling.capability(), 0.003);
        assert_eq!(ManufacturingProcess::Casting.capability(), 0.015);
        assert_eq!(ManufacturingProcess::Forging.capability(), 0.030);
    }

    #[test]
    fn test_verdict_bands() {
        let milling = ManufacturingProcess::Milling;
        assert_eq!(milling.assess(0.001, 1.0, 2.0), CapabilityVerdict::Unachievable);
        assert_eq!(milling.assess(0.002, 1.0, 2.0), CapabilityVerdict::NearLimit);
        assert_eq!(milling.assess(0.003, 1.0, 2.0), CapabilityVerdict::NearLimit);
        assert_eq!(milling.assess(0.004, 1.0, 2.0), CapabilityVerdict::Achievable);
    }

    #[test]
    fn test_scaled_capability() {
        // 0.005 is achievable for milling alone, but not over a 3:1 length
        assert_eq!(
            ManufacturingProcess::Milling.assess(0.005, 3.0, 2.0),
            CapabilityVerdict::Unachievable
        );
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("Grinding".parse::<ManufacturingProcess>().unwrap(), ManufacturingProcess::Grinding);
        assert_eq!(
            "precision turning".parse::<ManufacturingProcess>().unwrap(),
            ManufacturingProcess::PrecisionTurning
        );
        assert_eq!(" machined ".parse::<ManufacturingProcess>().unwrap(), ManufacturingProcess::Milling);
        assert!("welding".parse::<ManufacturingProcess>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ManufacturingProcess::PrecisionTurning).unwrap();
        assert_eq!(json, "\"precision_turning\"");
        let parsed: ManufacturingProcess = serde_json::from_str("\"precision-turning\"").unwrap();
        assert_eq!(parsed, ManufacturingProcess::PrecisionTurning);
    }

    #[test]
    fn test_deserialize_aliases() {
        for (name, expected) in [
            ("\"grind\"", ManufacturingProcess::Grinding),
            ("\"Grinding\"", ManufacturingProcess::Grinding),
            ("\"precision turning\"", ManufacturingProcess::PrecisionTurning),
            ("\"precision_turning\"", ManufacturingProcess::PrecisionTurning),
            ("\"machined\"", ManufacturingProcess::Milling),
        ] {
            let parsed: ManufacturingProcess = serde_json::from_str(name).unwrap();
            assert_eq!(parsed, expected, "{}", name);
        }
        let err = serde_json::from_str::<ManufacturingProcess>("\"welding\"").unwrap_err();
        assert!(err.to_string().contains("welding"));
    }

    #[test]
    fn test_capable_of() {
        let capable: Vec<_> = ManufacturingProcess::capable_of(0.0005, 2.0).collect();
        assert!(capable.contains(&ManufacturingProcess::Grinding));
        assert!(!capable.contains(&ManufacturingProcess::Turning));
    }
}
