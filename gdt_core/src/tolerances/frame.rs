//! # Feature Control Frame Records
//!
//! The flat, serializable shape of one extracted callout. Every field an
//! extraction stage might fill is present here, legal for the tolerance kind
//! or not; legality is judged later by the FCF validator.
//!
//! ## Example
//!
//! ```rust
//! use gdt_core::tolerances::{FeatureControlFrame, FeatureType, MaterialCondition, ToleranceType};
//!
//! // ⌖ ⌀0.010 Ⓜ | A | B | C on a ⌀0.500 ±0.010 hole
//! let fcf = FeatureControlFrame::new(ToleranceType::Position, 0.010)
//!     .with_material_condition(MaterialCondition::Mmc)
//!     .with_datum("A")
//!     .with_datum("B")
//!     .with_datum("C")
//!     .with_feature(FeatureType::Hole, 0.500, 0.010);
//!
//! assert!(fcf.validate().is_ok());
//! assert_eq!(fcf.datum_count(), 3);
//! ```

use serde::{Deserialize, Serialize};

use super::datums::{DatumReference, DatumReferenceFrame, DatumSlot};
use super::{FeatureType, MaterialCondition, ProfileDistribution, SizeLimits, ToleranceType};
use crate::errors::{require_non_negative, require_positive, GdtError, GdtResult};
use crate::process::ManufacturingProcess;

/// One feature control frame as produced by drawing extraction.
///
/// ## JSON Example
///
/// ```json
/// {
///   "tolerance_type": "position",
///   "tolerance_value": 0.010,
///   "material_condition": "MMC",
///   "primary_datum": { "label": "A" },
///   "secondary_datum": { "label": "B", "material_condition": "MMC" },
///   "feature_type": "HOLE",
///   "feature_size": 0.500,
///   "feature_size_tolerance": 0.010,
///   "location": "Sheet 2, zone C4"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureControlFrame {
    /// Geometric characteristic symbol
    pub tolerance_type: ToleranceType,

    /// Stated tolerance zone width, in the drawing's linear unit
    pub tolerance_value: f64,

    /// Modifier on the tolerance (RFS when absent)
    #[serde(default)]
    pub material_condition: MaterialCondition,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_datum: Option<DatumReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_datum: Option<DatumReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tertiary_datum: Option<DatumReference>,

    /// Two-tier composite frame
    #[serde(default)]
    pub is_composite: bool,

    /// Upper tier (pattern-locating) tolerance; defaults to `tolerance_value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_tolerance: Option<f64>,

    /// Lower tier (feature-relating) tolerance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_tolerance: Option<f64>,

    /// Kind of toleranced feature; decides the virtual-condition sign
    #[serde(default)]
    pub feature_type: FeatureType,

    /// Nominal size of the feature (e.g. hole diameter)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_size: Option<f64>,

    /// Equal bilateral size tolerance (e.g. 0.010 for ±0.010)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_size_tolerance: Option<f64>,

    /// Length of the toleranced feature, used for angular equivalents and
    /// cylindricity scaling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_length: Option<f64>,

    /// Straightness applied to a derived axis rather than a surface line
    #[serde(default)]
    pub is_axis: bool,

    /// Process producing the feature; the validator's default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<ManufacturingProcess>,

    /// Profile zone distribution
    #[serde(default)]
    pub distribution: ProfileDistribution,

    /// Basic angle of an angularity callout, in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_angle: Option<f64>,

    /// Where the callout sits on the drawing (sheet, zone, view)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl FeatureControlFrame {
    /// Create a frame with only a kind and tolerance; everything else defaults.
    pub fn new(tolerance_type: ToleranceType, tolerance_value: f64) -> Self {
        FeatureControlFrame {
            tolerance_type,
            tolerance_value,
            material_condition: MaterialCondition::Rfs,
            primary_datum: None,
            secondary_datum: None,
            tertiary_datum: None,
            is_composite: false,
            pattern_tolerance: None,
            feature_tolerance: None,
            feature_type: FeatureType::default(),
            feature_size: None,
            feature_size_tolerance: None,
            feature_length: None,
            is_axis: false,
            process: None,
            distribution: ProfileDistribution::Bilateral,
            basic_angle: None,
            location: None,
        }
    }

    pub fn with_material_condition(mut self, material_condition: MaterialCondition) -> Self {
        self.material_condition = material_condition;
        self
    }

    /// Add a datum in the next free precedence slot.
    ///
    /// A fourth datum has no slot and is dropped.
    pub fn with_datum(self, label: impl Into<String>) -> Self {
        self.with_datum_reference(DatumReference::new(label))
    }

    /// Add a datum referenced at MMC or LMC in the next free slot.
    pub fn with_modified_datum(self, label: impl Into<String>, material_condition: MaterialCondition) -> Self {
        self.with_datum_reference(DatumReference::new(label).with_material_condition(material_condition))
    }

    pub fn with_datum_reference(mut self, datum: DatumReference) -> Self {
        if self.primary_datum.is_none() {
            self.primary_datum = Some(datum);
        } else if self.secondary_datum.is_none() {
            self.secondary_datum = Some(datum);
        } else if self.tertiary_datum.is_none() {
            self.tertiary_datum = Some(datum);
        }
        self
    }

    /// Set the feature kind with its nominal size and ± size tolerance.
    pub fn with_feature(mut self, feature_type: FeatureType, size: f64, size_tolerance: f64) -> Self {
        self.feature_type = feature_type;
        self.feature_size = Some(size);
        self.feature_size_tolerance = Some(size_tolerance);
        self
    }

    pub fn with_feature_type(mut self, feature_type: FeatureType) -> Self {
        self.feature_type = feature_type;
        self
    }

    pub fn with_feature_length(mut self, length: f64) -> Self {
        self.feature_length = Some(length);
        self
    }

    pub fn with_process(mut self, process: ManufacturingProcess) -> Self {
        self.process = Some(process);
        self
    }

    /// Mark a straightness callout as controlling the derived axis.
    pub fn on_axis(mut self) -> Self {
        self.is_axis = true;
        self
    }

    /// Make this a two-tier composite frame.
    pub fn composite(mut self, pattern_tolerance: f64, feature_tolerance: f64) -> Self {
        self.is_composite = true;
        self.pattern_tolerance = Some(pattern_tolerance);
        self.feature_tolerance = Some(feature_tolerance);
        self
    }

    pub fn with_distribution(mut self, distribution: ProfileDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn with_basic_angle(mut self, degrees: f64) -> Self {
        self.basic_angle = Some(degrees);
        self
    }

    pub fn at_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Reject malformed numbers and labels.
    ///
    /// This only checks that the record is well-formed. GD&T legality
    /// (missing datums, misplaced modifiers) is reported as issues by the
    /// validator, never as an error.
    pub fn validate(&self) -> GdtResult<()> {
        require_positive("tolerance_value", self.tolerance_value)?;

        for (field, datum) in [
            ("primary_datum", &self.primary_datum),
            ("secondary_datum", &self.secondary_datum),
            ("tertiary_datum", &self.tertiary_datum),
        ] {
            if let Some(d) = datum {
                if d.label.trim().is_empty() {
                    return Err(GdtError::invalid_input(field, "\"\"", "Datum label must not be empty"));
                }
            }
        }

        if let Some(size) = self.feature_size {
            require_positive("feature_size", size)?;
        }
        if let Some(tol) = self.feature_size_tolerance {
            require_non_negative("feature_size_tolerance", tol)?;
            if self.feature_size.is_none() {
                return Err(GdtError::missing_field("feature_size"));
            }
        }
        if let Some(length) = self.feature_length {
            require_positive("feature_length", length)?;
        }
        if let Some(pattern) = self.pattern_tolerance {
            require_positive("pattern_tolerance", pattern)?;
        }
        if let Some(feature) = self.feature_tolerance {
            require_positive("feature_tolerance", feature)?;
        }
        if let Some(angle) = self.basic_angle {
            if !angle.is_finite() {
                return Err(GdtError::invalid_input("basic_angle", angle.to_string(), "Angle must be finite"));
            }
        }
        if let ProfileDistribution::UnequallyDisposed { outward } = self.distribution {
            require_non_negative("distribution.outward", outward)?;
            if outward > self.tolerance_value {
                return Err(GdtError::invalid_input(
                    "distribution.outward",
                    outward.to_string(),
                    "Outward share cannot exceed the profile tolerance",
                ));
            }
        }
        Ok(())
    }

    /// Number of datum slots filled
    pub fn datum_count(&self) -> usize {
        [&self.primary_datum, &self.secondary_datum, &self.tertiary_datum]
            .iter()
            .filter(|d| d.is_some())
            .count()
    }

    /// Assemble the datum reference frame, or name the slot that breaks precedence.
    pub fn datum_frame(&self) -> Result<Option<DatumReferenceFrame>, DatumSlot> {
        DatumReferenceFrame::from_slots(
            self.primary_datum.as_ref(),
            self.secondary_datum.as_ref(),
            self.tertiary_datum.as_ref(),
        )
    }

    /// Size limits, when both size and size tolerance are stated
    pub fn size_limits(&self) -> Option<SizeLimits> {
        match (self.feature_size, self.feature_size_tolerance) {
            (Some(size), Some(tol)) => Some(SizeLimits::new(size, tol)),
            _ => None,
        }
    }
}

/// A measured feature location, supplied only when inspection data exists.
///
/// ## JSON Example
///
/// ```json
/// {
///   "nominal_x": 0.0,
///   "nominal_y": 0.0,
///   "actual_x": 0.015,
///   "actual_y": 0.0,
///   "feature_diameter": 0.500,
///   "diameter_tolerance": 0.010
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionData {
    pub nominal_x: f64,
    pub nominal_y: f64,
    pub actual_x: f64,
    pub actual_y: f64,

    /// Hole or pin diameter; backs up a frame without size data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_diameter: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter_tolerance: Option<f64>,
}

impl PositionData {
    pub fn new(nominal: (f64, f64), actual: (f64, f64)) -> Self {
        PositionData {
            nominal_x: nominal.0,
            nominal_y: nominal.1,
            actual_x: actual.0,
            actual_y: actual.1,
            feature_diameter: None,
            diameter_tolerance: None,
        }
    }

    pub fn with_diameter(mut self, diameter: f64, tolerance: f64) -> Self {
        self.feature_diameter = Some(diameter);
        self.diameter_tolerance = Some(tolerance);
        self
    }

    pub fn validate(&self) -> GdtResult<()> {
        for (field, value) in [
            ("nominal_x", self.nominal_x),
            ("nominal_y", self.nominal_y),
            ("actual_x", self.actual_x),
            ("actual_y", self.actual_y),
        ] {
            if !value.is_finite() {
                return Err(GdtError::invalid_input(field, value.to_string(), "Coordinate must be finite"));
            }
        }
        if let Some(d) = self.feature_diameter {
            require_positive("feature_diameter", d)?;
        }
        if let Some(t) = self.diameter_tolerance {
            require_non_negative("diameter_tolerance", t)?;
            if self.feature_diameter.is_none() {
                return Err(GdtError::missing_field("feature_diameter"));
            }
        }
        Ok(())
    }

    /// Diametral position deviation: `2 × √(Δx² + Δy²)`
    pub fn deviation(&self) -> f64 {
        let dx = self.actual_x - self.nominal_x;
        let dy = self.actual_y - self.nominal_y;
        2.0 * dx.hypot(dy)
    }

    /// Size limits from the measured diameter, when both values are present
    pub fn size_limits(&self) -> Option<SizeLimits> {
        match (self.feature_diameter, self.diameter_tolerance) {
            (Some(d), Some(t)) => Some(SizeLimits::new(d, t)),
            _ => None,
        }
    }
}
