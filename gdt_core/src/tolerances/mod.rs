//! # Tolerance Taxonomy
//!
//! The closed set of geometric tolerance kinds defined by ASME Y14.5-2018,
//! the modifiers that may accompany them, and the records describing one
//! feature control frame.
//!
//! ## Categories
//!
//! | Category    | Kinds                                              | Datum     |
//! |-------------|----------------------------------------------------|-----------|
//! | Form        | flatness, straightness, circularity, cylindricity  | never     |
//! | Orientation | perpendicularity, angularity, parallelism          | mandatory |
//! | Location    | position, concentricity, symmetry                  | mandatory |
//! | Runout      | circular runout, total runout                      | mandatory |
//! | Profile     | profile of a line, profile of a surface            | optional  |
//!
//! ## Two Representations
//!
//! - [`FeatureControlFrame`] is the flat record an extraction stage produces.
//!   Anything can be written into it, including illegal combinations.
//! - [`Callout`] is the typed form. Each variant carries only the fields its
//!   kind may legally have, so form variants have no datum field at all.
//!
//! The FCF validator lowers the first into the second and reports whatever
//! did not survive the trip.

pub mod callout;
pub mod datums;
pub mod frame;

pub use callout::{
    Callout, CylindricityControl, FormControl, LocationControl, OrientationControl,
    PositionControl, ProfileControl, RunoutControl, StraightnessControl, StraightnessElement,
};
pub use datums::{DatumReference, DatumReferenceFrame, DatumSlot};
pub use frame::{FeatureControlFrame, PositionData};

use serde::{Deserialize, Serialize};

// ============================================================================
// ASME Y14.5 References
// ============================================================================

/// ASME Y14.5-2018 section references attached to every issue.
pub mod asme_ref {
    /// Material condition and material boundary modifiers
    pub const MATERIAL_CONDITION: &str = "ASME Y14.5-2018 Section 5";
    /// Datum reference frames and datum precedence
    pub const DATUMS: &str = "ASME Y14.5-2018 Section 7";
    /// Flatness, straightness, circularity, cylindricity
    pub const FORM: &str = "ASME Y14.5-2018 Section 8";
    /// Perpendicularity, angularity, parallelism
    pub const ORIENTATION: &str = "ASME Y14.5-2018 Section 9";
    /// Position, bonus tolerance, virtual condition
    pub const POSITION: &str = "ASME Y14.5-2018 Section 10";
    /// Composite positional tolerancing
    pub const COMPOSITE_POSITION: &str = "ASME Y14.5-2018 Section 10 (composite tolerancing)";
    /// Concentricity and symmetry, withdrawn from the 2018 edition
    pub const LEGACY_LOCATION: &str = "ASME Y14.5M-1994 Section 5.12/5.13";
    /// Profile of a line, profile of a surface
    pub const PROFILE: &str = "ASME Y14.5-2018 Section 11";
    /// Circular and total runout
    pub const RUNOUT: &str = "ASME Y14.5-2018 Section 12";
}

// ============================================================================
// Tolerance Kinds
// ============================================================================

/// Category of a geometric tolerance; decides datum legality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToleranceCategory {
    Form,
    Orientation,
    Location,
    Runout,
    Profile,
}

impl ToleranceCategory {
    /// Whether a callout of this category is meaningless without a datum
    pub fn requires_datum(&self) -> bool {
        matches!(
            self,
            ToleranceCategory::Orientation | ToleranceCategory::Location | ToleranceCategory::Runout
        )
    }

    /// Whether a callout of this category may reference a datum at all
    pub fn permits_datum(&self) -> bool {
        !matches!(self, ToleranceCategory::Form)
    }
}

/// The fourteen geometric characteristic symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToleranceType {
    Flatness,
    Straightness,
    Circularity,
    Cylindricity,
    Perpendicularity,
    Angularity,
    Parallelism,
    Position,
    Concentricity,
    Symmetry,
    CircularRunout,
    TotalRunout,
    ProfileLine,
    ProfileSurface,
}

impl ToleranceType {
    /// All tolerance kinds, grouped by category
    pub const ALL: [ToleranceType; 14] = [
        ToleranceType::Flatness,
        ToleranceType::Straightness,
        ToleranceType::Circularity,
        ToleranceType::Cylindricity,
        ToleranceType::Perpendicularity,
        ToleranceType::Angularity,
        ToleranceType::Parallelism,
        ToleranceType::Position,
        ToleranceType::Concentricity,
        ToleranceType::Symmetry,
        ToleranceType::CircularRunout,
        ToleranceType::TotalRunout,
        ToleranceType::ProfileLine,
        ToleranceType::ProfileSurface,
    ];

    pub fn category(&self) -> ToleranceCategory {
        match self {
            ToleranceType::Flatness
            | ToleranceType::Straightness
            | ToleranceType::Circularity
            | ToleranceType::Cylindricity => ToleranceCategory::Form,
            ToleranceType::Perpendicularity
            | ToleranceType::Angularity
            | ToleranceType::Parallelism => ToleranceCategory::Orientation,
            ToleranceType::Position | ToleranceType::Concentricity | ToleranceType::Symmetry => {
                ToleranceCategory::Location
            }
            ToleranceType::CircularRunout | ToleranceType::TotalRunout => ToleranceCategory::Runout,
            ToleranceType::ProfileLine | ToleranceType::ProfileSurface => ToleranceCategory::Profile,
        }
    }

    pub fn requires_datum(&self) -> bool {
        self.category().requires_datum()
    }

    /// Whether MMC/LMC is meaningful on this kind.
    ///
    /// Straightness only qualifies when it controls a derived axis.
    pub fn accepts_material_condition(&self, is_axis: bool) -> bool {
        match self {
            ToleranceType::Straightness => is_axis,
            ToleranceType::Perpendicularity
            | ToleranceType::Angularity
            | ToleranceType::Parallelism
            | ToleranceType::Position => true,
            _ => false,
        }
    }

    /// Whether a two-tier composite frame exists for this kind
    pub fn supports_composite(&self) -> bool {
        matches!(
            self,
            ToleranceType::Position | ToleranceType::ProfileLine | ToleranceType::ProfileSurface
        )
    }

    /// Stable snake_case tag, used as the prefix of issue check types
    pub fn tag(&self) -> &'static str {
        match self {
            ToleranceType::Flatness => "flatness",
            ToleranceType::Straightness => "straightness",
            ToleranceType::Circularity => "circularity",
            ToleranceType::Cylindricity => "cylindricity",
            ToleranceType::Perpendicularity => "perpendicularity",
            ToleranceType::Angularity => "angularity",
            ToleranceType::Parallelism => "parallelism",
            ToleranceType::Position => "position",
            ToleranceType::Concentricity => "concentricity",
            ToleranceType::Symmetry => "symmetry",
            ToleranceType::CircularRunout => "circular_runout",
            ToleranceType::TotalRunout => "total_runout",
            ToleranceType::ProfileLine => "profile_line",
            ToleranceType::ProfileSurface => "profile_surface",
        }
    }

    /// Display name for messages
    pub fn display_name(&self) -> &'static str {
        match self {
            ToleranceType::Flatness => "Flatness",
            ToleranceType::Straightness => "Straightness",
            ToleranceType::Circularity => "Circularity",
            ToleranceType::Cylindricity => "Cylindricity",
            ToleranceType::Perpendicularity => "Perpendicularity",
            ToleranceType::Angularity => "Angularity",
            ToleranceType::Parallelism => "Parallelism",
            ToleranceType::Position => "Position",
            ToleranceType::Concentricity => "Concentricity",
            ToleranceType::Symmetry => "Symmetry",
            ToleranceType::CircularRunout => "Circular runout",
            ToleranceType::TotalRunout => "Total runout",
            ToleranceType::ProfileLine => "Profile of a line",
            ToleranceType::ProfileSurface => "Profile of a surface",
        }
    }

    /// Check type tag for a datum-legality issue, e.g. `position_datum`
    pub fn check_type(&self, suffix: &str) -> String {
        format!("{}_{}", self.tag(), suffix)
    }
}

impl std::fmt::Display for ToleranceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Modifiers
// ============================================================================

/// Material condition modifier on a tolerance or datum reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MaterialCondition {
    /// Maximum material condition (Ⓜ)
    #[serde(rename = "MMC", alias = "mmc")]
    Mmc,
    /// Least material condition (Ⓛ)
    #[serde(rename = "LMC", alias = "lmc")]
    Lmc,
    /// Regardless of feature size (no modifier)
    #[default]
    #[serde(rename = "RFS", alias = "rfs")]
    Rfs,
}

impl MaterialCondition {
    /// True for MMC and LMC
    pub fn is_modifier(&self) -> bool {
        !matches!(self, MaterialCondition::Rfs)
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            MaterialCondition::Mmc => "MMC",
            MaterialCondition::Lmc => "LMC",
            MaterialCondition::Rfs => "RFS",
        }
    }
}

impl std::fmt::Display for MaterialCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Which side of a feature of size carries material.
///
/// The virtual-condition sign convention flips between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeBoundary {
    /// Material surrounds the feature (hole, slot, bore). MMC is the smallest size.
    Internal,
    /// Material is the feature (pin, tab, boss, shaft). MMC is the largest size.
    External,
}

/// Kind of toleranced feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    #[default]
    #[serde(alias = "hole")]
    Hole,
    #[serde(alias = "pin")]
    Pin,
    #[serde(alias = "slot")]
    Slot,
    #[serde(alias = "tab")]
    Tab,
    #[serde(alias = "boss")]
    Boss,
    #[serde(alias = "bore")]
    Bore,
    #[serde(alias = "shaft")]
    Shaft,
    #[serde(alias = "surface")]
    Surface,
    #[serde(alias = "other")]
    Other,
}

impl FeatureType {
    /// Size boundary of the feature, or `None` when it is not a feature of size
    pub fn boundary(&self) -> Option<SizeBoundary> {
        match self {
            FeatureType::Hole | FeatureType::Slot | FeatureType::Bore => Some(SizeBoundary::Internal),
            FeatureType::Pin | FeatureType::Tab | FeatureType::Boss | FeatureType::Shaft => {
                Some(SizeBoundary::External)
            }
            FeatureType::Surface | FeatureType::Other => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FeatureType::Hole => "hole",
            FeatureType::Pin => "pin",
            FeatureType::Slot => "slot",
            FeatureType::Tab => "tab",
            FeatureType::Boss => "boss",
            FeatureType::Bore => "bore",
            FeatureType::Shaft => "shaft",
            FeatureType::Surface => "surface",
            FeatureType::Other => "feature",
        }
    }
}

impl std::fmt::Display for FeatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Nominal size with an equal bilateral tolerance (e.g. ⌀0.500 ±0.010).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeLimits {
    pub nominal: f64,
    pub tolerance: f64,
}

impl SizeLimits {
    pub fn new(nominal: f64, tolerance: f64) -> Self {
        SizeLimits { nominal, tolerance }
    }

    /// Size at maximum material condition
    pub fn mmc_size(&self, boundary: SizeBoundary) -> f64 {
        match boundary {
            SizeBoundary::Internal => self.nominal - self.tolerance,
            SizeBoundary::External => self.nominal + self.tolerance,
        }
    }

    /// Size at least material condition
    pub fn lmc_size(&self, boundary: SizeBoundary) -> f64 {
        match boundary {
            SizeBoundary::Internal => self.nominal + self.tolerance,
            SizeBoundary::External => self.nominal - self.tolerance,
        }
    }

    /// Full size range from MMC to LMC, the maximum bonus a modifier can earn
    pub fn bonus_range(&self) -> f64 {
        2.0 * self.tolerance
    }
}

/// How a profile tolerance zone is split about the true profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProfileDistribution {
    /// Equal split, ± half the tolerance
    #[default]
    Bilateral,
    /// Entire zone outside the true profile
    UnilateralOutward,
    /// Entire zone inside the true profile
    UnilateralInward,
    /// Ⓤ modifier: `outward` of the zone lies outside, the rest inside
    UnequallyDisposed { outward: f64 },
}

impl ProfileDistribution {
    /// Human-readable zone split for a profile of total width `tolerance`
    pub fn describe(&self, tolerance: f64) -> String {
        use crate::results::fmt_len;
        match self {
            ProfileDistribution::Bilateral => {
                format!("bilateral ±{}", fmt_len(tolerance / 2.0))
            }
            ProfileDistribution::UnilateralOutward => {
                format!("unilateral +{}/-0 (outside true profile)", fmt_len(tolerance))
            }
            ProfileDistribution::UnilateralInward => {
                format!("unilateral +0/-{} (inside true profile)", fmt_len(tolerance))
            }
            ProfileDistribution::UnequallyDisposed { outward } => {
                format!(
                    "unequally disposed +{}/-{}",
                    fmt_len(*outward),
                    fmt_len(tolerance - outward)
                )
            }
        }
    }
}
