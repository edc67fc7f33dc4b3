//! # Location Checkers
//!
//! Position, concentricity and symmetry. Position carries the numeric core
//! of the engine:
//!
//! ```text
//! RFS            total = t
//! MMC, hole      bonus = 2 × size_tol      total = t + bonus
//!                VC    = (size − size_tol) − t          (MMC hole minus t)
//!                RC    = (size + size_tol) + total      (LMC hole plus total)
//! MMC, pin       bonus = 2 × size_tol      total = t + bonus
//!                VC    = (size + size_tol) + t          (MMC pin plus t)
//!                RC    = (size − size_tol) − total      (LMC pin minus total)
//! LMC            total = t, no virtual condition
//! measured       deviation = 2 × √(Δx² + Δy²)  passes when ≤ total
//! ```
//!
//! The hole/pin sign flip is the one place a wrong branch silently produces
//! a plausible but wrong gage size; it is keyed on [`SizeBoundary`] so both
//! arms are always spelled out.
//!
//! ## Example
//!
//! ```rust
//! use gdt_core::checks::check_position;
//! use gdt_core::settings::ValidationSettings;
//! use gdt_core::tolerances::{
//!     DatumReference, DatumReferenceFrame, FeatureType, MaterialCondition, PositionControl, SizeLimits,
//! };
//!
//! let control = PositionControl {
//!     tolerance: 0.010,
//!     datums: DatumReferenceFrame::new(DatumReference::new("A")),
//!     material_condition: MaterialCondition::Mmc,
//!     feature: FeatureType::Hole,
//!     size: Some(SizeLimits::new(0.500, 0.010)),
//!     composite: None,
//! };
//! let result = check_position(&control, None, &ValidationSettings::default());
//! assert!((result.total_tolerance.unwrap() - 0.030).abs() < 1e-12);
//! assert!((result.virtual_condition.unwrap() - 0.480).abs() < 1e-12);
//! ```

use tracing::debug;

use crate::results::{fmt_len, GdtValidationResult, ValidationIssue};
use crate::settings::ValidationSettings;
use crate::tolerances::asme_ref;
use crate::tolerances::callout::CompositeTiers;
use crate::tolerances::{
    LocationControl, MaterialCondition, PositionControl, PositionData, SizeBoundary, ToleranceType,
};

/// Validate a position callout, optionally against a measured location.
pub fn check_position(
    control: &PositionControl,
    measured: Option<&PositionData>,
    settings: &ValidationSettings,
) -> GdtValidationResult {
    let mut result = GdtValidationResult::new();
    let tolerance = control.tolerance;

    let mut summary = format!("Position ⌀{}", fmt_len(tolerance));
    if control.material_condition.is_modifier() {
        summary.push_str(&format!(" at {}", control.material_condition));
    }
    summary.push_str(&format!(" on {} relative to datum {}", control.feature, control.datums));
    result.record_pass(Some(ValidationIssue::info("position_tolerance", summary, asme_ref::POSITION)));

    for datum in control.datums.modified_datums() {
        result.annotate(ValidationIssue::info(
            "position_datum_shift",
            format!(
                "Datum {} is referenced at {}; datum shift is available as the datum feature departs from its {} boundary",
                datum.label, datum.material_condition, datum.material_condition
            ),
            asme_ref::DATUMS,
        ));
    }

    let total = match control.material_condition {
        MaterialCondition::Rfs => tolerance,
        MaterialCondition::Mmc => apply_mmc(control, &mut result),
        MaterialCondition::Lmc => apply_lmc(control, &mut result),
    };
    result.total_tolerance = Some(total);

    if let Some(data) = measured {
        let deviation = data.deviation();
        result.position_deviation = Some(deviation);
        debug!(deviation, total, "position deviation measured");

        if deviation <= total + settings.boundary_epsilon {
            result.record_pass(Some(ValidationIssue::info(
                "position_deviation",
                format!(
                    "Measured position deviation ⌀{} is within total tolerance {}",
                    fmt_len(deviation),
                    fmt_len(total)
                ),
                asme_ref::POSITION,
            )));
        } else {
            result.record_failure(
                ValidationIssue::error(
                    "position_deviation",
                    format!(
                        "Measured position deviation ⌀{} exceeds total tolerance {} by {}",
                        fmt_len(deviation),
                        fmt_len(total),
                        fmt_len(deviation - total)
                    ),
                    asme_ref::POSITION,
                )
                .with_suggestion("Rework the feature location, or measure the actual feature size to confirm the bonus earned"),
            );
        }
    }

    if let Some(tiers) = control.composite {
        result.merge(check_composite(ToleranceType::Position, &tiers));
    }

    result
}

/// MMC branch: bonus, virtual condition and resultant condition.
fn apply_mmc(control: &PositionControl, result: &mut GdtValidationResult) -> f64 {
    let tolerance = control.tolerance;

    let Some(boundary) = control.feature.boundary() else {
        result.record_warning(
            ValidationIssue::warning(
                "position_bonus",
                format!(
                    "MMC applies only to a feature of size; a {} has no size boundary, so no bonus is computed",
                    control.feature
                ),
                asme_ref::MATERIAL_CONDITION,
            )
            .with_suggestion("Remove the MMC modifier or correct the feature type"),
        );
        return tolerance;
    };
    let Some(size) = control.size else {
        result.record_warning(
            ValidationIssue::warning(
                "position_bonus",
                format!(
                    "MMC requested on {} without feature size and size tolerance; bonus tolerance not computed",
                    control.feature
                ),
                asme_ref::MATERIAL_CONDITION,
            )
            .with_suggestion("Add the size dimension of the feature so the bonus can be evaluated"),
        );
        return tolerance;
    };

    let bonus = size.bonus_range();
    let total = tolerance + bonus;
    let mmc_size = size.mmc_size(boundary);
    let lmc_size = size.lmc_size(boundary);
    let (virtual_condition, resultant_condition, gage) = match boundary {
        SizeBoundary::Internal => (mmc_size - tolerance, lmc_size + total, "gage pin"),
        SizeBoundary::External => (mmc_size + tolerance, lmc_size - total, "gage hole"),
    };
    debug!(bonus, total, virtual_condition, resultant_condition, ?boundary, "MMC position evaluated");

    result.bonus_tolerance = Some(bonus);
    result.virtual_condition = Some(virtual_condition);
    result.resultant_condition = Some(resultant_condition);

    result.record_pass(Some(ValidationIssue::info(
        "position_bonus",
        format!(
            "MMC bonus {} available on {} ⌀{} ±{}; total position tolerance {}",
            fmt_len(bonus),
            control.feature,
            fmt_len(size.nominal),
            fmt_len(size.tolerance),
            fmt_len(total)
        ),
        asme_ref::POSITION,
    )));
    result.annotate(ValidationIssue::info(
        "position_virtual_condition",
        format!(
            "Virtual condition {} (MMC size {} {} {}), {} size {}; resultant condition {}",
            fmt_len(virtual_condition),
            fmt_len(mmc_size),
            if boundary == SizeBoundary::Internal { "−" } else { "+" },
            fmt_len(tolerance),
            gage,
            fmt_len(virtual_condition),
            fmt_len(resultant_condition)
        ),
        asme_ref::POSITION,
    ));
    total
}

/// LMC branch: the stated tolerance applies as-is.
fn apply_lmc(control: &PositionControl, result: &mut GdtValidationResult) -> f64 {
    let tolerance = control.tolerance;
    if control.feature.boundary().is_none() || control.size.is_none() {
        result.record_warning(
            ValidationIssue::warning(
                "position_bonus",
                format!(
                    "LMC requested on {} without a size boundary or size data; bonus tolerance not computed",
                    control.feature
                ),
                asme_ref::MATERIAL_CONDITION,
            )
            .with_suggestion("Add the size dimension of the feature or remove the LMC modifier"),
        );
        return tolerance;
    }
    result.record_pass(Some(ValidationIssue::info(
        "position_bonus",
        format!(
            "LMC position tolerance {} applies as stated; LMC protects minimum wall thickness, no virtual condition computed",
            fmt_len(tolerance)
        ),
        asme_ref::MATERIAL_CONDITION,
    )));
    tolerance
}

/// Static check of a two-tier composite frame: the feature-relating (lower)
/// tier may not exceed the pattern-locating (upper) tier.
pub fn check_composite(kind: ToleranceType, tiers: &CompositeTiers) -> GdtValidationResult {
    let mut result = GdtValidationResult::new();
    let check_type = kind.check_type("composite");
    let reference = match kind {
        ToleranceType::Position => asme_ref::COMPOSITE_POSITION,
        _ => asme_ref::PROFILE,
    };

    match tiers.feature {
        None => result.record_warning(
            ValidationIssue::warning(
                check_type,
                format!(
                    "Composite frame has no lower-tier (feature-relating) tolerance; only the pattern tier {} is defined",
                    fmt_len(tiers.pattern)
                ),
                reference,
            )
            .with_suggestion("Add the lower tier tolerance or remove the composite flag"),
        ),
        Some(feature) if tiers.pattern >= feature => result.record_pass(Some(ValidationIssue::info(
            check_type,
            format!(
                "Composite breakdown: pattern-locating tier {}, feature-relating tier {}",
                fmt_len(tiers.pattern),
                fmt_len(feature)
            ),
            reference,
        ))),
        Some(feature) => result.record_failure(
            ValidationIssue::error(
                check_type,
                format!(
                    "Composite lower tier {} exceeds upper tier {}; the feature-relating tolerance must not be larger than the pattern-locating tolerance",
                    fmt_len(feature),
                    fmt_len(tiers.pattern)
                ),
                reference,
            )
            .with_suggestion("Swap the tier values or tighten the lower tier"),
        ),
    }
    result
}

pub fn check_concentricity(control: &LocationControl) -> GdtValidationResult {
    check_legacy_location(ToleranceType::Concentricity, control, "position (coaxial) or runout")
}

pub fn check_symmetry(control: &LocationControl) -> GdtValidationResult {
    check_legacy_location(ToleranceType::Symmetry, control, "position or profile")
}

/// Datum-mandatory, no-bonus location check plus the usage warning both
/// legacy symbols always carry.
fn check_legacy_location(kind: ToleranceType, control: &LocationControl, replacement: &str) -> GdtValidationResult {
    let mut result = GdtValidationResult::new();
    result.total_tolerance = Some(control.tolerance);

    result.record_pass(Some(ValidationIssue::info(
        kind.check_type("location"),
        format!(
            "{} {} relative to datum {}",
            kind,
            fmt_len(control.tolerance),
            control.datums
        ),
        asme_ref::LEGACY_LOCATION,
    )));
    result.record_warning(
        ValidationIssue::warning(
            kind.check_type("usage"),
            format!(
                "{} locates median points, is costly to inspect and is no longer part of ASME Y14.5-2018",
                kind
            ),
            asme_ref::LEGACY_LOCATION,
        )
        .with_suggestion(format!("Use {} instead", replacement)),
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Severity;
    use crate::tolerances::{DatumReference, DatumReferenceFrame, FeatureType, SizeLimits};
    use approx::assert_abs_diff_eq;

    fn position(material_condition: MaterialCondition, feature: FeatureType) -> PositionControl {
        PositionControl {
            tolerance: 0.010,
            datums: DatumReferenceFrame::new(DatumReference::new("A")),
            material_condition,
            feature,
            size: Some(SizeLimits::new(0.500, 0.010)),
            composite: None,
        }
    }

    fn settings() -> ValidationSettings {
        ValidationSettings::default()
    }

    #[test]
    fn test_rfs_has_no_bonus() {
        let result = check_position(&position(MaterialCondition::Rfs, FeatureType::Hole), None, &settings());
        assert_eq!(result.total_tolerance, Some(0.010));
        assert!(result.bonus_tolerance.is_none());
        assert!(result.virtual_condition.is_none());
        assert_eq!(result.total_checks(), 1);
    }

    #[test]
    fn test_mmc_hole() {
        let result = check_position(&position(MaterialCondition::Mmc, FeatureType::Hole), None, &settings());
        assert_abs_diff_eq!(result.bonus_tolerance.unwrap(), 0.020, epsilon = 1e-12);
        assert_abs_diff_eq!(result.total_tolerance.unwrap(), 0.030, epsilon = 1e-12);
        assert_abs_diff_eq!(result.virtual_condition.unwrap(), 0.480, epsilon = 1e-12);
        assert_abs_diff_eq!(result.resultant_condition.unwrap(), 0.540, epsilon = 1e-12);
        assert!(result.find_issue("position_virtual_condition").unwrap().message.contains("gage pin"));
    }

    #[test]
    fn test_mmc_pin_reverses_sign() {
        let result = check_position(&position(MaterialCondition::Mmc, FeatureType::Pin), None, &settings());
        assert_abs_diff_eq!(result.bonus_tolerance.unwrap(), 0.020, epsilon = 1e-12);
        assert_abs_diff_eq!(result.virtual_condition.unwrap(), 0.520, epsilon = 1e-12);
        assert_abs_diff_eq!(result.resultant_condition.unwrap(), 0.460, epsilon = 1e-12);
    }

    #[test]
    fn test_mmc_slot_uses_internal_rule() {
        let result = check_position(&position(MaterialCondition::Mmc, FeatureType::Slot), None, &settings());
        assert_abs_diff_eq!(result.virtual_condition.unwrap(), 0.480, epsilon = 1e-12);
    }

    #[test]
    fn test_mmc_without_size_warns() {
        let mut control = position(MaterialCondition::Mmc, FeatureType::Hole);
        control.size = None;
        let result = check_position(&control, None, &settings());
        assert_eq!(result.warnings(), 1);
        assert!(result.bonus_tolerance.is_none());
        assert!(result.virtual_condition.is_none());
        assert_eq!(result.total_tolerance, Some(0.010));
        assert_eq!(result.find_issue("position_bonus").unwrap().severity, Severity::Warning);
    }

    #[test]
    fn test_mmc_on_surface_warns() {
        let result = check_position(&position(MaterialCondition::Mmc, FeatureType::Surface), None, &settings());
        assert_eq!(result.warnings(), 1);
        assert!(result.bonus_tolerance.is_none());
    }

    #[test]
    fn test_lmc_reports_stated_tolerance() {
        let result = check_position(&position(MaterialCondition::Lmc, FeatureType::Hole), None, &settings());
        assert_eq!(result.total_tolerance, Some(0.010));
        assert!(result.bonus_tolerance.is_none());
        assert!(result.virtual_condition.is_none());
        assert!(result.passes());
    }

    #[test]
    fn test_lmc_without_size_warns() {
        let mut control = position(MaterialCondition::Lmc, FeatureType::Hole);
        control.size = None;
        let result = check_position(&control, None, &settings());
        assert_eq!(result.warnings(), 1);
        assert!(result.passes());
        assert!(result.bonus_tolerance.is_none());
        assert_eq!(result.total_tolerance, Some(0.010));
        assert_eq!(result.find_issue("position_bonus").unwrap().severity, Severity::Warning);
    }

    #[test]
    fn test_deviation_boundary_inclusive() {
        let control = position(MaterialCondition::Mmc, FeatureType::Hole);
        let at_limit = PositionData::new((0.0, 0.0), (0.015, 0.0));
        let result = check_position(&control, Some(&at_limit), &settings());
        assert_abs_diff_eq!(result.position_deviation.unwrap(), 0.030, epsilon = 1e-12);
        assert!(result.passes());

        let over = PositionData::new((0.0, 0.0), (0.01505, 0.0));
        let result = check_position(&control, Some(&over), &settings());
        assert_abs_diff_eq!(result.position_deviation.unwrap(), 0.0301, epsilon = 1e-12);
        assert_eq!(result.failed(), 1);
        assert_eq!(result.find_issue("position_deviation").unwrap().severity, Severity::Error);
    }

    #[test]
    fn test_datum_shift_note() {
        let mut control = position(MaterialCondition::Mmc, FeatureType::Hole);
        control.datums = DatumReferenceFrame::new(DatumReference::new("A"));
        let plain = check_position(&control, None, &settings());
        assert!(plain.find_issue("position_datum_shift").is_none());

        control.datums =
            DatumReferenceFrame::new(DatumReference::new("B").with_material_condition(MaterialCondition::Mmc));
        let shifted = check_position(&control, None, &settings());
        assert!(shifted.find_issue("position_datum_shift").is_some());
        assert_eq!(plain.counts, shifted.counts);
    }

    #[test]
    fn test_composite_tiers() {
        let ok = check_composite(
            ToleranceType::Position,
            &CompositeTiers {
                pattern: 0.020,
                feature: Some(0.010),
            },
        );
        assert!(ok.passes());

        let equal = check_composite(
            ToleranceType::Position,
            &CompositeTiers {
                pattern: 0.010,
                feature: Some(0.010),
            },
        );
        assert!(equal.passes());

        let inverted = check_composite(
            ToleranceType::Position,
            &CompositeTiers {
                pattern: 0.010,
                feature: Some(0.020),
            },
        );
        assert_eq!(inverted.failed(), 1);
        assert_eq!(inverted.issues[0].check_type, "position_composite");

        let incomplete = check_composite(
            ToleranceType::ProfileSurface,
            &CompositeTiers {
                pattern: 0.010,
                feature: None,
            },
        );
        assert_eq!(incomplete.warnings(), 1);
    }

    #[test]
    fn test_concentricity_always_warns() {
        let control = LocationControl {
            tolerance: 0.002,
            datums: DatumReferenceFrame::new(DatumReference::new("A")),
        };
        let result = check_concentricity(&control);
        assert_eq!(result.total_checks(), 2);
        assert_eq!(result.passed(), 1);
        assert_eq!(result.warnings(), 1);
        assert_eq!(result.total_tolerance, Some(0.002));
        assert!(result.find_issue("concentricity_usage").unwrap().suggestion.as_ref().unwrap().contains("runout"));

        let result = check_symmetry(&control);
        assert!(result.find_issue("symmetry_usage").is_some());
    }
}
