//! # Form Checkers
//!
//! Flatness, straightness, circularity and cylindricity never reference a
//! datum. Each compares the stated tolerance with what the manufacturing
//! process can hold:
//!
//! ```text
//! tolerance <  capability              → ERROR    (cannot be produced)
//! tolerance <  margin × capability     → WARNING  (near the process limit)
//! otherwise                            → INFO     (pass)
//! ```
//!
//! Cylindricity scales the capability by `max(1, length / diameter)`:
//! circularity is measured at one cross-section, while cylindricity
//! accumulates error along the whole axis.
//!
//! ## Example
//!
//! ```rust
//! use gdt_core::checks::check_flatness;
//! use gdt_core::process::ManufacturingProcess;
//! use gdt_core::settings::ValidationSettings;
//! use gdt_core::tolerances::FormControl;
//!
//! let control = FormControl { tolerance: 0.0005, process: ManufacturingProcess::Milling };
//! let result = check_flatness(&control, &ValidationSettings::default());
//! assert_eq!(result.failed(), 1);
//! ```

use crate::process::{CapabilityVerdict, ManufacturingProcess};
use crate::results::{fmt_len, GdtValidationResult, ValidationIssue};
use crate::settings::ValidationSettings;
use crate::tolerances::asme_ref;
use crate::tolerances::{
    CylindricityControl, FormControl, MaterialCondition, SizeBoundary, StraightnessControl,
    StraightnessElement, ToleranceType,
};

pub fn check_flatness(control: &FormControl, settings: &ValidationSettings) -> GdtValidationResult {
    check_capability(ToleranceType::Flatness, control.tolerance, control.process, 1.0, settings)
}

pub fn check_circularity(control: &FormControl, settings: &ValidationSettings) -> GdtValidationResult {
    check_capability(ToleranceType::Circularity, control.tolerance, control.process, 1.0, settings)
}

/// Straightness of surface line elements or of a derived axis.
///
/// Axis straightness may carry MMC/LMC and then follows the position rules:
/// at MMC the bonus is the full size range and the virtual condition uses
/// the hole/pin boundary; at LMC the stated tolerance applies as-is. A
/// modifier on a feature with no size boundary, or without size data,
/// earns no bonus and is a warning.
pub fn check_straightness(control: &StraightnessControl, settings: &ValidationSettings) -> GdtValidationResult {
    let mut result = check_capability(
        ToleranceType::Straightness,
        control.tolerance,
        control.process,
        1.0,
        settings,
    );

    let StraightnessElement::Axis {
        material_condition,
        feature,
        size,
    } = &control.element
    else {
        return result;
    };
    if !material_condition.is_modifier() {
        return result;
    }

    let Some(boundary) = feature.boundary() else {
        result.record_warning(
            ValidationIssue::warning(
                "straightness_bonus",
                format!(
                    "{} applies only to a feature of size; a {} has no size boundary, so no bonus is computed",
                    material_condition, feature
                ),
                asme_ref::MATERIAL_CONDITION,
            )
            .with_suggestion("Remove the material condition modifier or correct the feature type"),
        );
        return result;
    };
    let Some(size) = size else {
        result.record_warning(
            ValidationIssue::warning(
                "straightness_bonus",
                format!(
                    "{} on axis straightness needs the feature size and size tolerance; bonus not computed",
                    material_condition
                ),
                asme_ref::MATERIAL_CONDITION,
            )
            .with_suggestion("Add the size dimension of the feature to the callout"),
        );
        return result;
    };

    if *material_condition == MaterialCondition::Lmc {
        result.total_tolerance = Some(control.tolerance);
        result.record_pass(Some(ValidationIssue::info(
            "straightness_bonus",
            format!(
                "LMC axis straightness {} applies as stated; no virtual condition computed",
                fmt_len(control.tolerance)
            ),
            asme_ref::MATERIAL_CONDITION,
        )));
        return result;
    }

    let bonus = size.bonus_range();
    let total = control.tolerance + bonus;
    let mmc = size.mmc_size(boundary);
    let vc = match boundary {
        SizeBoundary::Internal => mmc - control.tolerance,
        SizeBoundary::External => mmc + control.tolerance,
    };
    result.bonus_tolerance = Some(bonus);
    result.total_tolerance = Some(total);
    result.virtual_condition = Some(vc);

    result.record_pass(Some(ValidationIssue::info(
        "straightness_bonus",
        format!(
            "MMC bonus {} on axis straightness of {} ⌀{} ±{}; total straightness tolerance {}; virtual condition {}",
            fmt_len(bonus),
            feature,
            fmt_len(size.nominal),
            fmt_len(size.tolerance),
            fmt_len(total),
            fmt_len(vc)
        ),
        asme_ref::MATERIAL_CONDITION,
    )));
    result
}

pub fn check_cylindricity(control: &CylindricityControl, settings: &ValidationSettings) -> GdtValidationResult {
    let scale = match (control.length, control.diameter) {
        (Some(length), Some(diameter)) if diameter > 0.0 => (length / diameter).max(1.0),
        _ => 1.0,
    };
    let mut result = check_capability(
        ToleranceType::Cylindricity,
        control.tolerance,
        control.process,
        scale,
        settings,
    );
    if scale > 1.0 {
        result.annotate(ValidationIssue::info(
            "cylindricity_scaling",
            format!(
                "Process capability scaled by length/diameter factor {:.2} for error accumulated along the axis",
                scale
            ),
            asme_ref::FORM,
        ));
    }
    result
}

fn check_capability(
    kind: ToleranceType,
    tolerance: f64,
    process: ManufacturingProcess,
    scale: f64,
    settings: &ValidationSettings,
) -> GdtValidationResult {
    let mut result = GdtValidationResult::new();
    let margin = settings.capability_margin;
    let capability = process.capability() * scale;
    let check_type = kind.check_type("capability");

    match process.assess(tolerance, scale, margin) {
        CapabilityVerdict::Unachievable => {
            let finer: Vec<&str> = ManufacturingProcess::capable_of(tolerance / scale, margin)
                .map(|p| p.display_name())
                .collect();
            let suggestion = if finer.is_empty() {
                format!("Loosen the tolerance to at least {}", fmt_len(capability * margin))
            } else {
                format!(
                    "Loosen the tolerance to at least {} or produce the feature by {}",
                    fmt_len(capability * margin),
                    finer.join(", ")
                )
            };
            result.record_failure(
                ValidationIssue::error(
                    check_type,
                    format!(
                        "{} {} is tighter than {} can produce (capability {})",
                        kind,
                        fmt_len(tolerance),
                        process,
                        fmt_len(capability)
                    ),
                    asme_ref::FORM,
                )
                .with_suggestion(suggestion),
            );
        }
        CapabilityVerdict::NearLimit => {
            result.record_warning(
                ValidationIssue::warning(
                    check_type,
                    format!(
                        "{} {} is within {}× of {} capability {}; expect scrap and added inspection",
                        kind,
                        fmt_len(tolerance),
                        margin,
                        process,
                        fmt_len(capability)
                    ),
                    asme_ref::FORM,
                )
                .with_suggestion(format!(
                    "Loosen the tolerance to {} or specify a finer process",
                    fmt_len(capability * margin)
                )),
            );
        }
        CapabilityVerdict::Achievable => {
            result.record_pass(Some(ValidationIssue::info(
                check_type,
                format!(
                    "{} {} is achievable by {} (capability {})",
                    kind,
                    fmt_len(tolerance),
                    process,
                    fmt_len(capability)
                ),
                asme_ref::FORM,
            )));
        }
    }
    result
}
