//! # Orientation Checkers
//!
//! Perpendicularity, angularity and parallelism. All three require a datum,
//! which [`OrientationControl`] guarantees by construction. The check itself
//! is a legality/achievability pass; the angular equivalent
//! `atan(tolerance / feature_length)` is reported for information and never
//! decides pass or fail.

use crate::results::{fmt_len, GdtValidationResult, ValidationIssue};
use crate::tolerances::asme_ref;
use crate::tolerances::{OrientationControl, ToleranceType};

/// Angle, in degrees, subtended by a tolerance zone over a feature length.
///
/// ```rust
/// use gdt_core::checks::angular_equivalent_deg;
///
/// let angle = angular_equivalent_deg(0.002, 4.0);
/// assert!((angle - 0.02865).abs() < 1e-5);
/// ```
pub fn angular_equivalent_deg(tolerance: f64, feature_length: f64) -> f64 {
    (tolerance / feature_length).atan().to_degrees()
}

pub fn check_perpendicularity(control: &OrientationControl) -> GdtValidationResult {
    check_orientation(ToleranceType::Perpendicularity, control)
}

pub fn check_angularity(control: &OrientationControl) -> GdtValidationResult {
    check_orientation(ToleranceType::Angularity, control)
}

pub fn check_parallelism(control: &OrientationControl) -> GdtValidationResult {
    check_orientation(ToleranceType::Parallelism, control)
}

fn check_orientation(kind: ToleranceType, control: &OrientationControl) -> GdtValidationResult {
    let mut result = GdtValidationResult::new();

    let mut message = format!("{} {}", kind, fmt_len(control.tolerance));
    if control.material_condition.is_modifier() {
        message.push_str(&format!(" at {}", control.material_condition));
    }
    message.push_str(&format!(" relative to datum {}", control.datums));
    if kind == ToleranceType::Angularity {
        if let Some(angle) = control.basic_angle {
            message.push_str(&format!(" at basic angle {}°", angle));
        }
    }

    match control.feature_length {
        Some(length) => {
            let angle = angular_equivalent_deg(control.tolerance, length);
            message.push_str(&format!(
                "; angular equivalent {:.4}° over length {}",
                angle,
                fmt_len(length)
            ));
        }
        None => message.push_str("; feature length not given, angular equivalent not computed"),
    }

    result.record_pass(Some(ValidationIssue::info(
        kind.check_type("orientation"),
        message,
        asme_ref::ORIENTATION,
    )));
    result
}
