//! # Profile Checkers
//!
//! Profile of a line and profile of a surface. The datum reference frame is
//! optional: without datums the zone controls form only; with datums it also
//! controls orientation and location relative to the frame. Profile may be
//! composite, in which case the tiers get the same static check as composite
//! position.

use super::location::check_composite;
use crate::results::{fmt_len, GdtValidationResult, ValidationIssue};
use crate::tolerances::asme_ref;
use crate::tolerances::{ProfileControl, ToleranceType};

pub fn check_profile_line(control: &ProfileControl) -> GdtValidationResult {
    check_profile(ToleranceType::ProfileLine, control, "each line element")
}

pub fn check_profile_surface(control: &ProfileControl) -> GdtValidationResult {
    check_profile(ToleranceType::ProfileSurface, control, "the entire surface")
}

fn check_profile(kind: ToleranceType, control: &ProfileControl, extent: &str) -> GdtValidationResult {
    let mut result = GdtValidationResult::new();
    result.total_tolerance = Some(control.tolerance);

    let controls = match &control.datums {
        Some(datums) => format!("controls form, orientation and location relative to datum {}", datums),
        None => "no datum referenced, controls form only".to_string(),
    };
    result.record_pass(Some(ValidationIssue::info(
        kind.check_type("profile"),
        format!(
            "{} {} over {}, {}; {}",
            kind,
            fmt_len(control.tolerance),
            extent,
            control.distribution.describe(control.tolerance),
            controls
        ),
        asme_ref::PROFILE,
    )));

    if let Some(tiers) = control.composite {
        result.merge(check_composite(kind, &tiers));
    }
    result
}
