//! # Runout Checkers
//!
//! Circular runout controls each circular element independently as the part
//! rotates about the datum axis; total runout controls the whole surface at
//! once. Neither accepts a material condition modifier.

use crate::results::{fmt_len, GdtValidationResult, ValidationIssue};
use crate::tolerances::asme_ref;
use crate::tolerances::{RunoutControl, ToleranceType};

pub fn check_circular_runout(control: &RunoutControl) -> GdtValidationResult {
    check_runout(
        ToleranceType::CircularRunout,
        control,
        "FIM at each cross-section, evaluated independently",
    )
}

pub fn check_total_runout(control: &RunoutControl) -> GdtValidationResult {
    check_runout(
        ToleranceType::TotalRunout,
        control,
        "FIM over the entire surface, indicator traversed along the feature",
    )
}

fn check_runout(kind: ToleranceType, control: &RunoutControl, scope: &str) -> GdtValidationResult {
    let mut result = GdtValidationResult::new();
    result.total_tolerance = Some(control.tolerance);
    result.record_pass(Some(ValidationIssue::info(
        kind.check_type("runout"),
        format!(
            "{} {} about datum axis {}; {}",
            kind,
            fmt_len(control.tolerance),
            control.datum_axis,
            scope
        ),
        asme_ref::RUNOUT,
    )));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerances::{DatumReference, DatumReferenceFrame};

    fn control() -> RunoutControl {
        RunoutControl {
            tolerance: 0.003,
            datum_axis: DatumReferenceFrame::new(DatumReference::new("A")),
        }
    }

    #[test]
    fn test_circular_runout() {
        let result = check_circular_runout(&control());
        assert!(result.passes());
        assert_eq!(result.total_checks(), 1);
        let issue = result.find_issue("circular_runout_runout").unwrap();
        assert!(issue.message.contains("each cross-section"));
        assert!(issue.message.contains("datum axis A"));
    }

    #[test]
    fn test_total_runout_scope() {
        let result = check_total_runout(&control());
        let issue = result.find_issue("total_runout_runout").unwrap();
        assert!(issue.message.contains("entire surface"));
        assert_eq!(result.total_tolerance, Some(0.003));
    }
}
