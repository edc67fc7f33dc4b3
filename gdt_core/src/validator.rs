//! # FCF Validator
//!
//! Entry point of the engine. A [`FeatureControlFrame`] (plus an optional
//! measurement) goes in, a [`GdtValidationResult`] comes out:
//!
//! 1. reject malformed input with a [`GdtError`](crate::errors::GdtError)
//! 2. lower the record into a typed [`Callout`]; a missing or out-of-order
//!    datum stops here with a single `{kind}_datum` ERROR
//! 3. report legal-but-discouraged usage (modifier on a kind that ignores it,
//!    datums on a form tolerance, repeated datum label, composite on a kind
//!    without tiers)
//! 4. dispatch to the checker for the kind and merge its result
//!
//! ## Example
//!
//! ```rust
//! use gdt_core::tolerances::{FeatureControlFrame, FeatureType, MaterialCondition, ToleranceType};
//! use gdt_core::validator::validate_feature_control_frame;
//!
//! let frame = FeatureControlFrame::new(ToleranceType::Position, 0.010)
//!     .with_material_condition(MaterialCondition::Mmc)
//!     .with_datum("A")
//!     .with_feature(FeatureType::Hole, 0.500, 0.010);
//!
//! let result = validate_feature_control_frame(&frame, None).unwrap();
//! assert!(result.passes());
//! assert!((result.virtual_condition.unwrap() - 0.480).abs() < 1e-12);
//! ```
//!
//! ## JSON Example
//!
//! ```json
//! [
//!   {
//!     "frame": {
//!       "tolerance_type": "position",
//!       "tolerance_value": 0.010,
//!       "material_condition": "MMC",
//!       "primary_datum": { "label": "A" },
//!       "feature_type": "HOLE",
//!       "feature_size": 0.500,
//!       "feature_size_tolerance": 0.010,
//!       "location": "Sheet 1, zone B3"
//!     },
//!     "position": { "nominal_x": 0.0, "nominal_y": 0.0, "actual_x": 0.015, "actual_y": 0.0 }
//!   }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::checks;
use crate::errors::{GdtError, GdtResult};
use crate::results::{GdtValidationResult, ValidationCounts, ValidationIssue};
use crate::settings::ValidationSettings;
use crate::tolerances::asme_ref;
use crate::tolerances::callout::DatumViolation;
use crate::tolerances::datums::DatumSlot;
use crate::tolerances::{Callout, FeatureControlFrame, PositionData, ToleranceCategory, ToleranceType};

/// Validator bound to a set of [`ValidationSettings`].
///
/// Holds no state besides the settings; one instance may validate any
/// number of frames.
#[derive(Debug, Clone, Default)]
pub struct GdtValidator {
    settings: ValidationSettings,
}

impl GdtValidator {
    pub fn new(settings: ValidationSettings) -> Self {
        GdtValidator { settings }
    }

    pub fn settings(&self) -> &ValidationSettings {
        &self.settings
    }

    /// Validate one feature control frame, with an optional measurement.
    ///
    /// Returns `Err` only for a malformed record. Every GD&T finding,
    /// including a missing datum, is an issue in the returned result.
    #[instrument(skip_all, fields(kind = %frame.tolerance_type))]
    pub fn validate(
        &self,
        frame: &FeatureControlFrame,
        position: Option<&PositionData>,
    ) -> GdtResult<GdtValidationResult> {
        self.settings.validate()?;
        frame.validate()?;
        if let Some(data) = position {
            data.validate()?;
        }

        let fallback_size = position.and_then(PositionData::size_limits);
        let mut result = match Callout::lower(frame, self.settings.default_process, fallback_size) {
            Ok(callout) => {
                let mut result = usage_warnings(frame, &callout);
                result.merge(self.dispatch(&callout, position));
                result
            }
            Err(violation) => datum_failure(&violation),
        };

        if let Some(location) = &frame.location {
            result.stamp_location(location);
        }
        debug!(
            total_checks = result.total_checks(),
            failed = result.failed(),
            warnings = result.warnings(),
            "frame validated"
        );
        Ok(result)
    }

    /// Validate a whole drawing's worth of frames.
    ///
    /// Stops at the first malformed record.
    #[instrument(skip_all, fields(frames = submissions.len()))]
    pub fn validate_drawing(&self, submissions: &[FrameSubmission]) -> GdtResult<DrawingValidation> {
        let drawing = submissions
            .iter()
            .map(|s| self.validate(&s.frame, s.position.as_ref()))
            .try_fold(DrawingValidation::default(), |mut drawing, result| {
                drawing.push(result?);
                Ok::<_, GdtError>(drawing)
            })?;

        info!(
            frames = drawing.results.len(),
            total_checks = drawing.counts.total_checks,
            passed = drawing.counts.passed,
            failed = drawing.counts.failed,
            warnings = drawing.counts.warnings,
            "drawing validated"
        );
        Ok(drawing)
    }

    fn dispatch(&self, callout: &Callout, position: Option<&PositionData>) -> GdtValidationResult {
        let settings = &self.settings;
        match callout {
            Callout::Flatness(c) => checks::check_flatness(c, settings),
            Callout::Straightness(c) => checks::check_straightness(c, settings),
            Callout::Circularity(c) => checks::check_circularity(c, settings),
            Callout::Cylindricity(c) => checks::check_cylindricity(c, settings),
            Callout::Perpendicularity(c) => checks::check_perpendicularity(c),
            Callout::Angularity(c) => checks::check_angularity(c),
            Callout::Parallelism(c) => checks::check_parallelism(c),
            Callout::Position(c) => checks::check_position(c, position, settings),
            Callout::Concentricity(c) => checks::check_concentricity(c),
            Callout::Symmetry(c) => checks::check_symmetry(c),
            Callout::CircularRunout(c) => checks::check_circular_runout(c),
            Callout::TotalRunout(c) => checks::check_total_runout(c),
            Callout::ProfileLine(c) => checks::check_profile_line(c),
            Callout::ProfileSurface(c) => checks::check_profile_surface(c),
        }
    }
}

/// Single ERROR for a datum frame that is missing or out of order.
fn datum_failure(violation: &DatumViolation) -> GdtValidationResult {
    let kind = violation.tolerance_type;
    let (message, suggestion) = match violation.missing {
        DatumSlot::Primary => (
            format!("{} requires a datum reference but no primary datum is given", kind),
            "Add a primary datum reference to the feature control frame".to_string(),
        ),
        slot => (
            format!(
                "{} datum frame skips the {} datum; references must follow primary, secondary, tertiary precedence",
                kind, slot
            ),
            format!("Fill the {} datum slot or move the later references up", slot),
        ),
    };

    let mut result = GdtValidationResult::new();
    result.record_failure(
        ValidationIssue::error(kind.check_type("datum"), message, asme_ref::DATUMS).with_suggestion(suggestion),
    );
    result
}

/// Legal-but-discouraged usage on a frame that lowered successfully.
fn usage_warnings(frame: &FeatureControlFrame, callout: &Callout) -> GdtValidationResult {
    let kind = frame.tolerance_type;
    let mut result = GdtValidationResult::new();

    if frame.material_condition.is_modifier() && !kind.accepts_material_condition(frame.is_axis) {
        let detail = if kind == ToleranceType::Straightness {
            "surface-line straightness; apply it to a derived axis instead"
        } else {
            "this tolerance type and is ignored"
        };
        result.record_warning(
            ValidationIssue::warning(
                "material_condition",
                format!("{} modifier is not applicable to {} ({})", frame.material_condition, kind, detail),
                asme_ref::MATERIAL_CONDITION,
            )
            .with_suggestion("Remove the material condition modifier"),
        );
    }

    if kind.category() == ToleranceCategory::Form && frame.datum_count() > 0 {
        result.record_warning(
            ValidationIssue::warning(
                kind.check_type("datum_ignored"),
                format!("{} is a form tolerance and cannot reference datums; the datum references are ignored", kind),
                asme_ref::FORM,
            )
            .with_suggestion("Remove the datum references or use an orientation tolerance"),
        );
    }

    if let Some(label) = callout.datums().and_then(|drf| drf.duplicate_label()) {
        result.record_warning(
            ValidationIssue::warning(
                "datum_duplicate",
                format!("Datum {} appears more than once in the datum reference frame", label),
                asme_ref::DATUMS,
            )
            .with_suggestion("Reference each datum feature once"),
        );
    }

    if frame.is_composite && !kind.supports_composite() {
        result.record_warning(
            ValidationIssue::warning(
                "composite_unsupported",
                format!(
                    "Composite frames apply to position and profile only; the composite flag on {} is ignored",
                    kind
                ),
                asme_ref::COMPOSITE_POSITION,
            )
            .with_suggestion("Use two separate single-segment frames"),
        );
    }

    result
}

/// Validate one frame with default settings.
pub fn validate_feature_control_frame(
    frame: &FeatureControlFrame,
    position: Option<&PositionData>,
) -> GdtResult<GdtValidationResult> {
    GdtValidator::default().validate(frame, position)
}

/// Validate a batch of frames with default settings.
pub fn validate_drawing(submissions: &[FrameSubmission]) -> GdtResult<DrawingValidation> {
    GdtValidator::default().validate_drawing(submissions)
}

/// One frame to validate, with its measurement if one was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSubmission {
    pub frame: FeatureControlFrame,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionData>,
}

impl FrameSubmission {
    pub fn new(frame: FeatureControlFrame) -> Self {
        FrameSubmission { frame, position: None }
    }

    pub fn with_position(mut self, position: PositionData) -> Self {
        self.position = Some(position);
        self
    }
}

/// Per-frame results of a batch plus their summed counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawingValidation {
    pub results: Vec<GdtValidationResult>,
    pub counts: ValidationCounts,
}

impl DrawingValidation {
    fn push(&mut self, result: GdtValidationResult) {
        self.counts += result.counts;
        self.results.push(result);
    }

    /// No frame on the drawing failed a check
    pub fn passes(&self) -> bool {
        self.counts.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ManufacturingProcess;
    use crate::results::Severity;
    use crate::tolerances::{DatumReference, FeatureType, MaterialCondition};

    #[test]
    fn test_missing_datum_is_single_error() {
        let frame = FeatureControlFrame::new(ToleranceType::Position, 0.010)
            .with_material_condition(MaterialCondition::Mmc)
            .with_feature(FeatureType::Hole, 0.500, 0.010);
        let result = validate_feature_control_frame(&frame, None).unwrap();
        assert_eq!(result.total_checks(), 1);
        assert_eq!(result.failed(), 1);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].check_type, "position_datum");
        assert!(result.bonus_tolerance.is_none());
        assert!(result.total_tolerance.is_none());
    }

    #[test]
    fn test_tertiary_without_secondary() {
        let mut frame = FeatureControlFrame::new(ToleranceType::Perpendicularity, 0.002).with_datum("A");
        frame.tertiary_datum = Some(DatumReference::new("C"));
        let result = validate_feature_control_frame(&frame, None).unwrap();
        assert_eq!(result.failed(), 1);
        assert!(result.issues[0].message.contains("secondary"));
    }

    #[test]
    fn test_malformed_tolerance_is_err() {
        let frame = FeatureControlFrame::new(ToleranceType::Flatness, -0.001);
        assert!(validate_feature_control_frame(&frame, None).is_err());
        let frame = FeatureControlFrame::new(ToleranceType::Flatness, f64::NAN);
        assert!(validate_feature_control_frame(&frame, None).is_err());
    }

    #[test]
    fn test_modifier_on_flatness_warns() {
        let frame = FeatureControlFrame::new(ToleranceType::Flatness, 0.005)
            .with_material_condition(MaterialCondition::Mmc);
        let result = validate_feature_control_frame(&frame, None).unwrap();
        assert_eq!(result.find_issue("material_condition").unwrap().severity, Severity::Warning);
        assert!(result.passes());
    }

    #[test]
    fn test_modifier_on_axis_straightness_is_legal() {
        let frame = FeatureControlFrame::new(ToleranceType::Straightness, 0.004)
            .with_material_condition(MaterialCondition::Mmc)
            .with_feature(FeatureType::Pin, 0.250, 0.002)
            .with_process(ManufacturingProcess::Turning)
            .on_axis();
        let result = validate_feature_control_frame(&frame, None).unwrap();
        assert!(result.find_issue("material_condition").is_none());
        assert_eq!(result.bonus_tolerance, Some(0.004));
    }

    #[test]
    fn test_datum_on_form_is_ignored() {
        let frame = FeatureControlFrame::new(ToleranceType::Flatness, 0.005).with_datum("A");
        let result = validate_feature_control_frame(&frame, None).unwrap();
        assert!(result.find_issue("flatness_datum_ignored").is_some());
        assert_eq!(result.warnings(), 1);
        assert_eq!(result.passed(), 1);
    }

    #[test]
    fn test_duplicate_datum_warns() {
        let frame = FeatureControlFrame::new(ToleranceType::Position, 0.010)
            .with_datum("A")
            .with_datum("A");
        let result = validate_feature_control_frame(&frame, None).unwrap();
        assert!(result.find_issue("datum_duplicate").is_some());
    }

    #[test]
    fn test_composite_on_flatness_warns() {
        let frame = FeatureControlFrame::new(ToleranceType::Flatness, 0.005).composite(0.005, 0.002);
        let result = validate_feature_control_frame(&frame, None).unwrap();
        assert!(result.find_issue("composite_unsupported").is_some());
    }

    #[test]
    fn test_profile_without_datum_is_legal() {
        let frame = FeatureControlFrame::new(ToleranceType::ProfileSurface, 0.010);
        let result = validate_feature_control_frame(&frame, None).unwrap();
        assert!(result.passes());
        assert_eq!(result.warnings(), 0);
    }

    #[test]
    fn test_default_process_comes_from_settings() {
        let frame = FeatureControlFrame::new(ToleranceType::Flatness, 0.0005);
        let milling = validate_feature_control_frame(&frame, None).unwrap();
        assert_eq!(milling.failed(), 1);

        let validator =
            GdtValidator::new(ValidationSettings::default().with_default_process(ManufacturingProcess::Lapping));
        let lapping = validator.validate(&frame, None).unwrap();
        assert!(lapping.passes());
    }

    #[test]
    fn test_size_falls_back_to_measurement() {
        let frame = FeatureControlFrame::new(ToleranceType::Position, 0.010)
            .with_material_condition(MaterialCondition::Mmc)
            .with_datum("A");
        let data = PositionData::new((0.0, 0.0), (0.010, 0.0)).with_diameter(0.500, 0.010);
        let result = validate_feature_control_frame(&frame, Some(&data)).unwrap();
        approx::assert_abs_diff_eq!(result.total_tolerance.unwrap(), 0.030, epsilon = 1e-12);
        assert!(result.passes());
    }

    #[test]
    fn test_location_stamped_on_every_issue() {
        let frame = FeatureControlFrame::new(ToleranceType::Concentricity, 0.002)
            .with_datum("A")
            .at_location("Sheet 2, zone C4");
        let result = validate_feature_control_frame(&frame, None).unwrap();
        assert_eq!(result.issues.len(), 2);
        assert!(result
            .issues
            .iter()
            .all(|i| i.location.as_deref() == Some("Sheet 2, zone C4")));
    }

    #[test]
    fn test_drawing_sums_counts() {
        let submissions = vec![
            FrameSubmission::new(FeatureControlFrame::new(ToleranceType::Flatness, 0.005)),
            FrameSubmission::new(FeatureControlFrame::new(ToleranceType::Position, 0.010)),
            FrameSubmission::new(FeatureControlFrame::new(ToleranceType::Symmetry, 0.004).with_datum("A")),
        ];
        let drawing = validate_drawing(&submissions).unwrap();
        assert_eq!(drawing.results.len(), 3);
        let summed: ValidationCounts = drawing.results.iter().map(|r| r.counts).sum();
        assert_eq!(drawing.counts, summed);
        assert!(!drawing.passes());
    }
}
