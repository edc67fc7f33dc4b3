//! # Typed Callouts
//!
//! One variant per tolerance kind, each holding only what that kind can
//! legally carry. Form variants have no datum field, datum-mandatory kinds
//! hold a [`DatumReferenceFrame`] rather than an `Option`, and only the kinds
//! that accept a material condition have one.
//!
//! [`Callout::lower`] turns a flat [`FeatureControlFrame`] into a callout. The
//! only way it can fail is a datum reference frame that is missing or out of
//! precedence order for a kind that needs one.

use serde::{Deserialize, Serialize};

use super::datums::{DatumReferenceFrame, DatumSlot};
use super::frame::FeatureControlFrame;
use super::{FeatureType, MaterialCondition, ProfileDistribution, SizeLimits, ToleranceType};
use crate::process::ManufacturingProcess;

/// Flatness or circularity.
#[derive(Debug, Clone, PartialEq)]
pub struct FormControl {
    pub tolerance: f64,
    pub process: ManufacturingProcess,
}

/// What a straightness tolerance is applied to.
#[derive(Debug, Clone, PartialEq)]
pub enum StraightnessElement {
    /// Line elements of a surface; no modifier possible
    SurfaceLine,
    /// Derived median line of a feature of size; may carry MMC/LMC
    Axis {
        material_condition: MaterialCondition,
        feature: FeatureType,
        size: Option<SizeLimits>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StraightnessControl {
    pub tolerance: f64,
    pub process: ManufacturingProcess,
    pub element: StraightnessElement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CylindricityControl {
    pub tolerance: f64,
    pub process: ManufacturingProcess,
    pub length: Option<f64>,
    pub diameter: Option<f64>,
}

/// Perpendicularity, angularity or parallelism.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationControl {
    pub tolerance: f64,
    pub datums: DatumReferenceFrame,
    pub material_condition: MaterialCondition,
    pub feature_length: Option<f64>,
    /// Only meaningful for angularity
    pub basic_angle: Option<f64>,
}

/// Upper and lower tier values of a composite frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeTiers {
    /// Pattern-locating tolerance (upper tier)
    pub pattern: f64,
    /// Feature-relating tolerance (lower tier); `None` when the record omits it
    pub feature: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionControl {
    pub tolerance: f64,
    pub datums: DatumReferenceFrame,
    pub material_condition: MaterialCondition,
    pub feature: FeatureType,
    pub size: Option<SizeLimits>,
    pub composite: Option<CompositeTiers>,
}

/// Concentricity or symmetry: datum-mandatory, never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationControl {
    pub tolerance: f64,
    pub datums: DatumReferenceFrame,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunoutControl {
    pub tolerance: f64,
    pub datum_axis: DatumReferenceFrame,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileControl {
    pub tolerance: f64,
    pub datums: Option<DatumReferenceFrame>,
    pub distribution: ProfileDistribution,
    pub composite: Option<CompositeTiers>,
}

/// A feature control frame with its legality encoded in the type.
#[derive(Debug, Clone, PartialEq)]
pub enum Callout {
    Flatness(FormControl),
    Straightness(StraightnessControl),
    Circularity(FormControl),
    Cylindricity(CylindricityControl),
    Perpendicularity(OrientationControl),
    Angularity(OrientationControl),
    Parallelism(OrientationControl),
    Position(PositionControl),
    Concentricity(LocationControl),
    Symmetry(LocationControl),
    CircularRunout(RunoutControl),
    TotalRunout(RunoutControl),
    ProfileLine(ProfileControl),
    ProfileSurface(ProfileControl),
}

/// A datum-requiring frame whose datum reference frame is missing or gapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatumViolation {
    pub tolerance_type: ToleranceType,
    /// First slot that should have been filled
    pub missing: DatumSlot,
}

impl Callout {
    /// Lower a flat record into a typed callout.
    ///
    /// `default_process` fills in for frames that name no process.
    /// `fallback_size` is used for position and axis straightness when the
    /// frame itself has no size data.
    pub fn lower(
        frame: &FeatureControlFrame,
        default_process: ManufacturingProcess,
        fallback_size: Option<SizeLimits>,
    ) -> Result<Callout, DatumViolation> {
        let kind = frame.tolerance_type;
        let tolerance = frame.tolerance_value;
        let process = frame.process.unwrap_or(default_process);
        let size = frame.size_limits().or(fallback_size);

        let violation = |missing| DatumViolation {
            tolerance_type: kind,
            missing,
        };
        // Required frames: an empty frame is a missing primary
        let required = || -> Result<DatumReferenceFrame, DatumViolation> {
            frame
                .datum_frame()
                .map_err(violation)?
                .ok_or(violation(DatumSlot::Primary))
        };
        let composite = frame.is_composite.then(|| CompositeTiers {
            pattern: frame.pattern_tolerance.unwrap_or(tolerance),
            feature: frame.feature_tolerance,
        });

        let form = || FormControl { tolerance, process };
        let orientation = || -> Result<OrientationControl, DatumViolation> {
            Ok(OrientationControl {
                tolerance,
                datums: required()?,
                material_condition: frame.material_condition,
                feature_length: frame.feature_length,
                basic_angle: frame.basic_angle,
            })
        };
        let location = || -> Result<LocationControl, DatumViolation> {
            Ok(LocationControl {
                tolerance,
                datums: required()?,
            })
        };
        let runout = || -> Result<RunoutControl, DatumViolation> {
            Ok(RunoutControl {
                tolerance,
                datum_axis: required()?,
            })
        };
        let profile = || -> Result<ProfileControl, DatumViolation> {
            Ok(ProfileControl {
                tolerance,
                datums: frame.datum_frame().map_err(violation)?,
                distribution: frame.distribution,
                composite,
            })
        };

        let callout = match kind {
            ToleranceType::Flatness => Callout::Flatness(form()),
            ToleranceType::Circularity => Callout::Circularity(form()),
            ToleranceType::Straightness => {
                let element = if frame.is_axis {
                    StraightnessElement::Axis {
                        material_condition: frame.material_condition,
                        feature: frame.feature_type,
                        size,
                    }
                } else {
                    StraightnessElement::SurfaceLine
                };
                Callout::Straightness(StraightnessControl {
                    tolerance,
                    process,
                    element,
                })
            }
            ToleranceType::Cylindricity => Callout::Cylindricity(CylindricityControl {
                tolerance,
                process,
                length: frame.feature_length,
                diameter: frame.feature_size,
            }),
            ToleranceType::Perpendicularity => Callout::Perpendicularity(orientation()?),
            ToleranceType::Angularity => Callout::Angularity(orientation()?),
            ToleranceType::Parallelism => Callout::Parallelism(orientation()?),
            ToleranceType::Position => Callout::Position(PositionControl {
                tolerance,
                datums: required()?,
                material_condition: frame.material_condition,
                feature: frame.feature_type,
                size,
                composite,
            }),
            ToleranceType::Concentricity => Callout::Concentricity(location()?),
            ToleranceType::Symmetry => Callout::Symmetry(location()?),
            ToleranceType::CircularRunout => Callout::CircularRunout(runout()?),
            ToleranceType::TotalRunout => Callout::TotalRunout(runout()?),
            ToleranceType::ProfileLine => Callout::ProfileLine(profile()?),
            ToleranceType::ProfileSurface => Callout::ProfileSurface(profile()?),
        };
        Ok(callout)
    }

    pub fn tolerance_type(&self) -> ToleranceType {
        match self {
            Callout::Flatness(_) => ToleranceType::Flatness,
            Callout::Straightness(_) => ToleranceType::Straightness,
            Callout::Circularity(_) => ToleranceType::Circularity,
            Callout::Cylindricity(_) => ToleranceType::Cylindricity,
            Callout::Perpendicularity(_) => ToleranceType::Perpendicularity,
            Callout::Angularity(_) => ToleranceType::Angularity,
            Callout::Parallelism(_) => ToleranceType::Parallelism,
            Callout::Position(_) => ToleranceType::Position,
            Callout::Concentricity(_) => ToleranceType::Concentricity,
            Callout::Symmetry(_) => ToleranceType::Symmetry,
            Callout::CircularRunout(_) => ToleranceType::CircularRunout,
            Callout::TotalRunout(_) => ToleranceType::TotalRunout,
            Callout::ProfileLine(_) => ToleranceType::ProfileLine,
            Callout::ProfileSurface(_) => ToleranceType::ProfileSurface,
        }
    }

    /// Datum reference frame, for the kinds that carry one
    pub fn datums(&self) -> Option<&DatumReferenceFrame> {
        match self {
            Callout::Flatness(_)
            | Callout::Straightness(_)
            | Callout::Circularity(_)
            | Callout::Cylindricity(_) => None,
            Callout::Perpendicularity(c) | Callout::Angularity(c) | Callout::Parallelism(c) => {
                Some(&c.datums)
            }
            Callout::Position(c) => Some(&c.datums),
            Callout::Concentricity(c) | Callout::Symmetry(c) => Some(&c.datums),
            Callout::CircularRunout(c) | Callout::TotalRunout(c) => Some(&c.datum_axis),
            Callout::ProfileLine(c) | Callout::ProfileSurface(c) => c.datums.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower(frame: &FeatureControlFrame) -> Result<Callout, DatumViolation> {
        Callout::lower(frame, ManufacturingProcess::Milling, None)
    }

    #[test]
    fn test_every_kind_lowers_with_full_frame() {
        for kind in ToleranceType::ALL {
            let frame = FeatureControlFrame::new(kind, 0.010).with_datum("A").with_datum("B");
            let callout = lower(&frame).unwrap();
            assert_eq!(callout.tolerance_type(), kind);
        }
    }

    #[test]
    fn test_missing_datum_is_rejected() {
        for kind in ToleranceType::ALL.into_iter().filter(|k| k.requires_datum()) {
            let frame = FeatureControlFrame::new(kind, 0.010);
            assert_eq!(
                lower(&frame),
                Err(DatumViolation {
                    tolerance_type: kind,
                    missing: DatumSlot::Primary
                })
            );
        }
    }

    #[test]
    fn test_form_drops_datums() {
        let frame = FeatureControlFrame::new(ToleranceType::Flatness, 0.004).with_datum("A");
        let callout = lower(&frame).unwrap();
        assert!(callout.datums().is_none());
    }

    #[test]
    fn test_profile_datum_optional_but_ordered() {
        let bare = FeatureControlFrame::new(ToleranceType::ProfileSurface, 0.010);
        assert!(lower(&bare).unwrap().datums().is_none());

        let mut gapped = FeatureControlFrame::new(ToleranceType::ProfileSurface, 0.010);
        gapped.secondary_datum = Some(super::super::DatumReference::new("B"));
        assert_eq!(lower(&gapped).unwrap_err().missing, DatumSlot::Primary);
    }

    #[test]
    fn test_default_process_and_fallback_size() {
        let frame = FeatureControlFrame::new(ToleranceType::Position, 0.010)
            .with_datum("A")
            .with_material_condition(MaterialCondition::Mmc);
        let callout = Callout::lower(
            &frame,
            ManufacturingProcess::Milling,
            Some(SizeLimits::new(0.5, 0.01)),
        )
        .unwrap();
        match callout {
            Callout::Position(p) => assert_eq!(p.size, Some(SizeLimits::new(0.5, 0.01))),
            other => panic!("expected position, got {:?}", other),
        }

        let flat = FeatureControlFrame::new(ToleranceType::Flatness, 0.004);
        match Callout::lower(&flat, ManufacturingProcess::Grinding, None).unwrap() {
            Callout::Flatness(f) => assert_eq!(f.process, ManufacturingProcess::Grinding),
            other => panic!("expected flatness, got {:?}", other),
        }
    }

    #[test]
    fn test_straightness_axis_element() {
        let frame = FeatureControlFrame::new(ToleranceType::Straightness, 0.002)
            .on_axis()
            .with_material_condition(MaterialCondition::Mmc)
            .with_feature(FeatureType::Pin, 0.250, 0.002);
        match lower(&frame).unwrap() {
            Callout::Straightness(s) => assert!(matches!(s.element, StraightnessElement::Axis { .. })),
            other => panic!("expected straightness, got {:?}", other),
        }
    }
}
