//! # GD&T Checkers
//!
//! One checker per tolerance kind, grouped by category. Each follows the
//! same pattern:
//!
//! - takes a typed control from [`crate::tolerances::callout`]
//! - returns a fresh [`GdtValidationResult`](crate::results::GdtValidationResult)
//! - is a pure function: no I/O, no shared state, identical output for
//!   identical input
//!
//! Datum legality is not checked here. A control that needs a datum cannot be
//! built without one, so the FCF validator reports the missing datum before a
//! checker is ever reached.
//!
//! ## Available Checkers
//!
//! - [`form`] - flatness, straightness, circularity, cylindricity
//! - [`orientation`] - perpendicularity, angularity, parallelism
//! - [`location`] - position (bonus, virtual condition, deviation), concentricity, symmetry
//! - [`runout`] - circular and total runout
//! - [`profile`] - profile of a line and of a surface

pub mod form;
pub mod location;
pub mod orientation;
pub mod profile;
pub mod runout;

pub use form::{check_circularity, check_cylindricity, check_flatness, check_straightness};
pub use location::{check_composite, check_concentricity, check_position, check_symmetry};
pub use orientation::{angular_equivalent_deg, check_angularity, check_parallelism, check_perpendicularity};
pub use profile::{check_profile_line, check_profile_surface};
pub use runout::{check_circular_runout, check_total_runout};
