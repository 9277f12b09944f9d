//! Grid geometry for cards: attack footprints, movement paths, facing and
//! nearest-target search.
//!
//! Everything here is a pure function of the grid and its inputs. Off-grid
//! lookups produce no candidate rather than an error, so these functions can
//! run any number of times during preview.
mod footprint;
mod movement;
mod nearest;
mod rotation;

pub use footprint::{Footprint, attack_footprint, column_offset};
pub use movement::{MoveStep, MovementPath, StepAxis, movement_path};
pub use nearest::nearest;
pub use rotation::{Direction, MIRROR_THRESHOLD_DEGREES, Orientation, signed_angle};
