//! Result models, re-exported from the `gradeport-models` crate.

pub use gradeport_models::results::*;
pub use gradeport_models::uploads::*;
