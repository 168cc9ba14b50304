//! Student models, re-exported from the `gradeport-models` crate.

pub use gradeport_models::students::*;
pub use gradeport_models::uploads::*;
