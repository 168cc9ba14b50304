//! Academic session models, re-exported from the `gradeport-models` crate.

pub use gradeport_models::academic_sessions::*;
