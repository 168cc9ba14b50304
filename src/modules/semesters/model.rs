//! Semester models, re-exported from the `gradeport-models` crate.

pub use gradeport_models::semesters::*;
