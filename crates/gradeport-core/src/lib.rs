//! # Gradeport Core
//!
//! Core types and domain logic for the Gradeport API.
//!
//! This crate holds everything that must work without a database or an HTTP
//! stack:
//!
//! - [`errors`]: Application error types with HTTP response conversion
//! - [`pagination`]: Pagination utilities for API responses
//! - [`grading`]: The grade engine — score to letter grade mapping and
//!   weighted GPA/CGPA aggregation
//! - [`import`]: Bulk CSV import parsing, validation, and submission
//!
//! The grading engine and the import validator are pure and deterministic
//! given their inputs; reference data and persistence are supplied by the
//! caller (the axum application) through plain lookups and the
//! [`import::RecordSink`] trait.
//!
//! # Example
//!
//! ```ignore
//! use gradeport_core::grading::{Grade, WeightedEntry, aggregate_gpa};
//!
//! let grade = Grade::from_score(86.0)?;
//! assert_eq!(grade, Grade::AB);
//!
//! let gpa = aggregate_gpa(&[
//!     WeightedEntry { grade: Grade::A, credit_units: 3 },
//!     WeightedEntry { grade: Grade::B, credit_units: 2 },
//! ]);
//! assert_eq!(gpa, "3.60");
//! ```

pub mod errors;
pub mod grading;
pub mod import;
pub mod pagination;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
