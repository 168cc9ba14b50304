//! # Gradeport Models
//!
//! Domain models, DTOs, typed ids, and value types for the Gradeport API.
//!
//! - [`ids`]: strongly-typed UUID newtypes per entity
//! - [`value_types`]: validated primitives ([`value_types::Email`],
//!   [`value_types::MatricNumber`])
//! - [`auth`], [`users`]: accounts and login
//! - [`departments`], [`academic_sessions`], [`semesters`], [`courses`]:
//!   reference data managed by the admin
//! - [`students`], [`results`]: the registry the portal exists for
//! - [`uploads`]: request/response shapes shared by the bulk CSV endpoints

pub mod academic_sessions;
pub mod auth;
pub mod courses;
pub mod departments;
pub mod ids;
pub mod results;
pub mod semesters;
pub mod students;
pub mod uploads;
pub mod users;
pub mod value_types;
