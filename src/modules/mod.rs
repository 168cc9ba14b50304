pub mod academic_sessions;
pub mod auth;
pub mod courses;
pub mod departments;
pub mod results;
pub mod semesters;
pub mod students;
pub mod users;
