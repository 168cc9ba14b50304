//! Request/response shapes shared by the bulk CSV upload endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use gradeport_core::import::{SubmitSummary, ValidationError};

/// A bulk upload: the caller reads the file and sends its text content.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct BulkUploadRequest {
    #[validate(length(min = 1))]
    pub content: String,
}

/// Successful upload outcome: every row validated, submission ran to the end.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadAcceptedResponse {
    pub message: String,
    pub summary: SubmitSummary,
}

/// Rejected upload: the complete error list, ordered by row. The batch
/// submitted nothing.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadRejectedResponse {
    pub message: String,
    pub errors: Vec<ValidationError>,
}
