//! Bulk import: parse a delimited upload, validate the whole batch, then
//! submit row by row.
//!
//! Validation is all-or-nothing: every row is checked, every error is
//! collected, and a single failing field anywhere blocks the entire batch —
//! the caller gets the complete error list and fixes the spreadsheet in one
//! pass. Submission is the opposite: each validated row is submitted
//! independently, and one row's persistence failure never aborts its
//! siblings.
//!
//! Reference data (departments, sessions, courses, ...) is snapshotted into
//! plain maps before validation begins, so a batch's pass/fail decisions stay
//! self-consistent even if the live collections change mid-import.

pub mod parse;
pub mod results;
pub mod students;

use std::fmt;

use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

pub use parse::{ImportRow, ParseError};

/// One field-level problem on one row. Row numbers are 1-based and exclude
/// the header line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationError {
    pub row: usize,
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(row: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            row,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Why an upload produced no submissions.
#[derive(Debug)]
pub enum ImportError {
    /// Malformed input; reported once, nothing was validated.
    Parse(ParseError),
    /// The batch failed validation; the complete error list, ordered by row
    /// ascending (ties keep field-check order).
    Invalid(Vec<ValidationError>),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{}", e),
            Self::Invalid(errors) => write!(f, "{} validation error(s)", errors.len()),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<ParseError> for ImportError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

/// Outcome of the submission phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct SubmitSummary {
    pub total: usize,
    pub success_count: usize,
    pub error_count: usize,
}

impl SubmitSummary {
    /// Every row landed; the caller may treat the upload as done (e.g. close
    /// the dialog). Anything less stays open for inspection.
    pub fn fully_complete(&self) -> bool {
        self.success_count == self.total
    }
}

/// Overall outcome of an upload that parsed cleanly: either the batch
/// validated and went through submission, or validation rejected it
/// wholesale and nothing was submitted.
#[derive(Debug)]
pub enum BatchOutcome {
    Accepted(SubmitSummary),
    Rejected(Vec<ValidationError>),
}

/// Persistence collaborator: one call per validated record. Implemented by
/// the application against its data store; implemented by mocks in tests.
#[allow(async_fn_in_trait)]
pub trait RecordSink {
    type Record;

    async fn submit(&self, record: &Self::Record) -> anyhow::Result<()>;
}

/// Submit validated records one at a time, sequentially, in input order.
///
/// A failing row is logged and counted; it does not stop, retry, or roll back
/// anything. There is no batch transaction here on purpose: partially
/// submitted uploads keep their progress.
pub async fn submit_batch<S: RecordSink>(records: &[S::Record], sink: &S) -> SubmitSummary {
    let mut success_count = 0usize;
    let mut error_count = 0usize;

    for (index, record) in records.iter().enumerate() {
        match sink.submit(record).await {
            Ok(()) => success_count += 1,
            Err(e) => {
                error_count += 1;
                warn!(row = index + 1, error = %e, "bulk import row submission failed");
            }
        }
    }

    SubmitSummary {
        total: records.len(),
        success_count,
        error_count,
    }
}

/// Shared email shape check: `local@domain.tld`, no spaces, one `@`.
fn is_valid_email(value: &str) -> bool {
    if value.contains(char::is_whitespace) {
        return false;
    }
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let Some(domain) = parts.next() else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlakySink {
        fail_on: Vec<usize>,
        calls: std::sync::Mutex<usize>,
    }

    impl RecordSink for FlakySink {
        type Record = &'static str;

        async fn submit(&self, _record: &Self::Record) -> anyhow::Result<()> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if self.fail_on.contains(&*calls) {
                anyhow::bail!("duplicate key");
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn one_failing_row_does_not_abort_siblings() {
        let sink = FlakySink {
            fail_on: vec![3],
            calls: std::sync::Mutex::new(0),
        };
        let records = ["r1", "r2", "r3", "r4", "r5"];

        let summary = submit_batch(&records, &sink).await;

        // All five rows were attempted exactly once; the third failure is
        // counted, not retried and not rolled back.
        assert_eq!(*sink.calls.lock().unwrap(), 5);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.success_count, 4);
        assert_eq!(summary.error_count, 1);
        assert!(!summary.fully_complete());
    }

    #[tokio::test]
    async fn clean_batch_is_fully_complete() {
        let sink = FlakySink {
            fail_on: vec![],
            calls: std::sync::Mutex::new(0),
        };
        let summary = submit_batch(&["a", "b"], &sink).await;
        assert!(summary.fully_complete());
        assert_eq!(summary.error_count, 0);
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("ada@uni.edu.ng"));
        assert!(is_valid_email("first.last@example.com"));
        assert!(!is_valid_email("ada"));
        assert!(!is_valid_email("ada@"));
        assert!(!is_valid_email("@uni.edu"));
        assert!(!is_valid_email("ada@uni"));
        assert!(!is_valid_email("ada@uni."));
        assert!(!is_valid_email("ada@.ng"));
        assert!(!is_valid_email("a da@uni.edu"));
        assert!(!is_valid_email("ada@uni@edu.ng"));
    }
}
