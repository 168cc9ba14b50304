//! Bulk result upload: one row per (student, course, semester) score.
//!
//! Every reference column must resolve against the snapshot — an unresolved
//! matric number or course code is a row-level validation error that blocks
//! the batch, exactly as in the student upload. Rows are never dropped
//! silently for a bad reference; the uploader sees every offending value.

use std::collections::HashMap;

use uuid::Uuid;

use crate::grading::Grade;

use super::parse::{self, ImportRow, ParseError};
use super::{ImportError, ValidationError};

pub const COLUMNS: [&str; 6] = [
    "matric_number",
    "course_code",
    "semester_code",
    "session_name",
    "score",
    "remarks",
];

const IDENTITY_COLUMNS: [&str; 3] = ["matric_number", "course_code", "score"];

const REQUIRED: [&str; 5] = [
    "matric_number",
    "course_code",
    "semester_code",
    "session_name",
    "score",
];

/// Reference snapshot for one result batch.
#[derive(Debug, Default)]
pub struct ResultImportRefs {
    /// Matric number -> student id.
    pub students: HashMap<String, Uuid>,
    /// Course code -> course id.
    pub courses: HashMap<String, Uuid>,
    /// Semester code (e.g. `FIRST`) -> semester id.
    pub semesters: HashMap<String, Uuid>,
    /// Session name -> session id.
    pub sessions: HashMap<String, Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewResultRecord {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub semester_id: Uuid,
    pub session_id: Uuid,
    pub score: f64,
    pub grade: Grade,
    pub remarks: Option<String>,
}

/// Downloadable CSV template: header plus one illustrative row. Result
/// uploads carry no commas in their fields, so nothing needs quoting.
pub fn template() -> String {
    format!(
        "{}\nCSC/2023/001,MTH101,FIRST,2023/2024,72,\n",
        COLUMNS.join(",")
    )
}

/// Parse upload text into result rows, discarding lines that carry none of
/// the identity columns.
pub fn parse_rows(content: &str) -> Result<Vec<ImportRow>, ParseError> {
    let rows: Vec<ImportRow> = parse::parse_delimited(content, ',')?
        .into_iter()
        .filter(|row| !row.missing_all(&IDENTITY_COLUMNS))
        .collect();

    if rows.is_empty() {
        return Err(ParseError::NoDataRows);
    }
    Ok(rows)
}

/// Validate the whole batch against the snapshot; all-or-nothing.
pub fn validate(
    rows: &[ImportRow],
    refs: &ResultImportRefs,
) -> Result<Vec<NewResultRecord>, Vec<ValidationError>> {
    let mut errors: Vec<ValidationError> = Vec::new();
    let mut records: Vec<NewResultRecord> = Vec::new();

    for row in rows {
        let before = errors.len();

        for field in REQUIRED {
            if row.get(field).is_none() {
                errors.push(ValidationError::new(
                    row.row,
                    field,
                    format!("{} is required", field),
                ));
            }
        }

        let mut graded: Option<(f64, Grade)> = None;
        if let Some(raw) = row.get("score") {
            match raw.parse::<f64>() {
                Ok(score) => match Grade::from_score(score) {
                    Ok(grade) => graded = Some((score, grade)),
                    Err(e) => {
                        errors.push(ValidationError::new(row.row, "score", e.to_string()))
                    }
                },
                Err(_) => errors.push(ValidationError::new(
                    row.row,
                    "score",
                    format!("'{}' is not a number", raw),
                )),
            }
        }

        let resolve = |column: &str,
                       map: &HashMap<String, Uuid>,
                       what: &str,
                       errors: &mut Vec<ValidationError>| {
            row.get(column).and_then(|value| match map.get(value) {
                Some(id) => Some(*id),
                None => {
                    errors.push(ValidationError::new(
                        row.row,
                        column,
                        format!("'{}' does not match any {}", value, what),
                    ));
                    None
                }
            })
        };

        let student_id = resolve("matric_number", &refs.students, "student", &mut errors);
        let course_id = resolve("course_code", &refs.courses, "course", &mut errors);
        let semester_id = resolve("semester_code", &refs.semesters, "semester", &mut errors);
        let session_id = resolve("session_name", &refs.sessions, "academic session", &mut errors);

        if errors.len() > before {
            continue;
        }

        // Unreachable fallbacks: every None above pushed an error.
        let (Some(student_id), Some(course_id), Some(semester_id), Some(session_id)) =
            (student_id, course_id, semester_id, session_id)
        else {
            continue;
        };
        let Some((score, grade)) = graded else {
            continue;
        };

        records.push(NewResultRecord {
            student_id,
            course_id,
            semester_id,
            session_id,
            score,
            grade,
            remarks: row.get("remarks").map(str::to_string),
        });
    }

    if !errors.is_empty() {
        errors.sort_by_key(|e| e.row);
        return Err(errors);
    }

    Ok(records)
}

/// Parse and validate in one step.
pub fn prepare(
    content: &str,
    refs: &ResultImportRefs,
) -> Result<Vec<NewResultRecord>, ImportError> {
    let rows = parse_rows(content)?;
    validate(&rows, refs).map_err(ImportError::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs() -> ResultImportRefs {
        let mut students = HashMap::new();
        students.insert("CSC/2023/001".to_string(), Uuid::from_u128(1));
        students.insert("CSC/2023/002".to_string(), Uuid::from_u128(2));
        let mut courses = HashMap::new();
        courses.insert("MTH101".to_string(), Uuid::from_u128(20));
        let mut semesters = HashMap::new();
        semesters.insert("FIRST".to_string(), Uuid::from_u128(30));
        let mut sessions = HashMap::new();
        sessions.insert("2023/2024".to_string(), Uuid::from_u128(40));
        ResultImportRefs {
            students,
            courses,
            semesters,
            sessions,
        }
    }

    #[test]
    fn template_round_trips_and_validates() {
        let records = prepare(&template(), &refs()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].student_id, Uuid::from_u128(1));
        assert_eq!(records[0].score, 72.0);
        assert_eq!(records[0].grade, Grade::B);
        assert_eq!(records[0].remarks, None);
    }

    #[test]
    fn scores_are_graded_during_validation() {
        let content = "matric_number,course_code,semester_code,session_name,score,remarks\n\
                       CSC/2023/001,MTH101,FIRST,2023/2024,89,close\n\
                       CSC/2023/002,MTH101,FIRST,2023/2024,90,\n";
        let records = prepare(content, &refs()).unwrap();
        assert_eq!(records[0].grade, Grade::AB);
        assert_eq!(records[0].remarks.as_deref(), Some("close"));
        assert_eq!(records[1].grade, Grade::A);
    }

    #[test]
    fn unresolved_references_are_errors_not_silent_drops() {
        let content = "matric_number,course_code,semester_code,session_name,score,remarks\n\
                       CSC/2023/001,MTH101,FIRST,2023/2024,70,\n\
                       EEE/1999/999,PHY999,FIRST,2023/2024,65,\n";
        let err = prepare(content, &refs()).unwrap_err();
        let ImportError::Invalid(errors) = err else {
            panic!("expected validation errors");
        };
        // The good first row buys nothing: the whole batch is blocked, and
        // both unresolved references on row 2 are named.
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.row == 2));
        assert_eq!(errors[0].field, "matric_number");
        assert!(errors[0].message.contains("EEE/1999/999"));
        assert_eq!(errors[1].field, "course_code");
    }

    #[test]
    fn out_of_range_and_non_numeric_scores_fail_validation() {
        let content = "matric_number,course_code,semester_code,session_name,score,remarks\n\
                       CSC/2023/001,MTH101,FIRST,2023/2024,430,typo\n\
                       CSC/2023/002,MTH101,FIRST,2023/2024,eighty,\n";
        let err = prepare(content, &refs()).unwrap_err();
        let ImportError::Invalid(errors) = err else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].row, 1);
        assert!(errors[0].message.contains("0-100"));
        assert_eq!(errors[1].row, 2);
        assert!(errors[1].message.contains("not a number"));
    }

    #[test]
    fn missing_required_columns_each_report() {
        let content = "matric_number,course_code,semester_code,session_name,score,remarks\n\
                       CSC/2023/001,MTH101,,,70,\n";
        let err = prepare(content, &refs()).unwrap_err();
        let ImportError::Invalid(errors) = err else {
            panic!("expected validation errors");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["semester_code", "session_name"]);
    }

    #[test]
    fn blank_filler_lines_are_discarded_silently() {
        let content = "matric_number,course_code,semester_code,session_name,score,remarks\n\
                       CSC/2023/001,MTH101,FIRST,2023/2024,50,\n\
                       ,,,,,\n";
        let records = prepare(content, &refs()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].grade, Grade::D);
    }
}
