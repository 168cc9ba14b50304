//! Bulk student upload: CSV template, batch validation, record conversion.

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use super::parse::{self, ImportRow, ParseError};
use super::{ImportError, ValidationError, is_valid_email};

/// Template column order. This exact header is what the portal hands out and
/// what uploads are expected to come back with.
pub const COLUMNS: [&str; 12] = [
    "matric_number",
    "first_name",
    "last_name",
    "email",
    "phone",
    "level",
    "status",
    "date_of_birth",
    "gender",
    "address",
    "department_code",
    "session_name",
];

/// A row with none of these is not a student at all — it is discarded during
/// parsing, silently, before validation ever sees it. Misspelling these
/// headers therefore loses every row; the tests pin this behavior down.
const IDENTITY_COLUMNS: [&str; 4] = ["matric_number", "first_name", "last_name", "email"];

pub const ALLOWED_LEVELS: [&str; 5] = ["100L", "200L", "300L", "400L", "500L"];
pub const ALLOWED_STATUSES: [&str; 3] = ["active", "inactive", "graduated"];
pub const ALLOWED_GENDERS: [&str; 2] = ["male", "female"];

const DEFAULT_STATUS: &str = "active";

/// Reference collections a batch validates against, snapshotted by the caller
/// before validation begins.
#[derive(Debug, Default)]
pub struct StudentImportRefs {
    /// Department code -> department id.
    pub departments: HashMap<String, Uuid>,
    /// Session name (e.g. `2023/2024`) -> session id.
    pub sessions: HashMap<String, Uuid>,
}

/// A validated row, ready for the persistence collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudentRecord {
    pub matric_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub level: String,
    pub status: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub address: Option<String>,
    pub department_id: Option<Uuid>,
    pub session_id: Option<Uuid>,
}

/// Downloadable CSV template: the exact header plus one illustrative row,
/// every field double-quoted.
pub fn template() -> String {
    let header = COLUMNS
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(",");
    let sample = [
        "CSC/2023/001",
        "Adaeze",
        "Okafor",
        "adaeze.okafor@example.edu.ng",
        "+2348012345678",
        "100L",
        "active",
        "2004-03-15",
        "female",
        "12 Unity Road, Enugu",
        "CSC",
        "2023/2024",
    ]
    .iter()
    .map(|v| format!("\"{}\"", v))
    .collect::<Vec<_>>()
    .join(",");
    format!("{}\n{}\n", header, sample)
}

/// Parse upload text into student rows. Rows missing every identity column
/// are dropped here, silently; if nothing survives, that is a parse error.
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

/// Validate the whole batch. Either every row converts to a
/// [`NewStudentRecord`], or the complete list of errors comes back and zero
/// records may be submitted.
pub fn validate(
    rows: &[ImportRow],
    refs: &StudentImportRefs,
) -> Result<Vec<NewStudentRecord>, Vec<ValidationError>> {
    let mut errors: Vec<ValidationError> = Vec::new();
    let mut records: Vec<NewStudentRecord> = Vec::new();

    for row in rows {
        let before = errors.len();

        for field in ["matric_number", "first_name", "last_name", "email", "level", "gender"] {
            if row.get(field).is_none() {
                errors.push(ValidationError::new(
                    row.row,
                    field,
                    format!("{} is required", field),
                ));
            }
        }

        if let Some(email) = row.get("email") {
            if !is_valid_email(email) {
                errors.push(ValidationError::new(
                    row.row,
                    "email",
                    format!("'{}' is not a valid email address", email),
                ));
            }
        }

        if let Some(level) = row.get("level") {
            if !ALLOWED_LEVELS.contains(&level) {
                errors.push(ValidationError::new(
                    row.row,
                    "level",
                    format!("'{}' is not one of {}", level, ALLOWED_LEVELS.join(", ")),
                ));
            }
        }

        if let Some(status) = row.get("status") {
            if !ALLOWED_STATUSES.contains(&status) {
                errors.push(ValidationError::new(
                    row.row,
                    "status",
                    format!("'{}' is not one of {}", status, ALLOWED_STATUSES.join(", ")),
                ));
            }
        }

        let mut date_of_birth = None;
        if let Some(raw) = row.get("date_of_birth") {
            match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => date_of_birth = Some(date),
                Err(_) => errors.push(ValidationError::new(
                    row.row,
                    "date_of_birth",
                    format!("'{}' is not a valid date (expected YYYY-MM-DD)", raw),
                )),
            }
        }

        // Gender is the one enumerated field matched case-insensitively.
        let gender = row.get("gender").map(|g| g.to_ascii_lowercase());
        if let Some(gender) = gender.as_deref() {
            if !ALLOWED_GENDERS.contains(&gender) {
                errors.push(ValidationError::new(
                    row.row,
                    "gender",
                    format!("'{}' is not one of {}", gender, ALLOWED_GENDERS.join(", ")),
                ));
            }
        }

        let mut department_id = None;
        if let Some(code) = row.get("department_code") {
            match refs.departments.get(code) {
                Some(id) => department_id = Some(*id),
                None => errors.push(ValidationError::new(
                    row.row,
                    "department_code",
                    format!("'{}' does not match any department", code),
                )),
            }
        }

        let mut session_id = None;
        if let Some(name) = row.get("session_name") {
            match refs.sessions.get(name) {
                Some(id) => session_id = Some(*id),
                None => errors.push(ValidationError::new(
                    row.row,
                    "session_name",
                    format!("'{}' does not match any academic session", name),
                )),
            }
        }

        if errors.len() > before {
            continue;
        }

        records.push(NewStudentRecord {
            matric_number: row.get("matric_number").unwrap_or_default().to_string(),
            first_name: row.get("first_name").unwrap_or_default().to_string(),
            last_name: row.get("last_name").unwrap_or_default().to_string(),
            email: row.get("email").unwrap_or_default().to_string(),
            phone: row.get("phone").map(str::to_string),
            level: row.get("level").unwrap_or_default().to_string(),
            status: row
                .get("status")
                .unwrap_or(DEFAULT_STATUS)
                .to_string(),
            date_of_birth,
            gender: gender.unwrap_or_default(),
            address: row.get("address").map(str::to_string),
            department_id,
            session_id,
        });
    }

    if !errors.is_empty() {
        // Row-by-row accumulation already yields this order; the sort is the
        // documented contract (row ascending, field-check order within a row)
        // and is stable.
        errors.sort_by_key(|e| e.row);
        return Err(errors);
    }

    Ok(records)
}

/// Parse and validate in one step: the full pre-submission pipeline.
pub fn prepare(
    content: &str,
    refs: &StudentImportRefs,
) -> Result<Vec<NewStudentRecord>, ImportError> {
    let rows = parse_rows(content)?;
    validate(&rows, refs).map_err(ImportError::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs() -> StudentImportRefs {
        let mut departments = HashMap::new();
        departments.insert("CSC".to_string(), Uuid::from_u128(1));
        departments.insert("EEE".to_string(), Uuid::from_u128(2));
        let mut sessions = HashMap::new();
        sessions.insert("2023/2024".to_string(), Uuid::from_u128(10));
        StudentImportRefs {
            departments,
            sessions,
        }
    }

    fn header() -> String {
        COLUMNS.join(",")
    }

    #[test]
    fn template_round_trips_through_the_parser() {
        let rows = parse_rows(&template()).unwrap();
        assert_eq!(rows.len(), 1);
        for column in COLUMNS {
            assert!(
                rows[0].get(column).is_some(),
                "template left {} empty",
                column
            );
        }
        assert_eq!(rows[0].get("matric_number"), Some("CSC/2023/001"));
        assert_eq!(rows[0].get("session_name"), Some("2023/2024"));

        // And the template itself validates cleanly against matching refs.
        let records = validate(&rows, &refs()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].department_id, Some(Uuid::from_u128(1)));
    }

    #[test]
    fn valid_batch_converts_every_row() {
        let content = format!(
            "{}\nCSC/2023/002,Bola,Ade,bola@example.com,,200L,,,male,,CSC,2023/2024\n\
             CSC/2023/003,Chi,Obi,chi@example.com,,300L,inactive,,FEMALE,,,\n",
            header()
        );
        let records = prepare(&content, &refs()).unwrap();
        assert_eq!(records.len(), 2);
        // Blank status defaults, case-insensitive gender is normalized.
        assert_eq!(records[0].status, "active");
        assert_eq!(records[1].status, "inactive");
        assert_eq!(records[1].gender, "female");
        // Unsupplied optional references resolve to None.
        assert_eq!(records[1].department_id, None);
        assert_eq!(records[1].session_id, None);
    }

    #[test]
    fn all_or_nothing_one_bad_row_blocks_ten_good_ones() {
        let mut content = format!("{}\n", header());
        for i in 0..10 {
            content.push_str(&format!(
                "CSC/2023/1{:02},First{},Last{},s{}@example.com,,100L,,,male,,,\n",
                i, i, i, i
            ));
        }
        content.push_str("CSC/2023/999,Bad,Row,not-an-email,,900L,,,male,,,\n");

        let errors = prepare(&content, &refs()).unwrap_err();
        let ImportError::Invalid(errors) = errors else {
            panic!("expected validation errors");
        };
        // Exactly the bad row's errors, nothing from the valid ten.
        assert!(errors.iter().all(|e| e.row == 11));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "email");
        assert_eq!(errors[1].field, "level");
    }

    #[test]
    fn errors_accumulate_across_rows_and_fields() {
        let content = format!(
            "{}\n,NoMatric,Person,nm@example.com,,100L,,,male,,,\n\
             CSC/2023/004,,,bad-email,,100L,,,male,,,\n",
            header()
        );
        let rows = parse_rows(&content).unwrap();
        let errors = validate(&rows, &refs()).unwrap_err();

        // Row 1: missing matric. Row 2: missing first+last, invalid email.
        let pairs: Vec<(usize, &str)> = errors
            .iter()
            .map(|e| (e.row, e.field.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (1, "matric_number"),
                (2, "first_name"),
                (2, "last_name"),
                (2, "email"),
            ]
        );
    }

    #[test]
    fn missing_required_fields_report_one_error_each() {
        let content = format!("{}\nCSC/2023/005,,,,,,,,,,,\n", header());
        let rows = parse_rows(&content).unwrap();
        let errors = validate(&rows, &refs()).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["first_name", "last_name", "email", "level", "gender"]
        );
    }

    #[test]
    fn gender_is_case_insensitive_level_is_not() {
        let content = format!(
            "{}\nCSC/2023/006,Ugo,Eze,ugo@example.com,,100L,,,MALE,,,\n",
            header()
        );
        let records = prepare(&content, &refs()).unwrap();
        assert_eq!(records[0].gender, "male");

        let content = format!(
            "{}\nCSC/2023/007,Ugo,Eze,ugo@example.com,,100l,,,male,,,\n",
            header()
        );
        let err = prepare(&content, &refs()).unwrap_err();
        let ImportError::Invalid(errors) = err else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "level");
    }

    #[test]
    fn unresolved_references_name_the_offending_value() {
        let content = format!(
            "{}\nCSC/2023/008,Ada,Obi,ada@example.com,,100L,,,female,,LAW,1999/2000\n",
            header()
        );
        let err = prepare(&content, &refs()).unwrap_err();
        let ImportError::Invalid(errors) = err else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "department_code");
        assert!(errors[0].message.contains("LAW"));
        assert_eq!(errors[1].field, "session_name");
        assert!(errors[1].message.contains("1999/2000"));
    }

    #[test]
    fn rows_missing_every_identity_field_are_discarded_silently() {
        // Second data line has no matric, names, or email - only noise in
        // optional columns. It vanishes without a validation error.
        let content = format!(
            "{}\nCSC/2023/009,Ada,Obi,ada@example.com,,100L,,,female,,,\n\
             ,,,,0800000000,100L,active,,male,Somewhere,,\n",
            header()
        );
        let rows = parse_rows(&content).unwrap();
        assert_eq!(rows.len(), 1);
        let records = validate(&rows, &refs()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn misspelled_identity_headers_lose_the_whole_file() {
        // The documented failure mode of the silent discard: a typo in the
        // identity headers means every row is "missing" all identity fields.
        let content = "matricnumber,firstname,lastname,e_mail\nCSC/1,Ada,Obi,a@b.com\n";
        assert_eq!(parse_rows(content).unwrap_err(), ParseError::NoDataRows);
    }

    #[test]
    fn shuffling_rows_preserves_the_error_multiset() {
        let bad_a = "CSC/2023/010,Ada,Obi,bad-email,,100L,,,female,,,";
        let bad_b = "CSC/2023/011,Ben,Eze,ben@example.com,,100l,,,male,,,";
        let good = "CSC/2023/012,Chi,Ani,chi@example.com,,200L,,,female,,,";

        let forward = format!("{}\n{}\n{}\n{}\n", header(), bad_a, bad_b, good);
        let backward = format!("{}\n{}\n{}\n{}\n", header(), good, bad_b, bad_a);

        let extract = |content: &str| -> Vec<(String, String)> {
            let rows = parse_rows(content).unwrap();
            validate(&rows, &refs())
                .unwrap_err()
                .into_iter()
                .map(|e| (e.field, e.message))
                .collect()
        };

        let mut forward_errors = extract(&forward);
        let mut backward_errors = extract(&backward);
        forward_errors.sort();
        backward_errors.sort();
        assert_eq!(forward_errors, backward_errors);

        // Row numbers track positions, not content.
        let rows = parse_rows(&backward).unwrap();
        let errors = validate(&rows, &refs()).unwrap_err();
        assert_eq!(errors[0].row, 2);
        assert_eq!(errors[1].row, 3);
    }
}
