//! Delimited-text parsing for bulk uploads.
//!
//! Uploads arrive as plain text (the caller reads the file). Parsing is
//! deliberately hand-rolled: split into lines, drop blank lines, treat the
//! first line as the header, split every line on the delimiter with
//! double-quote awareness (`""` escapes a quote inside a quoted field), trim
//! each field, and zip data fields against the header names.

use std::collections::HashMap;
use std::fmt;

/// Fatal parse failure. Reported once for the whole upload; validation is
/// never reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The uploaded text contains no non-blank lines at all.
    EmptyFile,
    /// A header line exists but no usable data rows follow it.
    NoDataRows,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFile => write!(f, "The uploaded file is empty"),
            Self::NoDataRows => write!(f, "The uploaded file contains no data rows"),
        }
    }
}

impl std::error::Error for ParseError {}

/// One parsed data line: header-name to field-value, plus the 1-based row
/// number (header excluded) used in validation errors.
#[derive(Debug, Clone)]
pub struct ImportRow {
    pub row: usize,
    fields: HashMap<String, String>,
}

impl ImportRow {
    /// Field value for a column, with blank treated the same as absent.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// True when every one of the named columns is absent or blank.
    pub fn missing_all(&self, columns: &[&str]) -> bool {
        columns.iter().all(|c| self.get(c).is_none())
    }
}

/// Split one line on `delimiter`, honouring double quotes. A `""` inside a
/// quoted field is an escaped quote.
pub fn split_record(line: &str, delimiter: char) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0usize;
    while i < chars.len() {
        let ch = chars[i];
        if ch == '"' {
            if in_quotes && i + 1 < chars.len() && chars[i + 1] == '"' {
                buf.push('"');
                i += 2;
                continue;
            }
            in_quotes = !in_quotes;
            i += 1;
            continue;
        }
        if ch == delimiter && !in_quotes {
            out.push(buf.trim().to_string());
            buf = String::new();
            i += 1;
            continue;
        }
        buf.push(ch);
        i += 1;
    }
    out.push(buf.trim().to_string());
    out
}

/// Quote a field for CSV output when it needs it.
pub fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Parse delimited text into header names and [`ImportRow`]s.
///
/// Blank lines are skipped entirely and do not consume row numbers. Data
/// fields beyond the header width are ignored; short lines simply leave the
/// trailing columns absent.
pub fn parse_delimited(text: &str, delimiter: char) -> Result<Vec<ImportRow>, ParseError> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty());

    let header_line = lines.next().ok_or(ParseError::EmptyFile)?;
    let header: Vec<String> = split_record(header_line, delimiter);

    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        let values = split_record(line, delimiter);
        let fields = header
            .iter()
            .cloned()
            .zip(values)
            .collect::<HashMap<_, _>>();
        rows.push(ImportRow {
            row: index + 1,
            fields,
        });
    }

    if rows.is_empty() {
        return Err(ParseError::NoDataRows);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_a_parse_error() {
        assert_eq!(parse_delimited("", ',').unwrap_err(), ParseError::EmptyFile);
        assert_eq!(
            parse_delimited("\n  \n\n", ',').unwrap_err(),
            ParseError::EmptyFile
        );
    }

    #[test]
    fn header_only_is_a_parse_error() {
        assert_eq!(
            parse_delimited("a,b,c\n", ',').unwrap_err(),
            ParseError::NoDataRows
        );
    }

    #[test]
    fn rows_are_numbered_from_one_excluding_header() {
        let rows = parse_delimited("name,code\nMaths,MTH101\n\nPhysics,PHY101\n", ',').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, 1);
        assert_eq!(rows[0].get("name"), Some("Maths"));
        // The blank line between data lines does not consume a row number.
        assert_eq!(rows[1].row, 2);
        assert_eq!(rows[1].get("code"), Some("PHY101"));
    }

    #[test]
    fn quoted_fields_are_stripped_and_unescaped() {
        let rows = parse_delimited(
            "\"name\",\"remark\"\n\"Ada, Lovelace\",\"said \"\"hi\"\"\"\n",
            ',',
        )
        .unwrap();
        assert_eq!(rows[0].get("name"), Some("Ada, Lovelace"));
        assert_eq!(rows[0].get("remark"), Some("said \"hi\""));
    }

    #[test]
    fn blank_fields_read_as_absent() {
        let rows = parse_delimited("a,b,c\n1,,3\n", ',').unwrap();
        assert_eq!(rows[0].get("a"), Some("1"));
        assert_eq!(rows[0].get("b"), None);
        assert_eq!(rows[0].get("c"), Some("3"));
        assert!(!rows[0].missing_all(&["a", "b"]));
        assert!(rows[0].missing_all(&["b"]));
    }

    #[test]
    fn short_lines_leave_trailing_columns_absent() {
        let rows = parse_delimited("a,b,c\nonly-a\n", ',').unwrap();
        assert_eq!(rows[0].get("a"), Some("only-a"));
        assert_eq!(rows[0].get("b"), None);
        assert_eq!(rows[0].get("c"), None);
    }

    #[test]
    fn windows_line_endings_are_tolerated() {
        let rows = parse_delimited("a,b\r\n1,2\r\n", ',').unwrap();
        assert_eq!(rows[0].get("b"), Some("2"));
    }

    #[test]
    fn csv_quote_only_when_needed() {
        assert_eq!(csv_quote("plain"), "plain");
        assert_eq!(csv_quote("a,b"), "\"a,b\"");
        assert_eq!(csv_quote("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
