//! The grade engine.
//!
//! Maps numeric scores to letter grades and aggregates `(grade, credit
//! units)` pairs into a weighted GPA. Semester GPA and cumulative GPA are the
//! same aggregation applied to different entry subsets; there is no separate
//! algorithm for either.
//!
//! Scores outside `[0, 100]` are rejected rather than clamped — a score of
//! 430 is a data-entry bug the caller must hear about, not a quiet `F`.
//!
//! Grade-point arithmetic is done on integer tenths (an `A` is 40) so the
//! formatted GPA string is exact; no binary floating-point artifacts reach
//! display or comparison.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Letter grades on the university's nine-level scale.
///
/// This is the single authoritative scale used for persisted results and all
/// GPA computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Grade {
    A,
    AB,
    B,
    BC,
    C,
    CD,
    D,
    E,
    F,
}

/// Error raised when a score cannot be graded.
#[derive(Debug, Clone, PartialEq)]
pub enum GradingError {
    /// The score is outside the `[0, 100]` range.
    ScoreOutOfRange(f64),
    /// The score is NaN or infinite.
    ScoreNotFinite,
}

impl fmt::Display for GradingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScoreOutOfRange(score) => {
                write!(f, "Score {} is outside the valid range 0-100", score)
            }
            Self::ScoreNotFinite => write!(f, "Score must be a finite number"),
        }
    }
}

impl std::error::Error for GradingError {}

impl Grade {
    /// All grades, best first.
    pub const SCALE: [Grade; 9] = [
        Grade::A,
        Grade::AB,
        Grade::B,
        Grade::BC,
        Grade::C,
        Grade::CD,
        Grade::D,
        Grade::E,
        Grade::F,
    ];

    /// Map a score to a letter grade. Lower bounds are inclusive:
    ///
    /// | Score  | Grade | Points |
    /// |--------|-------|--------|
    /// | 90-100 | A     | 4.0    |
    /// | 80-89  | AB    | 3.5    |
    /// | 70-79  | B     | 3.0    |
    /// | 65-69  | BC    | 2.5    |
    /// | 60-64  | C     | 2.0    |
    /// | 55-59  | CD    | 1.5    |
    /// | 50-54  | D     | 1.0    |
    /// | 45-49  | E     | 0.5    |
    /// | 0-44   | F     | 0.0    |
    ///
    /// Out-of-range and non-finite scores are rejected.
    pub fn from_score(score: f64) -> Result<Grade, GradingError> {
        if !score.is_finite() {
            return Err(GradingError::ScoreNotFinite);
        }
        if !(0.0..=100.0).contains(&score) {
            return Err(GradingError::ScoreOutOfRange(score));
        }

        Ok(match score {
            s if s >= 90.0 => Grade::A,
            s if s >= 80.0 => Grade::AB,
            s if s >= 70.0 => Grade::B,
            s if s >= 65.0 => Grade::BC,
            s if s >= 60.0 => Grade::C,
            s if s >= 55.0 => Grade::CD,
            s if s >= 50.0 => Grade::D,
            s if s >= 45.0 => Grade::E,
            _ => Grade::F,
        })
    }

    /// Grade points in integer tenths: `A` is 40, `E` is 5, `F` is 0.
    pub const fn points_tenths(self) -> u64 {
        match self {
            Grade::A => 40,
            Grade::AB => 35,
            Grade::B => 30,
            Grade::BC => 25,
            Grade::C => 20,
            Grade::CD => 15,
            Grade::D => 10,
            Grade::E => 5,
            Grade::F => 0,
        }
    }

    /// Grade points as a float (4.0, 3.5, ... 0.0).
    pub fn points(self) -> f64 {
        self.points_tenths() as f64 / 10.0
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::AB => "AB",
            Grade::B => "B",
            Grade::BC => "BC",
            Grade::C => "C",
            Grade::CD => "CD",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        }
    }

    /// Parse a stored letter back to a grade. `None` for unknown symbols.
    pub fn from_letter(letter: &str) -> Option<Grade> {
        match letter {
            "A" => Some(Grade::A),
            "AB" => Some(Grade::AB),
            "B" => Some(Grade::B),
            "BC" => Some(Grade::BC),
            "C" => Some(Grade::C),
            "CD" => Some(Grade::CD),
            "D" => Some(Grade::D),
            "E" => Some(Grade::E),
            "F" => Some(Grade::F),
            _ => None,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grade points for a stored letter, with a defensive `0.0` for symbols the
/// scale does not know. Rows written before a scale change must never crash a
/// report card.
pub fn points_for_letter(letter: &str) -> f64 {
    Grade::from_letter(letter).map(Grade::points).unwrap_or(0.0)
}

/// One course's contribution to a GPA: the earned grade weighted by the
/// course's credit units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedEntry {
    pub grade: Grade,
    pub credit_units: u64,
}

/// Weighted grade-point average over a set of course entries, formatted as a
/// fixed-point string with two fraction digits.
///
/// `Σ(points × units) / Σ(units)`, rounded half-up. Zero total credits
/// (including an empty entry set) yields `"0.00"`. Never fails.
pub fn aggregate_gpa(entries: &[WeightedEntry]) -> String {
    let mut points_tenths: u64 = 0;
    let mut credits: u64 = 0;

    for entry in entries {
        points_tenths += entry.grade.points_tenths() * entry.credit_units;
        credits += entry.credit_units;
    }

    format_gpa(points_tenths, credits)
}

/// Half-up rounding of `points_tenths / (10 * credits)` to hundredths,
/// rendered as `X.YY`. All integer arithmetic.
fn format_gpa(points_tenths: u64, credits: u64) -> String {
    if credits == 0 {
        return "0.00".to_string();
    }

    let denominator = credits * 10;
    let hundredths = (points_tenths * 100 * 2 + denominator) / (denominator * 2);
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}

/// Honours classification bands over a cumulative GPA on the 4.0 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum DegreeClass {
    FirstClass,
    SecondClassUpper,
    SecondClassLower,
    ThirdClass,
    Fail,
}

impl DegreeClass {
    pub fn from_cgpa(cgpa: f64) -> DegreeClass {
        match cgpa {
            c if c >= 3.5 => DegreeClass::FirstClass,
            c if c >= 3.0 => DegreeClass::SecondClassUpper,
            c if c >= 2.0 => DegreeClass::SecondClassLower,
            c if c >= 1.0 => DegreeClass::ThirdClass,
            _ => DegreeClass::Fail,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            DegreeClass::FirstClass => "First Class",
            DegreeClass::SecondClassUpper => "Second Class Upper",
            DegreeClass::SecondClassLower => "Second Class Lower",
            DegreeClass::ThirdClass => "Third Class",
            DegreeClass::Fail => "Fail",
        }
    }
}

impl fmt::Display for DegreeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_scores_map_exactly() {
        assert_eq!(Grade::from_score(100.0).unwrap(), Grade::A);
        assert_eq!(Grade::from_score(90.0).unwrap(), Grade::A);
        assert_eq!(Grade::from_score(89.0).unwrap(), Grade::AB);
        assert_eq!(Grade::from_score(80.0).unwrap(), Grade::AB);
        assert_eq!(Grade::from_score(70.0).unwrap(), Grade::B);
        assert_eq!(Grade::from_score(65.0).unwrap(), Grade::BC);
        assert_eq!(Grade::from_score(60.0).unwrap(), Grade::C);
        assert_eq!(Grade::from_score(55.0).unwrap(), Grade::CD);
        assert_eq!(Grade::from_score(50.0).unwrap(), Grade::D);
        assert_eq!(Grade::from_score(45.0).unwrap(), Grade::E);
        assert_eq!(Grade::from_score(44.0).unwrap(), Grade::F);
        assert_eq!(Grade::from_score(0.0).unwrap(), Grade::F);
    }

    #[test]
    fn grading_is_monotonic_over_the_whole_range() {
        let mut previous = Grade::from_score(0.0).unwrap().points();
        let mut score = 0.5;
        while score <= 100.0 {
            let points = Grade::from_score(score).unwrap().points();
            assert!(
                points >= previous,
                "points decreased between {} and {}",
                score - 0.5,
                score
            );
            previous = points;
            score += 0.5;
        }
    }

    #[test]
    fn out_of_range_scores_are_rejected_not_clamped() {
        assert_eq!(
            Grade::from_score(-0.5),
            Err(GradingError::ScoreOutOfRange(-0.5))
        );
        assert_eq!(
            Grade::from_score(100.5),
            Err(GradingError::ScoreOutOfRange(100.5))
        );
        assert_eq!(Grade::from_score(f64::NAN), Err(GradingError::ScoreNotFinite));
        assert_eq!(
            Grade::from_score(f64::INFINITY),
            Err(GradingError::ScoreNotFinite)
        );
    }

    #[test]
    fn letter_round_trip_and_defensive_fallback() {
        for grade in Grade::SCALE {
            assert_eq!(Grade::from_letter(grade.as_str()), Some(grade));
            assert_eq!(points_for_letter(grade.as_str()), grade.points());
        }
        // A symbol from the retired display-only scale must not panic and
        // must not earn points.
        assert_eq!(Grade::from_letter("B+"), None);
        assert_eq!(points_for_letter("B+"), 0.0);
    }

    #[test]
    fn empty_entry_set_is_zero() {
        assert_eq!(aggregate_gpa(&[]), "0.00");
    }

    #[test]
    fn weighted_average_with_exact_formatting() {
        // (4.0 * 3 + 3.0 * 2) / 5 = 3.6
        let gpa = aggregate_gpa(&[
            WeightedEntry {
                grade: Grade::A,
                credit_units: 3,
            },
            WeightedEntry {
                grade: Grade::B,
                credit_units: 2,
            },
        ]);
        assert_eq!(gpa, "3.60");
    }

    #[test]
    fn rounding_is_half_up() {
        // (3.5 * 1 + 3.0 * 2) / 3 = 9.5 / 3 = 3.1666... -> 3.17
        let gpa = aggregate_gpa(&[
            WeightedEntry {
                grade: Grade::AB,
                credit_units: 1,
            },
            WeightedEntry {
                grade: Grade::B,
                credit_units: 2,
            },
        ]);
        assert_eq!(gpa, "3.17");

        // (0.5 * 1 + 0.0 * 3) / 4 = 0.125, the half case rounds up -> 0.13
        let gpa = aggregate_gpa(&[
            WeightedEntry {
                grade: Grade::E,
                credit_units: 1,
            },
            WeightedEntry {
                grade: Grade::F,
                credit_units: 3,
            },
        ]);
        assert_eq!(gpa, "0.13");
    }

    #[test]
    fn gpa_stays_within_scale_bounds() {
        let all_a: Vec<WeightedEntry> = (0..8)
            .map(|_| WeightedEntry {
                grade: Grade::A,
                credit_units: 6,
            })
            .collect();
        assert_eq!(aggregate_gpa(&all_a), "4.00");

        let all_f: Vec<WeightedEntry> = (0..8)
            .map(|_| WeightedEntry {
                grade: Grade::F,
                credit_units: 6,
            })
            .collect();
        assert_eq!(aggregate_gpa(&all_f), "0.00");
    }

    #[test]
    fn degree_class_bands() {
        assert_eq!(DegreeClass::from_cgpa(4.0), DegreeClass::FirstClass);
        assert_eq!(DegreeClass::from_cgpa(3.5), DegreeClass::FirstClass);
        assert_eq!(DegreeClass::from_cgpa(3.49), DegreeClass::SecondClassUpper);
        assert_eq!(DegreeClass::from_cgpa(3.0), DegreeClass::SecondClassUpper);
        assert_eq!(DegreeClass::from_cgpa(2.5), DegreeClass::SecondClassLower);
        assert_eq!(DegreeClass::from_cgpa(1.0), DegreeClass::ThirdClass);
        assert_eq!(DegreeClass::from_cgpa(0.99), DegreeClass::Fail);
    }
}
