use crate::sql::engine::ResultSet;
use crate::types::field::Field;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// How the column names of a result are checked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColumnCheck {
    /// The names must match exactly, in order.
    Ordered(Vec<String>),
    /// The names must match as a set.
    Unordered(Vec<String>),
}

/// The assertions made about a single query result. They are checked in
/// order: shape, column names, then each cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expectation {
    /// (rows, columns)
    pub shape: (usize, usize),
    pub columns: ColumnCheck,
    /// Literal values addressed by (row offset, column name).
    pub cells: Vec<(usize, String, Field)>,
}

impl Expectation {
    /// Expects the given shape and ordered column names.
    pub fn new(rows: usize, columns: &[&str]) -> Self {
        Self {
            shape: (rows, columns.len()),
            columns: ColumnCheck::Ordered(columns.iter().map(|c| c.to_string()).collect()),
            cells: Vec::new(),
        }
    }

    /// Expects the given shape and column names, in any order.
    pub fn unordered(rows: usize, columns: &[&str]) -> Self {
        Self {
            columns: ColumnCheck::Unordered(columns.iter().map(|c| c.to_string()).collect()),
            ..Self::new(rows, columns)
        }
    }

    /// Adds a literal cell assertion.
    pub fn cell(mut self, row: usize, column: &str, value: impl Into<Field>) -> Self {
        self.cells.push((row, column.to_string(), value.into()));
        self
    }

    /// Checks a result against the expectation, returning the first violation.
    pub fn check(&self, result: &ResultSet) -> Result<(), Violation> {
        if result.shape() != self.shape {
            return Err(Violation::Shape {
                expected: self.shape,
                actual: result.shape(),
            });
        }

        let actual: Vec<String> = result.column_names().into_iter().map(String::from).collect();
        let matches = match &self.columns {
            ColumnCheck::Ordered(expected) => *expected == actual,
            ColumnCheck::Unordered(expected) => {
                expected.iter().collect::<BTreeSet<_>>() == actual.iter().collect::<BTreeSet<_>>()
            }
        };
        if !matches {
            let (ColumnCheck::Ordered(expected) | ColumnCheck::Unordered(expected)) = &self.columns;
            return Err(Violation::Columns {
                expected: expected.clone(),
                actual,
            });
        }

        for (row, column, expected) in &self.cells {
            let Some(index) = result.column_index(column) else {
                return Err(Violation::MissingColumn {
                    column: column.clone(),
                });
            };
            let Some(actual) = result.rows.get(*row).and_then(|r| r.get_field(index).ok()) else {
                return Err(Violation::RowOutOfRange {
                    row: *row,
                    rows: result.rows.len(),
                });
            };
            if !same_value(expected, actual) {
                return Err(Violation::Cell {
                    row: *row,
                    column: column.clone(),
                    expected: expected.clone(),
                    actual: actual.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Compares cells by value. Numbers compare across integer, float and
/// decimal, so 9.8 equals 9.80 and 10 equals 10.0.
fn same_value(expected: &Field, actual: &Field) -> bool {
    if expected.is_numeric() && actual.is_numeric() {
        return matches!(expected.checked_cmp(actual), Ok(Some(Ordering::Equal)));
    }
    expected == actual
}

/// A failed assertion about a query result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Violation {
    /// The (rows, columns) shape differs.
    Shape {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// The column names differ.
    Columns {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    /// A cell assertion names a column the result doesn't have.
    MissingColumn { column: String },
    /// A cell assertion addresses a row past the end of the result.
    RowOutOfRange { row: usize, rows: usize },
    /// A cell holds the wrong value.
    Cell {
        row: usize,
        column: String,
        expected: Field,
        actual: Field,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape { expected, actual } => {
                write!(f, "expected shape {expected:?}, got {actual:?}")
            }
            Self::Columns { expected, actual } => write!(
                f,
                "expected columns [{}], got [{}]",
                expected.iter().join(", "),
                actual.iter().join(", ")
            ),
            Self::MissingColumn { column } => write!(f, "no column named {column}"),
            Self::RowOutOfRange { row, rows } => {
                write!(f, "row {row} is out of range, result has {rows} rows")
            }
            Self::Cell {
                row,
                column,
                expected,
                actual,
            } => write!(f, "expected {column} = {expected} at row {row}, got {actual}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::field::Label;
    use rust_decimal::Decimal;

    fn result() -> ResultSet {
        ResultSet {
            columns: vec![
                Label::Qualified("g".into(), "year".into()),
                Label::Unqualified("num_games".into()),
                Label::Unqualified("avg_critic_score".into()),
            ],
            rows: vec![
                vec![Field::Integer(1998), Field::Integer(10), Field::decimal("9.32").unwrap()].into(),
                vec![Field::Integer(2004), Field::Integer(6), Field::decimal("9.15").unwrap()].into(),
            ],
        }
    }

    #[test]
    fn test_check_passes() {
        let expectation = Expectation::unordered(2, &["avg_critic_score", "year", "num_games"])
            .cell(0, "year", 1998)
            .cell(0, "num_games", 10)
            .cell(0, "avg_critic_score", Decimal::new(932, 2))
            .cell(1, "avg_critic_score", Field::decimal("9.150").unwrap())
            .cell(1, "num_games", 6.0);
        assert_eq!(expectation.check(&result()), Ok(()));

        let expectation =
            Expectation::new(2, &["year", "num_games", "avg_critic_score"]).cell(1, "year", 2004);
        assert_eq!(expectation.check(&result()), Ok(()));
    }

    #[test]
    fn test_check_violations() {
        let columns = ["year", "num_games", "avg_critic_score"];
        assert_eq!(
            Expectation::new(10, &columns).check(&result()),
            Err(Violation::Shape {
                expected: (10, 3),
                actual: (2, 3)
            })
        );

        let reordered = ["num_games", "year", "avg_critic_score"];
        let violation = Expectation::new(2, &reordered).check(&result()).unwrap_err();
        assert!(matches!(violation, Violation::Columns { .. }));
        assert_eq!(
            violation.to_string(),
            "expected columns [num_games, year, avg_critic_score], got [year, num_games, avg_critic_score]"
        );

        assert_eq!(
            Expectation::new(2, &columns)
                .cell(0, "total", 1)
                .check(&result()),
            Err(Violation::MissingColumn {
                column: "total".into()
            })
        );
        assert_eq!(
            Expectation::new(2, &columns)
                .cell(5, "year", 1982)
                .check(&result()),
            Err(Violation::RowOutOfRange { row: 5, rows: 2 })
        );

        // the first failing cell halts the check
        let violation = Expectation::new(2, &columns)
            .cell(0, "avg_critic_score", Decimal::new(933, 2))
            .cell(5, "year", 1982)
            .check(&result())
            .unwrap_err();
        assert_eq!(
            violation.to_string(),
            "expected avg_critic_score = 9.33 at row 0, got 9.32"
        );
    }

    #[test]
    fn test_non_numeric_cells() {
        let result = ResultSet {
            columns: vec![Label::Unqualified("game".into())],
            rows: vec![vec![Field::from("Wii Sports")].into(), vec![Field::Null].into()],
        };
        let expectation = Expectation::new(2, &["game"])
            .cell(0, "game", "Wii Sports")
            .cell(1, "game", Field::Null);
        assert_eq!(expectation.check(&result), Ok(()));
        assert!(Expectation::new(2, &["game"])
            .cell(1, "game", 0)
            .check(&result)
            .is_err());
    }
}
