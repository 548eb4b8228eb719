use crate::common::Result;
use crate::sql::parser::ast::SetOperator;
use crate::storage::tuple::{Row, Rows};
use itertools::Itertools as _;
use std::collections::{HashMap, HashSet};

/// Combines two row sources with a set operation (i.e. UNION, INTERSECT,
/// EXCEPT). Without `all`, duplicate rows are removed. Rows are emitted in
/// the order they first appear in the left source, followed by the right
/// source for UNION.
pub fn set_operation(left: Rows, right: Rows, operator: SetOperator, all: bool) -> Result<Rows> {
    let left: Vec<Row> = left.try_collect()?;
    let right: Vec<Row> = right.try_collect()?;
    let mut seen = HashSet::new();
    let mut distinct = |row: &Row| all || seen.insert(row.clone());

    let rows: Vec<Row> = match operator {
        SetOperator::Union => left.into_iter().chain(right).filter(|row| distinct(row)).collect(),
        SetOperator::Except if all => {
            let mut counts = counts(right);
            left.into_iter()
                .filter(|row| !take(&mut counts, row))
                .collect()
        }
        SetOperator::Except => {
            let right: HashSet<Row> = right.into_iter().collect();
            left.into_iter()
                .filter(|row| !right.contains(row) && distinct(row))
                .collect()
        }
        SetOperator::Intersect if all => {
            let mut counts = counts(right);
            left.into_iter().filter(|row| take(&mut counts, row)).collect()
        }
        SetOperator::Intersect => {
            let right: HashSet<Row> = right.into_iter().collect();
            left.into_iter()
                .filter(|row| right.contains(row) && distinct(row))
                .collect()
        }
    };
    Ok(Box::new(rows.into_iter().map(Ok)))
}

/// Counts the occurrences of each row.
fn counts(rows: Vec<Row>) -> HashMap<Row, usize> {
    let mut counts = HashMap::new();
    for row in rows {
        *counts.entry(row).or_insert(0) += 1;
    }
    counts
}

/// Takes one occurrence of a row from the counts, returning false if there
/// are none left.
fn take(counts: &mut HashMap<Row, usize>, row: &Row) -> bool {
    match counts.get_mut(row) {
        Some(count) if *count > 0 => {
            *count -= 1;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::execution::test_util::{collect, rows};
    use crate::types::field::Field;

    fn years(years: &[i64]) -> Rows {
        rows(years.iter().map(|y| vec![Field::Integer(*y)]).collect())
    }

    fn run(operator: SetOperator, all: bool) -> Vec<i64> {
        let left = years(&[2008, 1990, 2008, 1998, 1992]);
        let right = years(&[1998, 2008, 2020]);
        collect(set_operation(left, right, operator, all).unwrap())
            .into_iter()
            .map(|row| match row[0] {
                Field::Integer(y) => y,
                _ => panic!("unexpected value"),
            })
            .collect()
    }

    #[test]
    fn test_except() {
        assert_eq!(run(SetOperator::Except, false), vec![1990, 1992]);
        assert_eq!(run(SetOperator::Except, true), vec![1990, 2008, 1992]);
    }

    #[test]
    fn test_intersect() {
        assert_eq!(run(SetOperator::Intersect, false), vec![2008, 1998]);
        assert_eq!(run(SetOperator::Intersect, true), vec![2008, 1998]);
    }

    #[test]
    fn test_union() {
        assert_eq!(run(SetOperator::Union, false), vec![2008, 1990, 1998, 1992, 2020]);
        assert_eq!(run(SetOperator::Union, true).len(), 8);
    }
}
