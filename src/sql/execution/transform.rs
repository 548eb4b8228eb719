use crate::common::Result;
use crate::errinput;
use crate::sql::planner::{Direction, Expression};
use crate::storage::tuple::{Row, Rows};
use crate::types::field::Field;
use itertools::{izip, Itertools as _};

/// Filters the input rows (i.e. WHERE and HAVING). Rows where the predicate is
/// false or NULL are dropped.
pub fn filter(source: Rows, predicate: Expression) -> Rows {
    Box::new(source.filter_map(move |result| {
        result
            .and_then(|row| match predicate.evaluate(Some(&row))? {
                Field::Boolean(true) => Ok(Some(row)),
                Field::Boolean(false) | Field::Null => Ok(None),
                value => errinput!("filter returned {value}, expected boolean"),
            })
            .transpose()
    }))
}

/// Limits the result to the given number of rows (i.e. LIMIT).
pub fn limit(source: Rows, limit: usize) -> Rows {
    Box::new(source.take(limit))
}

/// Skips the given number of rows (i.e. OFFSET).
pub fn offset(source: Rows, offset: usize) -> Rows {
    Box::new(source.skip(offset))
}

/// Sorts the rows (i.e. ORDER BY). The sort is stable, so rows with equal
/// sort keys keep their input order.
pub fn order(source: Rows, order: Vec<(Expression, Direction)>) -> Result<Rows> {
    // We can't use sort_by_cached_key(), since expression evaluation is
    // fallible, and since we may have to vary the sort direction of each
    // expression. Precompute the sort values instead, and map them based on
    // the row index.
    let mut irows: Vec<(usize, Row)> = source.enumerate().map(|(i, r)| r.map(|row| (i, row))).try_collect()?;
    let mut sort_values = Vec::with_capacity(irows.len());
    for (_, row) in &irows {
        let values: Vec<Field> = order.iter().map(|(e, _)| e.evaluate(Some(row))).try_collect()?;
        sort_values.push(values)
    }

    irows.sort_by(|&(a, _), &(b, _)| {
        let dirs = order.iter().map(|(_, dir)| dir);
        for (a, b, dir) in izip!(&sort_values[a], &sort_values[b], dirs) {
            match order_cmp(a, b) {
                std::cmp::Ordering::Equal => {}
                order if *dir == Direction::Descending => return order.reverse(),
                order => return order,
            }
        }
        std::cmp::Ordering::Equal
    });

    Ok(Box::new(irows.into_iter().map(|(_, row)| Ok(row))))
}

/// Compares sort values, with NULL after every other value. NULLs therefore
/// come last when ascending and first when descending.
fn order_cmp(a: &Field, b: &Field) -> std::cmp::Ordering {
    use std::cmp::Ordering::*;
    match (a, b) {
        (Field::Null, Field::Null) => Equal,
        (Field::Null, _) => Greater,
        (_, Field::Null) => Less,
        (a, b) => a.cmp(b),
    }
}

/// Projects the rows using the given expressions (i.e. SELECT).
pub fn project(source: Rows, expressions: Vec<Expression>) -> Rows {
    Box::new(source.map(move |result| {
        result.and_then(|row| {
            expressions
                .iter()
                .map(|expr| expr.evaluate(Some(&row)))
                .collect::<Result<Vec<_>>>()
                .map(Row::from)
        })
    }))
}

/// Remaps source columns to target column indexes, or drops them if None.
pub fn remap(source: Rows, targets: Vec<Option<usize>>) -> Rows {
    let size = targets
        .iter()
        .filter_map(|v| *v)
        .map(|i| i + 1)
        .max()
        .unwrap_or(0);
    Box::new(source.map_ok(move |row| {
        let mut out = vec![Field::Null; size];
        for (value, target) in row.into_iter().zip(&targets) {
            if let Some(index) = target {
                out[*index] = value;
            }
        }
        Row::from(out)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::execution::test_util::{collect, rows};

    #[test]
    fn test_order_is_stable() {
        let source = rows(vec![
            vec![Field::Integer(2000), "b".into()],
            vec![Field::Integer(1998), "a".into()],
            vec![Field::Integer(2000), "c".into()],
            vec![Field::Null, "d".into()],
        ]);
        let key = vec![(Expression::Column(0), Direction::Descending)];
        let sorted = collect(order(source, key).unwrap());
        let names: Vec<_> = sorted.iter().map(|row| row[1].clone()).collect();
        // ties keep input order, NULL sorts first when descending
        assert_eq!(names, vec!["d".into(), "b".into(), "c".into(), "a".into()]);
    }

    #[test]
    fn test_order_nulls_last_ascending() {
        let source = rows(vec![
            vec![Field::Null, "a".into()],
            vec![Field::decimal("9.80").unwrap(), "b".into()],
            vec![Field::Integer(9), "c".into()],
        ]);
        let key = vec![(Expression::Column(0), Direction::Ascending)];
        let sorted = collect(order(source, key).unwrap());
        let names: Vec<_> = sorted.iter().map(|row| row[1].clone()).collect();
        assert_eq!(names, vec!["c".into(), "b".into(), "a".into()]);
    }

    #[test]
    fn test_filter_drops_null() {
        let source = rows(vec![
            vec![Field::Integer(1)],
            vec![Field::Null],
            vec![Field::Integer(3)],
        ]);
        let predicate = Expression::GreaterThan(
            Box::new(Expression::Column(0)),
            Field::Integer(1).into(),
        );
        assert_eq!(collect(filter(source, predicate)), vec![vec![Field::Integer(3)]]);

        let source = rows(vec![vec![Field::Integer(1)]]);
        let mut rows = filter(source, Expression::Column(0));
        assert!(rows.next().unwrap().is_err());
    }

    #[test]
    fn test_limit_offset_remap() {
        let source = rows((0..5).map(|i| vec![Field::Integer(i), Field::Integer(i * 10)]).collect());
        let source = limit(offset(source, 1), 2);
        let source = remap(source, vec![Some(0), None]);
        assert_eq!(
            collect(source),
            vec![vec![Field::Integer(1)], vec![Field::Integer(2)]]
        );
    }
}
