use crate::common::Result;
use crate::sql::planner::{Aggregate, Expression};
use crate::storage::tuple::{Row, Rows};
use crate::types::field::Field;
use itertools::Itertools as _;
use std::collections::BTreeMap;

/// Aggregates row values from the source according to the aggregates, using the
/// group_by expressions as buckets. Emits rows with group_by buckets then
/// aggregates in the given order, with buckets in ascending order.
pub fn aggregate(
    source: Rows,
    group_by: Vec<Expression>,
    aggregates: Vec<Aggregate>,
) -> Result<Rows> {
    let mut aggregator = Aggregator::new(group_by, aggregates);
    for row in source {
        aggregator.add(row?)?;
    }
    aggregator.into_rows()
}

/// Computes bucketed aggregates for rows.
struct Aggregator {
    /// Bucketed accumulators (by group_by values).
    buckets: BTreeMap<Vec<Field>, Vec<Accumulator>>,
    /// The set of empty accumulators. Used to create new buckets.
    empty: Vec<Accumulator>,
    /// Group by expressions. Indexes map to bucket values.
    group_by: Vec<Expression>,
    /// Expressions to accumulate. Indexes map to accumulators.
    expressions: Vec<Expression>,
}

impl Aggregator {
    /// Creates a new aggregator for the given GROUP BY buckets and aggregates.
    fn new(group_by: Vec<Expression>, aggregates: Vec<Aggregate>) -> Self {
        use Aggregate::*;
        let accumulators = aggregates.iter().map(Accumulator::new).collect();
        let expressions = aggregates
            .into_iter()
            .map(|aggregate| match aggregate {
                Average(expr) | Count(expr) | Max(expr) | Min(expr) | Sum(expr) => expr,
            })
            .collect();
        Self {
            buckets: BTreeMap::new(),
            empty: accumulators,
            group_by,
            expressions,
        }
    }

    /// Adds a row to the aggregator.
    fn add(&mut self, row: Row) -> Result<()> {
        let bucket: Vec<Field> = self
            .group_by
            .iter()
            .map(|expr| expr.evaluate(Some(&row)))
            .try_collect()?;
        let accumulators = self
            .buckets
            .entry(bucket)
            .or_insert_with(|| self.empty.clone());
        for (accumulator, expr) in accumulators.iter_mut().zip(&self.expressions) {
            accumulator.add(expr.evaluate(Some(&row))?)?;
        }
        Ok(())
    }

    /// Returns a row iterator over the aggregate result.
    fn into_rows(self) -> Result<Rows> {
        // If there were no rows and no group_by expressions, return a row of
        // empty accumulators, e.g. SELECT COUNT(*) FROM t WHERE FALSE
        if self.buckets.is_empty() && self.group_by.is_empty() {
            let result: Row = self
                .empty
                .into_iter()
                .map(Accumulator::value)
                .collect::<Result<Vec<_>>>()?
                .into();
            return Ok(Box::new(std::iter::once(Ok(result))));
        }

        // Emit the group_by and aggregate values for each bucket. We use an
        // intermediate vec since btree_map::IntoIter doesn't implement Clone
        // (required by Rows).
        let rows: Vec<Row> = self
            .buckets
            .into_iter()
            .map(|(bucket, accumulators)| {
                bucket
                    .into_iter()
                    .map(Ok)
                    .chain(accumulators.into_iter().map(Accumulator::value))
                    .collect::<Result<Vec<_>>>()
                    .map(Row::from)
            })
            .try_collect()?;
        Ok(Box::new(rows.into_iter().map(Ok)))
    }
}

/// Accumulates aggregate values. Uses an enum rather than a trait since we need
/// to keep these in a vector (could use boxed trait objects too). NULL inputs
/// are skipped by all accumulators.
#[derive(Clone)]
enum Accumulator {
    Average { count: i64, sum: Option<Field> },
    Count(i64),
    Max(Option<Field>),
    Min(Option<Field>),
    Sum(Option<Field>),
}

impl Accumulator {
    /// Creates a new accumulator from an aggregate kind.
    fn new(aggregate: &Aggregate) -> Self {
        match aggregate {
            Aggregate::Average(_) => Self::Average { count: 0, sum: None },
            Aggregate::Count(_) => Self::Count(0),
            Aggregate::Max(_) => Self::Max(None),
            Aggregate::Min(_) => Self::Min(None),
            Aggregate::Sum(_) => Self::Sum(None),
        }
    }

    /// Adds a value to the accumulator.
    fn add(&mut self, value: Field) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        match self {
            Self::Average { count, sum } => {
                *count += 1;
                *sum = Some(add(sum.take(), value)?);
            }
            Self::Count(count) => *count += 1,
            Self::Max(max @ None) => *max = Some(value),
            Self::Max(Some(max)) => {
                if value > *max {
                    *max = value
                }
            }
            Self::Min(min @ None) => *min = Some(value),
            Self::Min(Some(min)) => {
                if value < *min {
                    *min = value
                }
            }
            Self::Sum(sum) => *sum = Some(add(sum.take(), value)?),
        }
        Ok(())
    }

    /// Returns the aggregate value. Aggregates over no (non-NULL) values are
    /// NULL, except COUNT which is 0.
    fn value(self) -> Result<Field> {
        Ok(match self {
            Self::Average { count: 0, .. } => Field::Null,
            Self::Average { count, sum } => match sum {
                Some(sum) => average(sum, count)?,
                None => Field::Null,
            },
            Self::Count(count) => Field::Integer(count),
            Self::Max(value) | Self::Min(value) | Self::Sum(value) => value.unwrap_or(Field::Null),
        })
    }
}

/// Adds a value to a running sum.
fn add(sum: Option<Field>, value: Field) -> Result<Field> {
    match sum {
        Some(sum) => sum.checked_add(&value),
        None => Ok(value),
    }
}

/// Divides a sum by a count. Integer and decimal averages are exact decimals,
/// float averages are floats.
fn average(sum: Field, count: i64) -> Result<Field> {
    match sum {
        Field::Integer(i) => Field::Decimal(i.into()).checked_div(&Field::Integer(count)),
        sum => sum.checked_div(&Field::Integer(count)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::execution::test_util::{collect, rows};

    fn dec(s: &str) -> Field {
        Field::decimal(s).unwrap()
    }

    fn scores() -> Rows {
        rows(vec![
            vec![Field::Integer(2002), dec("9.0")],
            vec![Field::Integer(1998), dec("9.5")],
            vec![Field::Integer(2002), Field::Null],
            vec![Field::Integer(2002), dec("8.0")],
        ])
    }

    fn all(expr: Expression) -> Vec<Aggregate> {
        vec![
            Aggregate::Average(expr.clone()),
            Aggregate::Count(expr.clone()),
            Aggregate::Max(expr.clone()),
            Aggregate::Min(expr.clone()),
            Aggregate::Sum(expr),
        ]
    }

    #[test]
    fn test_grouped_aggregates_skip_nulls() {
        let result = collect(
            aggregate(scores(), vec![Expression::Column(0)], all(Expression::Column(1))).unwrap(),
        );
        assert_eq!(
            result,
            vec![
                vec![Field::Integer(1998), dec("9.5"), Field::Integer(1), dec("9.5"), dec("9.5"), dec("9.5")],
                vec![Field::Integer(2002), dec("8.5"), Field::Integer(2), dec("9.0"), dec("8.0"), dec("17.0")],
            ]
        );
    }

    #[test]
    fn test_count_star_counts_nulls() {
        let count = vec![Aggregate::Count(Expression::Constant(Field::Boolean(true)))];
        let result = collect(aggregate(scores(), vec![], count).unwrap());
        assert_eq!(result, vec![vec![Field::Integer(4)]]);
    }

    #[test]
    fn test_empty_input() {
        // without GROUP BY, a single row of empty aggregates
        let result = collect(aggregate(rows(vec![]), vec![], all(Expression::Column(0))).unwrap());
        assert_eq!(
            result,
            vec![vec![Field::Null, Field::Integer(0), Field::Null, Field::Null, Field::Null]]
        );
        // with GROUP BY, no rows
        let result = aggregate(rows(vec![]), vec![Expression::Column(0)], vec![]).unwrap();
        assert_eq!(collect(result).len(), 0);
    }

    #[test]
    fn test_integer_average_is_exact() {
        let source = rows(vec![vec![Field::Integer(1)], vec![Field::Integer(2)]]);
        let avg = vec![Aggregate::Average(Expression::Column(0))];
        assert_eq!(collect(aggregate(source, vec![], avg).unwrap()), vec![vec![dec("1.5")]]);
    }
}
