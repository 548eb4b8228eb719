use crate::common::Result;
use crate::sql::planner::Expression;
use crate::storage::tuple::{Row, Rows};
use crate::types::field::Field;
use std::collections::HashMap;
use std::iter::Peekable;

/// A nested loop join. Iterates over the right source for every row in the left
/// source, optionally filtering on the join predicate. If outer is true, and
/// there are no matches in the right source for a row in the left source, a
/// joined row with NULL values for the right source is returned (typically used
/// for a LEFT JOIN).
pub fn nested_loop(
    left: Rows,
    right: Rows,
    right_size: usize,
    predicate: Option<Expression>,
    outer: bool,
) -> Rows {
    Box::new(NestedLoopIterator::new(left, right, right_size, predicate, outer))
}

/// NestedLoopIterator implements nested loop joins.
///
/// This could be trivially implemented with cartesian_product(), but we need
/// to handle the left outer join case where there is no match in the right
/// source.
#[derive(Clone)]
struct NestedLoopIterator {
    /// The left source.
    left: Peekable<Rows>,
    /// The right source.
    right: Rows,
    /// The initial right iterator state. Cloned to reset right.
    right_init: Rows,
    /// The column width of the right source.
    right_size: usize,
    /// True if a right match has been seen for the current left row.
    right_match: bool,
    /// The join predicate.
    predicate: Option<Expression>,
    /// If true, emit a row when there is no match in the right source.
    outer: bool,
}

impl NestedLoopIterator {
    fn new(
        left: Rows,
        right: Rows,
        right_size: usize,
        predicate: Option<Expression>,
        outer: bool,
    ) -> Self {
        let left = left.peekable();
        let right_init = right.clone();
        Self {
            left,
            right,
            right_init,
            right_size,
            right_match: false,
            predicate,
            outer,
        }
    }

    /// Returns the next joined row, if any.
    ///
    /// While there is a valid left row, look for a right-hand match to return.
    /// If there was no match for that row but this is an outer join, emit a row
    /// with right NULLs.
    fn try_next(&mut self) -> Result<Option<Row>> {
        while let Some(left) = self.left.peek() {
            let left = left.clone()?;

            while let Some(right) = self.right.next() {
                let mut row = left.clone();
                row.extend(right?);
                let matched = match &self.predicate {
                    Some(predicate) => predicate.evaluate(Some(&row))? == Field::Boolean(true),
                    None => true,
                };
                if matched {
                    self.right_match = true;
                    return Ok(Some(row));
                }
            }

            // The right source is exhausted for this left row. Move on to the
            // next one, emitting a NULL-padded row first if nothing matched.
            let unmatched = self.outer && !self.right_match;
            self.left.next();
            self.right = self.right_init.clone();
            self.right_match = false;
            if unmatched {
                let mut row = left;
                row.extend(std::iter::repeat(Field::Null).take(self.right_size));
                return Ok(Some(row));
            }
        }
        Ok(None)
    }
}

impl Iterator for NestedLoopIterator {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next().transpose()
    }
}

/// Executes a hash join. This builds a hash table of rows from the right source
/// keyed on the join value, then iterates over the left source and looks up
/// matching rows in the hash table. If outer is true, and there is no match
/// in the right source for a row in the left source, a row with NULL values
/// for the right source is emitted instead. Output follows the left row order,
/// with matches in right source order.
pub fn hash(
    left: Rows,
    left_column: usize,
    right: Rows,
    right_column: usize,
    right_size: usize,
    outer: bool,
) -> Result<Rows> {
    // Build the hash table from the right source.
    let mut table: HashMap<Field, Vec<Row>> = HashMap::new();
    for row in right {
        let row = row?;
        let key = row.get_field(right_column)?.clone();
        if key.is_undefined() {
            continue; // NULL and NaN equality is never true
        }
        table.entry(join_key(key)).or_default().push(row);
    }

    let join = left.flat_map(move |result| -> Vec<Result<Row>> {
        let left = match result {
            Ok(left) => left,
            Err(err) => return vec![Err(err)],
        };
        let key = match left.get_field(left_column) {
            Ok(key) => join_key(key.clone()),
            Err(err) => return vec![Err(err)],
        };
        match table.get(&key) {
            Some(matches) => matches
                .iter()
                .map(|right| {
                    let mut row = left.clone();
                    row.extend(right.iter().cloned());
                    Ok(row)
                })
                .collect(),
            None if outer => {
                let mut row = left;
                row.extend(std::iter::repeat(Field::Null).take(right_size));
                vec![Ok(row)]
            }
            None => Vec::new(),
        }
    });
    Ok(Box::new(join))
}

/// Normalizes a join key so that integers match equal decimals, as they do
/// under SQL equality.
fn join_key(key: Field) -> Field {
    match key {
        Field::Integer(i) => Field::Decimal(i.into()),
        key => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::execution::test_util::{collect, rows};

    fn games() -> Rows {
        rows(vec![
            vec!["Tetris".into(), Field::Integer(1989)],
            vec!["Doom".into(), Field::Integer(1993)],
            vec![Field::Null, Field::Integer(2000)],
            vec!["Myst".into(), Field::Integer(1993)],
        ])
    }

    fn reviews() -> Rows {
        rows(vec![
            vec!["Myst".into(), Field::decimal("8.5").unwrap()],
            vec!["Tetris".into(), Field::decimal("9.0").unwrap()],
            vec![Field::Null, Field::decimal("1.0").unwrap()],
            vec!["Myst".into(), Field::decimal("7.5").unwrap()],
        ])
    }

    fn equal(l: usize, r: usize) -> Expression {
        Expression::Equal(Box::new(Expression::Column(l)), Box::new(Expression::Column(r)))
    }

    #[test]
    fn test_left_outer_joins_agree() {
        let nested = collect(nested_loop(games(), reviews(), 2, Some(equal(0, 2)), true));
        let hashed = collect(hash(games(), 0, reviews(), 0, 2, true).unwrap());
        assert_eq!(nested, hashed);

        let tetris = Field::from("Tetris");
        let myst = Field::from("Myst");
        assert_eq!(
            nested,
            vec![
                vec![tetris.clone(), Field::Integer(1989), tetris, Field::decimal("9.0").unwrap()],
                vec!["Doom".into(), Field::Integer(1993), Field::Null, Field::Null],
                vec![Field::Null, Field::Integer(2000), Field::Null, Field::Null],
                vec![myst.clone(), Field::Integer(1993), myst.clone(), Field::decimal("8.5").unwrap()],
                vec![myst.clone(), Field::Integer(1993), myst, Field::decimal("7.5").unwrap()],
            ]
        );
    }

    #[test]
    fn test_inner_joins() {
        let nested = collect(nested_loop(games(), reviews(), 2, Some(equal(0, 2)), false));
        let hashed = collect(hash(games(), 0, reviews(), 0, 2, false).unwrap());
        assert_eq!(nested, hashed);
        assert_eq!(nested.len(), 3);

        // a cross join emits every pair
        assert_eq!(collect(nested_loop(games(), reviews(), 2, None, false)).len(), 16);
    }

    #[test]
    fn test_hash_join_matches_integer_and_decimal() {
        let left = rows(vec![vec![Field::Integer(2)]]);
        let right = rows(vec![vec![Field::decimal("2.0").unwrap()]]);
        assert_eq!(collect(hash(left, 0, right, 0, 1, false).unwrap()).len(), 1);
    }
}
