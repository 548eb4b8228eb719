use crate::common::Result;
use crate::errinput;
use crate::storage::tuple::Row;
use crate::types::field::Field;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// An expression, made up of nested operations and values. Values are either
/// constants or dynamic column references. Evaluates to a final value during
/// query execution, using row values for column references.
///
/// Since this is a recursive data structure, we have to box each child
/// expression, which incurs a heap allocation per expression node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expression {
    /// A constant value.
    Constant(Field),
    /// A column reference, by index into the input row.
    Column(usize),

    /// Logical AND of two booleans: a AND b.
    And(Box<Expression>, Box<Expression>),
    /// Logical OR of two booleans: a OR b.
    Or(Box<Expression>, Box<Expression>),
    /// Logical NOT of a boolean: NOT a.
    Not(Box<Expression>),

    /// Equality comparison of two values: a = b.
    Equal(Box<Expression>, Box<Expression>),
    /// Greater than comparison of two values: a > b.
    GreaterThan(Box<Expression>, Box<Expression>),
    /// Less than comparison of two values: a < b.
    LessThan(Box<Expression>, Box<Expression>),
    /// Returns true if the value is NULL: a IS NULL.
    IsNull(Box<Expression>),
    /// List membership with SQL NULL semantics: a IN (b, c, ...).
    InList(Box<Expression>, Vec<Expression>),

    /// Adds two numbers: a + b.
    Add(Box<Expression>, Box<Expression>),
    /// Divides two numbers: a / b.
    Divide(Box<Expression>, Box<Expression>),
    /// Exponentiates two numbers, i.e. a ^ b.
    Exponentiate(Box<Expression>, Box<Expression>),
    /// Returns the input value unchanged: +a.
    Identity(Box<Expression>),
    /// Multiplies two numbers: a * b.
    Multiply(Box<Expression>, Box<Expression>),
    /// Negates the given number: -a.
    Negate(Box<Expression>),
    /// The remainder after dividing two numbers: a % b.
    Remainder(Box<Expression>, Box<Expression>),
    /// Subtracts two numbers: a - b.
    Subtract(Box<Expression>, Box<Expression>),

    /// Rounds a number to the given number of decimal places: ROUND(a, b).
    Round(Box<Expression>, Box<Expression>),
    /// Returns the first non-NULL value: COALESCE(a, b, ...).
    Coalesce(Vec<Expression>),
}

impl Expression {
    /// Evaluates an expression, returning a value. Column references look up
    /// values in the given row. If None, any Column references will panic.
    pub fn evaluate(&self, row: Option<&Row>) -> Result<Field> {
        use Field::*;
        Ok(match self {
            // Constant values return themselves.
            Self::Constant(value) => value.clone(),

            // Column references look up a row value. The planner ensures that
            // only constant expressions are evaluated without a row.
            Self::Column(index) => match row {
                Some(row) => row.get_field(*index)?.clone(),
                None => return errinput!("can't reference column {index} without a row"),
            },

            // Logical AND with three-valued logic: FALSE wins over NULL.
            Self::And(lhs, rhs) => match (lhs.evaluate(row)?, rhs.evaluate(row)?) {
                (Boolean(lhs), Boolean(rhs)) => Boolean(lhs && rhs),
                (Boolean(b), Null) | (Null, Boolean(b)) if !b => Boolean(false),
                (Boolean(_), Null) | (Null, Boolean(_)) | (Null, Null) => Null,
                (lhs, rhs) => return errinput!("can't AND {lhs} and {rhs}"),
            },

            // Logical OR with three-valued logic: TRUE wins over NULL.
            Self::Or(lhs, rhs) => match (lhs.evaluate(row)?, rhs.evaluate(row)?) {
                (Boolean(lhs), Boolean(rhs)) => Boolean(lhs || rhs),
                (Boolean(b), Null) | (Null, Boolean(b)) if b => Boolean(true),
                (Boolean(_), Null) | (Null, Boolean(_)) | (Null, Null) => Null,
                (lhs, rhs) => return errinput!("can't OR {lhs} and {rhs}"),
            },

            Self::Not(expr) => match expr.evaluate(row)? {
                Boolean(b) => Boolean(!b),
                Null => Null,
                value => return errinput!("can't NOT {value}"),
            },

            // Comparisons compare numbers by value across types. NULL
            // compares as unknown.
            Self::Equal(lhs, rhs) => {
                compare(lhs.evaluate(row)?, rhs.evaluate(row)?, |o| o == Ordering::Equal)?
            }
            Self::GreaterThan(lhs, rhs) => {
                compare(lhs.evaluate(row)?, rhs.evaluate(row)?, |o| o == Ordering::Greater)?
            }
            Self::LessThan(lhs, rhs) => {
                compare(lhs.evaluate(row)?, rhs.evaluate(row)?, |o| o == Ordering::Less)?
            }

            Self::IsNull(expr) => Boolean(expr.evaluate(row)?.is_null()),

            // a IN (list) is true if any element equals a, NULL if a is NULL
            // or no element matched but some element was NULL, else false.
            Self::InList(expr, list) => {
                let value = expr.evaluate(row)?;
                if value.is_null() {
                    return Ok(Null);
                }
                let mut result = Boolean(false);
                for item in list {
                    match compare(value.clone(), item.evaluate(row)?, |o| o == Ordering::Equal)? {
                        Boolean(true) => return Ok(Boolean(true)),
                        Null => result = Null,
                        _ => {}
                    }
                }
                result
            }

            // Mathematical operations.
            Self::Add(lhs, rhs) => lhs.evaluate(row)?.checked_add(&rhs.evaluate(row)?)?,
            Self::Divide(lhs, rhs) => lhs.evaluate(row)?.checked_div(&rhs.evaluate(row)?)?,
            Self::Exponentiate(lhs, rhs) => lhs.evaluate(row)?.checked_pow(&rhs.evaluate(row)?)?,
            Self::Identity(expr) => match expr.evaluate(row)? {
                value if value.is_numeric() || value.is_null() => value,
                value => return errinput!("can't take the identity of {value}"),
            },
            Self::Multiply(lhs, rhs) => lhs.evaluate(row)?.checked_mul(&rhs.evaluate(row)?)?,
            Self::Negate(expr) => Integer(0).checked_sub(&expr.evaluate(row)?)?,
            Self::Remainder(lhs, rhs) => lhs.evaluate(row)?.checked_mod(&rhs.evaluate(row)?)?,
            Self::Subtract(lhs, rhs) => lhs.evaluate(row)?.checked_sub(&rhs.evaluate(row)?)?,

            Self::Round(expr, places) => match places.evaluate(row)? {
                Integer(places) => expr.evaluate(row)?.round(places)?,
                Null => Null,
                value => return errinput!("invalid rounding scale {value}"),
            },
            Self::Coalesce(exprs) => {
                for expr in exprs {
                    let value = expr.evaluate(row)?;
                    if !value.is_null() {
                        return Ok(value);
                    }
                }
                Null
            }
        })
    }

    /// Recursively walks the expression tree depth-first, calling the given
    /// closure until it returns false. Returns true otherwise.
    pub fn walk(&self, visitor: &mut impl FnMut(&Expression) -> bool) -> bool {
        if !visitor(self) {
            return false;
        }
        match self {
            Self::Add(lhs, rhs)
            | Self::And(lhs, rhs)
            | Self::Divide(lhs, rhs)
            | Self::Equal(lhs, rhs)
            | Self::Exponentiate(lhs, rhs)
            | Self::GreaterThan(lhs, rhs)
            | Self::LessThan(lhs, rhs)
            | Self::Multiply(lhs, rhs)
            | Self::Or(lhs, rhs)
            | Self::Remainder(lhs, rhs)
            | Self::Round(lhs, rhs)
            | Self::Subtract(lhs, rhs) => lhs.walk(visitor) && rhs.walk(visitor),

            Self::Identity(expr) | Self::IsNull(expr) | Self::Negate(expr) | Self::Not(expr) => {
                expr.walk(visitor)
            }

            Self::InList(expr, list) => expr.walk(visitor) && list.iter().all(|e| e.walk(visitor)),
            Self::Coalesce(exprs) => exprs.iter().all(|e| e.walk(visitor)),

            Self::Constant(_) | Self::Column(_) => true,
        }
    }

    /// Recursively walks the expression tree depth-first, calling the given
    /// closure until it returns true. Returns false otherwise.
    pub fn contains(&self, visitor: &impl Fn(&Expression) -> bool) -> bool {
        !self.walk(&mut |expr| !visitor(expr))
    }

    /// Returns true if the expression doesn't reference any columns.
    pub fn is_constant(&self) -> bool {
        !self.contains(&|expr| matches!(expr, Self::Column(_)))
    }

    /// Transforms the expression tree depth-first by applying a closure before
    /// and after descending.
    pub fn transform(
        mut self,
        before: &impl Fn(Self) -> Result<Self>,
        after: &impl Fn(Self) -> Result<Self>,
    ) -> Result<Self> {
        // Helper for transforming a boxed expression.
        let xform = |mut expr: Box<Expression>| -> Result<Box<Expression>> {
            *expr = expr.transform(before, after)?;
            Ok(expr)
        };
        let xform_all = |exprs: Vec<Expression>| -> Result<Vec<Expression>> {
            exprs
                .into_iter()
                .map(|expr| expr.transform(before, after))
                .collect()
        };

        self = before(self)?;
        self = match self {
            Self::Add(lhs, rhs) => Self::Add(xform(lhs)?, xform(rhs)?),
            Self::And(lhs, rhs) => Self::And(xform(lhs)?, xform(rhs)?),
            Self::Divide(lhs, rhs) => Self::Divide(xform(lhs)?, xform(rhs)?),
            Self::Equal(lhs, rhs) => Self::Equal(xform(lhs)?, xform(rhs)?),
            Self::Exponentiate(lhs, rhs) => Self::Exponentiate(xform(lhs)?, xform(rhs)?),
            Self::GreaterThan(lhs, rhs) => Self::GreaterThan(xform(lhs)?, xform(rhs)?),
            Self::LessThan(lhs, rhs) => Self::LessThan(xform(lhs)?, xform(rhs)?),
            Self::Multiply(lhs, rhs) => Self::Multiply(xform(lhs)?, xform(rhs)?),
            Self::Or(lhs, rhs) => Self::Or(xform(lhs)?, xform(rhs)?),
            Self::Remainder(lhs, rhs) => Self::Remainder(xform(lhs)?, xform(rhs)?),
            Self::Round(lhs, rhs) => Self::Round(xform(lhs)?, xform(rhs)?),
            Self::Subtract(lhs, rhs) => Self::Subtract(xform(lhs)?, xform(rhs)?),

            Self::Identity(expr) => Self::Identity(xform(expr)?),
            Self::IsNull(expr) => Self::IsNull(xform(expr)?),
            Self::Negate(expr) => Self::Negate(xform(expr)?),
            Self::Not(expr) => Self::Not(xform(expr)?),

            Self::InList(expr, list) => Self::InList(xform(expr)?, xform_all(list)?),
            Self::Coalesce(exprs) => Self::Coalesce(xform_all(exprs)?),

            expr @ (Self::Constant(_) | Self::Column(_)) => expr,
        };
        self = after(self)?;
        Ok(self)
    }

    /// Shifts column references by the given offset, e.g. when moving an
    /// expression from a join's output onto its right input.
    pub fn shift_columns(self, offset: isize) -> Result<Self> {
        self.transform(&|expr| Ok(expr), &|expr| match expr {
            Self::Column(index) => {
                let shifted = index as isize + offset;
                if shifted < 0 {
                    return errinput!("column index {index} shifted out of bounds");
                }
                Ok(Self::Column(shifted as usize))
            }
            expr => Ok(expr),
        })
    }

    /// Converts the expression into its conjunctive normal form parts, i.e.
    /// splits a AND b AND c into [a, b, c].
    pub fn into_cnf_vec(self) -> Vec<Self> {
        match self {
            Self::And(lhs, rhs) => {
                let mut cnf = lhs.into_cnf_vec();
                cnf.extend(rhs.into_cnf_vec());
                cnf
            }
            expr => vec![expr],
        }
    }

    /// Joins the expressions with AND. Returns None for an empty vector.
    pub fn and_vec(exprs: Vec<Self>) -> Option<Self> {
        exprs
            .into_iter()
            .reduce(|lhs, rhs| Self::And(Box::new(lhs), Box::new(rhs)))
    }

    /// Checks for an equijoin predicate col_a = col_b, returning the two
    /// column indexes.
    pub fn as_equijoin(&self) -> Option<(usize, usize)> {
        match self {
            Self::Equal(lhs, rhs) => match (lhs.as_ref(), rhs.as_ref()) {
                (Self::Column(l), Self::Column(r)) => Some((*l, *r)),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Compares two values with SQL semantics, returning a boolean or NULL.
fn compare(lhs: Field, rhs: Field, accept: impl Fn(Ordering) -> bool) -> Result<Field> {
    Ok(match lhs.checked_cmp(&rhs)? {
        Some(ordering) => Field::Boolean(accept(ordering)),
        None => Field::Null,
    })
}

impl From<Field> for Expression {
    fn from(value: Field) -> Self {
        Expression::Constant(value)
    }
}

impl From<Field> for Box<Expression> {
    fn from(value: Field) -> Self {
        Box::new(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: impl Into<Field>) -> Box<Expression> {
        Box::new(Expression::Constant(value.into()))
    }

    #[test]
    fn test_three_valued_logic() {
        let null = || constant(Field::Null);
        assert_eq!(
            Expression::And(constant(false), null()).evaluate(None).unwrap(),
            Field::Boolean(false)
        );
        assert_eq!(
            Expression::And(constant(true), null()).evaluate(None).unwrap(),
            Field::Null
        );
        assert_eq!(
            Expression::Or(null(), constant(true)).evaluate(None).unwrap(),
            Field::Boolean(true)
        );
        assert_eq!(Expression::Not(null()).evaluate(None).unwrap(), Field::Null);
        assert!(Expression::Not(constant(1)).evaluate(None).is_err());
    }

    #[test]
    fn test_comparisons_across_numeric_types() {
        let nine = || constant(Field::decimal("9.00").unwrap());
        assert_eq!(
            Expression::Equal(nine(), constant(9)).evaluate(None).unwrap(),
            Field::Boolean(true)
        );
        assert_eq!(
            Expression::LessThan(nine(), constant(9.5)).evaluate(None).unwrap(),
            Field::Boolean(true)
        );
        assert_eq!(
            Expression::GreaterThan(nine(), constant(Field::Null))
                .evaluate(None)
                .unwrap(),
            Field::Null
        );
    }

    #[test]
    fn test_in_list() {
        let years = || vec![Expression::from(Field::from(1998)), Field::from(2002).into()];
        let row = Row::from(vec![Field::from(2002), Field::Null]);
        assert_eq!(
            Expression::InList(Box::new(Expression::Column(0)), years())
                .evaluate(Some(&row))
                .unwrap(),
            Field::Boolean(true)
        );
        assert_eq!(
            Expression::InList(Box::new(Expression::Column(1)), years())
                .evaluate(Some(&row))
                .unwrap(),
            Field::Null
        );
        // no match, but a NULL in the list
        assert_eq!(
            Expression::InList(constant(2008), vec![Field::Null.into()])
                .evaluate(None)
                .unwrap(),
            Field::Null
        );
        assert_eq!(
            Expression::InList(constant(2008), years()).evaluate(None).unwrap(),
            Field::Boolean(false)
        );
    }

    #[test]
    fn test_round_and_coalesce() {
        let avg = Expression::Divide(constant(Field::decimal("93.2").unwrap()), constant(10));
        let round = Expression::Round(Box::new(avg), constant(2));
        assert_eq!(round.evaluate(None).unwrap().to_string(), "9.32");

        let coalesce = Expression::Coalesce(vec![Field::Null.into(), Field::from(0).into()]);
        assert_eq!(coalesce.evaluate(None).unwrap(), Field::Integer(0));
    }

    #[test]
    fn test_column_without_row() {
        assert!(Expression::Column(0).evaluate(None).is_err());
        assert!(!Expression::Column(0).is_constant());
        assert!(Expression::Add(constant(1), constant(2)).is_constant());
    }

    #[test]
    fn test_cnf_and_shift() {
        let expr = Expression::And(
            Box::new(Expression::Equal(
                Box::new(Expression::Column(0)),
                Box::new(Expression::Column(3)),
            )),
            Box::new(Expression::IsNull(Box::new(Expression::Column(4)))),
        );
        let parts = expr.into_cnf_vec();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].as_equijoin(), Some((0, 3)));
        assert_eq!(
            parts[1].clone().shift_columns(-3).unwrap(),
            Expression::IsNull(Box::new(Expression::Column(1)))
        );
        assert!(parts[1].clone().shift_columns(-5).is_err());
    }
}
