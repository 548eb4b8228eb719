use crate::common::{Error, Result};
use crate::errinput;
use crate::types::DataType;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Rem, Sub};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Field {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
}

impl PartialEq for Field {
    fn eq(&self, other: &Field) -> bool {
        match (self, other) {
            (Field::Null, Field::Null) => true,
            (Field::Boolean(b), Field::Boolean(b2)) => b == b2,
            (Field::Integer(i), Field::Integer(i2)) => i == i2,
            // match on NaN as well as equality
            (Field::Float(f), Field::Float(f2)) => (f == f2) || (f.is_nan() && f2.is_nan()),
            // decimals compare by value, so 9.8 == 9.80
            (Field::Decimal(d), Field::Decimal(d2)) => d == d2,
            (Field::String(s), Field::String(s2)) => s == s2,
            _ => false,
        }
    }
}

impl Eq for Field {} // implement Eq trait for Field, uses PartialEq

impl std::hash::Hash for Field {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Field::Null => {}
            Field::Boolean(b) => b.hash(state),
            Field::Integer(i) => i.hash(state),
            Field::Float(f) => {
                if f.is_nan() {
                    0.hash(state);
                } else {
                    f.to_bits().hash(state);
                }
            }
            // Decimal hashes its normalized value.
            Field::Decimal(d) => d.hash(state),
            Field::String(s) => s.hash(state),
        }
    }
}

// for use in sorting and grouping
impl Ord for Field {
    fn cmp(&self, other: &Self) -> Ordering {
        use Field::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Less,
            (_, Null) => Ordering::Greater,
            (Boolean(b), Boolean(b2)) => b.cmp(b2),
            (String(s), String(s2)) => s.cmp(s2),
            (Integer(i), Integer(i2)) => i.cmp(i2),
            (Decimal(d), Decimal(d2)) => d.cmp(d2),
            (Float(f), Float(f2)) => float_cmp(*f, *f2),
            // Mixed numerics order by value. Ties fall back to the variant
            // rank, so that Ordering::Equal agrees with Eq.
            (Integer(_) | Float(_) | Decimal(_), Integer(_) | Float(_) | Decimal(_)) => {
                numeric_cmp(self, other).then_with(|| self.rank().cmp(&other.rank()))
            }
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl PartialOrd for Field {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Total order on floats, with NaN greater than everything else.
fn float_cmp(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Compares two numeric fields by value. Non-numeric fields compare equal.
fn numeric_cmp(a: &Field, b: &Field) -> Ordering {
    use Field::*;
    match (a, b) {
        (Integer(i), Integer(i2)) => i.cmp(i2),
        (Decimal(d), Decimal(d2)) => d.cmp(d2),
        (Integer(i), Decimal(d)) => rust_decimal::Decimal::from(*i).cmp(d),
        (Decimal(d), Integer(i)) => d.cmp(&rust_decimal::Decimal::from(*i)),
        (Float(_), _) | (_, Float(_)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => float_cmp(x, y),
            _ => Ordering::Equal,
        },
        _ => Ordering::Equal,
    }
}

impl Add for Field {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.checked_add(&other).unwrap_or(Field::Null)
    }
}

impl Sub for Field {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.checked_sub(&other).unwrap_or(Field::Null)
    }
}

impl Mul for Field {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        self.checked_mul(&other).unwrap_or(Field::Null)
    }
}

impl Div for Field {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        self.checked_div(&other).unwrap_or(Field::Null)
    }
}

impl Rem for Field {
    type Output = Self;

    fn rem(self, other: Self) -> Self {
        self.checked_mod(&other).unwrap_or(Field::Null)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Boolean(true) => f.write_str("TRUE"),
            Self::Boolean(false) => f.write_str("FALSE"),
            Self::Integer(integer) => integer.fmt(f),
            Self::Float(float) => write!(f, "{float:?}"),
            Self::Decimal(decimal) => decimal.fmt(f),
            Self::String(string) => write!(f, "'{}'", string.escape_debug()),
        }
    }
}

impl From<f64> for Field {
    fn from(v: f64) -> Self {
        Field::Float(v)
    }
}

impl From<i64> for Field {
    fn from(v: i64) -> Self {
        Field::Integer(v)
    }
}

impl From<i32> for Field {
    fn from(v: i32) -> Self {
        Field::Integer(v as i64)
    }
}

impl From<Decimal> for Field {
    fn from(v: Decimal) -> Self {
        Field::Decimal(v)
    }
}

impl From<String> for Field {
    fn from(v: String) -> Self {
        Field::String(v)
    }
}

impl From<&str> for Field {
    fn from(v: &str) -> Self {
        Field::String(v.to_owned())
    }
}

impl From<bool> for Field {
    fn from(v: bool) -> Self {
        Field::Boolean(v)
    }
}

impl<T: Into<Field>> From<Option<T>> for Field {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Field::Null)
    }
}

/// The numeric domain two operands are promoted to before arithmetic.
enum Promoted {
    Integer(i64, i64),
    Decimal(Decimal, Decimal),
    Float(f64, f64),
}

impl Field {
    /// Parses a decimal literal, e.g. "82.90". The scale is preserved.
    pub fn decimal(literal: &str) -> Result<Field> {
        Ok(Field::Decimal(literal.parse::<Decimal>()?))
    }

    pub fn get_type(&self) -> Option<DataType> {
        match self {
            Field::Null => None,
            Field::Boolean(_) => Some(DataType::Bool),
            Field::Integer(_) => Some(DataType::Int),
            Field::Float(_) => Some(DataType::Float),
            Field::Decimal(_) => Some(DataType::Decimal),
            Field::String(_) => Some(DataType::Text),
        }
    }

    /// Position of the variant in the cross-type sort order.
    fn rank(&self) -> u8 {
        match self {
            Field::Null => 0,
            Field::Boolean(_) => 1,
            Field::Integer(_) => 2,
            Field::Float(_) => 3,
            Field::Decimal(_) => 4,
            Field::String(_) => 5,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Field::Integer(_) | Field::Float(_) | Field::Decimal(_))
    }

    /// Returns true if the value is undefined (NULL or NaN).
    pub fn is_undefined(&self) -> bool {
        *self == Self::Null || matches!(self, Self::Float(f) if f.is_nan())
    }

    /// Returns the value as a float, if numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Field::Integer(i) => Some(*i as f64),
            Field::Float(f) => Some(*f),
            Field::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    /// Returns the value as an exact decimal, if it is an integer or decimal.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Field::Integer(i) => Some(Decimal::from(*i)),
            Field::Decimal(d) => Some(*d),
            Field::Float(f) => Decimal::from_f64(*f),
            _ => None,
        }
    }

    /// Compares two values with SQL semantics: numbers compare by value across
    /// integer, float and decimal, NULL compares as unknown (None), and
    /// comparing incompatible types is an error.
    pub fn checked_cmp(&self, other: &Field) -> Result<Option<Ordering>> {
        use Field::*;
        Ok(match (self, other) {
            (Null, _) | (_, Null) => None,
            (Boolean(a), Boolean(b)) => Some(a.cmp(b)),
            (String(a), String(b)) => Some(a.cmp(b)),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                if a.is_undefined() || b.is_undefined() {
                    None
                } else {
                    Some(numeric_cmp(a, b))
                }
            }
            (a, b) => return errinput!("can't compare {a} and {b}"),
        })
    }

    /// Promotes two numeric operands to a common domain. Returns None if
    /// either side is NULL, and errors on non-numeric operands.
    fn promote(&self, other: &Field, op: &str) -> Result<Option<Promoted>> {
        use Field::*;
        Ok(Some(match (self, other) {
            (Null, Null) | (Null, Integer(_) | Float(_) | Decimal(_)) => return Ok(None),
            (Integer(_) | Float(_) | Decimal(_), Null) => return Ok(None),
            (Integer(a), Integer(b)) => Promoted::Integer(*a, *b),
            (Float(_), _) | (_, Float(_)) => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => Promoted::Float(a, b),
                _ => return errinput!("can't {op} {self} and {other}"),
            },
            (Integer(_) | Decimal(_), Integer(_) | Decimal(_)) => {
                match (self.as_decimal(), other.as_decimal()) {
                    (Some(a), Some(b)) => Promoted::Decimal(a, b),
                    _ => return errinput!("can't {op} {self} and {other}"),
                }
            }
            _ => return errinput!("can't {op} {self} and {other}"),
        }))
    }

    pub fn checked_add(&self, other: &Field) -> Result<Field> {
        Ok(match self.promote(other, "add")? {
            None => Field::Null,
            Some(Promoted::Integer(a, b)) => Field::Integer(a.checked_add(b).ok_or(Error::OverflowError)?),
            Some(Promoted::Decimal(a, b)) => Field::Decimal(a.checked_add(b).ok_or(Error::OverflowError)?),
            Some(Promoted::Float(a, b)) => Field::Float(a + b),
        })
    }

    pub fn checked_sub(&self, other: &Field) -> Result<Field> {
        Ok(match self.promote(other, "subtract")? {
            None => Field::Null,
            Some(Promoted::Integer(a, b)) => Field::Integer(a.checked_sub(b).ok_or(Error::OverflowError)?),
            Some(Promoted::Decimal(a, b)) => Field::Decimal(a.checked_sub(b).ok_or(Error::OverflowError)?),
            Some(Promoted::Float(a, b)) => Field::Float(a - b),
        })
    }

    pub fn checked_mul(&self, other: &Field) -> Result<Field> {
        Ok(match self.promote(other, "multiply")? {
            None => Field::Null,
            Some(Promoted::Integer(a, b)) => Field::Integer(a.checked_mul(b).ok_or(Error::OverflowError)?),
            Some(Promoted::Decimal(a, b)) => Field::Decimal(a.checked_mul(b).ok_or(Error::OverflowError)?),
            Some(Promoted::Float(a, b)) => Field::Float(a * b),
        })
    }

    /// Divides two values. Integer division truncates toward zero.
    pub fn checked_div(&self, other: &Field) -> Result<Field> {
        if matches!(other, Field::Integer(0)) || matches!(other, Field::Decimal(d) if d.is_zero()) {
            return Err(Error::InvalidData("Division by zero".to_string()));
        }
        Ok(match self.promote(other, "divide")? {
            None => Field::Null,
            Some(Promoted::Integer(a, b)) => Field::Integer(a.checked_div(b).ok_or(Error::OverflowError)?),
            Some(Promoted::Decimal(a, b)) => Field::Decimal(a.checked_div(b).ok_or(Error::OverflowError)?),
            Some(Promoted::Float(a, b)) => Field::Float(a / b),
        })
    }

    pub fn checked_mod(&self, other: &Field) -> Result<Field> {
        if matches!(other, Field::Integer(0)) || matches!(other, Field::Decimal(d) if d.is_zero()) {
            return Err(Error::InvalidData("Division by zero".to_string()));
        }
        Ok(match self.promote(other, "mod")? {
            None => Field::Null,
            Some(Promoted::Integer(a, b)) => Field::Integer(a.checked_rem(b).ok_or(Error::OverflowError)?),
            Some(Promoted::Decimal(a, b)) => Field::Decimal(a.checked_rem(b).ok_or(Error::OverflowError)?),
            Some(Promoted::Float(a, b)) => Field::Float(a % b),
        })
    }

    /// Exponentiates two values. Errors when invalid.
    pub fn checked_pow(&self, other: &Self) -> Result<Self> {
        use Field::*;
        Ok(match (self, other) {
            (Integer(lhs), Integer(rhs)) if *rhs >= 0 => {
                let rhs = u32::try_from(*rhs).or_else(|_| errinput!("integer overflow"))?;
                match lhs.checked_pow(rhs) {
                    Some(i) => Integer(i),
                    None => return Err(Error::OverflowError),
                }
            }
            (Null, _) | (_, Null) => Null,
            (lhs, rhs) => match (lhs.as_f64(), rhs.as_f64()) {
                (Some(a), Some(b)) => Float(a.powf(b)),
                _ => return errinput!("can't exponentiate {lhs} and {rhs}"),
            },
        })
    }

    /// Rounds a numeric value to the given number of decimal places, rounding
    /// half away from zero. Integers and decimals produce a decimal with
    /// exactly `places` digits after the point, e.g. ROUND(9.8, 2) = 9.80.
    pub fn round(&self, places: i64) -> Result<Field> {
        let places = u32::try_from(places)
            .ok()
            .filter(|p| *p <= 28)
            .ok_or_else(|| Error::InvalidInput(format!("invalid rounding scale {places}")))?;
        Ok(match self {
            Field::Null => Field::Null,
            Field::Integer(_) | Field::Decimal(_) => {
                let decimal = self.as_decimal().ok_or(Error::OverflowError)?;
                let mut rounded =
                    decimal.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
                rounded.rescale(places);
                Field::Decimal(rounded)
            }
            Field::Float(f) => {
                let factor = 10f64.powi(places as i32);
                Field::Float((f * factor).round() / factor)
            }
            value => return errinput!("can't round {value}"),
        })
    }

    /// Converts the value to the given data type, for inserts into typed
    /// columns. NULL converts to NULL.
    pub fn coerce(self, data_type: DataType) -> Result<Field> {
        use Field::*;
        Ok(match (self, data_type) {
            (Null, _) => Null,
            (v @ Boolean(_), DataType::Bool) => v,
            (v @ Integer(_), DataType::Int) => v,
            (v @ Float(_), DataType::Float) => v,
            (v @ Decimal(_), DataType::Decimal) => v,
            (v @ String(_), DataType::Text) => v,
            (Integer(i), DataType::Float) => Float(i as f64),
            (Integer(i), DataType::Decimal) => Decimal(rust_decimal::Decimal::from(i)),
            (Decimal(d), DataType::Float) => Float(d.to_f64().ok_or(Error::OverflowError)?),
            (Float(f), DataType::Decimal) => {
                Decimal(rust_decimal::Decimal::from_f64(f).ok_or(Error::OverflowError)?)
            }
            (v, data_type) => return errinput!("can't store {v} in a {data_type} column"),
        })
    }
}

/// A column label, used in query results and plans.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Label {
    /// No label.
    None,
    /// An unqualified column name.
    Unqualified(String),
    /// A fully qualified table/column name.
    Qualified(String, String),
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, ""),
            Self::Unqualified(name) => write!(f, "{name}"),
            Self::Qualified(table, column) => write!(f, "{table}.{column}"),
        }
    }
}

impl Label {
    /// Formats the label as a short column header.
    pub fn as_header(&self) -> &str {
        match self {
            Self::Qualified(_, column) | Self::Unqualified(column) => column.as_str(),
            Self::None => "?",
        }
    }
}

impl From<Option<String>> for Label {
    fn from(name: Option<String>) -> Self {
        name.map(Label::Unqualified).unwrap_or(Label::None)
    }
}
