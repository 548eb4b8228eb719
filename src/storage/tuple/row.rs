use crate::common::{Error, Result};
use crate::errdata;
use crate::storage::tuple::Tuple;
use crate::types::field::Field;
use crate::types::Table;
use dyn_clone::DynClone;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::slice::Iter;

/// A row iterator.
pub type Rows = Box<dyn RowIterator>;

/// A Row iterator trait, which requires the iterator to be both clonable and
/// object-safe. Cloning is needed to be able to reset an iterator back to an
/// initial state, e.g. during nested loop joins. It has a blanket
/// implementation for all matching iterators.
pub trait RowIterator: Iterator<Item = Result<Row>> + DynClone {}
impl<I: Iterator<Item = Result<Row>> + DynClone> RowIterator for I {}
dyn_clone::clone_trait_object!(RowIterator);

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Row {
    values: Vec<Field>,
}

impl From<Vec<Field>> for Row {
    fn from(values: Vec<Field>) -> Self {
        Row { values }
    }
}

impl From<Vec<&Field>> for Row {
    fn from(value: Vec<&Field>) -> Self {
        Row::from(value.into_iter().cloned().collect::<Vec<_>>())
    }
}

impl From<Row> for Vec<Field> {
    fn from(row: Row) -> Self {
        row.values
    }
}

impl FromIterator<Field> for Row {
    fn from_iter<T: IntoIterator<Item = Field>>(iter: T) -> Self {
        Row::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl IntoIterator for Row {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl std::fmt::Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.values.iter().join(", "))
    }
}

impl Row {
    pub fn iter(&self) -> Iter<Field> {
        self.values.iter()
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn get_field(&self, index: usize) -> Result<&Field> {
        self.values.get(index).ok_or(Error::OutOfBounds)
    }

    /// Appends the fields of another row, e.g. for joins.
    pub fn extend(&mut self, other: impl IntoIterator<Item = Field>) {
        self.values.extend(other)
    }

    /// Drops all fields past the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.values.truncate(len)
    }

    /// Serializes the row into a tuple for storage in the given table.
    pub fn to_tuple(&self, schema: &Table) -> Result<Tuple> {
        if self.values.len() != schema.col_count() {
            return errdata!(
                "row has {} fields, table {} has {} columns",
                self.values.len(),
                schema.name(),
                schema.col_count()
            );
        }
        Ok(Tuple::from(bincode::serialize(&self.values)?))
    }

    /// Deserializes a stored tuple of the given table into a row.
    pub fn from_tuple(tuple: Tuple, schema: &Table) -> Result<Row> {
        let values: Vec<Field> = bincode::deserialize(&tuple.data)?;
        if values.len() != schema.col_count() {
            return errdata!(
                "stored tuple has {} fields, table {} has {} columns",
                values.len(),
                schema.name(),
                schema.col_count()
            );
        }
        Ok(Row::from(values))
    }
}
