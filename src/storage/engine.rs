use crate::common::Result;
use crate::storage::tuple::Tuple;
use crate::types::Table;
use serde::{Deserialize, Serialize};

/// A key/value storage engine, where keys are (table name, row id) pairs and
/// values are serialized tuples.
///
/// Row ids are assigned by the engine on insert, in increasing order, and
/// scans return tuples in row id order.
pub trait Engine: Send {
    /// The iterator returned by scan()
    type ScanIterator<'a>: ScanIterator + 'a
    where
        Self: Sized + 'a;

    /// Creates a table. Errors if it already exists.
    fn create_table(&mut self, table: Table) -> Result<()>;

    /// Deletes a table. Returns true if it exists and false otherwise.
    fn delete_table(&mut self, table_name: &str) -> Result<bool>;

    /// Gets a table with the given table name.
    fn get_table(&mut self, table_name: &str) -> Result<Option<Table>>;

    /// Inserts a new tuple value into the table with name `table_name`,
    /// and returns the row id assigned to it.
    fn insert(&mut self, table_name: &str, value: Tuple) -> Result<u64>;

    /// Creates an iterator over the table's (row id, tuple) pairs, starting
    /// at the given row id. Errors if the table doesn't exist.
    fn scan(&mut self, table_name: &str, from: u64) -> Result<Self::ScanIterator<'_>>
    where
        Self: Sized;

    /// Returns engine status.
    fn status(&mut self) -> Result<Status>;
}

/// A scan iterator over a table
pub trait ScanIterator: Iterator<Item = Result<(u64, Tuple)>> {}
/// Blanket implementation of ScanIterator for any `I` satisfying the trait bound.
impl<I: Iterator<Item = Result<(u64, Tuple)>>> ScanIterator for I {}

/// Engine status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// The name of the storage engine.
    pub name: String,
    /// The number of tables.
    pub tables: u64,
    /// The number of live keys in the engine.
    pub keys: u64,
    /// The logical size of live tuples, in bytes.
    pub size: u64,
}
