use super::Session;
use crate::common::Result;
use crate::errinput;
use crate::sql::planner::Expression;
use crate::storage::tuple::{Row, Rows};
use crate::types::Table;

/// A SQL query engine.
///
/// Executes create, insert and select operations against the data in its
/// underlying storage engine.
pub trait Engine<'a>: Sized {
    /// The engine's transaction type. It provides access to table rows and
    /// schemas. It does not outlive the engine.
    type Transaction: Transaction + Catalog + 'a;

    /// Begins a read-write transaction.
    fn begin(&'a self) -> Result<Self::Transaction>;

    /// Creates a session which executes SQL statements against the engine.
    fn session(&'a self) -> Result<Session<'a, Self>> {
        Session::new(self)
    }
}

/// A SQL transaction.
///
/// Rows are stored as serialized tuples, and decoded using the table schema
/// when scanned. All statements of a session run in a single transaction.
pub trait Transaction {
    /// Inserts rows into a table, returning their row ids. Rows must already
    /// be validated against the table schema.
    fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<u64>>;
    /// Sequentially scans a table's rows, applying a filter if given.
    fn scan(&self, table: &str, filter: Option<Expression>) -> Result<Rows>;
}

/// Stores table schema information.
pub trait Catalog {
    /// Creates a new table. Errors if the table already exists.
    fn create_table(&self, table: Table) -> Result<()>;
    /// Drops a table. Returns true if it existed. Errors if it didn't exist,
    /// unless if_exists is true.
    fn drop_table(&self, table: &str, if_exists: bool) -> Result<bool>;
    /// Fetches a table schema, if it exists.
    fn get_table(&self, table: &str) -> Result<Option<Table>>;

    /// Fetches a table schema. Errors if the table does not exist.
    fn must_get_table(&self, table: &str) -> Result<Table> {
        match self.get_table(table)? {
            Some(table) => Ok(table),
            None => errinput!("{} {table}", crate::common::constants::NO_TABLE_FOUND_MSG),
        }
    }
}
