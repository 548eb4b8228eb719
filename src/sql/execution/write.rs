use crate::common::Result;
use crate::errinput;
use crate::sql::engine::Transaction;
use crate::storage::tuple::{Row, Rows};
use crate::types::field::Field;
use crate::types::Table;
use itertools::Itertools as _;
use std::collections::HashSet;

/// Inserts rows into a table (i.e. INSERT) from the given source. Rows are
/// validated against the schema, and primary key values must be unique
/// across both existing and new rows. Returns the number of rows inserted.
pub fn insert(txn: &impl Transaction, table: Table, source: Rows) -> Result<u64> {
    let rows: Vec<Row> = source
        .map(|row| row.and_then(|row| table.validate_row(row.into()).map(Row::from)))
        .try_collect()?;

    if let Some(pk) = table.primary_key() {
        let mut keys: HashSet<Field> = txn
            .scan(table.name(), None)?
            .map(|row| row.and_then(|row| row.get_field(pk).cloned()))
            .try_collect()?;
        for row in &rows {
            let key = row.get_field(pk)?;
            if !keys.insert(key.clone()) {
                return errinput!("primary key {key} already exists in table {}", table.name());
            }
        }
    }

    let count = txn.insert(table.name(), rows)?.len();
    Ok(count as u64)
}
