use crate::common::{Error, Result};
use crate::common::constants::{NO_TABLE_FOUND_MSG, TABLE_EXISTS_MSG};
use crate::storage::engine::{self, Status};
use crate::storage::tuple::Tuple;
use crate::types::Table;
use std::collections::BTreeMap;

/// A table's schema and its tuples, in insertion order.
struct MemoryTable {
    schema: Table,
    tuples: Vec<Tuple>,
}

/// An in-memory storage engine. Tables are kept in a BTreeMap keyed by name,
/// and a tuple's row id is its position in the table.
#[derive(Default)]
pub struct Memory {
    tables: BTreeMap<String, MemoryTable>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    fn table_mut(&mut self, table_name: &str) -> Result<&mut MemoryTable> {
        self.tables
            .get_mut(table_name)
            .ok_or_else(|| Error::InvalidData(format!("{NO_TABLE_FOUND_MSG} {table_name}")))
    }
}

impl engine::Engine for Memory {
    type ScanIterator<'a> = ScanIterator<'a>
    where
        Self: Sized + 'a;

    fn create_table(&mut self, table: Table) -> Result<()> {
        if self.tables.contains_key(table.name()) {
            return Err(Error::InvalidInput(format!(
                "{TABLE_EXISTS_MSG} {}",
                table.name()
            )));
        }
        let name = table.name().to_string();
        self.tables.insert(
            name,
            MemoryTable {
                schema: table,
                tuples: Vec::new(),
            },
        );
        Ok(())
    }

    fn delete_table(&mut self, table_name: &str) -> Result<bool> {
        Ok(self.tables.remove(table_name).is_some())
    }

    fn get_table(&mut self, table_name: &str) -> Result<Option<Table>> {
        Ok(self.tables.get(table_name).map(|t| t.schema.clone()))
    }

    fn insert(&mut self, table_name: &str, value: Tuple) -> Result<u64> {
        let table = self.table_mut(table_name)?;
        table.tuples.push(value);
        Ok(table.tuples.len() as u64 - 1)
    }

    fn scan(&mut self, table_name: &str, from: u64) -> Result<Self::ScanIterator<'_>>
    where
        Self: Sized,
    {
        let table = self.table_mut(table_name)?;
        let from = usize::try_from(from).unwrap_or(usize::MAX);
        Ok(ScanIterator {
            inner: table.tuples.iter().enumerate().skip(from),
        })
    }

    fn status(&mut self) -> Result<Status> {
        Ok(Status {
            name: "memory".to_string(),
            tables: self.tables.len() as u64,
            keys: self.tables.values().map(|t| t.tuples.len() as u64).sum(),
            size: self
                .tables
                .values()
                .flat_map(|t| t.tuples.iter())
                .map(|tuple| tuple.data.len() as u64)
                .sum(),
        })
    }
}

pub struct ScanIterator<'a> {
    inner: std::iter::Skip<std::iter::Enumerate<std::slice::Iter<'a, Tuple>>>,
}

impl Iterator for ScanIterator<'_> {
    type Item = Result<(u64, Tuple)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(id, tuple)| Ok((id as u64, tuple.clone())))
    }
}
