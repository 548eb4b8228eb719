use crate::common::constants::{NO_TABLE_FOUND_MSG, TABLE_EXISTS_MSG};
use crate::common::Result;
use crate::errinput;
use crate::sql::engine::Catalog;
use crate::sql::planner::Expression;
use crate::storage::simple::{self, Simple};
use crate::storage::tuple::{Row, Rows};
use crate::storage;
use crate::types::field::Field;
use crate::types::Table;

/// A SQL engine using local storage. This is a single-transaction,
/// basic execution engine without concurrency support.
pub struct Local<E: storage::Engine + 'static> {
    /// The local non-concurrent storage engine.
    pub simple: Simple<E>,
}

impl<E: storage::Engine> Local<E> {
    /// Creates a new local SQL engine using the given storage engine.
    pub fn new(engine: E) -> Self {
        Self {
            simple: Simple::new(engine),
        }
    }

    /// Creates a new local SQL engine whose table scans buffer the given
    /// number of tuples at a time.
    pub fn with_batch_size(engine: E, batch_size: usize) -> Self {
        Self {
            simple: Simple::with_batch_size(engine, batch_size),
        }
    }
}

impl<'a, E: storage::Engine> super::Engine<'a> for Local<E> {
    type Transaction = Transaction<E>;

    fn begin(&'a self) -> Result<Self::Transaction> {
        Ok(Transaction::new(self.simple.begin()?))
    }
}

/// A SQL transaction, wrapping a simple transaction.
pub struct Transaction<E: storage::Engine + 'static> {
    txn: simple::Transaction<E>,
}

impl<E: storage::Engine> Transaction<E> {
    /// Creates a new SQL transaction using the given simple transaction.
    fn new(txn: simple::Transaction<E>) -> Self {
        Self { txn }
    }
}

impl<E: storage::Engine> super::Transaction for Transaction<E> {
    fn insert(&self, table_name: &str, rows: Vec<Row>) -> Result<Vec<u64>> {
        let schema = self.must_get_table(table_name)?;
        rows.into_iter()
            .map(|row| self.txn.insert(table_name, row.to_tuple(&schema)?))
            .collect()
    }

    fn scan(&self, table_name: &str, filter: Option<Expression>) -> Result<Rows> {
        let schema = self.must_get_table(table_name)?;
        let rows = self
            .txn
            .scan(table_name)
            .map(move |result| result.and_then(|(_, tuple)| Row::from_tuple(tuple, &schema)));

        // No filter; just return the decoded rows.
        let Some(filter) = filter else {
            return Ok(Box::new(rows));
        };
        // Otherwise, drop rows that don't satisfy the predicate.
        let rows = rows.filter_map(move |result| {
            result
                .and_then(|row| match filter.evaluate(Some(&row))? {
                    Field::Boolean(true) => Ok(Some(row)),
                    Field::Boolean(false) | Field::Null => Ok(None),
                    value => errinput!("filter returned {value}, expected boolean"),
                })
                .transpose()
        });
        Ok(Box::new(rows))
    }
}

impl<E: storage::Engine> Catalog for Transaction<E> {
    fn create_table(&self, table: Table) -> Result<()> {
        if self.txn.fetch_table(table.name())?.is_some() {
            return errinput!("{TABLE_EXISTS_MSG} {}", table.name());
        }
        table.validate()?;
        self.txn.create_table(table)
    }

    fn drop_table(&self, table_name: &str, if_exists: bool) -> Result<bool> {
        match self.txn.fetch_table(table_name)? {
            Some(_) => self.txn.delete_table(table_name),
            None if if_exists => Ok(false),
            None => errinput!("{NO_TABLE_FOUND_MSG} {table_name}"),
        }
    }

    fn get_table(&self, table_name: &str) -> Result<Option<Table>> {
        self.txn.fetch_table(table_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;
    use crate::sql::engine::{Engine as _, Transaction as _};
    use crate::storage::Memory;
    use crate::types::DataType;

    fn table() -> Table {
        Table::builder()
            .name("reviews")
            .column("game", DataType::Text, false)
            .column("critic_score", DataType::Decimal, true)
            .primary_key("game")
            .build()
            .unwrap()
    }

    #[test]
    fn test_catalog() {
        let engine = Local::new(Memory::new());
        let txn = engine.begin().unwrap();
        txn.create_table(table()).unwrap();
        assert_eq!(txn.get_table("reviews").unwrap(), Some(table()));

        assert_eq!(
            txn.create_table(table()),
            Err(Error::InvalidInput(format!("{TABLE_EXISTS_MSG} reviews")))
        );

        assert!(txn.drop_table("reviews", false).unwrap());
        assert!(!txn.drop_table("reviews", true).unwrap());
        assert!(txn.drop_table("reviews", false).is_err());
        assert!(txn.must_get_table("reviews").is_err());
    }

    #[test]
    fn test_scan_filter() {
        let engine = Local::with_batch_size(Memory::new(), 2);
        let txn = engine.begin().unwrap();
        txn.create_table(table()).unwrap();
        let rows: Vec<Row> = vec![
            vec!["a".into(), Field::decimal("9.5").unwrap()].into(),
            vec!["b".into(), Field::Null].into(),
            vec!["c".into(), Field::decimal("7.0").unwrap()].into(),
        ];
        assert_eq!(txn.insert("reviews", rows.clone()).unwrap(), vec![0, 1, 2]);

        let all: Vec<Row> = txn.scan("reviews", None).unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(all, rows);

        let filter = Expression::IsNull(Box::new(Expression::Column(1)));
        let nulls: Vec<Row> = txn
            .scan("reviews", Some(filter))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(nulls, vec![rows[1].clone()]);
    }
}
