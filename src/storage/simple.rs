use crate::common::constants::DEFAULT_SCAN_BATCH_SIZE;
use crate::common::Result;
use crate::storage::engine::{Engine, Status};
use crate::storage::tuple::Tuple;
use crate::types::Table;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A serial transactional key-value engine. It wraps an
/// underlying storage engine for raw key-value storage.
///
/// It does not execute any transactions concurrently.
pub struct Simple<E: Engine> {
    pub engine: Arc<Mutex<E>>,
    /// The number of tuples a scan pulls from the engine at a time.
    batch_size: usize,
}

impl<E: Engine> Simple<E> {
    /// Creates a new simple engine with the given storage engine.
    pub fn new(engine: E) -> Self {
        Self::with_batch_size(engine, DEFAULT_SCAN_BATCH_SIZE)
    }

    /// Creates a new simple engine whose scans buffer `batch_size` tuples.
    pub fn with_batch_size(engine: E, batch_size: usize) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            batch_size: batch_size.max(1),
        }
    }

    /// Begins a new read-write transaction.
    pub fn begin(&self) -> Result<Transaction<E>> {
        Transaction::begin(self.engine.clone(), self.batch_size)
    }
}

/// A simple transaction
pub struct Transaction<E: Engine> {
    /// The underlying storage engine, shared by all transactions
    engine: Arc<Mutex<E>>,
    batch_size: usize,
}

impl<E: Engine> Transaction<E> {
    /// Begins a new transaction in read-write mode. The simple engine runs
    /// serially, so there is no versioning bookkeeping to do here.
    fn begin(engine: Arc<Mutex<E>>, batch_size: usize) -> Result<Self> {
        drop(engine.lock()?);
        Ok(Self { engine, batch_size })
    }

    /// Creates a table.
    pub fn create_table(&self, table: Table) -> Result<()> {
        let mut engine = self.engine.lock()?;
        engine.create_table(table)
    }

    /// Deletes a table.
    pub fn delete_table(&self, table_name: &str) -> Result<bool> {
        let mut engine = self.engine.lock()?;
        engine.delete_table(table_name)
    }

    /// Fetches a table
    pub fn fetch_table(&self, table_name: &str) -> Result<Option<Table>> {
        let mut engine = self.engine.lock()?;
        engine.get_table(table_name)
    }

    /// Inserts a tuple into the table with the given `table_name`.
    /// Returns the row id of the inserted tuple.
    pub fn insert(&self, table_name: &str, value: Tuple) -> Result<u64> {
        let mut engine = self.engine.lock()?;
        engine.insert(table_name, value)
    }

    /// Returns the storage engine status.
    pub fn status(&self) -> Result<Status> {
        let mut engine = self.engine.lock()?;
        engine.status()
    }

    /// Returns an iterator over the (row id, tuple) items of the table.
    pub fn scan(&self, table: &str) -> ScanIterator<E> {
        ScanIterator::new(Arc::clone(&self.engine), table, self.batch_size)
    }
}

/// An iterator over the tuples of a table.
///
/// The (single-threaded) engine is protected by a mutex, and holding the mutex
/// for the duration of the iteration can cause deadlocks (e.g. when the local
/// SQL engine pulls from two tables concurrently during a join). Instead, we
/// pull and buffer a batch of tuples at a time, and release the mutex in between.
pub struct ScanIterator<E: Engine> {
    /// The engine.
    engine: Arc<Mutex<E>>,
    /// A buffer of tuples to emit.
    buffer: VecDeque<(u64, Tuple)>,
    /// The name of the table this iterates over
    table: String,
    /// The row id to resume the scan from once the buffer drains.
    next_id: u64,
    /// Set once the engine has no more tuples past `next_id`.
    done: bool,
    batch_size: usize,
}

/// Implement Clone manually. Deriving it requires Engine: Clone.
impl<E: Engine> Clone for ScanIterator<E> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            buffer: self.buffer.clone(),
            table: self.table.clone(),
            next_id: self.next_id,
            done: self.done,
            batch_size: self.batch_size,
        }
    }
}

impl<E: Engine> ScanIterator<E> {
    /// Creates a new scan iterator.
    fn new(engine: Arc<Mutex<E>>, table: &str, batch_size: usize) -> Self {
        Self {
            engine,
            buffer: VecDeque::with_capacity(batch_size),
            table: table.to_string(),
            next_id: 0,
            done: false,
            batch_size,
        }
    }

    /// Fills the buffer with the next batch, if there's any pending items.
    fn fill_buffer(&mut self) -> Result<()> {
        if self.done || !self.buffer.is_empty() {
            return Ok(());
        }
        let mut engine = self.engine.lock()?;
        for item in engine.scan(&self.table, self.next_id)?.take(self.batch_size) {
            let (id, tuple) = item?;
            self.next_id = id + 1;
            self.buffer.push_back((id, tuple));
        }
        if self.buffer.len() < self.batch_size {
            self.done = true;
        }
        Ok(())
    }
}

impl<E: Engine> Iterator for ScanIterator<E> {
    type Item = Result<(u64, Tuple)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() {
            if let Err(error) = self.fill_buffer() {
                self.done = true;
                return Some(Err(error));
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}
