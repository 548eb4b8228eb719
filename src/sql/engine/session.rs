use super::{Catalog, Engine, Transaction};
use crate::common::{Error, Result};
use crate::errinput;
use crate::sql::execution::ExecutionResult;
use crate::sql::parser::Parser;
use crate::sql::planner::Plan;
use crate::storage::tuple::Row;
use crate::types::field::{Field, Label};
use crate::types::{DataType, Table};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A SQL session, which executes raw SQL statements against a query engine.
pub struct Session<'a, E: Engine<'a>> {
    txn: E::Transaction,
}

impl<'a, E: Engine<'a>> Session<'a, E> {
    /// Creates a new session with the given query engine.
    pub fn new(engine: &'a E) -> Result<Self> {
        Ok(Self {
            txn: engine.begin()?,
        })
    }

    /// Executes a raw SQL statement.
    pub fn execute(&mut self, statement: &str) -> Result<StatementResult> {
        log::debug!("executing: {}", statement.trim());
        Plan::build(Parser::new(statement).parse()?, &self.txn)?
            .optimize()?
            .execute(&self.txn)?
            .try_into()
    }

    /// Executes a SELECT statement, returning its result set. Errors for
    /// any other kind of statement.
    pub fn query(&mut self, statement: &str) -> Result<ResultSet> {
        match self.execute(statement)? {
            StatementResult::Select { columns, rows } => Ok(ResultSet { columns, rows }),
            result => errinput!("expected a SELECT statement, got {result:?}"),
        }
    }

    /// Stores a result set as a table, replacing any existing table with the
    /// same name. Column names are the result headers; column types are
    /// inferred from the first non-NULL value in each column, and all columns
    /// are nullable. If storing fails, the existing table is left as it was.
    pub fn materialize(&mut self, name: &str, result: &ResultSet) -> Result<()> {
        let mut builder = Table::builder();
        builder.name(name);
        for (index, label) in result.columns.iter().enumerate() {
            if *label == Label::None {
                return errinput!("can't materialize {name}: column {index} has no name");
            }
            let data_type = result
                .rows
                .iter()
                .find_map(|row| row.get_field(index).ok().and_then(Field::get_type))
                .unwrap_or(DataType::Int);
            builder.column(label.as_header(), data_type, true);
        }
        let table = builder.build()?;

        let rows = result
            .rows
            .iter()
            .map(|row| table.validate_row(row.clone().into()).map(Row::from))
            .collect::<Result<Vec<_>>>()?;

        // Keep the current contents, so that a failed store can put them back.
        let previous = match self.txn.get_table(name)? {
            Some(table) => {
                let rows = self.txn.scan(name, None)?.collect::<Result<Vec<_>>>()?;
                Some((table, rows))
            }
            None => None,
        };

        self.txn.drop_table(name, true)?;
        let stored = self
            .txn
            .create_table(table)
            .and_then(|()| self.txn.insert(name, rows));
        match stored {
            Ok(ids) => {
                log::debug!("materialized {} rows as {name}", ids.len());
                Ok(())
            }
            Err(err) => {
                log::warn!("failed to materialize {name}, restoring previous table: {err}");
                self.txn.drop_table(name, true)?;
                if let Some((table, rows)) = previous {
                    self.txn.create_table(table)?;
                    self.txn.insert(name, rows)?;
                }
                Err(err)
            }
        }
    }
}

/// A session statement result.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub enum StatementResult {
    CreateTable { name: String },
    DropTable { name: String, existed: bool },
    Insert { count: u64 },
    Select { columns: Vec<Label>, rows: Vec<Row> },
}

/// Converts an execution result into a statement result.
impl TryFrom<ExecutionResult> for StatementResult {
    type Error = Error;
    fn try_from(result: ExecutionResult) -> Result<Self> {
        Ok(match result {
            ExecutionResult::CreateTable { name } => Self::CreateTable { name },
            ExecutionResult::DropTable { name, existed } => Self::DropTable { name, existed },
            ExecutionResult::Insert { count } => Self::Insert { count },
            ExecutionResult::Select { rows, columns } => Self::Select {
                columns,
                rows: rows.collect::<Result<_>>()?,
            },
        })
    }
}

/// The materialized result of a query: column labels and rows.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub columns: Vec<Label>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    /// Returns the (rows, columns) shape of the result.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// Returns the bare column names, e.g. `year` for `g.year`.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Label::as_header).collect()
    }

    /// Returns the index of the first column with the given name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|label| label.as_header() == name)
    }

    /// Returns the value at the given row offset and column name, if any.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Field> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get_field(index).ok()
    }

    /// Returns the values of the named column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&Field>> {
        let index = self.column_index(name)?;
        self.rows
            .iter()
            .map(|row| row.get_field(index).ok())
            .collect()
    }
}

/// Formats a value for tabular output. Strings are printed unquoted.
fn format_cell(field: &Field) -> String {
    match field {
        Field::String(s) => s.clone(),
        field => field.to_string(),
    }
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers = self.column_names();
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(format_cell).collect())
            .collect();
        let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let line = |f: &mut fmt::Formatter<'_>, values: &mut dyn Iterator<Item = &str>| {
            let mut first = true;
            for (value, &width) in values.zip(&widths) {
                if !first {
                    write!(f, " | ")?;
                }
                first = false;
                write!(f, "{value:<width$}")?;
            }
            writeln!(f)
        };
        line(f, &mut headers.iter().copied())?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        line(f, &mut rule.iter().map(String::as_str))?;
        for row in &cells {
            line(f, &mut row.iter().map(String::as_str))?;
        }
        write!(f, "({} rows)", self.rows.len())
    }
}
