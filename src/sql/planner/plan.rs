use crate::common::Result;
use crate::sql::engine::{Catalog, Transaction};
use crate::sql::execution;
use crate::sql::execution::ExecutionResult;
use crate::sql::parser::ast;
use crate::sql::planner::expression::Expression;
use crate::sql::planner::optimizer::OPTIMIZERS;
use crate::sql::planner::{BoxedNode, Planner};
use crate::types::Table;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Plan {
    /// A CREATE TABLE plan. Creates a new table with the given schema. Errors
    /// if the table already exists or the schema is invalid.
    CreateTable { schema: Table },
    /// A DROP TABLE plan. Drops the given table. Errors if the table does not
    /// exist, unless if_exists is true.
    DropTable { table: String, if_exists: bool },
    /// An INSERT plan. Inserts rows from source (typically a Values node) into
    /// table. Source rows are complete table rows, in column order.
    Insert { table: Table, source: BoxedNode },
    /// A SELECT plan. Recursively executes the query plan tree and returns the
    /// resulting rows.
    Select(BoxedNode),
}

impl Plan {
    /// Builds a plan from an AST statement.
    pub fn build(statement: ast::Statement, catalog: &impl Catalog) -> Result<Self> {
        Planner::new(catalog).build(statement)
    }

    /// Executes the plan, consuming it.
    pub fn execute(self, txn: &(impl Transaction + Catalog)) -> Result<ExecutionResult> {
        execution::execute_plan(self, txn, txn)
    }

    /// Optimizes the plan, consuming it.
    pub fn optimize(self) -> Result<Self> {
        let optimize = |node| {
            OPTIMIZERS.iter().try_fold(node, |node, (name, opt)| {
                log::trace!("applying optimizer: {name}");
                opt(node)
            })
        };
        Ok(match self {
            Self::CreateTable { .. } | Self::DropTable { .. } => self,
            Self::Insert { table, source } => Self::Insert {
                table,
                source: optimize(source)?,
            },
            Self::Select(root) => Self::Select(optimize(root)?),
        })
    }
}

/// An aggregate function.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Aggregate {
    Average(Expression),
    Count(Expression),
    Max(Expression),
    Min(Expression),
    Sum(Expression),
}

impl Aggregate {
    /// Creates an aggregate from a function name and its argument.
    pub fn from_name(name: &str, expr: Expression) -> Option<Self> {
        Some(match name {
            "avg" => Self::Average(expr),
            "count" => Self::Count(expr),
            "max" => Self::Max(expr),
            "min" => Self::Min(expr),
            "sum" => Self::Sum(expr),
            _ => return None,
        })
    }

    /// Returns the expression being aggregated.
    pub fn expression(&self) -> &Expression {
        match self {
            Self::Average(expr)
            | Self::Count(expr)
            | Self::Max(expr)
            | Self::Min(expr)
            | Self::Sum(expr) => expr,
        }
    }
}

/// A sort order direction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ascending => f.write_str("asc"),
            Self::Descending => f.write_str("desc"),
        }
    }
}

impl From<ast::Direction> for Direction {
    fn from(dir: ast::Direction) -> Self {
        match dir {
            ast::Direction::Ascending => Self::Ascending,
            ast::Direction::Descending => Self::Descending,
        }
    }
}
