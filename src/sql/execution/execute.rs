use crate::common::Result;
use crate::sql::engine::{Catalog, Transaction};
use crate::sql::execution::{aggregate, join, set, source, transform, write};
use crate::sql::planner::{BoxedNode, Node, Plan};
use crate::storage::tuple::Rows;
use crate::types::field::Label;

/// Executes a query plan.
///
/// Takes both a catalog and transaction as parameters, even though a transaction
/// implements the Catalog trait, to separate the concerns of `catalog` to planning
/// and `txn` to execution.
pub fn execute_plan(
    plan: Plan,
    catalog: &impl Catalog,
    txn: &impl Transaction,
) -> Result<ExecutionResult> {
    Ok(match plan {
        Plan::CreateTable { schema } => {
            let name = schema.name().to_string();
            catalog.create_table(schema)?;
            ExecutionResult::CreateTable { name }
        }

        Plan::DropTable { table, if_exists } => {
            let existed = catalog.drop_table(&table, if_exists)?;
            ExecutionResult::DropTable {
                name: table,
                existed,
            }
        }

        Plan::Insert { table, source } => {
            let rows = execute(source, txn)?;
            let count = write::insert(txn, table, rows)?;
            ExecutionResult::Insert { count }
        }

        Plan::Select(root) => {
            let columns = (0..root.columns()).map(|i| root.column_label(i)).collect();
            let rows = execute(root, txn)?;
            ExecutionResult::Select { rows, columns }
        }
    })
}

/// Recursively executes a query plan node, returning a row iterator.
///
/// Rows stream through the plan node tree from the branches to the root. Nodes
/// recursively pull input rows upwards from their child node(s), process them,
/// and hand the resulting rows off to their parent node.
pub fn execute(node: BoxedNode, txn: &impl Transaction) -> Result<Rows> {
    Ok(match node.into_inner() {
        Node::Aggregate {
            source,
            group_by,
            aggregates,
        } => {
            let source = execute(source, txn)?;
            aggregate::aggregate(source, group_by, aggregates)?
        }

        Node::Filter { source, predicate } => {
            let source = execute(source, txn)?;
            transform::filter(source, predicate)
        }

        Node::HashJoin {
            left,
            left_column,
            right,
            right_column,
            outer,
        } => {
            let right_size = right.columns();
            let left = execute(left, txn)?;
            let right = execute(right, txn)?;
            join::hash(left, left_column, right, right_column, right_size, outer)?
        }

        Node::Limit { source, limit } => {
            let source = execute(source, txn)?;
            transform::limit(source, limit)
        }

        Node::NestedLoopJoin {
            left,
            right,
            predicate,
            outer,
        } => {
            let right_size = right.columns();
            let left = execute(left, txn)?;
            let right = execute(right, txn)?;
            join::nested_loop(left, right, right_size, predicate, outer)
        }

        Node::Nothing { .. } => source::nothing(),

        Node::Offset { source, offset } => {
            let source = execute(source, txn)?;
            transform::offset(source, offset)
        }

        Node::Order { source, key } => {
            let source = execute(source, txn)?;
            transform::order(source, key)?
        }

        Node::Projection {
            source,
            expressions,
            aliases: _,
        } => {
            let source = execute(source, txn)?;
            transform::project(source, expressions)
        }

        Node::Remap { source, targets } => {
            let source = execute(source, txn)?;
            transform::remap(source, targets)
        }

        Node::Scan {
            table,
            filter,
            alias: _,
        } => source::scan(txn, table, filter)?,

        Node::SetOperation {
            left,
            right,
            operator,
            all,
        } => {
            let left = execute(left, txn)?;
            let right = execute(right, txn)?;
            set::set_operation(left, right, operator, all)?
        }

        Node::Values { rows } => source::values(rows),
    })
}

/// A plan execution result.
pub enum ExecutionResult {
    CreateTable { name: String },
    DropTable { name: String, existed: bool },
    Insert { count: u64 },
    Select { rows: Rows, columns: Vec<Label> },
}
