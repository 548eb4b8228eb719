use crate::common::Result;
use crate::sql::parser::ast::SetOperator;
use crate::sql::planner::{Aggregate, Direction, Expression};
use crate::types::field::Label;
use crate::types::Table;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// A boxed plan node, so that nodes can nest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxedNode(Box<Node>);

impl From<Node> for BoxedNode {
    fn from(node: Node) -> Self {
        Self(Box::new(node))
    }
}

impl BoxedNode {
    /// Unwraps the boxed node.
    pub fn into_inner(self) -> Node {
        *self.0
    }

    fn map(self, f: impl FnOnce(Node) -> Result<Node>) -> Result<Self> {
        f(self.into_inner()).map(Self::from)
    }
}

impl Deref for BoxedNode {
    type Target = Node;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A query plan node. Executing a node yields a row iterator; nodes pull
/// rows from their sources.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Buckets source rows by the group_by values and computes the aggregates
    /// per bucket. Emits the group_by columns, then the aggregate columns.
    Aggregate {
        source: BoxedNode,
        group_by: Vec<Expression>,
        aggregates: Vec<Aggregate>,
    },
    /// Keeps the source rows for which the predicate is true.
    Filter {
        source: BoxedNode,
        predicate: Expression,
    },
    /// An equijoin on left_column = right_column. The right source is
    /// hashed, and left rows look it up. With outer, unmatched left rows are
    /// padded with NULLs.
    HashJoin {
        left: BoxedNode,
        left_column: usize,
        right: BoxedNode,
        right_column: usize,
        outer: bool,
    },
    /// Emits at most limit source rows.
    Limit { source: BoxedNode, limit: usize },
    /// Joins every left row against the buffered right rows, keeping pairs
    /// that satisfy the predicate (all pairs if None). With outer, unmatched
    /// left rows are padded with NULLs.
    NestedLoopJoin {
        left: BoxedNode,
        right: BoxedNode,
        predicate: Option<Expression>,
        outer: bool,
    },
    /// Emits no rows. Keeps the labels of the node it replaced, so result
    /// headers survive optimization.
    Nothing { columns: Vec<Label> },
    /// Skips the first offset source rows.
    Offset { source: BoxedNode, offset: usize },
    /// Sorts all source rows by the key. The sort is stable.
    Order {
        source: BoxedNode,
        key: Vec<(Expression, Direction)>,
    },
    /// Evaluates the expressions against each source row. A Label::None
    /// alias keeps the source label for plain column references.
    Projection {
        source: BoxedNode,
        expressions: Vec<Expression>,
        aliases: Vec<Label>,
    },
    /// Moves source column i to targets[i], or drops it if None. Target
    /// columns without a source are NULL.
    Remap {
        source: BoxedNode,
        targets: Vec<Option<usize>>,
    },
    /// Reads all rows of a table, optionally filtered. The alias (if any)
    /// qualifies the column labels instead of the table name.
    Scan {
        table: Table,
        filter: Option<Expression>,
        alias: Option<String>,
    },
    /// EXCEPT, INTERSECT or UNION of two sources with equal column counts.
    /// Without all, duplicate rows are removed. Labels come from the left.
    SetOperation {
        left: BoxedNode,
        right: BoxedNode,
        operator: SetOperator,
        all: bool,
    },
    /// Constant rows.
    Values { rows: Vec<Vec<Expression>> },
}

impl Node {
    /// Returns the number of columns the node emits.
    pub fn columns(&self) -> usize {
        match self {
            Self::Scan { table, .. } => table.col_count(),
            Self::Values { rows } => rows.first().map_or(0, Vec::len),
            Self::Nothing { columns } => columns.len(),

            Self::Aggregate {
                group_by,
                aggregates,
                ..
            } => group_by.len() + aggregates.len(),
            Self::Projection { expressions, .. } => expressions.len(),
            Self::Remap { targets, .. } => targets.iter().flatten().map(|t| t + 1).max().unwrap_or(0),
            Self::HashJoin { left, right, .. } | Self::NestedLoopJoin { left, right, .. } => {
                left.columns() + right.columns()
            }

            Self::Filter { source, .. }
            | Self::Limit { source, .. }
            | Self::Offset { source, .. }
            | Self::Order { source, .. } => source.columns(),
            Self::SetOperation { left, .. } => left.columns(),
        }
    }

    /// Returns the label of the given output column, found by following the
    /// column down to the node that produced it. Used for result headers;
    /// name resolution during planning goes through Scope instead.
    pub fn column_label(&self, index: usize) -> Label {
        match self {
            Self::Scan { table, alias, .. } => table.get(index).map_or(Label::None, |column| {
                let qualifier = alias.as_deref().unwrap_or(table.name());
                Label::Qualified(qualifier.to_string(), column.get_name().to_string())
            }),
            Self::Values { .. } => Label::None,
            Self::Nothing { columns } => columns.get(index).cloned().unwrap_or(Label::None),

            // Grouping columns keep the label of a grouped column reference.
            // Aggregate columns are labelled by the projection above them.
            Self::Aggregate {
                source, group_by, ..
            } => match group_by.get(index) {
                Some(Expression::Column(i)) => source.column_label(*i),
                _ => Label::None,
            },
            Self::Projection {
                source,
                expressions,
                aliases,
            } => match (aliases.get(index), expressions.get(index)) {
                (Some(Label::None) | None, Some(Expression::Column(i))) => source.column_label(*i),
                (Some(Label::None) | None, _) => Label::None,
                (Some(alias), _) => alias.clone(),
            },
            Self::Remap { source, targets } => targets
                .iter()
                .position(|target| *target == Some(index))
                .map_or(Label::None, |i| source.column_label(i)),
            Self::HashJoin { left, right, .. } | Self::NestedLoopJoin { left, right, .. } => {
                match index.checked_sub(left.columns()) {
                    Some(i) => right.column_label(i),
                    None => left.column_label(index),
                }
            }

            Self::Filter { source, .. }
            | Self::Limit { source, .. }
            | Self::Offset { source, .. }
            | Self::Order { source, .. } => source.column_label(index),
            Self::SetOperation { left, .. } => left.column_label(index),
        }
    }

    /// Applies f to each direct source of the node.
    fn map_sources(self, f: &impl Fn(BoxedNode) -> Result<BoxedNode>) -> Result<Self> {
        Ok(match self {
            Self::Aggregate {
                source,
                group_by,
                aggregates,
            } => Self::Aggregate {
                source: f(source)?,
                group_by,
                aggregates,
            },
            Self::Filter { source, predicate } => Self::Filter {
                source: f(source)?,
                predicate,
            },
            Self::Limit { source, limit } => Self::Limit {
                source: f(source)?,
                limit,
            },
            Self::Offset { source, offset } => Self::Offset {
                source: f(source)?,
                offset,
            },
            Self::Order { source, key } => Self::Order {
                source: f(source)?,
                key,
            },
            Self::Projection {
                source,
                expressions,
                aliases,
            } => Self::Projection {
                source: f(source)?,
                expressions,
                aliases,
            },
            Self::Remap { source, targets } => Self::Remap {
                source: f(source)?,
                targets,
            },
            Self::HashJoin {
                left,
                left_column,
                right,
                right_column,
                outer,
            } => Self::HashJoin {
                left: f(left)?,
                left_column,
                right: f(right)?,
                right_column,
                outer,
            },
            Self::NestedLoopJoin {
                left,
                right,
                predicate,
                outer,
            } => Self::NestedLoopJoin {
                left: f(left)?,
                right: f(right)?,
                predicate,
                outer,
            },
            Self::SetOperation {
                left,
                right,
                operator,
                all,
            } => Self::SetOperation {
                left: f(left)?,
                right: f(right)?,
                operator,
                all,
            },
            node @ (Self::Nothing { .. } | Self::Scan { .. } | Self::Values { .. }) => node,
        })
    }

    /// Rewrites the node tree depth-first: before is applied on the way
    /// down, after on the way up.
    pub fn transform(
        self,
        before: &impl Fn(Self) -> Result<Self>,
        after: &impl Fn(Self) -> Result<Self>,
    ) -> Result<Self> {
        let node = before(self)?
            .map_sources(&|source| source.map(|node| node.transform(before, after)))?;
        after(node)
    }

    /// Rewrites the expressions held by this node (not its sources) with
    /// Expression::transform. Aggregate and join columns are plain indexes
    /// and are left alone.
    pub fn transform_expressions(
        self,
        before: &impl Fn(Expression) -> Result<Expression>,
        after: &impl Fn(Expression) -> Result<Expression>,
    ) -> Result<Self> {
        let xform = |expr: Expression| expr.transform(before, after);
        Ok(match self {
            Self::Filter { source, predicate } => Self::Filter {
                source,
                predicate: xform(predicate)?,
            },
            Self::NestedLoopJoin {
                left,
                right,
                predicate,
                outer,
            } => Self::NestedLoopJoin {
                left,
                right,
                predicate: predicate.map(xform).transpose()?,
                outer,
            },
            Self::Order { source, key } => Self::Order {
                source,
                key: key
                    .into_iter()
                    .map(|(expr, direction)| Ok((xform(expr)?, direction)))
                    .collect::<Result<_>>()?,
            },
            Self::Projection {
                source,
                expressions,
                aliases,
            } => Self::Projection {
                source,
                expressions: expressions.into_iter().map(xform).collect::<Result<_>>()?,
                aliases,
            },
            Self::Scan {
                table,
                filter,
                alias,
            } => Self::Scan {
                table,
                filter: filter.map(xform).transpose()?,
                alias,
            },
            Self::Values { rows } => Self::Values {
                rows: rows
                    .into_iter()
                    .map(|row| row.into_iter().map(xform).collect::<Result<_>>())
                    .collect::<Result<_>>()?,
            },

            node @ (Self::Aggregate { .. }
            | Self::HashJoin { .. }
            | Self::Limit { .. }
            | Self::Nothing { .. }
            | Self::Offset { .. }
            | Self::Remap { .. }
            | Self::SetOperation { .. }) => node,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn scan(name: &str, alias: Option<&str>) -> BoxedNode {
        let table = Table::builder()
            .name(name)
            .column("game", DataType::Text, false)
            .column("year", DataType::Int, true)
            .build()
            .unwrap();
        Node::Scan {
            table,
            filter: None,
            alias: alias.map(String::from),
        }
        .into()
    }

    #[test]
    fn test_column_labels() {
        let join = Node::NestedLoopJoin {
            left: scan("game_sales", Some("g")),
            right: scan("reviews", None),
            predicate: None,
            outer: true,
        };
        assert_eq!(join.columns(), 4);
        assert_eq!(join.column_label(1), Label::Qualified("g".into(), "year".into()));
        assert_eq!(join.column_label(2), Label::Qualified("reviews".into(), "game".into()));
        assert_eq!(join.column_label(4), Label::None);

        let projection = Node::Projection {
            source: join.into(),
            expressions: vec![Expression::Column(3), Expression::Column(0)],
            aliases: vec![Label::None, Label::Unqualified("title".into())],
        };
        let remap = Node::Remap {
            source: projection.into(),
            targets: vec![Some(1), Some(0)],
        };
        assert_eq!(remap.columns(), 2);
        assert_eq!(remap.column_label(0), Label::Unqualified("title".into()));
        assert_eq!(remap.column_label(1), Label::Qualified("reviews".into(), "year".into()));
    }

    #[test]
    fn test_transform_visits_all_sources() {
        let node = Node::Limit {
            source: Node::NestedLoopJoin {
                left: scan("game_sales", None),
                right: scan("reviews", None),
                predicate: None,
                outer: false,
            }
            .into(),
            limit: 3,
        };
        // replace every scan with a Nothing node
        let node = node
            .transform(&Ok, &|node| match node {
                Node::Scan { table, .. } => Ok(Node::Nothing {
                    columns: vec![Label::Unqualified(table.name().to_string())],
                }),
                node => Ok(node),
            })
            .unwrap();
        let Node::Limit { source, .. } = node else {
            panic!("expected limit");
        };
        assert_eq!(source.columns(), 2);
        assert_eq!(source.column_label(1), Label::Unqualified("reviews".into()));
    }
}
