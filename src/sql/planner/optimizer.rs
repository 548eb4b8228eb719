use crate::common::Result;
use crate::sql::planner::{BoxedNode, Expression, Node};
use crate::types::field::Field;

/// A plan optimizer, which recursively transforms a plan node to make plan
/// execution more efficient where possible.
pub type Optimizer = fn(BoxedNode) -> Result<BoxedNode>;

/// The set of optimizers, and the order in which they are applied.
pub static OPTIMIZERS: &[(&str, Optimizer)] = &[
    ("Constant folding", fold_constants),
    ("Filter pushdown", push_filters),
    ("Short circuit", short_circuit),
    ("Join type", join_type),
];

/// Folds constant (sub)expressions by pre-evaluating them, instead of
/// re-evaluating them for every row during execution.
pub fn fold_constants(node: BoxedNode) -> Result<BoxedNode> {
    let fold = |expr: Expression| -> Result<Expression> {
        match expr {
            Expression::Constant(_) => Ok(expr),
            expr if expr.is_constant() => Ok(Expression::Constant(expr.evaluate(None)?)),
            expr => Ok(expr),
        }
    };
    let transform = |node: Node| node.transform_expressions(&Ok, &fold);
    Ok(node.into_inner().transform(&Ok, &transform)?.into())
}

/// Pushes filter predicates down into scans and join inputs, so rows are
/// discarded as early as possible.
pub fn push_filters(node: BoxedNode) -> Result<BoxedNode> {
    Ok(node.into_inner().transform(&push_filter_into, &Ok)?.into())
}

/// Pushes a Filter node's predicate into its source, or a join predicate's
/// single-sided parts into the join inputs. Applied before descending, so
/// pushed filters are pushed further down.
fn push_filter_into(node: Node) -> Result<Node> {
    Ok(match node {
        Node::Filter { source, predicate } => match source.into_inner() {
            Node::Scan {
                table,
                filter,
                alias,
            } => {
                let filter = match filter {
                    Some(filter) => Expression::and_vec(vec![filter, predicate]),
                    None => Some(predicate),
                };
                Node::Scan {
                    table,
                    filter,
                    alias,
                }
            }
            Node::NestedLoopJoin {
                left,
                right,
                predicate: join_predicate,
                outer,
            } => {
                let boundary = left.columns();
                let mut to_left = Vec::new();
                let mut to_right = Vec::new();
                let mut remaining = Vec::new();
                for expr in predicate.into_cnf_vec() {
                    match sides(&expr, boundary) {
                        (_, false) => to_left.push(expr),
                        // Filtering the right side of an outer join would
                        // turn discarded matches into NULL rows.
                        (false, true) if !outer => to_right.push(expr.shift_columns(-(boundary as isize))?),
                        _ => remaining.push(expr),
                    }
                }
                // For inner joins, multi-sided parts become join predicates.
                let join_predicate = match outer {
                    true => join_predicate,
                    false => {
                        let mut parts: Vec<_> = join_predicate.into_iter().collect();
                        parts.append(&mut remaining);
                        Expression::and_vec(parts)
                    }
                };
                let join = Node::NestedLoopJoin {
                    left: wrap_filter(left, to_left),
                    right: wrap_filter(right, to_right),
                    predicate: join_predicate,
                    outer,
                };
                match Expression::and_vec(remaining) {
                    Some(predicate) => Node::Filter {
                        source: join.into(),
                        predicate,
                    },
                    None => join,
                }
            }
            source => Node::Filter {
                source: source.into(),
                predicate,
            },
        },

        // A join condition that only references the right input can be
        // evaluated on the right input, also for outer joins. Left-only
        // conditions can only be pushed for inner joins.
        Node::NestedLoopJoin {
            left,
            right,
            predicate: Some(predicate),
            outer,
        } => {
            let boundary = left.columns();
            let mut to_left = Vec::new();
            let mut to_right = Vec::new();
            let mut remaining = Vec::new();
            for expr in predicate.into_cnf_vec() {
                match sides(&expr, boundary) {
                    (true, false) if !outer => to_left.push(expr),
                    (false, true) => to_right.push(expr.shift_columns(-(boundary as isize))?),
                    _ => remaining.push(expr),
                }
            }
            Node::NestedLoopJoin {
                left: wrap_filter(left, to_left),
                right: wrap_filter(right, to_right),
                predicate: Expression::and_vec(remaining),
                outer,
            }
        }

        node => node,
    })
}

/// Returns whether the expression references columns on the left and right
/// side of the given column boundary.
fn sides(expr: &Expression, boundary: usize) -> (bool, bool) {
    let left = expr.contains(&|e| matches!(e, Expression::Column(i) if *i < boundary));
    let right = expr.contains(&|e| matches!(e, Expression::Column(i) if *i >= boundary));
    (left, right)
}

/// Wraps a node in a Filter, unless there are no predicates.
fn wrap_filter(source: BoxedNode, predicates: Vec<Expression>) -> BoxedNode {
    match Expression::and_vec(predicates) {
        Some(predicate) => Node::Filter { source, predicate }.into(),
        None => source,
    }
}

/// Short-circuits useless nodes: filters that are always true are removed,
/// and filters that are never true or LIMIT 0 produce Nothing.
pub fn short_circuit(node: BoxedNode) -> Result<BoxedNode> {
    let nothing = |node: &Node| Node::Nothing {
        columns: (0..node.columns()).map(|i| node.column_label(i)).collect(),
    };
    let transform = |node: Node| -> Result<Node> {
        Ok(match node {
            Node::Filter {
                source,
                predicate: Expression::Constant(Field::Boolean(true)),
            } => source.into_inner(),
            Node::Filter {
                predicate: Expression::Constant(Field::Boolean(false) | Field::Null),
                ..
            } => nothing(&node),
            Node::Scan {
                table,
                filter: Some(Expression::Constant(Field::Boolean(true))),
                alias,
            } => Node::Scan {
                table,
                filter: None,
                alias,
            },
            Node::Scan {
                filter: Some(Expression::Constant(Field::Boolean(false) | Field::Null)),
                ..
            } => nothing(&node),
            Node::Limit { limit: 0, .. } => nothing(&node),
            node => node,
        })
    };
    Ok(node.into_inner().transform(&Ok, &transform)?.into())
}

/// Replaces nested loop joins on a single column equality with hash joins.
pub fn join_type(node: BoxedNode) -> Result<BoxedNode> {
    let transform = |node: Node| -> Result<Node> {
        let Node::NestedLoopJoin {
            left,
            right,
            predicate: Some(predicate),
            outer,
        } = node
        else {
            return Ok(node);
        };
        let boundary = left.columns();
        let columns = match predicate.as_equijoin() {
            Some((l, r)) if l < boundary && r >= boundary => Some((l, r - boundary)),
            Some((r, l)) if l < boundary && r >= boundary => Some((l, r - boundary)),
            _ => None,
        };
        Ok(match columns {
            Some((left_column, right_column)) => {
                log::trace!("using hash join on columns {left_column} and {right_column}");
                Node::HashJoin {
                    left,
                    left_column,
                    right,
                    right_column,
                    outer,
                }
            }
            None => Node::NestedLoopJoin {
                left,
                right,
                predicate: Some(predicate),
                outer,
            },
        })
    };
    Ok(node.into_inner().transform(&Ok, &transform)?.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Table};

    fn scan(name: &str, columns: &[&str]) -> BoxedNode {
        let mut builder = Table::builder();
        builder.name(name);
        for column in columns {
            builder.column(column, DataType::Int, true);
        }
        Node::Scan {
            table: builder.build().unwrap(),
            filter: None,
            alias: None,
        }
        .into()
    }

    fn col(i: usize) -> Box<Expression> {
        Box::new(Expression::Column(i))
    }

    fn is_null(i: usize) -> Expression {
        Expression::IsNull(col(i))
    }

    #[test]
    fn test_fold_constants() {
        let node: BoxedNode = Node::Filter {
            source: scan("t", &["a"]),
            predicate: Expression::Equal(
                col(0),
                Box::new(Expression::Add(
                    Field::Integer(1).into(),
                    Field::Integer(2).into(),
                )),
            ),
        }
        .into();
        let node = fold_constants(node).unwrap();
        let Node::Filter { predicate, .. } = node.into_inner() else {
            panic!("expected filter");
        };
        assert_eq!(
            predicate,
            Expression::Equal(col(0), Field::Integer(3).into())
        );
    }

    #[test]
    fn test_push_filter_into_scan() {
        let node: BoxedNode = Node::Filter {
            source: scan("t", &["a", "b"]),
            predicate: is_null(1),
        }
        .into();
        let node = push_filters(node).unwrap();
        let Node::Scan { filter, .. } = node.into_inner() else {
            panic!("expected scan");
        };
        assert_eq!(filter, Some(is_null(1)));
    }

    #[test]
    fn test_push_filter_through_inner_join() {
        let node: BoxedNode = Node::Filter {
            source: Node::NestedLoopJoin {
                left: scan("l", &["a", "b"]),
                right: scan("r", &["c"]),
                predicate: None,
                outer: false,
            }
            .into(),
            predicate: Expression::and_vec(vec![
                is_null(1),
                is_null(2),
                Expression::Equal(col(0), col(2)),
            ])
            .unwrap(),
        }
        .into();
        let node = push_filters(node).unwrap();
        let Node::NestedLoopJoin {
            left,
            right,
            predicate,
            ..
        } = node.into_inner()
        else {
            panic!("expected join");
        };
        assert_eq!(predicate, Some(Expression::Equal(col(0), col(2))));
        assert!(matches!(&*left, Node::Scan { filter: Some(f), .. } if *f == is_null(1)));
        // right side columns are shifted to the right input
        assert!(matches!(&*right, Node::Scan { filter: Some(f), .. } if *f == is_null(0)));
    }

    #[test]
    fn test_no_right_pushdown_through_outer_join() {
        let node: BoxedNode = Node::Filter {
            source: Node::NestedLoopJoin {
                left: scan("l", &["a"]),
                right: scan("r", &["b"]),
                predicate: Some(Expression::Equal(col(0), col(1))),
                outer: true,
            }
            .into(),
            predicate: is_null(1),
        }
        .into();
        let node = push_filters(node).unwrap();
        let Node::Filter { source, predicate } = node.into_inner() else {
            panic!("expected filter above the join");
        };
        assert_eq!(predicate, is_null(1));
        assert!(matches!(&*source, Node::NestedLoopJoin { right, .. }
            if matches!(&**right, Node::Scan { filter: None, .. })));
    }

    #[test]
    fn test_short_circuit() {
        let node: BoxedNode = Node::Filter {
            source: scan("t", &["a", "b"]),
            predicate: Expression::Constant(Field::Boolean(false)),
        }
        .into();
        let node = short_circuit(node).unwrap();
        assert!(matches!(&*node, Node::Nothing { columns } if columns.len() == 2));

        let node: BoxedNode = Node::Limit {
            source: scan("t", &["a"]),
            limit: 0,
        }
        .into();
        assert!(matches!(&*short_circuit(node).unwrap(), Node::Nothing { .. }));
    }

    #[test]
    fn test_join_type() {
        let join = |predicate| -> BoxedNode {
            Node::NestedLoopJoin {
                left: scan("l", &["a", "b"]),
                right: scan("r", &["c", "d"]),
                predicate: Some(predicate),
                outer: true,
            }
            .into()
        };

        let node = join_type(join(Expression::Equal(col(3), col(1)))).unwrap();
        assert!(matches!(
            &*node,
            Node::HashJoin {
                left_column: 1,
                right_column: 1,
                outer: true,
                ..
            }
        ));

        // a non-equijoin stays a nested loop join
        let node = join_type(join(Expression::LessThan(col(0), col(2)))).unwrap();
        assert!(matches!(&*node, Node::NestedLoopJoin { .. }));
    }
}
