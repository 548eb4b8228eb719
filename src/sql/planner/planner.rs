use super::plan::{Aggregate, Direction, Plan};
use super::{BoxedNode, Expression, Node};
use crate::common::Result;
use crate::errinput;
use crate::sql::engine::Catalog;
use crate::sql::parser::ast;
use crate::types::field::{Field, Label};
use crate::types::{Column, Table};
use std::collections::{HashMap, HashSet};

/// A query planner. Builds a plan from an AST statement, resolving table and
/// column names against the catalog.
pub struct Planner<'a, C: Catalog> {
    catalog: &'a C,
}

impl<'a, C: Catalog> Planner<'a, C> {
    /// Creates a new planner.
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Builds a plan for an AST statement.
    pub fn build(&self, statement: ast::Statement) -> Result<Plan> {
        use ast::Statement::*;
        match statement {
            CreateTable { name, columns } => self.build_create_table(name, columns),
            DropTable { name, if_exists } => Ok(Plan::DropTable {
                table: name,
                if_exists,
            }),
            Insert {
                table,
                columns,
                values,
            } => self.build_insert(table, columns, values),
            Select(query) => Ok(Plan::Select(self.build_query(query)?)),
        }
    }

    /// Builds a CREATE TABLE plan.
    fn build_create_table(&self, name: String, columns: Vec<ast::Column>) -> Result<Plan> {
        let mut builder = Table::builder();
        builder.name(&name);
        let mut primary_key = None;
        for column in columns {
            if column.primary_key {
                if primary_key.is_some() {
                    return errinput!("multiple primary keys for table {name}");
                }
                if column.nullable == Some(true) {
                    return errinput!("primary key {} can't be nullable", column.name);
                }
                primary_key = Some(column.name.clone());
            }
            let mut definition = Column::builder()
                .name(&column.name)
                .data_type(column.datatype)
                .nullable(column.nullable.unwrap_or(!column.primary_key));
            if let Some(default) = column.default {
                let value = self.build_expression(default, &Scope::new())?.evaluate(None)?;
                definition = definition.default(value);
            }
            builder.column_from_definition(definition.build()?);
        }
        if let Some(primary_key) = &primary_key {
            builder.primary_key(primary_key);
        }
        Ok(Plan::CreateTable {
            schema: builder.build()?,
        })
    }

    /// Builds an INSERT plan. Rows are expanded to full table rows, filling in
    /// column defaults for columns that aren't given.
    fn build_insert(
        &self,
        table: String,
        columns: Option<Vec<String>>,
        values: Vec<Vec<ast::Expression>>,
    ) -> Result<Plan> {
        let table = self.catalog.must_get_table(&table)?;

        // Map each table column to its position in the VALUES rows, if any.
        let mut positions: Vec<Option<usize>> = vec![None; table.col_count()];
        let width = match &columns {
            None => {
                positions = (0..table.col_count()).map(Some).collect();
                table.col_count()
            }
            Some(columns) => {
                for (position, name) in columns.iter().enumerate() {
                    let Some(index) = table.field_name_to_index(name) else {
                        return errinput!("unknown column {name} in table {}", table.name());
                    };
                    if positions[index].is_some() {
                        return errinput!("column {name} given multiple times");
                    }
                    positions[index] = Some(position);
                }
                columns.len()
            }
        };

        let scope = Scope::new();
        let mut rows = Vec::with_capacity(values.len());
        for row in values {
            if row.len() != width {
                return errinput!("expected {width} values, got {}", row.len());
            }
            let mut exprs: Vec<Option<Expression>> = row
                .into_iter()
                .map(|expr| self.build_expression(expr, &scope).map(Some))
                .collect::<Result<_>>()?;
            let mut full = Vec::with_capacity(table.col_count());
            for (column, position) in table.columns().iter().zip(&positions) {
                match position.and_then(|p| exprs[p].take()) {
                    Some(expr) => full.push(expr),
                    None => match column.default() {
                        Some(default) => full.push(Expression::Constant(default.clone())),
                        None => return errinput!("no value given for column {}", column.get_name()),
                    },
                }
            }
            rows.push(full);
        }
        Ok(Plan::Insert {
            table,
            source: Node::Values { rows }.into(),
        })
    }

    /// Builds a query: a SELECT or a chain of set operations, followed by
    /// ORDER BY, OFFSET and LIMIT.
    fn build_query(&self, query: ast::Query) -> Result<BoxedNode> {
        let ast::Query {
            select,
            compounds,
            order_by,
            limit,
            offset,
        } = query;

        let (mut node, key, hidden) = if compounds.is_empty() {
            let select = self.build_select(select, order_by)?;
            (select.node, select.order, select.hidden)
        } else {
            // ORDER BY applies to the combined result, and can only refer to
            // the output columns of the left-most SELECT.
            let left = self.build_select(select, Vec::new())?;
            let scope = left.scope;
            let mut node = left.node;
            for (operator, all, right) in compounds {
                let right = self.build_select(right, Vec::new())?.node;
                if right.columns() != node.columns() {
                    return errinput!(
                        "each {operator} query must have the same number of columns, got {} and {}",
                        node.columns(),
                        right.columns()
                    );
                }
                node = Node::SetOperation {
                    left: node,
                    right,
                    operator,
                    all,
                }
                .into();
            }
            let mut key = Vec::with_capacity(order_by.len());
            for (expr, direction) in order_by {
                let index = match scope.resolve_output(&expr, node.columns())? {
                    Some(index) => index,
                    None => match self.build_expression(expr, &scope)? {
                        Expression::Column(index) => index,
                        _ => return errinput!("ORDER BY on a set operation must use output columns"),
                    },
                };
                key.push((Expression::Column(index), direction.into()));
            }
            (node, key, 0)
        };

        if !key.is_empty() {
            node = Node::Order { source: node, key }.into();
        }
        if let Some(offset) = offset {
            let offset = self.evaluate_constant_count(offset, "OFFSET")?;
            node = Node::Offset {
                source: node,
                offset,
            }
            .into();
        }
        if let Some(limit) = limit {
            let limit = self.evaluate_constant_count(limit, "LIMIT")?;
            node = Node::Limit {
                source: node,
                limit,
            }
            .into();
        }
        // Drop any hidden ORDER BY columns.
        if hidden > 0 {
            let visible = node.columns() - hidden;
            let targets = (0..node.columns())
                .map(|i| (i < visible).then_some(i))
                .collect();
            node = Node::Remap {
                source: node,
                targets,
            }
            .into();
        }
        Ok(node)
    }

    /// Evaluates a LIMIT or OFFSET expression, which must be a constant
    /// non-negative integer.
    fn evaluate_constant_count(&self, expr: ast::Expression, clause: &str) -> Result<usize> {
        match self.build_expression(expr, &Scope::new())?.evaluate(None)? {
            Field::Integer(n) if n >= 0 => Ok(n as usize),
            value => errinput!("invalid {clause} value {value}"),
        }
    }

    /// Builds a single SELECT block, including the ORDER BY key when the
    /// block isn't part of a set operation. ORDER BY expressions that aren't
    /// output columns are appended to the projection as hidden columns.
    fn build_select(
        &self,
        select: ast::Select,
        order_by: Vec<(ast::Expression, ast::Direction)>,
    ) -> Result<PlannedSelect> {
        let ast::Select {
            select,
            from,
            r#where,
            group_by,
            having,
        } = select;
        let mut scope = Scope::new();

        // Build FROM. Multiple items are cross joined. Without FROM, emit a
        // single empty row to evaluate constant expressions against.
        let mut node: BoxedNode = match from.is_empty() {
            true => Node::Values {
                rows: vec![Vec::new()],
            }
            .into(),
            false => {
                let mut items = from.into_iter();
                let mut node = match items.next() {
                    Some(first) => self.build_from(first, &mut scope)?,
                    None => return errinput!("empty FROM clause"),
                };
                for item in items {
                    let right = self.build_from(item, &mut scope)?;
                    node = Node::NestedLoopJoin {
                        left: node,
                        right,
                        predicate: None,
                        outer: false,
                    }
                    .into();
                }
                node
            }
        };

        // Build WHERE.
        if let Some(expr) = r#where {
            if expr.contains(&|e| e.is_aggregate()) {
                return errinput!("aggregate functions are not allowed in WHERE");
            }
            let predicate = self.build_expression(expr, &scope)?;
            node = Node::Filter {
                source: node,
                predicate,
            }
            .into();
        }

        // Build aggregation, collecting aggregates from SELECT, HAVING and
        // ORDER BY.
        let mut aggregates = Vec::new();
        for expr in select
            .iter()
            .map(|(expr, _)| expr)
            .chain(having.iter())
            .chain(order_by.iter().map(|(expr, _)| expr))
        {
            expr.collect(&|e| e.is_aggregate(), &mut aggregates);
        }
        let mut seen = HashSet::new();
        aggregates.retain(|expr| seen.insert(expr.clone()));
        if !group_by.is_empty() || !aggregates.is_empty() {
            node = self.build_aggregate(&mut scope, node, group_by, aggregates)?;
        }

        // Build HAVING, as a filter over the aggregate output.
        if let Some(expr) = having {
            if !scope.aggregated {
                return errinput!("HAVING requires GROUP BY or aggregate functions");
            }
            let predicate = self.build_expression(expr, &scope)?;
            node = Node::Filter {
                source: node,
                predicate,
            }
            .into();
        }

        // Build the projection.
        let mut expressions = Vec::new();
        let mut labels = Vec::new();
        let mut select_asts = Vec::new();
        for (expr, alias) in select {
            if expr == ast::Expression::All {
                if scope.aggregated {
                    return errinput!("can't use * with GROUP BY or aggregates");
                }
                for (index, label) in scope.columns.iter().enumerate() {
                    expressions.push(Expression::Column(index));
                    labels.push(label.clone());
                    select_asts.push(None);
                }
                continue;
            }
            let built = self.build_expression(expr.clone(), &scope)?;
            let label = match (alias, &expr, &built) {
                (Some(alias), _, _) => Label::Unqualified(alias),
                (None, ast::Expression::Function(name, _), _) => Label::Unqualified(name.clone()),
                (None, _, Expression::Column(index)) => scope.label(*index),
                (None, _, _) => Label::None,
            };
            expressions.push(built);
            labels.push(label);
            select_asts.push(Some(expr));
        }
        let output = Scope::from_labels(&labels);

        // Resolve ORDER BY against output columns first, then fall back to
        // hidden columns evaluated against the projection input.
        let mut order = Vec::with_capacity(order_by.len());
        let mut hidden = 0;
        for (expr, direction) in order_by {
            let index = match output.resolve_output(&expr, labels.len())? {
                Some(index) => index,
                None => match select_asts.iter().position(|e| e.as_ref() == Some(&expr)) {
                    Some(index) => index,
                    None => {
                        expressions.push(self.build_expression(expr, &scope)?);
                        labels.push(Label::None);
                        hidden += 1;
                        expressions.len() - 1
                    }
                },
            };
            order.push((Expression::Column(index), Direction::from(direction)));
        }

        let node = Node::Projection {
            source: node,
            expressions,
            aliases: labels,
        }
        .into();
        Ok(PlannedSelect {
            node,
            scope: output,
            order,
            hidden,
        })
    }

    /// Builds a FROM item, adding its columns to the scope.
    fn build_from(&self, from: ast::FromItem, scope: &mut Scope) -> Result<BoxedNode> {
        Ok(match from {
            ast::FromItem::Table { name, alias } => {
                let table = self.catalog.must_get_table(&name)?;
                scope.add_table(alias.as_deref().unwrap_or(&name), &table)?;
                Node::Scan {
                    table,
                    filter: None,
                    alias,
                }
                .into()
            }
            ast::FromItem::Join {
                left,
                right,
                r#type,
                predicate,
            } => {
                let left = self.build_from(*left, scope)?;
                let right = self.build_from(*right, scope)?;
                let predicate = match predicate {
                    Some(expr) if expr.contains(&|e| e.is_aggregate()) => {
                        return errinput!("aggregate functions are not allowed in JOIN conditions")
                    }
                    Some(expr) => Some(self.build_expression(expr, scope)?),
                    None => None,
                };
                Node::NestedLoopJoin {
                    left,
                    right,
                    predicate,
                    outer: r#type.is_outer(),
                }
                .into()
            }
        })
    }

    /// Builds an Aggregate node for the GROUP BY expressions and aggregate
    /// calls, replacing the scope with one over the aggregate output.
    fn build_aggregate(
        &self,
        scope: &mut Scope,
        source: BoxedNode,
        group_by: Vec<ast::Expression>,
        aggregates: Vec<ast::Expression>,
    ) -> Result<BoxedNode> {
        let mut output = Scope::new();
        output.aggregated = true;
        output.tables = scope.tables.clone();

        let mut plan_group_by = Vec::with_capacity(group_by.len());
        for expr in group_by {
            if expr.contains(&|e| e.is_aggregate()) {
                return errinput!("aggregate functions are not allowed in GROUP BY");
            }
            let built = self.build_expression(expr.clone(), scope)?;
            let label = match &built {
                Expression::Column(index) => scope.label(*index),
                _ => Label::None,
            };
            let index = output.add_column(label);
            output.expressions.insert(expr, index);
            plan_group_by.push(built);
        }

        let mut plan_aggregates = Vec::with_capacity(aggregates.len());
        for expr in aggregates {
            let ast::Expression::Function(name, args) = &expr else {
                return errinput!("invalid aggregate {expr:?}");
            };
            let [arg] = args.as_slice() else {
                return errinput!("{name}() takes exactly one argument");
            };
            if arg.contains(&|e| e.is_aggregate()) {
                return errinput!("aggregate function calls can't be nested");
            }
            let argument = match arg {
                ast::Expression::All if name == "count" => Expression::Constant(Field::Boolean(true)),
                ast::Expression::All => return errinput!("{name}(*) is not supported"),
                arg => self.build_expression(arg.clone(), scope)?,
            };
            let Some(aggregate) = Aggregate::from_name(name, argument) else {
                return errinput!("unknown aggregate function {name}");
            };
            plan_aggregates.push(aggregate);
            let index = output.add_column(Label::None);
            output.expressions.insert(expr, index);
        }

        *scope = output;
        Ok(Node::Aggregate {
            source,
            group_by: plan_group_by,
            aggregates: plan_aggregates,
        }
        .into())
    }

    /// Builds an expression from an AST expression, resolving column names
    /// against the scope.
    pub fn build_expression(&self, expr: ast::Expression, scope: &Scope) -> Result<Expression> {
        use Expression::*;

        // Expressions computed by an aggregation, e.g. COUNT(*) or a GROUP BY
        // expression, are looked up as columns.
        if let Some(index) = scope.expressions.get(&expr) {
            return Ok(Column(*index));
        }

        // Helper for building a boxed expression.
        let build = |expr: Box<ast::Expression>| -> Result<Box<Expression>> {
            Ok(Box::new(self.build_expression(*expr, scope)?))
        };

        Ok(match expr {
            ast::Expression::All => return errinput!("* is not valid in this context"),
            ast::Expression::Literal(literal) => Constant(match literal {
                ast::Literal::Null => Field::Null,
                ast::Literal::Boolean(b) => Field::Boolean(b),
                ast::Literal::Integer(i) => Field::Integer(i),
                ast::Literal::Decimal(d) => Field::Decimal(d),
                ast::Literal::String(s) => Field::String(s),
            }),
            ast::Expression::Column(table, name) => {
                Column(scope.lookup_column(table.as_deref(), &name)?)
            }
            ast::Expression::Function(name, _) if ast::is_aggregate_function(&name) => {
                return errinput!("aggregate function {name}() is not allowed here");
            }
            ast::Expression::Function(name, mut args) => match (name.as_str(), args.len()) {
                ("round", 1) => Round(
                    Box::new(self.build_expression(args.remove(0), scope)?),
                    Box::new(Constant(Field::Integer(0))),
                ),
                ("round", 2) => {
                    let places = self.build_expression(args.remove(1), scope)?;
                    let value = self.build_expression(args.remove(0), scope)?;
                    Round(Box::new(value), Box::new(places))
                }
                ("coalesce", n) if n > 0 => Coalesce(
                    args.into_iter()
                        .map(|arg| self.build_expression(arg, scope))
                        .collect::<Result<_>>()?,
                ),
                ("round" | "coalesce", n) => {
                    return errinput!("invalid number of arguments {n} to {name}()")
                }
                (name, _) => return errinput!("unknown function {name}"),
            },
            ast::Expression::Operator(op) => match op {
                ast::Operator::And(lhs, rhs) => And(build(lhs)?, build(rhs)?),
                ast::Operator::Not(expr) => Not(build(expr)?),
                ast::Operator::Or(lhs, rhs) => Or(build(lhs)?, build(rhs)?),

                ast::Operator::Equal(lhs, rhs) => Equal(build(lhs)?, build(rhs)?),
                ast::Operator::GreaterThan(lhs, rhs) => GreaterThan(build(lhs)?, build(rhs)?),
                ast::Operator::GreaterThanOrEqual(lhs, rhs) => Not(LessThan(build(lhs)?, build(rhs)?).into()),
                ast::Operator::In(expr, list, negated) => {
                    let list = list
                        .into_iter()
                        .map(|item| self.build_expression(item, scope))
                        .collect::<Result<_>>()?;
                    let expr = InList(build(expr)?, list);
                    match negated {
                        true => Not(Box::new(expr)),
                        false => expr,
                    }
                }
                ast::Operator::IsNull(expr, negated) => {
                    let expr = IsNull(build(expr)?);
                    match negated {
                        true => Not(Box::new(expr)),
                        false => expr,
                    }
                }
                ast::Operator::LessThan(lhs, rhs) => LessThan(build(lhs)?, build(rhs)?),
                ast::Operator::LessThanOrEqual(lhs, rhs) => Not(GreaterThan(build(lhs)?, build(rhs)?).into()),
                ast::Operator::NotEqual(lhs, rhs) => Not(Equal(build(lhs)?, build(rhs)?).into()),

                ast::Operator::Add(lhs, rhs) => Add(build(lhs)?, build(rhs)?),
                ast::Operator::Divide(lhs, rhs) => Divide(build(lhs)?, build(rhs)?),
                ast::Operator::Exponentiate(lhs, rhs) => Exponentiate(build(lhs)?, build(rhs)?),
                ast::Operator::Identity(expr) => Identity(build(expr)?),
                ast::Operator::Multiply(lhs, rhs) => Multiply(build(lhs)?, build(rhs)?),
                ast::Operator::Negate(expr) => Negate(build(expr)?),
                ast::Operator::Remainder(lhs, rhs) => Remainder(build(lhs)?, build(rhs)?),
                ast::Operator::Subtract(lhs, rhs) => Subtract(build(lhs)?, build(rhs)?),
            },
        })
    }
}

/// The output of planning a single SELECT block.
struct PlannedSelect {
    node: BoxedNode,
    /// The scope over the projected output columns.
    scope: Scope,
    /// The ORDER BY key, over the projected columns.
    order: Vec<(Expression, Direction)>,
    /// The number of trailing hidden ORDER BY columns in the projection.
    hidden: usize,
}

/// A scope maps column names to row indexes, for the columns available at a
/// given point in the plan.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    /// Table names (or aliases) in scope, for qualified references.
    tables: HashSet<String>,
    /// Column labels, by row index.
    columns: Vec<Label>,
    /// Qualified table.column names, by row index.
    qualified: HashMap<(String, String), usize>,
    /// Unqualified column names. Several indexes mean the name is ambiguous.
    unqualified: HashMap<String, Vec<usize>>,
    /// Expressions computed by an aggregation (aggregate calls and GROUP BY
    /// expressions), by row index.
    expressions: HashMap<ast::Expression, usize>,
    /// Set once the scope is over aggregate output; column references must
    /// then refer to GROUP BY columns.
    aggregated: bool,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scope over projected output columns with the given labels.
    fn from_labels(labels: &[Label]) -> Self {
        let mut scope = Self::new();
        for label in labels {
            if let Label::Qualified(table, _) = label {
                scope.tables.insert(table.clone());
            }
            scope.add_column(label.clone());
        }
        scope
    }

    /// Adds a table's columns to the scope.
    fn add_table(&mut self, name: &str, table: &Table) -> Result<()> {
        if !self.tables.insert(name.to_string()) {
            return errinput!("duplicate table name {name}");
        }
        for column in table.columns() {
            self.add_column(Label::Qualified(name.to_string(), column.get_name().to_string()));
        }
        Ok(())
    }

    /// Appends a column with the given label, returning its index.
    fn add_column(&mut self, label: Label) -> usize {
        let index = self.columns.len();
        match &label {
            Label::Qualified(table, column) => {
                self.qualified.insert((table.clone(), column.clone()), index);
                self.unqualified.entry(column.clone()).or_default().push(index);
            }
            Label::Unqualified(column) => {
                self.unqualified.entry(column.clone()).or_default().push(index);
            }
            Label::None => {}
        }
        self.columns.push(label);
        index
    }

    /// Returns the label of the column at the given index.
    fn label(&self, index: usize) -> Label {
        self.columns.get(index).cloned().unwrap_or(Label::None)
    }

    /// Looks up a column index by (optionally qualified) name.
    fn lookup_column(&self, table: Option<&str>, name: &str) -> Result<usize> {
        let display = match table {
            Some(table) => format!("{table}.{name}"),
            None => name.to_string(),
        };
        let found = match table {
            Some(table) => {
                if !self.tables.contains(table) {
                    return errinput!("unknown table {table}");
                }
                self.qualified.get(&(table.to_string(), name.to_string())).copied()
            }
            None => match self.unqualified.get(name).map(Vec::as_slice) {
                Some([index]) => Some(*index),
                Some([_, _, ..]) => return errinput!("ambiguous column name {name}"),
                Some([]) | None => None,
            },
        };
        match found {
            Some(index) => Ok(index),
            None if self.aggregated => errinput!(
                "column {display} must appear in the GROUP BY clause or be used in an aggregate function"
            ),
            None => errinput!("unknown column {display}"),
        }
    }

    /// Resolves an ORDER BY expression against output columns: a column
    /// name or alias, or a 1-based column position. Returns None if the
    /// expression isn't an output column reference.
    fn resolve_output(&self, expr: &ast::Expression, width: usize) -> Result<Option<usize>> {
        Ok(match expr {
            ast::Expression::Column(None, name) => {
                match self.unqualified.get(name).map(Vec::as_slice) {
                    Some([index]) => Some(*index),
                    Some([_, _, ..]) => return errinput!("ORDER BY {name} is ambiguous"),
                    Some([]) | None => None,
                }
            }
            ast::Expression::Column(Some(table), name) => {
                self.qualified.get(&(table.clone(), name.clone())).copied()
            }
            ast::Expression::Literal(ast::Literal::Integer(position)) => {
                match usize::try_from(*position) {
                    Ok(position) if (1..=width).contains(&position) => Some(position - 1),
                    _ => return errinput!("ORDER BY position {position} is not in select list"),
                }
            }
            _ => None,
        })
    }
}
