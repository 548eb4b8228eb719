//! The SQL abstract syntax tree, as produced by the parser.
use crate::types::DataType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// SQL statements.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    /// CREATE TABLE: creates a new table.
    CreateTable {
        name: String,
        columns: Vec<Column>,
    },
    /// DROP TABLE: drops a table.
    DropTable {
        name: String,
        if_exists: bool,
    },
    /// INSERT INTO: inserts new rows into a table.
    Insert {
        table: String,
        /// Columns to insert values into. If None, all columns are used.
        columns: Option<Vec<String>>,
        values: Vec<Vec<Expression>>,
    },
    /// SELECT: selects rows, possibly combined with set operations.
    Select(Query),
}

/// A SELECT query: one or more SELECT cores combined by set operators, with
/// ordering and limits applied to the combined result.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub select: Select,
    /// Set operations applied left to right: (operator, ALL, right side).
    pub compounds: Vec<(SetOperator, bool, Select)>,
    pub order_by: Vec<(Expression, Direction)>,
    pub limit: Option<Expression>,
    pub offset: Option<Expression>,
}

/// A single SELECT ... FROM ... WHERE ... GROUP BY ... HAVING block.
#[derive(Clone, Debug, PartialEq)]
pub struct Select {
    /// Selected expressions with optional aliases. `*` is Expression::All.
    pub select: Vec<(Expression, Option<String>)>,
    pub from: Vec<FromItem>,
    pub r#where: Option<Expression>,
    pub group_by: Vec<Expression>,
    pub having: Option<Expression>,
}

/// A FROM item.
#[derive(Clone, Debug, PartialEq)]
pub enum FromItem {
    /// A table, with an optional alias.
    Table { name: String, alias: Option<String> },
    /// A join of two FROM items.
    Join {
        left: Box<FromItem>,
        right: Box<FromItem>,
        r#type: JoinType,
        predicate: Option<Expression>,
    },
}

/// A CREATE TABLE column definition.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub datatype: DataType,
    pub primary_key: bool,
    pub nullable: Option<bool>,
    pub default: Option<Expression>,
}

/// JOIN types.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JoinType {
    Cross,
    Inner,
    Left,
}

impl JoinType {
    /// If true, the join is an outer join, where rows with no join partner
    /// on the left side are emitted with NULLs for the right side.
    pub fn is_outer(&self) -> bool {
        matches!(self, Self::Left)
    }
}

/// Set operators combining two SELECT results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetOperator {
    Except,
    Intersect,
    Union,
}

impl std::fmt::Display for SetOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Except => "EXCEPT",
            Self::Intersect => "INTERSECT",
            Self::Union => "UNION",
        })
    }
}

/// ORDER BY direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// SQL expressions, e.g. `a + 7 > b`. Can be nested.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expression {
    /// All columns, i.e. *.
    All,
    /// A column reference, optionally qualified with a table name.
    Column(Option<String>, String),
    /// A literal value.
    Literal(Literal),
    /// A function call (name and parameters). Names are lowercase.
    Function(String, Vec<Expression>),
    /// An operator.
    Operator(Operator),
}

/// Expression literal values.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    String(String),
}

/// Expression operators.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    And(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
    Or(Box<Expression>, Box<Expression>),

    Equal(Box<Expression>, Box<Expression>),
    GreaterThan(Box<Expression>, Box<Expression>),
    GreaterThanOrEqual(Box<Expression>, Box<Expression>),
    /// a [NOT] IN (b, c, ...)
    In(Box<Expression>, Vec<Expression>, bool),
    /// a IS [NOT] NULL
    IsNull(Box<Expression>, bool),
    LessThan(Box<Expression>, Box<Expression>),
    LessThanOrEqual(Box<Expression>, Box<Expression>),
    NotEqual(Box<Expression>, Box<Expression>),

    Add(Box<Expression>, Box<Expression>),
    Divide(Box<Expression>, Box<Expression>),
    Exponentiate(Box<Expression>, Box<Expression>),
    Identity(Box<Expression>),
    Multiply(Box<Expression>, Box<Expression>),
    Negate(Box<Expression>),
    Remainder(Box<Expression>, Box<Expression>),
    Subtract(Box<Expression>, Box<Expression>),
}

impl Expression {
    /// Walks the expression tree depth-first, calling a closure for every node.
    /// Halts and returns false if the closure returns false.
    pub fn walk(&self, visitor: &mut impl FnMut(&Expression) -> bool) -> bool {
        use Operator::*;
        if !visitor(self) {
            return false;
        }
        match self {
            Self::Operator(Add(lhs, rhs))
            | Self::Operator(And(lhs, rhs))
            | Self::Operator(Divide(lhs, rhs))
            | Self::Operator(Equal(lhs, rhs))
            | Self::Operator(Exponentiate(lhs, rhs))
            | Self::Operator(GreaterThan(lhs, rhs))
            | Self::Operator(GreaterThanOrEqual(lhs, rhs))
            | Self::Operator(LessThan(lhs, rhs))
            | Self::Operator(LessThanOrEqual(lhs, rhs))
            | Self::Operator(Multiply(lhs, rhs))
            | Self::Operator(NotEqual(lhs, rhs))
            | Self::Operator(Or(lhs, rhs))
            | Self::Operator(Remainder(lhs, rhs))
            | Self::Operator(Subtract(lhs, rhs)) => lhs.walk(visitor) && rhs.walk(visitor),

            Self::Operator(Identity(expr))
            | Self::Operator(IsNull(expr, _))
            | Self::Operator(Negate(expr))
            | Self::Operator(Not(expr)) => expr.walk(visitor),

            Self::Operator(In(expr, list, _)) => {
                expr.walk(visitor) && list.iter().all(|e| e.walk(visitor))
            }

            Self::Function(_, args) => args.iter().all(|arg| arg.walk(visitor)),

            Self::All | Self::Column(_, _) | Self::Literal(_) => true,
        }
    }

    /// Returns true if the closure returns true for any node in the tree.
    pub fn contains(&self, visitor: &impl Fn(&Expression) -> bool) -> bool {
        !self.walk(&mut |e| !visitor(e))
    }

    /// Collects all nodes for which the closure returns true, without
    /// descending into matched nodes.
    pub fn collect(&self, visitor: &impl Fn(&Expression) -> bool, out: &mut Vec<Expression>) {
        if visitor(self) {
            out.push(self.clone());
            return;
        }
        use Operator::*;
        match self {
            Self::Operator(Add(lhs, rhs))
            | Self::Operator(And(lhs, rhs))
            | Self::Operator(Divide(lhs, rhs))
            | Self::Operator(Equal(lhs, rhs))
            | Self::Operator(Exponentiate(lhs, rhs))
            | Self::Operator(GreaterThan(lhs, rhs))
            | Self::Operator(GreaterThanOrEqual(lhs, rhs))
            | Self::Operator(LessThan(lhs, rhs))
            | Self::Operator(LessThanOrEqual(lhs, rhs))
            | Self::Operator(Multiply(lhs, rhs))
            | Self::Operator(NotEqual(lhs, rhs))
            | Self::Operator(Or(lhs, rhs))
            | Self::Operator(Remainder(lhs, rhs))
            | Self::Operator(Subtract(lhs, rhs)) => {
                lhs.collect(visitor, out);
                rhs.collect(visitor, out);
            }

            Self::Operator(Identity(expr))
            | Self::Operator(IsNull(expr, _))
            | Self::Operator(Negate(expr))
            | Self::Operator(Not(expr)) => expr.collect(visitor, out),

            Self::Operator(In(expr, list, _)) => {
                expr.collect(visitor, out);
                list.iter().for_each(|e| e.collect(visitor, out));
            }

            Self::Function(_, args) => args.iter().for_each(|arg| arg.collect(visitor, out)),

            Self::All | Self::Column(_, _) | Self::Literal(_) => {}
        }
    }

    /// Returns true if the expression is an aggregate function call.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::Function(name, _) if is_aggregate_function(name))
    }
}

/// Returns true if the function name is an aggregate function.
pub fn is_aggregate_function(name: &str) -> bool {
    matches!(name, "avg" | "count" | "max" | "min" | "sum")
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl From<Operator> for Expression {
    fn from(op: Operator) -> Self {
        Self::Operator(op)
    }
}

impl From<Operator> for Box<Expression> {
    fn from(value: Operator) -> Self {
        Box::new(value.into())
    }
}
