use super::ast;
use super::{Keyword, Lexer, Token};
use crate::common::Result;
use crate::errinput;
use crate::types::DataType;
use rust_decimal::Decimal;

/// The SQL parser takes tokens from the lexer and parses the SQL syntax into
/// an abstract syntax tree (AST). It's a recursive descent parser, using
/// precedence climbing for expressions.
pub struct Parser<'a> {
    lexer: std::iter::Peekable<Lexer<'a>>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given raw SQL string.
    pub fn new(statement: &'a str) -> Parser<'a> {
        Parser {
            lexer: Lexer::new(statement).peekable(),
        }
    }

    /// Parses the input string into a single statement, optionally terminated
    /// by a semicolon. Errors if there is trailing input.
    pub fn parse(&mut self) -> Result<ast::Statement> {
        let statement = self.parse_statement()?;
        self.next_is(Token::Semicolon);
        if let Some(token) = self.lexer.next().transpose()? {
            return errinput!("unexpected token {token}");
        }
        Ok(statement)
    }

    /// Fetches the next lexer token, or errors if none is found.
    fn next(&mut self) -> Result<Token> {
        self.lexer
            .next()
            .transpose()?
            .ok_or_else(|| errinput!("unexpected end of input"))
    }

    /// Returns the next identifier, or errors if not found.
    fn next_ident(&mut self) -> Result<String> {
        match self.next()? {
            Token::Ident(ident) => Ok(ident),
            token => errinput!("expected identifier, got {token}"),
        }
    }

    /// Returns the next lexer token if it satisfies the predicate.
    fn next_if(&mut self, predicate: impl Fn(&Token) -> bool) -> Option<Token> {
        self.peek().unwrap_or(None).filter(|t| predicate(t))?;
        self.next().ok()
    }

    /// Passes the next lexer token through the closure, consuming it if the
    /// closure returns Some.
    fn next_if_map<T>(&mut self, f: impl Fn(&Token) -> Option<T>) -> Option<T> {
        let value = self.peek().unwrap_or(None).map(f)??;
        self.next().ok();
        Some(value)
    }

    /// Returns the next keyword if there is one.
    fn next_if_keyword(&mut self) -> Option<Keyword> {
        self.next_if_map(|token| match token {
            Token::Keyword(keyword) => Some(*keyword),
            _ => None,
        })
    }

    /// Consumes the next lexer token if it is the given token, returning true.
    fn next_is(&mut self, token: Token) -> bool {
        self.next_if(|t| t == &token).is_some()
    }

    /// Consumes the next lexer token if it's the expected token, or errors.
    fn expect(&mut self, expect: Token) -> Result<()> {
        let token = self.next()?;
        if token != expect {
            return errinput!("expected token {expect}, found {token}");
        }
        Ok(())
    }

    /// Peeks the next lexer token if any, but transposes it for convenience.
    fn peek(&mut self) -> Result<Option<&Token>> {
        self.lexer
            .peek()
            .map(|r| r.as_ref().map_err(|err| err.clone()))
            .transpose()
    }

    /// Parses a SQL statement.
    fn parse_statement(&mut self) -> Result<ast::Statement> {
        let Some(token) = self.peek()? else {
            return errinput!("unexpected end of input");
        };
        match token {
            Token::Keyword(Keyword::Create) => self.parse_create_table(),
            Token::Keyword(Keyword::Drop) => self.parse_drop_table(),
            Token::Keyword(Keyword::Insert) => self.parse_insert(),
            Token::Keyword(Keyword::Select) => self.parse_select(),
            token => errinput!("unexpected token {token}"),
        }
    }

    /// Parses a CREATE TABLE statement.
    fn parse_create_table(&mut self) -> Result<ast::Statement> {
        self.expect(Keyword::Create.into())?;
        self.expect(Keyword::Table.into())?;
        let name = self.next_ident()?;
        self.expect(Token::OpenParen)?;
        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_create_table_column()?);
            if !self.next_is(Token::Comma) {
                break;
            }
        }
        self.expect(Token::CloseParen)?;
        Ok(ast::Statement::CreateTable { name, columns })
    }

    /// Parses a CREATE TABLE column definition.
    fn parse_create_table_column(&mut self) -> Result<ast::Column> {
        let name = self.next_ident()?;
        let datatype = match self.next()? {
            Token::Keyword(Keyword::Bool | Keyword::Boolean) => DataType::Bool,
            Token::Keyword(Keyword::Int | Keyword::Integer | Keyword::Bigint) => DataType::Int,
            Token::Keyword(Keyword::Float | Keyword::Double | Keyword::Real) => DataType::Float,
            Token::Keyword(Keyword::Decimal | Keyword::Numeric) => {
                self.skip_type_modifiers()?;
                DataType::Decimal
            }
            Token::Keyword(Keyword::String | Keyword::Text | Keyword::Varchar) => {
                self.skip_type_modifiers()?;
                DataType::Text
            }
            token => return errinput!("unexpected token {token}"),
        };
        let mut column = ast::Column {
            name,
            datatype,
            primary_key: false,
            nullable: None,
            default: None,
        };
        while let Some(keyword) = self.next_if_keyword() {
            match keyword {
                Keyword::Primary => {
                    self.expect(Keyword::Key.into())?;
                    column.primary_key = true;
                }
                Keyword::Null => {
                    if column.nullable.is_some() {
                        return errinput!("nullability already set for column {}", column.name);
                    }
                    column.nullable = Some(true)
                }
                Keyword::Not => {
                    self.expect(Keyword::Null.into())?;
                    if column.nullable.is_some() {
                        return errinput!("nullability already set for column {}", column.name);
                    }
                    column.nullable = Some(false)
                }
                Keyword::Default => column.default = Some(self.parse_expression()?),
                keyword => return errinput!("unexpected keyword {keyword}"),
            }
        }
        Ok(column)
    }

    /// Skips type modifiers like VARCHAR(255) or DECIMAL(10, 2), which don't
    /// affect storage.
    fn skip_type_modifiers(&mut self) -> Result<()> {
        if !self.next_is(Token::OpenParen) {
            return Ok(());
        }
        loop {
            match self.next()? {
                Token::Number(_) => {}
                token => return errinput!("unexpected token {token} in type modifier"),
            }
            if !self.next_is(Token::Comma) {
                break;
            }
        }
        self.expect(Token::CloseParen)
    }

    /// Parses a DROP TABLE statement.
    fn parse_drop_table(&mut self) -> Result<ast::Statement> {
        self.expect(Keyword::Drop.into())?;
        self.expect(Keyword::Table.into())?;
        let mut if_exists = false;
        if self.next_is(Keyword::If.into()) {
            self.expect(Keyword::Exists.into())?;
            if_exists = true;
        }
        let name = self.next_ident()?;
        Ok(ast::Statement::DropTable { name, if_exists })
    }

    /// Parses an INSERT statement.
    fn parse_insert(&mut self) -> Result<ast::Statement> {
        self.expect(Keyword::Insert.into())?;
        self.expect(Keyword::Into.into())?;
        let table = self.next_ident()?;

        let mut columns = None;
        if self.next_is(Token::OpenParen) {
            let columns = columns.insert(Vec::new());
            loop {
                columns.push(self.next_ident()?);
                if !self.next_is(Token::Comma) {
                    break;
                }
            }
            self.expect(Token::CloseParen)?;
        }

        self.expect(Keyword::Values.into())?;
        let mut values = Vec::new();
        loop {
            self.expect(Token::OpenParen)?;
            let mut row = Vec::new();
            loop {
                row.push(self.parse_expression()?);
                if !self.next_is(Token::Comma) {
                    break;
                }
            }
            self.expect(Token::CloseParen)?;
            values.push(row);
            if !self.next_is(Token::Comma) {
                break;
            }
        }
        Ok(ast::Statement::Insert {
            table,
            columns,
            values,
        })
    }

    /// Parses a SELECT statement, including any set operations.
    fn parse_select(&mut self) -> Result<ast::Statement> {
        let select = self.parse_select_core()?;

        let mut compounds = Vec::new();
        while let Some(operator) = self.next_if_map(|token| match token {
            Token::Keyword(Keyword::Except) => Some(ast::SetOperator::Except),
            Token::Keyword(Keyword::Intersect) => Some(ast::SetOperator::Intersect),
            Token::Keyword(Keyword::Union) => Some(ast::SetOperator::Union),
            _ => None,
        }) {
            let all = self.next_is(Keyword::All.into());
            compounds.push((operator, all, self.parse_select_core()?));
        }

        Ok(ast::Statement::Select(ast::Query {
            select,
            compounds,
            order_by: self.parse_order_by_clause()?,
            limit: self
                .next_is(Keyword::Limit.into())
                .then(|| self.parse_expression())
                .transpose()?,
            offset: self
                .next_is(Keyword::Offset.into())
                .then(|| self.parse_expression())
                .transpose()?,
        }))
    }

    /// Parses a SELECT block up to (not including) ORDER BY or a set operator.
    fn parse_select_core(&mut self) -> Result<ast::Select> {
        Ok(ast::Select {
            select: self.parse_select_clause()?,
            from: self.parse_from_clause()?,
            r#where: self.parse_where_clause()?,
            group_by: self.parse_group_by_clause()?,
            having: self.parse_having_clause()?,
        })
    }

    /// Parses a SELECT clause.
    fn parse_select_clause(&mut self) -> Result<Vec<(ast::Expression, Option<String>)>> {
        self.expect(Keyword::Select.into())?;
        let mut select = Vec::new();
        loop {
            if self.next_is(Token::Asterisk) {
                select.push((ast::Expression::All, None));
            } else {
                let expr = self.parse_expression()?;
                let mut alias = None;
                if self.next_is(Keyword::As.into()) || matches!(self.peek()?, Some(Token::Ident(_)))
                {
                    alias = Some(self.next_ident()?);
                }
                select.push((expr, alias));
            }
            if !self.next_is(Token::Comma) {
                break;
            }
        }
        Ok(select)
    }

    /// Parses a FROM clause, if present.
    fn parse_from_clause(&mut self) -> Result<Vec<ast::FromItem>> {
        if !self.next_is(Keyword::From.into()) {
            return Ok(Vec::new());
        }
        let mut from = Vec::new();
        loop {
            let mut from_item = self.parse_from_table()?;
            while let Some(r#type) = self.parse_from_join()? {
                let left = Box::new(from_item);
                let right = Box::new(self.parse_from_table()?);
                let mut predicate = None;
                if r#type != ast::JoinType::Cross {
                    self.expect(Keyword::On.into())?;
                    predicate = Some(self.parse_expression()?)
                }
                from_item = ast::FromItem::Join {
                    left,
                    right,
                    r#type,
                    predicate,
                };
            }
            from.push(from_item);
            if !self.next_is(Token::Comma) {
                break;
            }
        }
        Ok(from)
    }

    /// Parses a FROM table.
    fn parse_from_table(&mut self) -> Result<ast::FromItem> {
        let name = self.next_ident()?;
        let mut alias = None;
        if self.next_is(Keyword::As.into()) || matches!(self.peek()?, Some(Token::Ident(_))) {
            alias = Some(self.next_ident()?)
        };
        Ok(ast::FromItem::Table { name, alias })
    }

    /// Parses a FROM JOIN type, if present.
    fn parse_from_join(&mut self) -> Result<Option<ast::JoinType>> {
        if self.next_is(Keyword::Join.into()) {
            return Ok(Some(ast::JoinType::Inner));
        }
        if self.next_is(Keyword::Cross.into()) {
            self.expect(Keyword::Join.into())?;
            return Ok(Some(ast::JoinType::Cross));
        }
        if self.next_is(Keyword::Inner.into()) {
            self.expect(Keyword::Join.into())?;
            return Ok(Some(ast::JoinType::Inner));
        }
        if self.next_is(Keyword::Left.into()) {
            self.next_is(Keyword::Outer.into());
            self.expect(Keyword::Join.into())?;
            return Ok(Some(ast::JoinType::Left));
        }
        Ok(None)
    }

    /// Parses a WHERE clause, if present.
    fn parse_where_clause(&mut self) -> Result<Option<ast::Expression>> {
        if !self.next_is(Keyword::Where.into()) {
            return Ok(None);
        }
        Ok(Some(self.parse_expression()?))
    }

    /// Parses a GROUP BY clause, if present.
    fn parse_group_by_clause(&mut self) -> Result<Vec<ast::Expression>> {
        if !self.next_is(Keyword::Group.into()) {
            return Ok(Vec::new());
        }
        let mut group_by = Vec::new();
        self.expect(Keyword::By.into())?;
        loop {
            group_by.push(self.parse_expression()?);
            if !self.next_is(Token::Comma) {
                break;
            }
        }
        Ok(group_by)
    }

    /// Parses a HAVING clause, if present.
    fn parse_having_clause(&mut self) -> Result<Option<ast::Expression>> {
        if !self.next_is(Keyword::Having.into()) {
            return Ok(None);
        }
        Ok(Some(self.parse_expression()?))
    }

    /// Parses an ORDER BY clause, if present.
    fn parse_order_by_clause(&mut self) -> Result<Vec<(ast::Expression, ast::Direction)>> {
        if !self.next_is(Keyword::Order.into()) {
            return Ok(Vec::new());
        }
        let mut order_by = Vec::new();
        self.expect(Keyword::By.into())?;
        loop {
            let expr = self.parse_expression()?;
            let order = self
                .next_if_map(|token| match token {
                    Token::Keyword(Keyword::Asc) => Some(ast::Direction::Ascending),
                    Token::Keyword(Keyword::Desc) => Some(ast::Direction::Descending),
                    _ => None,
                })
                .unwrap_or_default();
            order_by.push((expr, order));
            if !self.next_is(Token::Comma) {
                break;
            }
        }
        Ok(order_by)
    }

    /// Parses an expression.
    pub fn parse_expression(&mut self) -> Result<ast::Expression> {
        self.parse_expression_at(0)
    }

    /// Parses an expression at the given minimum precedence, using precedence
    /// climbing. An operator binds to the expression on its left if its
    /// precedence is at least `min_precedence`.
    fn parse_expression_at(&mut self, min_precedence: Precedence) -> Result<ast::Expression> {
        let mut lhs = if let Some(prefix) = self.parse_prefix_operator_at(min_precedence) {
            let next_precedence = prefix.precedence() + prefix.associativity();
            let rhs = self.parse_expression_at(next_precedence)?;
            prefix.into_expression(rhs)
        } else {
            self.parse_expression_atom()?
        };

        loop {
            if let Some(postfix) = self.parse_postfix_operator_at(min_precedence)? {
                lhs = postfix.into_expression(lhs);
                continue;
            }
            if let Some(infix) = self.parse_infix_operator_at(min_precedence) {
                let next_precedence = infix.precedence() + infix.associativity();
                let rhs = self.parse_expression_at(next_precedence)?;
                lhs = infix.into_expression(lhs, rhs);
                continue;
            }
            break;
        }
        Ok(lhs)
    }

    /// Parses an expression atom: a literal, column, function call or
    /// parenthesized expression.
    fn parse_expression_atom(&mut self) -> Result<ast::Expression> {
        Ok(match self.next()? {
            // Literal values.
            Token::Number(n) if n.contains('.') => {
                let decimal: Decimal = n
                    .parse()
                    .map_err(|_| crate::common::Error::InvalidInput(format!("invalid decimal {n}")))?;
                ast::Literal::Decimal(decimal).into()
            }
            Token::Number(n) => ast::Literal::Integer(n.parse()?).into(),
            Token::String(s) => ast::Literal::String(s).into(),
            Token::Keyword(Keyword::True) => ast::Literal::Boolean(true).into(),
            Token::Keyword(Keyword::False) => ast::Literal::Boolean(false).into(),
            Token::Keyword(Keyword::Null) => ast::Literal::Null.into(),

            // Function call, with * allowed as the sole argument, e.g. COUNT(*).
            Token::Ident(name) if self.next_is(Token::OpenParen) => {
                let mut args = Vec::new();
                if self.next_is(Token::Asterisk) {
                    args.push(ast::Expression::All);
                } else if !matches!(self.peek()?, Some(Token::CloseParen)) {
                    loop {
                        args.push(self.parse_expression()?);
                        if !self.next_is(Token::Comma) {
                            break;
                        }
                    }
                }
                self.expect(Token::CloseParen)?;
                ast::Expression::Function(name, args)
            }

            // Column name, either qualified as table.column or unqualified.
            Token::Ident(table) if self.next_is(Token::Period) => {
                ast::Expression::Column(Some(table), self.next_ident()?)
            }
            Token::Ident(column) => ast::Expression::Column(None, column),

            // Parenthesized expression.
            Token::OpenParen => {
                let expr = self.parse_expression()?;
                self.expect(Token::CloseParen)?;
                expr
            }

            token => return errinput!("expected expression atom, found {token}"),
        })
    }

    /// Parses a prefix operator, if there is one and its precedence is at
    /// least min_precedence.
    fn parse_prefix_operator_at(&mut self, min_precedence: Precedence) -> Option<PrefixOperator> {
        self.next_if_map(|token| {
            let operator = match token {
                Token::Keyword(Keyword::Not) => PrefixOperator::Not,
                Token::Minus => PrefixOperator::Minus,
                Token::Plus => PrefixOperator::Plus,
                _ => return None,
            };
            Some(operator).filter(|op| op.precedence() >= min_precedence)
        })
    }

    /// Parses an infix operator, if there is one and its precedence is at
    /// least min_precedence.
    fn parse_infix_operator_at(&mut self, min_precedence: Precedence) -> Option<InfixOperator> {
        self.next_if_map(|token| {
            let operator = match token {
                Token::Asterisk => InfixOperator::Multiply,
                Token::Caret => InfixOperator::Exponentiate,
                Token::Equal => InfixOperator::Equal,
                Token::GreaterThan => InfixOperator::GreaterThan,
                Token::GreaterThanOrEqual => InfixOperator::GreaterThanOrEqual,
                Token::Keyword(Keyword::And) => InfixOperator::And,
                Token::Keyword(Keyword::Or) => InfixOperator::Or,
                Token::LessThan => InfixOperator::LessThan,
                Token::LessThanOrEqual => InfixOperator::LessThanOrEqual,
                Token::Minus => InfixOperator::Subtract,
                Token::NotEqual => InfixOperator::NotEqual,
                Token::Percent => InfixOperator::Remainder,
                Token::Plus => InfixOperator::Add,
                Token::Slash => InfixOperator::Divide,
                _ => return None,
            };
            Some(operator).filter(|op| op.precedence() >= min_precedence)
        })
    }

    /// Parses a postfix operator, if there is one and its precedence is at
    /// least min_precedence: IS [NOT] NULL and [NOT] IN (...).
    fn parse_postfix_operator_at(
        &mut self,
        min_precedence: Precedence,
    ) -> Result<Option<PostfixOperator>> {
        if POSTFIX_PRECEDENCE < min_precedence {
            return Ok(None);
        }
        if self.next_is(Keyword::Is.into()) {
            let not = self.next_is(Keyword::Not.into());
            self.expect(Keyword::Null.into())?;
            return Ok(Some(PostfixOperator::IsNull(not)));
        }
        // NOT is only a postfix operator as part of NOT IN, e.g. not in
        // DEFAULT 0 NOT NULL.
        let mut lookahead = self.lexer.clone();
        let not = matches!(lookahead.next(), Some(Ok(Token::Keyword(Keyword::Not))))
            && matches!(lookahead.next(), Some(Ok(Token::Keyword(Keyword::In))));
        if not {
            self.next()?;
        }
        if !self.next_is(Keyword::In.into()) {
            return Ok(None);
        }
        self.expect(Token::OpenParen)?;
        let mut list = Vec::new();
        loop {
            list.push(self.parse_expression()?);
            if !self.next_is(Token::Comma) {
                break;
            }
        }
        self.expect(Token::CloseParen)?;
        Ok(Some(PostfixOperator::In(list, not)))
    }
}

/// Operator precedence.
type Precedence = u8;

/// Postfix operators bind tighter than comparisons and looser than arithmetic.
const POSTFIX_PRECEDENCE: Precedence = 5;

/// Operator associativity.
const LEFT_ASSOCIATIVE: Precedence = 1;
const RIGHT_ASSOCIATIVE: Precedence = 0;

/// Prefix operators.
enum PrefixOperator {
    Minus,
    Not,
    Plus,
}

impl PrefixOperator {
    fn precedence(&self) -> Precedence {
        match self {
            Self::Not => 3,
            Self::Minus | Self::Plus => 10,
        }
    }

    fn associativity(&self) -> Precedence {
        RIGHT_ASSOCIATIVE
    }

    fn into_expression(self, rhs: ast::Expression) -> ast::Expression {
        let rhs = Box::new(rhs);
        match self {
            Self::Plus => ast::Operator::Identity(rhs).into(),
            Self::Minus => ast::Operator::Negate(rhs).into(),
            Self::Not => ast::Operator::Not(rhs).into(),
        }
    }
}

/// Infix operators.
enum InfixOperator {
    Add,
    And,
    Divide,
    Equal,
    Exponentiate,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Multiply,
    NotEqual,
    Or,
    Remainder,
    Subtract,
}

impl InfixOperator {
    fn precedence(&self) -> Precedence {
        match self {
            Self::Or => 1,
            Self::And => 2,
            // Self::Not => 3
            Self::Equal | Self::NotEqual => 4,
            Self::GreaterThan
            | Self::GreaterThanOrEqual
            | Self::LessThan
            | Self::LessThanOrEqual => 4,
            // postfix IS / IN => 5
            Self::Add | Self::Subtract => 6,
            Self::Multiply | Self::Divide | Self::Remainder => 7,
            Self::Exponentiate => 8,
        }
    }

    fn associativity(&self) -> Precedence {
        match self {
            Self::Exponentiate => RIGHT_ASSOCIATIVE,
            _ => LEFT_ASSOCIATIVE,
        }
    }

    fn into_expression(self, lhs: ast::Expression, rhs: ast::Expression) -> ast::Expression {
        let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));
        match self {
            Self::Add => ast::Operator::Add(lhs, rhs).into(),
            Self::And => ast::Operator::And(lhs, rhs).into(),
            Self::Divide => ast::Operator::Divide(lhs, rhs).into(),
            Self::Equal => ast::Operator::Equal(lhs, rhs).into(),
            Self::Exponentiate => ast::Operator::Exponentiate(lhs, rhs).into(),
            Self::GreaterThan => ast::Operator::GreaterThan(lhs, rhs).into(),
            Self::GreaterThanOrEqual => ast::Operator::GreaterThanOrEqual(lhs, rhs).into(),
            Self::LessThan => ast::Operator::LessThan(lhs, rhs).into(),
            Self::LessThanOrEqual => ast::Operator::LessThanOrEqual(lhs, rhs).into(),
            Self::Multiply => ast::Operator::Multiply(lhs, rhs).into(),
            Self::NotEqual => ast::Operator::NotEqual(lhs, rhs).into(),
            Self::Or => ast::Operator::Or(lhs, rhs).into(),
            Self::Remainder => ast::Operator::Remainder(lhs, rhs).into(),
            Self::Subtract => ast::Operator::Subtract(lhs, rhs).into(),
        }
    }
}

/// Postfix operators.
enum PostfixOperator {
    /// IS NULL, or IS NOT NULL if true.
    IsNull(bool),
    /// IN (list), or NOT IN (list) if true.
    In(Vec<ast::Expression>, bool),
}

impl PostfixOperator {
    fn into_expression(self, lhs: ast::Expression) -> ast::Expression {
        let lhs = Box::new(lhs);
        match self {
            Self::IsNull(not) => ast::Operator::IsNull(lhs, not).into(),
            Self::In(list, not) => ast::Operator::In(lhs, list, not).into(),
        }
    }
}
