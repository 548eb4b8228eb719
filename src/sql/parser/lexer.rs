use crate::common::Result;
use crate::errinput;
use std::iter::Peekable;
use std::str::Chars;

/// A lexical token.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// A numeric literal, with or without a fractional part.
    Number(String),
    /// A string literal, with '' escapes resolved.
    String(String),
    /// An identifier. Unquoted identifiers are lowercased.
    Ident(String),
    Keyword(Keyword),
    Period,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Caret,
    Percent,
    Comma,
    Semicolon,
    OpenParen,
    CloseParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Number(n) => n,
            Self::String(s) => return write!(f, "'{s}'"),
            Self::Ident(s) => s,
            Self::Keyword(k) => return k.fmt(f),
            Self::Period => ".",
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Asterisk => "*",
            Self::Slash => "/",
            Self::Caret => "^",
            Self::Percent => "%",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::OpenParen => "(",
            Self::CloseParen => ")",
        })
    }
}

impl From<Keyword> for Token {
    fn from(keyword: Keyword) -> Self {
        Self::Keyword(keyword)
    }
}

/// Reserved SQL keywords.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    All,
    And,
    As,
    Asc,
    Bigint,
    Bool,
    Boolean,
    By,
    Create,
    Cross,
    Decimal,
    Default,
    Desc,
    Double,
    Drop,
    Except,
    Exists,
    False,
    Float,
    From,
    Group,
    Having,
    If,
    In,
    Inner,
    Insert,
    Int,
    Integer,
    Intersect,
    Into,
    Is,
    Join,
    Key,
    Left,
    Limit,
    Not,
    Null,
    Numeric,
    Offset,
    On,
    Or,
    Order,
    Outer,
    Primary,
    Real,
    Select,
    String,
    Table,
    Text,
    True,
    Union,
    Values,
    Varchar,
    Where,
}

impl TryFrom<&str> for Keyword {
    type Error = ();

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        use Keyword::*;
        Ok(match value.to_uppercase().as_str() {
            "ALL" => All,
            "AND" => And,
            "AS" => As,
            "ASC" => Asc,
            "BIGINT" => Bigint,
            "BOOL" => Bool,
            "BOOLEAN" => Boolean,
            "BY" => By,
            "CREATE" => Create,
            "CROSS" => Cross,
            "DECIMAL" => Decimal,
            "DEFAULT" => Default,
            "DESC" => Desc,
            "DOUBLE" => Double,
            "DROP" => Drop,
            "EXCEPT" => Except,
            "EXISTS" => Exists,
            "FALSE" => False,
            "FLOAT" => Float,
            "FROM" => From,
            "GROUP" => Group,
            "HAVING" => Having,
            "IF" => If,
            "IN" => In,
            "INNER" => Inner,
            "INSERT" => Insert,
            "INT" => Int,
            "INTEGER" => Integer,
            "INTERSECT" => Intersect,
            "INTO" => Into,
            "IS" => Is,
            "JOIN" => Join,
            "KEY" => Key,
            "LEFT" => Left,
            "LIMIT" => Limit,
            "NOT" => Not,
            "NULL" => Null,
            "NUMERIC" => Numeric,
            "OFFSET" => Offset,
            "ON" => On,
            "OR" => Or,
            "ORDER" => Order,
            "OUTER" => Outer,
            "PRIMARY" => Primary,
            "REAL" => Real,
            "SELECT" => Select,
            "STRING" => String,
            "TABLE" => Table,
            "TEXT" => Text,
            "TRUE" => True,
            "UNION" => Union,
            "VALUES" => Values,
            "VARCHAR" => Varchar,
            "WHERE" => Where,
            _ => return Err(()),
        })
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keywords are displayed in upper case, e.g. SELECT.
        write!(f, "{}", format!("{self:?}").to_uppercase())
    }
}

/// A lexer tokenizes an input string as an iterator of tokens.
#[derive(Clone)]
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Result<Token>> {
        match self.scan() {
            Ok(Some(token)) => Some(Ok(token)),
            // If there's any remaining chars, the lexer didn't recognize them.
            Ok(None) => match self.chars.peek() {
                Some(c) => Some(errinput!("unexpected character {c}")),
                None => None,
            },
            Err(err) => Some(Err(err)),
        }
    }
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given string.
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            chars: input.chars().peekable(),
        }
    }

    /// Returns the next character if it satisfies the predicate.
    fn next_if(&mut self, predicate: impl Fn(char) -> bool) -> Option<char> {
        self.chars.peek().filter(|&&c| predicate(c))?;
        self.chars.next()
    }

    /// Applies a function to the next character, returning its output and
    /// consuming the character if the function returns Some.
    fn next_if_map<T>(&mut self, map: impl Fn(char) -> Option<T>) -> Option<T> {
        let value = self.chars.peek().and_then(|&c| map(c))?;
        self.chars.next();
        Some(value)
    }

    /// Returns true if the next character is the given character, consuming it.
    fn next_is(&mut self, c: char) -> bool {
        self.next_if(|n| n == c).is_some()
    }

    /// Scans the next token, if any.
    fn scan(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace_and_comments();
        let Some(&c) = self.chars.peek() else {
            return Ok(None);
        };
        match c {
            '\'' => self.scan_string(),
            '"' => self.scan_ident_quoted(),
            '0'..='9' => Ok(self.scan_number()),
            c if c.is_alphabetic() || c == '_' => Ok(self.scan_ident_or_keyword()),
            _ => Ok(self.scan_symbol()),
        }
    }

    /// Skips whitespace and -- line comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.next_if(|c| c.is_whitespace()).is_some() {}
            let mut lookahead = self.chars.clone();
            if lookahead.next() == Some('-') && lookahead.next() == Some('-') {
                while self.next_if(|c| c != '\n').is_some() {}
                continue;
            }
            break;
        }
    }

    /// Scans the next identifier or keyword. Unquoted identifiers are
    /// case-insensitive and normalized to lowercase.
    fn scan_ident_or_keyword(&mut self) -> Option<Token> {
        let mut name = self.next_if(|c| c.is_alphabetic() || c == '_')?.to_string();
        while let Some(c) = self.next_if(|c| c.is_alphanumeric() || c == '_') {
            name.push(c)
        }
        if let Ok(keyword) = Keyword::try_from(name.as_str()) {
            return Some(Token::Keyword(keyword));
        }
        Some(Token::Ident(name.to_lowercase()))
    }

    /// Scans a double-quoted identifier. "" escapes a quote.
    fn scan_ident_quoted(&mut self) -> Result<Option<Token>> {
        if !self.next_is('"') {
            return Ok(None);
        }
        let mut ident = String::new();
        loop {
            match self.chars.next() {
                Some('"') if self.next_is('"') => ident.push('"'),
                Some('"') => break,
                Some(c) => ident.push(c),
                None => return errinput!("unexpected end of quoted identifier"),
            }
        }
        Ok(Some(Token::Ident(ident)))
    }

    /// Scans the next number, e.g. 42 or 82.90.
    fn scan_number(&mut self) -> Option<Token> {
        let mut number = self.next_if(|c| c.is_ascii_digit())?.to_string();
        while let Some(c) = self.next_if(|c| c.is_ascii_digit()) {
            number.push(c)
        }
        if self.chars.peek() == Some(&'.') {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            if lookahead.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.chars.next();
                number.push('.');
                while let Some(c) = self.next_if(|c| c.is_ascii_digit()) {
                    number.push(c)
                }
            }
        }
        Some(Token::Number(number))
    }

    /// Scans the next string literal. '' escapes a quote.
    fn scan_string(&mut self) -> Result<Option<Token>> {
        if !self.next_is('\'') {
            return Ok(None);
        }
        let mut string = String::new();
        loop {
            match self.chars.next() {
                Some('\'') if self.next_is('\'') => string.push('\''),
                Some('\'') => break,
                Some(c) => string.push(c),
                None => return errinput!("unexpected end of string literal"),
            }
        }
        Ok(Some(Token::String(string)))
    }

    /// Scans the next symbol token, if any.
    fn scan_symbol(&mut self) -> Option<Token> {
        let token = self.next_if_map(|c| {
            Some(match c {
                '.' => Token::Period,
                '=' => Token::Equal,
                '>' => Token::GreaterThan,
                '<' => Token::LessThan,
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' => Token::Asterisk,
                '/' => Token::Slash,
                '^' => Token::Caret,
                '%' => Token::Percent,
                ',' => Token::Comma,
                ';' => Token::Semicolon,
                '(' => Token::OpenParen,
                ')' => Token::CloseParen,
                _ => return None,
            })
        });
        // Handle two-character operators.
        match token {
            Some(Token::GreaterThan) if self.next_is('=') => Some(Token::GreaterThanOrEqual),
            Some(Token::LessThan) if self.next_is('>') => Some(Token::NotEqual),
            Some(Token::LessThan) if self.next_is('=') => Some(Token::LessThanOrEqual),
            None if self.chars.peek() == Some(&'!') => {
                let mut lookahead = self.chars.clone();
                lookahead.next();
                if lookahead.next() == Some('=') {
                    self.chars.next();
                    self.chars.next();
                    Some(Token::NotEqual)
                } else {
                    None
                }
            }
            token => token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        Lexer::new(input).collect::<Result<Vec<_>>>().unwrap()
    }

    #[test]
    fn test_keywords_and_idents() {
        assert_eq!(
            lex("SELECT g.Year FROM game_sales AS g"),
            vec![
                Keyword::Select.into(),
                Token::Ident("g".into()),
                Token::Period,
                Token::Ident("year".into()),
                Keyword::From.into(),
                Token::Ident("game_sales".into()),
                Keyword::As.into(),
                Token::Ident("g".into()),
            ]
        );
        // quoted identifiers keep their case and may be keywords
        assert_eq!(lex("\"Order\""), vec![Token::Ident("Order".into())]);
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            lex("82.90 42 'Mario''s'"),
            vec![
                Token::Number("82.90".into()),
                Token::Number("42".into()),
                Token::String("Mario's".into()),
            ]
        );
        assert!(Lexer::new("'open").collect::<Result<Vec<_>>>().is_err());
    }

    #[test]
    fn test_operators_and_comments() {
        assert_eq!(
            lex("a >= 1 -- trailing comment\n<> != <= ^"),
            vec![
                Token::Ident("a".into()),
                Token::GreaterThanOrEqual,
                Token::Number("1".into()),
                Token::NotEqual,
                Token::NotEqual,
                Token::LessThanOrEqual,
                Token::Caret,
            ]
        );
        assert!(Lexer::new("a # b").collect::<Result<Vec<_>>>().is_err());
    }
}
