//! SQL lexing and parsing into an abstract syntax tree.
pub mod ast;
mod lexer;
mod parser;

pub use lexer::{Keyword, Lexer, Token};
pub use parser::Parser;
