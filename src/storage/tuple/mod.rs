mod row;
mod tuple;

#[cfg(test)]
mod tests;

pub use row::{Row, RowIterator, Rows};
pub use tuple::Tuple;
