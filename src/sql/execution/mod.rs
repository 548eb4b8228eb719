//! SQL query execution: volcano-style iterators over rows.
mod aggregate;
mod execute;
mod join;
mod set;
mod source;
mod transform;
mod write;

pub use execute::{execute, execute_plan, ExecutionResult};

#[cfg(test)]
pub(crate) mod test_util {
    use crate::storage::tuple::{Row, Rows};
    use crate::types::field::Field;

    /// Creates a row source from literal rows.
    pub fn rows(data: Vec<Vec<Field>>) -> Rows {
        let rows: Vec<_> = data.into_iter().map(|row| Ok(Row::from(row))).collect();
        Box::new(rows.into_iter())
    }

    /// Collects a row source into plain field vectors.
    pub fn collect(rows: Rows) -> Vec<Vec<Field>> {
        rows.map(|row| row.map(Vec::from))
            .collect::<crate::common::Result<_>>()
            .unwrap()
    }
}
