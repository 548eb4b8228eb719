use crate::common::Result;
use crate::errinput;
use crate::types::field::Field;
use core::ops::Deref;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(PartialEq, Eq, Hash, Clone, Debug, Copy, Serialize, Deserialize)]
pub enum DataType {
    Bool,
    Int,
    Float,
    Decimal,
    Text,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Bool => write!(f, "bool"),
            DataType::Int => write!(f, "int"),
            DataType::Float => write!(f, "float"),
            DataType::Decimal => write!(f, "decimal"),
            DataType::Text => write!(f, "varchar"),
        }
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Debug, Serialize, Deserialize)]
pub struct Column {
    /// Column name. Can't be empty.
    name: String,
    /// Column datatype.
    data_type: DataType,
    /// Whether the column allows null values.
    nullable: bool,
    /// The column's default value. If None, the user must specify an explicit
    /// value. Nullable columns default to Null.
    default: Option<Field>,
}

impl Column {
    pub fn new(column_name: &str, dt: DataType, nullable: bool, default: Option<Field>) -> Column {
        Column {
            name: column_name.to_string(),
            data_type: dt,
            nullable,
            default: match default {
                Some(expr) => Some(expr),
                None if nullable => Some(Field::Null),
                None => None,
            },
        }
    }

    pub fn builder() -> ColumnBuilder {
        ColumnBuilder::new()
    }

    pub fn get_data_type(&self) -> DataType {
        self.data_type
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn default(&self) -> Option<&Field> {
        self.default.as_ref()
    }

    /// Checks a value against the column definition, coercing numerics to
    /// the column type where that is lossless enough (e.g. 3 into a decimal).
    pub fn validate(&self, value: Field) -> Result<Field> {
        if value.is_null() && !self.nullable {
            return errinput!("NULL value not allowed for column {}", self.name);
        }
        value.coerce(self.data_type)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.data_type)?;
        if !self.nullable {
            write!(f, " not null")?;
        }
        Ok(())
    }
}

pub struct ColumnBuilder {
    name: Option<String>,
    data_type: Option<DataType>,
    nullable: Option<bool>,
    default: Option<Field>,
}

impl ColumnBuilder {
    fn new() -> Self {
        Self {
            name: None,
            data_type: None,
            nullable: None,
            default: None,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn default(mut self, default: Field) -> Self {
        self.default = Some(default);
        self
    }

    pub fn build(self) -> Result<Column> {
        let Some(name) = self.name.filter(|n| !n.is_empty()) else {
            return errinput!("column name must be specified");
        };
        let Some(data_type) = self.data_type else {
            return errinput!("data type must be specified for column {name}");
        };
        let nullable = self.nullable.unwrap_or(true);
        let default = match self.default {
            Some(value) => Some(value.coerce(data_type)?),
            None => None,
        };
        Ok(Column::new(&name, data_type, nullable, default))
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Debug, Serialize, Deserialize)]
pub struct Table {
    /// The name of the table
    name: String,
    /// The column definitions of the table
    columns: Vec<Column>,
    /// The index of the primary key column, if any. Its values are unique
    /// and never NULL.
    primary_key: Option<usize>,
}

impl Table {
    pub fn new(table_name: &str) -> Table {
        Table {
            name: table_name.to_string(),
            columns: Vec::new(),
            primary_key: None,
        }
    }

    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    pub fn get_column(&self, index: usize) -> &Column {
        &self.columns[index]
    }

    pub fn columns(&self) -> &Vec<Column> {
        &self.columns
    }

    pub fn primary_key(&self) -> Option<usize> {
        self.primary_key
    }

    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    /// If a column exists, returns its index in the schema.
    pub fn field_name_to_index(&self, field_name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.get_name() == field_name)
    }

    /// Validates the table definition itself.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return errinput!("table name can't be empty");
        }
        if self.columns.is_empty() {
            return errinput!("table {} has no columns", self.name);
        }
        if let Some(pk) = self.primary_key {
            match self.columns.get(pk) {
                None => return errinput!("invalid primary key index {pk}"),
                Some(column) if column.is_nullable() => {
                    return errinput!("primary key {} can't be nullable", column.get_name())
                }
                Some(_) => {}
            }
        }
        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.get_name() == column.get_name()) {
                return errinput!("duplicate column {} in table {}", column.get_name(), self.name);
            }
        }
        Ok(())
    }

    /// Validates a row for insertion, coercing each value to its column type.
    pub fn validate_row(&self, row: Vec<Field>) -> Result<Vec<Field>> {
        if row.len() != self.columns.len() {
            return errinput!(
                "table {} has {} columns, got {} values",
                self.name,
                self.columns.len(),
                row.len()
            );
        }
        row.into_iter()
            .zip(self.columns.iter())
            .map(|(value, column)| column.validate(value))
            .collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{column}")?;
            if self.primary_key == Some(i) {
                write!(f, " primary key")?;
            }
        }
        write!(f, ")")
    }
}

impl Deref for Table {
    type Target = Vec<Column>;

    fn deref(&self) -> &Self::Target {
        &self.columns
    }
}

#[derive(Default)]
pub struct TableBuilder {
    name: Option<String>,
    columns: Vec<Column>,
    primary_key: Option<String>,
}

impl TableBuilder {
    pub fn name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn column(&mut self, column_name: &str, dt: DataType, nullable: bool) -> &mut Self {
        self.columns.push(Column::new(column_name, dt, nullable, None));
        self
    }

    pub fn column_from_definition(&mut self, column_definition: Column) -> &mut Self {
        self.columns.push(column_definition);
        self
    }

    /// Marks the named column as the primary key.
    pub fn primary_key(&mut self, column_name: &str) -> &mut Self {
        self.primary_key = Some(column_name.to_string());
        self
    }

    pub fn build(&mut self) -> Result<Table> {
        let Some(name) = self.name.clone() else {
            return errinput!("cannot build a table without a name");
        };
        let mut table = Table::new(&name);
        self.columns
            .iter()
            .for_each(|column| table.add_column(column.clone()));
        if let Some(pk) = &self.primary_key {
            let Some(index) = table.field_name_to_index(pk) else {
                return errinput!("unknown primary key column {pk}");
            };
            table.primary_key = Some(index);
        }
        table.validate()?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales_table() -> Table {
        Table::builder()
            .name("game_sales")
            .column("game", DataType::Text, false)
            .column("games_sold", DataType::Decimal, true)
            .column("year", DataType::Int, true)
            .build()
            .unwrap()
    }

    #[test]
    pub fn test_column_declaration() {
        let column = Column::builder()
            .name("column1")
            .data_type(DataType::Int)
            .nullable(false)
            .build()
            .unwrap();
        assert_eq!(column.to_string(), "column1:int not null");
        assert_eq!(column.default(), None);

        // nullable columns default to NULL
        let column = Column::builder()
            .name("column2")
            .data_type(DataType::Decimal)
            .build()
            .unwrap();
        assert_eq!(column.to_string(), "column2:decimal");
        assert_eq!(column.default(), Some(&Field::Null));

        assert!(Column::builder().data_type(DataType::Int).build().is_err());
        assert!(Column::builder().name("c").build().is_err());
    }

    #[test]
    pub fn test_name_to_idx() {
        let table = sales_table();
        assert_eq!(table.field_name_to_index("game"), Some(0));
        assert_eq!(table.field_name_to_index("year"), Some(2));
        assert_eq!(table.field_name_to_index("foo"), None);
        assert_eq!(table.col_count(), 3);
        assert_eq!(
            table.to_string(),
            "game_sales(game:varchar not null, games_sold:decimal, year:int)"
        );
    }

    #[test]
    pub fn test_invalid_tables() {
        assert!(Table::builder().name("empty").build().is_err());
        assert!(Table::builder()
            .name("dup")
            .column("a", DataType::Int, true)
            .column("a", DataType::Text, true)
            .build()
            .is_err());
        assert!(Table::builder()
            .column("a", DataType::Int, true)
            .build()
            .is_err());
    }

    #[test]
    pub fn test_primary_key() {
        let table = Table::builder()
            .name("reviews")
            .column("game", DataType::Text, false)
            .column("critic_score", DataType::Decimal, true)
            .primary_key("game")
            .build()
            .unwrap();
        assert_eq!(table.primary_key(), Some(0));
        assert_eq!(
            table.to_string(),
            "reviews(game:varchar not null primary key, critic_score:decimal)"
        );

        // nullable or unknown primary key columns are rejected
        assert!(Table::builder()
            .name("reviews")
            .column("game", DataType::Text, true)
            .primary_key("game")
            .build()
            .is_err());
        assert!(Table::builder()
            .name("reviews")
            .column("game", DataType::Text, false)
            .primary_key("title")
            .build()
            .is_err());
    }

    #[test]
    pub fn test_validate_row() {
        let table = sales_table();
        let row = table
            .validate_row(vec!["Wii Sports".into(), Field::Integer(82), Field::Null])
            .unwrap();
        assert_eq!(row[1], Field::decimal("82").unwrap());
        assert_eq!(row[2], Field::Null);

        // NULL in a not-null column, wrong arity, wrong type
        assert!(table
            .validate_row(vec![Field::Null, Field::Null, Field::Null])
            .is_err());
        assert!(table.validate_row(vec!["x".into()]).is_err());
        assert!(table
            .validate_row(vec!["x".into(), "y".into(), Field::Null])
            .is_err());
    }
}
