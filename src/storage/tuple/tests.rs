use super::*;
use crate::types::field::Field;
use crate::types::{DataType, Table};

fn sales_schema() -> Table {
    Table::builder()
        .name("game_sales")
        .column("game", DataType::Text, false)
        .column("games_sold", DataType::Decimal, true)
        .column("year", DataType::Int, true)
        .build()
        .unwrap()
}

#[test]
pub fn test_comparison() {
    let mut fields = vec![
        Field::from(1),
        Field::from(2),
        Field::from(3),
        Field::from(4),
        Field::from(5),
    ];

    // Rows with identical fields should be equal.
    let row = Row::from(fields.clone());
    let row_eq = Row::from(fields.clone());
    assert_eq!(row, row_eq);

    // Rows with some differing fields should not be equal.
    fields[2] = fields[2].clone() + Field::from(2);
    fields[4] = fields[4].clone() + Field::from(2);
    let row_ne = Row::from(fields);
    assert_ne!(row, row_ne);
}

#[test]
pub fn test_mixed_types() {
    let fields = vec![
        Field::from(1),
        Field::from("hello"),
        Field::from(3.14),
        Field::decimal("82.90").unwrap(),
        Field::Null,
        Field::from(true),
    ];

    let row = Row::from(fields.clone());
    assert_eq!(row.size(), fields.len());
    fields
        .iter()
        .enumerate()
        .for_each(|(i, field)| assert_eq!(row.get_field(i).unwrap(), field));
    assert!(row.get_field(fields.len()).is_err());
    assert_eq!(row.to_string(), "1, 'hello', 3.14, 82.90, NULL, TRUE");
}

#[test]
pub fn test_tuple_serialization() {
    let schema = sales_schema();
    let row = Row::from(vec![
        Field::from("Wii Sports"),
        Field::decimal("82.90").unwrap(),
        Field::from(2006),
    ]);

    let tuple = row.to_tuple(&schema).unwrap();
    let decoded = Row::from_tuple(tuple, &schema).unwrap();
    assert_eq!(decoded, row);

    // The decimal scale survives the round trip.
    assert_eq!(decoded.get_field(1).unwrap().to_string(), "82.90");
}

#[test]
pub fn test_tuple_column_count_mismatch() {
    let schema = sales_schema();
    let short = Row::from(vec![Field::from("Tetris")]);
    assert!(short.to_tuple(&schema).is_err());

    let other = Table::builder()
        .name("years")
        .column("year", DataType::Int, true)
        .build()
        .unwrap();
    let tuple = Row::from(vec![Field::from(1998)]).to_tuple(&other).unwrap();
    assert!(Row::from_tuple(tuple, &schema).is_err());
}
