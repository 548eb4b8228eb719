//! The two base relations and the built-in sample rows they are seeded with.
pub mod sample;

use crate::common::constants::{GAME_SALES_TABLE, REVIEWS_TABLE};
use crate::common::Result;
use crate::sql::engine::{Engine, Session, StatementResult};
use itertools::Itertools;
pub use sample::{ReviewRecord, SalesRecord, GAME_SALES, REVIEWS};

/// Rows per INSERT statement when seeding.
const INSERT_BATCH: usize = 50;

/// Creates (or recreates, dropping any existing data) the base tables.
pub fn create_tables<'a, E: Engine<'a>>(session: &mut Session<'a, E>) -> Result<()> {
    for table in [GAME_SALES_TABLE, REVIEWS_TABLE] {
        session.execute(&format!("DROP TABLE IF EXISTS {table}"))?;
    }
    session.execute(&format!(
        "CREATE TABLE {GAME_SALES_TABLE} (
            game VARCHAR PRIMARY KEY,
            platform VARCHAR,
            publisher VARCHAR,
            developer VARCHAR,
            games_sold DECIMAL,
            year INT
        )"
    ))?;
    session.execute(&format!(
        "CREATE TABLE {REVIEWS_TABLE} (
            game VARCHAR PRIMARY KEY,
            critic_score DECIMAL,
            user_score DECIMAL
        )"
    ))?;
    Ok(())
}

/// Creates the base tables and loads the built-in sample data.
pub fn seed<'a, E: Engine<'a>>(session: &mut Session<'a, E>) -> Result<(u64, u64)> {
    seed_rows(session, GAME_SALES, REVIEWS)
}

/// Creates the base tables and loads the given rows, in the given order.
/// Returns the number of (sales, reviews) rows inserted.
pub fn seed_rows<'a, E: Engine<'a>>(
    session: &mut Session<'a, E>,
    sales: &[SalesRecord],
    reviews: &[ReviewRecord],
) -> Result<(u64, u64)> {
    create_tables(session)?;
    let sales_values = sales.iter().map(|(game, platform, publisher, developer, sold, year)| {
        format!(
            "({}, {}, {}, {}, {sold}, {year})",
            quote(game),
            quote(platform),
            quote(publisher),
            quote(developer)
        )
    });
    let sales_count = insert_batches(session, GAME_SALES_TABLE, sales_values)?;

    let review_values = reviews.iter().map(|(game, critic, user)| {
        format!(
            "({}, {}, {})",
            quote(game),
            critic.unwrap_or("NULL"),
            user.unwrap_or("NULL")
        )
    });
    let review_count = insert_batches(session, REVIEWS_TABLE, review_values)?;

    log::info!("seeded {sales_count} {GAME_SALES_TABLE} rows and {review_count} {REVIEWS_TABLE} rows");
    Ok((sales_count, review_count))
}

/// Inserts the rendered value tuples in multi-row INSERT statements.
fn insert_batches<'a, E: Engine<'a>>(
    session: &mut Session<'a, E>,
    table: &str,
    values: impl Iterator<Item = String>,
) -> Result<u64> {
    let mut count = 0;
    for chunk in &values.chunks(INSERT_BATCH) {
        let statement = format!("INSERT INTO {table} VALUES {}", chunk.format(", "));
        if let StatementResult::Insert { count: inserted } = session.execute(&statement)? {
            count += inserted;
        }
    }
    Ok(count)
}

/// Renders a SQL string literal.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::engine::Local;
    use crate::storage::Memory;
    use crate::types::field::Field;

    #[test]
    fn test_seed() {
        let engine = Local::new(Memory::new());
        let mut session = engine.session().unwrap();
        assert_eq!(
            seed_rows(&mut session, GAME_SALES, REVIEWS).unwrap(),
            (GAME_SALES.len() as u64, REVIEWS.len() as u64)
        );
        assert_eq!((GAME_SALES.len(), REVIEWS.len()), (155, 129));

        let result = session
            .query("SELECT COUNT(*), SUM(games_sold) FROM game_sales WHERE year = 1982")
            .unwrap();
        assert_eq!(result.rows.len(), 1);

        // decimal literals keep their scale
        let result = session
            .query("SELECT games_sold FROM game_sales ORDER BY games_sold DESC LIMIT 1")
            .unwrap();
        assert_eq!(result.to_string().lines().nth(2), Some("82.90     "));

        // missing scores are stored as NULL
        let result = session
            .query("SELECT critic_score, user_score FROM reviews WHERE game = 'Lunar Legion'")
            .unwrap();
        assert_eq!(result.rows[0].iter().collect::<Vec<_>>(), vec![&Field::Null, &Field::Null]);
    }

    #[test]
    fn test_seed_replaces_tables() {
        let engine = Local::new(Memory::new());
        let mut session = engine.session().unwrap();
        seed(&mut session).unwrap();
        seed_rows(&mut session, &GAME_SALES[..3], &[]).unwrap();
        let result = session.query("SELECT COUNT(*) FROM game_sales").unwrap();
        assert_eq!(result.cell(0, "count"), Some(&Field::Integer(3)));
        let result = session.query("SELECT COUNT(*) FROM reviews").unwrap();
        assert_eq!(result.cell(0, "count"), Some(&Field::Integer(0)));
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("Assassin's Creed"), "'Assassin''s Creed'");
        let engine = Local::new(Memory::new());
        let mut session = engine.session().unwrap();
        let rows: &[SalesRecord] = &[("Assassin's Creed", "PS3", "Ubisoft", "Ubisoft", "4.10", 2007)];
        seed_rows(&mut session, rows, &[]).unwrap();
        let result = session.query("SELECT game FROM game_sales").unwrap();
        assert_eq!(result.cell(0, "game"), Some(&Field::from("Assassin's Creed")));
    }
}
