use crate::common::constants::{NO_TABLE_FOUND_MSG, TABLE_EXISTS_MSG};
use crate::sql::tests::utility::{create_engine, SqlTestRunner};
use itertools::Itertools;

// ================================= Test Tables =================================
const SETUP: &str = "
    CREATE TABLE games (game TEXT PRIMARY KEY, year INT NOT NULL, sold DECIMAL);
    INSERT INTO games VALUES
        ('Doom', 1993, 3.50),
        ('Myst', 1993, 6.00),
        ('Tetris', 1989, 35.00),
        ('Halo', 2001, 5.00),
        ('Zelda', 1998, 7.60);
    CREATE TABLE reviews (game TEXT PRIMARY KEY, critic DECIMAL, user_score DECIMAL);
    INSERT INTO reviews VALUES
        ('Doom', 9.0, 8.5),
        ('Myst', NULL, 7.0),
        ('Zelda', 9.9, NULL),
        ('Pong', 6.0, 6.0);
";

// ==============================================================================

#[test]
fn test_select_star() {
    let engine = create_engine();
    SqlTestRunner::new(&engine)
        .initialize(SETUP)
        .select_expect(
            "SELECT * FROM games WHERE year = 1993",
            "games.game, games.year, games.sold ; \
             'Doom', 1993, 3.50 ; \
             'Myst', 1993, 6.00",
        )
        .select_expect(
            "SELECT * FROM games ORDER BY sold DESC LIMIT 1",
            "games.game, games.year, games.sold ; 'Tetris', 1989, 35.00",
        );
}

#[test]
fn test_select_constant() {
    let engine = create_engine();

    // Selecting a constant emits a single row with the constant field.
    SqlTestRunner::new(&engine)
        .select_expect("SELECT 42", " ; 42")
        .select_expect(
            "SELECT 1 + 2 * 3 AS a, 7 / 2 AS b, ROUND(9.8, 2) AS c, 2 ^ 3 AS d, COALESCE(NULL, 'x') AS e",
            "a, b, c, d, e ; 7, 3, 9.80, 8, 'x'",
        );
}

#[test]
fn test_insert_bulk() {
    let engine = create_engine();
    let bulk_insert = |runner: &mut SqlTestRunner| {
        for i in 0..300 {
            runner.execute(&format!("INSERT INTO t VALUES ({i}, 'row')"));
        }
    };

    SqlTestRunner::new(&engine)
        .execute("CREATE TABLE t (id INT PRIMARY KEY, label TEXT)")
        // Insert a lot of rows...
        .bind(bulk_insert)
        // ...and check to make sure all those rows actually got inserted!
        .select_expect("SELECT COUNT(*), MAX(id) FROM t", "count, max ; 300, 299")
        .select_expect(
            "SELECT id FROM t WHERE id < 5",
            &format!("t.id ; {}", (0..5).join(" ; ")),
        );
}

#[test]
fn test_insert_defaults_and_columns() {
    let engine = create_engine();
    SqlTestRunner::new(&engine)
        .execute("CREATE TABLE t (id INT PRIMARY KEY, title TEXT DEFAULT 'none', score DECIMAL)")
        .execute("INSERT INTO t (id) VALUES (1)")
        .execute("INSERT INTO t (score, id) VALUES (2.5, 2), (3, 3)")
        .select_expect(
            "SELECT * FROM t",
            "t.id, t.title, t.score ; 1, 'none', NULL ; 2, 'none', 2.5 ; 3, 'none', 3",
        )
        .expect_error("INSERT INTO t (title) VALUES ('x')", "no value given for column id")
        .expect_error("INSERT INTO t (id, nope) VALUES (4, 1)", "unknown column nope")
        .expect_error("INSERT INTO t VALUES (4, 'x')", "expected 3 values")
        .expect_error("INSERT INTO t VALUES (4, 5, 1.0)", "can't store");
}

#[test]
fn test_primary_key() {
    let engine = create_engine();
    SqlTestRunner::new(&engine)
        .initialize(SETUP)
        .expect_error("INSERT INTO reviews VALUES ('Doom', 1.0, 1.0)", "primary key 'Doom'")
        .expect_error(
            "INSERT INTO reviews VALUES ('Quake', 1.0, 1.0), ('Quake', 2.0, 2.0)",
            "primary key 'Quake'",
        )
        .expect_error("INSERT INTO reviews VALUES (NULL, 1.0, 1.0)", "NULL value not allowed")
        // failed inserts don't store any rows
        .select_expect("SELECT COUNT(*) FROM reviews", "count ; 4");
}

#[test]
fn test_left_join() {
    let engine = create_engine();
    SqlTestRunner::new(&engine)
        .initialize(SETUP)
        .select_expect(
            "SELECT g.game, r.critic FROM games g LEFT JOIN reviews r ON g.game = r.game ORDER BY g.game",
            "g.game, r.critic ; \
             'Doom', 9.0 ; 'Halo', NULL ; 'Myst', NULL ; 'Tetris', NULL ; 'Zelda', 9.9",
        )
        // games without a review count as having neither score
        .select_expect(
            "SELECT COUNT(*) FROM games AS g LEFT JOIN reviews AS r ON g.game = r.game \
             WHERE r.critic IS NULL AND r.user_score IS NULL",
            "count ; 2",
        )
        // right-side join conditions filter matches, not left rows
        .select_expect(
            "SELECT g.game, r.game FROM games g LEFT JOIN reviews r \
             ON g.game = r.game AND r.critic > 9.5 ORDER BY g.game",
            "g.game, r.game ; \
             'Doom', NULL ; 'Halo', NULL ; 'Myst', NULL ; 'Tetris', NULL ; 'Zelda', 'Zelda'",
        );
}

#[test]
fn test_inner_and_cross_joins() {
    let engine = create_engine();
    SqlTestRunner::new(&engine)
        .initialize(SETUP)
        .select_expect(
            "SELECT g.game, r.user_score FROM games AS g INNER JOIN reviews AS r ON r.game = g.game",
            "g.game, r.user_score ; 'Doom', 8.5 ; 'Myst', 7.0 ; 'Zelda', NULL",
        )
        .select_expect("SELECT COUNT(*) FROM games, reviews", "count ; 20")
        .select_expect("SELECT COUNT(*) FROM games CROSS JOIN reviews", "count ; 20")
        .select_expect(
            "SELECT COUNT(*) FROM games g JOIN reviews r ON g.sold > r.critic",
            "count ; 4",
        );
}

#[test]
fn test_group_by() {
    let engine = create_engine();
    SqlTestRunner::new(&engine)
        .initialize(SETUP)
        .select_expect(
            "SELECT g.year, COUNT(*), SUM(g.sold) AS total FROM games AS g \
             GROUP BY g.year HAVING COUNT(*) > 1 OR g.year = 1989 ORDER BY total DESC",
            "g.year, count, total ; 1989, 1, 35.00 ; 1993, 2, 9.50",
        )
        .select_expect(
            "SELECT g.year, ROUND(AVG(r.critic), 2) AS avg_critic FROM games AS g \
             INNER JOIN reviews AS r ON g.game = r.game GROUP BY g.year ORDER BY avg_critic DESC",
            "g.year, avg_critic ; 1998, 9.90 ; 1993, 9.00",
        )
        .select_expect(
            "SELECT g.year, ROUND(AVG(COALESCE(r.critic, 0)), 2) AS avg_critic FROM games AS g \
             INNER JOIN reviews AS r ON g.game = r.game GROUP BY g.year ORDER BY avg_critic",
            "g.year, avg_critic ; 1993, 4.50 ; 1998, 9.90",
        )
        // years without any critic score lead a descending order
        .select_expect(
            "SELECT g.year, ROUND(AVG(r.critic), 2) AS avg_critic FROM games AS g \
             LEFT JOIN reviews AS r ON g.game = r.game GROUP BY g.year ORDER BY avg_critic DESC",
            "g.year, avg_critic ; 1989, NULL ; 2001, NULL ; 1998, 9.90 ; 1993, 9.00",
        )
        // aggregates over no rows yield a single row
        .select_expect(
            "SELECT COUNT(*), SUM(sold), AVG(sold) FROM games WHERE year > 2020",
            "count, sum, avg ; 0, NULL, NULL",
        );
}

#[test]
fn test_order_by_hidden_columns() {
    let engine = create_engine();
    SqlTestRunner::new(&engine)
        .initialize(SETUP)
        .select_expect(
            "SELECT game FROM games ORDER BY sold DESC LIMIT 2 OFFSET 1",
            "games.game ; 'Zelda' ; 'Myst'",
        )
        .select_expect(
            "SELECT year FROM games GROUP BY year ORDER BY COUNT(*) DESC, year",
            "games.year ; 1993 ; 1989 ; 1998 ; 2001",
        )
        .select_expect(
            "SELECT game, year FROM games ORDER BY 2 DESC, 1 LIMIT 2",
            "games.game, games.year ; 'Halo', 2001 ; 'Zelda', 1998",
        );
}

#[test]
fn test_set_operations() {
    let engine = create_engine();
    SqlTestRunner::new(&engine)
        .initialize(SETUP)
        .select_expect(
            "SELECT year FROM games EXCEPT SELECT year FROM games WHERE sold > 6 ORDER BY year DESC",
            "games.year ; 2001 ; 1993",
        )
        .select_expect(
            "SELECT game FROM reviews UNION SELECT game FROM games ORDER BY game",
            "reviews.game ; 'Doom' ; 'Halo' ; 'Myst' ; 'Pong' ; 'Tetris' ; 'Zelda'",
        )
        .select_expect(
            "SELECT game FROM reviews INTERSECT SELECT game FROM games",
            "reviews.game ; 'Doom' ; 'Myst' ; 'Zelda'",
        )
        .select_expect(
            "SELECT year FROM games WHERE year = 1993 UNION ALL SELECT year FROM games WHERE year = 1993",
            "games.year ; 1993 ; 1993 ; 1993 ; 1993",
        );
}

#[test]
fn test_predicates() {
    let engine = create_engine();
    SqlTestRunner::new(&engine)
        .initialize(SETUP)
        .select_expect(
            "SELECT game FROM games WHERE year IN (1989, 2001) ORDER BY game",
            "games.game ; 'Halo' ; 'Tetris'",
        )
        .select_expect(
            "SELECT game FROM games WHERE year NOT IN (1993) AND sold >= 7.6",
            "games.game ; 'Tetris' ; 'Zelda'",
        )
        .select_expect("SELECT game FROM games WHERE year IN (NULL)", "games.game ;")
        .select_expect(
            "SELECT game FROM reviews WHERE critic IS NOT NULL AND user_score <> 8.5",
            "reviews.game ; 'Pong'",
        )
        .select_expect("SELECT game FROM games WHERE FALSE", "games.game ;");
}

#[test]
fn test_planning_errors() {
    let engine = create_engine();
    SqlTestRunner::new(&engine)
        .initialize(SETUP)
        .expect_error(
            "SELECT game FROM games g JOIN reviews r ON g.game = r.game",
            "ambiguous column name game",
        )
        .expect_error("SELECT foo FROM games", "unknown column foo")
        .expect_error("SELECT x.game FROM games", "unknown table x")
        .expect_error(
            "SELECT game, COUNT(*) FROM games GROUP BY year",
            "must appear in the GROUP BY clause",
        )
        .expect_error("SELECT * FROM nope", NO_TABLE_FOUND_MSG)
        .expect_error("CREATE TABLE games (a INT)", TABLE_EXISTS_MSG)
        .expect_error(
            "SELECT year FROM games UNION SELECT game, year FROM games",
            "same number of columns",
        )
        .expect_error("SELECT year FROM games LIMIT -1", "invalid LIMIT")
        .expect_error("SELECT COUNT(SUM(sold)) FROM games", "can't be nested")
        .expect_error("SELECT * FROM games WHERE COUNT(*) > 1", "not allowed in WHERE")
        .expect_error("SELECT * FROM games g JOIN games g ON TRUE", "duplicate table name g");
}

#[test]
fn test_drop_table() {
    let engine = create_engine();
    SqlTestRunner::new(&engine)
        .initialize(SETUP)
        .execute("DROP TABLE IF EXISTS nope")
        .execute("DROP TABLE reviews")
        .expect_error("SELECT * FROM reviews", NO_TABLE_FOUND_MSG)
        .expect_error("DROP TABLE reviews", NO_TABLE_FOUND_MSG);
}
