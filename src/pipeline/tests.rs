use super::*;
use crate::config::Settings;
use crate::dataset::{self, GAME_SALES, REVIEWS};
use crate::sql::engine::Local;
use crate::storage::Memory;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn run(engine: &Local<Memory>, settings: PipelineSettings) -> Report {
    let mut session = engine.session().unwrap();
    Pipeline::new(settings).run(&mut session)
}

fn seeded() -> Local<Memory> {
    let engine = Local::new(Memory::new());
    dataset::seed(&mut engine.session().unwrap()).unwrap();
    engine
}

/// Renders a step's result as rows of displayed values.
fn cells(report: &Report, id: usize) -> Vec<Vec<String>> {
    report
        .result(id)
        .unwrap()
        .rows
        .iter()
        .map(|row| row.iter().map(|field| field.to_string()).collect())
        .collect()
}

#[test]
fn test_pipeline_passes() {
    let engine = seeded();
    let report = run(&engine, Settings::default().pipeline);
    for step in &report.steps {
        assert_eq!(step.outcome, Outcome::Passed, "step {}: {}", step.id, step.sql);
    }
    assert_eq!(report.steps.len(), 8);
    assert!(report.passed());
    assert_eq!(report.failures().count(), 0);

    assert_eq!(cells(&report, 2), vec![vec!["31"]]);
    assert_eq!(cells(&report, 3)[0], vec!["1990", "9.80"]);
    assert_eq!(
        report.result(4).unwrap().column_names(),
        vec!["year", "avg_critic_score", "num_games"]
    );
    assert_eq!(
        cells(&report, 5),
        vec![
            vec!["1990", "9.80"],
            vec!["1992", "9.67"],
            vec!["2020", "9.50"],
            vec!["1993", "9.40"],
            vec!["1995", "9.20"],
            vec!["1982", "9.00"],
        ]
    );
    assert_eq!(
        report.result(6).unwrap().column_names(),
        vec!["year", "num_games", "avg_user_score"]
    );
    assert_eq!(cells(&report, 7), vec![vec!["1998"], vec!["2002"], vec!["2008"]]);
    assert_eq!(
        cells(&report, 8),
        vec![
            vec!["2008", "175.07"],
            vec!["2002", "131.48"],
            vec!["1998", "104.65"],
        ]
    );
    assert!(report.step(8).unwrap().sql.contains("IN (1998, 2002, 2008)"));
}

#[test]
fn test_materialized_tables() {
    let engine = seeded();
    let report = run(&engine, Settings::default().pipeline);
    assert!(report.passed());

    let mut session = engine.session().unwrap();
    let stored = session.query("SELECT * FROM top_critic_years").unwrap();
    assert_eq!(stored.rows, report.result(3).unwrap().rows);
    assert_eq!(stored.column_names(), vec!["year", "avg_critic_score"]);

    let stored = session
        .query("SELECT year, num_games FROM top_user_years_more_than_four_games WHERE num_games = 10")
        .unwrap();
    assert_eq!(stored.shape(), (2, 2));
    assert!(session
        .query("SELECT * FROM top_critic_years_more_than_four_games")
        .is_ok());
}

#[test]
fn test_rerun_is_idempotent() {
    let engine = seeded();
    let first = run(&engine, Settings::default().pipeline);
    let second = run(&engine, Settings::default().pipeline);
    assert!(first.passed());
    assert_eq!(first, second);
}

#[test]
fn test_insertion_order_independent() {
    let expected = run(&seeded(), Settings::default().pipeline);

    for seed in 0..3 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut sales = GAME_SALES.to_vec();
        let mut reviews = REVIEWS.to_vec();
        sales.shuffle(&mut rng);
        reviews.shuffle(&mut rng);

        let engine = Local::with_batch_size(Memory::new(), 7);
        dataset::seed_rows(&mut engine.session().unwrap(), &sales, &reviews).unwrap();
        let report = run(&engine, Settings::default().pipeline);
        assert!(report.passed(), "seed {seed}");
        for id in 1..=8 {
            assert_eq!(report.result(id), expected.result(id), "seed {seed}, step {id}");
        }
    }
}

#[test]
fn test_violations_are_reported() {
    // Without any reviews, every game counts as missing both scores and no
    // year has reviewed games.
    let engine = Local::new(Memory::new());
    dataset::seed_rows(&mut engine.session().unwrap(), GAME_SALES, &[]).unwrap();
    let report = run(&engine, Settings::default().pipeline);
    assert!(!report.passed());

    assert_eq!(report.step(1).unwrap().outcome, Outcome::Passed);
    assert_eq!(
        report.step(2).unwrap().outcome,
        Outcome::Failed(Violation::Cell {
            row: 0,
            column: "count".into(),
            expected: Field::Integer(31),
            actual: Field::Integer(GAME_SALES.len() as i64),
        })
    );
    assert_eq!(
        report.step(4).unwrap().outcome,
        Outcome::Failed(Violation::Shape {
            expected: (10, 3),
            actual: (0, 3),
        })
    );
    assert!(report.step(8).unwrap().sql.contains("IN (NULL)"));
    assert_eq!(
        report.step(8).unwrap().outcome,
        Outcome::Failed(Violation::Shape {
            expected: (3, 2),
            actual: (0, 2),
        })
    );
    assert_eq!(report.failures().map(|s| s.id).collect::<Vec<_>>(), vec![2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_settings_change_queries() {
    let engine = seeded();
    let report = run(
        &engine,
        PipelineSettings {
            top_n: 5,
            min_games: 4,
        },
    );
    assert_eq!(
        report.step(3).unwrap().outcome,
        Outcome::Failed(Violation::Shape {
            expected: (10, 2),
            actual: (5, 2),
        })
    );
    assert_eq!(cells(&report, 3)[0], vec!["1990", "9.80"]);
}

#[test]
fn test_missing_tables_error() {
    let engine = Local::new(Memory::new());
    let report = run(&engine, Settings::default().pipeline);
    assert!(!report.passed());
    assert_eq!(report.steps.len(), 8);
    for step in &report.steps {
        assert!(matches!(step.outcome, Outcome::Error(_)), "step {}", step.id);
        assert_eq!(step.result, None);
    }
}

#[test]
fn test_unreviewed_year_leads_critic_ranking() {
    // 1975 only has a game without a reviews row, so its average is NULL and
    // sorts ahead of every scored year.
    let mut sales = GAME_SALES.to_vec();
    sales.push(("Tiny Arcade", "2600", "Atari", "Atari", "1.00", 1975));
    let engine = Local::new(Memory::new());
    dataset::seed_rows(&mut engine.session().unwrap(), &sales, REVIEWS).unwrap();
    let report = run(&engine, Settings::default().pipeline);

    assert_eq!(report.step(1).unwrap().outcome, Outcome::Passed);
    assert_eq!(cells(&report, 3)[0], vec!["1975", "NULL"]);
    assert_eq!(cells(&report, 3)[1], vec!["1990", "9.80"]);
    assert_eq!(
        report.step(3).unwrap().outcome,
        Outcome::Failed(Violation::Cell {
            row: 0,
            column: "year".into(),
            expected: Field::Integer(1990),
            actual: Field::Integer(1975),
        })
    );
    assert!(!report.passed());
}
