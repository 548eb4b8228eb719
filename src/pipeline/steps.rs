use super::check::Expectation;
use crate::common::constants::{
    GAME_SALES_TABLE, REVIEWS_TABLE, TOP_CRITIC_YEARS_MORE_THAN_FOUR_GAMES_TABLE,
    TOP_CRITIC_YEARS_TABLE, TOP_USER_YEARS_MORE_THAN_FOUR_GAMES_TABLE,
};
use crate::config::PipelineSettings;
use crate::types::field::Field;
use itertools::Itertools;
use rust_decimal::Decimal;

/// A single pipeline query and the assertions about its result.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub id: usize,
    pub title: &'static str,
    pub sql: String,
    /// If set, the result is stored as a table with this name for later steps.
    pub materialize: Option<&'static str>,
    pub expectation: Expectation,
}

/// A decimal literal with the given scale, e.g. dec(980, 2) is 9.80.
fn dec(num: i64, scale: u32) -> Decimal {
    Decimal::new(num, scale)
}

/// Returns steps 1 through 7. Step 8 depends on the result of step 7, see
/// [`sales_in_years`].
pub fn plan(settings: &PipelineSettings) -> Vec<Step> {
    let (top_n, min_games) = (settings.top_n, settings.min_games);
    vec![
        Step {
            id: 1,
            title: "best-selling games",
            sql: format!(
                "SELECT *
                 FROM {GAME_SALES_TABLE}
                 ORDER BY games_sold DESC
                 LIMIT {top_n}"
            ),
            materialize: None,
            expectation: Expectation::new(
                10,
                &["game", "platform", "publisher", "developer", "games_sold", "year"],
            )
            .cell(0, "games_sold", dec(8290, 2)),
        },
        Step {
            id: 2,
            title: "games missing review scores",
            sql: format!(
                "SELECT COUNT(*)
                 FROM {GAME_SALES_TABLE} AS g
                 LEFT JOIN {REVIEWS_TABLE} AS r
                 ON g.game = r.game
                 WHERE r.critic_score IS NULL AND r.user_score IS NULL"
            ),
            materialize: None,
            expectation: Expectation::new(1, &["count"]).cell(0, "count", 31),
        },
        Step {
            id: 3,
            title: "years critics loved",
            sql: format!(
                "SELECT g.year,
                        ROUND(AVG(r.critic_score), 2) AS avg_critic_score
                 FROM {GAME_SALES_TABLE} AS g
                 LEFT JOIN {REVIEWS_TABLE} AS r
                 ON g.game = r.game
                 GROUP BY g.year
                 ORDER BY avg_critic_score DESC
                 LIMIT {top_n}"
            ),
            materialize: Some(TOP_CRITIC_YEARS_TABLE),
            expectation: Expectation::new(10, &["year", "avg_critic_score"])
                .cell(0, "year", 1990)
                .cell(0, "avg_critic_score", dec(980, 2)),
        },
        Step {
            id: 4,
            title: "years critics loved, with enough games",
            sql: format!(
                "SELECT g.year,
                        ROUND(AVG(COALESCE(r.critic_score, 0)), 2) AS avg_critic_score,
                        COUNT(g.game) AS num_games
                 FROM {GAME_SALES_TABLE} AS g
                 INNER JOIN {REVIEWS_TABLE} AS r
                 ON g.game = r.game
                 GROUP BY g.year
                 HAVING COUNT(g.game) > {min_games}
                 ORDER BY avg_critic_score DESC
                 LIMIT {top_n}"
            ),
            materialize: Some(TOP_CRITIC_YEARS_MORE_THAN_FOUR_GAMES_TABLE),
            expectation: Expectation::unordered(10, &["year", "num_games", "avg_critic_score"])
                .cell(0, "year", 1998)
                .cell(0, "num_games", 10)
                .cell(0, "avg_critic_score", dec(932, 2)),
        },
        Step {
            id: 5,
            title: "years that dropped off the critics' list",
            sql: format!(
                "SELECT year, avg_critic_score
                 FROM {TOP_CRITIC_YEARS_TABLE}
                 EXCEPT
                 SELECT year, avg_critic_score
                 FROM {TOP_CRITIC_YEARS_MORE_THAN_FOUR_GAMES_TABLE}
                 ORDER BY avg_critic_score DESC"
            ),
            materialize: None,
            expectation: Expectation::new(6, &["year", "avg_critic_score"])
                .cell(5, "year", 1982)
                .cell(5, "avg_critic_score", dec(900, 2)),
        },
        Step {
            id: 6,
            title: "years players loved",
            sql: format!(
                "SELECT g.year,
                        COUNT(g.game) AS num_games,
                        ROUND(AVG(r.user_score), 2) AS avg_user_score
                 FROM {GAME_SALES_TABLE} AS g
                 INNER JOIN {REVIEWS_TABLE} AS r
                 ON g.game = r.game
                 GROUP BY g.year
                 HAVING COUNT(g.game) > {min_games}
                 ORDER BY avg_user_score DESC
                 LIMIT {top_n}"
            ),
            materialize: Some(TOP_USER_YEARS_MORE_THAN_FOUR_GAMES_TABLE),
            expectation: Expectation::unordered(10, &["year", "num_games", "avg_user_score"])
                .cell(0, "year", 1997)
                .cell(0, "num_games", 8)
                .cell(0, "avg_user_score", dec(950, 2)),
        },
        Step {
            id: 7,
            title: "years both critics and players loved",
            sql: format!(
                "SELECT c.year
                 FROM {TOP_CRITIC_YEARS_MORE_THAN_FOUR_GAMES_TABLE} AS c
                 INNER JOIN {TOP_USER_YEARS_MORE_THAN_FOUR_GAMES_TABLE} AS u
                 ON c.year = u.year"
            ),
            materialize: None,
            expectation: Expectation::new(3, &["year"]).cell(0, "year", 1998),
        },
    ]
}

/// Returns step 8, total sales in the given years. No years renders as
/// `IN (NULL)`, which matches nothing.
pub fn sales_in_years(years: &[Field]) -> Step {
    let years = match years {
        [] => "NULL".to_string(),
        years => years.iter().map(sql_literal).join(", "),
    };
    Step {
        id: 8,
        title: "sales in the best years",
        sql: format!(
            "SELECT g.year,
                    SUM(g.games_sold) AS total_games_sold
             FROM {GAME_SALES_TABLE} AS g
             INNER JOIN {REVIEWS_TABLE} AS r
             ON g.game = r.game
             WHERE g.year IN ({years})
             GROUP BY g.year
             ORDER BY total_games_sold DESC"
        ),
        materialize: None,
        expectation: Expectation::new(3, &["year", "total_games_sold"])
            .cell(0, "year", 2008)
            .cell(0, "total_games_sold", dec(17507, 2)),
    }
}

/// Renders a value as a SQL literal, quoting strings.
fn sql_literal(field: &Field) -> String {
    match field {
        Field::String(s) => format!("'{}'", s.replace('\'', "''")),
        field => field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_plan() {
        let steps = plan(&Settings::default().pipeline);
        assert_eq!(steps.iter().map(|s| s.id).collect::<Vec<_>>(), (1..=7).collect::<Vec<_>>());
        assert!(steps[3].sql.contains("HAVING COUNT(g.game) > 4"));
        assert!(steps[3].sql.ends_with("LIMIT 10"));
        assert_eq!(
            steps.iter().filter_map(|s| s.materialize).collect::<Vec<_>>(),
            vec![
                TOP_CRITIC_YEARS_TABLE,
                TOP_CRITIC_YEARS_MORE_THAN_FOUR_GAMES_TABLE,
                TOP_USER_YEARS_MORE_THAN_FOUR_GAMES_TABLE
            ]
        );

        let steps = plan(&PipelineSettings {
            top_n: 3,
            min_games: 7,
        });
        assert!(steps[5].sql.contains("HAVING COUNT(g.game) > 7"));
        assert!(steps[0].sql.ends_with("LIMIT 3"));
    }

    #[test]
    fn test_sales_in_years() {
        let step = sales_in_years(&[Field::Integer(1998), Field::Integer(2002)]);
        assert!(step.sql.contains("WHERE g.year IN (1998, 2002)"));
        let step = sales_in_years(&[]);
        assert!(step.sql.contains("WHERE g.year IN (NULL)"));
    }

    #[test]
    fn test_sales_in_years_quotes_strings() {
        use crate::sql::parser::ast::{Expression, Literal, Operator, Statement};
        use crate::sql::parser::Parser;

        let step = sales_in_years(&[Field::from("1998"), Field::from("19'99"), Field::Null]);
        assert!(step.sql.contains("WHERE g.year IN ('1998', '19''99', NULL)"));

        // The rendered list parses back to string literals.
        let Statement::Select(query) = Parser::new(&step.sql).parse().unwrap() else {
            panic!("expected SELECT");
        };
        let Some(Expression::Operator(Operator::In(_, list, false))) = query.select.r#where else {
            panic!("expected IN");
        };
        assert_eq!(
            list,
            vec![
                Expression::Literal(Literal::String("1998".into())),
                Expression::Literal(Literal::String("19'99".into())),
                Expression::Literal(Literal::Null),
            ]
        );
    }
}
