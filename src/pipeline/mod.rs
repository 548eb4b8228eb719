//! The eight-step analysis over `game_sales` and `reviews`. Each step runs a
//! query, optionally stores its result as a table for later steps, and checks
//! the result against literal expectations.
mod check;
mod steps;
#[cfg(test)]
mod tests;

pub use check::{ColumnCheck, Expectation, Violation};
pub use steps::{plan, sales_in_years, Step};

use crate::common::{Error, Result};
use crate::config::PipelineSettings;
use crate::sql::engine::{Engine, ResultSet, Session};
use crate::types::field::Field;
use std::fmt;

/// The outcome of a single step.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The query ran and every assertion held.
    Passed,
    /// The query ran, but an assertion failed.
    Failed(Violation),
    /// The query (or storing its result) errored.
    Error(Error),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed(violation) => write!(f, "failed: {violation}"),
            Self::Error(err) => write!(f, "error: {err}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    pub id: usize,
    pub title: &'static str,
    pub sql: String,
    /// The query result, unless the query errored.
    pub result: Option<ResultSet>,
    pub outcome: Outcome,
}

/// The outcomes of all steps, in execution order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    pub steps: Vec<StepReport>,
}

impl Report {
    /// Returns true if every step passed.
    pub fn passed(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|s| s.outcome == Outcome::Passed)
    }

    /// Returns the steps that didn't pass.
    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| s.outcome != Outcome::Passed)
    }

    pub fn step(&self, id: usize) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Returns the result set of the given step, if it ran.
    pub fn result(&self, id: usize) -> Option<&ResultSet> {
        self.step(id)?.result.as_ref()
    }
}

/// Runs the analysis steps against a session holding the base tables.
pub struct Pipeline {
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(settings: PipelineSettings) -> Self {
        Self { settings }
    }

    /// Runs all steps in order. A failing step is recorded and the remaining
    /// steps still run.
    pub fn run<'a, E: Engine<'a>>(&self, session: &mut Session<'a, E>) -> Report {
        let mut report = Report::default();
        for step in plan(&self.settings) {
            report.steps.push(Self::run_step(session, step));
        }

        // The final step filters on the years found by the previous one.
        let years: Vec<Field> = report
            .result(7)
            .and_then(|result| result.column("year"))
            .map(|years| years.into_iter().cloned().collect())
            .unwrap_or_default();
        report.steps.push(Self::run_step(session, sales_in_years(&years)));

        let failed = report.failures().count();
        if failed == 0 {
            log::info!("all {} steps passed", report.steps.len());
        } else {
            log::warn!("{failed} of {} steps did not pass", report.steps.len());
        }
        report
    }

    fn run_step<'a, E: Engine<'a>>(session: &mut Session<'a, E>, step: Step) -> StepReport {
        let (result, outcome) = match Self::execute_step(session, &step) {
            Ok(result) => {
                let outcome = match step.expectation.check(&result) {
                    Ok(()) => Outcome::Passed,
                    Err(violation) => Outcome::Failed(violation),
                };
                (Some(result), outcome)
            }
            Err(err) => (None, Outcome::Error(err)),
        };
        match &outcome {
            Outcome::Passed => log::info!("step {} ({}): {outcome}", step.id, step.title),
            _ => log::warn!("step {} ({}): {outcome}", step.id, step.title),
        }
        StepReport {
            id: step.id,
            title: step.title,
            sql: step.sql,
            result,
            outcome,
        }
    }

    /// Runs the step's query and stores the result if requested.
    fn execute_step<'a, E: Engine<'a>>(
        session: &mut Session<'a, E>,
        step: &Step,
    ) -> Result<ResultSet> {
        let result = session.query(&step.sql)?;
        if let Some(table) = step.materialize {
            session.materialize(table, &result)?;
        }
        Ok(result)
    }
}
