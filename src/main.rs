use clap::Parser;
use env_logger::Env;
use gamedb::common::Result;
use gamedb::config::Settings;
use gamedb::dataset;
use gamedb::pipeline::{Outcome, Pipeline, Report};
use gamedb::sql::engine::{Engine, Local, ResultSet, Session, StatementResult};
use gamedb::storage::Memory;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::process::ExitCode;

/// Runs the video game sales analysis on an in-memory database.
#[derive(Parser, Debug)]
#[command(name = "gamedb", version)]
struct Args {
    /// Settings file, instead of gamedb.toml
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Open a SQL prompt after the pipeline has run
    #[arg(long)]
    shell: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("gamedb: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the pipeline, and the shell if requested. Returns false if any
/// pipeline step didn't pass.
fn run() -> Result<bool> {
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref())?;
    env_logger::Builder::from_env(Env::default().default_filter_or(&settings.log_level)).init();

    let engine = Local::with_batch_size(Memory::new(), settings.storage.scan_batch_size);
    let mut session = engine.session()?;
    dataset::seed(&mut session)?;
    log::debug!("storage status: {:?}", engine.simple.begin()?.status()?);

    let report = Pipeline::new(settings.pipeline.clone()).run(&mut session);
    print_report(&report);

    if args.shell {
        shell(&mut session)?;
    }
    Ok(report.passed())
}

fn print_report(report: &Report) {
    for step in &report.steps {
        println!("== {}. {} ==", step.id, step.title);
        if let Some(result) = &step.result {
            println!("{result}");
        }
        println!("[check] {}\n", step.outcome);
    }
    let passed = report
        .steps
        .iter()
        .filter(|s| s.outcome == Outcome::Passed)
        .count();
    println!("{passed}/{} steps passed", report.steps.len());
}

/// An interactive SQL prompt over the seeded database.
fn shell<'a, E: Engine<'a>>(session: &mut Session<'a, E>) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    loop {
        let command = match editor.readline("gamedb> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(()),
            Err(err) => return Err(err.into()),
        };
        let command = command.trim();
        if command.is_empty() {
            continue;
        }
        editor.add_history_entry(command)?;
        execute(command, session).unwrap_or_else(|err| println!("oops, {err}"))
    }
}

fn execute<'a, E: Engine<'a>>(command: &str, session: &mut Session<'a, E>) -> Result<()> {
    match session.execute(command)? {
        StatementResult::CreateTable { name } => println!("[console] Created table '{name}'."),
        StatementResult::DropTable { name, existed } => match existed {
            true => println!("[console] Dropped table '{name}'."),
            false => println!("[console] Table '{name}' does not exist."),
        },
        StatementResult::Insert { count } => println!("[console] Inserted {count} rows."),
        StatementResult::Select { columns, rows } => println!("{}", ResultSet { columns, rows }),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> std::result::Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("gamedb").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_args() {
        let args = parse(&[]).unwrap();
        assert_eq!((args.config, args.shell), (None, false));

        let args = parse(&["--shell", "--config", "local.toml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("local.toml")));
        assert!(args.shell);

        let args = parse(&["-c", "other.toml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("other.toml")));

        assert!(parse(&["--config"]).is_err());
        assert_eq!(parse(&["--verbose"]).unwrap_err().kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_args_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
