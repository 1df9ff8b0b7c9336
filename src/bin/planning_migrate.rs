//! Creates the planning tables in the configured `PostgreSQL` database.
//!
//! Usage:
//!
//! ```text
//! planning_migrate <config-path>
//! ```
//!
//! The JSON file at `config-path` is read as a
//! [`shopfloor::config::AppConfig`]; `SHOPFLOOR_DATABASE_URL` and
//! `SHOPFLOOR_LOG` override its database URL and log filter. Running the
//! command against a database that already holds the tables is a no-op.

use camino::Utf8PathBuf;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use shopfloor::config::{AppConfig, ConfigError};
use shopfloor::planning::adapters::postgres::SCHEMA_SQL;
use shopfloor::telemetry::init_tracing;
use std::env;
use thiserror::Error;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
enum MigrateError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to obtain a database connection: {0}")]
    Connection(#[source] diesel::r2d2::PoolError),
    #[error("schema migration failed: {0}")]
    Schema(#[from] diesel::result::Error),
}

#[derive(QueryableByName)]
struct SchemaProbe {
    #[diesel(sql_type = Bool)]
    installed: bool,
}

fn main() -> Result<(), BoxError> {
    let args = collect_args()?;
    run(args.into_iter()).map_err(Into::into)
}

fn collect_args() -> Result<Vec<Utf8PathBuf>, MigrateError> {
    env::args_os()
        .map(|arg_os| {
            let arg = arg_os
                .into_string()
                .map_err(|_| MigrateError::InvalidArgs("argument is not valid UTF-8".into()))?;
            Ok(Utf8PathBuf::from(arg))
        })
        .collect()
}

fn parse_args(mut args: impl Iterator<Item = Utf8PathBuf>) -> Result<Utf8PathBuf, MigrateError> {
    let _program = args.next();
    let config_path = args
        .next()
        .ok_or_else(|| MigrateError::InvalidArgs("missing config path argument".into()))?;
    if let Some(extra) = args.next() {
        let extra_arg = extra.as_str();
        return Err(MigrateError::InvalidArgs(format!(
            "unexpected extra argument: {extra_arg}"
        )));
    }
    Ok(config_path)
}

fn run(args: impl Iterator<Item = Utf8PathBuf>) -> Result<(), MigrateError> {
    let config_path = parse_args(args)?;
    let config = AppConfig::load(&config_path)?;
    if init_tracing(&config.telemetry).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }

    let pool = config.database.build_pool()?;
    let mut connection = pool.get().map_err(MigrateError::Connection)?;
    connection.transaction::<_, MigrateError, _>(|tx| {
        let probe = diesel::sql_query(
            "SELECT to_regclass('public.people') IS NOT NULL AS installed",
        )
        .get_result::<SchemaProbe>(tx)?;
        if probe.installed {
            tracing::info!("planning schema already present");
            return Ok(());
        }
        tx.batch_execute(SCHEMA_SQL)?;
        tracing::info!("planning schema created");
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::{MigrateError, parse_args};
    use camino::Utf8PathBuf;
    use rstest::rstest;

    fn args(values: &[&str]) -> impl Iterator<Item = Utf8PathBuf> {
        values
            .iter()
            .map(|value| Utf8PathBuf::from(*value))
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[rstest]
    fn accepts_single_config_path() {
        let path = parse_args(args(&["planning_migrate", "config.json"]))
            .expect("config path should parse");
        assert_eq!(path, Utf8PathBuf::from("config.json"));
    }

    #[rstest]
    #[case::missing(&["planning_migrate"], "missing config path")]
    #[case::extra(&["planning_migrate", "a.json", "b.json"], "unexpected extra argument: b.json")]
    fn rejects_bad_arguments(#[case] values: &[&str], #[case] expected: &str) {
        let err = parse_args(args(values)).expect_err("arguments should be rejected");
        assert!(matches!(err, MigrateError::InvalidArgs(_)));
        assert!(err.to_string().contains(expected), "unexpected error: {err}");
    }
}
