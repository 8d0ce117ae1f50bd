//! Command-line interface
//!
//! Maintenance tasks that run without starting the HTTP server.

use chrono::Datelike as _;
use clap::{Parser, Subcommand};

use crate::{
    configuration::{
        get_configuration, set_configuration, AppState, Config, State,
    },
    error::Error,
    handler::market_billing,
    helpers::today,
    provider::DatabasePool,
};

/// Municipal revenue collection service
#[derive(Parser)]
#[command(name = "revenue")]
#[command(about = "Municipal revenue collection service", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default if no command specified)
    Serve,

    /// Create missing tables and exit
    Migrate,

    /// Bill one month of market stall rent
    BillMarket {
        /// Billing year, defaults to the current year
        #[arg(long)]
        year: Option<i32>,

        /// Billing month 1-12, defaults to the current month
        #[arg(long)]
        month: Option<u32>,
    },
}

/// Initialize configuration and return Config
pub fn init_config() -> Result<Config, Error> {
    set_configuration()?;
    get_configuration()
}

/// Connects and applies the schema files; every subcommand starts here.
pub async fn init_state() -> Result<AppState<State>, Error> {
    let config = init_config()?;
    let database = DatabasePool::new(&config).await?;
    let state = State::new(config, database).await?;
    Ok(AppState::new(state))
}

pub async fn run_migrate() -> Result<(), Error> {
    tracing::info!("Running database migrations...");
    init_state().await?;
    tracing::info!("Migrations complete");
    Ok(())
}

pub async fn run_bill_market(
    year: Option<i32>,
    month: Option<u32>,
) -> Result<(), Error> {
    let now = today();
    let year = year.unwrap_or(now.year());
    let month = month.unwrap_or(now.month());

    let app_state = init_state().await?;
    let summary = market_billing::generate(&app_state, year, month).await?;

    tracing::info!(
        "Billed {} new rent row(s) for {}-{:02}",
        summary.billed,
        summary.year,
        summary.month
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["revenue"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_bill_market_args() {
        let cli = Cli::try_parse_from([
            "revenue",
            "bill-market",
            "--year",
            "2026",
            "--month",
            "5",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::BillMarket { year, month }) => {
                assert_eq!(year, Some(2026));
                assert_eq!(month, Some(5));
            },
            _ => panic!("expected bill-market"),
        }
    }

    #[test]
    fn test_unknown_command_fails() {
        assert!(Cli::try_parse_from(["revenue", "backfill"]).is_err());
    }
}
