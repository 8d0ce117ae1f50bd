use clap::Parser;
use tracing::{error, Level};

use revenue::{
    cli::{self, Cli, Commands},
    error::Error,
    server,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level({
            #[cfg(debug_assertions)]
            {
                Level::DEBUG
            }

            #[cfg(not(debug_assertions))]
            {
                Level::INFO
            }
        })
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let args = Cli::parse();

    match args.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let app_state = match cli::init_state().await {
                Ok(app_state) => app_state,
                Err(e) => return Err(Error::ConfigurationError(e.to_string())),
            };
            server::server_task(&app_state).await
        },
        Commands::Migrate => cli::run_migrate().await,
        Commands::BillMarket { year, month } => {
            cli::run_bill_market(year, month).await
        },
    }
}
