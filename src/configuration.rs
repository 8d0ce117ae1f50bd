use std::{env, fs, io, ops::Deref, sync::Arc};

use bigdecimal::BigDecimal;

use crate::{
    calculation::{market::MarketTerms, rate, rpt::RptRates},
    dao::get_path,
    error::Error,
    provider::DatabasePool,
};

pub const MIGRATIONS: [&str; 4] = [
    "receipt.sql",
    "rpt.sql",
    "market.sql",
    "business.sql",
];

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub database: DatabasePool,
}

impl State {
    pub async fn new(
        config: Config,
        database: DatabasePool,
    ) -> Result<State, Error> {
        Self::init_migrations(&database).await?;
        Ok(Self { config, database })
    }

    pub async fn init_migrations(database: &DatabasePool) -> Result<(), Error> {
        let dir = env!("CARGO_MANIFEST_DIR");

        for file in MIGRATIONS {
            let data = get_path(dir, file)?;
            for statement in split_statements(&data) {
                sqlx::query(statement).execute(&database.pool).await?;
            }
            tracing::info!("Applied schema file {}", file);
        }

        Ok(())
    }
}

/// MySQL prepared statements take one statement at a time.
pub fn split_statements(data: &str) -> Vec<&str> {
    data.split(';')
        .map(|s| s.trim())
        .filter(|s| {
            s.lines().any(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with("--")
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub static_dir: String,
    pub auth: String,
    pub rpt_rates: RptRates,
    pub market_terms: MarketTerms,
}

impl Config {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

fn var_or(key: &str, default: &str) -> Result<String, Error> {
    match env::var(key) {
        Ok(value) => Ok(value),
        Err(env::VarError::NotPresent) => Ok(default.to_owned()),
        Err(e) => Err(Error::from(e)),
    }
}

fn parse_rate(key: &str, default: &str) -> Result<BigDecimal, Error> {
    let value = var_or(key, default)?;
    rate(&value).map_err(|e| {
        Error::ConfigurationError(format!("{} is not a rate: {}", key, e))
    })
}

pub fn get_configuration() -> Result<Config, Error> {
    let database_url = env::var("DATABASE_URL")?;
    let max_connections: u32 = var_or("MAX_CONNECTIONS", "20")?.parse()?;
    let server_host = env::var("SERVER_HOST")?;
    let port: u16 = env::var("PORT")?.parse()?;
    let allowed_origins = env::var("ALLOWED_ORIGINS")?
        .split(',')
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect::<Vec<String>>();
    let static_dir = format!(
        "{}/{}",
        env!("CARGO_MANIFEST_DIR"),
        var_or("STATIC_DIRECTORY", "public")?
    );
    let auth = env::var("AUTH")?;

    if auth.is_empty() {
        return Err(Error::ConfigurationError(String::from(
            "AUTH must not be empty",
        )));
    }

    let rpt_rates = RptRates {
        basic_rate: parse_rate("RPT_BASIC_RATE", "0.01")?,
        sef_rate: parse_rate("RPT_SEF_RATE", "0.01")?,
        penalty_rate: parse_rate("RPT_PENALTY_RATE", "0.02")?,
        penalty_cap: parse_rate("RPT_PENALTY_CAP", "0.72")?,
        advance_discount: parse_rate("RPT_ADVANCE_DISCOUNT", "0.10")?,
    };

    let due_day: u32 = var_or("MARKET_DUE_DAY", "20")?.parse()?;
    if !(1..=31).contains(&due_day) {
        return Err(Error::ConfigurationError(format!(
            "MARKET_DUE_DAY out of range: {}",
            due_day
        )));
    }

    let market_terms = MarketTerms {
        security_bond_months: var_or("MARKET_SECURITY_BOND_MONTHS", "3")?
            .parse()?,
        due_day,
        surcharge_rate: parse_rate("MARKET_SURCHARGE_RATE", "0.25")?,
    };

    let config = Config {
        database_url,
        max_connections,
        server_host,
        port,
        allowed_origins,
        static_dir,
        auth,
        rpt_rates,
        market_terms,
    };

    Ok(config)
}

pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);

    let config_string = match fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!("No {} found, using the process environment", path);
            return Ok(());
        },
        Err(e) => return Err(Error::from(e)),
    };
    for (key, value) in parse_config_string(&config_string) {
        if env::var_os(key).is_none() {
            env::set_var(key, value);
        }
    }

    Ok(())
}

/// `KEY=VALUE` pairs of an env file. Comments and lines without `=` are
/// skipped.
pub fn parse_config_string(config: &str) -> Vec<(&str, &str)> {
    config
        .lines()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && !s.starts_with('#'))
        .filter_map(|s| s.split_once('='))
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_string() {
        let data = "# database\nDATABASE_URL=mysql://u:p@localhost/rev?ssl=false\n\nPORT = 8080\nbroken line\n=novalue\n";
        let params = parse_config_string(data);
        assert_eq!(
            params,
            vec![
                ("DATABASE_URL", "mysql://u:p@localhost/rev?ssl=false"),
                ("PORT", "8080"),
            ]
        );
    }

    #[test]
    fn test_split_statements() {
        let data = r#"
            -- receipts
            CREATE TABLE IF NOT EXISTS `a` (`id` INT);

            CREATE TABLE IF NOT EXISTS `b` (`id` INT);
            -- trailing comment
        "#;
        let statements = split_statements(data);
        assert_eq!(statements.len(), 2);
        assert!(statements[1].ends_with("(`id` INT)"));
    }

    #[test]
    fn test_migration_files_exist() {
        let dir = env!("CARGO_MANIFEST_DIR");
        for file in MIGRATIONS {
            let data = get_path(dir, file).unwrap();
            assert!(!split_statements(&data).is_empty(), "{} is empty", file);
        }
    }
}
