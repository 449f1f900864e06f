use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;

use crate::models::{InvalidRowPolicy, LoadOptions, MAX_BATCH_SIZE, MAX_IN_FLIGHT};

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub db_max_connections: u32,
    pub csv_path: PathBuf,
    pub batch_size: usize,
    pub max_in_flight: usize,
    pub invalid_rows: InvalidRowPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = var("PORT").unwrap_or_else(|| "3000".to_string()).parse().context("PORT")?;

        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| "sqlite://netflix_etl.db?mode=rwc".to_string());

        let db_max_connections: u32 = parse_or(&var, "DB_MAX_CONNECTIONS", 5)?;

        let csv_path =
            PathBuf::from(var("CSV_PATH").unwrap_or_else(|| "netflix_titles.csv".to_string()));

        let batch_size: usize = parse_or(&var, "LOAD_BATCH_SIZE", 100)?;
        let max_in_flight: usize = parse_or(&var, "LOAD_MAX_IN_FLIGHT", 4)?;
        anyhow::ensure!(
            (1..=MAX_BATCH_SIZE).contains(&batch_size),
            "LOAD_BATCH_SIZE must be between 1 and {MAX_BATCH_SIZE}, got {batch_size}"
        );
        anyhow::ensure!(
            (1..=MAX_IN_FLIGHT).contains(&max_in_flight),
            "LOAD_MAX_IN_FLIGHT must be between 1 and {MAX_IN_FLIGHT}, got {max_in_flight}"
        );

        let invalid_rows = match var("INVALID_ROWS") {
            Some(s) => s.parse().context("INVALID_ROWS")?,
            None => InvalidRowPolicy::default(),
        };

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            db_max_connections,
            csv_path,
            batch_size,
            max_in_flight,
            invalid_rows,
        })
    }

    pub fn load_options(&self, current_year: i32) -> LoadOptions {
        LoadOptions {
            batch_size: self.batch_size,
            max_in_flight: self.max_in_flight,
            invalid_rows: self.invalid_rows,
            current_year,
        }
    }
}

fn parse_or<T>(var: impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(s) => s.trim().parse().with_context(|| key.to_string()),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_original_constants() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.addr.port(), 3000);
        assert_eq!(cfg.database_url, "sqlite://netflix_etl.db?mode=rwc");
        assert_eq!(cfg.csv_path, PathBuf::from("netflix_titles.csv"));
        assert_eq!(cfg.invalid_rows, InvalidRowPolicy::Skip);
        assert_eq!(cfg.batch_size, 100);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = config(&[
            ("PORT", "8080"),
            ("LOAD_BATCH_SIZE", "25"),
            ("LOAD_MAX_IN_FLIGHT", "2"),
            ("INVALID_ROWS", "Abort"),
        ])
        .unwrap();
        assert_eq!(cfg.addr.port(), 8080);

        let opts = cfg.load_options(2026);
        assert_eq!(opts.batch_size, 25);
        assert_eq!(opts.max_in_flight, 2);
        assert_eq!(opts.invalid_rows, InvalidRowPolicy::Abort);
        assert_eq!(opts.current_year, 2026);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(config(&[("PORT", "http")]).is_err());
        assert!(config(&[("LOAD_BATCH_SIZE", "-1")]).is_err());
        assert!(config(&[("INVALID_ROWS", "ignore")]).is_err());
    }

    #[test]
    fn batch_size_is_bounded_by_statement_limit() {
        let at_limit = MAX_BATCH_SIZE.to_string();
        let over_limit = (MAX_BATCH_SIZE + 1).to_string();

        let cfg = config(&[("LOAD_BATCH_SIZE", at_limit.as_str())]).unwrap();
        assert_eq!(cfg.batch_size, MAX_BATCH_SIZE);

        assert!(config(&[("LOAD_BATCH_SIZE", over_limit.as_str())]).is_err());
        assert!(config(&[("LOAD_BATCH_SIZE", "0")]).is_err());
    }

    #[test]
    fn in_flight_is_bounded() {
        let at_limit = MAX_IN_FLIGHT.to_string();
        assert!(config(&[("LOAD_MAX_IN_FLIGHT", at_limit.as_str())]).is_ok());
        assert!(config(&[("LOAD_MAX_IN_FLIGHT", "0")]).is_err());
        assert!(config(&[("LOAD_MAX_IN_FLIGHT", "100000")]).is_err());
    }

    #[test]
    fn channel_capacity_is_capped() {
        let mut opts = LoadOptions::for_year(2025);
        assert_eq!(opts.channel_capacity().unwrap(), 400);

        opts.batch_size = MAX_BATCH_SIZE;
        opts.max_in_flight = MAX_IN_FLIGHT;
        assert_eq!(opts.channel_capacity().unwrap(), crate::models::MAX_CHANNEL_CAPACITY);

        opts.batch_size = usize::MAX / 4;
        opts.max_in_flight = 1;
        assert!(opts.channel_capacity().is_err());
    }
}
