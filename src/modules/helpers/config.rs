use std::env;

use dotenvy::dotenv;
use log::{info, LevelFilter};

use crate::errors::{CustomResult, InvalidConfigSnafu, MissingConfigSnafu};
use crate::modules::scoring::FastestLapPolicy;

const DEFAULT_LOG_FILE: &str = "program.log";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub logging_level: LevelFilter,
    pub log_file: String,
    pub fastest_lap_policy: FastestLapPolicy,
}

impl Config {
    /// # load the configuration
    /// read the configuration from the environment, a `.env` file is loaded first when present
    ///
    /// ## Returns
    /// * `Config` - the loaded configuration
    pub fn load() -> CustomResult<Config> {
        dotenv().ok();
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// build the configuration from any key lookup, `load` uses the process environment
    pub fn from_lookup<F>(lookup: F) -> CustomResult<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let logging_level = match non_empty("LOGGING_LEVEL") {
            Some(level) => parse_level(&level)?,
            None => LevelFilter::Info,
        };

        let fastest_lap_policy = match non_empty("FASTEST_LAP_POLICY") {
            Some(policy) => policy.parse()?,
            None => FastestLapPolicy::Derived,
        };

        Ok(Config {
            database_url: non_empty("DATABASE_URL"),
            redis_url: non_empty("REDIS_URL"),
            logging_level,
            log_file: non_empty("LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
            fastest_lap_policy,
        })
    }

    pub fn require_database_url(&self) -> CustomResult<&str> {
        match &self.database_url {
            Some(url) => Ok(url),
            None => MissingConfigSnafu { key: "DATABASE_URL" }.fail(),
        }
    }

    pub fn log_summary(&self) {
        info!(target: "config", "fastest lap policy: {}, redis cache: {}",
            self.fastest_lap_policy,
            if self.redis_url.is_some() { "enabled" } else { "disabled" });
    }
}

fn parse_level(level: &str) -> CustomResult<LevelFilter> {
    match level.trim().to_uppercase().as_str() {
        "OFF" => Ok(LevelFilter::Off),
        "ERROR" => Ok(LevelFilter::Error),
        "WARN" => Ok(LevelFilter::Warn),
        "INFO" => Ok(LevelFilter::Info),
        "DEBUG" => Ok(LevelFilter::Debug),
        "TRACE" => Ok(LevelFilter::Trace),
        _ => InvalidConfigSnafu { key: "LOGGING_LEVEL", value: level }.fail(),
    }
}
