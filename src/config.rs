use std::env;
use std::path::PathBuf;

use log::debug;
use thiserror::Error;

const DEFAULT_TARGETS_CSV: &str = "targets.csv";
const DEFAULT_INTERVAL_DAYS: u64 = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("service account JSON file not found at: {0}")]
    CredentialsNotFound(String),
    #[error("invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Validated process configuration. Built once at startup; any missing
/// required value aborts before a single network call is made.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub cse_id: String,
    pub credentials_path: PathBuf,
    pub spreadsheet_id: String,
    pub targets_csv: PathBuf,
    pub interval_days: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_key = require("GOOGLE_API_KEY")?;
        let cse_id = require("GOOGLE_CSE_ID")?;
        let credentials = require("GOOGLE_CREDENTIALS_JSON")?;
        let spreadsheet_id = require("SPREADSHEET_ID")?;

        let credentials_path = PathBuf::from(&credentials);
        if !credentials_path.is_file() {
            return Err(ConfigError::CredentialsNotFound(credentials));
        }

        let targets_csv = env::var("TARGETS_CSV")
            .unwrap_or_else(|_| DEFAULT_TARGETS_CSV.to_string())
            .into();

        let interval_days = match env::var("INTERVAL_DAYS") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "INTERVAL_DAYS",
                value,
            })?,
            Err(_) => DEFAULT_INTERVAL_DAYS,
        };

        Ok(Config {
            api_key,
            cse_id,
            credentials_path,
            spreadsheet_id,
            targets_csv,
            interval_days,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    let value = env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))?;
    debug!("{} is set", name);
    Ok(value)
}
