//! Service configuration read once at startup from the environment.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::render::common::default_template_dir;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_OUTPUT_DIR: &str = "generated_dmc";
const DEFAULT_TYPST_BIN: &str = "typst";
const DEFAULT_QRENCODE_BIN: &str = "qrencode";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("DMC_PORT must be a port number, got '{0}'")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    pub typst_bin: String,
    pub qrencode_bin: String,
    /// Overrides the schema's subject columns when set.
    pub subject_columns: Option<Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            template_dir: default_template_dir(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            typst_bin: DEFAULT_TYPST_BIN.to_string(),
            qrencode_bin: DEFAULT_QRENCODE_BIN.to_string(),
            subject_columns: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or blank keys take their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let port = match get("DMC_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => defaults.port,
        };

        let template_dir = match get("DMC_TEMPLATE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => {
                log::info!(
                    "DMC_TEMPLATE_DIR not set, using {}",
                    defaults.template_dir.display()
                );
                defaults.template_dir
            }
        };

        Ok(Self {
            host: get("DMC_HOST").unwrap_or(defaults.host),
            port,
            template_dir,
            output_dir: get("DMC_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            typst_bin: get("DMC_TYPST_BIN").unwrap_or(defaults.typst_bin),
            qrencode_bin: get("DMC_QRENCODE_BIN").unwrap_or(defaults.qrencode_bin),
            subject_columns: get("DMC_SUBJECT_COLUMNS").and_then(|raw| parse_column_list(&raw)),
        })
    }
}

fn parse_column_list(raw: &str) -> Option<Vec<String>> {
    let columns: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|column| !column.is_empty())
        .map(str::to_string)
        .collect();
    if columns.is_empty() {
        None
    } else {
        Some(columns)
    }
}
