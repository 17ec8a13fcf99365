use anyhow::{Context, Result};
use clap::ValueEnum;
use extrato_ingest::AcquisitionConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_extrato_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fallback tracing filter when RUST_LOG is unset
    pub log_level: String,
    pub acquisition: AcquisitionConfig,
    pub batch: BatchSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSection {
    /// Documents processed at once; 1 runs the batch sequentially
    pub concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputSection {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            acquisition: AcquisitionConfig::default(),
            batch: BatchSection::default(),
            output: OutputSection::default(),
        }
    }
}

impl Default for BatchSection {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_extrato_home()?.join("config.toml"))
}

/// Load `path`, or the default config file when `path` is None.
/// A missing default file means defaults; a missing explicit file is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let p = config_path()?;
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let p = save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg = parse_config("[batch]\nconcurrency = 1\n").unwrap();
        assert_eq!(cfg.batch.concurrency, 1);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.output.format, OutputFormat::Text);
        assert_eq!(cfg.acquisition, AcquisitionConfig::default());
    }

    #[test]
    fn test_full_file() {
        let cfg = parse_config(
            r#"
log_level = "debug"

[acquisition]
max_document_bytes = 1024

[output]
format = "csv"
"#,
        )
        .unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.acquisition.max_document_bytes, 1024);
        assert_eq!(cfg.output.format, OutputFormat::Csv);
        assert_eq!(cfg.batch.concurrency, 4);
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let cfg = parse_config(&s).unwrap();
        assert_eq!(cfg.output.format, OutputFormat::Text);
        assert_eq!(cfg.batch.concurrency, 4);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(parse_config("[output]\nformat = \"xml\"\n").is_err());
    }
}
