use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryCfg {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotCfg {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingCfg {
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingCfg {
    fn default() -> Self {
        Self { filter: default_filter() }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub registry: RegistryCfg,
    pub snapshot: Option<SnapshotCfg>,
    #[serde(default)]
    pub logging: LoggingCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read {}", path.as_ref().display()))?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).context("parse Config.toml")?;
        Ok(cfg)
    }
}
