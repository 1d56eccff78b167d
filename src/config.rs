use crate::input::DEFAULT_MAX_TERM_MONTHS;
use crate::schedule::PaymentType;
use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Environment variable naming the settings file.
pub const CONFIG_ENV: &str = "LOANCALC_CONFIG";
/// Looked up in the working directory when `CONFIG_ENV` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "loancalc.json";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormPreset {
    pub amount: String,
    pub term: String,
    pub rate: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub max_term_months: u32,
    pub export_dir: PathBuf,
    pub payment_type: PaymentType,
    pub loan: FormPreset,
    pub deposit: FormPreset,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_term_months: DEFAULT_MAX_TERM_MONTHS,
            export_dir: PathBuf::from("."),
            payment_type: PaymentType::default(),
            loan: FormPreset::default(),
            deposit: FormPreset::default(),
        }
    }
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(text).context("malformed settings")?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// `LOANCALC_CONFIG` if set, else `loancalc.json` if present, else defaults.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };
        let settings = Self::from_file(&path)?;
        info!("loaded settings from {}", path.display());
        Ok(settings)
    }
}
