use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use stride_core::{Settings, TrainingModel, ZonedClock};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    /// Optional override of the reference training model; missing keys
    /// keep their reference values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<TrainingModel>,
    #[serde(default)]
    pub profile: ProfileSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSection {
    /// IANA timezone used to decide what "today" is.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for ProfileSection {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "America/Chicago".to_string()
}

impl Config {
    /// Settings after applying `RIEGEL_K` / `WEEKLY_VOLUME_CAP` from the
    /// environment on top of the file.
    pub fn effective_settings(&self) -> Settings {
        self.settings.overlay(|key| std::env::var(key).ok())
    }

    pub fn training_model(&self) -> TrainingModel {
        self.model.clone().unwrap_or_default()
    }

    pub fn clock(&self) -> Result<ZonedClock> {
        ZonedClock::from_name(&self.profile.timezone)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}
