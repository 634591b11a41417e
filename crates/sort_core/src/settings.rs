use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::Context;
use rand::{rngs::StdRng, SeedableRng};
use serde::Deserialize;

use crate::{error::SortError, DEFAULT_DATA_SIZE, DEFAULT_MAX_VALUE, DEFAULT_STEP_DELAY_MS};

pub const DEFAULT_SETTINGS_FILE: &str = "sortviz.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizerSettings {
    pub data_size: usize,
    pub max_value: u32,
    pub step_delay_ms: u64,
    pub seed: Option<u64>,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            data_size: DEFAULT_DATA_SIZE,
            max_value: DEFAULT_MAX_VALUE,
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            seed: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    data_size: Option<usize>,
    max_value: Option<u32>,
    step_delay_ms: Option<u64>,
    seed: Option<u64>,
}

impl VisualizerSettings {
    pub fn validate(&self) -> Result<(), SortError> {
        if self.data_size == 0 {
            return Err(SortError::InvalidSettings(
                "data_size must be at least 1".to_string(),
            ));
        }
        if self.max_value == 0 {
            return Err(SortError::InvalidSettings(
                "max_value must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn apply_file(&mut self, file: FileSettings) {
        if let Some(v) = file.data_size {
            self.data_size = v;
        }
        if let Some(v) = file.max_value {
            self.max_value = v;
        }
        if let Some(v) = file.step_delay_ms {
            self.step_delay_ms = v;
        }
        if file.seed.is_some() {
            self.seed = file.seed;
        }
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_env(&lookup, "APP__DATA_SIZE") {
            self.data_size = v;
        }
        if let Some(v) = parse_env(&lookup, "APP__MAX_VALUE") {
            self.max_value = v;
        }
        if let Some(v) = parse_env(&lookup, "APP__STEP_DELAY_MS") {
            self.step_delay_ms = v;
        }
        if let Some(v) = parse_env(&lookup, "APP__SEED") {
            self.seed = Some(v);
        }
    }
}

fn parse_env<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}

/// Defaults, then the settings file, then `APP__*` environment overrides.
///
/// An explicit `path` must exist; the default `sortviz.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<VisualizerSettings> {
    load_settings_with(path, |name| std::env::var(name).ok())
}

fn load_settings_with<F>(path: Option<&Path>, lookup: F) -> anyhow::Result<VisualizerSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = VisualizerSettings::default();

    let (file_path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
    };

    match fs::read_to_string(&file_path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw).with_context(|| {
                format!("failed to parse settings file '{}'", file_path.display())
            })?;
            settings.apply_file(file_cfg);
            tracing::debug!(path = %file_path.display(), "loaded settings file");
        }
        Err(err) if required => {
            return Err(err).with_context(|| {
                format!("failed to read settings file '{}'", file_path.display())
            });
        }
        Err(_) => {}
    }

    settings.apply_env(lookup);
    Ok(settings)
}
