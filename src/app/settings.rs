use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cli::{
    Cli, DEFAULT_CACHE_TTL, DEFAULT_REFRESH_INTERVAL, DEFAULT_TICK_INTERVAL, FormatArg,
};

pub const CONFIG_DIR_ENV: &str = "GLOBE_SKY_CONFIG_DIR";
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const DEFAULT_CITY: &str = "Tokyo";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    pub api_key: Option<String>,
    pub default_city: Option<String>,
    pub format: FormatArg,
    pub tick_interval_secs: u64,
    pub refresh_interval_secs: u64,
    pub cache_ttl_secs: u64,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            default_city: None,
            format: FormatArg::Text,
            tick_interval_secs: DEFAULT_TICK_INTERVAL,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL,
            cache_ttl_secs: DEFAULT_CACHE_TTL,
        }
    }
}

impl RuntimeSettings {
    #[must_use]
    pub fn from_cli_defaults(cli: &Cli) -> Self {
        Self {
            api_key: cli.api_key.clone(),
            default_city: None,
            format: cli.format,
            tick_interval_secs: cli.tick_interval,
            refresh_interval_secs: cli.refresh_interval,
            cache_ttl_secs: cli.cache_ttl,
        }
    }

    #[must_use]
    pub fn default_city(&self) -> &str {
        self.default_city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .unwrap_or(DEFAULT_CITY)
    }

    /// Settings key first, then the environment; blank keys count as missing.
    #[must_use]
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .or(env_value)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

pub fn load_runtime_settings(cli: &Cli, enable_disk: bool) -> (RuntimeSettings, Option<PathBuf>) {
    if !enable_disk {
        return (RuntimeSettings::from_cli_defaults(cli), None);
    }
    let path = settings_path();
    (load_runtime_settings_from(cli, path.as_deref()), path)
}

/// Saved values win over built-in defaults; explicit CLI flags win over both.
#[must_use]
pub fn load_runtime_settings_from(cli: &Cli, path: Option<&Path>) -> RuntimeSettings {
    let mut settings = RuntimeSettings::from_cli_defaults(cli);

    if let Some(path) = path
        && let Ok(content) = fs::read_to_string(path)
    {
        match serde_json::from_str::<RuntimeSettings>(&content) {
            Ok(saved) => settings = saved,
            Err(err) => log::warn!("ignoring unreadable settings at {}: {err}", path.display()),
        }
    }

    if cli.api_key.is_some() {
        settings.api_key.clone_from(&cli.api_key);
    }
    if cli.format != FormatArg::Text {
        settings.format = cli.format;
    }
    if cli.tick_interval != DEFAULT_TICK_INTERVAL {
        settings.tick_interval_secs = cli.tick_interval;
    }
    if cli.refresh_interval != DEFAULT_REFRESH_INTERVAL {
        settings.refresh_interval_secs = cli.refresh_interval;
    }
    if cli.cache_ttl != DEFAULT_CACHE_TTL {
        settings.cache_ttl_secs = cli.cache_ttl;
    }
    settings.tick_interval_secs = settings.tick_interval_secs.max(1);
    settings.refresh_interval_secs = settings.refresh_interval_secs.max(1);

    settings
}

pub fn save_runtime_settings(path: &Path, settings: &RuntimeSettings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("creating settings directory failed")?;
    }
    let payload =
        serde_json::to_string_pretty(settings).context("serializing settings payload failed")?;
    fs::write(path, payload).context("writing settings file failed")
}

#[must_use]
pub fn settings_path() -> Option<PathBuf> {
    settings_path_from(std::env::var_os(CONFIG_DIR_ENV), std::env::var_os("HOME"))
}

fn settings_path_from(config_dir: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(base) = config_dir.filter(|dir| !dir.is_empty()) {
        return Some(PathBuf::from(base).join("settings.json"));
    }

    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("globe-sky")
            .join("settings.json"),
    )
}
