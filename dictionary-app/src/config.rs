use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use dictionary::{Dictionary, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};

const CONFIG_DIR: &str = "dictionary-app";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// No timeout unless set, the http client defaults apply.
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Program that receives the audio url as its last argument.
    pub player: String,
    pub args: Vec<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            player: "mpv".to_owned(),
            args: vec!["--no-video".to_owned()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    pub const KEYS: [&'static str; 5] = [
        "api.base_url",
        "api.timeout_secs",
        "audio.player",
        "audio.args",
        "log.filter",
    ];

    /// Every setting as `(key, value)`, in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let timeout = self
            .api
            .timeout_secs
            .map_or_else(|| "none".to_owned(), |secs| secs.to_string());
        vec![
            (Self::KEYS[0], self.api.base_url.clone()),
            (Self::KEYS[1], timeout),
            (Self::KEYS[2], self.audio.player.clone()),
            (Self::KEYS[3], self.audio.args.join(" ")),
            (Self::KEYS[4], self.log.filter.clone()),
        ]
    }

    /// Updates one setting from user input.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let value = value.trim();
        match key {
            "api.base_url" => {
                Dictionary::with_base_url(value)?;
                self.api.base_url = value.to_owned();
            }
            "api.timeout_secs" => {
                self.api.timeout_secs = match value {
                    "" | "none" | "off" => None,
                    secs => {
                        let secs: u64 = secs
                            .parse()
                            .with_context(|| format!("{secs:?} is not a number of seconds"))?;
                        if secs == 0 {
                            bail!("timeout must be at least one second");
                        }
                        Some(secs)
                    }
                };
            }
            "audio.player" => {
                if value.is_empty() {
                    bail!("audio player cannot be empty");
                }
                self.audio.player = value.to_owned();
            }
            "audio.args" => {
                self.audio.args = value.split_whitespace().map(str::to_owned).collect();
            }
            "log.filter" => {
                tracing_subscriber::EnvFilter::try_new(value)
                    .with_context(|| format!("invalid log filter {value:?}"))?;
                self.log.filter = value.to_owned();
            }
            other => bail!(
                "unknown setting {other:?}, expected one of: {}",
                Self::KEYS.join(", ")
            ),
        }
        Ok(())
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Loads the config at `path`, falling back to defaults when it doesn't exist.
///
/// Runs before logging is set up, so it reports through its result only.
pub fn load_from(path: &Path) -> anyhow::Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

pub fn save_to(path: &Path, config: &AppConfig) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, toml::to_string_pretty(config)?)?;
    tracing::debug!("Saved config to {:?}", path);
    Ok(())
}
