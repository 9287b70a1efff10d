//! Runtime settings.
//!
//! Layered the usual way: built-in defaults, then an optional config
//! file, then `HITWATCH_`-prefixed environment variables. CLI flags are
//! merged on top by `main`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use config::{Config, Environment, File};

const DEFAULT_URL: &str = "http://localhost:8080";
const DEFAULT_STATE_FILE: &str = ".hitwatch-ns";
const DEFAULT_REFRESH_MS: i64 = 1000;

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the incr API server.
    pub url: String,
    /// Namespace to open on startup, if configured.
    pub namespace: Option<String>,
    /// Path of the file persisting the last selected namespace.
    pub state_file: PathBuf,
    /// Realtime poll interval in milliseconds.
    pub refresh_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            namespace: None,
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            refresh_ms: DEFAULT_REFRESH_MS as u64,
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional file, and the environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("url", DEFAULT_URL)?
            .set_default("state_file", DEFAULT_STATE_FILE)?
            .set_default("refresh_ms", DEFAULT_REFRESH_MS)?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(Environment::with_prefix("HITWATCH"))
            .build()?;

        Ok(Self {
            url: config.get_string("url")?,
            namespace: config.get_string("namespace").ok().filter(|s| !s.is_empty()),
            state_file: config.get_string("state_file")?.into(),
            refresh_ms: config.get_int("refresh_ms")?.max(1) as u64,
        })
    }
}
