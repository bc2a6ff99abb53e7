//! Exporter configuration: optional TOML file merged with command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const DEFAULT_METRICS_PATH: &str = "/factorio/script-output/metrics.json";
pub const DEFAULT_BIND: &str = "127.0.0.1:9102";

/// Contents of an exporter config file. Every key is optional.
///
/// ```toml
/// path = "/factorio/script-output/metrics.json"
/// bind = "0.0.0.0:9102"
/// verbose = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub path: Option<PathBuf>,
    pub bind: Option<String>,
    pub verbose: Option<bool>,
}

impl ExporterConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: ExporterConfig = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Layer `overrides` on top of `self`: any key set there wins.
    pub fn merge(self, overrides: ExporterConfig) -> Self {
        Self {
            path: overrides.path.or(self.path),
            bind: overrides.bind.or(self.bind),
            verbose: overrides.verbose.or(self.verbose),
        }
    }

    /// Fill in defaults and validate.
    pub fn resolve(self) -> anyhow::Result<Settings> {
        let bind = normalize_bind(self.bind.as_deref().unwrap_or(DEFAULT_BIND))?;
        Ok(Settings {
            path: self
                .path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_METRICS_PATH)),
            bind,
            verbose: self.verbose.unwrap_or(false),
        })
    }
}

/// Check a `host:port` listen address. The host may be a name (resolved when
/// the listener binds), an IPv4 address or a bracketed IPv6 address; an empty
/// host means every interface.
fn normalize_bind(bind: &str) -> anyhow::Result<String> {
    let (host, port) = bind
        .rsplit_once(':')
        .with_context(|| format!("invalid bind address {bind:?}: expected host:port"))?;
    port.parse::<u16>()
        .with_context(|| format!("invalid bind address {bind:?}: bad port {port:?}"))?;
    if host.is_empty() {
        return Ok(format!("0.0.0.0:{port}"));
    }
    if host.contains(':') && !(host.starts_with('[') && host.ends_with(']')) {
        anyhow::bail!("invalid bind address {bind:?}: IPv6 hosts must be bracketed");
    }
    Ok(bind.to_string())
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Snapshot file written by the game-side mod.
    pub path: PathBuf,
    /// `host:port` the HTTP listener binds to.
    pub bind: String,
    /// Debug-level logging for the exporter crates.
    pub verbose: bool,
}
