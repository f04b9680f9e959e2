//! Configuration file (sajt.toml) and command line overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use sajt_server::DevServerConfig;
use sajt_static::BuildConfig;
use serde::Deserialize;

/// Configuration file structure (sajt.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub build: BuildSettings,
}

#[derive(Debug, Deserialize)]
pub struct SiteSettings {
    #[serde(default = "default_source")]
    pub source: PathBuf,
    /// Content type rendered with the dictionary template
    #[serde(default = "default_dictionary")]
    pub dictionary: String,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub open: bool,
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            source: default_source(),
            dictionary: default_dictionary(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            open: false,
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
        }
    }
}

fn default_source() -> PathBuf {
    PathBuf::from("source")
}
fn default_dictionary() -> String {
    "dictionary".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_interval() -> u64 {
    10
}

/// Values given on the command line. They win over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub content: PathBuf,
    pub out: PathBuf,
    pub publish: bool,
    pub source: Option<PathBuf>,
    pub port: Option<u16>,
    pub interval: Option<u64>,
    pub open: bool,
}

/// Everything a run needs, after merging file and command line.
#[derive(Debug)]
pub struct RunSettings {
    pub build: BuildConfig,
    pub server: DevServerConfig,
    pub interval: Duration,
}

impl ConfigFile {
    /// Load the config file if it exists.
    /// Returns an error if the file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn resolve(self, overrides: Overrides) -> RunSettings {
        let build = BuildConfig {
            content_dir: overrides.content,
            source_dir: overrides.source.unwrap_or(self.site.source),
            output_dir: overrides.out.clone(),
            publish: overrides.publish,
            dictionary_type: self.site.dictionary,
        };

        let server = DevServerConfig {
            root: overrides.out,
            port: overrides.port.unwrap_or(self.server.port),
            open: overrides.open || self.server.open,
            ..Default::default()
        };

        RunSettings {
            build,
            server,
            interval: Duration::from_secs(overrides.interval.unwrap_or(self.build.interval_secs)),
        }
    }
}
