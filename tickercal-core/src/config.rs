//! Global tickercal configuration.

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::date_range::ViewMode;
use crate::error::{TickerCalError, TickerCalResult};
use crate::source::fixture::FixtureSource;
use crate::source::provider::Provider;
use crate::source::remote::RemoteSource;
use crate::source::DataSource;

fn default_user() -> String {
    "default".to_string()
}

/// Which data source implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Remote,
    #[default]
    Fixture,
}

/// Global configuration at ~/.config/tickercal/config.toml
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GlobalConfig {
    #[serde(default)]
    pub data_source: SourceKind,

    /// Provider name for the remote source; the binary
    /// `tickercal-provider-<name>` must be on PATH.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Identity used to key the persisted company order.
    #[serde(default = "default_user")]
    pub user: String,

    /// Calendar view used when --view is not given.
    #[serde(default)]
    pub default_view: ViewMode,

    /// Where company-order files live; `~` expands. Defaults to a
    /// directory next to the config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_dir: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        GlobalConfig {
            data_source: SourceKind::default(),
            provider: None,
            user: default_user(),
            default_view: ViewMode::default(),
            order_dir: None,
        }
    }
}

impl GlobalConfig {
    pub fn config_path() -> TickerCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TickerCalError::Config("Could not determine config directory".into()))?
            .join("tickercal");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> TickerCalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        let config: GlobalConfig = Config::builder()
            .add_source(File::from(config_path).required(false))
            .build()
            .map_err(|e| TickerCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| TickerCalError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Save the current config to ~/.config/tickercal/config.toml
    pub fn save(&self) -> TickerCalResult<()> {
        let config_path = Self::config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| TickerCalError::Config(e.to_string()))?;

        std::fs::write(&config_path, content)
            .map_err(|e| TickerCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> TickerCalResult<()> {
        let contents = "\
# tickercal configuration

# Where event and company data comes from: \"remote\" or \"fixture\".
# data_source = \"fixture\"

# Remote provider name (expects a tickercal-provider-<name> binary on PATH).
# provider = \"corpcal\"

# Identity used to key the persisted company order.
# user = \"default\"

# Calendar view used when --view is not given: week, month, 2month, 3month.
# default_view = \"month\"

# Where company-order files live:
# order_dir = \"~/.local/share/tickercal/order\"
";

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Directory for persisted company-order files, with `~` expanded.
    pub fn order_dir(&self) -> TickerCalResult<PathBuf> {
        match &self.order_dir {
            Some(dir) => {
                let expanded = shellexpand::tilde(&dir.to_string_lossy()).into_owned();
                Ok(PathBuf::from(expanded))
            }
            None => {
                let config_dir = dirs::config_dir().ok_or_else(|| {
                    TickerCalError::Config("Could not determine config directory".into())
                })?;
                Ok(config_dir.join("tickercal").join("order"))
            }
        }
    }

    /// The configured remote provider, when one is set up.
    pub fn remote_provider(&self) -> Option<Provider> {
        match self.data_source {
            SourceKind::Remote => self.provider.as_deref().map(Provider::from_name),
            SourceKind::Fixture => None,
        }
    }

    /// Build the configured data source.
    pub fn source(&self) -> TickerCalResult<Box<dyn DataSource>> {
        match self.data_source {
            SourceKind::Fixture => Ok(Box::new(FixtureSource)),
            SourceKind::Remote => {
                let name = self.provider.as_deref().ok_or_else(|| {
                    TickerCalError::Config(
                        "data_source = \"remote\" requires a provider name".into(),
                    )
                })?;
                Ok(Box::new(RemoteSource::new(Provider::from_name(name))))
            }
        }
    }
}
