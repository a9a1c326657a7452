//! Configuration for the rescan service
//!
//! Loaded from a YAML file. Every section is optional so a minimal file
//! only names the targets and triggers it needs.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RescanError, Result};
use crate::models::RewriteRule;

/// Default address the webhook server binds to
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default webhook server port
pub const DEFAULT_PORT: u16 = 3030;

/// Default global log level
pub const DEFAULT_VERBOSITY: &str = "info";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the webhook server binds to
    pub host: String,

    /// Port the webhook server listens on
    pub port: u16,

    /// Global log level
    pub verbosity: String,

    /// Inbound webhook triggers
    pub triggers: TriggersConfig,

    /// Media server targets
    pub targets: TargetsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            verbosity: DEFAULT_VERBOSITY.to_string(),
            triggers: TriggersConfig::default(),
            targets: TargetsConfig::default(),
        }
    }
}

/// Configured triggers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggersConfig {
    /// A-Train webhook trigger
    #[serde(rename = "a-train", skip_serializing_if = "Option::is_none")]
    pub a_train: Option<ATrainConfig>,
}

/// Configured targets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// Emby servers
    pub emby: Vec<EmbyConfig>,
}

/// A-Train trigger configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ATrainConfig {
    /// Priority stamped on every scan this trigger produces
    pub priority: i32,

    /// Global rewrite rules, also appended to every drive's rules
    pub rewrite: Vec<RewriteRule>,

    /// Drives with their own rewrite rules
    pub drives: Vec<DriveConfig>,

    /// Log level for this trigger (empty inherits the global level)
    pub verbosity: String,
}

impl ATrainConfig {
    /// Set the priority
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Add a global rewrite rule
    pub fn add_rewrite(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rewrite.push(RewriteRule::new(from, to));
        self
    }

    /// Add a drive
    pub fn add_drive(mut self, drive: DriveConfig) -> Self {
        self.drives.push(drive);
        self
    }
}

/// Per-drive rewrite rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Drive identifier as it appears in the webhook URL
    pub id: String,

    /// Rules applied before the trigger's global rules
    pub rewrite: Vec<RewriteRule>,
}

impl DriveConfig {
    /// Create a drive without rules
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rewrite: Vec::new(),
        }
    }

    /// Add a rewrite rule
    pub fn add_rewrite(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rewrite.push(RewriteRule::new(from, to));
        self
    }
}

/// Emby target configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbyConfig {
    /// Base URL of the Emby server
    pub url: String,

    /// API key sent as `X-Emby-Token`
    pub token: String,

    /// Rules mapping incoming folders onto the server's filesystem view
    pub rewrite: Vec<RewriteRule>,

    /// Log level for this target (empty inherits the global level)
    pub verbosity: String,
}

impl EmbyConfig {
    /// Create a config for the given server
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            ..Default::default()
        }
    }

    /// Add a rewrite rule
    pub fn add_rewrite(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rewrite.push(RewriteRule::new(from, to));
        self
    }

    /// Set the log level
    pub fn verbosity(mut self, verbosity: impl Into<String>) -> Self {
        self.verbosity = verbosity.into();
        self
    }
}

impl AppConfig {
    /// Create a config builder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::new()
    }

    /// Parse a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RescanError::config_error(format!("failed reading {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&contents)
    }

    /// Socket address string for the webhook server
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the global log level
    pub fn verbosity(mut self, verbosity: impl Into<String>) -> Self {
        self.config.verbosity = verbosity.into();
        self
    }

    /// Configure the A-Train trigger
    pub fn a_train(mut self, a_train: ATrainConfig) -> Self {
        self.config.triggers.a_train = Some(a_train);
        self
    }

    /// Add an Emby target
    pub fn add_emby(mut self, emby: EmbyConfig) -> Self {
        self.config.targets.emby.push(emby);
        self
    }

    /// Build the config
    pub fn build(self) -> AppConfig {
        self.config
    }
}
