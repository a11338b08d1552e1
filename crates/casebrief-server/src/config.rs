//! Server configuration

use casebrief_classifiers::RulesConfig;
use casebrief_store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::ServeArgs;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Record sink
    #[serde(default)]
    pub store: StoreConfig,

    /// Rules file; built-in rules when unset
    #[serde(default)]
    pub rules_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, args: &ServeArgs) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            info!("No configuration at {}, using defaults", config_path);
            Self::default()
        };

        // Apply CLI overrides
        if let Some(listen) = &args.listen {
            config.listen = listen.clone();
        }

        if let Some(port) = args.port {
            config.port = port;
        }

        if let Some(rules) = &args.rules {
            config.rules_path = Some(rules.clone());
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.listen, self.port).parse()?)
    }

    /// Rules named by the configuration, or the built-in ones
    pub fn rules(&self) -> casebrief_core::Result<RulesConfig> {
        match &self.rules_path {
            Some(path) => RulesConfig::from_file(path),
            None => Ok(RulesConfig::default()),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            store: StoreConfig::default(),
            rules_path: None,
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}
