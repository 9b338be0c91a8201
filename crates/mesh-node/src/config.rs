//! TOML-based configuration for mesh nodes.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::NodeError;

/// Top-level node configuration loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct NodeConfig {
    #[serde(default)]
    pub node: NodeSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub hosts: Vec<HostEntry>,
}

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("failed to read config file: {e}")))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s)
            .map_err(|e| NodeError::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Node names must be non-empty and unique, including this node's own.
    fn validate(&self) -> Result<(), NodeError> {
        let mut seen = HashSet::new();
        let names = std::iter::once(self.node.name.as_str())
            .chain(self.hosts.iter().map(|h| h.name.as_str()));
        for name in names {
            if name.is_empty() {
                return Err(NodeError::Config("node name must not be empty".to_string()));
            }
            if !seen.insert(name) {
                return Err(NodeError::Config(format!("duplicate node name '{name}'")));
            }
        }
        Ok(())
    }
}

/// The `[node]` section describing this node.
#[derive(Debug, Deserialize)]
pub struct NodeSection {
    #[serde(default = "default_node_name")]
    pub name: String,
    /// Network name, exported to scripts as `NETNAME`.
    pub netname: Option<String>,
    /// Virtual network device, exported as `DEVICE`.
    pub device: Option<String>,
    /// Interface name, exported as `INTERFACE`.
    pub interface: Option<String>,
    /// Directory holding `subnet-up` / `subnet-down`.
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,
    /// Subnets this node announces.
    #[serde(default)]
    pub subnets: Vec<String>,
}

fn default_node_name() -> String {
    "myself".to_string()
}

fn default_scripts_dir() -> PathBuf {
    PathBuf::from("/etc/mesh")
}

impl Default for NodeSection {
    fn default() -> Self {
        Self {
            name: default_node_name(),
            netname: None,
            device: None,
            interface: None,
            scripts_dir: default_scripts_dir(),
            subnets: Vec::new(),
        }
    }
}

/// The `[logging]` section.
#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// A `[[hosts]]` entry describing another node of the mesh.
#[derive(Debug, Deserialize)]
pub struct HostEntry {
    pub name: String,
    /// Last known `ip:port` of the node.
    pub address: Option<String>,
    #[serde(default = "default_reachable")]
    pub reachable: bool,
    #[serde(default)]
    pub subnets: Vec<String>,
}

fn default_reachable() -> bool {
    true
}

/// Parse a socket address string like "192.0.2.7:655".
pub fn parse_socket_addr(s: &str) -> Result<SocketAddr, NodeError> {
    s.parse()
        .map_err(|e| NodeError::Config(format!("invalid socket address '{s}': {e}")))
}
