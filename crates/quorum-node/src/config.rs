//! Node configuration types.

use quorum_types::{IdentityError, NodeIdentity};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use crate::error::ConfigError;
use crate::observability::LogFormat;

/// Default base port; node `i` listens on `DEFAULT_BASE_PORT + i`.
pub const DEFAULT_BASE_PORT: u16 = 3000;

/// Configuration for one node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NodeConfig {
    /// Identity of the node.
    #[serde(flatten)]
    pub identity: NodeIdentity,

    /// Listen host.
    #[serde(default = "default_host")]
    pub host: String,
    /// Base port of the network.
    #[serde(default = "default_base_port")]
    pub base_port: u16,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log format.
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_base_port() -> u16 {
    DEFAULT_BASE_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl NodeConfig {
    /// Creates a config for `identity` with default networking and logging.
    pub fn new(identity: NodeIdentity) -> Self {
        Self {
            identity,
            host: default_host(),
            base_port: default_base_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }

    /// Sets the base port.
    pub fn with_base_port(mut self, base_port: u16) -> Self {
        self.base_port = base_port;
        self
    }

    /// Loads a config from a YAML file and validates it.
    pub fn load_yaml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: NodeConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates identity and listen address.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.identity.validate()?;
        self.listen_addr()?;
        Ok(())
    }

    /// Configs of every node in this node's network, indexed by node id.
    ///
    /// Nodes listed in `faulty_nodes` are faulty; every other node shares this
    /// config's initial value, fault count and networking.
    pub fn network(&self, faulty_nodes: &[usize]) -> Result<Vec<NodeConfig>, ConfigError> {
        let total_nodes = self.identity.total_nodes;
        if let Some(&node_id) = faulty_nodes.iter().find(|id| **id >= total_nodes) {
            return Err(IdentityError::NodeIdOutOfRange {
                node_id,
                total_nodes,
            }
            .into());
        }

        Ok((0..total_nodes)
            .map(|node_id| {
                let mut config = self.clone();
                config.identity.node_id = node_id;
                config.identity.is_faulty = faulty_nodes.contains(&node_id);
                config
            })
            .collect())
    }

    /// Address this node listens on.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        node_addr(&self.host, self.base_port, self.identity.node_id)
    }
}

/// Address of node `node_id`: `host:(base_port + node_id)`.
///
/// A base port of 0 asks the OS for an ephemeral port.
pub fn node_addr(host: &str, base_port: u16, node_id: usize) -> Result<SocketAddr, ConfigError> {
    let ip: IpAddr = host
        .parse()
        .map_err(|_| ConfigError::InvalidHost(host.to_string()))?;

    if base_port == 0 {
        return Ok(SocketAddr::new(ip, 0));
    }

    let port = u16::try_from(node_id)
        .ok()
        .and_then(|offset| base_port.checked_add(offset))
        .ok_or(ConfigError::PortOverflow { base_port, node_id })?;

    Ok(SocketAddr::new(ip, port))
}
