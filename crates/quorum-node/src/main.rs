//! Quorum Node - one participant of a simulated Byzantine consensus network.

use anyhow::Context;
use clap::Parser;
use quorum_node::config::NodeConfig;
use quorum_node::observability::{init_logging, LogFormat};
use quorum_node::readiness::AlwaysReady;
use quorum_node::server::{launch_network, launch_node, NodeHandle};
use quorum_types::{NodeIdentity, Value};
use std::path::PathBuf;
use std::sync::Arc;

/// Quorum Node - simulated Byzantine consensus participant
#[derive(Parser, Debug)]
#[command(name = "quorum-node")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Index of this node
    #[arg(long)]
    node_id: Option<usize>,

    /// Size of the network
    #[arg(long)]
    total_nodes: Option<usize>,

    /// Number of faulty nodes in the network
    #[arg(long)]
    faulty_count: Option<usize>,

    /// Initial value (0 or 1)
    #[arg(long, value_parser = parse_value)]
    initial_value: Option<Value>,

    /// Run this node as faulty
    #[arg(long)]
    faulty: bool,

    /// Listen host
    #[arg(long)]
    host: Option<String>,

    /// Base port; the node listens on base port + node id
    #[arg(long)]
    base_port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long)]
    log_format: Option<String>,

    /// Launch every node of the network in this process, sharing one
    /// readiness board. Without it only the configured node runs and the
    /// network is assumed ready, since a lone process cannot observe peers.
    #[arg(long)]
    network: bool,

    /// Ids of faulty nodes when launching the whole network (comma separated)
    #[arg(long, value_delimiter = ',', requires = "network")]
    faulty_nodes: Vec<usize>,
}

/// What the binary runs.
#[derive(Debug, PartialEq, Eq)]
enum Launch {
    /// Only the configured node.
    Single(NodeConfig),
    /// Every node of the configured network.
    Network(Vec<NodeConfig>),
}

fn parse_value(s: &str) -> Result<Value, String> {
    match s {
        "0" => Ok(Value::Zero),
        "1" => Ok(Value::One),
        "?" => Ok(Value::Unknown),
        other => Err(format!("expected 0, 1 or ?, got {other}")),
    }
}

impl Args {
    /// Builds the launch plan: file values first, flags on top.
    fn into_launch(self) -> anyhow::Result<Launch> {
        let mut config = match &self.config {
            Some(path) => NodeConfig::load_yaml(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => NodeConfig::new(NodeIdentity::correct(0, 1, 0, Value::Zero)),
        };

        if let Some(node_id) = self.node_id {
            config.identity.node_id = node_id;
        }
        if let Some(total_nodes) = self.total_nodes {
            config.identity.total_nodes = total_nodes;
        }
        if let Some(faulty_count) = self.faulty_count {
            config.identity.faulty_count = faulty_count;
        }
        if let Some(initial_value) = self.initial_value {
            config.identity.initial_value = initial_value;
        }
        if self.faulty {
            config.identity.is_faulty = true;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(base_port) = self.base_port {
            config.base_port = base_port;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = LogFormat::parse(&format);
        }

        config.validate()?;
        if self.network {
            Ok(Launch::Network(config.network(&self.faulty_nodes)?))
        } else {
            Ok(Launch::Single(config))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let launch = Args::parse().into_launch()?;
    let config = match &launch {
        Launch::Single(config) => config,
        Launch::Network(configs) => configs.first().context("network has no nodes")?,
    };

    init_logging(&config.log_level, config.log_format);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting quorum node");
    tracing::info!(
        total_nodes = config.identity.total_nodes,
        faulty_count = config.identity.faulty_count,
        initial_value = %config.identity.initial_value,
        "Network configuration"
    );

    let handles: Vec<NodeHandle> = match &launch {
        Launch::Single(config) => vec![launch_node(config, Arc::new(AlwaysReady)).await?],
        Launch::Network(configs) => launch_network(configs).await?,
    };
    for handle in &handles {
        tracing::info!(
            node_id = handle.node.identity().node_id,
            addr = %handle.addr,
            "Node is ready"
        );
    }
    tracing::info!("Press Ctrl+C to stop.");

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    tracing::info!("Shutting down");
    for handle in handles {
        handle.shutdown().await?;
    }
    Ok(())
}
