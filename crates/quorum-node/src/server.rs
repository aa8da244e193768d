//! Binding a node to its network endpoint.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::{create_router, AppState};
use crate::config::NodeConfig;
use crate::readiness::{Readiness, ReadinessBoard};
use crate::service::ConsensusNode;

/// Errors raised while launching a node.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] crate::error::ConfigError),

    /// The endpoint could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address we tried to bind.
        addr: SocketAddr,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The bound address could not be read back.
    #[error("failed to read local address: {0}")]
    LocalAddr(std::io::Error),
}

/// A running node.
pub struct NodeHandle {
    /// Address the node is listening on.
    pub addr: SocketAddr,
    /// The node itself.
    pub node: Arc<ConsensusNode>,
    shutdown: Option<oneshot::Sender<()>>,
    join: JoinHandle<std::io::Result<()>>,
}

impl NodeHandle {
    /// Stops serving requests and waits for the server task to finish.
    pub async fn shutdown(mut self) -> std::io::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.join.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::other(e)),
        }
    }
}

/// Binds the node's endpoint, starts serving, then announces readiness.
///
/// Readiness is only announced once the listener is bound, so a failed bind
/// never marks the node ready.
pub async fn launch_node(
    config: &NodeConfig,
    readiness: Arc<dyn Readiness>,
) -> Result<NodeHandle, LaunchError> {
    config.validate()?;
    let requested = config.listen_addr()?;
    let node_id = config.identity.node_id;

    let listener = TcpListener::bind(requested)
        .await
        .map_err(|source| LaunchError::Bind {
            addr: requested,
            source,
        })?;
    let addr = listener.local_addr().map_err(LaunchError::LocalAddr)?;

    let node = Arc::new(ConsensusNode::new(config.identity, readiness.clone()));
    let router = create_router(AppState::new(node.clone()));

    let (tx, rx) = oneshot::channel::<()>();
    let join = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await
    });

    tracing::info!(
        node_id,
        %addr,
        is_faulty = config.identity.is_faulty,
        "Node active"
    );
    readiness.mark_ready(node_id);

    Ok(NodeHandle {
        addr,
        node,
        shutdown: Some(tx),
        join,
    })
}

/// Launches every node of a network in this process on one shared
/// [`ReadinessBoard`].
///
/// If any node fails to launch, the nodes already running are shut down.
pub async fn launch_network(configs: &[NodeConfig]) -> Result<Vec<NodeHandle>, LaunchError> {
    let board = Arc::new(ReadinessBoard::new(configs.len()));
    let mut handles = Vec::with_capacity(configs.len());

    for config in configs {
        match launch_node(config, board.clone()).await {
            Ok(handle) => handles.push(handle),
            Err(e) => {
                for handle in handles {
                    let _ = handle.shutdown().await;
                }
                return Err(e);
            }
        }
    }

    tracing::info!(
        total_nodes = board.total_nodes(),
        ready = board.ready_count(),
        "Network active"
    );
    Ok(handles)
}
