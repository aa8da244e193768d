//! Network readiness capability.
//!
//! A node never decides whether the whole network is up by itself. It is
//! handed a [`Readiness`] implementation at construction: it announces itself
//! through [`Readiness::mark_ready`] once its endpoint is bound, and reads
//! [`Readiness::all_ready`] when asked to start consensus.

use parking_lot::RwLock;

/// Collaborator that tracks which nodes of the network are up.
pub trait Readiness: Send + Sync {
    /// Whether every node in the network has announced itself.
    fn all_ready(&self) -> bool;

    /// Announces that `node_id` is accepting requests.
    fn mark_ready(&self, node_id: usize);
}

/// In-process readiness board shared by nodes launched in one process.
#[derive(Debug)]
pub struct ReadinessBoard {
    ready: RwLock<Vec<bool>>,
}

impl ReadinessBoard {
    /// Creates a board for a network of `total_nodes`, none ready yet.
    pub fn new(total_nodes: usize) -> Self {
        Self {
            ready: RwLock::new(vec![false; total_nodes]),
        }
    }

    /// Number of nodes that announced themselves.
    pub fn ready_count(&self) -> usize {
        self.ready.read().iter().filter(|ready| **ready).count()
    }

    /// Size of the network this board tracks.
    pub fn total_nodes(&self) -> usize {
        self.ready.read().len()
    }

    /// Whether a specific node announced itself.
    pub fn is_ready(&self, node_id: usize) -> bool {
        self.ready.read().get(node_id).copied().unwrap_or(false)
    }
}

impl Readiness for ReadinessBoard {
    fn all_ready(&self) -> bool {
        self.ready.read().iter().all(|ready| *ready)
    }

    fn mark_ready(&self, node_id: usize) {
        let mut ready = self.ready.write();
        match ready.get_mut(node_id) {
            Some(slot) => {
                *slot = true;
                tracing::debug!(node_id, "Node marked ready");
            }
            None => {
                tracing::warn!(node_id, total_nodes = ready.len(), "Ignoring unknown node id");
            }
        }
    }
}

/// Readiness that always reports the network as up.
///
/// Used when the node runs alone and peers are managed elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysReady;

impl Readiness for AlwaysReady {
    fn all_ready(&self) -> bool {
        true
    }

    fn mark_ready(&self, _node_id: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_tracks_nodes() {
        let board = ReadinessBoard::new(3);
        assert!(!board.all_ready());

        board.mark_ready(0);
        board.mark_ready(2);
        assert_eq!(board.ready_count(), 2);
        assert!(!board.all_ready());
        assert!(!board.is_ready(1));

        board.mark_ready(1);
        assert!(board.all_ready());
    }

    #[test]
    fn test_board_ignores_unknown_ids() {
        let board = ReadinessBoard::new(1);
        board.mark_ready(7);
        assert_eq!(board.ready_count(), 0);
        assert_eq!(board.total_nodes(), 1);
    }

    #[test]
    fn test_mark_ready_twice() {
        let board = ReadinessBoard::new(2);
        board.mark_ready(0);
        board.mark_ready(0);
        assert_eq!(board.ready_count(), 1);
    }

    #[test]
    fn test_always_ready() {
        assert!(AlwaysReady.all_ready());
    }
}
