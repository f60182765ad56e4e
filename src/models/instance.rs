//! Problem instance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Node;
use crate::distance::DistanceMatrix;

/// Reasons an [`Instance`] cannot be constructed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstanceError {
    /// The instance has no nodes at all, not even a depot.
    #[error("instance must contain at least the depot")]
    Empty,
    /// A node's id does not match its position.
    #[error("node at index {index} has id {id}")]
    IdMismatch {
        /// Position in the node list.
        index: usize,
        /// Id carried by the node.
        id: usize,
    },
    /// The depot carries a prize.
    #[error("depot prize must be 0, got {0}")]
    DepotPrize(u64),
    /// A service duration is negative or not finite.
    #[error("node {node} has invalid duration {duration}")]
    InvalidDuration {
        /// Offending node.
        node: usize,
        /// Its duration.
        duration: f64,
    },
    /// The travel time matrix does not match the node count.
    #[error("distance matrix has size {actual}, expected {expected}")]
    MatrixSize {
        /// Number of nodes.
        expected: usize,
        /// Dimension of the matrix.
        actual: usize,
    },
    /// A travel time is negative or not finite.
    #[error("invalid travel time {value} from {from} to {to}")]
    InvalidDistance {
        /// Origin node.
        from: usize,
        /// Destination node.
        to: usize,
        /// Offending value.
        value: f64,
    },
    /// The prizes add up to more than a `u64` can hold.
    #[error("total prize exceeds {}", u64::MAX)]
    PrizeOverflow,
}

/// Where node prizes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PrizeMode {
    /// Use the prizes given by the source data.
    #[default]
    FromSource,
    /// Every location is worth 1, the depot 0.
    Unit,
}

/// An immutable prize-collecting TSP instance with time windows.
///
/// Node 0 is the depot. Construction validates the data once; solvers
/// assume a well-formed instance afterwards. Deserialization goes through
/// the same checks.
///
/// # Examples
///
/// ```
/// use u_pctw::models::{Instance, Node, TimeWindow};
/// use u_pctw::distance::DistanceMatrix;
///
/// let nodes = vec![
///     Node::depot("depot"),
///     Node::new(1, "a", TimeWindow::new(0.0, 10.0).unwrap(), 1.0, 5),
/// ];
/// let dm = DistanceMatrix::from_rows(vec![vec![0.0, 2.0], vec![2.0, 0.0]]).unwrap();
/// let instance = Instance::new(nodes, dm).unwrap();
/// assert_eq!(instance.node_count(), 2);
/// assert_eq!(instance.prize(1), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "InstanceData")]
pub struct Instance {
    nodes: Vec<Node>,
    distances: DistanceMatrix,
}

/// Unchecked serialized form of an [`Instance`].
#[derive(Deserialize)]
struct InstanceData {
    nodes: Vec<Node>,
    distances: DistanceMatrix,
}

impl TryFrom<InstanceData> for Instance {
    type Error = InstanceError;

    fn try_from(data: InstanceData) -> Result<Self, Self::Error> {
        Self::new(data.nodes, data.distances)
    }
}

impl Instance {
    /// Index of the depot.
    pub const DEPOT: usize = 0;

    /// Creates a validated instance.
    ///
    /// Time windows are not checked against durations: a node that cannot
    /// be served within its window is legal and simply never visited.
    /// The travel time diagonal is forced to zero. The prizes must sum to
    /// at most `u64::MAX`, so no tour prize can overflow.
    pub fn new(nodes: Vec<Node>, mut distances: DistanceMatrix) -> Result<Self, InstanceError> {
        if nodes.is_empty() {
            return Err(InstanceError::Empty);
        }
        for (index, node) in nodes.iter().enumerate() {
            if node.id() != index {
                return Err(InstanceError::IdMismatch {
                    index,
                    id: node.id(),
                });
            }
            if !node.duration().is_finite() || node.duration() < 0.0 {
                return Err(InstanceError::InvalidDuration {
                    node: index,
                    duration: node.duration(),
                });
            }
        }
        if nodes[Self::DEPOT].prize() != 0 {
            return Err(InstanceError::DepotPrize(nodes[Self::DEPOT].prize()));
        }
        if nodes
            .iter()
            .try_fold(0u64, |sum, node| sum.checked_add(node.prize()))
            .is_none()
        {
            return Err(InstanceError::PrizeOverflow);
        }
        if distances.size() != nodes.len() {
            return Err(InstanceError::MatrixSize {
                expected: nodes.len(),
                actual: distances.size(),
            });
        }
        for from in 0..nodes.len() {
            for to in 0..nodes.len() {
                let value = distances.get(from, to);
                if !value.is_finite() || value < 0.0 {
                    return Err(InstanceError::InvalidDistance { from, to, value });
                }
            }
            distances.set(from, from, 0.0);
        }
        Ok(Self { nodes, distances })
    }

    /// Returns this instance with prizes replaced according to `mode`.
    pub fn with_prize_mode(mut self, mode: PrizeMode) -> Self {
        if mode == PrizeMode::Unit {
            for node in self.nodes.iter_mut().skip(1) {
                *node = node.clone().with_prize(1);
            }
        }
        self
    }

    /// Number of nodes including the depot.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Ids of all non-depot locations.
    pub fn locations(&self) -> std::ops::Range<usize> {
        1..self.nodes.len()
    }

    /// All nodes (index 0 = depot).
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node with the given id.
    pub fn node(&self, id: usize) -> &Node {
        &self.nodes[id]
    }

    /// The travel time matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Travel time from `from` to `to`.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }

    /// Release time of node `id`.
    pub fn release(&self, id: usize) -> f64 {
        self.nodes[id].release()
    }

    /// Deadline of node `id`.
    pub fn deadline(&self, id: usize) -> f64 {
        self.nodes[id].deadline()
    }

    /// Service duration of node `id`.
    pub fn duration(&self, id: usize) -> f64 {
        self.nodes[id].duration()
    }

    /// Prize of node `id`.
    pub fn prize(&self, id: usize) -> u64 {
        self.nodes[id].prize()
    }

    /// Sum of all prizes, an upper bound on any tour. Never overflows.
    pub fn total_prize(&self) -> u64 {
        self.nodes.iter().map(Node::prize).sum()
    }
}
