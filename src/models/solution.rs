//! Solution and violation types.

use serde::{Deserialize, Serialize};

use super::Tour;

/// A type of constraint violation in a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViolationType {
    /// The depot appears as a stop.
    DepotVisited {
        /// Position in the tour.
        position: usize,
    },
    /// The tour refers to a node outside the instance.
    UnknownNode {
        /// Offending node ID.
        node_id: usize,
    },
    /// A node is visited more than once.
    Revisited {
        /// Node visited twice.
        node_id: usize,
    },
    /// Service ends after the node's deadline.
    DeadlineMissed {
        /// Node where the violation occurred.
        node_id: usize,
        /// Actual end of service.
        leave: f64,
        /// The node's deadline.
        deadline: f64,
    },
}

/// A constraint violation in a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// Counters describing one dynamic-programming run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveStats {
    /// Number of levels that held at least one state.
    pub levels: usize,
    /// States retained in the table at the end of the run.
    pub states: usize,
    /// Feasible extensions generated (before dominance filtering).
    pub extensions: usize,
    /// Candidates or stored states discarded by dominance.
    pub dominated: usize,
}

/// The result of solving an instance: best prize and the tour achieving it.
///
/// # Examples
///
/// ```
/// use u_pctw::models::{Solution, SolveStats, Tour};
///
/// let sol = Solution::new(0, Tour::new(), SolveStats::default());
/// assert_eq!(sol.prize(), 0);
/// assert!(sol.tour().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    prize: u64,
    tour: Tour,
    stats: SolveStats,
}

impl Solution {
    /// Creates a solution.
    pub fn new(prize: u64, tour: Tour, stats: SolveStats) -> Self {
        Self { prize, tour, stats }
    }

    /// Maximum prize found.
    pub fn prize(&self) -> u64 {
        self.prize
    }

    /// Tour collecting [`prize`](Self::prize).
    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    /// Run statistics.
    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }
}
