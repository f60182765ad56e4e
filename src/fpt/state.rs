//! DP states, lock sets and the dominance relation.

use std::collections::BTreeSet;

/// Back-reference to the state a state was extended from.
///
/// `node` is the previous stop and `index` the position within that node's
/// cell one level below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateRef {
    /// Node of the preceding stop.
    pub node: usize,
    /// Index within the preceding cell.
    pub index: usize,
}

/// Full address of a state in the table, used for tour ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerminalRef {
    /// Number of stops made, depot excluded.
    pub level: usize,
    /// Last visited node.
    pub node: usize,
    /// Index within the `(level, node)` cell.
    pub index: usize,
}

/// Nodes a partial tour may no longer be extended to.
///
/// Holds the last stop plus every earlier stop that is still reachable in
/// time. Earlier stops whose deadline can no longer be met are dropped: the
/// deadline check already rules them out, and forgetting them lets more
/// states dominate each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LockSet(BTreeSet<usize>);

impl LockSet {
    /// A lock set holding only `node`.
    pub fn singleton(node: usize) -> Self {
        Self(BTreeSet::from([node]))
    }

    /// Adds a node, returning `true` if it was not present.
    pub fn insert(&mut self, node: usize) -> bool {
        self.0.insert(node)
    }

    /// Returns `true` if `node` is locked.
    pub fn contains(&self, node: usize) -> bool {
        self.0.contains(&node)
    }

    /// Returns `true` if every node locked here is also locked in `other`.
    pub fn is_subset(&self, other: &LockSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Locked nodes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Number of locked nodes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is locked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<usize> for LockSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One Pareto-optimal way of reaching a node as the k-th stop of a tour.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    /// Earliest service start at the node under this state.
    pub arrival: f64,
    /// Prize collected so far, this node included.
    pub prize: u64,
    /// Preceding state, `None` when the tour came straight from the depot.
    pub predecessor: Option<StateRef>,
    /// Nodes this partial tour may not be extended to.
    pub locked: LockSet,
}

impl State {
    /// The first-stop state of `node`: service starts at its release.
    pub fn initial(node: usize, release: f64, prize: u64) -> Self {
        Self {
            arrival: release,
            prize,
            predecessor: None,
            locked: LockSet::singleton(node),
        }
    }

    /// Returns `true` if `self` makes `other` obsolete.
    ///
    /// Both states must belong to the same `(level, node)` cell. `self`
    /// dominates `other` when it is there no later, has collected no less,
    /// and forbids no node that `other` still allows:
    ///
    /// ```text
    /// self.arrival <= other.arrival
    /// self.prize   >= other.prize
    /// self.locked  ⊆  other.locked
    /// ```
    ///
    /// Equal states dominate each other.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_pctw::fpt::{LockSet, State};
    ///
    /// let a = State { arrival: 4.0, prize: 5, predecessor: None, locked: LockSet::singleton(2) };
    /// let b = State { arrival: 5.0, prize: 3, predecessor: None, locked: [2, 3].into_iter().collect() };
    /// assert!(a.dominates(&b));
    /// assert!(!b.dominates(&a));
    /// ```
    pub fn dominates(&self, other: &State) -> bool {
        self.arrival <= other.arrival
            && self.prize >= other.prize
            && self.locked.is_subset(&other.locked)
    }
}
