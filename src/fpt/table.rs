//! Level × node arena of non-dominated states.

use super::state::{State, TerminalRef};

/// Result of inserting a candidate into a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsertionResult {
    /// Index of the candidate in its cell, `None` if it was dominated.
    pub inserted: Option<usize>,
    /// Number of states discarded, the rejected candidate included.
    pub dominated: usize,
}

/// Inserts `candidate` into `cell` unless it is dominated.
///
/// Every stored state dominated by the candidate is removed first; the
/// candidate is then appended unless a remaining state dominates it. The
/// resulting set of labels does not depend on insertion order.
pub fn insert_non_dominated(cell: &mut Vec<State>, candidate: State) -> InsertionResult {
    let before = cell.len();
    cell.retain(|s| !candidate.dominates(s));
    let dominated = before - cell.len();

    if cell.iter().any(|s| s.dominates(&candidate)) {
        return InsertionResult {
            inserted: None,
            dominated: dominated + 1,
        };
    }

    cell.push(candidate);
    InsertionResult {
        inserted: Some(cell.len() - 1),
        dominated,
    }
}

/// Dynamic-programming table indexed by `(level, node)`.
///
/// `level` counts the stops made so far (1 = first stop after the depot).
/// Each cell holds mutually non-dominated states. Predecessor links are
/// `(node, index)` pairs into the level below, so the table is dropped as
/// one unit once the tour has been read out.
///
/// # Examples
///
/// ```
/// use u_pctw::fpt::{State, StateTable};
///
/// let mut table = StateTable::new(3);
/// table.insert(1, 2, State::initial(2, 8.0, 1));
/// assert_eq!(table.cell(1, 2).len(), 1);
/// assert_eq!(table.total_states(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct StateTable {
    levels: Vec<Vec<Vec<State>>>,
    node_count: usize,
}

impl StateTable {
    /// Allocates an empty `node_count × node_count` table.
    pub fn new(node_count: usize) -> Self {
        Self {
            levels: vec![vec![Vec::new(); node_count]; node_count],
            node_count,
        }
    }

    /// Number of nodes (columns per level).
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of allocated levels, level 0 included.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// States at `(level, node)`; empty outside the table.
    pub fn cell(&self, level: usize, node: usize) -> &[State] {
        match self.levels.get(level).and_then(|cells| cells.get(node)) {
            Some(cell) => cell,
            None => &[],
        }
    }

    /// State at `(level, node, index)`, if present.
    pub fn get(&self, level: usize, node: usize, index: usize) -> Option<&State> {
        self.cell(level, node).get(index)
    }

    /// State addressed by a terminal reference, if present.
    pub fn terminal(&self, end: TerminalRef) -> Option<&State> {
        self.get(end.level, end.node, end.index)
    }

    /// Inserts `candidate` into `(level, node)` with dominance filtering.
    ///
    /// # Panics
    ///
    /// Panics if `level` or `node` is outside the table.
    pub fn insert(&mut self, level: usize, node: usize, candidate: State) -> InsertionResult {
        insert_non_dominated(&mut self.levels[level][node], candidate)
    }

    /// Number of states stored at `level`.
    pub fn level_len(&self, level: usize) -> usize {
        self.levels
            .get(level)
            .map_or(0, |cells| cells.iter().map(Vec::len).sum())
    }

    /// Returns `true` if `level` holds no state.
    pub fn is_level_empty(&self, level: usize) -> bool {
        self.level_len(level) == 0
    }

    /// Number of states stored in the whole table.
    pub fn total_states(&self) -> usize {
        (0..self.levels.len()).map(|l| self.level_len(l)).sum()
    }

    /// All states at `level` as `(node, index, state)`, nodes ascending.
    pub fn iter_level(&self, level: usize) -> impl Iterator<Item = (usize, usize, &State)> + '_ {
        self.levels.get(level).into_iter().flat_map(|cells| {
            cells.iter().enumerate().flat_map(|(node, cell)| {
                cell.iter()
                    .enumerate()
                    .map(move |(index, state)| (node, index, state))
            })
        })
    }

    /// Splits the table into the finished cells of `level` and the mutable
    /// cells of `level + 1`.
    ///
    /// # Panics
    ///
    /// Panics if `level + 1` is outside the table.
    pub(crate) fn frontier_mut(&mut self, level: usize) -> (&[Vec<State>], &mut [Vec<State>]) {
        let (lower, upper) = self.levels.split_at_mut(level + 1);
        (lower[level].as_slice(), upper[0].as_mut_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fpt::{LockSet, StateRef};

    fn state(arrival: f64, prize: u64, locked: &[usize]) -> State {
        State {
            arrival,
            prize,
            predecessor: Some(StateRef { node: 0, index: 0 }),
            locked: locked.iter().copied().collect(),
        }
    }

    #[test]
    fn test_new_dimensions() {
        let t = StateTable::new(3);
        assert_eq!(t.level_count(), 3);
        assert_eq!(t.node_count(), 3);
        assert_eq!(t.total_states(), 0);
        assert!(t.cell(7, 1).is_empty());
        assert!(t.is_level_empty(1));
    }

    #[test]
    fn test_candidate_evicts_dominated() {
        let mut t = StateTable::new(5);
        t.insert(2, 2, state(5.0, 3, &[2, 3]));
        t.insert(2, 2, state(6.0, 3, &[1, 3]));

        let result = t.insert(2, 2, state(4.0, 5, &[2]));

        assert_eq!(result.inserted, Some(1));
        assert_eq!(result.dominated, 1);
        let cell = t.cell(2, 2);
        assert_eq!(cell.len(), 2);
        assert_eq!((cell[0].arrival, cell[0].prize), (6.0, 3));
        assert_eq!((cell[1].arrival, cell[1].prize), (4.0, 5));
    }

    #[test]
    fn test_dominated_candidate_rejected() {
        let mut t = StateTable::new(5);
        t.insert(2, 3, state(5.0, 3, &[2, 3]));
        t.insert(2, 3, state(3.0, 6, &[2]));
        // The second insert already evicted the first one.
        assert_eq!(t.cell(2, 3).len(), 1);

        let result = t.insert(2, 3, state(4.0, 5, &[2]));

        assert_eq!(result.inserted, None);
        assert_eq!(result.dominated, 1);
        let cell = t.cell(2, 3);
        assert_eq!(cell.len(), 1);
        assert_eq!((cell[0].arrival, cell[0].prize), (3.0, 6));
    }

    #[test]
    fn test_equal_candidate_replaces() {
        let mut cell = vec![state(2.0, 2, &[1])];
        let mut newer = state(2.0, 2, &[1]);
        newer.predecessor = Some(StateRef { node: 4, index: 1 });

        let result = insert_non_dominated(&mut cell, newer.clone());

        assert_eq!(result.inserted, Some(0));
        assert_eq!(cell, vec![newer]);
    }

    #[test]
    fn test_iter_level_and_counts() {
        let mut t = StateTable::new(4);
        t.insert(1, 3, state(1.0, 1, &[3]));
        t.insert(1, 1, state(0.0, 1, &[1]));
        t.insert(1, 1, state(2.0, 4, &[1]));
        assert_eq!(t.level_len(1), 3);
        let seen: Vec<_> = t.iter_level(1).map(|(n, i, _)| (n, i)).collect();
        assert_eq!(seen, vec![(1, 0), (1, 1), (3, 0)]);
        assert_eq!(
            t.terminal(TerminalRef {
                level: 1,
                node: 1,
                index: 1
            })
            .map(|s| s.prize),
            Some(4)
        );
        assert!(t.get(1, 2, 0).is_none());
    }

    #[test]
    fn test_frontier_split() {
        let mut t = StateTable::new(3);
        t.insert(1, 1, State::initial(1, 0.0, 1));
        let (current, next) = t.frontier_mut(1);
        assert_eq!(current[1].len(), 1);
        next[2].push(State {
            arrival: 1.0,
            prize: 2,
            predecessor: Some(StateRef { node: 1, index: 0 }),
            locked: LockSet::singleton(2),
        });
        assert_eq!(t.level_len(2), 1);
    }
}
