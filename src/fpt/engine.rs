//! Level-by-level state expansion.
//!
//! # Algorithm
//!
//! Level 1 holds one state per serviceable location: service starts at its
//! release and only the location itself is locked. Level `k + 1` is built
//! from level `k` by extending every state to every location that is not
//! locked and whose deadline can still be met:
//!
//! ```text
//! arrival' = max(release[succ], arrival + duration[job] + travel[job][succ])
//! feasible  iff arrival' + duration[succ] <= deadline[succ]
//! prize'   = prize + prize[succ]
//! locked'  = {succ} ∪ { j ∈ locked | j still reachable after succ }
//! ```
//!
//! Candidates enter their cell through dominance filtering, which keeps each
//! cell a Pareto front over (arrival, prize, lock set). Expansion stops after
//! the first level that produced no feasible extension.
//!
//! # Complexity
//!
//! O(n²) cells, each extended to O(n) successors per stored state; the
//! number of states per cell depends on the instance.
//!
//! # Reference
//!
//! The dynamic program and its lock-set dominance follow the FPT approach
//! of Nebel and Renz.

use log::debug;

use super::state::{LockSet, State, StateRef, TerminalRef};
use super::table::{insert_non_dominated, StateTable};
use crate::distance::DistanceMatrix;
use crate::models::{Instance, SolveStats};

/// Outcome of a full expansion run.
#[derive(Debug, Clone)]
pub struct EngineRun {
    /// The populated table.
    pub table: StateTable,
    /// Best tour end found, `None` if no location carries a prize.
    pub best: Option<TerminalRef>,
    /// Prize of [`best`](Self::best), 0 without one.
    pub best_prize: u64,
    /// Run counters.
    pub stats: SolveStats,
}

/// Builds the state table of an instance level by level.
///
/// # Examples
///
/// ```
/// use u_pctw::models::{Instance, Node, TimeWindow};
/// use u_pctw::distance::DistanceMatrix;
/// use u_pctw::fpt::LevelEngine;
///
/// let nodes = vec![
///     Node::depot("depot"),
///     Node::new(1, "a", TimeWindow::new(0.0, 10.0).unwrap(), 1.0, 2),
///     Node::new(2, "b", TimeWindow::new(0.0, 10.0).unwrap(), 1.0, 3),
/// ];
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 1.0],
///     vec![1.0, 0.0, 1.0],
///     vec![1.0, 1.0, 0.0],
/// ])
/// .unwrap();
/// let instance = Instance::new(nodes, dm).unwrap();
///
/// let run = LevelEngine::new(&instance).run();
/// assert_eq!(run.best_prize, 5);
/// assert_eq!(run.best.map(|end| end.level), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct LevelEngine<'a> {
    instance: &'a Instance,
    reach: DistanceMatrix,
}

impl<'a> LevelEngine<'a> {
    /// Creates an engine for the given instance.
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            reach: instance
                .distances()
                .shortest_paths_via(instance.locations()),
        }
    }

    /// Runs the expansion to completion.
    pub fn run(&self) -> EngineRun {
        let mut table = StateTable::new(self.instance.node_count());
        let mut stats = SolveStats::default();
        let mut best = None;
        let mut best_prize = 0;

        self.seed(&mut table);

        let mut level = 1;
        while !table.is_level_empty(level) {
            stats.levels = level;
            for (node, index, state) in table.iter_level(level) {
                if state.prize > best_prize {
                    best_prize = state.prize;
                    best = Some(TerminalRef { level, node, index });
                }
            }

            if level + 1 >= table.level_count() {
                break;
            }
            let extended = self.expand_level(&mut table, level, &mut stats);
            debug!(
                "level {level}: {} states, {} carried to level {}",
                table.level_len(level),
                table.level_len(level + 1),
                level + 1
            );
            if !extended {
                break;
            }
            level += 1;
        }

        stats.states = table.total_states();
        EngineRun {
            table,
            best,
            best_prize,
            stats,
        }
    }

    /// Fills level 1 with the first-stop state of every serviceable location.
    fn seed(&self, table: &mut StateTable) {
        for id in self.instance.locations() {
            let node = self.instance.node(id);
            if node.is_serviceable() {
                table.insert(1, id, State::initial(id, node.release(), node.prize()));
            }
        }
    }

    /// Extends every state at `level` into `level + 1`.
    ///
    /// Returns `true` if at least one feasible extension was generated.
    fn expand_level(&self, table: &mut StateTable, level: usize, stats: &mut SolveStats) -> bool {
        let instance = self.instance;
        let (current, next) = table.frontier_mut(level);
        let mut extended = false;

        for (job, cell) in current.iter().enumerate() {
            for (index, state) in cell.iter().enumerate() {
                let ready = state.arrival + instance.duration(job);

                for successor in instance.locations() {
                    if successor == job || state.locked.contains(successor) {
                        continue;
                    }
                    let Some(arrival) = self.arrival_at(ready, job, successor) else {
                        continue;
                    };
                    extended = true;
                    stats.extensions += 1;

                    let candidate = State {
                        arrival,
                        prize: state.prize + instance.prize(successor),
                        predecessor: Some(StateRef { node: job, index }),
                        locked: self.lock_successor(&state.locked, successor, arrival),
                    };
                    stats.dominated += insert_non_dominated(&mut next[successor], candidate).dominated;
                }
            }
        }

        extended
    }

    /// Service start at `successor` when leaving `job` at `ready`.
    ///
    /// Returns `None` if service there could not end by its deadline.
    pub fn arrival_at(&self, ready: f64, job: usize, successor: usize) -> Option<f64> {
        let node = self.instance.node(successor);
        let window = node.time_window();
        let arrival = window.service_start(ready + self.instance.distance(job, successor));
        window.admits(arrival, node.duration()).then_some(arrival)
    }

    /// Lock set after moving to `successor` with service starting at
    /// `arrival`.
    ///
    /// `successor` is always locked. A previously locked node stays locked
    /// only while it could still be served after `successor`; once its
    /// deadline is out of reach it is released, since the deadline check
    /// excludes it anyway. Reachability uses shortest travel times through
    /// other locations (never the depot), so the test stays conservative on
    /// matrices that violate the triangle inequality.
    pub fn lock_successor(&self, locked: &LockSet, successor: usize, arrival: f64) -> LockSet {
        let instance = self.instance;
        let departure = instance
            .node(successor)
            .time_window()
            .service_start(arrival)
            + instance.duration(successor);

        let mut next = LockSet::singleton(successor);
        for j in locked.iter() {
            let finish = departure + self.reach.get(successor, j) + instance.duration(j);
            if finish <= instance.deadline(j) {
                next.insert(j);
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Node, TimeWindow};

    fn tw(release: f64, deadline: f64) -> TimeWindow {
        TimeWindow::new(release, deadline).expect("finite")
    }

    /// Depot plus two nodes that cannot be chained in either order.
    fn two_node_instance() -> Instance {
        let nodes = vec![
            Node::depot("starting-point"),
            Node::new(1, "node1", tw(4.0, 6.0), 2.0, 1),
            Node::new(2, "node2", tw(8.0, 12.0), 2.0, 1),
        ];
        let dm = DistanceMatrix::from_rows(vec![
            vec![0.0, 5.0, 10.0],
            vec![5.0, 0.0, 8.0],
            vec![10.0, 8.0, 0.0],
        ])
        .expect("square");
        Instance::new(nodes, dm).expect("valid")
    }

    /// Three nodes on a line with wide windows.
    fn open_instance() -> Instance {
        let nodes = vec![
            Node::depot("depot"),
            Node::new(1, "a", tw(0.0, 100.0), 1.0, 1),
            Node::new(2, "b", tw(0.0, 100.0), 1.0, 1),
            Node::new(3, "c", tw(0.0, 100.0), 1.0, 1),
        ];
        let mut dm = DistanceMatrix::new(4);
        for i in 0..4 {
            for j in 0..4 {
                if i != j {
                    dm.set(i, j, 1.0);
                }
            }
        }
        Instance::new(nodes, dm).expect("valid")
    }

    #[test]
    fn test_seed_level_one() {
        let inst = two_node_instance();
        let engine = LevelEngine::new(&inst);
        let mut table = StateTable::new(3);
        engine.seed(&mut table);

        let s1 = &table.cell(1, 1)[0];
        assert_eq!(s1.arrival, 4.0);
        assert_eq!(s1.prize, 1);
        assert!(s1.predecessor.is_none());
        assert_eq!(s1.locked, LockSet::singleton(1));

        let s2 = &table.cell(1, 2)[0];
        assert_eq!(s2.arrival, 8.0);
        assert_eq!(s2.locked, LockSet::singleton(2));
        assert!(table.cell(1, 0).is_empty());
    }

    #[test]
    fn test_seed_skips_unserviceable() {
        let nodes = vec![
            Node::depot("depot"),
            Node::new(1, "tight", tw(5.0, 6.0), 2.0, 9),
        ];
        let inst = Instance::new(nodes, DistanceMatrix::new(2)).expect("valid");
        let run = LevelEngine::new(&inst).run();
        assert!(run.table.is_level_empty(1));
        assert_eq!(run.best, None);
        assert_eq!(run.best_prize, 0);
    }

    #[test]
    fn test_arrival_at() {
        let inst = two_node_instance();
        let engine = LevelEngine::new(&inst);
        // Leaving node 1 at 6 reaches node 2 at 14, service would end at 16 > 12.
        assert_eq!(engine.arrival_at(6.0, 1, 2), None);
        // Reaching node 1 at 5 ends service at 7 > 6.
        assert_eq!(engine.arrival_at(0.0, 0, 1), None);
        // Arriving early waits for the release.
        assert_eq!(engine.arrival_at(-3.0, 0, 1), Some(4.0));
        assert_eq!(engine.arrival_at(0.0, 1, 2), Some(8.0));
    }

    #[test]
    fn test_lock_keeps_reachable_nodes() {
        let inst = open_instance();
        let engine = LevelEngine::new(&inst);
        let locked = engine.lock_successor(&LockSet::singleton(1), 2, 2.0);
        // Node 1 could still be served after node 2, so it must stay locked.
        assert_eq!(locked, [1, 2].into_iter().collect());
    }

    #[test]
    fn test_lock_releases_unreachable_nodes() {
        let inst = two_node_instance();
        let engine = LevelEngine::new(&inst);
        // After serving node 2 from time 8 the tour leaves at 10; node 1
        // would finish at 10 + 8 + 2 = 20 > 6.
        let locked = engine.lock_successor(&LockSet::singleton(1), 2, 8.0);
        assert_eq!(locked, LockSet::singleton(2));
    }

    #[test]
    fn test_lock_uses_shortest_travel_times() {
        let nodes = vec![
            Node::depot("depot"),
            Node::new(1, "a", tw(0.0, 10.0), 0.0, 1),
            Node::new(2, "b", tw(0.0, 10.0), 0.0, 1),
            Node::new(3, "c", tw(0.0, 10.0), 0.0, 1),
        ];
        let dm = DistanceMatrix::from_rows(vec![
            vec![0.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0, 1.0],
            vec![0.0, 50.0, 0.0, 1.0],
            vec![0.0, 1.0, 1.0, 0.0],
        ])
        .expect("square");
        let inst = Instance::new(nodes, dm).expect("valid");
        let engine = LevelEngine::new(&inst);
        // The direct arc 2 -> 1 takes 50, but 2 -> 3 -> 1 takes 2.
        let locked = engine.lock_successor(&LockSet::singleton(1), 2, 1.0);
        assert!(locked.contains(1));
    }

    #[test]
    fn test_lock_ignores_paths_through_depot() {
        let nodes = vec![
            Node::depot("depot"),
            Node::new(1, "a", tw(0.0, 10.0), 0.0, 1),
            Node::new(2, "b", tw(0.0, 10.0), 0.0, 1),
        ];
        let dm = DistanceMatrix::from_rows(vec![
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 50.0, 0.0],
        ])
        .expect("square");
        let inst = Instance::new(nodes, dm).expect("valid");
        let engine = LevelEngine::new(&inst);
        // 2 -> 0 -> 1 would take 0, but tours never pass the depot again.
        let locked = engine.lock_successor(&LockSet::singleton(1), 2, 1.0);
        assert_eq!(locked, LockSet::singleton(2));
    }

    #[test]
    fn test_run_no_revisits() {
        let inst = open_instance();
        let run = LevelEngine::new(&inst).run();
        assert_eq!(run.best_prize, 3);
        assert_eq!(run.stats.levels, 3);
        assert!(!run.table.is_level_empty(3));
    }

    #[test]
    fn test_run_two_node_instance() {
        let inst = two_node_instance();
        let run = LevelEngine::new(&inst).run();
        assert_eq!(run.best_prize, 1);
        assert_eq!(
            run.best,
            Some(TerminalRef {
                level: 1,
                node: 1,
                index: 0
            })
        );
        assert_eq!(run.stats.levels, 1);
        assert_eq!(run.stats.extensions, 0);
        assert_eq!(run.stats.states, 2);
    }

    #[test]
    fn test_run_depot_only() {
        let inst = Instance::new(vec![Node::depot("d")], DistanceMatrix::new(1)).expect("valid");
        let run = LevelEngine::new(&inst).run();
        assert_eq!(run.best, None);
        assert_eq!(run.best_prize, 0);
        assert_eq!(run.stats.levels, 0);
    }
}
