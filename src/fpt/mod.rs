//! Exact FPT dynamic program for the prize-collecting TSP with time windows.
//!
//! - [`LevelEngine`] — level-by-level expansion into a [`StateTable`]
//! - [`State::dominates`] — Pareto dominance over (arrival, prize, lock set)
//! - [`reconstruct`] — backward walk from the best tour end
//! - [`FptSolver`] / [`solve`] — the pure entry point: instance in, prize and tour out

mod engine;
mod reconstruct;
mod state;
mod table;

pub use engine::{EngineRun, LevelEngine};
pub use reconstruct::reconstruct;
pub use state::{LockSet, State, StateRef, TerminalRef};
pub use table::{insert_non_dominated, InsertionResult, StateTable};

use log::info;

use crate::models::{Instance, Solution};

/// Solves an instance exactly with the level-expansion dynamic program.
///
/// The solver performs no I/O besides logging; the state table lives only
/// for the duration of [`solve`](Self::solve).
///
/// # Examples
///
/// ```
/// use u_pctw::models::{Instance, Node, TimeWindow};
/// use u_pctw::distance::DistanceMatrix;
/// use u_pctw::fpt::FptSolver;
///
/// let nodes = vec![
///     Node::depot("starting-point"),
///     Node::new(1, "node1", TimeWindow::new(4.0, 6.0).unwrap(), 2.0, 1),
///     Node::new(2, "node2", TimeWindow::new(8.0, 12.0).unwrap(), 2.0, 1),
/// ];
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 5.0, 10.0],
///     vec![5.0, 0.0, 8.0],
///     vec![10.0, 8.0, 0.0],
/// ])
/// .unwrap();
/// let instance = Instance::new(nodes, dm).unwrap();
///
/// let solution = FptSolver::new(&instance).solve();
/// assert_eq!(solution.prize(), 1);
/// assert_eq!(solution.tour().node_ids(), vec![1]);
/// ```
#[derive(Debug, Clone)]
pub struct FptSolver<'a> {
    instance: &'a Instance,
}

impl<'a> FptSolver<'a> {
    /// Creates a solver for the given instance.
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// Runs the dynamic program and reads out the best tour.
    pub fn solve(&self) -> Solution {
        let run = LevelEngine::new(self.instance).run();
        let tour = reconstruct(self.instance, &run.table, run.best);
        info!(
            "solved {} nodes: prize {} with {} stops ({} levels, {} states kept, {} dominated)",
            self.instance.node_count(),
            run.best_prize,
            tour.len(),
            run.stats.levels,
            run.stats.states,
            run.stats.dominated
        );
        Solution::new(run.best_prize, tour, run.stats)
    }
}

/// Convenience wrapper around [`FptSolver::solve`].
pub fn solve(instance: &Instance) -> Solution {
    FptSolver::new(instance).solve()
}
