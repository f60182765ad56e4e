//! Tour evaluator that replays timing and checks feasibility.

use crate::models::{Instance, Stop, Tour, Violation, ViolationType};

/// Replays node sequences under the solver's timing rules and reports
/// constraint violations.
///
/// The depot departure time is free, so the first stop starts service at its
/// release. Every later stop starts at
/// `max(release, previous leave + travel time)` and ends `duration` later.
///
/// # Examples
///
/// ```
/// use u_pctw::models::{Instance, Node, TimeWindow};
/// use u_pctw::distance::DistanceMatrix;
/// use u_pctw::evaluation::TourEvaluator;
///
/// let nodes = vec![
///     Node::depot("depot"),
///     Node::new(1, "a", TimeWindow::new(0.0, 10.0).unwrap(), 2.0, 1),
///     Node::new(2, "b", TimeWindow::new(5.0, 10.0).unwrap(), 2.0, 1),
/// ];
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 1.0],
///     vec![1.0, 0.0, 1.0],
///     vec![1.0, 1.0, 0.0],
/// ])
/// .unwrap();
/// let instance = Instance::new(nodes, dm).unwrap();
///
/// let evaluator = TourEvaluator::new(&instance);
/// let (tour, violations) = evaluator.build_tour(&[1, 2]);
/// assert!(violations.is_empty());
/// assert_eq!(tour.stops()[1].arrival, 5.0);
/// assert_eq!(tour.total_prize(), 2);
/// ```
pub struct TourEvaluator<'a> {
    instance: &'a Instance,
}

impl<'a> TourEvaluator<'a> {
    /// Creates a new evaluator for the given instance.
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// Builds a tour from a sequence of node IDs, computing timing.
    ///
    /// Returns the constructed tour and any constraint violations found.
    /// Unknown nodes are reported and left out of the tour.
    pub fn build_tour(&self, node_ids: &[usize]) -> (Tour, Vec<Violation>) {
        let mut tour = Tour::new();
        let mut violations = Vec::new();
        let mut seen = vec![false; self.instance.node_count()];
        let mut previous: Option<(usize, f64)> = None;

        for (position, &id) in node_ids.iter().enumerate() {
            if id >= self.instance.node_count() {
                violations.push(Violation::new(ViolationType::UnknownNode { node_id: id }));
                continue;
            }
            if id == Instance::DEPOT {
                violations.push(Violation::new(ViolationType::DepotVisited { position }));
            }
            if seen[id] {
                violations.push(Violation::new(ViolationType::Revisited { node_id: id }));
            }
            seen[id] = true;

            let node = self.instance.node(id);
            let reached = match previous {
                Some((prev, leave)) => leave + self.instance.distance(prev, id),
                None => node.release(),
            };
            let arrival = node.time_window().service_start(reached);
            let leave = arrival + node.duration();

            if leave > node.deadline() {
                violations.push(Violation::new(ViolationType::DeadlineMissed {
                    node_id: id,
                    leave,
                    deadline: node.deadline(),
                }));
            }

            tour.push_stop(Stop {
                node_id: id,
                prize: node.prize(),
                arrival,
                leave,
                location: node.location(),
                name: node.name().to_string(),
            });
            previous = Some((id, leave));
        }

        (tour, violations)
    }

    /// Replays an existing tour's node sequence, returning its prize and
    /// violations. Recorded stop times are ignored.
    pub fn evaluate(&self, tour: &Tour) -> (u64, Vec<Violation>) {
        let (replayed, violations) = self.build_tour(&tour.node_ids());
        (replayed.total_prize(), violations)
    }
}
