//! Backward walk from a tour end to the stop sequence.

use super::state::TerminalRef;
use super::table::StateTable;
use crate::models::{Instance, Stop, Tour};

/// Rebuilds the tour ending at `end` by following predecessor links.
///
/// Each visited state yields one stop (arrival = the state's arrival,
/// leave = arrival + duration). The stops are collected from the last one
/// backwards and reversed once, so the tour reads first stop → last stop.
/// `None` yields the empty tour.
///
/// The returned tour has exactly `end.level` stops for any state present in
/// the table.
pub fn reconstruct(instance: &Instance, table: &StateTable, end: Option<TerminalRef>) -> Tour {
    let Some(end) = end else {
        return Tour::new();
    };

    let mut stops = Vec::with_capacity(end.level);
    let (mut level, mut node, mut index) = (end.level, end.node, end.index);

    while let Some(state) = table.get(level, node, index) {
        let location = instance.node(node);
        stops.push(Stop {
            node_id: node,
            prize: location.prize(),
            arrival: state.arrival,
            leave: state.arrival + location.duration(),
            location: location.location(),
            name: location.name().to_string(),
        });

        let Some(prev) = state.predecessor else {
            break;
        };
        level -= 1;
        node = prev.node;
        index = prev.index;
    }

    stops.reverse();
    Tour::from_stops(stops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::fpt::{LockSet, State, StateRef};
    use crate::models::{Node, TimeWindow};

    fn instance() -> Instance {
        let tw = TimeWindow::new(0.0, 50.0).expect("finite");
        let nodes = vec![
            Node::depot("depot"),
            Node::new(1, "one", tw, 1.0, 4),
            Node::new(2, "two", tw, 2.0, 5).with_location(1.5, 2.5),
            Node::new(3, "three", tw, 3.0, 6),
        ];
        Instance::new(nodes, DistanceMatrix::new(4)).expect("valid")
    }

    fn link(arrival: f64, prize: u64, node: usize, pred: Option<StateRef>) -> State {
        State {
            arrival,
            prize,
            predecessor: pred,
            locked: LockSet::singleton(node),
        }
    }

    #[test]
    fn test_empty_without_end() {
        let inst = instance();
        let table = StateTable::new(4);
        assert!(reconstruct(&inst, &table, None).is_empty());
    }

    #[test]
    fn test_walks_predecessors_in_order() {
        let inst = instance();
        let mut table = StateTable::new(4);
        table.insert(1, 2, link(0.0, 5, 2, None));
        table.insert(1, 1, link(0.0, 4, 1, None));
        table.insert(2, 3, link(3.0, 11, 3, Some(StateRef { node: 2, index: 0 })));
        table.insert(2, 3, link(1.0, 10, 3, Some(StateRef { node: 1, index: 0 })));
        table.insert(3, 1, link(10.0, 15, 1, Some(StateRef { node: 3, index: 0 })));

        let end = TerminalRef {
            level: 3,
            node: 1,
            index: 0,
        };
        let tour = reconstruct(&inst, &table, Some(end));

        assert_eq!(tour.node_ids(), vec![2, 3, 1]);
        assert_eq!(tour.total_prize(), 15);
        let stops = tour.stops();
        assert_eq!((stops[0].arrival, stops[0].leave), (0.0, 2.0));
        assert_eq!((stops[1].arrival, stops[1].leave), (3.0, 6.0));
        assert_eq!((stops[2].arrival, stops[2].leave), (10.0, 11.0));
        assert_eq!(stops[0].name, "two");
        assert_eq!(stops[0].location.map(|p| p.longitude), Some(2.5));
    }
}
