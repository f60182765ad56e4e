//! Tour and stop types.

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// A single visited location within a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Node ID being visited.
    pub node_id: usize,
    /// Prize collected at this stop.
    pub prize: u64,
    /// Time service starts (after any waiting).
    pub arrival: f64,
    /// Time service ends (`arrival + duration`).
    pub leave: f64,
    /// Coordinates of the node, if known.
    pub location: Option<GeoPoint>,
    /// Name of the node.
    pub name: String,
}

/// An ordered sequence of visited locations, starting after the depot.
///
/// The depot itself is not stored.
///
/// # Examples
///
/// ```
/// use u_pctw::models::{Stop, Tour};
///
/// let tour = Tour::from_stops(vec![Stop {
///     node_id: 1,
///     prize: 1,
///     arrival: 4.0,
///     leave: 6.0,
///     location: None,
///     name: "node1".into(),
/// }]);
/// assert_eq!(tour.len(), 1);
/// assert_eq!(tour.total_prize(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    stops: Vec<Stop>,
}

impl Tour {
    /// Creates an empty tour.
    pub fn new() -> Self {
        Self { stops: Vec::new() }
    }

    /// Creates a tour from stops already in visiting order.
    pub fn from_stops(stops: Vec<Stop>) -> Self {
        Self { stops }
    }

    /// Appends a stop to the end of this tour.
    pub fn push_stop(&mut self, stop: Stop) {
        self.stops.push(stop);
    }

    /// Returns the ordered sequence of stops.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Number of visited locations (excluding depot).
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if this tour visits nothing.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Node IDs in visit order.
    pub fn node_ids(&self) -> Vec<usize> {
        self.stops.iter().map(|s| s.node_id).collect()
    }

    /// Sum of the prizes collected along the tour, saturating at `u64::MAX`.
    pub fn total_prize(&self) -> u64 {
        self.stops.iter().fold(0, |sum, s| sum.saturating_add(s.prize))
    }

    /// Time the last service ends, `None` for an empty tour.
    pub fn completion_time(&self) -> Option<f64> {
        self.stops.last().map(|s| s.leave)
    }
}
