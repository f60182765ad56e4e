//! Node and time window types.

use serde::{Deserialize, Serialize};

/// A time window bounding when service at a node may take place.
///
/// Service may not start before `release` and must be finished by
/// `deadline`. Arriving early is allowed; the tour waits until `release`.
///
/// A window too narrow for the node's service duration is representable on
/// purpose: such a node is simply never visited.
///
/// # Examples
///
/// ```
/// use u_pctw::models::TimeWindow;
///
/// let tw = TimeWindow::new(4.0, 6.0).unwrap();
/// assert_eq!(tw.service_start(1.0), 4.0);
/// assert!(tw.admits(4.0, 2.0));
/// assert!(!tw.admits(4.5, 2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    release: f64,
    deadline: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if either value is non-finite.
    pub fn new(release: f64, deadline: f64) -> Option<Self> {
        if !release.is_finite() || !deadline.is_finite() {
            return None;
        }
        Some(Self { release, deadline })
    }

    /// Creates a window on whole time units, which is always finite.
    pub fn from_units(release: u32, deadline: u32) -> Self {
        Self {
            release: f64::from(release),
            deadline: f64::from(deadline),
        }
    }

    /// Earliest time service may start.
    pub fn release(&self) -> f64 {
        self.release
    }

    /// Latest time service must be finished.
    pub fn deadline(&self) -> f64 {
        self.deadline
    }

    /// Time at which service starts when arriving at `arrival`.
    pub fn service_start(&self, arrival: f64) -> f64 {
        arrival.max(self.release)
    }

    /// Returns `true` if a service of `duration` starting at `start`
    /// finishes by the deadline.
    pub fn admits(&self, start: f64, duration: f64) -> bool {
        start + duration <= self.deadline
    }

    /// Returns `true` if a service of `duration` fits the window at all.
    pub fn is_serviceable(&self, duration: f64) -> bool {
        self.admits(self.release, duration)
    }
}

/// Geographic coordinates of a node, carried through to the tour for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// A location (or the depot) in a prize-collecting problem.
///
/// Node 0 is the depot by convention. Every node carries a time window, a
/// service duration and a prize; the depot's prize is always zero.
///
/// # Examples
///
/// ```
/// use u_pctw::models::{Node, TimeWindow};
///
/// let depot = Node::depot("starting-point");
/// assert_eq!(depot.id(), 0);
/// assert_eq!(depot.prize(), 0);
///
/// let tw = TimeWindow::new(4.0, 6.0).unwrap();
/// let n = Node::new(1, "node1", tw, 2.0, 1).with_location(-35.15, 149.10);
/// assert_eq!(n.prize(), 1);
/// assert!(n.location().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: usize,
    name: String,
    location: Option<GeoPoint>,
    time_window: TimeWindow,
    duration: f64,
    prize: u64,
}

impl Node {
    /// Creates a new node.
    pub fn new(
        id: usize,
        name: impl Into<String>,
        time_window: TimeWindow,
        duration: f64,
        prize: u64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            location: None,
            time_window,
            duration,
            prize,
        }
    }

    /// Creates a depot (id 0, window `[0, 0]`, no service, no prize).
    pub fn depot(name: impl Into<String>) -> Self {
        Self::new(
            0,
            name,
            TimeWindow {
                release: 0.0,
                deadline: 0.0,
            },
            0.0,
            0,
        )
    }

    /// Sets the geographic coordinates of this node.
    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some(GeoPoint {
            latitude,
            longitude,
        });
        self
    }

    /// Replaces the time window of this node.
    pub fn with_time_window(mut self, time_window: TimeWindow) -> Self {
        self.time_window = time_window;
        self
    }

    /// Replaces the service duration of this node.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Replaces the prize of this node.
    pub fn with_prize(mut self, prize: u64) -> Self {
        self.prize = prize;
        self
    }

    /// Node ID (0 = depot).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Human readable name (an address in most data sets).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Geographic coordinates, if known.
    pub fn location(&self) -> Option<GeoPoint> {
        self.location
    }

    /// Time window of this node.
    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    /// Release time (earliest service start).
    pub fn release(&self) -> f64 {
        self.time_window.release
    }

    /// Deadline (latest service end).
    pub fn deadline(&self) -> f64 {
        self.time_window.deadline
    }

    /// Service duration.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Prize collected when this node is visited.
    pub fn prize(&self) -> u64 {
        self.prize
    }

    /// Returns `true` if this node's window can hold its own service.
    pub fn is_serviceable(&self) -> bool {
        self.time_window.is_serviceable(self.duration)
    }
}
