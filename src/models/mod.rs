//! Domain model types for prize-collecting tours with time windows.
//!
//! Provides the core abstractions: nodes with time windows, service
//! durations and prizes, the validated problem instance, tours as ordered
//! sequences of stops, and the solution returned by solvers.

mod instance;
mod node;
mod solution;
mod tour;

pub use instance::{Instance, InstanceError, PrizeMode};
pub use node::{GeoPoint, Node, TimeWindow};
pub use solution::{Solution, SolveStats, Violation, ViolationType};
pub use tour::{Stop, Tour};
