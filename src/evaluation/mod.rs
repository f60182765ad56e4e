//! Tour replay and feasibility checking.
//!
//! - [`TourEvaluator`] — rebuilds stop times from a node sequence and reports
//!   depot visits, revisits, unknown nodes, and missed deadlines

mod evaluator;

pub use evaluator::TourEvaluator;
