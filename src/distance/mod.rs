//! Travel time matrices.
//!
//! Provides a dense, possibly asymmetric travel time matrix and its
//! shortest-path closure.

mod matrix;

pub use matrix::{DistanceMatrix, MatrixShapeError};
