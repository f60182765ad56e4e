//! Dense travel time matrix.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A dense n×n travel time matrix stored in row-major order.
///
/// The matrix need not be symmetric: `get(i, j)` is the time to travel from
/// `i` to `j`.
///
/// # Examples
///
/// ```
/// use u_pctw::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 5.0, 10.0],
///     vec![5.0, 0.0, 8.0],
///     vec![10.0, 8.0, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(dm.get(1, 2), 8.0);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixData")]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

/// Flat data whose length is not the square of the declared size.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{len} travel times cannot fill a {size}x{size} matrix")]
pub struct MatrixShapeError {
    /// Declared number of locations.
    pub size: usize,
    /// Number of entries supplied.
    pub len: usize,
}

#[derive(Deserialize)]
struct MatrixData {
    data: Vec<f64>,
    size: usize,
}

impl TryFrom<MatrixData> for DistanceMatrix {
    type Error = MatrixShapeError;

    fn try_from(raw: MatrixData) -> Result<Self, Self::Error> {
        let len = raw.data.len();
        Self::from_data(raw.size, raw.data).ok_or(MatrixShapeError { size: raw.size, len })
    }
}

impl DistanceMatrix {
    /// Creates a travel time matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a matrix from a flat row-major n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if size.checked_mul(size) != Some(data.len()) {
            return None;
        }
        Some(Self { data, size })
    }

    /// Creates a matrix from a list of rows.
    ///
    /// Returns `None` unless every row has exactly as many entries as there
    /// are rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            data: rows.into_iter().flatten().collect(),
            size,
        })
    }

    /// Returns the travel time from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the travel time from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, time: f64) {
        self.data[from * self.size + to] = time;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Row `from` of the matrix.
    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    /// Shortest travel times when only `intermediates` may be passed through
    /// (Floyd-Warshall restricted to those pivots).
    ///
    /// Direct arcs are always allowed; detours may only stop at the given
    /// locations.
    pub fn shortest_paths_via(&self, intermediates: impl IntoIterator<Item = usize>) -> Self {
        let n = self.size;
        let mut closure = self.clone();
        for k in intermediates {
            for i in 0..n {
                let ik = closure.get(i, k);
                for j in 0..n {
                    let via = ik + closure.get(k, j);
                    if via < closure.get(i, j) {
                        closure.set(i, j, via);
                    }
                }
            }
        }
        closure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 5.0, 10.0],
            vec![5.0, 0.0, 8.0],
            vec![10.0, 8.0, 0.0],
        ])
        .expect("square")
    }

    #[test]
    fn test_from_rows() {
        let dm = sample();
        assert_eq!(dm.size(), 3);
        assert_eq!(dm.get(0, 1), 5.0);
        assert_eq!(dm.get(2, 1), 8.0);
        assert_eq!(dm.row(1), &[5.0, 0.0, 8.0]);
    }

    #[test]
    fn test_from_rows_ragged() {
        assert!(DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![0.0]]).is_none());
    }

    #[test]
    fn test_flat_data_is_row_major() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 3.0, 7.0, 0.0]).expect("2x2");
        assert_eq!(dm.get(0, 1), 3.0);
        assert_eq!(dm.get(1, 0), 7.0);
        assert!(DistanceMatrix::from_data(3, vec![0.0; 8]).is_none());
    }

    #[test]
    fn test_set_is_directed() {
        let mut dm = DistanceMatrix::new(3);
        dm.set(2, 0, 6.5);
        assert_eq!(dm.row(2), &[6.5, 0.0, 0.0]);
        assert_eq!(dm.get(0, 2), 0.0);
    }

    #[test]
    fn test_deserialize_checks_shape() {
        let dm: DistanceMatrix =
            serde_json::from_str(r#"{"data":[0.0,3.0,7.0,0.0],"size":2}"#).expect("2x2");
        assert_eq!(dm.get(1, 0), 7.0);

        let err = serde_json::from_str::<DistanceMatrix>(r#"{"data":[0.0],"size":3}"#).unwrap_err();
        assert!(err.to_string().contains("cannot fill a 3x3 matrix"));
        assert!(DistanceMatrix::from_data(usize::MAX, vec![]).is_none());
    }

    #[test]
    fn test_closure_shortens_detours() {
        let mut dm = sample();
        dm.set(0, 2, 20.0);
        let sp = dm.shortest_paths_via(0..3);
        assert_eq!(sp.get(0, 2), 13.0);
        assert_eq!(sp.get(2, 0), 10.0);
        assert_eq!(sample().shortest_paths_via(0..3), sample());
    }

    #[test]
    fn test_shortest_paths_via() {
        let mut dm = sample();
        dm.set(1, 2, 30.0);
        // Through 0 the trip 1 -> 2 costs 15; without 0 the direct arc remains.
        assert_eq!(dm.shortest_paths_via(0..3).get(1, 2), 15.0);
        assert_eq!(dm.shortest_paths_via([1, 2]).get(1, 2), 30.0);
    }
}
