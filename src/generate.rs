//! Random instance generation for benchmarks and tests.
//!
//! Locations are scattered uniformly over a square grid with the depot in
//! the center. Travel times are Euclidean distances rounded up, so every
//! generated instance has integer data and satisfies the triangle
//! inequality.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::models::{Instance, InstanceError, Node, TimeWindow};

/// Parameters of the random generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of locations, not counting the depot.
    pub locations: usize,
    /// Side length of the coordinate grid.
    pub grid: u32,
    /// Latest possible release time.
    pub horizon: u32,
    /// Smallest window width (deadline - release).
    pub min_window: u32,
    /// Largest window width.
    pub max_window: u32,
    /// Largest service duration; durations are drawn from `1..=max_duration`.
    pub max_duration: u32,
    /// Largest prize; prizes are drawn from `1..=max_prize`.
    pub max_prize: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            locations: 10,
            grid: 100,
            horizon: 200,
            min_window: 10,
            max_window: 60,
            max_duration: 10,
            max_prize: 10,
        }
    }
}

impl GeneratorConfig {
    /// Config with `locations` locations and default parameters otherwise.
    pub fn with_locations(locations: usize) -> Self {
        Self {
            locations,
            ..Self::default()
        }
    }
}

/// Generates a random instance, deterministic for a given `seed`.
///
/// # Examples
///
/// ```
/// use u_pctw::generate::{generate, GeneratorConfig};
///
/// let config = GeneratorConfig::with_locations(6);
/// let a = generate(&config, 7).unwrap();
/// let b = generate(&config, 7).unwrap();
/// assert_eq!(a.node_count(), 7);
/// assert_eq!(a, b);
/// ```
pub fn generate(config: &GeneratorConfig, seed: u64) -> Result<Instance, InstanceError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let grid = config.grid.max(1);
    let center = f64::from(grid) / 2.0;
    let min_window = config.min_window.min(config.max_window);

    let mut points = Vec::with_capacity(config.locations + 1);
    let mut nodes = Vec::with_capacity(config.locations + 1);
    points.push((center, center));
    nodes.push(Node::depot("depot").with_location(center, center));

    for id in 1..=config.locations {
        let x = f64::from(rng.random_range(0..=grid));
        let y = f64::from(rng.random_range(0..=grid));
        let release = rng.random_range(0..=config.horizon);
        let width = rng.random_range(min_window..=config.max_window);
        let duration = rng.random_range(1..=config.max_duration.max(1));
        let prize = rng.random_range(1..=config.max_prize.max(1));

        let window = TimeWindow::from_units(release, release.saturating_add(width));
        points.push((x, y));
        nodes.push(
            Node::new(id, format!("loc{id}"), window, f64::from(duration), prize)
                .with_location(x, y),
        );
    }

    let n = points.len();
    let mut distances = DistanceMatrix::new(n);
    for (i, &(xi, yi)) in points.iter().enumerate() {
        for (j, &(xj, yj)) in points.iter().enumerate() {
            distances.set(i, j, ((xi - xj).powi(2) + (yi - yj).powi(2)).sqrt().ceil());
        }
    }

    Instance::new(nodes, distances)
}
