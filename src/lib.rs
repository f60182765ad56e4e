//! # u-pctw
//!
//! Exact solver for the prize-collecting travelling salesman problem with
//! time windows, based on a fixed-parameter-tractable dynamic program over
//! tour lengths.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Node, TimeWindow, Instance, Tour, Solution)
//! - [`distance`] — Travel time matrix and shortest-path closure
//! - [`fpt`] — Level expansion engine, dominance, and tour reconstruction
//! - [`evaluation`] — Tour replay and feasibility checking
//! - [`io`] — `.graph` instance files and text reports
//! - [`batch`] — Directory-wide solving with runtime reports
//! - [`generate`] — Seeded random instances
//!
//! ## Example
//!
//! ```
//! use u_pctw::io::parse_graph;
//! use u_pctw::models::PrizeMode;
//!
//! let text = "3\n\
//!             0\tstarting-point\t(0,0)\t0\t0\t0\t0\n\
//!             1\tnode1\t(0,1)\t4\t6\t2\t1\n\
//!             2\tnode2\t(0,2)\t8\t12\t2\t1\n\
//!             0 5 10\n5 0 8\n10 8 0\n";
//! let instance = parse_graph(text, PrizeMode::FromSource).unwrap();
//! let solution = u_pctw::fpt::solve(&instance);
//! assert_eq!(solution.prize(), 1);
//! ```

pub mod batch;
pub mod distance;
pub mod evaluation;
pub mod fpt;
pub mod generate;
pub mod io;
pub mod models;
