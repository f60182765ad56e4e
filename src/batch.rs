//! Solve every instance in a directory and report prizes and runtimes.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use thiserror::Error;

use crate::fpt::FptSolver;
use crate::io::{read_graph, write_paths, write_runtimes, ReportRow};
use crate::models::{PrizeMode, Solution};

/// File extension of instance files picked up by [`evaluate_dir`].
pub const GRAPH_EXTENSION: &str = "graph";

/// Errors raised by the batch harness.
#[derive(Debug, Error)]
pub enum BatchError {
    /// A directory or report file could not be accessed.
    #[error("{}: {source}", .path.display())]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The input path does not exist or is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    /// No instance could be solved.
    #[error("no instances found in {}", .0.display())]
    Empty(PathBuf),
}

/// Outcome of one batch instance.
#[derive(Debug, Clone)]
pub struct BatchRecord {
    /// Instance file.
    pub path: PathBuf,
    /// Number of nodes including the depot.
    pub node_count: usize,
    /// Best tour found.
    pub solution: Solution,
    /// Wall-clock solve time, excluding parsing.
    pub elapsed: Duration,
}

impl BatchRecord {
    /// Solve time in milliseconds.
    pub fn millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// This record as a report line.
    pub fn report_row(&self) -> ReportRow<'_> {
        ReportRow {
            instance: &self.path,
            prize: self.solution.prize(),
            millis: self.millis(),
            tour: self.solution.tour(),
        }
    }
}

/// Solves every `.graph` file in `dir`, in path order.
///
/// Files that fail to parse are logged and skipped. Instances are solved
/// one after another so that runtimes are not distorted by contention.
pub fn evaluate_dir(dir: impl AsRef<Path>, mode: PrizeMode) -> Result<Vec<BatchRecord>, BatchError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(BatchError::NotADirectory(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|source| BatchError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| BatchError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == GRAPH_EXTENSION) {
            paths.push(path);
        } else {
            debug!("ignoring {}", path.display());
        }
    }
    paths.sort();

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        let instance = match read_graph(&path, mode) {
            Ok(instance) => instance,
            Err(err) => {
                warn!("skipping {}: {err}", path.display());
                continue;
            }
        };
        let start = Instant::now();
        let solution = FptSolver::new(&instance).solve();
        let elapsed = start.elapsed();
        info!(
            "{}: prize {} in {:.3} ms",
            path.display(),
            solution.prize(),
            elapsed.as_secs_f64() * 1000.0
        );
        records.push(BatchRecord {
            path,
            node_count: instance.node_count(),
            solution,
            elapsed,
        });
    }

    if records.is_empty() {
        return Err(BatchError::Empty(dir.to_path_buf()));
    }
    Ok(records)
}

/// Report file names for a batch of instances with `size` locations.
pub fn report_names(size: usize, mode: PrizeMode) -> (String, String) {
    let tag = match mode {
        PrizeMode::FromSource => "_",
        PrizeMode::Unit => "_UP_",
    };
    (
        format!("{size}{tag}runtimes.txt"),
        format!("{size}_FPT{tag}paths.txt"),
    )
}

/// Writes the runtime and tour reports for `records` into `out_dir`.
///
/// The instance size is the location count of the first record. Returns
/// the paths of the runtime and tour reports.
pub fn write_results(
    out_dir: impl AsRef<Path>,
    records: &[BatchRecord],
    mode: PrizeMode,
) -> Result<(PathBuf, PathBuf), BatchError> {
    let out_dir = out_dir.as_ref();
    let first = records
        .first()
        .ok_or_else(|| BatchError::Empty(out_dir.to_path_buf()))?;
    let size = first.node_count.saturating_sub(1);

    fs::create_dir_all(out_dir).map_err(|source| BatchError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let (runtimes_name, paths_name) = report_names(size, mode);
    let runtimes = out_dir.join(runtimes_name);
    let paths = out_dir.join(paths_name);
    let rows: Vec<ReportRow<'_>> = records.iter().map(BatchRecord::report_row).collect();
    write_report(&runtimes, |w| write_runtimes(w, size, &rows))?;
    write_report(&paths, |w| write_paths(w, size, &rows))?;
    info!("wrote {} and {}", runtimes.display(), paths.display());
    Ok((runtimes, paths))
}

fn write_report<F>(path: &Path, body: F) -> Result<(), BatchError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let wrap = |source| BatchError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(wrap)?);
    body(&mut writer).map_err(wrap)?;
    writer.flush().map_err(wrap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CHAIN_BLOCKED: &str = "\
3
0\tstarting-point\t(48.0,7.8)\t0\t0\t0\t0
1\tnode1\t(48.1,7.9)\t4\t6\t2\t1
2\tnode2\t(48.2,7.7)\t8\t12\t2\t1
0 5 10
5 0 8
10 8 0
";

    const PAIR: &str = "\
3
0\tstarting-point\t(0,0)\t0\t0\t0\t0
1\ta\t(0,1)\t0\t10\t1\t2
2\tb\t(0,2)\t0\t10\t1\t3
0 1 1
1 0 1
1 1 0
";

    fn scratch_dir(label: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let dir = std::env::temp_dir().join(format!(
            "u-pctw-{label}-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn test_report_names() {
        assert_eq!(
            report_names(10, PrizeMode::FromSource),
            ("10_runtimes.txt".to_string(), "10_FPT_paths.txt".to_string())
        );
        assert_eq!(
            report_names(10, PrizeMode::Unit),
            ("10_UP_runtimes.txt".to_string(), "10_FPT_UP_paths.txt".to_string())
        );
    }

    #[test]
    fn test_evaluate_dir_sorted_and_filtered() {
        let dir = scratch_dir("eval");
        fs::write(dir.join("b.graph"), PAIR).expect("write");
        fs::write(dir.join("a.graph"), CHAIN_BLOCKED).expect("write");
        fs::write(dir.join("broken.graph"), "# nothing\n").expect("write");
        fs::write(dir.join("notes.txt"), "not an instance").expect("write");

        let records = evaluate_dir(&dir, PrizeMode::FromSource).expect("records");
        assert_eq!(records.len(), 2);
        assert!(records[0].path.ends_with("a.graph"));
        assert_eq!(records[0].solution.prize(), 1);
        assert_eq!(records[1].solution.prize(), 5);
        assert_eq!(records[1].node_count, 3);

        let unit = evaluate_dir(&dir, PrizeMode::Unit).expect("records");
        assert_eq!(unit[1].solution.prize(), 2);

        fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn test_evaluate_missing_dir() {
        assert!(matches!(
            evaluate_dir("/nonexistent/u-pctw", PrizeMode::Unit),
            Err(BatchError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_evaluate_empty_dir() {
        let dir = scratch_dir("empty");
        assert!(matches!(
            evaluate_dir(&dir, PrizeMode::Unit),
            Err(BatchError::Empty(_))
        ));
        fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn test_write_results() {
        let dir = scratch_dir("results");
        fs::write(dir.join("a.graph"), CHAIN_BLOCKED).expect("write");
        let records = evaluate_dir(&dir, PrizeMode::Unit).expect("records");
        let row = records[0].report_row();
        assert!(row.instance.ends_with("a.graph"));
        assert_eq!(row.prize, 1);
        assert_eq!(row.tour.node_ids(), vec![1]);

        let out = dir.join("out");
        let (runtimes, paths) = write_results(&out, &records, PrizeMode::Unit).expect("reports");
        assert!(runtimes.ends_with("2_UP_runtimes.txt"));
        assert!(paths.ends_with("2_FPT_UP_paths.txt"));
        let text = fs::read_to_string(&paths).expect("read");
        assert!(text.contains("node1"));

        assert!(matches!(
            write_results(&out, &[], PrizeMode::Unit),
            Err(BatchError::Empty(_))
        ));
        fs::remove_dir_all(&dir).expect("cleanup");
    }
}
