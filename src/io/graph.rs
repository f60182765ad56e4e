//! Reader and writer for the tab-separated `.graph` instance format.
//!
//! ```text
//! # free-form header lines
//! 3
//! 0	starting-point	(48.0,7.8)	0	0	0	0
//! 1	node1	(48.1,7.9)	4	6	2	1
//! 2	node2	(48.2,7.7)	8	12	2	1
//! 0 5 10
//! 5 0 8
//! 10 8 0
//! # an optional trailing comment ends the matrix
//! ```
//!
//! Node lines carry id, name, `(latitude,longitude)`, release, deadline,
//! duration and prize. The prize column may be omitted when prizes are
//! replaced by [`PrizeMode::Unit`].

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::distance::DistanceMatrix;
use crate::models::{Instance, InstanceError, Node, PrizeMode, TimeWindow};

/// Errors raised while loading a `.graph` file.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// No node count line before the end of input.
    #[error("missing node count")]
    MissingNodeCount,
    /// The node count line is not a non-negative integer.
    #[error("line {line}: invalid node count {value:?}")]
    InvalidNodeCount {
        /// 1-based line number.
        line: usize,
        /// Offending text.
        value: String,
    },
    /// Input ended before all node lines were read.
    #[error("expected {expected} node lines, found {found}")]
    MissingNodes {
        /// Declared node count.
        expected: usize,
        /// Node lines present.
        found: usize,
    },
    /// A node line has too few columns.
    #[error("line {line}: missing {field}")]
    MissingField {
        /// 1-based line number.
        line: usize,
        /// Name of the absent column.
        field: &'static str,
    },
    /// A column could not be parsed.
    #[error("line {line}: invalid {field} {value:?}")]
    InvalidField {
        /// 1-based line number.
        line: usize,
        /// Name of the column.
        field: &'static str,
        /// Offending text.
        value: String,
    },
    /// A distance row has the wrong number of entries.
    #[error("line {line}: expected {expected} travel times, found {found}")]
    RowLength {
        /// 1-based line number.
        line: usize,
        /// Node count.
        expected: usize,
        /// Entries on the line.
        found: usize,
    },
    /// The matrix has the wrong number of rows.
    #[error("expected {expected} distance rows, found {found}")]
    RowCount {
        /// Node count.
        expected: usize,
        /// Rows present.
        found: usize,
    },
    /// The parsed data does not form a valid instance.
    #[error(transparent)]
    Instance(#[from] InstanceError),
}

/// Reads and parses a `.graph` file.
pub fn read_graph(path: impl AsRef<Path>, mode: PrizeMode) -> Result<Instance, GraphError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("parsing {}", path.display());
    parse_graph(&text, mode)
}

/// Parses the contents of a `.graph` file.
///
/// # Examples
///
/// ```
/// use u_pctw::io::parse_graph;
/// use u_pctw::models::PrizeMode;
///
/// let text = "# demo\n2\n\
///             0\tdepot\t(0.0,0.0)\t0\t0\t0\t0\n\
///             1\tstop\t(1.0,2.0)\t3\t9\t1\t4\n\
///             0 2\n2 0\n";
/// let instance = parse_graph(text, PrizeMode::FromSource).unwrap();
/// assert_eq!(instance.node_count(), 2);
/// assert_eq!(instance.prize(1), 4);
/// assert_eq!(instance.distance(0, 1), 2.0);
/// ```
pub fn parse_graph(text: &str, mode: PrizeMode) -> Result<Instance, GraphError> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim_end_matches('\r')));

    let count = loop {
        let (line, content) = lines.next().ok_or(GraphError::MissingNodeCount)?;
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        break trimmed
            .parse::<usize>()
            .map_err(|_| GraphError::InvalidNodeCount {
                line,
                value: trimmed.to_string(),
            })?;
    };

    let mut nodes = Vec::with_capacity(count);
    while nodes.len() < count {
        let Some((line, content)) = lines.next() else {
            return Err(GraphError::MissingNodes {
                expected: count,
                found: nodes.len(),
            });
        };
        if content.trim().is_empty() {
            continue;
        }
        nodes.push(parse_node(line, content, nodes.len(), mode)?);
    }

    let mut rows = Vec::with_capacity(count);
    for (line, content) in lines {
        let trimmed = content.trim();
        if trimmed.starts_with('#') {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }
        let row = trimmed
            .split_whitespace()
            .map(|value| parse_number(line, "travel time", value))
            .collect::<Result<Vec<f64>, _>>()?;
        if row.len() != count {
            return Err(GraphError::RowLength {
                line,
                expected: count,
                found: row.len(),
            });
        }
        rows.push(row);
    }
    if rows.len() != count {
        return Err(GraphError::RowCount {
            expected: count,
            found: rows.len(),
        });
    }

    let distances = DistanceMatrix::from_rows(rows).ok_or(GraphError::RowCount {
        expected: count,
        found: 0,
    })?;
    Ok(Instance::new(nodes, distances)?.with_prize_mode(mode))
}

fn parse_node(line: usize, content: &str, index: usize, mode: PrizeMode) -> Result<Node, GraphError> {
    let mut fields = content.split('\t');
    let mut next = |field: &'static str| {
        fields
            .next()
            .map(str::trim)
            .ok_or(GraphError::MissingField { line, field })
    };

    let id_text = next("id")?;
    let id = id_text.parse::<usize>().map_err(|_| GraphError::InvalidField {
        line,
        field: "id",
        value: id_text.to_string(),
    })?;
    let name = next("name")?.to_string();
    let (latitude, longitude) = parse_location(line, next("location")?)?;
    let release = parse_number(line, "release", next("release")?)?;
    let deadline = parse_number(line, "deadline", next("deadline")?)?;
    let duration = parse_number(line, "duration", next("duration")?)?;
    let prize = match mode {
        PrizeMode::Unit => u64::from(index != Instance::DEPOT),
        PrizeMode::FromSource => {
            let text = next("prize")?;
            text.parse::<u64>().map_err(|_| GraphError::InvalidField {
                line,
                field: "prize",
                value: text.to_string(),
            })?
        }
    };

    let window =
        TimeWindow::new(release, deadline).ok_or_else(|| GraphError::InvalidField {
            line,
            field: "time window",
            value: format!("[{release}, {deadline}]"),
        })?;
    Ok(Node::new(id, name, window, duration, prize).with_location(latitude, longitude))
}

fn parse_location(line: usize, text: &str) -> Result<(f64, f64), GraphError> {
    let invalid = || GraphError::InvalidField {
        line,
        field: "location",
        value: text.to_string(),
    };
    let inner = text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(invalid)?;
    let (lat, lon) = inner.split_once(',').ok_or_else(invalid)?;
    let lat = lat.trim().parse::<f64>().map_err(|_| invalid())?;
    let lon = lon.trim().parse::<f64>().map_err(|_| invalid())?;
    Ok((lat, lon))
}

fn parse_number(line: usize, field: &'static str, text: &str) -> Result<f64, GraphError> {
    text.parse::<f64>().map_err(|_| GraphError::InvalidField {
        line,
        field,
        value: text.to_string(),
    })
}

/// Writes an instance in `.graph` format.
///
/// Nodes without a location are written at `(0,0)`. The output parses back
/// into an equal instance with [`PrizeMode::FromSource`], up to missing
/// locations.
///
/// # Errors
///
/// Fails with [`io::ErrorKind::InvalidInput`] before writing anything if a
/// node name would not survive parsing: names may not contain tabs or line
/// breaks, nor start or end with whitespace.
pub fn write_graph<W: Write>(writer: &mut W, instance: &Instance) -> io::Result<()> {
    if let Some(node) = instance.nodes().iter().find(|n| !is_writable_name(n.name())) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("node {} has a name that cannot be written: {:?}", node.id(), node.name()),
        ));
    }
    writeln!(writer, "# prize-collecting TSP with time windows")?;
    writeln!(writer, "# id\tname\t(lat,lon)\trelease\tdeadline\tduration\tprize")?;
    writeln!(writer, "{}", instance.node_count())?;
    for node in instance.nodes() {
        let (lat, lon) = node
            .location()
            .map_or((0.0, 0.0), |p| (p.latitude, p.longitude));
        writeln!(
            writer,
            "{}\t{}\t({},{})\t{}\t{}\t{}\t{}",
            node.id(),
            node.name(),
            lat,
            lon,
            node.release(),
            node.deadline(),
            node.duration(),
            node.prize()
        )?;
    }
    for from in 0..instance.node_count() {
        let row: Vec<String> = instance
            .distances()
            .row(from)
            .iter()
            .map(f64::to_string)
            .collect();
        writeln!(writer, "{}", row.join(" "))?;
    }
    Ok(())
}

fn is_writable_name(name: &str) -> bool {
    name.trim() == name && !name.contains(['\t', '\n', '\r'])
}
