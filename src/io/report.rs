//! Fixed-width text reports for single solves and batch runs.

use std::io::{self, Write};
use std::path::Path;

use crate::models::{Solution, Tour};

/// One solved instance as listed in the batch reports.
#[derive(Debug, Clone, Copy)]
pub struct ReportRow<'a> {
    /// Instance file.
    pub instance: &'a Path,
    /// Best prize.
    pub prize: u64,
    /// Solve time in milliseconds.
    pub millis: f64,
    /// Tour achieving `prize`.
    pub tour: &'a Tour,
}

/// Writes the tour of a single solve as a table followed by its totals.
///
/// # Examples
///
/// ```
/// use u_pctw::io::write_tour_table;
/// use u_pctw::models::{Solution, SolveStats, Stop, Tour};
///
/// let tour = Tour::from_stops(vec![Stop {
///     node_id: 1,
///     prize: 1,
///     arrival: 4.0,
///     leave: 6.0,
///     location: None,
///     name: "node1".into(),
/// }]);
/// let mut out = Vec::new();
/// write_tour_table(&mut out, &Solution::new(1, tour, SolveStats::default())).unwrap();
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.contains("node1"));
/// assert!(text.ends_with("Total Prize: 1\tTotal Length: 1\n"));
/// ```
pub fn write_tour_table<W: Write>(writer: &mut W, solution: &Solution) -> io::Result<()> {
    writeln!(writer, "Optimal Tour:")?;
    writeln!(
        writer,
        "{:>6}|{:>6}|{:>10}|{:>10}|{:>10}|{:>10}| {}",
        "LocId", "Prize", "Arrival", "Leave", "Lat.", "Longitude", "Address"
    )?;
    writeln!(writer)?;
    for stop in solution.tour().stops() {
        let (lat, lon) = stop
            .location
            .map_or((String::new(), String::new()), |p| {
                (p.latitude.to_string(), p.longitude.to_string())
            });
        writeln!(
            writer,
            "{:>6}|{:>6}|{:>10}|{:>10}|{:>10}|{:>10}| {}",
            stop.node_id, stop.prize, stop.arrival, stop.leave, lat, lon, stop.name
        )?;
    }
    writeln!(writer)?;
    writeln!(
        writer,
        "Total Prize: {}\tTotal Length: {}",
        solution.prize(),
        solution.tour().len()
    )
}

/// Writes the prize and runtime of every batch instance, one row each.
pub fn write_runtimes<W: Write>(writer: &mut W, size: usize, rows: &[ReportRow<'_>]) -> io::Result<()> {
    writeln!(writer, "Runtimes and Prizes for Instances of size {size}")?;
    writeln!(writer, "{:>4}|{:>11}|{:>11}| Instance", "Id", "FPT_Prize", "FPT msec.")?;
    for (idx, row) in rows.iter().enumerate() {
        writeln!(
            writer,
            "{:>4}|{:>11}|{:>11.3}| {}",
            idx,
            row.prize,
            row.millis,
            row.instance.display()
        )?;
    }
    Ok(())
}

/// Writes the optimal tour of every batch instance.
pub fn write_paths<W: Write>(writer: &mut W, size: usize, rows: &[ReportRow<'_>]) -> io::Result<()> {
    writeln!(writer, "Optimal Tours for FPT solved instances of size: {size}")?;
    writeln!(writer)?;
    for (idx, row) in rows.iter().enumerate() {
        writeln!(writer, "Path for instance {idx}")?;
        write_stops(writer, row.tour)?;
        writeln!(writer)?;
    }
    Ok(())
}

fn write_stops<W: Write>(writer: &mut W, tour: &Tour) -> io::Result<()> {
    writeln!(
        writer,
        "{:>7}|{:>7}|{:>11}|{:>11}|     Location",
        "LocId", "Prize", "Arrival", "Leave"
    )?;
    for stop in tour.stops() {
        writeln!(
            writer,
            "{:>7}|{:>7}|{:>11}|{:>11}|     {}",
            stop.node_id, stop.prize, stop.arrival, stop.leave, stop.name
        )?;
    }
    Ok(())
}
