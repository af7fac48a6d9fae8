use csv::WriterBuilder;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::info;

use super::{ratio::Point, raw_table::TrackTable, utils::format_ratio};
use crate::{
    config::OutputPolicy,
    error::{Result, TrackError},
};

/// Create `path` and write the reordered table into it.
///
/// The file is only created once every sorted track is known to cover
/// `rows` values. A failure midway leaves the partial file on disk.
#[tracing::instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub fn write_output_file<P: AsRef<Path>>(
    path: P,
    table: &TrackTable,
    sorted: &[Point],
    rows: usize,
    policy: &OutputPolicy,
) -> Result<usize> {
    let path = path.as_ref();
    check_lengths(table, sorted, rows)?;

    let file = File::create(path).map_err(|source| TrackError::CreateOutput {
        path: path.to_path_buf(),
        source,
    })?;
    write_sorted_table(BufWriter::new(file), path, table, sorted, rows, policy)
}

/// Write header, `rows` data rows and the summary row to `out`.
///
/// - header: optional time label, then sorted track names
/// - row i: optional row index, then each sorted track's raw value at i
/// - summary: optional summary label, then each formatted ratio
///
/// `dest` only names the destination in errors. Returns the number of data
/// rows written.
pub fn write_sorted_table<W: Write>(
    out: W,
    dest: &Path,
    table: &TrackTable,
    sorted: &[Point],
    rows: usize,
    policy: &OutputPolicy,
) -> Result<usize> {
    check_lengths(table, sorted, rows)?;

    let write_err = |source: csv::Error| TrackError::Write {
        path: dest.to_path_buf(),
        source,
    };
    let mut wtr = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(out);
    let width = sorted.len() + usize::from(policy.include_labels);

    let mut header: Vec<&str> = Vec::with_capacity(width);
    if policy.include_labels {
        header.push(&policy.time_label);
    }
    header.extend(sorted.iter().map(|p| p.name.as_str()));
    wtr.write_record(&header).map_err(write_err)?;

    let mut record: Vec<String> = Vec::with_capacity(width);
    for row in 0..rows {
        record.clear();
        if policy.include_labels {
            record.push(row.to_string());
        }
        for point in sorted {
            // lengths were checked above
            let raw = table
                .track(point.index)
                .and_then(|t| t.raw(row))
                .unwrap_or_default();
            record.push(raw.to_string());
        }
        wtr.write_record(&record).map_err(write_err)?;
    }

    record.clear();
    if policy.include_labels {
        record.push(policy.summary_label.clone());
    }
    record.extend(sorted.iter().map(|p| format_ratio(p.ratio, policy)));
    wtr.write_record(&record).map_err(write_err)?;

    wtr.flush().map_err(|e| write_err(e.into()))?;
    info!(tracks = sorted.len(), rows, "wrote sorted table");
    Ok(rows)
}

fn check_lengths(table: &TrackTable, sorted: &[Point], rows: usize) -> Result<()> {
    for point in sorted {
        let len = table.track(point.index).map_or(0, |t| t.cells.len());
        if len < rows {
            return Err(TrackError::ShortTrack {
                track: point.name.clone(),
                len,
                needed: rows,
            });
        }
    }
    Ok(())
}
