// src/process/mod.rs
use csv::ReaderBuilder;
use std::{borrow::Cow, fs::File, io::Read, path::Path};
use tracing::{debug, info, warn};

use crate::error::{Result, TrackError};

pub mod ratio;
pub mod raw_table;
pub mod sort;
pub mod utils;
pub mod write;

pub use ratio::{compute_ratios, Point, RatioSummary};
pub use raw_table::{Cell, Track, TrackTable, SENTINEL};
pub use sort::sort_by_ratio;
pub use write::{write_output_file, write_sorted_table};

/// Open `path` and parse it as a tab-separated track table.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_track_table<P: AsRef<Path>>(path: P) -> Result<TrackTable> {
    let file = File::open(&path).map_err(|source| TrackError::OpenInput {
        path: path.as_ref().to_path_buf(),
        source,
    })?;
    read_tracks(file)
}

/// Parse tab-separated input into tracks:
/// - The first record is the header; its first cell is a label and is ignored,
///   every following cell names one track.
/// - Every later record contributes one cell per track, again skipping the
///   first (time) cell.
/// - A record whose width differs from the header is rejected.
/// - A field is either unquoted with no `"` in it, or wrapped in quotes with
///   inner quotes doubled. Anything else is rejected.
/// - Only the names and cells of valid tracks must be UTF-8.
pub fn read_tracks<R: Read>(reader: R) -> Result<TrackTable> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false) // quotes are checked per field by `unquote`
        .flexible(true) // width is checked below so the error can name the line
        .from_reader(reader);

    let mut columns: Vec<RawColumn> = Vec::new();
    let mut width: Option<usize> = None;
    let mut header_line = 0;
    let mut lines: Vec<u64> = Vec::new();

    for result in rdr.byte_records() {
        let record = result.map_err(|source| TrackError::Record { source })?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let mut fields = Vec::with_capacity(record.len());
        for (column, field) in record.iter().enumerate() {
            fields.push(unquote(field).ok_or(TrackError::MalformedQuote {
                line,
                column: column + 1,
            })?);
        }

        let Some(expected) = width else {
            columns = fields
                .into_iter()
                .skip(1)
                .map(|name| RawColumn {
                    name: name.into_owned(),
                    cells: Vec::new(),
                })
                .collect();
            width = Some(record.len());
            header_line = line;
            debug!(tracks = columns.len(), "header parsed");
            continue;
        };

        if record.len() != expected {
            return Err(TrackError::RaggedRow {
                line,
                expected,
                found: record.len(),
            });
        }

        for (column, field) in columns.iter_mut().zip(fields.into_iter().skip(1)) {
            let cell = (!raw_table::is_sentinel(&field)).then(|| field.into_owned());
            column.cells.push(cell);
        }
        lines.push(line);
    }

    if width.is_none() {
        warn!("input has no header row");
    }

    let table = TrackTable {
        tracks: columns
            .into_iter()
            .enumerate()
            .map(|(index, column)| column.into_track(index, header_line, &lines))
            .collect::<Result<_>>()?,
        rows: lines.len(),
    };
    let invalid = table.tracks.len() - table.valid_tracks().count();
    info!(
        tracks = table.tracks.len(),
        rows = table.rows,
        invalid,
        "read track table"
    );
    Ok(table)
}

/// One track as raw bytes, before its validity is known.
struct RawColumn {
    name: Vec<u8>,
    cells: Vec<Option<Vec<u8>>>,
}

impl RawColumn {
    /// Valid tracks decode strictly; invalid ones are only ever logged, so
    /// they decode lossily.
    fn into_track(self, index: usize, header_line: u64, lines: &[u64]) -> Result<Track> {
        let valid = self.cells.iter().all(Option::is_some);
        if !valid {
            return Ok(Track {
                index,
                name: String::from_utf8_lossy(&self.name).into_owned(),
                cells: self
                    .cells
                    .into_iter()
                    .map(|c| c.map(|b| String::from_utf8_lossy(&b).into_owned()))
                    .collect(),
            });
        }

        let lossy_name = String::from_utf8_lossy(&self.name).into_owned();
        let name = String::from_utf8(self.name).map_err(|_| TrackError::InvalidUtf8 {
            line: header_line,
            track: lossy_name.clone(),
        })?;
        let mut cells = Vec::with_capacity(self.cells.len());
        for (row, cell) in self.cells.into_iter().flatten().enumerate() {
            let text = String::from_utf8(cell).map_err(|_| TrackError::InvalidUtf8 {
                line: lines.get(row).copied().unwrap_or_default(),
                track: lossy_name.clone(),
            })?;
            cells.push(Some(text));
        }
        Ok(Track { index, name, cells })
    }
}

/// Strip one level of quoting. `None` for a bare quote in an unquoted field
/// or a quoted field whose inner quotes are not doubled.
fn unquote(field: &[u8]) -> Option<Cow<'_, [u8]>> {
    let [b'"', inner @ .., b'"'] = field else {
        return (!field.contains(&b'"')).then_some(Cow::Borrowed(field));
    };

    let mut out = Vec::with_capacity(inner.len());
    let mut i = 0;
    while i < inner.len() {
        if inner[i] == b'"' {
            if inner.get(i + 1) != Some(&b'"') {
                return None;
            }
            i += 1;
        }
        out.push(inner[i]);
        i += 1;
    }
    Some(Cow::Owned(out))
}
