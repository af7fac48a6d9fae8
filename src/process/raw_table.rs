/// Literal cell value that marks a track invalid at that row.
pub const SENTINEL: &str = "-";

/// One data cell; the sentinel is `None`, everything else the raw string.
pub type Cell = Option<String>;

/// One time-series column of the input table.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Column position among the tracks (the label column is not counted).
    pub index: usize,
    /// Name from the header row.
    pub name: String,
    /// One cell per data row, in input order.
    pub cells: Vec<Cell>,
}

impl Track {
    /// A track is valid when no row held the sentinel.
    pub fn is_valid(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Raw value at `row`, `None` if the row is missing or held the sentinel.
    pub fn raw(&self, row: usize) -> Option<&str> {
        self.cells.get(row).and_then(|c| c.as_deref())
    }
}

/// Tracks read from one input file, in header order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackTable {
    pub tracks: Vec<Track>,
    /// Number of data rows (header excluded).
    pub rows: usize,
}

impl TrackTable {
    /// Look a track up by its original column position.
    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn valid_tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| t.is_valid())
    }
}

/// True for the exact sentinel literal, after unquoting.
pub fn is_sentinel(raw: &[u8]) -> bool {
    raw == SENTINEL.as_bytes()
}

/// Cells from literal strings, sentinel included.
#[cfg(test)]
pub(crate) fn cells(raw: &[&str]) -> Vec<Cell> {
    raw.iter()
        .map(|r| (!is_sentinel(r.as_bytes())).then(|| r.to_string()))
        .collect()
}
