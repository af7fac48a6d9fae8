use tracing::{debug, info, warn};

use super::raw_table::{Track, TrackTable};
use crate::error::{Result, TrackError};

/// Summary of one valid track.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Original track position in the table.
    pub index: usize,
    pub name: String,
    /// max / min of the parsed values, plain float division.
    pub ratio: f64,
}

/// Output of the statistic stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatioSummary {
    /// One point per valid track, in table order.
    pub points: Vec<Point>,
    /// Longest valid track, i.e. the number of data rows to write.
    pub max_size_in_track: usize,
    /// Names of tracks dropped for holding the sentinel.
    pub skipped: Vec<String>,
}

/// Compute max/min for every valid track. Invalid tracks are never parsed.
pub fn compute_ratios(table: &TrackTable) -> Result<RatioSummary> {
    let mut summary = RatioSummary {
        points: Vec::with_capacity(table.tracks.len()),
        ..Default::default()
    };

    for track in &table.tracks {
        if !track.is_valid() {
            warn!(track = %track.name, "skipping track holding sentinel");
            summary.skipped.push(track.name.clone());
            continue;
        }

        let (min, max) = min_max(track)?;
        let ratio = max / min;
        debug!(track = %track.name, min, max, ratio, "track ratio");

        summary.points.push(Point {
            index: track.index,
            name: track.name.clone(),
            ratio,
        });
        summary.max_size_in_track = summary.max_size_in_track.max(track.cells.len());
    }

    info!(
        valid = summary.points.len(),
        skipped = summary.skipped.len(),
        rows = summary.max_size_in_track,
        "computed ratios"
    );
    Ok(summary)
}

/// Parse every cell and fold min/max. A NaN value makes both NaN.
fn min_max(track: &Track) -> Result<(f64, f64)> {
    let mut bounds: Option<(f64, f64)> = None;

    for raw in track.cells.iter().flatten() {
        let value = parse_value(track, raw)?;
        bounds = Some(match bounds {
            None => (value, value),
            Some((min, max)) => (nan_min(min, value), nan_max(max, value)),
        });
    }

    bounds.ok_or_else(|| TrackError::EmptyTrack {
        track: track.name.clone(),
    })
}

/// Parse one cell. Overflow to infinity is an error unless the text
/// spells infinity itself.
fn parse_value(track: &Track, raw: &str) -> Result<f64> {
    let value: f64 = raw.parse().map_err(|source| TrackError::InvalidNumber {
        track: track.name.clone(),
        value: raw.to_string(),
        source,
    })?;
    if value.is_infinite() && !spells_infinity(raw) {
        return Err(TrackError::NumberOutOfRange {
            track: track.name.clone(),
            value: raw.to_string(),
        });
    }
    Ok(value)
}

fn spells_infinity(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(|c| c == '+' || c == '-').unwrap_or(raw);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Minimum that propagates NaN and prefers `-0.0` over `0.0`.
fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else if a < b || (a == b && a.is_sign_negative()) {
        a
    } else {
        b
    }
}

/// Maximum that propagates NaN and prefers `0.0` over `-0.0`.
fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else if a > b || (a == b && a.is_sign_positive()) {
        a
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::raw_table::cells;

    fn track(index: usize, name: &str, raw: &[&str]) -> Track {
        Track {
            index,
            name: name.to_string(),
            cells: cells(raw),
        }
    }

    fn table(tracks: Vec<Track>) -> TrackTable {
        let rows = tracks.iter().map(|t| t.cells.len()).max().unwrap_or(0);
        TrackTable { tracks, rows }
    }

    #[test]
    fn test_ratio_is_max_over_min() -> Result<()> {
        let summary = compute_ratios(&table(vec![
            track(0, "A", &["2", "4"]),
            track(1, "B", &["4", "8", "6"]),
        ]))?;

        assert_eq!(summary.points.len(), 2);
        assert_eq!(summary.points[0].ratio, 2.0);
        assert_eq!(summary.points[1].ratio, 2.0);
        assert_eq!(summary.points[1].index, 1);
        assert_eq!(summary.max_size_in_track, 3);
        Ok(())
    }

    #[test]
    fn test_invalid_track_is_not_parsed() -> Result<()> {
        // "abc" would fail to parse if the invalid track were touched
        let summary = compute_ratios(&table(vec![
            track(0, "A", &["abc", "-"]),
            track(1, "B", &["1", "3"]),
        ]))?;

        assert_eq!(summary.skipped, vec!["A".to_string()]);
        assert_eq!(summary.points.len(), 1);
        assert_eq!(summary.points[0].name, "B");
        assert_eq!(summary.points[0].index, 1);
        Ok(())
    }

    #[test]
    fn test_non_numeric_value_fails() {
        let err = compute_ratios(&table(vec![track(0, "A", &["1", "abc"])])).unwrap_err();
        match err {
            TrackError::InvalidNumber { track, value, .. } => {
                assert_eq!(track, "A");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_min_gives_infinity() -> Result<()> {
        let summary = compute_ratios(&table(vec![
            track(0, "A", &["0", "5"]),
            track(1, "Z", &["0", "0"]),
        ]))?;
        assert_eq!(summary.points[0].ratio, f64::INFINITY);
        assert!(summary.points[1].ratio.is_nan());
        Ok(())
    }

    #[test]
    fn test_negative_min_gives_negative_ratio() -> Result<()> {
        let summary = compute_ratios(&table(vec![track(0, "A", &["-2", "4"])]))?;
        assert_eq!(summary.points[0].ratio, -2.0);
        Ok(())
    }

    #[test]
    fn test_nan_value_propagates() -> Result<()> {
        let summary = compute_ratios(&table(vec![track(0, "A", &["1", "NaN", "4"])]))?;
        assert!(summary.points[0].ratio.is_nan());
        Ok(())
    }

    #[test]
    fn test_negative_zero_is_the_minimum() -> Result<()> {
        let summary = compute_ratios(&table(vec![
            track(0, "A", &["0", "-0", "5"]),
            track(1, "B", &["-0", "0", "5"]),
        ]))?;
        assert_eq!(summary.points[0].ratio, f64::NEG_INFINITY);
        assert_eq!(summary.points[1].ratio, f64::NEG_INFINITY);
        Ok(())
    }

    #[test]
    fn test_positive_zero_is_the_maximum() -> Result<()> {
        let summary = compute_ratios(&table(vec![track(0, "A", &["-0", "0", "-4"])]))?;
        // max is +0, so the ratio is +0 / -4
        let ratio = summary.points[0].ratio;
        assert_eq!(ratio, 0.0);
        assert!(ratio.is_sign_negative());
        Ok(())
    }

    #[test]
    fn test_overflow_is_out_of_range() {
        let err = compute_ratios(&table(vec![track(0, "A", &["1", "1e400"])])).unwrap_err();
        match err {
            TrackError::NumberOutOfRange { track, value } => {
                assert_eq!(track, "A");
                assert_eq!(value, "1e400");
            }
            other => panic!("unexpected error: {other}"),
        }
        let err = compute_ratios(&table(vec![track(0, "A", &["-1e400", "1"])])).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_spelled_infinity_is_accepted() -> Result<()> {
        let summary = compute_ratios(&table(vec![track(0, "A", &["2", "+Inf", "infinity"])]))?;
        assert_eq!(summary.points[0].ratio, f64::INFINITY);
        let summary = compute_ratios(&table(vec![track(0, "A", &["-inf", "3"])]))?;
        assert_eq!(summary.points[0].ratio, 3.0 / f64::NEG_INFINITY);
        Ok(())
    }

    #[test]
    fn test_empty_valid_track_fails() {
        let err = compute_ratios(&table(vec![track(0, "A", &[])])).unwrap_err();
        assert!(matches!(err, TrackError::EmptyTrack { .. }));
    }
}
