use std::cmp::Ordering;
use tracing::debug;

use super::ratio::Point;

/// Order points ascending by ratio. The sort is stable, so equal ratios keep
/// their table order.
pub fn sort_by_ratio(mut points: Vec<Point>) -> Vec<Point> {
    points.sort_by(|a, b| ratio_order(a.ratio, b.ratio));
    debug!(
        order = ?points.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        "sorted tracks"
    );
    points
}

/// Total order over ratios: NaN is greater than every number and equal to
/// any other NaN; `-0.0` and `0.0` are equal.
pub fn ratio_order(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}
