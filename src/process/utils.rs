use std::path::Path;

use crate::config::{OutputPolicy, RatioFormat};

/// True when the path mentions `.csv` anywhere. Substring match only, the
/// extension is not otherwise validated.
pub fn looks_like_csv(path: &Path) -> bool {
    path.to_string_lossy().contains(".csv")
}

/// Render a ratio for the summary row.
///
/// Non-finite values are spelled `+Inf`, `-Inf` and `NaN` in every format.
pub fn format_ratio(value: f64, policy: &OutputPolicy) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    match policy.ratio_format {
        RatioFormat::Decimal => format!("{:.*}", policy.precision, value),
        RatioFormat::Integer => {
            let truncated = value.trunc();
            if truncated == 0.0 {
                // no "-0"
                "0".to_string()
            } else {
                format!("{truncated:.0}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integer() -> OutputPolicy {
        OutputPolicy {
            ratio_format: RatioFormat::Integer,
            ..Default::default()
        }
    }

    #[test]
    fn test_looks_like_csv_is_substring_check() {
        assert!(looks_like_csv(Path::new("input.csv")));
        assert!(looks_like_csv(Path::new("data.csv.bak")));
        assert!(!looks_like_csv(Path::new("input.tsv")));
        assert!(!looks_like_csv(Path::new("input.CSV")));
    }

    #[test]
    fn test_decimal_two_places() {
        let policy = OutputPolicy::default();
        assert_eq!(format_ratio(2.0, &policy), "2.00");
        assert_eq!(format_ratio(10.0 / 3.0, &policy), "3.33");
        assert_eq!(format_ratio(-2.5, &policy), "-2.50");
    }

    #[test]
    fn test_decimal_custom_precision() {
        let policy = OutputPolicy {
            precision: 4,
            ..Default::default()
        };
        assert_eq!(format_ratio(1.0 / 8.0, &policy), "0.1250");
    }

    #[test]
    fn test_integer_truncates_toward_zero() {
        let policy = integer();
        assert_eq!(format_ratio(2.99, &policy), "2");
        assert_eq!(format_ratio(-2.99, &policy), "-2");
        assert_eq!(format_ratio(-0.5, &policy), "0");
        assert_eq!(format_ratio(12345.9, &policy), "12345");
    }

    #[test]
    fn test_non_finite_spelling() {
        for policy in [OutputPolicy::default(), integer()] {
            assert_eq!(format_ratio(f64::INFINITY, &policy), "+Inf");
            assert_eq!(format_ratio(f64::NEG_INFINITY, &policy), "-Inf");
            assert_eq!(format_ratio(f64::NAN, &policy), "NaN");
        }
    }
}
