use serde::Deserialize;
use std::{fs::File, path::Path};
use tracing::debug;

use crate::error::{Result, TrackError};

/// How the trailing Max/Min row renders each ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RatioFormat {
    /// Fixed number of decimal places (`precision`).
    #[default]
    Decimal,
    /// Truncated toward zero.
    Integer,
}

/// Shape of the output table.
///
/// Loaded from YAML, every field optional:
///
/// ```yaml
/// include_labels: true
/// time_label: Time
/// summary_label: Max/Min
/// ratio_format: decimal
/// precision: 2
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputPolicy {
    /// Emit the label column: header label, row index, summary label.
    pub include_labels: bool,
    pub time_label: String,
    pub summary_label: String,
    pub ratio_format: RatioFormat,
    /// Decimal places for `RatioFormat::Decimal`.
    pub precision: usize,
}

impl Default for OutputPolicy {
    fn default() -> Self {
        Self {
            include_labels: true,
            time_label: "Time".to_string(),
            summary_label: "Max/Min".to_string(),
            ratio_format: RatioFormat::Decimal,
            precision: 2,
        }
    }
}

impl OutputPolicy {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TrackError::OpenConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let policy: OutputPolicy =
            serde_yaml::from_reader(file).map_err(|source| TrackError::Config {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(?policy, path = %path.display(), "loaded output policy");
        Ok(policy)
    }
}
