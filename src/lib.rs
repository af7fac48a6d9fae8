//! Reorder the tracks of a tab-separated time-series table by their max/min
//! ratio, dropping tracks that hold the `-` sentinel.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod process;

pub use config::{OutputPolicy, RatioFormat};
pub use error::{Result, TrackError};
pub use pipeline::{run, RunConfig, RunReport};
