use anyhow::{Context, Result};
use clap::Parser;
use std::{io, path::PathBuf, process::ExitCode};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use trackratio::{run, OutputPolicy, RatioFormat, RunConfig, RunReport, TrackError};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Sort the tracks of a tab-separated table by max/min ratio"
)]
struct Args {
    /// Input table, e.g. input.csv
    input: PathBuf,

    /// Output table, created or overwritten
    output: PathBuf,

    /// YAML output policy; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Omit the time label column and the Max/Min label
    #[arg(long)]
    no_labels: bool,

    /// Truncate ratios to integers instead of printing decimals
    #[arg(long)]
    integer_ratios: bool,

    /// Decimal places for ratios
    #[arg(long)]
    precision: Option<usize>,

    /// Wait for Enter before exiting on failure
    #[arg(long)]
    pause_on_error: bool,
}

impl Args {
    fn policy(&self) -> Result<OutputPolicy> {
        let mut policy = match &self.config {
            Some(path) => OutputPolicy::from_yaml_file(path)?,
            None => OutputPolicy::default(),
        };
        if self.no_labels {
            policy.include_labels = false;
        }
        if self.integer_ratios {
            policy.ratio_format = RatioFormat::Integer;
        }
        if let Some(precision) = self.precision {
            policy.precision = precision;
        }
        Ok(policy)
    }
}

fn try_main(args: &Args) -> Result<RunReport> {
    let policy = args.policy().context("loading output policy")?;
    let config = RunConfig {
        input: args.input.clone(),
        output: args.output.clone(),
        policy,
    };
    let report = run(&config).with_context(|| {
        format!(
            "sorting {} into {}",
            config.input.display(),
            config.output.display()
        )
    })?;
    Ok(report)
}

fn main() -> ExitCode {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match try_main(&args) {
        Ok(report) => {
            info!(
                tracks = report.tracks_written,
                rows = report.rows_written,
                "finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("{:#}", err);
            if args.pause_on_error {
                let mut line = String::new();
                let _ = io::stdin().read_line(&mut line);
            }
            let code = err
                .downcast_ref::<TrackError>()
                .map_or(1, TrackError::exit_code);
            ExitCode::from(code)
        }
    }
}
