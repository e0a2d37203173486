//! Token distribution sampler.
//!
//! Derives tokens for a key sample under each partitioner, prints the
//! per-index series and the aggregate summary.
//!
//! Run with:
//!   cargo run -- --count 100 --partitioner murmur3 --partitioner byte-ordered

use anyhow::Context;
use clap::{Parser, ValueEnum};
use ringtoken::config::SamplingConfig;
use ringtoken::partitioning::Partitioner;
use ringtoken::sampling::{SampleObserver, SampleReport, TokenSampler};
use ringtoken::types::TokenObservation;
use serde::Serialize;
use std::str::FromStr;
use tracing::Level;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line per token followed by the summary.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "ringtoken",
    about = "Compare token distributions of hash-ring partitioners over a key sample."
)]
struct Args {
    /// Number of keys to sample
    #[arg(long, default_value = "100")]
    count: u64,

    /// First key index
    #[arg(long, default_value = "0")]
    start: u64,

    /// Prefix of generated keys
    #[arg(long, default_value = "key-")]
    prefix: String,

    /// Partitioners to run: murmur3 or byte-ordered (repeatable, default: all)
    #[arg(long = "partitioner", value_parser = Partitioner::from_str)]
    partitioners: Vec<Partitioner>,

    /// Fractional digits of exact averages
    #[arg(long, default_value_t = ringtoken::stats::DEFAULT_AVERAGE_SCALE)]
    scale: u32,

    /// Use seeded random keys instead of `<prefix><i>`
    #[arg(long)]
    random_seed: Option<u64>,

    /// Length in bytes of random keys
    #[arg(long, default_value = "16")]
    key_len: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn to_config(&self) -> SamplingConfig {
        let mut config = SamplingConfig::new(self.count)
            .with_start(self.start)
            .with_key_prefix(self.prefix.clone())
            .with_average_scale(self.scale);

        if !self.partitioners.is_empty() {
            config = config.with_partitioners(self.partitioners.iter().copied());
        }
        if let Some(seed) = self.random_seed {
            config = config.with_random_keys(seed, self.key_len);
        }
        config
    }
}

/// Prints each token as it is derived.
struct TextObserver;

impl SampleObserver for TextObserver {
    fn observe(&mut self, obs: &TokenObservation) {
        println!(
            "{:>6}  {:<24} value={:<40} token={}",
            obs.index,
            obs.partitioner.name(),
            obs.value,
            obs.text
        );
    }
}

/// Observation as rendered in JSON output.
#[derive(Serialize)]
struct ObservationRow {
    index: u64,
    partitioner: &'static str,
    value: String,
    plot_value: f64,
    token: String,
}

#[derive(Serialize)]
struct SummaryRow {
    partitioner: &'static str,
    sampled: u64,
    decoded: u64,
    skipped: u64,
    average: Option<String>,
    min: Option<String>,
    max: Option<String>,
}

#[derive(Serialize)]
struct JsonOutput {
    keys_sampled: u64,
    observations: Vec<ObservationRow>,
    summaries: Vec<SummaryRow>,
}

fn json_output(observations: Vec<TokenObservation>, report: &SampleReport) -> JsonOutput {
    JsonOutput {
        keys_sampled: report.keys_sampled,
        observations: observations
            .into_iter()
            .map(|o| ObservationRow {
                index: o.index,
                partitioner: o.partitioner.name(),
                plot_value: o.value.to_f64(),
                value: o.value.to_string(),
                token: o.text,
            })
            .collect(),
        summaries: report
            .summaries
            .iter()
            .map(|s| SummaryRow {
                partitioner: s.partitioner.name(),
                sampled: s.sampled(),
                decoded: s.decoded,
                skipped: s.skipped,
                average: s.average.as_ref().map(|v| v.to_string()),
                min: s.min.as_ref().map(|v| v.to_string()),
                max: s.max.as_ref().map(|v| v.to_string()),
            })
            .collect(),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let sampler = TokenSampler::new(args.to_config()).context("invalid sampling options")?;

    match args.format {
        OutputFormat::Text => {
            let report = sampler
                .run_with_observer(&mut TextObserver)
                .context("sampling failed")?;
            println!();
            print!("{}", report);
        }
        OutputFormat::Json => {
            let mut observations = Vec::new();
            let mut collect = |o: &TokenObservation| observations.push(o.clone());
            let report = sampler
                .run_with_observer(&mut collect)
                .context("sampling failed")?;

            let output = json_output(observations, &report);
            let json = serde_json::to_string_pretty(&output).context("failed to encode report")?;
            println!("{}", json);
        }
    }

    Ok(())
}
