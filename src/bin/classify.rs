//! `bc-classify`: build a `ByteCutsClassifier` over a ruleset, classify a
//! packet trace, and report timing/structure metrics as a stats CSV row.
//! Mirrors `Classify.cpp`; CLI shape grounded on oxidecomputer-p4's `x4c`
//! (`clap` derive + `anyhow`).

use anyhow::{Context, Result};
use bytecuts::classifier::ByteCutsClassifier;
use bytecuts::config::Config;
use bytecuts::io::{packets, rules, stats};
use clap::Parser;
use std::time::Instant;

#[derive(Parser)]
#[command(version, about = "Build a ByteCuts classifier and classify a packet trace against it")]
struct Opts {
    /// Ruleset file (ClassBench or MSU format, auto-detected by content)
    #[arg(long)]
    rules: std::path::PathBuf,

    /// Packet trace: one 5-tuple per line
    #[arg(long)]
    packets: std::path::PathBuf,

    /// Stats CSV output path
    #[arg(long)]
    stats: std::path::PathBuf,

    /// Optional results file: one classified priority per line
    #[arg(long)]
    results: Option<std::path::PathBuf>,

    #[arg(long, default_value_t = bytecuts::config::DEFAULT_BAD_FRACTION)]
    bad_fraction: f64,

    #[arg(long, default_value_t = bytecuts::config::DEFAULT_TURNING_POINT)]
    turning_point: f64,

    #[arg(long, default_value_t = bytecuts::config::DEFAULT_MIN_FRACTION)]
    min_fraction: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let rules = rules::read_classbench(&opts.rules)
        .or_else(|_| rules::read_msu(&opts.rules))
        .with_context(|| format!("reading ruleset from {}", opts.rules.display()))?;
    log::info!("loaded {} rules from {}", rules.len(), opts.rules.display());

    let packets = packets::read_packets(&opts.packets).with_context(|| format!("reading packets from {}", opts.packets.display()))?;
    log::info!("loaded {} packets from {}", packets.len(), opts.packets.display());

    let config = Config { bad_fraction: opts.bad_fraction, turning_point: opts.turning_point, min_fraction: opts.min_fraction };

    let build_start = Instant::now();
    let classifier = ByteCutsClassifier::construct(&rules, &config);
    let build_elapsed = build_start.elapsed();
    log::info!("built {} trees ({} good, {} bad) in {:?}", classifier.num_tables(), classifier.num_good_trees(), classifier.num_bad_trees(), build_elapsed);

    let classify_start = Instant::now();
    let results: Vec<i32> = packets.iter().map(|p| classifier.classify(p)).collect();
    let classify_elapsed = classify_start.elapsed();
    log::info!("classified {} packets in {:?}", packets.len(), classify_elapsed);

    if let Some(results_path) = &opts.results {
        packets::write_results(results_path, &results).with_context(|| format!("writing results to {}", results_path.display()))?;
    }

    let row = stats::Stats::collect(opts.rules.display().to_string(), &classifier, build_elapsed, classify_elapsed);
    stats::write_stats(&opts.stats, &[row]).with_context(|| format!("writing stats to {}", opts.stats.display()))?;

    Ok(())
}
