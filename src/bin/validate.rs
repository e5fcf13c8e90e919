//! `bc-validate`: cross-check `ByteCutsClassifier` against the linear
//! reference classifier (and, optionally, an expected-results file) over the
//! same ruleset and packet trace, reporting any mismatch. Grounded on
//! original_source's `Validate.cpp`.

use anyhow::{Context, Result};
use bytecuts::classifier::{ByteCutsClassifier, Classifier};
use bytecuts::config::Config;
use bytecuts::io::{packets, rules};
use bytecuts::linear::LinearClassifier;
use clap::Parser;

#[derive(Parser)]
#[command(version, about = "Cross-check a ByteCuts classifier against the linear reference classifier")]
struct Opts {
    #[arg(long)]
    rules: std::path::PathBuf,

    #[arg(long)]
    packets: std::path::PathBuf,

    /// Optional expected-results file: one priority per line, checked
    /// against both classifiers in addition to their mutual agreement.
    #[arg(long)]
    expected: Option<std::path::PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let rules = rules::read_classbench(&opts.rules)
        .or_else(|_| rules::read_msu(&opts.rules))
        .with_context(|| format!("reading ruleset from {}", opts.rules.display()))?;
    let packets = packets::read_packets(&opts.packets).with_context(|| format!("reading packets from {}", opts.packets.display()))?;

    let config = Config::default();
    let tree = ByteCutsClassifier::build(&rules, &config);
    let reference = LinearClassifier::build(&rules, &config);

    let expected: Option<Vec<i32>> = opts
        .expected
        .as_ref()
        .map(|path| packets::read_expected(path))
        .transpose()
        .with_context(|| "reading expected results")?;

    let mut mismatches = 0usize;
    for (i, packet) in packets.iter().enumerate() {
        let tree_result = tree.classify(packet);
        let reference_result = reference.classify(packet);

        if tree_result != reference_result {
            mismatches += 1;
            eprintln!("packet {i}: tree={tree_result} linear={reference_result}");
            continue;
        }

        if let Some(expected) = &expected {
            if expected[i] != tree_result {
                mismatches += 1;
                eprintln!("packet {i}: got={tree_result} expected={}", expected[i]);
            }
        }
    }

    if mismatches == 0 {
        println!("ok: {} packets, no mismatches", packets.len());
        Ok(())
    } else {
        anyhow::bail!("{mismatches} of {} packets mismatched", packets.len());
    }
}
