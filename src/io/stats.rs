//! Stats CSV writer, the output `Classify.cpp`'s CLI equivalent produces:
//! one row per run with the exact column set in spec §6.

extern crate std;

use crate::classifier::ByteCutsClassifier;
use crate::error::LoaderError;
use alloc::string::String;
use alloc::vec::Vec;
use std::path::Path;
use std::time::Duration;

/// One run's reported metrics, gathered from a built `ByteCutsClassifier`
/// plus the measured build/classify wall-clock time.
pub struct Stats {
    pub name: String,
    pub build: Duration,
    pub classify: Duration,
    pub memory: usize,
    pub max_height: usize,
    pub sum_height: usize,
    pub max_cost: usize,
    pub sum_cost: usize,
    pub trees: usize,
    pub first_size: usize,
    pub table90: usize,
    pub table95: usize,
    pub table99: usize,
    pub heights: Vec<usize>,
    pub costs: Vec<usize>,
    pub priors: Vec<i32>,
    pub bad_trees: usize,
    pub good_trees: usize,
}

impl Stats {
    pub fn collect(name: String, classifier: &ByteCutsClassifier, build: Duration, classify: Duration) -> Self {
        let trees = classifier.num_tables();
        let heights: Vec<usize> = (0..trees).map(|i| classifier.height_of_tree(i)).collect();
        let costs: Vec<usize> = (0..trees).map(|i| classifier.cost_of_tree(i)).collect();
        let priors: Vec<i32> = (0..trees).map(|i| classifier.priority_of_table(i)).collect();
        let rule_counts: Vec<usize> = (0..trees).map(|i| classifier.rules_in_table(i)).collect();

        let total_rules: usize = rule_counts.iter().sum();
        let table_at = |fraction: f64| -> usize {
            if total_rules == 0 {
                return 0;
            }
            let target = (total_rules as f64 * fraction).ceil() as usize;
            let mut cumulative = 0usize;
            for (i, count) in rule_counts.iter().enumerate() {
                cumulative += count;
                if cumulative >= target {
                    return i + 1;
                }
            }
            trees
        };

        Self {
            name,
            build,
            classify,
            memory: classifier.mem_bytes(),
            max_height: heights.iter().copied().max().unwrap_or(0),
            sum_height: heights.iter().sum(),
            max_cost: costs.iter().copied().max().unwrap_or(0),
            sum_cost: costs.iter().sum(),
            trees,
            first_size: rule_counts.first().copied().unwrap_or(0),
            table90: table_at(0.90),
            table95: table_at(0.95),
            table99: table_at(0.99),
            heights,
            costs,
            priors,
            bad_trees: classifier.num_bad_trees(),
            good_trees: classifier.num_good_trees(),
        }
    }
}

fn join_list<T: core::fmt::Display>(values: &[T]) -> String {
    let mut s = String::new();
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            s.push(';');
        }
        s.push_str(&alloc::format!("{v}"));
    }
    s
}

pub fn write_stats(path: impl AsRef<Path>, rows: &[Stats]) -> Result<(), LoaderError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Name", "Build", "Classify", "Memory", "MaxHeight", "SumHeight", "MaxCost", "SumCost", "Trees", "FirstSize", "Table90",
        "Table95", "Table99", "Heights", "Costs", "Priors", "BadTrees", "GoodTrees",
    ])?;

    for row in rows {
        writer.write_record([
            row.name.clone(),
            alloc::format!("{}", row.build.as_secs_f64()),
            alloc::format!("{}", row.classify.as_secs_f64()),
            alloc::format!("{}", row.memory),
            alloc::format!("{}", row.max_height),
            alloc::format!("{}", row.sum_height),
            alloc::format!("{}", row.max_cost),
            alloc::format!("{}", row.sum_cost),
            alloc::format!("{}", row.trees),
            alloc::format!("{}", row.first_size),
            alloc::format!("{}", row.table90),
            alloc::format!("{}", row.table95),
            alloc::format!("{}", row.table99),
            join_list(&row.heights),
            join_list(&row.costs),
            join_list(&row.priors),
            alloc::format!("{}", row.bad_trees),
            alloc::format!("{}", row.good_trees),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

impl From<csv::Error> for LoaderError {
    fn from(e: csv::Error) -> Self {
        LoaderError::MalformedLine { line: 0, reason: alloc::format!("csv error: {e}") }
    }
}
