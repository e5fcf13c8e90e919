//! The top-level `ByteCutsClassifier` driver: partitions a ruleset into a
//! sequence of trees, then classifies a packet by priority-pruned linear scan
//! over them. Ported from `ByteCutsClassifier::ConstructClassifier` /
//! `ClassifyAPacket` in original_source, restructured around the teacher's
//! `Classifier` trait (`src/classifier.rs`) so `ByteCutsClassifier` and
//! `LinearClassifier` (src/linear.rs) are interchangeable for `bc-validate`.

use crate::builder::{Builder, BuilderConfig};
use crate::config::Config;
use crate::packet::Packet;
use crate::partition;
use crate::rule::{sort_by_priority_desc, Rule, NO_MATCH};
use crate::tree::Tree;
use alloc::vec::Vec;

/// Per-field byte cost of one rule entry inside a `Leaf`, used by
/// `ByteCutsClassifier::mem_bytes`. Matches the original's `RULE_ENTRY_SIZE`:
/// two 32-bit address ranges (8), two 16-bit port ranges (4), one byte
/// protocol range (1), plus a 2-byte priority/id field — 19 bytes.
pub const RULE_ENTRY_SIZE: usize = 19;

/// Shared interface for cross-checking `ByteCutsClassifier` against the
/// reference `LinearClassifier` in `bc-validate`.
pub trait Classifier {
    fn build(rules: &[Rule], config: &Config) -> Self
    where
        Self: Sized;

    fn classify(&self, packet: &Packet) -> i32;
}

/// Single-threaded to build; once `construct` returns, every field is
/// immutable for the classifier's lifetime, so `ByteCutsClassifier` is
/// `Send + Sync` and safe to share behind an `Arc` for concurrent lookups.
/// There is no internal mutable state for `classify` to race on.
pub struct ByteCutsClassifier {
    trees: Vec<Tree>,
    num_good_trees: usize,
    num_bad_trees: usize,
}

impl ByteCutsClassifier {
    /// Mirrors `ConstructClassifier`: sort once by descending priority, then
    /// alternate `Separate` (partition by address prefix) and tree-building
    /// until the residual is small enough (`bad_fraction` of the original
    /// ruleset) to dump wholesale into secondary ("bad") trees.
    pub fn construct(rules: &[Rule], config: &Config) -> Self {
        let mut sorted = rules.to_vec();
        sort_by_priority_desc(&mut sorted);
        let total = sorted.len();

        let primary_cfg = BuilderConfig::primary_default();
        let secondary_cfg = BuilderConfig::secondary_default();
        let primary_builder = Builder::new(primary_cfg);
        let secondary_builder = Builder::new(secondary_cfg);

        let mut trees = Vec::new();
        let mut num_good_trees = 0usize;
        let mut num_bad_trees = 0usize;

        let mut residual = sorted;
        let bad_floor = (total as f64 * config.bad_fraction).ceil() as usize;

        loop {
            if residual.is_empty() || residual.len() <= bad_floor {
                break;
            }
            let (kept, remain) = partition::separate(&residual, config);
            if kept.is_empty() {
                // Separate found no usable prefix grouping; everything goes
                // to secondary trees below.
                break;
            }
            if remain.len() >= residual.len() {
                // No progress: avoid looping forever on a pathological ruleset.
                break;
            }
            residual = remain;

            // The tree's `max_priority` bound is conservative: it covers
            // every rule handed to this partition round, including any that
            // a later `remain` extraction pushes back out, since a rejected
            // rule might still be placed in an *earlier* primary tree of
            // this same round before truncation. Using the round's full
            // input keeps pruning sound even though it may be loose.
            let mut round_max = i32::MIN;
            for r in &kept {
                round_max = round_max.max(r.priority);
            }

            let mut pending = kept;
            while !pending.is_empty() {
                let (tree, leftover) = primary_builder.build_primary_root(&pending, round_max);
                trees.push(tree);
                num_good_trees += 1;
                if leftover.len() >= pending.len() {
                    // Builder made no progress; stop to avoid an infinite loop.
                    break;
                }
                pending = leftover;
            }
        }

        if !residual.is_empty() {
            let mut round_max = i32::MIN;
            for r in &residual {
                round_max = round_max.max(r.priority);
            }
            let tree = secondary_builder.build_secondary_root(&residual, round_max);
            trees.push(tree);
            num_bad_trees += 1;
        }

        Self { trees, num_good_trees, num_bad_trees }
    }

    /// Priority-pruned scan: a tree whose `max_priority` cannot beat the best
    /// match found so far is skipped outright, per `ClassifyAPacket`.
    pub fn classify(&self, packet: &Packet) -> i32 {
        let mut best = NO_MATCH;
        for tree in &self.trees {
            if tree.max_priority <= best {
                continue;
            }
            let hit = tree.classify(packet);
            if hit > best {
                best = hit;
            }
        }
        best
    }

    pub fn mem_bytes(&self) -> usize {
        self.trees.iter().map(|t| t.size(RULE_ENTRY_SIZE)).sum()
    }

    pub fn num_tables(&self) -> usize {
        self.trees.len()
    }

    pub fn num_good_trees(&self) -> usize {
        self.num_good_trees
    }

    pub fn num_bad_trees(&self) -> usize {
        self.num_bad_trees
    }

    pub fn rules_in_table(&self, index: usize) -> usize {
        self.trees[index].num_rules
    }

    pub fn priority_of_table(&self, index: usize) -> i32 {
        self.trees[index].max_priority
    }

    pub fn height_of_tree(&self, index: usize) -> usize {
        self.trees[index].height()
    }

    pub fn cost_of_tree(&self, index: usize) -> usize {
        self.trees[index].cost()
    }
}

impl Classifier for ByteCutsClassifier {
    fn build(rules: &[Rule], config: &Config) -> Self {
        Self::construct(rules, config)
    }

    fn classify(&self, packet: &Packet) -> i32 {
        ByteCutsClassifier::classify(self, packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Interval;

    fn rule(priority: i32, sa: u32, sa_len: u8, da: u32, da_len: u8) -> Rule {
        Rule::new(priority, Interval::exact(sa), sa_len, Interval::exact(da), da_len, Interval::any(), Interval::any(), Interval::any())
    }

    #[test]
    fn empty_ruleset_never_matches() {
        let config = Config::default();
        let classifier = ByteCutsClassifier::construct(&[], &config);
        assert_eq!(classifier.classify(&Packet::new(1, 2, 3, 4, 5)), NO_MATCH);
        assert_eq!(classifier.num_tables(), 0);
    }

    #[test]
    fn higher_priority_rule_wins_on_overlap() {
        let rules = alloc::vec![rule(5, 10, 32, 20, 32), rule(9, 10, 32, 20, 32)];
        let config = Config::default();
        let classifier = ByteCutsClassifier::construct(&rules, &config);
        assert_eq!(classifier.classify(&Packet::new(10, 20, 0, 0, 0)), 9);
    }

    #[test]
    fn disjoint_rules_each_match_their_own_packet() {
        let rules: Vec<Rule> = (0..40).map(|i| rule(i, i as u32, 32, i as u32, 32)).collect();
        let config = Config::default();
        let classifier = ByteCutsClassifier::construct(&rules, &config);
        for i in 0..40u32 {
            assert_eq!(classifier.classify(&Packet::new(i, i, 0, 0, 0)), i as i32);
        }
        assert_eq!(classifier.classify(&Packet::new(1000, 1000, 0, 0, 0)), NO_MATCH);
    }
}
