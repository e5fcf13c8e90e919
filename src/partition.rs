//! Splits a ruleset into a subset sharing a common address prefix plus a
//! residual, per spec §4.1. Ported from original_source's
//! `ByteCutsClassifier::Separate`, which this follows statement-for-statement
//! (including its "neither candidate dominates" tie-break, spec §9 note 2).

use crate::config::Config;
use crate::rule::{Dim, Rule, BITS_PER_FIELD, BITS_PER_NYBBLE};
use alloc::vec::Vec;
use hashbrown::HashMap;

/// `Separate(R) -> (kept, remain)`: `kept` shares a common prefix of some
/// length on some address dimension; `remain` is everything else.
pub fn separate(rules: &[Rule], config: &Config) -> (Vec<Rule>, Vec<Rule>) {
    if rules.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let mut best_dim = Dim::SrcAddr;
    let mut best_len = BITS_PER_NYBBLE;
    let mut best_cost = usize::MAX;
    let mut best_part = usize::MAX;
    let mut best_remain = usize::MAX;
    let mut chosen = false;

    let mut len = BITS_PER_NYBBLE;
    while len <= BITS_PER_FIELD {
        for &dim in &Dim::ADDR {
            let mut counts: HashMap<u32, usize> = HashMap::new();
            let mut dropped = 0usize;

            for r in rules {
                if r.prefix_length(dim) as u32 >= len {
                    let mask = nybble_mask(len);
                    let x = r.range(dim).low & mask;
                    *counts.entry(x).or_insert(0) += 1;
                } else {
                    dropped += 1;
                }
            }

            let max_part = counts.values().copied().max().unwrap_or(0);
            let kept = rules.len() - dropped;
            let cost = dropped + max_part;

            let ratio_in = if kept == 0 { f64::INFINITY } else { max_part as f64 / kept as f64 };
            let ratio_out = dropped as f64 / rules.len() as f64;

            let better_partition = max_part < best_part;
            let better_remain = dropped < best_remain;
            let good_partition = max_part <= best_part;
            let good_remain = dropped <= best_remain;

            let better = if good_partition && good_remain {
                true
            } else if !good_partition && !good_remain {
                false
            } else if ratio_in < config.turning_point {
                better_remain || (good_remain && better_partition)
            } else if ratio_out < (1.0 - config.min_fraction) {
                better_partition || (good_partition && better_remain)
            } else {
                cost < best_cost
            };

            if better {
                best_dim = dim;
                best_len = len;
                best_cost = cost;
                best_part = max_part;
                best_remain = dropped;
                chosen = true;
            }
        }
        len += BITS_PER_NYBBLE;
    }

    debug_assert!(chosen, "Separate must consider at least one (dim, len) candidate");

    let mut kept = Vec::new();
    let mut remain = Vec::new();
    for r in rules {
        if r.prefix_length(best_dim) as u32 >= best_len {
            kept.push(r.clone());
        } else {
            remain.push(r.clone());
        }
    }
    (kept, remain)
}

fn nybble_mask(len: u32) -> u32 {
    if len >= 32 {
        0xFFFF_FFFF
    } else {
        0xFFFF_FFFFu32 << (32 - len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Interval;

    fn addr_rule(priority: i32, addr: u32, len: u8) -> Rule {
        Rule::new(
            priority,
            Interval::exact(addr),
            len,
            Interval::any(),
            0,
            Interval::any(),
            Interval::any(),
            Interval::any(),
        )
    }

    #[test]
    fn groups_by_shared_prefix() {
        let rules = alloc::vec![
            addr_rule(0, 0xC0A8_0001, 24),
            addr_rule(1, 0xC0A8_00FF, 24),
            addr_rule(2, 0x0A00_0001, 8),
        ];
        let config = Config::default();
        let (kept, remain) = separate(&rules, &config);
        assert_eq!(kept.len() + remain.len(), rules.len());
        assert!(!kept.is_empty());
    }

    #[test]
    fn empty_ruleset_has_no_partition() {
        let config = Config::default();
        let (kept, remain) = separate(&[], &config);
        assert!(kept.is_empty() && remain.is_empty());
    }
}
