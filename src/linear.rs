//! Reference brute-force classifier: sorted linear scan, no tree structure.
//! Used by `bc-validate` as the correctness oracle `ByteCutsClassifier` is
//! checked against, and by tests and benches that need a trusted baseline.

use crate::classifier::Classifier;
use crate::config::Config;
use crate::packet::Packet;
use crate::rule::{sort_by_priority_desc, Rule, NO_MATCH};
use alloc::vec::Vec;

pub struct LinearClassifier {
    rules: Vec<Rule>,
}

impl Classifier for LinearClassifier {
    fn build(rules: &[Rule], _config: &Config) -> Self {
        let mut sorted_rules = rules.to_vec();
        sort_by_priority_desc(&mut sorted_rules);
        Self { rules: sorted_rules }
    }

    fn classify(&self, packet: &Packet) -> i32 {
        for rule in &self.rules {
            if rule.matches(packet) {
                return rule.priority;
            }
        }
        NO_MATCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Interval;

    #[test]
    fn highest_priority_match_wins() {
        let rules = alloc::vec![
            Rule::new(1, Interval::exact(10), 32, Interval::any(), 0, Interval::any(), Interval::any(), Interval::any()),
            Rule::new(7, Interval::exact(10), 32, Interval::any(), 0, Interval::any(), Interval::any(), Interval::any()),
        ];
        let classifier = LinearClassifier::build(&rules, &Config::default());
        assert_eq!(classifier.classify(&Packet::new(10, 0, 0, 0, 0)), 7);
    }

    #[test]
    fn no_match_returns_sentinel() {
        let classifier = LinearClassifier::build(&[], &Config::default());
        assert_eq!(classifier.classify(&Packet::new(1, 2, 3, 4, 5)), NO_MATCH);
    }
}
