use bytecuts::classifier::{ByteCutsClassifier, Classifier};
use bytecuts::config::Config;
use bytecuts::linear::LinearClassifier;
use bytecuts::packet::Packet;
use bytecuts::rule::{Interval, Rule, NO_MATCH};
use bytecuts::simulation::Simulation;

fn build(rules: &[Rule]) -> ByteCutsClassifier {
    ByteCutsClassifier::construct(rules, &Config::default())
}

/// S1 — single rule exact match.
#[test]
fn s1_single_rule_exact_match() {
    let rules = vec![Rule::new(
        0,
        Interval::exact(0x0A00_0001),
        32,
        Interval::exact(0x0A00_0002),
        32,
        Interval::exact(80),
        Interval::exact(80),
        Interval::exact(6),
    )];
    let classifier = build(&rules);

    assert_eq!(classifier.classify(&Packet::new(0x0A00_0001, 0x0A00_0002, 80, 80, 6)), 0);
    assert_eq!(classifier.classify(&Packet::new(0x0A00_0001, 0x0A00_0003, 80, 80, 6)), NO_MATCH);
}

/// S2 — priority ordering between a catch-all and a more specific rule.
#[test]
fn s2_priority_ordering() {
    let rules = vec![
        Rule::new(0, Interval::any(), 0, Interval::any(), 0, Interval::any(), Interval::any(), Interval::any()),
        Rule::new(1, Interval::new(0xC0A8_0000, 0xC0A8_FFFF), 16, Interval::any(), 0, Interval::any(), Interval::any(), Interval::any()),
    ];
    let classifier = build(&rules);

    assert_eq!(classifier.classify(&Packet::new(0xC0A8_0101, 0, 0, 0, 0)), 1);
    assert_eq!(classifier.classify(&Packet::new(0x0A00_0001, 0, 0, 0, 0)), 0);
}

/// S3 — port range admits a Split (or a matching Cut) and rejects outside it.
#[test]
fn s3_port_range_split() {
    let rules = vec![Rule::new(
        0,
        Interval::any(),
        0,
        Interval::any(),
        0,
        Interval::new(1000, 2000),
        Interval::any(),
        Interval::any(),
    )];
    let classifier = build(&rules);

    assert_eq!(classifier.classify(&Packet::new(0, 0, 1500, 0, 0)), 0);
    assert_eq!(classifier.classify(&Packet::new(0, 0, 2001, 0, 0)), NO_MATCH);
}

/// S4 — protocol wildcard vs specific.
#[test]
fn s4_protocol_wildcard_vs_specific() {
    let rules = vec![
        Rule::new(0, Interval::any(), 0, Interval::any(), 0, Interval::any(), Interval::any(), Interval::any()),
        Rule::new(1, Interval::any(), 0, Interval::any(), 0, Interval::any(), Interval::any(), Interval::exact(17)),
    ];
    let classifier = build(&rules);

    assert_eq!(classifier.classify(&Packet::new(0, 0, 0, 0, 17)), 1);
    assert_eq!(classifier.classify(&Packet::new(0, 0, 0, 0, 6)), 0);
}

/// S5 — empty ruleset never matches.
#[test]
fn s5_empty_ruleset() {
    let classifier = build(&[]);
    assert_eq!(classifier.classify(&Packet::new(1, 2, 3, 4, 5)), NO_MATCH);
    assert_eq!(classifier.num_tables(), 0);
}

/// S6 — large random ruleset agrees with the linear reference classifier.
#[test]
fn s6_large_random_ruleset_matches_linear_reference() {
    let mut sim = Simulation::new(12345);
    let rules = sim.generate_rules(1000);
    let packets = sim.generate_packets(2000);

    let config = Config::default();
    let linear = LinearClassifier::build(&rules, &config);
    let tree = ByteCutsClassifier::build(&rules, &config);

    for (i, packet) in packets.iter().enumerate() {
        let expected = linear.classify(packet);
        let actual = tree.classify(packet);
        assert_eq!(actual, expected, "mismatch at packet {i} {packet:?}: linear={expected} tree={actual}");
    }
}

/// Invariant 4 — determinism: two constructions on the same ruleset agree.
#[test]
fn determinism_across_two_constructions() {
    let mut sim = Simulation::new(999);
    let rules = sim.generate_rules(300);
    let packets = sim.generate_packets(200);

    let config = Config::default();
    let a = ByteCutsClassifier::construct(&rules, &config);
    let b = ByteCutsClassifier::construct(&rules, &config);

    for packet in &packets {
        assert_eq!(a.classify(packet), b.classify(packet));
    }
}

/// Invariant 5 — idempotence: reclassifying is stable.
#[test]
fn idempotent_classification() {
    let mut sim = Simulation::new(555);
    let rules = sim.generate_rules(200);
    let classifier = build(&rules);
    let packet = Packet::new(0xC0A8_0101, 0x0A00_0001, 80, 443, 6);

    let first = classifier.classify(&packet);
    for _ in 0..5 {
        assert_eq!(classifier.classify(&packet), first);
    }
}

/// Invariant 6 — node accounting: rules placed across all tables sum to at
/// least the ruleset size.
#[test]
fn node_accounting_covers_every_rule() {
    let mut sim = Simulation::new(24680);
    let rules = sim.generate_rules(500);
    let classifier = build(&rules);

    let placed: usize = (0..classifier.num_tables()).map(|i| classifier.rules_in_table(i)).sum();
    assert!(placed >= rules.len(), "placed {placed} < {} rules", rules.len());
}

/// Invariant 3 — priority monotonicity: pruning by `max_priority` never
/// changes the result versus scanning every tree unconditionally.
#[test]
fn pruning_matches_unpruned_scan() {
    let mut sim = Simulation::new(314159);
    let rules = sim.generate_rules(400);
    let packets = sim.generate_packets(300);
    let config = Config::default();

    let pruned = ByteCutsClassifier::construct(&rules, &config);
    let linear = LinearClassifier::build(&rules, &config);

    for packet in &packets {
        assert_eq!(pruned.classify(packet), linear.classify(packet));
    }
}
