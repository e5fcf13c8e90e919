//! `BC.*` construction options.
//!
//! Mirrors the original `ByteCutsClassifier(const unordered_map<string,
//! string>&)` constructor: options are looked up by name with a default,
//! and anything outside `(0, 1]` is reported and replaced by the default
//! rather than rejected — construction has no failure mode (spec §7).

use alloc::string::String;
use hashbrown::HashMap;

/// Partitioner residual floor as a fraction of the original ruleset size.
pub const DEFAULT_BAD_FRACTION: f64 = 0.02;
/// `ratioIn` threshold below which the partitioner prefers shrinking the residual.
pub const DEFAULT_TURNING_POINT: f64 = 0.01;
/// `1 - ratioOut` threshold below which the partitioner prefers shrinking the partition.
pub const DEFAULT_MIN_FRACTION: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub bad_fraction: f64,
    pub turning_point: f64,
    pub min_fraction: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bad_fraction: DEFAULT_BAD_FRACTION,
            turning_point: DEFAULT_TURNING_POINT,
            min_fraction: DEFAULT_MIN_FRACTION,
        }
    }
}

impl Config {
    /// Parse `BC.BadFraction`/`BC.TurningPoint`/`BC.MinFraction` out of a
    /// string-keyed option map, as the programmatic surface in spec §6
    /// describes. Values outside `(0, 1]`, or that fail to parse, are
    /// logged and replaced by the default.
    pub fn from_map(args: &HashMap<String, String>) -> Self {
        Self {
            bad_fraction: parse_fraction(args, "BC.BadFraction", DEFAULT_BAD_FRACTION),
            turning_point: parse_fraction(args, "BC.TurningPoint", DEFAULT_TURNING_POINT),
            min_fraction: parse_fraction(args, "BC.MinFraction", DEFAULT_MIN_FRACTION),
        }
    }
}

fn parse_fraction(args: &HashMap<String, String>, key: &str, default: f64) -> f64 {
    let Some(raw) = args.get(key) else {
        return default;
    };
    match raw.parse::<f64>() {
        Ok(v) if v > 0.0 && v <= 1.0 => v,
        Ok(v) => {
            #[cfg(feature = "std")]
            log::warn!("{key}={v} out of range (0, 1]; using default {default}");
            default
        }
        Err(_) => {
            #[cfg(feature = "std")]
            log::warn!("{key}={raw:?} is not a number; using default {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn defaults_when_absent() {
        let cfg = Config::from_map(&HashMap::new());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn clamps_out_of_range_to_default() {
        let mut args = HashMap::new();
        args.insert("BC.BadFraction".to_string(), "5.0".to_string());
        let cfg = Config::from_map(&args);
        assert_eq!(cfg.bad_fraction, DEFAULT_BAD_FRACTION);
    }

    #[test]
    fn accepts_in_range_value() {
        let mut args = HashMap::new();
        args.insert("BC.TurningPoint".to_string(), "0.05".to_string());
        let cfg = Config::from_map(&args);
        assert_eq!(cfg.turning_point, 0.05);
    }
}
