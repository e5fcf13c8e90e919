//! Error types for the `std`-gated file-loading/CLI boundary. The core
//! (`rule`, `partition`, `builder`, `tree`, `classifier`) has no fallible
//! entry points of its own — construction either completes or the crate was
//! never given a ruleset to build from (spec §7).

extern crate std;

use std::string::String;

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed input at line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("unsupported field count: expected a 5-field ruleset, found {found}")]
    UnsupportedFieldCount { found: usize },
}
