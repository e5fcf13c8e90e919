//! File-format adapters for the two CLI binaries: rule/packet loaders,
//! result and stats writers. `std`-gated — the core classifier never
//! touches a filesystem (spec §2).

pub mod packets;
pub mod rules;
pub mod stats;
