#![cfg_attr(not(feature = "std"), no_std)]

//! ByteCuts: a partitioned nibble-cut/port-split decision tree for 5-tuple
//! packet classification, after Daly's ByteCuts algorithm. The core —
//! `rule`, `packet`, `partition`, `tree`, `builder`, `classifier`, `config`
//! — is `no_std` + `alloc`; file I/O and the CLI binaries live behind the
//! default-on `std` feature.

extern crate alloc;

pub mod builder;
pub mod classifier;
pub mod config;
pub mod linear;
pub mod partition;
pub mod packet;
pub mod rule;
pub mod simulation;
pub mod tree;

#[cfg(feature = "std")]
pub mod error;
#[cfg(feature = "std")]
pub mod io;

#[cfg(test)]
extern crate std;
