//! Rule representation: 5-tuple range filters with CIDR-style prefix lengths.
//!
//! All five fields are carried in a common 32-bit `Point` domain (ports and
//! protocol are zero-extended). `Dim` names which of the five fields an
//! operation is about; it replaces the several near-identical per-algorithm
//! dimension enums the teacher crate carried (`cutsplit`/`hicuts`/`hypersplit`
//! each had their own), since ByteCuts has exactly one tree shape shared by
//! every partition.

use crate::packet::Packet;
use alloc::vec::Vec;

/// Unsigned coordinate shared by every dimension.
pub type Point = u32;

/// Bits in one field of the 5-tuple.
pub const BITS_PER_FIELD: u32 = 32;

/// Width of a nibble-aligned cut window step.
pub const BITS_PER_NYBBLE: u32 = 4;

/// Returned by `classify` when no rule matches a packet.
pub const NO_MATCH: i32 = -1;

/// IANA protocol numbers used by the rule/packet generator and test fixtures.
pub const PROTO_TCP: Point = 6;
pub const PROTO_UDP: Point = 17;
pub const PROTO_IGMP: Point = 2;

/// Inclusive range over `Point`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub low: Point,
    pub high: Point,
}

impl Interval {
    pub const fn new(low: Point, high: Point) -> Self {
        Self { low, high }
    }

    pub const fn exact(value: Point) -> Self {
        Self { low: value, high: value }
    }

    pub const fn any() -> Self {
        Self { low: 0, high: Point::MAX }
    }

    pub fn contains(&self, value: Point) -> bool {
        value >= self.low && value <= self.high
    }

    /// Whether this interval shares any point with `other`.
    pub fn intersects(&self, other: &Interval) -> bool {
        self.low <= other.high && other.low <= self.high
    }

    pub fn width(&self) -> u64 {
        self.high as u64 - self.low as u64 + 1
    }
}

/// One of the five fields a rule constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    SrcAddr,
    DstAddr,
    SrcPort,
    DstPort,
    Proto,
}

impl Dim {
    pub const ALL: [Dim; 5] = [Dim::SrcAddr, Dim::DstAddr, Dim::SrcPort, Dim::DstPort, Dim::Proto];
    pub const ADDR: [Dim; 2] = [Dim::SrcAddr, Dim::DstAddr];
    pub const PORT: [Dim; 2] = [Dim::SrcPort, Dim::DstPort];

    pub const fn index(self) -> usize {
        match self {
            Dim::SrcAddr => 0,
            Dim::DstAddr => 1,
            Dim::SrcPort => 2,
            Dim::DstPort => 3,
            Dim::Proto => 4,
        }
    }

    /// Number of meaningful low bits for this field (the rest of `Point` is
    /// always zero). Cut windows never range outside this width.
    pub const fn field_width(self) -> u32 {
        match self {
            Dim::SrcAddr | Dim::DstAddr => 32,
            Dim::SrcPort | Dim::DstPort => 16,
            Dim::Proto => 8,
        }
    }
}

/// A prioritized 5-tuple filter.
///
/// `priority` is unique per ruleset; higher wins. This is the opposite
/// convention from the teacher crate's `Rule` (where lower value wins) —
/// ByteCuts follows the source implementation's `int priority` /
/// `ClassifyAPacket` convention instead, see DESIGN.md.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub priority: i32,
    ranges: [Interval; 5],
    prefix_len: [u8; 5],
}

impl Rule {
    /// Build a rule from explicit address prefix lengths; port and protocol
    /// prefix lengths are derived from whether the given range is an exact
    /// match or a wildcard, per spec.
    pub fn new(
        priority: i32,
        src_addr: Interval,
        src_addr_len: u8,
        dst_addr: Interval,
        dst_addr_len: u8,
        src_port: Interval,
        dst_port: Interval,
        proto: Interval,
    ) -> Self {
        let src_port_len = if src_port.low == src_port.high { 32 } else { 16 };
        let dst_port_len = if dst_port.low == dst_port.high { 32 } else { 16 };
        let proto_len = if proto.low == proto.high { 32 } else { 24 };
        Self {
            priority,
            ranges: [src_addr, dst_addr, src_port, dst_port, proto],
            prefix_len: [src_addr_len, dst_addr_len, src_port_len, dst_port_len, proto_len],
        }
    }

    pub fn range(&self, dim: Dim) -> Interval {
        self.ranges[dim.index()]
    }

    pub fn prefix_length(&self, dim: Dim) -> u8 {
        self.prefix_len[dim.index()]
    }

    pub fn matches(&self, packet: &Packet) -> bool {
        Dim::ALL.iter().all(|&d| self.ranges[d.index()].contains(packet[d]))
    }
}

/// Sort rules by descending priority (highest-priority first), the order
/// every build step and every `Leaf` relies on.
pub fn sort_by_priority_desc(rules: &mut [Rule]) {
    rules.sort_by(|a, b| b.priority.cmp(&a.priority));
}

pub fn sorted_by_priority_desc(rules: &[Rule]) -> Vec<Rule> {
    let mut out = rules.to_vec();
    sort_by_priority_desc(&mut out);
    out
}
