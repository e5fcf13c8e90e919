//! The fixed 5-tuple a packet is classified on.

use crate::rule::{Dim, Point};
use core::ops::Index;

/// Source addr, dest addr, source port, dest port, protocol — in that order,
/// matching `Dim::ALL`. All fields live in the common `Point` (u32) domain;
/// ports and protocol are zero-extended on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Packet([Point; 5]);

impl Packet {
    pub fn new(src_addr: Point, dst_addr: Point, src_port: Point, dst_port: Point, proto: Point) -> Self {
        Self([src_addr, dst_addr, src_port, dst_port, proto])
    }

    pub fn src_addr(&self) -> Point {
        self.0[Dim::SrcAddr.index()]
    }

    pub fn dst_addr(&self) -> Point {
        self.0[Dim::DstAddr.index()]
    }

    pub fn src_port(&self) -> Point {
        self.0[Dim::SrcPort.index()]
    }

    pub fn dst_port(&self) -> Point {
        self.0[Dim::DstPort.index()]
    }

    pub fn proto(&self) -> Point {
        self.0[Dim::Proto.index()]
    }
}

impl Index<Dim> for Packet {
    type Output = Point;

    fn index(&self, dim: Dim) -> &Point {
        &self.0[dim.index()]
    }
}
