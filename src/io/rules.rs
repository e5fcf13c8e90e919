//! ClassBench and MSU ruleset loaders. Ported from `IO/InputReader` in
//! original_source's parsing rules, not re-derived from the distilled spec's
//! prose summary (spec §6).

extern crate std;

use crate::error::LoaderError;
use crate::rule::{Interval, Rule};
use std::fs;
use std::path::Path;
use std::vec::Vec;

pub fn read_classbench(path: impl AsRef<Path>) -> Result<Vec<Rule>, LoaderError> {
    let contents = fs::read_to_string(path)?;
    let lines: Vec<&str> = contents.lines().filter(|l| !l.trim().is_empty()).collect();
    let n = lines.len();
    let mut rules = Vec::with_capacity(n);

    for (i, line) in lines.iter().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 9 {
            return Err(LoaderError::MalformedLine {
                line: i + 1,
                reason: alloc::format!("expected 9 whitespace-separated tokens, found {}", tokens.len()),
            });
        }

        let (src_addr, src_len) = parse_cidr(tokens[0].trim_start_matches('@'), i + 1)?;
        let (dst_addr, dst_len) = parse_cidr(tokens[1], i + 1)?;
        let sp_low = parse_u32(tokens[2], i + 1)?;
        let sp_high = parse_u32(tokens[4], i + 1)?;
        let dp_low = parse_u32(tokens[5], i + 1)?;
        let dp_high = parse_u32(tokens[7], i + 1)?;
        let (proto, mask) = parse_proto_mask(tokens[8], i + 1)?;

        let proto_range = if mask == 0xFF { Interval::exact(proto) } else { Interval::new(0, 0xFF) };

        let priority = (n - 1 - i) as i32;
        rules.push(Rule::new(
            priority,
            cidr_range(src_addr, src_len),
            src_len,
            cidr_range(dst_addr, dst_len),
            dst_len,
            Interval::new(sp_low, sp_high),
            Interval::new(dp_low, dp_high),
            proto_range,
        ));
    }

    Ok(rules)
}

/// A CIDR block's range is `[addr & mask, addr | !mask]` for its prefix length.
fn cidr_range(addr: u32, len: u8) -> Interval {
    if len >= 32 {
        Interval::exact(addr)
    } else {
        let mask: u32 = 0xFFFF_FFFFu32 << (32 - len as u32);
        Interval::new(addr & mask, addr | !mask)
    }
}

fn parse_cidr(token: &str, line: usize) -> Result<(u32, u8), LoaderError> {
    let (addr_str, len_str) = token.split_once('/').ok_or_else(|| LoaderError::MalformedLine {
        line,
        reason: alloc::format!("expected addr/len, found {token:?}"),
    })?;
    let addr = parse_dotted_quad(addr_str, line)?;
    let len: u8 = len_str.parse().map_err(|_| LoaderError::MalformedLine {
        line,
        reason: alloc::format!("invalid prefix length {len_str:?}"),
    })?;
    Ok((addr, len))
}

fn parse_dotted_quad(s: &str, line: usize) -> Result<u32, LoaderError> {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() != 4 {
        return Err(LoaderError::MalformedLine { line, reason: alloc::format!("invalid IPv4 address {s:?}") });
    }
    let mut addr: u32 = 0;
    for p in parts {
        let octet: u32 = p.parse().map_err(|_| LoaderError::MalformedLine {
            line,
            reason: alloc::format!("invalid octet {p:?} in address {s:?}"),
        })?;
        addr = (addr << 8) | (octet & 0xFF);
    }
    Ok(addr)
}

fn parse_u32(s: &str, line: usize) -> Result<u32, LoaderError> {
    s.parse().map_err(|_| LoaderError::MalformedLine { line, reason: alloc::format!("invalid integer {s:?}") })
}

fn parse_proto_mask(s: &str, line: usize) -> Result<(u32, u32), LoaderError> {
    let (proto_str, mask_str) = s.split_once('/').ok_or_else(|| LoaderError::MalformedLine {
        line,
        reason: alloc::format!("expected proto/mask, found {s:?}"),
    })?;
    let proto = parse_hex(proto_str, line)?;
    let mask = parse_hex(mask_str, line)?;
    Ok((proto, mask))
}

fn parse_hex(s: &str, line: usize) -> Result<u32, LoaderError> {
    let s = s.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(s, 16).map_err(|_| LoaderError::MalformedLine { line, reason: alloc::format!("invalid hex value {s:?}") })
}

/// MSU format: `!`-prefixed header with a trailing `;<fields>` token, a bound
/// line (ignored beyond field count), then one data line per rule. This
/// loader is fixed to 5-field (SA, DA, SP, DP, Proto) rulesets, i.e.
/// `fields == 24` ((fields+1)/5 == 5 repetitions).
pub fn read_msu(path: impl AsRef<Path>) -> Result<Vec<Rule>, LoaderError> {
    let contents = fs::read_to_string(path)?;
    let mut lines = contents.lines();

    let header = lines.next().ok_or_else(|| LoaderError::MalformedLine { line: 1, reason: "empty file".into() })?;
    let fields = parse_header_fields(header)?;
    if fields != 24 {
        return Err(LoaderError::UnsupportedFieldCount { found: fields });
    }

    let _bounds_line = lines.next(); // field bounds: not needed to parse rules

    let data_lines: Vec<&str> = lines.filter(|l| !l.trim().is_empty()).collect();
    let n = data_lines.len();
    let mut rules = Vec::with_capacity(n);

    for (i, line) in data_lines.iter().enumerate() {
        let tokens: Vec<&str> = line.split(',').collect();
        if tokens.len() < 5 {
            return Err(LoaderError::MalformedLine {
                line: i + 3,
                reason: alloc::format!("expected at least 5 comma-separated fields, found {}", tokens.len()),
            });
        }

        let src_addr = parse_bound(tokens[0], i + 3)?;
        let dst_addr = parse_bound(tokens[1], i + 3)?;
        let src_port = parse_bound(tokens[2], i + 3)?;
        let dst_port = parse_bound(tokens[3], i + 3)?;
        let proto = parse_bound(tokens[4], i + 3)?;

        let priority = (n - 1 - i) as i32;
        rules.push(Rule::new(priority, src_addr, addr_prefix_len(src_addr), dst_addr, addr_prefix_len(dst_addr), src_port, dst_port, proto));
    }

    Ok(rules)
}

fn addr_prefix_len(range: Interval) -> u8 {
    if range.low == range.high {
        32
    } else if range == Interval::any() {
        0
    } else {
        // Approximate: count leading bits the low/high share.
        (range.low ^ range.high).leading_zeros() as u8
    }
}

fn parse_header_fields(header: &str) -> Result<usize, LoaderError> {
    if !header.starts_with('!') {
        return Err(LoaderError::MalformedLine { line: 1, reason: "MSU header must start with '!'".into() });
    }
    let tag = header.rsplit(';').next().ok_or_else(|| LoaderError::MalformedLine {
        line: 1,
        reason: "missing trailing ';<fields>' token".into(),
    })?;
    tag.trim().parse().map_err(|_| LoaderError::MalformedLine { line: 1, reason: alloc::format!("invalid field count {tag:?}") })
}

fn parse_bound(token: &str, line: usize) -> Result<Interval, LoaderError> {
    let (lo_str, hi_str) = token.trim().split_once(':').ok_or_else(|| LoaderError::MalformedLine {
        line,
        reason: alloc::format!("expected low:high, found {token:?}"),
    })?;
    let lo: u32 = lo_str.trim().parse().map_err(|_| LoaderError::MalformedLine { line, reason: alloc::format!("invalid bound {lo_str:?}") })?;
    let hi: u32 = hi_str.trim().parse().map_err(|_| LoaderError::MalformedLine { line, reason: alloc::format!("invalid bound {hi_str:?}") })?;
    Ok(Interval::new(lo, hi))
}
