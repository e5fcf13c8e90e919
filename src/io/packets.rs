//! Packet-file reader and result-file writer (spec §6: "one packet per
//! line, five whitespace-separated decimal Points" / "one integer per line").

extern crate std;

use crate::error::LoaderError;
use crate::packet::Packet;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::vec::Vec;

pub fn read_packets(path: impl AsRef<Path>) -> Result<Vec<Packet>, LoaderError> {
    let contents = fs::read_to_string(path)?;
    let mut packets = Vec::new();

    for (i, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(LoaderError::MalformedLine {
                line: i + 1,
                reason: alloc::format!("expected 5 whitespace-separated fields, found {}", fields.len()),
            });
        }
        let mut values = [0u32; 5];
        for (slot, field) in values.iter_mut().zip(fields.iter()) {
            *slot = field.parse().map_err(|_| LoaderError::MalformedLine {
                line: i + 1,
                reason: alloc::format!("invalid decimal value {field:?}"),
            })?;
        }
        packets.push(Packet::new(values[0], values[1], values[2], values[3], values[4]));
    }

    Ok(packets)
}

pub fn write_results(path: impl AsRef<Path>, results: &[i32]) -> Result<(), LoaderError> {
    let mut file = fs::File::create(path)?;
    for r in results {
        writeln!(file, "{r}")?;
    }
    Ok(())
}

/// Reads a result file back (one `i32` per line), for `bc-validate`'s
/// optional `--expected` comparison.
pub fn read_expected(path: impl AsRef<Path>) -> Result<Vec<i32>, LoaderError> {
    let contents = fs::read_to_string(path)?;
    let mut values = Vec::new();
    for (i, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: i32 = line.trim().parse().map_err(|_| LoaderError::MalformedLine {
            line: i + 1,
            reason: alloc::format!("invalid integer {line:?}"),
        })?;
        values.push(value);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_packet_file() {
        let path = std::env::temp_dir().join(alloc::format!("bytecuts-test-packets-{}.txt", std::process::id()));
        std::fs::write(&path, "10 20 80 443 6\n").unwrap();
        let packets = read_packets(&path).unwrap();
        assert_eq!(packets, alloc::vec![Packet::new(10, 20, 80, 443, 6)]);
    }
}
