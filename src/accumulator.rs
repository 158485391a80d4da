use std::io::{self, Read};

use hashbrown::{HashMap, hash_map::EntryRef};
use tracing::{debug, warn};

use crate::byte_buffer::ByteBuffer;
use crate::error::{Error, Result};
use crate::line::{MalformedPolicy, parse_line, parse_line_lossy};
use crate::stats::Statistics;

const CHUNK_SIZE: usize = 4 << 20;

/// Per-station statistics, built one line at a time.
#[derive(Clone, Debug, Default)]
pub struct Accumulator {
    stations: HashMap<String, Statistics>,
    lines_read: u64,
    skipped: u64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a single measurement for `name` into the map.
    #[inline(always)]
    pub fn observe(&mut self, name: &str, value: f64) {
        match self.stations.entry_ref(name) {
            EntryRef::Occupied(entry) => entry.into_mut().update(value),
            EntryRef::Vacant(entry) => {
                entry.insert(Statistics::new(value));
            }
        }
    }

    /// Reduces already-split lines, e.g. from `str::lines`.
    pub fn reduce_lines<I, S>(&mut self, lines: I, policy: MalformedPolicy) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.reduce_line(line.as_ref().as_bytes(), policy)?;
        }

        Ok(())
    }

    /// Reduces a whole in-memory (or mapped) input.
    pub fn reduce_bytes(&mut self, bytes: &[u8], policy: MalformedPolicy) -> Result<()> {
        let mut rest = bytes;

        while let Some(end) = rest.byte_position(b'\n') {
            self.reduce_line(&rest[..end], policy)?;
            rest = &rest[end + 1..];
        }

        if !rest.is_empty() {
            self.reduce_line(rest, policy)?;
        }

        Ok(())
    }

    /// Streams lines out of `reader` through a fixed read buffer. A line that
    /// straddles two reads is carried over and completed by the next one.
    pub fn reduce_reader<R: Read>(&mut self, mut reader: R, policy: MalformedPolicy) -> Result<()> {
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut carry: Vec<u8> = Vec::new();

        loop {
            let bytes_read = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Read(e)),
            };
            debug!(bytes_read, carried = carry.len(), "refilled read buffer");

            let mut chunk = &buf[..bytes_read];

            if !carry.is_empty() {
                match chunk.byte_position(b'\n') {
                    Some(end) => {
                        carry.extend_from_slice(&chunk[..end]);
                        self.reduce_line(&carry, policy)?;
                        carry.clear();
                        chunk = &chunk[end + 1..];
                    }
                    None => {
                        carry.extend_from_slice(chunk);
                        continue;
                    }
                }
            }

            while let Some(end) = chunk.byte_position(b'\n') {
                self.reduce_line(&chunk[..end], policy)?;
                chunk = &chunk[end + 1..];
            }

            carry.extend_from_slice(chunk);
        }

        if !carry.is_empty() {
            self.reduce_line(&carry, policy)?;
        }

        Ok(())
    }

    fn reduce_line(&mut self, line: &[u8], policy: MalformedPolicy) -> Result<()> {
        self.lines_read += 1;

        let line = line.trim_line_end();
        if line.is_empty() {
            return Ok(());
        }

        match parse_line(line) {
            Ok((name, value)) => self.observe(name, value),
            Err(reason) => match policy {
                MalformedPolicy::Reject => {
                    return Err(Error::MalformedLine {
                        line: self.lines_read,
                        reason,
                    });
                }
                MalformedPolicy::Skip => {
                    self.skipped += 1;
                    warn!(line = self.lines_read, %reason, "skipping malformed line");
                }
                MalformedPolicy::Propagate => {
                    let (name, value) = parse_line_lossy(line);
                    self.observe(&name, value);
                }
            },
        }

        Ok(())
    }

    /// Folds another accumulator's stations into this one.
    pub fn merge(&mut self, other: &Accumulator) {
        for (name, stats) in &other.stations {
            match self.stations.entry_ref(name.as_str()) {
                EntryRef::Occupied(entry) => entry.into_mut().merge(stats),
                EntryRef::Vacant(entry) => {
                    entry.insert(*stats);
                }
            }
        }

        self.lines_read += other.lines_read;
        self.skipped += other.skipped;
    }

    pub fn get(&self, name: &str) -> Option<&Statistics> {
        self.stations.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Statistics)> {
        self.stations.iter().map(|(name, stats)| (name.as_str(), stats))
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Lines seen so far, blank ones included.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Lines dropped under [`MalformedPolicy::Skip`].
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MalformedReason;

    /// Hands out at most `step` bytes per read to force lines across chunks.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_observe_seeds_then_updates() {
        let mut acc = Accumulator::new();
        acc.observe("A", 5.0);
        acc.observe("A", 15.0);
        acc.observe("B", 1.0);

        let a = acc.get("A").unwrap();
        assert_eq!(a.minimum, 5.0);
        assert_eq!(a.maximum, 15.0);
        assert_eq!(a.count, 2);
        assert_eq!(a.mean(), 10.0);

        assert_eq!(acc.get("B"), Some(&Statistics::new(1.0)));
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn test_reduce_lines() {
        let mut acc = Accumulator::new();
        acc.reduce_lines(["Paris;12.5", "Paris;-3.0", "Tokyo;20.0"], MalformedPolicy::Reject)
            .unwrap();

        let paris = acc.get("Paris").unwrap();
        assert_eq!(paris.minimum, -3.0);
        assert_eq!(paris.maximum, 12.5);
        assert_eq!(paris.mean(), 4.75);
        assert_eq!(acc.get("Tokyo").unwrap().count, 1);
        assert_eq!(acc.lines_read(), 3);
    }

    #[test]
    fn test_reduce_bytes_handles_crlf_and_missing_final_newline() {
        let mut acc = Accumulator::new();
        acc.reduce_bytes(b"A;1.0\r\nA;3.0\r\n\r\nB;2.0", MalformedPolicy::Reject)
            .unwrap();

        assert_eq!(acc.get("A").unwrap().mean(), 2.0);
        assert_eq!(acc.get("B").unwrap().count, 1);
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn test_reduce_reader_reassembles_split_lines() {
        let input = "Bāgepalli;17.8\nSan Fernando;-1.9\nKika;4.3\nBo;6.8\nKika;-4.3\n";

        let mut whole = Accumulator::new();
        whole
            .reduce_bytes(input.as_bytes(), MalformedPolicy::Reject)
            .unwrap();

        for step in [1, 2, 3, 7, 16] {
            let mut trickled = Accumulator::new();
            trickled
                .reduce_reader(
                    Trickle {
                        data: input.as_bytes(),
                        step,
                    },
                    MalformedPolicy::Reject,
                )
                .unwrap();

            assert_eq!(trickled.len(), whole.len(), "step {}", step);
            for (name, stats) in whole.iter() {
                assert_eq!(trickled.get(name), Some(stats), "step {} station {}", step, name);
            }
        }
    }

    #[test]
    fn test_reduce_reader_without_final_newline() {
        let mut acc = Accumulator::new();
        acc.reduce_reader(&b"A;1.0\nA;2.0"[..], MalformedPolicy::Reject)
            .unwrap();

        assert_eq!(acc.get("A").unwrap().count, 2);
    }

    #[test]
    fn test_reject_reports_line_number() {
        let mut acc = Accumulator::new();
        let err = acc
            .reduce_reader(&b"A;1.0\n\nB;oops\nC;2.0\n"[..], MalformedPolicy::Reject)
            .unwrap_err();

        match err {
            Error::MalformedLine { line, reason } => {
                assert_eq!(line, 3);
                assert_eq!(reason, MalformedReason::InvalidNumber("oops".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(acc.get("C").is_none());
    }

    #[test]
    fn test_skip_counts_malformed_lines() {
        let mut acc = Accumulator::new();
        acc.reduce_bytes(b"A;1.0\nno delimiter\nA;x\nA;3.0\n", MalformedPolicy::Skip)
            .unwrap();

        assert_eq!(acc.skipped(), 2);
        assert_eq!(acc.get("A").unwrap().count, 2);
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn test_propagate_folds_in_nan() {
        let mut acc = Accumulator::new();
        acc.reduce_bytes(b"A;1.0\nA;x\nlonely\n", MalformedPolicy::Propagate)
            .unwrap();

        let a = acc.get("A").unwrap();
        assert_eq!(a.count, 2);
        assert_eq!(a.minimum, 1.0);
        assert!(a.sum.is_nan());

        let lonely = acc.get("lonely").unwrap();
        assert!(lonely.minimum.is_nan());
        assert_eq!(acc.skipped(), 0);
    }

    #[test]
    fn test_merge() {
        let mut left = Accumulator::new();
        left.reduce_lines(["A;5.0", "B;1.0"], MalformedPolicy::Reject)
            .unwrap();
        let mut right = Accumulator::new();
        right
            .reduce_lines(["A;15.0", "C;2.0"], MalformedPolicy::Reject)
            .unwrap();

        left.merge(&right);

        let a = left.get("A").unwrap();
        assert_eq!((a.minimum, a.maximum, a.count), (5.0, 15.0, 2));
        assert_eq!(left.len(), 3);
        assert_eq!(left.lines_read(), 4);
    }
}
