//! Footprint Module
//!
//! Estimates how much memory cached entries occupy, in abstract byte units.

use std::io;

use serde::Serialize;

use crate::error::Result;

/// Fixed per-entry cost added on top of key and value bytes.
///
/// Approximates the map slot, recency index node, access stamps and group
/// link each entry carries.
pub const ENTRY_OVERHEAD: usize = 448;

// == Byte Counter ==
/// `io::Write` sink that only counts what is written to it.
#[derive(Debug, Default)]
struct ByteCounter(usize);

impl io::Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0 += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// == Value Size ==
/// Length of the value's JSON encoding, measured without buffering it.
///
/// Values serde cannot encode (e.g. maps with non-string keys) are reported
/// as `CacheError::Serialization`.
pub fn value_size<V: Serialize + ?Sized>(value: &V) -> Result<usize> {
    let mut counter = ByteCounter::default();
    serde_json::to_writer(&mut counter, value)?;
    Ok(counter.0)
}

// == Entry Size ==
/// Estimated footprint of one entry: overhead + key bytes + encoded value.
pub fn entry_size<V: Serialize + ?Sized>(key: &str, value: &V) -> Result<usize> {
    Ok(ENTRY_OVERHEAD + key.len() + value_size(value)?)
}

// == Footprint ==
/// Running total of the estimated sizes of live entries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    total: usize,
}

impl Footprint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, size: usize) {
        self.total += size;
    }

    pub fn remove(&mut self, size: usize) {
        self.total = self.total.saturating_sub(size);
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn reset(&mut self) {
        self.total = 0;
    }
}
