pub mod format;
pub mod report;

use std::collections::HashMap;
use std::fmt;

/// Number of latency slots kept per reservoir.
pub const RESERVOIR_SIZE: usize = 10_000;

/// Fixed-size latency sample array overwritten at uniform-random slots.
/// Biased toward recent samples over long runs, which is fine for a
/// realtime status display. A slot value of zero means "never written";
/// a query taking exactly 0ns is indistinguishable from an empty slot
/// and is ignored on read.
pub struct Reservoir(Vec<u64>);

impl Reservoir {
    pub fn new() -> Self {
        Reservoir(vec![0; RESERVOIR_SIZE])
    }

    pub fn record(&mut self, slot: usize, nanos: u64) {
        self.0[slot] = nanos;
    }

    /// Scans the reservoir, skipping empty slots.
    pub fn stats(&self) -> Option<LatencyStats> {
        let mut min = u64::MAX;
        let mut max = 0u64;
        let mut sum = 0u64;
        let mut samples = 0u64;
        for &nanos in &self.0 {
            if nanos == 0 {
                continue;
            }
            min = min.min(nanos);
            max = max.max(nanos);
            sum += nanos;
            samples += 1;
        }
        if samples == 0 {
            return None;
        }
        Some(LatencyStats {
            min,
            avg: sum / samples,
            max,
            samples,
        })
    }
}

impl Default for Reservoir {
    fn default() -> Self {
        Self::new()
    }
}

/// Latencies in nanoseconds over the non-empty slots of a reservoir.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LatencyStats {
    pub min: u64,
    pub avg: u64,
    pub max: u64,
    pub samples: u64,
}

impl LatencyStats {
    pub const ZERO: LatencyStats = LatencyStats {
        min: 0,
        avg: 0,
        max: 0,
        samples: 0,
    };
}

impl fmt::Display for LatencyStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:.2}/{:.2}/{:.2}ms",
            self.min as f64 / 1e6,
            self.avg as f64 / 1e6,
            self.max as f64 / 1e6,
        )
    }
}

/// One aggregation bucket, keyed by the output of the key format program.
pub struct AggEntry {
    pub key: String,
    pub count: u64,
    pub bytes: u64,
    pub times: Reservoir,
}

/// Canonical-key to bucket arena. Entries are created on first sight of a
/// key and never freed; streams refer to their current bucket by index so
/// late response bytes can still be attributed after the request settles.
pub struct Aggregator {
    entries: Vec<AggEntry>,
    index: HashMap<String, usize>,
}

impl Aggregator {
    pub fn new() -> Self {
        Aggregator {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn lookup_or_create(&mut self, key: &str) -> usize {
        if let Some(&index) = self.index.get(key) {
            return index;
        }
        let index = self.entries.len();
        self.entries.push(AggEntry {
            key: key.to_string(),
            count: 0,
            bytes: 0,
            times: Reservoir::new(),
        });
        self.index.insert(key.to_string(), index);
        index
    }

    pub fn get_mut(&mut self, index: usize) -> &mut AggEntry {
        &mut self.entries[index]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AggEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide packet accounting, reported in the status header.
#[derive(Debug, Default)]
pub struct PacketCounter {
    pub rx: u64,
    pub rx_on_sync: u64,
    pub desyncs: u64,
    pub queries: u64,
}

impl PacketCounter {
    pub fn sync_ratio(&self) -> f64 {
        if self.rx == 0 {
            return 0.0;
        }
        self.rx_on_sync as f64 / self.rx as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reservoir_has_no_stats() {
        assert!(Reservoir::new().stats().is_none());
    }

    #[test]
    fn stats_skip_empty_slots() {
        let mut r = Reservoir::new();
        r.record(17, 2_000_000);
        r.record(4242, 4_000_000);
        let stats = r.stats().unwrap();
        assert_eq!(stats.min, 2_000_000);
        assert_eq!(stats.avg, 3_000_000);
        assert_eq!(stats.max, 4_000_000);
        assert_eq!(stats.samples, 2);
    }

    #[test]
    fn overwriting_a_slot_keeps_sample_count() {
        let mut r = Reservoir::new();
        r.record(9, 1_000_000);
        r.record(9, 5_000_000);
        let stats = r.stats().unwrap();
        assert_eq!(stats.samples, 1);
        assert_eq!(stats.max, 5_000_000);
    }

    #[test]
    fn latency_stats_render_in_millis() {
        let stats = LatencyStats {
            min: 120_000,
            avg: 1_230_000,
            max: 9_990_000,
            samples: 3,
        };
        assert_eq!(stats.to_string(), "0.12/1.23/9.99ms");
    }

    #[test]
    fn equal_keys_share_an_entry() {
        let mut agg = Aggregator::new();
        let a = agg.lookup_or_create("host:SELECT ?");
        let b = agg.lookup_or_create("host:SELECT ?");
        let c = agg.lookup_or_create("host:UPDATE ?");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(agg.len(), 2);
    }
}
