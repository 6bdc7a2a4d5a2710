//! Flow demultiplexer: one [`QueueBuffer`] per destination TCP port.
//!
//! A single client/server connection pair uses a fixed destination port for
//! its lifetime, and disjoint connections land on disjoint ports inside the
//! filtered ranges, so destination port alone is enough to key the flow
//! table — no need to also key on source address.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use crate::queue_buffer::QueueBuffer;

struct FlowEntry {
    buffer: QueueBuffer,
    last_seen: Instant,
}

/// Lazy-insert table of per-destination-port reassembly buffers.
///
/// Entries are never evicted by default, matching the observed source
/// behavior `spec.md` §9 calls out as a known leak. Pass an idle TTL via
/// [`FlowTable::with_ttl`] to sweep flows that have gone quiet — useful for
/// long-running captures, off by default to keep default behavior faithful.
pub struct FlowTable {
    flows: HashMap<u16, FlowEntry>,
    idle_ttl: Option<Duration>,
}

impl FlowTable {
    /// Create a table that never evicts flows.
    #[must_use]
    pub fn new() -> Self {
        Self { flows: HashMap::new(), idle_ttl: None }
    }

    /// Create a table that evicts a flow once it has been idle for `ttl`.
    ///
    /// Eviction only happens as a side effect of [`FlowTable::sweep`]; it is
    /// never triggered implicitly by `push`/`drain` so that reassembly
    /// itself stays allocation-stable per call.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { flows: HashMap::new(), idle_ttl: Some(ttl) }
    }

    /// Get the buffer for `dest_port`, creating it if this is the first
    /// time this destination port has been seen.
    pub fn buffer_mut(&mut self, dest_port: u16) -> &mut QueueBuffer {
        let entry = self
            .flows
            .entry(dest_port)
            .or_insert_with(|| FlowEntry { buffer: QueueBuffer::new(), last_seen: Instant::now() });
        entry.last_seen = Instant::now();
        &mut entry.buffer
    }

    /// Number of distinct flows currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Whether no flows are currently tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Drop flows that have been idle longer than the configured TTL.
    ///
    /// A no-op if this table was created with [`FlowTable::new`] (no TTL
    /// configured).
    pub fn sweep(&mut self) {
        let Some(ttl) = self.idle_ttl else { return };
        let now = Instant::now();
        self.flows.retain(|_, entry| now.duration_since(entry.last_seen) < ttl);
    }
}

impl Default for FlowTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_port_shares_one_buffer() {
        let mut flows = FlowTable::new();
        flows.buffer_mut(7000).push(b"abc").unwrap();
        flows.buffer_mut(7000).push(b"def").unwrap();
        assert_eq!(flows.buffer_mut(7000).size(), 6);
        assert_eq!(flows.len(), 1);
    }

    #[test]
    fn different_ports_get_different_buffers() {
        let mut flows = FlowTable::new();
        flows.buffer_mut(7000).push(b"abc").unwrap();
        flows.buffer_mut(7001).push(b"xy").unwrap();
        assert_eq!(flows.buffer_mut(7000).size(), 3);
        assert_eq!(flows.buffer_mut(7001).size(), 2);
        assert_eq!(flows.len(), 2);
    }

    #[test]
    fn ttl_sweep_drops_idle_flows() {
        let mut flows = FlowTable::with_ttl(Duration::from_millis(1));
        flows.buffer_mut(7000).push(b"abc").unwrap();
        std::thread::sleep(Duration::from_millis(5));
        flows.sweep();
        assert!(flows.is_empty());
    }

    #[test]
    fn no_ttl_never_sweeps() {
        let mut flows = FlowTable::new();
        flows.buffer_mut(7000).push(b"abc").unwrap();
        flows.sweep();
        assert_eq!(flows.len(), 1);
    }
}
