//! Lock-free server counters.
//!
//! Connection tasks update these via atomic operations; the `/metrics`
//! endpoint reads them at its own pace.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};
use std::time::{Duration, Instant};

/// Atomic counters. A handful of `fetch_add`s per event, no locks.
pub struct Metrics {
    // Monotonic counters
    events_handled: AtomicU64,
    event_ns_sum: AtomicU64,
    chunk_requests: AtomicU64,
    moves_relayed: AtomicU64,
    malformed_rejected: AtomicU64,
    encode_failures: AtomicU64,
    resyncs: AtomicU64,

    // Event handling latency histogram
    hist_under_10us: AtomicU64,
    hist_10_100us: AtomicU64,
    hist_100us_1ms: AtomicU64,
    hist_1_10ms: AtomicU64,
    hist_over_10ms: AtomicU64,

    // Gauges
    players_connected: AtomicU64,

    started_at: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            events_handled: AtomicU64::new(0),
            event_ns_sum: AtomicU64::new(0),
            chunk_requests: AtomicU64::new(0),
            moves_relayed: AtomicU64::new(0),
            malformed_rejected: AtomicU64::new(0),
            encode_failures: AtomicU64::new(0),
            resyncs: AtomicU64::new(0),
            hist_under_10us: AtomicU64::new(0),
            hist_10_100us: AtomicU64::new(0),
            hist_100us_1ms: AtomicU64::new(0),
            hist_1_10ms: AtomicU64::new(0),
            hist_over_10ms: AtomicU64::new(0),
            players_connected: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Called after each client event is handled, successfully or not.
    pub fn record_event(&self, duration: Duration) {
        self.events_handled.fetch_add(1, Relaxed);
        self.event_ns_sum
            .fetch_add(duration.as_nanos() as u64, Relaxed);

        let us = duration.as_micros() as u64;
        let bucket = match us {
            0..=9 => &self.hist_under_10us,
            10..=99 => &self.hist_10_100us,
            100..=999 => &self.hist_100us_1ms,
            1000..=9999 => &self.hist_1_10ms,
            _ => &self.hist_over_10ms,
        };
        bucket.fetch_add(1, Relaxed);
    }

    pub fn chunk_requested(&self) {
        self.chunk_requests.fetch_add(1, Relaxed);
    }

    pub fn move_relayed(&self) {
        self.moves_relayed.fetch_add(1, Relaxed);
    }

    pub fn malformed(&self) {
        self.malformed_rejected.fetch_add(1, Relaxed);
    }

    /// An outbound message could not be serialized.
    pub fn encode_failed(&self) {
        self.encode_failures.fetch_add(1, Relaxed);
    }

    /// A lagging connection had its roster rebuilt from the registry.
    pub fn resynced(&self) {
        self.resyncs.fetch_add(1, Relaxed);
    }

    pub fn player_joined(&self) {
        self.players_connected.fetch_add(1, Relaxed);
    }

    pub fn player_left(&self) {
        self.players_connected.fetch_sub(1, Relaxed);
    }

    /// Read all counters into a serializable snapshot.
    pub fn snapshot(&self, chunks_loaded: u64, chunks_generated: u64) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_secs: self.started_at.elapsed().as_secs_f64(),
            events_total: self.events_handled.load(Relaxed),
            event_ns_sum: self.event_ns_sum.load(Relaxed),
            chunk_requests: self.chunk_requests.load(Relaxed),
            moves_relayed: self.moves_relayed.load(Relaxed),
            malformed_rejected: self.malformed_rejected.load(Relaxed),
            encode_failures: self.encode_failures.load(Relaxed),
            resyncs: self.resyncs.load(Relaxed),
            chunks_loaded,
            chunks_generated,
            players: self.players_connected.load(Relaxed),
            hist: [
                self.hist_under_10us.load(Relaxed),
                self.hist_10_100us.load(Relaxed),
                self.hist_100us_1ms.load(Relaxed),
                self.hist_1_10ms.load(Relaxed),
                self.hist_over_10ms.load(Relaxed),
            ],
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable snapshot of all metrics at a point in time.
/// Clients compute rates by diffing consecutive snapshots.
#[derive(Clone, Debug, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: f64,
    pub events_total: u64,
    pub event_ns_sum: u64,
    pub chunk_requests: u64,
    pub moves_relayed: u64,
    pub malformed_rejected: u64,
    pub encode_failures: u64,
    pub resyncs: u64,
    pub chunks_loaded: u64,
    pub chunks_generated: u64,
    pub players: u64,
    /// `[<10μs, 10-100μs, 100μs-1ms, 1-10ms, >10ms]`
    pub hist: [u64; 5],
}
