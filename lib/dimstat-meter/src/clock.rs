/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

pub trait Clock: Send + Sync {
    /// Milliseconds since the unix epoch.
    fn wall_time(&self) -> u64;

    /// Nanoseconds from an arbitrary but fixed point, never goes backward.
    fn monotonic_time(&self) -> u64;
}

pub type ArcClock = Arc<dyn Clock>;

static MONOTONIC_START: LazyLock<Instant> = LazyLock::new(Instant::now);

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn wall_time(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn monotonic_time(&self) -> u64 {
        MONOTONIC_START.elapsed().as_nanos() as u64
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct MockClock {
    monotonic: AtomicU64,
    wall: AtomicU64,
}

impl MockClock {
    pub fn new() -> Self {
        MockClock::default()
    }

    pub fn add(&self, dur: Duration) {
        let nanos = dur.as_nanos() as u64;
        self.monotonic.fetch_add(nanos, Ordering::Relaxed);
        self.wall.fetch_add(nanos / 1_000_000, Ordering::Relaxed);
    }

    pub fn add_seconds(&self, secs: u64) {
        self.add(Duration::from_secs(secs));
    }
}

impl Clock for MockClock {
    fn wall_time(&self) -> u64 {
        self.wall.load(Ordering::Relaxed)
    }

    fn monotonic_time(&self) -> u64 {
        self.monotonic.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock() {
        let clock = MockClock::new();
        assert_eq!(clock.monotonic_time(), 0);
        clock.add(Duration::from_millis(1500));
        assert_eq!(clock.monotonic_time(), 1_500_000_000);
        assert_eq!(clock.wall_time(), 1500);
        clock.add_seconds(1);
        assert_eq!(clock.wall_time(), 2500);
    }

    #[test]
    fn system() {
        let clock = SystemClock;
        let t1 = clock.monotonic_time();
        let t2 = clock.monotonic_time();
        assert!(t2 >= t1);
        assert!(clock.wall_time() > 0);
    }
}
