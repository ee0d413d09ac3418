/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use crate::{GkQuantiles, QuantileError, Quantiles, SlidingWindow};

mod block;
use block::{Block, BlockSummary};

pub const DEFAULT_WINDOW_SIZE: u32 = 32768;
const MIN_WINDOW_SIZE: u32 = 128;

/// Deterministic quantile estimation over the last `window_size` values.
///
/// The window is copied to `max_level + 1` levels, each partitioned into
/// blocks of its own size. Block size doubles and epsilon halves from one
/// level to the next, and the top level block covers the whole window. Each
/// completed block is reduced to a percentile ladder and kept in the sliding
/// window of its level until it falls out of the logical window.
///
/// Before the first `window_size` values are seen, queries are answered by
/// an un-windowed estimator.
pub struct WindowSketchQuantiles {
    monitored: Vec<f64>,
    epsilon: f64,
    sketch_epsilon: f64,
    max_level: u32,
    window_size: u32,
    count: u64,
    initial: GkQuantiles,
    blocks: Vec<Block>,
    windows: Vec<SlidingWindow<BlockSummary>>,
}

impl WindowSketchQuantiles {
    pub fn new(monitored: &[f64], epsilon: f64) -> Result<Self, QuantileError> {
        if !(epsilon > 0.0 && epsilon < 1.0) {
            return Err(QuantileError::InvalidEpsilon(epsilon));
        }
        // round 1/epsilon down to a power of two
        let k = (1.0 / epsilon).log2().floor() as u32;
        let mut sketch = WindowSketchQuantiles {
            monitored: monitored.to_vec(),
            epsilon,
            sketch_epsilon: 1.0 / 2f64.powi(k as i32),
            max_level: k + 2,
            window_size: DEFAULT_WINDOW_SIZE,
            count: 0,
            initial: GkQuantiles::new(monitored, epsilon)?,
            blocks: Vec::new(),
            windows: Vec::new(),
        };
        sketch.set_window_size(DEFAULT_WINDOW_SIZE)?;
        Ok(sketch)
    }

    pub fn with_window_size(mut self, window_size: u32) -> Result<Self, QuantileError> {
        self.set_window_size(window_size)?;
        Ok(self)
    }

    /// Change the window size, which is rounded up to a power of two.
    ///
    /// All observed values are discarded.
    pub fn set_window_size(&mut self, window_size: u32) -> Result<(), QuantileError> {
        let Some(window_size) = window_size.checked_next_power_of_two() else {
            return Err(QuantileError::InvalidWindowSize(window_size));
        };
        if window_size <= MIN_WINDOW_SIZE {
            return Err(QuantileError::InvalidWindowSize(window_size));
        }
        // the level 0 block size is window_size >> max_level
        if window_size.trailing_zeros() < self.max_level {
            return Err(QuantileError::BlockSizeTooSmall {
                epsilon: self.epsilon,
                window_size,
            });
        }

        let mut blocks = Vec::with_capacity(self.max_level as usize + 1);
        let mut windows = Vec::with_capacity(self.max_level as usize + 1);
        let mut level_epsilon = 1.0 / (self.max_level + 1) as f64;
        for level in 0..=self.max_level {
            let block_size = (window_size >> (self.max_level - level)) as i64;
            blocks.push(Block::new(level_epsilon, block_size)?);
            windows.push(SlidingWindow::new(window_size as i64));
            level_epsilon /= 2.0;
        }

        self.initial = GkQuantiles::new(&self.monitored, self.epsilon)?;
        self.blocks = blocks;
        self.windows = windows;
        self.window_size = window_size;
        self.count = 0;
        Ok(())
    }

    #[inline]
    pub fn window_size(&self) -> u32 {
        self.window_size
    }

    /// The error bound after rounding `1 / epsilon` down to a power of two.
    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.sketch_epsilon
    }

    #[inline]
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    fn min_block_size(&self) -> i64 {
        (self.window_size >> self.max_level) as i64
    }

    /// Pick disjoint blocks covering the window, the biggest ones first.
    fn stream_summary(&self) -> Option<Vec<&BlockSummary>> {
        let top = &self.windows[self.max_level as usize];
        if let Some(block) = top.newest_element() {
            return Some(vec![block]);
        }

        // at most one block is active at the level below the top one
        let spine_level = self.max_level as usize - 1;
        let (spine, life_time, size) = self.windows[spine_level].entries().next()?;
        // [0, left) and [right, window_size) are not covered yet
        let mut left = life_time;
        let mut right = life_time + size;
        let min_size = self.min_block_size();
        let window_size = self.window_size as i64;

        let mut summary = vec![spine];
        let mut level = spine_level;
        while level > 0 && left > min_size {
            level -= 1;
            for (block, life_time, size) in self.windows[level].entries() {
                if life_time + size <= left {
                    left = life_time;
                    summary.push(block);
                }
            }
        }

        let mut level = spine_level;
        while level > 0 && right < window_size - min_size {
            level -= 1;
            for (block, life_time, size) in self.windows[level].entries().rev() {
                if life_time >= right {
                    right = life_time + size;
                    summary.push(block);
                }
            }
        }

        Some(summary)
    }

    /// The value at rank `q` of the union of the chosen ladders, each ladder
    /// value standing for `size / ladder length` values of its block.
    fn query_window(&self, q: f64) -> Option<f64> {
        let summary = self.stream_summary()?;

        let mut weighted: Vec<(f64, f64)> = Vec::new();
        for block in summary {
            if block.values.is_empty() {
                continue;
            }
            let weight = block.size as f64 / block.values.len() as f64;
            weighted.extend(block.values.iter().map(|v| (*v, weight)));
        }
        weighted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total: f64 = weighted.iter().map(|(_, w)| *w).sum();
        if total <= 0.0 {
            return None;
        }
        let rank = (q * total).clamp(0.0, total);
        let mut seen = 0.0;
        for (value, weight) in &weighted {
            seen += weight;
            if seen > rank {
                return Some(*value);
            }
        }
        weighted.last().map(|(v, _)| *v)
    }
}

impl Quantiles for WindowSketchQuantiles {
    fn observe(&mut self, value: f64) {
        self.count += 1;
        for window in &mut self.windows {
            window.slide_window_by_one_position();
        }
        for (block, window) in self.blocks.iter_mut().zip(self.windows.iter_mut()) {
            if let Some(summary) = block.insert(value) {
                window.push(summary, block.size());
            }
        }
        if self.count < self.window_size as u64 {
            self.initial.observe(value);
        }
    }

    fn get(&self, q: f64) -> f64 {
        if self.count < self.window_size as u64 {
            return self.initial.get(q);
        }
        self.query_window(q).unwrap_or_else(|| self.initial.get(q))
    }

    fn monitored(&self) -> &[f64] {
        &self.monitored
    }
}
