/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use crate::{GkQuantiles, QuantileError, Quantiles};

/// The percentile ladder of one completed block of `size` values.
pub(super) struct BlockSummary {
    pub(super) size: i64,
    pub(super) values: Vec<f64>,
}

/// The block under construction at one level.
pub(super) struct Block {
    epsilon: f64,
    size: i64,
    estimator: GkQuantiles,
}

impl Block {
    pub(super) fn new(epsilon: f64, size: i64) -> Result<Self, QuantileError> {
        Ok(Block {
            epsilon,
            size,
            estimator: GkQuantiles::new(&[], epsilon)?,
        })
    }

    #[inline]
    pub(super) fn size(&self) -> i64 {
        self.size
    }

    /// Returns the summary of the block if it is completed by this value.
    pub(super) fn insert(&mut self, value: f64) -> Option<BlockSummary> {
        self.estimator.observe(value);
        if self.estimator.count() < self.size as u64 {
            return None;
        }

        let steps = (1.0 / self.epsilon).round() as u64;
        let mut values = Vec::with_capacity(steps as usize);
        for k in 1..=steps {
            let phi = (k as f64 * self.epsilon).min(1.0);
            values.push(self.estimator.get(phi));
        }
        self.estimator.clear();
        Some(BlockSummary {
            size: self.size,
            values,
        })
    }
}
