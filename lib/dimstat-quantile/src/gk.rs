/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use super::{QuantileError, Quantiles};

#[derive(Clone, Copy, Debug)]
struct Tuple {
    value: f64,
    g: u64,
    delta: u64,
}

/// Greenwald-Khanna epsilon approximate quantile summary.
///
/// The rank of the returned value for quantile `q` is within `epsilon * n`
/// of `q * n`, where `n` is the number of observed values.
pub struct GkQuantiles {
    monitored: Vec<f64>,
    epsilon: f64,
    summary: Vec<Tuple>,
    count: u64,
    compress_interval: u64,
}

impl GkQuantiles {
    pub fn new(monitored: &[f64], epsilon: f64) -> Result<Self, QuantileError> {
        if !(epsilon > 0.0 && epsilon < 1.0) {
            return Err(QuantileError::InvalidEpsilon(epsilon));
        }
        Ok(GkQuantiles {
            monitored: monitored.to_vec(),
            epsilon,
            summary: Vec::new(),
            count: 0,
            compress_interval: ((1.0 / (2.0 * epsilon)).floor() as u64).max(1),
        })
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    pub(crate) fn clear(&mut self) {
        self.summary.clear();
        self.count = 0;
    }

    fn band(&self) -> u64 {
        (2.0 * self.epsilon * self.count as f64).floor() as u64
    }

    fn insert(&mut self, value: f64) {
        let idx = self.summary.partition_point(|t| t.value <= value);
        let delta = if idx == 0 || idx == self.summary.len() {
            0
        } else {
            self.band()
        };
        self.summary.insert(idx, Tuple { value, g: 1, delta });
        self.count += 1;

        if self.count % self.compress_interval == 0 {
            self.compress();
        }
    }

    fn compress(&mut self) {
        if self.summary.len() < 3 {
            return;
        }
        let band = self.band();
        // the first and the last tuple are always kept
        let mut i = self.summary.len() - 2;
        while i >= 1 {
            let next = self.summary[i + 1];
            if self.summary[i].g + next.g + next.delta <= band {
                self.summary[i + 1].g += self.summary[i].g;
                self.summary.remove(i);
            }
            i -= 1;
        }
    }

    fn query(&self, q: f64) -> f64 {
        let Some(last) = self.summary.last() else {
            return f64::NAN;
        };
        let n = self.count as f64;
        let rank = (q * n).ceil();
        let bound = self.epsilon * n;

        let mut r_min = 0u64;
        for t in &self.summary {
            r_min += t.g;
            let r_max = r_min + t.delta;
            if rank - r_min as f64 <= bound && r_max as f64 - rank <= bound {
                return t.value;
            }
        }
        last.value
    }
}

impl Quantiles for GkQuantiles {
    fn observe(&mut self, value: f64) {
        self.insert(value);
    }

    fn get(&self, q: f64) -> f64 {
        self.query(q)
    }

    fn monitored(&self) -> &[f64] {
        &self.monitored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_epsilon() {
        assert!(GkQuantiles::new(&[0.5], 0.0).is_err());
        assert!(GkQuantiles::new(&[0.5], 1.0).is_err());
        assert!(GkQuantiles::new(&[0.5], f64::NAN).is_err());
    }

    #[test]
    fn empty() {
        let gk = GkQuantiles::new(&[0.5], 0.01).unwrap();
        assert!(gk.get(0.5).is_nan());
        assert_eq!(gk.try_get(0.5), None);
    }

    #[test]
    fn rank_error() {
        let epsilon = 0.01;
        let mut gk = GkQuantiles::new(&[0.5, 0.9, 0.99], epsilon).unwrap();
        let mut rng = fastrand::Rng::with_seed(7);
        let mut values: Vec<f64> = (0..10_000).map(|i| i as f64).collect();
        rng.shuffle(&mut values);
        for v in &values {
            gk.observe(*v);
        }
        assert_eq!(gk.count(), 10_000);
        assert!(gk.summary.len() < 5_000);

        for q in [0.1, 0.5, 0.9, 0.99] {
            // values are ranks here
            let v = gk.get(q);
            let expected = q * 10_000.0;
            assert!((v - expected).abs() <= 2.0 * epsilon * 10_000.0 + 1.0);
        }
    }

    #[test]
    fn single() {
        let mut gk = GkQuantiles::new(&[], 0.1).unwrap();
        gk.observe(3.0);
        assert_eq!(gk.get(0.01), 3.0);
        assert_eq!(gk.get(0.99), 3.0);
        assert!(gk.monitored().is_empty());
    }
}
