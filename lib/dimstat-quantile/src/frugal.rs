/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use log::trace;

use super::{QuantileError, Quantiles, check_quantile};

struct FrugalQuantile {
    q: f64,
    m: f64,
    step: i64,
    sign: i8,
}

impl FrugalQuantile {
    fn new(q: f64) -> Self {
        FrugalQuantile {
            q,
            m: 0.0,
            step: 1,
            sign: 0,
        }
    }

    fn with_estimate(q: f64, m: f64) -> Self {
        FrugalQuantile {
            q,
            m,
            step: 1,
            sign: 1,
        }
    }

    fn update(&mut self, value: f64, r: f64, step_fn: fn(i64) -> i64) {
        if self.sign == 0 {
            self.m = value;
            self.sign = 1;
            return;
        }

        if value > self.m && r > 1.0 - self.q {
            self.step += self.sign as i64 * step_fn(self.step);
            if self.step > 0 {
                self.m += self.step as f64;
            } else {
                self.m += 1.0;
            }
            if self.m > value {
                self.step += (value - self.m) as i64;
                self.m = value;
            }
            if self.sign < 0 && self.step > 1 {
                self.step = 1;
            }
            self.sign = 1;
        } else if value < self.m && r > self.q {
            self.step += -(self.sign as i64) * step_fn(self.step);
            if self.step > 0 {
                self.m -= self.step as f64;
            } else {
                self.m -= 1.0;
            }
            if self.m < value {
                self.step += (self.m - value) as i64;
                self.m = value;
            }
            if self.sign > 0 && self.step > 1 {
                self.step = 1;
            }
            self.sign = -1;
        }
    }
}

fn constant_step(_step: i64) -> i64 {
    1
}

/// Frugal streaming quantile estimation with two units of memory per
/// quantile.
///
/// The estimation is biased and only converges toward the real quantile as
/// the stream gets longer. Only quantiles registered at construction can be
/// queried.
pub struct Frugal2UQuantiles {
    monitored: Vec<f64>,
    quantiles: Vec<FrugalQuantile>,
    step_fn: fn(i64) -> i64,
    rng: fastrand::Rng,
}

impl Frugal2UQuantiles {
    pub fn new(monitored: &[f64]) -> Result<Self, QuantileError> {
        let mut quantiles = Vec::with_capacity(monitored.len());
        for q in monitored {
            quantiles.push(FrugalQuantile::new(check_quantile(*q)?));
        }
        Ok(Frugal2UQuantiles {
            monitored: monitored.to_vec(),
            quantiles,
            step_fn: constant_step,
            rng: fastrand::Rng::new(),
        })
    }

    /// Start from known `(quantile, estimation)` pairs instead of the first
    /// observed value.
    pub fn with_initial_estimates(estimates: &[(f64, f64)]) -> Result<Self, QuantileError> {
        let mut monitored = Vec::with_capacity(estimates.len());
        let mut quantiles = Vec::with_capacity(estimates.len());
        for (q, m) in estimates {
            let q = check_quantile(*q)?;
            monitored.push(q);
            quantiles.push(FrugalQuantile::with_estimate(q, *m));
        }
        Ok(Frugal2UQuantiles {
            monitored,
            quantiles,
            step_fn: constant_step,
            rng: fastrand::Rng::new(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Replace the step growth function, which is constant 1 by default.
    pub fn with_step_fn(mut self, step_fn: fn(i64) -> i64) -> Self {
        self.step_fn = step_fn;
        self
    }
}

impl Quantiles for Frugal2UQuantiles {
    fn observe(&mut self, value: f64) {
        let step_fn = self.step_fn;
        for quantile in &mut self.quantiles {
            let r = self.rng.f64();
            quantile.update(value, r, step_fn);
        }
    }

    /// Returns 0.0 for a quantile not registered at construction.
    fn get(&self, q: f64) -> f64 {
        self.try_get(q).unwrap_or_else(|| {
            trace!("quantile {q} is not monitored by this frugal2u estimator");
            0.0
        })
    }

    fn try_get(&self, q: f64) -> Option<f64> {
        self.quantiles.iter().find(|v| v.q == q).map(|v| v.m)
    }

    fn monitored(&self) -> &[f64] {
        &self.monitored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_median() {
        let mut quantiles = Frugal2UQuantiles::new(&[0.5]).unwrap().with_seed(42);
        let mut rng = fastrand::Rng::with_seed(1);
        for _ in 0..100_000 {
            quantiles.observe(rng.f64() * 100.0);
        }
        let median = quantiles.get(0.5);
        assert!((median - 50.0).abs() <= 5.0, "median is {median}");
    }

    #[test]
    fn high_quantile() {
        let mut quantiles = Frugal2UQuantiles::new(&[0.5, 0.9]).unwrap().with_seed(3);
        let mut rng = fastrand::Rng::with_seed(4);
        for _ in 0..100_000 {
            quantiles.observe(rng.f64() * 100.0);
        }
        let p90 = quantiles.get(0.9);
        assert!(p90 > 70.0 && p90 <= 100.0, "p90 is {p90}");
        assert!(quantiles.get(0.5) < p90);
    }

    #[test]
    fn unregistered() {
        let mut quantiles = Frugal2UQuantiles::new(&[0.5]).unwrap();
        quantiles.observe(10.0);
        assert_eq!(quantiles.get(0.5), 10.0);
        assert_eq!(quantiles.get(0.99), 0.0);
        assert_eq!(quantiles.try_get(0.99), None);
        assert_eq!(quantiles.try_get(0.5), Some(10.0));
        assert_eq!(quantiles.monitored(), &[0.5]);
    }

    #[test]
    fn initial_estimate() {
        let mut quantiles = Frugal2UQuantiles::with_initial_estimates(&[(0.5, 20.0)])
            .unwrap()
            .with_seed(5);
        assert_eq!(quantiles.get(0.5), 20.0);
        // every observation equals the estimation
        quantiles.observe(20.0);
        assert_eq!(quantiles.get(0.5), 20.0);

        assert!(Frugal2UQuantiles::with_initial_estimates(&[(1.0, 1.0)]).is_err());
        assert!(Frugal2UQuantiles::new(&[0.0]).is_err());
    }

    #[test]
    fn never_overshoot() {
        fn doubling(step: i64) -> i64 {
            step.max(1)
        }

        let mut quantiles = Frugal2UQuantiles::new(&[0.99])
            .unwrap()
            .with_seed(9)
            .with_step_fn(doubling);
        quantiles.observe(0.0);
        for _ in 0..1000 {
            quantiles.observe(100.0);
        }
        let v = quantiles.get(0.99);
        assert!(v <= 100.0);
        assert!(v > 0.0);
    }
}
