/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

use super::{QuantileError, check_quantile};

/// A streaming quantile estimator.
///
/// Every implementation is single writer, callers that share one across
/// threads must put it behind a lock.
pub trait Quantiles: Send {
    fn observe(&mut self, value: f64);

    /// The estimation for quantile `q`.
    fn get(&self, q: f64) -> f64;

    /// Same as [`Quantiles::get`], but `None` if no estimation is available.
    fn try_get(&self, q: f64) -> Option<f64> {
        let v = self.get(q);
        if v.is_nan() { None } else { Some(v) }
    }

    /// The quantiles registered at construction.
    fn monitored(&self) -> &[f64];
}

#[derive(Clone, Debug)]
pub struct Quantile {
    name: SmolStr,
    value: f64,
}

impl Quantile {
    pub const PCT50: Quantile = Quantile::new_const("0.5", 0.5);
    pub const PCT75: Quantile = Quantile::new_const("0.75", 0.75);
    pub const PCT80: Quantile = Quantile::new_const("0.8", 0.8);
    pub const PCT90: Quantile = Quantile::new_const("0.9", 0.9);
    pub const PCT95: Quantile = Quantile::new_const("0.95", 0.95);
    pub const PCT99: Quantile = Quantile::new_const("0.99", 0.99);
    pub const PCT999: Quantile = Quantile::new_const("0.999", 0.999);

    const fn new_const(name: &'static str, value: f64) -> Self {
        Quantile {
            name: SmolStr::new_inline(name),
            value,
        }
    }

    pub fn new(value: f64) -> Result<Self, QuantileError> {
        let value = check_quantile(value)?;
        Ok(Quantile {
            name: SmolStr::new(value.to_string()),
            value,
        })
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.name.as_str()
    }
}

impl FromStr for Quantile {
    type Err = QuantileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value =
            f64::from_str(s).map_err(|_| QuantileError::InvalidQuantile(s.to_string()))?;
        let value = check_quantile(value)?;
        Ok(Quantile {
            name: SmolStr::new(s),
            value,
        })
    }
}

impl fmt::Display for Quantile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl PartialEq for Quantile {
    fn eq(&self, other: &Self) -> bool {
        self.value.total_cmp(&other.value).is_eq()
    }
}

impl Eq for Quantile {}

impl PartialOrd for Quantile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.total_cmp(&other.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn parse() {
        let q = Quantile::from_str("0.99").unwrap();
        assert_eq!(q, Quantile::PCT99);
        assert_eq!(q.as_str(), "0.99");

        let q = Quantile::from_str(" 0.990 ").unwrap();
        assert_eq!(q.value(), 0.99);
        assert_eq!(q.to_string(), "0.990");

        assert!(Quantile::from_str("0").is_err());
        assert!(Quantile::from_str("1").is_err());
        assert!(Quantile::from_str("1.5").is_err());
        assert!(Quantile::from_str("abc").is_err());
        assert!(Quantile::new(f64::NAN).is_err());
    }

    #[test]
    fn order() {
        let mut set = BTreeSet::new();
        set.insert(Quantile::PCT99);
        set.insert(Quantile::PCT50);
        set.insert(Quantile::new(0.5).unwrap());
        let v: Vec<f64> = set.iter().map(|q| q.value()).collect();
        assert_eq!(v, vec![0.5, 0.99]);
    }
}
