/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use super::{BucketError, DoubleTag, percentile_bucket};

/// Maps an observed value to the tag of its bucket.
///
/// The mapping must be pure and total, values out of range go to a sentinel
/// tag such as [`DoubleTag::INFINITY`].
pub trait BucketFunction<T>: Send + Sync {
    fn bucket(&self, value: f64) -> T;
}

impl<T, F> BucketFunction<T> for F
where
    F: Fn(f64) -> T + Send + Sync,
{
    fn bucket(&self, value: f64) -> T {
        self(value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BucketShape {
    /// `count` buckets of `width`, the first one ends at `start`.
    Linear { start: f64, width: f64, count: u32 },
    /// Buckets ending at powers of `exp`, with everything below `start`
    /// going to the `start` bucket. `start` is positive.
    Exponential { start: f64, exp: f64, count: u32 },
    /// The fixed percentile ladder, see [`percentile_bucket`].
    Percentiles,
}

impl BucketShape {
    pub fn linear(start: f64, width: f64, count: u32) -> Result<Self, BucketError> {
        if !start.is_finite() {
            return Err(BucketError::InvalidStart(start));
        }
        if !(width > 0.0 && width.is_finite()) {
            return Err(BucketError::InvalidWidth(width));
        }
        if count == 0 {
            return Err(BucketError::InvalidCount(count));
        }
        Ok(BucketShape::Linear {
            start,
            width,
            count,
        })
    }

    pub fn exponential(start: f64, exp: f64, count: u32) -> Result<Self, BucketError> {
        if !(start > 0.0 && start.is_finite()) {
            return Err(BucketError::InvalidStart(start));
        }
        if !(exp > 1.0 && exp.is_finite()) {
            return Err(BucketError::InvalidExponent(exp));
        }
        if count == 0 {
            return Err(BucketError::InvalidCount(count));
        }
        Ok(BucketShape::Exponential { start, exp, count })
    }

    #[inline]
    pub fn percentiles() -> Self {
        BucketShape::Percentiles
    }

    #[inline]
    pub fn is_percentiles(&self) -> bool {
        matches!(self, BucketShape::Percentiles)
    }

    /// The bucket tag of `value`, NaN goes to the +Inf bucket.
    pub fn tag(&self, value: f64) -> f64 {
        if value.is_nan() {
            return f64::INFINITY;
        }
        match *self {
            BucketShape::Linear {
                start,
                width,
                count,
            } => {
                if value > start + width * (count - 1) as f64 {
                    return f64::INFINITY;
                }
                start + ((value - start) / width).ceil() * width
            }
            BucketShape::Exponential { start, exp, count } => {
                if value > exp.powi(count as i32 - 1) {
                    return f64::INFINITY;
                }
                if value <= start {
                    return start;
                }
                let mut e = value.log(exp).ceil();
                // the logarithm may be rounded across an exact power
                if exp.powf(e - 1.0) >= value {
                    e -= 1.0;
                } else if exp.powf(e) < value {
                    e += 1.0;
                }
                exp.powf(e)
            }
            BucketShape::Percentiles => percentile_bucket(value),
        }
    }
}

impl BucketFunction<DoubleTag> for BucketShape {
    fn bucket(&self, value: f64) -> DoubleTag {
        DoubleTag::from(self.tag(value))
    }
}
