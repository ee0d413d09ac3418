/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

mod bucket;
pub use bucket::{Bucket, BucketListener, DoubleTag};

mod function;
pub use function::{BucketFunction, BucketShape};

mod percentile;
pub use percentile::{percentile_bucket, percentile_buckets};

mod histogram;
pub use histogram::{Histogram, HistogramType, ValueHistogram};

mod time;
pub use time::TimeHistogram;

mod config;
pub use config::HistogramConfig;

#[derive(Debug, Error, PartialEq)]
pub enum BucketError {
    #[error("invalid bucket width {0}")]
    InvalidWidth(f64),
    #[error("invalid bucket count {0}")]
    InvalidCount(u32),
    #[error("invalid bucket exponent {0}")]
    InvalidExponent(f64),
    #[error("invalid bucket start {0}")]
    InvalidStart(f64),
}
