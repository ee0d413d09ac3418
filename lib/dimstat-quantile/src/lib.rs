/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

mod quantile;
pub use quantile::{Quantile, Quantiles};

mod window;
pub use window::{SlidingWindow, WindowError};

mod gk;
pub use gk::GkQuantiles;

mod frugal;
pub use frugal::Frugal2UQuantiles;

mod sketch;
pub use sketch::{DEFAULT_WINDOW_SIZE, WindowSketchQuantiles};

#[derive(Debug, Error, PartialEq)]
pub enum QuantileError {
    #[error("epsilon {0} is not in range (0, 1)")]
    InvalidEpsilon(f64),
    #[error("window size {0} is too small")]
    InvalidWindowSize(u32),
    #[error("epsilon {epsilon} is too small for window size {window_size}")]
    BlockSizeTooSmall { epsilon: f64, window_size: u32 },
    #[error("invalid quantile: {0}")]
    InvalidQuantile(String),
}

fn check_quantile(q: f64) -> Result<f64, QuantileError> {
    if q > 0.0 && q < 1.0 {
        Ok(q)
    } else {
        Err(QuantileError::InvalidQuantile(q.to_string()))
    }
}
