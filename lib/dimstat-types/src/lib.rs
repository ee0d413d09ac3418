/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

mod unit;
pub use unit::TimeUnit;

mod tag;
pub use tag::MeterTags;

mod id;
pub use id::{MeterId, MeterType};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty string")]
    Empty,
    #[error("invalid control char {0:?}")]
    InvalidControl(char),
    #[error("unknown time unit {0}")]
    UnknownTimeUnit(String),
}

fn check_meter_str(s: &str) -> Result<(), ParseError> {
    if s.is_empty() {
        return Err(ParseError::Empty);
    }
    match s.chars().find(|c| c.is_control()) {
        Some(c) => Err(ParseError::InvalidControl(c)),
        None => Ok(()),
    }
}
