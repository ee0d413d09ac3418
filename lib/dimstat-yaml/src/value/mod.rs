/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod distribution;
mod histogram;
mod meter;
mod primary;
mod quantile;
mod unit;

pub use distribution::{as_distribution_config, as_quantile_algorithm};
pub use histogram::{as_histogram_config, as_histogram_type};
pub use meter::{as_meter_id, as_meter_tags, as_simple_config};
pub use primary::{as_f64, as_string, as_u32};
pub use quantile::{as_quantile, as_quantile_list};
pub use unit::as_time_unit;
