/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::anyhow;
use yaml_rust::Yaml;

use dimstat_types::TimeUnit;

pub fn as_time_unit(v: &Yaml) -> anyhow::Result<TimeUnit> {
    if let Yaml::String(s) = v {
        TimeUnit::from_str(s).map_err(|e| anyhow!("invalid time unit: {e}"))
    } else {
        Err(anyhow!("yaml value type for 'time unit' should be 'string'"))
    }
}
