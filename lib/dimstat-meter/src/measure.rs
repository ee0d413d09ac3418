/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Statistic {
    Count,
    Total,
    TotalTime,
    Max,
    Value,
    ActiveTasks,
    Duration,
}

impl Statistic {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Statistic::Count => "count",
            Statistic::Total => "total",
            Statistic::TotalTime => "total_time",
            Statistic::Max => "max",
            Statistic::Value => "value",
            Statistic::ActiveTasks => "active_tasks",
            Statistic::Duration => "duration",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub statistic: Statistic,
    pub value: f64,
}

impl Measurement {
    #[inline]
    pub fn new(statistic: Statistic, value: f64) -> Self {
        Measurement { statistic, value }
    }
}
