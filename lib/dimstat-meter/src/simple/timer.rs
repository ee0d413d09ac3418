/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use dimstat_histogram::HistogramType;
use dimstat_quantile::QuantileError;
use dimstat_types::{MeterId, TimeUnit};

use super::stats::DistributionStats;
use crate::{
    DistributionStatisticConfig, DistributionSummary, HistogramSnapshot, Measurement, Meter,
    Statistic, Timer,
};

/// Values are kept in the base time unit of the registry.
pub(super) struct SimpleTimer {
    id: MeterId,
    base_time_unit: TimeUnit,
    stats: DistributionStats,
}

impl SimpleTimer {
    pub(super) fn new(
        id: MeterId,
        config: &DistributionStatisticConfig,
        base_time_unit: TimeUnit,
        default_type: HistogramType,
    ) -> Result<Self, QuantileError> {
        let stats = DistributionStats::new(config, base_time_unit, default_type)?;
        Ok(SimpleTimer {
            id,
            base_time_unit,
            stats,
        })
    }
}

impl Meter for SimpleTimer {
    fn id(&self) -> &MeterId {
        &self.id
    }

    fn measure(&self) -> Vec<Measurement> {
        vec![
            Measurement::new(Statistic::Count, self.stats.count() as f64),
            Measurement::new(Statistic::TotalTime, self.stats.total()),
            Measurement::new(Statistic::Max, self.stats.max()),
        ]
    }
}

impl Timer for SimpleTimer {
    fn record(&self, amount: f64, unit: TimeUnit) {
        self.stats.record(self.base_time_unit.convert(amount, unit));
    }

    fn count(&self) -> u64 {
        self.stats.count()
    }

    fn total_time(&self, unit: TimeUnit) -> f64 {
        unit.convert(self.stats.total(), self.base_time_unit)
    }

    fn max(&self, unit: TimeUnit) -> f64 {
        unit.convert(self.stats.max(), self.base_time_unit)
    }

    fn base_time_unit(&self) -> TimeUnit {
        self.base_time_unit
    }

    fn take_snapshot(&self) -> HistogramSnapshot {
        self.stats.snapshot()
    }
}

pub(super) struct SimpleDistributionSummary {
    id: MeterId,
    stats: DistributionStats,
}

impl SimpleDistributionSummary {
    pub(super) fn new(
        id: MeterId,
        config: &DistributionStatisticConfig,
        base_time_unit: TimeUnit,
        default_type: HistogramType,
    ) -> Result<Self, QuantileError> {
        let stats = DistributionStats::new(config, base_time_unit, default_type)?;
        Ok(SimpleDistributionSummary { id, stats })
    }
}

impl Meter for SimpleDistributionSummary {
    fn id(&self) -> &MeterId {
        &self.id
    }

    fn measure(&self) -> Vec<Measurement> {
        vec![
            Measurement::new(Statistic::Count, self.stats.count() as f64),
            Measurement::new(Statistic::Total, self.stats.total()),
            Measurement::new(Statistic::Max, self.stats.max()),
        ]
    }
}

impl DistributionSummary for SimpleDistributionSummary {
    fn record(&self, amount: f64) {
        self.stats.record(amount);
    }

    fn count(&self) -> u64 {
        self.stats.count()
    }

    fn total_amount(&self) -> f64 {
        self.stats.total()
    }

    fn max(&self) -> f64 {
        self.stats.max()
    }

    fn take_snapshot(&self) -> HistogramSnapshot {
        self.stats.snapshot()
    }
}
