/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use foldhash::fast::FixedState;

use dimstat_histogram::HistogramType;
use dimstat_types::{MeterId, MeterType, TimeUnit};

use crate::{
    AnyMeter, ArcClock, ArcCounter, ArcDistributionSummary, ArcGauge, ArcLongTaskTimer, ArcTimer,
    DistributionStatisticConfig, GaugeFunction, MeterRegistry, RegistryError, RegistryId,
    SystemClock,
};

mod counter;
use counter::{SimpleCounter, SimpleGauge};

mod long_task;
use long_task::SimpleLongTaskTimer;

mod stats;

mod timer;
use timer::{SimpleDistributionSummary, SimpleTimer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimpleConfig {
    base_time_unit: TimeUnit,
    histogram_type: HistogramType,
}

impl Default for SimpleConfig {
    fn default() -> Self {
        SimpleConfig {
            base_time_unit: TimeUnit::Seconds,
            histogram_type: HistogramType::Cumulative,
        }
    }
}

impl SimpleConfig {
    pub fn with_base_time_unit(mut self, unit: TimeUnit) -> Self {
        self.base_time_unit = unit;
        self
    }

    pub fn with_histogram_type(mut self, histogram_type: HistogramType) -> Self {
        self.histogram_type = histogram_type;
        self
    }

    #[inline]
    pub fn base_time_unit(&self) -> TimeUnit {
        self.base_time_unit
    }

    #[inline]
    pub fn histogram_type(&self) -> HistogramType {
        self.histogram_type
    }
}

/// An in memory registry keeping cumulative statistics.
pub struct SimpleMeterRegistry {
    id: RegistryId,
    config: SimpleConfig,
    clock: ArcClock,
    meters: Mutex<HashMap<MeterId, AnyMeter, FixedState>>,
}

impl Default for SimpleMeterRegistry {
    fn default() -> Self {
        SimpleMeterRegistry::new(SimpleConfig::default())
    }
}

impl SimpleMeterRegistry {
    pub fn new(config: SimpleConfig) -> Self {
        SimpleMeterRegistry::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: SimpleConfig, clock: ArcClock) -> Self {
        SimpleMeterRegistry {
            id: RegistryId::next(),
            config,
            clock,
            meters: Mutex::new(HashMap::with_hasher(FixedState::default())),
        }
    }

    #[inline]
    pub fn config(&self) -> &SimpleConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.meters.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn register<T, F>(
        &self,
        id: &MeterId,
        meter_type: MeterType,
        existing: fn(&AnyMeter) -> Option<&T>,
        wrap: fn(T) -> AnyMeter,
        create: F,
    ) -> Result<T, RegistryError>
    where
        T: Clone,
        F: FnOnce(MeterId) -> Result<T, RegistryError>,
    {
        let mut meters = self.meters.lock().unwrap();
        if let Some(meter) = meters.get(id) {
            return existing(meter)
                .cloned()
                .ok_or_else(|| RegistryError::TypeConflict {
                    name: id.to_string(),
                    existing: meter.meter_type(),
                });
        }
        let meter = create(id.clone().with_type(meter_type))?;
        meters.insert(id.clone(), wrap(meter.clone()));
        Ok(meter)
    }
}

impl MeterRegistry for SimpleMeterRegistry {
    fn registry_id(&self) -> RegistryId {
        self.id
    }

    fn counter(&self, id: &MeterId) -> Result<ArcCounter, RegistryError> {
        self.register(
            id,
            MeterType::Counter,
            AnyMeter::as_counter,
            AnyMeter::Counter,
            |id| Ok(Arc::new(SimpleCounter::new(id))),
        )
    }

    fn gauge(&self, id: &MeterId, f: GaugeFunction) -> Result<ArcGauge, RegistryError> {
        self.register(
            id,
            MeterType::Gauge,
            AnyMeter::as_gauge,
            AnyMeter::Gauge,
            |id| Ok(Arc::new(SimpleGauge::new(id, f))),
        )
    }

    fn timer(
        &self,
        id: &MeterId,
        config: &DistributionStatisticConfig,
    ) -> Result<ArcTimer, RegistryError> {
        self.register(
            id,
            MeterType::Timer,
            AnyMeter::as_timer,
            AnyMeter::Timer,
            |id| {
                let timer = SimpleTimer::new(
                    id,
                    config,
                    self.config.base_time_unit,
                    self.config.histogram_type,
                )?;
                Ok(Arc::new(timer))
            },
        )
    }

    fn summary(
        &self,
        id: &MeterId,
        config: &DistributionStatisticConfig,
    ) -> Result<ArcDistributionSummary, RegistryError> {
        self.register(
            id,
            MeterType::DistributionSummary,
            AnyMeter::as_summary,
            AnyMeter::DistributionSummary,
            |id| {
                let summary = SimpleDistributionSummary::new(
                    id,
                    config,
                    self.config.base_time_unit,
                    self.config.histogram_type,
                )?;
                Ok(Arc::new(summary))
            },
        )
    }

    fn long_task_timer(&self, id: &MeterId) -> Result<ArcLongTaskTimer, RegistryError> {
        self.register(
            id,
            MeterType::LongTaskTimer,
            AnyMeter::as_long_task_timer,
            AnyMeter::LongTaskTimer,
            |id| {
                Ok(Arc::new(SimpleLongTaskTimer::new(
                    id,
                    self.clock.clone(),
                    self.config.base_time_unit,
                )))
            },
        )
    }

    fn find(&self, id: &MeterId) -> Option<AnyMeter> {
        self.meters.lock().unwrap().get(id).cloned()
    }

    fn meters(&self) -> Vec<AnyMeter> {
        self.meters.lock().unwrap().values().cloned().collect()
    }

    fn remove(&self, id: &MeterId) -> Option<AnyMeter> {
        self.meters.lock().unwrap().remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use dimstat_histogram::HistogramConfig;
    use dimstat_quantile::Quantile;

    use crate::{Counter, LongTaskSample, LongTaskTimer, Measurement, Meter, MockClock, Statistic};

    fn id(name: &str, meter_type: MeterType) -> MeterId {
        MeterId::new(name, meter_type).unwrap()
    }

    #[test]
    fn counter() {
        let registry = SimpleMeterRegistry::default();
        let c1 = registry.counter(&id("c", MeterType::Counter)).unwrap();
        let c2 = registry.counter(&id("c", MeterType::Counter)).unwrap();
        c1.increment(1.0);
        c2.increment(2.5);
        assert_eq!(c1.count(), 3.5);
        assert_eq!(registry.len(), 1);
        assert_eq!(
            c1.measure(),
            vec![Measurement::new(Statistic::Count, 3.5)]
        );
    }

    #[test]
    fn type_conflict() {
        let registry = SimpleMeterRegistry::default();
        registry.counter(&id("m", MeterType::Counter)).unwrap();
        let err = registry
            .timer(
                &id("m", MeterType::Timer),
                &DistributionStatisticConfig::default(),
            )
            .err()
            .unwrap();
        assert!(matches!(
            err,
            RegistryError::TypeConflict {
                existing: MeterType::Counter,
                ..
            }
        ));
        let found = registry.find(&id("m", MeterType::Counter)).unwrap();
        assert_eq!(found.meter_type(), MeterType::Counter);
    }

    #[test]
    fn timer() {
        let registry = SimpleMeterRegistry::default();
        let histogram = HistogramConfig::linear_time(TimeUnit::Seconds, 0.0, 1.0, 5).unwrap();
        let config = DistributionStatisticConfig::default()
            .with_quantile(Quantile::PCT50)
            .with_histogram(histogram);
        let timer = registry.timer(&id("t", MeterType::Timer), &config).unwrap();
        timer.record(1500.0, TimeUnit::Milliseconds);
        timer.record_duration(Duration::from_millis(500));
        timer.record(-1.0, TimeUnit::Seconds);
        assert_eq!(timer.count(), 2);
        assert_eq!(timer.total_time(TimeUnit::Seconds), 2.0);
        assert_eq!(timer.max(TimeUnit::Milliseconds), 1500.0);
        assert_eq!(timer.mean(TimeUnit::Seconds), 1.0);
        assert_eq!(timer.id().meter_type(), MeterType::Timer);

        let snap = timer.take_snapshot();
        assert_eq!(snap.count(), 2);
        assert_eq!(snap.quantiles().len(), 1);
        let buckets: Vec<(f64, u64)> = snap.buckets().iter().map(|b| (b.bucket, b.count)).collect();
        assert_eq!(buckets, vec![(1.0, 1), (2.0, 2)]);
    }

    #[test]
    fn summary() {
        let registry = SimpleMeterRegistry::default();
        let summary = registry
            .summary(
                &id("s", MeterType::DistributionSummary),
                &DistributionStatisticConfig::default(),
            )
            .unwrap();
        summary.record(3.0);
        summary.record(5.0);
        assert_eq!(summary.count(), 2);
        assert_eq!(summary.total_amount(), 8.0);
        assert_eq!(summary.max(), 5.0);
        assert_eq!(summary.mean(), 4.0);
    }

    #[test]
    fn gauge() {
        let registry = SimpleMeterRegistry::default();
        let obj = Arc::new(Mutex::new(vec![1, 2, 3]));
        let gauge = registry
            .gauge(
                &id("g", MeterType::Gauge),
                GaugeFunction::weak(&obj, |v| v.lock().unwrap().len() as f64),
            )
            .unwrap();
        assert_eq!(gauge.value(), 3.0);
        drop(obj);
        assert!(gauge.value().is_nan());
    }

    #[test]
    fn long_task_timer() {
        let clock = Arc::new(MockClock::new());
        let registry = SimpleMeterRegistry::with_clock(SimpleConfig::default(), clock.clone());
        let ltt = registry
            .long_task_timer(&id("l", MeterType::LongTaskTimer))
            .unwrap();
        let s1 = ltt.start();
        clock.add_seconds(2);
        let s2 = ltt.start();
        clock.add_seconds(1);
        assert_eq!(ltt.active_tasks(), 2);
        assert_eq!(ltt.duration(TimeUnit::Seconds), 4.0);
        assert_eq!(ltt.max(TimeUnit::Seconds), 3.0);
        assert_eq!(s2.duration(TimeUnit::Milliseconds), 1000.0);

        assert_eq!(s1.stop(), Duration::from_secs(3));
        assert_eq!(s1.stop(), Duration::ZERO);
        assert_eq!(ltt.active_tasks(), 1);
        assert_eq!(ltt.max(TimeUnit::Seconds), 1.0);
        s2.stop();
        assert_eq!(ltt.max(TimeUnit::Seconds), 0.0);
    }

    #[test]
    fn remove() {
        let registry = SimpleMeterRegistry::default();
        let c = registry.counter(&id("c", MeterType::Counter)).unwrap();
        c.increment(1.0);
        assert!(registry.remove(&id("c", MeterType::Counter)).is_some());
        assert!(registry.is_empty());
        let c = registry.counter(&id("c", MeterType::Counter)).unwrap();
        assert_eq!(c.count(), 0.0);
    }
}
