/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::time::Duration;

use dimstat_meter::{
    ArcMeterRegistry, CompositeMeterRegistry, Counter, DistributionStatisticConfig,
    DistributionSummary, Gauge, GaugeFunction, LongTaskTimer, MeterRegistry, MockClock,
    QuantileAlgorithm, RegistryError, SimpleConfig, SimpleMeterRegistry, Timer,
};
use dimstat_quantile::Quantile;
use dimstat_types::{MeterId, MeterType, TimeUnit};

fn simple() -> Arc<SimpleMeterRegistry> {
    Arc::new(SimpleMeterRegistry::default())
}

fn id(name: &str, meter_type: MeterType) -> MeterId {
    MeterId::new(name, meter_type).unwrap()
}

fn same_meter<A: ?Sized, B: ?Sized>(a: &Arc<A>, b: &Arc<B>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[test]
fn first_child_after_remove() {
    let composite = CompositeMeterRegistry::new();
    let r1 = simple();
    let r2 = simple();
    let r1_dyn: ArcMeterRegistry = r1.clone();
    composite.add(r1_dyn.clone()).unwrap();
    composite.add(r2.clone()).unwrap();

    let counter_id = id("requests", MeterType::Counter);
    let counter = composite.counter(&counter_id).unwrap();
    let c1 = r1.counter(&counter_id).unwrap();
    let c2 = r2.counter(&counter_id).unwrap();
    assert!(same_meter(&counter.first_child(), &c1));

    c1.increment(10.0);
    assert_eq!(counter.count(), 10.0);

    assert!(composite.remove(&r1_dyn));
    assert!(!composite.remove(&r1_dyn));
    assert!(same_meter(&counter.first_child(), &c2));

    counter.increment(1.0);
    assert_eq!(counter.count(), 1.0);
    assert_eq!(c1.count(), 10.0);
    assert_eq!(c2.count(), 1.0);
}

#[test]
fn write_reaches_every_child() {
    let composite = CompositeMeterRegistry::new();
    let registries: Vec<Arc<SimpleMeterRegistry>> = (0..8).map(|_| simple()).collect();
    for r in &registries {
        composite.add(r.clone()).unwrap();
    }

    let counter_id = id("events", MeterType::Counter);
    let counter = composite.counter(&counter_id).unwrap();
    assert_eq!(counter.registries().len(), registries.len());
    counter.increment(1.0);
    for r in &registries {
        assert_eq!(r.counter(&counter_id).unwrap().count(), 1.0);
    }
}

#[test]
fn noop_before_attach() {
    let composite = CompositeMeterRegistry::new();
    let timer_id = id("latency", MeterType::Timer);
    let timer = composite
        .timer(&timer_id, &DistributionStatisticConfig::default())
        .unwrap();
    timer.record(1.0, TimeUnit::Seconds);
    assert_eq!(timer.count(), 0);
    assert_eq!(timer.take_snapshot().count(), 0);

    let r = simple();
    composite.add(r.clone()).unwrap();
    assert_eq!(timer.count(), 0);
    timer.record(250.0, TimeUnit::Milliseconds);
    timer.record_duration(Duration::from_millis(750));
    assert_eq!(timer.count(), 2);
    assert_eq!(timer.total_time(TimeUnit::Seconds), 1.0);
    assert_eq!(timer.base_time_unit(), TimeUnit::Seconds);

    let child = r
        .timer(&timer_id, &DistributionStatisticConfig::default())
        .unwrap();
    assert_eq!(child.count(), 2);
}

#[test]
fn readd_receives_writes() {
    let composite = CompositeMeterRegistry::new();
    let r: ArcMeterRegistry = simple();
    composite.add(r.clone()).unwrap();
    composite.add(r.clone()).unwrap();
    assert_eq!(composite.registries().len(), 1);

    let summary_id = id("size", MeterType::DistributionSummary);
    let summary = composite
        .summary(&summary_id, &DistributionStatisticConfig::default())
        .unwrap();
    summary.record(3.0);

    composite.remove(&r);
    summary.record(4.0);
    assert_eq!(summary.count(), 0);

    composite.add(r.clone()).unwrap();
    summary.record(5.0);
    assert_eq!(summary.count(), 2);
    assert_eq!(summary.total_amount(), 8.0);
    assert_eq!(summary.max(), 5.0);
}

#[test]
fn nested_composites() {
    let leaf = simple();
    let inner = CompositeMeterRegistry::new();
    inner.add(leaf.clone()).unwrap();

    let outer = CompositeMeterRegistry::new();
    outer.add(inner.clone()).unwrap();
    outer.add(leaf.clone()).unwrap();
    assert_eq!(outer.registries().len(), 2);
    assert_eq!(outer.descendants().len(), 1);

    let counter_id = id("hits", MeterType::Counter);
    let counter = outer.counter(&counter_id).unwrap();
    counter.increment(1.0);
    assert_eq!(leaf.counter(&counter_id).unwrap().count(), 1.0);

    // registries added to the inner composite later reach the outer meters
    let late = simple();
    inner.add(late.clone()).unwrap();
    assert_eq!(outer.descendants().len(), 2);
    counter.increment(1.0);
    assert_eq!(late.counter(&counter_id).unwrap().count(), 1.0);
    assert_eq!(leaf.counter(&counter_id).unwrap().count(), 2.0);

    let late_dyn: ArcMeterRegistry = late.clone();
    inner.remove(&late_dyn);
    assert_eq!(outer.descendants().len(), 1);
    counter.increment(1.0);
    assert_eq!(late.counter(&counter_id).unwrap().count(), 1.0);
}

#[test]
fn self_containing() {
    let a = CompositeMeterRegistry::new();
    let b = CompositeMeterRegistry::new();
    assert!(matches!(
        a.add(a.clone()),
        Err(RegistryError::SelfContaining)
    ));
    a.add(b.clone()).unwrap();
    assert!(matches!(
        b.add(a.clone()),
        Err(RegistryError::SelfContaining)
    ));
    let c = CompositeMeterRegistry::new();
    b.add(c.clone()).unwrap();
    assert!(matches!(
        c.add(a.clone()),
        Err(RegistryError::SelfContaining)
    ));
}

#[test]
fn type_conflict() {
    let composite = CompositeMeterRegistry::new();
    let r = simple();
    composite.add(r.clone()).unwrap();

    let meter_id = id("m", MeterType::Counter);
    composite.counter(&meter_id).unwrap();
    assert!(matches!(
        composite.long_task_timer(&meter_id),
        Err(RegistryError::TypeConflict {
            existing: MeterType::Counter,
            ..
        })
    ));

    // the child registry refuses, the composite keeps going without it
    let gauge_id = id("g", MeterType::Gauge);
    r.counter(&gauge_id).unwrap();
    let gauge = composite
        .gauge(&gauge_id, GaugeFunction::new(|| 2.0))
        .unwrap();
    assert!(gauge.registries().is_empty());
    assert_eq!(gauge.value(), 0.0);
}

#[test]
fn invalid_quantile_config() {
    let composite = CompositeMeterRegistry::new();
    let config = DistributionStatisticConfig::default()
        .with_quantile(Quantile::PCT99)
        .with_algorithm(QuantileAlgorithm::Gk { epsilon: 0.0 });
    assert!(matches!(
        composite.timer(&id("t", MeterType::Timer), &config),
        Err(RegistryError::Quantile(_))
    ));
    assert!(composite.meters().is_empty());
}

#[test]
fn remove_meter() {
    let composite = CompositeMeterRegistry::new();
    let r = simple();
    composite.add(r.clone()).unwrap();

    let counter_id = id("c", MeterType::Counter);
    let counter = composite.counter(&counter_id).unwrap();
    counter.increment(1.0);
    assert_eq!(r.len(), 1);

    let removed = composite.remove_meter(&counter_id).unwrap();
    assert_eq!(removed.meter_type(), MeterType::Counter);
    assert!(r.is_empty());
    assert!(composite.find(&counter_id).is_none());
    assert!(counter.registries().is_empty());

    let counter = composite.counter(&counter_id).unwrap();
    assert_eq!(counter.count(), 0.0);
}

#[test]
fn long_task_fan_out() {
    let clock = Arc::new(MockClock::new());
    let r1 = Arc::new(SimpleMeterRegistry::with_clock(
        SimpleConfig::default(),
        clock.clone(),
    ));
    let r2 = Arc::new(SimpleMeterRegistry::with_clock(
        SimpleConfig::default().with_base_time_unit(TimeUnit::Milliseconds),
        clock.clone(),
    ));
    let composite = CompositeMeterRegistry::new();
    composite.add(r1.clone()).unwrap();
    composite.add(r2.clone()).unwrap();

    let ltt_id = id("job", MeterType::LongTaskTimer);
    let ltt = composite.long_task_timer(&ltt_id).unwrap();
    let sample = ltt.start();
    clock.add_seconds(3);
    assert_eq!(ltt.active_tasks(), 1);
    assert_eq!(r2.long_task_timer(&ltt_id).unwrap().active_tasks(), 1);
    assert_eq!(sample.duration(TimeUnit::Seconds), 3.0);
    assert_eq!(sample.stop(), Duration::from_secs(3));
    assert_eq!(ltt.active_tasks(), 0);
    assert_eq!(r2.long_task_timer(&ltt_id).unwrap().active_tasks(), 0);
}

#[test]
fn concurrent_writes_and_attach() {
    let composite = CompositeMeterRegistry::new();
    let stable = simple();
    composite.add(stable.clone()).unwrap();
    let counter_id = id("concurrent", MeterType::Counter);
    let counter = composite.counter(&counter_id).unwrap();

    let flapping: Vec<ArcMeterRegistry> = (0..4).map(|_| simple() as ArcMeterRegistry).collect();
    std::thread::scope(|s| {
        for _ in 0..4 {
            let counter = &counter;
            s.spawn(move || {
                for _ in 0..1000 {
                    counter.increment(1.0);
                    let _ = counter.count();
                }
            });
        }
        for r in &flapping {
            let composite = &composite;
            s.spawn(move || {
                for _ in 0..50 {
                    composite.add(r.clone()).unwrap();
                    composite.remove(r);
                }
            });
        }
    });

    assert_eq!(stable.counter(&counter_id).unwrap().count(), 4000.0);
    assert_eq!(composite.descendants().len(), 1);
    assert_eq!(counter.registries().len(), 1);
    assert!(same_meter(
        &counter.first_child(),
        &stable.counter(&counter_id).unwrap()
    ));
}
