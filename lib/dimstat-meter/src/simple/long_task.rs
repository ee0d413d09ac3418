/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use foldhash::fast::FixedState;

use dimstat_types::{MeterId, TimeUnit};

use crate::{ArcClock, LongTaskSample, LongTaskTimer, Measurement, Meter, Statistic};

struct RunningTasks {
    clock: ArcClock,
    next_task: AtomicU64,
    /// task id -> monotonic start time
    tasks: Mutex<HashMap<u64, u64, FixedState>>,
}

impl RunningTasks {
    fn elapsed(&self, start: u64) -> u64 {
        self.clock.monotonic_time().saturating_sub(start)
    }
}

pub(super) struct SimpleLongTaskTimer {
    id: MeterId,
    base_time_unit: TimeUnit,
    running: Arc<RunningTasks>,
}

impl SimpleLongTaskTimer {
    pub(super) fn new(id: MeterId, clock: ArcClock, base_time_unit: TimeUnit) -> Self {
        SimpleLongTaskTimer {
            id,
            base_time_unit,
            running: Arc::new(RunningTasks {
                clock,
                next_task: AtomicU64::new(0),
                tasks: Mutex::new(HashMap::with_hasher(FixedState::default())),
            }),
        }
    }
}

impl Meter for SimpleLongTaskTimer {
    fn id(&self) -> &MeterId {
        &self.id
    }

    fn measure(&self) -> Vec<Measurement> {
        vec![
            Measurement::new(Statistic::ActiveTasks, self.active_tasks() as f64),
            Measurement::new(Statistic::Duration, self.duration(self.base_time_unit)),
        ]
    }
}

impl LongTaskTimer for SimpleLongTaskTimer {
    fn start(&self) -> Box<dyn LongTaskSample> {
        let task = self.running.next_task.fetch_add(1, Ordering::Relaxed);
        let start = self.running.clock.monotonic_time();
        self.running.tasks.lock().unwrap().insert(task, start);
        Box::new(SimpleSample {
            running: self.running.clone(),
            task,
            start,
            stopped: AtomicBool::new(false),
        })
    }

    fn active_tasks(&self) -> usize {
        self.running.tasks.lock().unwrap().len()
    }

    fn duration(&self, unit: TimeUnit) -> f64 {
        let tasks = self.running.tasks.lock().unwrap();
        let nanos: u64 = tasks.values().map(|s| self.running.elapsed(*s)).sum();
        unit.convert(nanos as f64, TimeUnit::Nanoseconds)
    }

    fn max(&self, unit: TimeUnit) -> f64 {
        let tasks = self.running.tasks.lock().unwrap();
        let Some(oldest) = tasks.values().min() else {
            return 0.0;
        };
        unit.convert(self.running.elapsed(*oldest) as f64, TimeUnit::Nanoseconds)
    }
}

struct SimpleSample {
    running: Arc<RunningTasks>,
    task: u64,
    start: u64,
    stopped: AtomicBool,
}

impl LongTaskSample for SimpleSample {
    fn stop(&self) -> Duration {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return Duration::ZERO;
        }
        self.running.tasks.lock().unwrap().remove(&self.task);
        Duration::from_nanos(self.running.elapsed(self.start))
    }

    fn duration(&self, unit: TimeUnit) -> f64 {
        if self.stopped.load(Ordering::Acquire) {
            return 0.0;
        }
        unit.convert(self.running.elapsed(self.start) as f64, TimeUnit::Nanoseconds)
    }
}
