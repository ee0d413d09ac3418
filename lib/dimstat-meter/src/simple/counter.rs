/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::Ordering;

use portable_atomic::AtomicF64;

use dimstat_types::MeterId;

use crate::{Counter, Gauge, GaugeFunction, Measurement, Meter, Statistic};

pub(super) struct SimpleCounter {
    id: MeterId,
    count: AtomicF64,
}

impl SimpleCounter {
    pub(super) fn new(id: MeterId) -> Self {
        SimpleCounter {
            id,
            count: AtomicF64::new(0.0),
        }
    }
}

impl Meter for SimpleCounter {
    fn id(&self) -> &MeterId {
        &self.id
    }

    fn measure(&self) -> Vec<Measurement> {
        vec![Measurement::new(Statistic::Count, self.count())]
    }
}

impl Counter for SimpleCounter {
    fn increment(&self, amount: f64) {
        self.count.fetch_add(amount, Ordering::Relaxed);
    }

    fn count(&self) -> f64 {
        self.count.load(Ordering::Relaxed)
    }
}

pub(super) struct SimpleGauge {
    id: MeterId,
    f: GaugeFunction,
}

impl SimpleGauge {
    pub(super) fn new(id: MeterId, f: GaugeFunction) -> Self {
        SimpleGauge { id, f }
    }
}

impl Meter for SimpleGauge {
    fn id(&self) -> &MeterId {
        &self.id
    }

    fn measure(&self) -> Vec<Measurement> {
        vec![Measurement::new(Statistic::Value, self.value())]
    }
}

impl Gauge for SimpleGauge {
    fn value(&self) -> f64 {
        self.f.value()
    }
}
