/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use dimstat_types::MeterId;

use super::CompositeChildren;
use crate::noop::NoopGauge;
use crate::{Gauge, GaugeFunction, Measurement, Meter, MeterRegistry, RegistryId};

/// Every child observes the same value source.
pub struct CompositeGauge {
    id: MeterId,
    f: GaugeFunction,
    children: CompositeChildren<dyn Gauge>,
}

impl CompositeGauge {
    pub(crate) fn new(id: MeterId, f: GaugeFunction) -> Self {
        CompositeGauge {
            id,
            f,
            children: CompositeChildren::default(),
        }
    }

    pub(crate) fn attach(&self, registry: &dyn MeterRegistry) {
        self.children
            .attach(&self.id, registry, |r| r.gauge(&self.id, self.f.clone()));
    }

    pub(crate) fn detach(&self, registry: RegistryId) {
        self.children.detach(&self.id, registry);
    }

    pub fn first_child(&self) -> Arc<dyn Gauge> {
        self.children
            .first_child(|| Arc::new(NoopGauge::new(self.id.clone())))
    }

    pub fn registries(&self) -> Vec<RegistryId> {
        self.children.registries()
    }
}

impl Meter for CompositeGauge {
    fn id(&self) -> &MeterId {
        &self.id
    }

    fn measure(&self) -> Vec<Measurement> {
        self.first_child().measure()
    }
}

impl Gauge for CompositeGauge {
    fn value(&self) -> f64 {
        self.first_child().value()
    }
}
