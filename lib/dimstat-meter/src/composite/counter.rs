/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use dimstat_types::MeterId;

use super::CompositeChildren;
use crate::noop::NoopCounter;
use crate::{Counter, Measurement, Meter, MeterRegistry, RegistryId};

pub struct CompositeCounter {
    id: MeterId,
    children: CompositeChildren<dyn Counter>,
}

impl CompositeCounter {
    pub(crate) fn new(id: MeterId) -> Self {
        CompositeCounter {
            id,
            children: CompositeChildren::default(),
        }
    }

    pub(crate) fn attach(&self, registry: &dyn MeterRegistry) {
        self.children
            .attach(&self.id, registry, |r| r.counter(&self.id));
    }

    pub(crate) fn detach(&self, registry: RegistryId) {
        self.children.detach(&self.id, registry);
    }

    /// The child answering reads.
    pub fn first_child(&self) -> Arc<dyn Counter> {
        self.children
            .first_child(|| Arc::new(NoopCounter::new(self.id.clone())))
    }

    pub fn registries(&self) -> Vec<RegistryId> {
        self.children.registries()
    }
}

impl Meter for CompositeCounter {
    fn id(&self) -> &MeterId {
        &self.id
    }

    fn measure(&self) -> Vec<Measurement> {
        self.first_child().measure()
    }
}

impl Counter for CompositeCounter {
    fn increment(&self, amount: f64) {
        self.children.for_each(|c| c.increment(amount));
    }

    fn count(&self) -> f64 {
        self.first_child().count()
    }
}
