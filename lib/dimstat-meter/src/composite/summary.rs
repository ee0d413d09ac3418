/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use dimstat_types::MeterId;

use super::CompositeChildren;
use crate::noop::NoopDistributionSummary;
use crate::{
    DistributionStatisticConfig, DistributionSummary, HistogramSnapshot, Measurement, Meter,
    MeterRegistry, RegistryId,
};

pub struct CompositeDistributionSummary {
    id: MeterId,
    config: DistributionStatisticConfig,
    children: CompositeChildren<dyn DistributionSummary>,
}

impl CompositeDistributionSummary {
    pub(crate) fn new(id: MeterId, config: DistributionStatisticConfig) -> Self {
        CompositeDistributionSummary {
            id,
            config,
            children: CompositeChildren::default(),
        }
    }

    pub(crate) fn attach(&self, registry: &dyn MeterRegistry) {
        self.children
            .attach(&self.id, registry, |r| r.summary(&self.id, &self.config));
    }

    pub(crate) fn detach(&self, registry: RegistryId) {
        self.children.detach(&self.id, registry);
    }

    pub fn first_child(&self) -> Arc<dyn DistributionSummary> {
        self.children
            .first_child(|| Arc::new(NoopDistributionSummary::new(self.id.clone())))
    }

    pub fn registries(&self) -> Vec<RegistryId> {
        self.children.registries()
    }

    #[inline]
    pub fn config(&self) -> &DistributionStatisticConfig {
        &self.config
    }
}

impl Meter for CompositeDistributionSummary {
    fn id(&self) -> &MeterId {
        &self.id
    }

    fn measure(&self) -> Vec<Measurement> {
        self.first_child().measure()
    }
}

impl DistributionSummary for CompositeDistributionSummary {
    fn record(&self, amount: f64) {
        self.children.for_each(|s| s.record(amount));
    }

    fn count(&self) -> u64 {
        self.first_child().count()
    }

    fn total_amount(&self) -> f64 {
        self.first_child().total_amount()
    }

    fn max(&self) -> f64 {
        self.first_child().max()
    }

    fn take_snapshot(&self) -> HistogramSnapshot {
        self.first_child().take_snapshot()
    }
}
