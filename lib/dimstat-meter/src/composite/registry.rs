/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use foldhash::fast::FixedState;
use log::debug;

use dimstat_types::{MeterId, MeterType};

use super::{
    CompositeCounter, CompositeDistributionSummary, CompositeGauge, CompositeLongTaskTimer,
    CompositeTimer,
};
use crate::{
    AnyMeter, ArcCounter, ArcDistributionSummary, ArcGauge, ArcLongTaskTimer, ArcMeterRegistry,
    ArcTimer, DistributionStatisticConfig, GaugeFunction, MeterRegistry, RegistryError,
    RegistryId,
};

#[derive(Clone)]
enum CompositeEntry {
    Counter(Arc<CompositeCounter>),
    Gauge(Arc<CompositeGauge>),
    Timer(Arc<CompositeTimer>),
    DistributionSummary(Arc<CompositeDistributionSummary>),
    LongTaskTimer(Arc<CompositeLongTaskTimer>),
}

impl CompositeEntry {
    fn meter_type(&self) -> MeterType {
        match self {
            CompositeEntry::Counter(_) => MeterType::Counter,
            CompositeEntry::Gauge(_) => MeterType::Gauge,
            CompositeEntry::Timer(_) => MeterType::Timer,
            CompositeEntry::DistributionSummary(_) => MeterType::DistributionSummary,
            CompositeEntry::LongTaskTimer(_) => MeterType::LongTaskTimer,
        }
    }

    fn attach(&self, registry: &dyn MeterRegistry) {
        match self {
            CompositeEntry::Counter(m) => m.attach(registry),
            CompositeEntry::Gauge(m) => m.attach(registry),
            CompositeEntry::Timer(m) => m.attach(registry),
            CompositeEntry::DistributionSummary(m) => m.attach(registry),
            CompositeEntry::LongTaskTimer(m) => m.attach(registry),
        }
    }

    fn detach(&self, registry: RegistryId) {
        match self {
            CompositeEntry::Counter(m) => m.detach(registry),
            CompositeEntry::Gauge(m) => m.detach(registry),
            CompositeEntry::Timer(m) => m.detach(registry),
            CompositeEntry::DistributionSummary(m) => m.detach(registry),
            CompositeEntry::LongTaskTimer(m) => m.detach(registry),
        }
    }

    fn as_counter(&self) -> Option<&Arc<CompositeCounter>> {
        match self {
            CompositeEntry::Counter(m) => Some(m),
            _ => None,
        }
    }

    fn as_gauge(&self) -> Option<&Arc<CompositeGauge>> {
        match self {
            CompositeEntry::Gauge(m) => Some(m),
            _ => None,
        }
    }

    fn as_timer(&self) -> Option<&Arc<CompositeTimer>> {
        match self {
            CompositeEntry::Timer(m) => Some(m),
            _ => None,
        }
    }

    fn as_summary(&self) -> Option<&Arc<CompositeDistributionSummary>> {
        match self {
            CompositeEntry::DistributionSummary(m) => Some(m),
            _ => None,
        }
    }

    fn as_long_task_timer(&self) -> Option<&Arc<CompositeLongTaskTimer>> {
        match self {
            CompositeEntry::LongTaskTimer(m) => Some(m),
            _ => None,
        }
    }
}

impl From<CompositeEntry> for AnyMeter {
    fn from(entry: CompositeEntry) -> Self {
        match entry {
            CompositeEntry::Counter(m) => AnyMeter::Counter(m),
            CompositeEntry::Gauge(m) => AnyMeter::Gauge(m),
            CompositeEntry::Timer(m) => AnyMeter::Timer(m),
            CompositeEntry::DistributionSummary(m) => AnyMeter::DistributionSummary(m),
            CompositeEntry::LongTaskTimer(m) => AnyMeter::LongTaskTimer(m),
        }
    }
}

#[derive(Default)]
struct RegistryState {
    /// the registries added directly
    registries: Vec<ArcMeterRegistry>,
    /// the non composite registries reachable from `registries`, each once
    descendants: Vec<ArcMeterRegistry>,
    meters: HashMap<MeterId, CompositeEntry, FixedState>,
}

fn push_unique(list: &mut Vec<ArcMeterRegistry>, registry: &ArcMeterRegistry) {
    let id = registry.registry_id();
    if !list.iter().any(|r| r.registry_id() == id) {
        list.push(registry.clone());
    }
}

/// A registry mirroring each of its meters into every attached registry.
///
/// Attached composites are flattened, their own non composite registries
/// are attached directly, and changes made to them later are propagated
/// upward. The state of a parent is always locked before the state of any
/// of its children.
pub struct CompositeMeterRegistry {
    id: RegistryId,
    self_ref: Weak<CompositeMeterRegistry>,
    state: Mutex<RegistryState>,
    parents: Mutex<Vec<Weak<CompositeMeterRegistry>>>,
}

impl CompositeMeterRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|self_ref| CompositeMeterRegistry {
            id: RegistryId::next(),
            self_ref: self_ref.clone(),
            state: Mutex::new(RegistryState::default()),
            parents: Mutex::new(Vec::new()),
        })
    }

    pub fn add(&self, registry: ArcMeterRegistry) -> Result<(), RegistryError> {
        let registry_id = registry.registry_id();
        if registry_id == self.id {
            return Err(RegistryError::SelfContaining);
        }
        if let Some(composite) = registry.as_composite() {
            if composite.reaches(self.id) {
                return Err(RegistryError::SelfContaining);
            }
        }

        {
            let mut state = self.state.lock().unwrap();
            if state
                .registries
                .iter()
                .any(|r| r.registry_id() == registry_id)
            {
                return Ok(());
            }
            state.registries.push(registry.clone());
            self.refresh_descendants(&mut state);
        }
        debug!("registry {registry_id} added to composite {}", self.id);

        if let Some(composite) = registry.as_composite() {
            composite.add_parent(&self.self_ref);
        }
        self.notify_parents();
        Ok(())
    }

    /// Detach `registry`, returns false if it was not added.
    pub fn remove(&self, registry: &ArcMeterRegistry) -> bool {
        let registry_id = registry.registry_id();
        {
            let mut state = self.state.lock().unwrap();
            let Some(pos) = state
                .registries
                .iter()
                .position(|r| r.registry_id() == registry_id)
            else {
                return false;
            };
            state.registries.remove(pos);
            self.refresh_descendants(&mut state);
        }
        debug!("registry {registry_id} removed from composite {}", self.id);

        if let Some(composite) = registry.as_composite() {
            composite.remove_parent(self.id);
        }
        self.notify_parents();
        true
    }

    pub fn registries(&self) -> Vec<ArcMeterRegistry> {
        self.state.lock().unwrap().registries.clone()
    }

    pub fn descendants(&self) -> Vec<ArcMeterRegistry> {
        self.state.lock().unwrap().descendants.clone()
    }

    /// Whether `registry` is this one or is attached at any depth.
    fn reaches(&self, registry: RegistryId) -> bool {
        if registry == self.id {
            return true;
        }
        let state = self.state.lock().unwrap();
        state.registries.iter().any(|r| match r.as_composite() {
            Some(composite) => composite.reaches(registry),
            None => r.registry_id() == registry,
        })
    }

    fn refresh_descendants(&self, state: &mut RegistryState) {
        let mut descendants = Vec::new();
        for registry in &state.registries {
            match registry.as_composite() {
                Some(composite) => {
                    let nested = composite.state.lock().unwrap();
                    for r in &nested.descendants {
                        push_unique(&mut descendants, r);
                    }
                }
                None => push_unique(&mut descendants, registry),
            }
        }

        for old in &state.descendants {
            let old_id = old.registry_id();
            if !descendants.iter().any(|r| r.registry_id() == old_id) {
                for meter in state.meters.values() {
                    meter.detach(old_id);
                }
            }
        }
        for new in &descendants {
            let new_id = new.registry_id();
            if !state.descendants.iter().any(|r| r.registry_id() == new_id) {
                for meter in state.meters.values() {
                    meter.attach(new.as_ref());
                }
            }
        }
        state.descendants = descendants;
    }

    fn refresh(&self) {
        {
            let mut state = self.state.lock().unwrap();
            self.refresh_descendants(&mut state);
        }
        self.notify_parents();
    }

    fn add_parent(&self, parent: &Weak<CompositeMeterRegistry>) {
        let mut parents = self.parents.lock().unwrap();
        parents.retain(|p| p.strong_count() > 0);
        if !parents.iter().any(|p| p.ptr_eq(parent)) {
            parents.push(parent.clone());
        }
    }

    fn remove_parent(&self, parent: RegistryId) {
        let mut parents = self.parents.lock().unwrap();
        parents.retain(|p| p.upgrade().is_some_and(|p| p.id != parent));
    }

    fn notify_parents(&self) {
        let parents: Vec<Arc<CompositeMeterRegistry>> = self
            .parents
            .lock()
            .unwrap()
            .iter()
            .filter_map(|p| p.upgrade())
            .collect();
        for parent in parents {
            parent.refresh();
        }
    }

    fn register<T, F>(
        &self,
        id: &MeterId,
        meter_type: MeterType,
        existing: fn(&CompositeEntry) -> Option<&Arc<T>>,
        wrap: fn(Arc<T>) -> CompositeEntry,
        create: F,
    ) -> Result<Arc<T>, RegistryError>
    where
        F: FnOnce(MeterId) -> T,
    {
        let mut state = self.state.lock().unwrap();
        if let Some(entry) = state.meters.get(id) {
            return existing(entry)
                .cloned()
                .ok_or_else(|| RegistryError::TypeConflict {
                    name: id.to_string(),
                    existing: entry.meter_type(),
                });
        }

        let meter = Arc::new(create(id.clone().with_type(meter_type)));
        let entry = wrap(meter.clone());
        for registry in &state.descendants {
            entry.attach(registry.as_ref());
        }
        state.meters.insert(id.clone(), entry);
        Ok(meter)
    }

    pub fn counter(&self, id: &MeterId) -> Result<Arc<CompositeCounter>, RegistryError> {
        self.register(
            id,
            MeterType::Counter,
            CompositeEntry::as_counter,
            CompositeEntry::Counter,
            CompositeCounter::new,
        )
    }

    pub fn gauge(
        &self,
        id: &MeterId,
        f: GaugeFunction,
    ) -> Result<Arc<CompositeGauge>, RegistryError> {
        self.register(
            id,
            MeterType::Gauge,
            CompositeEntry::as_gauge,
            CompositeEntry::Gauge,
            |id| CompositeGauge::new(id, f),
        )
    }

    pub fn timer(
        &self,
        id: &MeterId,
        config: &DistributionStatisticConfig,
    ) -> Result<Arc<CompositeTimer>, RegistryError> {
        // fail here rather than in every child
        config.build_quantiles()?;
        self.register(
            id,
            MeterType::Timer,
            CompositeEntry::as_timer,
            CompositeEntry::Timer,
            |id| CompositeTimer::new(id, config.clone()),
        )
    }

    pub fn summary(
        &self,
        id: &MeterId,
        config: &DistributionStatisticConfig,
    ) -> Result<Arc<CompositeDistributionSummary>, RegistryError> {
        config.build_quantiles()?;
        self.register(
            id,
            MeterType::DistributionSummary,
            CompositeEntry::as_summary,
            CompositeEntry::DistributionSummary,
            |id| CompositeDistributionSummary::new(id, config.clone()),
        )
    }

    pub fn long_task_timer(
        &self,
        id: &MeterId,
    ) -> Result<Arc<CompositeLongTaskTimer>, RegistryError> {
        self.register(
            id,
            MeterType::LongTaskTimer,
            CompositeEntry::as_long_task_timer,
            CompositeEntry::LongTaskTimer,
            CompositeLongTaskTimer::new,
        )
    }

    /// Drop the composite meter and the meters it mirrors into.
    pub fn remove_meter(&self, id: &MeterId) -> Option<AnyMeter> {
        let mut state = self.state.lock().unwrap();
        let entry = state.meters.remove(id)?;
        for registry in &state.descendants {
            registry.remove(id);
            entry.detach(registry.registry_id());
        }
        debug!("meter {id} removed from composite {}", self.id);
        Some(entry.into())
    }
}

impl MeterRegistry for CompositeMeterRegistry {
    fn registry_id(&self) -> RegistryId {
        self.id
    }

    fn counter(&self, id: &MeterId) -> Result<ArcCounter, RegistryError> {
        Ok(CompositeMeterRegistry::counter(self, id)?)
    }

    fn gauge(&self, id: &MeterId, f: GaugeFunction) -> Result<ArcGauge, RegistryError> {
        Ok(CompositeMeterRegistry::gauge(self, id, f)?)
    }

    fn timer(
        &self,
        id: &MeterId,
        config: &DistributionStatisticConfig,
    ) -> Result<ArcTimer, RegistryError> {
        Ok(CompositeMeterRegistry::timer(self, id, config)?)
    }

    fn summary(
        &self,
        id: &MeterId,
        config: &DistributionStatisticConfig,
    ) -> Result<ArcDistributionSummary, RegistryError> {
        Ok(CompositeMeterRegistry::summary(self, id, config)?)
    }

    fn long_task_timer(&self, id: &MeterId) -> Result<ArcLongTaskTimer, RegistryError> {
        Ok(CompositeMeterRegistry::long_task_timer(self, id)?)
    }

    fn find(&self, id: &MeterId) -> Option<AnyMeter> {
        let state = self.state.lock().unwrap();
        state.meters.get(id).cloned().map(AnyMeter::from)
    }

    fn meters(&self) -> Vec<AnyMeter> {
        let state = self.state.lock().unwrap();
        state.meters.values().cloned().map(AnyMeter::from).collect()
    }

    fn remove(&self, id: &MeterId) -> Option<AnyMeter> {
        self.remove_meter(id)
    }

    fn as_composite(&self) -> Option<&CompositeMeterRegistry> {
        Some(self)
    }
}
