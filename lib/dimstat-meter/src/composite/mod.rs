/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, OnceLock};

use arc_swap::{ArcSwap, ArcSwapOption};
use log::{debug, warn};

use dimstat_types::MeterId;

use crate::{MeterRegistry, RegistryError, RegistryId};

mod counter;
pub use counter::CompositeCounter;

mod gauge;
pub use gauge::CompositeGauge;

mod timer;
pub use timer::CompositeTimer;

mod summary;
pub use summary::CompositeDistributionSummary;

mod long_task;
pub use long_task::CompositeLongTaskTimer;

mod registry;
pub use registry::CompositeMeterRegistry;

struct Child<M: ?Sized> {
    registry: RegistryId,
    meter: Arc<M>,
}

/// The per registry children of a composite meter.
///
/// The children vector is copy on write, so writers iterate a snapshot while
/// registries are attached or detached concurrently. Reads go to a cached
/// first child, which is reset whenever that exact child is removed.
pub(crate) struct CompositeChildren<M: ?Sized> {
    children: ArcSwap<Vec<Arc<Child<M>>>>,
    first: ArcSwapOption<Child<M>>,
    noop: OnceLock<Arc<M>>,
}

impl<M: ?Sized> Default for CompositeChildren<M> {
    fn default() -> Self {
        CompositeChildren {
            children: ArcSwap::from_pointee(Vec::new()),
            first: ArcSwapOption::empty(),
            noop: OnceLock::new(),
        }
    }
}

impl<M: ?Sized> CompositeChildren<M> {
    /// Create the child for `registry` unless it already has one.
    pub(crate) fn attach<F>(&self, id: &MeterId, registry: &dyn MeterRegistry, create: F)
    where
        F: FnOnce(&dyn MeterRegistry) -> Result<Arc<M>, RegistryError>,
    {
        let registry_id = registry.registry_id();
        if self.contains(registry_id) {
            return;
        }
        match create(registry) {
            Ok(meter) => {
                if self.add(registry_id, meter) {
                    debug!("meter {id} attached to {registry_id}");
                }
            }
            Err(e) => warn!("failed to attach meter {id} to {registry_id}: {e}"),
        }
    }

    pub(crate) fn detach(&self, id: &MeterId, registry: RegistryId) {
        if self.remove(registry).is_some() {
            debug!("meter {id} detached from {registry}");
        }
    }

    pub(crate) fn add(&self, registry: RegistryId, meter: Arc<M>) -> bool {
        let child = Arc::new(Child { registry, meter });
        let prev = self.children.rcu(|old| {
            if old.iter().any(|c| c.registry == registry) {
                Arc::clone(old)
            } else {
                let mut children = Vec::with_capacity(old.len() + 1);
                children.extend(old.iter().cloned());
                children.push(child.clone());
                Arc::new(children)
            }
        });
        if prev.iter().any(|c| c.registry == registry) {
            return false;
        }
        self.install_first(&child);
        true
    }

    pub(crate) fn remove(&self, registry: RegistryId) -> Option<Arc<M>> {
        let prev = self.children.rcu(|old| {
            if old.iter().any(|c| c.registry == registry) {
                let children: Vec<_> = old
                    .iter()
                    .filter(|c| c.registry != registry)
                    .cloned()
                    .collect();
                Arc::new(children)
            } else {
                Arc::clone(old)
            }
        });
        let removed = prev.iter().find(|c| c.registry == registry)?.clone();
        self.first
            .compare_and_swap(&Some(removed.clone()), None::<Arc<Child<M>>>);
        Some(removed.meter.clone())
    }

    /// Try to cache `child` as the first child.
    ///
    /// Returns the child that ends up cached, which is another one if we
    /// lost the race.
    fn install_first(&self, child: &Arc<Child<M>>) -> Arc<Child<M>> {
        let prev = self
            .first
            .compare_and_swap(&None::<Arc<Child<M>>>, Some(child.clone()));
        if let Some(winner) = &*prev {
            return winner.clone();
        }
        // a concurrent remove may have missed the cache before we set it
        if !self.children.load().iter().any(|c| Arc::ptr_eq(c, child)) {
            self.first
                .compare_and_swap(&Some(child.clone()), None::<Arc<Child<M>>>);
        }
        child.clone()
    }

    /// Any live child, or the shared noop meter if there is none.
    pub(crate) fn first_child<F>(&self, noop: F) -> Arc<M>
    where
        F: FnOnce() -> Arc<M>,
    {
        if let Some(child) = &*self.first.load() {
            return child.meter.clone();
        }
        let children = self.children.load();
        match children.first() {
            Some(child) => self.install_first(child).meter.clone(),
            None => self.noop.get_or_init(noop).clone(),
        }
    }

    pub(crate) fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&M),
    {
        for child in self.children.load().iter() {
            f(&child.meter);
        }
    }

    pub(crate) fn contains(&self, registry: RegistryId) -> bool {
        self.children.load().iter().any(|c| c.registry == registry)
    }

    pub(crate) fn registries(&self) -> Vec<RegistryId> {
        self.children.load().iter().map(|c| c.registry).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.children.load().len()
    }
}
