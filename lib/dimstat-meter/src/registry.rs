/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dimstat_types::{MeterId, MeterType};

use crate::{
    ArcCounter, ArcDistributionSummary, ArcGauge, ArcLongTaskTimer, ArcTimer,
    CompositeMeterRegistry, DistributionStatisticConfig, GaugeFunction, Measurement,
    RegistryError,
};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Process unique handle of a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegistryId(u64);

impl RegistryId {
    pub fn next() -> Self {
        RegistryId(NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RegistryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "registry-{}", self.0)
    }
}

#[derive(Clone)]
pub enum AnyMeter {
    Counter(ArcCounter),
    Gauge(ArcGauge),
    Timer(ArcTimer),
    DistributionSummary(ArcDistributionSummary),
    LongTaskTimer(ArcLongTaskTimer),
}

impl AnyMeter {
    pub fn meter_type(&self) -> MeterType {
        match self {
            AnyMeter::Counter(_) => MeterType::Counter,
            AnyMeter::Gauge(_) => MeterType::Gauge,
            AnyMeter::Timer(_) => MeterType::Timer,
            AnyMeter::DistributionSummary(_) => MeterType::DistributionSummary,
            AnyMeter::LongTaskTimer(_) => MeterType::LongTaskTimer,
        }
    }

    pub fn id(&self) -> &MeterId {
        match self {
            AnyMeter::Counter(m) => m.id(),
            AnyMeter::Gauge(m) => m.id(),
            AnyMeter::Timer(m) => m.id(),
            AnyMeter::DistributionSummary(m) => m.id(),
            AnyMeter::LongTaskTimer(m) => m.id(),
        }
    }

    pub fn measure(&self) -> Vec<Measurement> {
        match self {
            AnyMeter::Counter(m) => m.measure(),
            AnyMeter::Gauge(m) => m.measure(),
            AnyMeter::Timer(m) => m.measure(),
            AnyMeter::DistributionSummary(m) => m.measure(),
            AnyMeter::LongTaskTimer(m) => m.measure(),
        }
    }

    pub fn as_counter(&self) -> Option<&ArcCounter> {
        match self {
            AnyMeter::Counter(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_gauge(&self) -> Option<&ArcGauge> {
        match self {
            AnyMeter::Gauge(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_timer(&self) -> Option<&ArcTimer> {
        match self {
            AnyMeter::Timer(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_summary(&self) -> Option<&ArcDistributionSummary> {
        match self {
            AnyMeter::DistributionSummary(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_long_task_timer(&self) -> Option<&ArcLongTaskTimer> {
        match self {
            AnyMeter::LongTaskTimer(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Debug for AnyMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyMeter")
            .field("type", &self.meter_type())
            .field("id", self.id())
            .finish()
    }
}

/// A backend that owns concrete meters.
///
/// Asking twice for the same id returns the same meter, asking for an id
/// already registered as another type of meter is an error.
pub trait MeterRegistry: Send + Sync {
    fn registry_id(&self) -> RegistryId;

    fn counter(&self, id: &MeterId) -> Result<ArcCounter, RegistryError>;

    fn gauge(&self, id: &MeterId, f: GaugeFunction) -> Result<ArcGauge, RegistryError>;

    fn timer(
        &self,
        id: &MeterId,
        config: &DistributionStatisticConfig,
    ) -> Result<ArcTimer, RegistryError>;

    fn summary(
        &self,
        id: &MeterId,
        config: &DistributionStatisticConfig,
    ) -> Result<ArcDistributionSummary, RegistryError>;

    fn long_task_timer(&self, id: &MeterId) -> Result<ArcLongTaskTimer, RegistryError>;

    fn find(&self, id: &MeterId) -> Option<AnyMeter>;

    fn meters(&self) -> Vec<AnyMeter>;

    /// Drop the meter, later requests for the same id create a new one.
    fn remove(&self, id: &MeterId) -> Option<AnyMeter>;

    fn as_composite(&self) -> Option<&CompositeMeterRegistry> {
        None
    }
}

pub type ArcMeterRegistry = Arc<dyn MeterRegistry>;
