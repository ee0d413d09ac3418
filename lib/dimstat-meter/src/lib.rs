/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

use dimstat_quantile::QuantileError;
use dimstat_types::MeterType;

mod clock;
pub use clock::{ArcClock, Clock, MockClock, SystemClock};

mod measure;
pub use measure::{Measurement, Statistic};

mod meter;
pub use meter::{
    ArcCounter, ArcDistributionSummary, ArcGauge, ArcLongTaskTimer, ArcTimer, Counter,
    DistributionSummary, Gauge, GaugeFunction, LongTaskSample, LongTaskTimer, Meter, Timer,
};

mod config;
pub use config::{DistributionStatisticConfig, QuantileAlgorithm};

mod snapshot;
pub use snapshot::{CountAtBucket, HistogramSnapshot, ValueAtQuantile};

mod registry;
pub use registry::{AnyMeter, ArcMeterRegistry, MeterRegistry, RegistryId};

pub mod noop;

mod simple;
pub use simple::{SimpleConfig, SimpleMeterRegistry};

mod composite;
pub use composite::{
    CompositeCounter, CompositeDistributionSummary, CompositeGauge, CompositeLongTaskTimer,
    CompositeMeterRegistry, CompositeTimer,
};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("meter {name} is already registered as {existing}")]
    TypeConflict { name: String, existing: MeterType },
    #[error("a composite registry can not contain itself")]
    SelfContaining,
    #[error("invalid quantile config: {0}")]
    Quantile(#[from] QuantileError),
}
