/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeSet;

use dimstat_histogram::{HistogramConfig, HistogramType, ValueHistogram};
use dimstat_quantile::{
    Frugal2UQuantiles, GkQuantiles, Quantile, QuantileError, Quantiles, WindowSketchQuantiles,
};
use dimstat_types::TimeUnit;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum QuantileAlgorithm {
    #[default]
    Frugal2U,
    Gk {
        epsilon: f64,
    },
    WindowSketch {
        epsilon: f64,
        window_size: u32,
    },
}

impl QuantileAlgorithm {
    pub const fn as_str(&self) -> &'static str {
        match self {
            QuantileAlgorithm::Frugal2U => "frugal2u",
            QuantileAlgorithm::Gk { .. } => "gk",
            QuantileAlgorithm::WindowSketch { .. } => "window_sketch",
        }
    }
}

/// Which distribution statistics a timer or a summary keeps besides its
/// count, total and max.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DistributionStatisticConfig {
    quantiles: BTreeSet<Quantile>,
    quantile_algorithm: QuantileAlgorithm,
    histogram: Option<HistogramConfig>,
}

impl DistributionStatisticConfig {
    pub fn with_quantiles<'a, T>(quantiles: T) -> Self
    where
        T: IntoIterator<Item = &'a Quantile>,
    {
        DistributionStatisticConfig {
            quantiles: quantiles.into_iter().cloned().collect(),
            ..Default::default()
        }
    }

    pub fn with_quantile(mut self, quantile: Quantile) -> Self {
        self.quantiles.insert(quantile);
        self
    }

    pub fn with_algorithm(mut self, algorithm: QuantileAlgorithm) -> Self {
        self.quantile_algorithm = algorithm;
        self
    }

    pub fn with_histogram(mut self, histogram: HistogramConfig) -> Self {
        self.histogram = Some(histogram);
        self
    }

    #[inline]
    pub fn set_quantile_list(&mut self, list: BTreeSet<Quantile>) {
        self.quantiles = list;
    }

    #[inline]
    pub fn set_quantile_algorithm(&mut self, algorithm: QuantileAlgorithm) {
        self.quantile_algorithm = algorithm;
    }

    #[inline]
    pub fn set_histogram(&mut self, histogram: HistogramConfig) {
        self.histogram = Some(histogram);
    }

    #[inline]
    pub fn quantiles(&self) -> &BTreeSet<Quantile> {
        &self.quantiles
    }

    #[inline]
    pub fn quantile_algorithm(&self) -> QuantileAlgorithm {
        self.quantile_algorithm
    }

    #[inline]
    pub fn histogram(&self) -> Option<&HistogramConfig> {
        self.histogram.as_ref()
    }

    /// Whether anything besides count, total and max is kept.
    pub fn is_enabled(&self) -> bool {
        !self.quantiles.is_empty() || self.histogram.is_some()
    }

    pub fn build_quantiles(&self) -> Result<Option<Box<dyn Quantiles>>, QuantileError> {
        if self.quantiles.is_empty() {
            return Ok(None);
        }
        let monitored: Vec<f64> = self.quantiles.iter().map(|q| q.value()).collect();
        let quantiles: Box<dyn Quantiles> = match self.quantile_algorithm {
            QuantileAlgorithm::Frugal2U => Box::new(Frugal2UQuantiles::new(&monitored)?),
            QuantileAlgorithm::Gk { epsilon } => Box::new(GkQuantiles::new(&monitored, epsilon)?),
            QuantileAlgorithm::WindowSketch {
                epsilon,
                window_size,
            } => Box::new(
                WindowSketchQuantiles::new(&monitored, epsilon)?.with_window_size(window_size)?,
            ),
        };
        Ok(Some(quantiles))
    }

    pub fn build_histogram(
        &self,
        base_time_unit: TimeUnit,
        default_type: HistogramType,
    ) -> Option<Box<dyn ValueHistogram>> {
        self.histogram
            .as_ref()
            .map(|h| h.create(base_time_unit, default_type))
    }
}
