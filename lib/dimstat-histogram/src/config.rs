/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use dimstat_types::TimeUnit;

use super::{
    BucketError, BucketShape, DoubleTag, Histogram, HistogramType, TimeHistogram, ValueHistogram,
};

/// How to build the histogram of a meter.
///
/// The registry owning the meter supplies its base time unit and its
/// default histogram type when the histogram is created.
#[derive(Clone, Debug, PartialEq)]
pub struct HistogramConfig {
    shape: BucketShape,
    histogram_type: Option<HistogramType>,
    time_unit: Option<TimeUnit>,
}

impl HistogramConfig {
    pub fn new(shape: BucketShape) -> Self {
        HistogramConfig {
            shape,
            histogram_type: None,
            time_unit: None,
        }
    }

    pub fn linear(start: f64, width: f64, count: u32) -> Result<Self, BucketError> {
        BucketShape::linear(start, width, count).map(HistogramConfig::new)
    }

    pub fn exponential(start: f64, exp: f64, count: u32) -> Result<Self, BucketError> {
        BucketShape::exponential(start, exp, count).map(HistogramConfig::new)
    }

    pub fn percentiles() -> Self {
        HistogramConfig::new(BucketShape::Percentiles)
    }

    /// Linear buckets with `start` and `width` given in `unit`.
    pub fn linear_time(
        unit: TimeUnit,
        start: f64,
        width: f64,
        count: u32,
    ) -> Result<Self, BucketError> {
        Ok(HistogramConfig::linear(start, width, count)?.with_time_unit(unit))
    }

    /// Exponential buckets with `start` given in `unit`.
    pub fn exponential_time(
        unit: TimeUnit,
        start: f64,
        exp: f64,
        count: u32,
    ) -> Result<Self, BucketError> {
        Ok(HistogramConfig::exponential(start, exp, count)?.with_time_unit(unit))
    }

    /// The percentile ladder applied to nanoseconds.
    pub fn percentiles_time() -> Self {
        HistogramConfig::percentiles().with_time_unit(TimeUnit::Nanoseconds)
    }

    /// Override the default histogram type of the registry.
    pub fn with_type(mut self, histogram_type: HistogramType) -> Self {
        self.histogram_type = Some(histogram_type);
        self
    }

    pub fn with_time_unit(mut self, unit: TimeUnit) -> Self {
        self.time_unit = Some(unit);
        self
    }

    #[inline]
    pub fn set_type(&mut self, histogram_type: HistogramType) {
        self.histogram_type = Some(histogram_type);
    }

    #[inline]
    pub fn set_time_unit(&mut self, unit: TimeUnit) {
        self.time_unit = Some(unit);
    }

    #[inline]
    pub fn shape(&self) -> &BucketShape {
        &self.shape
    }

    #[inline]
    pub fn histogram_type(&self) -> Option<HistogramType> {
        self.histogram_type
    }

    #[inline]
    pub fn time_unit(&self) -> Option<TimeUnit> {
        self.time_unit
    }

    #[inline]
    pub fn is_percentiles(&self) -> bool {
        self.shape.is_percentiles()
    }

    pub fn create(
        &self,
        base_time_unit: TimeUnit,
        default_type: HistogramType,
    ) -> Box<dyn ValueHistogram> {
        let histogram_type = self.histogram_type.unwrap_or(default_type);
        let percentiles = self.is_percentiles();
        match self.time_unit {
            Some(unit) => Box::new(
                TimeHistogram::new(self.shape.clone(), unit, base_time_unit, histogram_type)
                    .with_percentiles(percentiles),
            ),
            None => Box::new(
                Histogram::<DoubleTag>::new(self.shape.clone(), histogram_type)
                    .with_percentiles(percentiles),
            ),
        }
    }
}
