/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::hash::{Hash, Hasher};

use smol_str::SmolStr;

use super::{MeterTags, ParseError, check_meter_str};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeterType {
    Counter,
    Gauge,
    Timer,
    DistributionSummary,
    LongTaskTimer,
}

impl MeterType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MeterType::Counter => "counter",
            MeterType::Gauge => "gauge",
            MeterType::Timer => "timer",
            MeterType::DistributionSummary => "distribution_summary",
            MeterType::LongTaskTimer => "long_task_timer",
        }
    }
}

impl fmt::Display for MeterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a meter.
///
/// Two ids are equal when their names and tags are equal, the description,
/// base unit and type are carried along for the backends only.
#[derive(Clone, Debug)]
pub struct MeterId {
    name: SmolStr,
    tags: MeterTags,
    description: Option<SmolStr>,
    base_unit: Option<SmolStr>,
    meter_type: MeterType,
}

impl MeterId {
    pub fn new(name: &str, meter_type: MeterType) -> Result<Self, ParseError> {
        check_meter_str(name)?;
        Ok(MeterId {
            name: name.into(),
            tags: MeterTags::default(),
            description: None,
            base_unit: None,
            meter_type,
        })
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Result<Self, ParseError> {
        self.tags.insert(key, value)?;
        Ok(self)
    }

    pub fn with_tags(mut self, tags: &MeterTags) -> Self {
        self.tags.extend(tags);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_base_unit(mut self, base_unit: &str) -> Self {
        self.base_unit = Some(base_unit.into());
        self
    }

    /// The same identity registered as another type of meter.
    pub fn with_type(mut self, meter_type: MeterType) -> Self {
        self.meter_type = meter_type;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[inline]
    pub fn tags(&self) -> &MeterTags {
        &self.tags
    }

    #[inline]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key)
    }

    #[inline]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[inline]
    pub fn base_unit(&self) -> Option<&str> {
        self.base_unit.as_deref()
    }

    #[inline]
    pub fn meter_type(&self) -> MeterType {
        self.meter_type
    }
}

impl PartialEq for MeterId {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.tags == other.tags
    }
}

impl Eq for MeterId {}

impl Hash for MeterId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.tags.hash(state);
    }
}

impl fmt::Display for MeterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tags.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}{{{}}}", self.name, self.tags)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn identity() {
        let a = MeterId::new("requests", MeterType::Counter)
            .unwrap()
            .with_tag("status", "200")
            .unwrap()
            .with_description("served requests")
            .with_base_unit("requests");
        let b = MeterId::new("requests", MeterType::Timer)
            .unwrap()
            .with_tag("status", "200")
            .unwrap();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a.clone());
        assert!(set.contains(&b));

        let c = b.clone().with_tag("status", "500").unwrap();
        assert_ne!(a, c);

        assert_eq!(a.description(), Some("served requests"));
        assert_eq!(a.base_unit(), Some("requests"));
        assert_eq!(a.tag("status"), Some("200"));
        assert_eq!(a.to_string(), "requests{status=200}");
    }

    #[test]
    fn invalid_name() {
        assert_eq!(
            MeterId::new("", MeterType::Gauge).unwrap_err(),
            ParseError::Empty
        );
        let id = MeterId::new("g", MeterType::Gauge).unwrap();
        assert_eq!(id.to_string(), "g");
        assert_eq!(id.meter_type(), MeterType::Gauge);
        assert_eq!(
            id.with_type(MeterType::Counter).meter_type(),
            MeterType::Counter
        );
    }
}
