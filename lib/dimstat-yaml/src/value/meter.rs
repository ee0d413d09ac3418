/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use dimstat_meter::SimpleConfig;
use dimstat_types::{MeterId, MeterTags, MeterType};

use super::{as_histogram_type, as_string, as_time_unit};

pub fn as_meter_tags(v: &Yaml) -> anyhow::Result<MeterTags> {
    if let Yaml::Hash(map) = v {
        let mut tags = MeterTags::default();
        crate::foreach_kv(map, |k, v| {
            let value = as_string(v).context("invalid meter tag yaml value")?;
            if tags
                .insert(k, &value)
                .map_err(|e| anyhow!("invalid meter tag: {e}"))?
                .is_some()
            {
                Err(anyhow!("found duplicate value for tag name {k}"))
            } else {
                Ok(())
            }
        })?;
        Ok(tags)
    } else {
        Err(anyhow!("the yaml value type for 'meter tags' should be 'map'"))
    }
}

/// Parse the id of a meter of type `meter_type`, either a plain name or a
/// map with `name`, `tags`, `description` and `base_unit`.
pub fn as_meter_id(v: &Yaml, meter_type: MeterType) -> anyhow::Result<MeterId> {
    match v {
        Yaml::String(s) => {
            MeterId::new(s, meter_type).map_err(|e| anyhow!("invalid meter name: {e}"))
        }
        Yaml::Hash(map) => {
            let name = crate::hash_get_required_str(map, "name")?;
            let mut id =
                MeterId::new(name, meter_type).map_err(|e| anyhow!("invalid meter name: {e}"))?;
            crate::foreach_kv(map, |k, v| match crate::key::normalize(k).as_str() {
                "name" => Ok(()),
                "tags" => {
                    let tags = as_meter_tags(v).context(format!("invalid tags value for key {k}"))?;
                    id = id.clone().with_tags(&tags);
                    Ok(())
                }
                "description" => {
                    let s = as_string(v).context(format!("invalid string value for key {k}"))?;
                    id = id.clone().with_description(&s);
                    Ok(())
                }
                "base_unit" => {
                    let s = as_string(v).context(format!("invalid string value for key {k}"))?;
                    id = id.clone().with_base_unit(&s);
                    Ok(())
                }
                _ => Err(anyhow!("invalid key {k}")),
            })?;
            Ok(id)
        }
        _ => Err(anyhow!(
            "yaml value type for 'meter id' should be 'string' or 'map'"
        )),
    }
}

pub fn as_simple_config(v: &Yaml) -> anyhow::Result<SimpleConfig> {
    if let Yaml::Hash(map) = v {
        let mut config = SimpleConfig::default();
        crate::foreach_kv(map, |k, v| match crate::key::normalize(k).as_str() {
            "base_time_unit" | "time_unit" => {
                let unit = as_time_unit(v).context(format!("invalid time unit for key {k}"))?;
                config = config.with_base_time_unit(unit);
                Ok(())
            }
            "histogram_type" => {
                let histogram_type =
                    as_histogram_type(v).context(format!("invalid histogram type for key {k}"))?;
                config = config.with_histogram_type(histogram_type);
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;
        Ok(config)
    } else {
        Err(anyhow!(
            "the yaml value type for 'simple registry config' should be 'map'"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimstat_histogram::HistogramType;
    use dimstat_types::TimeUnit;
    use yaml_rust::YamlLoader;

    #[test]
    fn meter_id() {
        let id = as_meter_id(&yaml_str!("http.requests"), MeterType::Counter).unwrap();
        assert_eq!(id.name(), "http.requests");
        assert!(id.tags().is_empty());

        let v = yaml_doc!(
            r#"
            name: http.latency
            tags:
              method: GET
              status: 200
            description: request latency
            base-unit: seconds
            "#
        );
        let id = as_meter_id(&v, MeterType::Timer).unwrap();
        assert_eq!(id.to_string(), "http.latency{method=GET,status=200}");
        assert_eq!(id.description(), Some("request latency"));
        assert_eq!(id.base_unit(), Some("seconds"));
        assert_eq!(id.meter_type(), MeterType::Timer);
    }

    #[test]
    fn meter_id_invalid() {
        assert!(as_meter_id(&yaml_str!(""), MeterType::Gauge).is_err());
        assert!(as_meter_id(&yaml_doc!("tags: {a: b}"), MeterType::Gauge).is_err());
        assert!(as_meter_id(&yaml_doc!("name: a\nunit: s"), MeterType::Gauge).is_err());
        assert!(as_meter_tags(&yaml_doc!("[a, b]")).is_err());
    }

    #[test]
    fn simple_config() {
        let v = yaml_doc!("base-time-unit: ms\nhistogram_type: normal");
        let config = as_simple_config(&v).unwrap();
        assert_eq!(config.base_time_unit(), TimeUnit::Milliseconds);
        assert_eq!(config.histogram_type(), HistogramType::Normal);

        let config = as_simple_config(&yaml_doc!("{}")).unwrap();
        assert_eq!(config, SimpleConfig::default());
        assert!(as_simple_config(&yaml_doc!("histogram_type: sparse")).is_err());
        assert!(as_simple_config(&yaml_str!("ms")).is_err());
    }
}
