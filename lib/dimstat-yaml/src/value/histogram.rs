/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use dimstat_histogram::{BucketShape, HistogramConfig, HistogramType};

use super::{as_f64, as_string, as_time_unit, as_u32};

pub fn as_histogram_type(v: &Yaml) -> anyhow::Result<HistogramType> {
    if let Yaml::String(s) = v {
        match crate::key::normalize(s).as_str() {
            "cumulative" => Ok(HistogramType::Cumulative),
            "normal" | "non_cumulative" => Ok(HistogramType::Normal),
            _ => Err(anyhow!("invalid histogram type {s}")),
        }
    } else {
        Err(anyhow!(
            "yaml value type for 'histogram type' should be 'string'"
        ))
    }
}

/// Parse a histogram config.
///
/// The simplified form is the string `percentiles`, the map form looks like:
///
/// ```yaml
/// shape: linear
/// start: 0
/// width: 10
/// count: 5
/// type: normal
/// time_unit: ms
/// ```
pub fn as_histogram_config(value: &Yaml) -> anyhow::Result<HistogramConfig> {
    let map = match value {
        Yaml::String(s) => {
            return match crate::key::normalize(s).as_str() {
                "percentiles" => Ok(HistogramConfig::percentiles()),
                _ => Err(anyhow!(
                    "only percentiles can be used as the simplified histogram config"
                )),
            };
        }
        Yaml::Hash(map) => map,
        _ => {
            return Err(anyhow!(
                "yaml value type for 'histogram config' should be 'map' or 'string'"
            ));
        }
    };

    let mut shape = None;
    let mut start = None;
    let mut width = None;
    let mut exp = None;
    let mut count = None;
    let mut histogram_type = None;
    let mut time_unit = None;
    crate::foreach_kv(map, |k, v| match crate::key::normalize(k).as_str() {
        "shape" => {
            let s = as_string(v).context(format!("invalid string value for key {k}"))?;
            shape = Some(crate::key::normalize(&s));
            Ok(())
        }
        "start" => {
            start = Some(as_f64(v).context(format!("invalid f64 value for key {k}"))?);
            Ok(())
        }
        "width" => {
            width = Some(as_f64(v).context(format!("invalid f64 value for key {k}"))?);
            Ok(())
        }
        "exp" | "exponent" => {
            exp = Some(as_f64(v).context(format!("invalid f64 value for key {k}"))?);
            Ok(())
        }
        "count" => {
            count = Some(as_u32(v).context(format!("invalid u32 value for key {k}"))?);
            Ok(())
        }
        "type" | "histogram_type" => {
            histogram_type =
                Some(as_histogram_type(v).context(format!("invalid histogram type for key {k}"))?);
            Ok(())
        }
        "time_unit" | "unit" => {
            time_unit = Some(as_time_unit(v).context(format!("invalid time unit for key {k}"))?);
            Ok(())
        }
        _ => Err(anyhow!("invalid key {k}")),
    })?;

    let shape = match shape.as_deref() {
        Some("linear") => {
            let width = width.ok_or_else(|| anyhow!("no width set for linear histogram"))?;
            let count = count.ok_or_else(|| anyhow!("no count set for linear histogram"))?;
            BucketShape::linear(start.unwrap_or(0.0), width, count)
                .context("invalid linear histogram")?
        }
        Some("exponential") => {
            let exp = exp.ok_or_else(|| anyhow!("no exp set for exponential histogram"))?;
            let count = count.ok_or_else(|| anyhow!("no count set for exponential histogram"))?;
            BucketShape::exponential(start.unwrap_or(1.0), exp, count)
                .context("invalid exponential histogram")?
        }
        Some("percentiles") => BucketShape::percentiles(),
        Some(s) => return Err(anyhow!("unsupported histogram shape {s}")),
        None => return Err(anyhow!("no histogram shape set")),
    };

    let mut config = HistogramConfig::new(shape);
    if let Some(histogram_type) = histogram_type {
        config.set_type(histogram_type);
    }
    if let Some(unit) = time_unit {
        config.set_time_unit(unit);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimstat_types::TimeUnit;
    use yaml_rust::YamlLoader;

    #[test]
    fn histogram_type() {
        assert_eq!(
            as_histogram_type(&yaml_str!("Cumulative")).unwrap(),
            HistogramType::Cumulative
        );
        assert_eq!(
            as_histogram_type(&yaml_str!("non-cumulative")).unwrap(),
            HistogramType::Normal
        );
        assert!(as_histogram_type(&yaml_str!("sparse")).is_err());
        assert!(as_histogram_type(&Yaml::Integer(1)).is_err());
    }

    #[test]
    fn linear() {
        let v = yaml_doc!(
            r#"
            shape: linear
            width: 10
            count: 5
            type: normal
            "#
        );
        let config = as_histogram_config(&v).unwrap();
        assert_eq!(config.shape(), &BucketShape::linear(0.0, 10.0, 5).unwrap());
        assert_eq!(config.histogram_type(), Some(HistogramType::Normal));
        assert_eq!(config.time_unit(), None);

        let mut h = config.create(TimeUnit::Seconds, HistogramType::Cumulative);
        for v in [3.0, 10.0, 47.0, 51.0] {
            h.observe(v);
        }
        let buckets: Vec<(f64, u64)> = h.buckets().iter().map(|b| (*b.tag(), b.count())).collect();
        assert_eq!(buckets, vec![(10.0, 2), (f64::INFINITY, 2)]);
    }

    #[test]
    fn exponential_time() {
        let v = yaml_doc!(
            r#"
            shape: Exponential
            exponent: 10
            count: 4
            time-unit: ms
            "#
        );
        let config = as_histogram_config(&v).unwrap();
        assert_eq!(
            config.shape(),
            &BucketShape::exponential(1.0, 10.0, 4).unwrap()
        );
        assert_eq!(config.time_unit(), Some(TimeUnit::Milliseconds));
        assert_eq!(config.histogram_type(), None);
    }

    #[test]
    fn percentiles() {
        let config = as_histogram_config(&yaml_str!("percentiles")).unwrap();
        assert!(config.is_percentiles());

        let v = yaml_doc!("shape: percentiles\nunit: ns");
        let config = as_histogram_config(&v).unwrap();
        assert!(config.is_percentiles());
        assert_eq!(config.time_unit(), Some(TimeUnit::Nanoseconds));
    }

    #[test]
    fn invalid() {
        assert!(as_histogram_config(&yaml_str!("linear")).is_err());
        assert!(as_histogram_config(&yaml_doc!("width: 10\ncount: 5")).is_err());
        assert!(as_histogram_config(&yaml_doc!("shape: linear\ncount: 5")).is_err());
        assert!(as_histogram_config(&yaml_doc!("shape: linear\nwidth: 0\ncount: 5")).is_err());
        assert!(as_histogram_config(&yaml_doc!("shape: exponential\nexp: 1\ncount: 5")).is_err());
        assert!(as_histogram_config(&yaml_doc!("shape: sparse")).is_err());
        assert!(as_histogram_config(&yaml_doc!("shape: percentiles\nbase: 2")).is_err());
        assert!(as_histogram_config(&Yaml::Integer(1)).is_err());
    }
}
