/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use dimstat_meter::{DistributionStatisticConfig, QuantileAlgorithm};
use dimstat_quantile::{DEFAULT_WINDOW_SIZE, Quantile};

use super::{as_f64, as_histogram_config, as_quantile_list, as_string, as_u32};

const DEFAULT_EPSILON: f64 = 0.01;

fn check_quantile_algorithm(algorithm: QuantileAlgorithm) -> anyhow::Result<QuantileAlgorithm> {
    DistributionStatisticConfig::default()
        .with_quantile(Quantile::PCT50)
        .with_algorithm(algorithm)
        .build_quantiles()
        .map_err(|e| anyhow!("invalid {} quantile algorithm: {e}", algorithm.as_str()))?;
    Ok(algorithm)
}

fn quantile_algorithm(
    name: &str,
    epsilon: Option<f64>,
    window_size: Option<u32>,
) -> anyhow::Result<QuantileAlgorithm> {
    let algorithm = match crate::key::normalize(name).as_str() {
        "frugal2u" | "frugal_2u" | "frugal" => QuantileAlgorithm::Frugal2U,
        "gk" => QuantileAlgorithm::Gk {
            epsilon: epsilon.unwrap_or(DEFAULT_EPSILON),
        },
        "window_sketch" | "sketch" => QuantileAlgorithm::WindowSketch {
            epsilon: epsilon.unwrap_or(DEFAULT_EPSILON),
            window_size: window_size.unwrap_or(DEFAULT_WINDOW_SIZE),
        },
        _ => return Err(anyhow!("unsupported quantile algorithm {name}")),
    };
    check_quantile_algorithm(algorithm)
}

/// Parse a quantile estimation algorithm.
///
/// Either the algorithm name, or a map with the `type` key and its
/// optional `epsilon` and `window_size` parameters.
pub fn as_quantile_algorithm(value: &Yaml) -> anyhow::Result<QuantileAlgorithm> {
    match value {
        Yaml::String(s) => quantile_algorithm(s, None, None),
        Yaml::Hash(map) => {
            let mut name = None;
            let mut epsilon = None;
            let mut window_size = None;
            crate::foreach_kv(map, |k, v| match crate::key::normalize(k).as_str() {
                "type" | "algorithm" => {
                    name = Some(as_string(v).context(format!("invalid string value for key {k}"))?);
                    Ok(())
                }
                "epsilon" => {
                    epsilon = Some(as_f64(v).context(format!("invalid f64 value for key {k}"))?);
                    Ok(())
                }
                "window_size" | "window" => {
                    window_size =
                        Some(as_u32(v).context(format!("invalid u32 value for key {k}"))?);
                    Ok(())
                }
                _ => Err(anyhow!("invalid key {k}")),
            })?;
            let name = name.ok_or_else(|| anyhow!("no quantile algorithm type set"))?;
            quantile_algorithm(&name, epsilon, window_size)
        }
        _ => Err(anyhow!(
            "yaml value type for 'quantile algorithm' should be 'string' or 'map'"
        )),
    }
}

/// Parse the distribution statistics of a timer or a summary.
///
/// A bare quantile list is accepted as the simplified form.
pub fn as_distribution_config(value: &Yaml) -> anyhow::Result<DistributionStatisticConfig> {
    let mut config = DistributionStatisticConfig::default();
    if let Yaml::Hash(map) = value {
        crate::foreach_kv(map, |k, v| match crate::key::normalize(k).as_str() {
            "quantile" | "quantiles" => {
                let list = as_quantile_list(v)
                    .context(format!("invalid quantile list value for key {k}"))?;
                config.set_quantile_list(list);
                Ok(())
            }
            "quantile_algorithm" | "algorithm" => {
                let algorithm = as_quantile_algorithm(v)
                    .context(format!("invalid quantile algorithm value for key {k}"))?;
                config.set_quantile_algorithm(algorithm);
                Ok(())
            }
            "histogram" => {
                let histogram = as_histogram_config(v)
                    .context(format!("invalid histogram config value for key {k}"))?;
                config.set_histogram(histogram);
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;
    } else {
        let list = as_quantile_list(value).context(
            "the value for simplified form of distribution config should be a quantile list",
        )?;
        config.set_quantile_list(list);
    }
    Ok(config)
}
