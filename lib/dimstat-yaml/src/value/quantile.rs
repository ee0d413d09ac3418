/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeSet;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use dimstat_quantile::Quantile;

pub fn as_quantile(value: &Yaml) -> anyhow::Result<Quantile> {
    match value {
        Yaml::String(s) => {
            Quantile::from_str(s).map_err(|e| anyhow!("invalid quantile value: {e}"))
        }
        Yaml::Real(s) => Quantile::from_str(s).map_err(|e| anyhow!("invalid quantile value: {e}")),
        _ => Err(anyhow!(
            "yaml value type for 'quantile' should be 'str' or 'float'"
        )),
    }
}

pub fn as_quantile_list(value: &Yaml) -> anyhow::Result<BTreeSet<Quantile>> {
    let mut set = BTreeSet::new();
    match value {
        Yaml::String(s) => {
            for v in s.split(',') {
                let q = Quantile::from_str(v.trim())
                    .map_err(|e| anyhow!("invalid quantile string {v}: {e}"))?;
                set.insert(q);
            }
        }
        Yaml::Real(_) => {
            set.insert(as_quantile(value)?);
        }
        Yaml::Array(seq) => {
            for (i, v) in seq.iter().enumerate() {
                let q =
                    as_quantile(v).context(format!("invalid quantile value for element #{i}"))?;
                set.insert(q);
            }
        }
        _ => {
            return Err(anyhow!(
                "the yaml value type for 'quantile list' should be 'seq', 'str' or 'float'"
            ));
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaml_rust::YamlLoader;

    #[test]
    fn quantile() {
        let q = as_quantile(&yaml_str!("0.99")).unwrap();
        assert_eq!(q.value(), 0.99);
        assert_eq!(q.as_str(), "0.99");
        let q = as_quantile(&Yaml::Real("0.5".to_string())).unwrap();
        assert_eq!(q, Quantile::PCT50);

        assert!(as_quantile(&yaml_str!("1.0")).is_err());
        assert!(as_quantile(&yaml_str!("p99")).is_err());
        assert!(as_quantile(&Yaml::Integer(0)).is_err());
    }

    #[test]
    fn quantile_list() {
        let v = yaml_doc!("[0.99, 0.5, '0.9']");
        let set = as_quantile_list(&v).unwrap();
        let values: Vec<f64> = set.iter().map(|q| q.value()).collect();
        assert_eq!(values, vec![0.5, 0.9, 0.99]);

        let set = as_quantile_list(&yaml_str!("0.5, 0.75,0.5")).unwrap();
        assert_eq!(set.len(), 2);

        let set = as_quantile_list(&Yaml::Real("0.95".to_string())).unwrap();
        assert!(set.contains(&Quantile::PCT95));

        let v = yaml_doc!("[0.5, 2]");
        assert!(as_quantile_list(&v).is_err());
        assert!(as_quantile_list(&Yaml::Boolean(true)).is_err());
    }
}
