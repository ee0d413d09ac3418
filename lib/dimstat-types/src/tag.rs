/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;
use std::fmt::{self, Write};

use smol_str::SmolStr;

use super::{ParseError, check_meter_str};

/// The dimensions of a meter, ordered by key.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeterTags {
    inner: BTreeMap<SmolStr, SmolStr>,
}

impl MeterTags {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Insert a tag, the key must be a non-empty printable string.
    pub fn insert(&mut self, key: &str, value: &str) -> Result<Option<SmolStr>, ParseError> {
        check_meter_str(key)?;
        if let Some(c) = value.chars().find(|c| c.is_control()) {
            return Err(ParseError::InvalidControl(c));
        }
        Ok(self.inner.insert(key.into(), value.into()))
    }

    #[inline]
    pub fn extend(&mut self, other: &Self) {
        self.inner
            .extend(other.inner.iter().map(|(k, v)| (k.clone(), v.clone())))
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(|v| v.as_str())
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for MeterTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.inner.iter();
        let Some((name, value)) = iter.next() else {
            return Ok(());
        };
        f.write_str(name)?;
        f.write_char('=')?;
        f.write_str(value)?;

        for (name, value) in iter {
            f.write_char(',')?;
            f.write_str(name)?;
            f.write_char('=')?;
            f.write_str(value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_display() {
        let mut tags = MeterTags::default();
        assert!(tags.is_empty());
        tags.insert("uri", "/index").unwrap();
        tags.insert("method", "GET").unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("method"), Some("GET"));
        assert_eq!(tags.to_string(), "method=GET,uri=/index");

        let old = tags.insert("method", "POST").unwrap();
        assert_eq!(old.as_deref(), Some("GET"));

        assert_eq!(tags.insert("", "x"), Err(ParseError::Empty));
        assert!(tags.insert("k", "a\tb").is_err());
        tags.insert("empty", "").unwrap();
        assert_eq!(tags.get("empty"), Some(""));
    }

    #[test]
    fn extend() {
        let mut a = MeterTags::default();
        a.insert("a", "1").unwrap();
        let mut b = MeterTags::default();
        b.insert("a", "2").unwrap();
        b.insert("b", "3").unwrap();
        a.extend(&b);
        assert_eq!(a.to_string(), "a=2,b=3");
    }
}
