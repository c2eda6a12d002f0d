// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

use crate::fraction::Fraction;
use serde::Serialize;

/// A single capability value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Scalar {
    /// String value (pixel format names, device paths)
    Str(String),
    /// Integer value (dimensions, indices)
    Int(i64),
    /// Fraction value (framerates)
    Fraction(Fraction),
    /// Anything that cannot be enumerated: ranges, booleans, flags.
    /// Holds the raw text.
    Unsupported(String),
}

impl Scalar {
    pub fn as_str(&self) -> Option<String> {
        match self {
            Scalar::Str(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Framerate candidates: native fractions, or strings that parse as one.
    pub fn as_fraction(&self) -> Option<String> {
        match self {
            Scalar::Fraction(f) => Some(f.to_string()),
            Scalar::Str(s) => Fraction::parse(s).ok().map(|f| f.to_string()),
            _ => None,
        }
    }
}

/// A capability field value: a scalar or a (possibly nested) container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CapValue {
    Scalar(Scalar),
    /// Unordered alternatives, `{ a, b }`
    List(Vec<CapValue>),
    /// Ordered collection, `< a, b >`
    Array(Vec<CapValue>),
}

impl CapValue {
    /// Flatten this value into scalar candidates.
    ///
    /// Containers are walked depth-first and their results concatenated in
    /// encounter order. Scalars for which `extract` returns `None` are
    /// dropped, so a field of the wrong kind simply yields nothing.
    pub fn flatten<T, F>(&self, extract: F) -> Vec<T>
    where
        F: Fn(&Scalar) -> Option<T>,
    {
        let mut out = Vec::new();
        self.flatten_into(&extract, &mut out);
        out
    }

    fn flatten_into<T, F>(&self, extract: &F, out: &mut Vec<T>)
    where
        F: Fn(&Scalar) -> Option<T>,
    {
        match self {
            CapValue::Scalar(scalar) => out.extend(extract(scalar)),
            CapValue::List(items) | CapValue::Array(items) => {
                for item in items {
                    item.flatten_into(extract, out);
                }
            }
        }
    }
}

impl From<Scalar> for CapValue {
    fn from(scalar: Scalar) -> Self {
        CapValue::Scalar(scalar)
    }
}

impl From<&str> for CapValue {
    fn from(s: &str) -> Self {
        CapValue::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<i64> for CapValue {
    fn from(i: i64) -> Self {
        CapValue::Scalar(Scalar::Int(i))
    }
}

impl From<Fraction> for CapValue {
    fn from(f: Fraction) -> Self {
        CapValue::Scalar(Scalar::Fraction(f))
    }
}

/// A named capability structure such as `video/x-raw`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Structure {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<String>,
    fields: Vec<(String, CapValue)>,
}

impl Structure {
    pub fn new(name: &str) -> Self {
        Structure {
            name: name.to_string(),
            features: None,
            fields: Vec::new(),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_field(mut self, key: &str, value: impl Into<CapValue>) -> Self {
        self.insert(key, value.into());
        self
    }

    pub fn with_features(mut self, features: &str) -> Self {
        self.features = Some(features.to_string());
        self
    }

    /// Set a field, replacing any earlier value under the same key.
    pub fn insert(&mut self, key: &str, value: CapValue) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }

    /// Media type name, without any memory features.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Memory features, e.g. `memory:NVMM`.
    pub fn features(&self) -> Option<&str> {
        self.features.as_deref()
    }

    /// Exact, case-sensitive field lookup.
    pub fn get(&self, key: &str) -> Option<&CapValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &CapValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// An ordered capability set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CapsSet {
    structures: Vec<Structure>,
}

impl CapsSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, structure: Structure) {
        self.structures.push(structure);
    }

    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }
}

impl From<Vec<Structure>> for CapsSet {
    fn from(structures: Vec<Structure>) -> Self {
        CapsSet { structures }
    }
}

impl FromIterator<Structure> for CapsSet {
    fn from_iter<I: IntoIterator<Item = Structure>>(iter: I) -> Self {
        CapsSet {
            structures: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_nested_in_encounter_order() {
        let value = CapValue::List(vec![
            CapValue::from(640_i64),
            CapValue::Array(vec![CapValue::from(800_i64), CapValue::from(1024_i64)]),
            CapValue::List(vec![CapValue::List(vec![CapValue::from(1280_i64)])]),
        ]);
        assert_eq!(value.flatten(Scalar::as_int), vec![640, 800, 1024, 1280]);
    }

    #[test]
    fn test_flatten_drops_wrong_kind() {
        let value = CapValue::List(vec![
            CapValue::from("NV12"),
            CapValue::from(42_i64),
            CapValue::Scalar(Scalar::Unsupported("[ 1, 2 ]".into())),
        ]);
        assert_eq!(value.flatten(Scalar::as_str), vec!["NV12".to_string()]);
        assert_eq!(value.flatten(Scalar::as_int), vec![42]);
        assert!(value.flatten(Scalar::as_fraction).is_empty());
    }

    #[test]
    fn test_fraction_from_string_scalar() {
        assert_eq!(
            Scalar::Str("30/1".into()).as_fraction(),
            Some("30/1".to_string())
        );
        assert_eq!(Scalar::Str("thirty".into()).as_fraction(), None);
        assert_eq!(
            Scalar::Fraction(Fraction::new(15, 1).unwrap()).as_fraction(),
            Some("15/1".to_string())
        );
    }

    #[test]
    fn test_structure_insert_replaces() {
        let mut st = Structure::new("video/x-raw").with_field("width", 640_i64);
        st.insert("width", CapValue::from(1280_i64));
        assert_eq!(st.len(), 1);
        assert_eq!(st.get("width"), Some(&CapValue::from(1280_i64)));
        assert_eq!(st.get("Width"), None);
    }
}
