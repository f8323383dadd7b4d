//! Keyed rule lists that keep document order.
//!
//! `clusters` and `tiers` are written as YAML mappings, but resolution is
//! first-match-wins, so the order entries appear in the file is part of
//! their meaning. A plain map would lose it.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// An ordered list of `(key, rule)` pairs with unique keys.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedRules<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for OrderedRules<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> OrderedRules<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, or replace the rule in place if the key exists.
    pub fn insert(&mut self, key: impl Into<String>, rule: T) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = rule,
            None => self.entries.push((key, rule)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, rule)| rule)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, rule)| rule)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Entries in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, rule)| (k.as_str(), rule))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for OrderedRules<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut rules = Self::new();
        for (key, rule) in iter {
            rules.insert(key, rule);
        }
        rules
    }
}

impl<T: Serialize> Serialize for OrderedRules<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, rule) in &self.entries {
            map.serialize_entry(key, rule)?;
        }
        map.end()
    }
}

/// The mapping body; wrapped in `Option` by the public impl so that a
/// YAML `null` (a key with nothing under it) reads as empty.
struct Entries<T>(Vec<(String, T)>);

struct EntriesVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for EntriesVisitor<T>
where
    T: Deserialize<'de> + Default,
{
    type Value = Entries<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of names to rules")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: Vec<(String, T)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(key) = access.next_key::<String>()? {
            if entries.iter().any(|(k, _)| *k == key) {
                return Err(de::Error::custom(format!("duplicate entry `{key}`")));
            }
            let rule = access.next_value::<Option<T>>()?.unwrap_or_default();
            entries.push((key, rule));
        }
        Ok(Entries(entries))
    }
}

impl<'de, T> Deserialize<'de> for Entries<T>
where
    T: Deserialize<'de> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

impl<'de, T> Deserialize<'de> for OrderedRules<T>
where
    T: Deserialize<'de> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Option::<Entries<T>>::deserialize(deserializer)?
            .map(|e| e.0)
            .unwrap_or_default();
        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
    struct Rule {
        #[serde(default)]
        n: u32,
    }

    fn parse(yaml: &str) -> Result<OrderedRules<Rule>, serde_yaml_ng::Error> {
        serde_yaml_ng::from_str(yaml)
    }

    #[test]
    fn keeps_document_order() {
        let rules = parse("zeta: {n: 1}\nalpha: {n: 2}\nmid: {n: 3}\n").unwrap();
        let keys: Vec<&str> = rules.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn null_is_empty() {
        let rules = parse("~").unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn null_entry_is_default_rule() {
        let rules = parse("alpha:\nbeta: {n: 4}\n").unwrap();
        assert_eq!(rules.get("alpha"), Some(&Rule { n: 0 }));
        assert_eq!(rules.get("beta"), Some(&Rule { n: 4 }));
    }

    #[test]
    fn duplicate_keys_rejected() {
        let err = parse("a: {n: 1}\na: {n: 2}\n").unwrap_err();
        assert!(err.to_string().contains("duplicate"), "{err}");
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut rules: OrderedRules<Rule> = [("a", Rule { n: 1 }), ("b", Rule { n: 2 })]
            .into_iter()
            .collect();
        rules.insert("a", Rule { n: 9 });
        let items: Vec<(&str, u32)> = rules.iter().map(|(k, r)| (k, r.n)).collect();
        assert_eq!(items, vec![("a", 9), ("b", 2)]);
    }

    #[test]
    fn serializes_as_mapping_in_order() {
        let rules: OrderedRules<Rule> = [("z", Rule { n: 1 }), ("a", Rule { n: 2 })]
            .into_iter()
            .collect();
        let yaml = serde_yaml_ng::to_string(&rules).unwrap();
        let z = yaml.find("z:").unwrap();
        let a = yaml.find("a:").unwrap();
        assert!(z < a, "{yaml}");
    }
}
