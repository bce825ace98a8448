//! Target group definitions.
//!
//! `targets` is a mapping in the config document, but declaration order
//! decides which prefix wins at request time, so it is deserialized into an
//! ordered list instead of a hash map.

use std::borrow::Cow;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A Lambda function reachable behind a route prefix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TargetDefinition {
    /// Function name or ARN passed to the Lambda client.
    pub function_identifier: String,

    /// Version or alias qualifier; omitted from the invocation when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_or_alias: Option<String>,

    /// Explicit route prefix. Defaults to `/<route key>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_prefix: Option<String>,
}

impl TargetDefinition {
    /// Create a target with no qualifier and a derived prefix.
    pub fn new(function_identifier: impl Into<String>) -> Self {
        Self {
            function_identifier: function_identifier.into(),
            version_or_alias: None,
            route_prefix: None,
        }
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.version_or_alias = Some(qualifier.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.route_prefix = Some(prefix.into());
        self
    }

    /// The prefix this target is served under.
    pub fn effective_prefix(&self, route_key: &str) -> Cow<'_, str> {
        match &self.route_prefix {
            Some(prefix) => Cow::Borrowed(prefix.as_str()),
            None => Cow::Owned(format!("/{}", route_key)),
        }
    }
}

/// Route key → target, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetMap {
    entries: Vec<(String, TargetDefinition)>,
}

impl TargetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a target. An existing key keeps its position and gets the new
    /// definition; the previous one is returned.
    pub fn insert(
        &mut self,
        route_key: impl Into<String>,
        target: TargetDefinition,
    ) -> Option<TargetDefinition> {
        let route_key = route_key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == route_key) {
            Some((_, existing)) => Some(std::mem::replace(existing, target)),
            None => {
                self.entries.push((route_key, target));
                None
            }
        }
    }

    pub fn get(&self, route_key: &str) -> Option<&TargetDefinition> {
        self.entries
            .iter()
            .find(|(k, _)| k == route_key)
            .map(|(_, t)| t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TargetDefinition)> {
        self.entries.iter().map(|(k, t)| (k, t))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, TargetDefinition)> for TargetMap {
    fn from_iter<I: IntoIterator<Item = (K, TargetDefinition)>>(iter: I) -> Self {
        let mut map = TargetMap::new();
        for (key, target) in iter {
            map.insert(key, target);
        }
        map
    }
}

impl Serialize for TargetMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for TargetMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedTargets;

        impl<'de> Visitor<'de> for OrderedTargets {
            type Value = TargetMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a table of route keys to target definitions")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = TargetMap {
                    entries: Vec::with_capacity(access.size_hint().unwrap_or(0)),
                };
                while let Some((key, target)) = access.next_entry::<String, TargetDefinition>()? {
                    if map.get(&key).is_some() {
                        return Err(de::Error::custom(format!("duplicate target `{}`", key)));
                    }
                    map.entries.push((key, target));
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedTargets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Doc {
        targets: TargetMap,
    }

    #[test]
    fn preserves_declaration_order() {
        let doc: Doc = toml::from_str(
            r#"
[targets.zeta]
function_identifier = "z"

[targets.alpha]
function_identifier = "a"

[targets.mid]
function_identifier = "m"
"#,
        )
        .unwrap();

        let keys: Vec<&str> = doc.targets.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn rejects_duplicate_keys_from_json() {
        let err = serde_json::from_str::<TargetMap>(
            r#"{"a": {"function_identifier": "x"}, "a": {"function_identifier": "y"}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate target `a`"));
    }

    #[test]
    fn effective_prefix_defaults_to_route_key() {
        let target = TargetDefinition::new("fn");
        assert_eq!(target.effective_prefix("users"), "/users");

        let target = target.with_prefix("/api/v2/users");
        assert_eq!(target.effective_prefix("users"), "/api/v2/users");
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut map: TargetMap = [
            ("a", TargetDefinition::new("fa")),
            ("b", TargetDefinition::new("fb")),
        ]
        .into_iter()
        .collect();

        let previous = map.insert("a", TargetDefinition::new("fa2"));
        assert_eq!(previous.unwrap().function_identifier, "fa");
        assert_eq!(map.len(), 2);

        let first = map.iter().next().unwrap();
        assert_eq!(first.0, "a");
        assert_eq!(first.1.function_identifier, "fa2");
    }
}
