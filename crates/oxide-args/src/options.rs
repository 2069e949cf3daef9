//! Parser configuration.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::value::Value;

/// Configuration for [`parse`](crate::parse).
///
/// Every field is optional when deserialized, so a host can keep the
/// configuration in a config file:
///
/// ```
/// use oxide_args::ParseOptions;
///
/// let options: ParseOptions = serde_json::from_str(
///     r#"{"boolean": ["verbose"], "alias": {"v": ["verbose"]}}"#,
/// ).unwrap();
/// assert!(options.boolean.contains("verbose"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Flags that never consume the following token.
    pub boolean: BTreeSet<String>,
    /// Flags whose values are never converted to numbers.
    pub string: BTreeSet<String>,
    /// Alternative names; setting any name of a group sets all of them.
    pub alias: BTreeMap<String, Vec<String>>,
    /// Values for flags that were not given.
    pub default: BTreeMap<String, Value>,
    /// Stop parsing flags at the first positional token.
    pub stop_early: bool,
}

impl ParseOptions {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a boolean flag.
    #[must_use]
    pub fn boolean(mut self, name: impl Into<String>) -> Self {
        self.boolean.insert(name.into());
        self
    }

    /// Declares a string flag.
    #[must_use]
    pub fn string(mut self, name: impl Into<String>) -> Self {
        self.string.insert(name.into());
        self
    }

    /// Adds an alias for a flag.
    #[must_use]
    pub fn alias(mut self, name: impl Into<String>, alias: impl Into<String>) -> Self {
        self.alias.entry(name.into()).or_default().push(alias.into());
        self
    }

    /// Sets a default value.
    #[must_use]
    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default.insert(name.into(), value.into());
        self
    }

    /// Enables or disables stopping at the first positional token.
    #[must_use]
    pub const fn stop_early(mut self, enabled: bool) -> Self {
        self.stop_early = enabled;
        self
    }

    /// Returns the alias groups, keyed by every member of each group.
    ///
    /// Groups are merged transitively: `a -> b` and `b -> c` put `a`, `b`
    /// and `c` in one group.
    pub(crate) fn alias_groups(&self) -> BTreeMap<String, Vec<String>> {
        let mut groups: Vec<BTreeSet<String>> = Vec::new();

        for (name, aliases) in &self.alias {
            let mut group: BTreeSet<String> = aliases.iter().cloned().collect();
            group.insert(name.clone());

            let (overlapping, rest): (Vec<_>, Vec<_>) = groups
                .into_iter()
                .partition(|g| !g.is_disjoint(&group));
            groups = rest;
            for g in overlapping {
                group.extend(g);
            }
            groups.push(group);
        }

        let mut by_name = BTreeMap::new();
        for group in &groups {
            for name in group {
                let others = group.iter().filter(|n| *n != name).cloned().collect();
                by_name.insert(name.clone(), others);
            }
        }
        by_name
    }
}
