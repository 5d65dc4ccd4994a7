use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A single configuration value.
///
/// Untagged so rule configuration loads straight from toml or json.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfValue {
    Flag(bool),

    Number(i64),

    /// A raw regular expression fragment, inserted as is.
    Text(String),

    /// Literal alternatives, escaped then joined with `|`.
    List(Vec<String>),
}

impl From<bool> for ConfValue {
    fn from(value: bool) -> Self {
        ConfValue::Flag(value)
    }
}

impl From<i64> for ConfValue {
    fn from(value: i64) -> Self {
        ConfValue::Number(value)
    }
}

impl From<&str> for ConfValue {
    fn from(value: &str) -> Self {
        ConfValue::Text(value.to_owned())
    }
}

impl From<String> for ConfValue {
    fn from(value: String) -> Self {
        ConfValue::Text(value)
    }
}

impl From<&[&str]> for ConfValue {
    fn from(value: &[&str]) -> Self {
        ConfValue::List(value.iter().map(|x| x.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ConfValue {
    fn from(value: [&str; N]) -> Self {
        ConfValue::List(value.iter().map(|x| x.to_string()).collect())
    }
}

/// Caller supplied configuration of one rule, key to value.
pub type RuleConf = BTreeMap<String, ConfValue>;

/// Defaults of a rule merged with the overrides of its caller.
///
/// Only keys present in the defaults exist after merging.
#[derive(Debug)]
pub(crate) struct MergedConf {
    rule: &'static str,
    values: Vec<(&'static str, ConfValue)>,
}

impl MergedConf {
    pub(crate) fn merge(
        rule: &'static str,
        defaults: Vec<(&'static str, ConfValue)>,
        overrides: &RuleConf,
    ) -> Self {
        for key in overrides.keys() {
            if !defaults.iter().any(|(k, _)| k == key) {
                debug!("rule {rule}: ignore unknown config key {key:?}");
            }
        }

        let values = defaults
            .into_iter()
            .map(|(key, value)| match overrides.get(key) {
                Some(v) => (key, v.clone()),
                None => (key, value),
            })
            .collect();

        Self { rule, values }
    }

    fn get(&self, key: &'static str) -> Option<&ConfValue> {
        self.values.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    fn invalid_type(&self, key: &'static str, expected: &'static str) -> ConfigError {
        ConfigError::InvalidType {
            rule: self.rule,
            key,
            expected,
        }
    }

    /// Regular expression fragment under `key`.
    ///
    /// A list becomes an alternation of its escaped items. `None` when the value is empty,
    /// callers decide what an empty fragment means for their pattern.
    pub(crate) fn fragment(&self, key: &'static str) -> Result<Option<String>, ConfigError> {
        let fragment = match self.get(key) {
            Some(ConfValue::Text(v)) => v.clone(),
            Some(ConfValue::List(v)) => v
                .iter()
                .filter(|x| !x.is_empty())
                .map(|x| regex::escape(x))
                .collect::<Vec<_>>()
                .join("|"),
            None => String::new(),
            Some(_) => return Err(self.invalid_type(key, "a string or a list of strings")),
        };

        if fragment.is_empty() {
            Ok(None)
        } else {
            Ok(Some(fragment))
        }
    }

    /// Literal values under `key`.
    ///
    /// A string is split on `|`.
    pub(crate) fn list(&self, key: &'static str) -> Result<Vec<String>, ConfigError> {
        match self.get(key) {
            Some(ConfValue::List(v)) => Ok(v.iter().filter(|x| !x.is_empty()).cloned().collect()),
            Some(ConfValue::Text(v)) => Ok(v
                .split('|')
                .filter(|x| !x.is_empty())
                .map(|x| x.to_owned())
                .collect()),
            None => Ok(vec![]),
            Some(_) => Err(self.invalid_type(key, "a string or a list of strings")),
        }
    }

    pub(crate) fn flag(&self, key: &'static str) -> Result<bool, ConfigError> {
        match self.get(key) {
            Some(ConfValue::Flag(v)) => Ok(*v),
            None => Ok(false),
            Some(_) => Err(self.invalid_type(key, "a boolean")),
        }
    }

    pub(crate) fn number(&self, key: &'static str) -> Result<usize, ConfigError> {
        match self.get(key) {
            Some(ConfValue::Number(v)) => {
                usize::try_from(*v).map_err(|_| ConfigError::InvalidValue {
                    rule: self.rule,
                    key,
                    reason: format!("must not be negative, got {v}"),
                })
            }
            None => Ok(0),
            Some(_) => Err(self.invalid_type(key, "an integer")),
        }
    }
}
