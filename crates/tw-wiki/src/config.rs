use crate::error::WikiError;
use crate::wiki::Wiki;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tw_bbcode_parser::{RuleConf, RuleName};

/// Serializable setup of a [Wiki].
///
/// ```toml
/// delimiter = "ÿ"
/// token_limit = 10000
/// disabled = ["subscript"]
///
/// [rules.url]
/// inline_enable = false
/// schemes = ["http", "https"]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Character surrounding token ids in the parsed source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,

    /// Most tokens a single document may allocate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_limit: Option<usize>,

    /// Rules kept in the rule set but not applied.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disabled: Vec<String>,

    /// Configuration overrides, keyed by rule name.
    pub rules: BTreeMap<String, RuleConf>,
}

impl Wiki {
    /// Build a wiki with the default rule set adjusted by `config`.
    ///
    /// # Errors
    ///
    /// When `config` names a rule that does not exist.
    pub fn from_config(config: &WikiConfig) -> Result<Self, WikiError> {
        let mut wiki = Wiki::new().with_token_limit(config.token_limit);
        if let Some(delimiter) = config.delimiter {
            wiki = wiki.with_delimiter(delimiter);
        }
        for name in config.disabled.iter() {
            wiki.disable_rule(name.parse::<RuleName>()?);
        }
        for (name, conf) in config.rules.iter() {
            wiki.set_rule_conf_map(name.parse::<RuleName>()?, conf.clone());
        }
        Ok(wiki)
    }

    /// Current setup, with the full configuration of every rule in the set.
    pub fn config(&self) -> WikiConfig {
        let rules = self.rules();
        WikiConfig {
            delimiter: Some(self.delimiter()),
            token_limit: self.token_limit(),
            disabled: rules
                .iter()
                .filter(|x| !self.is_enabled(**x))
                .map(|x| x.to_string())
                .collect(),
            rules: rules
                .into_iter()
                .map(|x| (x.to_string(), self.rule_conf(x)))
                .collect(),
        }
    }
}
