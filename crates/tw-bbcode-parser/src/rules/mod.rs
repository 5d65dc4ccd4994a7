use crate::conf::{ConfValue, RuleConf};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tw_types::{SinkError, TokenSink};

mod blockquote;
mod bold;
mod colortext;
mod image;
mod paired;
mod subscript;
mod url;

pub use blockquote::{Blockquote, AUTHOR};
pub use bold::Bold;
pub use colortext::{Colortext, COLOR};
pub use image::{Image, ATTR, SRC};
pub use subscript::Subscript;
pub use url::{Url, HREF, TEXT};

/// A rule replacing one kind of construct with tokens.
pub trait Rule {
    /// Rule name, the namespace of every token this rule allocates.
    fn name(&self) -> &'static str;

    /// Replace every construct of this rule in `source`.
    ///
    /// Anything not recognized, or refused, stays in the output as it is.
    ///
    /// # Errors
    ///
    /// Only when the sink fails to allocate a token.
    fn apply(&self, source: &str, sink: &mut dyn TokenSink) -> Result<String, SinkError>;
}

/// All rules in this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleName {
    Blockquote,
    Colortext,
    Bold,
    Subscript,
    Image,
    Url,
}

impl RuleName {
    pub const ALL: [RuleName; 6] = [
        RuleName::Blockquote,
        RuleName::Colortext,
        RuleName::Bold,
        RuleName::Subscript,
        RuleName::Image,
        RuleName::Url,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleName::Blockquote => blockquote::NAME,
            RuleName::Colortext => colortext::NAME,
            RuleName::Bold => bold::NAME,
            RuleName::Subscript => subscript::NAME,
            RuleName::Image => image::NAME,
            RuleName::Url => url::NAME,
        }
    }

    fn defaults(&self) -> Vec<(&'static str, ConfValue)> {
        match self {
            RuleName::Blockquote => blockquote::defaults(),
            RuleName::Colortext => colortext::defaults(),
            RuleName::Bold | RuleName::Subscript => vec![],
            RuleName::Image => image::defaults(),
            RuleName::Url => url::defaults(),
        }
    }

    /// Default configuration of the rule.
    pub fn default_conf(&self) -> RuleConf {
        self.defaults()
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value))
            .collect()
    }

    /// Construct the rule with `conf` merged over its defaults.
    ///
    /// `delimiter` is the character surrounding token ids in the document, patterns never match
    /// across it.
    ///
    /// # Errors
    ///
    /// When a configuration value has a wrong type or produces an invalid pattern.
    pub fn build(&self, conf: &RuleConf, delimiter: char) -> Result<Box<dyn Rule>, ConfigError> {
        let rule: Box<dyn Rule> = match self {
            RuleName::Blockquote => Box::new(Blockquote::new(conf)?),
            RuleName::Colortext => Box::new(Colortext::new(conf)?),
            RuleName::Bold => Box::new(Bold::new(conf, delimiter)?),
            RuleName::Subscript => Box::new(Subscript::new(conf, delimiter)?),
            RuleName::Image => Box::new(Image::new(conf, delimiter)?),
            RuleName::Url => Box::new(Url::new(conf, delimiter)?),
        };
        Ok(rule)
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleName::ALL
            .into_iter()
            .find(|x| x.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownRule(s.to_owned()))
    }
}
