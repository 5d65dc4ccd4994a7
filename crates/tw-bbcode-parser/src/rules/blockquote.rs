use crate::conf::{ConfValue, MergedConf, RuleConf};
use crate::error::ConfigError;
use crate::nesting::{substitute, NestedTag};
use crate::rules::Rule;
use regex::Regex;
use std::sync::OnceLock;
use tw_types::{SinkError, TokenOptions, TokenSink};

pub(crate) const NAME: &str = "blockquote";

/// Option key holding the quoted author.
pub const AUTHOR: &str = "name";

/// Regex to strip optional quotes around the author.
static AUTHOR_RE: OnceLock<Regex> = OnceLock::new();

pub(crate) fn defaults() -> Vec<(&'static str, ConfValue)> {
    vec![("max_depth", ConfValue::Number(50))]
}

/// Tag `[quote]...[/quote]` and `[quote="$AUTHOR"]...[/quote]`. Quote block.
///
/// Quotes nest. Each pair of tokens carries its `level`, 0 for the outermost, and the author
/// as `name` when one is given.
#[derive(Debug)]
pub struct Blockquote {
    max_depth: usize,
}

impl Blockquote {
    pub fn new(conf: &RuleConf) -> Result<Self, ConfigError> {
        let conf = MergedConf::merge(NAME, defaults(), conf);
        Ok(Self {
            max_depth: conf.number("max_depth")?,
        })
    }
}

impl NestedTag for Blockquote {
    /// Author, if any.
    type Attr = Option<String>;

    fn rule(&self) -> &'static str {
        NAME
    }

    fn tag(&self) -> &'static str {
        "quote"
    }

    fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn parse_attr(&self, attr: Option<&str>) -> Option<Self::Attr> {
        let Some(attr) = attr else {
            return Some(None);
        };

        let author = AUTHOR_RE
            .get_or_init(|| Regex::new(r#"(?i)^\s*(?:"|&quot;)?(.*?)(?:"|&quot;)?\s*$"#).unwrap())
            .captures(attr)
            .and_then(|x| x.get(1))
            .map(|x| x.as_str())
            .unwrap_or(attr);
        if author.is_empty() {
            Some(None)
        } else {
            Some(Some(author.to_owned()))
        }
    }

    fn decorate(&self, attr: &Self::Attr, options: TokenOptions) -> TokenOptions {
        match attr {
            Some(v) => options.with(AUTHOR, v.as_str()),
            None => options,
        }
    }
}

impl Rule for Blockquote {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(&self, source: &str, sink: &mut dyn TokenSink) -> Result<String, SinkError> {
        substitute(self, source, 0, sink)
    }
}
