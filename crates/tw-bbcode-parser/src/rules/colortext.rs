use crate::conf::{ConfValue, MergedConf, RuleConf};
use crate::error::ConfigError;
use crate::nesting::{substitute, NestedTag};
use crate::rules::Rule;
use regex::Regex;
use std::sync::OnceLock;
use tw_types::{SinkError, TokenOptions, TokenSink};

pub(crate) const NAME: &str = "colortext";

/// Option key holding the color.
pub const COLOR: &str = "color";

/// Regex to match a valid color attribute: hex value or a color keyword, optionally quoted.
static COLOR_RE: OnceLock<Regex> = OnceLock::new();

pub(crate) fn defaults() -> Vec<(&'static str, ConfValue)> {
    vec![("max_depth", ConfValue::Number(50))]
}

/// Tag `[color=$COLOR]...[/color]`. Text color.
///
/// `$COLOR` is either a keyword (`red`, `DarkOrange`) or a hex value with 3 or 6 digits, the
/// leading `#` is optional. Tokens carry the color as written, without `#`, renderers add it
/// back to hex values.
///
/// Color tags nest, same as [Blockquote](crate::Blockquote).
#[derive(Debug)]
pub struct Colortext {
    max_depth: usize,
}

impl Colortext {
    pub fn new(conf: &RuleConf) -> Result<Self, ConfigError> {
        let conf = MergedConf::merge(NAME, defaults(), conf);
        Ok(Self {
            max_depth: conf.number("max_depth")?,
        })
    }
}

impl NestedTag for Colortext {
    /// Normalized color.
    type Attr = String;

    fn rule(&self) -> &'static str {
        NAME
    }

    fn tag(&self) -> &'static str {
        "color"
    }

    fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn parse_attr(&self, attr: Option<&str>) -> Option<Self::Attr> {
        let captures = COLOR_RE
            .get_or_init(|| {
                Regex::new(
                    r#"(?i)^\s*(?:"|&quot;)?(#?[0-9a-f]{3}(?:[0-9a-f]{3})?|[a-z]+)(?:"|&quot;)?\s*$"#,
                )
                .unwrap()
            })
            .captures(attr?)?;
        let color = captures.get(1)?.as_str();
        Some(color.trim_start_matches('#').to_owned())
    }

    fn decorate(&self, attr: &Self::Attr, options: TokenOptions) -> TokenOptions {
        options.with(COLOR, attr.as_str())
    }
}

impl Rule for Colortext {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(&self, source: &str, sink: &mut dyn TokenSink) -> Result<String, SinkError> {
        substitute(self, source, 0, sink)
    }
}
