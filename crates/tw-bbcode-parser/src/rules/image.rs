use crate::conf::{ConfValue, MergedConf, RuleConf};
use crate::error::ConfigError;
use crate::pattern::{replace_all, PatternTemplate, NEVER_MATCH};
use crate::rules::Rule;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::trace;
use tw_types::{SinkError, TokenOptions, TokenSink};

pub(crate) const NAME: &str = "image";

/// Option key holding the image url, as written.
pub const SRC: &str = "src";

/// Option key reserved for rendering attributes, always empty here.
pub const ATTR: &str = "attr";

pub(crate) fn defaults() -> Vec<(&'static str, ConfValue)> {
    vec![
        ("schemes", ["http", "https", "ftp"].into()),
        ("extensions", ["jpg", "jpeg", "gif", "png", "bmp", "webp"].into()),
        ("path_regexp", r#"[^\s"'<>\[\]{delim}]+?"#.into()),
        ("local_enable", true.into()),
        ("local_regexp", r#"[^\s"'<>\[\]:{delim}]+?"#.into()),
    ]
}

/// Tag `[img]$URL[/img]`. Image.
///
/// The whole construct is replaced by one token. `$URL` must be either `scheme://path` with
/// one of the configured schemes, or a local path when enabled, and end with one of the
/// configured extensions. An empty extension list accepts any url.
#[derive(Debug)]
pub struct Image {
    regex: Regex,
}

impl Image {
    pub fn new(conf: &RuleConf, delimiter: char) -> Result<Self, ConfigError> {
        let conf = MergedConf::merge(NAME, defaults(), conf);

        let mut sources = vec![];
        if let Some(schemes) = conf.fragment("schemes")? {
            let path = conf.fragment("path_regexp")?.unwrap_or_else(|| NEVER_MATCH.to_owned());
            sources.push(format!("(?:{schemes})://(?:{path})"));
        }
        if conf.flag("local_enable")? {
            if let Some(local) = conf.fragment("local_regexp")? {
                sources.push(format!("(?:{local})"));
            }
        }
        let source = if sources.is_empty() {
            None
        } else {
            Some(sources.join("|"))
        };
        let extension = conf
            .fragment("extensions")?
            .map(|x| format!(r"\.(?:{x})"))
            .unwrap_or_default();

        let regex = PatternTemplate::new(r"\[img\](?P<src>(?:{source}){extension})\[/img\]", delimiter)
            .fragment_or_never("source", source)
            .fragment("extension", extension)
            .build(NAME)?;

        Ok(Self { regex })
    }
}

impl Rule for Image {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(&self, source: &str, sink: &mut dyn TokenSink) -> Result<String, SinkError> {
        replace_all(&self.regex, source, |captures| {
            let Some(src) = captures.name("src") else {
                return Ok(None);
            };
            trace!("rule {NAME}: src {:?}", src.as_str());
            let options = TokenOptions::new()
                .with(SRC, src.as_str())
                .with(ATTR, BTreeMap::new());
            sink.allocate(NAME, options).map(Some)
        })
    }
}
