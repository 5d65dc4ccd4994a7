use crate::error::ConfigError;
use crate::pattern::{replace_all, PatternTemplate};
use regex::Regex;
use tracing::trace;
use tw_types::{SinkError, TokenKind, TokenOptions, TokenSink};

/// Simple `[tag]...[/tag]` matcher without nesting.
///
/// Body is passed through untouched, the first close tag ends the span.
#[derive(Debug)]
pub(crate) struct Paired {
    rule: &'static str,
    regex: Regex,
}

impl Paired {
    pub(crate) fn new(rule: &'static str, tag: &str, delimiter: char) -> Result<Self, ConfigError> {
        let regex = PatternTemplate::new(r"(?s)\[{tag}\](?P<body>.*?)\[/{tag}\]", delimiter)
            .fragment("tag", regex::escape(tag))
            .build(rule)?;
        Ok(Self { rule, regex })
    }

    pub(crate) fn apply(&self, source: &str, sink: &mut dyn TokenSink) -> Result<String, SinkError> {
        replace_all(&self.regex, source, |captures| {
            let body = captures.name("body").map_or("", |x| x.as_str());
            trace!("rule {}: span of {} bytes", self.rule, body.len());
            let start = sink.allocate(self.rule, TokenOptions::with_kind(TokenKind::Start))?;
            let end = sink.allocate(self.rule, TokenOptions::with_kind(TokenKind::End))?;
            Ok(Some(format!("{start}{body}{end}")))
        })
    }
}
