use tw_types::{SinkError, TokenKind, TokenOptions, TokenSink};

/// Sink recording every allocation, placeholders are `<id>`.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub tokens: Vec<(String, TokenOptions)>,
}

impl TokenSink for RecordingSink {
    fn allocate(&mut self, rule: &str, options: TokenOptions) -> Result<String, SinkError> {
        let id = self.tokens.len();
        self.tokens.push((rule.to_owned(), options));
        Ok(format!("<{id}>"))
    }
}

impl RecordingSink {
    /// Kind and level of every token, in allocation order.
    pub fn levels(&self) -> Vec<(TokenKind, usize)> {
        self.tokens
            .iter()
            .filter_map(|(_, options)| Some((options.kind()?, options.level()?)))
            .collect()
    }
}

/// Sink refusing every allocation.
pub(crate) struct FullSink;

impl TokenSink for FullSink {
    fn allocate(&mut self, _rule: &str, _options: TokenOptions) -> Result<String, SinkError> {
        Err(SinkError::LimitReached(0))
    }
}
