use tracing::debug;
use tw_types::{SinkError, Token, TokenOptions, TokenSink};

/// In memory token storage of one document.
///
/// Token ids are allocation indexes, placeholders are `delimiter + id + delimiter`.
#[derive(Clone, Debug)]
pub struct TokenStore {
    delimiter: char,

    /// Most tokens allowed, `None` for no limit.
    limit: Option<usize>,

    tokens: Vec<Token>,
}

impl TokenStore {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            limit: None,
            tokens: vec![],
        }
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Placeholder text of token `id`.
    pub fn placeholder(&self, id: usize) -> String {
        format!("{0}{id}{0}", self.delimiter)
    }

    /// Find the token allocated with `id`.
    pub fn resolve(&self, id: usize) -> Option<&Token> {
        self.tokens.get(id)
    }

    /// All tokens in allocation order, the index is the id.
    pub fn tokens(&self) -> &[Token] {
        self.tokens.as_slice()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl TokenSink for TokenStore {
    fn allocate(&mut self, rule: &str, options: TokenOptions) -> Result<String, SinkError> {
        if let Some(limit) = self.limit {
            if self.tokens.len() >= limit {
                debug!("token store: refuse token of rule {rule}, limit {limit} reached");
                return Err(SinkError::LimitReached(limit));
            }
        }
        let id = self.tokens.len();
        self.tokens.push(Token::new(rule, options));
        Ok(self.placeholder(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tw_types::TokenKind;

    #[test]
    fn test_allocate_and_resolve() {
        let mut store = TokenStore::new('\u{FF}');
        let first = store
            .allocate("bold", TokenOptions::with_kind(TokenKind::Start))
            .unwrap();
        let second = store
            .allocate("bold", TokenOptions::with_kind(TokenKind::End))
            .unwrap();
        assert_eq!(first, "\u{FF}0\u{FF}");
        assert_eq!(second, "\u{FF}1\u{FF}");
        assert_eq!(store.len(), 2);
        assert_eq!(store.resolve(1).unwrap().options.kind(), Some(TokenKind::End));
        assert_eq!(store.resolve(2), None);
    }

    #[test]
    fn test_custom_delimiter() {
        let mut store = TokenStore::new('#');
        assert_eq!(store.allocate("image", TokenOptions::new()).unwrap(), "#0#");
        assert_eq!(store.delimiter(), '#');
    }

    #[test]
    fn test_limit() {
        let mut store = TokenStore::new('\u{FF}').with_limit(Some(1));
        assert!(store.allocate("bold", TokenOptions::new()).is_ok());
        assert_eq!(
            store.allocate("bold", TokenOptions::new()),
            Err(SinkError::LimitReached(1))
        );
        assert_eq!(store.len(), 1);
    }
}
