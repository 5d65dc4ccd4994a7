mod token;

pub use token::{OptionValue, Token, TokenKind, TokenOptions, LEVEL, TYPE};

/// Default character surrounding a token id in parsed text.
pub const DEFAULT_DELIMITER: char = '\u{FF}';

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// Sink refused to allocate more tokens for the current document.
    ///
    /// * 0: the configured limit.
    #[error("token limit of {0} reached")]
    LimitReached(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// No renderer available for tokens of this rule.
    #[error("no renderer for rule {0:?}")]
    UnsupportedRule(String),

    /// A required option is absent on the token.
    #[error("token of rule {rule:?} is missing option {key:?}")]
    MissingOption { rule: String, key: &'static str },

    /// An option is present but holds something the renderer can not use.
    #[error("token of rule {rule:?} has invalid option {key:?}")]
    InvalidOption { rule: String, key: &'static str },
}

/// Allocates placeholder text for tokens.
///
/// Every call must return a placeholder distinguishable from all others
/// allocated for the same document.
pub trait TokenSink {
    /// Store `options` for `rule` and return the placeholder to put in text.
    ///
    /// # Errors
    ///
    /// An error here is fatal for the whole document.
    fn allocate(&mut self, rule: &str, options: TokenOptions) -> Result<String, SinkError>;
}

/// Turns a resolved token back into output text.
pub trait Render {
    fn render_token(&self, token: &Token) -> Result<String, RenderError>;
}
