use tw_bbcode_parser::ConfigError;
use tw_types::{RenderError, SinkError};

#[derive(Debug, thiserror::Error)]
pub enum WikiError {
    /// A rule could not be built from its configuration.
    #[error("invalid rule configuration: {0}")]
    Config(#[from] ConfigError),

    /// The token store refused an allocation, the document is not parsed.
    #[error("failed to parse document: {0}")]
    Sink(#[from] SinkError),

    #[error("failed to render token: {0}")]
    Render(#[from] RenderError),

    /// A placeholder opened at this byte offset is never closed.
    #[error("unterminated token placeholder at byte {0}")]
    UnterminatedToken(usize),

    /// A placeholder refers to a token not in the store.
    #[error("unknown token {0:?}")]
    UnknownToken(String),
}
