//! Wiki style document parsing.
//!
//! A [Wiki] runs an ordered set of bbcode rules over a document. Each recognized construct is
//! replaced by a placeholder pointing into a [TokenStore], a [Render](tw_types::Render)
//! implementation turns the tokens into output later.

mod config;
mod error;
mod store;
mod wiki;

pub use config::WikiConfig;
pub use error::WikiError;
pub use store::TokenStore;
pub use wiki::{Position, Wiki, DEFAULT_RULES, DELIMITER_RULE};
