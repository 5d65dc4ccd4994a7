//! BBCode rules for wiki style token parsing.
//!
//! Each [Rule] scans a document for one kind of construct and replaces every match with
//! placeholders allocated from a [TokenSink](tw_types::TokenSink), leaving anything it does not
//! recognize as text.

mod conf;
mod error;
mod lexer;
mod nesting;
mod pattern;
pub mod rules;
mod scanner;
#[cfg(test)]
mod testing;
mod token;

pub use conf::{ConfValue, RuleConf};
pub use error::ConfigError;
pub use pattern::{PatternTemplate, NEVER_MATCH};
pub use rules::{Blockquote, Bold, Colortext, Image, Rule, RuleName, Subscript, Url};

const OPEN: char = '[';
const CLOSE: char = ']';
const SLASH: char = '/';
const EQUAL: char = '=';
