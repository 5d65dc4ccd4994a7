use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Option key holding the [TokenKind].
pub const TYPE: &str = "type";

/// Option key holding the nesting level of span tokens.
pub const LEVEL: &str = "level";

/// Kind of a token, stored under the `type` option.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Opening half of a span.
    Start,

    /// Closing half of a span.
    End,

    /// Link where the display text is the link itself.
    Inline,

    /// Link with separate display text.
    Descr,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Start => "start",
            TokenKind::End => "end",
            TokenKind::Inline => "inline",
            TokenKind::Descr => "descr",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(TokenKind::Start),
            "end" => Ok(TokenKind::End),
            "inline" => Ok(TokenKind::Inline),
            "descr" => Ok(TokenKind::Descr),
            v => Err(format!("unknown token type {v:?}")),
        }
    }
}

/// Value of a single token option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Nesting level and other counters.
    Level(usize),

    /// Plain text: urls, names, colors.
    Text(String),

    /// Structured attributes, reserved for renderers.
    Attr(BTreeMap<String, String>),
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

impl From<usize> for OptionValue {
    fn from(value: usize) -> Self {
        OptionValue::Level(value)
    }
}

impl From<TokenKind> for OptionValue {
    fn from(value: TokenKind) -> Self {
        OptionValue::Text(value.as_str().to_owned())
    }
}

impl From<BTreeMap<String, String>> for OptionValue {
    fn from(value: BTreeMap<String, String>) -> Self {
        OptionValue::Attr(value)
    }
}

/// Semantic attributes attached to a token.
///
/// Keys are sorted so two equal option sets always serialize the same way.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenOptions(BTreeMap<String, OptionValue>);

impl TokenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with only the `type` key set.
    pub fn with_kind(kind: TokenKind) -> Self {
        Self::new().with(TYPE, kind)
    }

    /// Builder style [TokenOptions::insert].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    /// Get the option under `key` if it holds text.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(OptionValue::Text(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Nesting level, only present on tokens of nesting rules.
    pub fn level(&self) -> Option<usize> {
        match self.0.get(LEVEL) {
            Some(OptionValue::Level(v)) => Some(*v),
            _ => None,
        }
    }

    /// Parsed `type` option.
    ///
    /// `None` if absent or not one of the known kinds.
    pub fn kind(&self) -> Option<TokenKind> {
        self.text(TYPE).and_then(|x| x.parse().ok())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.0.iter()
    }
}

/// A token allocated for a matched construct.
///
/// Tokens are never changed after allocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Name of the rule produced the token.
    pub rule: String,

    /// Options describing the replaced markup.
    pub options: TokenOptions,
}

impl Token {
    pub fn new(rule: impl Into<String>, options: TokenOptions) -> Self {
        Self {
            rule: rule.into(),
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_round_trips_through_options() {
        let options = TokenOptions::with_kind(TokenKind::Descr);
        assert_eq!(options.kind(), Some(TokenKind::Descr));
        assert_eq!(options.text(TYPE), Some("descr"));
        assert_eq!(options.level(), None);
    }

    #[test]
    fn test_level_is_not_text() {
        let options = TokenOptions::with_kind(TokenKind::Start).with(LEVEL, 3usize);
        assert_eq!(options.level(), Some(3));
        assert_eq!(options.text(LEVEL), None);
    }

    #[test]
    fn test_unknown_kind() {
        let options = TokenOptions::new().with(TYPE, "sideways");
        assert_eq!(options.kind(), None);
        assert!("sideways".parse::<TokenKind>().is_err());
    }

    #[test]
    fn test_serialize_token() {
        let token = Token::new(
            "image",
            TokenOptions::new()
                .with("src", "http://a.com/b.png")
                .with("attr", BTreeMap::new()),
        );
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(
            json,
            r#"{"rule":"image","options":{"attr":{},"src":"http://a.com/b.png"}}"#
        );
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}
