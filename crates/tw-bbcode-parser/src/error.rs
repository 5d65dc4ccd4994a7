/// Errors raised when constructing a rule from its configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration value has a type the key does not accept.
    #[error("rule {rule:?}: key {key:?} expects {expected}")]
    InvalidType {
        rule: &'static str,
        key: &'static str,
        expected: &'static str,
    },

    /// Configuration value has the right type but can not be used.
    #[error("rule {rule:?}: key {key:?} {reason}")]
    InvalidValue {
        rule: &'static str,
        key: &'static str,
        reason: String,
    },

    /// Interpolated pattern failed to compile.
    #[error("rule {rule:?}: invalid pattern")]
    Pattern {
        rule: &'static str,
        #[source]
        source: regex::Error,
    },

    /// No rule with this name.
    #[error("unknown rule {0:?}")]
    UnknownRule(String),
}
