use crate::error::ConfigError;
use regex::{Captures, Regex, RegexBuilder};
use tw_types::SinkError;

/// A fragment that can never match anything.
pub const NEVER_MATCH: &str = r"\b\B";

/// Placeholder replaced with the escaped document delimiter.
const DELIM: &str = "{delim}";

/// Builds a rule pattern from a template and named fragments.
///
/// `{name}` placeholders are replaced in the order fragments were added, so a fragment may
/// itself contain placeholders of fragments added after it. `{delim}` is replaced last, in
/// the template and in every fragment, by the escaped delimiter, which makes it safe to use
/// inside character classes: `[^\s{delim}]`.
#[derive(Clone, Debug)]
pub struct PatternTemplate {
    template: &'static str,
    fragments: Vec<(&'static str, String)>,
    delimiter: char,
}

impl PatternTemplate {
    pub fn new(template: &'static str, delimiter: char) -> Self {
        Self {
            template,
            fragments: vec![],
            delimiter,
        }
    }

    pub fn fragment(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fragments.push((name, value.into()));
        self
    }

    /// Add a fragment, falling back to [NEVER_MATCH] when there is no value.
    pub fn fragment_or_never(self, name: &'static str, value: Option<String>) -> Self {
        let value = value.unwrap_or_else(|| NEVER_MATCH.to_owned());
        self.fragment(name, value)
    }

    /// The final pattern text.
    pub fn render(&self) -> String {
        let mut pattern = self.template.to_owned();
        for (name, value) in &self.fragments {
            pattern = pattern.replace(&format!("{{{name}}}"), value);
        }
        pattern.replace(DELIM, &regex::escape(self.delimiter.encode_utf8(&mut [0; 4])))
    }

    /// Compile the pattern, case-insensitive.
    ///
    /// # Errors
    ///
    /// When the interpolated pattern is not a valid regular expression.
    pub fn build(&self, rule: &'static str) -> Result<Regex, ConfigError> {
        RegexBuilder::new(&self.render())
            .case_insensitive(true)
            .build()
            .map_err(|source| ConfigError::Pattern { rule, source })
    }
}

/// Replace every non-overlapping match of `regex` in `text` with what `replacer` returns.
///
/// A replacer returning `None` leaves the match as it is and scanning resumes after it.
pub(crate) fn replace_all<F>(regex: &Regex, text: &str, mut replacer: F) -> Result<String, SinkError>
where
    F: FnMut(&Captures<'_>) -> Result<Option<String>, SinkError>,
{
    let mut output = String::with_capacity(text.len());
    let mut last = 0;

    for captures in regex.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if let Some(replacement) = replacer(&captures)? {
            output.push_str(&text[last..whole.start()]);
            output.push_str(&replacement);
            last = whole.end();
        }
    }

    output.push_str(&text[last..]);
    Ok(output)
}
