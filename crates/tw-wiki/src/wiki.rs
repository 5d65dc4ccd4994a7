use crate::error::WikiError;
use crate::store::TokenStore;
use std::collections::BTreeMap;
use tracing::{debug, trace};
use tw_bbcode_parser::{ConfValue, Rule, RuleConf, RuleName};
use tw_types::{Render, SinkError, Token, TokenOptions, TokenSink, DEFAULT_DELIMITER};

/// Rule of the tokens standing for delimiter characters already present in the source.
pub const DELIMITER_RULE: &str = "delimiter";

/// Rules applied by a new [Wiki], in order.
pub const DEFAULT_RULES: [RuleName; 6] = [
    RuleName::Blockquote,
    RuleName::Image,
    RuleName::Url,
    RuleName::Colortext,
    RuleName::Bold,
    RuleName::Subscript,
];

/// Where to insert a rule into the rule set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    First,
    Last,
    After(RuleName),
}

#[derive(Clone, Debug)]
struct RuleEntry {
    name: RuleName,
    enabled: bool,
}

/// A document parsed by an ordered set of rules.
///
/// Rules run one after another over the whole document, every rule sees the output of the ones
/// before it. After [Wiki::parse], the source holds placeholders where constructs were
/// recognized and the store holds the tokens they refer to.
#[derive(Clone, Debug)]
pub struct Wiki {
    delimiter: char,
    token_limit: Option<usize>,
    rules: Vec<RuleEntry>,

    /// Caller overrides of rule configuration.
    conf: BTreeMap<RuleName, RuleConf>,

    source: String,
    store: TokenStore,
}

impl Default for Wiki {
    fn default() -> Self {
        Self::new()
    }
}

impl Wiki {
    /// Wiki with all [DEFAULT_RULES] enabled.
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            token_limit: None,
            rules: DEFAULT_RULES
                .into_iter()
                .map(|name| RuleEntry {
                    name,
                    enabled: true,
                })
                .collect(),
            conf: BTreeMap::new(),
            source: String::new(),
            store: TokenStore::new(DEFAULT_DELIMITER),
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self.store = TokenStore::new(delimiter);
        self
    }

    /// Limit the tokens a single document may allocate.
    pub fn with_token_limit(mut self, limit: Option<usize>) -> Self {
        self.token_limit = limit;
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn token_limit(&self) -> Option<usize> {
        self.token_limit
    }

    /// Names of all rules in the set, in order, enabled or not.
    pub fn rules(&self) -> Vec<RuleName> {
        self.rules.iter().map(|x| x.name).collect()
    }

    pub fn is_enabled(&self, name: RuleName) -> bool {
        self.rules.iter().any(|x| x.name == name && x.enabled)
    }

    /// Insert rule `name` into the rule set at `position`, enabled.
    ///
    /// Return false if the rule is already in the set, or the rule to insert after is not.
    pub fn insert_rule(&mut self, name: RuleName, position: Position) -> bool {
        if self.index_of(name).is_some() {
            return false;
        }
        let index = match position {
            Position::First => 0,
            Position::Last => self.rules.len(),
            Position::After(target) => match self.index_of(target) {
                Some(v) => v + 1,
                None => return false,
            },
        };
        self.rules.insert(
            index,
            RuleEntry {
                name,
                enabled: true,
            },
        );
        true
    }

    /// Remove rule `name` from the set. Its configuration is kept.
    ///
    /// Return false if the rule is not in the set.
    pub fn delete_rule(&mut self, name: RuleName) -> bool {
        match self.index_of(name) {
            Some(v) => {
                self.rules.remove(v);
                true
            }
            None => false,
        }
    }

    /// Return false if the rule is not in the set.
    pub fn enable_rule(&mut self, name: RuleName) -> bool {
        self.set_enabled(name, true)
    }

    /// Keep rule `name` in the set without applying it.
    ///
    /// Return false if the rule is not in the set.
    pub fn disable_rule(&mut self, name: RuleName) -> bool {
        self.set_enabled(name, false)
    }

    /// Override a single configuration key of rule `name`.
    pub fn set_rule_conf(&mut self, name: RuleName, key: impl Into<String>, value: impl Into<ConfValue>) {
        self.conf
            .entry(name)
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Replace all configuration overrides of rule `name`.
    pub fn set_rule_conf_map(&mut self, name: RuleName, conf: RuleConf) {
        self.conf.insert(name, conf);
    }

    /// Configuration of rule `name`: its defaults with all overrides applied.
    pub fn rule_conf(&self, name: RuleName) -> RuleConf {
        let mut conf = name.default_conf();
        if let Some(overrides) = self.conf.get(&name) {
            conf.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        conf
    }

    /// Parse `text`, replacing the previous document.
    ///
    /// Every enabled rule is built before any text is touched, so a bad configuration fails
    /// without allocating tokens.
    ///
    /// # Errors
    ///
    /// * [WikiError::Config] when an enabled rule has an invalid configuration.
    /// * [WikiError::Sink] when the token limit is reached, the document is dropped.
    pub fn parse(&mut self, text: &str) -> Result<(), WikiError> {
        self.source.clear();
        self.store = TokenStore::new(self.delimiter).with_limit(self.token_limit);

        let rules = self.build_rules()?;
        match self.apply_rules(&rules, text) {
            Ok(source) => {
                debug!("parsed document into {} tokens", self.store.len());
                self.source = source;
                Ok(())
            }
            Err(e) => {
                self.store = TokenStore::new(self.delimiter).with_limit(self.token_limit);
                Err(e.into())
            }
        }
    }

    fn apply_rules(&mut self, rules: &[Box<dyn Rule>], text: &str) -> Result<String, SinkError> {
        let mut source = self.escape(text)?;
        for rule in rules.iter() {
            source = rule.apply(&source, &mut self.store)?;
            trace!("applied rule {}, {} tokens", rule.name(), self.store.len());
        }
        Ok(source)
    }

    fn build_rules(&self) -> Result<Vec<Box<dyn Rule>>, WikiError> {
        let empty = RuleConf::new();
        self.rules
            .iter()
            .filter(|x| x.enabled)
            .map(|x| {
                let conf = self.conf.get(&x.name).unwrap_or(&empty);
                x.name.build(conf, self.delimiter).map_err(WikiError::from)
            })
            .collect()
    }

    /// Replace every delimiter already in `text` with a token of its own.
    fn escape(&mut self, text: &str) -> Result<String, SinkError> {
        let mut output = String::with_capacity(text.len());
        for ch in text.chars() {
            if ch == self.delimiter {
                let token = self.store.allocate(DELIMITER_RULE, TokenOptions::new())?;
                output.push_str(&token);
            } else {
                output.push(ch);
            }
        }
        Ok(output)
    }

    /// Parsed document with placeholders.
    pub fn source(&self) -> &str {
        self.source.as_str()
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Tokens of the parsed document with their ids.
    ///
    /// Only tokens of rules in `filter`, or all tokens if `filter` is empty.
    pub fn tokens(&self, filter: &[RuleName]) -> Vec<(usize, &Token)> {
        self.store
            .tokens()
            .iter()
            .enumerate()
            .filter(|(_, token)| {
                filter.is_empty() || filter.iter().any(|x| x.as_str() == token.rule)
            })
            .collect()
    }

    /// Render the parsed document, every placeholder is replaced by the output of `renderer`.
    ///
    /// # Errors
    ///
    /// When the renderer fails, or the source holds a broken placeholder.
    pub fn render<R: Render + ?Sized>(&self, renderer: &R) -> Result<String, WikiError> {
        self.render_text(&self.source, self.store.len(), renderer)
    }

    /// Render `text`, where only tokens with an id below `below` may appear.
    fn render_text<R: Render + ?Sized>(
        &self,
        text: &str,
        below: usize,
        renderer: &R,
    ) -> Result<String, WikiError> {
        let delimiter_len = self.delimiter.len_utf8();
        let mut output = String::with_capacity(text.len());
        let mut rest = text;
        let mut offset = 0;

        while let Some(start) = rest.find(self.delimiter) {
            output.push_str(&rest[..start]);
            let body = &rest[start + delimiter_len..];
            let Some(len) = body.find(self.delimiter) else {
                return Err(WikiError::UnterminatedToken(offset + start));
            };
            let key = &body[..len];
            let (id, token) = key
                .parse::<usize>()
                .ok()
                .filter(|id| *id < below)
                .and_then(|id| Some((id, self.store.resolve(id)?)))
                .ok_or_else(|| WikiError::UnknownToken(key.to_owned()))?;

            if token.rule == DELIMITER_RULE {
                output.push(self.delimiter);
            } else {
                // Option text may hold placeholders of tokens allocated earlier.
                let rendered = renderer.render_token(token)?;
                output.push_str(&self.render_text(&rendered, id, renderer)?);
            }

            let consumed = start + len + 2 * delimiter_len;
            offset += consumed;
            rest = &rest[consumed..];
        }

        output.push_str(rest);
        Ok(output)
    }

    /// [Wiki::parse] then [Wiki::render].
    pub fn transform<R: Render + ?Sized>(
        &mut self,
        text: &str,
        renderer: &R,
    ) -> Result<String, WikiError> {
        self.parse(text)?;
        self.render(renderer)
    }

    fn index_of(&self, name: RuleName) -> Option<usize> {
        self.rules.iter().position(|x| x.name == name)
    }

    fn set_enabled(&mut self, name: RuleName, enabled: bool) -> bool {
        match self.rules.iter_mut().find(|x| x.name == name) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tw_bbcode_parser::rules::TEXT;
    use tw_bbcode_parser::ConfigError;
    use tw_types::RenderError;

    /// Renders the `text` option when present, the rule name otherwise.
    struct Echo;

    impl Render for Echo {
        fn render_token(&self, token: &Token) -> Result<String, RenderError> {
            Ok(match token.options.text(TEXT) {
                Some(v) => v.to_owned(),
                None => format!("<{}>", token.rule),
            })
        }
    }

    #[test]
    fn test_default_rules() {
        let wiki = Wiki::new();
        assert_eq!(wiki.rules(), DEFAULT_RULES.to_vec());
        assert!(DEFAULT_RULES.iter().all(|x| wiki.is_enabled(*x)));
        assert_eq!(wiki.delimiter(), '\u{FF}');
    }

    #[test]
    fn test_insert_and_delete_rules() {
        let mut wiki = Wiki::new();
        assert!(wiki.delete_rule(RuleName::Url));
        assert!(!wiki.delete_rule(RuleName::Url));
        assert!(wiki.insert_rule(RuleName::Url, Position::After(RuleName::Colortext)));
        assert!(!wiki.insert_rule(RuleName::Url, Position::Last));
        assert_eq!(
            wiki.rules(),
            vec![
                RuleName::Blockquote,
                RuleName::Image,
                RuleName::Colortext,
                RuleName::Url,
                RuleName::Bold,
                RuleName::Subscript,
            ]
        );

        assert!(wiki.delete_rule(RuleName::Subscript));
        assert!(!wiki.insert_rule(RuleName::Image, Position::After(RuleName::Subscript)));
        assert!(!wiki.insert_rule(RuleName::Subscript, Position::After(RuleName::Subscript)));
        assert!(wiki.insert_rule(RuleName::Subscript, Position::First));
        assert_eq!(wiki.rules()[0], RuleName::Subscript);

        assert!(wiki.delete_rule(RuleName::Bold));
        assert!(wiki.insert_rule(RuleName::Bold, Position::Last));
        assert_eq!(wiki.rules().last(), Some(&RuleName::Bold));
    }

    #[test]
    fn test_parse_replaces_constructs() {
        let mut wiki = Wiki::new();
        wiki.parse("a [b]x[/b] b").unwrap();
        assert_eq!(wiki.source(), "a \u{FF}0\u{FF}x\u{FF}1\u{FF} b");
        assert_eq!(wiki.tokens(&[]).len(), 2);
    }

    #[test]
    fn test_parse_escapes_delimiter() {
        let mut wiki = Wiki::new();
        wiki.parse("a\u{FF}b[b]c[/b]").unwrap();
        assert_eq!(wiki.source(), "a\u{FF}0\u{FF}b\u{FF}1\u{FF}c\u{FF}2\u{FF}");
        assert_eq!(wiki.store().resolve(0).unwrap().rule, DELIMITER_RULE);
        assert_eq!(wiki.render(&Echo).unwrap(), "a\u{FF}b<bold>c<bold>");
    }

    #[test]
    fn test_parse_replaces_previous_document() {
        let mut wiki = Wiki::new();
        wiki.parse("[b]x[/b]").unwrap();
        wiki.parse("plain").unwrap();
        assert_eq!(wiki.source(), "plain");
        assert!(wiki.store().is_empty());
    }

    #[test]
    fn test_disabled_rule() {
        let mut wiki = Wiki::new();
        assert!(wiki.disable_rule(RuleName::Bold));
        wiki.parse("[b]x[/b]").unwrap();
        assert_eq!(wiki.source(), "[b]x[/b]");
        assert!(wiki.store().is_empty());

        assert!(wiki.enable_rule(RuleName::Bold));
        wiki.parse("[b]x[/b]").unwrap();
        assert_eq!(wiki.store().len(), 2);

        wiki.delete_rule(RuleName::Bold);
        assert!(!wiki.enable_rule(RuleName::Bold));
    }

    #[test]
    fn test_rule_conf() {
        let mut wiki = Wiki::new();
        wiki.set_rule_conf(RuleName::Url, "inline_enable", false);
        let conf = wiki.rule_conf(RuleName::Url);
        assert_eq!(conf.get("inline_enable"), Some(&ConfValue::Flag(false)));
        assert_eq!(conf.get("mail_enable"), Some(&ConfValue::Flag(true)));

        wiki.parse("see www.a.com").unwrap();
        assert_eq!(wiki.source(), "see www.a.com");

        wiki.set_rule_conf_map(RuleName::Url, RuleConf::new());
        wiki.parse("see www.a.com").unwrap();
        assert_eq!(wiki.source(), "see \u{FF}0\u{FF}");
    }

    #[test]
    fn test_config_error_fails_fast() {
        let mut wiki = Wiki::new();
        wiki.set_rule_conf(RuleName::Image, "path_regexp", "(");
        assert!(matches!(
            wiki.parse("[b]x[/b]"),
            Err(WikiError::Config(ConfigError::Pattern { rule: "image", .. }))
        ));
        assert!(wiki.store().is_empty());
        assert_eq!(wiki.source(), "");

        wiki.disable_rule(RuleName::Image);
        assert!(wiki.parse("[b]x[/b]").is_ok());
    }

    #[test]
    fn test_token_limit() {
        let mut wiki = Wiki::new().with_token_limit(Some(1));
        assert!(matches!(
            wiki.parse("[b]x[/b]"),
            Err(WikiError::Sink(SinkError::LimitReached(1)))
        ));
        assert_eq!(wiki.source(), "");
        assert!(wiki.store().is_empty());
    }

    #[test]
    fn test_tokens_filter() {
        let mut wiki = Wiki::new();
        wiki.parse("[b]x[/b] [img]http://a.com/b.png[/img]").unwrap();
        assert_eq!(wiki.tokens(&[]).len(), 3);

        let images = wiki.tokens(&[RuleName::Image]);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].0, 0);
        assert_eq!(images[0].1.rule, "image");

        let ids = wiki
            .tokens(&[RuleName::Bold, RuleName::Url])
            .into_iter()
            .map(|(id, _)| id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_render_placeholders_in_options() {
        let mut wiki = Wiki::new();
        let output = wiki
            .transform("[url=http://a.com][img]http://a.com/b.png[/img][/url]", &Echo)
            .unwrap();
        assert_eq!(wiki.source(), "\u{FF}1\u{FF}");
        assert_eq!(wiki.store().resolve(1).unwrap().options.text(TEXT), Some("\u{FF}0\u{FF}"));
        assert_eq!(output, "<image>");
    }

    #[test]
    fn test_render_broken_placeholders() {
        let wiki = Wiki::new();
        assert!(matches!(
            wiki.render_text("a\u{FF}0", usize::MAX, &Echo),
            Err(WikiError::UnterminatedToken(1))
        ));
        assert!(matches!(
            wiki.render_text("\u{FF}9\u{FF}", usize::MAX, &Echo),
            Err(WikiError::UnknownToken(v)) if v == "9"
        ));
        assert!(matches!(
            wiki.render_text("\u{FF}x\u{FF}", usize::MAX, &Echo),
            Err(WikiError::UnknownToken(v)) if v == "x"
        ));
    }

    #[test]
    fn test_custom_delimiter() {
        let mut wiki = Wiki::new().with_delimiter('#');
        wiki.parse("#1 [sub]x[/sub]").unwrap();
        assert_eq!(wiki.source(), "#0#1 #1#x#2#");
        assert_eq!(wiki.render(&Echo).unwrap(), "#1 <subscript>x<subscript>");
    }
}
