use crate::conf::{ConfValue, MergedConf, RuleConf};
use crate::error::ConfigError;
use crate::pattern::{replace_all, PatternTemplate};
use crate::rules::Rule;
use regex::{Captures, Regex};
use tracing::{debug, trace};
use tw_types::{SinkError, TokenKind, TokenOptions, TokenSink};

pub(crate) const NAME: &str = "url";

/// Option key holding the link target.
pub const HREF: &str = "href";

/// Option key holding the display text.
pub const TEXT: &str = "text";

/// Scheme added to links written without one, like `www.example.com`.
const DEFAULT_SCHEME: &str = "http://";

/// Scheme added to bare e-mail addresses.
const MAIL_SCHEME: &str = "mailto:";

/// Punctuation ending a sentence rather than an inline link.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

/// Strip [TRAILING_PUNCTUATION] from the end of `link`.
///
/// A `)` closing a `(` inside the link is kept: `http://a.com/A_(b)`.
fn trim_trailing(link: &str) -> &str {
    let mut link = link;
    while let Some(last) = link.chars().last() {
        if !TRAILING_PUNCTUATION.contains(&last) {
            break;
        }
        if last == ')' && link.matches('(').count() >= link.matches(')').count() {
            break;
        }
        link = &link[..link.len() - last.len_utf8()];
    }
    link
}

pub(crate) fn defaults() -> Vec<(&'static str, ConfValue)> {
    vec![
        ("schemes", r"[a-z][a-z0-9+.\-]*".into()),
        (
            "refused",
            ["script", "about", "applet", "activex", "chrome"].into(),
        ),
        ("prefixes", ["www", "ftp"].into()),
        ("path_regexp", r#"[^\s"<>\[\]{delim}]+"#.into()),
        (
            "email_regexp",
            r"[\w.+\-&&[^{delim}]]+@[\w\-&&[^{delim}]]+(?:\.[\w\-&&[^{delim}]]+)+".into(),
        ),
        ("inline_enable", true.into()),
        ("mail_enable", true.into()),
        ("boundary", ConfValue::List(vec![])),
    ]
}

/// How a matched link was written.
#[derive(Debug, PartialEq, Eq)]
enum Link<'a> {
    /// With a scheme: `http://example.com`, `mailto:a@b.c`.
    Scheme { scheme: &'a str },

    /// Starts with a lazy prefix: `www.example.com`.
    Lazy,

    /// A bare e-mail address.
    Mail,
}

/// Tag `[url]$URL[/url]`, `[url=$URL]$TEXT[/url]` and bare links in text.
///
/// * `[url=$URL]$TEXT[/url]` produces a `descr` token.
/// * `[url]$URL[/url]` and bare links produce `inline` tokens, the text is the link as written.
///
/// Bare links must follow whitespace, the line start or one of the configured boundary
/// characters. The boundary is kept in front of the token.
///
/// Links whose scheme contains a refused word (`javascript:` contains `script`) are left as
/// text.
#[derive(Debug)]
pub struct Url {
    /// Bracketed form.
    regex: Regex,

    /// Bare links, `None` if disabled.
    inline: Option<Regex>,

    /// Anchored regex telling how a matched link was written.
    classify: Regex,

    /// Refused scheme words, lowercase.
    refused: Vec<String>,
}

impl Url {
    pub fn new(conf: &RuleConf, delimiter: char) -> Result<Self, ConfigError> {
        let conf = MergedConf::merge(NAME, defaults(), conf);

        let email = if conf.flag("mail_enable")? {
            conf.fragment("email_regexp")?
        } else {
            None
        };
        let boundary = conf
            .list("boundary")?
            .iter()
            .map(|x| regex::escape(x))
            .collect::<String>();

        // Fragments referenced by `{url}` must be added after it.
        let with_fragments = |template: PatternTemplate| -> Result<PatternTemplate, ConfigError> {
            Ok(template
                .fragment_or_never("prefixes", conf.fragment("prefixes")?)
                .fragment_or_never("schemes", conf.fragment("schemes")?)
                .fragment_or_never("path", conf.fragment("path_regexp")?)
                .fragment_or_never("email", email.clone())
                .fragment("boundary", boundary.as_str()))
        };

        let url = "(?:{prefixes})\\.{path}|(?:{schemes}):{path}|{email}";
        let regex = with_fragments(
            PatternTemplate::new(
                r"\[url(?:=(?P<eqhref>{url})\](?P<text>(?s:.*?))|\](?P<href>{url}))\[/url\]",
                delimiter,
            )
            .fragment("url", url),
        )?
        .build(NAME)?;

        let inline = if conf.flag("inline_enable")? {
            let inline_url = "(?:{prefixes})\\.{path}|(?:{schemes})://{path}|mailto:{path}|{email}";
            let regex = with_fragments(
                PatternTemplate::new(r"(?m)(?P<pre>^|[\s{boundary}])(?P<href>{url})", delimiter)
                    .fragment("url", inline_url),
            )?
            .build(NAME)?;
            Some(regex)
        } else {
            None
        };

        let classify = with_fragments(
            PatternTemplate::new(
                r"^(?:(?P<lazy>(?:{prefixes})\.{path})|(?P<scheme>{schemes}):{path}|(?P<mail>{email}))$",
                delimiter,
            ),
        )?
        .build(NAME)?;

        let refused = conf
            .list("refused")?
            .into_iter()
            .map(|x| x.to_lowercase())
            .collect();

        Ok(Self {
            regex,
            inline,
            classify,
            refused,
        })
    }

    fn classify<'a>(&self, link: &'a str) -> Option<Link<'a>> {
        let captures = self.classify.captures(link)?;
        if captures.name("lazy").is_some() {
            Some(Link::Lazy)
        } else if let Some(scheme) = captures.name("scheme") {
            Some(Link::Scheme {
                scheme: scheme.as_str(),
            })
        } else if captures.name("mail").is_some() {
            Some(Link::Mail)
        } else {
            None
        }
    }

    /// Build the token options for `link`.
    ///
    /// `None` if the link is refused.
    fn link_options(&self, link: &str, text: Option<&str>) -> Option<TokenOptions> {
        let href = match self.classify(link)? {
            Link::Scheme { scheme } => {
                let scheme = scheme.to_lowercase();
                if self.refused.iter().any(|x| scheme.contains(x.as_str())) {
                    debug!("rule {NAME}: refuse link {link:?}");
                    return None;
                }
                link.to_owned()
            }
            Link::Lazy => format!("{DEFAULT_SCHEME}{link}"),
            Link::Mail => format!("{MAIL_SCHEME}{link}"),
        };

        let (kind, text) = match text {
            Some(v) => (TokenKind::Descr, v),
            None => (TokenKind::Inline, link),
        };
        trace!("rule {NAME}: {kind} link {href:?}");

        Some(
            TokenOptions::with_kind(kind)
                .with(HREF, href)
                .with(TEXT, text),
        )
    }

    fn process_bracketed(
        &self,
        captures: &Captures<'_>,
        sink: &mut dyn TokenSink,
    ) -> Result<Option<String>, SinkError> {
        let options = match (captures.name("eqhref"), captures.name("href")) {
            (Some(href), _) => {
                let text = captures
                    .name("text")
                    .map(|x| x.as_str())
                    .filter(|x| !x.is_empty())
                    .unwrap_or(href.as_str());
                self.link_options(href.as_str(), Some(text))
            }
            (None, Some(href)) => self.link_options(href.as_str(), None),
            (None, None) => None,
        };

        match options {
            Some(v) => sink.allocate(NAME, v).map(Some),
            None => Ok(None),
        }
    }

    fn process_inline(
        &self,
        captures: &Captures<'_>,
        sink: &mut dyn TokenSink,
    ) -> Result<Option<String>, SinkError> {
        let Some(href) = captures.name("href") else {
            return Ok(None);
        };
        let pre = captures.name("pre").map_or("", |x| x.as_str());
        let link = trim_trailing(href.as_str());
        let trailing = &href.as_str()[link.len()..];

        let Some(options) = self.link_options(link, None) else {
            return Ok(None);
        };
        let token = sink.allocate(NAME, options)?;
        Ok(Some(format!("{pre}{token}{trailing}")))
    }
}

impl Rule for Url {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(&self, source: &str, sink: &mut dyn TokenSink) -> Result<String, SinkError> {
        let output = replace_all(&self.regex, source, |captures| {
            self.process_bracketed(captures, sink)
        })?;

        match &self.inline {
            Some(inline) => replace_all(inline, &output, |captures| {
                self.process_inline(captures, sink)
            }),
            None => Ok(output),
        }
    }
}
