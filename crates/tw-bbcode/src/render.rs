use crate::{bbcode, bbcode_to_string, Bold, Color, Element, Head, Image, Quote, Subscript, Tail, Url};
use tw_bbcode_parser::rules::{AUTHOR, COLOR, HREF, SRC, TEXT};
use tw_bbcode_parser::RuleName;
use tw_types::{Render, RenderError, Token, TokenKind, TYPE};

/// Render tokens back into bbcode.
///
/// Parsing the rendered text again produces the same tokens.
#[derive(Clone, Copy, Debug, Default)]
pub struct BBCodeRender;

fn missing(token: &Token, key: &'static str) -> RenderError {
    RenderError::MissingOption {
        rule: token.rule.clone(),
        key,
    }
}

fn invalid(token: &Token, key: &'static str) -> RenderError {
    RenderError::InvalidOption {
        rule: token.rule.clone(),
        key,
    }
}

fn kind_of(token: &Token) -> Result<TokenKind, RenderError> {
    if token.options.get(TYPE).is_none() {
        return Err(missing(token, TYPE));
    }
    token.options.kind().ok_or_else(|| invalid(token, TYPE))
}

fn text_of<'a>(token: &'a Token, key: &'static str) -> Result<&'a str, RenderError> {
    match token.options.get(key) {
        None => Err(missing(token, key)),
        Some(_) => token.options.text(key).ok_or_else(|| invalid(token, key)),
    }
}

/// Render the head or the tail of `element`, depending on the token kind.
fn span<E: Element>(token: &Token, element: &E) -> Result<String, RenderError> {
    match kind_of(token)? {
        TokenKind::Start => Ok(bbcode_to_string(&Head(element))),
        TokenKind::End => Ok(bbcode_to_string(&Tail(element))),
        TokenKind::Inline | TokenKind::Descr => Err(invalid(token, TYPE)),
    }
}

impl Render for BBCodeRender {
    fn render_token(&self, token: &Token) -> Result<String, RenderError> {
        let rule = token
            .rule
            .parse::<RuleName>()
            .map_err(|_| RenderError::UnsupportedRule(token.rule.clone()))?;

        match rule {
            RuleName::Blockquote => {
                let author = token.options.text(AUTHOR).map(|x| x.to_owned());
                span(token, &Quote::new(author, bbcode!()))
            }
            RuleName::Colortext => {
                let color = text_of(token, COLOR)?;
                span(token, &Color::new(color, bbcode!()))
            }
            RuleName::Bold => span(token, &Bold::new(bbcode!())),
            RuleName::Subscript => span(token, &Subscript::new(bbcode!())),
            RuleName::Image => Ok(bbcode_to_string(&Image::new(text_of(token, SRC)?))),
            RuleName::Url => {
                let text = text_of(token, TEXT)?.to_owned();
                let url = match kind_of(token)? {
                    TokenKind::Inline => Url::bare(bbcode!(text)),
                    TokenKind::Descr => Url::new(text_of(token, HREF)?, bbcode!(text)),
                    TokenKind::Start | TokenKind::End => return Err(invalid(token, TYPE)),
                };
                Ok(bbcode_to_string(&url))
            }
        }
    }
}
