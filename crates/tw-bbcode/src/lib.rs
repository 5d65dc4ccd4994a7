use std::fmt;
use std::fmt::Formatter;
use std::vec::Vec;
use tw_bbcode_webcolor::WebColor;

mod render;
pub use render::BBCodeRender;

/// Wrap like bbcode text.
#[macro_export]
macro_rules! bbcode {
    () => { Vec::<Box<dyn $crate::BBCode>>::new() };

    ($($vars: expr),+ $(,)?) => { vec![$(Box::new($vars) as Box<dyn $crate::BBCode>),+] }
}

/// The main trait defining bbcode tags.
pub trait BBCode {
    fn to_bbcode(&self, formatter: &mut Formatter<'_>) -> fmt::Result;
}

struct BBCodeWrapper<'a, T: ?Sized>(&'a T);

impl<'a, T: BBCode + ?Sized> fmt::Debug for BBCodeWrapper<'a, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.to_bbcode(f)
    }
}

impl fmt::Debug for dyn BBCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.to_bbcode(f)
    }
}

pub fn bbcode_to_string<T: BBCode + ?Sized>(code: &T) -> String {
    format!("{:?}", BBCodeWrapper(code))
}

/// Represents all kinds of bbcode tags.
pub type AnyBBCode = Vec<Box<dyn BBCode>>;

impl BBCode for AnyBBCode {
    fn to_bbcode(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        for tag in self.iter() {
            tag.to_bbcode(formatter)?
        }
        Ok(())
    }
}

impl BBCode for String {
    fn to_bbcode(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl BBCode for &str {
    fn to_bbcode(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self)
    }
}

/// A tag with a head, children and a tail.
pub trait Element {
    /// Tag name.
    fn tag(&self) -> &'static str;

    /// Attribute written after `=` in the head.
    fn attr(&self) -> Option<String> {
        None
    }

    fn children(&self) -> &AnyBBCode;
}

/// Only the head of an [Element]: `[tag=attr]`.
pub struct Head<'a, T: ?Sized>(pub &'a T);

impl<'a, T: Element + ?Sized> BBCode for Head<'a, T> {
    fn to_bbcode(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self.0.attr() {
            Some(attr) => formatter.write_fmt(format_args!("[{}={attr}]", self.0.tag())),
            None => formatter.write_fmt(format_args!("[{}]", self.0.tag())),
        }
    }
}

/// Only the tail of an [Element]: `[/tag]`.
pub struct Tail<'a, T: ?Sized>(pub &'a T);

impl<'a, T: Element + ?Sized> BBCode for Tail<'a, T> {
    fn to_bbcode(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_fmt(format_args!("[/{}]", self.0.tag()))
    }
}

macro_rules! impl_element_bbcode {
    ($($ty: ty),*) => {
        $(
            impl BBCode for $ty {
                fn to_bbcode(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                    Head(self).to_bbcode(formatter)?;
                    self.children().to_bbcode(formatter)?;
                    Tail(self).to_bbcode(formatter)
                }
            }
        )*
    };
}

impl_element_bbcode!(Bold, Subscript, Quote, Color, Url);

/// Tag `[b][/b]`. Bold text.
pub struct Bold(AnyBBCode);

impl Bold {
    pub fn new(children: AnyBBCode) -> Self {
        Self(children)
    }
}

impl Element for Bold {
    fn tag(&self) -> &'static str {
        "b"
    }

    fn children(&self) -> &AnyBBCode {
        &self.0
    }
}

/// Tag `[sub][/sub]`. Subscript text.
pub struct Subscript(AnyBBCode);

impl Subscript {
    pub fn new(children: AnyBBCode) -> Self {
        Self(children)
    }
}

impl Element for Subscript {
    fn tag(&self) -> &'static str {
        "sub"
    }

    fn children(&self) -> &AnyBBCode {
        &self.0
    }
}

/// Tag `[quote][/quote]` or `[quote="$AUTHOR"][/quote]`. Quote block.
pub struct Quote {
    author: Option<String>,
    children: AnyBBCode,
}

impl Quote {
    pub fn new(author: Option<String>, children: AnyBBCode) -> Self {
        Self { author, children }
    }
}

impl Element for Quote {
    fn tag(&self) -> &'static str {
        "quote"
    }

    fn attr(&self) -> Option<String> {
        self.author.as_ref().map(|x| format!("\"{x}\""))
    }

    fn children(&self) -> &AnyBBCode {
        &self.children
    }
}

/// Tag `[url=$URL]$DATA[/url]` or `[url]$DATA[/url]`. Url links.
pub struct Url {
    link: Option<String>,
    children: AnyBBCode,
}

impl Url {
    pub fn new(link: impl Into<String>, children: AnyBBCode) -> Self {
        Self {
            link: Some(link.into()),
            children,
        }
    }

    /// Link where the children are the link itself.
    pub fn bare(children: AnyBBCode) -> Self {
        Self {
            link: None,
            children,
        }
    }
}

impl Element for Url {
    fn tag(&self) -> &'static str {
        "url"
    }

    fn attr(&self) -> Option<String> {
        self.link.clone()
    }

    fn children(&self) -> &AnyBBCode {
        &self.children
    }
}

/// Tag `[color=$COLOR]$DATA[/color]`. Text color.
///
/// `$COLOR` is a [WebColor] name or a hex value, with or without `#`.
pub struct Color {
    color: String,
    children: AnyBBCode,
}

impl Color {
    pub fn new(color: impl Into<String>, children: AnyBBCode) -> Self {
        Color {
            color: color.into(),
            children,
        }
    }
}

/// Check `value` is a 3 or 6 digits hex color without `#`.
fn is_hex_color(value: &str) -> bool {
    matches!(value.len(), 3 | 6) && value.chars().all(|x| x.is_ascii_hexdigit())
}

impl Element for Color {
    fn tag(&self) -> &'static str {
        "color"
    }

    fn attr(&self) -> Option<String> {
        if WebColor::from_name(&self.color).is_none() && is_hex_color(&self.color) {
            Some(format!("#{}", self.color))
        } else {
            Some(self.color.clone())
        }
    }

    fn children(&self) -> &AnyBBCode {
        &self.children
    }
}

/// Tag `[img]$URL[/img]`. Image.
pub struct Image {
    src: String,
}

impl Image {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }
}

impl BBCode for Image {
    fn to_bbcode(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_fmt(format_args!("[img]{}[/img]", self.src))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_nested_elements() {
        let code = Quote::new(
            Some("Bob".to_owned()),
            bbcode!(
                "said ",
                Bold::new(bbcode!(Color::new("red", bbcode!("hi")))),
                " at ",
                Url::new("http://a.com", bbcode!("a")),
                Image::new("b.png"),
                Subscript::new(bbcode!())
            ),
        );
        assert_eq!(
            bbcode_to_string(&code),
            r#"[quote="Bob"]said [b][color=red]hi[/color][/b] at [url=http://a.com]a[/url][img]b.png[/img][sub][/sub][/quote]"#
        );
    }

    #[rstest]
    #[case("red", "[color=red]")]
    #[case("DarkRed", "[color=DarkRed]")]
    #[case("ff0000", "[color=#ff0000]")]
    #[case("F00", "[color=#F00]")]
    #[case("bad", "[color=#bad]")]
    #[case("tan", "[color=tan]")]
    fn test_color_head(#[case] color: &str, #[case] head: &str) {
        let color = Color::new(color, bbcode!());
        assert_eq!(bbcode_to_string(&Head(&color)), head);
        assert_eq!(bbcode_to_string(&Tail(&color)), "[/color]");
    }

    #[test]
    fn test_bare_url() {
        let url = Url::bare(bbcode!("www.a.com"));
        assert_eq!(bbcode_to_string(&url), "[url]www.a.com[/url]");
    }

    #[test]
    fn test_quote_without_author() {
        let quote = Quote::new(None, bbcode!("x"));
        assert_eq!(bbcode_to_string(&quote), "[quote]x[/quote]");
    }
}
