use std::ops::Range;

/// Tags found by the [Lexer](crate::lexer::Lexer).
///
/// Text between tags is not kept, callers slice it from the source by span.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// Tag head.
    Head(TagHead<'a>),

    /// Tag tail.
    Tail(TagTail<'a>),
}

/// Tag head.
///
/// `[$name=$attr]` or `[$name]`
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct TagHead<'a> {
    /// Tag name.
    pub name: &'a str,

    /// Optional attribute, everything after the first `=`.
    pub attr: Option<&'a str>,

    /// Byte range in source, brackets included.
    pub span: Range<usize>,
}

/// Tag tail.
///
/// `[/$name]`
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct TagTail<'a> {
    /// Tag name.
    pub name: &'a str,

    /// Byte range in source, brackets included.
    pub span: Range<usize>,
}
