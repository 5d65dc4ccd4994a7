use crate::lexer::Lexer;
use crate::token::Token;
use std::ops::Range;
use tracing::{debug, trace};
use tw_types::{SinkError, TokenKind, TokenOptions, TokenSink, LEVEL};

/// A tag allowed to nest inside its own body.
///
/// `[tag=attr]...[tag]...[/tag]...[/tag]`
pub(crate) trait NestedTag {
    /// Rule specific data parsed from the attribute of an open tag.
    type Attr;

    /// Rule name, used as token namespace.
    fn rule(&self) -> &'static str;

    /// Tag name, matched ignoring case.
    fn tag(&self) -> &'static str;

    /// Deepest level allowed. A span nesting deeper is left as text.
    fn max_depth(&self) -> usize;

    /// Parse the attribute of an open tag.
    ///
    /// Return `None` if the open tag is not valid for this rule, it is then treated as text.
    fn parse_attr(&self, attr: Option<&str>) -> Option<Self::Attr>;

    /// Add rule specific data to the options of both start and end token.
    fn decorate(&self, attr: &Self::Attr, options: TokenOptions) -> TokenOptions;
}

/// A balanced open and close tag.
struct Pair<A> {
    head: Range<usize>,
    tail: Range<usize>,
    attr: A,
}

/// A top level pair.
struct Span<A> {
    pair: Pair<A>,

    /// How many levels of pairs are nested inside, 0 for flat content.
    depth: usize,
}

/// Find the top level balanced spans in `text`, left to right.
///
/// A close tag always closes the latest still open tag. Open tags never closed stay text.
fn find_spans<T: NestedTag>(rule: &T, text: &str) -> Vec<Span<T::Attr>> {
    let mut open = vec![];
    let mut pairs = vec![];

    for token in Lexer::new(text).scan() {
        match token {
            Token::Head(head) if head.name.eq_ignore_ascii_case(rule.tag()) => {
                if let Some(attr) = rule.parse_attr(head.attr) {
                    open.push((head.span, attr));
                }
            }
            Token::Tail(tail) if tail.name.eq_ignore_ascii_case(rule.tag()) => {
                if let Some((head, attr)) = open.pop() {
                    pairs.push(Pair {
                        head,
                        tail: tail.span,
                        attr,
                    });
                }
            }
            _ => {}
        }
    }

    // Pairs were collected in closing order, inner ones first.
    pairs.sort_by_key(|x| x.head.start);

    let mut spans: Vec<Span<T::Attr>> = vec![];
    // End offsets of the pairs enclosing the current one.
    let mut enclosing: Vec<usize> = vec![];
    for pair in pairs {
        while enclosing.last().is_some_and(|end| *end <= pair.head.start) {
            enclosing.pop();
        }
        enclosing.push(pair.tail.end);
        if enclosing.len() == 1 {
            spans.push(Span { pair, depth: 0 });
        } else if let Some(span) = spans.last_mut() {
            span.depth = span.depth.max(enclosing.len() - 1);
        }
    }

    spans
}

/// Replace every balanced span of `rule` in `text` with a start token, its body and an end
/// token.
///
/// Bodies holding nested spans are substituted first, one `level` deeper, so inner tokens are
/// always allocated before the pair enclosing them.
pub(crate) fn substitute<T: NestedTag>(
    rule: &T,
    text: &str,
    level: usize,
    sink: &mut dyn TokenSink,
) -> Result<String, SinkError> {
    let spans = find_spans(rule, text);
    if spans.is_empty() {
        return Ok(text.to_owned());
    }

    let mut output = String::with_capacity(text.len());
    let mut last = 0;

    for Span { pair, depth } in spans {
        if level + depth > rule.max_depth() {
            debug!(
                "rule {}: leave span at {} as text, nesting {} levels exceeds {}",
                rule.rule(),
                pair.head.start,
                level + depth,
                rule.max_depth()
            );
            continue;
        }

        let body = &text[pair.head.end..pair.tail.start];
        let inner = if depth > 0 {
            substitute(rule, body, level + 1, sink)?
        } else {
            body.to_owned()
        };

        trace!("rule {}: level {level} span {:?}", rule.rule(), pair.head.start..pair.tail.end);
        let start = rule.decorate(
            &pair.attr,
            TokenOptions::with_kind(TokenKind::Start).with(LEVEL, level),
        );
        let end = rule.decorate(
            &pair.attr,
            TokenOptions::with_kind(TokenKind::End).with(LEVEL, level),
        );
        let start = sink.allocate(rule.rule(), start)?;
        let end = sink.allocate(rule.rule(), end)?;

        output.push_str(&text[last..pair.head.start]);
        output.push_str(&start);
        output.push_str(&inner);
        output.push_str(&end);
        last = pair.tail.end;
    }

    output.push_str(&text[last..]);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSink;
    use pretty_assertions::assert_eq;

    /// `[box]` with an optional attribute, `[box=no]` is not a valid open tag.
    struct Boxed {
        max_depth: usize,
    }

    impl NestedTag for Boxed {
        type Attr = Option<String>;

        fn rule(&self) -> &'static str {
            "box"
        }

        fn tag(&self) -> &'static str {
            "box"
        }

        fn max_depth(&self) -> usize {
            self.max_depth
        }

        fn parse_attr(&self, attr: Option<&str>) -> Option<Self::Attr> {
            match attr {
                Some("no") => None,
                v => Some(v.map(|x| x.to_owned())),
            }
        }

        fn decorate(&self, attr: &Self::Attr, options: TokenOptions) -> TokenOptions {
            match attr {
                Some(v) => options.with("attr", v.as_str()),
                None => options,
            }
        }
    }

    fn run(text: &str, max_depth: usize) -> (String, RecordingSink) {
        let mut sink = RecordingSink::default();
        let output = substitute(&Boxed { max_depth }, text, 0, &mut sink).unwrap();
        (output, sink)
    }

    #[test]
    fn test_flat() {
        let (output, sink) = run("a[box]b[/box]c", 50);
        assert_eq!(output, "a<0>b<1>c");
        assert_eq!(sink.levels(), vec![(TokenKind::Start, 0), (TokenKind::End, 0)]);
    }

    #[test]
    fn test_nested_levels_inner_first() {
        let (output, sink) = run("[box=x]a[BOX]b[box]c[/box][/Box]d[/box]", 50);
        assert_eq!(output, "<4>a<2>b<0>c<1><3>d<5>");
        assert_eq!(
            sink.levels(),
            vec![
                (TokenKind::Start, 2),
                (TokenKind::End, 2),
                (TokenKind::Start, 1),
                (TokenKind::End, 1),
                (TokenKind::Start, 0),
                (TokenKind::End, 0),
            ]
        );
        assert_eq!(sink.tokens[4].1.text("attr"), Some("x"));
        assert_eq!(sink.tokens[5].1.text("attr"), Some("x"));
        assert_eq!(sink.tokens[0].1.text("attr"), None);
    }

    #[test]
    fn test_siblings() {
        let (output, sink) = run("[box]a[/box] [box]b[/box]", 50);
        assert_eq!(output, "<0>a<1> <2>b<3>");
        assert_eq!(sink.tokens.len(), 4);
    }

    #[test]
    fn test_unterminated_is_untouched() {
        let (output, sink) = run("[box]unterminated text", 50);
        assert_eq!(output, "[box]unterminated text");
        assert!(sink.tokens.is_empty());
    }

    #[test]
    fn test_unterminated_outer_keeps_inner() {
        let (output, _) = run("[box]a[box]b[/box]", 50);
        assert_eq!(output, "[box]a<0>b<1>");
    }

    #[test]
    fn test_stray_close_is_text() {
        let (output, _) = run("[box]a[/box]b[/box]", 50);
        assert_eq!(output, "<0>a<1>b[/box]");
    }

    #[test]
    fn test_invalid_open_is_text() {
        let (output, _) = run("[box]a[box=no]b[/box]c[/box]", 50);
        assert_eq!(output, "<0>a[box=no]b<1>c[/box]");
    }

    #[test]
    fn test_depth_limit_passes_through() {
        let text = "[box][box][box]a[/box][/box][/box] [box]b[/box]";
        let (output, sink) = run(text, 1);
        assert_eq!(output, "[box][box][box]a[/box][/box][/box] <0>b<1>");
        assert_eq!(sink.tokens.len(), 2);

        let (_, sink) = run(text, 2);
        assert_eq!(sink.tokens.len(), 8);
    }

    #[test]
    fn test_deep_nesting_levels() {
        let depth = 10;
        let text = format!("{}x{}", "[box]".repeat(depth + 1), "[/box]".repeat(depth + 1));
        let (_, sink) = run(&text, 50);
        let mut levels = sink
            .levels()
            .into_iter()
            .filter(|(kind, _)| *kind == TokenKind::Start)
            .map(|(_, level)| level)
            .collect::<Vec<_>>();
        levels.sort();
        assert_eq!(levels, (0..=depth).collect::<Vec<_>>());
    }
}
