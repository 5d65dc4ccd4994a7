use crate::scanner::Scanner;
use crate::token::{TagHead, TagTail, Token};
use crate::{CLOSE, EQUAL, OPEN, SLASH};

/// Split source text into tag heads and tails.
pub(crate) struct Lexer<'a> {
    /// Inner scanner.
    source: Scanner<'a>,

    /// Byte offset of the `[` starting the tag in construction.
    start: usize,

    /// Scanned tokens.
    tokens: Vec<Token<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(data: &'a str) -> Self {
        Self {
            source: Scanner::new(data),
            start: 0,
            tokens: vec![],
        }
    }

    /// Run the process and return all tags, in source order.
    pub fn scan(mut self) -> Vec<Token<'a>> {
        while !self.source.done() {
            self.start = self.source.offset();
            if self.source.next() != Some(OPEN) {
                continue;
            }

            if let Some(token) = self.scan_head_or_tail() {
                self.tokens.push(token);
            }
        }

        self.tokens
    }

    /// Reached the first character of tag head or tail, which is exactly a `[`.
    fn scan_head_or_tail(&mut self) -> Option<Token<'a>> {
        match self.source.curr() {
            Some(SLASH) => self.scan_tail(),
            _ => self.scan_head(),
        }
    }

    /// Try construct a [Token::Head] from input.
    fn scan_head(&mut self) -> Option<Token<'a>> {
        let end = self.scan_to_close()?;
        Some(self.collect_head(end))
    }

    /// Try construct a [Token::Tail] from input.
    fn scan_tail(&mut self) -> Option<Token<'a>> {
        let end = self.scan_to_close()?;
        Some(self.collect_tail(end))
    }

    /// Advance to the `]` closing current tag and return the byte offset after it.
    ///
    /// Another `[` before the tag closes means an invalid tag. The unexpected `[` is left
    /// unconsumed so it can start the next tag.
    fn scan_to_close(&mut self) -> Option<usize> {
        while let Some(ch) = self.source.next() {
            if ch == CLOSE {
                return Some(self.source.offset());
            } else if ch == OPEN {
                self.source.back();
                return None;
            }
        }

        None
    }

    /// ```console
    /// [ n a m e = a t t r ]
    /// |                     |
    /// |                     |-> end
    /// |-> self.start
    /// ```
    fn collect_head(&self, end: usize) -> Token<'a> {
        // Skip `[` and exclude `]`.
        let content = self.source.slice(self.start + 1, end - 1);
        let (name, attr) = match content.find(EQUAL) {
            Some(v) => (&content[..v], Some(&content[v + 1..])),
            None => (content, None),
        };

        Token::Head(TagHead {
            name: name.trim(),
            attr,
            span: self.start..end,
        })
    }

    /// ```console
    /// [ / n a m e ]
    /// |             |
    /// |             |-> end
    /// |-> self.start
    /// ```
    fn collect_tail(&self, end: usize) -> Token<'a> {
        // Skip `[/` and exclude `]`.
        Token::Tail(TagTail {
            name: self.source.slice(self.start + 2, end - 1).trim(),
            span: self.start..end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scan_heads_and_tails() {
        let tokens = Lexer::new(r#"a[quote="Bob"]b[/quote]"#).scan();
        assert_eq!(
            tokens,
            vec![
                Token::Head(TagHead {
                    name: "quote",
                    attr: Some(r#""Bob""#),
                    span: 1..14,
                }),
                Token::Tail(TagTail {
                    name: "quote",
                    span: 15..23,
                }),
            ]
        );
    }

    #[test]
    fn test_bracket_inside_tag_restarts() {
        let tokens = Lexer::new("[a[b]").scan();
        assert_eq!(
            tokens,
            vec![Token::Head(TagHead {
                name: "b",
                attr: None,
                span: 2..5,
            })]
        );
    }

    #[test]
    fn test_unclosed_tag_is_ignored() {
        assert!(Lexer::new("text [quote").scan().is_empty());
        assert!(Lexer::new("[").scan().is_empty());
        assert!(Lexer::new("").scan().is_empty());
    }

    #[test]
    fn test_multibyte_spans() {
        let text = "引用[b]粗[/b]";
        let tokens = Lexer::new(text).scan();
        let spans = tokens
            .iter()
            .map(|x| match x {
                Token::Head(v) => &text[v.span.clone()],
                Token::Tail(v) => &text[v.span.clone()],
            })
            .collect::<Vec<_>>();
        assert_eq!(spans, vec!["[b]", "[/b]"]);
    }
}
