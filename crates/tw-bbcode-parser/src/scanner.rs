/// Scanner on a string.
///
/// Walks characters while keeping their byte offsets, so callers can slice the source.
pub(crate) struct Scanner<'a> {
    /// Source text.
    source: &'a str,

    /// Characters splitted, with the byte offset of each.
    chars: Vec<(usize, char)>,

    /// Current position, in characters.
    position: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(source: &'a str) -> Scanner<'a> {
        Self {
            source,
            chars: source.char_indices().collect(),
            position: 0,
        }
    }

    /// Check the scanner process reached the end or not.
    pub fn done(&self) -> bool {
        self.position >= self.chars.len()
    }

    /// Get character at the current position, without advancing.
    pub fn curr(&self) -> Option<char> {
        self.chars.get(self.position).map(|(_, ch)| *ch)
    }

    /// Move the position forward and return the character walked through.
    ///
    /// Return `None` if already finished.
    pub fn next(&mut self) -> Option<char> {
        let ch = self.curr()?;
        self.position += 1;
        Some(ch)
    }

    /// Move the position back 1 position.
    pub fn back(&mut self) {
        if self.position == 0 {
            return;
        }
        self.position -= 1;
    }

    /// Byte offset of the current position.
    pub fn offset(&self) -> usize {
        self.chars
            .get(self.position)
            .map_or(self.source.len(), |(offset, _)| *offset)
    }

    /// Get the source text from byte offset `start` to `end`, excluding end.
    ///
    /// The caller must ensure both offsets are on char boundaries.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }
}
