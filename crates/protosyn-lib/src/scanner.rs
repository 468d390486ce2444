//! Rune-at-a-time cursor over a source file.
//!
//! The scanner knows nothing about tokens. It hands out characters, lets the
//! lexer back up to a mark, and snapshots its state for arbitrary lookahead.
//! Line starts are recorded as newlines are consumed and rolled back with the
//! position on `restore`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rune {
    /// A character and its UTF-8 length in bytes.
    Char(char, usize),
    Eof,
}

impl Rune {
    pub fn char(self) -> Option<char> {
        match self {
            Rune::Char(c, _) => Some(c),
            Rune::Eof => None,
        }
    }

    pub fn size(self) -> usize {
        match self {
            Rune::Char(_, size) => size,
            Rune::Eof => 0,
        }
    }

    pub fn is(self, expected: char) -> bool {
        self.char() == Some(expected)
    }
}

/// Snapshot taken by [`Scanner::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanState {
    pos: usize,
    mark: usize,
    lines: usize,
    at_eof: bool,
}

#[derive(Debug)]
pub struct Scanner<'s> {
    src: &'s str,
    pos: usize,
    mark: usize,
    /// Offsets of line starts consumed since the last `take_lines`.
    lines: Vec<usize>,
    /// The last read hit the end of input.
    at_eof: bool,
}

impl<'s> Scanner<'s> {
    pub fn new(src: &'s str) -> Self {
        Self {
            src,
            pos: 0,
            mark: 0,
            lines: Vec::new(),
            at_eof: false,
        }
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn source(&self) -> &'s str {
        self.src
    }

    pub fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub fn read_rune(&mut self) -> Rune {
        let Some(c) = self.rest().chars().next() else {
            self.at_eof = true;
            return Rune::Eof;
        };
        let size = c.len_utf8();
        self.pos += size;
        if c == '\n' {
            self.lines.push(self.pos);
        }
        Rune::Char(c, size)
    }

    pub fn peek_rune(&self) -> Rune {
        match self.rest().chars().next() {
            Some(c) => Rune::Char(c, c.len_utf8()),
            None => Rune::Eof,
        }
    }

    /// Steps back over a rune returned by `read_rune`. Un-reading end of input
    /// (size 0) is a no-op.
    pub fn unread_rune(&mut self, size: usize) {
        if size == 0 {
            self.at_eof = false;
            return;
        }
        assert!(
            self.pos >= self.mark + size,
            "Scanner: unread of {size} bytes at {} crosses the mark at {}",
            self.pos,
            self.mark
        );
        self.pos -= size;
        if self.lines.last() == Some(&(self.pos + 1)) && self.src.as_bytes()[self.pos] == b'\n' {
            self.lines.pop();
        }
    }

    /// Consumes `len` bytes, recording any newlines inside them.
    pub fn advance(&mut self, len: usize) {
        let end = self.pos + len;
        for (i, b) in self.src.as_bytes()[self.pos..end].iter().enumerate() {
            if *b == b'\n' {
                self.lines.push(self.pos + i + 1);
            }
        }
        self.pos = end;
    }

    pub fn set_mark(&mut self) {
        self.mark = self.pos;
    }

    pub fn mark(&self) -> usize {
        self.mark
    }

    /// Text from the mark to the cursor.
    pub fn marked_text(&self) -> &'s str {
        &self.src[self.mark..self.pos]
    }

    pub fn save(&self) -> ScanState {
        ScanState {
            pos: self.pos,
            mark: self.mark,
            lines: self.lines.len(),
            at_eof: self.at_eof,
        }
    }

    pub fn restore(&mut self, state: ScanState) {
        self.pos = state.pos;
        self.mark = state.mark;
        self.lines.truncate(state.lines);
        self.at_eof = state.at_eof;
    }

    /// Line starts recorded since the previous call.
    pub fn take_lines(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.lines)
    }
}
