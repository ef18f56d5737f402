//! Line-oriented cursor over the source document.

/// Saved reader position, see [`BlockReader::checkpoint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    position: usize,
    line_number: usize,
}

impl Checkpoint {
    /// Byte offset saved by this checkpoint.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Cursor handed to block parsers.
///
/// The cursor is always inside a line. [`peek_line`](Self::peek_line) returns
/// the rest of that line including its newline, so a parser that opens a block
/// mid-line sees only the text after the current position.
#[derive(Debug)]
pub struct BlockReader<'a> {
    source: &'a str,
    position: usize,
    line_number: usize,
}

impl<'a> BlockReader<'a> {
    /// Create a reader positioned at the start of `source`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line_number: 0,
        }
    }

    /// Whole source document.
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Current byte offset.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Zero-based number of the current line.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Byte offset of the current position relative to the start of its line.
    #[must_use]
    pub fn line_offset(&self) -> usize {
        let line_start = self.source[..self.position]
            .rfind('\n')
            .map_or(0, |i| i + 1);
        self.position - line_start
    }

    /// True once every byte has been consumed.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Rest of the current line, including the trailing newline if any.
    #[must_use]
    pub fn peek_line(&self) -> Option<&'a str> {
        if self.is_eof() {
            return None;
        }
        Some(&self.source[self.position..self.line_end()])
    }

    /// Move forward by `n` bytes, clamped to the end of the source.
    ///
    /// `n` must land on a character boundary.
    pub fn advance(&mut self, n: usize) {
        let target = (self.position + n).min(self.source.len());
        self.line_number += self.source[self.position..target]
            .bytes()
            .filter(|&b| b == b'\n')
            .count();
        self.position = target;
    }

    /// Move to the start of the next line.
    pub fn advance_line(&mut self) {
        let end = self.line_end();
        self.advance(end - self.position);
    }

    /// Save the current position.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.position,
            line_number: self.line_number,
        }
    }

    /// Return to a saved position.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.position;
        self.line_number = checkpoint.line_number;
    }

    fn line_end(&self) -> usize {
        self.source[self.position..]
            .find('\n')
            .map_or(self.source.len(), |i| self.position + i + 1)
    }
}

/// Leading indentation of `line` as `(columns, bytes)`.
///
/// Tabs advance to the next multiple of four columns.
#[must_use]
pub fn indentation(line: &str) -> (usize, usize) {
    let mut columns = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        match b {
            b' ' => columns += 1,
            b'\t' => columns += 4 - columns % 4,
            _ => break,
        }
        bytes += 1;
    }
    (columns, bytes)
}

/// True if the line holds nothing but whitespace.
#[must_use]
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
