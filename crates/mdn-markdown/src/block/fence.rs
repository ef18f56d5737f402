//! Line classification for base-grammar runs.
//!
//! Block parsers must not open inside a fenced code block or inside list
//! item content, and parsers that cannot interrupt a paragraph must not open
//! while one is in progress. The tracker follows just enough of the base
//! grammar to answer these questions line by line.

use super::reader::{indentation, is_blank};

/// Tracks fence and paragraph state across the lines of a run.
///
/// Code fences use backticks or tildes (three or more). The closing fence must
/// use the same character and be at least as long as the opening fence.
#[derive(Debug, Default)]
pub(crate) struct LineTracker {
    /// Character used for the current fence (backtick or tilde).
    fence_char: Option<char>,
    /// Length of the opening fence (minimum length for closing).
    fence_len: usize,
    /// Last line was paragraph text.
    paragraph: bool,
    /// Content column of the most recent list item still open.
    list_content: Option<usize>,
}

impl LineTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Check if currently inside a fenced code block.
    pub(crate) fn in_fence(&self) -> bool {
        self.fence_char.is_some()
    }

    /// Check if the last line left a paragraph open.
    pub(crate) fn in_paragraph(&self) -> bool {
        self.paragraph
    }

    /// Check if `line` is indented into the content of an open list item.
    pub(crate) fn in_list_item(&self, line: &str) -> bool {
        let (columns, _) = indentation(line);
        self.list_content.is_some_and(|content| columns >= content)
    }

    /// Update state with the next line of the run.
    pub(crate) fn update(&mut self, line: &str) {
        let trimmed = line.trim_start();

        if let Some(fence_char) = self.fence_char {
            if is_fence_line(trimmed, fence_char, self.fence_len) {
                self.fence_char = None;
                self.fence_len = 0;
            }
            return;
        }

        if is_blank(line) {
            self.paragraph = false;
            return;
        }

        let (columns, _) = indentation(line);
        // A lazy continuation line keeps the item open.
        if !self.paragraph
            && !self.in_list_item(line)
            && (is_thematic_break(trimmed) || list_item_content(line).is_none())
        {
            self.list_content = None;
        }
        let relative = match self.list_content {
            Some(content) if columns >= content => columns - content,
            _ => columns,
        };
        if relative >= 4 {
            // Indented code, or a lazy continuation of the open paragraph.
            return;
        }

        if let Some((ch, len)) = detect_fence(trimmed) {
            self.fence_char = Some(ch);
            self.fence_len = len;
            self.paragraph = false;
        } else if is_atx_heading(trimmed)
            || is_thematic_break(trimmed)
            || (self.paragraph && is_setext_underline(trimmed))
        {
            self.paragraph = false;
        } else if let Some(content) = list_item_content(line) {
            self.list_content = Some(content);
            self.paragraph = true;
        } else {
            self.paragraph = true;
        }
    }
}

/// Whether `line` continues an open paragraph instead of starting a block.
pub(crate) fn continues_paragraph(line: &str) -> bool {
    if is_blank(line) {
        return false;
    }
    let (columns, _) = indentation(line);
    if columns >= 4 {
        return true;
    }
    let trimmed = line.trim_start();
    detect_fence(trimmed).is_none()
        && !is_atx_heading(trimmed)
        && !is_thematic_break(trimmed)
        && list_marker_width(trimmed).is_none()
}

/// Content column of the list item `line` starts, if it starts one.
fn list_item_content(line: &str) -> Option<usize> {
    let (columns, indent) = indentation(line);
    let rest = &line[indent..];
    let width = list_marker_width(rest)?;
    let after = &rest[width..];
    let spaces = after.bytes().take_while(|&b| b == b' ').count();
    let padding = if spaces == 0 || spaces > 4 || is_blank(after) {
        1
    } else {
        spaces
    };
    Some(columns + width + padding)
}

/// Width of a `-`, `*`, `+`, `1.` or `1)` list marker at the start of `text`.
fn list_marker_width(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let width = match bytes.first()? {
        b'-' | b'*' | b'+' => 1,
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > 9 || !matches!(bytes.get(digits), Some(b'.' | b')')) {
                return None;
            }
            digits + 1
        }
        _ => return None,
    };
    bytes
        .get(width)
        .is_none_or(u8::is_ascii_whitespace)
        .then_some(width)
}

/// Detect if a line starts a code fence.
///
/// Returns the fence character and length if found.
fn detect_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    if count < 3 {
        return None;
    }
    // Backtick fence info strings cannot contain backticks.
    if first == '`' && trimmed[count..].contains('`') {
        return None;
    }
    Some((first, count))
}

/// Check if a line is a valid closing fence.
fn is_fence_line(trimmed: &str, expected_char: char, min_len: usize) -> bool {
    let count = trimmed.chars().take_while(|&c| c == expected_char).count();
    count > 0 && count >= min_len && trimmed[count..].trim().is_empty()
}

fn is_atx_heading(trimmed: &str) -> bool {
    let hashes = trimmed.bytes().take_while(|&b| b == b'#').count();
    (1..=6).contains(&hashes)
        && trimmed[hashes..]
            .chars()
            .next()
            .is_none_or(char::is_whitespace)
}

fn is_thematic_break(trimmed: &str) -> bool {
    let Some(marker) = trimmed.chars().next() else {
        return false;
    };
    if !matches!(marker, '*' | '-' | '_') {
        return false;
    }
    let mut count = 0;
    for c in trimmed.trim_end().chars() {
        if c == marker {
            count += 1;
        } else if c != ' ' && c != '\t' {
            return false;
        }
    }
    count >= 3
}

fn is_setext_underline(trimmed: &str) -> bool {
    let line = trimmed.trim_end();
    !line.is_empty() && (line.bytes().all(|b| b == b'=') || line.bytes().all(|b| b == b'-'))
}
