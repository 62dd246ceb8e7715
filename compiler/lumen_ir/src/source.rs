//! Named source buffers.
//!
//! A `Source` is the compiler's view of one virtual file: a name and its
//! full text. Line starts are computed once so that diagnostics can turn
//! byte offsets into `line:column` pairs.

use std::fmt;

use crate::Span;

/// One-based line and column of a byte offset.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A named source buffer.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Source {
    name: String,
    text: String,
    /// Byte offset of the first character of every line.
    line_starts: Vec<u32>,
}

impl Source {
    /// Create a source buffer from a name and its full text.
    ///
    /// Spans cannot address bytes past `u32::MAX`, so lines starting there
    /// are not indexed.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                let Ok(next) = u32::try_from(idx + 1) else {
                    break;
                };
                line_starts.push(next);
            }
        }
        Source {
            name: name.into(),
            text,
            line_starts,
        }
    }

    /// The buffer's name (usually a file path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Translate a byte offset into a one-based line and column.
    ///
    /// Offsets past the end clamp to the last line.
    pub fn location(&self, offset: u32) -> Location {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        let line_start = self.line_starts[line_idx];
        #[expect(
            clippy::cast_possible_truncation,
            reason = "line count is bounded by the u32 text length"
        )]
        let line = line_idx as u32 + 1;
        Location {
            line,
            column: offset.saturating_sub(line_start) + 1,
        }
    }

    /// The source text covered by `span`, if it lies within the buffer.
    pub fn snippet(&self, span: Span) -> Option<&str> {
        self.text.get(span.to_range())
    }
}

#[cfg(test)]
mod tests;
