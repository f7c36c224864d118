//! Source positions for expression nodes.
//!
//! The parser records one byte offset per node. Diagnostics turn that
//! offset into a 1-based line and column through a [`LineOffsetTable`].

use rustc_hash::FxHashMap;
use std::fmt;

use crate::ExprId;

/// 1-based line and column of a node.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte offset of each line start, for O(log L) offset lookups.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineOffsetTable {
    /// `offsets[0] == 0`; `offsets[n]` is the byte after the n-th newline.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    /// Scan `text` once for newlines.
    pub fn build(text: &str) -> Self {
        let mut offsets = vec![0u32];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                offsets.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        LineOffsetTable { offsets }
    }

    /// 1-based line containing `offset`.
    pub fn line_of(&self, offset: u32) -> u32 {
        let idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(idx).unwrap_or(u32::MAX) + 1
    }

    /// 1-based line and column of `offset`. Columns count characters, not
    /// bytes, when `text` is available.
    pub fn position(&self, text: Option<&str>, offset: u32) -> Position {
        let line = self.line_of(offset);
        let line_start = self.offsets.get((line - 1) as usize).copied().unwrap_or(0);
        let column = match text {
            Some(text) => {
                let start = (line_start as usize).min(text.len());
                let end = (offset as usize).clamp(start, text.len());
                text.get(start..end)
                    .map_or(end - start, |s| s.chars().count())
            }
            None => (offset - line_start) as usize,
        };
        Position {
            line,
            column: u32::try_from(column).unwrap_or(u32::MAX) + 1,
        }
    }

    /// Byte range of the given 1-based line, without its newline.
    pub fn line_range(&self, line: u32, text_len: usize) -> Option<std::ops::Range<usize>> {
        let idx = line.checked_sub(1)? as usize;
        let start = *self.offsets.get(idx)? as usize;
        let end = self
            .offsets
            .get(idx + 1)
            .map_or(text_len, |next| (*next as usize).saturating_sub(1));
        Some(start..end.max(start))
    }
}

/// Where each node of one expression came from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceInfo {
    /// Name shown in diagnostics, e.g. `<input>` or a file path.
    description: String,
    /// Full source text, when the caller still has it.
    text: Option<String>,
    lines: LineOffsetTable,
    offsets: FxHashMap<ExprId, u32>,
}

impl SourceInfo {
    /// Source info for `text`, with no node offsets recorded yet.
    pub fn new(description: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        SourceInfo {
            description: description.into(),
            lines: LineOffsetTable::build(&text),
            text: Some(text),
            offsets: FxHashMap::default(),
        }
    }

    /// Source info without text: every position lookup yields `None`
    /// until offsets are recorded, and columns are byte-based.
    pub fn detached(description: impl Into<String>) -> Self {
        SourceInfo {
            description: description.into(),
            text: None,
            lines: LineOffsetTable::build(""),
            offsets: FxHashMap::default(),
        }
    }

    /// Record the byte offset at which node `id` starts.
    pub fn set_offset(&mut self, id: ExprId, offset: u32) {
        self.offsets.insert(id, offset);
    }

    #[must_use]
    pub fn with_offset(mut self, id: ExprId, offset: u32) -> Self {
        self.set_offset(id, offset);
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn offset(&self, id: ExprId) -> Option<u32> {
        self.offsets.get(&id).copied()
    }

    /// Line and column of node `id`, if its offset is known.
    pub fn position(&self, id: ExprId) -> Option<Position> {
        let offset = self.offset(id)?;
        Some(self.lines.position(self.text(), offset))
    }

    /// Text of the given 1-based line.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let text = self.text()?;
        let range = self.lines.line_range(line, text.len())?;
        text.get(range)
    }
}

#[cfg(test)]
mod tests;
