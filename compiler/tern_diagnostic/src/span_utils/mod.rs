//! Line and column lookup for rendering spans.

/// Start offsets of every line in one source text.
///
/// Rendering asks for the line of a span boundary many times per message;
/// the table answers with a binary search over line starts.
///
/// ```
/// use tern_diagnostic::span_utils::LineOffsetTable;
///
/// let source = "line1\nline2\nline3";
/// let table = LineOffsetTable::build(source);
///
/// assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
/// assert_eq!(table.offset_to_line_col(source, 6), (2, 1));
/// assert_eq!(table.offset_to_line_col(source, 14), (3, 3));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// `starts[n]` is the byte offset where line `n + 1` begins.
    starts: Vec<u32>,
}

impl LineOffsetTable {
    pub fn build(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(
                source
                    .match_indices('\n')
                    .map(|(newline, _)| u32::try_from(newline + 1).unwrap_or(u32::MAX)),
            )
            .collect();
        LineOffsetTable { starts }
    }

    /// 1-based line containing `offset`. A newline belongs to the line it ends.
    #[inline]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let below = self.starts.partition_point(|&start| start <= offset);
        u32::try_from(below.max(1)).unwrap_or(u32::MAX)
    }

    /// 1-based line and character column of `offset`. Offsets past the end
    /// of `source` clamp to its end.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let start = self.line_start_offset(line).unwrap_or(0) as usize;
        let end = (offset as usize).min(source.len());
        let before = source.get(start..end).unwrap_or_default().chars().count();
        (line, u32::try_from(before).unwrap_or(u32::MAX - 1) + 1)
    }

    /// Where a 1-based line begins.
    pub fn line_start_offset(&self, line: u32) -> Option<u32> {
        if line == 0 {
            return None;
        }
        self.starts.get((line - 1) as usize).copied()
    }

    /// Text of a 1-based line, without its trailing newline.
    pub fn line_text<'s>(&self, source: &'s str, line: u32) -> Option<&'s str> {
        let start = self.line_start_offset(line)? as usize;
        let end = self
            .line_start_offset(line + 1)
            .map_or(source.len(), |next| next as usize - 1);
        source
            .get(start..end)
            .map(|text| text.strip_suffix('\r').unwrap_or(text))
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}

#[cfg(test)]
mod tests;
