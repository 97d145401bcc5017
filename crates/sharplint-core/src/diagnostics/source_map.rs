//! Byte offset to line/column mapping

use rowan::{TextRange, TextSize};
use std::path::{Path, PathBuf};

use super::Location;

/// Pre-computed line starts for one source text
///
/// Lookups are O(log lines). Columns count characters, not bytes, so they
/// match what an editor shows.
#[derive(Debug, Clone)]
pub struct SourceMap {
    file: PathBuf,
    source: String,
    /// Cumulative byte offsets for each line start (line 0, line 1, ...)
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(file: impl Into<PathBuf>, source: &str) -> Self {
        let mut line_starts = vec![0];
        for (idx, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(idx + 1);
            }
        }
        Self {
            file: file.into(),
            source: source.to_string(),
            line_starts,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// 0-based line index containing `offset`
    pub fn line_index(&self, offset: TextSize) -> usize {
        let offset = usize::from(offset);
        match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }

    /// Convert byte offset to 1-based `(line, column)`
    pub fn offset_to_position(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let line_idx = self.line_index(TextSize::from(offset as u32));
        let line_start = self.line_starts[line_idx];
        let column = self
            .source
            .get(line_start..offset)
            .map(|text| text.chars().count())
            .unwrap_or(offset - line_start)
            + 1;
        (line_idx + 1, column)
    }

    /// Full location for a text range
    pub fn location(&self, range: TextRange) -> Location {
        let start = usize::from(range.start());
        let end = usize::from(range.end());
        let (line, column) = self.offset_to_position(start);
        let (end_line, end_column) = self.offset_to_position(end);
        Location {
            file: self.file.clone(),
            line,
            column,
            end_line,
            end_column,
            offset: start,
            length: end - start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_one_based() {
        let map = SourceMap::new("a.cs", "class C\n{\n  int x;\n}");
        assert_eq!(map.offset_to_position(0), (1, 1));
        assert_eq!(map.offset_to_position(8), (2, 1));
        assert_eq!(map.offset_to_position(12), (3, 3));
    }

    #[test]
    fn columns_count_characters() {
        let map = SourceMap::new("a.cs", "// é\nx");
        assert_eq!(map.offset_to_position(5), (1, 5));
        assert_eq!(map.offset_to_position(6), (2, 1));
    }

    #[test]
    fn location_of_empty_range() {
        let map = SourceMap::new("a.cs", "new Foo { }");
        let location = map.location(TextRange::empty(TextSize::from(7)));
        assert_eq!(location.length, 0);
        assert_eq!((location.line, location.column), (1, 8));
        assert_eq!(location.range(), TextRange::empty(TextSize::from(7)));
    }
}
