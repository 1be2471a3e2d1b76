//! Mapping between rendered blocks and source lines.
//!
//! Every top-level block the engine emits carries `data-lines="N"`, the
//! number of source lines it represents. Summing those counts in document
//! order gives each block's first source line, which is what an editor needs
//! to keep a source pane and a preview pane scrolled together.

use std::sync::LazyLock;

use regex::Regex;

/// `data-lines` as the first attribute of a block tag the engine emits.
static DATA_LINES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(?:p|pre|h[1-6])(?: data-type="br")? data-lines="(\d+)""#).unwrap()
});

/// One rendered block and the source lines it covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockLines {
    /// Position of the block in the document.
    pub index: usize,
    /// First source line (0-based).
    pub start_line: usize,
    /// Number of source lines.
    pub lines: usize,
}

impl BlockLines {
    /// One past the last source line.
    pub fn end_line(&self) -> usize {
        self.start_line + self.lines
    }
}

/// Where to scroll the preview for a source position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollTarget {
    /// Block index.
    pub block: usize,
    /// Offset inside the block, from 0.0 (top) to 1.0 (bottom).
    pub fraction: f64,
}

/// Per-block source line counts of a rendered document.
///
/// # Example
///
/// ```
/// use hookdown_renderer::LineMap;
///
/// let map = LineMap::from_html(r#"<p data-lines="1">a</p><pre data-lines="4"></pre>"#);
/// assert_eq!(map.total_lines(), 5);
/// assert_eq!(map.locate(3).unwrap().index, 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineMap {
    counts: Vec<usize>,
}

impl LineMap {
    /// Collect line counts from the `data-lines` attributes in `html`.
    ///
    /// Only the attribute in the position the engine writes it, first on a
    /// `<p>`, `<pre>` or `<hN>` tag, is read. Raw HTML in paragraph text that
    /// copies that exact shape is still counted; prefer the counts from
    /// [`RenderResult`](crate::RenderResult) when available.
    pub fn from_html(html: &str) -> Self {
        let counts = DATA_LINES_RE
            .captures_iter(html)
            .filter_map(|caps| caps[1].parse().ok())
            .collect();
        Self { counts }
    }

    /// Build a map from explicit per-block counts.
    pub fn from_counts(counts: Vec<usize>) -> Self {
        Self { counts }
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total source lines covered by all blocks.
    pub fn total_lines(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Blocks in document order with their source ranges.
    pub fn blocks(&self) -> impl Iterator<Item = BlockLines> + '_ {
        self.counts
            .iter()
            .scan(0, |start, &lines| {
                let block = (*start, lines);
                *start += lines;
                Some(block)
            })
            .enumerate()
            .map(|(index, (start_line, lines))| BlockLines {
                index,
                start_line,
                lines,
            })
    }

    /// Block covering the 0-based source `line`.
    ///
    /// Returns `None` past the end of the document.
    pub fn locate(&self, line: usize) -> Option<BlockLines> {
        self.blocks()
            .find(|block| block.start_line <= line && line < block.end_line())
    }

    /// Preview position for a source position.
    ///
    /// `percent` is how far into `line` the source pane is scrolled, clamped
    /// to `0.0..=1.0`. Lines past the end map to the bottom of the last block.
    #[allow(clippy::cast_precision_loss)]
    pub fn scroll_target(&self, line: usize, percent: f64) -> Option<ScrollTarget> {
        let percent = percent.clamp(0.0, 1.0);
        match self.locate(line) {
            Some(block) => Some(ScrollTarget {
                block: block.index,
                fraction: ((line - block.start_line) as f64 + percent) / block.lines as f64,
            }),
            None => self.blocks().last().map(|block| ScrollTarget {
                block: block.index,
                fraction: 1.0,
            }),
        }
    }

    /// Source line for a preview position, the inverse of
    /// [`scroll_target`](Self::scroll_target).
    ///
    /// The result is fractional: the integer part is the 0-based line and the
    /// rest is the offset inside it.
    #[allow(clippy::cast_precision_loss)]
    pub fn source_line(&self, block: usize, fraction: f64) -> Option<f64> {
        let block = self.blocks().nth(block)?;
        Some(block.start_line as f64 + fraction.clamp(0.0, 1.0) * block.lines as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map() -> LineMap {
        LineMap::from_counts(vec![1, 4, 2])
    }

    #[test]
    fn test_from_html_reads_attributes_in_order() {
        let map = LineMap::from_html(
            r#"<h1 data-lines="1">t</h1><p data-type="br" data-lines="3"></p><p data-lines="2">x</p>"#,
        );
        assert_eq!(map, LineMap::from_counts(vec![1, 3, 2]));
    }

    #[test]
    fn test_from_html_ignores_inline_attributes() {
        let map = LineMap::from_html(r#"<p data-lines="1"><b data-lines="9">hi</b></p>"#);
        assert_eq!(map, LineMap::from_counts(vec![1]));
    }

    #[test]
    fn test_from_html_without_blocks() {
        let map = LineMap::from_html("<p>plain</p>");
        assert!(map.is_empty());
        assert_eq!(map.total_lines(), 0);
    }

    #[test]
    fn test_blocks_have_running_start_lines() {
        let starts: Vec<_> = map().blocks().map(|b| (b.start_line, b.lines)).collect();
        assert_eq!(starts, vec![(0, 1), (1, 4), (5, 2)]);
    }

    #[test]
    fn test_locate() {
        let map = map();
        assert_eq!(map.locate(0).unwrap().index, 0);
        assert_eq!(map.locate(1).unwrap().index, 1);
        assert_eq!(map.locate(4).unwrap().index, 1);
        assert_eq!(map.locate(6).unwrap().index, 2);
        assert_eq!(map.locate(7), None);
    }

    #[test]
    fn test_scroll_target_inside_block() {
        let target = map().scroll_target(3, 0.0).unwrap();
        assert_eq!(target.block, 1);
        assert!((target.fraction - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scroll_target_past_end() {
        let target = map().scroll_target(100, 0.3).unwrap();
        assert_eq!(target, ScrollTarget { block: 2, fraction: 1.0 });
    }

    #[test]
    fn test_scroll_target_empty_map() {
        assert_eq!(LineMap::default().scroll_target(0, 0.0), None);
    }

    #[test]
    fn test_source_line_inverts_scroll_target() {
        let map = map();
        let target = map.scroll_target(6, 0.5).unwrap();
        let line = map.source_line(target.block, target.fraction).unwrap();
        assert!((line - 6.5).abs() < 1e-9);
        assert_eq!(map.source_line(9, 0.0), None);
    }
}
