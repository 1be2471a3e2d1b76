//! Paragraphs and blank-line runs.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::hook::{Hook, HookType, ParagraphHook, SentencePass};
use crate::line_count::get_line_count;
use crate::placeholder::{Placeholder, make_excluding_cached, split_html_by_cache};

/// Run of line breaks followed by consecutive non-blank lines.
static CHUNK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\n*)([^\n]+(?:\n[^\n]+)*)").unwrap());

/// Wraps everything outside standalone placeholders in `<p>` blocks.
///
/// Runs last among block hooks. Consecutive non-blank lines form one
/// paragraph, rendered through the sentence pass with soft breaks as `<br>`.
/// One blank line before a paragraph is folded into its line count; longer
/// runs become a `<p data-type="br">` block carrying the extra lines, so the
/// `data-lines` of all blocks add up to the source line count.
///
/// Since this pass sees every top-level block, it also records their line
/// counts, standalone placeholders included (see
/// [`block_lines`](ParagraphHook::block_lines)).
#[derive(Debug, Default)]
pub struct Paragraph {
    blocks: Vec<usize>,
}

impl Paragraph {
    /// Hook name.
    pub const NAME: &'static str = "paragraph";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn render_segment(
        segment: &str,
        sentence: &SentencePass<'_>,
        blocks: &mut Vec<usize>,
    ) -> String {
        // Each segment follows a line break: the end of the previous block or
        // the start of the document.
        let text = format!("\n{segment}");
        let mut html = String::with_capacity(text.len());
        for caps in CHUNK_RE.captures_iter(&text) {
            let breaks = caps[1].len();
            if breaks > 2 {
                write!(html, r#"<p data-type="br" data-lines="{}"></p>"#, breaks - 1).unwrap();
                blocks.push(breaks - 1);
            }
            let lines = get_line_count(&caps[0]);
            let body = sentence.make_html(&caps[2]).replace('\n', "<br>");
            write!(html, r#"<p data-lines="{lines}">{body}</p>"#).unwrap();
            blocks.push(lines);
        }
        html
    }
}

impl Hook for Paragraph {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn hook_type(&self) -> HookType {
        HookType::Paragraph
    }
}

impl ParagraphHook for Paragraph {
    fn make_html(&mut self, markdown: &str, sentence: &SentencePass<'_>) -> String {
        let cached_lines: Vec<usize> = split_html_by_cache(markdown)
            .caches
            .iter()
            .map(|token| Placeholder::parse(token.trim()).map_or(0, |p| p.line_count))
            .collect();

        let blocks = &mut self.blocks;
        blocks.clear();
        let mut segment_idx = 0;
        make_excluding_cached(markdown, |segment| {
            let html = Self::render_segment(segment, sentence, blocks);
            // The placeholder following this segment, if any.
            if let Some(&lines) = cached_lines.get(segment_idx) {
                blocks.push(lines);
            }
            segment_idx += 1;
            html
        })
    }

    fn block_lines(&self) -> Option<&[usize]> {
        Some(&self.blocks)
    }
}
