//! Source line accounting for text that may contain placeholders.

use crate::placeholder::take_placeholder_lines;

/// Count the source lines represented by `markdown`.
///
/// Placeholders contribute the line count embedded in their `_L` suffix
/// (every namespace, standalone or in-paragraph). The line breaks right
/// before a standalone placeholder are already covered by that count.
///
/// Line breaks before an in-paragraph placeholder are *not* dropped: they
/// separate ordinary paragraph lines, so `"a\n~~C0I!x_L0$ b"` is two lines. A
/// count that strips them for both kinds of placeholder would return one
/// here, and the `data-lines` of a document would fall short of its source
/// line count whenever a line starts with a cached inline span.
///
/// Leading line breaks fold per the blank-line rule: exactly two contribute
/// one line (a single blank line before a block), any other number
/// contributes nothing. Longer runs are accounted for by the break blocks
/// the paragraph pass emits.
///
/// A block always occupies at least one line.
///
/// # Example
///
/// ```
/// use hookdown_renderer::get_line_count;
///
/// assert_eq!(get_line_count("a\nb\nc"), 3);
/// assert_eq!(get_line_count("\n\nparagraph"), 2);
/// assert_eq!(get_line_count("before\n\n~~C0Iabc_L4$"), 5);
/// ```
#[must_use]
pub fn get_line_count(markdown: &str) -> usize {
    let content = markdown.trim_start_matches('\n');
    let leading = markdown.len() - content.len();
    let folded = usize::from(leading == 2);

    let (cached_lines, rest) = take_placeholder_lines(content);
    let newlines = rest.bytes().filter(|&b| b == b'\n').count();

    folded + cached_lines + newlines + 1
}
