//! HTML escaping for code content.

/// Escape HTML special characters.
///
/// # Example
///
/// ```
/// use hookdown_renderer::escape_html;
///
/// assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
/// ```
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_passthrough() {
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_escape_html_specials() {
        assert_eq!(escape_html("a < b && c > \"d\""), "a &lt; b &amp;&amp; c &gt; &quot;d&quot;");
    }

    #[test]
    fn test_escape_html_keeps_placeholder_sigil() {
        assert_eq!(escape_html("~~C0Ix_L1$"), "~~C0Ix_L1$");
    }
}
