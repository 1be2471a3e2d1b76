//! Fenced code blocks.

use std::fmt::Write;

use regex::Captures;

use crate::cache::CachedRegion;
use crate::error::RenderError;
use crate::escape::escape_html;
use crate::hook::{Hook, HookType, ParagraphHook, Rule, SentencePass};
use crate::namespace::NamespaceAllocator;

/// Block hook rendering fenced code blocks behind standalone placeholders.
///
/// ````markdown
/// ```rust
/// fn main() {}
/// ```
/// ````
///
/// renders as `<pre data-lines="3"><code class="language-rust">…</code></pre>`.
/// The body is HTML-escaped and never reaches later hooks. The line count
/// covers the fence lines, the body and any blank lines right before the
/// block.
pub struct CodeBlock {
    rule: Rule,
    region: CachedRegion,
}

impl CodeBlock {
    /// Hook name.
    pub const NAME: &'static str = "codeBlock";

    /// Create the hook.
    pub fn new(namespaces: &dyn NamespaceAllocator) -> Result<Self, RenderError> {
        let rule = Rule::new(
            Self::NAME,
            r"(?m)(\A|\n)(\n*)```",
            r"[ \t]*([\w+#.-]*)[^\n]*\n((?:[\s\S]*?\n)?)",
            r"```[ \t]*$",
        )?;
        Ok(Self {
            rule,
            region: CachedRegion::new(namespaces),
        })
    }

    fn render_block(language: &str, body: &str, lines: usize) -> String {
        let mut html = format!(r#"<pre data-lines="{lines}"><code"#);
        if !language.is_empty() {
            write!(html, r#" class="language-{}""#, escape_html(language)).unwrap();
        }
        html.push('>');
        html.push_str(&escape_html(body.strip_suffix('\n').unwrap_or(body)));
        html.push_str("</code></pre>");
        html
    }
}

impl Hook for CodeBlock {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn hook_type(&self) -> HookType {
        HookType::Paragraph
    }
}

impl ParagraphHook for CodeBlock {
    fn make_html(&mut self, markdown: &str, _sentence: &SentencePass<'_>) -> String {
        let Self { rule, region } = self;
        rule.reg
            .replace_all(markdown, |caps: &Captures<'_>| {
                let line_break = &caps[1];
                let blank_lines = &caps[2];
                let block = &caps[0][line_break.len() + blank_lines.len()..];
                let lines = block.matches('\n').count() + 1 + blank_lines.len();

                let html = Self::render_block(&caps[3], &caps[4], lines);
                let token = region.push_cache(html.as_str(), None, lines).unwrap_or(html);
                format!("{line_break}{blank_lines}{token}")
            })
            .into_owned()
    }

    fn cached_region(&mut self) -> Option<&mut CachedRegion> {
        Some(&mut self.region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::SequentialNamespaces;
    use pretty_assertions::assert_eq;

    fn hook() -> CodeBlock {
        CodeBlock::new(&SequentialNamespaces::starting_at(0)).unwrap()
    }

    fn render(hook: &mut CodeBlock, md: &str) -> String {
        let cached = hook.make_html(md, &SentencePass::empty());
        hook.after_make_html(cached)
    }

    #[test]
    fn test_block_becomes_placeholder() {
        let mut hook = hook();
        let out = hook.make_html("```rust\nlet x = 1;\n```", &SentencePass::empty());
        assert!(out.starts_with("~~C0I"));
        assert!(out.ends_with("_L3$"));
    }

    #[test]
    fn test_round_trip_with_language() {
        let mut hook = hook();
        assert_eq!(
            render(&mut hook, "```rust\nlet x = 1;\n```"),
            r#"<pre data-lines="3"><code class="language-rust">let x = 1;</code></pre>"#
        );
    }

    #[test]
    fn test_body_is_escaped() {
        let mut hook = hook();
        assert_eq!(
            render(&mut hook, "```\n<b>&</b>\n```"),
            r#"<pre data-lines="3"><code>&lt;b&gt;&amp;&lt;/b&gt;</code></pre>"#
        );
    }

    #[test]
    fn test_empty_block() {
        let mut hook = hook();
        assert_eq!(
            render(&mut hook, "```\n```"),
            r#"<pre data-lines="2"><code></code></pre>"#
        );
    }

    #[test]
    fn test_blank_lines_before_block_are_counted() {
        let mut hook = hook();
        let out = hook.make_html("text\n\n\n```\ncode\n```\nafter", &SentencePass::empty());
        // One line break ends "text", two blank lines precede the fence.
        assert!(out.starts_with("text\n\n\n~~C0I"));
        assert!(out.contains("_L5$\nafter"));
    }

    #[test]
    fn test_surrounding_text_kept() {
        let mut hook = hook();
        let out = render(&mut hook, "before\n```\nx\n```\nafter");
        assert_eq!(
            out,
            "before\n<pre data-lines=\"3\"><code>x</code></pre>\nafter"
        );
    }

    #[test]
    fn test_unclosed_fence_untouched() {
        let mut hook = hook();
        let md = "```\nno closing fence";
        assert_eq!(render(&mut hook, md), md);
    }
}
