//! Inline code spans.

use regex::Captures;

use crate::cache::CachedRegion;
use crate::error::RenderError;
use crate::escape::escape_html;
use crate::hook::{Hook, HookType, ParagraphHook, Rule, SentencePass};
use crate::namespace::NamespaceAllocator;

/// Protects `` `code` `` spans from inline hooks.
///
/// Runs as a document pass ahead of paragraphs so the span content never
/// reaches sentence hooks, and leaves an in-paragraph placeholder behind that
/// the paragraph pass keeps inside running text.
pub struct InlineCode {
    rule: Rule,
    region: CachedRegion,
}

impl InlineCode {
    /// Hook name.
    pub const NAME: &'static str = "inlineCode";

    /// Create the hook.
    pub fn new(namespaces: &dyn NamespaceAllocator) -> Result<Self, RenderError> {
        Ok(Self {
            rule: Rule::new(Self::NAME, "`", r"([^`\n]+)", "`")?,
            region: CachedRegion::new(namespaces),
        })
    }
}

impl Hook for InlineCode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn hook_type(&self) -> HookType {
        HookType::Paragraph
    }
}

impl ParagraphHook for InlineCode {
    fn make_html(&mut self, markdown: &str, _sentence: &SentencePass<'_>) -> String {
        let Self { rule, region } = self;
        rule.reg
            .replace_all(markdown, |caps: &Captures<'_>| {
                let html = format!("<code>{}</code>", escape_html(&caps[1]));
                region
                    .push_in_paragraph(html.as_str(), None, 0)
                    .unwrap_or(html)
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
    use crate::placeholder::Placeholder;
    use pretty_assertions::assert_eq;

    fn hook() -> InlineCode {
        InlineCode::new(&SequentialNamespaces::starting_at(4)).unwrap()
    }

    #[test]
    fn test_span_becomes_in_paragraph_placeholder() {
        let mut hook = hook();
        let out = hook.make_html("call `f()` now", &SentencePass::empty());
        let token = out
            .strip_prefix("call ")
            .and_then(|rest| rest.strip_suffix(" now"))
            .unwrap();
        let placeholder = Placeholder::parse(token).unwrap();
        assert_eq!(placeholder.namespace, 4);
        assert!(placeholder.in_paragraph);
        assert_eq!(placeholder.line_count, 0);
    }

    #[test]
    fn test_round_trip_escapes() {
        let mut hook = hook();
        let cached = hook.make_html("a `<b>` c", &SentencePass::empty());
        assert_eq!(hook.after_make_html(cached), "a <code>&lt;b&gt;</code> c");
    }

    #[test]
    fn test_span_does_not_cross_lines() {
        let mut hook = hook();
        let md = "a `b\nc` d";
        assert_eq!(hook.make_html(md, &SentencePass::empty()), md);
    }
}
