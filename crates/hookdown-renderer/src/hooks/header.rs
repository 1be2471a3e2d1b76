//! ATX headings.

use regex::Captures;

use crate::cache::CachedRegion;
use crate::error::RenderError;
use crate::hook::{Hook, HookType, ParagraphHook, Rule, SentencePass};
use crate::namespace::NamespaceAllocator;

/// Renders `# Title` through `###### Title` as `<hN data-lines="…">`.
///
/// Heading text goes through the sentence pass. An optional closing run of
/// `#` is dropped. Blank lines right before the heading are included in its
/// line count.
pub struct Header {
    rule: Rule,
    region: CachedRegion,
}

impl Header {
    /// Hook name.
    pub const NAME: &'static str = "header";

    /// Create the hook.
    pub fn new(namespaces: &dyn NamespaceAllocator) -> Result<Self, RenderError> {
        let rule = Rule::new(
            Self::NAME,
            r"(?m)(\A|\n)(\n*)",
            r"(#{1,6})[ \t]+([^\n]*?)",
            r"(?:[ \t]+#+)?[ \t]*$",
        )?;
        Ok(Self {
            rule,
            region: CachedRegion::new(namespaces),
        })
    }
}

impl Hook for Header {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn hook_type(&self) -> HookType {
        HookType::Paragraph
    }
}

impl ParagraphHook for Header {
    fn make_html(&mut self, markdown: &str, sentence: &SentencePass<'_>) -> String {
        let Self { rule, region } = self;
        rule.reg
            .replace_all(markdown, |caps: &Captures<'_>| {
                let line_break = &caps[1];
                let blank_lines = &caps[2];
                let level = caps[3].len();
                let lines = 1 + blank_lines.len();
                let html = format!(
                    r#"<h{level} data-lines="{lines}">{}</h{level}>"#,
                    sentence.make_html(&caps[4])
                );
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

    fn render(md: &str) -> String {
        let mut hook = Header::new(&SequentialNamespaces::default()).unwrap();
        let cached = hook.make_html(md, &SentencePass::empty());
        hook.after_make_html(cached)
    }

    #[test]
    fn test_levels() {
        assert_eq!(render("# One"), r#"<h1 data-lines="1">One</h1>"#);
        assert_eq!(render("###### Six"), r#"<h6 data-lines="1">Six</h6>"#);
    }

    #[test]
    fn test_seven_hashes_is_not_a_heading() {
        assert_eq!(render("####### Seven"), "####### Seven");
    }

    #[test]
    fn test_requires_space_after_hashes() {
        assert_eq!(render("#tag"), "#tag");
    }

    #[test]
    fn test_closing_hashes_dropped() {
        assert_eq!(render("## Title ##"), r#"<h2 data-lines="1">Title</h2>"#);
    }

    #[test]
    fn test_blank_lines_before_heading_counted() {
        assert_eq!(
            render("text\n\n# Title"),
            "text\n\n<h1 data-lines=\"2\">Title</h1>"
        );
    }

    #[test]
    fn test_text_goes_through_sentence_pass() {
        use crate::hook::SentenceHook;
        use crate::hooks::BackgroundColor;

        let hooks: Vec<Box<dyn SentenceHook>> = vec![Box::new(BackgroundColor::new().unwrap())];
        let mut hook = Header::new(&SequentialNamespaces::default()).unwrap();
        let cached = hook.make_html("# !!!red hot!!!", &SentencePass::new(&hooks));
        assert_eq!(
            hook.after_make_html(cached),
            r#"<h1 data-lines="1"><span style="background-color:red">hot</span></h1>"#
        );
    }
}
