//! Render pipeline tying hooks together.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::RenderError;
use crate::hook::{ParagraphHook, SentenceHook, SentencePass};
use crate::hooks::{BackgroundColor, CodeBlock, Header, InlineCode, Paragraph};
use crate::line_map::LineMap;
use crate::namespace::{GlobalNamespaces, NamespaceAllocator};

/// A closed fenced code block (group 1), shaped as [`CodeBlock`] matches it,
/// or a whitespace-only line.
static WHITESPACE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^```[^\n]*\n(?:[\s\S]*?\n)?```[ \t]*$)|^[ \t]+$").unwrap()
});

/// Options selecting and configuring the built-in hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    /// Register the `!!!color text!!!` sentence hook.
    pub background_color: bool,
    /// Register the inline code hook.
    pub inline_code: bool,
    /// Warn once per render when restores miss cached fragments.
    pub report_cache_misses: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            background_color: true,
            inline_code: true,
            report_cache_misses: false,
        }
    }
}

impl EngineOptions {
    /// Register the background color hook (default: enabled).
    #[must_use]
    pub fn with_background_color(mut self, enabled: bool) -> Self {
        self.background_color = enabled;
        self
    }

    /// Register the inline code hook (default: enabled).
    ///
    /// Without it, backticks are plain paragraph text.
    #[must_use]
    pub fn with_inline_code(mut self, enabled: bool) -> Self {
        self.inline_code = enabled;
        self
    }

    /// Warn once per render when placeholders restore without a cached
    /// fragment (default: disabled).
    #[must_use]
    pub fn with_cache_miss_report(mut self, enabled: bool) -> Self {
        self.report_cache_misses = enabled;
        self
    }
}

/// Result of rendering a document.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Source lines per top-level block of `html`.
    pub line_map: LineMap,
    /// Placeholders restored as empty during this render.
    pub cache_misses: usize,
}

/// Markdown to HTML pipeline.
///
/// Block hooks run in registration order, then restore in reverse order so a
/// fragment that embeds another hook's placeholder is restored before that
/// hook's own restore runs. Sentence hooks are handed to block hooks through
/// a [`SentencePass`].
///
/// An engine is meant to live as long as its document and render it
/// repeatedly; renders of one engine must not interleave.
///
/// # Example
///
/// ```
/// use hookdown_renderer::{Engine, EngineOptions};
///
/// let mut engine = Engine::new(EngineOptions::default()).unwrap();
/// let result = engine.render("# Title\n\nSome `code`.");
/// assert_eq!(
///     result.html,
///     r#"<h1 data-lines="1">Title</h1><p data-lines="2">Some <code>code</code>.</p>"#
/// );
/// assert_eq!(result.line_map.total_lines(), 3);
/// ```
pub struct Engine {
    options: EngineOptions,
    paragraph_hooks: Vec<Box<dyn ParagraphHook>>,
    sentence_hooks: Vec<Box<dyn SentenceHook>>,
    reported_misses: usize,
}

impl Engine {
    /// Create an engine with the built-in hooks, drawing namespaces from the
    /// process-wide counter.
    pub fn new(options: EngineOptions) -> Result<Self, RenderError> {
        Self::with_namespaces(options, &GlobalNamespaces)
    }

    /// Create an engine with the built-in hooks and a custom namespace source.
    pub fn with_namespaces(
        options: EngineOptions,
        namespaces: &dyn NamespaceAllocator,
    ) -> Result<Self, RenderError> {
        let mut engine = Self::empty(options).with_paragraph_hook(CodeBlock::new(namespaces)?);
        if options.inline_code {
            engine = engine.with_paragraph_hook(InlineCode::new(namespaces)?);
        }
        engine = engine
            .with_paragraph_hook(Header::new(namespaces)?)
            .with_paragraph_hook(Paragraph::new());
        if options.background_color {
            engine = engine.with_sentence_hook(BackgroundColor::new()?);
        }
        Ok(engine)
    }

    /// Create an engine without hooks.
    #[must_use]
    pub fn empty(options: EngineOptions) -> Self {
        Self {
            options,
            paragraph_hooks: Vec::new(),
            sentence_hooks: Vec::new(),
            reported_misses: 0,
        }
    }

    /// Register a block hook after the existing ones.
    #[must_use]
    pub fn with_paragraph_hook<H: ParagraphHook + 'static>(mut self, mut hook: H) -> Self {
        hook.mounted();
        tracing::debug!(hook = hook.name(), kind = %hook.hook_type(), "Mounted hook");
        self.paragraph_hooks.push(Box::new(hook));
        self
    }

    /// Register a sentence hook after the existing ones.
    #[must_use]
    pub fn with_sentence_hook<H: SentenceHook + 'static>(mut self, mut hook: H) -> Self {
        hook.mounted();
        tracing::debug!(hook = hook.name(), kind = %hook.hook_type(), "Mounted hook");
        self.sentence_hooks.push(Box::new(hook));
        self
    }

    /// Names of the registered hooks, block hooks first.
    pub fn hook_names(&self) -> Vec<&'static str> {
        self.paragraph_hooks
            .iter()
            .map(|hook| hook.name())
            .chain(self.sentence_hooks.iter().map(|hook| hook.name()))
            .collect()
    }

    /// Render `markdown` to HTML.
    pub fn make_html(&mut self, markdown: &str) -> String {
        let mut html = normalize(markdown);

        let sentence = SentencePass::new(&self.sentence_hooks);
        for hook in &mut self.paragraph_hooks {
            html = hook.make_html(&html, &sentence);
        }
        for hook in self.paragraph_hooks.iter_mut().rev() {
            html = hook.after_make_html(html);
        }

        let total = self.cache_misses();
        let misses = total - self.reported_misses;
        self.reported_misses = total;
        if misses > 0 && self.options.report_cache_misses {
            tracing::warn!(misses, "Placeholders restored without cached fragments");
        }
        html
    }

    /// Render `markdown` and map the result back to source lines.
    ///
    /// Line counts come from the hook laying out top-level blocks, so
    /// `data-lines` attributes typed into raw HTML are not mistaken for
    /// blocks. Without such a hook, the rendered HTML is scanned instead.
    pub fn render(&mut self, markdown: &str) -> RenderResult {
        let before = self.reported_misses;
        let html = self.make_html(markdown);
        let line_map = self
            .paragraph_hooks
            .iter()
            .rev()
            .find_map(|hook| hook.block_lines())
            .map_or_else(
                || LineMap::from_html(&html),
                |counts| LineMap::from_counts(counts.to_vec()),
            );
        RenderResult {
            html,
            line_map,
            cache_misses: self.reported_misses - before,
        }
    }

    /// Cache misses across all renders so far.
    pub fn cache_misses(&mut self) -> usize {
        self.paragraph_hooks
            .iter_mut()
            .filter_map(|hook| hook.cached_region())
            .map(|region| region.cache_misses())
            .sum()
    }
}

/// Unify line endings and empty out whitespace-only lines outside fenced
/// code blocks.
fn normalize(markdown: &str) -> String {
    let unified = markdown.replace("\r\n", "\n");
    WHITESPACE_LINE_RE
        .replace_all(&unified, |caps: &regex::Captures<'_>| {
            caps.get(1).map_or_else(String::new, |fence| fence.as_str().to_owned())
        })
        .into_owned()
}
