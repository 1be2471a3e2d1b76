//! Hook traits: the composable syntax rules of the pipeline.
//!
//! # Architecture
//!
//! Capabilities are split into small traits instead of one base type:
//!
//! - [`Hook`]: identity, [`HookType`] tag and the `mounted` lifecycle call.
//! - [`SentenceHook`]: a compiled [`Rule`] plus a per-match transform. Run
//!   over inline text by a [`SentencePass`].
//! - [`ParagraphHook`]: a block-level pass over the whole document. Hooks
//!   that protect their output embed a [`CachedRegion`] and expose it
//!   through [`cached_region`](ParagraphHook::cached_region); the provided
//!   [`after_make_html`](ParagraphHook::after_make_html) then restores it.

use std::fmt;

use regex::{Captures, Regex};

use crate::cache::CachedRegion;
use crate::error::RenderError;

/// Classification of a hook within the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookType {
    /// Block-level pass over the whole document.
    Paragraph,
    /// Inline pass over paragraph and heading text.
    Sentence,
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Paragraph => "paragraph",
            Self::Sentence => "sentence",
        })
    }
}

/// Compiled matching rule of a hook.
///
/// `reg` is `begin + content + end` compiled as one pattern and always
/// applied globally. Fragment compatibility is not checked: a combination
/// that fails to compile is reported as [`RenderError::InvalidPattern`].
#[derive(Clone, Debug)]
pub struct Rule {
    /// Opening fragment.
    pub begin: String,
    /// Body fragment.
    pub content: String,
    /// Closing fragment.
    pub end: String,
    /// Combined pattern.
    pub reg: Regex,
}

impl Rule {
    /// Compile a rule from its three fragments.
    ///
    /// # Example
    ///
    /// ```
    /// use hookdown_renderer::Rule;
    ///
    /// let rule = Rule::new("bold", r"\*\*", r"(\w+)", r"\*\*").unwrap();
    /// assert_eq!(rule.reg.as_str(), r"\*\*(\w+)\*\*");
    /// ```
    pub fn new(
        hook: &'static str,
        begin: impl Into<String>,
        content: impl Into<String>,
        end: impl Into<String>,
    ) -> Result<Self, RenderError> {
        let begin = begin.into();
        let content = content.into();
        let end = end.into();
        let reg = Regex::new(&format!("{begin}{content}{end}"))
            .map_err(|source| RenderError::InvalidPattern { hook, source })?;
        Ok(Self {
            begin,
            content,
            end,
            reg,
        })
    }
}

/// Collect capture groups from `first` onwards, missing groups as `""`.
pub(crate) fn groups_from<'h>(caps: &Captures<'h>, first: usize) -> Vec<&'h str> {
    (first..caps.len())
        .map(|idx| caps.get(idx).map_or("", |m| m.as_str()))
        .collect()
}

/// Common identity and lifecycle of every hook.
pub trait Hook: Send {
    /// Hook name (e.g., "codeBlock", "bgColor").
    fn name(&self) -> &'static str;

    /// Position of the hook in the pipeline.
    fn hook_type(&self) -> HookType;

    /// Called once when the hook is registered with an engine.
    fn mounted(&mut self) {}
}

/// Inline hook transforming each match of its rule.
///
/// # Example
///
/// ```
/// use hookdown_renderer::{Hook, HookType, Rule, SentenceHook};
///
/// struct Strike(Rule);
///
/// impl Hook for Strike {
///     fn name(&self) -> &'static str { "strike" }
///     fn hook_type(&self) -> HookType { HookType::Sentence }
/// }
///
/// impl SentenceHook for Strike {
///     fn rule(&self) -> &Rule { &self.0 }
///     fn to_html(&self, _whole: &str, groups: &[&str]) -> String {
///         format!("<del>{}</del>", groups[0])
///     }
/// }
///
/// let hook = Strike(Rule::new("strike", "~", r"([^~]+)", "~").unwrap());
/// assert_eq!(hook.make_html("a ~b~ c"), "a <del>b</del> c");
/// ```
pub trait SentenceHook: Hook {
    /// Compiled rule.
    fn rule(&self) -> &Rule;

    /// Transform one match.
    ///
    /// `whole` is the matched text and `groups` its capture groups from
    /// group 1 on, with unmatched groups as empty strings.
    fn to_html(&self, whole: &str, groups: &[&str]) -> String;

    /// Replace every match of the rule in `text`.
    fn make_html(&self, text: &str) -> String {
        self.rule()
            .reg
            .replace_all(text, |caps: &Captures<'_>| {
                self.to_html(&caps[0], &groups_from(caps, 1))
            })
            .into_owned()
    }
}

/// Runs every sentence hook, in order, over inline text.
///
/// Handed to paragraph hooks so they can render the inline content of the
/// blocks they produce.
pub struct SentencePass<'a> {
    hooks: &'a [Box<dyn SentenceHook>],
}

impl<'a> SentencePass<'a> {
    /// Create a pass over `hooks`.
    #[must_use]
    pub fn new(hooks: &'a [Box<dyn SentenceHook>]) -> Self {
        Self { hooks }
    }

    /// Create a pass that leaves text unchanged.
    #[must_use]
    pub fn empty() -> Self {
        Self { hooks: &[] }
    }

    /// Render inline text.
    #[must_use]
    pub fn make_html(&self, text: &str) -> String {
        self.hooks
            .iter()
            .fold(text.to_owned(), |acc, hook| hook.make_html(&acc))
    }
}

/// Block-level hook run once per render over the whole document.
pub trait ParagraphHook: Hook {
    /// Transform the document.
    ///
    /// `sentence` renders inline text for the blocks this hook produces.
    fn make_html(&mut self, markdown: &str, sentence: &SentencePass<'_>) -> String;

    /// Cache protecting this hook's output, if it has one.
    fn cached_region(&mut self) -> Option<&mut CachedRegion> {
        None
    }

    /// Source lines of each top-level block laid out by the last
    /// [`make_html`](Self::make_html), for the hook that decides the
    /// document's block structure.
    fn block_lines(&self) -> Option<&[usize]> {
        None
    }

    /// Post-process the rendered document.
    ///
    /// Restores this hook's placeholders when it has a cached region,
    /// otherwise returns `html` unchanged.
    fn after_make_html(&mut self, html: String) -> String {
        match self.cached_region() {
            Some(region) => region.restore_cache(&html),
            None => html,
        }
    }
}
