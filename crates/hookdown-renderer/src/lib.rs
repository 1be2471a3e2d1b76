//! Hook-based Markdown to HTML rendering with protected regions.
//!
//! Syntax rules are *hooks*. Block-level hooks render their constructs and
//! hide the result behind placeholder tokens so later passes never re-parse
//! finished HTML; a final restore pass swaps the placeholders back. Every
//! top-level block records how many source lines it came from, which lets an
//! editor keep source and preview in sync.
//!
//! # Architecture
//!
//! - [`Hook`], [`SentenceHook`], [`ParagraphHook`]: hook capabilities.
//! - [`CachedRegion`]: the cache a block hook embeds, one [namespace] each.
//! - [`placeholder`]: token format and the scanning helpers around it.
//! - [`get_line_count`]: source line accounting through placeholders.
//! - [`lookbehind`]: "not preceded by" matching for the `regex` crate.
//! - [`hooks`]: the built-in hooks.
//! - [`Engine`]: runs the hooks; [`LineMap`] maps its output to source lines.
//!
//! [namespace]: NamespaceAllocator
//!
//! # Example
//!
//! ```
//! use hookdown_renderer::{Engine, EngineOptions};
//!
//! let mut engine = Engine::new(EngineOptions::default()).unwrap();
//! let html = engine.make_html("!!!yellow note!!!");
//! assert_eq!(
//!     html,
//!     r#"<p data-lines="1"><span style="background-color:yellow">note</span></p>"#
//! );
//! ```

mod cache;
mod engine;
mod error;
mod escape;
mod hook;
pub mod hooks;
mod line_count;
mod line_map;
pub mod lookbehind;
mod namespace;
pub mod placeholder;

pub use cache::{CachedRegion, content_signature};
pub use engine::{Engine, EngineOptions, RenderResult};
pub use error::RenderError;
pub use escape::escape_html;
pub use hook::{Hook, HookType, ParagraphHook, Rule, SentenceHook, SentencePass};
pub use line_count::get_line_count;
pub use line_map::{BlockLines, LineMap, ScrollTarget};
pub use namespace::{GlobalNamespaces, NamespaceAllocator, SequentialNamespaces};
pub use placeholder::Placeholder;
