//! Built-in hooks.
//!
//! Block hooks, in pipeline order: [`CodeBlock`], [`InlineCode`], [`Header`],
//! [`Paragraph`]. [`BackgroundColor`] is a sentence hook.

mod background_color;
mod code_block;
mod header;
mod inline_code;
mod paragraph;

pub use background_color::BackgroundColor;
pub use code_block::CodeBlock;
pub use header::Header;
pub use inline_code::InlineCode;
pub use paragraph::Paragraph;
