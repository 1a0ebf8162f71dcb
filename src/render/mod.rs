//! Rendering module - turns content bodies into safe, highlighted HTML

mod document;
mod highlighter;
mod markdown;

pub use document::{CodeBlock, CodeStatus, Heading, PlainReason, RenderedDocument};
pub use highlighter::{HighlightEngine, HighlightError, Highlighter};
pub use markdown::MarkdownRenderer;
