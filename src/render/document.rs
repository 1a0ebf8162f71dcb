//! Rendered document model

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r#"<pre data-code-block="(\d+)"></pre>"#).unwrap();
}

/// Marker left in the document body where a code block is spliced in
pub(crate) fn placeholder(index: usize) -> String {
    format!("<pre data-code-block=\"{}\"></pre>\n", index)
}

/// Output of the rendering pipeline
///
/// `body` is sanitized, anchor-annotated and restyled HTML in which each code
/// block is a placeholder; `code_blocks` holds their rendered fragments.
#[derive(Debug, Clone, Default)]
pub struct RenderedDocument {
    pub body: String,
    pub headings: Vec<Heading>,
    pub code_blocks: Vec<CodeBlock>,
}

impl RenderedDocument {
    /// Final HTML with every code block in place
    pub fn to_html(&self) -> String {
        PLACEHOLDER
            .replace_all(&self.body, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.code_blocks.get(index))
                    .map(|block| block.html.clone())
                    .unwrap_or_default()
            })
            .into_owned()
    }

    /// Whether any code block fell back because the engine was still loading
    pub fn awaits_highlighter(&self) -> bool {
        self.code_blocks
            .iter()
            .any(|block| block.status == CodeStatus::Plain(PlainReason::EngineNotReady))
    }
}

/// A heading and the anchor id assigned to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub id: String,
    pub text: String,
}

/// One fenced or indented code block
#[derive(Debug, Clone)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub source: String,
    pub html: String,
    pub status: CodeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeStatus {
    Highlighted,
    Plain(PlainReason),
}

/// Why a code block was rendered without highlighting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlainReason {
    NoLanguage,
    UnknownLanguage,
    EngineNotReady,
    Failed(String),
}
