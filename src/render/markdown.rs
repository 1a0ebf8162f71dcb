//! Markdown rendering pipeline
//!
//! Stages run in a fixed order:
//!
//! 1. parse GitHub-flavored markdown, setting code blocks aside
//! 2. admit inline raw HTML as markup
//! 3. sanitize the whole document with ammonia
//! 4. give every heading a stable anchor id
//! 5. highlight code blocks with the shared engine
//! 6. annotate tables, block quotes and images for presentation
//!
//! Sanitizing runs after raw HTML is admitted and before anything is shown.
//! Code fragments are produced by the highlighter itself and are spliced in
//! only when the final HTML is assembled.

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::{Captures, Regex};
use std::collections::HashSet;
use syntect::easy::HighlightLines;
use syntect::html::{
    highlighted_html_for_string, styled_line_to_highlighted_html, IncludeBackground,
};
use syntect::parsing::SyntaxReference;
use syntect::util::LinesWithEndings;

use super::document::{
    placeholder, CodeBlock, CodeStatus, Heading, PlainReason, RenderedDocument,
};
use super::highlighter::{HighlightEngine, Highlighter};
use crate::config::SiteConfig;
use crate::content::slug::to_slug;
use crate::helpers::{decode_entities, html_escape, strip_html};

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"(?s)<h([1-6])([^>]*)>(.*?)</h[1-6]>").unwrap();
    static ref ID_ATTR: Regex = Regex::new(r#"\bid="([^"]*)""#).unwrap();
    static ref TABLE_OPEN: Regex = Regex::new(r"<table([^>]*)>").unwrap();
    static ref THEAD_OPEN: Regex = Regex::new(r"<thead([^>]*)>").unwrap();
    static ref BLOCKQUOTE_OPEN: Regex = Regex::new(r"<blockquote([^>]*)>").unwrap();
    static ref IMG: Regex = Regex::new(r"<img([^>]*)>").unwrap();
    static ref PLACEHOLDER_ATTR: Regex = Regex::new(r"(?i)data-code-block").unwrap();
}

/// A code block set aside during parsing
struct PendingCode {
    language: Option<String>,
    source: String,
}

/// Markdown renderer with sanitization and syntax highlighting
pub struct MarkdownRenderer {
    highlighter: &'static Highlighter,
    theme_name: String,
    line_numbers: bool,
    languages: Vec<String>,
    image_width: u32,
    image_height: u32,
}

impl MarkdownRenderer {
    /// Create a renderer with default settings and the global highlighter
    pub fn new() -> Self {
        Self::from_config(&SiteConfig::default())
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            highlighter: Highlighter::global(),
            theme_name: config.highlight.theme.clone(),
            line_numbers: config.highlight.line_number,
            languages: config.highlight.languages.clone(),
            image_width: config.images.width,
            image_height: config.images.height,
        }
    }

    /// Use a different highlighter instance
    pub fn with_highlighter(mut self, highlighter: &'static Highlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    pub fn with_line_numbers(mut self, line_numbers: bool) -> Self {
        self.line_numbers = line_numbers;
        self
    }

    /// Render a content body
    pub fn render(&self, markdown: &str) -> RenderedDocument {
        let (markup, pending) = self.parse(markdown);
        let clean = sanitize(&markup);
        let (anchored, headings) = assign_heading_ids(&clean);
        let code_blocks = self.highlight_blocks(pending);
        let body = self.restyle(&anchored);

        RenderedDocument {
            body,
            headings,
            code_blocks,
        }
    }

    /// Parse markdown to HTML, replacing code blocks with placeholders
    fn parse(&self, markdown: &str) -> (String, Vec<PendingCode>) {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut pending: Vec<PendingCode> = Vec::new();
        let mut current: Option<PendingCode> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match kind {
                        CodeBlockKind::Fenced(info) => fence_language(&info),
                        CodeBlockKind::Indented => None,
                    };
                    current = Some(PendingCode {
                        language,
                        source: String::new(),
                    });
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(code) = current.take() {
                        events.push(Event::Html(CowStr::from(placeholder(pending.len()))));
                        pending.push(code);
                    }
                }
                Event::Text(text) => match current.as_mut() {
                    Some(code) => code.source.push_str(&text),
                    None => events.push(Event::Text(text)),
                },
                // Raw HTML passes through unescaped, minus placeholder markers
                Event::Html(raw) => events.push(Event::Html(disarm_placeholders(raw))),
                Event::InlineHtml(raw) => {
                    events.push(Event::InlineHtml(disarm_placeholders(raw)))
                }
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        (html_output, pending)
    }

    fn highlight_blocks(&self, pending: Vec<PendingCode>) -> Vec<CodeBlock> {
        let engine = self.highlighter.get();
        if engine.is_none() && pending.iter().any(|code| code.language.is_some()) {
            self.highlighter.warm_up();
        }

        pending
            .into_iter()
            .map(|code| self.highlight_block(engine, code))
            .collect()
    }

    /// Highlight one block, degrading to plain code on any problem
    fn highlight_block(&self, engine: Option<&HighlightEngine>, code: PendingCode) -> CodeBlock {
        let highlighted = match (code.language.as_deref(), engine) {
            (None, _) => Err(PlainReason::NoLanguage),
            (Some(lang), _) if !self.allows(lang) => Err(PlainReason::UnknownLanguage),
            (Some(_), None) => Err(PlainReason::EngineNotReady),
            (Some(lang), Some(engine)) => match engine.find_syntax(lang) {
                Some(syntax) => self.highlight(engine, syntax, &code.source, lang),
                None => Err(PlainReason::UnknownLanguage),
            },
        };

        match highlighted {
            Ok(html) => CodeBlock {
                language: code.language,
                source: code.source,
                html,
                status: CodeStatus::Highlighted,
            },
            Err(reason) => {
                if let PlainReason::Failed(ref e) = reason {
                    tracing::warn!("Failed to highlight {:?} block: {}", code.language, e);
                }
                CodeBlock {
                    html: plain_code(&code.source, code.language.as_deref()),
                    language: code.language,
                    source: code.source,
                    status: CodeStatus::Plain(reason),
                }
            }
        }
    }

    fn allows(&self, lang: &str) -> bool {
        self.languages.is_empty()
            || self
                .languages
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(lang))
    }

    fn highlight(
        &self,
        engine: &HighlightEngine,
        syntax: &SyntaxReference,
        code: &str,
        lang: &str,
    ) -> Result<String, PlainReason> {
        let theme = engine
            .theme(&self.theme_name)
            .ok_or_else(|| PlainReason::Failed("no themes available".to_string()))?;
        let lang = html_escape(&language_class(lang));

        if self.line_numbers {
            let mut highlighter = HighlightLines::new(syntax, theme);
            let mut lines = Vec::new();
            for line in LinesWithEndings::from(code) {
                let regions = highlighter
                    .highlight_line(line, engine.syntax_set())
                    .map_err(|e| PlainReason::Failed(e.to_string()))?;
                let html = styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)
                    .map_err(|e| PlainReason::Failed(e.to_string()))?;
                lines.push(html.trim_end_matches('\n').to_string());
            }
            Ok(add_line_numbers(&lines, &lang))
        } else {
            let highlighted = highlighted_html_for_string(code, engine.syntax_set(), syntax, theme)
                .map_err(|e| PlainReason::Failed(e.to_string()))?;
            Ok(format!(
                r#"<div class="highlight language-{}">{}</div>"#,
                lang, highlighted
            ))
        }
    }

    /// Annotate tables, block quotes and images without touching content
    fn restyle(&self, html: &str) -> String {
        let html = TABLE_OPEN.replace_all(
            html,
            r#"<div class="table-wrapper"><table class="post-table"$1>"#,
        );
        let html = html.replace("</table>", "</table></div>");
        let html = THEAD_OPEN.replace_all(&html, r#"<thead class="post-table-head"$1>"#);
        let html = BLOCKQUOTE_OPEN.replace_all(&html, r#"<blockquote class="post-blockquote"$1>"#);

        IMG.replace_all(&html, |caps: &Captures| {
            let attrs = caps[1].trim_end_matches('/').trim_end();
            let mut extra = String::from(r#" class="post-image" loading="lazy""#);
            if !attrs.contains("width=") {
                extra.push_str(&format!(r#" width="{}""#, self.image_width));
            }
            if !attrs.contains("height=") {
                extra.push_str(&format!(r#" height="{}""#, self.image_height));
            }
            format!("<img{}{}>", attrs, extra)
        })
        .into_owned()
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip scripts, event handlers and unsafe URLs
fn sanitize(html: &str) -> String {
    let mut builder = ammonia::Builder::default();
    builder
        .add_tags(&["input"])
        .add_tag_attributes("input", &["type", "checked", "disabled"])
        .add_tag_attributes("pre", &["data-code-block"]);
    for heading in ["h1", "h2", "h3", "h4", "h5", "h6"] {
        builder.add_tag_attributes(heading, &["id"]);
    }
    builder.clean(html).to_string()
}

/// Give each heading a unique id, keeping ids set explicitly in the source
fn assign_heading_ids(html: &str) -> (String, Vec<Heading>) {
    let mut taken: HashSet<String> = HashSet::new();
    let mut headings = Vec::new();

    let output = HEADING.replace_all(html, |caps: &Captures| {
        let level: u8 = caps[1].parse().unwrap_or(1);
        let attrs = &caps[2];
        let inner = &caps[3];
        let text = decode_entities(strip_html(inner).trim());

        let base = match ID_ATTR.captures(attrs) {
            Some(existing) => decode_entities(&existing[1]),
            None => match to_slug(&text) {
                slug if slug.is_empty() => "section".to_string(),
                slug => slug,
            },
        };
        let mut id = base.clone();
        let mut n = 0;
        while !taken.insert(id.clone()) {
            n += 1;
            id = format!("{}-{}", base, n);
        }

        let rest = ID_ATTR.replace(attrs, "");
        let rest = rest.trim();
        let rest = if rest.is_empty() {
            String::new()
        } else {
            format!(" {}", rest)
        };

        let escaped_id = html_escape(&id);
        let content = if (level == 2 || level == 3) && !inner.contains("<a ") {
            format!(
                r##"<a href="#{}" class="heading-anchor">{}</a>"##,
                escaped_id, inner
            )
        } else {
            inner.to_string()
        };

        headings.push(Heading { level, id, text });
        format!(
            r#"<h{}{} id="{}">{}</h{}>"#,
            level, rest, escaped_id, content, level
        )
    });

    (output.into_owned(), headings)
}

/// Rename placeholder attributes in author HTML so the sanitizer drops them
fn disarm_placeholders(raw: CowStr<'_>) -> CowStr<'_> {
    if PLACEHOLDER_ATTR.is_match(&raw) {
        CowStr::from(PLACEHOLDER_ATTR.replace_all(&raw, "data-disarmed").into_owned())
    } else {
        raw
    }
}

/// Language token from a fence info string such as `rust,ignore` or `py {lines}`
fn fence_language(info: &str) -> Option<String> {
    info.split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

/// Reduce a language token to characters safe inside a class name
fn language_class(lang: &str) -> String {
    lang.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '#' | '.'))
        .collect()
}

/// Unstyled code block
fn plain_code(code: &str, lang: Option<&str>) -> String {
    let class = lang
        .map(language_class)
        .filter(|lang| !lang.is_empty())
        .map(|lang| format!(r#" class="language-{}""#, html_escape(&lang)))
        .unwrap_or_default();
    format!("<pre><code{}>{}</code></pre>", class, html_escape(code))
}

/// Lay out highlighted lines next to a line-number gutter
fn add_line_numbers(lines: &[String], lang: &str) -> String {
    let gutter: Vec<String> = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect();

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
        lang,
        gutter.join("\n"),
        lines.join("\n")
    )
}
