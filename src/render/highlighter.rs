//! Process-wide syntax highlighting engine
//!
//! Loading syntect's syntax and theme sets is expensive compared to rendering
//! one document, so the engine is built once per process, off the async
//! executor, and shared by every renderer. Until it is ready, renderers fall
//! back to plain code blocks and kick off the load in the background.

use lazy_static::lazy_static;
use std::sync::atomic::{AtomicBool, Ordering};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use thiserror::Error;
use tokio::sync::OnceCell;

lazy_static! {
    static ref GLOBAL: Highlighter = Highlighter::new();
}

/// Loaded syntaxes and themes
pub struct HighlightEngine {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl HighlightEngine {
    /// Load the bundled syntaxes and themes (blocking)
    ///
    /// syntect's own defaults lack TypeScript, JSX and TSX, so the syntaxes
    /// come from two-face's extended set.
    pub fn load() -> Self {
        Self::from_parts(two_face::syntax::extra_newlines(), ThemeSet::load_defaults())
    }

    pub(crate) fn from_parts(syntax_set: SyntaxSet, theme_set: ThemeSet) -> Self {
        Self {
            syntax_set,
            theme_set,
        }
    }

    pub fn syntax_set(&self) -> &SyntaxSet {
        &self.syntax_set
    }

    /// Find a syntax by fence token (name or file extension)
    pub fn find_syntax(&self, lang: &str) -> Option<&SyntaxReference> {
        self.syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
    }

    /// Look up a theme by name, falling back to any bundled theme
    pub fn theme(&self, name: &str) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(name)
            .or_else(|| self.theme_set.themes.values().next())
    }
}

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("highlighter initialization aborted: {0}")]
    Init(#[from] tokio::task::JoinError),
}

/// Lazily initialized, shareable handle to a [`HighlightEngine`]
///
/// The engine is written at most once. Concurrent callers of [`ready`]
/// share a single in-flight load; a failed load leaves the handle empty so
/// the next caller retries.
///
/// [`ready`]: Highlighter::ready
pub struct Highlighter {
    engine: OnceCell<HighlightEngine>,
    warming: AtomicBool,
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            engine: OnceCell::new(),
            warming: AtomicBool::new(false),
        }
    }

    /// A highlighter that is ready from the start
    pub(crate) fn with_engine(engine: HighlightEngine) -> Self {
        Self {
            engine: OnceCell::new_with(Some(engine)),
            warming: AtomicBool::new(false),
        }
    }

    /// The process-wide highlighter
    pub fn global() -> &'static Highlighter {
        &GLOBAL
    }

    /// The engine, if it has finished loading
    pub fn get(&self) -> Option<&HighlightEngine> {
        self.engine.get()
    }

    pub fn is_ready(&self) -> bool {
        self.engine.initialized()
    }

    /// Wait for the engine, loading it if nobody has yet
    pub async fn ready(&self) -> Result<&HighlightEngine, HighlightError> {
        self.engine
            .get_or_try_init(|| async {
                tracing::debug!("Loading syntax highlighting engine");
                let engine = tokio::task::spawn_blocking(HighlightEngine::load).await?;
                tracing::info!("Syntax highlighting engine ready");
                Ok::<_, HighlightError>(engine)
            })
            .await
    }

    /// Start loading the engine in the background without waiting for it
    ///
    /// Does nothing outside a tokio runtime, or when the engine is already
    /// loaded or loading.
    pub fn warm_up(&'static self) {
        if self.is_ready() {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No async runtime; highlighter stays cold");
            return;
        };
        if self.warming.swap(true, Ordering::AcqRel) {
            return;
        }

        handle.spawn(async move {
            if let Err(e) = self.ready().await {
                tracing::warn!("Failed to load highlighter: {}", e);
            }
            self.warming.store(false, Ordering::Release);
        });
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}
