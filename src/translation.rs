//! Translation coordinator: applies an injected translator to page text.
//!
//! The translator itself is supplied by the embedding page. Each request is
//! stamped with a generation number; a result arriving for an older
//! generation is dropped, so the latest request always owns the display.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{InputError, TranslationError};
use crate::selection::SelectionTracker;

/// Text shown when the translator fails.
pub const TRANSLATION_FAILED: &str = "Translation failed. Please try again.";

/// Supported target languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "ur")]
    Urdu,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Urdu,
        Language::Spanish,
        Language::French,
        Language::German,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Urdu => "ur",
            Self::Spanish => "es",
            Self::French => "fr",
            Self::German => "de",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Urdu => "Urdu",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::German => "German",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == s)
            .ok_or_else(|| format!("Unsupported language: {}", s))
    }
}

/// Translation capability provided by the host page.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target: Language) -> Result<String, TranslationError>;
}

/// Adapts an async closure into a [`Translator`].
pub struct FnTranslator<F> {
    f: F,
}

impl<F, Fut> FnTranslator<F>
where
    F: Fn(String, Language) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, TranslationError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> Translator for FnTranslator<F>
where
    F: Fn(String, Language) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, TranslationError>> + Send + 'static,
{
    async fn translate(&self, text: &str, target: Language) -> Result<String, TranslationError> {
        let fut: BoxFuture<'static, _> = Box::pin((self.f)(text.to_string(), target));
        fut.await
    }
}

/// Observable translation state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationState {
    pub target_language: Language,
    pub translated_content: Option<String>,
}

/// A translation request that has been started but not yet resolved.
pub struct PendingTranslation {
    generation: u64,
    text: String,
    target: Language,
    translator: Arc<dyn Translator>,
}

/// Outcome of a [`PendingTranslation`], tagged with its generation.
#[derive(Debug)]
pub struct TranslationOutcome {
    generation: u64,
    result: Result<String, TranslationError>,
}

impl PendingTranslation {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn target(&self) -> Language {
        self.target
    }

    pub async fn run(self) -> TranslationOutcome {
        let result = self.translator.translate(&self.text, self.target).await;
        TranslationOutcome {
            generation: self.generation,
            result,
        }
    }
}

/// Translates the current selection, or the full page content as a fallback.
pub struct TranslationCoordinator {
    translator: Arc<dyn Translator>,
    selection: SelectionTracker,
    content: String,
    state: TranslationState,
    generation: u64,
    in_flight: usize,
}

impl TranslationCoordinator {
    pub fn new(
        translator: Arc<dyn Translator>,
        selection: SelectionTracker,
        content: impl Into<String>,
    ) -> Self {
        Self {
            translator,
            selection,
            content: content.into(),
            state: TranslationState::default(),
            generation: 0,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &TranslationState {
        &self.state
    }

    pub fn translated_content(&self) -> Option<&str> {
        self.state.translated_content.as_deref()
    }

    pub fn target_language(&self) -> Language {
        self.state.target_language
    }

    pub fn set_target_language(&mut self, target: Language) {
        self.state.target_language = target;
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn is_translating(&self) -> bool {
        self.in_flight > 0
    }

    /// Start translating the selection, falling back to the page content.
    ///
    /// Clears any displayed translation. Refused when there is neither.
    pub fn begin(&mut self) -> Result<PendingTranslation, InputError> {
        let text = match self.selection.consume() {
            Some(selected) => selected,
            None if !self.content.trim().is_empty() => self.content.clone(),
            None => return Err(InputError::NothingToTranslate),
        };

        self.generation += 1;
        self.in_flight += 1;
        self.state.translated_content = None;
        info!(
            generation = self.generation,
            target = %self.state.target_language,
            chars = text.chars().count(),
            "Translation started"
        );

        Ok(PendingTranslation {
            generation: self.generation,
            text,
            target: self.state.target_language,
            translator: Arc::clone(&self.translator),
        })
    }

    /// Apply an outcome. Returns `false` if it belonged to a superseded request.
    pub fn complete(&mut self, outcome: TranslationOutcome) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        if outcome.generation != self.generation {
            debug!(
                generation = outcome.generation,
                current = self.generation,
                "Discarding stale translation"
            );
            return false;
        }
        let shown = match outcome.result {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Translation failed");
                TRANSLATION_FAILED.to_string()
            }
        };
        self.state.translated_content = Some(shown);
        true
    }

    /// Translate end to end and return the displayed text.
    pub async fn translate(&mut self) -> Result<&str, InputError> {
        let pending = self.begin()?;
        let outcome = pending.run().await;
        self.complete(outcome);
        Ok(self.translated_content().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Echoes `[code] text` and records every call.
    #[derive(Default)]
    struct EchoTranslator {
        calls: Mutex<Vec<(String, Language)>>,
    }

    #[async_trait]
    impl Translator for EchoTranslator {
        async fn translate(&self, text: &str, target: Language) -> Result<String, TranslationError> {
            self.calls.lock().unwrap().push((text.to_string(), target));
            Ok(format!("[{target}] {text}"))
        }
    }

    struct FailingTranslator;

    #[async_trait]
    impl Translator for FailingTranslator {
        async fn translate(&self, _text: &str, target: Language) -> Result<String, TranslationError> {
            Err(TranslationError::Failed {
                language: target.to_string(),
                reason: "quota exceeded".into(),
            })
        }
    }

    #[tokio::test]
    async fn prefers_selection_over_content() {
        let translator = Arc::new(EchoTranslator::default());
        let selection = SelectionTracker::mounted();
        let mut coord =
            TranslationCoordinator::new(translator.clone(), selection.clone(), "whole page");

        selection.on_pointer_release(Some("servo motor"));
        coord.set_target_language(Language::Spanish);
        assert_eq!(coord.translate().await.unwrap(), "[es] servo motor");
        assert!(selection.current().is_none(), "selection is consumed");

        assert_eq!(coord.translate().await.unwrap(), "[es] whole page");
        assert_eq!(translator.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn refuses_without_text() {
        let translator = Arc::new(EchoTranslator::default());
        let mut coord = TranslationCoordinator::new(translator.clone(), SelectionTracker::mounted(), "  ");
        assert_eq!(coord.translate().await.unwrap_err(), InputError::NothingToTranslate);
        assert!(translator.calls.lock().unwrap().is_empty());
        assert!(!coord.is_translating());
    }

    #[tokio::test]
    async fn failure_shows_fixed_text() {
        let mut coord =
            TranslationCoordinator::new(Arc::new(FailingTranslator), SelectionTracker::new(), "text");
        assert_eq!(coord.translate().await.unwrap(), TRANSLATION_FAILED);
    }

    #[tokio::test]
    async fn begin_clears_previous_result() {
        let mut coord = TranslationCoordinator::new(
            Arc::new(EchoTranslator::default()),
            SelectionTracker::new(),
            "text",
        );
        coord.translate().await.unwrap();
        assert!(coord.translated_content().is_some());

        let pending = coord.begin().unwrap();
        assert!(coord.translated_content().is_none());
        assert!(coord.is_translating());
        coord.complete(pending.run().await);
        assert!(!coord.is_translating());
    }

    #[tokio::test]
    async fn stale_result_is_discarded() {
        let selection = SelectionTracker::mounted();
        let mut coord = TranslationCoordinator::new(
            Arc::new(EchoTranslator::default()),
            selection.clone(),
            "page",
        );

        selection.on_pointer_release(Some("first"));
        let first = coord.begin().unwrap();
        selection.on_pointer_release(Some("second"));
        let second = coord.begin().unwrap();

        let second_out = second.run().await;
        let first_out = first.run().await;

        assert!(coord.complete(second_out));
        assert!(!coord.complete(first_out));
        assert_eq!(coord.translated_content(), Some("[ur] second"));
        assert!(!coord.is_translating());
    }

    #[tokio::test]
    async fn closure_translator() {
        let translator = FnTranslator::new(|text: String, lang: Language| async move {
            Ok(format!("{}:{}", lang.display_name(), text.to_uppercase()))
        });
        let mut coord =
            TranslationCoordinator::new(Arc::new(translator), SelectionTracker::new(), "gear");
        coord.set_target_language(Language::German);
        assert_eq!(coord.translate().await.unwrap(), "German:GEAR");
    }

    #[test]
    fn language_codes() {
        assert_eq!(Language::default(), Language::Urdu);
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
            assert_eq!(serde_json::to_string(&lang).unwrap(), format!("\"{}\"", lang.code()));
        }
        assert!("it".parse::<Language>().is_err());
    }
}
