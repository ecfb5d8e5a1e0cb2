use crate::languages;

/// The client enforces the proxy's default limit
pub const MAX_SOURCE_CHARS: usize = crate::translate::MAX_TEXT_CHARS;

/// Progress of the most recent translation attempt
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TranslationState {
    #[default]
    Idle,
    Pending,
    Succeeded(String),
    Failed(String),
}

/// Everything the translator view renders from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub source_text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub translation: TranslationState,
    pub copied: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            source_text: String::new(),
            source_lang: "en".to_string(),
            target_lang: "es".to_string(),
            translation: TranslationState::Idle,
            copied: false,
        }
    }
}

impl UiState {
    /// The text shown in the result panel; empty unless the last attempt succeeded
    pub fn translated_text(&self) -> &str {
        match &self.translation {
            TranslationState::Succeeded(text) => text.as_str(),
            _ => "",
        }
    }

    pub fn is_translating(&self) -> bool {
        matches!(self.translation, TranslationState::Pending)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.translation {
            TranslationState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Whether the translate trigger is enabled
    pub fn can_translate(&self) -> bool {
        !self.is_translating() && !self.source_text.trim().is_empty()
    }

    pub fn char_counter(&self) -> String {
        format!("{}/{}", self.source_text.chars().count(), MAX_SOURCE_CHARS)
    }

    pub fn source_caption(&self) -> String {
        caption(&self.source_lang)
    }

    pub fn target_caption(&self) -> String {
        caption(&self.target_lang)
    }
}

fn caption(code: &str) -> String {
    match languages::find(code) {
        Some(entry) => format!("{} {}", entry.flag, entry.name),
        None => code.to_string(),
    }
}

/// Cut `text` down to at most `max` characters
pub fn cap_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
