use crate::error::ApiError;
use crate::translate::interface::{RawTranslationRequest, TranslationRequest};

/// Default limit on source text, counted in characters
pub const MAX_TEXT_CHARS: usize = 5000;

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Check an incoming body, in order: required fields, text length, then
/// distinct languages. Language codes themselves are not checked.
pub fn validate(
    raw: RawTranslationRequest,
    max_chars: usize,
) -> Result<TranslationRequest, ApiError> {
    let text = present(raw.text);
    let source_lang = present(raw.source_lang);
    let target_lang = present(raw.target_lang);

    let (text, source_lang, target_lang) = match (text, source_lang, target_lang) {
        (Some(t), Some(s), Some(g)) => (t, s, g),
        (t, s, g) => {
            let missing = [
                ("text", t.is_none()),
                ("sourceLang", s.is_none()),
                ("targetLang", g.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
            return Err(ApiError::MissingFields(missing));
        }
    };

    if text.chars().count() > max_chars {
        return Err(ApiError::TextTooLong { max: max_chars });
    }

    if source_lang == target_lang {
        return Err(ApiError::SameLanguage);
    }

    Ok(TranslationRequest {
        text,
        source_lang,
        target_lang,
    })
}
