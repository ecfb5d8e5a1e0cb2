use serde::{Deserialize, Serialize};

/// The translate body as it arrives, before validation
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTranslationRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub source_lang: Option<String>,
    #[serde(default)]
    pub target_lang: Option<String>,
}

/// A validated translation request; also what the client sends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// Exactly one of `translatedText` or `error`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationResponse {
    Success {
        #[serde(rename = "translatedText")]
        translated_text: String,
    },
    Failure {
        error: String,
    },
}
