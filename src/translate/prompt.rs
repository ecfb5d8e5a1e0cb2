use crate::languages::display_name;
use crate::llm::ChatMessage;
use crate::translate::interface::TranslationRequest;

pub fn system_prompt(source_name: &str, target_name: &str) -> String {
    format!(
        "You are a professional translator. Translate the given text from {} to {}. \
         Output ONLY the translated text, nothing else. No explanations, no quotes, no prefixes. \
         Preserve formatting, line breaks, and punctuation style.",
        source_name, target_name
    )
}

/// System instruction followed by the untouched source text
pub fn build_messages(request: &TranslationRequest) -> Vec<ChatMessage> {
    let source_name = display_name(&request.source_lang);
    let target_name = display_name(&request.target_lang);
    vec![
        ChatMessage::system(system_prompt(source_name, target_name)),
        ChatMessage::user(request.text.clone()),
    ]
}
