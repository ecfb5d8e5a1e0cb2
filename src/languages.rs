use serde::Serialize;

/// A selectable language. The table below is the only copy: the proxy
/// resolves prompt names from it and the client renders its panels from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageEntry {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

const fn entry(code: &'static str, name: &'static str, flag: &'static str) -> LanguageEntry {
    LanguageEntry { code, name, flag }
}

pub static LANGUAGES: [LanguageEntry; 20] = [
    entry("en", "English", "🇬🇧"),
    entry("es", "Spanish", "🇪🇸"),
    entry("fr", "French", "🇫🇷"),
    entry("de", "German", "🇩🇪"),
    entry("it", "Italian", "🇮🇹"),
    entry("pt", "Portuguese", "🇵🇹"),
    entry("ru", "Russian", "🇷🇺"),
    entry("zh", "Chinese", "🇨🇳"),
    entry("ja", "Japanese", "🇯🇵"),
    entry("ko", "Korean", "🇰🇷"),
    entry("ar", "Arabic", "🇸🇦"),
    entry("hi", "Hindi", "🇮🇳"),
    entry("tr", "Turkish", "🇹🇷"),
    entry("nl", "Dutch", "🇳🇱"),
    entry("pl", "Polish", "🇵🇱"),
    entry("sv", "Swedish", "🇸🇪"),
    entry("da", "Danish", "🇩🇰"),
    entry("fi", "Finnish", "🇫🇮"),
    entry("no", "Norwegian", "🇳🇴"),
    entry("cs", "Czech", "🇨🇿"),
];

pub fn find(code: &str) -> Option<&'static LanguageEntry> {
    LANGUAGES.iter().find(|l| l.code == code)
}

/// Human-readable name for a language code.
/// Unknown codes are returned unchanged and used as their own name.
pub fn display_name(code: &str) -> &str {
    find(code).map(|l| l.name).unwrap_or(code)
}
