use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for platform caption language codes
///
/// Caption tracks use ISO 639-1 codes, optionally followed by a region or
/// script subtag ("en-GB", "zh-Hans", "pt_BR"). Names are looked up on
/// the primary subtag only.
/// Primary subtag of a language code, lowercased
pub fn base_code(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Whether the primary subtag is a known ISO 639-1 or ISO 639-3 code
pub fn is_known_language(code: &str) -> bool {
    lookup(&base_code(code)).is_some()
}

fn lookup(base: &str) -> Option<Language> {
    match base.len() {
        2 => Language::from_639_1(base),
        3 => Language::from_639_3(base),
        _ => None,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let base = base_code(code);
    let lang = lookup(&base).ok_or_else(|| anyhow!("Unknown language code: {}", code))?;
    Ok(lang.to_name().to_string())
}

/// Language name for display, the code itself when unknown
pub fn display_name(code: &str) -> String {
    get_language_name(code).unwrap_or_else(|_| code.to_string())
}
