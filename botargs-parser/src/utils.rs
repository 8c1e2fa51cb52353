//! Parser utilities.

use crate::lexer;

/// Words read as `true`.
pub const TRUE_WORDS: &[&str] = &["true", "yes", "on"];

/// Words read as `false`.
pub const FALSE_WORDS: &[&str] = &["false", "no", "off"];

/// Read a boolean out of a word, ignoring case and surrounding whitespace. Returns `None` if the
/// word is not recognized.
pub fn to_bool(text: &str) -> Option<bool> {
    let text = text.trim();

    if TRUE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(text)) {
        return Some(true);
    }

    if FALSE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(text)) {
        return Some(false);
    }

    None
}

/// Clean up the text found after a flag name: trim it, drop one leading `=` and the quotes
/// around it.
pub fn clean_value(value: &str) -> &str {
    let value = value.trim();
    let value = value.strip_prefix('=').map(str::trim).unwrap_or(value);
    lexer::trim_quotes(value)
}

/// Get the text following the first occurrence of the command, trimmed. Empty if the command
/// does not occur verbatim.
#[inline(always)]
pub fn text_after<'a>(text: &'a str, command: &str) -> &'a str {
    text.split_once(command)
        .map(|(_, rest)| rest.trim())
        .unwrap_or_default()
}
