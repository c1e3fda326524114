//! Canonical text serialization.

use super::CanonicalError;

/// Normalizes text to canonical bytes.
///
/// All line terminators (`\r\n`, `\r`) become a single `\n`, and trailing
/// whitespace is stripped from each line. Leading whitespace is preserved.
#[must_use]
pub fn canonical_text_bytes(text: &str) -> Vec<u8> {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let normalized: Vec<&str> = unified.split('\n').map(str::trim_end).collect();
    normalized.join("\n").into_bytes()
}

/// Decodes raw bytes as UTF-8 and normalizes them to canonical text bytes.
///
/// # Errors
///
/// Returns [`CanonicalError::InvalidUtf8`] when the bytes are not valid
/// UTF-8.
pub fn canonical_text_from_bytes(raw: &[u8]) -> Result<Vec<u8>, CanonicalError> {
    let text = std::str::from_utf8(raw).map_err(|e| CanonicalError::InvalidUtf8 {
        message: e.to_string(),
    })?;
    Ok(canonical_text_bytes(text))
}
