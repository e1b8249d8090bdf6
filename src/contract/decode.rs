use crate::provider::ScanError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Decode a base64 `content` field into text.
///
/// GitHub wraps the payload with newlines every 60 columns; all ASCII
/// whitespace is stripped before decoding. Invalid UTF-8 sequences are
/// replaced with U+FFFD rather than failing the file.
pub fn decode_base64_content(encoded: &str) -> Result<String, ScanError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ScanError::Decode(e.to_string()))?;

    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
