//! Character sanitization for narrow-character-set environments.
//!
//! On Windows hosts the downstream toolchain works in code page 932, so
//! loaded text is canonically composed and round-tripped through cp932,
//! dropping anything the code page cannot represent. Other platforms pass
//! text through unchanged.

use encoding_rs::{EncoderResult, SHIFT_JIS};
use unicode_normalization::UnicodeNormalization;

use crate::types::SourceDocument;

/// Sanitize a string for the current platform.
pub fn normalize(s: &str) -> String {
    if cfg!(target_os = "windows") {
        normalize_cp932(s)
    } else {
        s.to_string()
    }
}

/// NFC composition followed by a lossy cp932 round trip. encoding_rs's
/// SHIFT_JIS is windows-31j, i.e. code page 932.
pub fn normalize_cp932(s: &str) -> String {
    let composed: String = s.nfc().collect();

    let mut encoder = SHIFT_JIS.new_encoder();
    let mut bytes = Vec::with_capacity(composed.len() * 2);
    let mut out = [0u8; 8];
    let mut utf8 = [0u8; 4];

    for ch in composed.chars() {
        let input = ch.encode_utf8(&mut utf8);
        let (result, _read, written) =
            encoder.encode_from_utf8_without_replacement(input, &mut out, false);
        match result {
            EncoderResult::InputEmpty => bytes.extend_from_slice(&out[..written]),
            // Unencodable characters are dropped.
            EncoderResult::Unmappable(_) => {}
            EncoderResult::OutputFull => {}
        }
    }

    let (decoded, _) = SHIFT_JIS.decode_without_bom_handling(&bytes);
    decoded.into_owned()
}

/// Apply normalization to a document's content and every string-valued
/// metadata field.
pub fn normalize_document(doc: &mut SourceDocument) {
    doc.content = normalize(&doc.content);
    doc.metadata.source = normalize(&doc.metadata.source);
    if let Some(dept) = doc.metadata.department.take() {
        doc.metadata.department = Some(normalize(&dept));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        assert_eq!(normalize_cp932("hello, world"), "hello, world");
    }

    #[test]
    fn japanese_survives_the_round_trip() {
        assert_eq!(normalize_cp932("社員名簿のデータです。"), "社員名簿のデータです。");
    }

    #[test]
    fn unencodable_characters_are_dropped() {
        // Emoji are not representable in cp932.
        assert_eq!(normalize_cp932("ok🐰ok"), "okok");
    }

    #[test]
    fn decomposed_input_is_composed_first() {
        // "が" as base + combining dakuten composes to one cp932-mappable char.
        let decomposed = "か\u{3099}";
        assert_eq!(normalize_cp932(decomposed), "が");
    }
}
