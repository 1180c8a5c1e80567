//! Byte-to-text decoding for fetched sheet payloads.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode sheet bytes as {encoding}")]
    DecodeFailure { encoding: String },
}

/// Decode raw sheet bytes into UTF-8 using: BOM -> Content-Type charset ->
/// chardetng fallback. Google's CSV export leads with a UTF-8 BOM, which
/// the BOM-aware decode also strips from the text.
pub fn decode_sheet_text(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedText, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, encoding);
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    decode_with(bytes, encoding)
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let part = part.trim();
            part.strip_prefix("charset=")
                .or_else(|| part.strip_prefix("Charset="))
                .or_else(|| part.strip_prefix("CHARSET="))
                .map(|value| value.trim_matches([' ', '"', '\''].as_ref()))
        })
        .next()
        .map(|value| value.to_string())
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Result<DecodedText, DecodeError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure { encoding: encoding.name().to_string() });
    }
    Ok(DecodedText {
        text: text.into_owned(),
        encoding_label: encoding.name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_bom_is_detected_and_stripped() {
        let bytes = b"\xef\xbb\xbfSlug,Hero Title\n";
        let decoded = decode_sheet_text(bytes, Some("text/csv")).unwrap();
        assert_eq!(decoded.text, "Slug,Hero Title\n");
        assert_eq!(decoded.encoding_label, "UTF-8");
    }

    #[test]
    fn content_type_charset_wins_without_a_bom() {
        // 0xE9 is e-acute in windows-1252 and invalid alone in UTF-8.
        let bytes = b"s\xe9rum,Serum\n";
        let decoded = decode_sheet_text(bytes, Some("text/csv; charset=windows-1252")).unwrap();
        assert_eq!(decoded.text, "s\u{e9}rum,Serum\n");
    }

    #[test]
    fn plain_ascii_decodes_without_any_hint() {
        let decoded = decode_sheet_text(b"a,b\n", None).unwrap();
        assert_eq!(decoded.text, "a,b\n");
    }
}
