use chardetng::EncodingDetector;
use encoding_rs::Encoding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMarkup {
    pub markup: String,
    pub encoding: &'static str,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("snapshot is not valid {encoding}")]
    Malformed { encoding: &'static str },
}

/// Decodes a saved page to UTF-8. Precedence: byte-order mark, then the
/// `charset` parameter of `content_type`, then detection.
pub fn decode_markup(
    bytes: &[u8],
    content_type: Option<&str>,
) -> Result<DecodedMarkup, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(encoding) = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return decode_with(bytes, encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').find_map(|part| {
        let (name, value) = part.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']))
    })
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Result<DecodedMarkup, DecodeError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::Malformed {
            encoding: encoding.name(),
        });
    }
    Ok(DecodedMarkup {
        markup: text.into_owned(),
        encoding: encoding.name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_parameter_is_case_insensitive() {
        assert_eq!(charset_param("text/html; CharSet=\"utf-8\""), Some("utf-8"));
        assert_eq!(charset_param("text/html"), None);
    }

    #[test]
    fn bom_wins_over_header() {
        let bytes = b"\xEF\xBB\xBF<p>\xD7\xA9</p>";
        let decoded = decode_markup(bytes, Some("text/html; charset=windows-1252")).unwrap();
        assert_eq!(decoded.encoding, "UTF-8");
        assert_eq!(decoded.markup, "<p>ש</p>");
    }

    #[test]
    fn header_charset_is_used_without_bom() {
        let decoded = decode_markup(b"caf\xE9", Some("text/html; charset=windows-1252")).unwrap();
        assert_eq!(decoded.markup, "café");
    }

    #[test]
    fn invalid_utf8_under_declared_charset_fails() {
        let err = decode_markup(b"ok \xC3\x28", Some("text/html; charset=utf-8")).unwrap_err();
        assert_eq!(err, DecodeError::Malformed { encoding: "UTF-8" });
    }
}
