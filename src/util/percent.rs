//! Percent-decoding for route parameters.

/// Decode `%XX` escapes. Malformed escapes are kept literally; `None` is
/// returned only when the decoded bytes are not valid UTF-8.
#[must_use]
pub fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = char::from(bytes[i + 1]).to_digit(16);
            let lo = char::from(bytes[i + 2]).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push(u8::try_from((hi << 4) | lo).ok()?);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_tokens_pass_through() {
        assert_eq!(percent_decode("AbC-123_x").as_deref(), Some("AbC-123_x"));
    }

    #[test]
    fn escapes_are_decoded() {
        assert_eq!(percent_decode("a%2Fb%3d").as_deref(), Some("a/b="));
        assert_eq!(percent_decode("caf%C3%A9").as_deref(), Some("café"));
    }

    #[test]
    fn malformed_escapes_are_kept() {
        assert_eq!(percent_decode("100%").as_deref(), Some("100%"));
        assert_eq!(percent_decode("%4").as_deref(), Some("%4"));
        assert_eq!(percent_decode("%zz").as_deref(), Some("%zz"));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert_eq!(percent_decode("%FF%FE"), None);
    }
}
