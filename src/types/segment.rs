use percent_encoding::percent_decode_str;

/// Percent-decodes a raw path segment. `None` when the bytes are not valid UTF-8.
pub fn decode_segment(raw: &str) -> Option<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_escapes() {
        assert_eq!(decode_segment("data%20science").as_deref(), Some("data science"));
        assert_eq!(decode_segment("g%C3%A9o").as_deref(), Some("géo"));
        assert_eq!(decode_segment("c%2B%2B").as_deref(), Some("c++"));
        assert_eq!(decode_segment("plain").as_deref(), Some("plain"));
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert_eq!(decode_segment("%FF%FE"), None);
    }
}
