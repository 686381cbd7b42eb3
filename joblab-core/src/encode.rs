//! Percent-encoding for URL path segments.

use std::fmt::Write;

/// Percent-encodes a string for use as a single URL path segment.
///
/// Every byte outside `[A-Za-z0-9._~-]` is replaced with `%xx` (lowercase
/// hex); unreserved bytes pass through unchanged. This covers the `/` in
/// repository slugs, which the API expects encoded.
pub fn encode_path_segment(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'~' | b'-' => {
                encoded.push(byte as char);
            }
            _ => {
                // String's fmt::Write never fails
                let _ = write!(encoded, "%{byte:02x}");
            }
        }
    }
    encoded
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreserved_passes_through() {
        assert_eq!(encode_path_segment("AZaz09._~-"), "AZaz09._~-");
    }

    #[test]
    fn test_slash_and_space_encoded() {
        assert_eq!(encode_path_segment("group/proj"), "group%2fproj");
        assert_eq!(encode_path_segment("a b"), "a%20b");
    }

    #[test]
    fn test_multibyte_encoded_per_byte() {
        // U+00E9 is 0xc3 0xa9 in UTF-8
        assert_eq!(encode_path_segment("é"), "%c3%a9");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(encode_path_segment(""), "");
    }

    #[test]
    fn test_roundtrip_decodes_to_original() {
        let inputs = ["group/proj", "path with spaces/x.y", "100%", "tilde~ok", "日本語"];
        for input in inputs {
            assert_eq!(percent_decode(&encode_path_segment(input)), input);
        }
    }

    /// Minimal decoder for the round-trip property.
    fn percent_decode(encoded: &str) -> String {
        let bytes = encoded.as_bytes();
        let mut out = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'%' {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).unwrap();
                out.push(u8::from_str_radix(hex, 16).unwrap());
                i += 3;
            } else {
                out.push(bytes[i]);
                i += 1;
            }
        }
        String::from_utf8(out).unwrap()
    }
}
