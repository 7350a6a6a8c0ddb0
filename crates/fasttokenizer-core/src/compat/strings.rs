//! # String Utilities

/// Lossy UTF-8 rendering of a byte span, for messages and debugging.
pub fn string_from_utf8_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_from_utf8_lossy() {
        assert_eq!(string_from_utf8_lossy(b"hello"), "hello");
        assert_eq!(string_from_utf8_lossy(&[b'a', 0xFF]), "a\u{FFFD}");
    }
}
