//! # Byte-Level Token Text
//!
//! GPT-2 style vocabularies store token bytes as printable text: each
//! byte maps to one `char`. Printable ISO/IEC 8859-1 bytes map to
//! themselves; the remaining bytes are assigned ``U+0100`` onwards, in
//! byte order.
//!
//! Printable ranges: ``[0x21-0x7E]``, ``[0xA1-0xAD)``, ``(0xAD-0xFF]``.

use crate::{
    errors::{FTError, FTResult},
    types::FTHashMap,
};

/// A map from byte-level characters to the bytes they stand for.
pub type ByteLevelMap = FTHashMap<char, u8>;

fn is_printable(b: u8) -> bool {
    matches!(b, 0x21..=0x7E | 0xA1..=0xAC | 0xAE..=0xFF)
}

/// Build the ``byte -> char`` table.
pub fn byte_level_chars() -> [char; 256] {
    let mut chars = ['\0'; 256];
    let mut n = 0u32;
    for b in 0..=255u8 {
        chars[b as usize] = if is_printable(b) {
            char::from(b)
        } else {
            // 68 non-printable bytes; U+0100..U+0144 are all scalar values.
            let c = char::from_u32(256 + n).expect("U+0100..U+0144 are valid chars");
            n += 1;
            c
        };
    }
    chars
}

/// Build the ``char -> byte`` map.
pub fn byte_level_map() -> ByteLevelMap {
    byte_level_chars()
        .into_iter()
        .enumerate()
        .map(|(b, c)| (c, b as u8))
        .collect()
}

/// Render bytes as byte-level text.
pub fn encode_byte_level(bytes: &[u8]) -> String {
    let chars = byte_level_chars();
    bytes.iter().map(|&b| chars[b as usize]).collect()
}

/// Decode byte-level text back into bytes.
///
/// ## Arguments
/// * `byte_map` - The map from [`byte_level_map`].
/// * `text` - The byte-level text.
pub fn decode_byte_level(
    byte_map: &ByteLevelMap,
    text: &str,
) -> FTResult<Vec<u8>> {
    text.chars()
        .map(|c| {
            byte_map
                .get(&c)
                .copied()
                .ok_or_else(|| FTError::Parse(format!("{c:?} is not a byte-level char in {text:?}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_level_map() {
        let byte_map = byte_level_map();
        assert_eq!(byte_map.len(), 256);

        let chars = byte_level_chars();
        assert_eq!(chars[b'a' as usize], 'a');
        assert_eq!(chars[b' ' as usize], '\u{120}');
        assert_eq!(chars[b'\n' as usize], '\u{10A}');
        assert_eq!(chars[0xAD], '\u{143}');
    }

    #[test]
    fn test_byte_level_text() {
        let byte_map = byte_level_map();

        assert_eq!(encode_byte_level(b" world"), "\u{120}world");
        assert_eq!(
            decode_byte_level(&byte_map, "\u{120}world").unwrap(),
            b" world".to_vec()
        );

        let all: Vec<u8> = (0..=255u8).collect();
        assert_eq!(
            decode_byte_level(&byte_map, &encode_byte_level(&all)).unwrap(),
            all
        );

        assert!(matches!(
            decode_byte_level(&byte_map, "\u{4e2d}"),
            Err(FTError::Parse(_))
        ));
    }
}
