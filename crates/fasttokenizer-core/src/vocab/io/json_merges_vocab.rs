//! # JSON Vocabulary + Merges IO
//!
//! The ``vocab.json`` file is a ``{ text -> id }`` object; the ``merges.txt``
//! file lists one ``left right`` rule per line, highest priority first, with
//! an optional leading ``#version`` header.

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use serde_json::Value;

use crate::{
    errors::{FTError, FTResult},
    types::TokenType,
    vocab::{
        MergeRuleList,
        RankerTable,
        SpanTokenMap,
        byte_level::{ByteLevelMap, byte_level_map, decode_byte_level},
    },
};

/// How token text in a vocabulary file maps to token bytes.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::EnumString,
    strum_macros::EnumIter,
    strum_macros::Display,
)]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum TokenTextEncoding {
    /// Token text is the UTF-8 token bytes.
    #[default]
    Raw,

    /// Token text uses the GPT-2 printable byte-level alphabet.
    ///
    /// See [`crate::vocab::byte_level`].
    ByteLevel,
}

/// Decodes token text into token bytes.
enum TextDecoder {
    Raw,
    ByteLevel(ByteLevelMap),
}

impl TextDecoder {
    fn new(encoding: TokenTextEncoding) -> Self {
        match encoding {
            TokenTextEncoding::Raw => Self::Raw,
            TokenTextEncoding::ByteLevel => Self::ByteLevel(byte_level_map()),
        }
    }

    fn decode(
        &self,
        text: &str,
    ) -> FTResult<Vec<u8>> {
        match self {
            Self::Raw => Ok(text.as_bytes().to_vec()),
            Self::ByteLevel(byte_map) => decode_byte_level(byte_map, text),
        }
    }
}

/// Read a json ``{ text -> id }`` vocabulary.
///
/// ## Arguments
/// * `reader` - the json source.
/// * `encoding` - how token text maps to bytes.
pub fn read_json_vocab<T, R>(
    reader: R,
    encoding: TokenTextEncoding,
) -> FTResult<SpanTokenMap<T>>
where
    T: TokenType,
    R: Read,
{
    let decoder = TextDecoder::new(encoding);
    read_json_span_map(reader, &decoder)
}

fn read_json_span_map<T, R>(
    reader: R,
    decoder: &TextDecoder,
) -> FTResult<SpanTokenMap<T>>
where
    T: TokenType,
    R: Read,
{
    let json: Value = serde_json::from_reader(reader).map_err(|e| FTError::Parse(e.to_string()))?;
    let object = json
        .as_object()
        .ok_or_else(|| FTError::Parse("vocabulary json is not an object".to_string()))?;

    let mut span_map = SpanTokenMap::default();
    for (text, id) in object {
        let id = id
            .as_u64()
            .ok_or_else(|| FTError::Parse(format!("{text:?}: id {id} is not an unsigned integer")))?;
        let token = T::from_u64(id).ok_or(FTError::TokenOutOfRange)?;

        let span = decoder.decode(text)?;
        if let Some(prev) = span_map.insert(span, token) {
            return Err(FTError::MalformedVocabulary(format!(
                "{text:?} maps to both {prev} and {token}"
            )));
        }
    }

    Ok(span_map)
}

/// Read a ``merges.txt`` rule list.
///
/// Blank lines and a leading ``#version`` header are skipped.
///
/// ## Arguments
/// * `reader` - the line reader.
/// * `encoding` - how token text maps to bytes.
pub fn read_merges<R>(
    reader: R,
    encoding: TokenTextEncoding,
) -> FTResult<MergeRuleList>
where
    R: BufRead,
{
    let decoder = TextDecoder::new(encoding);
    read_merge_rules(reader, &decoder)
}

fn read_merge_rules<R>(
    reader: R,
    decoder: &TextDecoder,
) -> FTResult<MergeRuleList>
where
    R: BufRead,
{
    let mut merges = MergeRuleList::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let s = line.trim_end_matches(['\r', '\n']);
        if s.is_empty() || (lineno == 0 && s.starts_with("#version")) {
            continue;
        }

        let (left, right) = s
            .split_once(' ')
            .ok_or_else(|| FTError::Parse(format!("merges line {}: expected \"LEFT RIGHT\"", lineno + 1)))?;

        merges.push((decoder.decode(left)?, decoder.decode(right)?));
    }
    Ok(merges)
}

/// Build a [`RankerTable`] from a json vocabulary and a merge list.
///
/// ## Arguments
/// * `vocab_reader` - the ``vocab.json`` source.
/// * `merges_reader` - the ``merges.txt`` source.
/// * `encoding` - how token text maps to bytes, in both files.
/// * `unknown` - the text of the unknown token, if any.
pub fn read_json_merges_table<T, VR, MR>(
    vocab_reader: VR,
    merges_reader: MR,
    encoding: TokenTextEncoding,
    unknown: Option<&str>,
) -> FTResult<RankerTable<T>>
where
    T: TokenType,
    VR: Read,
    MR: BufRead,
{
    let decoder = TextDecoder::new(encoding);
    let span_map: SpanTokenMap<T> = read_json_span_map(vocab_reader, &decoder)?;
    let merges = read_merge_rules(merges_reader, &decoder)?;

    let unknown_token = match unknown {
        None => None,
        Some(text) => {
            let span = decoder.decode(text)?;
            Some(span_map.get(&span).copied().ok_or_else(|| {
                FTError::MalformedVocabulary(format!(
                    "unknown token {text:?} is not in the vocabulary"
                ))
            })?)
        }
    };

    let table = RankerTable::new(span_map, merges)?;
    match unknown_token {
        Some(token) => table.with_unknown_token(token),
        None => Ok(table),
    }
}

/// Load a [`RankerTable`] from ``vocab.json`` and ``merges.txt`` files.
///
/// See [`read_json_merges_table`].
pub fn load_json_merges_table_path<T, VP, MP>(
    vocab_path: VP,
    merges_path: MP,
    encoding: TokenTextEncoding,
    unknown: Option<&str>,
) -> FTResult<RankerTable<T>>
where
    T: TokenType,
    VP: AsRef<Path>,
    MP: AsRef<Path>,
{
    let vocab_reader = BufReader::new(File::open(vocab_path)?);
    let merges_reader = BufReader::new(File::open(merges_path)?);
    read_json_merges_table(vocab_reader, merges_reader, encoding, unknown)
}

#[cfg(test)]
mod tests {
    use std::{io::Write, str::FromStr};

    use super::*;

    const VOCAB_JSON: &str = r#"{"<unk>": 0, "a": 1, "b": 2, "c": 3, "ab": 4, "abc": 5}"#;
    const MERGES_TXT: &str = "#version: 0.2\na b\nab c\n";

    #[test]
    fn test_token_text_encoding_names() {
        assert_eq!(TokenTextEncoding::default(), TokenTextEncoding::Raw);
        assert_eq!(TokenTextEncoding::ByteLevel.to_string(), "byte_level");
        assert_eq!(
            TokenTextEncoding::from_str("byte_level").unwrap(),
            TokenTextEncoding::ByteLevel
        );
        assert!(TokenTextEncoding::from_str("latin1").is_err());
    }

    #[test]
    fn test_read_json_merges_table() {
        let table: RankerTable<u32> = read_json_merges_table(
            VOCAB_JSON.as_bytes(),
            MERGES_TXT.as_bytes(),
            TokenTextEncoding::Raw,
            Some("<unk>"),
        )
        .unwrap();

        assert_eq!(table.len(), 6);
        assert_eq!(table.num_merges(), 2);
        assert_eq!(table.unknown_token(), Some(0));
        assert_eq!(table.rank_of(&(1, 2)), Some(0));
        assert_eq!(table.rank_of(&(4, 3)), Some(1));
        assert_eq!(table.token_id_of(&(4, 3)), Some(5));
    }

    #[test]
    fn test_read_byte_level_merges() {
        let vocab = r#"{"a": 0, "Ġ": 1, "Ġa": 2}"#;
        let merges = "\u{120} a\n";

        let table: RankerTable<u32> = read_json_merges_table(
            vocab.as_bytes(),
            merges.as_bytes(),
            TokenTextEncoding::ByteLevel,
            None,
        )
        .unwrap();

        assert_eq!(table.lookup_token(b" a"), Some(2));
        assert_eq!(table.lookup_token(b" "), Some(1));
        assert_eq!(table.token_id_of(&(1, 0)), Some(2));
    }

    #[test]
    fn test_read_json_errors() {
        assert!(matches!(
            read_json_vocab::<u32, _>("[1, 2]".as_bytes(), TokenTextEncoding::Raw),
            Err(FTError::Parse(_))
        ));
        assert!(matches!(
            read_json_vocab::<u32, _>(r#"{"a": -1}"#.as_bytes(), TokenTextEncoding::Raw),
            Err(FTError::Parse(_))
        ));
        assert!(matches!(
            read_merges("a\n".as_bytes(), TokenTextEncoding::Raw),
            Err(FTError::Parse(_))
        ));

        // "ab c" names a merged span that is not in the vocabulary.
        assert!(matches!(
            read_json_merges_table::<u32, _, _>(
                r#"{"a": 0, "b": 1, "c": 2, "ab": 3}"#.as_bytes(),
                "a b\nab c\n".as_bytes(),
                TokenTextEncoding::Raw,
                None,
            ),
            Err(FTError::MalformedVocabulary(_))
        ));

        assert!(matches!(
            read_json_merges_table::<u32, _, _>(
                VOCAB_JSON.as_bytes(),
                MERGES_TXT.as_bytes(),
                TokenTextEncoding::Raw,
                Some("[UNK]"),
            ),
            Err(FTError::MalformedVocabulary(_))
        ));
    }

    #[test]
    fn test_load_json_merges_table_path() {
        tempdir::TempDir::new("json_vocab_test")
            .and_then(|dir| {
                let vocab_path = dir.path().join("vocab.json");
                let merges_path = dir.path().join("merges.txt");

                File::create(&vocab_path)?.write_all(VOCAB_JSON.as_bytes())?;
                File::create(&merges_path)?.write_all(MERGES_TXT.as_bytes())?;

                let table: RankerTable<u16> = load_json_merges_table_path(
                    &vocab_path,
                    &merges_path,
                    TokenTextEncoding::Raw,
                    None,
                )
                .expect("Failed to load vocab");
                assert_eq!(table.num_merges(), 2);
                assert_eq!(table.unknown_token(), None);

                Ok(())
            })
            .unwrap();
    }
}
