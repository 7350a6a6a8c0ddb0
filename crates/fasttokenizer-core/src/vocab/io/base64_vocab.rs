//! # Base64 ("tiktoken") Vocabulary IO

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use base64::{Engine, prelude::BASE64_STANDARD};

use crate::{
    errors::{FTError, FTResult},
    types::{TokenType, token_to_u64},
    vocab::{RankerTable, SpanTokenMap},
};

/// Build a [`RankerTable`] from a base64 vocab file.
///
/// Token ids are treated as merge ranks; see [`RankerTable::from_span_map`].
///
/// ## Arguments
/// * `path` - the path to the vocabulary file.
pub fn load_base64_table_path<T, P>(path: P) -> FTResult<RankerTable<T>>
where
    T: TokenType,
    P: AsRef<Path>,
{
    RankerTable::from_span_map(load_base64_span_map_path(path)?)
}

/// Load a [`SpanTokenMap`] from a base64 vocab file.
///
/// Lines are:
/// ```terminaloutput
/// {BASE64 SPAN} {TOKEN}
/// ```
///
/// ## Arguments
/// * `path` - the path to the vocabulary file.
pub fn load_base64_span_map_path<T, P>(path: P) -> FTResult<SpanTokenMap<T>>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let reader = BufReader::new(File::open(path)?);
    read_base64_span_map(reader)
}

/// Read a [`SpanTokenMap`] from a base64 vocab line reader.
///
/// Lines are:
/// ```terminaloutput
/// {BASE64 SPAN} {TOKEN}
/// ```
///
/// Blank lines are skipped.
///
/// ## Arguments
/// * `reader` - the line reader.
pub fn read_base64_span_map<T, R>(reader: R) -> FTResult<SpanTokenMap<T>>
where
    T: TokenType,
    R: BufRead,
{
    let mut span_map = SpanTokenMap::default();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let s = line.trim_end();
        if s.is_empty() {
            continue;
        }

        let (span, id) = s
            .split_once(' ')
            .ok_or_else(|| FTError::Parse(format!("line {}: expected \"SPAN TOKEN\"", lineno + 1)))?;

        let span = BASE64_STANDARD
            .decode(span)
            .map_err(|e| FTError::Parse(format!("line {}: {e}", lineno + 1)))?;

        let id: u64 = id
            .parse()
            .map_err(|e: core::num::ParseIntError| FTError::Parse(format!("line {}: {e}", lineno + 1)))?;
        let token = T::from_u64(id).ok_or(FTError::TokenOutOfRange)?;

        if let Some(prev) = span_map.insert(span, token)
            && prev != token
        {
            return Err(FTError::MalformedVocabulary(format!(
                "line {}: span maps to both {prev} and {token}",
                lineno + 1
            )));
        }
    }

    Ok(span_map)
}

/// Save a [`SpanTokenMap`] to a base64 vocab file.
///
/// ## Arguments
/// * `span_map` - the vocabulary to save.
/// * `path` - the path to save the vocabulary to.
pub fn save_base64_span_map_path<T: TokenType, P: AsRef<Path>>(
    span_map: &SpanTokenMap<T>,
    path: P,
) -> FTResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_base64_span_map(span_map, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a [`SpanTokenMap`] to a [`Write`] writer, in token order.
///
/// ## Arguments
/// * `span_map` - the vocabulary to save.
/// * `writer` - the writer to target.
pub fn write_base64_span_map<T, W>(
    span_map: &SpanTokenMap<T>,
    writer: &mut W,
) -> FTResult<()>
where
    T: TokenType,
    W: Write,
{
    let mut items: Vec<(T, &Vec<u8>)> = span_map
        .iter()
        .map(|(span, &token)| (token, span))
        .collect();
    items.sort_by_key(|(t, _)| *t);

    for (token, span) in items {
        writeln!(
            writer,
            "{} {}",
            BASE64_STANDARD.encode(span),
            token_to_u64(token)
        )?;
    }

    Ok(())
}
