//! # Encoder Test Utilities

use std::sync::Arc;

use crate::{
    compat::traits::static_is_send_sync_check,
    decoders::{DictionaryDecoder, TokenDecoder},
    encoders::{EncoderOptions, MergeStrategy, RankerEncoder, TokenEncoder, symbols::Symbol},
    types::TokenType,
    vocab::{MergeRuleList, RankerTable, SpanTokenMap},
};

/// Build a byte-level test table with merges for "hello" and " world".
///
/// Merged tokens, in rank order:
/// ``ll=256, he=257, hell=258, hello=259, " w"=260, or=261, " wor"=262, ld=263, " world"=264``.
pub fn build_test_table<T: TokenType>() -> RankerTable<T> {
    let rules = [
        ("l", "l"),
        ("h", "e"),
        ("he", "ll"),
        ("hell", "o"),
        (" ", "w"),
        ("o", "r"),
        (" w", "or"),
        ("l", "d"),
        (" wor", "ld"),
    ];

    let mut span_map: SpanTokenMap<T> = (0..=255u8)
        .map(|b| (vec![b], T::from_u8(b).unwrap()))
        .collect();
    let mut merges = MergeRuleList::new();
    for (i, (a, b)) in rules.iter().enumerate() {
        let merged = [a.as_bytes(), b.as_bytes()].concat();
        span_map.insert(merged, T::from_usize(256 + i).unwrap());
        merges.push((a.as_bytes().to_vec(), b.as_bytes().to_vec()));
    }

    RankerTable::new(span_map, merges).unwrap()
}

fn tokens<T: TokenType>(ids: &[usize]) -> Vec<T> {
    ids.iter().map(|&id| T::from_usize(id).unwrap()).collect()
}

/// Common tests for a [`MergeStrategy`] over [`build_test_table`].
pub fn common_merge_encoder_tests<T: TokenType>(strategy: MergeStrategy) {
    let table: Arc<RankerTable<T>> = build_test_table::<T>().into();
    let encoder = RankerEncoder::new(
        table.clone(),
        EncoderOptions::default().with_merge_strategy(strategy),
    )
    .unwrap();
    static_is_send_sync_check(&encoder);

    let decoder = DictionaryDecoder::new(table.clone());

    assert_eq!(
        encoder.try_encode(b"hello world").unwrap(),
        tokens::<T>(&[259, 264])
    );
    assert_eq!(
        encoder.try_encode(b"hello hello").unwrap(),
        tokens::<T>(&[259, b' ' as usize, 259])
    );
    assert_eq!(
        encoder.try_encode(b"hell").unwrap(),
        tokens::<T>(&[258])
    );
    assert_eq!(
        encoder.try_encode(b"llo").unwrap(),
        tokens::<T>(&[256, b'o' as usize])
    );
    assert!(encoder.try_encode(b"").unwrap().is_empty());

    let samples: Vec<&[u8]> = vec![
        b"hello world".as_slice(),
        b"hello san francisco",
        b"it's not the heat, it's the salt",
        b"\x00\xff\xfe worldworld",
    ];

    let batch = encoder.try_encode_batch(&samples).unwrap();
    for (sample, tokens) in samples.iter().zip(batch.iter()) {
        assert_eq!(&decoder.try_decode_to_bytes(tokens).unwrap(), sample);

        // Symbols partition the input.
        let symbols: Vec<Symbol<T>> = encoder.try_encode_symbols(sample).unwrap();
        let mut offset = 0;
        for symbol in &symbols {
            assert_eq!(symbol.start, offset);
            offset += symbol.len;
        }
        assert_eq!(offset, sample.len());
    }
}
