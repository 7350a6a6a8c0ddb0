#![allow(missing_docs)]

use std::{fs::File, io::Write, sync::Arc};

use fasttokenizer_core::{
    EncoderOptions,
    FTError,
    global::{MERGES_ENV, TIKTOKEN_ENV, VOCAB_ENV, global_ranker},
};
use serial_test::serial;

#[test]
#[serial]
fn test_global_ranker() {
    let dir = tempdir::TempDir::new("global_ranker_test").unwrap();

    // SAFETY: tests touching the environment are serialized.
    unsafe {
        std::env::remove_var(TIKTOKEN_ENV);
        std::env::remove_var(VOCAB_ENV);
        std::env::remove_var(MERGES_ENV);
    }
    assert!(matches!(global_ranker(), Err(FTError::MissingResource(_))));

    let vocab_path = dir.path().join("vocab.json");
    let merges_path = dir.path().join("merges.txt");
    File::create(&vocab_path)
        .unwrap()
        .write_all(br#"{"h": 0, "i": 1, "hi": 2, " ": 3}"#)
        .unwrap();
    File::create(&merges_path)
        .unwrap()
        .write_all(b"#version: 0.2\nh i\n")
        .unwrap();

    // SAFETY: tests touching the environment are serialized.
    unsafe {
        std::env::set_var(VOCAB_ENV, &vocab_path);
        std::env::set_var(MERGES_ENV, &merges_path);
    }

    let first = global_ranker().unwrap();
    assert_eq!(first.len(), 4);

    // Built once; later calls ignore the environment.
    unsafe {
        std::env::remove_var(VOCAB_ENV);
    }
    let second = global_ranker().unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let encoder = EncoderOptions::default().build(second).unwrap();
    assert_eq!(encoder.try_encode(b"hi hi").unwrap(), vec![2, 3, 2]);
}
