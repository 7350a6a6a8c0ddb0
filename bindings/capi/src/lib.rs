//! # `libfasttokenizer` C ABI
//!
//! ```c
//! const void *token_ranker(void);
//! unsigned int *encode(const char *text, unsigned int *out_count, const void *ranker);
//! unsigned int *encode_len(const char *text, size_t len, unsigned int *out_count, const void *ranker);
//! void release_result(unsigned int *tokens, unsigned int len);
//!
//! const void *ranker_load_json(const char *vocab_path, const char *merges_path, int byte_level, const char *unk);
//! const void *ranker_load_tiktoken(const char *path);
//! void ranker_destroy(const void *ranker);
//! ```
//!
//! Handles are opaque; [`token_ranker`] returns the process-wide ranker,
//! configured from the environment (see [`fasttokenizer_core::global`] and
//! [`EncoderOptions::from_env`]). Failures return null and are logged to
//! stderr; ``FASTTOKENIZER_LOG`` (0-5, default 2) sets the verbosity.
//!
//! Each call encodes a single text on the calling thread, so the
//! ``FASTTOKENIZER_PARALLEL`` batch option does not apply here.
//!
//! Every array returned by [`encode`] or [`encode_len`] must be passed to
//! [`release_result`] exactly once.
#![warn(missing_docs, unused)]

use std::{
    ffi::{CStr, c_char, c_int, c_uint, c_void},
    panic::{AssertUnwindSafe, catch_unwind},
    path::PathBuf,
    sync::Arc,
};

use fasttokenizer_core::{
    EncoderOptions,
    FTError,
    FTResult,
    RankerEncoder,
    RankerTable,
    TokenEncoder,
    global::global_ranker,
    vocab::io::{TokenTextEncoding, load_base64_table_path, load_json_merges_table_path},
};
use once_cell::sync::OnceCell;

/// Environment variable holding the log verbosity.
pub const LOG_ENV: &str = "FASTTOKENIZER_LOG";

/// The encoder behind a ranker handle.
pub type RankerHandle = RankerEncoder<c_uint>;

static SINGLETON: OnceCell<Arc<RankerHandle>> = OnceCell::new();
static LOGGING: OnceCell<()> = OnceCell::new();

fn setup_logging() {
    LOGGING.get_or_init(|| {
        let level = std::env::var(LOG_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u8>().ok())
            .unwrap_or(2);

        let log_level = match level {
            0 => stderrlog::LogLevelNum::Off,
            1 => stderrlog::LogLevelNum::Error,
            2 => stderrlog::LogLevelNum::Warn,
            3 => stderrlog::LogLevelNum::Info,
            4 => stderrlog::LogLevelNum::Debug,
            _ => stderrlog::LogLevelNum::Trace,
        };

        // The host may have installed a logger already.
        let _ = stderrlog::new()
            .module("fasttokenizer")
            .module("fasttokenizer_core")
            .verbosity(log_level)
            .init();
    });
}

/// Run an exported call, turning errors and panics into `fallback`.
fn ffi_call<R, F>(
    name: &str,
    fallback: R,
    f: F,
) -> R
where
    F: FnOnce() -> FTResult<R>,
{
    setup_logging();
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => value,
        Ok(Err(err)) => {
            log::error!("{name}: {err}");
            fallback
        }
        Err(_) => {
            log::error!("{name}: panicked");
            fallback
        }
    }
}

fn build_handle(table: Arc<RankerTable<c_uint>>) -> FTResult<Arc<RankerHandle>> {
    Ok(Arc::new(RankerEncoder::new(table, EncoderOptions::from_env()?)?))
}

fn into_raw_handle(handle: Arc<RankerHandle>) -> *const c_void {
    Arc::into_raw(handle) as *const c_void
}

fn is_singleton(ranker: *const c_void) -> bool {
    SINGLETON
        .get()
        .is_some_and(|h| Arc::as_ptr(h) as *const c_void == ranker)
}

/// # Safety
/// `s` must be null or a valid null-terminated string.
unsafe fn str_arg<'a>(
    s: *const c_char,
    what: &str,
) -> FTResult<Option<&'a str>> {
    if s.is_null() {
        return Ok(None);
    }
    let s = unsafe { CStr::from_ptr(s) };
    s.to_str()
        .map(Some)
        .map_err(|_| FTError::InvalidInput(format!("{what} is not UTF-8")))
}

/// # Safety
/// `s` must be null or a valid null-terminated string.
unsafe fn path_arg(
    s: *const c_char,
    what: &str,
) -> FTResult<PathBuf> {
    unsafe { str_arg(s, what)? }
        .map(PathBuf::from)
        .ok_or_else(|| FTError::InvalidInput(format!("{what} is null")))
}

/// # Safety
/// `ranker` must be null or a live handle.
unsafe fn handle_ref<'a>(ranker: *const c_void) -> FTResult<&'a RankerHandle> {
    if ranker.is_null() {
        return Err(FTError::InvalidInput("ranker is null".to_string()));
    }
    Ok(unsafe { &*(ranker as *const RankerHandle) })
}

/// # Safety
/// `out_count` must be valid for writes.
unsafe fn encode_to_raw(
    handle: &RankerHandle,
    text: &[u8],
    out_count: *mut c_uint,
) -> FTResult<*mut c_uint> {
    let tokens = handle.try_encode(text)?;
    let count = c_uint::try_from(tokens.len()).map_err(|_| {
        FTError::InvalidInput(format!("{} tokens do not fit an unsigned int", tokens.len()))
    })?;

    let ptr = Box::into_raw(tokens.into_boxed_slice()) as *mut c_uint;
    unsafe { *out_count = count };
    Ok(ptr)
}

/// Get the process-wide ranker handle.
///
/// Built on the first successful call; later calls return the same handle.
/// Returns null, and logs, if the vocabulary is not configured or fails to load.
#[unsafe(no_mangle)]
pub extern "C" fn token_ranker() -> *const c_void {
    ffi_call("token_ranker", core::ptr::null(), || {
        let handle = SINGLETON.get_or_try_init(|| build_handle(global_ranker()?))?;
        Ok(Arc::as_ptr(handle) as *const c_void)
    })
}

/// Load a ranker from ``vocab.json`` and ``merges.txt`` files.
///
/// A nonzero `byte_level` reads GPT-2 byte-level token text.
/// A non-null `unk` names the vocabulary entry used for uncovered bytes.
/// Release the handle with [`ranker_destroy`].
///
/// # Safety
/// Both paths and `unk` must be null or valid null-terminated strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ranker_load_json(
    vocab_path: *const c_char,
    merges_path: *const c_char,
    byte_level: c_int,
    unk: *const c_char,
) -> *const c_void {
    ffi_call("ranker_load_json", core::ptr::null(), || {
        let vocab_path = unsafe { path_arg(vocab_path, "vocab_path")? };
        let merges_path = unsafe { path_arg(merges_path, "merges_path")? };
        let unk = unsafe { str_arg(unk, "unk")? };
        let encoding = if byte_level != 0 {
            TokenTextEncoding::ByteLevel
        } else {
            TokenTextEncoding::Raw
        };

        let table = load_json_merges_table_path(vocab_path, merges_path, encoding, unk)?;
        Ok(into_raw_handle(build_handle(Arc::new(table))?))
    })
}

/// Load a ranker from a base64 ("tiktoken") vocabulary file.
///
/// Release the handle with [`ranker_destroy`].
///
/// # Safety
/// `path` must be null or a valid null-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ranker_load_tiktoken(path: *const c_char) -> *const c_void {
    ffi_call("ranker_load_tiktoken", core::ptr::null(), || {
        let path = unsafe { path_arg(path, "path")? };
        let table = load_base64_table_path(path)?;
        Ok(into_raw_handle(build_handle(Arc::new(table))?))
    })
}

/// Destroy a handle from [`ranker_load_json`] or [`ranker_load_tiktoken`].
///
/// Null and the [`token_ranker`] handle are ignored.
///
/// # Safety
/// `ranker` must be null, the singleton, or a loaded handle not yet destroyed;
/// no encode call may be using it.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ranker_destroy(ranker: *const c_void) {
    if ranker.is_null() || is_singleton(ranker) {
        return;
    }
    drop(unsafe { Arc::from_raw(ranker as *const RankerHandle) });
}

/// Encode a null-terminated string.
///
/// Writes the token count to `out_count` and returns an array of that many
/// tokens; release it with [`release_result`]. Zero tokens still yield a
/// non-null array. On failure, returns null with a count of 0.
///
/// # Safety
/// `text` must be null or a valid null-terminated string; `out_count` must be
/// null or valid for writes; `ranker` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn encode(
    text: *const c_char,
    out_count: *mut c_uint,
    ranker: *const c_void,
) -> *mut c_uint {
    if out_count.is_null() {
        setup_logging();
        log::error!("encode: out_count is null");
        return core::ptr::null_mut();
    }
    unsafe { *out_count = 0 };

    ffi_call("encode", core::ptr::null_mut(), || {
        if text.is_null() {
            return Err(FTError::InvalidInput("text is null".to_string()));
        }
        let handle = unsafe { handle_ref(ranker)? };
        let text = unsafe { CStr::from_ptr(text) }.to_bytes();
        unsafe { encode_to_raw(handle, text, out_count) }
    })
}

/// Encode `len` bytes of `text`, which may contain null bytes.
///
/// Otherwise as [`encode`].
///
/// # Safety
/// `text` must be null or valid for `len` byte reads; `out_count` must be
/// null or valid for writes; `ranker` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn encode_len(
    text: *const c_char,
    len: usize,
    out_count: *mut c_uint,
    ranker: *const c_void,
) -> *mut c_uint {
    if out_count.is_null() {
        setup_logging();
        log::error!("encode_len: out_count is null");
        return core::ptr::null_mut();
    }
    unsafe { *out_count = 0 };

    ffi_call("encode_len", core::ptr::null_mut(), || {
        let text: &[u8] = match (text.is_null(), len) {
            (_, 0) => &[],
            (true, _) => return Err(FTError::InvalidInput("text is null".to_string())),
            (false, _) => unsafe { core::slice::from_raw_parts(text as *const u8, len) },
        };
        let handle = unsafe { handle_ref(ranker)? };
        unsafe { encode_to_raw(handle, text, out_count) }
    })
}

/// Release an array returned by [`encode`] or [`encode_len`].
///
/// Null is ignored.
///
/// # Safety
/// `tokens` must be null, or an unreleased result whose count was `len`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn release_result(
    tokens: *mut c_uint,
    len: c_uint,
) {
    if tokens.is_null() {
        return;
    }
    let slice = core::ptr::slice_from_raw_parts_mut(tokens, len as usize);
    drop(unsafe { Box::from_raw(slice) });
}

#[cfg(test)]
mod tests {
    use std::{ffi::CString, fs::File, io::Write, thread};

    use fasttokenizer_core::vocab::{SpanTokenMap, io::save_base64_span_map_path};

    use super::*;

    /// Write a base64 vocab: bytes are tokens 0..=255, "ab" = 256, "abc" = 257.
    fn write_tiktoken(dir: &tempdir::TempDir) -> CString {
        let mut span_map: SpanTokenMap<c_uint> =
            (0..=255u8).map(|b| (vec![b], b as c_uint)).collect();
        span_map.insert(b"ab".to_vec(), 256);
        span_map.insert(b"abc".to_vec(), 257);

        let path = dir.path().join("vocab.tiktoken");
        save_base64_span_map_path(&span_map, &path).unwrap();
        CString::new(path.to_str().unwrap()).unwrap()
    }

    unsafe fn encode_vec(
        ranker: *const c_void,
        text: &[u8],
    ) -> Option<Vec<c_uint>> {
        let mut count: c_uint = 99;
        let ptr = unsafe { encode_len(text.as_ptr() as *const c_char, text.len(), &mut count, ranker) };
        if ptr.is_null() {
            assert_eq!(count, 0);
            return None;
        }
        let tokens = unsafe { core::slice::from_raw_parts(ptr, count as usize) }.to_vec();
        unsafe { release_result(ptr, count) };
        Some(tokens)
    }

    #[test]
    fn test_load_encode_release() {
        let dir = tempdir::TempDir::new("capi_test").unwrap();
        let path = write_tiktoken(&dir);

        unsafe {
            let ranker = ranker_load_tiktoken(path.as_ptr());
            assert!(!ranker.is_null());

            let text = CString::new("abcab").unwrap();
            let mut count: c_uint = 0;
            let ptr = encode(text.as_ptr(), &mut count, ranker);
            assert!(!ptr.is_null());
            assert_eq!(count, 2);
            assert_eq!(core::slice::from_raw_parts(ptr, 2), &[257, 256]);
            release_result(ptr, count);

            // Zero tokens is still a non-null result.
            let empty = CString::new("").unwrap();
            let ptr = encode(empty.as_ptr(), &mut count, ranker);
            assert!(!ptr.is_null());
            assert_eq!(count, 0);
            release_result(ptr, count);

            // Embedded nulls are fine with an explicit length.
            assert_eq!(encode_vec(ranker, b"ab\0ab"), Some(vec![256, 0, 256]));

            ranker_destroy(ranker);
        }
    }

    #[test]
    fn test_load_json() {
        let dir = tempdir::TempDir::new("capi_json_test").unwrap();
        let vocab_path = dir.path().join("vocab.json");
        let merges_path = dir.path().join("merges.txt");
        File::create(&vocab_path)
            .unwrap()
            .write_all(r#"{"a": 0, "Ġ": 1, "Ġa": 2, "<unk>": 3}"#.as_bytes())
            .unwrap();
        File::create(&merges_path)
            .unwrap()
            .write_all("#version: 0.2\nĠ a\n".as_bytes())
            .unwrap();

        let vocab = CString::new(vocab_path.to_str().unwrap()).unwrap();
        let merges = CString::new(merges_path.to_str().unwrap()).unwrap();

        unsafe {
            let ranker = ranker_load_json(vocab.as_ptr(), merges.as_ptr(), 1, core::ptr::null());
            assert!(!ranker.is_null());
            assert_eq!(encode_vec(ranker, b"a a"), Some(vec![0, 2]));

            // "b" has no token, and there is no unknown token.
            assert_eq!(encode_vec(ranker, b"ab"), None);
            ranker_destroy(ranker);

            // Raw text reads "Ġ" as its two UTF-8 bytes, which have no byte tokens.
            let ranker = ranker_load_json(vocab.as_ptr(), merges.as_ptr(), 0, core::ptr::null());
            assert!(!ranker.is_null());
            assert_eq!(encode_vec(ranker, b"a"), Some(vec![0]));
            assert_eq!(encode_vec(ranker, "Ġa".as_bytes()), None);
            ranker_destroy(ranker);
        }
    }

    #[test]
    fn test_load_json_unknown_token() {
        let dir = tempdir::TempDir::new("capi_json_unk_test").unwrap();
        let vocab_path = dir.path().join("vocab.json");
        let merges_path = dir.path().join("merges.txt");
        File::create(&vocab_path)
            .unwrap()
            .write_all(r#"{"a": 0, "Ġ": 1, "Ġa": 2, "<unk>": 3}"#.as_bytes())
            .unwrap();
        File::create(&merges_path)
            .unwrap()
            .write_all("#version: 0.2\nĠ a\n".as_bytes())
            .unwrap();

        let vocab = CString::new(vocab_path.to_str().unwrap()).unwrap();
        let merges = CString::new(merges_path.to_str().unwrap()).unwrap();
        let unk = CString::new("<unk>").unwrap();
        let missing = CString::new("<missing>").unwrap();

        unsafe {
            let ranker = ranker_load_json(vocab.as_ptr(), merges.as_ptr(), 1, unk.as_ptr());
            assert!(!ranker.is_null());
            assert_eq!(encode_vec(ranker, b"ab a"), Some(vec![0, 3, 2]));
            ranker_destroy(ranker);

            assert!(ranker_load_json(vocab.as_ptr(), merges.as_ptr(), 1, missing.as_ptr()).is_null());
        }
    }

    #[test]
    fn test_null_handling() {
        let dir = tempdir::TempDir::new("capi_null_test").unwrap();
        let path = write_tiktoken(&dir);
        let text = CString::new("abc").unwrap();
        let missing = CString::new(dir.path().join("missing").to_str().unwrap()).unwrap();

        unsafe {
            assert!(ranker_load_tiktoken(core::ptr::null()).is_null());
            assert!(ranker_load_tiktoken(missing.as_ptr()).is_null());
            assert!(ranker_load_json(core::ptr::null(), path.as_ptr(), 0, core::ptr::null()).is_null());

            let ranker = ranker_load_tiktoken(path.as_ptr());
            let mut count: c_uint = 7;

            assert!(encode(text.as_ptr(), &mut count, core::ptr::null()).is_null());
            assert_eq!(count, 0);

            count = 7;
            assert!(encode(core::ptr::null(), &mut count, ranker).is_null());
            assert_eq!(count, 0);

            assert!(encode(text.as_ptr(), core::ptr::null_mut(), ranker).is_null());
            assert!(encode_len(core::ptr::null(), 3, &mut count, ranker).is_null());
            assert_eq!(encode_vec(ranker, b""), Some(vec![]));

            release_result(core::ptr::null_mut(), 0);
            ranker_destroy(core::ptr::null());
            ranker_destroy(ranker);
        }
    }

    #[test]
    fn test_concurrent_encode() {
        let dir = tempdir::TempDir::new("capi_thread_test").unwrap();
        let path = write_tiktoken(&dir);

        let ranker = unsafe { ranker_load_tiktoken(path.as_ptr()) };
        assert!(!ranker.is_null());

        let text: Vec<u8> = b"abcabxab".repeat(100);
        let expected = unsafe { encode_vec(ranker, &text) }.unwrap();
        assert!(expected.len() < text.len());

        // Raw pointers are not Send; pass the handle as an address.
        let addr = ranker as usize;
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let text = text.clone();
                thread::spawn(move || unsafe { encode_vec(addr as *const c_void, &text) }.unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }

        unsafe { ranker_destroy(ranker) };
    }
}
