//! # Global Ranker
//!
//! A process-wide [`RankerTable`], built on first use from the environment.
//!
//! * ``FASTTOKENIZER_TIKTOKEN=<path>`` selects a base64 vocabulary.
//! * ``FASTTOKENIZER_VOCAB=<path>`` and ``FASTTOKENIZER_MERGES=<path>``
//!   select a json vocabulary and merge list; ``FASTTOKENIZER_TOKEN_TEXT``
//!   (``raw`` or ``byte_level``) and ``FASTTOKENIZER_UNK`` refine them.
//!
//! ``FASTTOKENIZER_TIKTOKEN`` wins when both are set.

use std::{path::PathBuf, str::FromStr, sync::Arc};

use once_cell::sync::OnceCell;

use crate::{
    errors::{FTError, FTResult},
    types::TokenType,
    vocab::{
        RankerTable,
        io::{TokenTextEncoding, load_base64_table_path, load_json_merges_table_path},
    },
};

/// Environment variable naming a base64 vocabulary file.
pub const TIKTOKEN_ENV: &str = "FASTTOKENIZER_TIKTOKEN";

/// Environment variable naming a json vocabulary file.
pub const VOCAB_ENV: &str = "FASTTOKENIZER_VOCAB";

/// Environment variable naming a merges file.
pub const MERGES_ENV: &str = "FASTTOKENIZER_MERGES";

/// Environment variable selecting the [`TokenTextEncoding`] of json vocabularies.
pub const TOKEN_TEXT_ENV: &str = "FASTTOKENIZER_TOKEN_TEXT";

/// Environment variable naming the unknown token of json vocabularies.
pub const UNK_ENV: &str = "FASTTOKENIZER_UNK";

/// Global ranker table.
static GLOBAL_RANKER: OnceCell<Arc<RankerTable<u32>>> = OnceCell::new();

/// Where a [`RankerTable`] is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankerSource {
    /// A base64 ("tiktoken") vocabulary.
    Tiktoken {
        /// The vocabulary file.
        path: PathBuf,
    },

    /// A json vocabulary plus a merges file.
    JsonMerges {
        /// The ``vocab.json`` file.
        vocab: PathBuf,

        /// The ``merges.txt`` file.
        merges: PathBuf,

        /// The token text encoding of both files.
        encoding: TokenTextEncoding,

        /// The unknown token text, if any.
        unknown: Option<String>,
    },
}

impl RankerSource {
    /// Resolve the source from the process environment.
    pub fn from_env() -> FTResult<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Resolve the source from a variable lookup.
    ///
    /// Empty values count as unset.
    ///
    /// ## Returns
    /// The source; [`FTError::MissingResource`] when no complete source is
    /// configured, or [`FTError::Config`] for a bad token text encoding.
    pub fn from_vars<F>(lookup: F) -> FTResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(path) = get(TIKTOKEN_ENV) {
            return Ok(Self::Tiktoken { path: path.into() });
        }

        match (get(VOCAB_ENV), get(MERGES_ENV)) {
            (Some(vocab), Some(merges)) => {
                let encoding = match get(TOKEN_TEXT_ENV) {
                    Some(value) => TokenTextEncoding::from_str(value.trim())
                        .map_err(|_| FTError::Config(format!("{TOKEN_TEXT_ENV}={value:?}")))?,
                    None => TokenTextEncoding::default(),
                };
                Ok(Self::JsonMerges {
                    vocab: vocab.into(),
                    merges: merges.into(),
                    encoding,
                    unknown: get(UNK_ENV),
                })
            }
            (Some(_), None) => Err(FTError::MissingResource(format!(
                "{VOCAB_ENV} is set, but {MERGES_ENV} is not"
            ))),
            (None, Some(_)) => Err(FTError::MissingResource(format!(
                "{MERGES_ENV} is set, but {VOCAB_ENV} is not"
            ))),
            (None, None) => Err(FTError::MissingResource(format!(
                "set {TIKTOKEN_ENV}, or {VOCAB_ENV} and {MERGES_ENV}"
            ))),
        }
    }

    /// Load the table.
    pub fn load<T: TokenType>(&self) -> FTResult<RankerTable<T>> {
        log::info!("loading ranker table from {self:?}");
        match self {
            Self::Tiktoken { path } => load_base64_table_path(path),
            Self::JsonMerges {
                vocab,
                merges,
                encoding,
                unknown,
            } => load_json_merges_table_path(vocab, merges, *encoding, unknown.as_deref()),
        }
    }
}

/// Get the process-wide ranker table, building it on first call.
///
/// A failed build is not cached; the next call tries again.
pub fn global_ranker() -> FTResult<Arc<RankerTable<u32>>> {
    GLOBAL_RANKER
        .get_or_try_init(|| RankerSource::from_env()?.load().map(Arc::new))
        .cloned()
}
