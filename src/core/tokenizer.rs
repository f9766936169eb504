//! Token estimate for the run report

use once_cell::sync::OnceCell;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tiktoken_rs::{cl100k_base, o200k_base, CoreBPE};
use tracing::warn;

/// Encoding used to size the combined output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenModel {
    #[default]
    Cl100k,
    O200k,
    /// Word-based estimate, no BPE tables loaded
    Approx,
}

impl TokenModel {
    const NAMES: [&'static str; 3] = ["cl100k", "o200k", "approx"];

    fn name(self) -> &'static str {
        match self {
            TokenModel::Cl100k => Self::NAMES[0],
            TokenModel::O200k => Self::NAMES[1],
            TokenModel::Approx => Self::NAMES[2],
        }
    }

    fn encoder(self) -> Option<&'static CoreBPE> {
        static CL100K: OnceCell<Option<CoreBPE>> = OnceCell::new();
        static O200K: OnceCell<Option<CoreBPE>> = OnceCell::new();

        let slot = match self {
            TokenModel::Cl100k => CL100K.get_or_init(|| {
                cl100k_base()
                    .inspect_err(|e| warn!("Falling back to approx token count: {}", e))
                    .ok()
            }),
            TokenModel::O200k => O200K.get_or_init(|| {
                o200k_base()
                    .inspect_err(|e| warn!("Falling back to approx token count: {}", e))
                    .ok()
            }),
            TokenModel::Approx => return None,
        };
        slot.as_ref()
    }
}

impl fmt::Display for TokenModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TokenModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let name = name.strip_suffix("_base").unwrap_or(&name);
        [TokenModel::Cl100k, TokenModel::O200k, TokenModel::Approx]
            .into_iter()
            .find(|model| model.name() == name)
            .ok_or_else(|| {
                format!(
                    "unknown token model '{}' (expected one of: {})",
                    s,
                    Self::NAMES.join(", ")
                )
            })
    }
}

/// Tokens in `text` under `model`
pub fn count_tokens(text: &str, model: TokenModel) -> usize {
    match model.encoder() {
        Some(bpe) => bpe.encode_ordinary(text).len(),
        None => approximate(text),
    }
}

/// Rough count for file records: about four characters per token inside a
/// word, while a run of one repeated character (a separator rule) packs into
/// far fewer tokens.
pub fn approximate(text: &str) -> usize {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            let first = chars.next();
            let len = word.chars().count();
            if len > 1 && chars.all(|c| Some(c) == first) {
                len.div_ceil(16)
            } else {
                len.div_ceil(4)
            }
        })
        .sum()
}
