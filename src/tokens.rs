use serde::{Deserialize, Serialize};
use thiserror::Error;
use tiktoken_rs::CoreBPE;

/// Appended when text had to be cut
pub const ELLIPSIS: &str = "...";

/// Tokens dropped at most when a cut lands inside a multi-byte character
const MAX_UTF8_BACKOFF: usize = 3;

/// BPE tables available for counting tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    #[default]
    Cl100kBase,
    O200kBase,
    P50kBase,
    R50kBase,
}

impl Encoding {
    fn load(self) -> Result<CoreBPE, TruncateError> {
        match self {
            Encoding::Cl100kBase => tiktoken_rs::cl100k_base(),
            Encoding::O200kBase => tiktoken_rs::o200k_base(),
            Encoding::P50kBase => tiktoken_rs::p50k_base(),
            Encoding::R50kBase => tiktoken_rs::r50k_base(),
        }
        .map_err(|e| TruncateError::Encoder(e.to_string()))
    }
}

/// Failure in the truncation stage
#[derive(Debug, Error)]
pub enum TruncateError {
    #[error("could not load token encoding: {0}")]
    Encoder(String),

    #[error("could not decode truncated tokens: {0}")]
    Decode(String),

    #[error("text cannot be shortened to fit {0} tokens")]
    Budget(usize),
}

/// Caps text at a fixed number of BPE tokens
pub struct Truncator {
    bpe: CoreBPE,
    budget: usize,
}

impl std::fmt::Debug for Truncator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Truncator")
            .field("budget", &self.budget)
            .finish_non_exhaustive()
    }
}

impl Truncator {
    pub fn new(encoding: Encoding, budget: usize) -> Result<Self, TruncateError> {
        if budget == 0 {
            return Err(TruncateError::Budget(budget));
        }
        Ok(Self {
            bpe: encoding.load()?,
            budget,
        })
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Return `text` unchanged if it fits the budget, otherwise its first
    /// `budget` tokens cut back to a word boundary and followed by `...`.
    ///
    /// The result always fits the budget, so truncating it again is a no-op.
    /// When no words fit next to the ellipsis, the result is the ellipsis
    /// alone.
    pub fn truncate(&self, text: &str) -> Result<String, TruncateError> {
        let tokens = self.bpe.encode_ordinary(text);
        if tokens.len() <= self.budget {
            return Ok(text.to_string());
        }

        ::log::debug!(
            "Truncating text from {} to {} tokens",
            tokens.len(),
            self.budget
        );

        // Decode the first `keep` tokens, dropping up to three more when the
        // cut splits a multi-byte character
        let decode_prefix = |keep: usize| -> Result<String, TruncateError> {
            let mut last_error = String::new();
            for backoff in 0..=MAX_UTF8_BACKOFF {
                let Some(end) = keep.checked_sub(backoff).filter(|end| *end > 0) else {
                    break;
                };
                match self.bpe.decode(tokens[..end].to_vec()) {
                    Ok(decoded) => return Ok(decoded),
                    Err(e) => last_error = e.to_string(),
                }
            }
            Err(TruncateError::Decode(last_error))
        };

        // The ellipsis can push a cut that exactly fills the budget over it;
        // keep fewer tokens until the repaired text fits.
        let mut keep = self.budget;
        while keep > 0 {
            let candidate = repair_boundary(&decode_prefix(keep)?, text);
            if self.count_tokens(&candidate) <= self.budget {
                return Ok(candidate);
            }
            keep -= 1;
        }

        // Budgets too small for even one word plus the ellipsis
        if self.count_tokens(ELLIPSIS) <= self.budget {
            return Ok(ELLIPSIS.to_string());
        }
        Err(TruncateError::Budget(self.budget))
    }
}

/// Avoid ending on half a word: if the cut text ends in an alphanumeric
/// character, drop back to the last space. Append the ellipsis either way.
fn repair_boundary(truncated: &str, original: &str) -> String {
    if truncated.len() >= original.len() {
        return truncated.to_string();
    }

    let ends_mid_word = truncated.chars().last().is_some_and(char::is_alphanumeric);
    let kept = if ends_mid_word {
        truncated
            .rsplit_once(' ')
            .map(|(head, _)| head)
            .unwrap_or(truncated)
    } else {
        truncated
    };

    format!("{}{}", kept, ELLIPSIS)
}
