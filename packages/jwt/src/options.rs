//! Parser limits.

/// Default upper bound on accepted token length, in bytes.
pub const DEFAULT_MAX_TOKEN_LEN: usize = 64 * 1024;

/// Options applied before a token is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Longest token accepted, in bytes.
    pub max_token_len: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
        }
    }
}

impl ParseOptions {
    /// Set the longest accepted token.
    #[must_use]
    pub fn with_max_token_len(mut self, max_token_len: usize) -> Self {
        self.max_token_len = max_token_len;
        self
    }
}
