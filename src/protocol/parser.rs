//! Command Line Tokenizer
//!
//! This module turns a raw input line into the tokens the command handler
//! consumes. It performs no semantic validation at all: unknown commands,
//! wrong argument counts and malformed keys are all left to dispatch.
//!
//! ## Tokenizing Rules
//!
//! 1. Any run of non-alphanumeric characters is a single delimiter.
//! 2. A leading delimiter produces a leading empty token.
//! 3. One trailing empty token (from a trailing delimiter or newline) is
//!    stripped.
//!
//! ```text
//! "SET a 10\n"   ──>  ["SET", "a", "10"]
//! "get  a\r\n"   ──>  ["get", "a"]
//! " GET a"       ──>  ["", "GET", "a"]
//! ""             ──>  []
//! ```

/// A tokenized command line.
///
/// The first token is the command name, the rest are raw arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tokens {
    tokens: Vec<String>,
}

impl Tokens {
    /// Returns the command name, or `None` for an empty line.
    pub fn command(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Returns the raw arguments following the command name.
    pub fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    /// Returns true if the line produced no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of tokens, command name included.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns all tokens as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }
}

/// Splits a raw line into tokens.
pub fn tokenize(line: &str) -> Tokens {
    if line.is_empty() {
        return Tokens::default();
    }

    // Only the first piece may stay empty; every later empty piece is either
    // part of a delimiter run or the trailing token.
    let tokens = line
        .split(|c: char| !c.is_alphanumeric())
        .enumerate()
        .filter(|(i, part)| *i == 0 || !part.is_empty())
        .map(|(_, part)| part.to_string())
        .collect();

    Tokens { tokens }
}
