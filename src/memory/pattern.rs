//! Pattern compilation for signature and text scans

use crate::core::types::{MemoryError, MemoryResult};
use std::fmt;
use std::str::FromStr;

/// Marker accepted in either nibble of a wildcard pair
pub const WILDCARD: u8 = b'?';

/// A single position of a compiled pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// Must equal this byte
    Literal(u8),
    /// Matches any byte value
    Wildcard,
}

impl Token {
    #[inline]
    pub fn matches(&self, byte: u8) -> bool {
        match self {
            Token::Literal(expected) => *expected == byte,
            Token::Wildcard => true,
        }
    }
}

/// An ordered, non-empty sequence of match tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    tokens: Vec<Token>,
}

impl Pattern {
    /// Compiles a pattern string such as `"48 8B ?? ?? 5C"`.
    ///
    /// Whitespace is ignored anywhere in the input, so `"488B????5C"` is the
    /// same pattern. A pair is a wildcard if either of its characters is `?`
    /// (`"?A"`, `"A?"` and `"??"` are all wildcards).
    pub fn compile(pattern: &str) -> MemoryResult<Self> {
        let digits: Vec<u8> = pattern
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();

        if digits.is_empty() {
            return Err(MemoryError::InvalidPattern("Empty pattern".to_string()));
        }

        if digits.len() % 2 != 0 {
            return Err(MemoryError::InvalidPattern(format!(
                "Odd number of pattern characters ({})",
                digits.len()
            )));
        }

        let tokens = digits
            .chunks_exact(2)
            .enumerate()
            .map(|(index, pair)| Self::compile_pair(index, pair))
            .collect::<MemoryResult<Vec<_>>>()?;

        Ok(Pattern { tokens })
    }

    fn compile_pair(index: usize, pair: &[u8]) -> MemoryResult<Token> {
        if pair.contains(&WILDCARD) {
            return Ok(Token::Wildcard);
        }

        let mut byte = [0u8; 1];
        hex::decode_to_slice(pair, &mut byte).map_err(|_| {
            MemoryError::InvalidPattern(format!(
                "Invalid hex pair '{}' at position {}",
                String::from_utf8_lossy(pair),
                index
            ))
        })?;

        Ok(Token::Literal(byte[0]))
    }

    /// Encodes literal text, one byte per character.
    ///
    /// Only characters in `U+0000..=U+00FF` have a single-byte form; anything
    /// else is rejected rather than truncated. Wildcards are not recognised.
    pub fn from_text(text: &str) -> MemoryResult<Self> {
        if text.is_empty() {
            return Err(MemoryError::InvalidPattern("Empty search text".to_string()));
        }

        let tokens = text
            .chars()
            .enumerate()
            .map(|(index, c)| {
                u8::try_from(u32::from(c))
                    .map(Token::Literal)
                    .map_err(|_| {
                        MemoryError::InvalidPattern(format!(
                            "Character '{}' at position {} has no single-byte encoding",
                            c, index
                        ))
                    })
            })
            .collect::<MemoryResult<Vec<_>>>()?;

        Ok(Pattern { tokens })
    }

    /// Builds an exact-match pattern from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> MemoryResult<Self> {
        if bytes.is_empty() {
            return Err(MemoryError::InvalidPattern("Empty pattern".to_string()));
        }
        Ok(Pattern {
            tokens: bytes.iter().copied().map(Token::Literal).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false for a compiled pattern; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Whether the pattern contains any wildcard position
    pub fn has_wildcards(&self) -> bool {
        self.tokens.contains(&Token::Wildcard)
    }

    /// Checks the pattern against `haystack` starting at `offset`.
    ///
    /// Returns false when the pattern would run past the end of the slice.
    #[inline]
    pub fn matches_at(&self, haystack: &[u8], offset: usize) -> bool {
        match haystack.get(offset..offset.saturating_add(self.tokens.len())) {
            Some(window) => self
                .tokens
                .iter()
                .zip(window)
                .all(|(token, &byte)| token.matches(byte)),
            None => false,
        }
    }
}

impl FromStr for Pattern {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::compile(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match token {
                Token::Literal(byte) => write!(f, "{:02X}", byte)?,
                Token::Wildcard => write!(f, "??")?,
            }
        }
        Ok(())
    }
}
