//! Alphabet
//!
//! The ordered set of residue symbols valid for `wildtype` and `mutant`. The order is the
//! row order of the heatmap in the front end.
use crate::error::{Result, ValidationError};
use std::str::FromStr;

/// Amino acids ordered by chemical property, then gap and stop.
pub const DEFAULT_ALPHABET: &str = "RKHDEQNSTYWFAILMVGPC-*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    pub fn new(symbols: &str) -> Result<Self> {
        let invalid = |reason: &str| ValidationError::InvalidAlphabet {
            alphabet: symbols.to_string(),
            reason: reason.to_string(),
        };
        if symbols.is_empty() {
            return Err(invalid("the alphabet is empty"));
        }
        let mut seen: Vec<char> = Vec::with_capacity(symbols.len());
        for c in symbols.chars() {
            if c.is_whitespace() {
                return Err(invalid("the alphabet contains whitespace"));
            }
            if seen.contains(&c) {
                return Err(invalid(&format!("'{c}' appears more than once")));
            }
            seen.push(c);
        }
        Ok(Alphabet { symbols: seen })
    }

    /// `true` if `residue` is exactly one symbol of the alphabet.
    pub fn contains(&self, residue: &str) -> bool {
        let mut chars = residue.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.symbols.contains(&c),
            _ => false,
        }
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The alphabet as one string per symbol, the shape expected in the output.
    pub fn to_strings(&self) -> Vec<String> {
        self.symbols.iter().map(|c| c.to_string()).collect()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet {
            symbols: DEFAULT_ALPHABET.chars().collect(),
        }
    }
}

impl FromStr for Alphabet {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        Alphabet::new(s)
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.symbols.iter().try_for_each(|c| write!(f, "{c}"))
    }
}
