//! Character-set configuration for the substitution engines.
//!
//! The reference tool kept "characters to hide" and "characters to build
//! delimiter tokens from" as ambient globals; here they are explicit inputs
//! so every engine can be driven (and tested) with a custom set.

/// Characters eligible for delimiter substitution, plus the alphabet used
/// to generate replacement tokens and variable names.
#[derive(Debug, Clone)]
pub struct Charset {
    /// Syntactically significant characters that get hidden behind tokens:
    /// quote delimiters, variable sigil, escape introducer, path separator,
    /// pipe operator.
    pub to_replace: Vec<char>,
    /// Alphanumeric alphabet for generated tokens. Contains no quote
    /// characters, so tokens never need escaping inside string literals.
    pub alphabet: Vec<char>,
}

impl Default for Charset {
    fn default() -> Self {
        let to_replace = vec!['\'', '"', '$', '`', '\\', '|'];
        let mut alphabet: Vec<char> = ('a'..='z').collect();
        alphabet.extend('A'..='Z');
        alphabet.extend('0'..='9');
        Self {
            to_replace,
            alphabet,
        }
    }
}
