//! Concatenation encoding: split text into literal fragments joined by `+`.
//!
//! `('Write-H'+'ost hi')` evaluates to the same string as
//! `'Write-Host hi'`. Fragment boundaries are random, so every run produces
//! a different split.

use crate::chance;
use rand::Rng;

/// Longest fragment the splitter will emit.
const MAX_FRAGMENT: usize = 7;

/// Split `text` into randomly sized non-empty fragments. Inputs of two or
/// more characters always yield at least two fragments, so the
/// concatenation structure is visible in the output.
pub fn split_fragments(text: &str, rng: &mut impl Rng) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 2 {
        return vec![text.to_string()];
    }
    let mut fragments = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let take = rng.gen_range(1..=MAX_FRAGMENT.min(chars.len() - start));
        fragments.push(chars[start..start + take].iter().collect());
        start += take;
    }
    if fragments.len() == 1 {
        let mid = chars.len() / 2;
        fragments = vec![chars[..mid].iter().collect(), chars[mid..].iter().collect()];
    }
    fragments
}

/// Escape `fragment` for a string literal of the given quote kind.
/// Single-quoted literals only need embedded single quotes doubled;
/// double-quoted literals additionally need the backtick and `$` escaped.
/// The backtick is doubled first so the backticks inserted for `$` are not
/// doubled again.
pub fn escape_literal(fragment: &str, quote: char) -> String {
    match quote {
        '\'' => fragment.replace('\'', "''"),
        _ => fragment
            .replace('`', "``")
            .replace('"', "\"\"")
            .replace('$', "`$"),
    }
}

/// Build the parenthesized concatenation expression for `text`.
pub fn concatenated(text: &str, quote: char, rng: &mut impl Rng) -> String {
    let fragments = split_fragments(text, rng);
    let mut out = String::from("(");
    for (i, fragment) in fragments.iter().enumerate() {
        if i > 0 {
            out.push_str(&chance::pad(rng, 1));
            out.push('+');
            out.push_str(&chance::pad(rng, 1));
        }
        out.push(quote);
        out.push_str(&escape_literal(fragment, quote));
        out.push(quote);
    }
    out.push(')');
    out
}
