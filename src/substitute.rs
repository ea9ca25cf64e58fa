//! Delimiter substitution: hide special characters behind random tokens.
//!
//! Each special character present in the input is replaced by a freshly
//! generated alphanumeric token that provably does not occur in the text at
//! the moment it is chosen (compared case-insensitively, because the
//! restore code may replace case-insensitively). The ⟨token, char⟩ pairs
//! are recorded so the restore synthesizer can emit code that undoes the
//! substitutions at evaluation time.

use crate::chance;
use crate::charset::Charset;
use anyhow::{bail, Result};
use rand::Rng;

/// Default token length; grows on collision.
const TOKEN_LEN: usize = 3;

/// One recorded substitution: `token` stands in for `original` in the text.
#[derive(Debug, Clone)]
pub struct Substitution {
    pub token: String,
    pub original: char,
    /// Quote kind used when the restore code renders `original` as a glyph.
    /// Opposite kind when `original` is itself a quote, random otherwise —
    /// a quote rendered inside its own quote kind would need re-escaping.
    pub quote: char,
}

/// Generate a random token from `alphabet` that does not occur in `text`
/// (case-insensitive). Starts at `len` characters and grows by one on every
/// collision; gives up once the length exceeds the alphabet size rather
/// than looping forever on pathological inputs.
pub fn fresh_token(
    text: &str,
    alphabet: &[char],
    len: usize,
    what: &str,
    rng: &mut impl Rng,
) -> Result<String> {
    let haystack = text.to_lowercase();
    let mut len = len;
    while len <= alphabet.len() {
        let token: String = (0..len)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();
        if !haystack.contains(&token.to_lowercase()) {
            return Ok(token);
        }
        len += 1;
    }
    bail!("could not allocate a collision-free token for {what}")
}

/// Replace every occurrence of each special character with a fresh token.
///
/// Characters are visited in random order; characters absent from the text
/// get no mapping entry. Returns the substituted text and the mapping in
/// substitution order — the restore code must apply it last-first, so a
/// token that happens to span a later replacement cannot leak early.
pub fn substitute(
    text: &str,
    charset: &Charset,
    rng: &mut impl Rng,
) -> Result<(String, Vec<Substitution>)> {
    let mut out = text.to_string();
    let mut mapping = Vec::new();
    for original in chance::shuffled(rng, &charset.to_replace) {
        if !out.contains(original) {
            continue;
        }
        let token = fresh_token(
            &out,
            &charset.alphabet,
            TOKEN_LEN,
            &format!("special character {original:?}"),
            rng,
        )?;
        out = out.replace(original, &token);
        let quote = match original {
            '\'' => '"',
            '"' => '\'',
            _ => {
                if chance::coin(rng) {
                    '\''
                } else {
                    '"'
                }
            }
        };
        mapping.push(Substitution {
            token,
            original,
            quote,
        });
    }
    Ok((out, mapping))
}

/// Textually undo a mapping, last-substituted-first — the Rust-side mirror
/// of what the emitted restore code does at evaluation time.
#[cfg(test)]
pub fn unapply(text: &str, mapping: &[Substitution]) -> String {
    let mut out = text.to_string();
    for sub in mapping.iter().rev() {
        out = out.replace(&sub.token, &sub.original.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    const SAMPLE: &str = "Write-Host \"it's `$PATH\\bin\" | Out-Null";

    #[test]
    fn removes_every_special_char() {
        let cs = Charset::default();
        let (out, _) = substitute(SAMPLE, &cs, &mut rng(1)).unwrap();
        for c in &cs.to_replace {
            assert!(!out.contains(*c), "{c:?} survived in: {out}");
        }
    }

    #[test]
    fn unapply_restores_original() {
        let cs = Charset::default();
        for seed in 0..20 {
            let (out, mapping) = substitute(SAMPLE, &cs, &mut rng(seed)).unwrap();
            assert_eq!(unapply(&out, &mapping), SAMPLE, "seed {seed}");
        }
    }

    #[test]
    fn no_entry_for_absent_chars() {
        let cs = Charset::default();
        let (out, mapping) = substitute("print(1)", &cs, &mut rng(2)).unwrap();
        assert_eq!(out, "print(1)");
        assert!(mapping.is_empty(), "Got: {mapping:?}");
    }

    #[test]
    fn tokens_are_alphanumeric_and_long_enough() {
        let cs = Charset::default();
        let (_, mapping) = substitute(SAMPLE, &cs, &mut rng(3)).unwrap();
        assert!(!mapping.is_empty());
        for sub in &mapping {
            assert!(sub.token.len() >= 3, "short token {:?}", sub.token);
            assert!(sub.token.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn quote_originals_get_opposite_quote() {
        let cs = Charset::default();
        let (_, mapping) = substitute("'a' \"b\"", &cs, &mut rng(4)).unwrap();
        for sub in &mapping {
            match sub.original {
                '\'' => assert_eq!(sub.quote, '"'),
                '"' => assert_eq!(sub.quote, '\''),
                _ => {}
            }
        }
    }

    #[test]
    fn layered_substitution_round_trips() {
        // Re-application on its own output must not corrupt anything:
        // unapply the outer mapping, then the inner one.
        let cs = Charset::default();
        let (inner, inner_map) = substitute(SAMPLE, &cs, &mut rng(5)).unwrap();
        let (outer, outer_map) = substitute(&inner, &cs, &mut rng(6)).unwrap();
        let back = unapply(&unapply(&outer, &outer_map), &inner_map);
        assert_eq!(back, SAMPLE);
    }

    #[test]
    fn fresh_token_avoids_text() {
        let cs = Charset::default();
        let text = "abcdefabc";
        for seed in 0..20 {
            let tok = fresh_token(text, &cs.alphabet, 3, "test", &mut rng(seed)).unwrap();
            assert!(
                !text.to_lowercase().contains(&tok.to_lowercase()),
                "collision: {tok}"
            );
        }
    }

    #[test]
    fn exhaustion_is_fatal_not_a_loop() {
        // "aabba" contains every 1- and 2-char combination over {a, b},
        // so a 2-char alphabet can never produce a collision-free token.
        let err = fresh_token("aabba", &['a', 'b'], 1, "character '$'", &mut rng(7))
            .unwrap_err();
        assert!(
            err.to_string().contains("collision-free"),
            "Got: {err}"
        );
        assert!(err.to_string().contains('$'), "Got: {err}");
    }

    #[test]
    fn collision_check_is_case_insensitive() {
        // The only candidate is "a"; the text contains "A".
        let err = fresh_token("A", &['a'], 1, "test", &mut rng(8)).unwrap_err();
        assert!(err.to_string().contains("collision-free"), "Got: {err}");
    }
}
