//! Full reversal (level 3): run the level-1 pipeline, reverse the entire
//! result character-by-character, and emit code that restores the original
//! order before a second evaluation.
//!
//! Reversal can butt the escape introducer up against a control letter it
//! was never meant to escape — `n` followed by a backtick reads as `` `n ``
//! once reversed — so a sanitization pass strips those pairs. It runs
//! exactly once, after assembly; before reversal the pair is not adjacent
//! and must be left alone.

use crate::chance;
use crate::charset::Charset;
use crate::concat;
use crate::level;
use crate::substitute;
use crate::wrap;
use anyhow::{bail, Result};
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// Backtick directly before a control letter forms an escape sequence.
static RE_ACCIDENTAL_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("`([0abfnrtv])").unwrap());

/// Identifier length before collision-driven growth.
const NAME_LEN: usize = 2;

/// Strip escape introducers that sit directly before a control letter.
pub fn sanitize_reversed(text: &str) -> String {
    RE_ACCIDENTAL_ESCAPE.replace_all(text, "$1").to_string()
}

/// Quote `text` as a single literal; embedded single quotes are doubled,
/// everything else (including backticks and `$`) is inert in this kind.
fn single_quoted(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Obfuscate `text` by reversing a complete level-1 encoding and emitting
/// one of three reconstruction idioms around a fresh variable.
///
/// Every reconstruction idiom reverses UTF-16 code units at evaluation
/// time, so a character outside the Basic Multilingual Plane would come
/// back with its surrogate halves swapped. Such input is rejected.
pub fn reverse_obfuscate(text: &str, charset: &Charset, rng: &mut impl Rng) -> Result<String> {
    if let Some(c) = text.chars().find(|c| c.len_utf16() > 1) {
        bail!("cannot reverse {c:?}: characters outside the Basic Multilingual Plane do not survive UTF-16 reversal");
    }
    let inner = level::level_one(text, charset, rng)?;
    let reversed: String = inner.chars().rev().collect();
    let name = substitute::fresh_token(
        &reversed,
        &charset.alphabet,
        NAME_LEN,
        "reversal variable",
        rng,
    )?;
    let assign = format!(
        "${name}{p1}={p2}{literal}",
        p1 = chance::pad(rng, 1),
        p2 = chance::pad(rng, 1),
        literal = single_quoted(&reversed),
    );

    // The regex idiom enumerates `.` matches, which never cross a newline,
    // so it is only in play for single-line payloads.
    let idioms: &[u8] = if reversed.contains('\n') {
        &[0, 1]
    } else {
        &[0, 1, 2]
    };
    let out = match *chance::pick(rng, idioms) {
        0 => {
            // negative-stride slice and join; string indexing at evaluation
            // time counts UTF-16 units, not scalars
            let length = reversed.encode_utf16().count();
            let expr = format!(
                "(${name}[{p1}-1{p2}..{p3}-{length}{p4}]{p5}{join}{p6}'')",
                p1 = chance::pad(rng, 1),
                p2 = chance::pad(rng, 1),
                p3 = chance::pad(rng, 1),
                p4 = chance::pad(rng, 1),
                p5 = chance::pad(rng, 1),
                join = chance::random_case(rng, "-join"),
                p6 = chance::pad(rng, 1),
            );
            format!("{assign};{}", wrap::wrap(&expr, rng))
        }
        1 => {
            // cast to char array, reverse in place, join
            let to_chars = chance::random_case(rng, "ToCharArray");
            let array_reverse = format!(
                "[{}]::{}",
                chance::random_case(rng, "array"),
                chance::random_case(rng, "Reverse"),
            );
            let join = chance::random_case(rng, "-join");
            let expr = format!("({join}{}${name})", chance::pad(rng, 1));
            format!(
                "{assign};{p1}${name}{p2}={p3}${name}.{to_chars}(){p4};{p5}{array_reverse}(${name}){p6};{p7}{wrapped}",
                p1 = chance::pad(rng, 1),
                p2 = chance::pad(rng, 1),
                p3 = chance::pad(rng, 1),
                p4 = chance::pad(rng, 1),
                p5 = chance::pad(rng, 1),
                p6 = chance::pad(rng, 1),
                p7 = chance::pad(rng, 1),
                wrapped = wrap::wrap(&expr, rng),
            )
        }
        _ => {
            // right-to-left regex match enumeration
            let matches = format!(
                "[{}]::{}",
                chance::random_case(rng, "regex"),
                chance::random_case(rng, "Matches"),
            );
            let flag = if chance::coin(rng) {
                chance::random_case(rng, "'RightToLeft'")
            } else {
                let quote = if chance::coin(rng) { '\'' } else { '"' };
                concat::concatenated("RightToLeft", quote, rng)
            };
            let join = chance::random_case(rng, "-join");
            let expr = format!(
                "({join}{p1}{matches}(${name},{p2}'.',{p3}{flag}))",
                p1 = chance::pad(rng, 1),
                p2 = chance::pad(rng, 1),
                p3 = chance::pad(rng, 1),
            );
            format!("{assign};{}", wrap::wrap(&expr, rng))
        }
    };
    Ok(sanitize_reversed(&out))
}
