//! Restore-command synthesis: emit code that undoes the delimiter
//! substitutions at evaluation time.
//!
//! Three strategies produce the same runtime string through very different
//! source text: a `.Replace()` method chain, a chain of `-replace` /
//! `-creplace` operators, or a positional `-f` format expression whose
//! argument list supplies the hidden characters. One strategy is chosen per
//! invocation and used for every mapping entry; entries are always applied
//! in reverse substitution order so no partially restored intermediate can
//! expose a token that is a substring of a not-yet-restored one.

use crate::chance;
use crate::concat;
use crate::substitute::Substitution;
use rand::Rng;

/// How the emitted code restores the hidden characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    MethodReplace,
    OperatorReplace,
    FormatOperator,
}

/// Pick a strategy for this invocation. The format strategy rewrites the
/// text with `{N}` placeholders, so it is off the table whenever the text
/// already contains braces.
pub fn pick_strategy(substituted: &str, rng: &mut impl Rng) -> Strategy {
    if substituted.contains('{') || substituted.contains('}') {
        if chance::coin(rng) {
            Strategy::MethodReplace
        } else {
            Strategy::OperatorReplace
        }
    } else {
        *chance::pick(
            rng,
            &[
                Strategy::MethodReplace,
                Strategy::OperatorReplace,
                Strategy::FormatOperator,
            ],
        )
    }
}

fn render_codepoint(c: char, rng: &mut impl Rng) -> String {
    format!("[{}]{}", chance::random_case(rng, "char"), c as u32)
}

/// Render one original character for the emitted restore code. Quote
/// delimiters and the backtick always come out as `[char]N`, so the restore
/// code itself never needs escaping; everything else picks randomly between
/// a quoted glyph and the code-point form.
fn render_original(sub: &Substitution, rng: &mut impl Rng) -> String {
    let forced = matches!(sub.original, '\'' | '"' | '`');
    if forced || chance::coin(rng) {
        render_codepoint(sub.original, rng)
    } else {
        format!("{q}{c}{q}", q = sub.quote, c = sub.original)
    }
}

/// Render a delimiter token: either a plain quoted literal (tokens are
/// alphanumeric, so single quotes are always safe) or a parenthesized
/// concatenation of per-character code points. `[char]+[char]` adds the code
/// points as integers, so the chain leads with a string cast on its first
/// operand to make every `+` a concatenation.
fn render_token(token: &str, rng: &mut impl Rng) -> String {
    if chance::coin(rng) {
        format!("'{token}'")
    } else {
        let parts: Vec<String> = token.chars().map(|c| render_codepoint(c, rng)).collect();
        format!(
            "([{cast}]{chain})",
            cast = chance::random_case(rng, "string"),
            chain = parts.join("+"),
        )
    }
}

/// Compose the concatenated expression for `substituted` with the restore
/// commands for the whole mapping. This is the level-1 expression before
/// encapsulation.
pub fn synthesize(
    substituted: &str,
    mapping: &[Substitution],
    strategy: Strategy,
    rng: &mut impl Rng,
) -> String {
    let quote = if chance::coin(rng) { '\'' } else { '"' };
    if mapping.is_empty() {
        return concat::concatenated(substituted, quote, rng);
    }
    match strategy {
        Strategy::MethodReplace => {
            let mut expr = concat::concatenated(substituted, quote, rng);
            for sub in mapping.iter().rev() {
                expr = format!(
                    "{expr}.{method}({token},{pad}{original})",
                    method = chance::random_case(rng, "Replace"),
                    token = render_token(&sub.token, rng),
                    pad = chance::pad(rng, 1),
                    original = render_original(sub, rng),
                );
            }
            format!("({expr})")
        }
        Strategy::OperatorReplace => {
            let mut expr = concat::concatenated(substituted, quote, rng);
            for sub in mapping.iter().rev() {
                let op = if chance::coin(rng) { "-replace" } else { "-creplace" };
                expr = format!(
                    "{expr}{p1}{op}{p2}{token},{p3}{original}",
                    p1 = chance::pad(rng, 2),
                    op = chance::random_case(rng, op),
                    p2 = chance::pad(rng, 2),
                    token = render_token(&sub.token, rng),
                    p3 = chance::pad(rng, 1),
                    original = render_original(sub, rng),
                );
            }
            format!("({expr})")
        }
        Strategy::FormatOperator => {
            // Indices are assigned in reverse-processing order: 0 is the
            // last-substituted token, matching the restore discipline.
            let mut templated = substituted.to_string();
            let mut args = String::new();
            for (index, sub) in mapping.iter().rev().enumerate() {
                templated = templated.replace(&sub.token, &format!("{{{index}}}"));
                if index > 0 {
                    args.push(',');
                    args.push_str(&chance::pad(rng, 1));
                }
                args.push_str(&render_original(sub, rng));
            }
            format!(
                "({concat}{p1}{f}{p2}{args})",
                concat = concat::concatenated(&templated, quote, rng),
                p1 = chance::pad(rng, 1),
                f = chance::random_case(rng, "-f"),
                p2 = chance::pad(rng, 1),
            )
        }
    }
}
