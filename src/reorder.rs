//! Fragment reordering (level 2): permute the concatenated fragments and
//! reconstruct their order through a positional format expression.
//!
//! `('ab'+'cd'+'ef')` becomes `("{2}{0}{1}" -f 'cd','ef','ab')` — the
//! fragments appear shuffled in the source text while the format template
//! puts them back in evaluation order.

use crate::chance;
use crate::tokenize::{self, Token, TokenKind};
use rand::seq::SliceRandom;
use rand::Rng;

/// A located concatenation group: byte span plus the raw fragment literals.
struct ConcatGroup {
    start: usize,
    end: usize,
    fragments: Vec<String>,
}

/// Find the first parenthesized run of two or more string literals joined
/// by `+`. Restore arguments like `('x','y')` or `([char]97+[char]98)` do
/// not match the shape, so the first hit is always the payload group.
fn find_concat_group(tokens: &[Token]) -> Option<ConcatGroup> {
    for i in 0..tokens.len() {
        if tokens[i].kind != TokenKind::LParen {
            continue;
        }
        let Some(first) = tokens.get(i + 1) else {
            continue;
        };
        if first.kind != TokenKind::Str {
            continue;
        }
        let mut fragments = vec![first.text.clone()];
        let mut j = i + 2;
        while j + 1 < tokens.len()
            && tokens[j].kind == TokenKind::Plus
            && tokens[j + 1].kind == TokenKind::Str
        {
            fragments.push(tokens[j + 1].text.clone());
            j += 2;
        }
        if fragments.len() >= 2 && tokens.get(j).map(|t| t.kind) == Some(TokenKind::RParen) {
            return Some(ConcatGroup {
                start: tokens[i].start,
                end: tokens[j].end,
                fragments,
            });
        }
    }
    None
}

/// Rewrite the first concatenation group of `expr` as a format-template
/// expression with permuted arguments. Expressions without a reorderable
/// group (fewer than two fragments) come back unchanged.
pub fn reorder(expr: &str, rng: &mut impl Rng) -> String {
    let tokens = tokenize::tokenize(expr);
    let Some(group) = find_concat_group(&tokens) else {
        return expr.to_string();
    };
    let n = group.fragments.len();

    // `order[slot]` is the fragment emitted at argument position `slot`.
    // An identity permutation would leave the emission order unchanged, so
    // reshuffle until something moves.
    let mut order: Vec<usize> = (0..n).collect();
    while order.iter().enumerate().all(|(slot, &f)| slot == f) {
        order.shuffle(rng);
    }
    let mut position = vec![0usize; n];
    for (slot, &fragment) in order.iter().enumerate() {
        position[fragment] = slot;
    }

    let template: String = (0..n).map(|i| format!("{{{}}}", position[i])).collect();
    let mut args = String::new();
    for (i, &fragment) in order.iter().enumerate() {
        if i > 0 {
            args.push(',');
            args.push_str(&chance::pad(rng, 1));
        }
        args.push_str(&group.fragments[fragment]);
    }
    let quote = if chance::coin(rng) { '\'' } else { '"' };
    let replacement = format!(
        "({quote}{template}{quote}{p1}{f}{p2}{args})",
        p1 = chance::pad(rng, 1),
        f = chance::random_case(rng, "-f"),
        p2 = chance::pad(rng, 1),
    );
    format!(
        "{}{}{}",
        &expr[..group.start],
        replacement,
        &expr[group.end..]
    )
}
