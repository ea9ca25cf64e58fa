//! Invocation encapsulation: wrap an expression so that, on evaluation, its
//! textual value is itself evaluated as code.

use crate::chance;
use rand::Rng;

/// Short- and long-form evaluator keywords.
const EVALUATORS: [&str; 2] = ["IEX", "Invoke-Expression"];

/// Wrap `expr` in a randomly shaped evaluate-this-string idiom: prefix call
/// `IEX( <expr> )` or pipeline `<expr> | IEX`, with random keyword choice,
/// casing, and incidental spacing.
pub fn wrap(expr: &str, rng: &mut impl Rng) -> String {
    let keyword = *chance::pick(rng, &EVALUATORS);
    let keyword = chance::random_case(rng, keyword);
    if chance::coin(rng) {
        format!(
            "{keyword}{p1}({p2}{expr}{p3})",
            p1 = chance::pad(rng, 1),
            p2 = chance::pad(rng, 1),
            p3 = chance::pad(rng, 1),
        )
    } else {
        format!(
            "{expr}{p1}|{p2}{keyword}",
            p1 = chance::pad(rng, 1),
            p2 = chance::pad(rng, 1),
        )
    }
}
