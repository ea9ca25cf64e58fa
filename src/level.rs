//! Obfuscation level selection and dispatch.
//!
//! Levels layer on each other: 1 hides special characters and splits the
//! text into a concatenation with restore code, 2 additionally shuffles the
//! fragments behind a format template, 3 reverses a complete level-1
//! encoding wholesale and emits reconstruction code.

use crate::charset::Charset;
use crate::{chance, reorder, restore, reverse, substitute, wrap};
use anyhow::Result;
use rand::Rng;

/// The transformation applied to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Pass the text through untouched.
    Pass,
    /// Delimiter substitution + concatenation + restore commands.
    Concat,
    /// Level 1 with the concatenated fragments reordered behind `-f`.
    Reorder,
    /// Level 1 output reversed wholesale, plus reconstruction code.
    Reverse,
}

impl Level {
    /// Resolve the requested level: absent → uniform among {1,2,3}; out of
    /// range → clamped to the maximum. Past this point the enum makes an
    /// invalid level unrepresentable, so dispatch needs no defensive arm.
    pub fn select(requested: Option<i64>, rng: &mut impl Rng) -> Level {
        match requested {
            None => *chance::pick(rng, &[Level::Concat, Level::Reorder, Level::Reverse]),
            Some(0) => Level::Pass,
            Some(1) => Level::Concat,
            Some(2) => Level::Reorder,
            Some(3) => Level::Reverse,
            Some(_) => Level::Reverse,
        }
    }
}

/// Substitute and concatenate `text`, appending the restore commands.
/// This is the level-1 expression before encapsulation.
fn delimited_and_concatenated(
    text: &str,
    charset: &Charset,
    rng: &mut impl Rng,
) -> Result<String> {
    let (substituted, mapping) = substitute::substitute(text, charset, rng)?;
    let strategy = restore::pick_strategy(&substituted, rng);
    Ok(restore::synthesize(&substituted, &mapping, strategy, rng))
}

/// The complete level-1 pipeline: substitute, concatenate, restore,
/// encapsulate. Level 3 reuses this as its inner encoding.
pub(crate) fn level_one(text: &str, charset: &Charset, rng: &mut impl Rng) -> Result<String> {
    let expr = delimited_and_concatenated(text, charset, rng)?;
    Ok(wrap::wrap(&expr, rng))
}

/// Obfuscate `text` at the given level. The result is an expression in the
/// target dialect whose evaluation reproduces the behavior of `text`.
pub fn obfuscate(
    text: &str,
    level: Level,
    charset: &Charset,
    rng: &mut impl Rng,
) -> Result<String> {
    match level {
        Level::Pass => Ok(text.to_string()),
        Level::Concat => level_one(text, charset, rng),
        Level::Reorder => {
            let expr = delimited_and_concatenated(text, charset, rng)?;
            let reordered = reorder::reorder(&expr, rng);
            Ok(wrap::wrap(&reordered, rng))
        }
        Level::Reverse => reverse::reverse_obfuscate(text, charset, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    const HELLO: &str = "print('Hello World!')";

    fn has_evaluator(out: &str) -> bool {
        let low = out.to_lowercase();
        low.contains("iex") || low.contains("invoke-expression")
    }

    #[test]
    fn level_zero_is_identity() {
        let cs = Charset::default();
        let out = obfuscate(HELLO, Level::Pass, &cs, &mut rng(1)).unwrap();
        assert_eq!(out, HELLO);
    }

    #[test]
    fn select_maps_the_valid_range() {
        let mut r = rng(2);
        assert_eq!(Level::select(Some(0), &mut r), Level::Pass);
        assert_eq!(Level::select(Some(1), &mut r), Level::Concat);
        assert_eq!(Level::select(Some(2), &mut r), Level::Reorder);
        assert_eq!(Level::select(Some(3), &mut r), Level::Reverse);
    }

    #[test]
    fn select_clamps_out_of_range_to_maximum() {
        let mut r = rng(3);
        assert_eq!(Level::select(Some(-1), &mut r), Level::Reverse);
        assert_eq!(Level::select(Some(4), &mut r), Level::Reverse);
        assert_eq!(Level::select(Some(99), &mut r), Level::Reverse);
    }

    #[test]
    fn select_without_argument_avoids_pass_through() {
        for seed in 0..30 {
            let level = Level::select(None, &mut rng(seed));
            assert_ne!(level, Level::Pass, "seed {seed}");
        }
    }

    #[test]
    fn every_level_wraps_in_an_evaluator() {
        let cs = Charset::default();
        for level in [Level::Concat, Level::Reorder, Level::Reverse] {
            for seed in 0..10 {
                let out = obfuscate(HELLO, level, &cs, &mut rng(seed)).unwrap();
                assert_ne!(out, HELLO, "{level:?} seed {seed}");
                assert!(has_evaluator(&out), "{level:?} seed {seed}: {out}");
            }
        }
    }

    #[test]
    fn reorder_level_emits_a_format_template() {
        let cs = Charset::default();
        for seed in 0..20 {
            let out = obfuscate(HELLO, Level::Reorder, &cs, &mut rng(seed)).unwrap();
            assert!(out.to_lowercase().contains("-f"), "seed {seed}: {out}");
            assert!(out.contains("{0}"), "seed {seed}: {out}");
        }
    }

    #[test]
    fn reverse_level_leads_with_the_reversed_assignment() {
        let cs = Charset::default();
        for seed in 0..20 {
            let out = obfuscate(HELLO, Level::Reverse, &cs, &mut rng(seed)).unwrap();
            assert!(out.starts_with('$'), "seed {seed}: {out}");
        }
    }

    #[test]
    fn deterministic_under_a_fixed_seed() {
        let cs = Charset::default();
        for level in [Level::Concat, Level::Reorder, Level::Reverse] {
            let a = obfuscate(HELLO, level, &cs, &mut rng(42)).unwrap();
            let b = obfuscate(HELLO, level, &cs, &mut rng(42)).unwrap();
            assert_eq!(a, b, "{level:?}");
        }
    }

    #[test]
    fn syntactically_diverse_across_seeds() {
        let cs = Charset::default();
        let outputs: HashSet<String> = (0..20)
            .map(|seed| obfuscate(HELLO, Level::Concat, &cs, &mut rng(seed)).unwrap())
            .collect();
        assert!(outputs.len() > 1, "every seed produced identical output");
    }

    #[test]
    fn reapplication_does_not_corrupt() {
        // Obfuscating an already obfuscated expression must still produce a
        // well-formed result whose substitution layer round-trips.
        let cs = Charset::default();
        let once = obfuscate(HELLO, Level::Concat, &cs, &mut rng(7)).unwrap();
        let twice = obfuscate(&once, Level::Concat, &cs, &mut rng(8)).unwrap();
        assert!(has_evaluator(&twice), "Got: {twice}");

        let (subbed, mapping) = substitute::substitute(&once, &cs, &mut rng(9)).unwrap();
        assert_eq!(substitute::unapply(&subbed, &mapping), once);
    }

    #[test]
    fn empty_input_is_total() {
        let cs = Charset::default();
        for level in [Level::Pass, Level::Concat, Level::Reorder, Level::Reverse] {
            assert!(obfuscate("", level, &cs, &mut rng(1)).is_ok(), "{level:?}");
        }
    }
}
