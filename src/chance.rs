//! Small helpers over the caller-supplied randomness source.
//!
//! Every randomized syntactic choice in the generators goes through these,
//! so tests can drive the engines with a seeded [`rand::rngs::StdRng`] and
//! get reproducible output.

use rand::seq::SliceRandom;
use rand::Rng;

/// Fair coin flip.
pub fn coin(rng: &mut impl Rng) -> bool {
    rng.gen()
}

/// Randomize the case of every ASCII letter in `s`.
pub fn random_case(rng: &mut impl Rng, s: &str) -> String {
    s.chars()
        .map(|c| {
            if !c.is_ascii_alphabetic() {
                c
            } else if rng.gen() {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

/// Zero to `max` spaces — incidental whitespace in generated code.
pub fn pad(rng: &mut impl Rng, max: usize) -> String {
    " ".repeat(rng.gen_range(0..=max))
}

/// Pick one element uniformly.
pub fn pick<'a, T>(rng: &mut impl Rng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

/// Shuffled copy of `items`.
pub fn shuffled<T: Clone>(rng: &mut impl Rng, items: &[T]) -> Vec<T> {
    let mut v = items.to_vec();
    v.shuffle(rng);
    v
}
