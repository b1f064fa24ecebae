//! Fuzzy string scoring for typo-tolerant title lookup.
//!
//! [`WeightedRatio`] combines several views of two strings and keeps the best:
//! - plain ratio: indel similarity of the whole strings, `2 * LCS / (len_a + len_b)`
//! - partial ratio: best ratio of the shorter string against any equally long
//!   window of the longer one (for "matrix" vs "the matrix reloaded")
//! - token sort ratio: ratio after sorting words (for reordered words)
//! - token set ratio: ratio over shared and leftover word sets
//!
//! Partial scores are discounted as the length difference grows, so a short
//! query cannot reach 100 against a long title just by being a substring.

use crate::traits::Scorer;
use std::collections::BTreeSet;
use strsim::normalized_levenshtein;

const TOKEN_SCALE: f64 = 0.95;

/// Lowercase, replace anything that is not alphanumeric with a space, trim
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Plain normalized Levenshtein similarity on the 0-100 scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevenshteinRatio;

impl Scorer for LevenshteinRatio {
    fn name(&self) -> &str {
        "LevenshteinRatio"
    }

    fn score(&self, query: &str, choice: &str) -> u8 {
        if query.is_empty() || choice.is_empty() {
            return 0;
        }
        to_score(normalized_levenshtein(query, choice) * 100.0)
    }
}

/// Best of ratio, partial ratio and token ratios, weighted by length
/// difference.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRatio;

impl Scorer for WeightedRatio {
    fn name(&self) -> &str {
        "WeightedRatio"
    }

    fn score(&self, query: &str, choice: &str) -> u8 {
        to_score(weighted_ratio(query, choice))
    }
}

fn to_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Length of the longest common subsequence of two character slices
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Indel similarity (insertions and deletions only), 0 if either side is empty
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    200.0 * lcs_len(&a, &b) as f64 / (a.len() + b.len()) as f64
}

pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (short, long) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };

    if short.is_empty() {
        return 0.0;
    }
    if short.len() == long.len() {
        return ratio(a, b);
    }

    let short: String = short.into_iter().collect();
    let mut best = 0.0_f64;
    for window in long.windows(short.chars().count()) {
        let window: String = window.iter().collect();
        best = best.max(ratio(&short, &window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn partial_token_sort_ratio(a: &str, b: &str) -> f64 {
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn token_set_with(a: &str, b: &str, score: fn(&str, &str) -> f64) -> f64 {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();

    let join = |tokens: Vec<&str>| tokens.join(" ");
    let common = join(set_a.intersection(&set_b).copied().collect());
    let only_a = join(set_a.difference(&set_b).copied().collect());
    let only_b = join(set_b.difference(&set_a).copied().collect());

    let with_a = format!("{common} {only_a}").trim().to_string();
    let with_b = format!("{common} {only_b}").trim().to_string();

    score(&common, &with_a)
        .max(score(&common, &with_b))
        .max(score(&with_a, &with_b))
}

pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    token_set_with(a, b, ratio)
}

fn partial_token_set_ratio(a: &str, b: &str) -> f64 {
    token_set_with(a, b, partial_ratio)
}

pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let base = ratio(a, b);
    let len_a = a.chars().count() as f64;
    let len_b = b.chars().count() as f64;
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);

    if len_ratio < 1.5 {
        return base
            .max(token_sort_ratio(a, b) * TOKEN_SCALE)
            .max(token_set_ratio(a, b) * TOKEN_SCALE);
    }

    let partial_scale = if len_ratio <= 8.0 { 0.9 } else { 0.6 };
    base.max(partial_ratio(a, b) * partial_scale)
        .max(partial_token_sort_ratio(a, b) * TOKEN_SCALE * partial_scale)
        .max(partial_token_set_ratio(a, b) * TOKEN_SCALE * partial_scale)
}
