//! Title resolution: free-text user input to a known catalog title.
//!
//! ## Algorithm
//! 1. Reject empty or whitespace-only input without scoring anything
//! 2. Normalize input and every distinct title
//! 3. Score each title, keeping the first one with the highest score
//! 4. Accept it only if the score passes the threshold

use crate::error::{RecommendError, Result};
use crate::fuzzy::{normalize, WeightedRatio};
use crate::traits::Scorer;
use data_loader::Catalog;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Default acceptance threshold on the 0-100 scale
pub const DEFAULT_THRESHOLD: u8 = 60;

/// How the best score is compared with the threshold.
///
/// Dataset variants disagree on this, so it is configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    /// `score >= threshold`
    #[default]
    AtLeast,
    /// `score > threshold`
    GreaterThan,
}

impl ThresholdMode {
    pub fn accepts(self, score: u8, threshold: u8) -> bool {
        match self {
            ThresholdMode::AtLeast => score >= threshold,
            ThresholdMode::GreaterThan => score > threshold,
        }
    }
}

impl FromStr for ThresholdMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "at_least" | "at-least" | ">=" => Ok(ThresholdMode::AtLeast),
            "greater_than" | "greater-than" | ">" => Ok(ThresholdMode::GreaterThan),
            other => Err(format!(
                "invalid threshold mode '{other}', expected 'at_least' or 'greater_than'"
            )),
        }
    }
}

impl fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdMode::AtLeast => write!(f, "at_least"),
            ThresholdMode::GreaterThan => write!(f, "greater_than"),
        }
    }
}

/// A resolved title and the score it was accepted with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleMatch {
    pub title: String,
    pub score: u8,
}

/// Finds the closest known title for user input.
#[derive(Clone)]
pub struct TitleResolver {
    threshold: u8,
    mode: ThresholdMode,
    scorer: Arc<dyn Scorer>,
}

impl TitleResolver {
    pub fn new(threshold: u8, mode: ThresholdMode) -> Self {
        Self {
            threshold,
            mode,
            scorer: Arc::new(WeightedRatio),
        }
    }

    /// Replace the scoring metric (builder pattern)
    pub fn with_scorer(mut self, scorer: impl Scorer + 'static) -> Self {
        self.scorer = Arc::new(scorer);
        self
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn mode(&self) -> ThresholdMode {
        self.mode
    }

    /// Best match among `known_titles`, or `None` below the threshold.
    ///
    /// Ties go to the title that comes first in `known_titles`.
    pub fn resolve<S: AsRef<str>>(&self, input: &str, known_titles: &[S]) -> Option<TitleMatch> {
        if input.trim().is_empty() {
            return None;
        }
        let query = normalize(input);
        if query.is_empty() {
            return None;
        }

        let mut best: Option<(&str, u8)> = None;
        for title in known_titles {
            let title = title.as_ref();
            let choice = normalize(title);
            let score = if choice.is_empty() {
                0
            } else {
                self.scorer.score(&query, &choice)
            };

            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((title, score));
                if score == 100 {
                    break;
                }
            }
        }

        let (title, score) = best?;
        debug!(
            "Best match for '{}' is '{}' with {} score {}",
            input,
            title,
            self.scorer.name(),
            score
        );

        self.mode.accepts(score, self.threshold).then(|| TitleMatch {
            title: title.to_string(),
            score,
        })
    }

    /// Resolve against the distinct titles of a catalog
    pub fn resolve_in(&self, catalog: &Catalog, input: &str) -> Option<TitleMatch> {
        self.resolve(input, &catalog.distinct_titles())
    }

    /// Like [`resolve_in`](Self::resolve_in) but reports `NoMatch`
    pub fn resolve_or_err(&self, catalog: &Catalog, input: &str) -> Result<TitleMatch> {
        self.resolve_in(catalog, input)
            .ok_or_else(|| RecommendError::NoMatch {
                input: input.to_string(),
            })
    }
}

impl Default for TitleResolver {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, ThresholdMode::default())
    }
}

impl fmt::Debug for TitleResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TitleResolver")
            .field("threshold", &self.threshold)
            .field("mode", &self.mode)
            .field("scorer", &self.scorer.name())
            .finish()
    }
}

/// Resolve `input` against `known_titles` with the default scorer and
/// `>=` comparison
pub fn resolve<S: AsRef<str>>(input: &str, known_titles: &[S], threshold: u8) -> Option<TitleMatch> {
    TitleResolver::new(threshold, ThresholdMode::AtLeast).resolve(input, known_titles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::LevenshteinRatio;

    const TITLES: &[&str] = &["Inception", "Interstellar", "Titanic"];

    /// Scores every pair the same, to exercise tie-breaking
    struct ConstantScorer(u8);

    impl Scorer for ConstantScorer {
        fn name(&self) -> &str {
            "ConstantScorer"
        }

        fn score(&self, _query: &str, _choice: &str) -> u8 {
            self.0
        }
    }

    /// Panics if called, to prove blank input never reaches the scorer
    struct PanicScorer;

    impl Scorer for PanicScorer {
        fn name(&self) -> &str {
            "PanicScorer"
        }

        fn score(&self, _query: &str, _choice: &str) -> u8 {
            panic!("scorer must not be called");
        }
    }

    #[test]
    fn test_typo_resolves() {
        let found = resolve("Inceptoin", TITLES, 60).unwrap();
        assert_eq!(found.title, "Inception");
        assert!(found.score > 60);
    }

    #[test]
    fn test_transposed_letters_resolve() {
        let found = resolve("Tiatnci", TITLES, 60).unwrap();
        assert_eq!(found, TitleMatch { title: "Titanic".to_string(), score: 71 });
    }

    #[test]
    fn test_exact_title_scores_100() {
        let found = resolve("Titanic", TITLES, 100).unwrap();
        assert_eq!(found, TitleMatch { title: "Titanic".to_string(), score: 100 });
    }

    #[test]
    fn test_case_and_punctuation_are_ignored() {
        let found = resolve("  titanic!! ", TITLES, 100).unwrap();
        assert_eq!(found.title, "Titanic");
    }

    #[test]
    fn test_blank_input_is_no_match() {
        let resolver = TitleResolver::default().with_scorer(PanicScorer);
        assert!(resolver.resolve("", TITLES).is_none());
        assert!(resolver.resolve("   ", TITLES).is_none());
        assert!(resolver.resolve("?!", TITLES).is_none());
    }

    #[test]
    fn test_below_threshold_is_no_match() {
        assert!(resolve("zzzzzz", TITLES, 60).is_none());
    }

    #[test]
    fn test_empty_title_list() {
        let empty: &[&str] = &[];
        assert!(resolve("Inception", empty, 0).is_none());
    }

    #[test]
    fn test_ties_go_to_first_title() {
        let resolver = TitleResolver::new(50, ThresholdMode::AtLeast).with_scorer(ConstantScorer(70));
        assert_eq!(resolver.resolve("anything", TITLES).unwrap().title, "Inception");
    }

    #[test]
    fn test_threshold_modes() {
        let at_least = TitleResolver::new(70, ThresholdMode::AtLeast).with_scorer(ConstantScorer(70));
        let greater = TitleResolver::new(70, ThresholdMode::GreaterThan).with_scorer(ConstantScorer(70));

        assert!(at_least.resolve("x", TITLES).is_some());
        assert!(greater.resolve("x", TITLES).is_none());
    }

    #[test]
    fn test_threshold_mode_parsing() {
        assert_eq!("at_least".parse::<ThresholdMode>(), Ok(ThresholdMode::AtLeast));
        assert_eq!(">".parse::<ThresholdMode>(), Ok(ThresholdMode::GreaterThan));
        assert!("sometimes".parse::<ThresholdMode>().is_err());
        assert_eq!(ThresholdMode::GreaterThan.to_string(), "greater_than");
    }

    #[test]
    fn test_levenshtein_scorer() {
        let resolver = TitleResolver::default().with_scorer(LevenshteinRatio);
        assert_eq!(resolver.resolve("Inceptoin", TITLES).unwrap().title, "Inception");
    }

    #[test]
    fn test_resolve_or_err() {
        let catalog = Catalog::from_movies(TITLES.iter().map(|t| data_loader::Movie::new(*t)));
        let resolver = TitleResolver::default();

        assert_eq!(resolver.resolve_or_err(&catalog, "Interstelar").unwrap().title, "Interstellar");
        assert_eq!(
            resolver.resolve_or_err(&catalog, "qqqq"),
            Err(RecommendError::NoMatch { input: "qqqq".to_string() })
        );
    }
}
