//! Token estimation as a swappable strategy.

use serde::Serialize;

/// Estimates how many model tokens a piece of text costs.
pub trait TokenEstimator {
    fn estimate(&self, text: &str) -> usize;
}

/// Primary estimator: word count weighted up for subword splitting, plus a
/// share of symbol characters, which tokenize roughly one each. Degenerate
/// results fall back to the `length/4` rule.
#[derive(Debug, Default)]
pub struct HeuristicEstimator;

impl TokenEstimator for HeuristicEstimator {
    fn estimate(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        let words = text.split_whitespace().count();
        let symbols = text
            .chars()
            .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
            .count();
        let estimate = (words as f64 * 1.3).ceil() as usize + symbols / 2;
        if estimate == 0 {
            return CharEstimator.estimate(text);
        }
        estimate
    }
}

/// Fallback estimator: one token per four characters, rounded up.
#[derive(Debug, Default)]
pub struct CharEstimator;

impl TokenEstimator for CharEstimator {
    fn estimate(&self, text: &str) -> usize {
        text.len().div_ceil(4)
    }
}

pub fn default_estimator() -> Box<dyn TokenEstimator> {
    Box::new(HeuristicEstimator)
}

/// Estimate the token cost of a value's JSON form. Serialization failure is
/// swallowed and reported as zero cost.
pub fn estimate_json<T: Serialize>(estimator: &dyn TokenEstimator, value: &T) -> usize {
    match serde_json::to_string(value) {
        Ok(json) => estimator.estimate(&json),
        Err(err) => {
            log::debug!("token estimation skipped unserializable value: {err}");
            0
        }
    }
}
