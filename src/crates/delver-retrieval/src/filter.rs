//! Confidence-based evidence filtering
//!
//! Raw retrieval results are noisy: a handful of well-scored hits followed by
//! a long tail of weak matches. [`EvidenceFilter`] keeps only results whose
//! score sits within a narrow band below the best hit, bounded in count, and
//! formats them into the evidence block the synthesizer consumes.
//!
//! With the defaults (`score_max_diff = 0.08`, `max_results = 4`), scores
//! `[0.9, 0.85, 0.83, 0.5, 0.4]` keep exactly the first three: `0.5` trails
//! the top by `0.4`, well outside the band.

use crate::provider::SearchResult;

/// Literal returned when the provider found nothing at all.
pub const NO_RESULTS: &str = "No relevant information found.";

/// Literal returned when results exist but none survived filtering.
pub const NO_CONFIDENT_RESULTS: &str = "No high-confidence sources available.";

/// Score-band filter settings.
#[derive(Debug, Clone, Copy)]
pub struct EvidenceFilter {
    /// Maximum score drop from the top result that still counts as
    /// high-confidence
    pub score_max_diff: f64,

    /// Maximum number of results kept
    pub max_results: usize,
}

impl Default for EvidenceFilter {
    fn default() -> Self {
        Self {
            score_max_diff: 0.08,
            max_results: 4,
        }
    }
}

impl EvidenceFilter {
    /// Rank, trim, and format results into one evidence block.
    ///
    /// Results are sorted by score descending; everything within
    /// `score_max_diff` of the top score is kept, truncated to
    /// `max_results`, and rendered as `"<title>:\n<content>\n\n"` joined by
    /// blank lines.
    pub fn format(&self, results: &[SearchResult]) -> String {
        if results.is_empty() {
            return NO_RESULTS.to_string();
        }

        let mut sorted: Vec<&SearchResult> = results.iter().collect();
        sorted.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let top_score = sorted[0].score;
        let kept: Vec<&SearchResult> = sorted
            .into_iter()
            // NaN scores fail this comparison and drop out, which is what
            // makes the branch below reachable at all.
            .filter(|r| top_score - r.score <= self.score_max_diff)
            .take(self.max_results)
            .collect();

        if kept.is_empty() {
            // Unreachable for well-formed scores (the top result is always
            // within zero of itself); kept for malformed provider payloads.
            return NO_CONFIDENT_RESULTS.to_string();
        }

        kept.iter()
            .map(|r| format!("{}:\n{}\n\n", r.title, r.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
