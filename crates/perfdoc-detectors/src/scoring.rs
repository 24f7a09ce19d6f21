//! Health score.
//!
//! Deductions are evaluated against the raw inputs, independently of which
//! rules fired, plus a flat cost per emitted issue.

use crate::rules::AnalysisInput;

pub const TTFB_PENALTY_THRESHOLD_MS: f64 = 600.0;
pub const TTFB_PENALTY: f64 = 15.0;

/// Lower than the 500ms issue threshold on purpose: moderate blocking costs
/// points before it is worth a dedicated issue.
pub const BLOCKING_PENALTY_THRESHOLD_MS: f64 = 300.0;
pub const BLOCKING_PENALTY: f64 = 20.0;

pub const SLOW_LOAD_THRESHOLD_MS: f64 = 3000.0;
pub const SLOW_LOAD_PENALTY: f64 = 15.0;

pub const PER_ISSUE_PENALTY: f64 = 5.0;

const MAX_SCORE: f64 = 100.0;

/// Score in `0..=100` for the given inputs and number of emitted issues
pub fn score(input: &AnalysisInput<'_>, issue_count: usize) -> u8 {
    let mut score = MAX_SCORE;

    if input.ttfb() > TTFB_PENALTY_THRESHOLD_MS {
        score -= TTFB_PENALTY;
    }
    if input.total_blocking_time() > BLOCKING_PENALTY_THRESHOLD_MS {
        score -= BLOCKING_PENALTY;
    }
    if input.navigation.load_event_end > SLOW_LOAD_THRESHOLD_MS {
        score -= SLOW_LOAD_PENALTY;
    }
    score -= PER_ISSUE_PENALTY * issue_count as f64;

    score.clamp(0.0, MAX_SCORE).round() as u8
}
