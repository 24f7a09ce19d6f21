use super::{AnalysisInput, Rule, SLOW_TTFB_MS, seconds};
use perfdoc_core::report::{Impact, Issue};

/// Flags a slow time to first byte on the main document
pub struct SlowServerResponse;

impl Rule for SlowServerResponse {
    fn id(&self) -> &'static str {
        "slow-ttfb"
    }

    fn evaluate(&self, input: &AnalysisInput<'_>) -> Vec<Issue> {
        let ttfb = input.ttfb();
        if ttfb <= SLOW_TTFB_MS {
            return vec![];
        }

        tracing::debug!("Slow server response: ttfb={:.2}ms", ttfb);

        vec![Issue {
            id: "slow-ttfb".to_string(),
            title: "Server is struggling to reply".to_string(),
            impact: Impact::High,
            save: format!("~{}s", seconds(ttfb)),
            explanation: format!(
                "Your server takes {} seconds just to think about the request before sending any data.",
                seconds(ttfb)
            ),
            fix: "Check your database queries, server-side code efficiency, or upgrade your hosting plan."
                .to_string(),
            technical: format!("TTFB: {}ms", ttfb.round()),
        }]
    }
}
