use super::{AnalysisInput, HEAVY_JS_BLOCKING_MS, Rule, seconds};
use perfdoc_core::report::{Impact, Issue};

/// Flags pages whose long tasks add up to a noticeable freeze
pub struct HeavyJavaScript;

impl Rule for HeavyJavaScript {
    fn id(&self) -> &'static str {
        "heavy-js"
    }

    fn evaluate(&self, input: &AnalysisInput<'_>) -> Vec<Issue> {
        let total_blocking = input.total_blocking_time();
        if total_blocking <= HEAVY_JS_BLOCKING_MS {
            return vec![];
        }

        let task_count = input.page.long_tasks.len();
        tracing::debug!(
            "Heavy JavaScript: {:.2}ms blocking across {} tasks",
            total_blocking,
            task_count
        );

        vec![Issue {
            id: "heavy-js".to_string(),
            title: "JavaScript is locking up the browser".to_string(),
            impact: Impact::High,
            save: format!("~{}s", seconds(total_blocking)),
            explanation:
                "Scripts are working so hard that the user cannot scroll or click for significant periods."
                    .to_string(),
            fix: "Break up long tasks, remove unused code, or defer non-essential third-party scripts."
                .to_string(),
            technical: format!(
                "Total Blocking Time: {}ms across {} tasks.",
                total_blocking.round(),
                task_count
            ),
        }]
    }
}
