use crate::rules::{AnalysisInput, Rule, builtin_rules};
use crate::scoring;
use perfdoc_core::metrics::{NavigationTiming, PageMetrics, ResourceEntry};
use perfdoc_core::report::{Issue, Report};
use std::cmp::Reverse;
use std::sync::LazyLock;

static DEFAULT_ANALYZER: LazyLock<IssueAnalyzer> = LazyLock::new(IssueAnalyzer::new);

/// Turns one page load's telemetry into a scored, ordered issue list.
///
/// Stateless once built; a single instance can be shared across threads.
pub struct IssueAnalyzer {
    rules: Vec<Box<dyn Rule>>,
}

impl IssueAnalyzer {
    /// Analyzer with the built-in rule table
    pub fn new() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    /// Analyzer with no rules. Only the raw-input deductions apply.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    pub fn analyze(
        &self,
        navigation: &NavigationTiming,
        resources: &[ResourceEntry],
        page: &PageMetrics,
    ) -> Report {
        tracing::debug!(
            "Analyzing page load: {} resources, {} long tasks, {} rules",
            resources.len(),
            page.long_tasks.len(),
            self.rules.len()
        );

        let input = AnalysisInput::new(navigation, resources, page);

        let mut issues: Vec<Issue> = Vec::new();
        for rule in &self.rules {
            let found = rule.evaluate(&input);
            if !found.is_empty() {
                tracing::debug!("Rule {} emitted {} issue(s)", rule.id(), found.len());
            }
            issues.extend(found);
        }

        let score = scoring::score(&input, issues.len());

        // Stable: equal impact keeps rule order
        issues.sort_by_key(|issue| Reverse(issue.impact.rank()));

        tracing::info!(
            "Analysis complete: score={}, {} issue(s)",
            score,
            issues.len()
        );

        Report { score, issues }
    }
}

impl Default for IssueAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyze with the built-in rule table
pub fn analyze_performance(
    navigation: &NavigationTiming,
    resources: &[ResourceEntry],
    page: &PageMetrics,
) -> Report {
    DEFAULT_ANALYZER.analyze(navigation, resources, page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfdoc_core::metrics::{LongTask, ResourceType};
    use perfdoc_core::report::Impact;

    fn image(name: &str, size: u64) -> ResourceEntry {
        ResourceEntry {
            name: name.to_string(),
            size,
            resource_type: ResourceType::Image,
            time: 0.0,
            human_size: perfdoc_core::aggregate::format_size(size),
        }
    }

    fn stylesheet(name: &str, time: f64) -> ResourceEntry {
        ResourceEntry {
            name: name.to_string(),
            size: 10_000,
            resource_type: ResourceType::Stylesheet,
            time,
            human_size: "10KB".to_string(),
        }
    }

    fn tasks(durations: &[f64]) -> PageMetrics {
        PageMetrics {
            long_tasks: durations
                .iter()
                .map(|d| LongTask {
                    duration: *d,
                    start_time: 0.0,
                })
                .collect(),
            ..PageMetrics::default()
        }
    }

    /// Emits one fixed issue regardless of input
    struct Fixed(&'static str, Impact);

    impl Rule for Fixed {
        fn id(&self) -> &'static str {
            self.0
        }

        fn evaluate(&self, _input: &AnalysisInput<'_>) -> Vec<Issue> {
            vec![Issue {
                id: self.0.to_string(),
                title: self.0.to_string(),
                impact: self.1,
                save: String::new(),
                explanation: String::new(),
                fix: String::new(),
                technical: String::new(),
            }]
        }
    }

    #[test]
    fn test_empty_input_is_perfect() {
        let report = analyze_performance(&NavigationTiming::default(), &[], &PageMetrics::default());
        assert_eq!(report.score, 100);
        assert!(report.issues.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_slow_ttfb_scenario() {
        let navigation = NavigationTiming::new(0.0, 700.0, 0.0);
        let report = analyze_performance(&navigation, &[], &PageMetrics::default());

        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].id, "slow-ttfb");
        assert_eq!(report.issues[0].impact, Impact::High);
        assert_eq!(report.score, 80);
    }

    #[test]
    fn test_heavy_js_scenario() {
        let navigation = NavigationTiming::new(0.0, 200.0, 0.0);
        let report = analyze_performance(&navigation, &[], &tasks(&[600.0]));

        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].id, "heavy-js");
        assert_eq!(report.score, 75);
    }

    #[test]
    fn test_oversized_image_scenario() {
        let resources = vec![image("a.jpg", 600000)];
        let report = analyze_performance(&NavigationTiming::default(), &resources, &PageMetrics::default());

        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].id, "img-a.jpg");
        assert_eq!(report.issues[0].impact, Impact::Medium);
        assert_eq!(report.score, 95);
    }

    #[test]
    fn test_sort_order_high_medium_low() {
        let analyzer = IssueAnalyzer::empty()
            .with_rule(Fixed("low", Impact::Low))
            .with_rule(Fixed("high", Impact::High))
            .with_rule(Fixed("medium", Impact::Medium));

        let report = analyzer.analyze(&NavigationTiming::default(), &[], &PageMetrics::default());
        let ids: Vec<&str> = report.issues.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "medium", "low"]);
        assert_eq!(report.score, 85);
    }

    #[test]
    fn test_sort_is_stable_within_tier() {
        let analyzer = IssueAnalyzer::empty()
            .with_rule(Fixed("first-medium", Impact::Medium))
            .with_rule(Fixed("first-high", Impact::High))
            .with_rule(Fixed("second-medium", Impact::Medium))
            .with_rule(Fixed("second-high", Impact::High));

        let report = analyzer.analyze(&NavigationTiming::default(), &[], &PageMetrics::default());
        let ids: Vec<&str> = report.issues.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["first-high", "second-high", "first-medium", "second-medium"]);
    }

    #[test]
    fn test_everything_wrong() {
        let navigation = NavigationTiming::new(50.0, 1450.0, 8200.0);
        let resources = vec![
            image("https://shop.com/img/hero.jpg", 2_400_000),
            stylesheet("https://shop.com/css/site.css", 340.0),
            image("https://shop.com/img/promo.png", 900_000),
        ];
        let page = tasks(&[400.0, 350.0, 90.0]);

        let report = analyze_performance(&navigation, &resources, &page);
        let ids: Vec<&str> = report.issues.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "slow-ttfb",
                "heavy-js",
                "render-blocking-css",
                "img-https://shop.com/img/hero.jpg",
                "img-https://shop.com/img/promo.png",
            ]
        );
        // 100 - 15 - 20 - 15 - 5 * 5
        assert_eq!(report.score, 25);
    }

    #[test]
    fn test_deterministic() {
        let navigation = NavigationTiming::new(10.0, 900.0, 4000.0);
        let resources = vec![image("b.webp", 800_000), stylesheet("c.css", 120.0)];
        let page = tasks(&[700.0]);

        let first = analyze_performance(&navigation, &resources, &page);
        let second = analyze_performance(&navigation, &resources, &page);
        assert_eq!(first, second);
    }

    #[test]
    fn test_more_blocking_never_raises_score() {
        let navigation = NavigationTiming::new(0.0, 300.0, 2000.0);
        let mut durations: Vec<f64> = Vec::new();
        let mut previous = analyze_performance(&navigation, &[], &tasks(&durations)).score;

        for _ in 0..30 {
            durations.push(60.0);
            let current = analyze_performance(&navigation, &[], &tasks(&durations)).score;
            assert!(current <= previous, "score rose from {} to {}", previous, current);
            previous = current;
        }
        assert_eq!(previous, 75);
    }

    #[test]
    fn test_score_bounds_with_many_issues() {
        let resources: Vec<ResourceEntry> = (0..40)
            .map(|i| image(&format!("https://cdn.shop.com/{}.jpg", i), 1_000_000))
            .collect();
        let report = analyze_performance(&NavigationTiming::default(), &resources, &PageMetrics::default());
        assert_eq!(report.issues.len(), 40);
        assert_eq!(report.score, 0);
    }

    #[test]
    fn test_empty_analyzer_still_scores_raw_inputs() {
        let analyzer = IssueAnalyzer::empty();
        assert!(analyzer.rule_ids().is_empty());

        let navigation = NavigationTiming::new(0.0, 700.0, 3500.0);
        let report = analyzer.analyze(&navigation, &[], &tasks(&[350.0]));
        assert!(report.issues.is_empty());
        assert_eq!(report.score, 50);
    }

    #[test]
    fn test_report_serializes_impact_uppercase() {
        let navigation = NavigationTiming::new(0.0, 700.0, 0.0);
        let report = analyze_performance(&navigation, &[], &PageMetrics::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["score"], 80);
        assert_eq!(json["issues"][0]["impact"], "HIGH");
        assert_eq!(json["issues"][0]["id"], "slow-ttfb");
    }

    #[test]
    fn test_analyzer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IssueAnalyzer>();
    }
}
