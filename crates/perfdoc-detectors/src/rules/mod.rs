//! Issue rules.
//!
//! Each rule is an independent predicate over the raw inputs that produces
//! zero or more issues. Rules never see each other's output, so adding one
//! only means appending it to [`builtin_rules`].

mod main_thread;
mod resources;
mod server;

pub use main_thread::HeavyJavaScript;
pub use resources::{OversizedImages, RenderBlockingStyles};
pub use server::SlowServerResponse;

use perfdoc_core::metrics::{NavigationTiming, PageMetrics, ResourceEntry};
use perfdoc_core::report::Issue;

/// Server response slower than this is reported
pub const SLOW_TTFB_MS: f64 = 600.0;

/// Total blocking time above this is reported as an issue. The score uses a
/// lower threshold, see [`crate::scoring::BLOCKING_PENALTY_THRESHOLD_MS`].
pub const HEAVY_JS_BLOCKING_MS: f64 = 500.0;

/// Images above 500KB are reported
pub const OVERSIZED_IMAGE_BYTES: u64 = 500 * 1024;

/// Stylesheets taking longer than this to download are treated as render blocking
pub const BLOCKING_STYLESHEET_MS: f64 = 100.0;

/// Borrowed view over the three telemetry snapshots of one page load
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub navigation: &'a NavigationTiming,
    pub resources: &'a [ResourceEntry],
    pub page: &'a PageMetrics,
}

impl<'a> AnalysisInput<'a> {
    pub fn new(
        navigation: &'a NavigationTiming,
        resources: &'a [ResourceEntry],
        page: &'a PageMetrics,
    ) -> Self {
        Self {
            navigation,
            resources,
            page,
        }
    }

    pub fn ttfb(&self) -> f64 {
        self.navigation.ttfb()
    }

    pub fn total_blocking_time(&self) -> f64 {
        self.page.total_blocking_time()
    }
}

pub trait Rule: Send + Sync {
    /// Stable name of the rule, used in logs
    fn id(&self) -> &'static str;

    fn evaluate(&self, input: &AnalysisInput<'_>) -> Vec<Issue>;
}

/// The default rule table, in evaluation order
pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(SlowServerResponse),
        Box::new(HeavyJavaScript),
        Box::new(OversizedImages),
        Box::new(RenderBlockingStyles),
    ]
}

/// Milliseconds as seconds with two decimals, e.g. `700.0` -> `"0.70"`.
///
/// Rounds the exact binary value to nearest, with exact halfway cases going
/// away from zero. Those only occur at odd multiples of 1/8.
pub(crate) fn seconds(ms: f64) -> String {
    let value = ms / 1000.0;
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        return format!("{:.2}", value + value.signum() * 0.001);
    }
    format!("{:.2}", value)
}

/// Last `count` characters of `value`
pub(crate) fn tail(value: &str, count: usize) -> &str {
    let chars = value.chars().count();
    if chars <= count {
        return value;
    }
    match value.char_indices().nth(chars - count) {
        Some((idx, _)) => &value[idx..],
        None => value,
    }
}
