//! Analyzer inputs: the three telemetry snapshots of a single page load.
//!
//! Every optional field is modelled present-with-default, so a document
//! missing `longTasks` or `loadEventEnd`, or carrying `null` there,
//! deserializes to an empty list or zero instead of failing.

use crate::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

/// Read an explicit `null` the same way as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Navigation timing marks in milliseconds since navigation start.
///
/// Accepts a serialized `PerformanceNavigationTiming` entry as-is; fields
/// other than the three below are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationTiming {
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_start: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response_start: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub load_event_end: f64,
}

impl NavigationTiming {
    pub fn new(request_start: f64, response_start: f64, load_event_end: f64) -> Self {
        Self {
            request_start,
            response_start,
            load_event_end,
        }
    }

    /// Time to first byte
    pub fn ttfb(&self) -> f64 {
        self.response_start - self.request_start
    }

    pub fn from_str(content: &str) -> Result<Self> {
        let timing: NavigationTiming = serde_json::from_str(content)?;
        tracing::debug!(
            "Parsed navigation timing: ttfb={:.2}ms load={:.2}ms",
            timing.ttfb(),
            timing.load_event_end
        );
        Ok(timing)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading navigation timing from: {}", path.display());
        Self::from_str(&fs::read_to_string(path)?)
    }
}

/// Coarse classification of a fetched sub-resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Image,
    Stylesheet,
    Script,
    Font,
    #[default]
    #[serde(other)]
    Other,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::Stylesheet => "stylesheet",
            ResourceType::Script => "script",
            ResourceType::Font => "font",
            ResourceType::Other => "other",
        }
    }

    /// Map a DevTools resource type label onto the coarse classes.
    /// Anything unrecognised (`document`, `xhr`, `fetch`, ...) is `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "image" | "img" => ResourceType::Image,
            "stylesheet" | "css" => ResourceType::Stylesheet,
            "script" | "js" => ResourceType::Script,
            "font" => ResourceType::Font,
            _ => ResourceType::Other,
        }
    }
}

impl std::str::FromStr for ResourceType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "image" | "stylesheet" | "script" | "font" | "other" => Ok(Self::from_label(s)),
            _ => Err(crate::Error::InvalidPattern(format!(
                "Unknown resource type '{}' (expected image, stylesheet, script, font or other)",
                s
            ))),
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fetched sub-resource, normalized from the network log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "type", default)]
    pub resource_type: ResourceType,
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub human_size: String,
}

/// A main-thread blocking span reported by the browser
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LongTask {
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: f64,
}

/// Snapshot gathered from inside the page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMetrics {
    #[serde(default, deserialize_with = "null_as_default")]
    pub long_tasks: Vec<LongTask>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub frameworks: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dom_nodes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
}

impl PageMetrics {
    /// Sum of all long task durations
    pub fn total_blocking_time(&self) -> f64 {
        self.long_tasks.iter().map(|t| t.duration).sum()
    }

    pub fn from_str(content: &str) -> Result<Self> {
        let metrics: PageMetrics = serde_json::from_str(content)?;
        tracing::debug!(
            "Parsed page metrics: {} long tasks, {} DOM nodes",
            metrics.long_tasks.len(),
            metrics.dom_nodes
        );
        Ok(metrics)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading page metrics from: {}", path.display());
        Self::from_str(&fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_timing_from_performance_entry() {
        let json = r#"{
            "name": "https://example.com/",
            "entryType": "navigation",
            "startTime": 0,
            "requestStart": 12.5,
            "responseStart": 712.5,
            "domInteractive": 900.1,
            "loadEventEnd": 3400
        }"#;

        let timing = NavigationTiming::from_str(json).unwrap();
        assert_eq!(timing.request_start, 12.5);
        assert_eq!(timing.response_start, 712.5);
        assert_eq!(timing.load_event_end, 3400.0);
        assert_eq!(timing.ttfb(), 700.0);
    }

    #[test]
    fn test_navigation_timing_missing_fields_default_to_zero() {
        let timing = NavigationTiming::from_str(r#"{"loadEventEnd": 0}"#).unwrap();
        assert_eq!(timing, NavigationTiming::default());
    }

    #[test]
    fn test_page_metrics_fallback_shape() {
        // The shape a collector falls back to when the page cannot be reached
        let metrics = PageMetrics::from_str(r#"{"longTasks": [], "blockingTime": 0}"#).unwrap();
        assert!(metrics.long_tasks.is_empty());
        assert!(metrics.frameworks.is_empty());
        assert_eq!(metrics.dom_nodes, 0);
        assert_eq!(metrics.total_blocking_time(), 0.0);
    }

    #[test]
    fn test_page_metrics_null_fields_keep_the_rest() {
        let json = r#"{
            "longTasks": null,
            "frameworks": ["React"],
            "domNodes": 812,
            "title": null
        }"#;

        let metrics = PageMetrics::from_str(json).unwrap();
        assert!(metrics.long_tasks.is_empty());
        assert_eq!(metrics.total_blocking_time(), 0.0);
        assert_eq!(metrics.frameworks, vec!["React".to_string()]);
        assert_eq!(metrics.dom_nodes, 812);
        assert_eq!(metrics.title, "");
    }

    #[test]
    fn test_long_task_null_start_time() {
        let metrics =
            PageMetrics::from_str(r#"{"longTasks": [{"duration": 90, "startTime": null}]}"#)
                .unwrap();
        assert_eq!(metrics.long_tasks[0].duration, 90.0);
        assert_eq!(metrics.long_tasks[0].start_time, 0.0);
    }

    #[test]
    fn test_navigation_timing_null_marks() {
        let timing = NavigationTiming::from_str(
            r#"{"requestStart": 10, "responseStart": 650, "loadEventEnd": null}"#,
        )
        .unwrap();
        assert_eq!(timing.ttfb(), 640.0);
        assert_eq!(timing.load_event_end, 0.0);
    }

    #[test]
    fn test_page_metrics_full_snapshot() {
        let json = r#"{
            "longTasks": [{"duration": 120, "startTime": 50}, {"duration": 80.5, "startTime": 900}],
            "frameworks": ["React"],
            "domNodes": 1542,
            "title": "Shop"
        }"#;

        let metrics = PageMetrics::from_str(json).unwrap();
        assert_eq!(metrics.long_tasks.len(), 2);
        assert_eq!(metrics.long_tasks[1].start_time, 900.0);
        assert_eq!(metrics.total_blocking_time(), 200.5);
        assert_eq!(metrics.frameworks, vec!["React".to_string()]);
        assert_eq!(metrics.dom_nodes, 1542);
        assert_eq!(metrics.title, "Shop");
    }

    #[test]
    fn test_resource_type_labels() {
        assert_eq!(ResourceType::from_label("Image"), ResourceType::Image);
        assert_eq!(ResourceType::from_label("stylesheet"), ResourceType::Stylesheet);
        assert_eq!(ResourceType::from_label("script"), ResourceType::Script);
        assert_eq!(ResourceType::from_label("font"), ResourceType::Font);
        assert_eq!(ResourceType::from_label("xhr"), ResourceType::Other);
        assert_eq!(ResourceType::from_label("document"), ResourceType::Other);
    }

    #[test]
    fn test_resource_type_parse_rejects_unknown() {
        assert_eq!("IMAGE".parse::<ResourceType>().unwrap(), ResourceType::Image);
        assert!("video".parse::<ResourceType>().is_err());
    }

    #[test]
    fn test_resource_entry_json_shape() {
        let entry = ResourceEntry {
            name: "a.jpg".to_string(),
            size: 600000,
            resource_type: ResourceType::Image,
            time: 20.0,
            human_size: "586KB".to_string(),
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "image");
        assert_eq!(value["humanSize"], "586KB");

        let unknown: ResourceEntry =
            serde_json::from_str(r#"{"name": "x", "type": "media"}"#).unwrap();
        assert_eq!(unknown.resource_type, ResourceType::Other);
    }
}
