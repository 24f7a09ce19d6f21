//! Analyzer outputs.

use crate::metrics::{NavigationTiming, PageMetrics, ResourceEntry};
use serde::{Deserialize, Serialize};

/// Severity tier of an issue. Only affects display ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn rank(&self) -> u8 {
        match self {
            Impact::High => 3,
            Impact::Medium => 2,
            Impact::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "HIGH",
            Impact::Medium => "MEDIUM",
            Impact::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected problem, written for a non-specialist reader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub impact: Impact,
    /// Estimated benefit of fixing the issue
    pub save: String,
    pub explanation: String,
    pub fix: String,
    pub technical: String,
}

/// Health score plus issues ordered from most to least severe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub score: u8,
    pub issues: Vec<Issue>,
}

impl Report {
    pub fn grade(&self) -> Grade {
        Grade::from_score(self.score)
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Letter grade for a health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    F,
}

/// Colour band a score falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Good,
    Warning,
    Danger,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Grade::A,
            80..=89 => Grade::B,
            60..=79 => Grade::C,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::F => "F",
        }
    }

    /// Tone of the score band. B and C share the warning band.
    pub fn tone(&self) -> Tone {
        match self {
            Grade::A => Tone::Good,
            Grade::B | Grade::C => Tone::Warning,
            Grade::F => Tone::Danger,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headline numbers shown above the issue list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub title: String,
    pub load_seconds: f64,
    pub total_bytes: u64,
    pub total_megabytes: f64,
    pub total_blocking_ms: u64,
    pub long_task_count: usize,
    pub resource_count: usize,
    pub dom_nodes: u64,
    pub frameworks: Vec<String>,
}

impl PageSummary {
    pub fn new(
        navigation: &NavigationTiming,
        resources: &[ResourceEntry],
        page: &PageMetrics,
    ) -> Self {
        let total_bytes: u64 = resources.iter().map(|r| r.size).sum();

        Self {
            title: page.title.clone(),
            load_seconds: navigation.load_event_end.max(0.0) / 1000.0,
            total_bytes,
            total_megabytes: total_bytes as f64 / (1024.0 * 1024.0),
            total_blocking_ms: page.total_blocking_time().max(0.0).round() as u64,
            long_task_count: page.long_tasks.len(),
            resource_count: resources.len(),
            dom_nodes: page.dom_nodes,
            frameworks: page.frameworks.clone(),
        }
    }
}
