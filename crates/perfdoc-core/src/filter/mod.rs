mod host_pattern;

pub use host_pattern::HostPattern;

use crate::metrics::{ResourceEntry, ResourceType};
use url::Url;

/// Criteria for narrowing a normalized resource list.
///
/// Conditions are combined with AND logic; within `hosts` and `types` any
/// single match is enough.
#[derive(Debug, Default)]
pub struct ResourceFilter {
    pub hosts: Vec<HostPattern>,
    pub types: Vec<ResourceType>,
    /// Minimum size in bytes
    pub min_size: Option<u64>,
    /// Minimum download time in milliseconds
    pub min_time: Option<f64>,
}

impl ResourceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add host patterns, accepting comma-separated lists
    pub fn with_hosts(mut self, patterns: Vec<String>) -> crate::Result<Self> {
        for pattern in patterns.iter().flat_map(|p| p.split(',')) {
            if pattern.trim().is_empty() {
                continue;
            }
            self.hosts.push(HostPattern::parse(pattern)?);
        }
        Ok(self)
    }

    pub fn with_types(mut self, types: Vec<ResourceType>) -> Self {
        self.types = types;
        self
    }

    pub fn with_min_size(mut self, bytes: u64) -> Self {
        self.min_size = Some(bytes);
        self
    }

    pub fn with_min_time(mut self, ms: f64) -> Self {
        self.min_time = Some(ms);
        self
    }

    pub fn matches(&self, resource: &ResourceEntry) -> bool {
        self.matches_host(resource)
            && self.matches_type(resource)
            && self.min_size.is_none_or(|min| resource.size >= min)
            && self.min_time.is_none_or(|min| resource.time >= min)
    }

    fn matches_host(&self, resource: &ResourceEntry) -> bool {
        if self.hosts.is_empty() {
            return true;
        }

        let url = match Url::parse(&resource.name) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Failed to parse URL {}: {}", resource.name, e);
                return false;
            }
        };

        match url.host_str() {
            Some(host) => self.hosts.iter().any(|pattern| pattern.matches(host)),
            None => false,
        }
    }

    fn matches_type(&self, resource: &ResourceEntry) -> bool {
        self.types.is_empty() || self.types.contains(&resource.resource_type)
    }

    /// Keep matching resources, preserving order
    pub fn apply<'a>(&self, resources: &'a [ResourceEntry]) -> Vec<&'a ResourceEntry> {
        let kept: Vec<&ResourceEntry> = resources.iter().filter(|r| self.matches(r)).collect();
        tracing::debug!("Resource filter kept {} of {}", kept.len(), resources.len());
        kept
    }
}
