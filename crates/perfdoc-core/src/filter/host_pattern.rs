use glob::Pattern;

/// Host pattern used to narrow a resource list, e.g. `cdn.example.com` or
/// `*.googleapis.com`. Matching is case-insensitive.
#[derive(Debug, Clone)]
pub enum HostPattern {
    Exact(String),
    Glob(Pattern),
}

impl HostPattern {
    /// Patterns containing `*` or `?` are globs, anything else is an exact
    /// hostname.
    pub fn parse(pattern: &str) -> crate::Result<Self> {
        let lowered = pattern.trim().to_lowercase();
        if lowered.contains('*') || lowered.contains('?') {
            let glob = Pattern::new(&lowered).map_err(|e| {
                crate::Error::InvalidPattern(format!("Invalid host pattern '{}': {}", pattern, e))
            })?;
            Ok(HostPattern::Glob(glob))
        } else {
            Ok(HostPattern::Exact(lowered))
        }
    }

    pub fn matches(&self, hostname: &str) -> bool {
        let hostname = hostname.to_lowercase();
        match self {
            HostPattern::Exact(expected) => hostname == *expected,
            HostPattern::Glob(glob) => glob.matches(&hostname),
        }
    }
}
