use regex::Regex;

use crate::error::ConfigError;

/// Paths the gate never looks at: API proxying, static assets and the service's own
/// health and logout endpoints.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    r"^/(api|_next/static|_next/image|assets)(/|$)",
    r"^/favicon\.ico$",
    r"^/health$",
    r"^/logout$",
];

/// RouteMatcher
///
/// Decides whether a request path goes through the gate at all. A path is gated when it
/// matches an include pattern and no exclude pattern.
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl RouteMatcher {
    pub fn new(include: &[&str], exclude: &[&str]) -> Result<Self, ConfigError> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    pub fn is_gated(&self, path: &str) -> bool {
        self.include.iter().any(|re| re.is_match(path))
            && !self.exclude.iter().any(|re| re.is_match(path))
    }
}

impl Default for RouteMatcher {
    fn default() -> Self {
        Self::new(&["^/"], DEFAULT_EXCLUDES).expect("default route patterns compile")
    }
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}
