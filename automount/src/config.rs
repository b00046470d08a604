use crate::marker::Marker;

/// What an activation pass does when a component fails to construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailurePolicy {
    /// Stop at the first failure. Elements after the failing one are never
    /// attempted.
    FailFast,
    /// Attempt every element, log and collect each failure.
    BestEffort,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self::FailFast
    }
}

/// Settings for an activation pass and the [`crate::Bootstrapper`]
/// driving it.
///
/// ```rust
/// use automount::{Config, FailurePolicy, Marker};
///
/// let config = Config::new()
///     .with_marker(Marker::new("data-widget").unwrap())
///     .with_policy(FailurePolicy::BestEffort);
/// assert_eq!(config.marker().name(), "data-widget");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    marker: Marker,
    policy: FailurePolicy,
    guard_duplicates: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marker: Marker::default(),
            policy: FailurePolicy::default(),
            guard_duplicates: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// If enabled (the default), a ready signal arriving after activation
    /// already ran is ignored. Disabling it re-runs the pass on every
    /// signal, constructing a second instance per element.
    pub fn with_duplicate_guard(mut self, guard: bool) -> Self {
        self.guard_duplicates = guard;
        self
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn guards_duplicates(&self) -> bool {
        self.guard_duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.marker().name(), crate::marker::DEFAULT_MARKER);
        assert_eq!(config.policy(), FailurePolicy::FailFast);
        assert!(config.guards_duplicates());
    }

    #[test]
    fn test_builder() {
        let config = Config::new()
            .with_policy(FailurePolicy::BestEffort)
            .with_duplicate_guard(false);
        assert_eq!(config.policy(), FailurePolicy::BestEffort);
        assert!(!config.guards_duplicates());
    }
}
