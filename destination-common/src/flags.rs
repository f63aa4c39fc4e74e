use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Feature flags active for a single connector invocation.
///
/// The routing framework resolves flags before dispatching; connectors only
/// ever read them. A flag that is absent from the map is disabled.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeatureFlags(HashMap<String, bool>);

impl FeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for FeatureFlags {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_flags_are_disabled() {
        let flags = FeatureFlags::new();
        assert!(!flags.enabled("anything"));

        let flags: FeatureFlags = [("rollout-gate", true), ("other-gate", false)]
            .into_iter()
            .collect();
        assert!(flags.enabled("rollout-gate"));
        assert!(!flags.enabled("other-gate"));
        assert!(!flags.enabled("unknown-gate"));
    }
}
