//! Resolution of user-named custom variables to account resource names.
//!
//! Conversion custom variables are referenced by resource name on upload,
//! but users configure them by the name shown in the Google Ads UI. One
//! catalog lookup per batch bridges the two.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use tracing::warn;

use crate::conversion::CustomVariableBinding;

/// One row of the account's conversion custom variable catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionCustomVariable {
    pub resource_name: String,
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchStreamRow {
    #[serde(default)]
    pub conversion_custom_variable: Option<ConversionCustomVariable>,
}

/// `googleAds:searchStream` responds with an array of chunks, each carrying
/// its own page of results.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchStreamChunk {
    #[serde(default)]
    pub results: Vec<SearchStreamRow>,
}

/// Variable names resolved for a single invocation.
///
/// Owned by the invocation that built it and dropped with it. Resource names
/// are never cached across invocations, so a variable renamed upstream is
/// picked up again on the next batch.
#[derive(Debug, Default)]
pub struct VariableCache {
    by_name: HashMap<String, String>,
}

impl VariableCache {
    /// Cache for invocations that request no custom variables.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_chunks(chunks: Vec<SearchStreamChunk>) -> Self {
        let by_name = chunks
            .into_iter()
            .flat_map(|chunk| chunk.results)
            .filter_map(|row| row.conversion_custom_variable)
            .map(|variable| (variable.name, variable.resource_name))
            .collect();
        Self { by_name }
    }

    /// Bind requested `(name, value)` pairs to resource names. Names the
    /// account does not define are dropped from the result; the upload
    /// proceeds without them.
    pub fn bind(&self, requested: &BTreeMap<String, String>) -> Vec<CustomVariableBinding> {
        let mut bindings = Vec::with_capacity(requested.len());
        let mut unknown = Vec::new();

        for (name, value) in requested {
            match self.by_name.get(name) {
                Some(resource_name) => bindings.push(CustomVariableBinding {
                    conversion_custom_variable: resource_name.clone(),
                    value: value.clone(),
                }),
                None => unknown.push(name.as_str()),
            }
        }

        if !unknown.is_empty() {
            warn!(
                variables = ?unknown,
                "dropping custom variables not defined on this account"
            );
        }

        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requested(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn decodes_search_stream_chunks() {
        let chunks: Vec<SearchStreamChunk> = serde_json::from_str(
            r#"[
                {
                    "results": [
                        {
                            "conversionCustomVariable": {
                                "resourceName": "customers/1234/conversionCustomVariables/123445",
                                "id": "123445",
                                "name": "username"
                            }
                        }
                    ]
                },
                {
                    "results": [
                        {
                            "conversionCustomVariable": {
                                "resourceName": "customers/1234/conversionCustomVariables/123446",
                                "name": "plan"
                            }
                        }
                    ]
                },
                {}
            ]"#,
        )
        .expect("chunks should decode");

        let cache = VariableCache::from_chunks(chunks);
        let bindings = cache.bind(&requested(&[("plan", "pro"), ("username", "spongebob")]));

        assert_eq!(
            bindings,
            vec![
                CustomVariableBinding {
                    conversion_custom_variable: "customers/1234/conversionCustomVariables/123446"
                        .to_string(),
                    value: "pro".to_string(),
                },
                CustomVariableBinding {
                    conversion_custom_variable: "customers/1234/conversionCustomVariables/123445"
                        .to_string(),
                    value: "spongebob".to_string(),
                },
            ]
        );
    }

    #[test]
    fn unknown_names_are_dropped() {
        let chunks: Vec<SearchStreamChunk> = serde_json::from_str(
            r#"[{"results": [{"conversionCustomVariable": {
                "resourceName": "customers/1234/conversionCustomVariables/123445",
                "id": "123445",
                "name": "username"
            }}]}]"#,
        )
        .unwrap();

        let cache = VariableCache::from_chunks(chunks);
        let bindings = cache.bind(&requested(&[("username", "spongebob"), ("typo", "oops")]));

        assert_eq!(bindings.len(), 1);
        assert_eq!(
            bindings[0].conversion_custom_variable,
            "customers/1234/conversionCustomVariables/123445"
        );
    }

    #[test]
    fn empty_cache_binds_nothing() {
        let cache = VariableCache::empty();
        assert!(cache.bind(&requested(&[("username", "spongebob")])).is_empty());
        assert!(cache.bind(&BTreeMap::new()).is_empty());
    }
}
