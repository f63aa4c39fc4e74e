use async_trait::async_trait;
use serde::Deserialize;

use destination_common::{DestinationAction, FeatureFlags, ResolvedPayload};

use crate::client::{ApiVersion, GoogleAdsClient};
use crate::conversion::{build_click_conversion, ClickConversionBatch, ClickConversionPayload};
use crate::error::ConnectorError;
use crate::variables::VariableCache;

/// Settings the platform stores for each Google Ads destination instance.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    pub customer_id: Option<String>,
}

impl Settings {
    /// Operators paste customer ids with dashes, the API wants them bare.
    fn require_customer_id(&self) -> Result<String, ConnectorError> {
        match &self.customer_id {
            Some(id) if !id.trim().is_empty() => Ok(id.replace('-', "")),
            _ => Err(ConnectorError::MissingCustomerId),
        }
    }
}

/// Uploads click conversions, one physical request per invocation.
pub struct UploadClickConversions {
    client: GoogleAdsClient,
}

impl UploadClickConversions {
    pub fn new(client: GoogleAdsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DestinationAction for UploadClickConversions {
    type Settings = Settings;
    type Error = ConnectorError;
    type Response = reqwest::Response;

    async fn run_batch(
        &self,
        settings: &Settings,
        features: &FeatureFlags,
        payloads: Vec<ResolvedPayload>,
    ) -> Result<reqwest::Response, ConnectorError> {
        // Settings and payload validation both happen before any network
        // call.
        let customer_id = settings.require_customer_id()?;
        let payloads = payloads
            .into_iter()
            .map(serde_json::from_value::<ClickConversionPayload>)
            .collect::<Result<Vec<_>, _>>()?;

        let version = ApiVersion::from_flags(features);

        let needs_lookup = payloads
            .iter()
            .any(|payload| payload.custom_variables.as_ref().is_some_and(|v| !v.is_empty()));
        let variables = if needs_lookup {
            self.client
                .search_conversion_custom_variables(version, &customer_id)
                .await?
        } else {
            VariableCache::empty()
        };

        let conversions = payloads
            .iter()
            .map(|payload| build_click_conversion(&customer_id, payload, &variables))
            .collect::<Result<Vec<_>, _>>()?;

        let batch = ClickConversionBatch::new(conversions);
        self.client
            .upload_click_conversions(version, &customer_id, &batch)
            .await
    }
}
