use std::fmt;

use destination_common::FeatureFlags;
use reqwest::header;
use tracing::debug;

use crate::config::Config;
use crate::conversion::ClickConversionBatch;
use crate::error::ConnectorError;
use crate::variables::{SearchStreamChunk, VariableCache};

/// Feature flag that routes an invocation to the canary API version.
pub const CANARY_VERSION_FLAG: &str = "google-enhanced-canary-version";

const SEARCH_CUSTOM_VARIABLES_QUERY: &str =
    "SELECT conversion_custom_variable.id, conversion_custom_variable.name FROM conversion_custom_variable";

/// Google Ads API version to address. Resolved once at invocation entry and
/// threaded through as a value so a batch can never straddle versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    Stable,
    Canary,
}

impl ApiVersion {
    pub fn from_flags(flags: &FeatureFlags) -> Self {
        if flags.enabled(CANARY_VERSION_FLAG) {
            ApiVersion::Canary
        } else {
            ApiVersion::Stable
        }
    }

    pub fn path_segment(&self) -> &'static str {
        match self {
            ApiVersion::Stable => "v12",
            ApiVersion::Canary => "v13",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

/// Thin client over the two Google Ads endpoints this connector touches.
pub struct GoogleAdsClient {
    http: reqwest::Client,
    base_url: String,
}

impl GoogleAdsClient {
    pub fn new(config: &Config) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = &config.developer_token {
            headers.insert(
                "developer-token",
                header::HeaderValue::from_str(token)
                    .expect("developer token is not a valid header value"),
            );
        }
        if let Some(token) = &config.access_token {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                .expect("access token is not a valid header value");
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent("Destination Google Ads Connector")
            .timeout(config.request_timeout.0)
            .build()
            .expect("failed to construct reqwest client for the Google Ads connector");

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Fetch the account's conversion custom variable catalog. One call per
    /// invocation covers every variable name in the batch.
    pub async fn search_conversion_custom_variables(
        &self,
        version: ApiVersion,
        customer_id: &str,
    ) -> Result<VariableCache, ConnectorError> {
        let url = format!(
            "{}/{}/customers/{}/googleAds:searchStream",
            self.base_url, version, customer_id
        );
        debug!(customer_id, %version, "looking up conversion custom variables");
        metrics::counter!("google_ads_custom_variable_lookups_total").increment(1);

        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({ "query": SEARCH_CUSTOM_VARIABLES_QUERY }))
            .send()
            .await
            .map_err(ConnectorError::LookupRequest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectorError::LookupFailed { status, body });
        }

        let chunks: Vec<SearchStreamChunk> =
            response.json().await.map_err(ConnectorError::LookupRequest)?;
        Ok(VariableCache::from_chunks(chunks))
    }

    /// Upload a batch of click conversions in a single request and surface
    /// the raw response. Per-record results inside a 2xx body are the
    /// caller's to inspect.
    pub async fn upload_click_conversions(
        &self,
        version: ApiVersion,
        customer_id: &str,
        batch: &ClickConversionBatch,
    ) -> Result<reqwest::Response, ConnectorError> {
        let url = format!(
            "{}/{}/customers/{}:uploadClickConversions",
            self.base_url, version, customer_id
        );
        debug!(
            customer_id,
            %version,
            conversions = batch.conversions.len(),
            "uploading click conversions"
        );
        metrics::histogram!("google_ads_upload_batch_size").record(batch.conversions.len() as f64);

        let response = self
            .http
            .post(url)
            .json(batch)
            .send()
            .await
            .map_err(ConnectorError::UploadRequest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            metrics::counter!("google_ads_uploads_total", "outcome" => "failed").increment(1);
            return Err(ConnectorError::UploadFailed { status, body });
        }

        metrics::counter!("google_ads_uploads_total", "outcome" => "succeeded").increment(1);
        metrics::counter!("google_ads_conversions_uploaded_total")
            .increment(batch.conversions.len() as u64);
        Ok(response)
    }
}
