use async_trait::async_trait;
use serde_json::Value;

use crate::flags::FeatureFlags;

/// A payload produced by the mapping engine for one event: the connector's
/// mapped fields, already extracted and templated. Each connector action
/// deserializes this into its own payload struct.
pub type ResolvedPayload = Value;

/// A destination action: one operation a connector can perform against its
/// remote API, e.g. uploading conversions or identifying a user.
///
/// The batch entry point is the canonical one. All payloads handed to a
/// single `run_batch` call belong to one invocation and result in one
/// physical request to the remote API; `run` is defined as a batch of one
/// so single-event and batched dispatch cannot diverge.
#[async_trait]
pub trait DestinationAction {
    /// Connector-level settings stored by the platform for this destination.
    type Settings: Send + Sync;
    /// The error surface the router sees; retry/drop policy is its call.
    type Error: std::error::Error + Send + Sync;
    /// Whatever the remote API returned, surfaced raw to the router.
    type Response: Send;

    async fn run_batch(
        &self,
        settings: &Self::Settings,
        features: &FeatureFlags,
        payloads: Vec<ResolvedPayload>,
    ) -> Result<Self::Response, Self::Error>;

    async fn run(
        &self,
        settings: &Self::Settings,
        features: &FeatureFlags,
        payload: ResolvedPayload,
    ) -> Result<Self::Response, Self::Error> {
        self.run_batch(settings, features, vec![payload]).await
    }
}
