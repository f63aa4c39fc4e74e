use http::StatusCode;
use thiserror::Error;

/// Errors surfaced to the routing framework by the Google Ads connector.
///
/// Every variant fails the whole invocation. Nothing here is retried
/// internally: the router owns retry/drop policy, so transport failures and
/// bad statuses are passed through with enough context to decide.
#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Customer ID is required for this action. Please set it in destination settings.")]
    MissingCustomerId,
    #[error("Email provided doesn't seem to be in a valid format.")]
    InvalidEmail,
    #[error("Phone number must contain at least one digit.")]
    InvalidPhone,
    #[error("failed to decode resolved payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error("conversion custom variable lookup could not be delivered: {0}")]
    LookupRequest(#[source] reqwest::Error),
    #[error("conversion custom variable lookup returned {status}: {body}")]
    LookupFailed { status: StatusCode, body: String },
    #[error("conversion upload could not be delivered: {0}")]
    UploadRequest(#[source] reqwest::Error),
    #[error("conversion upload returned {status}: {body}")]
    UploadFailed { status: StatusCode, body: String },
}
