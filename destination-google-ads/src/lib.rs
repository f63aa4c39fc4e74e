//! Google Ads enhanced-conversions destination connector.
//!
//! Receives mapped click-conversion payloads from the routing framework and
//! uploads them to the Google Ads API: identifiers are canonicalized and
//! hashed, custom variable names are resolved against the account catalog
//! (one lookup per batch), and all records of an invocation go out in a
//! single partial-failure upload request.

pub mod action;
pub mod client;
pub mod config;
pub mod conversion;
pub mod error;
pub mod identifiers;
pub mod variables;

pub use action::{Settings, UploadClickConversions};
pub use client::{ApiVersion, GoogleAdsClient, CANARY_VERSION_FLAG};
pub use config::Config;
pub use error::ConnectorError;
