//! Shared boundary types for destination connectors.
//!
//! The routing framework hands every connector the same three things: the
//! normalized analytics events it captured, the per-destination settings it
//! stores, and the feature flags active for the invocation. This crate holds
//! the types for that hand-off so individual connector crates only have to
//! define their own payload schema and remote API plumbing.

pub mod destination;
pub mod event;
pub mod flags;

pub use destination::{DestinationAction, ResolvedPayload};
pub use event::RawEvent;
pub use flags::FeatureFlags;
