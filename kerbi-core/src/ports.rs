//! Traits describing provider capabilities and shared error types.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{Address, CollectionSchedule, CouncilMeta, PropertyId};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to council backends.
///
/// Parse-level irregularities (malformed bodies, unknown headings, bad dates)
/// are deliberately not represented here; they degrade to partial or empty
/// results inside the providers and the parsing core.
pub enum PortError {
    /// Network layer failed: transport error, timeout, or non-2xx status.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// The council has no registered plugin.
    #[error("Unsupported council")]
    UnsupportedCouncil,
    /// Property identifier is missing or invalid for the provider.
    #[error("Invalid property id")]
    InvalidPropertyId,
    /// Internal provider error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[async_trait]
/// Trait for provider-specific address search backends.
pub trait AddressPort: Send + Sync {
    /// Metadata describing the council handled by this port.
    fn council(&self) -> &CouncilMeta;

    /// Search for addresses matching a free-text query.
    ///
    /// Implementations return an empty list for blank queries and for malformed
    /// response bodies; only connectivity failures surface as errors.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails.
    async fn search(&self, query: &str) -> Result<Vec<Address>, PortError>;
}

#[async_trait]
/// Trait for provider-specific collection schedule backends.
pub trait SchedulePort: Send + Sync {
    /// Metadata describing the council handled by this port.
    fn council(&self) -> &CouncilMeta;

    /// Fetch the upcoming collection schedule for a property.
    ///
    /// The schedule may be partial or empty when the site's markup is not fully
    /// usable; it is only `Err` when the request itself fails.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails or the property
    /// identifier is rejected.
    async fn schedule(&self, property: &PropertyId) -> Result<CollectionSchedule, PortError>;
}
