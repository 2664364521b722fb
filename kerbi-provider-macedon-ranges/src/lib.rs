//! Provider implementation for Macedon Ranges Shire Council.
//!
//! The site pairs an autocomplete address lookup with a form POST for the
//! schedule markup:
//!   1. `/api/v1/myarea/autocomplete?keywords=...` — JSON array of
//!      suggestion/data pairs, served with a `text/html` content type, so the
//!      body is read as text and decoded manually
//!   2. POST `/requests/bin-collection-days` — bare HTML document with the
//!      waste service blocks; dates appear in the long locale form
//!      ("Monday, 10 February 2025")

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use kerbi_core::{
    model::{Address, CollectionSchedule, CouncilId, CouncilMeta, PropertyId},
    plugin::CouncilPlugin,
    ports::{AddressPort, PortError, SchedulePort},
    scrape::SchedulePayload,
};

const BASE_URL: &str = "https://www.mrsc.vic.gov.au";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// Header the council site expects on same-origin XHR calls.
const XHR_HEADER: (&str, &str) = ("x-requested-with", "XMLHttpRequest");

/// Single autocomplete candidate; `data` carries the property identifier.
#[derive(Debug, Deserialize)]
struct Suggestion {
    suggestion: String,
    data: String,
}

/// Address search implementation for Macedon Ranges.
pub struct MacedonRangesAddressPort {
    client: Client,
    base_url: String,
    meta: CouncilMeta,
}

impl MacedonRangesAddressPort {
    /// Create a new address port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    /// Create a port talking to a non-default base URL (used by tests).
    #[must_use]
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            meta: council_meta(),
        }
    }
}

#[async_trait]
impl AddressPort for MacedonRangesAddressPort {
    fn council(&self) -> &CouncilMeta {
        &self.meta
    }

    async fn search(&self, query: &str) -> Result<Vec<Address>, PortError> {
        let keywords = query.trim();
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let req = self
            .client
            .get(format!("{}/api/v1/myarea/autocomplete", self.base_url))
            .query(&[("keywords", keywords)]);

        // The endpoint declares text/html on its JSON array, so the body is
        // read as text and decoded by hand.
        let body = fetch_text(req).await?;

        let suggestions: Vec<Suggestion> = match serde_json::from_str(&body) {
            Ok(suggestions) => suggestions,
            Err(err) => {
                warn!("malformed autocomplete response: {err}");
                return Ok(Vec::new());
            }
        };

        Ok(suggestions
            .into_iter()
            .map(|entry| Address {
                id: PropertyId(entry.data),
                council: self.meta.id.clone(),
                label: entry.suggestion,
            })
            .collect())
    }
}

/// Collection schedule implementation for Macedon Ranges.
pub struct MacedonRangesSchedulePort {
    client: Client,
    base_url: String,
    meta: CouncilMeta,
}

impl MacedonRangesSchedulePort {
    /// Create a new schedule port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    /// Create a port talking to a non-default base URL (used by tests).
    #[must_use]
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            meta: council_meta(),
        }
    }
}

#[async_trait]
impl SchedulePort for MacedonRangesSchedulePort {
    fn council(&self) -> &CouncilMeta {
        &self.meta
    }

    async fn schedule(&self, property: &PropertyId) -> Result<CollectionSchedule, PortError> {
        if property.0.trim().is_empty() {
            return Err(PortError::InvalidPropertyId);
        }

        let req = self
            .client
            .post(format!("{}/requests/bin-collection-days", self.base_url))
            .form(&[("propertyId", property.0.as_str())]);

        let body = fetch_text(req).await?;

        Ok(SchedulePayload::sniff(&body).into_schedule())
    }
}

/// Build the plugin bundle for the Macedon Ranges provider.
#[must_use]
pub fn plugin(client: Client) -> CouncilPlugin {
    let address_port = Arc::new(MacedonRangesAddressPort::new(client.clone()));
    let schedule_port = Arc::new(MacedonRangesSchedulePort::new(client));

    CouncilPlugin {
        meta: council_meta(),
        address_port,
        schedule_port,
    }
}

fn council_meta() -> CouncilMeta {
    CouncilMeta {
        id: CouncilId(String::from("macedon-ranges")),
        name: String::from("Macedon Ranges Shire Council"),
    }
}

// Small helper to fetch a body as text with header, timeout, and status handling.
async fn fetch_text(req: RequestBuilder) -> Result<String, PortError> {
    req.header(XHR_HEADER.0, XHR_HEADER.1)
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .text()
        .await
        .map_err(PortError::from)
}
