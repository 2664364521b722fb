//! Provider implementation for Mount Alexander Shire Council.
//!
//! Uses the council's own website API:
//!   1. `/api/v1/myarea/search?keywords=...` — address search (JSON object with
//!      an `Items` list)
//!   2. `/ocapi/Public/myarea/wasteservices?geolocationid=...` — bin schedule
//!      (JSON envelope with a success flag wrapping an HTML fragment)

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

const BASE_URL: &str = "https://www.mountalexander.vic.gov.au";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// Header the council site expects on same-origin XHR calls.
const XHR_HEADER: (&str, &str) = ("x-requested-with", "XMLHttpRequest");

/// Response wrapper from /api/v1/myarea/search
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Items", default)]
    items: Vec<SearchItem>,
}

/// Single address candidate from /api/v1/myarea/search
#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "AddressSingleLine")]
    address: String,
}

/// Address search implementation for Mount Alexander.
pub struct MountAlexanderAddressPort {
    client: Client,
    base_url: String,
    meta: CouncilMeta,
}

impl MountAlexanderAddressPort {
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
impl AddressPort for MountAlexanderAddressPort {
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
            .get(format!("{}/api/v1/myarea/search", self.base_url))
            .query(&[("keywords", keywords)]);

        let body = fetch_text(req).await?;

        // The search endpoint answers some failures with a 200 and an HTML
        // error page; anything that is not the expected JSON means no results.
        let parsed: SearchResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("malformed address search response: {err}");
                return Ok(Vec::new());
            }
        };

        Ok(parsed
            .items
            .into_iter()
            .map(|item| Address {
                id: PropertyId(item.id),
                council: self.meta.id.clone(),
                label: item.address,
            })
            .collect())
    }
}

/// Collection schedule implementation for Mount Alexander.
pub struct MountAlexanderSchedulePort {
    client: Client,
    base_url: String,
    meta: CouncilMeta,
}

impl MountAlexanderSchedulePort {
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
impl SchedulePort for MountAlexanderSchedulePort {
    fn council(&self) -> &CouncilMeta {
        &self.meta
    }

    async fn schedule(&self, property: &PropertyId) -> Result<CollectionSchedule, PortError> {
        if property.0.trim().is_empty() {
            return Err(PortError::InvalidPropertyId);
        }

        let req = self
            .client
            .get(format!("{}/ocapi/Public/myarea/wasteservices", self.base_url))
            .query(&[
                ("geolocationid", property.0.as_str()),
                ("ocsvclang", "en-AU"),
            ]);

        let body = fetch_text(req).await?;

        Ok(SchedulePayload::sniff(&body).into_schedule())
    }
}

/// Build the plugin bundle for the Mount Alexander provider.
#[must_use]
pub fn plugin(client: Client) -> CouncilPlugin {
    let address_port = Arc::new(MountAlexanderAddressPort::new(client.clone()));
    let schedule_port = Arc::new(MountAlexanderSchedulePort::new(client));

    CouncilPlugin {
        meta: council_meta(),
        address_port,
        schedule_port,
    }
}

fn council_meta() -> CouncilMeta {
    CouncilMeta {
        id: CouncilId(String::from("mount-alexander")),
        name: String::from("Mount Alexander Shire Council"),
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
