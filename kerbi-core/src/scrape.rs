//! Schedule payload sniffing and HTML entry extraction.

use log::{debug, warn};
use scraper::{Html, Selector};
use serde::Deserialize;

use crate::classify::classify_heading;
use crate::dates::parse_collection_date;
use crate::model::{Collection, CollectionSchedule};

/// CSS selector matching one waste service block in the council markup.
const SERVICE_SELECTOR: &str = "div.waste-services-result";
/// Heading element inside a service block.
const HEADING_SELECTOR: &str = "h3";
/// Element carrying the next collection date inside a service block.
const DATE_SELECTOR: &str = "div.next-service";

#[derive(Debug, Deserialize)]
/// JSON envelope some deployments wrap the schedule markup in.
struct Envelope {
    success: bool,
    #[serde(rename = "responseContent", default)]
    response_content: String,
}

#[derive(Debug)]
/// Shapes a schedule response body can arrive in, selected by sniffing.
pub enum SchedulePayload {
    /// JSON envelope with a success flag wrapping an HTML fragment.
    Envelope {
        /// Response-level success flag reported by the site.
        success: bool,
        /// Embedded HTML fragment holding the service blocks.
        html: String,
    },
    /// Bare HTML document.
    Document(String),
}

impl SchedulePayload {
    /// Sniff the body shape: a JSON envelope when the body parses as one,
    /// bare HTML otherwise.
    #[must_use]
    pub fn sniff(body: &str) -> Self {
        match serde_json::from_str::<Envelope>(body) {
            Ok(envelope) => SchedulePayload::Envelope {
                success: envelope.success,
                html: envelope.response_content,
            },
            Err(_) => SchedulePayload::Document(body.to_owned()),
        }
    }

    /// Extract the collection schedule from the payload.
    ///
    /// An envelope reporting `success = false` yields an empty schedule; it is
    /// logged, never an error.
    #[must_use]
    pub fn into_schedule(self) -> CollectionSchedule {
        match self {
            SchedulePayload::Envelope { success: false, .. } => {
                warn!("schedule endpoint reported success=false, returning empty schedule");
                CollectionSchedule::new()
            }
            SchedulePayload::Envelope { html, .. } | SchedulePayload::Document(html) => {
                parse_schedule_html(&html)
            }
        }
    }
}

/// Extract per-bin next-collection dates from the waste services markup.
///
/// Service blocks missing a heading or a date node are skipped, as are
/// unclassifiable headings and unparseable dates; duplicate bin types resolve
/// last-wins. A fully unusable payload yields an empty schedule, never an error.
#[must_use]
pub fn parse_schedule_html(html: &str) -> CollectionSchedule {
    let document = Html::parse_document(html);
    let services = Selector::parse(SERVICE_SELECTOR).expect("service selector is valid");
    let headings = Selector::parse(HEADING_SELECTOR).expect("heading selector is valid");
    let dates = Selector::parse(DATE_SELECTOR).expect("date selector is valid");

    let mut schedule = CollectionSchedule::new();

    for block in document.select(&services) {
        let Some(heading_element) = block.select(&headings).next() else {
            debug!("service block without a heading, skipping");
            continue;
        };
        let heading = collapse_text(heading_element.text());

        let Some(bin) = classify_heading(&heading) else {
            debug!("unknown bin type: '{heading}'");
            continue;
        };

        let Some(date_element) = block.select(&dates).next() else {
            debug!("no next-service element for '{heading}', skipping");
            continue;
        };
        let date_text = collapse_text(date_element.text());

        let Some(date) = parse_collection_date(&date_text) else {
            warn!("could not parse date '{date_text}' for '{heading}'");
            continue;
        };

        schedule.insert(bin, Collection { date, label: heading });
    }

    debug!("parsed collection schedule: {schedule:?}");
    schedule
}

/// Join an element's text nodes, collapsing runs of whitespace.
fn collapse_text<'html>(parts: impl Iterator<Item = &'html str>) -> String {
    parts.flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}
