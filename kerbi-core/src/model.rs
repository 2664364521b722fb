//! Domain data structures for councils, addresses, bin types, and collection schedules.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Built-in councils supported by the application.
pub enum Councils {
    /// Macedon Ranges Shire, Victoria.
    MacedonRanges,
    /// Mount Alexander Shire, Victoria.
    MountAlexander,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a council known to kerbi.
pub struct CouncilId(pub String);

impl fmt::Display for Councils {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            Councils::MacedonRanges => "macedon-ranges",
            Councils::MountAlexander => "mount-alexander",
        };
        write!(formatter, "{slug}")
    }
}

impl From<Councils> for CouncilId {
    fn from(council: Councils) -> Self {
        CouncilId(council.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing a council and its human-friendly name.
pub struct CouncilMeta {
    /// Unique identifier.
    pub id: CouncilId,
    /// Display name.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Opaque identifier a council site issues for one address/service location.
pub struct PropertyId(pub String);

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Address candidate returned from a provider search.
pub struct Address {
    /// Identifier used by a provider when requesting schedules.
    pub id: PropertyId,
    /// Council the address belongs to.
    pub council: CouncilId,
    /// Single-line label as shown by the council site.
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Canonical kerbside bin categories, independent of each site's display wording.
pub enum BinType {
    /// General household waste.
    Garbage,
    /// Mixed recycling.
    Recycling,
    /// Food and garden organics.
    Organics,
    /// Glass-only collection.
    Glass,
}

impl BinType {
    /// Stable string key used in the output mapping.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            BinType::Garbage => "garbage",
            BinType::Recycling => "recycling",
            BinType::Organics => "organics",
            BinType::Glass => "glass",
        }
    }

    /// Display metadata for the presentation layer.
    #[must_use]
    pub fn meta(self) -> BinMeta {
        match self {
            BinType::Garbage => BinMeta {
                name: "General Waste",
                lid: "red",
                icon: "mdi:trash-can",
            },
            BinType::Recycling => BinMeta {
                name: "Recycling",
                lid: "yellow",
                icon: "mdi:recycle",
            },
            BinType::Organics => BinMeta {
                name: "Food & Garden Organics",
                lid: "green",
                icon: "mdi:leaf",
            },
            BinType::Glass => BinMeta {
                name: "Glass",
                lid: "purple",
                icon: "mdi:bottle-wine",
            },
        }
    }
}

impl fmt::Display for BinType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
/// Static display metadata for a bin type.
pub struct BinMeta {
    /// Human-friendly name.
    pub name: &'static str,
    /// Lid colour of the physical bin.
    pub lid: &'static str,
    /// Icon name for frontends.
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Upcoming collection for a single bin type.
pub struct Collection {
    /// Next collection date.
    pub date: NaiveDate,
    /// Heading text the council site displayed for this service.
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Next collection per bin type, produced fresh on every fetch cycle.
///
/// Every entry holds a successfully parsed date; headings that could not be
/// classified and dates that could not be parsed are never inserted.
pub struct CollectionSchedule {
    collections: BTreeMap<BinType, Collection>,
}

impl CollectionSchedule {
    /// Create an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a collection, replacing any prior entry for the same bin type.
    pub fn insert(&mut self, bin: BinType, collection: Collection) -> Option<Collection> {
        self.collections.insert(bin, collection)
    }

    /// Look up the collection for a bin type.
    #[must_use]
    pub fn get(&self, bin: BinType) -> Option<&Collection> {
        self.collections.get(&bin)
    }

    /// Next collection date for a bin type, if one was parsed.
    #[must_use]
    pub fn date_for(&self, bin: BinType) -> Option<NaiveDate> {
        self.collections.get(&bin).map(|collection| collection.date)
    }

    /// Whether the schedule holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Number of bin types with a known collection date.
    #[must_use]
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Iterate entries in stable bin-type order.
    pub fn iter(&self) -> impl Iterator<Item = (BinType, &Collection)> {
        self.collections.iter().map(|(&bin, collection)| (bin, collection))
    }

    /// Output mapping handed to presentation layers: bin key to ISO-8601 date.
    #[must_use]
    pub fn iso_dates(&self) -> BTreeMap<&'static str, String> {
        self.collections
            .iter()
            .map(|(&bin, collection)| (bin.key(), collection.date.to_string()))
            .collect()
    }

    /// Earliest collection on or after the given date.
    #[must_use]
    pub fn next_collection(&self, after: NaiveDate) -> Option<(BinType, &Collection)> {
        self.collections
            .iter()
            .filter(|&(_, collection)| collection.date >= after)
            .min_by_key(|&(_, collection)| collection.date)
            .map(|(&bin, collection)| (bin, collection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    fn entry(label: &str, year: i32, month: u32, day: u32) -> Collection {
        Collection {
            date: date(year, month, day),
            label: label.to_owned(),
        }
    }

    #[test]
    fn insert_replaces_prior_entry_for_same_bin() {
        let mut schedule = CollectionSchedule::new();
        schedule.insert(BinType::Garbage, entry("General Waste", 2026, 2, 11));
        let previous = schedule.insert(BinType::Garbage, entry("General Waste", 2026, 2, 18));

        assert_eq!(schedule.len(), 1, "duplicate bin types collapse to one entry");
        assert_eq!(schedule.date_for(BinType::Garbage), Some(date(2026, 2, 18)));
        assert_eq!(
            previous.map(|collection| collection.date),
            Some(date(2026, 2, 11)),
            "first insert is returned as the replaced value"
        );
    }

    #[test]
    fn iso_dates_maps_keys_to_calendar_dates() {
        let mut schedule = CollectionSchedule::new();
        schedule.insert(BinType::Garbage, entry("General Waste", 2026, 2, 11));
        schedule.insert(BinType::Recycling, entry("Recycling", 2026, 2, 18));

        let dates = schedule.iso_dates();
        assert_eq!(dates.get("garbage").map(String::as_str), Some("2026-02-11"));
        assert_eq!(dates.get("recycling").map(String::as_str), Some("2026-02-18"));
    }

    #[test]
    fn next_collection_picks_earliest_upcoming() {
        let mut schedule = CollectionSchedule::new();
        schedule.insert(BinType::Garbage, entry("General Waste", 2026, 2, 18));
        schedule.insert(BinType::Recycling, entry("Recycling", 2026, 2, 11));
        schedule.insert(BinType::Organics, entry("Organics", 2026, 2, 9));

        let (bin, collection) = schedule
            .next_collection(date(2026, 2, 10))
            .expect("upcoming collection exists");
        assert_eq!(bin, BinType::Recycling);
        assert_eq!(collection.date, date(2026, 2, 11));
    }

    #[test]
    fn next_collection_is_none_when_everything_passed() {
        let mut schedule = CollectionSchedule::new();
        schedule.insert(BinType::Garbage, entry("General Waste", 2026, 2, 11));

        assert!(schedule.next_collection(date(2026, 3, 1)).is_none());
    }
}
