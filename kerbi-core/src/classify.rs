//! Classification of council service headings into canonical bin types.

use crate::model::BinType;

/// Ordered keyword table scanned first-match-wins against a lowercased heading.
///
/// Word keywords sit before the bare lid colours so a heading like
/// "General Waste (Red Lid)" resolves via "general waste" rather than "red".
const KEYWORDS: &[(&str, BinType)] = &[
    ("general waste", BinType::Garbage),
    ("garbage", BinType::Garbage),
    ("rubbish", BinType::Garbage),
    ("recycling", BinType::Recycling),
    ("recycle", BinType::Recycling),
    ("organics", BinType::Organics),
    ("fogo", BinType::Organics),
    ("food", BinType::Organics),
    ("garden", BinType::Organics),
    ("glass", BinType::Glass),
    ("red", BinType::Garbage),
    ("yellow", BinType::Recycling),
    ("green", BinType::Organics),
    ("purple", BinType::Glass),
];

/// Match a service heading to a canonical bin type.
///
/// Case-insensitive substring scan over the keyword table; `None` when the
/// heading matches no known keyword. The caller decides how to log and drop
/// unclassified entries.
#[must_use]
pub fn classify_heading(heading: &str) -> Option<BinType> {
    let normalized = heading.trim().to_lowercase();
    KEYWORDS
        .iter()
        .find(|&&(keyword, _)| normalized.contains(keyword))
        .map(|&(_, bin)| bin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_are_case_insensitive() {
        assert_eq!(classify_heading("GENERAL WASTE (Red Lid)"), Some(BinType::Garbage));
        assert_eq!(classify_heading("general waste"), Some(BinType::Garbage));
    }

    #[test]
    fn matches_on_substring() {
        assert_eq!(classify_heading("Kerbside Recycling"), Some(BinType::Recycling));
        assert_eq!(classify_heading("Food & Garden Organics"), Some(BinType::Organics));
        assert_eq!(classify_heading("Glass (Purple Lid)"), Some(BinType::Glass));
    }

    #[test]
    fn word_keywords_win_over_lid_colours() {
        // "yellow" is also in the table, but "recycling" comes first.
        assert_eq!(classify_heading("Recycling (Yellow Lid)"), Some(BinType::Recycling));
    }

    #[test]
    fn lid_colour_alone_still_classifies() {
        assert_eq!(classify_heading("Red lid bin"), Some(BinType::Garbage));
        assert_eq!(classify_heading("Yellow lid bin"), Some(BinType::Recycling));
    }

    #[test]
    fn unknown_headings_are_unclassified() {
        assert_eq!(classify_heading("Street Sweeping"), None);
        assert_eq!(classify_heading(""), None);
        assert_eq!(classify_heading("Hard Waste Booking"), None);
    }
}
