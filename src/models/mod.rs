//! Normalized records handed to callers
//!
//! Raw payloads from `crate::client::models` are mapped into these stable
//! shapes. Missing numbers become `0` and missing strings become one of the
//! placeholders below, so a record never carries a null.

pub mod bazaar;
pub mod category;
pub mod company;
pub mod display;
pub mod faction;
pub mod key;
pub mod player;

pub use bazaar::{BazaarFilter, BazaarItems, BazaarListing, BazaarSort, percent_below_market};
pub use category::normalize_category;
pub use company::{CompanyDetailRecord, CompanyRecord, EmployeeRecord};
pub use faction::{FactionDetailRecord, FactionRecord, MemberRecord, TerritoryRecord, WarRecord};
pub use key::{KeyCheck, KeyStatus};
pub use player::{BarRecord, BattleStats, PlayerRecord};

/// Placeholder for a missing name or free-text field
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for a missing label (position, tag, type name)
pub const NOT_AVAILABLE: &str = "N/A";

/// Sentinel company name when the player has no job
pub const NO_COMPANY: &str = "No Company";

/// Sentinel faction name when the player is factionless
pub const NO_FACTION: &str = "Not in a Faction";

/// Unwrap an optional upstream string, substituting `placeholder` for a
/// missing or blank value.
pub(crate) fn text_or(value: Option<String>, placeholder: &str) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s,
        _ => placeholder.to_string(),
    }
}

/// Parse a map key (upstream ids arrive as JSON object keys).
pub(crate) fn parse_id(key: &str) -> u64 {
    key.trim().parse().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_or_substitutes_blank() {
        assert_eq!(text_or(None, UNKNOWN), "Unknown");
        assert_eq!(text_or(Some("  ".into()), NOT_AVAILABLE), "N/A");
        assert_eq!(text_or(Some("Duke".into()), UNKNOWN), "Duke");
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), 42);
        assert_eq!(parse_id("x"), 0);
    }
}
