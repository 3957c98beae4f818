//! Tracked bazaar sellers
//!
//! Seller lists usually come from pasted forum posts or spreadsheet exports,
//! so ids are pulled out of free text: any standalone 7-digit number counts.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::BazaarConfig;

static PLAYER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{7}\b").expect("player id pattern should compile"));

/// Every standalone 7-digit number in `text`, first occurrence order.
pub fn extract_player_ids(text: &str) -> Vec<u64> {
    dedup(
        PLAYER_ID
            .find_iter(text)
            .filter_map(|m| m.as_str().parse().ok()),
    )
}

/// Ids from a CSV export or plain text.
///
/// When the first line is a header naming an id or player column, only that
/// column is read, so prices and other 7-digit figures are ignored. Anything
/// else is scanned as free text.
pub fn import_player_ids(text: &str) -> Vec<u64> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let Some(column) = lines.next().and_then(id_column) else {
        return extract_player_ids(text);
    };

    dedup(lines.filter_map(|line| {
        let cell = line.split(',').nth(column)?.trim().trim_matches('"');
        is_player_id(cell).then(|| cell.parse().ok()).flatten()
    }))
}

fn id_column(header: &str) -> Option<usize> {
    let cells: Vec<String> = header
        .split(',')
        .map(|c| c.trim().trim_matches('"').to_lowercase())
        .collect();
    if cells
        .iter()
        .any(|c| !c.is_empty() && c.chars().all(|ch| ch.is_ascii_digit()))
    {
        return None;
    }
    cells
        .iter()
        .position(|c| c.contains("id") || c.contains("player"))
}

fn is_player_id(cell: &str) -> bool {
    cell.len() == 7 && cell.bytes().all(|b| b.is_ascii_digit())
}

fn dedup(ids: impl Iterator<Item = u64>) -> Vec<u64> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

impl BazaarConfig {
    /// Track `ids`, keeping the existing order. Returns the ids that were new.
    pub fn add_sellers(&mut self, ids: &[u64]) -> Vec<u64> {
        let mut added = Vec::new();
        for &id in ids {
            if id > 0 && !self.sellers.contains(&id) {
                self.sellers.push(id);
                added.push(id);
            }
        }
        added
    }

    /// Stop tracking `ids`. Returns how many were tracked.
    pub fn remove_sellers(&mut self, ids: &[u64]) -> usize {
        let before = self.sellers.len();
        self.sellers.retain(|id| !ids.contains(id));
        before - self.sellers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_seven_digit_ids_in_order() {
        let text = "Sellers: 2345678, 1234567 (xanax) and 2345678 again";
        assert_eq!(extract_player_ids(text), vec![2345678, 1234567]);
    }

    #[test]
    fn test_ignores_numbers_of_other_lengths() {
        let text = "123456 12345678 price $1,234,567 id1234567 [3456789]";
        assert_eq!(extract_player_ids(text), vec![3456789]);
    }

    #[test]
    fn test_csv_header_selects_the_id_column() {
        let csv = "name,player_id,networth\nDuke,0000004,1500000\nAlice,2345678,9876543\n\nBob,2345678,1000000\n";
        assert_eq!(import_player_ids(csv), vec![4, 2345678]);
    }

    #[test]
    fn test_csv_without_header_is_scanned_as_text() {
        let csv = "1234567,foo\n7654321,bar\n";
        assert_eq!(import_player_ids(csv), vec![1234567, 7654321]);
    }

    #[test]
    fn test_header_without_id_column_is_scanned_as_text() {
        let csv = "name,notes\nDuke,trades as 1234567\n";
        assert_eq!(import_player_ids(csv), vec![1234567]);
    }

    #[test]
    fn test_add_and_remove_sellers() {
        let mut config = BazaarConfig { sellers: vec![10] };
        assert_eq!(config.add_sellers(&[10, 0, 11, 12]), vec![11, 12]);
        assert_eq!(config.sellers, vec![10, 11, 12]);

        assert_eq!(config.remove_sellers(&[11, 99]), 1);
        assert_eq!(config.sellers, vec![10, 12]);
    }
}
