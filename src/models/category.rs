//! Item category normalization
//!
//! The API reports fine-grained item types ("Primary", "Melee", "Drug").
//! The dashboard groups them into coarser categories through a fixed
//! synonym table. Matching is an exact, ASCII case-insensitive comparison on
//! the trimmed source string.

/// Source item type to display category
const CATEGORY_SYNONYMS: &[(&str, &str)] = &[
    ("primary", "Weapons"),
    ("secondary", "Weapons"),
    ("melee", "Weapons"),
    ("temporary", "Temporary"),
    ("defensive", "Armor"),
    ("armor", "Armor"),
    ("drug", "Drugs"),
    ("medical", "Medical"),
    ("booster", "Boosters"),
    ("energy drink", "Boosters"),
    ("alcohol", "Boosters"),
    ("candy", "Boosters"),
    ("enhancer", "Enhancers"),
    ("clothing", "Clothing"),
    ("jewelry", "Jewelry"),
    ("flower", "Flowers"),
    ("plushie", "Plushies"),
    ("artifact", "Collectibles"),
    ("collectible", "Collectibles"),
    ("supply pack", "Supply Packs"),
    ("car", "Cars"),
    ("book", "Books"),
    ("material", "Materials"),
    ("tool", "Tools"),
    ("special", "Special"),
    ("virus", "Viruses"),
];

/// Category for items with no type at all
pub const MISCELLANEOUS: &str = "Miscellaneous";

/// Map a raw item type to its display category.
///
/// Display categories map to themselves, so the function is idempotent and a
/// category picked from a listing's `category` filters back to that listing.
/// Types outside the table pass through unchanged.
pub fn normalize_category(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return MISCELLANEOUS.to_string();
    }

    CATEGORY_SYNONYMS
        .iter()
        .find(|(source, target)| source.eq_ignore_ascii_case(raw) || target.eq_ignore_ascii_case(raw))
        .map(|(_, target)| target.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Whether `raw` falls in `category` after normalizing both sides.
pub fn matches_category(raw: &str, category: &str) -> bool {
    normalize_category(raw).eq_ignore_ascii_case(&normalize_category(category))
}
