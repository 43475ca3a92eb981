//! Name normalization shared by every matching consumer.
//!
//! Community sites, game tables, and hand-edited pages disagree on casing,
//! apostrophes, and separators ("Tal Rasha's", "tal-rashas", "TALRASHAS").
//! [`normalize`] folds those differences into a single lookup key.

/// Characters removed from names before comparison.
const STRIPPED: &[char] = &[
    '\'', '\u{2018}', '\u{2019}', '\u{02BC}', '`', ' ', '-', '_',
];

/// Produce the normalized lookup key for a display name.
///
/// Lower-cases and strips apostrophes (straight and curly), spaces, hyphens,
/// and underscores. The result is used as a persistent lookup key, so this
/// must stay stable across releases.
///
/// # Examples
///
/// ```
/// use horadric_catalog::normalize;
///
/// assert_eq!(normalize("Ber Rune"), "berrune");
/// assert_eq!(normalize("BER-RUNE"), "berrune");
/// assert_eq!(normalize("Tal Rasha\u{2019}s Guardianship"), "talrashasguardianship");
/// ```
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !STRIPPED.contains(c))
        .flat_map(char::to_lowercase)
        .collect()
}
