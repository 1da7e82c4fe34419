//! Housenumber/street ordering per language.

use crate::types::Language;

/// Whether `language` writes the housenumber before the street.
///
/// German and Italian put the street first (`Hauptstraße 5`); every other
/// language, including the English default, puts the number first.
pub fn housenumber_first(language: Language) -> bool {
    !matches!(language, Language::De | Language::It)
}

/// Compose a display name from a housenumber and street.
///
/// Without a street the housenumber alone is returned.
pub fn compose_address(language: Language, housenumber: &str, street: Option<&str>) -> String {
    match street.filter(|s| !s.is_empty()) {
        Some(street) if housenumber_first(language) => format!("{housenumber} {street}"),
        Some(street) => format!("{street} {housenumber}"),
        None => housenumber.to_owned(),
    }
}
