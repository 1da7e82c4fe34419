//! Core types: request parameters, engine hits and GeoJSON output.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Languages with dedicated index fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// German.
    De,
    /// English, also used for any unsupported language.
    #[default]
    En,
    /// French.
    Fr,
    /// Italian.
    It,
}

impl Language {
    /// Returns the ISO 639-1 code used in field names.
    pub fn code(&self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
            Self::Fr => "fr",
            Self::It => "it",
        }
    }

    /// Returns all supported languages.
    pub fn all() -> &'static [Language] {
        &[Self::De, Self::En, Self::Fr, Self::It]
    }

    /// Map a raw `lang` parameter to a supported language.
    ///
    /// Absent or unrecognised codes fall back to [`Language::En`]. Matching
    /// is exact, so `"DE"` is not German.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|code| Self::all().iter().find(|l| l.code() == code))
            .copied()
            .unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A WGS84 position, longitude first as in GeoJSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// A validated geocoding request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Free-text search term, never empty.
    pub query: String,
    /// Language used for field selection and address composition.
    pub language: Language,
    /// Proximity hint; only set when both longitude and latitude parsed.
    pub coordinate: Option<Coordinate>,
    /// Maximum number of hits, at most [`crate::request::MAX_LIMIT`].
    pub limit: usize,
}

/// Which backing engine served a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineKind {
    Elasticsearch,
    Solr,
}

impl EngineKind {
    /// Returns the human-readable name of this engine.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Elasticsearch => "Elasticsearch",
            Self::Solr => "Solr",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A localized attribute: per-language values plus a language-neutral fallback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Localized {
    values: HashMap<String, String>,
    fallback: Option<String>,
}

impl Localized {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value for a language code.
    pub fn with_value(mut self, code: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(code.into(), value.into());
        self
    }

    /// Set the value used when the requested language has none.
    pub fn with_fallback(mut self, value: impl Into<String>) -> Self {
        self.fallback = Some(value.into());
        self
    }

    pub(crate) fn insert(&mut self, code: String, value: String) {
        self.values.insert(code, value);
    }

    pub(crate) fn set_fallback(&mut self, value: String) {
        self.fallback = Some(value);
    }

    /// Resolve the value for `language`.
    ///
    /// Empty strings count as missing, so an empty localized value falls
    /// through to the fallback, and an empty fallback resolves to `None`.
    pub fn resolve(&self, language: Language) -> Option<&str> {
        self.values
            .get(language.code())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .or_else(|| self.fallback.as_deref().filter(|v| !v.is_empty()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.fallback.is_none()
    }
}

/// A single record returned by a search engine, after engine-specific parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hit {
    pub osm_id: Option<i64>,
    pub osm_key: Option<String>,
    pub osm_value: Option<String>,
    pub street: Option<String>,
    pub postcode: Option<String>,
    pub housenumber: Option<String>,
    /// Raw `"lat,lon"` position as stored in the index.
    pub coordinate: Option<String>,
    /// Relevance score reported by the engine, if any. Diagnostics only.
    pub score: Option<f64>,
    pub name: Localized,
    pub country: Localized,
    pub city: Localized,
}

/// GeoJSON geometry. Only points are produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// `coordinates` is `[lon, lat]`.
    Point { coordinates: [f64; 2] },
}

/// Properties attached to every [`Feature`]; absent values are omitted.
///
/// Text attributes are always JSON strings: a numeric index value such as
/// `postcode: 10115` is emitted as `"10115"`, and a multi-valued Solr field
/// contributes only its first value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osm_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osm_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osm_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub housenumber: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// A GeoJSON `Feature`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: Properties,
}

/// A GeoJSON `FeatureCollection`; feature order is engine hit order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}
