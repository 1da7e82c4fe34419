//! Search engine implementations.
//!
//! Each module provides a struct implementing [`crate::engine::GeocodingEngine`]
//! plus the parsing step that turns the engine's native documents into
//! [`crate::types::Hit`] values.

pub mod elasticsearch;
pub mod solr;

pub use elasticsearch::ElasticsearchEngine;
pub use solr::SolrEngine;

use serde_json::Value;

use crate::error::SearchError;

/// Render a JSON scalar as text. Strings are taken as-is, numbers and
/// booleans use their JSON representation, everything else is ignored.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse an OSM identifier given either as an integer or an integer string.
pub(crate) fn parse_osm_id(value: &Value) -> Result<i64, SearchError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| SearchError::DataShape(format!("osm_id {value} is not an integer")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_render_as_text() {
        assert_eq!(scalar_to_string(&json!("10115")), Some("10115".into()));
        assert_eq!(scalar_to_string(&json!(10115)), Some("10115".into()));
        assert_eq!(scalar_to_string(&json!(true)), Some("true".into()));
        assert_eq!(scalar_to_string(&json!(null)), None);
        assert_eq!(scalar_to_string(&json!({"de": "x"})), None);
    }

    #[test]
    fn osm_id_from_number_or_string() {
        assert_eq!(parse_osm_id(&json!(240109189)).unwrap(), 240109189);
        assert_eq!(parse_osm_id(&json!("240109189")).unwrap(), 240109189);
    }

    #[test]
    fn osm_id_rejects_non_integers() {
        let err = parse_osm_id(&json!("node/12")).unwrap_err();
        assert!(matches!(err, SearchError::DataShape(_)));
        assert!(parse_osm_id(&json!(1.5)).is_err());
    }
}
