//! Query construction for the Elasticsearch and Solr pipelines.
//!
//! Text matching is a `dis_max` over the analysed and the raw variant of the
//! per-language `collector` field: the best alternative wins, scores are not
//! summed. When a coordinate is known the text score is replaced by a
//! distance decay, so proximity dominates ranking.

use serde::Serialize;
use serde_json::{json, Value};

use crate::types::{Coordinate, SearchRequest};

/// Analyzer applied to the query text on both `collector` variants.
pub const QUERY_ANALYZER: &str = "raw_stringanalyser";

/// Painless script replacing the relevance score with a distance decay.
/// Must stay in sync with [`distance_decay`].
pub const DISTANCE_DECAY_SCRIPT: &str =
    "_score / (doc['coordinate'].arcDistance(params.lat, params.lon) / 1000 + 1) + 0.5";

/// Mean earth radius in kilometres, as used by Elasticsearch `arcDistance`.
const EARTH_RADIUS_KM: f64 = 6_371.008_771_4;

/// Build the Elasticsearch `_search` request body for `request`.
pub fn build_elasticsearch_query(request: &SearchRequest) -> Value {
    let lang = request.language.code();
    let field = format!("collector.{lang}");
    let raw_field = format!("collector.{lang}.raw");

    let text_query = json!({
        "dis_max": {
            "queries": [
                match_clause(&field, &request.query),
                match_clause(&raw_field, &request.query),
            ]
        }
    });

    let query = match request.coordinate {
        Some(coordinate) => proximity_boost(text_query, coordinate),
        None => text_query,
    };

    json!({
        "query": query,
        "size": request.limit,
    })
}

fn match_clause(field: &str, text: &str) -> Value {
    json!({
        "match": {
            field: {
                "query": text,
                "operator": "or",
                "analyzer": QUERY_ANALYZER,
            }
        }
    })
}

fn proximity_boost(query: Value, coordinate: Coordinate) -> Value {
    json!({
        "function_score": {
            "boost_mode": "replace",
            "query": query,
            "script_score": {
                "script": {
                    "source": DISTANCE_DECAY_SCRIPT,
                    "params": {
                        "lat": coordinate.lat,
                        "lon": coordinate.lon,
                    }
                }
            }
        }
    })
}

/// Request parameters for the Solr `/select` handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolrParams {
    pub q: String,
    /// Request handler: `<lang>` or, with a coordinate, `<lang>_loc`.
    pub qt: String,
    /// Point `"lat,lon"` for the location-aware handler.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pt: Option<String>,
    pub rows: usize,
    pub wt: &'static str,
}

/// Build the Solr request parameters for `request`.
///
/// Proximity ranking is configured in the `<lang>_loc` request handler, so
/// only the point is passed along.
pub fn build_solr_params(request: &SearchRequest) -> SolrParams {
    let lang = request.language.code();
    let (qt, pt) = match request.coordinate {
        Some(c) => (format!("{lang}_loc"), Some(format!("{},{}", c.lat, c.lon))),
        None => (lang.to_owned(), None),
    };

    SolrParams {
        q: request.query.clone(),
        qt,
        pt,
        rows: request.limit,
        wt: "json",
    }
}

/// Score after the proximity boost: `score / (distance_km + 1) + 0.5`.
///
/// The `+ 1` keeps the divisor at least one; the `+ 0.5` keeps nearby
/// low-relevance documents above zero.
pub fn distance_decay(score: f64, distance_km: f64) -> f64 {
    score / (distance_km + 1.0) + 0.5
}

/// Great-circle (haversine) distance between two coordinates in kilometres.
pub fn great_circle_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Language;

    fn request(language: Language, coordinate: Option<Coordinate>) -> SearchRequest {
        SearchRequest {
            query: "berlin".into(),
            language,
            coordinate,
            limit: 15,
        }
    }

    #[test]
    fn text_query_is_dis_max_over_both_fields() {
        let body = build_elasticsearch_query(&request(Language::De, None));
        let queries = body["query"]["dis_max"]["queries"]
            .as_array()
            .expect("dis_max queries");
        assert_eq!(queries.len(), 2);

        let analysed = &queries[0]["match"]["collector.de"];
        assert_eq!(analysed["query"], "berlin");
        assert_eq!(analysed["operator"], "or");
        assert_eq!(analysed["analyzer"], QUERY_ANALYZER);

        let raw = &queries[1]["match"]["collector.de.raw"];
        assert_eq!(raw["query"], "berlin");
        assert_eq!(raw["operator"], "or");
    }

    #[test]
    fn size_carries_limit() {
        let mut req = request(Language::En, None);
        req.limit = 7;
        assert_eq!(build_elasticsearch_query(&req)["size"], 7);
    }

    #[test]
    fn no_boost_without_coordinate() {
        let body = build_elasticsearch_query(&request(Language::En, None));
        assert!(body["query"].get("function_score").is_none());
    }

    #[test]
    fn coordinate_wraps_in_replacing_function_score() {
        let body = build_elasticsearch_query(&request(
            Language::En,
            Some(Coordinate::new(13.4, 52.5)),
        ));
        let fs = &body["query"]["function_score"];
        assert_eq!(fs["boost_mode"], "replace");
        assert!(fs["query"]["dis_max"].is_object());

        let script = &fs["script_score"]["script"];
        assert_eq!(script["source"], DISTANCE_DECAY_SCRIPT);
        assert_eq!(script["params"]["lat"], 52.5);
        assert_eq!(script["params"]["lon"], 13.4);
    }

    #[test]
    fn solr_params_without_coordinate() {
        let params = build_solr_params(&request(Language::Fr, None));
        assert_eq!(params.q, "berlin");
        assert_eq!(params.qt, "fr");
        assert_eq!(params.pt, None);
        assert_eq!(params.rows, 15);
        assert_eq!(params.wt, "json");
    }

    #[test]
    fn solr_params_with_coordinate_use_location_handler() {
        let params = build_solr_params(&request(
            Language::It,
            Some(Coordinate::new(12.5, 41.9)),
        ));
        assert_eq!(params.qt, "it_loc");
        assert_eq!(params.pt.as_deref(), Some("41.9,12.5"));
    }

    #[test]
    fn decay_at_zero_distance_adds_floor() {
        assert!((distance_decay(3.0, 0.0) - 3.5).abs() < 1e-12);
    }

    #[test]
    fn decay_at_nine_km_divides_by_ten() {
        assert!((distance_decay(3.0, 9.0) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn decay_never_drops_below_floor() {
        assert!((distance_decay(0.0, 0.0) - 0.5).abs() < 1e-12);
        assert!(distance_decay(10.0, 20_000.0) > 0.5);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let berlin = Coordinate::new(13.4, 52.5);
        assert!(great_circle_distance_km(berlin, berlin).abs() < 1e-9);
    }

    #[test]
    fn berlin_to_paris_distance() {
        let berlin = Coordinate::new(13.405, 52.52);
        let paris = Coordinate::new(2.3522, 48.8566);
        let km = great_circle_distance_km(berlin, paris);
        assert!((km - 878.0).abs() < 5.0, "got {km}");
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);
        let km = great_circle_distance_km(a, b);
        assert!((km - 111.19).abs() < 0.1, "got {km}");
    }
}
