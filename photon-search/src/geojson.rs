//! Hit → GeoJSON normalisation shared by all engines.
//!
//! Engine adapters already resolved their field conventions into [`Hit`];
//! this module applies the language fallback, address composition and the
//! `lat,lon` → `[lon, lat]` coordinate swap.

use crate::address::compose_address;
use crate::error::SearchError;
use crate::types::{Feature, FeatureCollection, Geometry, Hit, Language, Properties};

/// Convert engine hits into a feature collection, preserving hit order.
///
/// # Errors
///
/// Returns [`SearchError::DataShape`] if any hit lacks a well-formed
/// coordinate. No partial collection is returned.
pub fn to_feature_collection(
    hits: &[Hit],
    language: Language,
) -> Result<FeatureCollection, SearchError> {
    let features = hits
        .iter()
        .map(|hit| to_feature(hit, language))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FeatureCollection { features })
}

/// Convert a single hit into a feature.
pub fn to_feature(hit: &Hit, language: Language) -> Result<Feature, SearchError> {
    let raw = hit
        .coordinate
        .as_deref()
        .ok_or_else(|| SearchError::DataShape("hit has no coordinate".into()))?;
    let coordinates = parse_lat_lon(raw)?;

    let mut properties = Properties {
        osm_id: hit.osm_id,
        osm_key: hit.osm_key.clone(),
        osm_value: hit.osm_value.clone(),
        street: hit.street.clone(),
        postcode: hit.postcode.clone(),
        housenumber: hit.housenumber.clone(),
        name: hit.name.resolve(language).map(str::to_owned),
        country: hit.country.resolve(language).map(str::to_owned),
        city: hit.city.resolve(language).map(str::to_owned),
    };

    if properties.name.is_none() {
        if let Some(housenumber) = properties.housenumber.as_deref() {
            properties.name = Some(compose_address(
                language,
                housenumber,
                properties.street.as_deref(),
            ));
        }
    }

    Ok(Feature {
        geometry: Geometry::Point { coordinates },
        properties,
    })
}

/// Parse an index coordinate `"lat,lon"` into GeoJSON order `[lon, lat]`.
pub fn parse_lat_lon(raw: &str) -> Result<[f64; 2], SearchError> {
    let malformed = || SearchError::DataShape(format!("coordinate '{raw}' is not 'lat,lon'"));

    let mut parts = raw.split(',');
    let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };

    let lat = lat.trim().parse::<f64>().map_err(|_| malformed())?;
    let lon = lon.trim().parse::<f64>().map_err(|_| malformed())?;
    Ok([lon, lat])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Localized;

    fn hit_at(coordinate: &str) -> Hit {
        Hit {
            coordinate: Some(coordinate.into()),
            ..Default::default()
        }
    }

    #[test]
    fn coordinate_is_reversed_to_lon_lat() {
        assert_eq!(parse_lat_lon("52.5,13.4").unwrap(), [13.4, 52.5]);
        assert_eq!(parse_lat_lon(" -33.9 , 151.2 ").unwrap(), [151.2, -33.9]);
    }

    #[test]
    fn feature_geometry_is_lon_first() {
        let feature = to_feature(&hit_at("52.5,13.4"), Language::En).unwrap();
        assert_eq!(
            feature.geometry,
            Geometry::Point {
                coordinates: [13.4, 52.5]
            }
        );
    }

    #[test]
    fn malformed_coordinates_are_data_shape_errors() {
        for raw in ["52.5", "52.5,13.4,7", "north,east", "", "52.5;13.4"] {
            let err = parse_lat_lon(raw).unwrap_err();
            assert!(matches!(err, SearchError::DataShape(_)), "{raw}");
        }
    }

    #[test]
    fn missing_coordinate_is_data_shape_error() {
        let err = to_feature(&Hit::default(), Language::En).unwrap_err();
        assert!(matches!(err, SearchError::DataShape(_)));
    }

    #[test]
    fn plain_attributes_copied_through() {
        let hit = Hit {
            osm_id: Some(9),
            osm_key: Some("amenity".into()),
            osm_value: Some("cafe".into()),
            street: Some("Rue de Rivoli".into()),
            postcode: Some("75001".into()),
            housenumber: Some("1".into()),
            name: Localized::new().with_fallback("Café"),
            ..hit_at("48.86,2.34")
        };
        let props = to_feature(&hit, Language::Fr).unwrap().properties;
        assert_eq!(props.osm_id, Some(9));
        assert_eq!(props.osm_key.as_deref(), Some("amenity"));
        assert_eq!(props.osm_value.as_deref(), Some("cafe"));
        assert_eq!(props.street.as_deref(), Some("Rue de Rivoli"));
        assert_eq!(props.postcode.as_deref(), Some("75001"));
        assert_eq!(props.housenumber.as_deref(), Some("1"));
        assert_eq!(props.name.as_deref(), Some("Café"));
    }

    #[test]
    fn name_synthesized_housenumber_first_in_english() {
        let hit = Hit {
            street: Some("Main St".into()),
            housenumber: Some("5".into()),
            ..hit_at("0,0")
        };
        let props = to_feature(&hit, Language::En).unwrap().properties;
        assert_eq!(props.name.as_deref(), Some("5 Main St"));
    }

    #[test]
    fn name_synthesized_street_first_in_german() {
        let hit = Hit {
            street: Some("Main St".into()),
            housenumber: Some("5".into()),
            ..hit_at("0,0")
        };
        let props = to_feature(&hit, Language::De).unwrap().properties;
        assert_eq!(props.name.as_deref(), Some("Main St 5"));
    }

    #[test]
    fn existing_name_not_replaced_by_address() {
        let hit = Hit {
            street: Some("Main St".into()),
            housenumber: Some("5".into()),
            name: Localized::new().with_value("en", "Town Hall"),
            ..hit_at("0,0")
        };
        let props = to_feature(&hit, Language::En).unwrap().properties;
        assert_eq!(props.name.as_deref(), Some("Town Hall"));
    }

    #[test]
    fn housenumber_without_street_becomes_name() {
        let hit = Hit {
            housenumber: Some("12".into()),
            ..hit_at("0,0")
        };
        let props = to_feature(&hit, Language::It).unwrap().properties;
        assert_eq!(props.name.as_deref(), Some("12"));
        assert_eq!(props.street, None);
    }

    #[test]
    fn no_name_without_housenumber() {
        let hit = Hit {
            street: Some("Main St".into()),
            ..hit_at("0,0")
        };
        assert_eq!(to_feature(&hit, Language::En).unwrap().properties.name, None);
    }

    #[test]
    fn default_only_values_resolve_for_any_language() {
        let hit = Hit {
            name: Localized::new().with_fallback("Zürich"),
            city: Localized::new().with_fallback("Zürich"),
            country: Localized::new().with_value("de", "Schweiz"),
            ..hit_at("47.37,8.54")
        };
        let props = to_feature(&hit, Language::Fr).unwrap().properties;
        assert_eq!(props.name.as_deref(), Some("Zürich"));
        assert_eq!(props.city.as_deref(), Some("Zürich"));
        assert_eq!(props.country, None);
    }

    #[test]
    fn collection_preserves_hit_order() {
        let hits = vec![hit_at("1,10"), hit_at("2,20"), hit_at("3,30")];
        let collection = to_feature_collection(&hits, Language::En).unwrap();
        let lons: Vec<f64> = collection
            .features
            .iter()
            .map(|f| match f.geometry {
                Geometry::Point { coordinates } => coordinates[0],
            })
            .collect();
        assert_eq!(lons, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn one_bad_hit_fails_the_collection() {
        let hits = vec![hit_at("1,10"), hit_at("garbage")];
        assert!(to_feature_collection(&hits, Language::En).is_err());
    }
}
