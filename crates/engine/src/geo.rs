//! Fixed city → coordinate lookup used to place records on the map.
//!
//! This stands in for a real geocoder: a small table of East Texas service
//! towns plus a default. Imported records get a small random jitter on top so
//! that several companies in one town don't render as a single marker.

use rand::Rng;

use crate::config::GeoConfig;
use crate::model::Coordinates;

pub const DEFAULT_CITY: &str = "Tyler";

pub const CITY_COORDINATES: [(&str, Coordinates); 11] = [
    ("Tyler", Coordinates::new(32.3513, -95.3011)),
    ("Longview", Coordinates::new(32.5007, -94.7405)),
    ("Whitehouse", Coordinates::new(32.2224, -95.2222)),
    ("Lindale", Coordinates::new(32.5132, -95.4074)),
    ("Kilgore", Coordinates::new(32.3854, -94.8752)),
    ("Chandler", Coordinates::new(32.3057, -95.4783)),
    ("Athens", Coordinates::new(32.2057, -95.8552)),
    ("Jacksonville", Coordinates::new(31.9652, -95.2677)),
    ("Bullard", Coordinates::new(32.1463, -95.3230)),
    ("Mineola", Coordinates::new(32.6635, -95.4852)),
    ("Henderson", Coordinates::new(32.1532, -94.7994)),
];

/// Exact (case-sensitive) lookup in the fixed table.
pub fn city_coordinates(city: &str) -> Option<Coordinates> {
    CITY_COORDINATES
        .iter()
        .find(|(name, _)| *name == city)
        .map(|(_, coords)| *coords)
}

#[derive(Debug, Clone)]
pub struct Geocoder {
    default_city: String,
    jitter_degrees: f64,
}

impl Default for Geocoder {
    fn default() -> Self {
        Self::new(&GeoConfig::default())
    }
}

impl Geocoder {
    pub fn new(config: &GeoConfig) -> Self {
        Self {
            default_city: config.default_city.clone(),
            jitter_degrees: config.jitter_degrees,
        }
    }

    pub fn default_city(&self) -> &str {
        &self.default_city
    }

    /// Table coordinate for `city`, falling back to the default city.
    pub fn locate(&self, city: &str) -> Coordinates {
        city_coordinates(city)
            .or_else(|| city_coordinates(&self.default_city))
            .unwrap_or(CITY_COORDINATES[0].1)
    }

    /// `locate` plus uniform jitter of ±`jitter_degrees / 2` on both axes.
    pub fn jittered<R: Rng + ?Sized>(&self, city: &str, rng: &mut R) -> Coordinates {
        let base = self.locate(city);
        Coordinates {
            lat: base.lat + (rng.gen::<f64>() - 0.5) * self.jitter_degrees,
            lng: base.lng + (rng.gen::<f64>() - 0.5) * self.jitter_degrees,
        }
    }
}
