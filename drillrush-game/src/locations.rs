//! World oil locations and their map projection.
use serde::Serialize;

use crate::tier::RecognitionTier;

/// A drilling site on the world map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub name: &'static str,
    /// Degrees, -90 (south) to 90 (north).
    pub lat: f64,
    /// Degrees, -180 (west) to 180 (east).
    pub lon: f64,
    pub tier: RecognitionTier,
}

const fn site(name: &'static str, lat: f64, lon: f64, tier: RecognitionTier) -> Location {
    Location {
        name,
        lat,
        lon,
        tier,
    }
}

static LOCATIONS: [Location; 15] = [
    site("Angola", -11.2, 17.9, RecognitionTier::Tutorial),
    site("Nigeria", 9.1, 8.7, RecognitionTier::Regional),
    site("Libye", 26.3, 17.2, RecognitionTier::Regional),
    site("Algérie", 28.0, 2.0, RecognitionTier::Regional),
    site("Norvège", 60.5, 8.5, RecognitionTier::Regional),
    site("Royaume-Uni", 55.4, -3.4, RecognitionTier::Regional),
    site("Canada", 56.1, -106.3, RecognitionTier::Continental),
    site("Chine", 35.9, 104.2, RecognitionTier::Continental),
    site("Brésil", -14.2, -51.9, RecognitionTier::Continental),
    site("Mexique", 23.6, -102.5, RecognitionTier::Continental),
    site("Kazakhstan", 48.0, 66.9, RecognitionTier::Continental),
    site("Venezuela", 6.4, -66.6, RecognitionTier::Continental),
    site("États-Unis", 37.1, -95.7, RecognitionTier::Global),
    site("Qatar", 25.4, 51.2, RecognitionTier::Global),
    site("Russie", 61.5, 105.3, RecognitionTier::Global),
];

#[must_use]
pub fn all_locations() -> &'static [Location] {
    &LOCATIONS
}

/// Locations reachable by a player at `tier`.
pub fn locations_up_to(tier: RecognitionTier) -> impl Iterator<Item = &'static Location> {
    LOCATIONS.iter().filter(move |location| location.tier <= tier)
}

/// Screen-space point produced by [`project_coordinates`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

/// Equirectangular projection of a latitude/longitude onto a map image.
///
/// `origin` is the center of the displayed map; `width` and `height` its size.
#[must_use]
pub fn project_coordinates(
    lat: f64,
    lon: f64,
    origin: MapPoint,
    width: f64,
    height: f64,
) -> MapPoint {
    let x_fraction = (lon + 180.0) / 360.0;
    let y_fraction = (90.0 - lat) / 180.0;
    MapPoint {
        x: width.mul_add(x_fraction, origin.x - width / 2.0),
        y: height.mul_add(y_fraction, origin.y - height / 2.0),
    }
}
