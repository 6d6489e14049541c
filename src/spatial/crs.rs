//! Coordinate reference systems the boundary layers come in, and the inverse
//! projections that bring them back to WGS84 longitude/latitude.

use crate::spatial::error::BoundaryError;
use geo::Coord;
use std::fmt;

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const UTM_K0: f64 = 0.9996;
const UTM_FALSE_EASTING: f64 = 500_000.0;
const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Crs {
    /// Longitude/latitude in degrees (EPSG:4326, OGC CRS84).
    #[default]
    Wgs84,
    /// Spherical web mercator (EPSG:3857).
    WebMercator,
    /// WGS84 / UTM (EPSG:326xx north, EPSG:327xx south).
    Utm { zone: u8, north: bool },
    /// Any other EPSG code. Recognized, but cannot be reprojected.
    Epsg(u32),
}

impl Crs {
    /// Parses identifiers such as `EPSG:32647`, `urn:ogc:def:crs:EPSG::4326`,
    /// `urn:ogc:def:crs:EPSG:6.6:4326` or `urn:ogc:def:crs:OGC:1.3:CRS84`.
    /// The code is the last `:`-separated segment after `EPSG`.
    pub fn parse(identifier: &str) -> Result<Self, BoundaryError> {
        let trimmed = identifier.trim();
        if trimmed.to_ascii_uppercase().ends_with("CRS84") {
            return Ok(Crs::Wgs84);
        }

        let upper = trimmed.to_ascii_uppercase();
        let code = upper
            .rfind("EPSG")
            .map(|at| &trimmed[at + 4..])
            .and_then(|rest| rest.rsplit(':').next())
            .and_then(|digits| digits.trim().parse::<u32>().ok())
            .ok_or_else(|| BoundaryError::UnrecognizedCrs(identifier.to_string()))?;
        Ok(Crs::from_epsg(code))
    }

    pub fn from_epsg(code: u32) -> Self {
        match code {
            4326 => Crs::Wgs84,
            3857 => Crs::WebMercator,
            32601..=32660 => Crs::Utm {
                zone: (code - 32600) as u8,
                north: true,
            },
            32701..=32760 => Crs::Utm {
                zone: (code - 32700) as u8,
                north: false,
            },
            other => Crs::Epsg(other),
        }
    }

    pub fn epsg(&self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::WebMercator => 3857,
            Crs::Utm { zone, north: true } => 32600 + *zone as u32,
            Crs::Utm { zone, north: false } => 32700 + *zone as u32,
            Crs::Epsg(code) => *code,
        }
    }

    /// Whether [`Crs::to_wgs84`] can handle coordinates in this system.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Crs::Epsg(_))
    }

    /// Converts one coordinate of this system to WGS84 longitude/latitude.
    ///
    /// Returns `None` for unsupported systems and for results that are not
    /// finite.
    pub fn to_wgs84(&self, coord: Coord<f64>) -> Option<Coord<f64>> {
        let (lng, lat) = match self {
            Crs::Wgs84 => (coord.x, coord.y),
            Crs::WebMercator => web_mercator_inverse(coord.x, coord.y),
            Crs::Utm { zone, north } => utm_inverse(coord.x, coord.y, *zone, *north),
            Crs::Epsg(_) => return None,
        };
        (lng.is_finite() && lat.is_finite()).then_some(Coord { x: lng, y: lat })
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

fn web_mercator_inverse(x: f64, y: f64) -> (f64, f64) {
    let lng = (x / WGS84_A).to_degrees();
    let lat = (2.0 * (y / WGS84_A).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    (lng, lat)
}

/// Inverse transverse mercator on the WGS84 ellipsoid (Snyder, USGS PP 1395,
/// eq. 8-18 to 8-25).
fn utm_inverse(easting: f64, northing: f64, zone: u8, north: bool) -> (f64, f64) {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let ep2 = e2 / (1.0 - e2);
    let lon0 = (zone as f64 * 6.0 - 183.0).to_radians();

    let x = easting - UTM_FALSE_EASTING;
    let y = if north {
        northing
    } else {
        northing - UTM_FALSE_NORTHING_SOUTH
    };

    let m = y / UTM_K0;
    let mu = m / (WGS84_A * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));
    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

    // Footpoint latitude.
    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let (sin1, cos1, tan1) = (phi1.sin(), phi1.cos(), phi1.tan());
    let c1 = ep2 * cos1.powi(2);
    let t1 = tan1.powi(2);
    let n1 = WGS84_A / (1.0 - e2 * sin1.powi(2)).sqrt();
    let r1 = WGS84_A * (1.0 - e2) / (1.0 - e2 * sin1.powi(2)).powf(1.5);
    let d = x / (n1 * UTM_K0);

    let lat = phi1
        - (n1 * tan1 / r1)
            * (d.powi(2) / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2)
                    - 252.0 * ep2
                    - 3.0 * c1.powi(2))
                    * d.powi(6)
                    / 720.0);
    let lon = lon0
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
                * d.powi(5)
                / 120.0)
            / cos1;

    (lon.to_degrees(), lat.to_degrees())
}
