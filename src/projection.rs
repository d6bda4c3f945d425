//! Geodetic transform between ETRS89 / UTM and geographic coordinates.
//!
//! Implements the Transverse Mercator projection with the Krüger series
//! expanded to sixth order in the third flattening (Karney 2011), which is
//! accurate to well under a millimetre inside a UTM zone. ETRS89 is treated
//! as coincident with WGS84; the datums differ by well under a metre.

use crate::constants::{
    ETRS89_UTM_EPSG_BASE, ETRS89_UTM_MAX_ZONE, ETRS89_UTM_MIN_ZONE, LATITUDE_TOLERANCE,
    MAX_LATITUDE_ITERATIONS, grs80, utm,
};
use crate::error::{ConverterError, Result};
use crate::models::{CoordinatePair, GeoCoordinate};
use thiserror::Error;
use tracing::trace;

/// Failures inside the projection maths
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    #[error("latitude did not converge for ({x}, {y})")]
    NotConverged { x: f64, y: f64 },
}

/// Conversion from projected coordinates to geographic longitude/latitude
pub trait GeodeticTransform: Send + Sync {
    /// Convert projected `(x, y)` at elevation `z` to longitude/latitude in degrees
    fn to_lon_lat(&self, x: f64, y: f64, z: f64) -> std::result::Result<GeoCoordinate, ProjectionError>;
}

/// Reference ellipsoid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub semi_major_axis: f64,
    pub flattening: f64,
}

impl Ellipsoid {
    pub const GRS80: Ellipsoid = Ellipsoid {
        semi_major_axis: grs80::SEMI_MAJOR_AXIS,
        flattening: 1.0 / grs80::INVERSE_FLATTENING,
    };

    /// First eccentricity
    pub fn eccentricity(&self) -> f64 {
        (self.flattening * (2.0 - self.flattening)).sqrt()
    }

    /// Third flattening n = f / (2 - f)
    pub fn third_flattening(&self) -> f64 {
        self.flattening / (2.0 - self.flattening)
    }
}

/// Transverse Mercator projection with precomputed Krüger coefficients
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    central_meridian: f64,
    scale_factor: f64,
    false_easting: f64,
    false_northing: f64,
    eccentricity: f64,
    /// Radius of the rectifying sphere, A
    rectifying_radius: f64,
    alpha: [f64; 6],
    beta: [f64; 6],
}

impl TransverseMercator {
    pub fn new(
        ellipsoid: Ellipsoid,
        central_meridian_degrees: f64,
        scale_factor: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let n = ellipsoid.third_flattening();
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        let rectifying_radius = ellipsoid.semi_major_axis / (1.0 + n)
            * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0);

        let alpha = [
            n / 2.0 - 2.0 / 3.0 * n2 + 5.0 / 16.0 * n3 + 41.0 / 180.0 * n4 - 127.0 / 288.0 * n5
                + 7891.0 / 37800.0 * n6,
            13.0 / 48.0 * n2 - 3.0 / 5.0 * n3 + 557.0 / 1440.0 * n4 + 281.0 / 630.0 * n5
                - 1983433.0 / 1935360.0 * n6,
            61.0 / 240.0 * n3 - 103.0 / 140.0 * n4 + 15061.0 / 26880.0 * n5
                + 167603.0 / 181440.0 * n6,
            49561.0 / 161280.0 * n4 - 179.0 / 168.0 * n5 + 6601661.0 / 7257600.0 * n6,
            34729.0 / 80640.0 * n5 - 3418889.0 / 1995840.0 * n6,
            212378941.0 / 319334400.0 * n6,
        ];

        let beta = [
            n / 2.0 - 2.0 / 3.0 * n2 + 37.0 / 96.0 * n3 - 1.0 / 360.0 * n4 - 81.0 / 512.0 * n5
                + 96199.0 / 604800.0 * n6,
            1.0 / 48.0 * n2 + 1.0 / 15.0 * n3 - 437.0 / 1440.0 * n4 + 46.0 / 105.0 * n5
                - 1118711.0 / 3870720.0 * n6,
            17.0 / 480.0 * n3 - 37.0 / 840.0 * n4 - 209.0 / 4480.0 * n5 + 5569.0 / 90720.0 * n6,
            4397.0 / 161280.0 * n4 - 11.0 / 504.0 * n5 - 830251.0 / 7257600.0 * n6,
            4583.0 / 161280.0 * n5 - 108847.0 / 3991680.0 * n6,
            20648693.0 / 638668800.0 * n6,
        ];

        Self {
            central_meridian: central_meridian_degrees.to_radians(),
            scale_factor,
            false_easting,
            false_northing,
            eccentricity: ellipsoid.eccentricity(),
            rectifying_radius,
            alpha,
            beta,
        }
    }

    /// Conformal latitude parameter τ' for τ = tan φ
    fn conformal_tan(&self, tau: f64) -> f64 {
        let e = self.eccentricity;
        let sigma = (e * (e * tau / (1.0 + tau * tau).sqrt()).atanh()).sinh();
        tau * (1.0 + sigma * sigma).sqrt() - sigma * (1.0 + tau * tau).sqrt()
    }

    /// Projected (easting, northing) to geographic coordinates
    pub fn inverse(
        &self,
        easting: f64,
        northing: f64,
    ) -> std::result::Result<GeoCoordinate, ProjectionError> {
        if !easting.is_finite() || !northing.is_finite() {
            return Err(ProjectionError::NonFinite {
                x: easting,
                y: northing,
            });
        }

        let k0_a = self.scale_factor * self.rectifying_radius;
        let eta = (easting - self.false_easting) / k0_a;
        let xi = (northing - self.false_northing) / k0_a;

        let mut xi_prime = xi;
        let mut eta_prime = eta;
        for (j, beta) in self.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_prime -= beta * (k * xi).sin() * (k * eta).cosh();
            eta_prime -= beta * (k * xi).cos() * (k * eta).sinh();
        }

        let sinh_eta = eta_prime.sinh();
        let sin_xi = xi_prime.sin();
        let cos_xi = xi_prime.cos();
        let tau_prime = sin_xi / (sinh_eta * sinh_eta + cos_xi * cos_xi).sqrt();

        let e2 = self.eccentricity * self.eccentricity;
        let mut tau = tau_prime;
        let mut converged = false;
        for iteration in 0..MAX_LATITUDE_ITERATIONS {
            let tau_i = self.conformal_tan(tau);
            let delta = (tau_prime - tau_i) / (1.0 + tau_i * tau_i).sqrt()
                * (1.0 + (1.0 - e2) * tau * tau)
                / ((1.0 - e2) * (1.0 + tau * tau).sqrt());
            tau += delta;
            if delta.abs() < LATITUDE_TOLERANCE {
                trace!("Latitude converged after {} iterations", iteration + 1);
                converged = true;
                break;
            }
        }

        if !converged || !tau.is_finite() {
            return Err(ProjectionError::NotConverged {
                x: easting,
                y: northing,
            });
        }

        let latitude = tau.atan();
        let longitude = self.central_meridian + sinh_eta.atan2(cos_xi);

        Ok(GeoCoordinate {
            longitude: longitude.to_degrees(),
            latitude: latitude.to_degrees(),
        })
    }

    /// Geographic coordinates to projected (easting, northing)
    pub fn forward(
        &self,
        longitude: f64,
        latitude: f64,
    ) -> std::result::Result<CoordinatePair, ProjectionError> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(ProjectionError::NonFinite {
                x: longitude,
                y: latitude,
            });
        }

        let lambda = longitude.to_radians() - self.central_meridian;
        let tau = latitude.to_radians().tan();
        let tau_prime = self.conformal_tan(tau);

        let xi_prime = tau_prime.atan2(lambda.cos());
        let eta_prime =
            (lambda.sin() / (tau_prime * tau_prime + lambda.cos() * lambda.cos()).sqrt()).asinh();

        let mut xi = xi_prime;
        let mut eta = eta_prime;
        for (j, alpha) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += alpha * (k * xi_prime).sin() * (k * eta_prime).cosh();
            eta += alpha * (k * xi_prime).cos() * (k * eta_prime).sinh();
        }

        let k0_a = self.scale_factor * self.rectifying_radius;
        Ok(CoordinatePair::new(
            self.false_easting + k0_a * eta,
            self.false_northing + k0_a * xi,
        ))
    }
}

/// ETRS89 / UTM zone (northern hemisphere), identified by its EPSG code
#[derive(Debug, Clone)]
pub struct Etrs89Utm {
    epsg: u32,
    zone: u32,
    projection: TransverseMercator,
}

impl Etrs89Utm {
    /// Build the projection for an EPSG code in 25828..=25838
    pub fn from_epsg(epsg: u32) -> Result<Self> {
        let zone = epsg
            .checked_sub(ETRS89_UTM_EPSG_BASE)
            .filter(|zone| (ETRS89_UTM_MIN_ZONE..=ETRS89_UTM_MAX_ZONE).contains(zone))
            .ok_or(ConverterError::UnsupportedProjection { epsg })?;

        let central_meridian = zone as f64 * utm::ZONE_WIDTH_DEGREES - 183.0;
        let projection = TransverseMercator::new(
            Ellipsoid::GRS80,
            central_meridian,
            utm::SCALE_FACTOR,
            utm::FALSE_EASTING,
            utm::FALSE_NORTHING,
        );

        Ok(Self {
            epsg,
            zone,
            projection,
        })
    }

    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    pub fn zone(&self) -> u32 {
        self.zone
    }

    /// Longitude/latitude in degrees to projected (x, y)
    pub fn to_projected(
        &self,
        longitude: f64,
        latitude: f64,
    ) -> std::result::Result<CoordinatePair, ProjectionError> {
        self.projection.forward(longitude, latitude)
    }
}

impl GeodeticTransform for Etrs89Utm {
    fn to_lon_lat(
        &self,
        x: f64,
        y: f64,
        _z: f64,
    ) -> std::result::Result<GeoCoordinate, ProjectionError> {
        self.projection.inverse(x, y)
    }
}
