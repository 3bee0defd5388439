//! Cylindrical projections.
//!
//! The native longitude maps straight onto x (scaled for CYP), so these
//! are anchored at (phi, theta) = (0, 0) and the interesting behaviour
//! lives entirely in the latitude axis.

use std::f64::consts::FRAC_PI_2;

use crate::error::Result;
use crate::math::aasin;

use super::{bad_param, beyond, Projection, ProjectionParameter, D2R, EDGE_TOL,
    EQUATORIAL_FIDUCIAL, R2D};

/// Plate carree projection: longitude and latitude used as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Car;

impl Projection for Car {
    fn code(&self) -> &'static str {
        "CAR"
    }

    fn name(&self) -> &'static str {
        "plate carree"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        EQUATORIAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        if y.abs() > 90.0 + EDGE_TOL {
            return Err(beyond(self.code(), x, y));
        }
        Ok((x * D2R, y.clamp(-90.0, 90.0) * D2R))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        Ok((phi * R2D, theta * R2D))
    }
}

/// Cylindrical equal-area projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cea {
    lambda: f64,
}

impl Cea {
    const PARAMETERS: [ProjectionParameter; 1] = [ProjectionParameter {
        name: "lambda",
        pv_key: "PV2_1",
        interval: Some([0.0, 1.0]),
        default: 1.0,
    }];

    /// Create a CEA projection.
    ///
    /// # Arguments
    /// * `lambda` - Latitude-squashing parameter, in (0, 1]
    pub fn new(lambda: f64) -> Result<Self> {
        if lambda <= 0.0 || lambda > 1.0 {
            return Err(bad_param("CEA", format!("lambda = {lambda} not in (0, 1]")));
        }
        Ok(Cea { lambda })
    }
}

impl Projection for Cea {
    fn code(&self) -> &'static str {
        "CEA"
    }

    fn name(&self) -> &'static str {
        "cylindrical equal-area"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        EQUATORIAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let s = self.lambda * y * D2R;
        if s.abs() > 1.0 + EDGE_TOL {
            return Err(beyond(self.code(), x, y));
        }
        Ok((x * D2R, aasin(s.clamp(-1.0, 1.0))?))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        Ok((phi * R2D, R2D * theta.sin() / self.lambda))
    }

    fn parameters(&self) -> &'static [ProjectionParameter] {
        &Self::PARAMETERS
    }
}

/// Cylindrical perspective projection.
///
/// Projects from an axis point `mu` radii from the centre onto a cylinder
/// of radius `lambda`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cyp {
    mu: f64,
    lambda: f64,
}

impl Cyp {
    const PARAMETERS: [ProjectionParameter; 2] = [
        ProjectionParameter {
            name: "mu",
            pv_key: "PV2_1",
            interval: None,
            default: 1.0,
        },
        ProjectionParameter {
            name: "lambda",
            pv_key: "PV2_2",
            interval: None,
            default: 1.0,
        },
    ];

    /// Create a CYP projection.
    ///
    /// # Arguments
    /// * `mu` - Distance of the projection point in spherical radii
    /// * `lambda` - Cylinder radius in spherical radii, > 0
    pub fn new(mu: f64, lambda: f64) -> Result<Self> {
        if lambda <= 0.0 {
            return Err(bad_param("CYP", format!("lambda = {lambda} must be > 0")));
        }
        if (mu + lambda).abs() < EDGE_TOL {
            return Err(bad_param("CYP", "mu = -lambda collapses the projection"));
        }
        Ok(Cyp { mu, lambda })
    }
}

impl Projection for Cyp {
    fn code(&self) -> &'static str {
        "CYP"
    }

    fn name(&self) -> &'static str {
        "cylindrical perspective"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        EQUATORIAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let eta = y * D2R / (self.mu + self.lambda);
        let s = eta * self.mu / (eta * eta + 1.0).sqrt();
        if s.abs() > 1.0 + EDGE_TOL {
            return Err(beyond(self.code(), x, y));
        }
        let theta = eta.atan() + aasin(s.clamp(-1.0, 1.0))?;
        Ok((x * D2R / self.lambda, theta))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        let (sin_t, cos_t) = theta.sin_cos();
        let denom = self.mu + cos_t;
        if denom.abs() < EDGE_TOL {
            return Err(beyond(self.code(), phi, theta));
        }
        let y = R2D * (self.mu + self.lambda) * sin_t / denom;
        Ok((self.lambda * phi * R2D, y))
    }

    fn parameters(&self) -> &'static [ProjectionParameter] {
        &Self::PARAMETERS
    }
}

/// Mercator projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mer;

impl Projection for Mer {
    fn code(&self) -> &'static str {
        "MER"
    }

    fn name(&self) -> &'static str {
        "Mercator"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        EQUATORIAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let theta = 2.0 * (y * D2R).exp().atan() - FRAC_PI_2;
        Ok((x * D2R, theta))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        if FRAC_PI_2 - theta.abs() < EDGE_TOL {
            // the poles are infinitely far up the cylinder
            return Err(beyond(self.code(), phi, theta));
        }
        let y = R2D * (std::f64::consts::FRAC_PI_4 + theta / 2.0).tan().ln();
        Ok((phi * R2D, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Projection;

    fn assert_round_trip(p: &dyn Projection, x: f64, y: f64) {
        let (phi, theta) = p.project(x, y).unwrap();
        let (x2, y2) = p.project_inverse(phi, theta).unwrap();
        assert!(
            (x - x2).abs() < 1e-11 && (y - y2).abs() < 1e-11,
            "{}: ({x}, {y}) -> ({x2}, {y2})",
            p.code()
        );
    }

    #[test]
    fn test_car_is_the_identity_map() {
        let (phi, theta) = Car.project(45.0, -30.0).unwrap();
        assert!((phi - 45.0 * D2R).abs() < 1e-15);
        assert!((theta + 30.0 * D2R).abs() < 1e-15);
        assert!(Car.project(0.0, 91.0).is_err());
    }

    #[test]
    fn test_cea_round_trips_and_domain() {
        let p = Cea::new(0.5).unwrap();
        for (x, y) in [(0.0, 0.0), (170.0, 80.0), (-45.0, -114.0)] {
            assert_round_trip(&p, x, y);
        }
        // |lambda * y| > 1 rad has no latitude
        assert!(p.project(0.0, 120.0).is_err());
        assert!(Cea::new(0.0).is_err());
        assert!(Cea::new(1.2).is_err());
    }

    #[test]
    fn test_cyp_round_trips() {
        let p = Cyp::new(1.0, std::f64::consts::FRAC_1_SQRT_2).unwrap();
        for (x, y) in [(0.0, 0.0), (100.0, 45.0), (-60.0, -80.0)] {
            assert_round_trip(&p, x, y);
        }
        assert!(Cyp::new(1.0, 0.0).is_err());
        assert!(Cyp::new(-1.0, 1.0).is_err());
    }

    #[test]
    fn test_mer_round_trips_but_not_poles() {
        for (x, y) in [(0.0, 0.0), (120.0, 70.0), (-80.0, -85.0)] {
            assert_round_trip(&Mer, x, y);
        }
        assert!(Mer.project_inverse(0.0, FRAC_PI_2).is_err());
        assert!(Mer.project_inverse(0.0, -FRAC_PI_2).is_err());
    }
}
