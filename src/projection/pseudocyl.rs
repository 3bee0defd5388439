//! Pseudo-cylindrical projections: parallels stay straight but shrink
//! towards the poles.

use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};

use crate::error::Result;
use crate::math::{aasin, aatan2, bisection, MAX_ITER};

use super::{beyond, Projection, D2R, EDGE_TOL, EQUATORIAL_FIDUCIAL, R2D};

/// Sanson-Flamsteed (sinusoidal) projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sfl;

/// Shared SFL formulas; BON degenerates onto these when theta1 = 0.
pub(crate) fn sfl_project(code: &'static str, x: f64, y: f64) -> Result<(f64, f64)> {
    if y.abs() > 90.0 + EDGE_TOL {
        return Err(beyond(code, x, y));
    }
    let theta = y.clamp(-90.0, 90.0) * D2R;
    let cos_t = theta.cos();
    if cos_t.abs() < EDGE_TOL {
        return if x.abs() < EDGE_TOL {
            Ok((0.0, theta))
        } else {
            Err(beyond(code, x, y))
        };
    }
    Ok((x * D2R / cos_t, theta))
}

/// Inverse counterpart of [`sfl_project`].
pub(crate) fn sfl_project_inverse(phi: f64, theta: f64) -> (f64, f64) {
    (R2D * phi * theta.cos(), R2D * theta)
}

impl Projection for Sfl {
    fn code(&self) -> &'static str {
        "SFL"
    }

    fn name(&self) -> &'static str {
        "Sanson-Flamsteed"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        EQUATORIAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        sfl_project(self.code(), x, y)
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        Ok(sfl_project_inverse(phi, theta))
    }
}

/// Parabolic (Craster) projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Par;

impl Projection for Par {
    fn code(&self) -> &'static str {
        "PAR"
    }

    fn name(&self) -> &'static str {
        "parabolic"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        EQUATORIAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let s = y * D2R / 3.0;
        if s.abs() > 0.5 + EDGE_TOL {
            return Err(beyond(self.code(), x, y));
        }
        let theta = 3.0 * aasin(s.clamp(-0.5, 0.5))?;
        let denom = 1.0 - 4.0 * s * s;
        if denom.abs() < EDGE_TOL {
            return if x.abs() < EDGE_TOL {
                Ok((0.0, theta))
            } else {
                Err(beyond(self.code(), x, y))
            };
        }
        Ok((x * D2R / denom, theta))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        let s = (theta / 3.0).sin();
        let x = R2D * phi * (1.0 - 4.0 * s * s);
        Ok((x, R2D * 3.0 * s))
    }
}

/// Mollweide projection.
///
/// The sphere-to-plane direction needs the auxiliary angle gamma solving
/// `2 gamma + sin(2 gamma) = pi sin(theta)`, found by bisection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mol;

impl Projection for Mol {
    fn code(&self) -> &'static str {
        "MOL"
    }

    fn name(&self) -> &'static str {
        "Mollweide"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        EQUATORIAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let s = y * D2R / SQRT_2;
        if s.abs() > 1.0 + EDGE_TOL {
            return Err(beyond(self.code(), x, y));
        }
        let gamma = aasin(s.clamp(-1.0, 1.0))?;
        let sin_theta = (2.0 * gamma + (2.0 * gamma).sin()) / PI;
        if sin_theta.abs() > 1.0 + EDGE_TOL {
            return Err(beyond(self.code(), x, y));
        }
        let theta = aasin(sin_theta.clamp(-1.0, 1.0))?;

        let cos_gamma = gamma.cos();
        if cos_gamma.abs() < EDGE_TOL {
            return if x.abs() < EDGE_TOL {
                Ok((0.0, theta))
            } else {
                Err(beyond(self.code(), x, y))
            };
        }
        let phi = PI * x * D2R / (2.0 * SQRT_2 * cos_gamma);
        Ok((phi, theta))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        let gamma = if (theta.abs() - FRAC_PI_2).abs() < EDGE_TOL {
            FRAC_PI_2.copysign(theta)
        } else {
            let target = PI * theta.sin();
            bisection(
                |g| 2.0 * g + (2.0 * g).sin() - target,
                -FRAC_PI_2,
                FRAC_PI_2,
                MAX_ITER,
            )?
        };
        let x = R2D * 2.0 * SQRT_2 / PI * phi * gamma.cos();
        let y = R2D * SQRT_2 * gamma.sin();
        Ok((x, y))
    }
}

/// Hammer-Aitoff projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ait;

impl Projection for Ait {
    fn code(&self) -> &'static str {
        "AIT"
    }

    fn name(&self) -> &'static str {
        "Hammer-Aitoff"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        EQUATORIAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let xr = x * D2R;
        let yr = y * D2R;
        let z2 = 1.0 - xr * xr / 16.0 - yr * yr / 4.0;
        // the sky fills the ellipse z^2 >= 1/2
        if z2 < 0.5 - EDGE_TOL {
            return Err(beyond(self.code(), x, y));
        }
        let z = z2.max(0.0).sqrt();
        let theta = aasin((yr * z).clamp(-1.0, 1.0))?;
        let phi = 2.0 * aatan2(z * xr / 2.0, 2.0 * z2 - 1.0);
        Ok((phi, theta))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        let (sin_t, cos_t) = theta.sin_cos();
        let half = phi / 2.0;
        let w = (2.0 / (1.0 + cos_t * half.cos())).sqrt();
        Ok((R2D * 2.0 * w * cos_t * half.sin(), R2D * w * sin_t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Projection;

    fn assert_plane_round_trip(p: &dyn Projection, x: f64, y: f64) {
        let (phi, theta) = p.project(x, y).unwrap();
        let (x2, y2) = p.project_inverse(phi, theta).unwrap();
        assert!(
            (x - x2).abs() < 1e-10 && (y - y2).abs() < 1e-10,
            "{}: ({x}, {y}) -> ({x2}, {y2})",
            p.code()
        );
    }

    fn assert_sphere_round_trip(p: &dyn Projection, phi_deg: f64, theta_deg: f64) {
        let (phi, theta) = (phi_deg.to_radians(), theta_deg.to_radians());
        let (x, y) = p.project_inverse(phi, theta).unwrap();
        let (phi2, theta2) = p.project(x, y).unwrap();
        assert!(
            (phi - phi2).abs() < 1e-10 && (theta - theta2).abs() < 1e-10,
            "{}: ({phi_deg}, {theta_deg}) -> ({}, {})",
            p.code(),
            phi2.to_degrees(),
            theta2.to_degrees()
        );
    }

    #[test]
    fn test_sfl_round_trips() {
        for (x, y) in [(0.0, 0.0), (90.0, 45.0), (-120.0, -60.0)] {
            assert_plane_round_trip(&Sfl, x, y);
        }
        // off-axis x at the pole is outside the wedge
        assert!(Sfl.project(5.0, 90.0).is_err());
        assert!(Sfl.project(0.0, 90.0).is_ok());
    }

    #[test]
    fn test_par_round_trips() {
        for (phi, theta) in [(0.0, 0.0), (100.0, 30.0), (-150.0, -75.0)] {
            assert_sphere_round_trip(&Par, phi, theta);
        }
        assert!(Par.project(10.0, 200.0).is_err());
    }

    #[test]
    fn test_mol_round_trips() {
        for (phi, theta) in [(0.0, 0.0), (90.0, 45.0), (-170.0, -80.0), (10.0, 89.9)] {
            assert_sphere_round_trip(&Mol, phi, theta);
        }
    }

    #[test]
    fn test_mol_pole_is_exact() {
        let (x, y) = Mol.project_inverse(0.0, FRAC_PI_2).unwrap();
        assert!(x.abs() < 1e-12);
        assert!((y - R2D * SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_ait_round_trips() {
        for (phi, theta) in [(0.0, 0.0), (120.0, 30.0), (-179.0, -10.0), (60.0, 85.0)] {
            assert_sphere_round_trip(&Ait, phi, theta);
        }
    }

    #[test]
    fn test_ait_rejects_outside_ellipse() {
        // beyond the phi = +-180 boundary
        assert!(Ait.project(165.0, 0.0).is_err());
    }
}
