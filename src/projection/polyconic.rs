//! Polyconic and pseudoconic projections.

use std::f64::consts::FRAC_PI_2;

use crate::error::Result;
use crate::math::{aatan2, bisection, MAX_ITER};

use super::pseudocyl::{sfl_project, sfl_project_inverse};
use super::{bad_param, beyond, Projection, ProjectionParameter, D2R, EDGE_TOL,
    EQUATORIAL_FIDUCIAL, R2D};

/// Bonne's equal-area projection.
///
/// Parallels are concentric arcs true to scale; `theta_1 = 0` flattens the
/// arcs into the straight parallels of Sanson-Flamsteed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bon {
    theta1: f64,
    /// radius offset in degrees; zero marks the SFL degeneration
    y0: f64,
}

impl Bon {
    const PARAMETERS: [ProjectionParameter; 1] = [ProjectionParameter {
        name: "theta_1",
        pv_key: "PV2_1",
        interval: Some([-90.0, 90.0]),
        default: 0.0,
    }];

    /// Create a BON projection.
    ///
    /// # Arguments
    /// * `theta_1` - Standard parallel in degrees
    pub fn new(theta_1: f64) -> Result<Self> {
        if theta_1.abs() > 90.0 {
            return Err(bad_param("BON", format!("theta_1 = {theta_1} not in [-90, 90]")));
        }
        let t1 = theta_1.to_radians();
        let y0 = if theta_1 == 0.0 {
            0.0
        } else {
            theta_1 + R2D / t1.tan()
        };
        Ok(Bon { theta1: t1, y0 })
    }

    fn is_sfl(&self) -> bool {
        self.theta1 == 0.0
    }
}

impl Projection for Bon {
    fn code(&self) -> &'static str {
        "BON"
    }

    fn name(&self) -> &'static str {
        "Bonne's equal-area"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        EQUATORIAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        if self.is_sfl() {
            return sfl_project(self.code(), x, y);
        }
        let dy = self.y0 - y;
        let mut r = x.hypot(dy);
        if self.theta1 < 0.0 {
            r = -r;
        }
        let theta_deg = self.y0 - r;
        if theta_deg.abs() > 90.0 + EDGE_TOL {
            return Err(beyond(self.code(), x, y));
        }
        let theta = theta_deg.clamp(-90.0, 90.0) * D2R;

        let cos_t = theta.cos();
        if cos_t.abs() < EDGE_TOL {
            return Ok((0.0, theta));
        }
        let a = if r == 0.0 {
            0.0
        } else {
            aatan2(x / r, dy / r)
        };
        Ok((a * r * D2R / cos_t, theta))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        if self.is_sfl() {
            return Ok(sfl_project_inverse(phi, theta));
        }
        let r = self.y0 - theta.to_degrees();
        let cos_t = theta.cos();
        let a = if r.abs() < EDGE_TOL {
            0.0
        } else {
            phi * cos_t / (r * D2R)
        };
        Ok((r * a.sin(), -r * a.cos() + self.y0))
    }

    fn parameters(&self) -> &'static [ProjectionParameter] {
        &Self::PARAMETERS
    }
}

/// Polyconic projection.
///
/// Each parallel is an arc of its own tangent cone; undoing that per-row
/// geometry needs a transcendental solve for theta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pco;

impl Projection for Pco {
    fn code(&self) -> &'static str {
        "PCO"
    }

    fn name(&self) -> &'static str {
        "polyconic"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        EQUATORIAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let xr = x * D2R;
        let yr = y * D2R;

        if yr.abs() < 1e-12 {
            return Ok((xr, 0.0));
        }

        // eliminate psi from the forward equations:
        //   x = cot(t) sin(psi),  y - t = cot(t) (1 - cos(psi))
        // leaves f(t) = x^2 + (y-t)^2 - 2 cot(t) (y-t) = 0 with t between
        // 0 and y
        let f = |t: f64| {
            let d = yr - t;
            xr * xr + d * d - 2.0 * d / t.tan()
        };
        let (lo, hi) = if yr > 0.0 {
            (1e-10, yr.min(FRAC_PI_2))
        } else {
            (yr.max(-FRAC_PI_2), -1e-10)
        };
        let theta = bisection(f, lo, hi, MAX_ITER)
            .map_err(|_| beyond(self.code(), x, y))?;

        let cot_t = 1.0 / theta.tan();
        let sin_psi = xr / cot_t;
        let cos_psi = 1.0 - (yr - theta) / cot_t;
        let psi = aatan2(sin_psi, cos_psi);
        Ok((psi / theta.sin(), theta))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        if theta.abs() < 1e-12 {
            return Ok((R2D * phi, 0.0));
        }
        let cot_t = 1.0 / theta.tan();
        let psi = phi * theta.sin();
        let x = R2D * cot_t * psi.sin();
        let y = R2D * (theta + cot_t * (1.0 - psi.cos()));
        Ok((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Projection;

    fn assert_sphere_round_trip(p: &dyn Projection, phi_deg: f64, theta_deg: f64) {
        let (phi, theta) = (phi_deg.to_radians(), theta_deg.to_radians());
        let (x, y) = p.project_inverse(phi, theta).unwrap();
        let (phi2, theta2) = p.project(x, y).unwrap();
        assert!(
            (phi - phi2).abs() < 1e-9 && (theta - theta2).abs() < 1e-9,
            "{}: ({phi_deg}, {theta_deg}) -> ({}, {})",
            p.code(),
            phi2.to_degrees(),
            theta2.to_degrees()
        );
    }

    #[test]
    fn test_bon_round_trips() {
        let p = Bon::new(45.0).unwrap();
        for (phi, theta) in [(0.0, 45.0), (90.0, 10.0), (-140.0, -60.0)] {
            assert_sphere_round_trip(&p, phi, theta);
        }
        let south = Bon::new(-30.0).unwrap();
        assert_sphere_round_trip(&south, 60.0, -45.0);
    }

    #[test]
    fn test_bon_zero_is_sfl() {
        let bon = Bon::new(0.0).unwrap();
        let (x1, y1) = bon.project_inverse(1.0, 0.5).unwrap();
        let (x2, y2) = crate::projection::Sfl.project_inverse(1.0, 0.5).unwrap();
        assert_eq!((x1, y1), (x2, y2));
        assert!(Bon::new(91.0).is_err());
    }

    #[test]
    fn test_pco_round_trips() {
        for (phi, theta) in [(0.0, 30.0), (60.0, 45.0), (-100.0, -70.0), (30.0, 0.0)] {
            assert_sphere_round_trip(&Pco, phi, theta);
        }
    }

    #[test]
    fn test_pco_equator_is_linear() {
        let (x, y) = Pco.project_inverse(0.5, 0.0).unwrap();
        assert!((x - 0.5 * R2D).abs() < 1e-12);
        assert_eq!(y, 0.0);
    }
}
