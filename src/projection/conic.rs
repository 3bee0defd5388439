//! Conic projections.
//!
//! All four members share the polar geometry of the cone: a point maps to
//! radius R(theta) at bearing `c * phi` about the cone apex line, with the
//! y origin shifted so the fiducial parallel theta_a passes through (0, 0).
//! The standard parallels are theta_1 = theta_a - eta and
//! theta_2 = theta_a + eta; the radius changes sign with theta_a for cones
//! opening southward.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::error::Result;
use crate::math::{aasin, aatan2};

use super::{bad_param, beyond, Projection, ProjectionParameter, D2R, EDGE_TOL, R2D};

const THETA_A: ProjectionParameter = ProjectionParameter {
    name: "theta_a",
    pv_key: "PV2_1",
    interval: Some([-90.0, 90.0]),
    default: 0.0,
};

const ETA: ProjectionParameter = ProjectionParameter {
    name: "eta",
    pv_key: "PV2_2",
    interval: Some([-90.0, 90.0]),
    default: 0.0,
};

const CONIC_PARAMETERS: [ProjectionParameter; 2] = [THETA_A, ETA];

/// Polar decomposition about the cone apex: (phi in rad, signed radius in
/// deg). The radius carries the sign of theta_a.
fn conic_plane_to_polar(x: f64, y: f64, y0: f64, c: f64, southward: bool) -> (f64, f64) {
    let dy = y0 - y;
    let mut r = x.hypot(dy);
    if southward {
        r = -r;
    }
    let phi = if r == 0.0 {
        0.0
    } else {
        aatan2(x / r, dy / r) / c
    };
    (phi, r)
}

/// Plane point for a bearing and signed radius.
fn conic_polar_to_plane(phi: f64, r: f64, y0: f64, c: f64) -> (f64, f64) {
    let a = c * phi;
    (r * a.sin(), -r * a.cos() + y0)
}

/// Validate the shared (theta_a, eta) parameter pair.
fn check_angles(code: &'static str, theta_a: f64, eta: f64) -> Result<()> {
    if theta_a == 0.0 || theta_a.abs() >= 90.0 {
        return Err(bad_param(
            code,
            format!("theta_a = {theta_a} must be in (-90, 90) and non-zero"),
        ));
    }
    if eta.abs() >= 90.0 {
        return Err(bad_param(code, format!("|eta| = {} must be < 90", eta.abs())));
    }
    Ok(())
}

/// Conic perspective projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cop {
    theta_a: f64,
    c: f64,
    cos_eta: f64,
    cot_a: f64,
    y0: f64,
}

impl Cop {
    /// Create a COP projection.
    ///
    /// # Arguments
    /// * `theta_a` - Latitude of the fiducial parallel, degrees
    /// * `eta` - Half-separation of the standard parallels, degrees, non-zero
    pub fn new(theta_a: f64, eta: f64) -> Result<Self> {
        check_angles("COP", theta_a, eta)?;
        if eta == 0.0 {
            return Err(bad_param("COP", "eta must be non-zero"));
        }
        let ta = theta_a.to_radians();
        let cos_eta = eta.to_radians().cos();
        let cot_a = 1.0 / ta.tan();
        Ok(Cop {
            theta_a: ta,
            c: ta.sin(),
            cos_eta,
            cot_a,
            y0: R2D * cos_eta * cot_a,
        })
    }
}

impl Projection for Cop {
    fn code(&self) -> &'static str {
        "COP"
    }

    fn name(&self) -> &'static str {
        "conic perspective"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        (0.0, self.theta_a)
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (phi, r) = conic_plane_to_polar(x, y, self.y0, self.c, self.theta_a < 0.0);
        let theta = self.theta_a + (self.cot_a - r * D2R / self.cos_eta).atan();
        if theta.abs() > FRAC_PI_2 + EDGE_TOL {
            return Err(beyond(self.code(), x, y));
        }
        Ok((phi, theta.clamp(-FRAC_PI_2, FRAC_PI_2)))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        let d = theta - self.theta_a;
        if FRAC_PI_2 - d.abs() < EDGE_TOL {
            // the perspective diverges a quarter turn from the fiducial parallel
            return Err(beyond(self.code(), phi, theta));
        }
        let r = R2D * self.cos_eta * (self.cot_a - d.tan());
        Ok(conic_polar_to_plane(phi, r, self.y0, self.c))
    }

    fn parameters(&self) -> &'static [ProjectionParameter] {
        &CONIC_PARAMETERS
    }
}

/// Conic equal-area projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coe {
    theta_a: f64,
    /// gamma / 2 with gamma = sin(theta_1) + sin(theta_2)
    c: f64,
    gamma: f64,
    s1s2: f64,
    y0: f64,
}

impl Coe {
    /// Create a COE projection.
    pub fn new(theta_a: f64, eta: f64) -> Result<Self> {
        if theta_a.abs() > 90.0 || eta.abs() >= 90.0 {
            return Err(bad_param(
                "COE",
                format!("bad parallels theta_a = {theta_a}, eta = {eta}"),
            ));
        }
        let t1 = (theta_a - eta).to_radians();
        let t2 = (theta_a + eta).to_radians();
        let gamma = t1.sin() + t2.sin();
        if gamma.abs() < EDGE_TOL {
            return Err(bad_param("COE", "sin(theta_1) + sin(theta_2) = 0"));
        }
        let ta = theta_a.to_radians();
        let s1s2 = t1.sin() * t2.sin();
        let mut coe = Coe {
            theta_a: ta,
            c: gamma / 2.0,
            gamma,
            s1s2,
            y0: 0.0,
        };
        coe.y0 = coe.radius(ta.sin());
        Ok(coe)
    }

    /// Signed radius in degrees at a native sine-latitude.
    fn radius(&self, sin_theta: f64) -> f64 {
        let w = (1.0 + self.s1s2 - self.gamma * sin_theta).max(0.0).sqrt();
        R2D * 2.0 / self.gamma * w
    }
}

impl Projection for Coe {
    fn code(&self) -> &'static str {
        "COE"
    }

    fn name(&self) -> &'static str {
        "conic equal-area"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        (0.0, self.theta_a)
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (phi, r) = conic_plane_to_polar(x, y, self.y0, self.c, self.theta_a < 0.0);
        let w = self.gamma * r * D2R / 2.0;
        let sin_theta = (1.0 + self.s1s2 - w * w) / self.gamma;
        if sin_theta.abs() > 1.0 + EDGE_TOL {
            return Err(beyond(self.code(), x, y));
        }
        Ok((phi, aasin(sin_theta.clamp(-1.0, 1.0))?))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        let r = self.radius(theta.sin());
        Ok(conic_polar_to_plane(phi, r, self.y0, self.c))
    }

    fn parameters(&self) -> &'static [ProjectionParameter] {
        &CONIC_PARAMETERS
    }
}

/// Conic equidistant projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cod {
    theta_a: f64,
    c: f64,
    /// additive radius constant, degrees
    a: f64,
    y0: f64,
}

impl Cod {
    /// Create a COD projection.
    pub fn new(theta_a: f64, eta: f64) -> Result<Self> {
        check_angles("COD", theta_a, eta)?;
        let ta = theta_a.to_radians();
        let e = eta.to_radians();
        let cot_a = 1.0 / ta.tan();
        let (c, a) = if e.abs() < EDGE_TOL {
            (ta.sin(), R2D * cot_a)
        } else {
            (ta.sin() * e.sin() / e, R2D * e * cot_a / e.tan())
        };
        Ok(Cod {
            theta_a: ta,
            c,
            a,
            y0: a,
        })
    }
}

impl Projection for Cod {
    fn code(&self) -> &'static str {
        "COD"
    }

    fn name(&self) -> &'static str {
        "conic equidistant"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        (0.0, self.theta_a)
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (phi, r) = conic_plane_to_polar(x, y, self.y0, self.c, self.theta_a < 0.0);
        let theta_deg = self.theta_a.to_degrees() + self.a - r;
        if theta_deg.abs() > 90.0 + EDGE_TOL {
            return Err(beyond(self.code(), x, y));
        }
        Ok((phi, theta_deg.clamp(-90.0, 90.0) * D2R))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        let r = self.theta_a.to_degrees() - theta.to_degrees() + self.a;
        Ok(conic_polar_to_plane(phi, r, self.y0, self.c))
    }

    fn parameters(&self) -> &'static [ProjectionParameter] {
        &CONIC_PARAMETERS
    }
}

/// Conic orthomorphic (conformal) projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coo {
    theta_a: f64,
    c: f64,
    /// radius scale psi, degrees
    psi: f64,
    y0: f64,
}

impl Coo {
    /// Create a COO projection.
    pub fn new(theta_a: f64, eta: f64) -> Result<Self> {
        if theta_a.abs() >= 90.0 {
            return Err(bad_param("COO", format!("theta_a = {theta_a} must be in (-90, 90)")));
        }
        let t1 = (theta_a - eta).to_radians();
        let t2 = (theta_a + eta).to_radians();
        if t1.abs() >= FRAC_PI_2 || t2.abs() >= FRAC_PI_2 {
            return Err(bad_param("COO", "standard parallels must avoid the poles"));
        }
        let tan1 = (FRAC_PI_4 - t1 / 2.0).tan();
        let tan2 = (FRAC_PI_4 - t2 / 2.0).tan();

        let c = if (t1 - t2).abs() < EDGE_TOL {
            t1.sin()
        } else {
            (t2.cos() / t1.cos()).ln() / (tan2 / tan1).ln()
        };
        if c.abs() < EDGE_TOL {
            return Err(bad_param("COO", "cone constant is zero"));
        }

        let psi = R2D * t1.cos() / (c * tan1.powf(c));
        let ta = theta_a.to_radians();
        Ok(Coo {
            theta_a: ta,
            c,
            psi,
            y0: psi * (FRAC_PI_4 - ta / 2.0).tan().powf(c),
        })
    }
}

impl Projection for Coo {
    fn code(&self) -> &'static str {
        "COO"
    }

    fn name(&self) -> &'static str {
        "conic orthomorphic"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        (0.0, self.theta_a)
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (phi, r) = conic_plane_to_polar(x, y, self.y0, self.c, self.theta_a < 0.0);
        let ratio = r / self.psi;
        if ratio < 0.0 {
            return Err(beyond(self.code(), x, y));
        }
        if ratio == 0.0 {
            // the apex is the pole for a northward cone only
            return if self.c > 0.0 {
                Ok((phi, FRAC_PI_2))
            } else {
                Err(beyond(self.code(), x, y))
            };
        }
        let theta = FRAC_PI_2 - 2.0 * ratio.powf(1.0 / self.c).atan();
        Ok((phi, theta))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        if theta + FRAC_PI_2 < EDGE_TOL {
            // conformal radius diverges at the south native pole
            return Err(beyond(self.code(), phi, theta));
        }
        let w = (FRAC_PI_4 - theta / 2.0).tan();
        if w < EDGE_TOL && self.c < 0.0 {
            // a southward cone diverges at the north native pole instead
            return Err(beyond(self.code(), phi, theta));
        }
        let r = self.psi * w.powf(self.c);
        Ok(conic_polar_to_plane(phi, r, self.y0, self.c))
    }

    fn parameters(&self) -> &'static [ProjectionParameter] {
        &CONIC_PARAMETERS
    }
}
