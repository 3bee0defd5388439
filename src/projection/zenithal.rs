//! Zenithal (azimuthal) projections.
//!
//! All members share the polar decomposition of the plane: the native
//! meridian phi is measured from the -y axis and the radius grows away
//! from the native pole at theta = +90 deg, where every zenithal
//! projection is anchored.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::Result;
use crate::math::{aasin, aatan2, bisection, MAX_ITER};

use super::{bad_param, beyond, Projection, ProjectionParameter, D2R, EDGE_TOL, R2D,
    ZENITHAL_FIDUCIAL};

/// Polar decomposition of a plane point: (phi in rad, radius in deg).
fn plane_to_polar(x: f64, y: f64) -> (f64, f64) {
    (aatan2(x, -y), x.hypot(y))
}

/// Plane point for a native meridian and radius.
fn polar_to_plane(phi: f64, r: f64) -> (f64, f64) {
    (r * phi.sin(), -r * phi.cos())
}

/// Zenithal perspective projection.
///
/// Projects from a point `mu` spherical radii from the centre of the
/// sphere, onto a plane that may be tilted by `gamma` degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Azp {
    mu: f64,
    tan_gamma: f64,
    sin_gamma: f64,
    cos_gamma: f64,
    /// R0 * (mu + 1), the radius scale
    w: f64,
    /// smallest visible native latitude when |mu| > 1
    theta_limit: Option<f64>,
}

impl Azp {
    const PARAMETERS: [ProjectionParameter; 2] = [
        ProjectionParameter {
            name: "mu",
            pv_key: "PV2_1",
            interval: None,
            default: 0.0,
        },
        ProjectionParameter {
            name: "gamma",
            pv_key: "PV2_2",
            interval: Some([-90.0, 90.0]),
            default: 0.0,
        },
    ];

    /// Create an AZP projection.
    ///
    /// # Arguments
    /// * `mu` - Distance of the projection point in spherical radii
    /// * `gamma` - Tilt of the projection plane in degrees
    pub fn new(mu: f64, gamma: f64) -> Result<Self> {
        if (mu + 1.0).abs() < EDGE_TOL {
            return Err(bad_param("AZP", "mu = -1 puts the projection point on the sphere"));
        }
        if gamma.abs() >= 90.0 {
            return Err(bad_param("AZP", format!("|gamma| = {} must be < 90", gamma.abs())));
        }
        let g = gamma.to_radians();
        let theta_limit = if mu.abs() > 1.0 {
            Some((-1.0 / mu).asin())
        } else {
            None
        };
        Ok(Azp {
            mu,
            tan_gamma: g.tan(),
            sin_gamma: g.sin(),
            cos_gamma: g.cos(),
            w: R2D * (mu + 1.0),
            theta_limit,
        })
    }
}

impl Projection for Azp {
    fn code(&self) -> &'static str {
        "AZP"
    }

    fn name(&self) -> &'static str {
        "zenithal perspective"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        ZENITHAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let yc = y * self.cos_gamma;
        let r = x.hypot(yc);
        let phi = aatan2(x, -yc);

        let denom = self.w + y * self.sin_gamma;
        if denom.abs() < EDGE_TOL {
            return Err(beyond(self.code(), x, y));
        }
        let rho = r / denom;
        let s = rho * self.mu / (rho * rho + 1.0).sqrt();
        if s.abs() > 1.0 + EDGE_TOL {
            return Err(beyond(self.code(), x, y));
        }
        let omega = aasin(s.clamp(-1.0, 1.0))?;
        let psi = aatan2(1.0, rho);

        // the perspective equation has two roots; keep the one on the
        // visible sheet nearest the pole
        let mut theta: Option<f64> = None;
        for candidate in [psi - omega, psi + omega - PI] {
            if candidate.abs() > FRAC_PI_2 + EDGE_TOL {
                continue;
            }
            let candidate = candidate.clamp(-FRAC_PI_2, FRAC_PI_2);
            if let Some(limit) = self.theta_limit {
                if candidate < limit - EDGE_TOL {
                    continue;
                }
            }
            match theta {
                Some(t) if t >= candidate => {}
                _ => theta = Some(candidate),
            }
        }
        match theta {
            Some(t) => Ok((phi, t)),
            None => Err(beyond(self.code(), x, y)),
        }
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        if let Some(limit) = self.theta_limit {
            if theta < limit - EDGE_TOL {
                return Err(beyond(self.code(), phi, theta));
            }
        }
        let (sin_t, cos_t) = theta.sin_cos();
        let denom = self.mu + sin_t + cos_t * phi.cos() * self.tan_gamma;
        // past the tangent circle the denominator flips sign with mu + 1;
        // the theta_limit check above already rejected the far sheet
        let visible = if self.theta_limit.is_some() {
            denom.abs() > EDGE_TOL
        } else {
            denom > EDGE_TOL
        };
        if !visible {
            return Err(beyond(self.code(), phi, theta));
        }
        let r = self.w * cos_t / denom;
        Ok((r * phi.sin(), -r * phi.cos() / self.cos_gamma))
    }

    fn parameters(&self) -> &'static [ProjectionParameter] {
        &Self::PARAMETERS
    }
}

/// Slant zenithal perspective projection.
///
/// Generalises AZP by letting the projection point sit anywhere: at
/// distance `mu` towards the native position (`phi_c`, `theta_c`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Szp {
    xp: f64,
    yp: f64,
    zp: f64,
}

impl Szp {
    const PARAMETERS: [ProjectionParameter; 3] = [
        ProjectionParameter {
            name: "mu",
            pv_key: "PV2_1",
            interval: None,
            default: 0.0,
        },
        ProjectionParameter {
            name: "phi_c",
            pv_key: "PV2_2",
            interval: None,
            default: 0.0,
        },
        ProjectionParameter {
            name: "theta_c",
            pv_key: "PV2_3",
            interval: Some([-90.0, 90.0]),
            default: 90.0,
        },
    ];

    /// Create an SZP projection.
    ///
    /// # Arguments
    /// * `mu` - Distance of the projection point in spherical radii
    /// * `phi_c`, `theta_c` - Native direction of the projection point, degrees
    pub fn new(mu: f64, phi_c: f64, theta_c: f64) -> Result<Self> {
        let pc = phi_c.to_radians();
        let tc = theta_c.to_radians();
        let zp = mu * tc.sin() + 1.0;
        if zp.abs() < EDGE_TOL {
            return Err(bad_param(
                "SZP",
                "mu sin(theta_c) = -1 puts the projection point in the plane",
            ));
        }
        Ok(Szp {
            xp: -mu * tc.cos() * pc.sin(),
            yp: mu * tc.cos() * pc.cos(),
            zp,
        })
    }
}

impl Projection for Szp {
    fn code(&self) -> &'static str {
        "SZP"
    }

    fn name(&self) -> &'static str {
        "slant zenithal perspective"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        ZENITHAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let xr = x * D2R;
        let yr = y * D2R;
        let dx = self.xp - xr;
        let dy = self.yp - yr;

        // quadratic in u = 1 - sin(theta)
        let a = dx * dx + dy * dy + self.zp * self.zp;
        let b = 2.0 * self.zp * (xr * dx + yr * dy - self.zp);
        let c = self.zp * self.zp * (xr * xr + yr * yr);
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return Err(beyond(self.code(), x, y));
        }
        let sq = disc.sqrt();

        let mut theta: Option<f64> = None;
        for u in [(-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a)] {
            let sin_t = 1.0 - u;
            if sin_t.abs() > 1.0 + EDGE_TOL {
                continue;
            }
            let candidate = aasin(sin_t.clamp(-1.0, 1.0))?;
            match theta {
                Some(t) if t >= candidate => {}
                _ => theta = Some(candidate),
            }
        }
        let theta = theta.ok_or_else(|| beyond(self.code(), x, y))?;

        let u = 1.0 - theta.sin();
        let phi = aatan2(
            xr * (self.zp - u) + self.xp * u,
            -(yr * (self.zp - u) + self.yp * u),
        );
        Ok((phi, theta))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        let (sin_t, cos_t) = theta.sin_cos();
        let denom = self.zp - 1.0 + sin_t;
        if denom <= EDGE_TOL {
            return Err(beyond(self.code(), phi, theta));
        }
        let x = R2D * (self.zp * cos_t * phi.sin() - self.xp * (1.0 - sin_t)) / denom;
        let y = -R2D * (self.zp * cos_t * phi.cos() + self.yp * (1.0 - sin_t)) / denom;
        Ok((x, y))
    }

    fn parameters(&self) -> &'static [ProjectionParameter] {
        &Self::PARAMETERS
    }
}

/// Gnomonic projection: the tangent plane through the native pole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tan;

impl Projection for Tan {
    fn code(&self) -> &'static str {
        "TAN"
    }

    fn name(&self) -> &'static str {
        "gnomonic"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        ZENITHAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (phi, r) = plane_to_polar(x, y);
        Ok((phi, aatan2(R2D, r)))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        let sin_t = theta.sin();
        if sin_t <= EDGE_TOL {
            // the lower hemisphere maps to infinity
            return Err(beyond(self.code(), phi, theta));
        }
        Ok(polar_to_plane(phi, R2D * theta.cos() / sin_t))
    }
}

/// Stereographic projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stg;

impl Projection for Stg {
    fn code(&self) -> &'static str {
        "STG"
    }

    fn name(&self) -> &'static str {
        "stereographic"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        ZENITHAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (phi, r) = plane_to_polar(x, y);
        Ok((phi, FRAC_PI_2 - 2.0 * (r / (2.0 * R2D)).atan()))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        let denom = 1.0 + theta.sin();
        if denom < EDGE_TOL {
            return Err(beyond(self.code(), phi, theta));
        }
        Ok(polar_to_plane(phi, 2.0 * R2D * theta.cos() / denom))
    }
}

/// Slant orthographic projection.
///
/// `xi = eta = 0` is the classical orthographic case with the unit disc
/// as its inverse domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sin {
    xi: f64,
    eta: f64,
}

impl Sin {
    const PARAMETERS: [ProjectionParameter; 2] = [
        ProjectionParameter {
            name: "xi",
            pv_key: "PV2_1",
            interval: None,
            default: 0.0,
        },
        ProjectionParameter {
            name: "eta",
            pv_key: "PV2_2",
            interval: None,
            default: 0.0,
        },
    ];

    /// Create a SIN projection with slant parameters `xi` and `eta`.
    pub fn new(xi: f64, eta: f64) -> Self {
        Sin { xi, eta }
    }

    fn is_orthographic(&self) -> bool {
        self.xi == 0.0 && self.eta == 0.0
    }
}

impl Projection for Sin {
    fn code(&self) -> &'static str {
        "SIN"
    }

    fn name(&self) -> &'static str {
        "slant orthographic"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        ZENITHAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let xr = x * D2R;
        let yr = y * D2R;

        if self.is_orthographic() {
            let r2 = xr * xr + yr * yr;
            if r2 > 1.0 + EDGE_TOL {
                return Err(beyond(self.code(), x, y));
            }
            let theta = aasin((1.0 - r2).max(0.0).sqrt())?;
            return Ok((aatan2(xr, -yr), theta));
        }

        // quadratic in u = 1 - sin(theta)
        let a = 1.0 + self.xi * self.xi + self.eta * self.eta;
        let b = -2.0 * (1.0 + xr * self.xi + yr * self.eta);
        let c = xr * xr + yr * yr;
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return Err(beyond(self.code(), x, y));
        }
        let sq = disc.sqrt();

        let mut theta: Option<f64> = None;
        for u in [(-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a)] {
            let sin_t = 1.0 - u;
            if sin_t.abs() > 1.0 + EDGE_TOL {
                continue;
            }
            let candidate = aasin(sin_t.clamp(-1.0, 1.0))?;
            match theta {
                Some(t) if t >= candidate => {}
                _ => theta = Some(candidate),
            }
        }
        let theta = theta.ok_or_else(|| beyond(self.code(), x, y))?;

        let u = 1.0 - theta.sin();
        Ok((aatan2(xr - self.xi * u, -(yr - self.eta * u)), theta))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        if theta < -EDGE_TOL {
            return Err(beyond(self.code(), phi, theta));
        }
        let (sin_t, cos_t) = theta.sin_cos();
        let u = 1.0 - sin_t;
        let x = R2D * (cos_t * phi.sin() + self.xi * u);
        let y = -R2D * (cos_t * phi.cos() - self.eta * u);
        Ok((x, y))
    }

    fn parameters(&self) -> &'static [ProjectionParameter] {
        &Self::PARAMETERS
    }
}

/// Zenithal equidistant projection: radius equal to the polar angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc;

impl Projection for Arc {
    fn code(&self) -> &'static str {
        "ARC"
    }

    fn name(&self) -> &'static str {
        "zenithal equidistant"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        ZENITHAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (phi, r) = plane_to_polar(x, y);
        if r > 180.0 + EDGE_TOL {
            return Err(beyond(self.code(), x, y));
        }
        Ok((phi, (90.0 - r).to_radians()))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        Ok(polar_to_plane(phi, 90.0 - theta.to_degrees()))
    }
}

/// Zenithal equal-area projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zea;

impl Projection for Zea {
    fn code(&self) -> &'static str {
        "ZEA"
    }

    fn name(&self) -> &'static str {
        "zenithal equal-area"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        ZENITHAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (phi, r) = plane_to_polar(x, y);
        let s = r * D2R / 2.0;
        if s > 1.0 + EDGE_TOL {
            return Err(beyond(self.code(), x, y));
        }
        Ok((phi, FRAC_PI_2 - 2.0 * aasin(s.min(1.0))?))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        let r = 2.0 * R2D * ((FRAC_PI_2 - theta) / 2.0).sin();
        Ok(polar_to_plane(phi, r))
    }
}

/// Zenithal polynomial projection.
///
/// The radius is a polynomial in the polar angle; the inverse solves the
/// polynomial by bisection over the monotonic stretch ending at its first
/// maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct Zpn {
    coeffs: Vec<f64>,
    gamma_max: f64,
    r_max: f64,
}

impl Zpn {
    const PARAMETERS: [ProjectionParameter; 1] = [ProjectionParameter {
        name: "coefficients",
        pv_key: "PV2_0..PV2_N",
        interval: None,
        default: 0.0,
    }];

    /// Create a ZPN projection from the `PV2_k` polynomial coefficients.
    pub fn new(coeffs: Vec<f64>) -> Result<Self> {
        if coeffs.iter().all(|&c| c == 0.0) {
            return Err(bad_param("ZPN", "all polynomial coefficients are zero"));
        }

        // the usable radial range ends at the first maximum of the
        // polynomial over the polar angle
        let dpoly = |g: f64| {
            coeffs
                .iter()
                .enumerate()
                .skip(1)
                .rev()
                .fold(0.0, |acc, (k, &c)| acc * g + k as f64 * c)
        };

        const STEPS: usize = 1800;
        let mut gamma_max = PI;
        let mut prev = 0.0;
        for i in 1..=STEPS {
            let g = PI * i as f64 / STEPS as f64;
            if dpoly(g) < 0.0 {
                gamma_max = if dpoly(prev) > 0.0 {
                    bisection(&dpoly, prev, g, MAX_ITER)?
                } else {
                    prev
                };
                break;
            }
            prev = g;
        }
        if gamma_max < EDGE_TOL {
            return Err(bad_param("ZPN", "polynomial does not increase away from the pole"));
        }

        let r_max = poly_eval(&coeffs, gamma_max);
        Ok(Zpn {
            coeffs,
            gamma_max,
            r_max,
        })
    }
}

/// Evaluate a polynomial by Horner's scheme.
fn poly_eval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

impl Projection for Zpn {
    fn code(&self) -> &'static str {
        "ZPN"
    }

    fn name(&self) -> &'static str {
        "zenithal polynomial"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        ZENITHAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (phi, r) = plane_to_polar(x, y);
        let r_rad = r * D2R;
        let r_min = poly_eval(&self.coeffs, 0.0);
        if r_rad > self.r_max + EDGE_TOL || r_rad < r_min - EDGE_TOL {
            return Err(beyond(self.code(), x, y));
        }
        let target = r_rad.clamp(r_min, self.r_max);
        let gamma = bisection(
            |g| poly_eval(&self.coeffs, g) - target,
            0.0,
            self.gamma_max,
            MAX_ITER,
        )?;
        Ok((phi, FRAC_PI_2 - gamma))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        let gamma = FRAC_PI_2 - theta;
        if gamma > self.gamma_max + EDGE_TOL {
            return Err(beyond(self.code(), phi, theta));
        }
        let r = poly_eval(&self.coeffs, gamma.min(self.gamma_max)) * R2D;
        Ok(polar_to_plane(phi, r))
    }

    fn parameters(&self) -> &'static [ProjectionParameter] {
        &Self::PARAMETERS
    }
}

/// Airy projection, minimising distortion inside the radius `theta_b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Air {
    /// ln(cos xi_b) / tan^2(xi_b), the balance coefficient
    cb: f64,
}

impl Air {
    const PARAMETERS: [ProjectionParameter; 1] = [ProjectionParameter {
        name: "theta_b",
        pv_key: "PV2_1",
        interval: Some([-90.0, 90.0]),
        default: 90.0,
    }];

    /// Create an AIR projection.
    ///
    /// # Arguments
    /// * `theta_b` - Latitude of minimised distortion in degrees, in (-90, 90]
    pub fn new(theta_b: f64) -> Result<Self> {
        if theta_b <= -90.0 || theta_b > 90.0 {
            return Err(bad_param("AIR", format!("theta_b = {theta_b} not in (-90, 90]")));
        }
        let xi_b = (FRAC_PI_2 - theta_b.to_radians()) / 2.0;
        let cb = if xi_b.abs() < EDGE_TOL {
            -0.5
        } else {
            xi_b.cos().ln() / (xi_b.tan() * xi_b.tan())
        };
        Ok(Air { cb })
    }

    /// Radius in radians at a native latitude.
    fn radius(&self, theta: f64) -> f64 {
        let xi = (FRAC_PI_2 - theta) / 2.0;
        if xi.abs() < EDGE_TOL {
            return 0.0;
        }
        -2.0 * (xi.cos().ln() / xi.tan() + self.cb * xi.tan())
    }
}

impl Projection for Air {
    fn code(&self) -> &'static str {
        "AIR"
    }

    fn name(&self) -> &'static str {
        "Airy"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        ZENITHAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (phi, r) = plane_to_polar(x, y);
        let r_rad = r * D2R;
        // the radius grows monotonically towards the antipode
        let lo = -FRAC_PI_2 + 1e-9;
        if self.radius(lo) < r_rad {
            return Err(beyond(self.code(), x, y));
        }
        let theta = bisection(|t| self.radius(t) - r_rad, lo, FRAC_PI_2, MAX_ITER)?;
        Ok((phi, theta))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        if theta <= -FRAC_PI_2 + EDGE_TOL {
            return Err(beyond(self.code(), phi, theta));
        }
        Ok(polar_to_plane(phi, self.radius(theta) * R2D))
    }

    fn parameters(&self) -> &'static [ProjectionParameter] {
        &Self::PARAMETERS
    }
}

/// North-celestial-pole projection.
///
/// The historical AIPS projection; equivalent to SIN slanted by the
/// cotangent of the fiducial declination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ncp {
    sin: Sin,
}

impl Ncp {
    /// Create an NCP projection for a fiducial declination in degrees.
    pub fn new(delta0: f64) -> Result<Self> {
        let tan_d = delta0.to_radians().tan();
        if tan_d.abs() < EDGE_TOL {
            return Err(bad_param("NCP", "undefined for a fiducial point on the equator"));
        }
        Ok(Ncp {
            sin: Sin::new(0.0, 1.0 / tan_d),
        })
    }
}

impl Projection for Ncp {
    fn code(&self) -> &'static str {
        "NCP"
    }

    fn name(&self) -> &'static str {
        "north celestial pole"
    }

    fn native_fiducial(&self) -> (f64, f64) {
        ZENITHAL_FIDUCIAL
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        self.sin.project(x, y).map_err(|_| beyond(self.code(), x, y))
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        self.sin
            .project_inverse(phi, theta)
            .map_err(|_| beyond(self.code(), phi, theta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_pole_maps_to_origin() {
        for p in [
            &Tan as &dyn Projection,
            &Stg,
            &Arc,
            &Zea,
            &Sin::new(0.0, 0.0),
        ] {
            let (x, y) = p.project_inverse(0.3, FRAC_PI_2).unwrap();
            assert!(x.abs() < 1e-12 && y.abs() < 1e-12, "{}", p.code());
        }
    }

    #[test]
    fn test_tan_round_trips() {
        for (x, y) in [(0.0, 0.0), (10.0, -7.5), (-44.0, 30.0), (80.0, 80.0)] {
            assert_round_trip(&Tan, x, y);
        }
    }

    #[test]
    fn test_tan_rejects_lower_hemisphere() {
        assert!(Tan.project_inverse(0.0, -0.1).is_err());
    }

    #[test]
    fn test_stg_arc_zea_round_trips() {
        for (x, y) in [(0.0, 0.0), (30.0, 40.0), (-100.0, 5.0)] {
            assert_round_trip(&Stg, x, y);
            assert_round_trip(&Arc, x, y);
            assert_round_trip(&Zea, x, y);
        }
    }

    #[test]
    fn test_zea_domain_is_the_antipode_disc() {
        // 2 radians of plane radius reaches the antipode
        assert!(Zea.project(120.0, 0.0).is_err());
        assert!(Zea.project(114.0, 0.0).is_ok());
    }

    #[test]
    fn test_arc_domain_edge() {
        // 180 deg from the pole is the antipode, anything further fails
        assert!(Arc.project(181.0, 0.0).is_err());
        assert!(Arc.project(179.9, 0.0).is_ok());
    }

    #[test]
    fn test_sin_unit_disc() {
        let p = Sin::new(0.0, 0.0);
        assert!(p.project(R2D, 0.1).is_err());
        assert!(p.project(40.0, 30.0).is_ok());
        assert_round_trip(&p, 40.0, 30.0);
    }

    #[test]
    fn test_sin_slant_round_trips() {
        let p = Sin::new(0.05, -0.08);
        for (x, y) in [(0.0, 0.0), (20.0, 10.0), (-30.0, 25.0)] {
            assert_round_trip(&p, x, y);
        }
    }

    #[test]
    fn test_azp_round_trips() {
        let p = Azp::new(2.0, 30.0).unwrap();
        for (x, y) in [(0.0, 0.0), (15.0, -20.0), (-35.0, 25.0)] {
            assert_round_trip(&p, x, y);
        }
    }

    #[test]
    fn test_azp_rejects_far_sheet() {
        let p = Azp::new(2.0, 0.0).unwrap();
        // sin(theta) < -1/mu is behind the tangent circle
        assert!(p.project_inverse(0.0, -FRAC_PI_2 + 0.2).is_err());
    }

    #[test]
    fn test_azp_bad_parameters() {
        assert!(Azp::new(-1.0, 0.0).is_err());
        assert!(Azp::new(2.0, 90.0).is_err());
    }

    #[test]
    fn test_szp_round_trips() {
        let p = Szp::new(2.0, 30.0, 60.0).unwrap();
        for (x, y) in [(0.0, 0.0), (12.0, 18.0), (-25.0, -8.0)] {
            assert_round_trip(&p, x, y);
        }
    }

    #[test]
    fn test_szp_reduces_to_azp() {
        let szp = Szp::new(1.5, 0.0, 90.0).unwrap();
        let azp = Azp::new(1.5, 0.0).unwrap();
        let (x1, y1) = szp.project_inverse(0.7, 1.0).unwrap();
        let (x2, y2) = azp.project_inverse(0.7, 1.0).unwrap();
        assert!((x1 - x2).abs() < 1e-10);
        assert!((y1 - y2).abs() < 1e-10);
    }

    #[test]
    fn test_zpn_round_trips() {
        // the coefficient run of the canonical ZPN test image
        let coeffs = vec![0.050, 0.975, -0.807, 0.337, -0.065, 0.010, 0.003, -0.001];
        let p = Zpn::new(coeffs).unwrap();
        for (x, y) in [(5.0, 0.0), (20.0, 15.0), (-40.0, 33.0)] {
            assert_round_trip(&p, x, y);
        }
    }

    #[test]
    fn test_zpn_rejects_all_zero() {
        assert!(Zpn::new(vec![0.0, 0.0]).is_err());
    }

    #[test]
    fn test_air_round_trips() {
        let p = Air::new(45.0).unwrap();
        for (x, y) in [(0.0, 0.0), (25.0, -10.0), (-60.0, 45.0)] {
            assert_round_trip(&p, x, y);
        }
        assert!(Air::new(-90.0).is_err());
    }

    #[test]
    fn test_ncp_matches_slant_sin() {
        let ncp = Ncp::new(-66.0).unwrap();
        let slant = Sin::new(0.0, 1.0 / (-66.0_f64).to_radians().tan());
        let (x1, y1) = ncp.project_inverse(0.4, 1.2).unwrap();
        let (x2, y2) = slant.project_inverse(0.4, 1.2).unwrap();
        assert_eq!((x1, y1), (x2, y2));
        assert!(Ncp::new(0.0).is_err());
    }
}
