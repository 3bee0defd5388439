//! Rotation between the native sphere of a projection and the celestial
//! sphere.
//!
//! A projection lives on its native sphere; anchoring it to the sky means
//! rotating that sphere so the native pole lands on the celestial pole
//! position implied by the fiducial point and the LONPOLE/LATPOLE keywords.
//! The celestial pole (alphap, deltap) is derived here once, at build time.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::{Result, WcsError};
use crate::math::{aacos, aatan2, phi_range};

/// Positions agreeing to within this are treated as coincident
const POLE_TOL: f64 = 1e-12;

/// The fiducial-point rotation, fully derived and immutable.
///
/// Built once by the WCS driver from the header values; both transform
/// directions are then pure functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalRotation {
    alpha0: f64,
    delta0: f64,
    phi0: f64,
    theta0: f64,
    phip: f64,
    thetap: f64,
    alphap: f64,
    deltap: f64,
}

impl SphericalRotation {
    /// Derive the rotation for a fiducial point and native-pole hints.
    ///
    /// # Arguments
    /// * `alpha0`, `delta0` - Celestial fiducial point, radians
    /// * `phi0`, `theta0` - Native coordinates of the fiducial point, radians
    /// * `lonpole` - Native longitude of the celestial pole (LONPOLE),
    ///   radians; defaults to 0 if `delta0 >= theta0`, else pi
    /// * `latpole` - Native latitude hint selecting between the two
    ///   admissible celestial poles (LATPOLE), radians; defaults to +pi/2
    pub fn new(
        alpha0: f64,
        delta0: f64,
        phi0: f64,
        theta0: f64,
        lonpole: Option<f64>,
        latpole: Option<f64>,
    ) -> Result<Self> {
        let phip = lonpole.unwrap_or(if delta0 >= theta0 { 0.0 } else { PI });
        let thetap = latpole.unwrap_or(FRAC_PI_2);

        let (alphap, deltap) = celestial_pole(alpha0, delta0, phi0, theta0, phip, thetap)?;
        Ok(SphericalRotation {
            alpha0,
            delta0,
            phi0,
            theta0,
            phip,
            thetap,
            alphap,
            deltap,
        })
    }

    /// Native longitude of the celestial pole, radians.
    pub fn phip(&self) -> f64 {
        self.phip
    }

    /// Celestial position of the native pole (alphap, deltap), radians.
    pub fn celestial_pole(&self) -> (f64, f64) {
        (self.alphap, self.deltap)
    }

    /// Celestial fiducial point (alpha0, delta0), radians.
    pub fn fiducial(&self) -> (f64, f64) {
        (self.alpha0, self.delta0)
    }

    /// Native fiducial point (phi0, theta0), radians.
    pub fn native_fiducial(&self) -> (f64, f64) {
        (self.phi0, self.theta0)
    }

    /// Rotate native-sphere coordinates onto the celestial sphere.
    ///
    /// # Arguments
    /// * `phi`, `theta` - Native longitude/latitude, radians
    ///
    /// # Returns
    /// `(alpha, delta)` in radians, alpha normalised to [0, 2*pi).
    pub fn native_to_celestial(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        let (alpha, delta) = if (self.deltap - FRAC_PI_2).abs() < POLE_TOL {
            (self.alphap + phi - self.phip - PI, theta)
        } else if (self.deltap + FRAC_PI_2).abs() < POLE_TOL {
            (self.alphap - phi + self.phip, -theta)
        } else {
            let dphi = phi - self.phip;
            let (sin_t, cos_t) = theta.sin_cos();
            let (sin_dp, cos_dp) = self.deltap.sin_cos();
            // latitude from the full component triple; atan2 keeps its
            // precision at the pole where asin would not
            let x = sin_t * cos_dp - cos_t * sin_dp * dphi.cos();
            let y = -cos_t * dphi.sin();
            let z = sin_t * sin_dp + cos_t * cos_dp * dphi.cos();
            let delta = aatan2(z, x.hypot(y));
            let alpha = self.alphap + aatan2(y, x);
            (alpha, delta)
        };
        Ok((normalize_2pi(alpha), delta))
    }

    /// Rotate celestial coordinates back onto the native sphere.
    ///
    /// # Arguments
    /// * `alpha`, `delta` - Celestial longitude/latitude, radians
    ///
    /// # Returns
    /// `(phi, theta)` in radians, phi normalised to (-pi, pi].
    pub fn celestial_to_native(&self, alpha: f64, delta: f64) -> Result<(f64, f64)> {
        let (phi, theta) = if (self.deltap - FRAC_PI_2).abs() < POLE_TOL {
            (alpha - self.alphap + self.phip + PI, delta)
        } else if (self.deltap + FRAC_PI_2).abs() < POLE_TOL {
            (self.alphap - alpha + self.phip, -delta)
        } else {
            let dalpha = alpha - self.alphap;
            let (sin_d, cos_d) = delta.sin_cos();
            let (sin_dp, cos_dp) = self.deltap.sin_cos();
            let x = sin_d * cos_dp - cos_d * sin_dp * dalpha.cos();
            let y = -cos_d * dalpha.sin();
            let z = sin_d * sin_dp + cos_d * cos_dp * dalpha.cos();
            let theta = aatan2(z, x.hypot(y));
            let phi = self.phip + aatan2(y, x);
            (phi, theta)
        };
        Ok((phi_range(phi), theta))
    }
}

/// Celestial position of the native pole.
///
/// Two-valued in general; the root in [-pi/2, pi/2] closest to the LATPOLE
/// hint wins. With no valid root the header is inconsistent.
fn celestial_pole(
    alpha0: f64,
    delta0: f64,
    phi0: f64,
    theta0: f64,
    phip: f64,
    thetap: f64,
) -> Result<(f64, f64)> {
    // fiducial at the native pole: the poles coincide
    if phi0.abs() < POLE_TOL && (theta0 - FRAC_PI_2).abs() < POLE_TOL {
        return Ok((alpha0, delta0));
    }

    let dphi = phip - phi0;
    let (sin_t0, cos_t0) = theta0.sin_cos();
    let (sin_d0, cos_d0) = delta0.sin_cos();

    let deltap = if theta0.abs() < POLE_TOL
        && delta0.abs() < POLE_TOL
        && (dphi.abs() - FRAC_PI_2).abs() < POLE_TOL
    {
        // degenerate geometry: LATPOLE alone decides
        thetap
    } else {
        let base = aatan2(sin_t0, cos_t0 * dphi.cos());
        let sq = 1.0 - cos_t0 * cos_t0 * dphi.sin() * dphi.sin();
        let no_solution = || WcsError::InvalidHeader {
            reason: "no valid solution for the native latitude of the celestial pole".to_string(),
        };
        if sq <= 0.0 {
            return Err(no_solution());
        }
        let offset = aacos(sin_d0 / sq.sqrt()).map_err(|_| no_solution())?;

        let mut best: Option<f64> = None;
        for candidate in [phi_range(base + offset), phi_range(base - offset)] {
            if candidate.abs() > FRAC_PI_2 + POLE_TOL {
                continue;
            }
            let candidate = candidate.clamp(-FRAC_PI_2, FRAC_PI_2);
            match best {
                Some(b) if (b - thetap).abs() <= (candidate - thetap).abs() => {}
                _ => best = Some(candidate),
            }
        }
        best.ok_or_else(no_solution)?
    };

    let alphap = if (deltap - FRAC_PI_2).abs() < POLE_TOL {
        alpha0 + phip - phi0 - PI
    } else if (deltap + FRAC_PI_2).abs() < POLE_TOL {
        alpha0 - phip + phi0
    } else if cos_d0.abs() < POLE_TOL {
        // fiducial at a celestial pole leaves alphap free; pin it
        alpha0
    } else {
        let (sin_dp, cos_dp) = deltap.sin_cos();
        alpha0
            - aatan2(
                dphi.sin() * cos_t0 / cos_d0,
                (sin_t0 - sin_dp * sin_d0) / (cos_dp * cos_d0),
            )
    };

    Ok((alphap, deltap))
}

/// Wrap an angle onto [0, 2*pi).
fn normalize_2pi(mut a: f64) -> f64 {
    a %= 2.0 * PI;
    if a < 0.0 {
        a += 2.0 * PI;
    }
    if a >= 2.0 * PI {
        a -= 2.0 * PI;
    }
    a
}
