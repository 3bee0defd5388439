//! Spherical projections and their composition with the sky rotation.
//!
//! Each projection maps between points (x, y) on the projection plane, in
//! degrees, and points (phi, theta) on its native sphere, in radians:
//! [`Projection::project`] goes plane to sphere, [`Projection::project_inverse`]
//! sphere to plane. [`SkyProjection`] composes a projection with the
//! [`SphericalRotation`] that anchors the native sphere to the sky.
//!
//! Dispatch over the 24 concrete projections goes through the
//! [`ProjectionKind`] sum type, resolved once per batch rather than per
//! point.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::{Result, WcsError};
use crate::header::{keys, HeaderView};

mod conic;
mod cylindrical;
mod polyconic;
mod pseudocyl;
mod rotation;
mod zenithal;

pub use conic::{Cod, Coe, Coo, Cop};
pub use cylindrical::{Car, Cea, Cyp, Mer};
pub use polyconic::{Bon, Pco};
pub use pseudocyl::{Ait, Mol, Par, Sfl};
pub use rotation::SphericalRotation;
pub use zenithal::{Air, Arc, Azp, Ncp, Sin, Stg, Szp, Tan, Zea, Zpn};

/// Degrees per radian
pub(crate) const R2D: f64 = 180.0 / PI;
/// Radians per degree
pub(crate) const D2R: f64 = PI / 180.0;
/// Slack accepted at projection domain edges
pub(crate) const EDGE_TOL: f64 = 1e-10;

/// Metadata describing one tunable parameter of a projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParameter {
    /// Human-readable parameter name
    pub name: &'static str,
    /// Header card carrying the value
    pub pv_key: &'static str,
    /// Closed valid interval, if the parameter is constrained
    pub interval: Option<[f64; 2]>,
    /// Value assumed when the card is absent
    pub default: f64,
}

/// A map between the projection plane and the native sphere.
pub trait Projection {
    /// Three-letter projection code, e.g. `"TAN"`.
    fn code(&self) -> &'static str;

    /// Descriptive name, e.g. `"gnomonic"`.
    fn name(&self) -> &'static str;

    /// Native coordinates (phi0, theta0) of the fiducial point, radians.
    fn native_fiducial(&self) -> (f64, f64);

    /// Plane to native sphere.
    ///
    /// # Arguments
    /// * `x`, `y` - Projection-plane coordinates in degrees
    ///
    /// # Returns
    /// `(phi, theta)` native spherical coordinates in radians.
    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)>;

    /// Native sphere to plane.
    ///
    /// # Arguments
    /// * `phi`, `theta` - Native spherical coordinates in radians
    ///
    /// # Returns
    /// `(x, y)` projection-plane coordinates in degrees.
    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)>;

    /// Parameter metadata for this projection family member.
    fn parameters(&self) -> &'static [ProjectionParameter] {
        &[]
    }
}

/// Shorthand for the plane-side out-of-domain error.
pub(crate) fn beyond(code: &'static str, x: f64, y: f64) -> WcsError {
    WcsError::PixelBeyondProjection {
        projection: code,
        x,
        y,
    }
}

/// Shorthand for a construction-time parameter error.
pub(crate) fn bad_param(code: &'static str, reason: impl Into<String>) -> WcsError {
    WcsError::BadProjectionParameter {
        projection: code,
        reason: reason.into(),
    }
}

macro_rules! projection_kinds {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        /// Sum type over every supported projection.
        ///
        /// Matching once per batch keeps dynamic dispatch out of inner
        /// loops; the enum also implements [`Projection`] by delegation for
        /// callers that prefer the trait.
        #[derive(Debug, Clone, PartialEq)]
        pub enum ProjectionKind {
            $(
                #[doc = concat!("`", stringify!($variant), "` projection")]
                $variant($ty),
            )+
        }

        impl ProjectionKind {
            /// The wrapped projection as a trait object.
            pub fn as_projection(&self) -> &dyn Projection {
                match self {
                    $(ProjectionKind::$variant(p) => p,)+
                }
            }
        }

        $(
            impl From<$ty> for ProjectionKind {
                fn from(p: $ty) -> Self {
                    ProjectionKind::$variant(p)
                }
            }
        )+
    };
}

projection_kinds! {
    Azp(Azp), Szp(Szp), Tan(Tan), Stg(Stg), Sin(Sin), Arc(Arc), Zea(Zea),
    Zpn(Zpn), Air(Air), Ncp(Ncp),
    Car(Car), Cea(Cea), Cyp(Cyp), Mer(Mer),
    Ait(Ait), Mol(Mol), Par(Par), Sfl(Sfl),
    Cop(Cop), Coe(Coe), Cod(Cod), Coo(Coo),
    Bon(Bon), Pco(Pco),
}

impl Projection for ProjectionKind {
    fn code(&self) -> &'static str {
        self.as_projection().code()
    }

    fn name(&self) -> &'static str {
        self.as_projection().name()
    }

    fn native_fiducial(&self) -> (f64, f64) {
        self.as_projection().native_fiducial()
    }

    fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        self.as_projection().project(x, y)
    }

    fn project_inverse(&self, phi: f64, theta: f64) -> Result<(f64, f64)> {
        self.as_projection().project_inverse(phi, theta)
    }

    fn parameters(&self) -> &'static [ProjectionParameter] {
        self.as_projection().parameters()
    }
}

impl ProjectionKind {
    /// Build a projection from its CTYPE code and header parameters.
    ///
    /// PV2 cards are read with the documented per-family defaults; ZPN
    /// collects every `PV2_k` present. The conics and BON have no sensible
    /// default for PV2_1 and require it.
    ///
    /// # Arguments
    /// * `code` - Three-letter suffix of CTYPE1
    /// * `header` - Keyword source for the PV cards
    /// * `crval2` - Declination of the fiducial point in degrees (NCP
    ///   derives its slant from it)
    pub fn from_code(code: &str, header: &dyn HeaderView, crval2: f64) -> Result<Self> {
        let pv = |key: &str, default: f64| header.real(key).unwrap_or(default);
        let pv_required = |key: &str| {
            header.real(key).ok_or_else(|| WcsError::InvalidHeader {
                reason: format!("projection {code} requires {key}"),
            })
        };

        Ok(match code {
            "AZP" => Azp::new(pv(keys::PV2_1, 0.0), pv(keys::PV2_2, 0.0))?.into(),
            "SZP" => Szp::new(
                pv(keys::PV2_1, 0.0),
                pv(keys::PV2_2, 0.0),
                pv(keys::PV2_3, 90.0),
            )?
            .into(),
            "TAN" => Tan.into(),
            "STG" => Stg.into(),
            "SIN" => Sin::new(pv(keys::PV2_1, 0.0), pv(keys::PV2_2, 0.0)).into(),
            "ARC" => Arc.into(),
            "ZEA" => Zea.into(),
            "ZPN" => Zpn::new(collect_zpn_coefficients(header))?.into(),
            "AIR" => Air::new(pv(keys::PV2_1, 90.0))?.into(),
            "NCP" => Ncp::new(crval2)?.into(),
            "CAR" => Car.into(),
            "CEA" => Cea::new(pv(keys::PV2_1, 1.0))?.into(),
            "CYP" => Cyp::new(pv(keys::PV2_1, 1.0), pv(keys::PV2_2, 1.0))?.into(),
            "MER" => Mer.into(),
            "AIT" => Ait.into(),
            "MOL" => Mol.into(),
            "PAR" => Par.into(),
            "SFL" => Sfl.into(),
            "COP" => Cop::new(pv_required(keys::PV2_1)?, pv(keys::PV2_2, 0.0))?.into(),
            "COE" => Coe::new(pv_required(keys::PV2_1)?, pv(keys::PV2_2, 0.0))?.into(),
            "COD" => Cod::new(pv_required(keys::PV2_1)?, pv(keys::PV2_2, 0.0))?.into(),
            "COO" => Coo::new(pv_required(keys::PV2_1)?, pv(keys::PV2_2, 0.0))?.into(),
            "BON" => Bon::new(pv_required(keys::PV2_1)?)?.into(),
            "PCO" => Pco.into(),
            _ => {
                return Err(WcsError::InvalidHeader {
                    reason: format!("unknown projection code '{code}'"),
                })
            }
        })
    }
}

/// Gather the ZPN polynomial coefficients from every `PV2_k` card.
fn collect_zpn_coefficients(header: &dyn HeaderView) -> Vec<f64> {
    let mut coeffs: Vec<(usize, f64)> = header
        .keys()
        .iter()
        .filter_map(|key| {
            let k: usize = key.strip_prefix("PV2_")?.parse().ok()?;
            Some((k, header.real(key)?))
        })
        .collect();
    coeffs.sort_unstable_by_key(|&(k, _)| k);

    let order = coeffs.last().map_or(0, |&(k, _)| k);
    let mut out = vec![0.0; order + 1];
    for (k, v) in coeffs {
        out[k] = v;
    }
    out
}

/// A projection anchored to the sky.
///
/// Owns the [`ProjectionKind`] and the [`SphericalRotation`] derived from
/// the fiducial point; immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyProjection {
    kind: ProjectionKind,
    rotation: SphericalRotation,
}

impl SkyProjection {
    /// Anchor a projection at a fiducial point with default pole hints.
    ///
    /// # Arguments
    /// * `crval1`, `crval2` - Fiducial sky position in degrees
    pub fn new(kind: ProjectionKind, crval1: f64, crval2: f64) -> Result<Self> {
        Self::with_poles(kind, crval1, crval2, None, None, None, None)
    }

    /// Anchor a projection with explicit native-fiducial and pole overrides.
    ///
    /// # Arguments
    /// * `crval1`, `crval2` - Fiducial sky position in degrees
    /// * `phi0`, `theta0` - PV1_1/PV1_2 native fiducial overrides, degrees
    /// * `lonpole`, `latpole` - LONPOLE/LATPOLE, degrees
    pub fn with_poles(
        kind: ProjectionKind,
        crval1: f64,
        crval2: f64,
        phi0: Option<f64>,
        theta0: Option<f64>,
        lonpole: Option<f64>,
        latpole: Option<f64>,
    ) -> Result<Self> {
        let (native_phi0, native_theta0) = kind.native_fiducial();
        let rotation = SphericalRotation::new(
            crval1.to_radians(),
            crval2.to_radians(),
            phi0.map_or(native_phi0, f64::to_radians),
            theta0.map_or(native_theta0, f64::to_radians),
            lonpole.map(f64::to_radians),
            latpole.map(f64::to_radians),
        )?;
        Ok(SkyProjection { kind, rotation })
    }

    /// The wrapped projection.
    pub fn kind(&self) -> &ProjectionKind {
        &self.kind
    }

    /// The derived fiducial rotation.
    pub fn rotation(&self) -> &SphericalRotation {
        &self.rotation
    }

    /// Projection plane to world coordinates.
    ///
    /// # Arguments
    /// * `x`, `y` - Plane coordinates in degrees
    ///
    /// # Returns
    /// `(lon, lat)` in degrees, longitude in [0, 360).
    pub fn projection_plane_to_wcs(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (phi, theta) = self.kind.project(x, y)?;
        let (alpha, delta) = self.rotation.native_to_celestial(phi, theta)?;
        Ok((
            crate::math::normalize_longitude(alpha.to_degrees()),
            delta.to_degrees().clamp(-90.0, 90.0),
        ))
    }

    /// World coordinates to the projection plane.
    ///
    /// # Arguments
    /// * `lon`, `lat` - World position in degrees
    ///
    /// # Returns
    /// `(x, y)` plane coordinates in degrees.
    pub fn wcs_to_projection_plane(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        let (phi, theta) = self
            .rotation
            .celestial_to_native(lon.to_radians(), lat.to_radians())?;
        self.kind.project_inverse(phi, theta)
    }

    /// Is this sky point representable in the projection domain?
    ///
    /// # Arguments
    /// * `lon`, `lat` - World position in radians
    pub fn inside(&self, lon: f64, lat: f64) -> bool {
        self.wcs_to_projection_plane(lon.to_degrees(), lat.to_degrees())
            .is_ok()
    }
}

/// Default native fiducial for the zenithal family.
pub(crate) const ZENITHAL_FIDUCIAL: (f64, f64) = (0.0, FRAC_PI_2);

/// Default native fiducial for cylindrical and pseudo-cylindrical members.
pub(crate) const EQUATORIAL_FIDUCIAL: (f64, f64) = (0.0, 0.0);
