//! # wcs-math
//!
//! `wcs-math` is a self-contained implementation of the FITS World
//! Coordinate System for celestial images: the bidirectional mapping
//! between detector pixels and positions on the sky, for the full family
//! of spherical projections, together with conversions between the
//! classical celestial reference frames.
//!
//! It includes:
//! - The pixel <-> sky pipeline driven by standard WCS header keywords
//! - 24 spherical projections (zenithal, cylindrical, conic, polyconic
//!   and pseudo-cylindrical), each with its exact inverse
//! - Frame conversions between ICRS, FK5, FK4 (with E-terms), galactic,
//!   super-galactic and ecliptic coordinates, with Newcomb and IAU 1976
//!   precession
//! - Epoch parsing and Julian Date handling for the header time keywords
//!
//! FITS I/O stays outside: headers reach the library through the
//! [`header::HeaderView`] trait, so any FITS reader (or a plain map) can
//! drive it.
//!
//! ## Quick Example: pixel to sky and back
//!
//! ```
//! use wcs_math::header::KeywordMap;
//! use wcs_math::Wcs;
//!
//! let mut h = KeywordMap::new();
//! h.insert("CTYPE1", "RA---ARC");
//! h.insert("CTYPE2", "DEC--ARC");
//! h.insert("CRVAL1", 286.0);
//! h.insert("CRVAL2", -66.0);
//! h.insert("CRPIX1", 96.5);
//! h.insert("CRPIX2", 96.5);
//! h.insert("CDELT1", -0.066667);
//! h.insert("CDELT2", 0.066667);
//! h.insert("NAXIS1", 192_i64);
//! h.insert("NAXIS2", 192_i64);
//!
//! let wcs = Wcs::new(&h).unwrap();
//! let (lon, lat) = wcs.pix_to_world(1.0, 1.0).unwrap();
//! let (x, y) = wcs.world_to_pix(lon, lat).unwrap();
//! assert!((x - 1.0).abs() < 1e-10);
//! assert!((y - 1.0).abs() < 1e-10);
//! ```
//!
//! You can verify the numbers against Astropy:
//!
//! ```python
//! from astropy.wcs import WCS
//! w = WCS({'CTYPE1': 'RA---ARC', 'CTYPE2': 'DEC--ARC',
//!          'CRVAL1': 286.0, 'CRVAL2': -66.0,
//!          'CRPIX1': 96.5, 'CRPIX2': 96.5,
//!          'CDELT1': -0.066667, 'CDELT2': 0.066667})
//! print(w.wcs_pix2world([[1.0, 1.0]], 1))
//! ```

pub mod error;
pub mod frames;
pub mod header;
pub mod math;
pub mod projection;
pub mod skypos;
pub mod time;
pub mod wcs;

pub use error::{Result, WcsError};
pub use frames::{Equinox, Frame};
pub use projection::{Projection, ProjectionKind, SkyProjection, SphericalRotation};
pub use skypos::SkyPosition;
pub use time::Epoch;
pub use wcs::Wcs;

#[cfg(test)]
pub mod tests;
