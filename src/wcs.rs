//! The WCS driver: header keywords in, pixel/sky transforms out.
//!
//! [`Wcs::new`] digests a header once into an immutable pipeline
//! `pixel -> plane offset -> CD -> projection -> sphere rotation -> frame`;
//! both transform directions are then cheap pure functions, safe to share
//! across threads.

use log::warn;

use crate::error::{validate_latitude, validate_longitude, Result, WcsError};
use crate::frames::{Equinox, Frame};
use crate::header::{keys, HeaderView};
use crate::projection::{ProjectionKind, SkyProjection};
use crate::skypos::SkyPosition;
use crate::time::{iso_to_julian_date, jd_to_besselian_epoch, Epoch};

/// Which family of sky axes CTYPE names.
#[derive(Debug, Clone, Copy, PartialEq)]
enum AxisKind {
    Equatorial,
    Galactic,
    Ecliptic,
    SuperGalactic,
}

/// A fully-initialised world coordinate system.
///
/// # Example
/// ```
/// use wcs_math::header::KeywordMap;
/// use wcs_math::Wcs;
///
/// let mut h = KeywordMap::new();
/// h.insert("CTYPE1", "RA---TAN");
/// h.insert("CTYPE2", "DEC--TAN");
/// h.insert("CRVAL1", 286.0);
/// h.insert("CRVAL2", -66.0);
/// h.insert("CRPIX1", 96.5);
/// h.insert("CRPIX2", 96.5);
/// h.insert("CDELT1", -0.003);
/// h.insert("CDELT2", 0.003);
///
/// let wcs = Wcs::new(&h).unwrap();
/// let (lon, lat) = wcs.pix_to_world(96.5, 96.5).unwrap();
/// assert!((lon - 286.0).abs() < 1e-12);
/// assert!((lat + 66.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Wcs {
    axes: Option<(f64, f64)>,
    crpix1: f64,
    crpix2: f64,
    cd: [[f64; 2]; 2],
    cd_inv: [[f64; 2]; 2],
    projection: SkyProjection,
    frame: Frame,
}

impl Wcs {
    /// Build a WCS from header keywords.
    ///
    /// Reads CTYPE/CRVAL/CRPIX, the linear transformation (CD, or
    /// PC + CDELT, or CDELT + CROTA2), the projection's PV cards, the
    /// LONPOLE/LATPOLE pole hints and the frame keywords, failing with
    /// [`WcsError::InvalidHeader`] on anything structurally unusable.
    pub fn new(header: &dyn HeaderView) -> Result<Self> {
        let ctype1 = required_text(header, keys::CTYPE1)?;
        let ctype2 = required_text(header, keys::CTYPE2)?;
        let (prefix, code) = split_ctype(&ctype1)?;
        let (_, code2) = split_ctype(&ctype2)?;
        if code != code2 {
            return Err(WcsError::InvalidHeader {
                reason: format!("CTYPE projection codes disagree: '{code}' vs '{code2}'"),
            });
        }
        let axis = axis_kind(prefix)?;

        let frame = select_frame(header, axis)?;

        let crval1 = required_real(header, keys::CRVAL1)? * cunit_scale(header, keys::CUNIT1)?;
        let crval2 = required_real(header, keys::CRVAL2)? * cunit_scale(header, keys::CUNIT2)?;
        let crpix1 = required_real(header, keys::CRPIX1)?;
        let crpix2 = required_real(header, keys::CRPIX2)?;

        let cd = linear_transform(header)?;
        let cd_inv = crate::math::inverse_2x2(cd).map_err(|_| WcsError::InvalidHeader {
            reason: "singular CD matrix".to_string(),
        })?;

        let kind = ProjectionKind::from_code(code, header, crval2)?;
        let projection = SkyProjection::with_poles(
            kind,
            crval1,
            crval2,
            header.real(keys::PV1_1),
            header.real(keys::PV1_2),
            header.real(keys::LONPOLE).or_else(|| header.real(keys::PV1_3)),
            header.real(keys::LATPOLE).or_else(|| header.real(keys::PV1_4)),
        )?;

        let axes = match (header.real(keys::NAXIS1), header.real(keys::NAXIS2)) {
            (Some(n1), Some(n2)) => Some((n1, n2)),
            _ => None,
        };

        Ok(Wcs {
            axes,
            crpix1,
            crpix2,
            cd,
            cd_inv,
            projection,
            frame,
        })
    }

    /// The frame the header's world coordinates are expressed in.
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// The anchored projection behind this WCS.
    pub fn projection(&self) -> &SkyProjection {
        &self.projection
    }

    /// Pixel to world coordinates.
    ///
    /// # Arguments
    /// * `x`, `y` - Pixel position (FITS convention: the centre of the
    ///   first pixel is (1, 1))
    ///
    /// # Returns
    /// `(lon, lat)` in degrees in the header frame, longitude in [0, 360).
    pub fn pix_to_world(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let dx = x - self.crpix1;
        let dy = y - self.crpix2;
        let px = self.cd[0][0] * dx + self.cd[0][1] * dy;
        let py = self.cd[1][0] * dx + self.cd[1][1] * dy;
        self.projection.projection_plane_to_wcs(px, py)
    }

    /// World to pixel coordinates.
    ///
    /// # Arguments
    /// * `lon` - Longitude in degrees, in [0, 360]
    /// * `lat` - Latitude in degrees, in [-90, 90]
    pub fn world_to_pix(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        validate_longitude(lon)?;
        validate_latitude(lat)?;
        let (px, py) = self.projection.wcs_to_projection_plane(lon, lat)?;
        let x = self.cd_inv[0][0] * px + self.cd_inv[0][1] * py + self.crpix1;
        let y = self.cd_inv[1][0] * px + self.cd_inv[1][1] * py + self.crpix2;
        Ok((x, y))
    }

    /// Pixel to world over an interleaved `[x0, y0, x1, y1, ...]` slice.
    ///
    /// Fails fast: the first pixel outside the projection aborts the batch.
    pub fn pix_to_world_slice(&self, pixels: &[f64]) -> Result<Vec<f64>> {
        if pixels.len() % 2 != 0 {
            return Err(WcsError::UnpairedCoordinates { len: pixels.len() });
        }
        let mut out = Vec::with_capacity(pixels.len());
        for pair in pixels.chunks_exact(2) {
            let (lon, lat) = self.pix_to_world(pair[0], pair[1])?;
            out.push(lon);
            out.push(lat);
        }
        Ok(out)
    }

    /// World to pixel over an interleaved `[lon0, lat0, lon1, lat1, ...]`
    /// slice; fail-fast like [`Wcs::pix_to_world_slice`].
    pub fn world_to_pix_slice(&self, world: &[f64]) -> Result<Vec<f64>> {
        if world.len() % 2 != 0 {
            return Err(WcsError::UnpairedCoordinates { len: world.len() });
        }
        let mut out = Vec::with_capacity(world.len());
        for pair in world.chunks_exact(2) {
            let (x, y) = self.world_to_pix(pair[0], pair[1])?;
            out.push(x);
            out.push(y);
        }
        Ok(out)
    }

    /// World coordinates of the image centre, (NAXIS1/2, NAXIS2/2).
    pub fn center(&self) -> Result<(f64, f64)> {
        let (n1, n2) = self.image_size()?;
        self.pix_to_world(0.5 * n1, 0.5 * n2)
    }

    /// World coordinates of the four image corners, counter-clockwise from
    /// pixel (1, 1).
    pub fn field_of_view(&self) -> Result<[(f64, f64); 4]> {
        let (n1, n2) = self.image_size()?;
        Ok([
            self.pix_to_world(1.0, 1.0)?,
            self.pix_to_world(n1, 1.0)?,
            self.pix_to_world(n1, n2)?,
            self.pix_to_world(1.0, n2)?,
        ])
    }

    /// Pixel to a frame-tagged [`SkyPosition`].
    pub fn sky_position(&self, x: f64, y: f64) -> Result<SkyPosition> {
        let (lon, lat) = self.pix_to_world(x, y)?;
        SkyPosition::new(lon, lat, self.frame)
    }

    /// Is this sky point inside the projection's domain?
    ///
    /// # Arguments
    /// * `lon`, `lat` - World position in radians
    pub fn inside(&self, lon: f64, lat: f64) -> bool {
        self.projection.inside(lon, lat)
    }

    fn image_size(&self) -> Result<(f64, f64)> {
        self.axes.ok_or_else(|| WcsError::InvalidHeader {
            reason: "NAXIS1/NAXIS2 missing".to_string(),
        })
    }
}

fn required_text(header: &dyn HeaderView, key: &str) -> Result<String> {
    header.text(key).ok_or_else(|| WcsError::InvalidHeader {
        reason: format!("required keyword {key} missing"),
    })
}

fn required_real(header: &dyn HeaderView, key: &str) -> Result<f64> {
    header.real(key).ok_or_else(|| WcsError::InvalidHeader {
        reason: format!("required keyword {key} missing"),
    })
}

/// Split a CTYPE value into its axis prefix and projection code.
fn split_ctype(ctype: &str) -> Result<(&str, &str)> {
    let ctype = ctype.trim();
    let prefix = ctype.split('-').next().unwrap_or("");
    let code = ctype.rsplit('-').next().unwrap_or("");
    if prefix.is_empty() || code.is_empty() || prefix == code {
        return Err(WcsError::InvalidHeader {
            reason: format!("malformed CTYPE '{ctype}'"),
        });
    }
    Ok((prefix, code))
}

/// Map a CTYPE axis prefix onto its coordinate-system family.
fn axis_kind(prefix: &str) -> Result<AxisKind> {
    Ok(match prefix {
        "RA" | "DEC" => AxisKind::Equatorial,
        "GLON" | "GLAT" => AxisKind::Galactic,
        "ELON" | "ELAT" => AxisKind::Ecliptic,
        "SLON" | "SLAT" => AxisKind::SuperGalactic,
        _ => {
            return Err(WcsError::InvalidHeader {
                reason: format!("unknown coordinate system prefix '{prefix}'"),
            })
        }
    })
}

/// Choose the reference frame from RADESYS, EQUINOX and the axis prefix.
fn select_frame(header: &dyn HeaderView, kind: AxisKind) -> Result<Frame> {
    let equinox = header.real(keys::EQUINOX);

    match kind {
        AxisKind::Galactic => return Ok(Frame::Galactic),
        AxisKind::SuperGalactic => return Ok(Frame::SuperGalactic),
        AxisKind::Ecliptic => {
            let equinox = match equinox {
                Some(e) if e < 1984.0 => Equinox::Besselian(e),
                Some(e) => Equinox::Julian(e),
                None => Equinox::Julian(2000.0),
            };
            return Ok(Frame::Ecliptic { equinox });
        }
        AxisKind::Equatorial => {}
    }

    let epoch_obs = observation_epoch(header)?;
    let frame = match header.text(keys::RADESYS).as_deref().map(str::trim) {
        Some("ICRS") => Frame::Icrs,
        Some("FK5") => Frame::Fk5 {
            equinox: equinox.unwrap_or(2000.0),
        },
        Some("FK4") => Frame::Fk4 {
            equinox: equinox.unwrap_or(1950.0),
            epoch_obs,
        },
        Some("FK4-NO-E") => Frame::Fk4NoEterms {
            equinox: equinox.unwrap_or(1950.0),
            epoch_obs,
        },
        Some(other) => {
            return Err(WcsError::InvalidHeader {
                reason: format!("unknown RADESYS '{other}'"),
            })
        }
        None => match equinox {
            Some(e) if e < 1984.0 => Frame::Fk4 {
                equinox: e,
                epoch_obs,
            },
            Some(e) => Frame::Fk5 { equinox: e },
            None => Frame::Icrs,
        },
    };
    Ok(frame)
}

/// Besselian epoch of observation from MJD-OBS, falling back to DATE-OBS.
fn observation_epoch(header: &dyn HeaderView) -> Result<Option<f64>> {
    if let Some(mjd) = header.real(keys::MJD_OBS) {
        return Ok(Some(Epoch::from_mjd(mjd).besselian));
    }
    match header.text(keys::DATE_OBS) {
        Some(date) => Ok(Some(jd_to_besselian_epoch(iso_to_julian_date(
            date.trim(),
        )?))),
        None => Ok(None),
    }
}

/// Degrees per CUNIT unit for one of the CRVAL cards.
fn cunit_scale(header: &dyn HeaderView, key: &str) -> Result<f64> {
    let unit = match header.text(key) {
        Some(u) => u,
        None => {
            warn!("{key} missing; assuming degrees");
            return Ok(1.0);
        }
    };
    Ok(match unit.trim() {
        "" | "deg" => 1.0,
        "rad" => 180.0 / std::f64::consts::PI,
        "arcmin" => 1.0 / 60.0,
        "acmin" => {
            warn!("{key} uses legacy spelling 'acmin'; reading it as arcmin");
            1.0 / 60.0
        }
        "arcsec" => 1.0 / 3600.0,
        "mas" => 1.0 / 3.6e6,
        other => {
            return Err(WcsError::InvalidHeader {
                reason: format!("unknown {key} unit '{other}'"),
            })
        }
    })
}

/// Assemble the CD matrix from whichever linear keywords are present.
///
/// Preference order: CD cards, then PC + CDELT, then CDELT + CROTA2.
fn linear_transform(header: &dyn HeaderView) -> Result<[[f64; 2]; 2]> {
    let has_cd = [keys::CD1_1, keys::CD1_2, keys::CD2_1, keys::CD2_2]
        .iter()
        .any(|k| header.contains(k));
    if has_cd {
        let cd = |k| header.real(k).unwrap_or(0.0);
        return Ok([
            [cd(keys::CD1_1), cd(keys::CD1_2)],
            [cd(keys::CD2_1), cd(keys::CD2_2)],
        ]);
    }

    let cdelt1 = header.real(keys::CDELT1);
    let cdelt2 = header.real(keys::CDELT2);
    let has_pc = [keys::PC1_1, keys::PC1_2, keys::PC2_1, keys::PC2_2]
        .iter()
        .any(|k| header.contains(k));

    match (cdelt1, cdelt2) {
        (Some(d1), Some(d2)) if has_pc => {
            let pc = |k, diag: f64| header.real(k).unwrap_or(diag);
            Ok([
                [d1 * pc(keys::PC1_1, 1.0), d1 * pc(keys::PC1_2, 0.0)],
                [d2 * pc(keys::PC2_1, 0.0), d2 * pc(keys::PC2_2, 1.0)],
            ])
        }
        (Some(d1), Some(d2)) => {
            let (sin_rho, cos_rho) = header
                .real(keys::CROTA2)
                .unwrap_or(0.0)
                .to_radians()
                .sin_cos();
            Ok([
                [d1 * cos_rho, d2.abs() * d1.signum() * sin_rho],
                [-d1.abs() * d2.signum() * sin_rho, d2 * cos_rho],
            ])
        }
        _ => Err(WcsError::InvalidHeader {
            reason: "no CD, PC + CDELT, or CDELT linear transformation found".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::KeywordMap;

    fn tan_header() -> KeywordMap {
        let mut h = KeywordMap::new();
        h.insert("CTYPE1", "RA---TAN");
        h.insert("CTYPE2", "DEC--TAN");
        h.insert("CRVAL1", 286.0);
        h.insert("CRVAL2", -66.0);
        h.insert("CRPIX1", 96.5);
        h.insert("CRPIX2", 96.5);
        h.insert("CDELT1", -0.066667);
        h.insert("CDELT2", 0.066667);
        h
    }

    #[test]
    fn test_reference_pixel_maps_to_crval() {
        let wcs = Wcs::new(&tan_header()).unwrap();
        let (lon, lat) = wcs.pix_to_world(96.5, 96.5).unwrap();
        assert!((lon - 286.0).abs() < 1e-12);
        assert!((lat + 66.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_ctype_fails() {
        let mut h = tan_header();
        h.remove("CTYPE2");
        assert!(matches!(
            Wcs::new(&h),
            Err(WcsError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_mismatched_projection_codes_fail() {
        let mut h = tan_header();
        h.insert("CTYPE2", "DEC--SIN");
        assert!(Wcs::new(&h).is_err());
    }

    #[test]
    fn test_unknown_radesys_fails() {
        let mut h = tan_header();
        h.insert("RADESYS", "HIP");
        assert!(Wcs::new(&h).is_err());
    }

    #[test]
    fn test_crota2_matrix() {
        let mut h = tan_header();
        h.insert("CROTA2", 30.0);
        let wcs = Wcs::new(&h).unwrap();
        let (s, c) = 30.0_f64.to_radians().sin_cos();
        assert!((wcs.cd[0][0] - (-0.066667) * c).abs() < 1e-15);
        assert!((wcs.cd[0][1] - 0.066667 * (-1.0) * s).abs() < 1e-15);
        assert!((wcs.cd[1][0] - -(0.066667) * 1.0 * s).abs() < 1e-15);
        assert!((wcs.cd[1][1] - 0.066667 * c).abs() < 1e-15);
    }

    #[test]
    fn test_singular_cd_fails() {
        let mut h = tan_header();
        h.insert("CD1_1", 0.1);
        h.insert("CD1_2", 0.2);
        h.insert("CD2_1", 0.05);
        h.insert("CD2_2", 0.1);
        assert!(matches!(
            Wcs::new(&h),
            Err(WcsError::InvalidHeader { reason }) if reason.contains("singular")
        ));
    }

    #[test]
    fn test_odd_batch_rejected() {
        let wcs = Wcs::new(&tan_header()).unwrap();
        assert!(matches!(
            wcs.pix_to_world_slice(&[1.0, 2.0, 3.0]),
            Err(WcsError::UnpairedCoordinates { len: 3 })
        ));
    }

    #[test]
    fn test_world_to_pix_validates_ranges() {
        let wcs = Wcs::new(&tan_header()).unwrap();
        assert!(wcs.world_to_pix(361.0, 0.0).is_err());
        assert!(wcs.world_to_pix(10.0, -91.0).is_err());
    }

    #[test]
    fn test_cunit_scaling() {
        let mut h = tan_header();
        h.insert("CRVAL1", 286.0 * 60.0);
        h.insert("CUNIT1", "arcmin");
        h.insert("CUNIT2", "deg");
        let wcs = Wcs::new(&h).unwrap();
        let (lon, _) = wcs.pix_to_world(96.5, 96.5).unwrap();
        assert!((lon - 286.0).abs() < 1e-9);
    }

    #[test]
    fn test_frame_selection() {
        let mut h = tan_header();
        assert_eq!(Wcs::new(&h).unwrap().frame(), Frame::Icrs);

        h.insert("EQUINOX", 1950.0);
        assert_eq!(
            Wcs::new(&h).unwrap().frame(),
            Frame::Fk4 {
                equinox: 1950.0,
                epoch_obs: None
            }
        );

        h.insert("EQUINOX", 2000.0);
        h.insert("RADESYS", "ICRS");
        assert_eq!(Wcs::new(&h).unwrap().frame(), Frame::Icrs);

        let mut g = tan_header();
        g.insert("CTYPE1", "GLON-TAN");
        g.insert("CTYPE2", "GLAT-TAN");
        assert_eq!(Wcs::new(&g).unwrap().frame(), Frame::Galactic);
    }

    #[test]
    fn test_observation_epoch_from_mjd() {
        let mut h = tan_header();
        h.insert("RADESYS", "FK4");
        h.insert("MJD-OBS", 44244.0);
        match Wcs::new(&h).unwrap().frame() {
            Frame::Fk4 {
                epoch_obs: Some(e), ..
            } => assert!((e - 1980.0).abs() < 0.1),
            other => panic!("unexpected frame {other:?}"),
        }
    }
}
