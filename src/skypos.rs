//! Frame-tagged sky positions.

use std::fmt;

use crate::error::{validate_latitude, Result};
use crate::frames::{angular_separation, Frame};
use crate::math::normalize_longitude;

/// A direction on the celestial sphere tagged with its reference frame.
///
/// Longitude is kept normalised to [0, 360) and latitude must lie in
/// [-90, 90]; construction enforces both.
///
/// # Example
/// ```
/// use wcs_math::{Frame, SkyPosition};
///
/// let p = SkyPosition::new(182.63867, 39.401167, Frame::Icrs).unwrap();
/// assert_eq!(p.lon_hms(), "12:10:33.281");
/// assert_eq!(p.lat_dms(), "+39:24:04.20");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyPosition {
    lon: f64,
    lat: f64,
    frame: Frame,
}

impl SkyPosition {
    /// Create a position from degrees.
    pub fn new(lon: f64, lat: f64, frame: Frame) -> Result<Self> {
        validate_latitude(lat)?;
        Ok(SkyPosition {
            lon: normalize_longitude(lon),
            lat,
            frame,
        })
    }

    /// Longitude in degrees, in [0, 360).
    pub fn longitude(&self) -> f64 {
        self.lon
    }

    /// Latitude in degrees, in [-90, 90].
    pub fn latitude(&self) -> f64 {
        self.lat
    }

    /// The frame this position is expressed in.
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// This position expressed in another frame.
    pub fn convert_to(&self, frame: Frame) -> Result<SkyPosition> {
        let (lon, lat) = self.frame.convert_to(frame, self.lon, self.lat)?;
        SkyPosition::new(lon, lat, frame)
    }

    /// Great-circle separation from another position, in degrees.
    ///
    /// The positions may be in different frames; both are moved to ICRS
    /// before the dot product.
    pub fn separation(&self, other: &SkyPosition) -> Result<f64> {
        let a = self.convert_to(Frame::Icrs)?;
        let b = other.convert_to(Frame::Icrs)?;
        angular_separation(a.lon, a.lat, b.lon, b.lat)
    }

    /// Longitude as hours:minutes:seconds, e.g. `"12:10:33.281"`.
    pub fn lon_hms(&self) -> String {
        let hours = self.lon / 15.0;
        let (h, m, s) = sexagesimal(hours, 3);
        format!("{h:02}:{m:02}:{s:06.3}")
    }

    /// Latitude as signed degrees:minutes:seconds, e.g. `"+39:24:04.20"`.
    pub fn lat_dms(&self) -> String {
        let sign = if self.lat < 0.0 { '-' } else { '+' };
        let (d, m, s) = sexagesimal(self.lat.abs(), 2);
        format!("{sign}{d:02}:{m:02}:{s:05.2}")
    }
}

/// Split a non-negative value into (whole, minutes, seconds) with the
/// seconds rounded to `decimals` places and carries propagated.
fn sexagesimal(value: f64, decimals: u32) -> (u32, u32, f64) {
    let mut whole = value.trunc() as u32;
    let mut minutes = (value.fract() * 60.0).trunc() as u32;
    let mut seconds = (value.fract() * 60.0).fract() * 60.0;

    // round at the requested precision, then carry
    let scale = 10f64.powi(decimals as i32);
    seconds = (seconds * scale).round() / scale;
    if seconds >= 60.0 {
        seconds -= 60.0;
        minutes += 1;
    }
    if minutes >= 60 {
        minutes -= 60;
        whole += 1;
    }
    (whole, minutes, seconds)
}

impl fmt::Display for SkyPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.lon_hms(), self.lat_dms(), self.frame)
    }
}
