//! Julian Date and epoch handling.
//!
//! A WCS header can pin its reference frame to a moment in time in several
//! ways (EQUINOX, MJD-OBS, DATE-OBS, or an explicit epoch string such as
//! `"B1950"`). Everything here funnels into a Julian Date and the derived
//! Besselian and Julian epoch years.

use chrono::{DateTime, Datelike, Timelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Result, WcsError};

lazy_static! {
    static ref ISO_DATE_REGEX: Regex = Regex::new(
        r"^(\d{1,4})-(\d{1,2})-(\d{1,2})(?:[T ](\d{1,2})(?::(\d{1,2})(?::(\d{1,2}(?:\.\d+)?))?)?)?$",
    )
    .unwrap();
    static ref SHORTFORM_DATE_REGEX: Regex = Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2})$").unwrap();
}

/// Julian Date (JD) of the J2000.0 epoch: 2000 January 1.5 TT
pub const JD2000: f64 = 2451545.0;

/// Julian Date of the B1900.0 epoch, the origin of the Besselian scale
pub const JD_B1900: f64 = 2415020.31352;

/// Length of the Besselian (tropical) year in days
pub const BESSELIAN_YEAR: f64 = 365.242198781;

/// Length of the Julian year in days
pub const JULIAN_YEAR: f64 = 365.25;

/// Offset between Julian Date and Modified Julian Date
pub const MJD_OFFSET: f64 = 2400000.5;

/// Converts a UTC datetime to a Julian Date (JD).
///
/// Based on the algorithm from Jean Meeus' *Astronomical Algorithms*
/// (2nd ed., Chapter 7), valid on both sides of the Gregorian reform.
///
/// # Arguments
///
/// - `datetime` — A UTC [`DateTime<Utc>`] representing the moment to convert
///
/// # Returns
///
/// A `f64` Julian Date with fractional days included. The Julian Day starts
/// at **noon**, so `2000-01-01 12:00:00 UTC` → `2451545.0`.
///
/// # Example
///
/// ```
/// use chrono::{Utc, TimeZone};
/// use wcs_math::time::julian_date;
///
/// let dt = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
/// assert!((julian_date(dt) - 2451545.0).abs() < 1e-6);
/// ```
pub fn julian_date(datetime: DateTime<Utc>) -> f64 {
    let frac_day = (datetime.hour() as f64
        + datetime.minute() as f64 / 60.0
        + (datetime.second() as f64 + datetime.nanosecond() as f64 * 1e-9) / 3600.0)
        / 24.0;
    jd_from_calendar(
        datetime.year(),
        datetime.month(),
        datetime.day() as f64 + frac_day,
    )
}

/// Julian Date for a calendar date with a fractional day.
///
/// `day` carries the time of day as its fraction. Dates on or after
/// 1582-10-15 are taken as Gregorian, earlier ones as Julian; the dropped
/// days 1582-10-05..14 do not exist in either calendar.
pub fn jd_from_calendar(year: i32, month: u32, day: f64) -> f64 {
    let mut y = year;
    let mut m = month as i32;
    if m <= 2 {
        y -= 1;
        m += 12;
    }

    let a = (y as f64 / 100.0).floor();
    let gregorian = (year, month, day.floor() as u32) >= (1582, 10, 15);
    let b = if gregorian {
        2.0 - a + (a / 4.0).floor()
    } else {
        0.0
    };

    (365.25 * (y as f64 + 4716.0)).floor() + (30.6001 * ((m + 1) as f64)).floor() + day + b
        - 1524.5
}

/// Calendar date (year, month, fractional day) for a Julian Date.
///
/// Inverse of [`jd_from_calendar`], Meeus Chapter 7.
pub fn jd_to_calendar(jd: f64) -> (i32, u32, f64) {
    let jd = jd + 0.5;
    let z = jd.floor();
    let f = jd - z;

    let a = if z < 2299161.0 {
        z
    } else {
        let alpha = ((z - 1867216.25) / 36524.25).floor();
        z + 1.0 + alpha - (alpha / 4.0).floor()
    };

    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = b - d - (30.6001 * e).floor() + f;
    let month = if e < 14.0 { e - 1.0 } else { e - 13.0 } as u32;
    let year = if month > 2 { c - 4716.0 } else { c - 4715.0 } as i32;
    (year, month, day)
}

/// Besselian epoch year for a Julian Date.
#[inline]
pub fn jd_to_besselian_epoch(jd: f64) -> f64 {
    1900.0 + (jd - JD_B1900) / BESSELIAN_YEAR
}

/// Julian Date for a Besselian epoch year.
#[inline]
pub fn besselian_epoch_to_jd(epoch: f64) -> f64 {
    JD_B1900 + (epoch - 1900.0) * BESSELIAN_YEAR
}

/// Julian epoch year for a Julian Date.
#[inline]
pub fn jd_to_julian_epoch(jd: f64) -> f64 {
    2000.0 + (jd - JD2000) / JULIAN_YEAR
}

/// Julian Date for a Julian epoch year.
#[inline]
pub fn julian_epoch_to_jd(epoch: f64) -> f64 {
    JD2000 + (epoch - 2000.0) * JULIAN_YEAR
}

/// Julian Date for an ISO date or datetime string.
///
/// Accepts `YYYY-MM-DD[THH:MM:SS[.s]]` (the time fields may be one digit
/// and may stop after the hour or minute) and the FITS `DD/MM/YY`
/// shortform, where the two-digit year counts from 1900.
///
/// # Example
/// ```
/// use wcs_math::time::iso_to_julian_date;
/// let jd = iso_to_julian_date("2000-01-01T12:00:00").unwrap();
/// assert!((jd - 2451545.0).abs() < 1e-9);
/// ```
pub fn iso_to_julian_date(date: &str) -> Result<f64> {
    let (year, month, day, hour, minute, second) = if let Some(c) =
        ISO_DATE_REGEX.captures(date.trim())
    {
        let get = |i: usize| c.get(i).map(|m| m.as_str());
        (
            get(1).unwrap().parse::<i32>().ok(),
            get(2).unwrap().parse::<u32>().ok(),
            get(3).unwrap().parse::<u32>().ok(),
            get(4).map_or(Some(0.0), |s| s.parse::<f64>().ok()),
            get(5).map_or(Some(0.0), |s| s.parse::<f64>().ok()),
            get(6).map_or(Some(0.0), |s| s.parse::<f64>().ok()),
        )
    } else if let Some(c) = SHORTFORM_DATE_REGEX.captures(date.trim()) {
        (
            c[3].parse::<i32>().ok().map(|y| y + 1900),
            c[2].parse::<u32>().ok(),
            c[1].parse::<u32>().ok(),
            Some(0.0),
            Some(0.0),
            Some(0.0),
        )
    } else {
        return Err(WcsError::InvalidEpoch {
            input: date.to_string(),
            expected: "YYYY-MM-DD[THH:MM:SS[.s]] or DD/MM/YY",
        });
    };

    match (year, month, day, hour, minute, second) {
        (Some(y), Some(m @ 1..=12), Some(d @ 1..=31), Some(hh), Some(mm), Some(ss)) => {
            let frac = (hh + mm / 60.0 + ss / 3600.0) / 24.0;
            Ok(jd_from_calendar(y, m, d as f64 + frac))
        }
        _ => Err(WcsError::InvalidEpoch {
            input: date.to_string(),
            expected: "a calendar date with month 1-12 and day 1-31",
        }),
    }
}

/// Modified Julian Date for an ISO date or datetime string.
pub fn iso_to_modified_julian_date(date: &str) -> Result<f64> {
    Ok(iso_to_julian_date(date)? - MJD_OFFSET)
}

/// A moment in time expressed on the three scales WCS headers care about.
///
/// Constructed from an epoch string (`"B1950"`, `"J2000"`, `"MJD53005.0"`,
/// `"JD2451545"`, `"F2007-01-14T13:18:59.9"`, or a bare Julian year) or
/// from any one of the scales directly.
///
/// # Example
/// ```
/// use wcs_math::Epoch;
/// let e: Epoch = "J2000".parse().unwrap();
/// assert!((e.jd - 2451545.0).abs() < 1e-9);
/// assert!((e.besselian - 2000.001278).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Epoch {
    /// Besselian epoch year
    pub besselian: f64,
    /// Julian epoch year
    pub julian: f64,
    /// Julian Date
    pub jd: f64,
}

impl Epoch {
    /// Epoch from a Julian Date.
    pub fn from_jd(jd: f64) -> Self {
        Epoch {
            besselian: jd_to_besselian_epoch(jd),
            julian: jd_to_julian_epoch(jd),
            jd,
        }
    }

    /// Epoch from a Modified Julian Date.
    pub fn from_mjd(mjd: f64) -> Self {
        Self::from_jd(mjd + MJD_OFFSET)
    }

    /// Epoch from a Besselian year.
    pub fn from_besselian(epoch: f64) -> Self {
        Self::from_jd(besselian_epoch_to_jd(epoch))
    }

    /// Epoch from a Julian year.
    pub fn from_julian(epoch: f64) -> Self {
        Self::from_jd(julian_epoch_to_jd(epoch))
    }

    /// Epoch from a UTC datetime.
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self::from_jd(julian_date(datetime))
    }

    /// Parse an epoch specification.
    ///
    /// Prefixes: `B` Besselian year, `J` Julian year, `JD` Julian Date,
    /// `MJD` modified Julian Date, `F` FITS date string. A bare number is
    /// a Julian year.
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        let bad = || WcsError::InvalidEpoch {
            input: spec.to_string(),
            expected: "B<year>, J<year>, JD<number>, MJD<number>, F<date>, or a bare year",
        };

        if let Some(rest) = spec.strip_prefix("MJD") {
            return rest.parse().map(Self::from_mjd).map_err(|_| bad());
        }
        if let Some(rest) = spec.strip_prefix("JD") {
            return rest.parse().map(Self::from_jd).map_err(|_| bad());
        }
        if let Some(rest) = spec.strip_prefix('B') {
            return rest.parse().map(Self::from_besselian).map_err(|_| bad());
        }
        if let Some(rest) = spec.strip_prefix('J') {
            return rest.parse().map(Self::from_julian).map_err(|_| bad());
        }
        if let Some(rest) = spec.strip_prefix('F') {
            return iso_to_julian_date(rest).map(Self::from_jd);
        }
        spec.parse().map(Self::from_julian).map_err(|_| bad())
    }
}

impl std::str::FromStr for Epoch {
    type Err = WcsError;

    fn from_str(s: &str) -> Result<Self> {
        Epoch::parse(s)
    }
}
