//! Error types for WCS calculations

use thiserror::Error;

/// Main error type for wcs-math operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WcsError {
    /// Projection parameter out of its valid interval or geometrically infeasible
    #[error("Bad {projection} parameter: {reason}")]
    BadProjectionParameter {
        /// Three-letter projection code (e.g. "AZP")
        projection: &'static str,
        /// Why the parameter set is unusable
        reason: String,
    },

    /// Point outside the domain of a well-constructed projection
    #[error("({x}, {y}) is not within the domain of the {projection} projection")]
    PixelBeyondProjection {
        /// Three-letter projection code
        projection: &'static str,
        /// Offending abscissa (plane x in deg, or native longitude in rad)
        x: f64,
        /// Offending ordinate (plane y in deg, or native latitude in rad)
        y: f64,
    },

    /// Structural problem with the WCS header
    #[error("Invalid WCS header: {reason}")]
    InvalidHeader {
        /// Description of the issue
        reason: String,
    },

    /// Inverse-trig argument beyond [-1, 1] past tolerance
    #[error("{function} argument {value} is outside [-1, 1]")]
    Domain {
        /// The function that rejected its argument
        function: &'static str,
        /// The invalid value
        value: f64,
    },

    /// Malformed epoch or date string
    #[error("Cannot parse epoch '{input}': expected {expected}")]
    InvalidEpoch {
        /// The string that failed to parse
        input: String,
        /// What a valid string looks like
        expected: &'static str,
    },

    /// An iterative solver could not do its job
    #[error("{calculation} failed: {reason}")]
    Numerical {
        /// What calculation failed
        calculation: &'static str,
        /// Why it failed
        reason: String,
    },

    /// Invalid coordinate value
    #[error("Invalid {coord_type}: {value} (valid range: {valid_range})")]
    InvalidCoordinate {
        /// Type of coordinate (e.g., "longitude", "latitude")
        coord_type: &'static str,
        /// The invalid value
        value: f64,
        /// Valid range description
        valid_range: &'static str,
    },

    /// Interleaved coordinate array with an odd number of values
    #[error("Coordinate array length {len} is not even")]
    UnpairedCoordinates {
        /// The offending length
        len: usize,
    },
}

/// Type alias for Results in this crate
pub type Result<T> = std::result::Result<T, WcsError>;

/// Validate a world longitude (0 <= lon <= 360)
#[inline]
pub fn validate_longitude(lon: f64) -> Result<()> {
    if !(0.0..=360.0).contains(&lon) {
        Err(WcsError::InvalidCoordinate {
            coord_type: "longitude",
            value: lon,
            valid_range: "[0, 360]",
        })
    } else {
        Ok(())
    }
}

/// Validate a world latitude (-90 <= lat <= 90)
#[inline]
pub fn validate_latitude(lat: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat) {
        Err(WcsError::InvalidCoordinate {
            coord_type: "latitude",
            value: lat,
            valid_range: "[-90, 90]",
        })
    } else {
        Ok(())
    }
}
