//! The keyword-provider seam between this crate and whatever reads FITS.
//!
//! The core never parses FITS itself; it consumes headers through the
//! [`HeaderView`] trait. [`KeywordMap`] is a ready-made implementation for
//! tests and embedders that already have their cards in memory.

use std::collections::BTreeMap;

/// WCS keyword spellings, shared by the driver and the projection
/// constructors so neither has to import the other.
pub mod keys {
    pub const NAXIS: &str = "NAXIS";
    pub const NAXIS1: &str = "NAXIS1";
    pub const NAXIS2: &str = "NAXIS2";
    pub const CRPIX1: &str = "CRPIX1";
    pub const CRPIX2: &str = "CRPIX2";
    pub const CRVAL1: &str = "CRVAL1";
    pub const CRVAL2: &str = "CRVAL2";
    pub const CTYPE1: &str = "CTYPE1";
    pub const CTYPE2: &str = "CTYPE2";
    pub const CUNIT1: &str = "CUNIT1";
    pub const CUNIT2: &str = "CUNIT2";
    pub const CD1_1: &str = "CD1_1";
    pub const CD1_2: &str = "CD1_2";
    pub const CD2_1: &str = "CD2_1";
    pub const CD2_2: &str = "CD2_2";
    pub const CDELT1: &str = "CDELT1";
    pub const CDELT2: &str = "CDELT2";
    pub const CROTA2: &str = "CROTA2";
    pub const PC1_1: &str = "PC1_1";
    pub const PC1_2: &str = "PC1_2";
    pub const PC2_1: &str = "PC2_1";
    pub const PC2_2: &str = "PC2_2";
    pub const PV1_1: &str = "PV1_1";
    pub const PV1_2: &str = "PV1_2";
    pub const PV1_3: &str = "PV1_3";
    pub const PV1_4: &str = "PV1_4";
    pub const PV2_1: &str = "PV2_1";
    pub const PV2_2: &str = "PV2_2";
    pub const PV2_3: &str = "PV2_3";
    pub const LONPOLE: &str = "LONPOLE";
    pub const LATPOLE: &str = "LATPOLE";
    pub const EQUINOX: &str = "EQUINOX";
    pub const RADESYS: &str = "RADESYS";
    pub const DATE_OBS: &str = "DATE-OBS";
    pub const MJD_OBS: &str = "MJD-OBS";

    /// `PV2_<k>` for the ZPN polynomial coefficients.
    pub fn pv2(k: usize) -> String {
        format!("PV2_{k}")
    }
}

/// Read-only, typed access to header cards.
///
/// Implementations may back onto a real FITS reader, a test fixture, or
/// anything else keyed by card name. Numeric getters should coerce between
/// integer and real cards where the underlying store distinguishes them.
pub trait HeaderView {
    /// Is the keyword present?
    fn contains(&self, key: &str) -> bool;

    /// The card as an integer, if present and convertible.
    fn integer(&self, key: &str) -> Option<i64>;

    /// The card as a float, if present and convertible.
    fn real(&self, key: &str) -> Option<f64>;

    /// The card as a string, if present.
    fn text(&self, key: &str) -> Option<String>;

    /// Every keyword name in the header.
    fn keys(&self) -> Vec<String>;
}

/// A single header card value.
#[derive(Debug, Clone, PartialEq)]
pub enum CardValue {
    /// Integer card
    Integer(i64),
    /// Floating-point card
    Real(f64),
    /// String card
    Text(String),
}

impl From<i64> for CardValue {
    fn from(v: i64) -> Self {
        CardValue::Integer(v)
    }
}

impl From<f64> for CardValue {
    fn from(v: f64) -> Self {
        CardValue::Real(v)
    }
}

impl From<&str> for CardValue {
    fn from(v: &str) -> Self {
        CardValue::Text(v.to_string())
    }
}

/// An in-memory [`HeaderView`] backed by a sorted map.
///
/// # Example
/// ```
/// use wcs_math::header::{HeaderView, KeywordMap};
///
/// let mut h = KeywordMap::new();
/// h.insert("CRVAL1", 286.0);
/// h.insert("CTYPE1", "RA---TAN");
/// assert_eq!(h.real("CRVAL1"), Some(286.0));
/// assert!(h.contains("CTYPE1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeywordMap {
    cards: BTreeMap<String, CardValue>,
}

impl KeywordMap {
    /// An empty header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a card, replacing any existing value.
    pub fn insert(&mut self, key: &str, value: impl Into<CardValue>) {
        self.cards.insert(key.to_string(), value.into());
    }

    /// Drop a card, if present.
    pub fn remove(&mut self, key: &str) {
        self.cards.remove(key);
    }
}

impl HeaderView for KeywordMap {
    fn contains(&self, key: &str) -> bool {
        self.cards.contains_key(key)
    }

    fn integer(&self, key: &str) -> Option<i64> {
        match self.cards.get(key)? {
            CardValue::Integer(v) => Some(*v),
            CardValue::Real(v) => Some(*v as i64),
            CardValue::Text(s) => s.trim().parse().ok(),
        }
    }

    fn real(&self, key: &str) -> Option<f64> {
        match self.cards.get(key)? {
            CardValue::Integer(v) => Some(*v as f64),
            CardValue::Real(v) => Some(*v),
            CardValue::Text(s) => s.trim().parse().ok(),
        }
    }

    fn text(&self, key: &str) -> Option<String> {
        match self.cards.get(key)? {
            CardValue::Integer(v) => Some(v.to_string()),
            CardValue::Real(v) => Some(v.to_string()),
            CardValue::Text(s) => Some(s.clone()),
        }
    }

    fn keys(&self) -> Vec<String> {
        self.cards.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_map_coercions() {
        let mut h = KeywordMap::new();
        h.insert("NAXIS1", 192_i64);
        h.insert("CRPIX1", 96.5);
        h.insert("EQUINOX", "2000.0");

        assert_eq!(h.real("NAXIS1"), Some(192.0));
        assert_eq!(h.integer("CRPIX1"), Some(96));
        assert_eq!(h.real("EQUINOX"), Some(2000.0));
        assert_eq!(h.real("MISSING"), None);
    }

    #[test]
    fn test_keys_enumerates_cards() {
        let mut h = KeywordMap::new();
        h.insert("PV2_0", 0.05);
        h.insert("PV2_1", 0.975);
        assert_eq!(h.keys(), vec!["PV2_0".to_string(), "PV2_1".to_string()]);
    }
}
