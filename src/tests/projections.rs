//! Round-trip properties of the full pixel pipeline, across every
//! projection family.

use crate::header::KeywordMap;
use crate::Wcs;

/// All supported projection codes.
const CODES: [&str; 24] = [
    "AZP", "SZP", "TAN", "STG", "SIN", "ARC", "ZEA", "ZPN", "AIR", "NCP", "CAR", "CEA", "CYP",
    "MER", "AIT", "MOL", "PAR", "SFL", "COP", "COE", "COD", "COO", "BON", "PCO",
];

/// A 192x192 test header centred on (286, -66), with the PV cards each
/// projection needs.
fn header_for(code: &str) -> KeywordMap {
    let mut h = KeywordMap::new();
    h.insert("CTYPE1", format!("RA---{code}").as_str());
    h.insert("CTYPE2", format!("DEC--{code}").as_str());
    h.insert("CRVAL1", 286.0);
    h.insert("CRVAL2", -66.0);
    h.insert("CRPIX1", 96.5);
    h.insert("CRPIX2", 96.5);
    h.insert("CDELT1", -0.066667);
    h.insert("CDELT2", 0.066667);
    h.insert("NAXIS1", 192_i64);
    h.insert("NAXIS2", 192_i64);

    match code {
        "AZP" => {
            h.insert("PV2_1", 2.0);
            h.insert("PV2_2", 30.0);
        }
        "SZP" => {
            h.insert("PV2_1", 2.0);
            h.insert("PV2_2", 30.0);
            h.insert("PV2_3", 60.0);
        }
        "SIN" => {
            h.insert("PV2_1", 0.02);
            h.insert("PV2_2", -0.04);
        }
        "ZPN" => {
            for (k, c) in [0.050, 0.975, -0.807, 0.337, -0.065, 0.010, 0.003, -0.001]
                .iter()
                .enumerate()
            {
                h.insert(&format!("PV2_{k}"), *c);
            }
        }
        "AIR" => {
            h.insert("PV2_1", 45.0);
        }
        "CEA" => {
            h.insert("PV2_1", 0.8);
        }
        "CYP" => {
            h.insert("PV2_1", 1.0);
            h.insert("PV2_2", std::f64::consts::FRAC_1_SQRT_2);
        }
        "COP" | "COE" | "COD" | "COO" => {
            h.insert("PV2_1", 45.0);
            h.insert("PV2_2", 20.0);
        }
        "BON" => {
            h.insert("PV2_1", 45.0);
        }
        _ => {}
    }
    h
}

/// Image-plane sample points; all sit at radii every projection accepts
/// (the canonical ZPN polynomial excludes the innermost ~2.9 deg, so the
/// exact reference pixel is left out).
const PIXELS: [(f64, f64); 5] = [
    (1.0, 1.0),
    (192.0, 1.0),
    (192.0, 192.0),
    (1.0, 192.0),
    (30.0, 150.0),
];

#[test]
fn test_pixel_round_trip_every_projection() {
    for code in CODES {
        let wcs = Wcs::new(&header_for(code)).unwrap_or_else(|e| panic!("{code}: {e}"));
        for (x, y) in PIXELS {
            let (lon, lat) = wcs
                .pix_to_world(x, y)
                .unwrap_or_else(|e| panic!("{code} pix ({x}, {y}): {e}"));
            let (x2, y2) = wcs
                .world_to_pix(lon, lat)
                .unwrap_or_else(|e| panic!("{code} world ({lon}, {lat}): {e}"));
            assert!(
                (x - x2).abs() < 1e-9 && (y - y2).abs() < 1e-9,
                "{code}: ({x}, {y}) -> ({lon}, {lat}) -> ({x2}, {y2})"
            );
        }
    }
}

#[test]
fn test_sky_round_trip_every_projection() {
    // sky points within a few degrees of the fiducial point
    let sky = [
        (286.0, -66.0),
        (280.0, -62.0),
        (290.5, -70.0),
        (286.0, -58.5),
    ];
    for code in CODES {
        let wcs = Wcs::new(&header_for(code)).unwrap();
        for (lon, lat) in sky {
            if code == "ZPN" && wcs.world_to_pix(lon, lat).is_err() {
                // inside the polynomial's inner exclusion circle
                continue;
            }
            let (x, y) = wcs
                .world_to_pix(lon, lat)
                .unwrap_or_else(|e| panic!("{code} world ({lon}, {lat}): {e}"));
            let (lon2, lat2) = wcs.pix_to_world(x, y).unwrap();
            assert!(
                (lon - lon2).abs() < 1e-10 && (lat - lat2).abs() < 1e-10,
                "{code}: ({lon}, {lat}) -> ({lon2}, {lat2})"
            );
        }
    }
}

#[test]
fn test_results_are_normalised() {
    for code in CODES {
        let wcs = Wcs::new(&header_for(code)).unwrap();
        for (x, y) in PIXELS {
            let (lon, lat) = wcs.pix_to_world(x, y).unwrap();
            assert!((0.0..360.0).contains(&lon), "{code}: lon {lon}");
            assert!((-90.0..=90.0).contains(&lat), "{code}: lat {lat}");
        }
    }
}

#[test]
fn test_inside_tracks_the_domain() {
    let wcs = Wcs::new(&header_for("SIN")).unwrap();
    // near the fiducial point
    assert!(wcs.inside(286.0_f64.to_radians(), (-66.0_f64).to_radians()));
    // the opposite side of the sky cannot appear in an orthographic-like map
    assert!(!wcs.inside(106.0_f64.to_radians(), 66.0_f64.to_radians()));
}

#[test]
fn test_mercator_excludes_native_poles() {
    let wcs = Wcs::new(&header_for("MER")).unwrap();
    // with LONPOLE defaulting to 180 the native pole of a (286, -66)
    // fiducial lands at (286, 24)
    assert!(wcs.world_to_pix(286.0, 24.0).is_err());
}

#[test]
fn test_projection_parameters_metadata() {
    use crate::projection::{Projection, ProjectionKind};

    let h = header_for("AZP");
    let kind = ProjectionKind::from_code("AZP", &h, -66.0).unwrap();
    let params = kind.parameters();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].pv_key, "PV2_1");
    assert_eq!(params[1].interval, Some([-90.0, 90.0]));

    let tan = ProjectionKind::from_code("TAN", &h, -66.0).unwrap();
    assert!(tan.parameters().is_empty());
    assert_eq!(tan.name(), "gnomonic");
}

#[test]
fn test_unknown_code_is_a_header_error() {
    let h = header_for("TAN");
    assert!(crate::projection::ProjectionKind::from_code("XXX", &h, 0.0).is_err());
}

/// A south-pole-anchored 192x192 field centred near 19h04m -66, the
/// classic test geometry for the degenerate LONPOLE branch.
fn south_pole_header(code: &str, crpix1: f64, crpix2: f64) -> KeywordMap {
    let mut h = KeywordMap::new();
    h.insert("CTYPE1", format!("RA---{code}").as_str());
    h.insert("CTYPE2", format!("DEC--{code}").as_str());
    h.insert("CRVAL1", 0.0);
    h.insert("CRVAL2", -90.0);
    h.insert("CRPIX1", crpix1);
    h.insert("CRPIX2", crpix2);
    h.insert("CDELT1", -0.06666666666667);
    h.insert("CDELT2", 0.06666666666667);
    h.insert("NAXIS1", 192_i64);
    h.insert("NAXIS2", 192_i64);
    h
}

fn assert_corners(wcs: &Wcs, expected: &[((f64, f64), (f64, f64))]) {
    for ((px, py), (lon, lat)) in expected {
        let (l, b) = wcs.pix_to_world(*px, *py).unwrap();
        assert!(
            (l - lon).abs() < 1e-12 && (b - lat).abs() < 1e-12,
            "pixel ({px}, {py}): got ({l}, {b}), want ({lon}, {lat})"
        );
    }
}

#[test]
fn test_arc_reference_field() {
    let wcs = Wcs::new(&south_pole_header("ARC", -246.9419019049999, 5.082274450444131)).unwrap();
    assert_corners(
        &wcs,
        &[
            ((1.0, 1.0), (269.056730777738039, -73.468299585347012)),
            ((192.0, 1.0), (269.467149632953806, -60.735941026372636)),
            ((192.0, 192.0), (293.066101937638564, -58.194463838114913)),
            ((1.0, 192.0), (307.011804331818496, -69.299659386066210)),
        ],
    );
}

#[test]
fn test_coe_reference_field() {
    let mut h = south_pole_header("COE", -223.03753667980004, -14.352496687830062);
    h.insert("PV2_1", -45.0);
    h.insert("PV2_2", 25.0);
    let wcs = Wcs::new(&h).unwrap();
    assert_corners(
        &wcs,
        &[
            ((1.0, 1.0), (271.441283018566764, -73.707516970513367)),
            ((192.0, 1.0), (268.765747911368521, -60.131677869285078)),
            ((192.0, 192.0), (292.588283774027445, -58.330669761448092)),
            ((1.0, 192.0), (308.212254209497758, -69.763922466547697)),
        ],
    );
}

#[test]
fn test_zpn_reference_field() {
    let mut h = south_pole_header("ZPN", -183.2937255632002, 22.09211120574971);
    for (k, c) in [0.050, 0.975, -0.807, 0.337, -0.065, 0.010, 0.003, -0.001]
        .iter()
        .enumerate()
    {
        h.insert(&format!("PV2_{k}"), *c);
    }
    let wcs = Wcs::new(&h).unwrap();
    assert_corners(
        &wcs,
        &[((1.0, 1.0), (263.471000708007352, -78.497682328997385))],
    );
}

#[test]
fn test_conics_require_theta_a() {
    let mut h = header_for("COP");
    h.remove("PV2_1");
    assert!(Wcs::new(&h).is_err());
}
