//! Sky-position formatting, conversion and separation.

use crate::{Frame, SkyPosition};

#[test]
fn test_sexagesimal_rendering() {
    let p = SkyPosition::new(182.63867, 39.401167, Frame::Icrs).unwrap();
    assert_eq!(p.lon_hms(), "12:10:33.281");
    assert_eq!(p.lat_dms(), "+39:24:04.20");
    assert_eq!(format!("{p}"), "12:10:33.281 +39:24:04.20 (ICRS)");
}

#[test]
fn test_sexagesimal_zero_padding() {
    let p = SkyPosition::new(0.25, 5.0, Frame::Icrs).unwrap();
    assert_eq!(p.lon_hms(), "00:01:00.000");
    assert_eq!(p.lat_dms(), "+05:00:00.00");
}

#[test]
fn test_separation_is_symmetric() {
    let a = SkyPosition::new(33.2, 12.5, Frame::Icrs).unwrap();
    let b = SkyPosition::new(210.0, -45.0, Frame::Icrs).unwrap();
    let ab = a.separation(&b).unwrap();
    let ba = b.separation(&a).unwrap();
    assert!((ab - ba).abs() < 1e-12);
}

#[test]
fn test_separation_across_frames() {
    // the same physical direction in two frames is zero apart, up to the
    // rounding floor of the tiny-angle arccosine
    let icrs = SkyPosition::new(10.68458, 41.26917, Frame::Icrs).unwrap();
    let gal = icrs.convert_to(Frame::Galactic).unwrap();
    let sep = icrs.separation(&gal).unwrap();
    assert!(sep < 5e-6, "sep = {sep}");
}

#[test]
fn test_convert_to_round_trips() {
    let p = SkyPosition::new(286.0, -66.0, Frame::fk5()).unwrap();
    let q = p
        .convert_to(Frame::Galactic)
        .and_then(|g| g.convert_to(Frame::fk5()))
        .unwrap();
    assert!((p.longitude() - q.longitude()).abs() < 1e-9);
    assert!((p.latitude() - q.latitude()).abs() < 1e-9);
}

#[test]
fn test_antipodal_separation() {
    let a = SkyPosition::new(0.0, 0.0, Frame::Icrs).unwrap();
    let b = SkyPosition::new(180.0, 0.0, Frame::Icrs).unwrap();
    assert!((a.separation(&b).unwrap() - 180.0).abs() < 1e-5);
}
