// crates/zfield-core/tests/update_protocol.rs

use zfield_core::field::plan::max_bin;
use zfield_core::{Codec, CodecError, FieldSpec, UpdateMode};

fn kill_death() -> Codec {
    Codec::new(vec![FieldSpec::descending("kills", 10_000), FieldSpec::ascending("deaths", 10_000)]).unwrap()
}

#[test]
fn kills_deaths_scenario() {
    let codec = kill_death();
    let z = codec.apply_field_update(None, [("kills", 5), ("deaths", 2)]).unwrap();

    let packed = codec.unpack(Some(z));
    assert_eq!(packed, vec![max_bin(14) - 5, 2]);

    let logical = codec.logical_map(Some(z));
    assert_eq!(logical["kills"], 5);
    assert_eq!(logical["deaths"], 2);
}

#[test]
fn incremental_updates_are_additive() {
    let codec = Codec::new(vec![FieldSpec::descending("points", 1_000_000)]).unwrap();

    let a = codec.apply_field_update(None, [("points", 100)]).unwrap();
    let b = codec.apply_field_update(Some(a), [("points", 50)]).unwrap();
    let once = codec.apply_field_update(None, [("points", 150)]).unwrap();

    assert_eq!(b, once);
    assert_eq!(codec.logical_value("points", Some(b)).unwrap(), 150);
}

#[test]
fn absent_and_default_read_the_same() {
    let codec = kill_death();
    assert_eq!(codec.unpack(None), codec.unpack(Some(codec.default_score())));
    assert_eq!(codec.logical_values(None), codec.logical_values(Some(codec.default_score())));
    assert!(codec.logical_values(None).iter().all(|fv| fv.value == 0));
}

#[test]
fn more_kills_sorts_lower() {
    let codec = kill_death();
    let x = codec.apply_field_update(None, [("kills", 9), ("deaths", 3)]).unwrap();
    let y = codec.apply_field_update(None, [("kills", 4), ("deaths", 3)]).unwrap();
    assert!(x < y);

    // Primary field dominates the secondary one.
    let z = codec.apply_field_update(None, [("kills", 10), ("deaths", 10_000)]).unwrap();
    assert!(z < x);

    // Same kills: fewer deaths first.
    let w = codec.apply_field_update(None, [("kills", 9), ("deaths", 1)]).unwrap();
    assert!(w < x);
}

#[test]
fn out_of_range_updates_are_rejected() {
    let codec = kill_death();

    // Slot capacity is 2^14 - 1, the range check is against it.
    let full = codec.apply_field_update(None, [("deaths", max_bin(14) as i64)]).unwrap();
    let err = codec.apply_field_update(Some(full), [("deaths", 1)]).unwrap_err();
    assert!(matches!(err, CodecError::OutOfRange { .. }), "{err}");

    let err = codec.apply_field_update(None, [("deaths", -1)]).unwrap_err();
    assert!(matches!(err, CodecError::OutOfRange { .. }));

    // Descending: lowering kills below zero pushes the packed value above max.
    let err = codec.apply_field_update(None, [("kills", -1)]).unwrap_err();
    assert!(matches!(err, CodecError::OutOfRange { .. }));

    let err = codec.apply_field_update(None, [("kills", max_bin(14) as i64 + 1)]).unwrap_err();
    assert!(matches!(err, CodecError::OutOfRange { .. }));
}

#[test]
fn failed_update_is_all_or_nothing() {
    let codec = kill_death();
    let start = codec.apply_field_update(None, [("kills", 3)]).unwrap();

    assert!(codec.apply_field_update(Some(start), [("kills", 1), ("deaths", -1)]).is_err());
    assert!(codec.apply_field_update(Some(start), [("kills", 1), ("nope", 1)]).is_err());
    // The pure function has no side effects; the caller still holds `start`.
    assert_eq!(codec.logical_value("kills", Some(start)).unwrap(), 3);
}

#[test]
fn unknown_and_repeated_fields_are_rejected() {
    let codec = kill_death();

    let err = codec.apply_field_update(None, [("assists", 1)]).unwrap_err();
    assert!(matches!(err, CodecError::UnknownField(ref n) if n == "assists"));

    let err = codec.apply_field_update(None, [("kills", 1), ("kills", 2)]).unwrap_err();
    assert!(matches!(err, CodecError::DuplicateUpdate(ref n) if n == "kills"));
}

#[test]
fn replace_is_measured_from_default() {
    let codec = Codec::new(vec![
        FieldSpec::descending("best_lap", 4095).with_update(UpdateMode::Replace),
        FieldSpec::ascending("level", 99).with_update(UpdateMode::Replace),
    ])
    .unwrap();

    let a = codec.apply_field_update(None, [("best_lap", 700), ("level", 3)]).unwrap();
    let b = codec.apply_field_update(Some(a), [("best_lap", 650), ("level", 7)]).unwrap();

    let m = codec.logical_map(Some(b));
    assert_eq!(m["best_lap"], 650);
    assert_eq!(m["level"], 7);
    assert_eq!(codec.unpack(Some(b))[0], 4095 - 650);
}

#[test]
fn untouched_fields_survive_update() {
    let codec = kill_death();
    let a = codec.apply_field_update(None, [("kills", 7), ("deaths", 4)]).unwrap();
    let b = codec.apply_field_update(Some(a), [("deaths", 1)]).unwrap();

    let m = codec.logical_map(Some(b));
    assert_eq!(m["kills"], 7);
    assert_eq!(m["deaths"], 5);
}

#[test]
fn max_score_with_fields_builds_bounds() {
    let codec = kill_death();
    let bound = codec.max_score_with_fields([("kills", 5)]).unwrap();

    assert_eq!(codec.logical_value("kills", Some(bound)).unwrap(), 5);
    assert_eq!(codec.logical_value("deaths", Some(bound)).unwrap(), 0);

    let six = codec.apply_field_update(None, [("kills", 6)]).unwrap();
    assert!(six < bound);

    assert!(codec.max_score_with_fields([("ghost", 1)]).is_err());
}
