// crates/zfield-core/tests/codec_layout.rs

use zfield_core::field::plan::max_bin;
use zfield_core::{Codec, CodecError, CodecOptions, FieldSpec, MaxValue, SortOrder, UpdateMode, SAFE_WIDTH};

fn unbounded(name: &str) -> FieldSpec {
    FieldSpec::new(name, SortOrder::Descending, MaxValue::Unbounded, UpdateMode::Incremental)
}

#[test]
fn first_declared_field_is_most_significant() {
    let codec = Codec::new(vec![FieldSpec::descending("field1", 100), FieldSpec::ascending("field2", 50)]).unwrap();

    let f1 = codec.field_plan("field1").unwrap();
    let f2 = codec.field_plan("field2").unwrap();
    assert_eq!((f1.bits(), f1.shift(), f1.position()), (7, 6, 1));
    assert_eq!((f2.bits(), f2.shift(), f2.position()), (6, 0, 0));
    assert_eq!(f1.mask() & f2.mask(), 0);

    // 20 << 6 + 30
    assert_eq!(codec.pack(&[20, 30]).unwrap(), 1310);
    assert_eq!(codec.unpack(Some(1310)), vec![20, 30]);
}

#[test]
fn kills_deaths_slots() {
    let codec = Codec::new(vec![FieldSpec::descending("kills", 10_000), FieldSpec::ascending("deaths", 10_000)]).unwrap();

    let deaths = codec.field_plan("deaths").unwrap();
    let kills = codec.field_plan("kills").unwrap();
    assert_eq!((deaths.bits(), deaths.shift()), (14, 0));
    assert_eq!((kills.bits(), kills.shift()), (14, 14));
    assert_eq!(kills.max_absolute(), max_bin(14));
    assert_eq!(codec.default_score(), max_bin(14) << 14);
}

#[test]
fn main_field_takes_remaining_headroom() {
    let codec = Codec::new(vec![unbounded("score"), FieldSpec::ascending("tie", 255)]).unwrap();
    let main = codec.field_plan("score").unwrap();

    assert!(main.is_main());
    assert_eq!(main.bits(), SAFE_WIDTH - 8);
    assert_eq!(main.shift(), 8);
    assert_eq!(main.max_absolute(), max_bin(SAFE_WIDTH - 8));
    assert_eq!(codec.total_bits(), SAFE_WIDTH);

    let top = codec.pack(&[main.max_absolute(), 255]).unwrap();
    assert_eq!(top, max_bin(SAFE_WIDTH));
}

#[test]
fn lone_main_field_uses_full_width() {
    let codec = Codec::new(vec![unbounded("score")]).unwrap();
    assert_eq!(codec.field_plan("score").unwrap().bits(), SAFE_WIDTH);
}

#[test]
fn fixed_fields_wider_than_safe_width_are_rejected() {
    let specs = vec![
        FieldSpec::descending("a", 1 << 30),
        FieldSpec::descending("b", 1 << 30),
    ];
    let err = Codec::new(specs).unwrap_err();
    assert!(matches!(err, CodecError::Config(_)), "{err}");
}

#[test]
fn main_field_needs_at_least_one_bit() {
    let specs = vec![unbounded("main"), FieldSpec::ascending("wide", (1i64 << 53) - 1)];
    assert!(matches!(Codec::new(specs), Err(CodecError::Config(_))));
}

#[test]
fn construction_rejects_bad_specs() {
    assert!(Codec::new(vec![]).is_err());
    assert!(Codec::new(vec![FieldSpec::ascending("", 1)]).is_err());
    assert!(Codec::new(vec![FieldSpec::ascending("x", 1), FieldSpec::ascending("x", 2)]).is_err());
    assert!(Codec::new(vec![FieldSpec::ascending("neg", -5)]).is_err());
    assert!(Codec::new(vec![unbounded("a"), unbounded("b")]).is_err());
    assert!(Codec::new(vec![FieldSpec::ascending("a", 1), unbounded("b")]).is_err());
}

#[test]
fn safe_width_is_configurable() {
    let opts = CodecOptions { safe_width: 64 };
    let codec = Codec::with_options(vec![unbounded("main"), FieldSpec::ascending("t", 15)], opts).unwrap();
    assert_eq!(codec.field_plan("main").unwrap().bits(), 60);
    assert_eq!(codec.pack(&[max_bin(60), 15]).unwrap(), u64::MAX);

    assert!(Codec::with_options(vec![FieldSpec::ascending("t", 1)], CodecOptions { safe_width: 0 }).is_err());
    assert!(Codec::with_options(vec![FieldSpec::ascending("t", 1)], CodecOptions { safe_width: 65 }).is_err());
}

#[test]
fn max_value_from_float_declaration() {
    assert_eq!(MaxValue::from_f64(f64::INFINITY).unwrap(), MaxValue::Unbounded);
    assert_eq!(MaxValue::from_f64(100.9).unwrap(), MaxValue::Finite(100));
    assert!(MaxValue::from_f64(-1.0).is_err());
    assert!(MaxValue::from_f64(f64::NAN).is_err());
}

#[test]
fn float_score_conversion_is_exact() {
    let codec = Codec::new(vec![unbounded("score")]).unwrap();
    let top = max_bin(SAFE_WIDTH);

    let f = codec.score_to_f64(top).unwrap();
    assert_eq!(codec.score_from_f64(f).unwrap(), top);

    assert!(codec.score_to_f64(top + 1).is_err());
    assert!(codec.score_from_f64(-1.0).is_err());
    assert!(codec.score_from_f64(1.5).is_err());
    assert!(codec.score_from_f64(f64::NAN).is_err());

    // At full width the top scores round up to 2^64 and must not be accepted.
    let wide = Codec::with_options(vec![unbounded("score")], CodecOptions { safe_width: 64 }).unwrap();
    let top = wide.pack(&[u64::MAX]).unwrap();
    assert!(matches!(wide.score_to_f64(top), Err(CodecError::ScoreDomain(_))));
    assert!(wide.score_to_f64(u64::MAX - 1).is_err());

    let exact = 1u64 << 63;
    let f = wide.score_to_f64(exact).unwrap();
    assert_eq!(wide.score_from_f64(f).unwrap(), exact);
}

#[test]
fn fields_info_reports_slots() {
    let codec = Codec::new(vec![FieldSpec::descending("kills", 10_000), FieldSpec::ascending("deaths", 10_000)]).unwrap();
    let info = codec.fields_info();

    assert_eq!(info.len(), 2);
    assert_eq!(info[0].name, "kills");
    assert_eq!(info[0].default_value, max_bin(14));
    assert_eq!(info[0].mask, max_bin(14) << 14);
    assert_eq!(info[1].default_value, 0);
    assert_eq!(info[1].update.name(), "INCREMENTAL");
}
