//! Integration tests exercising the full pipeline:
//! date string → matrix → compatibility → layout → detail lookup → snapshot.

use dm_core::{
    AnyMatrix, Arcana, BirthDate, MatrixLayout, MatrixView, PointId, build_matrix,
    build_matrix_from_str, compatibility_from_strs, compose, describe, export_json, import_json,
    match_center, pair_id, reduce, seed_records,
};

fn arc(v: u8) -> Arcana {
    Arcana::new(v).unwrap()
}

/// Test 1: a second fully worked date, every derived point checked.
#[test]
fn reeves_full_matrix() {
    let m = build_matrix_from_str("02.09.1964").unwrap();

    assert_eq!(m.personal.left, arc(2));
    assert_eq!(m.personal.top, arc(9));
    assert_eq!(m.personal.right, arc(20));
    assert_eq!(m.personal.bottom, arc(4));
    assert_eq!(m.personal.center, arc(8));

    assert_eq!(m.ancestral.top_left, arc(11));
    assert_eq!(m.ancestral.top_right, arc(11));
    assert_eq!(m.ancestral.bottom_right, arc(6));
    assert_eq!(m.ancestral.bottom_left, arc(6));

    assert_eq!((m.personal.top_s1, m.personal.top_s2), (arc(8), arc(17)));
    assert_eq!((m.personal.bottom_s1, m.personal.bottom_s2), (arc(16), arc(12)));
    assert_eq!((m.personal.left_s1, m.personal.left_s2), (arc(12), arc(10)));
    assert_eq!((m.personal.right_s1, m.personal.right_s2), (arc(3), arc(10)));

    assert_eq!(m.wellbeing.center, arc(22));
    assert_eq!(m.wellbeing.money, arc(5));
    assert_eq!(m.wellbeing.love, arc(7));

    assert_eq!(m.spheres.horizontal, arc(18));
    assert_eq!(m.spheres.vertical, arc(7));
}

/// Test 2: validated input flows into the builder; bad input never reaches it.
#[test]
fn validation_at_the_boundary() {
    let today = BirthDate::new(2026, 10, 18);
    let date = BirthDate::parse("01.06.1926").unwrap();
    assert!(date.validate(today).is_ok());
    assert_eq!(build_matrix(date).personal.center, arc(5));

    assert!(BirthDate::parse("31.02.1990").unwrap().validate(today).is_err());
    assert!(BirthDate::parse("01.01.1899").unwrap().validate(today).is_err());
}

/// Test 3: every derived value respects the 1..=22 invariant over a century
/// of dates.
#[test]
fn every_point_in_range_for_a_century() {
    for year in 1901..=2025u32 {
        for month in 1..=12u32 {
            for day in [1u32, 9, 19, 28] {
                let m = build_matrix(BirthDate::new(year, month, day));
                for (id, v) in m.points() {
                    assert!(
                        (1..=22).contains(&v.get()),
                        "{} out of range for {year}-{month}-{day}",
                        id.key()
                    );
                }
            }
        }
    }
}

/// Test 4: compatibility is order-independent and lays out like a personal
/// matrix without anchors.
#[test]
fn compatibility_pipeline() {
    let ab = compatibility_from_strs("01.06.1926", "02.09.1964").unwrap();
    let ba = compatibility_from_strs("1964-09-02", "1926-06-01").unwrap();
    assert_eq!(ab, ba);

    let layout = MatrixLayout::place(&ab, 400.0);
    assert_eq!(layout.nodes.len(), 30);
    assert_eq!(
        pair_id(BirthDate::new(1964, 9, 2), BirthDate::new(1926, 6, 1)),
        "1926-06-01_1964-09-02"
    );
}

/// Test 5: tapping a node leads to its detail record.
#[test]
fn tap_to_detail() {
    let m = build_matrix(BirthDate::new(1926, 6, 1));
    let layout = MatrixLayout::place(&m, 360.0);
    let center = layout
        .nodes
        .iter()
        .find(|n| n.point == PointId::PersonalCenter)
        .unwrap();
    let value = layout.value_at(center.x, center.y).unwrap();
    assert_eq!(value, arc(5));
    assert_eq!(describe(value).name, "The Hierophant");
}

/// Test 6: snapshots survive export/import unchanged.
#[test]
fn snapshot_roundtrip_both_kinds() {
    let a = build_matrix(BirthDate::new(1926, 6, 1));
    let b = build_matrix(BirthDate::new(1964, 9, 2));
    for any in [AnyMatrix::Personal(a), AnyMatrix::Compatibility(compose(&a, &b))] {
        let json = export_json(&any).unwrap();
        assert_eq!(import_json(&json).unwrap(), any);
    }
}

/// Test 7: celebrity matching agrees with the builder.
#[test]
fn celebrity_matching_uses_personal_center() {
    let records = seed_records();
    let me = build_matrix(BirthDate::new(1926, 6, 1));
    let matches = match_center(&records, me.main_arcana());
    assert!(!matches.is_empty());
    for r in matches {
        let date = BirthDate::parse(&r.birth_date).unwrap();
        assert_eq!(build_matrix(date).personal.center, me.personal.center);
    }
}

/// Test 8: the two reductions are distinct operations.
#[test]
fn digit_fold_and_ring_wrap_disagree() {
    let x = arc(18);
    assert_eq!(x.ring_add(x), arc(14));
    assert_eq!(reduce(36), arc(9));
}
