use serde::{Deserialize, Serialize};

use crate::arcana::{Arcana, reduce, reduce_sum};
use crate::date::{BirthDate, DateError};

/// The two concentric points between a corner and the shared centre.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Satellites {
    pub s1: Arcana,
    pub s2: Arcana,
}

impl Satellites {
    /// `s2 = reduce(corner + center)`, then `s1 = reduce(corner + s2)`.
    /// s1 hangs off s2, not off the centre.
    pub fn derive(corner: Arcana, center: Arcana) -> Self {
        let s2 = reduce_sum(&[corner, center]);
        let s1 = reduce_sum(&[corner, s2]);
        Self { s1, s2 }
    }
}

/// Personal square: four corners from the date, the centre, and the
/// satellites on each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalSquare {
    pub left: Arcana,
    pub top: Arcana,
    pub right: Arcana,
    pub bottom: Arcana,
    pub center: Arcana,
    pub top_s1: Arcana,
    pub top_s2: Arcana,
    pub bottom_s1: Arcana,
    pub bottom_s2: Arcana,
    pub left_s1: Arcana,
    pub left_s2: Arcana,
    pub right_s1: Arcana,
    pub right_s2: Arcana,
}

/// Ancestral square: the rotated square built from adjacent personal corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AncestralSquare {
    pub top_left: Arcana,
    pub top_right: Arcana,
    pub bottom_right: Arcana,
    pub bottom_left: Arcana,
    pub top_left_s1: Arcana,
    pub top_left_s2: Arcana,
    pub top_right_s1: Arcana,
    pub top_right_s2: Arcana,
    pub bottom_right_s1: Arcana,
    pub bottom_right_s2: Arcana,
    pub bottom_left_s1: Arcana,
    pub bottom_left_s2: Arcana,
}

/// Wellbeing channel of a personal matrix, with the two anchor points it
/// was derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wellbeing {
    pub center: Arcana,
    pub money: Arcana,
    pub love: Arcana,
    /// `bottomS2`
    #[serde(rename = "pAy")]
    pub point_a: Arcana,
    /// `rightS2`
    #[serde(rename = "pBx")]
    pub point_b: Arcana,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spheres {
    pub horizontal: Arcana,
    pub vertical: Arcana,
}

/// Immutable snapshot of every point derived from one birth date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonalMatrix {
    pub personal: PersonalSquare,
    pub ancestral: AncestralSquare,
    pub wellbeing: Wellbeing,
    pub spheres: Spheres,
}

/// Derive the full matrix for a date.
///
/// No validation happens here: any three integers give a structurally valid
/// matrix. Use [`BirthDate::validate`] at the boundary.
pub fn build_matrix(date: BirthDate) -> PersonalMatrix {
    // Personal corners. The year is reduced whole, never cut to two digits.
    let left = reduce(date.day as u64);
    let top = reduce(date.month as u64);
    let right = reduce(date.year as u64);
    let bottom = reduce_sum(&[left, top, right]);
    let center = reduce_sum(&[left, top, right, bottom]);

    // Ancestral corners pair adjacent personal corners.
    let top_left = reduce_sum(&[left, top]);
    let top_right = reduce_sum(&[top, right]);
    let bottom_right = reduce_sum(&[right, bottom]);
    let bottom_left = reduce_sum(&[bottom, left]);

    let t = Satellites::derive(top, center);
    let b = Satellites::derive(bottom, center);
    let l = Satellites::derive(left, center);
    let r = Satellites::derive(right, center);

    let tl = Satellites::derive(top_left, center);
    let tr = Satellites::derive(top_right, center);
    let br = Satellites::derive(bottom_right, center);
    let bl = Satellites::derive(bottom_left, center);

    // Money pairs with B, love with A.
    let point_a = b.s2;
    let point_b = r.s2;
    let channel_center = reduce_sum(&[point_a, point_b]);
    let money = reduce_sum(&[channel_center, point_b]);
    let love = reduce_sum(&[channel_center, point_a]);

    PersonalMatrix {
        personal: PersonalSquare {
            left,
            top,
            right,
            bottom,
            center,
            top_s1: t.s1,
            top_s2: t.s2,
            bottom_s1: b.s1,
            bottom_s2: b.s2,
            left_s1: l.s1,
            left_s2: l.s2,
            right_s1: r.s1,
            right_s2: r.s2,
        },
        ancestral: AncestralSquare {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
            top_left_s1: tl.s1,
            top_left_s2: tl.s2,
            top_right_s1: tr.s1,
            top_right_s2: tr.s2,
            bottom_right_s1: br.s1,
            bottom_right_s2: br.s2,
            bottom_left_s1: bl.s1,
            bottom_left_s2: bl.s2,
        },
        wellbeing: Wellbeing {
            center: channel_center,
            money,
            love,
            point_a,
            point_b,
        },
        spheres: Spheres {
            horizontal: reduce_sum(&[l.s2, center]),
            vertical: reduce_sum(&[t.s2, center]),
        },
    }
}

/// Parse a date string (ISO or `DD.MM.YYYY`) and build its matrix.
/// Only the shape of the string is checked, not the calendar.
pub fn build_matrix_from_str(date: &str) -> Result<PersonalMatrix, DateError> {
    BirthDate::parse(date).map(build_matrix)
}

impl PersonalMatrix {
    /// The headline value used for celebrity matching.
    pub fn main_arcana(&self) -> Arcana {
        self.personal.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc(v: u8) -> Arcana {
        Arcana::new(v).unwrap()
    }

    fn monroe() -> PersonalMatrix {
        build_matrix(BirthDate::new(1926, 6, 1))
    }

    #[test]
    fn test_personal_corners() {
        let m = monroe();
        assert_eq!(m.personal.left, arc(1));
        assert_eq!(m.personal.top, arc(6));
        assert_eq!(m.personal.right, arc(18));
        assert_eq!(m.personal.bottom, arc(7));
        assert_eq!(m.personal.center, arc(5));
    }

    #[test]
    fn test_ancestral_uses_adjacent_corners() {
        let m = monroe();
        assert_eq!(m.ancestral.top_left, arc(7)); // 1 + 6
        assert_eq!(m.ancestral.top_right, arc(6)); // 6 + 18 = 24 -> 6
        assert_eq!(m.ancestral.bottom_right, arc(7)); // 18 + 7 = 25 -> 7
        assert_eq!(m.ancestral.bottom_left, arc(8)); // 7 + 1
        // a left+bottom pairing would also give 8, but left+right (opposite) gives 19
        assert_ne!(m.ancestral.top_left, reduce(1 + 18));
    }

    #[test]
    fn test_satellite_chain() {
        let m = monroe();
        // top: s2 = 6 + 5 = 11, s1 = 6 + 11 = 17
        assert_eq!(m.personal.top_s2, arc(11));
        assert_eq!(m.personal.top_s1, arc(17));
        // right: s2 = 18 + 5 = 23 -> 5, s1 = 18 + 5 = 23 -> 5
        assert_eq!(m.personal.right_s2, arc(5));
        assert_eq!(m.personal.right_s1, arc(5));
        // bottom: s2 = 7 + 5 = 12, s1 = 7 + 12 = 19
        assert_eq!(m.personal.bottom_s2, arc(12));
        assert_eq!(m.personal.bottom_s1, arc(19));
        // left: s2 = 1 + 5 = 6, s1 = 1 + 6 = 7
        assert_eq!(m.personal.left_s2, arc(6));
        assert_eq!(m.personal.left_s1, arc(7));
    }

    #[test]
    fn test_ancestral_satellites() {
        let m = monroe();
        // top_left 7: s2 = 12, s1 = 19
        assert_eq!(m.ancestral.top_left_s2, arc(12));
        assert_eq!(m.ancestral.top_left_s1, arc(19));
        // bottom_left 8: s2 = 13, s1 = 21
        assert_eq!(m.ancestral.bottom_left_s2, arc(13));
        assert_eq!(m.ancestral.bottom_left_s1, arc(21));
    }

    #[test]
    fn test_wellbeing_channel() {
        let m = monroe();
        // A = bottomS2 = 12, B = rightS2 = 5
        assert_eq!(m.wellbeing.point_a, arc(12));
        assert_eq!(m.wellbeing.point_b, arc(5));
        assert_eq!(m.wellbeing.center, arc(17));
        assert_eq!(m.wellbeing.money, arc(22)); // 17 + 5
        assert_eq!(m.wellbeing.love, arc(11)); // 17 + 12 = 29 -> 11
    }

    #[test]
    fn test_spheres() {
        let m = monroe();
        assert_eq!(m.spheres.horizontal, arc(11)); // leftS2 6 + 5
        assert_eq!(m.spheres.vertical, arc(16)); // topS2 11 + 5
    }

    #[test]
    fn test_deterministic() {
        let a = monroe();
        let b = monroe();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_invalid_date_still_builds() {
        let m = build_matrix(BirthDate::new(0, 0, 0));
        assert_eq!(m.personal.left, Arcana::MAX);
        assert_eq!(m.personal.top, Arcana::MAX);
        assert_eq!(m.personal.right, Arcana::MAX);
    }

    #[test]
    fn test_from_str_accepts_both_formats() {
        let iso = build_matrix_from_str("1926-06-01").unwrap();
        let dotted = build_matrix_from_str("01.06.1926").unwrap();
        assert_eq!(iso, dotted);
        assert!(build_matrix_from_str("June 1st").is_err());
        assert!(build_matrix_from_str("\u{661}\u{662}.06.1926").is_err());
    }

    #[test]
    fn test_main_arcana_is_center() {
        assert_eq!(monroe().main_arcana(), arc(5));
    }

    #[test]
    fn test_camel_case_field_names() {
        let json = serde_json::to_value(monroe()).unwrap();
        assert_eq!(json["personal"]["topS1"], 17);
        assert_eq!(json["ancestral"]["bottomLeftS2"], 13);
        assert_eq!(json["wellbeing"]["pAy"], 12);
        assert_eq!(json["wellbeing"]["pBx"], 5);
        assert_eq!(json["spheres"]["vertical"], 16);
    }
}
