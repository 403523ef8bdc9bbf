//! Compatibility of two people: a point-by-point ring-wrap merge of their
//! personal matrices.

use serde::{Deserialize, Serialize};

use crate::arcana::Arcana;
use crate::date::{BirthDate, DateError};
use crate::matrix::{
    AncestralSquare, PersonalMatrix, PersonalSquare, Spheres, Wellbeing, build_matrix,
};

/// Wellbeing channel without the anchor points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WellbeingChannel {
    pub center: Arcana,
    pub money: Arcana,
    pub love: Arcana,
}

/// Same groups as a [`PersonalMatrix`], every field merged from two people.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompatibilityMatrix {
    pub personal: PersonalSquare,
    pub ancestral: AncestralSquare,
    pub wellbeing: WellbeingChannel,
    pub spheres: Spheres,
}

impl PersonalSquare {
    fn merge(&self, o: &Self) -> Self {
        Self {
            left: self.left.ring_add(o.left),
            top: self.top.ring_add(o.top),
            right: self.right.ring_add(o.right),
            bottom: self.bottom.ring_add(o.bottom),
            center: self.center.ring_add(o.center),
            top_s1: self.top_s1.ring_add(o.top_s1),
            top_s2: self.top_s2.ring_add(o.top_s2),
            bottom_s1: self.bottom_s1.ring_add(o.bottom_s1),
            bottom_s2: self.bottom_s2.ring_add(o.bottom_s2),
            left_s1: self.left_s1.ring_add(o.left_s1),
            left_s2: self.left_s2.ring_add(o.left_s2),
            right_s1: self.right_s1.ring_add(o.right_s1),
            right_s2: self.right_s2.ring_add(o.right_s2),
        }
    }
}

impl AncestralSquare {
    fn merge(&self, o: &Self) -> Self {
        Self {
            top_left: self.top_left.ring_add(o.top_left),
            top_right: self.top_right.ring_add(o.top_right),
            bottom_right: self.bottom_right.ring_add(o.bottom_right),
            bottom_left: self.bottom_left.ring_add(o.bottom_left),
            top_left_s1: self.top_left_s1.ring_add(o.top_left_s1),
            top_left_s2: self.top_left_s2.ring_add(o.top_left_s2),
            top_right_s1: self.top_right_s1.ring_add(o.top_right_s1),
            top_right_s2: self.top_right_s2.ring_add(o.top_right_s2),
            bottom_right_s1: self.bottom_right_s1.ring_add(o.bottom_right_s1),
            bottom_right_s2: self.bottom_right_s2.ring_add(o.bottom_right_s2),
            bottom_left_s1: self.bottom_left_s1.ring_add(o.bottom_left_s1),
            bottom_left_s2: self.bottom_left_s2.ring_add(o.bottom_left_s2),
        }
    }
}

impl Wellbeing {
    fn merge(&self, o: &Self) -> WellbeingChannel {
        WellbeingChannel {
            center: self.center.ring_add(o.center),
            money: self.money.ring_add(o.money),
            love: self.love.ring_add(o.love),
        }
    }
}

impl Spheres {
    fn merge(&self, o: &Self) -> Self {
        Self {
            horizontal: self.horizontal.ring_add(o.horizontal),
            vertical: self.vertical.ring_add(o.vertical),
        }
    }
}

/// Merge two personal matrices. Commutative: `compose(a, b) == compose(b, a)`.
pub fn compose(a: &PersonalMatrix, b: &PersonalMatrix) -> CompatibilityMatrix {
    CompatibilityMatrix {
        personal: a.personal.merge(&b.personal),
        ancestral: a.ancestral.merge(&b.ancestral),
        wellbeing: a.wellbeing.merge(&b.wellbeing),
        spheres: a.spheres.merge(&b.spheres),
    }
}

/// Build both matrices and merge them.
pub fn compatibility_for_dates(a: BirthDate, b: BirthDate) -> CompatibilityMatrix {
    compose(&build_matrix(a), &build_matrix(b))
}

/// Parse two date strings (ISO or `DD.MM.YYYY`) and merge their matrices.
pub fn compatibility_from_strs(a: &str, b: &str) -> Result<CompatibilityMatrix, DateError> {
    Ok(compatibility_for_dates(
        BirthDate::parse(a)?,
        BirthDate::parse(b)?,
    ))
}

/// Order-independent identity of a pairing: both ISO dates sorted and
/// joined with `_`.
pub fn pair_id(a: BirthDate, b: BirthDate) -> String {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    format!("{}_{}", lo.to_iso(), hi.to_iso())
}
