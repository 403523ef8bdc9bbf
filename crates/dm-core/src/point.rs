//! Stable names for every point on the diagram.
//!
//! Keys follow the snapshot field names (`"personal.topS1"`), so the layout
//! table and any consumer can address a value without knowing which matrix
//! type it came from.

use serde::{Deserialize, Serialize};

use crate::arcana::Arcana;
use crate::compatibility::CompatibilityMatrix;
use crate::matrix::PersonalMatrix;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PointId {
    PersonalLeft,
    PersonalTop,
    PersonalRight,
    PersonalBottom,
    PersonalCenter,
    PersonalTopS1,
    PersonalTopS2,
    PersonalBottomS1,
    PersonalBottomS2,
    PersonalLeftS1,
    PersonalLeftS2,
    PersonalRightS1,
    PersonalRightS2,
    AncestralTopLeft,
    AncestralTopRight,
    AncestralBottomRight,
    AncestralBottomLeft,
    AncestralTopLeftS1,
    AncestralTopLeftS2,
    AncestralTopRightS1,
    AncestralTopRightS2,
    AncestralBottomRightS1,
    AncestralBottomRightS2,
    AncestralBottomLeftS1,
    AncestralBottomLeftS2,
    WellbeingCenter,
    WellbeingMoney,
    WellbeingLove,
    WellbeingPointA,
    WellbeingPointB,
    SphereHorizontal,
    SphereVertical,
}

impl PointId {
    pub const ALL: [PointId; 32] = [
        PointId::PersonalLeft,
        PointId::PersonalTop,
        PointId::PersonalRight,
        PointId::PersonalBottom,
        PointId::PersonalCenter,
        PointId::PersonalTopS1,
        PointId::PersonalTopS2,
        PointId::PersonalBottomS1,
        PointId::PersonalBottomS2,
        PointId::PersonalLeftS1,
        PointId::PersonalLeftS2,
        PointId::PersonalRightS1,
        PointId::PersonalRightS2,
        PointId::AncestralTopLeft,
        PointId::AncestralTopRight,
        PointId::AncestralBottomRight,
        PointId::AncestralBottomLeft,
        PointId::AncestralTopLeftS1,
        PointId::AncestralTopLeftS2,
        PointId::AncestralTopRightS1,
        PointId::AncestralTopRightS2,
        PointId::AncestralBottomRightS1,
        PointId::AncestralBottomRightS2,
        PointId::AncestralBottomLeftS1,
        PointId::AncestralBottomLeftS2,
        PointId::WellbeingCenter,
        PointId::WellbeingMoney,
        PointId::WellbeingLove,
        PointId::WellbeingPointA,
        PointId::WellbeingPointB,
        PointId::SphereHorizontal,
        PointId::SphereVertical,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::PersonalLeft => "personal.left",
            Self::PersonalTop => "personal.top",
            Self::PersonalRight => "personal.right",
            Self::PersonalBottom => "personal.bottom",
            Self::PersonalCenter => "personal.center",
            Self::PersonalTopS1 => "personal.topS1",
            Self::PersonalTopS2 => "personal.topS2",
            Self::PersonalBottomS1 => "personal.bottomS1",
            Self::PersonalBottomS2 => "personal.bottomS2",
            Self::PersonalLeftS1 => "personal.leftS1",
            Self::PersonalLeftS2 => "personal.leftS2",
            Self::PersonalRightS1 => "personal.rightS1",
            Self::PersonalRightS2 => "personal.rightS2",
            Self::AncestralTopLeft => "ancestral.topLeft",
            Self::AncestralTopRight => "ancestral.topRight",
            Self::AncestralBottomRight => "ancestral.bottomRight",
            Self::AncestralBottomLeft => "ancestral.bottomLeft",
            Self::AncestralTopLeftS1 => "ancestral.topLeftS1",
            Self::AncestralTopLeftS2 => "ancestral.topLeftS2",
            Self::AncestralTopRightS1 => "ancestral.topRightS1",
            Self::AncestralTopRightS2 => "ancestral.topRightS2",
            Self::AncestralBottomRightS1 => "ancestral.bottomRightS1",
            Self::AncestralBottomRightS2 => "ancestral.bottomRightS2",
            Self::AncestralBottomLeftS1 => "ancestral.bottomLeftS1",
            Self::AncestralBottomLeftS2 => "ancestral.bottomLeftS2",
            Self::WellbeingCenter => "wellbeing.center",
            Self::WellbeingMoney => "wellbeing.money",
            Self::WellbeingLove => "wellbeing.love",
            Self::WellbeingPointA => "wellbeing.pAy",
            Self::WellbeingPointB => "wellbeing.pBx",
            Self::SphereHorizontal => "spheres.horizontal",
            Self::SphereVertical => "spheres.vertical",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.key() == key)
    }

    /// Anchors feed the wellbeing channel but are not drawn.
    pub fn is_anchor(&self) -> bool {
        matches!(self, Self::WellbeingPointA | Self::WellbeingPointB)
    }
}

/// Read access to a matrix by point name.
pub trait MatrixView {
    /// `None` when this matrix kind does not carry the point.
    fn point(&self, id: PointId) -> Option<Arcana>;

    /// Every present point, in [`PointId::ALL`] order.
    fn points(&self) -> Vec<(PointId, Arcana)> {
        PointId::ALL
            .iter()
            .filter_map(|&id| self.point(id).map(|v| (id, v)))
            .collect()
    }
}

macro_rules! shared_points {
    ($m:expr, $id:expr) => {
        match $id {
            PointId::PersonalLeft => Some($m.personal.left),
            PointId::PersonalTop => Some($m.personal.top),
            PointId::PersonalRight => Some($m.personal.right),
            PointId::PersonalBottom => Some($m.personal.bottom),
            PointId::PersonalCenter => Some($m.personal.center),
            PointId::PersonalTopS1 => Some($m.personal.top_s1),
            PointId::PersonalTopS2 => Some($m.personal.top_s2),
            PointId::PersonalBottomS1 => Some($m.personal.bottom_s1),
            PointId::PersonalBottomS2 => Some($m.personal.bottom_s2),
            PointId::PersonalLeftS1 => Some($m.personal.left_s1),
            PointId::PersonalLeftS2 => Some($m.personal.left_s2),
            PointId::PersonalRightS1 => Some($m.personal.right_s1),
            PointId::PersonalRightS2 => Some($m.personal.right_s2),
            PointId::AncestralTopLeft => Some($m.ancestral.top_left),
            PointId::AncestralTopRight => Some($m.ancestral.top_right),
            PointId::AncestralBottomRight => Some($m.ancestral.bottom_right),
            PointId::AncestralBottomLeft => Some($m.ancestral.bottom_left),
            PointId::AncestralTopLeftS1 => Some($m.ancestral.top_left_s1),
            PointId::AncestralTopLeftS2 => Some($m.ancestral.top_left_s2),
            PointId::AncestralTopRightS1 => Some($m.ancestral.top_right_s1),
            PointId::AncestralTopRightS2 => Some($m.ancestral.top_right_s2),
            PointId::AncestralBottomRightS1 => Some($m.ancestral.bottom_right_s1),
            PointId::AncestralBottomRightS2 => Some($m.ancestral.bottom_right_s2),
            PointId::AncestralBottomLeftS1 => Some($m.ancestral.bottom_left_s1),
            PointId::AncestralBottomLeftS2 => Some($m.ancestral.bottom_left_s2),
            PointId::WellbeingCenter => Some($m.wellbeing.center),
            PointId::WellbeingMoney => Some($m.wellbeing.money),
            PointId::WellbeingLove => Some($m.wellbeing.love),
            PointId::SphereHorizontal => Some($m.spheres.horizontal),
            PointId::SphereVertical => Some($m.spheres.vertical),
            PointId::WellbeingPointA | PointId::WellbeingPointB => None,
        }
    };
}

impl MatrixView for PersonalMatrix {
    fn point(&self, id: PointId) -> Option<Arcana> {
        match id {
            PointId::WellbeingPointA => Some(self.wellbeing.point_a),
            PointId::WellbeingPointB => Some(self.wellbeing.point_b),
            _ => shared_points!(self, id),
        }
    }
}

impl MatrixView for CompatibilityMatrix {
    fn point(&self, id: PointId) -> Option<Arcana> {
        shared_points!(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compatibility::compose;
    use crate::date::BirthDate;
    use crate::matrix::build_matrix;
    use std::collections::HashSet;

    #[test]
    fn test_keys_unique_and_roundtrip() {
        let keys: HashSet<&str> = PointId::ALL.iter().map(|p| p.key()).collect();
        assert_eq!(keys.len(), PointId::ALL.len());
        for p in PointId::ALL {
            assert_eq!(PointId::from_key(p.key()), Some(p));
        }
        assert_eq!(PointId::from_key("personal.nowhere"), None);
    }

    #[test]
    fn test_keys_match_snapshot_fields() {
        let m = build_matrix(BirthDate::new(1926, 6, 1));
        let json = serde_json::to_value(m).unwrap();
        for (id, value) in m.points() {
            let (group, field) = id.key().split_once('.').unwrap();
            assert_eq!(
                json[group][field], value.get(),
                "snapshot field {} disagrees",
                id.key()
            );
        }
    }

    #[test]
    fn test_personal_matrix_has_all_points() {
        let m = build_matrix(BirthDate::new(1964, 9, 2));
        assert_eq!(m.points().len(), 32);
        assert_eq!(m.point(PointId::PersonalCenter), Some(m.personal.center));
    }

    #[test]
    fn test_compatibility_matrix_has_no_anchors() {
        let a = build_matrix(BirthDate::new(1964, 9, 2));
        let b = build_matrix(BirthDate::new(1975, 6, 4));
        let c = compose(&a, &b);
        assert_eq!(c.point(PointId::WellbeingPointA), None);
        assert_eq!(c.points().len(), 30);
        assert!(c.points().iter().all(|(id, _)| !id.is_anchor()));
    }
}
