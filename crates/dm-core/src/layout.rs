//! Fixed geometric layout of the diagram.
//!
//! Coordinates live on a unit canvas with the centre at (0.5, 0.5): an outer
//! circle of radius R holds the personal corners on the axes and the
//! ancestral corners on the diagonals; satellites sit at K1·R and K2·R.
//! [`MatrixLayout::place`] scales the table to a concrete canvas and attaches
//! the values; [`MatrixLayout::hit`] maps a tap back to a value.

use std::sync::LazyLock;

use serde::Serialize;

use crate::arcana::Arcana;
use crate::constants::{AGE_LABEL_OFFSET, DIAGONAL_FACTOR, K_SPHERE, K1, K2, OUTER_RADIUS};
use crate::point::{MatrixView, PointId};

const C: f64 = 0.5;
const R: f64 = OUTER_RADIUS;
const D: f64 = OUTER_RADIUS * DIAGONAL_FACTOR;

/// Node radii are authored against a 400-unit canvas.
const REFERENCE_SIZE: f64 = 400.0;

/// Colour class of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Chakra {
    Purple,
    Blue,
    Sky,
    Green,
    Yellow,
    Orange,
    Red,
    Black,
}

/// Legend row: colour, energy centre name, life task.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ChakraInfo {
    pub chakra: Chakra,
    pub name: &'static str,
    pub task: &'static str,
}

const fn legend(chakra: Chakra, name: &'static str, task: &'static str) -> ChakraInfo {
    ChakraInfo { chakra, name, task }
}

pub const CHAKRA_LEGEND: [ChakraInfo; 7] = [
    legend(Chakra::Purple, "Sahasrara", "Spirituality and purpose"),
    legend(Chakra::Blue, "Ajna", "Intuition and awareness"),
    legend(Chakra::Sky, "Vishuddha", "Creativity and self-expression"),
    legend(Chakra::Green, "Anahata", "Love and an open heart"),
    legend(Chakra::Yellow, "Manipura", "Will, achievement and money"),
    legend(Chakra::Orange, "Svadhisthana", "Energy and joy of life"),
    legend(Chakra::Red, "Muladhara", "Health and basic support"),
];

impl Chakra {
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Purple => "#d9bafa",
            Self::Blue => "#69abfc",
            Self::Sky => "#bae6fd",
            Self::Green => "#a4e4ba",
            Self::Yellow => "#fef08a",
            Self::Orange => "#fcd7ac",
            Self::Red => "#f9b5b5",
            Self::Black => "#333333",
        }
    }
}

/// One row of the layout table, in unit coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NodeSpec {
    pub point: PointId,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub chakra: Chakra,
    pub filled: bool,
}

fn node(point: PointId, x: f64, y: f64, r_ref: f64, chakra: Chakra, filled: bool) -> NodeSpec {
    NodeSpec {
        point,
        x,
        y,
        radius: r_ref / REFERENCE_SIZE,
        chakra,
        filled,
    }
}

/// Draw order: ancestral square, personal square, spheres, wellbeing, centre.
/// Later rows paint over earlier ones.
static LAYOUT: LazyLock<Vec<NodeSpec>> = LazyLock::new(|| {
    use Chakra::*;
    use PointId::*;

    let mut t = Vec::with_capacity(30);

    // Ancestral corners and their satellites along the diagonals.
    for (corner, s1, s2, sx, sy) in [
        (
            AncestralTopLeft,
            AncestralTopLeftS1,
            AncestralTopLeftS2,
            -1.0,
            -1.0,
        ),
        (
            AncestralTopRight,
            AncestralTopRightS1,
            AncestralTopRightS2,
            1.0,
            -1.0,
        ),
        (
            AncestralBottomRight,
            AncestralBottomRightS1,
            AncestralBottomRightS2,
            1.0,
            1.0,
        ),
        (
            AncestralBottomLeft,
            AncestralBottomLeftS1,
            AncestralBottomLeftS2,
            -1.0,
            1.0,
        ),
    ] {
        t.push(node(corner, C + sx * D, C + sy * D, 15.0, Black, false));
        t.push(node(s1, C + sx * D * K1, C + sy * D * K1, 10.0, Black, false));
        t.push(node(s2, C + sx * D * K2, C + sy * D * K2, 10.0, Black, false));
    }

    // Personal corners and satellites along the axes.
    const UPPER: [(Chakra, bool); 3] = [(Purple, true), (Blue, true), (Sky, true)];
    const LOWER: [(Chakra, bool); 3] = [(Red, true), (Black, false), (Orange, true)];
    for (corner, s1, s2, dx, dy, colors) in [
        (PersonalTop, PersonalTopS1, PersonalTopS2, 0.0, -1.0, UPPER),
        (PersonalLeft, PersonalLeftS1, PersonalLeftS2, -1.0, 0.0, UPPER),
        (PersonalBottom, PersonalBottomS1, PersonalBottomS2, 0.0, 1.0, LOWER),
        (PersonalRight, PersonalRightS1, PersonalRightS2, 1.0, 0.0, LOWER),
    ] {
        let [(c0, f0), (c1, f1), (c2, f2)] = colors;
        t.push(node(corner, C + dx * R, C + dy * R, 18.0, c0, f0));
        t.push(node(s1, C + dx * R * K1, C + dy * R * K1, 13.0, c1, f1));
        t.push(node(s2, C + dx * R * K2, C + dy * R * K2, 13.0, c2, f2));
    }

    t.push(node(SphereHorizontal, C - R * K_SPHERE, C, 7.0, Green, true));
    t.push(node(SphereVertical, C, C - R * K_SPHERE, 7.0, Green, true));

    // Wellbeing nodes sit on the segment from rightS2 to bottomS2.
    let s2_right_x = C + R * K2;
    let s2_bottom_y = C + R * K2;
    let mid = ((C + s2_right_x) / 2.0, (s2_bottom_y + C) / 2.0);
    let money = ((mid.0 + s2_right_x) / 2.0, (mid.1 + C) / 2.0);
    let love = ((mid.0 + C) / 2.0, (mid.1 + s2_bottom_y) / 2.0);
    t.push(node(WellbeingCenter, mid.0, mid.1, 7.0, Black, false));
    t.push(node(WellbeingMoney, money.0, money.1, 7.0, Black, false));
    t.push(node(WellbeingLove, love.0, love.1, 7.0, Black, false));

    t.push(node(PersonalCenter, C, C, 22.0, Yellow, true));
    t
});

/// The full layout table in draw order.
pub fn layout_table() -> &'static [NodeSpec] {
    &LAYOUT
}

pub fn spec_for(point: PointId) -> Option<&'static NodeSpec> {
    LAYOUT.iter().find(|n| n.point == point)
}

/// A node scaled to a canvas, carrying its value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PlacedNode {
    pub point: PointId,
    pub key: &'static str,
    pub value: Arcana,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub chakra: Chakra,
    pub filled: bool,
}

impl PlacedNode {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct AgeLabel {
    pub age: u32,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct MatrixLayout {
    pub size: f64,
    pub nodes: Vec<PlacedNode>,
    pub age_labels: Vec<AgeLabel>,
}

impl MatrixLayout {
    /// Place every drawable point of `matrix` on a `size` × `size` canvas.
    pub fn place(matrix: &impl MatrixView, size: f64) -> Self {
        let nodes = LAYOUT
            .iter()
            .filter_map(|spec| {
                matrix.point(spec.point).map(|value| PlacedNode {
                    point: spec.point,
                    key: spec.point.key(),
                    value,
                    x: spec.x * size,
                    y: spec.y * size,
                    radius: spec.radius * size,
                    chakra: spec.chakra,
                    filled: spec.filled,
                })
            })
            .collect();
        Self {
            size,
            nodes,
            age_labels: age_labels(size),
        }
    }

    /// Top-most node under the tap, if any.
    pub fn hit(&self, x: f64, y: f64) -> Option<&PlacedNode> {
        self.nodes.iter().rev().find(|n| n.contains(x, y))
    }

    /// Value under the tap, for the detail lookup.
    pub fn value_at(&self, x: f64, y: f64) -> Option<Arcana> {
        self.hit(x, y).map(|n| n.value)
    }
}

/// Age markers every ten years, clockwise from the left corner (age 0),
/// pushed outward past the outer circle.
pub fn age_labels(size: f64) -> Vec<AgeLabel> {
    let anchors = [
        (-R, 0.0),
        (-D, -D),
        (0.0, -R),
        (D, -D),
        (R, 0.0),
        (D, D),
        (0.0, R),
        (-D, D),
    ];
    anchors
        .iter()
        .enumerate()
        .map(|(i, &(dx, dy))| {
            let angle = dy.atan2(dx);
            AgeLabel {
                age: i as u32 * 10,
                x: (C + dx + angle.cos() * AGE_LABEL_OFFSET) * size,
                y: (C + dy + angle.sin() * AGE_LABEL_OFFSET) * size,
            }
        })
        .collect()
}
