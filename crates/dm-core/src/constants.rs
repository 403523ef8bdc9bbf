/// Smallest arcana value on the 1..=22 ring.
pub const ARCANA_MIN: u8 = 1;

/// Largest arcana value; also the image of zero under digit reduction.
pub const ARCANA_MAX: u8 = 22;

/// Earliest accepted birth year (exclusive) for validated input.
pub const MIN_BIRTH_YEAR: u32 = 1900;

// --- Layout geometry (unit canvas, centre at 0.5) ---

/// Outer circle radius as a fraction of the canvas side.
pub const OUTER_RADIUS: f64 = 0.32;

/// Diagonal offset of the ancestral corners: R · cos(45°), rounded as drawn.
pub const DIAGONAL_FACTOR: f64 = 0.707;

/// Radial position of the first satellite ring (S1).
pub const K1: f64 = 0.74;

/// Radial position of the second satellite ring (S2).
pub const K2: f64 = 0.52;

/// Radial position of the life-sphere nodes: K2 · 0.56
pub const K_SPHERE: f64 = K2 * 0.56;

/// Distance of an age label beyond its outer node, as a fraction of the canvas.
pub const AGE_LABEL_OFFSET: f64 = 0.0625;
