/// Corner probes and the 4-bit corner code.
///
/// Every collision and contact query samples the actor box at its four
/// corners, (±4, ±4) from the center, and packs the per-corner answers into
/// a code:
///
/// ```text
///   bit 0 (0x1)  top-left       bit 1 (0x2)  top-right
///   bit 2 (0x4)  bottom-left    bit 3 (0x8)  bottom-right
/// ```
///
/// ## Truth table (solid pass)
///
/// | code | corners set     | contact            | resolution                         |
/// |------|-----------------|--------------------|------------------------------------|
/// | 0x0  | none            | Clear              | none                               |
/// | 0x1  | TL              | Convex(TopLeft)    | smaller of push right / push down  |
/// | 0x2  | TR              | Convex(TopRight)   | smaller of push left / push down   |
/// | 0x3  | TL TR           | Edge(Top)          | push down                          |
/// | 0x4  | BL              | Convex(BottomLeft) | smaller of push right / push up    |
/// | 0x5  | TL BL           | Edge(Left)         | push right                         |
/// | 0x6  | TR BL           | Diagonal           | none                               |
/// | 0x7  | TL TR BL        | Concave(TopLeft)   | push right and down                |
/// | 0x8  | BR              | Convex(BottomRight)| smaller of push left / push up     |
/// | 0x9  | TL BR           | Diagonal           | none                               |
/// | 0xa  | TR BR           | Edge(Right)        | push left                          |
/// | 0xb  | TL TR BR        | Concave(TopRight)  | push left and down                 |
/// | 0xc  | BL BR           | Edge(Bottom)       | push up                            |
/// | 0xd  | TL BL BR        | Concave(BottomLeft)| push right and up                  |
/// | 0xe  | TR BL BR        | Concave(BottomRight)| push left and up                  |
/// | 0xf  | all             | Trapped            | nudge +1 px on x                   |
///
/// Concave contacts are named after the inner corner of the L shape.

use super::entity::Vec2;

/// Actor half-extent in pixels (the box is 8×8).
pub const HALF_EXTENT: f32 = 4.0;

/// Subpixel margin kept between a resolved box edge and the grid line.
pub const SLOP: f32 = 1.0 / 16.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Corner {
    TopLeft = 0x1,
    TopRight = 0x2,
    BottomLeft = 0x4,
    BottomRight = 0x8,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn bit(self) -> u8 {
        self as u8
    }

    /// Offset of this corner from the box center.
    pub fn offset(self) -> Vec2 {
        match self {
            Corner::TopLeft => Vec2::new(-HALF_EXTENT, HALF_EXTENT),
            Corner::TopRight => Vec2::new(HALF_EXTENT, HALF_EXTENT),
            Corner::BottomLeft => Vec2::new(-HALF_EXTENT, -HALF_EXTENT),
            Corner::BottomRight => Vec2::new(HALF_EXTENT, -HALF_EXTENT),
        }
    }

    /// World-space probe point for a box centered at `center`.
    pub fn probe(self, center: Vec2) -> Vec2 {
        center + self.offset()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// Classification of a corner code, see the module table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Contact {
    Clear,
    Edge(Side),
    Convex(Corner),
    Concave(Corner),
    Diagonal,
    Trapped,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CornerCode(u8);

impl CornerCode {
    pub const NONE: CornerCode = CornerCode(0x0);
    pub const TOP: CornerCode = CornerCode(0x3);
    pub const LEFT: CornerCode = CornerCode(0x5);
    pub const RIGHT: CornerCode = CornerCode(0xa);
    pub const BOTTOM: CornerCode = CornerCode(0xc);
    pub const ALL: CornerCode = CornerCode(0xf);

    pub const fn from_bits(bits: u8) -> Self {
        CornerCode(bits & 0xf)
    }

    /// Build a code by asking `hit` about each corner.
    pub fn probe(mut hit: impl FnMut(Corner) -> bool) -> Self {
        let bits = Corner::ALL
            .iter()
            .filter(|&&c| hit(c))
            .fold(0u8, |acc, c| acc | c.bit());
        CornerCode(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Is this code one of `codes`?
    pub fn is_any(self, codes: &[CornerCode]) -> bool {
        codes.contains(&self)
    }

    pub fn contact(self) -> Contact {
        match self {
            CornerCode::NONE => Contact::Clear,
            CornerCode::TOP => Contact::Edge(Side::Top),
            CornerCode::LEFT => Contact::Edge(Side::Left),
            CornerCode::RIGHT => Contact::Edge(Side::Right),
            CornerCode::BOTTOM => Contact::Edge(Side::Bottom),
            CornerCode::ALL => Contact::Trapped,
            CornerCode(0x1) => Contact::Convex(Corner::TopLeft),
            CornerCode(0x2) => Contact::Convex(Corner::TopRight),
            CornerCode(0x4) => Contact::Convex(Corner::BottomLeft),
            CornerCode(0x8) => Contact::Convex(Corner::BottomRight),
            CornerCode(0x7) => Contact::Concave(Corner::TopLeft),
            CornerCode(0xb) => Contact::Concave(Corner::TopRight),
            CornerCode(0xd) => Contact::Concave(Corner::BottomLeft),
            CornerCode(0xe) => Contact::Concave(Corner::BottomRight),
            _ => Contact::Diagonal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_packs_bits_per_corner() {
        let code = CornerCode::probe(|c| matches!(c, Corner::BottomLeft | Corner::BottomRight));
        assert_eq!(code, CornerCode::BOTTOM);
        assert_eq!(code.bits(), 0xc);
        assert!(code.is_any(&[CornerCode::TOP, CornerCode::BOTTOM]));
        assert!(!code.is_any(&[CornerCode::LEFT]));
    }

    #[test]
    fn corner_offsets_are_fixed() {
        let c = Vec2::new(40.0, 70.0);
        assert_eq!(Corner::TopLeft.probe(c), Vec2::new(36.0, 74.0));
        assert_eq!(Corner::TopRight.probe(c), Vec2::new(44.0, 74.0));
        assert_eq!(Corner::BottomLeft.probe(c), Vec2::new(36.0, 66.0));
        assert_eq!(Corner::BottomRight.probe(c), Vec2::new(44.0, 66.0));
    }

    #[test]
    fn every_code_has_exactly_one_contact() {
        let mut edges = 0;
        let mut convex = 0;
        let mut concave = 0;
        let mut other = 0;
        for bits in 0..16u8 {
            match CornerCode::from_bits(bits).contact() {
                Contact::Edge(_) => edges += 1,
                Contact::Convex(_) => convex += 1,
                Contact::Concave(_) => concave += 1,
                Contact::Clear | Contact::Diagonal | Contact::Trapped => other += 1,
            }
        }
        assert_eq!((edges, convex, concave, other), (4, 4, 4, 4));
    }

    #[test]
    fn concave_is_named_by_inner_corner() {
        // Inner corner = the one whose two neighbors are both set.
        assert_eq!(CornerCode::from_bits(0x7).contact(), Contact::Concave(Corner::TopLeft));
        assert_eq!(CornerCode::from_bits(0xb).contact(), Contact::Concave(Corner::TopRight));
        assert_eq!(CornerCode::from_bits(0xd).contact(), Contact::Concave(Corner::BottomLeft));
        assert_eq!(CornerCode::from_bits(0xe).contact(), Contact::Concave(Corner::BottomRight));
    }

    #[test]
    fn diagonals_and_trapped() {
        assert_eq!(CornerCode::from_bits(0x6).contact(), Contact::Diagonal);
        assert_eq!(CornerCode::from_bits(0x9).contact(), Contact::Diagonal);
        assert_eq!(CornerCode::ALL.contact(), Contact::Trapped);
        assert_eq!(CornerCode::NONE.contact(), Contact::Clear);
    }
}
