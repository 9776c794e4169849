//! Static arena layout. Cosmetic only: props are drawn and shown on the
//! minimap but never collide.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    /// 1 x 4 x 0.2 wall panel.
    Wall,
    /// 1.5 m crate.
    Crate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prop {
    pub kind: PropKind,
    /// Centre of the prop.
    pub position: Vec3,
}

const fn wall(x: f32, z: f32) -> Prop {
    Prop {
        kind: PropKind::Wall,
        position: Vec3::new(x, 2.0, z),
    }
}

const fn crate_at(x: f32, z: f32) -> Prop {
    Prop {
        kind: PropKind::Crate,
        position: Vec3::new(x, 0.75, z),
    }
}

pub static PROPS: [Prop; 28] = [
    // Outer ring
    wall(0.0, -10.0),
    wall(5.0, -10.0),
    wall(-5.0, -10.0),
    wall(10.0, -5.0),
    wall(10.0, 0.0),
    wall(10.0, 5.0),
    wall(-10.0, -5.0),
    wall(-10.0, 0.0),
    wall(-10.0, 5.0),
    wall(0.0, 10.0),
    wall(5.0, 10.0),
    wall(-5.0, 10.0),
    // Inner maze
    wall(3.0, 0.0),
    wall(-3.0, 0.0),
    wall(0.0, 3.0),
    wall(0.0, -3.0),
    wall(6.0, 3.0),
    wall(-6.0, 3.0),
    wall(6.0, -6.0),
    wall(-6.0, -6.0),
    // Crates
    crate_at(4.0, 4.0),
    crate_at(-4.0, 4.0),
    crate_at(4.0, -4.0),
    crate_at(-4.0, -4.0),
    crate_at(7.0, 0.0),
    crate_at(-7.0, 0.0),
    crate_at(0.0, 7.0),
    crate_at(0.0, -7.0),
];
