//! Actor-to-actor overlap testing
//!
//! Axis-aligned boxes with strict inequalities on all four edges, so actors
//! that merely share an edge do not collide.

use glam::Vec2;

/// Do two AABBs `[a_pos, a_pos + a_size]` and `[b_pos, b_pos + b_size]`
/// overlap with positive area?
#[inline]
pub fn overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x + a_size.x > b_pos.x
        && a_pos.x < b_pos.x + b_size.x
        && a_pos.y + a_size.y > b_pos.y
        && a_pos.y < b_pos.y + b_size.y
}
