//! Render adapter surface
//!
//! The simulation exposes exactly what a renderer needs: the tile grid, the
//! actor list with positions, sizes, variant tags (and the star's blur), and
//! the status. The text renderer here is the reference consumer; a real
//! display would read the same surface.

use crate::sim::{Actor, ActorKind, GameState, Status, TileKind};

/// One actor as a renderer sees it
#[derive(Debug, Clone, Copy)]
pub struct ActorView {
    pub kind: ActorKind,
    pub pos: glam::Vec2,
    pub size: glam::Vec2,
    /// Star blur intensity, 0 for everything else
    pub blur: f32,
}

/// Per-tick draw data, in z-order (plan order, player last seeded wins)
pub fn actor_views(state: &GameState) -> impl Iterator<Item = ActorView> + '_ {
    state.actors.iter().map(|a| ActorView {
        kind: a.kind(),
        pos: a.pos(),
        size: a.size(),
        blur: match a {
            Actor::Star(s) => s.blur,
            _ => 0.0,
        },
    })
}

fn tile_glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Empty => '.',
        TileKind::Wall => '#',
        TileKind::Lava => '+',
    }
}

fn actor_glyph(kind: ActorKind) -> char {
    match kind {
        ActorKind::Player => '@',
        ActorKind::Lava => '~',
        ActorKind::Coin => 'o',
        ActorKind::Monster => 'M',
        ActorKind::Life => 'h',
        ActorKind::Shield => 's',
        ActorKind::SpeedIncreaser => 'f',
        ActorKind::JumpIncreaser => 'j',
        ActorKind::Star => '*',
    }
}

/// Draw one frame as text: the tile grid with each actor stamped at the
/// cell under its center, then a status line.
pub fn draw_text(state: &GameState) -> String {
    let level = &state.level;
    let mut grid: Vec<Vec<char>> = (0..level.height)
        .map(|y| {
            (0..level.width)
                .map(|x| tile_glyph(level.tile_at(x as i64, y as i64)))
                .collect()
        })
        .collect();

    for view in actor_views(state) {
        let center = view.pos + view.size * 0.5;
        let (x, y) = (center.x.floor() as i64, center.y.floor() as i64);
        if x >= 0 && y >= 0 && (x as usize) < level.width && (y as usize) < level.height {
            grid[y as usize][x as usize] = actor_glyph(view.kind);
        }
    }

    let status = match state.status {
        Status::Playing if state.shield_active() => "playing (shielded)",
        Status::Playing => "playing",
        Status::Won => "won",
        Status::Lost => "lost",
    };

    let mut out = String::with_capacity((level.width + 1) * level.height + 24);
    for row in grid {
        out.extend(row);
        out.push('\n');
    }
    out.push_str(status);
    out.push('\n');
    out
}
