//! Level grid and plan parsing
//!
//! A level is an immutable tile grid plus the list of actor seeds found in
//! the plan text. The grid answers all spatial queries; everything outside
//! the grid counts as wall.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a single grid cell is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Empty,
    Wall,
    Lava,
}

/// Motion flavor a lava seed character selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LavaStyle {
    /// `=` - glides horizontally, bouncing off walls
    Horizontal,
    /// `|` - glides vertically, bouncing off walls
    Vertical,
    /// `d` - glides diagonally, bouncing off walls
    Diagonal,
    /// `v` - falls, then snaps back to its spawn point on impact
    Drip,
    /// `c` - fixed circular orbit, ignores geometry
    Orbit,
    /// `e` - elliptical orbit that reverses when it would enter a wall
    Sway,
}

/// Actor variant a plan character seeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedKind {
    Player,
    Coin,
    Lava(LavaStyle),
    Monster,
    Life,
    Shield,
    SpeedIncreaser,
    JumpIncreaser,
    Star,
}

/// An actor recorded during parsing, instantiated at level start
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActorSeed {
    pub kind: SeedKind,
    /// Grid cell the seed character occupied
    pub pos: Vec2,
}

/// Malformed level plan
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level plan is empty")]
    EmptyPlan,
    #[error("row {row} is {found} cells wide, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown plan character {ch:?} at row {row}, column {col}")]
    UnknownChar { ch: char, row: usize, col: usize },
    #[error("level plan has no player")]
    NoPlayer,
    #[error("level plan has more than one player (second at row {row}, column {col})")]
    MultiplePlayers { row: usize, col: usize },
}

/// What a plan character contributes to its cell
enum Cell {
    Tile(TileKind),
    Seed(SeedKind),
}

fn classify(ch: char) -> Option<Cell> {
    use Cell::{Seed, Tile};
    match ch {
        '.' => Some(Tile(TileKind::Empty)),
        '#' => Some(Tile(TileKind::Wall)),
        '+' => Some(Tile(TileKind::Lava)),
        '@' => Some(Seed(SeedKind::Player)),
        'o' => Some(Seed(SeedKind::Coin)),
        '=' => Some(Seed(SeedKind::Lava(LavaStyle::Horizontal))),
        '|' => Some(Seed(SeedKind::Lava(LavaStyle::Vertical))),
        'd' => Some(Seed(SeedKind::Lava(LavaStyle::Diagonal))),
        'v' => Some(Seed(SeedKind::Lava(LavaStyle::Drip))),
        'c' => Some(Seed(SeedKind::Lava(LavaStyle::Orbit))),
        'e' => Some(Seed(SeedKind::Lava(LavaStyle::Sway))),
        'M' => Some(Seed(SeedKind::Monster)),
        'h' => Some(Seed(SeedKind::Life)),
        's' => Some(Seed(SeedKind::Shield)),
        'f' => Some(Seed(SeedKind::SpeedIncreaser)),
        'j' => Some(Seed(SeedKind::JumpIncreaser)),
        '*' => Some(Seed(SeedKind::Star)),
        _ => None,
    }
}

/// An immutable tile grid plus the actors its plan seeded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub width: usize,
    pub height: usize,
    /// Row-major, `width * height` cells
    tiles: Vec<TileKind>,
    /// Left-to-right, top-to-bottom plan order. Order is significant: it is
    /// the default z-order and the find-first-player order.
    pub start_actors: Vec<ActorSeed>,
}

impl Level {
    /// Parse a plan: one character per tile, rows separated by newlines,
    /// surrounding whitespace ignored. All rows must match the first row's
    /// width, every character must be in the plan table, and exactly one
    /// `@` must be present.
    pub fn parse(plan: &str) -> Result<Self, LevelError> {
        let rows: Vec<&str> = plan.trim().lines().collect();
        if rows.is_empty() || rows[0].is_empty() {
            return Err(LevelError::EmptyPlan);
        }

        let width = rows[0].chars().count();
        let height = rows.len();
        let mut tiles = Vec::with_capacity(width * height);
        let mut start_actors = Vec::new();
        let mut player_seen = false;

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(LevelError::RaggedRows {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                match classify(ch) {
                    Some(Cell::Tile(kind)) => tiles.push(kind),
                    Some(Cell::Seed(kind)) => {
                        if kind == SeedKind::Player {
                            if player_seen {
                                return Err(LevelError::MultiplePlayers { row: y, col: x });
                            }
                            player_seen = true;
                        }
                        start_actors.push(ActorSeed {
                            kind,
                            pos: Vec2::new(x as f32, y as f32),
                        });
                        tiles.push(TileKind::Empty);
                    }
                    None => {
                        return Err(LevelError::UnknownChar { ch, row: y, col: x });
                    }
                }
            }
        }

        if !player_seen {
            return Err(LevelError::NoPlayer);
        }

        Ok(Self {
            width,
            height,
            tiles,
            start_actors,
        })
    }

    /// Tile at grid cell (x, y); anything out of bounds is wall
    #[inline]
    pub fn tile_at(&self, x: i64, y: i64) -> TileKind {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            TileKind::Wall
        } else {
            self.tiles[y as usize * self.width + x as usize]
        }
    }

    /// Does the rectangle `[pos, pos + size)` overlap any cell of `kind`?
    ///
    /// Cells are unit squares on integer coordinates; the covered range is
    /// `floor(pos)` to `ceil(pos + size)` exclusive per axis. Short-circuits
    /// on the first match.
    pub fn touches(&self, pos: Vec2, size: Vec2, kind: TileKind) -> bool {
        let x_start = pos.x.floor() as i64;
        let x_end = (pos.x + size.x).ceil() as i64;
        let y_start = pos.y.floor() as i64;
        let y_end = (pos.y + size.y).ceil() as i64;

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.tile_at(x, y) == kind {
                    return true;
                }
            }
        }
        false
    }
}
