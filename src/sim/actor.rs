//! The closed set of actor variants
//!
//! Every actor is a value: `update` builds next tick's actor from the
//! previous state, and `collide` is the response hook run when the player's
//! box overlaps this actor's box. Dispatch is a plain match over the enum;
//! the variant set is fixed, so there is no trait object in sight.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use super::level::{ActorSeed, LavaStyle, SeedKind, TileKind};
use super::state::{GameEvent, GameState, Status};
use super::tick::Intent;

// Per-variant bounding boxes. Static data, not instance fields.
pub const PLAYER_SIZE: Vec2 = Vec2::new(0.8, 1.5);
pub const LAVA_SIZE: Vec2 = Vec2::ONE;
pub const COIN_SIZE: Vec2 = Vec2::new(0.6, 0.6);
pub const MONSTER_SIZE: Vec2 = Vec2::ONE;
pub const LIFE_SIZE: Vec2 = Vec2::ONE;
pub const SHIELD_SIZE: Vec2 = Vec2::ONE;
pub const BOOSTER_SIZE: Vec2 = Vec2::new(0.8, 0.8);
pub const STAR_SIZE: Vec2 = Vec2::new(0.8, 0.8);

// Cosmetic motion constants.
const COIN_WOBBLE_SPEED: f32 = 8.0;
const COIN_WOBBLE_RADIUS: f32 = 0.07;
const LIFE_WOBBLE_SPEED: f32 = 4.0;
const LIFE_WOBBLE_DIST: f32 = 0.1;
const SHIELD_ORBIT_SPEED: f32 = 7.0;
const SHIELD_ORBIT_RADIUS: f32 = 0.04;
const ORBIT_RADIUS: f32 = 2.0;
const ORBIT_RATE: f32 = 3.0;
const SWAY_RATE: f32 = 1.0;
const SWAY_STRETCH: f32 = 4.0;
const BOOSTER_SLIDE_RATE: f32 = 1.0;
const STAR_BLUR_RATE: f32 = 2.0;

/// Variant tag, the render adapter's view of an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Lava,
    Coin,
    Monster,
    Life,
    Shield,
    SpeedIncreaser,
    JumpIncreaser,
    Star,
}

/// The player avatar
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Last tick's velocity. The x component mirrors input even when a wall
    /// blocked the actual move.
    pub speed: Vec2,
}

impl Player {
    pub fn update(&self, dt: f32, state: &GameState, intent: Intent) -> Player {
        let tuning = &state.tuning;
        let x_speed = if state.modifiers.speed_boosted(state.time) {
            tuning.boosted_x_speed
        } else {
            tuning.player_x_speed
        };

        let mut vx = 0.0;
        if intent.left {
            vx -= x_speed;
        }
        if intent.right {
            vx += x_speed;
        }

        let mut pos = self.pos;
        let moved_x = pos + Vec2::new(vx * dt, 0.0);
        if !state.level.touches(moved_x, PLAYER_SIZE, TileKind::Wall) {
            pos = moved_x;
        }

        let mut vy = self.speed.y + tuning.gravity * dt;
        let moved_y = pos + Vec2::new(0.0, vy * dt);
        if !state.level.touches(moved_y, PLAYER_SIZE, TileKind::Wall) {
            pos = moved_y;
        } else if intent.up && vy > 0.0 {
            // Landed with jump held: launch upward
            vy = if state.modifiers.jump_boosted(state.time) {
                -tuning.boosted_jump_speed
            } else {
                -tuning.jump_speed
            };
        } else {
            // Landed or bumped the ceiling
            vy = 0.0;
        }

        Player {
            pos,
            speed: Vec2::new(vx, vy),
        }
    }
}

/// How a mobile lava block moves
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum LavaMotion {
    /// Linear motion, velocity negated on wall contact
    Glide { vel: Vec2 },
    /// Linear motion, position snapped back to `reset` on wall contact
    Drip { vel: Vec2, reset: Vec2 },
    /// Circular orbit around `center`, no geometry interaction
    Orbit { center: Vec2, phase: f32 },
    /// Elliptical orbit that reverses direction rather than enter a wall
    Sway { center: Vec2, phase: f32, dir: f32 },
}

/// A mobile lava block
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Lava {
    pub pos: Vec2,
    pub motion: LavaMotion,
}

impl Lava {
    fn from_style(pos: Vec2, style: LavaStyle) -> Lava {
        let motion = match style {
            LavaStyle::Horizontal => LavaMotion::Glide {
                vel: Vec2::new(2.0, 0.0),
            },
            LavaStyle::Vertical => LavaMotion::Glide {
                vel: Vec2::new(0.0, 2.0),
            },
            LavaStyle::Diagonal => LavaMotion::Glide {
                vel: Vec2::new(2.0, -2.0),
            },
            LavaStyle::Drip => LavaMotion::Drip {
                vel: Vec2::new(0.0, 3.0),
                reset: pos,
            },
            LavaStyle::Orbit => LavaMotion::Orbit {
                center: pos,
                phase: PI,
            },
            LavaStyle::Sway => LavaMotion::Sway {
                center: pos,
                phase: PI,
                dir: 1.0,
            },
        };
        Lava { pos, motion }
    }

    fn sway_offset(phase: f32) -> Vec2 {
        Vec2::new(
            phase.cos() * ORBIT_RADIUS,
            phase.sin() * ORBIT_RADIUS * SWAY_STRETCH,
        )
    }

    pub fn update(&self, dt: f32, state: &GameState) -> Lava {
        match self.motion {
            LavaMotion::Glide { vel } => {
                let next = self.pos + vel * dt;
                if !state.level.touches(next, LAVA_SIZE, TileKind::Wall) {
                    Lava {
                        pos: next,
                        motion: self.motion,
                    }
                } else {
                    Lava {
                        pos: self.pos,
                        motion: LavaMotion::Glide { vel: -vel },
                    }
                }
            }
            LavaMotion::Drip { vel, reset } => {
                let next = self.pos + vel * dt;
                let pos = if state.level.touches(next, LAVA_SIZE, TileKind::Wall) {
                    reset
                } else {
                    next
                };
                Lava {
                    pos,
                    motion: self.motion,
                }
            }
            LavaMotion::Orbit { center, phase } => {
                let phase = phase + ORBIT_RATE * dt;
                let pos = center + Vec2::new(phase.cos(), phase.sin()) * ORBIT_RADIUS;
                Lava {
                    pos,
                    motion: LavaMotion::Orbit { center, phase },
                }
            }
            LavaMotion::Sway { center, phase, dir } => {
                // Probe one step ahead before committing; a blocked path
                // flips the direction for this and future steps.
                let probe = center + Self::sway_offset(phase + SWAY_RATE * dt * dir);
                let dir = if state.level.touches(probe, LAVA_SIZE, TileKind::Wall) {
                    -dir
                } else {
                    dir
                };
                let phase = phase + SWAY_RATE * dt * dir;
                Lava {
                    pos: center + Self::sway_offset(phase),
                    motion: LavaMotion::Sway { center, phase, dir },
                }
            }
        }
    }
}

/// Collectible currency, bobbing on a sinusoid
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub base: Vec2,
    pub wobble: f32,
}

impl Coin {
    pub fn update(&self, dt: f32) -> Coin {
        let wobble = self.wobble + COIN_WOBBLE_SPEED * dt;
        Coin {
            pos: self.base + Vec2::new(0.0, wobble.sin() * COIN_WOBBLE_RADIUS),
            base: self.base,
            wobble,
        }
    }
}

/// Patrolling enemy that homes on the player's column
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Monster {
    pub pos: Vec2,
}

impl Monster {
    pub fn update(&self, dt: f32, state: &GameState) -> Monster {
        let Some(player) = state.player() else {
            return *self;
        };
        let side = if player.pos.x < self.pos.x { -1.0 } else { 1.0 };
        let next = self.pos + Vec2::new(side * state.tuning.monster_speed * dt, 0.0);
        if state.level.touches(next, MONSTER_SIZE, TileKind::Wall) {
            *self
        } else {
            Monster { pos: next }
        }
    }
}

/// Extra-life pickup, swaying sideways
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Life {
    pub pos: Vec2,
    pub base: Vec2,
    pub wobble: f32,
}

impl Life {
    pub fn update(&self, dt: f32) -> Life {
        let wobble = self.wobble + LIFE_WOBBLE_SPEED * dt;
        Life {
            pos: self.base + Vec2::new(wobble.cos() * LIFE_WOBBLE_DIST, 0.0),
            base: self.base,
            wobble,
        }
    }
}

/// Invulnerability pickup, circling its spawn point
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Shield {
    pub pos: Vec2,
    pub center: Vec2,
    pub angle: f32,
}

impl Shield {
    pub fn update(&self, dt: f32) -> Shield {
        let angle = self.angle + SHIELD_ORBIT_SPEED * dt;
        Shield {
            pos: self.center + Vec2::new(angle.cos(), angle.sin()) * SHIELD_ORBIT_RADIUS,
            center: self.center,
            angle,
        }
    }
}

/// Speed or jump power-up, sliding one cell back and forth along one axis
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Booster {
    pub pos: Vec2,
    pub base: Vec2,
    pub dir: f32,
}

impl Booster {
    fn slide(&self, dt: f32, horizontal: bool) -> Booster {
        let offset = if horizontal {
            self.pos.x - self.base.x
        } else {
            self.pos.y - self.base.y
        };
        let mut dir = self.dir;
        let mut offset = offset + dir * BOOSTER_SLIDE_RATE * dt;
        if offset > 1.0 {
            offset = 1.0;
            dir = -1.0;
        } else if offset < 0.0 {
            offset = 0.0;
            dir = 1.0;
        }
        let pos = if horizontal {
            Vec2::new(self.base.x + offset, self.base.y)
        } else {
            Vec2::new(self.base.x, self.base.y + offset)
        };
        Booster {
            pos,
            base: self.base,
            dir,
        }
    }
}

/// Goal pickup with an oscillating render-only blur value
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub blur: f32,
    pub blur_dir: f32,
}

impl Star {
    pub fn update(&self, dt: f32) -> Star {
        let mut dir = self.blur_dir;
        let mut blur = self.blur + dir * STAR_BLUR_RATE * dt;
        if blur > 1.0 {
            blur = 1.0;
            dir = -1.0;
        } else if blur < 0.0 {
            blur = 0.0;
            dir = 1.0;
        }
        Star {
            pos: self.pos,
            blur,
            blur_dir: dir,
        }
    }
}

/// Any live actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Actor {
    Player(Player),
    Lava(Lava),
    Coin(Coin),
    Monster(Monster),
    Life(Life),
    Shield(Shield),
    SpeedIncreaser(Booster),
    JumpIncreaser(Booster),
    Star(Star),
}

impl Actor {
    /// Instantiate a parsed seed. The RNG supplies initial wobble phases
    /// (randomized per run so pickups don't bob in lockstep, deterministic
    /// given the run seed).
    pub fn spawn(seed: &ActorSeed, rng: &mut Pcg32) -> Actor {
        match seed.kind {
            SeedKind::Player => Actor::Player(Player {
                pos: seed.pos + Vec2::new(0.0, -0.5),
                speed: Vec2::ZERO,
            }),
            SeedKind::Coin => {
                let base = seed.pos + Vec2::new(0.2, 0.1);
                Actor::Coin(Coin {
                    pos: base,
                    base,
                    wobble: rng.random::<f32>() * TAU,
                })
            }
            SeedKind::Lava(style) => Actor::Lava(Lava::from_style(seed.pos, style)),
            SeedKind::Monster => Actor::Monster(Monster { pos: seed.pos }),
            SeedKind::Life => Actor::Life(Life {
                pos: seed.pos,
                base: seed.pos,
                wobble: rng.random::<f32>() * TAU,
            }),
            SeedKind::Shield => Actor::Shield(Shield {
                pos: seed.pos,
                center: seed.pos,
                angle: PI,
            }),
            SeedKind::SpeedIncreaser => Actor::SpeedIncreaser(Booster {
                pos: seed.pos,
                base: seed.pos,
                dir: 1.0,
            }),
            SeedKind::JumpIncreaser => Actor::JumpIncreaser(Booster {
                pos: seed.pos,
                base: seed.pos,
                dir: 1.0,
            }),
            SeedKind::Star => Actor::Star(Star {
                pos: seed.pos,
                blur: 0.0,
                blur_dir: 1.0,
            }),
        }
    }

    /// Next-tick value, computed purely from the previous state
    pub fn update(&self, dt: f32, state: &GameState, intent: Intent) -> Actor {
        match self {
            Actor::Player(p) => Actor::Player(p.update(dt, state, intent)),
            Actor::Lava(l) => Actor::Lava(l.update(dt, state)),
            Actor::Coin(c) => Actor::Coin(c.update(dt)),
            Actor::Monster(m) => Actor::Monster(m.update(dt, state)),
            Actor::Life(l) => Actor::Life(l.update(dt)),
            Actor::Shield(s) => Actor::Shield(s.update(dt)),
            Actor::SpeedIncreaser(b) => Actor::SpeedIncreaser(b.slide(dt, true)),
            Actor::JumpIncreaser(b) => Actor::JumpIncreaser(b.slide(dt, false)),
            Actor::Star(s) => Actor::Star(s.update(dt)),
        }
    }

    /// Collision response against the in-progress successor state.
    ///
    /// `idx` is this actor's index in `next.actors`. Returns true when the
    /// handler removed itself from the list.
    pub fn collide(&self, idx: usize, next: &mut GameState) -> bool {
        match self {
            // The player never collides with itself; the tick skips it.
            Actor::Player(_) => false,
            Actor::Lava(_) => {
                if !next.shield_active() {
                    next.status = Status::Lost;
                }
                false
            }
            Actor::Coin(_) => {
                next.actors.remove(idx);
                next.events.push(GameEvent::CoinCollected);
                if !next.goal_remaining() {
                    next.status = Status::Won;
                }
                true
            }
            Actor::Monster(m) => {
                let stomped = next
                    .player()
                    .is_some_and(|p| m.pos.y - MONSTER_SIZE.y > p.pos.y);
                if stomped {
                    next.actors.remove(idx);
                    next.events.push(GameEvent::MonsterStomped);
                    true
                } else {
                    if !next.shield_active() {
                        next.status = Status::Lost;
                    }
                    false
                }
            }
            Actor::Life(_) => {
                next.actors.remove(idx);
                next.events.push(GameEvent::LifeCollected);
                true
            }
            Actor::Shield(_) => {
                next.actors.remove(idx);
                next.modifiers.shield_until = next.time + next.tuning.shield_duration;
                next.events.push(GameEvent::ShieldActivated);
                true
            }
            Actor::SpeedIncreaser(_) => {
                next.actors.remove(idx);
                next.modifiers.speed_until = next.time + next.tuning.boost_duration;
                next.events.push(GameEvent::SpeedBoost);
                true
            }
            Actor::JumpIncreaser(_) => {
                next.actors.remove(idx);
                next.modifiers.jump_until = next.time + next.tuning.boost_duration;
                next.events.push(GameEvent::JumpBoost);
                true
            }
            Actor::Star(_) => {
                next.actors.remove(idx);
                next.events.push(GameEvent::StarCollected);
                if !next.goal_remaining() {
                    next.status = Status::Won;
                }
                true
            }
        }
    }

    pub fn kind(&self) -> ActorKind {
        match self {
            Actor::Player(_) => ActorKind::Player,
            Actor::Lava(_) => ActorKind::Lava,
            Actor::Coin(_) => ActorKind::Coin,
            Actor::Monster(_) => ActorKind::Monster,
            Actor::Life(_) => ActorKind::Life,
            Actor::Shield(_) => ActorKind::Shield,
            Actor::SpeedIncreaser(_) => ActorKind::SpeedIncreaser,
            Actor::JumpIncreaser(_) => ActorKind::JumpIncreaser,
            Actor::Star(_) => ActorKind::Star,
        }
    }

    pub fn pos(&self) -> Vec2 {
        match self {
            Actor::Player(p) => p.pos,
            Actor::Lava(l) => l.pos,
            Actor::Coin(c) => c.pos,
            Actor::Monster(m) => m.pos,
            Actor::Life(l) => l.pos,
            Actor::Shield(s) => s.pos,
            Actor::SpeedIncreaser(b) | Actor::JumpIncreaser(b) => b.pos,
            Actor::Star(s) => s.pos,
        }
    }

    pub fn size(&self) -> Vec2 {
        match self {
            Actor::Player(_) => PLAYER_SIZE,
            Actor::Lava(_) => LAVA_SIZE,
            Actor::Coin(_) => COIN_SIZE,
            Actor::Monster(_) => MONSTER_SIZE,
            Actor::Life(_) => LIFE_SIZE,
            Actor::Shield(_) => SHIELD_SIZE,
            Actor::SpeedIncreaser(_) | Actor::JumpIncreaser(_) => BOOSTER_SIZE,
            Actor::Star(_) => STAR_SIZE,
        }
    }

    /// Collecting the last goal actor wins the level
    pub fn is_goal(&self) -> bool {
        matches!(self, Actor::Coin(_) | Actor::Star(_))
    }
}
