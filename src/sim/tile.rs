//! Floor tiles and their contact rules
//!
//! Every tile is a solid box with a behavior tag. Contact with the player is
//! turned into a [`TileReaction`] that the tick applies to the player, the
//! level or the run timer; tiles never reach into other systems themselves.

use glam::Vec3;

use super::collision::Aabb;

/// Stable tile identifier, assigned at level construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

/// Ping-pong mover for `Moving` tiles
#[derive(Debug, Clone, PartialEq)]
pub struct Oscillator {
    pub start: Vec3,
    pub target: Vec3,
    /// Seconds per leg
    pub duration: f32,
    timer: f32,
    toward_target: bool,
}

impl Oscillator {
    /// Travel `speed * duration` along `direction` and back, forever
    pub fn new(start: Vec3, direction: Vec3, speed: f32, duration: f32) -> Self {
        let target = start + direction.normalize_or_zero() * speed * duration;
        Self {
            start,
            target,
            duration,
            timer: 0.0,
            toward_target: true,
        }
    }

    pub fn is_moving_to_target(&self) -> bool {
        self.toward_target
    }

    /// Advance the phase timer and return the new position
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        if self.duration <= 0.0 {
            return self.start;
        }
        self.timer += dt;
        if self.timer >= self.duration {
            self.timer = 0.0;
            self.toward_target = !self.toward_target;
        }
        self.position()
    }

    /// Position for the current phase
    pub fn position(&self) -> Vec3 {
        let t = (self.timer / self.duration).clamp(0.0, 1.0);
        let (from, to) = if self.toward_target {
            (self.start, self.target)
        } else {
            (self.target, self.start)
        };
        from.lerp(to, t)
    }
}

/// Tile behavior tag
#[derive(Debug, Clone, PartialEq)]
pub enum TileKind {
    Normal,
    /// Safe only for the player whose turn color matches
    Color { red: bool },
    Moving(Oscillator),
    /// Checkpoint; at most one active per level
    SavePoint { active: bool },
    Finish,
}

impl TileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::Normal => "Normal",
            TileKind::Color { .. } => "Color",
            TileKind::Moving(_) => "Moving",
            TileKind::SavePoint { .. } => "SavePoint",
            TileKind::Finish => "Finish",
        }
    }
}

/// What a tile contact asks the rest of the simulation to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileReaction {
    None,
    /// Turn color matched a color tile
    Safe,
    Kill,
    Attach(TileId),
    Detach(TileId),
    ActivateCheckpoint(TileId),
    Finish,
}

/// A floor tile
#[derive(Debug, Clone)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    pub collider: Aabb,
    /// Displacement applied during the last advance (carries attached bodies)
    pub last_delta: Vec3,
}

impl Tile {
    pub fn new(id: TileId, kind: TileKind, collider: Aabb) -> Self {
        Self {
            id,
            kind,
            collider,
            last_delta: Vec3::ZERO,
        }
    }

    pub fn is_save_point(&self) -> bool {
        matches!(self.kind, TileKind::SavePoint { .. })
    }

    pub fn is_active_save_point(&self) -> bool {
        matches!(self.kind, TileKind::SavePoint { active: true })
    }

    pub fn set_save_point_active(&mut self, on: bool) {
        if let TileKind::SavePoint { active } = &mut self.kind {
            *active = on;
        }
    }

    /// Where a body with `half_height` stands when placed on this tile
    pub fn standing_point(&self, half_height: f32) -> Vec3 {
        self.collider.top_center() + Vec3::Y * half_height
    }

    /// Per-tick behavior (only moving tiles do anything)
    pub fn advance(&mut self, dt: f32) {
        self.last_delta = Vec3::ZERO;
        if let TileKind::Moving(osc) = &mut self.kind {
            let next = osc.advance(dt);
            self.last_delta = next - self.collider.center;
            self.collider.center = next;
        }
    }

    /// Player started touching this tile while `turn_is_red` holds the turn
    pub fn on_contact(&self, turn_is_red: bool) -> TileReaction {
        match &self.kind {
            TileKind::Normal => TileReaction::None,
            TileKind::Color { red } => {
                if turn_is_red != *red {
                    log::info!(
                        "Color mismatch on tile {}: player {}, tile {}",
                        self.id.0,
                        color_name(turn_is_red),
                        color_name(*red)
                    );
                    TileReaction::Kill
                } else {
                    log::debug!(
                        "Safe, colors match on tile {} ({})",
                        self.id.0,
                        color_name(*red)
                    );
                    TileReaction::Safe
                }
            }
            TileKind::Moving(_) => TileReaction::Attach(self.id),
            TileKind::SavePoint { .. } => TileReaction::ActivateCheckpoint(self.id),
            TileKind::Finish => TileReaction::Finish,
        }
    }

    /// Player stopped touching this tile
    pub fn on_contact_end(&self) -> TileReaction {
        match self.kind {
            TileKind::Moving(_) => TileReaction::Detach(self.id),
            _ => TileReaction::None,
        }
    }
}

fn color_name(red: bool) -> &'static str {
    if red { "Red" } else { "Blue" }
}
