//! Level layout and level-wide rules
//!
//! A [`LevelBlueprint`] is the immutable description a level is (re)built
//! from; [`Level`] is the live copy the simulation mutates. References
//! between tiles are plain [`TileId`]s resolved at build time.

use glam::Vec3;

use super::collision::{Aabb, sphere_overlaps_aabb};
use super::player::GroundProbe;
use super::tile::{Oscillator, Tile, TileId, TileKind};

/// Tile behavior as authored, before runtime state exists
#[derive(Debug, Clone, PartialEq)]
pub enum TileSpec {
    Normal,
    Color { red: bool },
    Moving { direction: Vec3, speed: f32, duration: f32 },
    SavePoint,
    Finish,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TilePlacement {
    pub spec: TileSpec,
    pub collider: Aabb,
}

/// Immutable level description
#[derive(Debug, Clone, PartialEq)]
pub struct LevelBlueprint {
    pub name: String,
    pub start_spawn: Vec3,
    pub tiles: Vec<TilePlacement>,
    pub kill_volumes: Vec<Aabb>,
}

impl LevelBlueprint {
    pub fn new(name: impl Into<String>, start_spawn: Vec3) -> Self {
        Self {
            name: name.into(),
            start_spawn,
            tiles: Vec::new(),
            kill_volumes: Vec::new(),
        }
    }

    /// Add a tile whose top face sits at `top` with the given width
    pub fn tile(mut self, spec: TileSpec, top: Vec3, half_width: f32) -> Self {
        let half_extents = Vec3::new(half_width, TILE_HALF_HEIGHT, TILE_HALF_DEPTH);
        let center = top - Vec3::Y * TILE_HALF_HEIGHT;
        self.tiles.push(TilePlacement {
            spec,
            collider: Aabb::new(center, half_extents),
        });
        self
    }

    pub fn kill_volume(mut self, volume: Aabb) -> Self {
        self.kill_volumes.push(volume);
        self
    }

    /// Five-tile course exercising every tile behavior
    ///
    /// Player 1 (red) starts on a plain tile. Three taps reach a checkpoint,
    /// a red tile and a slow moving tile; a half-second charge from there
    /// reaches the finish. The turn passes as the ground probe finds the
    /// tile, so the red tile is judged with player 1 back in control.
    pub fn demo() -> Self {
        Self::new("Demo Course", Vec3::new(0.0, 0.5, 0.0))
            .tile(TileSpec::Normal, Vec3::new(0.0, 0.0, 0.0), 2.0)
            .tile(TileSpec::SavePoint, Vec3::new(3.2, 0.0, 0.0), 1.0)
            .tile(TileSpec::Color { red: true }, Vec3::new(5.5, 0.0, 0.0), 1.0)
            .tile(
                TileSpec::Moving {
                    direction: Vec3::NEG_X,
                    speed: 0.25,
                    duration: 1.0,
                },
                Vec3::new(7.8, 0.0, 0.0),
                1.0,
            )
            .tile(TileSpec::Finish, Vec3::new(13.5, 0.0, 0.0), 2.0)
            .kill_volume(Aabb::new(
                Vec3::new(6.0, -12.0, 0.0),
                Vec3::new(60.0, 2.0, 5.0),
            ))
    }
}

/// Tile slab half thickness
pub const TILE_HALF_HEIGHT: f32 = 0.25;
/// Tile slab half depth
pub const TILE_HALF_DEPTH: f32 = 1.0;

/// Live level state
#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    pub start_spawn: Vec3,
    pub tiles: Vec<Tile>,
    pub kill_volumes: Vec<Aabb>,
}

impl Level {
    /// Instantiate a blueprint; tile ids follow authoring order starting at 1
    pub fn build(blueprint: &LevelBlueprint) -> Self {
        let tiles = blueprint
            .tiles
            .iter()
            .enumerate()
            .map(|(i, placement)| {
                let kind = match &placement.spec {
                    TileSpec::Normal => TileKind::Normal,
                    TileSpec::Color { red } => TileKind::Color { red: *red },
                    TileSpec::Moving {
                        direction,
                        speed,
                        duration,
                    } => TileKind::Moving(Oscillator::new(
                        placement.collider.center,
                        *direction,
                        *speed,
                        *duration,
                    )),
                    TileSpec::SavePoint => TileKind::SavePoint { active: false },
                    TileSpec::Finish => TileKind::Finish,
                };
                log::debug!("Tile {}: {}", i + 1, kind.as_str());
                Tile::new(TileId(i as u32 + 1), kind, placement.collider)
            })
            .collect::<Vec<_>>();

        log::info!(
            "Built level '{}' with {} tiles and {} kill volumes",
            blueprint.name,
            tiles.len(),
            blueprint.kill_volumes.len()
        );

        Self {
            name: blueprint.name.clone(),
            start_spawn: blueprint.start_spawn,
            tiles,
            kill_volumes: blueprint.kill_volumes.clone(),
        }
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    /// Advance every tile by one tick
    pub fn advance(&mut self, dt: f32) {
        for tile in &mut self.tiles {
            tile.advance(dt);
        }
    }

    /// Displacement of `id` during the last advance
    pub fn tile_delta(&self, id: TileId) -> Vec3 {
        self.tile(id).map(|t| t.last_delta).unwrap_or(Vec3::ZERO)
    }

    /// Colliders of every tile (all tiles are solid ground)
    pub fn solids(&self) -> impl Iterator<Item = &Aabb> {
        self.tiles.iter().map(|t| &t.collider)
    }

    /// Make `id` the only active save point.
    ///
    /// Returns `false` (and changes nothing) if `id` is not a save point.
    pub fn activate_save_point(&mut self, id: TileId) -> bool {
        if !self.tile(id).is_some_and(Tile::is_save_point) {
            log::warn!("Tile {} is not a save point", id.0);
            return false;
        }
        for tile in self.tiles.iter_mut().filter(|t| t.is_save_point()) {
            tile.set_save_point_active(tile.id == id);
        }
        log::info!("Save point {} activated", id.0);
        true
    }

    pub fn active_save_point(&self) -> Option<TileId> {
        self.tiles
            .iter()
            .find(|t| t.is_active_save_point())
            .map(|t| t.id)
    }

    pub fn active_save_point_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_active_save_point()).count()
    }
}

impl GroundProbe for Level {
    fn is_ground_at(&self, center: Vec3, radius: f32) -> bool {
        self.solids()
            .any(|collider| sphere_overlaps_aabb(center, radius, collider))
    }
}
