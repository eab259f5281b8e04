//! Play state and simulation events
//!
//! Everything the fixed-step tick mutates lives in [`PlayState`]; what
//! happened during a tick is reported back as a list of [`GameEvent`]s.

use std::collections::BTreeSet;

use glam::Vec3;

use super::body::Body;
use super::level::{Level, LevelBlueprint};
use super::player::Player;
use super::tile::TileId;
use super::timer::RunTimer;
use crate::settings::Settings;

/// Why the player died
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Landed on a color tile of the other role's color
    ColorMismatch(TileId),
    /// Entered a kill volume (index into the level's volumes)
    KillVolume(usize),
}

/// Something notable that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ChargeStarted { player1: bool },
    Jumped { player1: bool, force: f32, total_rotation: f32 },
    /// Landing; `player1_turn` is the role whose turn begins
    Landed { player1_turn: bool },
    Died { cause: DeathCause },
    Respawned { manual: bool, position: Vec3 },
    CheckpointActivated { tile: TileId, spawn: Vec3 },
    TimerStarted,
    /// Finish tile touched; emitted on every contact
    Finished { time: f32 },
}

/// Live simulation state for one level
#[derive(Debug, Clone)]
pub struct PlayState {
    pub level: Level,
    pub player: Player,
    pub body: Body,
    pub timer: RunTimer,
    /// Ticks since the level was (re)built
    pub time_ticks: u64,
    /// Tiles touched at the end of the previous tick
    pub(crate) tile_contacts: BTreeSet<TileId>,
    /// Kill volumes overlapped at the end of the previous tick
    pub(crate) volume_contacts: BTreeSet<usize>,
}

impl PlayState {
    /// Fresh state: player 1 at the level's start spawn, timer at zero
    pub fn new(blueprint: &LevelBlueprint, settings: &Settings) -> Self {
        let level = Level::build(blueprint);
        let body = Body::new(
            level.start_spawn,
            settings.physics.player_mass,
            settings.physics.player_half_extents,
        );
        Self {
            player: Player::new(level.start_spawn),
            body,
            level,
            timer: RunTimer::new(),
            time_ticks: 0,
            tile_contacts: BTreeSet::new(),
            volume_contacts: BTreeSet::new(),
        }
    }

    /// Tiles the body is touching right now (as of the last tick)
    pub fn touching(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tile_contacts.iter().copied()
    }
}
