//! Frame-stepped simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only, driven by an explicit `tick`
//! - Input arrives as snapshots, results leave as events
//! - Stable iteration order (tiles by id, kill volumes by index)
//! - No rendering, persistence or network dependencies

pub mod body;
pub mod collision;
pub mod level;
pub mod player;
pub mod state;
pub mod tick;
pub mod tile;
pub mod timer;

pub use body::Body;
pub use collision::{Aabb, CONTACT_SKIN};
pub use level::{Level, LevelBlueprint, TileSpec};
pub use player::{GroundProbe, ModelSet, Player, PlayerPhase, jump_force, spin_total_rotation};
pub use state::{DeathCause, GameEvent, PlayState};
pub use tick::tick;
pub use tile::{Oscillator, Tile, TileId, TileKind, TileReaction};
pub use timer::RunTimer;
