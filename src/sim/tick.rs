//! Fixed timestep simulation tick
//!
//! One call advances a [`PlayState`] by `dt` in a fixed order:
//! tiles, player controller, body physics, contacts, run timer.

use std::collections::BTreeSet;

use super::state::{DeathCause, GameEvent, PlayState};
use super::tile::{Tile, TileId, TileReaction};
use crate::platform::InputSnapshot;
use crate::settings::Settings;

/// Advance the play state by one fixed timestep
pub fn tick(
    state: &mut PlayState,
    input: &InputSnapshot,
    settings: &Settings,
    dt: f32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    // Tiles move first so a carried body follows this tick's displacement
    state.level.advance(dt);

    state
        .player
        .update(&mut state.body, &state.level, input, settings, dt, &mut events);

    let charged = events
        .iter()
        .any(|e| matches!(e, GameEvent::ChargeStarted { .. }));
    if charged && state.timer.start() {
        events.push(GameEvent::TimerStarted);
    }

    step_body(state, settings, dt);

    dispatch_tile_contacts(state, &mut events);
    dispatch_kill_volumes(state, &mut events);

    state.timer.tick(dt);
    events
}

fn step_body(state: &mut PlayState, settings: &Settings, dt: f32) {
    if let Some(id) = state.body.attached_to {
        state.body.position += state.level.tile_delta(id);
    }
    state.body.integrate(dt, settings.physics.gravity);
    state.body.resolve(state.level.solids());
}

/// Diff this tick's tile contacts against the last tick's and react to
/// contacts that ended, then to contacts that began
fn dispatch_tile_contacts(state: &mut PlayState, events: &mut Vec<GameEvent>) {
    let body_box = state.body.aabb();
    let now: BTreeSet<TileId> = state
        .level
        .tiles
        .iter()
        .filter(|t| body_box.touches(&t.collider))
        .map(|t| t.id)
        .collect();

    let ended: Vec<TileId> = state.tile_contacts.difference(&now).copied().collect();
    let began: Vec<TileId> = now.difference(&state.tile_contacts).copied().collect();
    state.tile_contacts = now;

    for id in ended {
        if let Some(reaction) = state.level.tile(id).map(Tile::on_contact_end) {
            apply_reaction(state, id, reaction, events);
        }
    }

    for id in began {
        let turn_is_red = state.player.is_red_turn();
        if let Some(reaction) = state.level.tile(id).map(|t| t.on_contact(turn_is_red)) {
            apply_reaction(state, id, reaction, events);
        }
    }
}

fn apply_reaction(
    state: &mut PlayState,
    tile: TileId,
    reaction: TileReaction,
    events: &mut Vec<GameEvent>,
) {
    match reaction {
        TileReaction::None | TileReaction::Safe => {}
        TileReaction::Kill => {
            if state.player.die(&mut state.body) {
                events.push(GameEvent::Died {
                    cause: DeathCause::ColorMismatch(tile),
                });
            }
        }
        TileReaction::Attach(id) => {
            state.body.attached_to = Some(id);
            log::debug!("Attached to moving tile {}", id.0);
        }
        TileReaction::Detach(id) => {
            if state.body.attached_to == Some(id) {
                state.body.attached_to = None;
                log::debug!("Detached from moving tile {}", id.0);
            }
        }
        TileReaction::ActivateCheckpoint(id) => {
            if !state.level.activate_save_point(id) {
                return;
            }
            let half_height = state.body.half_extents.y;
            if let Some(spawn) = state.level.tile(id).map(|t| t.standing_point(half_height)) {
                state.player.set_spawn_point(spawn);
                events.push(GameEvent::CheckpointActivated { tile: id, spawn });
            }
        }
        TileReaction::Finish => {
            let time = state.timer.finish();
            events.push(GameEvent::Finished { time });
        }
    }
}

/// Kill volumes are triggers: entering one kills, staying inside does nothing
fn dispatch_kill_volumes(state: &mut PlayState, events: &mut Vec<GameEvent>) {
    let body_box = state.body.aabb();
    let now: BTreeSet<usize> = state
        .level
        .kill_volumes
        .iter()
        .enumerate()
        .filter(|(_, volume)| body_box.overlaps(volume))
        .map(|(i, _)| i)
        .collect();

    let entered: Vec<usize> = now.difference(&state.volume_contacts).copied().collect();
    state.volume_contacts = now;

    for index in entered {
        log::info!("Player entered kill volume {}", index);
        if state.player.die(&mut state.body) {
            events.push(GameEvent::Died {
                cause: DeathCause::KillVolume(index),
            });
        }
    }
}
