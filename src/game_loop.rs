//! Fixed timestep driver
//!
//! Frames arrive with whatever dt the host measured; the session only ever
//! sees `SIM_DT` steps. Press/release edges are delivered to the first
//! substep that runs and then cleared.

use std::collections::VecDeque;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::platform::{InputSnapshot, Key};
use crate::session::Session;
use crate::sim::GameEvent;

/// Supplies one input snapshot per frame
pub trait InputSource {
    fn poll(&mut self, session: &Session, frame_dt: f32) -> InputSnapshot;
}

/// Accumulator loop with a substep cap
#[derive(Debug, Default)]
pub struct GameLoop {
    accumulator: f32,
    input: InputSnapshot,
    frames: u64,
    ticks: u64,
}

/// What a `run` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub ticks: u64,
    pub quit: bool,
}

impl GameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run the substeps owed for one frame
    pub fn frame(
        &mut self,
        session: &mut Session,
        input: InputSnapshot,
        frame_dt: f32,
    ) -> Vec<GameEvent> {
        self.input.absorb(input);
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.frames += 1;

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(session.tick(&self.input, SIM_DT));
            self.accumulator -= SIM_DT;
            substeps += 1;
            self.ticks += 1;

            // Clear one-shot inputs after processing
            self.input.clear_edges();

            if session.quit_requested() {
                break;
            }
        }
        // Drop time the cap refused to simulate
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        events
    }

    /// Drive frames of `frame_dt` until quit or `max_frames`
    pub fn run(
        &mut self,
        session: &mut Session,
        source: &mut dyn InputSource,
        frame_dt: f32,
        max_frames: u64,
    ) -> RunSummary {
        let start_frames = self.frames;
        let start_ticks = self.ticks;
        while !session.quit_requested() && self.frames - start_frames < max_frames {
            let input = source.poll(session, frame_dt);
            for event in self.frame(session, input, frame_dt) {
                log::debug!("{:?}", event);
            }
        }
        RunSummary {
            frames: self.frames - start_frames,
            ticks: self.ticks - start_ticks,
            quit: session.quit_requested(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ScriptPhase {
    /// Waiting before the next jump
    Settle { remaining: f32 },
    Holding { key: Key, remaining: f32 },
    /// Waiting for the turn to pass (or a death)
    Airborne { player1_turn: bool },
    /// Script used up; quit on the next frame
    Done,
    Quit,
}

/// Autopilot that plays a list of charge durations, one per turn
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    holds: VecDeque<f32>,
    settle_time: f32,
    phase: ScriptPhase,
}

impl ScriptedInput {
    /// `holds` are seconds to keep the jump key down; 0 is a tap
    pub fn new(holds: impl IntoIterator<Item = f32>, settle_time: f32) -> Self {
        Self {
            holds: holds.into_iter().collect(),
            settle_time,
            phase: ScriptPhase::Settle {
                remaining: settle_time,
            },
        }
    }

    /// Three taps then a half-second charge: clears the demo course
    pub fn demo() -> Self {
        Self::new([0.0, 0.0, 0.0, 0.5], 0.3)
    }

    pub fn is_done(&self) -> bool {
        matches!(self.phase, ScriptPhase::Done | ScriptPhase::Quit)
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, session: &Session, frame_dt: f32) -> InputSnapshot {
        let player = &session.state().player;
        let keys = &session.settings().keys;

        match self.phase {
            ScriptPhase::Settle { remaining } => {
                if player.is_dead() || !player.is_grounded() {
                    return InputSnapshot::default();
                }
                let remaining = remaining - frame_dt;
                if remaining > 0.0 {
                    self.phase = ScriptPhase::Settle { remaining };
                    return InputSnapshot::default();
                }
                match self.holds.pop_front() {
                    Some(hold) => {
                        let key = keys.jump_key(player.is_player1_turn());
                        self.phase = ScriptPhase::Holding {
                            key,
                            remaining: hold,
                        };
                        InputSnapshot::default().press(key)
                    }
                    None => {
                        self.phase = ScriptPhase::Done;
                        InputSnapshot::default()
                    }
                }
            }
            ScriptPhase::Holding { key, remaining } => {
                let remaining = remaining - frame_dt;
                if remaining > 0.0 {
                    self.phase = ScriptPhase::Holding { key, remaining };
                    InputSnapshot::default().hold(key)
                } else {
                    self.phase = ScriptPhase::Airborne {
                        player1_turn: player.is_player1_turn(),
                    };
                    InputSnapshot::default().release(key)
                }
            }
            ScriptPhase::Airborne { player1_turn } => {
                if player.is_dead() || player.is_player1_turn() != player1_turn {
                    self.phase = ScriptPhase::Settle {
                        remaining: self.settle_time,
                    };
                }
                InputSnapshot::default()
            }
            ScriptPhase::Done => {
                self.phase = ScriptPhase::Quit;
                InputSnapshot::default().press(keys.quit)
            }
            ScriptPhase::Quit => InputSnapshot::default(),
        }
    }
}
