//! Game session
//!
//! Owns every subsystem for one play session and exposes a single `tick`.
//! Level-wide keys (restart, quit) are handled here; everything else is
//! forwarded to the simulation, whose events drive the finish sequence and
//! the HUD.

use std::time::Duration;

use crate::hud::Hud;
use crate::outcome::Outcome;
use crate::persistence::PrefStore;
use crate::platform::InputSnapshot;
use crate::settings::Settings;
use crate::sim::{self, GameEvent, LevelBlueprint, PlayState};

pub struct Session {
    settings: Settings,
    blueprint: LevelBlueprint,
    state: PlayState,
    outcome: Outcome,
    hud: Hud,
    prefs: Box<dyn PrefStore>,
    quit_requested: bool,
}

impl Session {
    pub fn new(
        settings: Settings,
        blueprint: LevelBlueprint,
        outcome: Outcome,
        hud: Hud,
        prefs: Box<dyn PrefStore>,
    ) -> Self {
        let state = PlayState::new(&blueprint, &settings);
        log::info!("Session started on '{}'", blueprint.name);
        Self {
            settings,
            blueprint,
            state,
            outcome,
            hud,
            prefs,
            quit_requested: false,
        }
    }

    /// Advance one fixed step
    pub fn tick(&mut self, input: &InputSnapshot, dt: f32) -> Vec<GameEvent> {
        if input.was_pressed(self.settings.keys.quit) {
            if !self.quit_requested {
                log::info!("Quit requested");
            }
            self.quit_requested = true;
            return Vec::new();
        }
        if input.was_pressed(self.settings.keys.restart) {
            self.restart();
            return Vec::new();
        }

        let events = sim::tick(&mut self.state, input, &self.settings, dt);

        for event in &events {
            if let GameEvent::Finished { time } = *event {
                self.outcome
                    .finish(time, self.prefs.as_mut(), &mut self.hud);
            }
        }

        if self.state.timer.is_running() {
            self.hud.set_timer_text(&self.state.timer.display());
        }
        self.outcome.poll(&mut self.hud);
        events
    }

    /// Rebuild the level and start over with player 1
    pub fn restart(&mut self) {
        self.state = PlayState::new(&self.blueprint, &self.settings);
        self.outcome.reset();
        self.hud.reset();
        log::info!("Level '{}' restarted", self.blueprint.name);
    }

    /// Wait for outstanding leaderboard calls (shutdown)
    pub async fn settle(&mut self, timeout: Duration) {
        self.outcome.settle(&mut self.hud, timeout).await;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &PlayState {
        &self.state
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn prefs(&self) -> &dyn PrefStore {
        self.prefs.as_ref()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::persistence::{BEST_TIME_KEY, MemoryPrefs};
    use crate::platform::Key;
    use crate::sim::TileSpec;
    use glam::Vec3;

    fn session(blueprint: LevelBlueprint) -> Session {
        Session::new(
            Settings::default(),
            blueprint,
            Outcome::offline(5, 3),
            Hud::new(5),
            Box::new(MemoryPrefs::new()),
        )
    }

    /// Player 1 dropped onto a finish tile
    fn finish_line() -> LevelBlueprint {
        LevelBlueprint::new("finish", Vec3::new(0.0, 0.6, 0.0)).tile(TileSpec::Finish, Vec3::ZERO, 2.0)
    }

    #[test]
    fn test_timer_text_follows_run() {
        let mut s = session(LevelBlueprint::demo());
        s.tick(&InputSnapshot::default().press(Key::Space), SIM_DT);
        for _ in 0..119 {
            s.tick(&InputSnapshot::default().hold(Key::Space), SIM_DT);
        }
        assert!(s.state().timer.is_running());
        assert_eq!(s.hud().timer_text(), Some(s.state().timer.display().as_str()));
        assert!(s.state().timer.elapsed() > 0.99);
    }

    #[test]
    fn test_finish_persists_and_shows_panel() {
        let mut s = session(finish_line());
        s.tick(&InputSnapshot::default().press(Key::Space), SIM_DT);
        for _ in 0..60 {
            s.tick(&InputSnapshot::default().hold(Key::Space), SIM_DT);
        }

        let time = s.state().timer.elapsed();
        assert!(s.state().timer.is_finished());
        assert!(s.outcome().is_finish_handled());
        assert_eq!(s.prefs().get_f32(BEST_TIME_KEY), Some(time));
        assert!(s.hud().is_panel_visible());
        assert_eq!(s.hud().leaderboard_lines().len(), 5);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut s = session(finish_line());
        s.tick(&InputSnapshot::default().press(Key::Space), SIM_DT);
        for _ in 0..60 {
            s.tick(&InputSnapshot::default().hold(Key::Space), SIM_DT);
        }
        assert!(s.hud().is_panel_visible());

        let events = s.tick(&InputSnapshot::default().press(Key::R), SIM_DT);
        assert!(events.is_empty());
        assert!(!s.hud().is_panel_visible());
        assert_eq!(s.hud().timer_text(), Some("00:00:00"));
        assert!(!s.outcome().is_finish_handled());
        assert_eq!(s.state().timer.elapsed(), 0.0);
        assert!(!s.state().timer.is_finished());
        assert!(s.state().player.is_player1_turn());
        assert_eq!(s.state().body.position, Vec3::new(0.0, 0.6, 0.0));
    }

    #[test]
    fn test_quit_sets_flag_and_skips_tick() {
        let mut s = session(LevelBlueprint::demo());
        let before = s.state().time_ticks;
        s.tick(&InputSnapshot::default().press(Key::Escape), SIM_DT);
        assert!(s.quit_requested());
        assert_eq!(s.state().time_ticks, before);
    }
}
