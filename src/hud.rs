//! HUD text slots
//!
//! The game writes plain strings into named slots; whatever draws the screen
//! reads them back. A slot the layout does not provide is skipped with a
//! single warning.

use std::collections::BTreeSet;

use crate::highscores::HighScores;

/// A line of on-screen text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub visible: bool,
}

impl Label {
    fn shown(text: &str) -> Self {
        Self {
            text: text.to_string(),
            visible: true,
        }
    }
}

/// Which slots exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudLayout {
    pub timer: bool,
    pub panel: bool,
    pub final_time: bool,
    pub leaderboard_rows: usize,
}

impl HudLayout {
    pub fn full(leaderboard_rows: usize) -> Self {
        Self {
            timer: true,
            panel: true,
            final_time: true,
            leaderboard_rows,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Hud {
    timer: Option<Label>,
    /// Result panel; its label is the heading
    panel: Option<Label>,
    final_time: Option<Label>,
    rows: Vec<Label>,
    warned: BTreeSet<&'static str>,
}

const TIMER_ZERO: &str = "00:00:00";
const PANEL_HEADING: &str = "Finished!";

impl Hud {
    pub fn new(leaderboard_rows: usize) -> Self {
        Self::with_layout(HudLayout::full(leaderboard_rows))
    }

    pub fn with_layout(layout: HudLayout) -> Self {
        let mut hud = Self {
            timer: layout.timer.then(Label::default),
            panel: layout.panel.then(Label::default),
            final_time: layout.final_time.then(Label::default),
            rows: vec![Label::default(); layout.leaderboard_rows],
            warned: BTreeSet::new(),
        };
        hud.reset();
        hud
    }

    /// Back to the start-of-run screen: zero timer, panel hidden
    pub fn reset(&mut self) {
        if let Some(timer) = &mut self.timer {
            *timer = Label::shown(TIMER_ZERO);
        }
        if let Some(panel) = &mut self.panel {
            panel.text = PANEL_HEADING.to_string();
            panel.visible = false;
        }
        if let Some(final_time) = &mut self.final_time {
            *final_time = Label::default();
        }
        for row in &mut self.rows {
            *row = Label::default();
        }
    }

    fn warn_missing(&mut self, slot: &'static str) {
        if self.warned.insert(slot) {
            log::warn!("HUD has no '{}' slot, skipping", slot);
        }
    }

    pub fn set_timer_text(&mut self, text: &str) {
        match &mut self.timer {
            Some(timer) => timer.text = text.to_string(),
            None => self.warn_missing("timer"),
        }
    }

    pub fn show_panel(&mut self, visible: bool) {
        match &mut self.panel {
            Some(panel) => panel.visible = visible,
            None => self.warn_missing("panel"),
        }
    }

    pub fn set_final_time_text(&mut self, text: &str) {
        match &mut self.final_time {
            Some(label) => *label = Label::shown(text),
            None => self.warn_missing("final time"),
        }
    }

    /// Fill the leaderboard rows; extra board rows without a slot are skipped
    pub fn set_leaderboard(&mut self, board: &HighScores) {
        let lines = board.rows();
        if lines.len() > self.rows.len() {
            self.warn_missing("leaderboard row");
        }
        for (row, line) in self.rows.iter_mut().zip(&lines) {
            *row = Label::shown(line);
        }
    }

    pub fn timer_text(&self) -> Option<&str> {
        self.timer.as_ref().map(|l| l.text.as_str())
    }

    pub fn is_panel_visible(&self) -> bool {
        self.panel.as_ref().is_some_and(|p| p.visible)
    }

    pub fn final_time_text(&self) -> Option<&str> {
        self.final_time
            .as_ref()
            .filter(|l| l.visible)
            .map(|l| l.text.as_str())
    }

    /// Visible leaderboard lines, top to bottom
    pub fn leaderboard_lines(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|l| l.visible)
            .map(|l| l.text.as_str())
            .collect()
    }
}
