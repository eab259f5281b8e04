//! Finish-panel leaderboard display
//!
//! Fastest times first, a fixed number of rows, placeholder rows when the
//! remote table returned fewer entries (or nothing at all).

/// Placeholder shown for an empty row
pub const EMPTY_ROW: &str = "---";

/// Format seconds as `MM:SS:hh` (minutes, seconds, hundredths)
pub fn format_time(time_secs: f32) -> String {
    let time_secs = time_secs.max(0.0);
    let minutes = (time_secs / 60.0).floor() as u32;
    let seconds = (time_secs % 60.0).floor() as u32;
    let hundredths = ((time_secs * 100.0) % 100.0).floor() as u32;
    format!("{:02}:{:02}:{:02}", minutes, seconds, hundredths)
}

/// Leaderboard rows as displayed after a run
#[derive(Debug, Clone, PartialEq)]
pub struct HighScores {
    /// Times in ascending order, at most `slots` long
    times: Vec<f32>,
    slots: usize,
}

impl HighScores {
    /// Empty board (all placeholder rows)
    pub fn empty(slots: usize) -> Self {
        Self {
            times: Vec::new(),
            slots,
        }
    }

    /// Build a board from unordered times; non-finite values are dropped
    pub fn from_times(mut times: Vec<f32>, slots: usize) -> Self {
        times.retain(|t| t.is_finite());
        times.sort_by(f32::total_cmp);
        times.truncate(slots);
        Self { times, slots }
    }

    pub fn times(&self) -> &[f32] {
        &self.times
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Fastest time on the board (if any)
    pub fn top_time(&self) -> Option<f32> {
        self.times.first().copied()
    }

    /// Display rows, 1-indexed: `"1. 00:09:80"` or `"4. ---"`
    pub fn rows(&self) -> Vec<String> {
        (0..self.slots)
            .map(|i| match self.times.get(i) {
                Some(&t) => format!("{}. {}", i + 1, format_time(t)),
                None => format!("{}. {}", i + 1, EMPTY_ROW),
            })
            .collect()
    }
}
