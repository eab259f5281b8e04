//! Finish sequence
//!
//! On the first finish of a run: persist the time, show the result panel,
//! then submit the score and fetch the top times in the background. The
//! background task reports back over a channel that the frame loop drains
//! with [`Outcome::poll`], so a slow or failing leaderboard never stalls a
//! tick.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::highscores::{HighScores, format_time};
use crate::hud::Hud;
use crate::leaderboard::LeaderboardClient;
use crate::persistence::{BEST_TIME_KEY, PrefStore};

/// Leaderboard results for run `generation`
#[derive(Debug)]
struct BoardUpdate {
    generation: u32,
    board: HighScores,
}

#[derive(Debug, Clone)]
struct LeaderboardLink {
    client: LeaderboardClient,
    runtime: Handle,
}

#[derive(Debug)]
pub struct Outcome {
    link: Option<LeaderboardLink>,
    slots: usize,
    rng: Pcg32,
    /// Set by the first finish of a run, cleared by `reset`
    finish_handled: bool,
    /// Bumped on reset so late results from an earlier run are dropped
    generation: u32,
    tx: mpsc::UnboundedSender<BoardUpdate>,
    rx: mpsc::UnboundedReceiver<BoardUpdate>,
    pending: usize,
    board: Option<HighScores>,
}

impl Outcome {
    /// Outcome without a leaderboard: results show placeholder rows
    pub fn offline(slots: usize, seed: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            link: None,
            slots,
            rng: Pcg32::seed_from_u64(seed),
            finish_handled: false,
            generation: 0,
            tx,
            rx,
            pending: 0,
            board: None,
        }
    }

    /// Outcome that submits to `client`, running the calls on `runtime`
    pub fn with_leaderboard(
        client: LeaderboardClient,
        runtime: Handle,
        slots: usize,
        seed: u64,
    ) -> Self {
        Self {
            link: Some(LeaderboardLink { client, runtime }),
            ..Self::offline(slots, seed)
        }
    }

    pub fn is_finish_handled(&self) -> bool {
        self.finish_handled
    }

    /// Leaderboard calls still in flight
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Last board shown for this run
    pub fn board(&self) -> Option<&HighScores> {
        self.board.as_ref()
    }

    /// Run the finish sequence. Returns `false` if this run already finished.
    pub fn finish(&mut self, time: f32, prefs: &mut dyn PrefStore, hud: &mut Hud) -> bool {
        if self.finish_handled {
            log::debug!("Finish already handled for this run");
            return false;
        }
        self.finish_handled = true;

        prefs.set_f32(BEST_TIME_KEY, time);
        if let Err(e) = prefs.save() {
            log::error!("Failed to save {}: {}", BEST_TIME_KEY, e);
        }

        hud.show_panel(true);
        hud.set_final_time_text(&format!("Your Time: {}", format_time(time)));
        log::info!("Run finished in {}", format_time(time));

        let Some(link) = &self.link else {
            self.show_board(HighScores::empty(self.slots), hud);
            return true;
        };

        let player_id = format!("Player{}", self.rng.random_range(1..1000));
        let client = link.client.clone();
        let tx = self.tx.clone();
        let slots = self.slots;
        let generation = self.generation;
        self.pending += 1;

        link.runtime.spawn(async move {
            // The board is fetched even when the submit failed
            if client.submit(&player_id, time).await.is_err() {
                log::debug!("Showing leaderboard without {}'s time", player_id);
            }
            let times = client.fetch_top(slots).await;
            let _ = tx.send(BoardUpdate {
                generation,
                board: HighScores::from_times(times, slots),
            });
        });
        true
    }

    /// Apply any leaderboard results that arrived since the last frame
    pub fn poll(&mut self, hud: &mut Hud) {
        while let Ok(update) = self.rx.try_recv() {
            self.apply(update, hud);
        }
    }

    /// Wait (bounded) for every in-flight leaderboard call
    pub async fn settle(&mut self, hud: &mut Hud, timeout: Duration) {
        while self.pending > 0 {
            match tokio::time::timeout(timeout, self.rx.recv()).await {
                Ok(Some(update)) => self.apply(update, hud),
                Ok(None) => break,
                Err(_) => {
                    log::warn!(
                        "Gave up waiting for {} leaderboard call(s)",
                        self.pending
                    );
                    break;
                }
            }
        }
    }

    fn apply(&mut self, update: BoardUpdate, hud: &mut Hud) {
        self.pending = self.pending.saturating_sub(1);
        if update.generation != self.generation {
            log::debug!("Dropping leaderboard results from an earlier run");
            return;
        }
        self.show_board(update.board, hud);
    }

    fn show_board(&mut self, board: HighScores, hud: &mut Hud) {
        hud.set_leaderboard(&board);
        self.board = Some(board);
    }

    /// Ready for a new run
    pub fn reset(&mut self) {
        self.finish_handled = false;
        self.generation = self.generation.wrapping_add(1);
        self.board = None;
    }
}
