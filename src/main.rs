//! Tandem Hop entry point
//!
//! Headless native build: loads settings, bootstraps the leaderboard, then
//! lets the scripted autopilot play the demo course through the fixed
//! timestep loop and prints the result panel.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::time::Duration;

    use tandem_hop::format_time;
    use tandem_hop::leaderboard::{
        FileLeaderboard, GuestIdentityProvider, LeaderboardBackend, LeaderboardClient,
        MemoryLeaderboard, bootstrap_identity,
    };
    use tandem_hop::persistence::{BEST_TIME_KEY, FilePrefs, MemoryPrefs, PrefStore};
    use tandem_hop::sim::LevelBlueprint;
    use tandem_hop::{GameLoop, Hud, Outcome, ScriptedInput, Session, Settings};

    /// Optional path to a settings JSON file
    const SETTINGS_ENV: &str = "TANDEM_HOP_SETTINGS";
    const DATA_DIR: &str = "tandem-hop-data";
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Two simulated minutes
    const MAX_FRAMES: u64 = 60 * 120;
    const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn run() {
        env_logger::init();
        log::info!("Tandem Hop (native) starting...");

        let settings_path = std::env::var_os(SETTINGS_ENV).map(PathBuf::from);
        let settings = Settings::load_or_default(settings_path.as_deref());
        let slots = settings.leaderboard.display_slots;

        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                log::error!("Failed to start async runtime: {}", e);
                return;
            }
        };

        let data_dir = Path::new(DATA_DIR);
        if let Err(e) = std::fs::create_dir_all(data_dir) {
            log::error!("Cannot create {}: {}", data_dir.display(), e);
        }

        let seed = chrono::Utc::now().timestamp_millis() as u64;
        let client = runtime.block_on(connect_leaderboard(&settings, seed, data_dir));
        let outcome = Outcome::with_leaderboard(client, runtime.handle().clone(), slots, seed);

        let prefs: Box<dyn PrefStore> = match FilePrefs::open(data_dir.join("prefs.json")) {
            Ok(prefs) => Box::new(prefs),
            Err(e) => {
                log::warn!("Preferences unavailable, using memory: {}", e);
                Box::new(MemoryPrefs::new())
            }
        };
        if let Some(last) = prefs.get_f32(BEST_TIME_KEY) {
            log::info!("Last recorded time: {}", format_time(last));
        }

        let mut session = Session::new(
            settings,
            LevelBlueprint::demo(),
            outcome,
            Hud::new(slots),
            prefs,
        );
        let mut game_loop = GameLoop::new();
        let mut script = ScriptedInput::demo();

        let summary = game_loop.run(&mut session, &mut script, FRAME_DT, MAX_FRAMES);
        log::info!(
            "Ran {} frames ({} ticks), quit: {}",
            summary.frames,
            summary.ticks,
            summary.quit
        );

        runtime.block_on(session.settle(SETTLE_TIMEOUT));

        let hud = session.hud();
        if !hud.is_panel_visible() {
            println!("Run did not finish");
            return;
        }
        if let Some(text) = hud.final_time_text() {
            println!("{}", text);
        }
        for line in hud.leaderboard_lines() {
            println!("{}", line);
        }
    }

    async fn connect_leaderboard(
        settings: &Settings,
        seed: u64,
        data_dir: &Path,
    ) -> LeaderboardClient {
        let board = &settings.leaderboard;
        let identity =
            bootstrap_identity(&GuestIdentityProvider::new(board.region.as_str(), seed)).await;

        let backend: Arc<dyn LeaderboardBackend> =
            match FileLeaderboard::create(board.table_name.as_str(), data_dir.join("leaderboard.json"))
                .await
            {
                Ok(table) => Arc::new(table),
                Err(e) => {
                    log::warn!("Falling back to in-memory leaderboard: {}", e);
                    Arc::new(MemoryLeaderboard::new(board.table_name.as_str()))
                }
            };

        LeaderboardClient::connect(backend, identity, board).await
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless demo is native only
}
