//! Game configuration and high-score persistence.
//!
//! Settings come from an optional INI file; anything missing keeps its
//! default, so the game always starts.
//!
//! ```ini
//! [game]
//! target_fps = 30
//! show_bounds = false
//! high_score_file = /home/me/.robo_mission_score
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use configparser::ini::Ini;
use log::{info, warn};

const DEFAULT_TARGET_FPS: u32 = 30;
const MIN_TARGET_FPS: u32 = 1;
const MAX_TARGET_FPS: u32 = 240;
const DEFAULT_SHOW_BOUNDS: bool = false;
const DEFAULT_CONFIG_PATH: &str = "./robo_mission.ini";
const HIGH_SCORE_FILE_NAME: &str = ".robo_mission_score";

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Frames the driver tries to render per second.
    pub target_fps: u32,
    /// Overlay the collision boxes on top of the sprites.
    pub show_bounds: bool,
    /// Where the best score survives between runs.
    pub high_score_path: PathBuf,
    /// The INI file this configuration is loaded from / saved to.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            show_bounds: DEFAULT_SHOW_BOUNDS,
            high_score_path: default_high_score_path(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load settings from `config_path`.
    ///
    /// Missing keys retain their current values.  Returns an error if the
    /// file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.load(&self.config_path)
            .map_err(|e| format!("Failed to load config file {:?}: {}", self.config_path, e))?;

        if let Some(fps) = ini.getuint("game", "target_fps").ok().flatten() {
            self.set_target_fps(fps.min(u64::from(u32::MAX)) as u32);
        }
        match ini.getbool("game", "show_bounds") {
            Ok(Some(show)) => self.show_bounds = show,
            Ok(None) => {}
            Err(e) => warn!("Ignoring show_bounds: {}", e),
        }
        if let Some(path) = ini.get("game", "high_score_file") {
            self.high_score_path = PathBuf::from(path);
        }

        info!(
            "Loaded config from {:?}: fps={}, show_bounds={}, high_score_file={:?}",
            self.config_path, self.target_fps, self.show_bounds, self.high_score_path
        );
        Ok(())
    }

    /// Write the current settings to `config_path`, creating the file.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.set("game", "target_fps", Some(self.target_fps.to_string()));
        ini.set("game", "show_bounds", Some(self.show_bounds.to_string()));
        ini.set(
            "game",
            "high_score_file",
            Some(self.high_score_path.display().to_string()),
        );
        ini.write(&self.config_path)
            .map_err(|e| format!("Failed to save config file {:?}: {}", self.config_path, e))?;

        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    /// Clamped to a sane range so a typo cannot stall or spin the loop.
    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps.clamp(MIN_TARGET_FPS, MAX_TARGET_FPS);
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(MIN_TARGET_FPS)
    }
}

// ── High-score persistence ────────────────────────────────────────────────────

fn default_high_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(HIGH_SCORE_FILE_NAME)
}

/// A missing or unreadable file counts as no high score yet.
pub fn load_high_score(path: &Path) -> u32 {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

pub fn save_high_score(path: &Path, score: u32) -> std::io::Result<()> {
    std::fs::write(path, score.to_string())
}

/// The best score across runs, written to disk whenever it is beaten.
///
/// Robo can keep drifting past rocks after the run has ended, so the
/// driver feeds every frame's score through [`HighScore::record`] rather
/// than only the score at the moment of the crash.
#[derive(Debug, Clone)]
pub struct HighScore {
    path: PathBuf,
    best: u32,
    best_before_run: u32,
}

impl HighScore {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = load_high_score(&path);
        HighScore {
            path,
            best,
            best_before_run: best,
        }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// The record the current run has to beat.
    pub fn best_before_run(&self) -> u32 {
        self.best_before_run
    }

    /// Whether `score` beats the record as it stood when the run started.
    pub fn is_new_best(&self, score: u32) -> bool {
        score > self.best_before_run
    }

    /// Call when a fresh run begins.
    pub fn start_run(&mut self) {
        self.best_before_run = self.best;
    }

    /// Raise and persist the best score if `score` beats it.
    ///
    /// Returns whether the record moved.  The in-memory record is raised
    /// even when the write fails.
    pub fn record(&mut self, score: u32) -> std::io::Result<bool> {
        if score <= self.best {
            return Ok(false);
        }
        self.best = score;
        save_high_score(&self.path, score)?;
        Ok(true)
    }
}
