/// High-score persistence: one non-negative integer in a plain text file.
use std::io;
use std::path::{Path, PathBuf};

use log::warn;

use crate::config::{HIGH_SCORE_ENV, HIGH_SCORE_FILE_NAME};

/// `$TANK_GAME_SCORE_FILE` if set, otherwise `$HOME/.tank_game_score`.
pub fn default_path() -> PathBuf {
    if let Ok(path) = std::env::var(HIGH_SCORE_ENV) {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(HIGH_SCORE_FILE_NAME)
}

/// Missing or unparsable files read as zero.
pub fn load(path: &Path) -> u32 {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

pub fn save(path: &Path, score: u32) -> io::Result<()> {
    std::fs::write(path, score.to_string())
}

pub fn reset(path: &Path) -> io::Result<()> {
    save(path, 0)
}

/// Persist `score` if it beats `previous`. Failures are logged, not fatal.
pub fn record(path: &Path, previous: u32, score: u32) -> u32 {
    if score <= previous {
        return previous;
    }
    if let Err(err) = save(path, score) {
        warn!("could not write high score to {}: {}", path.display(), err);
    }
    score
}
