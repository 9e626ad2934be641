//! Single-file high score store

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{HighScoreStore, parse_high_score};
use crate::error::Result;

/// Default file name, relative to the working directory
pub const DEFAULT_HIGH_SCORE_FILE: &str = "highscore.txt";

/// Stores the high score as a decimal string in one file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_SCORE_FILE)
    }
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file a save is staged in before being renamed over `path`
    fn staging_path(&self) -> PathBuf {
        let mut staged = self.path.clone().into_os_string();
        staged.push(".tmp");
        PathBuf::from(staged)
    }
}

impl HighScoreStore for FileStore {
    fn load(&self) -> Option<u64> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let score = parse_high_score(&raw);
                if let Some(score) = score {
                    log::info!("Loaded high score {} from {}", score, self.path.display());
                }
                score
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No high score found, starting fresh");
                None
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&mut self, score: u64) -> Result<()> {
        // Rename is atomic, so a crash mid-write never truncates the old score
        let staged = self.staging_path();
        fs::write(&staged, score.to_string())?;
        if let Err(e) = fs::rename(&staged, &self.path) {
            let _ = fs::remove_file(&staged);
            return Err(e.into());
        }
        log::info!("High score {} saved to {}", score, self.path.display());
        Ok(())
    }
}
