pub mod player;
pub mod reader;

use common::GameData;
use std::path::PathBuf;

/// A snapshot feed loaded from disk.
#[derive(Debug)]
pub struct ReplayData {
    pub source: PathBuf,
    pub game: GameData,
}

impl ReplayData {
    pub fn title(&self) -> String {
        self.source
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("replay")
            .to_string()
    }
}
