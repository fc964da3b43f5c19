use super::*;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

pub struct ReplayReader;

impl ReplayReader {
    /// Loads a snapshot feed, either plain `.json` or gzip-compressed
    /// `.json.gz`.
    pub fn load_replay(path: &Path) -> Result<ReplayData> {
        let mut file =
            File::open(path).with_context(|| format!("Failed to open replay file: {:?}", path))?;

        let mut json = String::new();
        if path.extension() == Some(OsStr::new("gz")) {
            GzDecoder::new(file)
                .read_to_string(&mut json)
                .with_context(|| format!("Failed to decompress replay file: {:?}", path))?;
        } else {
            file.read_to_string(&mut json)
                .with_context(|| format!("Failed to read replay file: {:?}", path))?;
        }

        let game = GameData::from_json(&json)
            .with_context(|| format!("Failed to parse snapshots in {:?}", path))?;
        tracing::info!(path = ?path, snapshots = game.len(), "Loaded replay");

        Ok(ReplayData {
            source: path.to_path_buf(),
            game,
        })
    }

    pub fn is_replay_file(path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        name.ends_with(".json") || name.ends_with(".json.gz")
    }

    pub fn list_replays(dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut replays = Vec::new();

        fn find_replay_files(dir: &Path, replays: &mut Vec<PathBuf>) -> Result<()> {
            for entry in fs::read_dir(dir)? {
                let path = entry?.path();

                if path.is_dir() {
                    if let Err(e) = find_replay_files(&path, replays) {
                        tracing::debug!(dir = ?path, error = %e, "Skipping unreadable directory");
                    }
                } else if ReplayReader::is_replay_file(&path) {
                    replays.push(path);
                }
            }
            Ok(())
        }

        find_replay_files(dir, &mut replays)
            .with_context(|| format!("Failed to scan replay directory: {:?}", dir))?;

        // Newest first
        replays.sort_by_key(|path| {
            std::cmp::Reverse(
                path.metadata()
                    .and_then(|m| m.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH),
            )
        });

        Ok(replays)
    }
}
