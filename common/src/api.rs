//! Wire types for the simulator run-control HTTP API.

use serde::{Deserialize, Serialize};

use crate::results::Mode;

/// Simulator binary named in the command preview.
pub const SIMULATOR_COMMAND: &str = "../Simulator/simulator_318835816_211314471";

pub const RUN_PATH: &str = "/api/simulate/run";
pub const OUTPUT_PATH: &str = "/api/output";
pub const LATEST_RESULTS_PATH: &str = "/api/results/latest";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RunSettings {
    #[serde(rename_all = "camelCase")]
    Basic {
        game_map: String,
        game_manager: String,
        algorithm1: String,
        algorithm2: String,
    },
    #[serde(rename_all = "camelCase")]
    Comparative {
        game_map: String,
        game_managers_folder: String,
        algorithm1: String,
        algorithm2: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        num_threads: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Competition {
        game_maps_folder: String,
        game_manager: String,
        algorithms_folder: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        num_threads: Option<u32>,
    },
}

/// Body of a run request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(flatten)]
    pub settings: RunSettings,
    #[serde(default)]
    pub verbose: bool,
}

impl RunConfig {
    pub fn mode(&self) -> Mode {
        match self.settings {
            RunSettings::Basic { .. } => Mode::Basic,
            RunSettings::Comparative { .. } => Mode::Comparative,
            RunSettings::Competition { .. } => Mode::Competition,
        }
    }

    /// Argument pairs in the order the simulator command line lists them.
    fn arguments(&self) -> Vec<(&'static str, String)> {
        let threads = |n: &Option<u32>| n.map(|n| ("numThreads", n.to_string()));
        match &self.settings {
            RunSettings::Basic {
                game_map,
                game_manager,
                algorithm1,
                algorithm2,
            } => vec![
                ("gameMap", game_map.clone()),
                ("gameManager", game_manager.clone()),
                ("algorithm1", algorithm1.clone()),
                ("algorithm2", algorithm2.clone()),
            ],
            RunSettings::Comparative {
                game_map,
                game_managers_folder,
                algorithm1,
                algorithm2,
                num_threads,
            } => {
                let mut args = vec![
                    ("gameMap", game_map.clone()),
                    ("gameManagersFolder", game_managers_folder.clone()),
                    ("algorithm1", algorithm1.clone()),
                    ("algorithm2", algorithm2.clone()),
                ];
                args.extend(threads(num_threads));
                args
            }
            RunSettings::Competition {
                game_maps_folder,
                game_manager,
                algorithms_folder,
                num_threads,
            } => {
                let mut args = vec![
                    ("gameMapsFolder", game_maps_folder.clone()),
                    ("gameManager", game_manager.clone()),
                    ("algorithmsFolder", algorithms_folder.clone()),
                ];
                args.extend(threads(num_threads));
                args
            }
        }
    }

    /// The simulator invocation this configuration stands for, as shown to
    /// the user before submitting. Empty values are left out.
    pub fn command_preview(&self) -> String {
        let mut command = format!("{SIMULATOR_COMMAND} -{}", self.mode());
        for (key, value) in self.arguments() {
            if !value.is_empty() {
                command.push_str(&format!(" {key}=\"{value}\""));
            }
        }
        if self.verbose {
            command.push_str(" -verbose");
        }
        command
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunAccepted {
    pub message: String,
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl ApiError {
    /// Most specific description available, preferring `details`.
    pub fn describe(&self, status: u16) -> String {
        self.details
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| format!("HTTP {status}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPoll {
    #[serde(default)]
    pub output: String,
    pub running: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestResults {
    pub success: bool,
    #[serde(default)]
    pub has_results: bool,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl LatestResults {
    /// Result text, when the server found any.
    pub fn content(&self) -> Option<&str> {
        if self.success && self.has_results {
            self.content.as_deref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn basic_config_serializes_as_flat_camel_case() {
        let config = RunConfig {
            settings: RunSettings::Basic {
                game_map: "maps/a.txt".to_string(),
                game_manager: "gm.so".to_string(),
                algorithm1: "a1.so".to_string(),
                algorithm2: "a2.so".to_string(),
            },
            verbose: true,
        };

        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            serde_json::json!({
                "mode": "basic",
                "gameMap": "maps/a.txt",
                "gameManager": "gm.so",
                "algorithm1": "a1.so",
                "algorithm2": "a2.so",
                "verbose": true,
            })
        );
    }

    #[test]
    fn command_preview_skips_empty_values() {
        let config = RunConfig {
            settings: RunSettings::Competition {
                game_maps_folder: "maps".to_string(),
                game_manager: String::new(),
                algorithms_folder: "algos".to_string(),
                num_threads: Some(4),
            },
            verbose: false,
        };

        assert_eq!(
            config.command_preview(),
            format!(
                "{SIMULATOR_COMMAND} -competition gameMapsFolder=\"maps\" algorithmsFolder=\"algos\" numThreads=\"4\""
            )
        );
        assert_eq!(config.mode(), Mode::Competition);
    }

    #[test]
    fn api_error_prefers_details() {
        let err: ApiError =
            serde_json::from_str(r#"{"error":"Invalid JSON in request body","details":"eof"}"#)
                .unwrap();
        assert_eq!(err.describe(400), "eof");

        let bare: ApiError = serde_json::from_str("{}").unwrap();
        assert_eq!(bare.describe(502), "HTTP 502");
    }
}
