use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::ParseError;

const COMPLETION_MARKER: &str = "Game completed!";
const WINNER_MARKER: &str = "Winner:";
const REASON_PHRASES: [&str; 4] = [
    "all tanks destroyed",
    "maximum steps reached",
    "no shells remaining",
    "Reason:",
];

static LAUNCH_CONFIG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"game_map="([^"]*)".*game_manager="([^"]*)".*algorithm1="([^"]*)".*algorithm2="([^"]*)""#,
    )
    .unwrap()
});
static ROUNDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:total\s+)?rounds?\s*:?\s*(\d+)").unwrap());
static TIE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:tie|draw)\b").unwrap());
static BOARD_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)final board|board state").unwrap());
static BOARD_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ #@12*]+$").unwrap());

/// Serialized as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum Winner {
    Tie,
    Player1,
    Player2,
}

impl From<Winner> for u8 {
    fn from(winner: Winner) -> u8 {
        winner.code()
    }
}

impl Winner {
    /// 0 for a tie, otherwise the winning player's number.
    pub fn code(self) -> u8 {
        match self {
            Winner::Tie => 0,
            Winner::Player1 => 1,
            Winner::Player2 => 2,
        }
    }

    fn from_line(line: &str) -> Option<Self> {
        if line.contains("Player 1 wins")
            || line.contains("Player 1 Wins")
            || line.contains("Winner: Player 1")
        {
            Some(Winner::Player1)
        } else if line.contains("Player 2 wins")
            || line.contains("Player 2 Wins")
            || line.contains("Winner: Player 2")
        {
            Some(Winner::Player2)
        } else if line.contains("Winner: Player 0") || TIE.is_match(line) {
            Some(Winner::Tie)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicConfig {
    pub game_map: Option<String>,
    pub game_manager: Option<String>,
    pub algorithm1: Option<String>,
    pub algorithm2: Option<String>,
}

impl BasicConfig {
    pub fn is_empty(&self) -> bool {
        self.game_map.is_none()
            && self.game_manager.is_none()
            && self.algorithm1.is_none()
            && self.algorithm2.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicResult {
    pub config: BasicConfig,
    pub winner: Option<Winner>,
    pub reason: Option<String>,
    pub rounds: Option<u32>,
    pub board_state: String,
}

/// Why basic-mode output could not be read as a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicDiagnosis {
    NoOutput,
    SimulationError,
    FileNotFound,
    PermissionDenied,
    IncompleteExecution,
    Unknown,
}

impl BasicDiagnosis {
    pub fn classify(text: &str) -> Self {
        if text.trim().is_empty() {
            BasicDiagnosis::NoOutput
        } else if text.contains("Error") || text.contains("error") {
            BasicDiagnosis::SimulationError
        } else if text.contains("No such file") || text.contains("not found") {
            BasicDiagnosis::FileNotFound
        } else if text.contains("Permission denied") {
            BasicDiagnosis::PermissionDenied
        } else if !text.contains(COMPLETION_MARKER) {
            BasicDiagnosis::IncompleteExecution
        } else {
            BasicDiagnosis::Unknown
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            BasicDiagnosis::NoOutput => "No Output",
            BasicDiagnosis::SimulationError => "Simulation Error",
            BasicDiagnosis::FileNotFound => "File Not Found",
            BasicDiagnosis::PermissionDenied => "Permission Error",
            BasicDiagnosis::IncompleteExecution => "Incomplete Execution",
            BasicDiagnosis::Unknown => "Unknown Error",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BasicDiagnosis::NoOutput => {
                "The simulation produced no output. This may indicate a configuration or file path error."
            }
            BasicDiagnosis::SimulationError => {
                "The simulation encountered an error during execution."
            }
            BasicDiagnosis::FileNotFound => {
                "One or more required files (map, game manager, or algorithms) could not be found."
            }
            BasicDiagnosis::PermissionDenied => {
                "Permission denied accessing required files. Check file permissions."
            }
            BasicDiagnosis::IncompleteExecution => {
                "The simulation did not complete successfully or was interrupted."
            }
            BasicDiagnosis::Unknown => {
                "The simulation did not produce the expected output format."
            }
        }
    }
}

pub fn is_valid_basic_output(text: &str) -> bool {
    text.contains(COMPLETION_MARKER) && text.contains(WINNER_MARKER)
}

pub(super) fn parse(text: &str) -> Result<BasicResult, ParseError> {
    if !is_valid_basic_output(text) {
        return Err(ParseError::MalformedBasic(BasicDiagnosis::classify(text)));
    }

    let mut result = BasicResult::default();
    let mut board_lines: Vec<&str> = Vec::new();
    let mut in_board = false;
    let mut board_done = false;
    let mut rounds_seen = false;

    for raw in text.lines() {
        let raw = raw.trim_end_matches('\r');
        let line = raw.trim();

        if result.config.is_empty() {
            if let Some(caps) = LAUNCH_CONFIG.captures(line) {
                result.config = BasicConfig {
                    game_map: Some(caps[1].to_string()),
                    game_manager: Some(caps[2].to_string()),
                    algorithm1: Some(caps[3].to_string()),
                    algorithm2: Some(caps[4].to_string()),
                };
            }
        }

        if let Some(winner) = Winner::from_line(line) {
            result.winner = Some(winner);
        }

        if REASON_PHRASES.iter().any(|phrase| line.contains(phrase)) {
            result.reason = Some(line.to_string());
        }

        if !rounds_seen {
            if let Some(caps) = ROUNDS.captures(line) {
                rounds_seen = true;
                result.rounds = caps[1].parse().ok();
            }
        }

        if board_done {
            continue;
        }
        if !in_board {
            in_board = BOARD_MARKER.is_match(line);
            continue;
        }
        if BOARD_LINE.is_match(raw) {
            board_lines.push(raw);
        } else if !board_lines.is_empty() {
            board_done = true;
        }
    }

    result.board_state = board_lines.join("\n");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_winner_config_and_rounds() {
        let text = "\
../Simulator/simulator -basic game_map=\"M\" game_manager=\"G\" algorithm1=\"A1\" algorithm2=\"A2\"
Loading map...

Game completed!
Winner: Player 1
rounds: 42
";
        let result = parse(text).unwrap();

        assert_eq!(result.winner, Some(Winner::Player1));
        assert_eq!(
            result.config,
            BasicConfig {
                game_map: Some("M".to_string()),
                game_manager: Some("G".to_string()),
                algorithm1: Some("A1".to_string()),
                algorithm2: Some("A2".to_string()),
            }
        );
        assert_eq!(result.rounds, Some(42));
        assert_eq!(result.reason, None);
        assert!(result.board_state.is_empty());
    }

    #[test]
    fn first_round_count_wins() {
        let text = "Game completed!\nWinner: Player 2\nTotal rounds: 17\nrounds 99\n";
        assert_eq!(parse(text).unwrap().rounds, Some(17));
    }

    #[test]
    fn unreadable_first_round_count_is_not_replaced() {
        let text = "Game completed!\nWinner: Player 2\nrounds: 99999999999\nTotal rounds: 17\n";
        assert_eq!(parse(text).unwrap().rounds, None);
    }

    #[test]
    fn winner_serializes_as_its_code() {
        let text = "Game completed!\nWinner: Player 1\nrounds: 42\n";
        let json = serde_json::to_value(parse(text).unwrap()).unwrap();
        assert_eq!(json["winner"], serde_json::json!(1));
        assert_eq!(json["rounds"], serde_json::json!(42));

        let tie = serde_json::to_value(parse("Game completed!\nWinner: Player 0\n").unwrap()).unwrap();
        assert_eq!(tie["winner"], serde_json::json!(0));

        let none = serde_json::to_value(BasicResult::default()).unwrap();
        assert_eq!(none["winner"], serde_json::Value::Null);
    }

    #[test]
    fn tie_phrases_set_winner_zero() {
        let text = "Game completed!\nWinner: Player 0\nResult: DRAW after max steps\n";
        let result = parse(text).unwrap();
        assert_eq!(result.winner.map(Winner::code), Some(0));

        // "entities" contains "tie" but is not a tie announcement.
        let text = "Game completed!\nWinner: Player 2\nCleaning up entities\n";
        assert_eq!(parse(text).unwrap().winner, Some(Winner::Player2));
    }

    #[test]
    fn reason_line_is_kept_verbatim() {
        let text = "Game completed!\nWinner: Player 1\n  Reason: all tanks destroyed  \n";
        assert_eq!(
            parse(text).unwrap().reason.as_deref(),
            Some("Reason: all tanks destroyed")
        );
    }

    #[test]
    fn board_region_collects_whitelisted_lines_only() {
        let text = "\
Game completed!
Winner: Player 1
Final board state:
#####
#1 @#
#  *#
#####
Total rounds: 8
## not a board line
";
        let result = parse(text).unwrap();
        assert_eq!(result.board_state, "#####\n#1 @#\n#  *#\n#####");
        assert_eq!(result.rounds, Some(8));
    }

    #[test]
    fn missing_markers_are_classified() {
        assert_eq!(
            parse("   \n"),
            Err(ParseError::MalformedBasic(BasicDiagnosis::NoOutput))
        );
        assert_eq!(
            parse("Error: map file unreadable"),
            Err(ParseError::MalformedBasic(BasicDiagnosis::SimulationError))
        );
        assert_eq!(
            parse("maps/a.txt: No such file"),
            Err(ParseError::MalformedBasic(BasicDiagnosis::FileNotFound))
        );
        assert_eq!(
            parse("open libgm.so: Permission denied"),
            Err(ParseError::MalformedBasic(BasicDiagnosis::PermissionDenied))
        );
        assert_eq!(
            parse("Winner: Player 1"),
            Err(ParseError::MalformedBasic(BasicDiagnosis::IncompleteExecution))
        );
        assert_eq!(
            parse("Game completed!"),
            Err(ParseError::MalformedBasic(BasicDiagnosis::Unknown))
        );
    }
}
