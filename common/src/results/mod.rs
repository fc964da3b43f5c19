//! Parsing of simulator result text.
//!
//! Each run mode writes its results in its own loose text format. The parsers
//! here are tolerant: missing fields come back as `None` or empty values, and
//! [`interpret`] never fails. Text it cannot make sense of is handed back for
//! raw display.

mod basic;
pub mod board;
mod comparative;
mod competition;
pub mod html;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use board::{BoardCellClass, BoardGrid, MapDimensions};
pub use basic::{BasicConfig, BasicDiagnosis, BasicResult, Winner, is_valid_basic_output};
pub use comparative::{ComparativeConfig, ComparativeResult, ResultGroup, extract_manager_name};
pub use competition::{CompetitionConfig, CompetitionResult, LeaderboardEntry};

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Basic,
    Comparative,
    Competition,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Basic, Mode::Comparative, Mode::Competition];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Basic => "basic",
            Mode::Comparative => "comparative",
            Mode::Competition => "competition",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ParseError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == tag)
            .ok_or_else(|| ParseError::UnknownMode(tag.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ParsedResult {
    Basic(BasicResult),
    Comparative(ComparativeResult),
    Competition(CompetitionResult),
}

pub type Parser = fn(&str) -> Result<ParsedResult, ParseError>;

fn parse_basic(text: &str) -> Result<ParsedResult, ParseError> {
    basic::parse(text).map(ParsedResult::Basic)
}

fn parse_comparative(text: &str) -> Result<ParsedResult, ParseError> {
    Ok(ParsedResult::Comparative(comparative::parse(text)))
}

fn parse_competition(text: &str) -> Result<ParsedResult, ParseError> {
    Ok(ParsedResult::Competition(competition::parse(text)))
}

/// Indexed by `Mode` discriminant.
const PARSERS: [Parser; 3] = [parse_basic, parse_comparative, parse_competition];

pub fn parser_for(mode: Mode) -> Parser {
    PARSERS[mode as usize]
}

pub fn parse(mode: Mode, text: &str) -> Result<ParsedResult, ParseError> {
    parser_for(mode)(text)
}

/// What a results panel should show for a blob of result text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    Parsed(ParsedResult),
    /// Basic-mode text lacking the completion markers.
    Malformed {
        diagnosis: BasicDiagnosis,
        raw: String,
    },
    Raw(String),
}

/// Parses `text` according to the caller's mode tag, degrading to raw text
/// for unknown modes or failed parses.
pub fn interpret(mode_tag: &str, text: &str) -> ResultView {
    let mode = match mode_tag.parse::<Mode>() {
        Ok(mode) => mode,
        Err(err) => {
            log::warn!("{err}, showing raw results");
            return ResultView::Raw(text.to_string());
        }
    };

    match parse(mode, text) {
        Ok(parsed) => ResultView::Parsed(parsed),
        Err(ParseError::MalformedBasic(diagnosis)) => {
            log::info!("basic results malformed: {}", diagnosis.title());
            ResultView::Malformed {
                diagnosis,
                raw: text.to_string(),
            }
        }
        Err(err) => {
            log::warn!("failed to parse {mode} results: {err}");
            ResultView::Raw(text.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_tags_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
        assert_eq!(
            "tournament".parse::<Mode>(),
            Err(ParseError::UnknownMode("tournament".to_string()))
        );
    }

    #[test]
    fn unknown_mode_falls_back_to_raw() {
        assert_eq!(
            interpret("tournament", "<b>raw</b>"),
            ResultView::Raw("<b>raw</b>".to_string())
        );
    }

    #[test]
    fn dispatch_uses_declared_mode_not_content() {
        // Competition-looking text declared as comparative still goes to the
        // comparative parser.
        let text = "game_maps_folder=maps\ngame_manager=gm.so\n\nAlgoA 3\n";
        match interpret("comparative", text) {
            ResultView::Parsed(ParsedResult::Comparative(_)) => {}
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn malformed_basic_output_is_diagnosed() {
        match interpret("basic", "") {
            ResultView::Malformed { diagnosis, raw } => {
                assert_eq!(diagnosis, BasicDiagnosis::NoOutput);
                assert!(raw.is_empty());
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }
}
