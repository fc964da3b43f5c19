use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionConfig {
    pub game_maps_folder: Option<String>,
    pub game_manager: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub algorithm: String,
    pub score: i64,
}

/// Entries stay in file order; the simulator writes them already ranked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompetitionResult {
    pub config: CompetitionConfig,
    pub results: Vec<LeaderboardEntry>,
}

fn parse_entry(line: &str) -> Option<LeaderboardEntry> {
    let (algorithm, score) = line.rsplit_once(char::is_whitespace)?;
    let algorithm = algorithm.trim_end();
    if algorithm.is_empty() {
        return None;
    }
    Some(LeaderboardEntry {
        algorithm: algorithm.to_string(),
        score: score.parse().ok()?,
    })
}

pub(super) fn parse(text: &str) -> CompetitionResult {
    let mut result = CompetitionResult::default();

    for line in text.lines().map(str::trim) {
        if let Some(value) = line.strip_prefix("game_maps_folder=") {
            result.config.game_maps_folder = Some(value.to_string());
        } else if let Some(value) = line.strip_prefix("game_manager=") {
            result.config.game_manager = Some(value.to_string());
        } else if !line.is_empty() && !line.contains('=') {
            match parse_entry(line) {
                Some(entry) => result.results.push(entry),
                None => log::debug!("skipping leaderboard line without a score: {line}"),
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn score_is_the_trailing_integer() {
        let result = parse(
            "game_maps_folder=maps\ngame_manager=gms/libGM_1_2.so\n\nMyAlgo 2 17\nnot_a_score_line\nOther -3\n",
        );

        assert_eq!(
            result.config,
            CompetitionConfig {
                game_maps_folder: Some("maps".to_string()),
                game_manager: Some("gms/libGM_1_2.so".to_string()),
            }
        );
        assert_eq!(
            result.results,
            vec![
                LeaderboardEntry {
                    algorithm: "MyAlgo 2".to_string(),
                    score: 17
                },
                LeaderboardEntry {
                    algorithm: "Other".to_string(),
                    score: -3
                },
            ]
        );
    }

    #[test]
    fn lines_with_equals_or_non_numeric_tails_are_skipped() {
        let result = parse("threads=4\nAlgo twelve\n42\n");
        assert!(result.results.is_empty());
        assert_eq!(result.config, CompetitionConfig::default());
    }
}
