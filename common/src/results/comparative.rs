use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static MANAGER_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"_\d+_\d+\.so$").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeConfig {
    pub game_map: Option<String>,
    pub algorithm1: Option<String>,
    pub algorithm2: Option<String>,
}

/// Game managers that produced the same final outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultGroup {
    pub game_managers: Vec<String>,
    pub outcome: String,
    pub rounds: u32,
    pub board_state: String,
}

/// Groups are kept in the order the simulator wrote them, which is most
/// common outcome first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeResult {
    pub config: ComparativeConfig,
    pub groups: Vec<ResultGroup>,
}

fn starts_group(line: &str) -> bool {
    !line.trim().is_empty() && (line.contains(".so") || line.contains("GameManager"))
}

pub(super) fn parse(text: &str) -> ComparativeResult {
    let lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
    let mut result = ComparativeResult::default();
    let mut i = 0;

    while i < lines.len() && !lines[i].trim().is_empty() {
        let line = lines[i].trim();
        if let Some(value) = line.strip_prefix("game_map=") {
            result.config.game_map = Some(value.to_string());
        } else if let Some(value) = line.strip_prefix("algorithm1=") {
            result.config.algorithm1 = Some(value.to_string());
        } else if let Some(value) = line.strip_prefix("algorithm2=") {
            result.config.algorithm2 = Some(value.to_string());
        }
        i += 1;
    }

    loop {
        while i < lines.len() && lines[i].trim().is_empty() {
            i += 1;
        }
        if i >= lines.len() {
            break;
        }

        let mut group = ResultGroup {
            game_managers: lines[i].split(',').map(|gm| gm.trim().to_string()).collect(),
            ..ResultGroup::default()
        };
        i += 1;

        if let Some(outcome) = lines.get(i) {
            group.outcome = outcome.trim().to_string();
            i += 1;
        }
        if let Some(rounds) = lines.get(i) {
            group.rounds = rounds.trim().parse().unwrap_or(0);
            i += 1;
        }

        let board_start = i;
        while i < lines.len() && !starts_group(lines[i]) {
            i += 1;
        }
        group.board_state = lines[board_start..i].join("\n").trim().to_string();

        result.groups.push(group);
    }

    result
}

/// Short display name for a game manager library path, e.g.
/// `gms/libTestGameManager_Fast_123_456.so` becomes `Fast`.
pub fn extract_manager_name(path: &str) -> String {
    let filename = path.rsplit('/').next().unwrap_or(path);
    let name = filename.strip_prefix("lib").unwrap_or(filename);
    MANAGER_SUFFIX
        .replace(name, "")
        .replacen("TestGameManager_", "", 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TWO_GROUPS: &str = "\
game_map=maps/arena.txt
algorithm1=algos/libAlgo_1_2.so
algorithm2=algos/libAlgo_3_4.so

gms/libGameManager_111_222.so,gms/libGameManager_333_444.so
Player 1 wins - all tanks destroyed
57
#####
#1  #
#####

gms/libGameManager_555_666.so
Tie - maximum steps reached
200
#####
#1 2#
#####
";

    #[test]
    fn splits_groups_on_manager_lines() {
        let result = parse(TWO_GROUPS);

        assert_eq!(
            result.config,
            ComparativeConfig {
                game_map: Some("maps/arena.txt".to_string()),
                algorithm1: Some("algos/libAlgo_1_2.so".to_string()),
                algorithm2: Some("algos/libAlgo_3_4.so".to_string()),
            }
        );
        assert_eq!(result.groups.len(), 2);

        let first = &result.groups[0];
        assert_eq!(
            first.game_managers,
            vec![
                "gms/libGameManager_111_222.so".to_string(),
                "gms/libGameManager_333_444.so".to_string()
            ]
        );
        assert_eq!(first.outcome, "Player 1 wins - all tanks destroyed");
        assert_eq!(first.rounds, 57);
        assert_eq!(first.board_state, "#####\n#1  #\n#####");

        let second = &result.groups[1];
        assert_eq!(second.game_managers, vec!["gms/libGameManager_555_666.so".to_string()]);
        assert_eq!(second.rounds, 200);
        assert_eq!(second.board_state, "#####\n#1 2#\n#####");
    }

    #[test]
    fn unparsable_rounds_default_to_zero() {
        let result = parse("game_map=m\n\nGameManagerA\nTie\nmany\n");
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].rounds, 0);
        assert_eq!(result.groups[0].board_state, "");
    }

    #[test]
    fn missing_header_and_groups_yield_empty_result() {
        assert_eq!(parse(""), ComparativeResult::default());
    }

    #[test]
    fn manager_names_are_shortened() {
        assert_eq!(extract_manager_name("gms/libTestGameManager_Fast_123_456.so"), "Fast");
        assert_eq!(extract_manager_name("libGameManager_1_2.so"), "GameManager");
        assert_eq!(extract_manager_name("plain"), "plain");
    }
}
