//! HTML fragments for the results panel. All text that came from a result
//! file or a user is escaped before insertion.

use std::fmt::Write;

use super::board::{BoardGrid, MapDimensions};
use super::{
    BasicDiagnosis, BasicResult, ComparativeResult, CompetitionResult, ParsedResult, ResultView,
    Winner, extract_manager_name,
};

pub fn escape(text: &str) -> String {
    v_htmlescape::escape(text).to_string()
}

const BOARD_LEGEND: &str = concat!(
    r#"<div class="board-legend">"#,
    r#"<span class="legend-item"><span class="symbol wall">#</span> Wall</span>"#,
    r#"<span class="legend-item"><span class="symbol mine">@</span> Mine</span>"#,
    r#"<span class="legend-item"><span class="symbol player1">1</span> Player 1</span>"#,
    r#"<span class="legend-item"><span class="symbol player2">2</span> Player 2</span>"#,
    r#"<span class="legend-item"><span class="symbol shell">*</span> Shell</span>"#,
    "</div>",
);

pub fn render_view(view: &ResultView, dims: MapDimensions) -> String {
    match view {
        ResultView::Parsed(ParsedResult::Basic(result)) => render_basic(result, dims),
        ResultView::Parsed(ParsedResult::Comparative(result)) => render_comparative(result, dims),
        ResultView::Parsed(ParsedResult::Competition(result)) => render_competition(result),
        ResultView::Malformed { diagnosis, raw } => render_basic_error(*diagnosis, raw),
        ResultView::Raw(text) => render_raw(text),
    }
}

pub fn render_raw(text: &str) -> String {
    format!("<pre>{}</pre>", escape(text))
}

pub fn render_no_results() -> String {
    r#"<p class="no-results">No results available</p>"#.to_string()
}

/// Fixed grid of board cells, or a placeholder when there is no board.
pub fn render_board(board_state: &str, dims: MapDimensions) -> String {
    if board_state.trim().is_empty() {
        return r#"<div class="empty-board">No board state available</div>"#.to_string();
    }

    let grid = BoardGrid::layout(dims, board_state);
    let mut html = format!(
        r#"<div class="board-container" style="grid-template-columns: repeat({cols}, 1fr); grid-template-rows: repeat({rows}, 1fr);">"#,
        cols = dims.cols,
        rows = dims.rows,
    );

    for (row, chars) in grid.rows().enumerate() {
        for (col, &ch) in chars.iter().enumerate() {
            let class = super::board::BoardCellClass::from_char(ch).css_class();
            let shown = if ch == ' ' {
                String::new()
            } else {
                escape(&ch.to_string())
            };
            let _ = write!(
                html,
                r#"<div class="board-cell {class}" data-row="{row}" data-col="{col}"><span class="cell-content">{shown}</span></div>"#
            );
        }
    }

    html.push_str("</div>");
    let _ = write!(
        html,
        r#"<div class="grid-info">Grid: {} rows × {} columns</div>"#,
        dims.rows, dims.cols
    );
    html
}

fn config_line(html: &mut String, label: &str, value: Option<&String>) {
    if let Some(value) = value {
        let _ = write!(html, "<p><strong>{label}:</strong> {}</p>", escape(value));
    }
}

fn board_section(html: &mut String, heading: &str, board_state: &str, dims: MapDimensions) {
    if board_state.trim().is_empty() {
        return;
    }
    html.push_str(r#"<div class="board-state"><div class="board-header">"#);
    let _ = write!(html, "{heading}{BOARD_LEGEND}</div>");
    let _ = write!(
        html,
        r#"<div class="board-grid">{}</div></div>"#,
        render_board(board_state, dims)
    );
}

pub fn render_basic(result: &BasicResult, dims: MapDimensions) -> String {
    let mut html = String::from(r#"<div class="basic-results">"#);

    html.push_str(r#"<div class="result-config"><h3>🎯 Basic Game Configuration</h3>"#);
    config_line(&mut html, "Game Map", result.config.game_map.as_ref());
    config_line(&mut html, "Game Manager", result.config.game_manager.as_ref());
    config_line(&mut html, "Algorithm 1", result.config.algorithm1.as_ref());
    config_line(&mut html, "Algorithm 2", result.config.algorithm2.as_ref());
    html.push_str("</div>");

    html.push_str(r#"<div class="game-summary"><h3>🏆 Game Result</h3>"#);
    match result.winner {
        Some(winner) => {
            html.push_str(r#"<div class="winner-section">"#);
            match winner {
                Winner::Tie => html.push_str(r#"<div class="result-tie">🤝 TIE GAME</div>"#),
                other => {
                    let _ = write!(
                        html,
                        r#"<div class="result-winner">🎉 PLAYER {} WINS!</div>"#,
                        other.code()
                    );
                }
            }
            html.push_str("</div>");

            if let Some(reason) = &result.reason {
                let _ = write!(
                    html,
                    r#"<div class="game-reason"><strong>Reason:</strong> {}</div>"#,
                    escape(reason)
                );
            }
            if let Some(rounds) = result.rounds {
                let _ = write!(
                    html,
                    r#"<div class="game-rounds"><strong>Rounds Played:</strong> {rounds}</div>"#
                );
            }
        }
        None => html.push_str(
            r#"<div class="result-unknown">Game result not clearly determined from output</div>"#,
        ),
    }
    html.push_str("</div>");

    board_section(&mut html, "<h3>🎮 Final Board State</h3>", &result.board_state, dims);

    html.push_str("</div>");
    html
}

pub fn render_basic_error(diagnosis: BasicDiagnosis, raw: &str) -> String {
    let mut html = String::from(r#"<div class="basic-results">"#);
    let _ = write!(
        html,
        r#"<div class="error-summary"><h3>⚠️ {}</h3><p class="error-description">{}</p></div>"#,
        diagnosis.title(),
        diagnosis.description()
    );

    if !raw.trim().is_empty() {
        let _ = write!(
            html,
            r#"<div class="debug-output"><h4>Debug Information:</h4><pre class="raw-output">{}</pre></div>"#,
            escape(raw)
        );
    }

    html.push_str("</div>");
    html
}

pub fn render_comparative(result: &ComparativeResult, dims: MapDimensions) -> String {
    let mut html = String::from(r#"<div class="comparative-results">"#);
    let config = &result.config;

    if config.game_map.is_some() || config.algorithm1.is_some() || config.algorithm2.is_some() {
        html.push_str(
            r#"<div class="result-config"><h3>🎯 Comparative Analysis Configuration</h3>"#,
        );
        config_line(&mut html, "Game Map", config.game_map.as_ref());
        config_line(&mut html, "Algorithm 1", config.algorithm1.as_ref());
        config_line(&mut html, "Algorithm 2", config.algorithm2.as_ref());
        html.push_str("</div>");
    }

    html.push_str(r#"<div class="result-groups"><h3>📊 Results by Frequency</h3>"#);
    html.push_str(
        r#"<p class="frequency-note">Groups ordered from most common to least common outcome</p>"#,
    );

    for (index, group) in result.groups.iter().enumerate() {
        let most_common = index == 0;
        let card_class = if most_common {
            "result-card most-frequent"
        } else {
            "result-card"
        };
        let _ = write!(
            html,
            r#"<div class="{card_class}"><div class="card-header"><h4>Group {}{}</h4><div class="game-managers">"#,
            index + 1,
            if most_common { " (Most Common)" } else { "" }
        );
        for manager in &group.game_managers {
            let _ = write!(
                html,
                r#"<span class="gm-badge">{}</span>"#,
                escape(&extract_manager_name(manager))
            );
        }
        html.push_str("</div></div>");

        let _ = write!(
            html,
            r#"<div class="game-result"><div class="outcome"><strong>Outcome:</strong> {}</div><div class="rounds"><strong>Rounds:</strong> {}</div></div>"#,
            escape(&group.outcome),
            group.rounds
        );

        board_section(&mut html, "<h5>Final Board State:</h5>", &group.board_state, dims);
        html.push_str("</div>");
    }

    html.push_str("</div></div>");
    html
}

pub fn render_competition(result: &CompetitionResult) -> String {
    let mut html = String::from(r#"<div class="competition-results">"#);
    let config = &result.config;

    if config.game_maps_folder.is_some() || config.game_manager.is_some() {
        html.push_str(r#"<div class="result-config"><h3>🎯 Tournament Configuration</h3>"#);
        config_line(&mut html, "Game Maps", config.game_maps_folder.as_ref());
        config_line(&mut html, "Game Manager", config.game_manager.as_ref());
        html.push_str("</div>");
    }

    html.push_str(
        r#"<div class="leaderboard"><h3>🏆 Final Rankings</h3><div class="leaderboard-table">"#,
    );
    html.push_str(concat!(
        r#"<div class="leaderboard-header">"#,
        r#"<span class="rank-col">Rank</span>"#,
        r#"<span class="algorithm-col">Algorithm</span>"#,
        r#"<span class="score-col">Score</span>"#,
        "</div>",
    ));

    for (index, entry) in result.results.iter().enumerate() {
        let (row_class, medal) = match index {
            0 => (" rank-1", "🥇 "),
            1 => (" rank-2", "🥈 "),
            2 => (" rank-3", "🥉 "),
            _ => ("", ""),
        };
        let _ = write!(
            html,
            r#"<div class="leaderboard-row{row_class}"><span class="rank-col">{medal}#{}</span><span class="algorithm-col">{}</span><span class="score-col">{}</span></div>"#,
            index + 1,
            escape(&entry.algorithm),
            entry.score
        );
    }

    html.push_str("</div></div></div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{LeaderboardEntry, ResultGroup, interpret};

    #[test]
    fn raw_text_is_escaped() {
        assert_eq!(render_raw("<script>&"), "<pre>&lt;script&gt;&amp;</pre>");
    }

    #[test]
    fn board_cells_carry_classes_and_coordinates() {
        let html = render_board("#1\n", MapDimensions { rows: 2, cols: 2 });

        assert!(html.contains(r#"<div class="board-cell wall" data-row="0" data-col="0">"#));
        assert!(html.contains(r#"<div class="board-cell player1" data-row="0" data-col="1">"#));
        assert!(html.contains(r#"<div class="board-cell empty" data-row="1" data-col="1">"#));
        assert_eq!(html.matches(r#"class="board-cell "#).count(), 4);
        assert!(html.contains("Grid: 2 rows × 2 columns"));
    }

    #[test]
    fn empty_board_gets_placeholder() {
        assert!(render_board("  \n", MapDimensions::default()).contains("No board state available"));
    }

    #[test]
    fn leaderboard_escapes_names_and_marks_podium() {
        let result = CompetitionResult {
            results: vec![
                LeaderboardEntry {
                    algorithm: "<b>Algo</b>".to_string(),
                    score: 9,
                },
                LeaderboardEntry {
                    algorithm: "Second".to_string(),
                    score: 4,
                },
            ],
            ..CompetitionResult::default()
        };
        let html = render_competition(&result);

        assert!(html.contains("&lt;b&gt;Algo&lt;"));
        assert!(!html.contains("<b>Algo"));
        assert!(html.contains(r#"<div class="leaderboard-row rank-1">"#));
        assert!(html.contains("🥈 #2"));
        assert!(!html.contains("Tournament Configuration"));
    }

    #[test]
    fn first_comparative_group_is_marked_most_common() {
        let result = ComparativeResult {
            groups: vec![
                ResultGroup {
                    game_managers: vec!["gms/libTestGameManager_Fast_1_2.so".to_string()],
                    outcome: "Tie".to_string(),
                    rounds: 3,
                    board_state: String::new(),
                },
                ResultGroup::default(),
            ],
            ..ComparativeResult::default()
        };
        let html = render_comparative(&result, MapDimensions::default());

        assert!(html.contains("Group 1 (Most Common)"));
        assert!(html.contains("<h4>Group 2</h4>"));
        assert!(html.contains(r#"<span class="gm-badge">Fast</span>"#));
        assert!(!html.contains("board-state"));
    }

    #[test]
    fn malformed_basic_shows_diagnosis_and_debug_output() {
        let view = interpret("basic", "fatal: Permission denied");
        let html = render_view(&view, MapDimensions::default());

        assert!(html.contains("Permission Error"));
        assert!(html.contains("Debug Information"));
        assert!(html.contains("fatal: Permission denied"));
    }
}
