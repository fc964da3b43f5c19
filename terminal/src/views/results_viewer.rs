use super::View;
use crate::app::AppCommand;
use crate::render::types::player_color;
use common::results::board::{BoardCellClass, BoardGrid, MapDimensions};
use common::results::{
    extract_manager_name, BasicDiagnosis, BasicResult, ComparativeResult, CompetitionResult,
    ParsedResult, ResultView, Winner,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Duration;

pub struct ResultsViewerState {
    title: String,
    lines: Vec<Line<'static>>,
    scroll: u16,
}

impl ResultsViewerState {
    pub fn new(title: impl Into<String>, view: Option<&ResultView>, dims: MapDimensions) -> Self {
        let lines = match view {
            Some(view) => result_lines(view, dims),
            None => vec![Line::styled(
                "No results available",
                Style::default().fg(Color::DarkGray),
            )],
        };
        Self {
            title: title.into(),
            lines,
            scroll: 0,
        }
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    fn scroll_by(&mut self, delta: i32) {
        let max = self.lines.len().saturating_sub(1) as i32;
        self.scroll = (self.scroll as i32 + delta).clamp(0, max) as u16;
    }
}

fn heading(text: &str) -> Line<'static> {
    Line::styled(
        text.to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )
}

fn config_line(lines: &mut Vec<Line<'static>>, label: &str, value: Option<&String>) {
    if let Some(value) = value {
        lines.push(Line::from(vec![
            Span::styled(format!("  {label}: "), Style::default().fg(Color::DarkGray)),
            Span::raw(value.clone()),
        ]));
    }
}

fn cell_style(class: BoardCellClass) -> Style {
    match class {
        BoardCellClass::Wall => Style::default().fg(Color::Gray),
        BoardCellClass::Mine => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        BoardCellClass::Player1 => Style::default().fg(player_color(1)).add_modifier(Modifier::BOLD),
        BoardCellClass::Player2 => Style::default().fg(player_color(2)).add_modifier(Modifier::BOLD),
        BoardCellClass::Shell => Style::default().fg(Color::Yellow),
        BoardCellClass::Empty => Style::default(),
        BoardCellClass::Unknown => Style::default().fg(Color::Magenta),
    }
}

/// The board dump laid out on the map's grid, one styled span per cell.
pub fn board_lines(board_state: &str, dims: MapDimensions) -> Vec<Line<'static>> {
    if board_state.trim().is_empty() {
        return vec![Line::styled(
            "  No board state available",
            Style::default().fg(Color::DarkGray),
        )];
    }

    let grid = BoardGrid::layout(dims, board_state);
    let mut lines: Vec<Line<'static>> = grid
        .rows()
        .map(|row| {
            let mut spans = vec![Span::raw("  ")];
            spans.extend(row.iter().map(|&ch| {
                Span::styled(ch.to_string(), cell_style(BoardCellClass::from_char(ch)))
            }));
            Line::from(spans)
        })
        .collect();
    lines.push(Line::styled(
        "  # Wall  @ Mine  1 Player 1  2 Player 2  * Shell",
        Style::default().fg(Color::DarkGray),
    ));
    lines
}

fn basic_lines(result: &BasicResult, dims: MapDimensions) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Basic Game Configuration")];
    config_line(&mut lines, "Game Map", result.config.game_map.as_ref());
    config_line(&mut lines, "Game Manager", result.config.game_manager.as_ref());
    config_line(&mut lines, "Algorithm 1", result.config.algorithm1.as_ref());
    config_line(&mut lines, "Algorithm 2", result.config.algorithm2.as_ref());
    lines.push(Line::from(""));

    lines.push(heading("Game Result"));
    match result.winner {
        Some(Winner::Tie) => lines.push(Line::styled(
            "  TIE GAME",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Some(winner) => lines.push(Line::styled(
            format!("  PLAYER {} WINS!", winner.code()),
            Style::default()
                .fg(player_color(winner.code().into()))
                .add_modifier(Modifier::BOLD),
        )),
        None => lines.push(Line::styled(
            "  Game result not clearly determined from output",
            Style::default().fg(Color::DarkGray),
        )),
    }
    if result.winner.is_some() {
        if let Some(reason) = &result.reason {
            lines.push(Line::from(format!("  Reason: {reason}")));
        }
        if let Some(rounds) = result.rounds {
            lines.push(Line::from(format!("  Rounds Played: {rounds}")));
        }
    }
    lines.push(Line::from(""));

    lines.push(heading("Final Board State"));
    lines.extend(board_lines(&result.board_state, dims));
    lines
}

fn malformed_lines(diagnosis: BasicDiagnosis, raw: &str) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::styled(
            diagnosis.title().to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Line::from(diagnosis.description().to_string()),
    ];
    if !raw.trim().is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Debug Information"));
        lines.extend(raw.lines().map(|l| Line::from(l.to_string())));
    }
    lines
}

fn comparative_lines(result: &ComparativeResult, dims: MapDimensions) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Comparative Analysis Configuration")];
    config_line(&mut lines, "Game Map", result.config.game_map.as_ref());
    config_line(&mut lines, "Algorithm 1", result.config.algorithm1.as_ref());
    config_line(&mut lines, "Algorithm 2", result.config.algorithm2.as_ref());
    lines.push(Line::from(""));

    lines.push(heading(&format!("Result Groups ({})", result.groups.len())));
    for (index, group) in result.groups.iter().enumerate() {
        let managers: Vec<String> = group
            .game_managers
            .iter()
            .map(|m| extract_manager_name(m))
            .collect();
        lines.push(Line::styled(
            format!("  Group {}: {}", index + 1, managers.join(", ")),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::from(format!("  Outcome: {}", group.outcome)));
        lines.push(Line::from(format!("  Rounds: {}", group.rounds)));
        lines.extend(board_lines(&group.board_state, dims));
        lines.push(Line::from(""));
    }
    lines
}

fn competition_lines(result: &CompetitionResult) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let config = &result.config;
    if config.game_maps_folder.is_some() || config.game_manager.is_some() {
        lines.push(heading("Tournament Configuration"));
        config_line(&mut lines, "Game Maps", config.game_maps_folder.as_ref());
        config_line(&mut lines, "Game Manager", config.game_manager.as_ref());
        lines.push(Line::from(""));
    }

    lines.push(heading("Final Rankings"));
    for (index, entry) in result.results.iter().enumerate() {
        let (medal, style) = match index {
            0 => ("🥇", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            1 => ("🥈", Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
            2 => ("🥉", Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD)),
            _ => ("  ", Style::default()),
        };
        lines.push(Line::styled(
            format!("  {medal} #{:<3} {:<40} {:>6}", index + 1, entry.algorithm, entry.score),
            style,
        ));
    }
    lines
}

/// Terminal rendition of a results panel.
pub fn result_lines(view: &ResultView, dims: MapDimensions) -> Vec<Line<'static>> {
    match view {
        ResultView::Parsed(ParsedResult::Basic(result)) => basic_lines(result, dims),
        ResultView::Parsed(ParsedResult::Comparative(result)) => comparative_lines(result, dims),
        ResultView::Parsed(ParsedResult::Competition(result)) => competition_lines(result),
        ResultView::Malformed { diagnosis, raw } => malformed_lines(*diagnosis, raw),
        ResultView::Raw(text) => text.lines().map(|l| Line::from(l.to_string())).collect(),
    }
}

impl View for ResultsViewerState {
    fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppCommand::Back),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_by(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_by(-1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_by(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_by(-10);
                None
            }
            _ => None,
        }
    }

    fn update(&mut self, _dt: Duration) {}

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let title = Paragraph::new(self.title.clone())
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let body = Paragraph::new(self.lines.clone())
            .block(Block::default().title("Results").borders(Borders::ALL))
            .scroll((self.scroll, 0));
        frame.render_widget(body, chunks[1]);

        let help = Paragraph::new("↑/k ↓/j: Scroll | PageUp/PageDown: Page | q: Back")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);
    }
}
