use super::View;
use crate::app::AppCommand;
use crate::render::board::BoardRenderer;
use crate::render::standard_renderer::StandardRenderer;
use crate::render::types::{player_color, CharDimensions, RenderConfig};
use crate::replay::player::{self, ReplayPlayer};
use crate::replay::ReplayData;
use common::{LogEntry, PlaybackError, PlaybackFrame};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use std::cell::{Cell, RefCell};
use std::time::Duration;

const JUMP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum LayoutMode {
    SingleColumn,
    TwoColumn,
}

impl LayoutMode {
    fn from_dimensions(width: u16, height: u16) -> Self {
        const MIN_WIDTH_FOR_TWO_COLUMN: u16 = 100;
        const ASPECT_RATIO_THRESHOLD: f32 = 1.8;

        let aspect_ratio = width as f32 / height.max(1) as f32;
        if width >= MIN_WIDTH_FOR_TWO_COLUMN && aspect_ratio >= ASPECT_RATIO_THRESHOLD {
            LayoutMode::TwoColumn
        } else {
            LayoutMode::SingleColumn
        }
    }
}

pub struct ReplayViewerState {
    title: String,
    player: ReplayPlayer,
    log_scroll: u16,
    log_total_lines: Cell<u16>,
    log_scrollbar_state: RefCell<ScrollbarState>,
}

impl ReplayViewerState {
    pub fn new(replay: ReplayData, play_period: Duration) -> Result<Self, PlaybackError> {
        let title = replay.title();
        Ok(Self {
            title,
            player: player::open(replay.game, play_period)?,
            log_scroll: 0,
            log_total_lines: Cell::new(0),
            log_scrollbar_state: RefCell::new(ScrollbarState::default()),
        })
    }

    pub fn player(&self) -> &ReplayPlayer {
        &self.player
    }

    fn frame(&self) -> Option<&PlaybackFrame> {
        self.player.view().frame()
    }

    fn toggle_play(&mut self) {
        if self.player.is_playing() {
            self.player.pause();
        } else {
            self.player.play();
        }
    }

    fn jump(&mut self, forward: bool) {
        self.player.pause();
        let cursor = self.player.cursor();
        let last = self.player.len().saturating_sub(1);
        let target = if forward {
            (cursor + JUMP).min(last)
        } else {
            cursor.saturating_sub(JUMP)
        };
        if target != cursor {
            // Target is clamped into range.
            let _ = self.player.render_at(target);
        }
    }

    fn change_speed(&mut self, faster: bool) {
        let period = self.player.period();
        let period = if faster { period / 2 } else { period * 2 };
        self.player.set_speed(period);
    }

    /// Action log entries up to the cursor, newest first.
    pub fn log_entries(&self) -> Vec<LogEntry> {
        let cursor = self.player.cursor();
        let mut entries: Vec<LogEntry> = self.player.data().snapshots[..=cursor]
            .iter()
            .filter(|s| s.has_meaningful_message())
            .map(|s| LogEntry::Step {
                step: s.step,
                message: s.message.clone(),
            })
            .collect();
        if let Some(complete @ LogEntry::Complete { .. }) = self.frame().and_then(|f| f.log.clone())
        {
            entries.push(complete);
        }
        entries.reverse();
        entries
    }

    fn scroll_log_up(&mut self, lines: u16) {
        self.log_scroll = self.log_scroll.saturating_sub(lines);
        let mut state = self.log_scrollbar_state.borrow_mut();
        *state = state.position(self.log_scroll as usize);
    }

    fn scroll_log_down(&mut self, lines: u16) {
        let max_scroll = self.log_total_lines.get().saturating_sub(1);
        self.log_scroll = (self.log_scroll + lines).min(max_scroll);
        let mut state = self.log_scrollbar_state.borrow_mut();
        *state = state.position(self.log_scroll as usize);
    }
}

impl View for ReplayViewerState {
    fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char(' ') => self.toggle_play(),
            KeyCode::Char('j') if shift => self.scroll_log_down(1),
            KeyCode::Char('k') if shift => self.scroll_log_up(1),
            KeyCode::Char('J') => self.scroll_log_down(1),
            KeyCode::Char('K') => self.scroll_log_up(1),
            KeyCode::Char('j') | KeyCode::Right => self.player.next(),
            KeyCode::Char('k') | KeyCode::Left => self.player.previous(),
            KeyCode::Char('l') => self.jump(true),
            KeyCode::Char('h') => self.jump(false),
            KeyCode::Char('g') | KeyCode::Home => self.player.first(),
            KeyCode::Char('G') | KeyCode::End => self.player.last(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.change_speed(true),
            KeyCode::Char('-') => self.change_speed(false),
            KeyCode::PageUp => self.scroll_log_up(5),
            KeyCode::PageDown => self.scroll_log_down(5),
            KeyCode::Char('q') | KeyCode::Esc => {
                self.player.pause();
                return Some(AppCommand::Back);
            }
            _ => {}
        }
        None
    }

    fn update(&mut self, dt: Duration) {
        player::advance_clock(&mut self.player, dt);
    }

    fn render(&self, frame: &mut Frame) {
        match LayoutMode::from_dimensions(frame.area().width, frame.area().height) {
            LayoutMode::SingleColumn => self.render_single_column(frame),
            LayoutMode::TwoColumn => self.render_two_column(frame),
        }
    }
}

impl ReplayViewerState {
    fn render_single_column(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Min(12),
                Constraint::Length(8),
                Constraint::Length(3),
                Constraint::Length(self.tank_panel_height()),
                Constraint::Length(4),
            ])
            .split(frame.area());

        self.render_board(frame, chunks[0]);
        self.render_action_log(frame, chunks[1]);
        frame.render_widget(self.render_header(), chunks[2]);
        frame.render_widget(self.render_tanks(), chunks[3]);
        frame.render_widget(self.render_controls(), chunks[4]);
    }

    fn render_two_column(&self, frame: &mut Frame) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .margin(1)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(frame.area());

        self.render_board(frame, columns[0]);

        let info = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(self.tank_panel_height()),
                Constraint::Min(6),
                Constraint::Length(4),
            ])
            .split(columns[1]);

        frame.render_widget(self.render_header(), info[0]);
        frame.render_widget(self.render_tanks(), info[1]);
        self.render_action_log(frame, info[2]);
        frame.render_widget(self.render_controls(), info[3]);
    }

    fn tank_panel_height(&self) -> u16 {
        let tanks = self.frame().map(|f| f.tanks.len()).unwrap_or(0) as u16;
        tanks.max(1) + 3
    }

    fn render_header(&self) -> Paragraph<'_> {
        let status = self
            .frame()
            .map(|f| f.status.to_string())
            .unwrap_or_default();
        let title = format!(
            "{} | {} | {} ms/step | {}",
            self.title,
            status,
            self.player.period().as_millis(),
            if self.player.is_playing() { "▶ Playing" } else { "⏸ Paused" }
        );

        Paragraph::new(title)
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_board(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().title("Board").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(playback) = self.frame() else {
            return;
        };
        let board = &playback.board;

        let char_dims = CharDimensions::new(2, 1);
        let renderer = BoardRenderer::new(StandardRenderer::new(char_dims));
        let config = RenderConfig {
            chars_per_point: char_dims,
        };
        let char_grid = renderer.render(board, &config);

        let board_width = char_grid.physical_width();
        let board_height = char_grid.physical_height() + 2;
        let x_offset = inner.width.saturating_sub(board_width as u16 + 2) / 2;
        let y_offset = inner.height.saturating_sub(board_height as u16) / 2;
        let padding = " ".repeat(x_offset as usize);
        let border = Style::default().fg(Color::DarkGray);

        let mut lines: Vec<Line> = Vec::new();
        for _ in 0..y_offset {
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            format!("{padding}┌{}┐", "─".repeat(board_width)),
            border,
        )));
        for row in char_grid.into_styled_lines() {
            let mut spans = vec![Span::raw(padding.clone()), Span::styled("│", border)];
            spans.extend(
                row.into_iter()
                    .map(|(ch, style)| Span::styled(ch.to_string(), style)),
            );
            spans.push(Span::styled("│", border));
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(Span::styled(
            format!("{padding}└{}┘", "─".repeat(board_width)),
            border,
        )));

        if let Some(countdown) = playback.status.countdown {
            lines.push(Line::from(Span::styled(
                format!("{padding}Countdown: {countdown}"),
                Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_tanks(&self) -> Paragraph<'_> {
        let lines: Vec<Line> = match self.frame() {
            Some(playback) if !playback.tanks.is_empty() => playback
                .tanks
                .iter()
                .map(|tank| {
                    let color = player_color(tank.player_id);
                    let status = if tank.destroyed {
                        Span::styled("Destroyed", Style::default().fg(Color::DarkGray))
                    } else {
                        Span::raw(format!("{} shells", tank.remaining_shells))
                    };
                    Line::from(vec![
                        Span::styled("■ ", Style::default().fg(color)),
                        Span::styled(
                            format!("P{} ", tank.player_id),
                            Style::default().fg(color).add_modifier(Modifier::BOLD),
                        ),
                        status,
                    ])
                })
                .collect(),
            _ => vec![Line::from("No tanks")],
        };

        Paragraph::new(lines).block(Block::default().title("Tanks").borders(Borders::ALL))
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let lines = vec![
            Line::from("Space: Play/Pause | j/k: ±1 step | h/l: ±5 steps | g/G: First/Last | q: Back"),
            Line::from("+/-: Speed | Shift+J/K, PageUp/Down: Scroll action log"),
        ];

        Paragraph::new(lines)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_action_log(&self, frame: &mut Frame, area: Rect) {
        let entries = self.log_entries();
        let lines: Vec<Line> = entries
            .iter()
            .map(|entry| match entry {
                LogEntry::Complete { .. } => Line::styled(
                    entry.to_string(),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                LogEntry::Step { .. } => Line::from(entry.to_string()),
            })
            .collect();

        let total_lines = lines.len();
        self.log_total_lines.set(total_lines as u16);

        let mut scrollbar_state = self.log_scrollbar_state.borrow_mut();
        *scrollbar_state = scrollbar_state
            .content_length(total_lines)
            .position(self.log_scroll as usize);

        let log = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(format!("Action Log ({})", total_lines))
                    .borders(Borders::ALL),
            )
            .scroll((self.log_scroll, 0));
        frame.render_widget(log, area);

        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        frame.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut *scrollbar_state,
        );
    }
}
