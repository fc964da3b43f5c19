use super::View;
use crate::app::AppCommand;
use crate::control::{MonitorEvent, MonitorEventKind, RunHandle};
use common::api::RunAccepted;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::cell::Cell;
use chrono::{DateTime, Local};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Stopped,
}

/// `[HH:MM:SS]` local wall-clock stamp for an output line.
pub fn timestamp(at: DateTime<Local>) -> String {
    at.format("[%H:%M:%S]").to_string()
}

pub struct RunMonitorState {
    label: String,
    status: RunStatus,
    output: Vec<String>,
    events: UnboundedReceiver<MonitorEvent>,
    handle: RunHandle,
    follow: bool,
    scroll: u16,
    rendered_scroll: Cell<u16>,
}

impl RunMonitorState {
    pub fn new(
        label: impl Into<String>,
        accepted: &RunAccepted,
        events: UnboundedReceiver<MonitorEvent>,
        handle: RunHandle,
    ) -> Self {
        let mut state = Self {
            label: label.into(),
            status: RunStatus::Running,
            output: Vec::new(),
            events,
            handle,
            follow: true,
            scroll: 0,
            rendered_scroll: Cell::new(0),
        };
        state.push(Local::now(), format!("✅ {}", accepted.message));
        if let Some(command) = &accepted.command {
            state.push(Local::now(), format!("🖥️ Cmd: {command}"));
        }
        state.push(Local::now(), "📡 Monitoring output...".to_string());
        state
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    fn push(&mut self, at: DateTime<Local>, line: String) {
        self.output.push(format!("{} {}", timestamp(at), line));
    }

    /// Folds one monitor event into the transcript.
    pub fn apply(&mut self, event: MonitorEvent) {
        match event.kind {
            MonitorEventKind::Output(line) => self.push(event.at, line),
            MonitorEventKind::Error(message) => {
                self.push(event.at, format!("❌ Output error: {message}"))
            }
            MonitorEventKind::Completed => {
                self.status = RunStatus::Completed;
                self.push(event.at, "✅ Simulation completed".to_string());
            }
            MonitorEventKind::Stopped => {
                // Already reported when the user stopped the run.
                self.status = RunStatus::Stopped;
            }
        }
    }

    fn stop(&mut self) {
        if self.status != RunStatus::Running {
            return;
        }
        self.handle.stop();
        self.status = RunStatus::Stopped;
        self.push(Local::now(), "🛑 Simulation stopped by user".to_string());
    }

    fn status_line(&self) -> (String, Color) {
        match self.status {
            RunStatus::Running => (format!("🟡 Running {}...", self.label), Color::Yellow),
            RunStatus::Completed => ("🟢 Completed".to_string(), Color::Green),
            RunStatus::Stopped => ("⚪ Stopped".to_string(), Color::Gray),
        }
    }
}

impl View for RunMonitorState {
    fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.stop();
                Some(AppCommand::Quit)
            }
            KeyCode::Char('s') => {
                self.stop();
                None
            }
            KeyCode::Char('c') => {
                self.output.clear();
                self.push(Local::now(), "Output cleared.".to_string());
                None
            }
            KeyCode::Char('r') if self.status == RunStatus::Completed => {
                Some(AppCommand::FetchResults)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.follow {
                    self.follow = false;
                    self.scroll = self.rendered_scroll.get();
                }
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll = self
                    .scroll
                    .saturating_add(1)
                    .min(self.output.len().saturating_sub(1) as u16);
                None
            }
            KeyCode::Char('f') => {
                self.follow = true;
                None
            }
            _ => None,
        }
    }

    fn update(&mut self, _dt: Duration) {
        while let Ok(event) = self.events.try_recv() {
            self.apply(event);
        }
    }

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

        let (status, color) = self.status_line();
        let header = Paragraph::new(status)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().title("Simulation").borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        let visible = chunks[1].height.saturating_sub(2) as usize;
        let scroll = if self.follow {
            self.output.len().saturating_sub(visible) as u16
        } else {
            self.scroll
        };
        self.rendered_scroll.set(scroll);
        let lines: Vec<Line> = self.output.iter().map(|l| Line::from(l.as_str())).collect();
        let log = Paragraph::new(lines)
            .block(Block::default().title("Output").borders(Borders::ALL))
            .scroll((scroll, 0));
        frame.render_widget(log, chunks[1]);

        let help = if self.status == RunStatus::Completed {
            "r: Results | c: Clear | ↑/k ↓/j: Scroll | f: Follow | q: Quit"
        } else {
            "s: Stop | c: Clear | ↑/k ↓/j: Scroll | f: Follow | q: Quit"
        };
        let help = Paragraph::new(help)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);
    }
}
