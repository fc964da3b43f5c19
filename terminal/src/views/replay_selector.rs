use super::View;
use crate::app::AppCommand;
use crate::replay::reader::ReplayReader;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

pub fn format_age(age: Duration) -> String {
    let secs = age.as_secs();
    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86400)
    }
}

struct ReplayEntry {
    path: PathBuf,
    name: String,
    details: String,
}

impl ReplayEntry {
    fn describe(root: &Path, path: PathBuf) -> Self {
        let name = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .display()
            .to_string();
        let details = path
            .metadata()
            .map(|metadata| {
                let age = metadata
                    .modified()
                    .ok()
                    .and_then(|t| SystemTime::now().duration_since(t).ok())
                    .map(format_age)
                    .unwrap_or_else(|| "unknown".to_string());
                format!(" ({}, {})", format_size(metadata.len()), age)
            })
            .unwrap_or_default();
        Self {
            path,
            name,
            details,
        }
    }
}

pub struct ReplaySelectorState {
    replay_dir: PathBuf,
    entries: Vec<ReplayEntry>,
    selected_index: usize,
    scroll_offset: Cell<usize>,
}

impl ReplaySelectorState {
    pub fn new(replay_dir: PathBuf) -> Result<Self> {
        let entries = ReplayReader::list_replays(&replay_dir)?
            .into_iter()
            .map(|path| ReplayEntry::describe(&replay_dir, path))
            .collect();
        Ok(Self {
            replay_dir,
            entries,
            selected_index: 0,
            scroll_offset: Cell::new(0),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected(&self) -> Option<&Path> {
        self.entries.get(self.selected_index).map(|e| e.path.as_path())
    }

    fn move_selection(&mut self, delta: isize) {
        let last = self.entries.len().saturating_sub(1);
        self.selected_index = self.selected_index.saturating_add_signed(delta).min(last);
    }

    /// First visible row so the selection stays on screen.
    fn visible_offset(&self, visible_height: usize) -> usize {
        let mut offset = self.scroll_offset.get();
        if self.selected_index < offset {
            offset = self.selected_index;
        } else if visible_height > 0 && self.selected_index >= offset + visible_height {
            offset = self.selected_index + 1 - visible_height;
        }
        self.scroll_offset.set(offset);
        offset
    }
}

impl View for ReplaySelectorState {
    fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppCommand::Quit),
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Enter => self
                .selected()
                .map(|path| AppCommand::OpenReplay(path.to_path_buf())),
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

        let title = Paragraph::new("Tank Battle Replays")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let list_area = chunks[1];
        let visible_height = list_area.height.saturating_sub(2) as usize;
        let offset = self.visible_offset(visible_height);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible_height)
            .map(|(i, entry)| {
                let style = if i == self.selected_index {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:>3} ", i + 1), Style::default().fg(Color::DarkGray)),
                    Span::styled(entry.name.clone(), style),
                    Span::styled(entry.details.clone(), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(format!("Snapshot files in {}", self.replay_dir.display()))
                .borders(Borders::ALL),
        );
        frame.render_widget(list, list_area);

        let help_text = if self.entries.is_empty() {
            "No snapshot files (.json, .json.gz) found. Press 'q' to quit."
        } else {
            "↑/k: Up | ↓/j: Down | Enter: Open | q: Quit"
        };
        let help = Paragraph::new(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);
    }
}
