pub mod replay_selector;
pub mod replay_viewer;
pub mod results_viewer;
pub mod run_monitor;

pub use replay_selector::ReplaySelectorState;
pub use replay_viewer::ReplayViewerState;
pub use results_viewer::ResultsViewerState;
pub use run_monitor::RunMonitorState;

use crate::app::AppCommand;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use std::time::Duration;

pub trait View {
    fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand>;
    fn update(&mut self, dt: Duration);
    fn render(&self, frame: &mut Frame);
}
