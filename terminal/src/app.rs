use anyhow::{Context, Result};
use common::api::RunConfig;
use common::results::{self, Mode};
use crossterm::event::KeyEvent;
use ratatui::Frame;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::runtime::Handle;

use crate::control::RunControlClient;
use crate::replay::reader::ReplayReader;
use crate::views::{
    ReplaySelectorState, ReplayViewerState, ResultsViewerState, RunMonitorState, View,
};

#[derive(Debug)]
pub enum AppCommand {
    Quit,
    Back,
    OpenReplay(PathBuf),
    FetchResults,
}

pub enum AppState {
    ReplaySelector(Box<ReplaySelectorState>),
    ReplayViewer(Box<ReplayViewerState>),
    ResultsViewer(Box<ResultsViewerState>),
    RunMonitor(Box<RunMonitorState>),
}

/// What a finished run needs to fetch its results.
pub struct RunContext {
    pub runtime: Handle,
    pub client: RunControlClient,
    pub config: RunConfig,
    pub map_path: Option<String>,
}

pub struct App {
    pub state: AppState,
    replay_dir: Option<PathBuf>,
    play_period: Duration,
    run: Option<RunContext>,
    quit: bool,
}

impl App {
    fn with_state(state: AppState) -> Self {
        Self {
            state,
            replay_dir: None,
            play_period: common::DEFAULT_PLAY_PERIOD,
            run: None,
            quit: false,
        }
    }

    /// Starts on the snapshot-file picker for `replay_dir`.
    pub fn replay_selector(replay_dir: PathBuf, play_period: Duration) -> Result<Self> {
        let selector = ReplaySelectorState::new(replay_dir.clone())?;
        let mut app = Self::with_state(AppState::ReplaySelector(Box::new(selector)));
        app.replay_dir = Some(replay_dir);
        app.play_period = play_period;
        Ok(app)
    }

    /// Opens a single snapshot file straight away.
    pub fn replay_file(path: PathBuf, play_period: Duration) -> Result<Self> {
        let viewer = Self::open_viewer(&path, play_period)?;
        let mut app = Self::with_state(AppState::ReplayViewer(Box::new(viewer)));
        app.play_period = play_period;
        Ok(app)
    }

    pub fn results(viewer: ResultsViewerState) -> Self {
        Self::with_state(AppState::ResultsViewer(Box::new(viewer)))
    }

    pub fn run_monitor(monitor: RunMonitorState, run: RunContext) -> Self {
        let mut app = Self::with_state(AppState::RunMonitor(Box::new(monitor)));
        app.run = Some(run);
        app
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    fn open_viewer(path: &Path, play_period: Duration) -> Result<ReplayViewerState> {
        let replay = ReplayReader::load_replay(path)?;
        ReplayViewerState::new(replay, play_period)
            .with_context(|| format!("Cannot play {:?}", path))
    }

    fn view(&self) -> &dyn View {
        match &self.state {
            AppState::ReplaySelector(view) => &**view,
            AppState::ReplayViewer(view) => &**view,
            AppState::ResultsViewer(view) => &**view,
            AppState::RunMonitor(view) => &**view,
        }
    }

    fn view_mut(&mut self) -> &mut dyn View {
        match &mut self.state {
            AppState::ReplaySelector(view) => &mut **view,
            AppState::ReplayViewer(view) => &mut **view,
            AppState::ResultsViewer(view) => &mut **view,
            AppState::RunMonitor(view) => &mut **view,
        }
    }

    pub fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        self.view_mut().handle_input(key)
    }

    pub fn update(&mut self, dt: Duration) {
        self.view_mut().update(dt);
    }

    pub fn render(&self, frame: &mut Frame) {
        self.view().render(frame);
    }

    pub fn handle_command(&mut self, command: AppCommand) -> Result<()> {
        match command {
            AppCommand::OpenReplay(path) => {
                let viewer = Self::open_viewer(&path, self.play_period)?;
                self.state = AppState::ReplayViewer(Box::new(viewer));
            }
            AppCommand::Back => match (&self.state, &self.replay_dir) {
                (AppState::ReplayViewer(_), Some(dir)) => {
                    let selector = ReplaySelectorState::new(dir.clone())?;
                    self.state = AppState::ReplaySelector(Box::new(selector));
                }
                _ => self.quit = true,
            },
            AppCommand::FetchResults => {
                let viewer = self.fetch_run_results()?;
                self.state = AppState::ResultsViewer(Box::new(viewer));
            }
            AppCommand::Quit => self.quit = true,
        }
        Ok(())
    }

    fn fetch_run_results(&self) -> Result<ResultsViewerState> {
        let run = self
            .run
            .as_ref()
            .context("No simulator run to fetch results for")?;
        let mode = run.config.mode();
        run.runtime
            .block_on(load_server_results(&run.client, mode, run.map_path.as_deref()))
    }
}

/// Latest results of `mode` from the server, ready to show.
pub async fn load_server_results(
    client: &RunControlClient,
    mode: Mode,
    map_path: Option<&str>,
) -> Result<ResultsViewerState> {
    let latest = client
        .latest_results(mode)
        .await
        .with_context(|| format!("Failed to load latest {} results", mode))?;

    let title = match (&latest.filename, &latest.timestamp) {
        (Some(file), Some(at)) => format!("Results from {} ({})", file, at),
        (Some(file), None) => format!("Results from {}", file),
        _ => latest
            .message
            .clone()
            .unwrap_or_else(|| "No results".to_string()),
    };

    let dims = match map_path {
        Some(path) => client.map_dimensions(path).await,
        None => Default::default(),
    };
    let view = latest
        .content()
        .filter(|content| !content.trim().is_empty())
        .map(|content| results::interpret(mode.as_str(), content));
    Ok(ResultsViewerState::new(title, view.as_ref(), dims))
}
