use anyhow::{Context, Result};
use clap::Parser;
use common::results::{self, MapDimensions};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{error, info};

use terminal::app::{self, App, AppCommand, RunContext};
use terminal::cli::{Cli, Command, ReplayArgs, ResultsArgs, RunArgs};
use terminal::control::{self, RunControlClient};
use terminal::views::{ResultsViewerState, RunMonitorState};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let app = match cli.command {
        Command::Replay(args) => replay_app(args)?,
        Command::Results(args) => results_app(args)?,
        Command::Run(args) => {
            let config = args.config();
            if args.dry_run {
                println!("{}", config.command_preview());
                return Ok(());
            }
            let runtime = Runtime::new().context("Failed to start async runtime")?;
            let app = run_app(&runtime, args)?;
            return run_tui(app);
        }
    };

    run_tui(app)
}

/// Logs go to a file; the terminal belongs to the TUI.
fn init_logging(log_file: &Path) -> Result<()> {
    let file = File::create(log_file)
        .with_context(|| format!("Failed to create log file {:?}", log_file))?;
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn replay_app(args: ReplayArgs) -> Result<App> {
    let period = Duration::from_millis(args.speed_ms);
    if args.path.is_dir() {
        info!(dir = ?args.path, "Browsing snapshot files");
        App::replay_selector(args.path, period)
    } else {
        App::replay_file(args.path, period)
    }
}

fn results_app(args: ResultsArgs) -> Result<App> {
    let dims = match &args.map {
        Some(map) => std::fs::read_to_string(map)
            .map(|text| MapDimensions::parse(&text))
            .unwrap_or_else(|e| {
                error!(map = ?map, error = %e, "Failed to read map, using default board size");
                MapDimensions::default()
            }),
        None => MapDimensions::default(),
    };

    let viewer = match &args.file {
        Some(file) => {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read results file {:?}", file))?;
            let view = (!content.trim().is_empty())
                .then(|| results::interpret(args.mode.as_str(), &content));
            ResultsViewerState::new(file.display().to_string(), view.as_ref(), dims)
        }
        None => {
            let runtime = Runtime::new().context("Failed to start async runtime")?;
            let client = RunControlClient::new(args.server.clone());
            let map = args.map.as_ref().map(|m| m.to_string_lossy().into_owned());
            runtime.block_on(app::load_server_results(&client, args.mode, map.as_deref()))?
        }
    };
    Ok(App::results(viewer))
}

fn run_app(runtime: &Runtime, args: RunArgs) -> Result<App> {
    let config = args.config();
    let client = RunControlClient::new(args.server.clone());

    let accepted = runtime
        .block_on(client.submit(&config))
        .context("Failed to start simulation")?;
    info!(message = %accepted.message, "Run accepted");

    let (tx, rx) = mpsc::unbounded_channel();
    let handle = {
        let _guard = runtime.enter();
        control::monitor(client.clone(), tx)
    };

    let monitor = RunMonitorState::new(config.mode().as_str(), &accepted, rx, handle);
    let context = RunContext {
        runtime: runtime.handle().clone(),
        client,
        map_path: args.map_path().map(str::to_string),
        config,
    };
    Ok(App::run_monitor(monitor, context))
}

fn run_tui(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        eprintln!("Error: {:?}", err);
    }
    res
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut last_update = Instant::now();

    while !app.should_quit() {
        let now = Instant::now();
        app.update(now.duration_since(last_update));
        last_update = now;

        terminal.draw(|f| app.render(f))?;

        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                match app.handle_input(key) {
                    Some(AppCommand::Quit) => return Ok(()),
                    Some(command) => {
                        if let Err(e) = app.handle_command(command) {
                            error!(error = ?e, "Command failed");
                        }
                    }
                    None => {}
                }
            }
        }
    }
    Ok(())
}
