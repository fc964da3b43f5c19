//! Client side of the simulator run-control API: submitting runs, following
//! their output, and fetching the results they leave behind.

use std::time::Duration;

use chrono::{DateTime, Local};
use common::api::{
    ApiError, LatestResults, OutputPoll, RunAccepted, RunConfig, LATEST_RESULTS_PATH, OUTPUT_PATH,
    RUN_PATH,
};
use common::results::{MapDimensions, Mode};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const ERROR_BACKOFF: Duration = Duration::from_millis(1000);

/// Prefix of map paths as the simulator sees them; the server publishes the
/// same files relative to its root.
const MAP_PATH_PREFIX: &str = "../UserCommon/bonus/ui_server/";

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("run rejected: {0}")]
    Rejected(String),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("results unavailable: {0}")]
    Results(String),
}

#[derive(Clone)]
pub struct RunControlClient {
    http: reqwest::Client,
    base_url: String,
}

impl RunControlClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn submit(&self, config: &RunConfig) -> Result<RunAccepted, ControlError> {
        info!(mode = %config.mode(), command = %config.command_preview(), "Submitting run");
        let response = self.http.post(self.url(RUN_PATH)).json(config).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body: ApiError = response.json().await.unwrap_or(ApiError {
                error: None,
                details: None,
            });
            let reason = body.describe(status.as_u16());
            warn!(status = status.as_u16(), %reason, "Run rejected");
            return Err(ControlError::Rejected(reason));
        }

        Ok(response.json().await?)
    }

    pub async fn poll_output(&self) -> Result<OutputPoll, ControlError> {
        let response = self.http.get(self.url(OUTPUT_PATH)).send().await?;
        if !response.status().is_success() {
            return Err(ControlError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    pub async fn latest_results(&self, mode: Mode) -> Result<LatestResults, ControlError> {
        let response = self
            .http
            .get(self.url(LATEST_RESULTS_PATH))
            .query(&[("mode", mode.as_str())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ControlError::Status(response.status().as_u16()));
        }

        let latest: LatestResults = response.json().await?;
        if !latest.success {
            let reason = latest
                .error
                .clone()
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(ControlError::Results(reason));
        }
        Ok(latest)
    }

    /// Board size declared by the map file at `map_path`. Falls back to the
    /// default size whenever the map cannot be fetched.
    pub async fn map_dimensions(&self, map_path: &str) -> MapDimensions {
        if map_path.is_empty() {
            return MapDimensions::default();
        }
        let served = map_path.replace(MAP_PATH_PREFIX, "");
        let url = self.url(&format!("/{}", served.trim_start_matches('/')));

        let text = match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => response.text().await,
            Ok(response) => {
                debug!(%url, status = response.status().as_u16(), "Map not served");
                return MapDimensions::default();
            }
            Err(e) => Err(e),
        };
        match text {
            Ok(text) => MapDimensions::parse(&text),
            Err(e) => {
                debug!(%url, error = %e, "Failed to fetch map");
                MapDimensions::default()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEventKind {
    Output(String),
    Completed,
    Error(String),
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorEvent {
    pub at: DateTime<Local>,
    pub kind: MonitorEventKind,
}

impl MonitorEvent {
    fn now(kind: MonitorEventKind) -> Self {
        Self {
            at: Local::now(),
            kind,
        }
    }
}

/// Turns successive `output` payloads into the lines not seen before. The
/// server may answer with the whole transcript so far or with just the
/// fresh part; both are handled.
#[derive(Debug, Default)]
pub struct OutputTracker {
    seen: String,
}

impl OutputTracker {
    pub fn feed(&mut self, output: &str) -> Vec<String> {
        let fresh = match output.strip_prefix(self.seen.as_str()) {
            Some(rest) if !self.seen.is_empty() => rest,
            _ => output,
        };
        let lines = fresh
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if !output.is_empty() {
            self.seen = output.to_string();
        }
        lines
    }
}

/// A running output monitor.
pub struct RunHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl RunHandle {
    /// Asks the monitor to stop. It notices after its current sleep.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn join(self) {
        if let Err(e) = self.task.await {
            warn!(error = %e, "Output monitor task failed");
        }
    }
}

/// Spawns the output monitor on the current tokio runtime.
pub fn monitor(
    client: RunControlClient,
    events: mpsc::UnboundedSender<MonitorEvent>,
) -> RunHandle {
    let token = CancellationToken::new();
    let task = tokio::spawn(run_monitor(client, events, token.clone()));
    RunHandle { token, task }
}

async fn run_monitor(
    client: RunControlClient,
    events: mpsc::UnboundedSender<MonitorEvent>,
    token: CancellationToken,
) {
    info!("Monitoring run output");
    let mut tracker = OutputTracker::default();

    while !token.is_cancelled() {
        let pause = match client.poll_output().await {
            Ok(poll) => {
                for line in tracker.feed(&poll.output) {
                    if events.send(MonitorEvent::now(MonitorEventKind::Output(line))).is_err() {
                        debug!("Monitor receiver dropped");
                        return;
                    }
                }
                if !poll.running {
                    info!("Run completed");
                    let _ = events.send(MonitorEvent::now(MonitorEventKind::Completed));
                    return;
                }
                POLL_INTERVAL
            }
            Err(e) => {
                warn!(error = %e, "Output poll failed");
                if events
                    .send(MonitorEvent::now(MonitorEventKind::Error(e.to_string())))
                    .is_err()
                {
                    return;
                }
                ERROR_BACKOFF
            }
        };
        tokio::time::sleep(pause).await;
    }

    info!("Output monitor stopped");
    let _ = events.send(MonitorEvent::now(MonitorEventKind::Stopped));
}
