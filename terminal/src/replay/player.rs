//! Playback driven by the TUI frame loop instead of a wall-clock timer.

use common::{
    GameData, PlaybackError, PlaybackFrame, PlaybackSession, PlaybackView, Scheduler,
};
use std::time::Duration;

/// Scheduler that counts elapsed frame time and reports how many ticks are
/// due. Only one timer is ever live.
#[derive(Debug, Default)]
pub struct FrameClock {
    next_id: u64,
    active: Option<(u64, Duration)>,
    accumulator: Duration,
}

impl FrameClock {
    /// Adds `dt` to the running timer and drains the ticks it covers.
    pub fn elapse(&mut self, dt: Duration) -> u32 {
        let Some((_, period)) = self.active else {
            return 0;
        };
        self.accumulator += dt;
        let mut due = 0;
        while self.accumulator >= period {
            self.accumulator -= period;
            due += 1;
        }
        due
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.active.map(|(_, period)| period)
    }
}

impl Scheduler for FrameClock {
    type Handle = u64;

    fn start(&mut self, period: Duration) -> Result<u64, PlaybackError> {
        self.next_id += 1;
        self.active = Some((self.next_id, period));
        self.accumulator = Duration::ZERO;
        Ok(self.next_id)
    }

    fn cancel(&mut self, handle: u64) {
        if matches!(self.active, Some((id, _)) if id == handle) {
            self.active = None;
            self.accumulator = Duration::ZERO;
        }
    }
}

/// Keeps the most recent frame for the next terminal draw.
#[derive(Debug, Default)]
pub struct FrameView {
    frame: Option<PlaybackFrame>,
    playing: bool,
}

impl FrameView {
    pub fn frame(&self) -> Option<&PlaybackFrame> {
        self.frame.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl PlaybackView for FrameView {
    fn render(&mut self, frame: &PlaybackFrame) {
        self.frame = Some(frame.clone());
    }

    fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }
}

pub type ReplayPlayer = PlaybackSession<FrameView, FrameClock>;

pub fn open(game: GameData, period: Duration) -> Result<ReplayPlayer, PlaybackError> {
    Ok(PlaybackSession::new(game, FrameView::default(), FrameClock::default())?.with_period(period))
}

/// Feeds one frame's worth of time to the player. Returns how many snapshots
/// it advanced.
pub fn advance_clock(player: &mut ReplayPlayer, dt: Duration) -> u32 {
    let due = player.scheduler_mut().elapse(dt);
    let before = player.cursor();
    for _ in 0..due {
        if !player.is_playing() {
            break;
        }
        player.tick();
    }
    (player.cursor() - before) as u32
}
