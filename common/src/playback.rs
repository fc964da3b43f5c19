use std::time::Duration;

use crate::error::PlaybackError;
use crate::frame::PlaybackFrame;
use crate::snapshot::GameData;

pub const DEFAULT_PLAY_PERIOD: Duration = Duration::from_millis(500);
pub const MIN_PLAY_PERIOD: Duration = Duration::from_millis(50);
pub const MAX_PLAY_PERIOD: Duration = Duration::from_millis(2000);

/// Surface a playback session draws onto.
pub trait PlaybackView {
    fn render(&mut self, frame: &PlaybackFrame);

    /// Called whenever the session switches between playing and paused.
    fn set_playing(&mut self, playing: bool);
}

/// Periodic timer owned by a playback session. The host calls
/// [`PlaybackSession::tick`] each time a started timer fires.
pub trait Scheduler {
    type Handle;

    fn start(&mut self, period: Duration) -> Result<Self::Handle, PlaybackError>;
    fn cancel(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Paused,
    Playing,
}

pub struct PlaybackSession<V: PlaybackView, S: Scheduler> {
    data: GameData,
    view: V,
    scheduler: S,
    cursor: usize,
    timer: Option<S::Handle>,
    period: Duration,
}

impl<V: PlaybackView, S: Scheduler> PlaybackSession<V, S> {
    /// Builds a session and draws the first snapshot.
    pub fn new(data: GameData, view: V, scheduler: S) -> Result<Self, PlaybackError> {
        if data.is_empty() {
            log::error!("No snapshots available for visualization");
            return Err(PlaybackError::NoSnapshots);
        }

        let mut session = Self {
            data,
            view,
            scheduler,
            cursor: 0,
            timer: None,
            period: DEFAULT_PLAY_PERIOD,
        };
        session.render_at(0)?;
        Ok(session)
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.set_speed(period);
        self
    }

    /// Moves the cursor to `index` and redraws. Out-of-range indices are
    /// rejected and leave the session untouched.
    pub fn render_at(&mut self, index: usize) -> Result<(), PlaybackError> {
        let Some(frame) = PlaybackFrame::build(&self.data, index) else {
            log::error!("Invalid snapshot index: {index}");
            return Err(PlaybackError::InvalidIndex {
                index,
                len: self.data.len(),
            });
        };

        self.cursor = index;
        self.view.render(&frame);
        Ok(())
    }

    pub fn first(&mut self) {
        self.pause();
        let _ = self.render_at(0);
    }

    pub fn last(&mut self) {
        self.pause();
        let _ = self.render_at(self.last_index());
    }

    pub fn next(&mut self) {
        self.advance(1);
    }

    pub fn previous(&mut self) {
        self.advance(-1);
    }

    /// Steps one snapshot forward or back. Pauses playback and does nothing
    /// else at either end of the sequence. Returns whether the cursor moved.
    pub fn advance(&mut self, delta: isize) -> bool {
        self.pause();
        self.step(delta)
    }

    pub fn play(&mut self) {
        if self.timer.is_some() {
            return;
        }
        if self.cursor == self.last_index() {
            log::debug!("Already at the final snapshot, staying paused");
            return;
        }

        match self.scheduler.start(self.period) {
            Ok(handle) => {
                self.timer = Some(handle);
                self.view.set_playing(true);
            }
            Err(err) => log::error!("Cannot start playback: {err}"),
        }
    }

    pub fn pause(&mut self) {
        let Some(handle) = self.timer.take() else {
            return;
        };
        self.scheduler.cancel(handle);
        self.view.set_playing(false);
    }

    /// Changes the playback period. A running timer is replaced, never
    /// duplicated.
    pub fn set_speed(&mut self, period: Duration) {
        self.period = period.clamp(MIN_PLAY_PERIOD, MAX_PLAY_PERIOD);

        if let Some(handle) = self.timer.take() {
            self.scheduler.cancel(handle);
            match self.scheduler.start(self.period) {
                Ok(handle) => self.timer = Some(handle),
                Err(err) => {
                    log::error!("Cannot restart playback: {err}");
                    self.view.set_playing(false);
                }
            }
        }
    }

    /// Timer callback: advance one snapshot, pausing once the end is reached.
    pub fn tick(&mut self) {
        if self.timer.is_none() {
            return;
        }
        self.step(1);
        if self.cursor == self.last_index() {
            self.pause();
        }
    }

    pub fn state(&self) -> PlaybackState {
        if self.timer.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn data(&self) -> &GameData {
        &self.data
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn last_index(&self) -> usize {
        self.data.len() - 1
    }

    fn step(&mut self, delta: isize) -> bool {
        let Some(target) = self.cursor.checked_add_signed(delta) else {
            return false;
        };
        if target > self.last_index() {
            return false;
        }
        self.render_at(target).is_ok()
    }
}
