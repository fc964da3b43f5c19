use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use common::{PlaybackError, PlaybackSession, PlaybackView, Scheduler};
use wasm_bindgen::prelude::*;
use web_sys::Window;

/// Slot the interval callback reads the session from. Filled once the
/// session exists, since the session owns the scheduler that owns the
/// callback.
pub type SessionSlot<V> = Rc<RefCell<Weak<RefCell<PlaybackSession<V, IntervalScheduler>>>>>;

/// Drives playback ticks with `window.setInterval`.
pub struct IntervalScheduler {
    window: Window,
    tick: Closure<dyn FnMut()>,
}

impl IntervalScheduler {
    pub fn new<V: PlaybackView + 'static>(window: Window, slot: SessionSlot<V>) -> Self {
        let tick = Closure::<dyn FnMut()>::new(move || {
            let Some(session) = slot.borrow().upgrade() else {
                return;
            };
            // A navigation call already holding the session wins over the tick.
            if let Ok(mut session) = session.try_borrow_mut() {
                session.tick();
            };
        });
        Self { window, tick }
    }
}

impl Scheduler for IntervalScheduler {
    type Handle = i32;

    fn start(&mut self, period: Duration) -> Result<i32, PlaybackError> {
        let timeout = i32::try_from(period.as_millis()).unwrap_or(i32::MAX);
        self.window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                self.tick.as_ref().unchecked_ref(),
                timeout,
            )
            .map_err(|err| PlaybackError::TimerUnavailable(format!("{:?}", err)))
    }

    fn cancel(&mut self, handle: i32) {
        self.window.clear_interval_with_handle(handle);
    }
}
