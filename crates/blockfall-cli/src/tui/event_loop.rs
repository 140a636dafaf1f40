use std::time::{Duration, Instant};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Event loop state management.
///
/// Produces ticks at a fixed rate and redraws at most once per frame interval,
/// only after something changed. Terminal events are returned as soon as they
/// arrive.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    frame_interval: Duration,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates an event loop with ticks disabled and a 60 Hz frame cap.
    pub(super) fn new() -> Self {
        let now = Instant::now();
        Self {
            tick_interval: None,
            frame_interval: Duration::from_secs(1) / 60,
            last_tick: now,
            last_render: now,
            // The first frame is drawn immediately.
            dirty: true,
        }
    }

    /// Sets the tick interval. `None` disables ticks.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
        self.last_tick = Instant::now();
    }

    pub(super) fn set_frame_interval(&mut self, interval: Duration) {
        self.frame_interval = interval;
    }

    /// Returns the next event, blocking until one is due.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(tick_interval) = self.tick_interval {
                let elapsed = now.duration_since(self.last_tick);
                if elapsed >= tick_interval {
                    self.last_tick = now;
                    self.dirty = true;
                    return Ok(TuiEvent::Tick(elapsed));
                }
            }

            if self.dirty && now.duration_since(self.last_render) >= self.frame_interval {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if !event::poll(self.compute_timeout(now))? {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn compute_timeout(&self, now: Instant) -> Duration {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render_at = self.dirty.then_some(self.last_render + self.frame_interval);
        [next_tick_at, next_render_at]
            .into_iter()
            .flatten()
            .min()
            // Nothing scheduled: wake up periodically anyway.
            .map_or(Duration::from_millis(250), |at| {
                at.saturating_duration_since(now)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_waits_for_next_tick() {
        let mut events = EventLoop::new();
        events.dirty = false;
        events.set_tick_interval(Some(Duration::from_millis(100)));
        let now = events.last_tick + Duration::from_millis(30);
        assert_eq!(events.compute_timeout(now), Duration::from_millis(70));
    }

    #[test]
    fn test_timeout_is_zero_when_overdue() {
        let mut events = EventLoop::new();
        events.dirty = false;
        events.set_tick_interval(Some(Duration::from_millis(10)));
        let now = events.last_tick + Duration::from_millis(50);
        assert_eq!(events.compute_timeout(now), Duration::ZERO);
    }

    #[test]
    fn test_pending_render_shortens_timeout() {
        let mut events = EventLoop::new();
        events.set_tick_interval(Some(Duration::from_secs(1)));
        events.set_frame_interval(Duration::from_millis(20));
        events.last_render = events.last_tick;
        let now = events.last_tick + Duration::from_millis(5);
        assert_eq!(events.compute_timeout(now), Duration::from_millis(15));
    }
}
