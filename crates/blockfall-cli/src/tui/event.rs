use std::time::Duration;

use crossterm::event::Event;

#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    /// Time to advance the application, carrying the time since the previous tick.
    Tick(Duration),
    /// Time to redraw.
    Render,
    #[from]
    Crossterm(Event),
}
