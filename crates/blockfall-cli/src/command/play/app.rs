use std::time::Duration;

use blockfall_engine::{Command, GameSession, SessionEvent};
use crossterm::event::Event;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::{
    command::play::input::{self, Action},
    tui::{App, Tui},
    view::widgets::{KeyBindingDisplay, SessionDisplay},
};

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    fps: u32,
    show_grid: bool,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(session: GameSession, fps: u32, show_grid: bool) -> Self {
        Self {
            session,
            fps,
            show_grid,
            is_exiting: false,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    fn apply(&mut self, command: Command) {
        if let Err(err) = self.session.apply(command) {
            tracing::trace!(?command, %err, "command rejected");
        }
        self.log_events();
    }

    fn log_events(&mut self) {
        for event in self.session.take_events() {
            match event {
                SessionEvent::GameOver(report) => match serde_json::to_string(&report) {
                    Ok(json) => tracing::info!(report = %json, "game over"),
                    Err(err) => tracing::warn!(%err, "failed to serialize game over report"),
                },
                event => tracing::trace!(?event, "session event"),
            }
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(f64::from(self.fps));
        tui.set_frame_rate(f64::from(self.fps));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: &Event) {
        match input::action_for_event(event) {
            Some(Action::Game(command)) => self.apply(command),
            Some(Action::Quit) => self.is_exiting = true,
            None => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.session).show_grid(self.show_grid);
        let help = KeyBindingDisplay::for_state(self.session.state());

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(session_display.height()),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help, help_area);
    }

    fn update(&mut self, _tui: &mut Tui, elapsed: Duration) {
        if self.session.tick(elapsed) {
            self.log_events();
        }
    }
}
