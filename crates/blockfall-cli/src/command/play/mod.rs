use blockfall_engine::{GameSession, PieceSeed};
use rand::Rng as _;

use crate::{command::play::app::PlayApp, tui::Tui};

mod app;
mod input;

const DEFAULT_FPS: u32 = 60;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece sequence, as 32 hex digits (random when omitted)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Ticks and frames per second
    #[clap(long, default_value_t = DEFAULT_FPS, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,
    /// Hide the dotted grid on empty cells
    #[clap(long)]
    no_grid: bool,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            seed: None,
            fps: DEFAULT_FPS,
            no_grid: false,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { seed, fps, no_grid } = arg;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(%seed, fps, "starting play session");

    let mut app = PlayApp::new(GameSession::with_seed(seed), *fps, !*no_grid);
    Tui::new().run(&mut app)?;

    if let Some(report) = app.session().game_over_report() {
        tracing::info!(
            score = report.score,
            level = report.level,
            lines = report.lines,
            "last game finished"
        );
    }
    Ok(())
}
