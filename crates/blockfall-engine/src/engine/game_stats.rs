use std::time::Duration;

/// Points per cleared row, multiplied by the level at the time of the clear.
pub const SCORE_PER_ROW: u64 = 100;

/// Rows needed to advance one level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Drop interval at level 1.
pub const INITIAL_DROP_INTERVAL: Duration = Duration::from_millis(500);

/// Amount the drop interval shrinks per level.
pub const DROP_INTERVAL_STEP: Duration = Duration::from_millis(50);

/// Floor of the drop interval.
pub const MIN_DROP_INTERVAL: Duration = Duration::from_millis(50);

/// Returns the level reached after clearing `lines` rows in total.
///
/// ```
/// use blockfall_engine::level_for_lines;
///
/// assert_eq!(level_for_lines(0), 1);
/// assert_eq!(level_for_lines(27), 3);
/// ```
#[must_use]
pub const fn level_for_lines(lines: u32) -> u32 {
    lines / LINES_PER_LEVEL + 1
}

/// Returns the automatic drop interval at `level`.
///
/// The interval starts at 500 ms and loses 50 ms per level, never going below 50 ms.
#[must_use]
pub fn drop_interval_for_level(level: u32) -> Duration {
    DROP_INTERVAL_STEP
        .checked_mul(level.saturating_sub(1))
        .and_then(|step| INITIAL_DROP_INTERVAL.checked_sub(step))
        .unwrap_or(Duration::ZERO)
        .max(MIN_DROP_INTERVAL)
}

/// Game statistics tracking score, level, lines and piece count.
///
/// # Scoring
///
/// Each locked piece that clears `n > 0` rows adds `n * 100 * level` points,
/// using the level *before* the clear is counted. After the clear the level
/// is recomputed from the total lines, and the drop interval from the level.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(2);
///
/// assert_eq!(stats.score(), 200);
/// assert_eq!(stats.lines(), 2);
/// assert_eq!(stats.level(), 1);
/// assert_eq!(stats.drop_interval(), Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: u64,
    level: u32,
    lines: u32,
    drop_interval: Duration,
    completed_pieces: u32,
    line_cleared_counter: [u32; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates statistics for a fresh session: level 1, nothing cleared.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            lines: 0,
            drop_interval: INITIAL_DROP_INTERVAL,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Returns the current level (1-based).
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Returns the total number of rows cleared.
    #[must_use]
    pub const fn lines(&self) -> u32 {
        self.lines
    }

    /// Returns the time between automatic one-row descents.
    #[must_use]
    pub const fn drop_interval(&self) -> Duration {
        self.drop_interval
    }

    /// Returns the number of pieces locked into the board.
    #[must_use]
    pub const fn completed_pieces(&self) -> u32 {
        self.completed_pieces
    }

    /// Returns a histogram of locks by rows cleared.
    ///
    /// Index `n` counts the locks that cleared exactly `n` rows (0 to 4).
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[u32; 5] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece locks and returns the points gained.
    ///
    /// # Panics
    ///
    /// Panics if `cleared_rows` is larger than any board could clear at once.
    pub fn complete_piece_drop(&mut self, cleared_rows: usize) -> u64 {
        self.completed_pieces += 1;
        if let Some(count) = self.line_cleared_counter.get_mut(cleared_rows) {
            *count += 1;
        }
        if cleared_rows == 0 {
            return 0;
        }

        let rows = u32::try_from(cleared_rows).expect("row count should fit in u32");
        let points = u64::from(rows) * SCORE_PER_ROW * u64::from(self.level);
        self.score += points;
        self.lines += rows;
        self.level = level_for_lines(self.lines);
        self.drop_interval = drop_interval_for_level(self.level);
        points
    }
}
