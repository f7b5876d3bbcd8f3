use std::time::Duration;

use serde::{Serialize, Serializer};

/// Score values for line clears.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
pub const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Points needed per level.
pub const LEVEL_SCORE: usize = 100;

const BASE_FALL_INTERVAL_MS: u64 = 1000;
const MIN_FALL_INTERVAL_MS: u64 = 100;
const FALL_INTERVAL_DECREMENT_MS: u64 = 100;

/// Points awarded for clearing `lines` rows with a single lock.
///
/// A single piece spans at most four rows, so anything above four is scored
/// as four.
#[must_use]
pub fn points_for_lines(lines: usize) -> usize {
    SCORE_TABLE[lines.min(SCORE_TABLE.len() - 1)]
}

/// Level reached with `score` points: `score / 100 + 1`.
///
/// # Examples
///
/// ```
/// use blockfall_engine::level_for_score;
///
/// assert_eq!(level_for_score(0), 1);
/// assert_eq!(level_for_score(99), 1);
/// assert_eq!(level_for_score(800), 9);
/// ```
#[must_use]
pub const fn level_for_score(score: usize) -> usize {
    score / LEVEL_SCORE + 1
}

/// Gravity interval in milliseconds at `level`.
///
/// Starts at 1000 ms on level 1, drops by 100 ms per level, and never goes
/// below 100 ms.
#[must_use]
pub const fn fall_interval_ms(level: usize) -> u64 {
    let steps = level.saturating_sub(1) as u64;
    let decrement = steps.saturating_mul(FALL_INTERVAL_DECREMENT_MS);
    let interval = BASE_FALL_INTERVAL_MS.saturating_sub(decrement);
    if interval < MIN_FALL_INTERVAL_MS {
        MIN_FALL_INTERVAL_MS
    } else {
        interval
    }
}

/// Gravity interval at `level`, see [`fall_interval_ms`].
#[must_use]
pub const fn fall_interval(level: usize) -> Duration {
    Duration::from_millis(fall_interval_ms(level))
}

/// A level transition produced by a lock.
///
/// When several level-ups happen before anyone observes them, they are
/// folded into one transition from the oldest `previous` to the newest
/// `level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub previous: usize,
    pub level: usize,
}

impl LevelUp {
    /// Gravity interval of the new level.
    #[must_use]
    pub const fn fall_interval(&self) -> Duration {
        fall_interval(self.level)
    }

    #[must_use]
    pub(crate) const fn merge(self, later: Self) -> Self {
        Self {
            previous: self.previous,
            level: later.level,
        }
    }
}

/// Game statistics tracking score, level, lines cleared, and piece count.
///
/// Tracks various metrics during a game session:
///
/// - **Score**: Points earned from line clears
/// - **Level**: Derived from score (1 level per 100 points)
/// - **Completed pieces**: Total number of pieces locked
/// - **Line clear distribution**: Count of locks clearing 0, 1, 2, 3, 4 lines
/// - **Play time**: Time spent in the playing state
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// let level_up = stats.record_lock(4);
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.level(), 9);
/// assert_eq!(level_up.map(|l| l.level), Some(9));
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    level: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
    #[serde(rename = "play_time_ms", serialize_with = "serialize_millis")]
    play_time: Duration,
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u128(duration.as_millis())
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new tracker at score 0, level 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: level_for_score(0),
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
            play_time: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Current level, always `score / 100 + 1`.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Gravity interval at the current level.
    #[must_use]
    pub const fn fall_interval(&self) -> Duration {
        fall_interval(self.level)
    }

    /// Points still missing before the next level.
    #[must_use]
    pub const fn points_to_next_level(&self) -> usize {
        LEVEL_SCORE - self.score % LEVEL_SCORE
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by lines cleared.
    ///
    /// Array indices represent:
    /// - `[0]`: Number of locks with 0 lines cleared
    /// - `[1]`: Number of singles (1 line)
    /// - `[2]`: Number of doubles (2 lines)
    /// - `[3]`: Number of triples (3 lines)
    /// - `[4]`: Number of quads (4 lines)
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    #[must_use]
    pub const fn play_time(&self) -> Duration {
        self.play_time
    }

    pub(crate) fn add_play_time(&mut self, elapsed: Duration) {
        self.play_time = self.play_time.saturating_add(elapsed);
    }

    /// Updates statistics after a piece locks and `cleared_lines` rows are
    /// removed.
    ///
    /// Returns the level transition if the new score reached a higher level.
    pub fn record_lock(&mut self, cleared_lines: usize) -> Option<LevelUp> {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        let bucket = cleared_lines.min(self.line_cleared_counter.len() - 1);
        self.line_cleared_counter[bucket] += 1;
        self.score += points_for_lines(cleared_lines);

        let previous = self.level;
        self.level = level_for_score(self.score);
        (self.level > previous).then_some(LevelUp {
            previous,
            level: self.level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_table() {
        assert_eq!(points_for_lines(0), 0);
        assert_eq!(points_for_lines(1), 100);
        assert_eq!(points_for_lines(2), 300);
        assert_eq!(points_for_lines(3), 500);
        assert_eq!(points_for_lines(4), 800);
    }

    #[test]
    fn test_score_and_level_from_zero() {
        for (lines, score, level) in [(1, 100, 2), (2, 300, 4), (3, 500, 6), (4, 800, 9)] {
            let mut stats = GameStats::new();
            let level_up = stats.record_lock(lines);
            assert_eq!(stats.score(), score, "{lines} lines");
            assert_eq!(stats.level(), level, "{lines} lines");
            assert_eq!(level_up, Some(LevelUp { previous: 1, level }));
        }
    }

    #[test]
    fn test_no_level_up_without_clears() {
        let mut stats = GameStats::new();
        assert_eq!(stats.record_lock(0), None);
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.completed_pieces(), 1);
        assert_eq!(stats.line_cleared_counter(), &[1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_fall_interval_curve() {
        assert_eq!(fall_interval_ms(1), 1000);
        assert_eq!(fall_interval_ms(2), 900);
        assert_eq!(fall_interval_ms(9), 200);
        assert_eq!(fall_interval_ms(10), 100);
        assert_eq!(fall_interval_ms(15), 100);
        assert_eq!(fall_interval_ms(usize::MAX), 100);
        assert_eq!(fall_interval(1), Duration::from_secs(1));
    }

    #[test]
    fn test_fall_interval_monotonic() {
        for level in 1..30 {
            assert!(fall_interval_ms(level + 1) <= fall_interval_ms(level));
        }
    }

    #[test]
    fn test_points_to_next_level() {
        let mut stats = GameStats::new();
        assert_eq!(stats.points_to_next_level(), 100);
        stats.record_lock(2);
        assert_eq!(stats.points_to_next_level(), 100);
        assert_eq!(stats.level(), 4);
    }

    #[test]
    fn test_accumulated_stats() {
        let mut stats = GameStats::new();
        stats.record_lock(1);
        stats.record_lock(0);
        stats.record_lock(3);
        assert_eq!(stats.score(), 600);
        assert_eq!(stats.level(), 7);
        assert_eq!(stats.total_cleared_lines(), 4);
        assert_eq!(stats.completed_pieces(), 3);
        assert_eq!(stats.line_cleared_counter(), &[1, 1, 0, 1, 0]);
    }

    #[test]
    fn test_level_up_merge() {
        let first = LevelUp {
            previous: 1,
            level: 2,
        };
        let second = LevelUp {
            previous: 2,
            level: 4,
        };
        assert_eq!(
            first.merge(second),
            LevelUp {
                previous: 1,
                level: 4
            }
        );
    }

    #[test]
    fn test_stats_serialization() {
        let mut stats = GameStats::new();
        stats.record_lock(2);
        stats.add_play_time(Duration::from_millis(1500));

        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["score"], 300);
        assert_eq!(value["level"], 4);
        assert_eq!(value["completed_pieces"], 1);
        assert_eq!(value["line_cleared_counter"][2], 1);
        assert_eq!(value["play_time_ms"], 1500);
    }
}
