//! Score and level progression
//!
//! Level thresholds follow the Fibonacci sequence (times ten), and every
//! difficulty parameter is a simple linear function of the level index.
//! Nothing here is random: identical score histories always produce
//! identical level sequences.

use serde::{Deserialize, Serialize};

/// Number of levels generated for a session
pub const LEVEL_COUNT: usize = 20;

/// Enemy tint per level; levels past the end reuse the last entry
pub const LEVEL_COLORS: [u32; 8] = [
    0xff0000, // red
    0xff6600, // orange
    0xffcc00, // yellow
    0x00ff00, // green
    0x00ccff, // light blue
    0x9900ff, // violet
    0xff00ff, // magenta
    0x000000, // black
];

/// Immutable difficulty parameters for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    /// 1-based level number
    pub level: u32,
    /// Cumulative score that completes this level
    pub required_score: u64,
    /// Base seconds between regular spawns
    pub spawn_interval: f32,
    pub enemy_speed: f32,
    pub enemy_health: i32,
    pub enemy_damage: i32,
    /// Spawn gate: no regular spawn while this many enemies are alive
    pub max_enemies: usize,
    /// 0xRRGGBB
    pub color: u32,
}

/// First `n` Fibonacci numbers, starting `[1, 1]`
pub fn generate_fibonacci(n: usize) -> Vec<u64> {
    let mut sequence = vec![1u64, 1];
    for i in 2..n {
        let next = sequence[i - 1].saturating_add(sequence[i - 2]);
        sequence.push(next);
    }
    sequence.truncate(n);
    sequence
}

/// Color for a 1-based level
pub fn level_color(level: u32) -> u32 {
    let index = (level.max(1) as usize - 1).min(LEVEL_COLORS.len() - 1);
    LEVEL_COLORS[index]
}

/// One descriptor per Fibonacci number
pub fn generate_levels(fibonacci: &[u64]) -> Vec<LevelDescriptor> {
    fibonacci
        .iter()
        .enumerate()
        .map(|(i, &fib)| {
            let step = i as f32;
            LevelDescriptor {
                level: i as u32 + 1,
                required_score: fib.saturating_mul(10),
                spawn_interval: (3.0 - step * 0.2).max(0.5),
                enemy_speed: 2.0 + step * 0.5,
                enemy_health: 100 + i as i32 * 20,
                enemy_damage: 20 + i as i32 * 5,
                max_enemies: 5 + i / 2,
                color: level_color(i as u32 + 1),
            }
        })
        .collect()
}

/// Cumulative score and the current level
///
/// Deserializing rebuilds the level table from the stored sequence, so a
/// loaded value always has at least one level and a level number inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ProgressionRecord")]
pub struct Progression {
    current_level: u32,
    score: u64,
    fibonacci: Vec<u64>,
    levels: Vec<LevelDescriptor>,
}

/// Serialized form; descriptors are derived data and ignored on load
#[derive(Deserialize)]
struct ProgressionRecord {
    current_level: u32,
    score: u64,
    fibonacci: Vec<u64>,
}

impl From<ProgressionRecord> for Progression {
    fn from(record: ProgressionRecord) -> Self {
        let mut progression = Self::from_fibonacci(record.fibonacci);
        progression.score = record.score;
        progression.current_level = record
            .current_level
            .clamp(1, progression.levels.len() as u32);
        progression
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    pub fn new() -> Self {
        Self::from_fibonacci(generate_fibonacci(LEVEL_COUNT))
    }

    /// Build from an explicit sequence (must be non-empty)
    pub fn from_fibonacci(fibonacci: Vec<u64>) -> Self {
        let fibonacci = if fibonacci.is_empty() { vec![1] } else { fibonacci };
        let levels = generate_levels(&fibonacci);
        Self {
            current_level: 1,
            score: 0,
            fibonacci,
            levels,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn levels(&self) -> &[LevelDescriptor] {
        &self.levels
    }

    pub fn current_descriptor(&self) -> &LevelDescriptor {
        &self.levels[self.current_level as usize - 1]
    }

    fn next_descriptor(&self) -> Option<&LevelDescriptor> {
        self.levels.get(self.current_level as usize)
    }

    pub fn is_max_level(&self) -> bool {
        self.current_level as usize >= self.levels.len()
    }

    /// Add points, then check for a level-up
    ///
    /// Returns the new level if this call advanced one.
    pub fn add_score(&mut self, points: u64) -> Option<u32> {
        self.score = self.score.saturating_add(points);
        self.check_level_up()
    }

    /// Advance at most one level if the current threshold has been met
    ///
    /// A score jump past several thresholds still advances only one level per
    /// call; the next `add_score` picks up the rest.
    pub fn check_level_up(&mut self) -> Option<u32> {
        if self.score < self.current_descriptor().required_score || self.is_max_level() {
            return None;
        }
        self.current_level += 1;
        log::info!("Level up: {} (score {})", self.current_level, self.score);
        Some(self.current_level)
    }

    /// Fraction of the way from the current threshold to the next, in [0, 1]
    pub fn progress_to_next_level(&self) -> f32 {
        let Some(next) = self.next_descriptor() else {
            return 1.0;
        };
        let current = self.current_descriptor().required_score;
        let span = next.required_score.saturating_sub(current);
        if span == 0 {
            return if self.score >= next.required_score { 1.0 } else { 0.0 };
        }
        let into = self.score.saturating_sub(current);
        (into as f32 / span as f32).clamp(0.0, 1.0)
    }

    /// Threshold of the next level, or `None` at the last level
    pub fn required_score_for_next_level(&self) -> Option<u64> {
        self.next_descriptor().map(|d| d.required_score)
    }

    /// Fibonacci number behind a 1-based level (1 if out of range)
    pub fn fibonacci_number(&self, level: u32) -> u64 {
        level
            .checked_sub(1)
            .and_then(|i| self.fibonacci.get(i as usize))
            .copied()
            .unwrap_or(1)
    }

    pub fn reset(&mut self) {
        self.current_level = 1;
        self.score = 0;
    }
}
