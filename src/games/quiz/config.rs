//! Balance numbers and timer configuration for the quiz arena.
//!
//! Every formula in `logic.rs` reads its constants from here.

// ── Player ────────────────────────────────────────────────────

/// Max health at level 1 with no HP points spent.
pub const BASE_MAX_HEALTH: u32 = 100;

/// Max health gained per level above 1.
pub const HEALTH_PER_LEVEL: u32 = 10;

/// Max health gained per allocated HP point.
pub const HEALTH_PER_HP_POINT: u32 = 10;

/// Attack before any ATK points.
pub const BASE_ATTACK: u32 = 40;

/// Added to `base_attack` per ATK point, and again to the damage formula.
pub const ATTACK_PER_ATK_POINT: u32 = 5;

// ── Leveling ──────────────────────────────────────────────────

pub const STARTING_EXP_TO_NEXT: u64 = 100;

/// `exp_to_next` grows by 1.35x per level, floored. Kept as a ratio so the
/// floor is exact integer division.
pub const EXP_GROWTH_NUMERATOR: u64 = 135;
pub const EXP_GROWTH_DENOMINATOR: u64 = 100;

pub const POINTS_PER_LEVEL: u32 = 2;

/// A trait is granted on every level divisible by this.
pub const TRAIT_LEVEL_INTERVAL: u32 = 10;

pub const REGULAR_EXP: u64 = 70;
pub const BOSS_EXP: u64 = 150;

// ── Progression ───────────────────────────────────────────────

/// Encounters per floor. The last one is the boss.
pub const OPPONENTS_PER_FLOOR: u32 = 10;

/// First floor that uses the steeper hard-question threshold.
pub const LATE_FLOOR: u32 = 6;

/// Before `LATE_FLOOR`, opponents from this count on ask hard questions.
pub const EARLY_HARD_FROM: u32 = 8;

/// From `LATE_FLOOR` on, opponents from this count on ask hard questions.
pub const LATE_HARD_FROM: u32 = 7;

// ── Enemies ───────────────────────────────────────────────────

pub const REGULAR_BASE_HEALTH: u32 = 80;
pub const REGULAR_HEALTH_PER_FLOOR: u32 = 18;
pub const REGULAR_BASE_DPS: u32 = 20;
pub const REGULAR_DPS_PER_FLOOR: u32 = 3;

pub const BOSS_HEALTH_PER_FLOOR: u32 = 40;
pub const BOSS_DPS_PER_FLOOR: u32 = 5;

// ── Timer ─────────────────────────────────────────────────────

pub const EASY_TIME_SECS: f64 = 30.0;
pub const MEDIUM_TIME_SECS: f64 = 40.0;
pub const HARD_TIME_SECS: f64 = 50.0;

/// Remaining time at or below this counts as expired (absorbs float drift
/// from repeated fractional decrements).
pub const EXPIRY_EPSILON: f64 = 1e-6;

// ── Messages ──────────────────────────────────────────────────

pub const LOG_CAPACITY: usize = 30;

/// How often the countdown ticks and how much each tick takes off.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimerConfig {
    pub tick_ms: u32,
    pub seconds_per_tick: f64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_ms: 200,
            seconds_per_tick: 0.2,
        }
    }
}

impl TimerConfig {
    /// Real milliseconds per tick. Zero is treated as one.
    pub fn ms_per_tick(&self) -> f64 {
        self.tick_ms.max(1) as f64
    }
}

/// Everything a session needs at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuizConfig {
    pub timer: TimerConfig,
    /// Seeds the session RNG (question picks and trait draws).
    pub seed: u64,
}

impl QuizConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            timer: TimerConfig::default(),
            seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timer_is_200ms() {
        let t = TimerConfig::default();
        assert_eq!(t.tick_ms, 200);
        assert_eq!(t.ms_per_tick(), 200.0);
        // One real second of ticks takes one second off the countdown.
        let ticks_per_sec = 1000.0 / t.ms_per_tick();
        assert!((t.seconds_per_tick * ticks_per_sec - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_tick_ms_counts_as_one() {
        let t = TimerConfig { tick_ms: 0, seconds_per_tick: 0.2 };
        assert_eq!(t.ms_per_tick(), 1.0);
    }

    #[test]
    fn hard_thresholds_are_ordered() {
        assert!(LATE_HARD_FROM < EARLY_HARD_FROM);
        assert!(EARLY_HARD_FROM <= OPPONENTS_PER_FLOOR);
    }
}
