//! Quiz arena state — all data structures, no transitions.
//!
//! One `QuizState` owns the whole session: player, floor progress, the
//! current enemy and question, the cached question pools and the single
//! countdown slot.

use std::fmt;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::config::*;
use super::error::QuizError;
use super::questions::QuestionPools;

// ── Difficulty ────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Countdown length for a question of this tier.
    pub fn time_limit_secs(self) -> f64 {
        match self {
            Difficulty::Easy => EASY_TIME_SECS,
            Difficulty::Medium => MEDIUM_TIME_SECS,
            Difficulty::Hard => HARD_TIME_SECS,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Questions ─────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub answer: String,
    pub points: u32,
    pub difficulty: Difficulty,
}

impl Question {
    /// Case-insensitive comparison, ignoring surrounding whitespace.
    pub fn is_answered_by(&self, input: &str) -> bool {
        input.trim().to_lowercase() == self.answer.trim().to_lowercase()
    }
}

// ── Races ─────────────────────────────────────────────────────

pub struct BossInfo {
    pub name: &'static str,
    pub emoji: &'static str,
    pub base_health: u32,
    pub base_dps: u32,
}

pub struct Race {
    pub name: &'static str,
    pub emoji: &'static str,
    pub boss: BossInfo,
}

pub static RACES: [Race; 8] = [
    Race {
        name: "Drakonid", emoji: "🐲",
        boss: BossInfo { name: "Tyrant Varkos", emoji: "🐉", base_health: 600, base_dps: 75 },
    },
    Race {
        name: "Celestian", emoji: "👼",
        boss: BossInfo { name: "Archangel Seraphiel", emoji: "🕊️", base_health: 700, base_dps: 90 },
    },
    Race {
        name: "Netherkin", emoji: "👹",
        boss: BossInfo { name: "Dreadlord Malphas", emoji: "🔥", base_health: 800, base_dps: 100 },
    },
    Race {
        name: "Synthian", emoji: "🤖",
        boss: BossInfo { name: "Prime Unit X-99", emoji: "🛸", base_health: 900, base_dps: 200 },
    },
    Race {
        name: "Sylvari", emoji: "🌿",
        boss: BossInfo { name: "Ancient Oakenheart", emoji: "🌳", base_health: 750, base_dps: 85 },
    },
    Race {
        name: "Aquarian", emoji: "🌊",
        boss: BossInfo { name: "Tidebringer Nereus", emoji: "🌊", base_health: 650, base_dps: 95 },
    },
    Race {
        name: "Pyromancer", emoji: "🔥",
        boss: BossInfo { name: "Inferno Queen Ignis", emoji: "👑", base_health: 850, base_dps: 110 },
    },
    Race {
        name: "Chronoweaver", emoji: "⌛",
        boss: BossInfo { name: "Temporal Archon", emoji: "🕰️", base_health: 950, base_dps: 120 },
    },
];

/// Races cycle with the floor number: floor 1 is Drakonid, floor 9 wraps back.
pub fn race_for_floor(floor: u32) -> &'static Race {
    let idx = (floor.max(1) - 1) as usize % RACES.len();
    &RACES[idx]
}

// ── Traits ────────────────────────────────────────────────────

/// Granted every `TRAIT_LEVEL_INTERVAL` levels. Announced only; combat math
/// never reads them.
pub const TRAITS: [&str; 8] = [
    "Regeneration: Heal 10 HP after each battle",
    "Critical Strike: +10 Attack vs Bosses",
    "Shield: Take 10 less damage from enemies",
    "Quick Learner: +20% EXP gain",
    "Lucky: 10% chance to avoid damage",
    "Resilience: Survive with 1 HP once per floor",
    "Focus: +5 seconds to answer timer",
    "Power Surge: +20 Attack for next 3 battles",
];

// ── Enemy ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub name: String,
    pub emoji: &'static str,
    pub max_health: u32,
    pub health: u32,
    pub dps: u32,
    pub flavor: String,
    pub is_boss: bool,
}

impl Enemy {
    /// Returns the damage actually dealt (capped at remaining health).
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }
}

// ── Player ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stat {
    Hp,
    Atk,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    pub level: u32,
    pub exp: u64,
    pub exp_to_next: u64,
    pub health: u32,
    /// `BASE_ATTACK + ATTACK_PER_ATK_POINT * atk_points`.
    pub base_attack: u32,
    pub unspent_points: u32,
    pub hp_points: u32,
    pub atk_points: u32,
    pub traits: Vec<String>,
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            level: 1,
            exp: 0,
            exp_to_next: STARTING_EXP_TO_NEXT,
            health: BASE_MAX_HEALTH,
            base_attack: BASE_ATTACK,
            unspent_points: 0,
            hp_points: 0,
            atk_points: 0,
            traits: Vec::new(),
        }
    }

    pub fn max_health(&self) -> u32 {
        BASE_MAX_HEALTH
            + HEALTH_PER_LEVEL * self.level.saturating_sub(1)
            + HEALTH_PER_HP_POINT * self.hp_points
    }

    /// Damage dealt by a correct answer. ATK points count twice: once through
    /// `base_attack` and once here. Bosses take the same amount.
    pub fn attack_damage(&self) -> u32 {
        self.base_attack + ATTACK_PER_ATK_POINT * self.atk_points
    }

    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }

    pub fn restore(&mut self) {
        self.health = self.max_health();
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

// ── Progress ──────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressState {
    pub floor: u32,
    /// 1..=OPPONENTS_PER_FLOOR.
    pub opponent_count: u32,
    pub defeated_total: u32,
    pub score: u32,
}

impl ProgressState {
    pub fn new() -> Self {
        Self { floor: 1, opponent_count: 1, defeated_total: 0, score: 0 }
    }

    pub fn is_boss_encounter(&self) -> bool {
        self.opponent_count % OPPONENTS_PER_FLOOR == 0
    }

    /// Move to the next encounter; after the boss, climb a floor.
    pub fn advance(&mut self) {
        if self.opponent_count >= OPPONENTS_PER_FLOOR {
            self.floor += 1;
            self.opponent_count = 1;
        } else {
            self.opponent_count += 1;
        }
    }
}

// ── Session phase & countdown ─────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Pools not loaded yet, or a provider error is blocking the battle.
    Loading,
    AwaitingAnswer,
    GameOver,
}

/// Generation number of an armed countdown. Never reused within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub struct Countdown {
    pub id: TimerId,
    pub remaining: f64,
    pub total: f64,
}

impl Countdown {
    pub fn new(id: TimerId, seconds: f64) -> Self {
        Self { id, remaining: seconds, total: seconds }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= EXPIRY_EPSILON
    }
}

// ── Root Session State ────────────────────────────────────────

pub struct QuizState {
    pub phase: SessionPhase,
    pub player: PlayerState,
    pub progress: ProgressState,
    pub enemy: Option<Enemy>,
    pub question: Option<Question>,
    pub pools: Option<QuestionPools>,

    // At most one countdown exists; arming replaces it.
    pub timer: Option<Countdown>,
    pub last_timer_id: u64,
    pub timer_config: TimerConfig,

    pub message: String,
    pub log: Vec<String>,
    pub load_error: Option<QuizError>,
    pub show_point_alloc: bool,

    pub rng: SmallRng,
}

impl QuizState {
    pub fn new(config: &QuizConfig) -> Self {
        Self {
            phase: SessionPhase::Loading,
            player: PlayerState::new(),
            progress: ProgressState::new(),
            enemy: None,
            question: None,
            pools: None,
            timer: None,
            last_timer_id: 0,
            timer_config: config.timer,
            message: String::new(),
            log: Vec::new(),
            load_error: None,
            show_point_alloc: false,
            rng: SmallRng::seed_from_u64(config.seed),
        }
    }

    /// Set the headline message and append it to the bounded log.
    pub fn add_log(&mut self, text: &str) {
        self.message = text.to_string();
        self.log.push(text.to_string());
        if self.log.len() > LOG_CAPACITY {
            self.log.remove(0);
        }
    }

    pub fn current_race(&self) -> &'static Race {
        race_for_floor(self.progress.floor)
    }

    pub fn time_left(&self) -> f64 {
        self.timer.as_ref().map(|t| t.remaining.max(0.0)).unwrap_or(0.0)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state() {
        let s = QuizState::new(&QuizConfig::with_seed(1));
        assert_eq!(s.phase, SessionPhase::Loading);
        assert_eq!(s.player.level, 1);
        assert_eq!(s.player.health, 100);
        assert_eq!(s.player.exp_to_next, 100);
        assert_eq!(s.player.attack_damage(), 40);
        assert_eq!(s.progress, ProgressState { floor: 1, opponent_count: 1, defeated_total: 0, score: 0 });
        assert!(s.timer.is_none());
        assert!(s.enemy.is_none());
    }

    #[test]
    fn max_health_formula() {
        let mut p = PlayerState::new();
        assert_eq!(p.max_health(), 100);
        p.level = 4;
        assert_eq!(p.max_health(), 130);
        p.hp_points = 3;
        assert_eq!(p.max_health(), 160);
    }

    #[test]
    fn atk_points_count_twice_in_damage() {
        let mut p = PlayerState::new();
        p.atk_points = 2;
        p.base_attack = BASE_ATTACK + ATTACK_PER_ATK_POINT * 2;
        assert_eq!(p.base_attack, 50);
        assert_eq!(p.attack_damage(), 60);
    }

    #[test]
    fn damage_is_capped_at_zero() {
        let mut p = PlayerState::new();
        assert_eq!(p.take_damage(250), 100);
        assert!(p.is_dead());

        let mut e = Enemy {
            name: "x".into(), emoji: "", max_health: 10, health: 10,
            dps: 1, flavor: String::new(), is_boss: false,
        };
        assert_eq!(e.take_damage(40), 10);
        assert!(e.is_defeated());
    }

    #[test]
    fn answers_ignore_case_and_padding() {
        let q = Question {
            text: "Capital of France?".into(),
            answer: "Paris".into(),
            points: 10,
            difficulty: Difficulty::Easy,
        };
        assert!(q.is_answered_by("  paris "));
        assert!(q.is_answered_by("PARIS"));
        assert!(!q.is_answered_by("Lyon"));
        assert!(!q.is_answered_by(""));
    }

    #[test]
    fn races_cycle_by_floor() {
        assert_eq!(race_for_floor(1).name, "Drakonid");
        assert_eq!(race_for_floor(8).name, "Chronoweaver");
        assert_eq!(race_for_floor(9).name, "Drakonid");
        assert_eq!(race_for_floor(12).name, "Synthian");
        // Floor 0 never happens, but must not underflow.
        assert_eq!(race_for_floor(0).name, "Drakonid");
    }

    #[test]
    fn progress_wraps_after_boss() {
        let mut p = ProgressState::new();
        for _ in 0..9 {
            p.advance();
        }
        assert_eq!(p.opponent_count, 10);
        assert!(p.is_boss_encounter());
        p.advance();
        assert_eq!(p.floor, 2);
        assert_eq!(p.opponent_count, 1);
        assert!(!p.is_boss_encounter());
    }

    #[test]
    fn log_truncation() {
        let mut s = QuizState::new(&QuizConfig::with_seed(1));
        for i in 0..40 {
            s.add_log(&format!("msg {}", i));
        }
        assert_eq!(s.log.len(), LOG_CAPACITY);
        assert_eq!(s.message, "msg 39");
        assert_eq!(s.log[0], "msg 10");
    }

    #[test]
    fn countdown_expiry_tolerates_drift() {
        let mut c = Countdown::new(TimerId(1), 1.0);
        for _ in 0..5 {
            c.remaining -= 0.2;
        }
        assert!(c.is_expired());
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        assert_eq!(Difficulty::Hard.to_string(), "hard");
        assert_eq!(Difficulty::Easy.time_limit_secs(), 30.0);
        assert_eq!(Difficulty::Hard.time_limit_secs(), 50.0);
    }
}
