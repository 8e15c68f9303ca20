//! Read-only view of a session, rebuilt after every transition.
//!
//! The renderer only ever sees a `Snapshot`; it never reaches into
//! `QuizState` directly.

use serde::Serialize;

use super::logic::current_difficulty;
use super::state::{Difficulty, QuizState, SessionPhase};

/// How many log lines the snapshot carries.
const RECENT_MESSAGES: usize = 8;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnemyView {
    pub name: String,
    pub emoji: String,
    pub health: u32,
    pub max_health: u32,
    pub dps: u32,
    pub flavor: String,
    pub is_boss: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerView {
    pub health: u32,
    pub max_health: u32,
    pub level: u32,
    pub exp: u64,
    pub exp_to_next: u64,
    pub attack: u32,
    pub unspent_points: u32,
    pub traits: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub enemy: Option<EnemyView>,
    pub player: PlayerView,
    /// Question text only; the answer never leaves the engine.
    pub question: Option<String>,
    pub difficulty: Difficulty,
    /// Whole seconds, rounded up.
    pub time_left: u32,
    pub time_total: u32,
    pub message: String,
    pub recent_messages: Vec<String>,
    pub game_over: bool,
    pub floor: u32,
    pub opponent_count: u32,
    pub race: String,
    pub defeated_total: u32,
    pub score: u32,
    pub show_point_alloc: bool,
    pub load_error: Option<String>,
}

impl Snapshot {
    pub fn capture(state: &QuizState) -> Self {
        let enemy = state.enemy.as_ref().map(|e| EnemyView {
            name: e.name.clone(),
            emoji: e.emoji.to_string(),
            health: e.health,
            max_health: e.max_health,
            dps: e.dps,
            flavor: e.flavor.clone(),
            is_boss: e.is_boss,
        });

        let p = &state.player;
        let player = PlayerView {
            health: p.health,
            max_health: p.max_health(),
            level: p.level,
            exp: p.exp,
            exp_to_next: p.exp_to_next,
            attack: p.attack_damage(),
            unspent_points: p.unspent_points,
            traits: p.traits.clone(),
        };

        let skip = state.log.len().saturating_sub(RECENT_MESSAGES);
        let (time_left, time_total) = match &state.timer {
            Some(t) => (whole_seconds(state.time_left()), whole_seconds(t.total)),
            None => (0, 0),
        };

        Self {
            phase: state.phase,
            enemy,
            player,
            question: state.question.as_ref().map(|q| q.text.clone()),
            difficulty: current_difficulty(&state.progress),
            time_left,
            time_total,
            message: state.message.clone(),
            recent_messages: state.log[skip..].to_vec(),
            game_over: state.phase == SessionPhase::GameOver,
            floor: state.progress.floor,
            opponent_count: state.progress.opponent_count,
            race: state.current_race().name.to_string(),
            defeated_total: state.progress.defeated_total,
            score: state.progress.score,
            show_point_alloc: state.show_point_alloc,
            load_error: state.load_error.as_ref().map(|e| e.to_string()),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Loading
    }
}

fn whole_seconds(secs: f64) -> u32 {
    (secs.max(0.0) - 1e-9).ceil().max(0.0) as u32
}
