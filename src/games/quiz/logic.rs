//! Quiz arena — session transitions (no rendering).
//!
//! Core loop: load pools → battle (answer questions under a countdown) →
//! enemy defeated → next opponent, with a boss closing every floor.
//! Every transition that ends a question cancels the countdown before it
//! touches player or enemy state.

use rand::seq::SliceRandom;

use crate::console;

use super::config::*;
use super::error::QuizError;
use super::questions::{QuestionPools, QuestionProvider};
use super::state::{
    race_for_floor, Countdown, Difficulty, Enemy, ProgressState, Question, QuizState, Race,
    SessionPhase, Stat, TimerId, TRAITS,
};

const LOAD_ERROR_MESSAGE: &str = "Error loading questions. Please refresh the page.";
const NO_QUESTIONS_MESSAGE: &str = "Error: No questions available. Please refresh the page.";

/// What a submission or timeout did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Submitted while game over: back to opponent 1 of the same floor.
    Respawned,
    /// Correct answer.
    Hit { damage: u32, defeated: bool },
    /// Wrong answer or timeout.
    Missed { damage: u32, died: bool },
}

// ── Difficulty & enemy generation ────────────────────────────

/// Question tier for the current encounter. The whole first floor is easy.
pub fn current_difficulty(progress: &ProgressState) -> Difficulty {
    if progress.floor <= 1 {
        return Difficulty::Easy;
    }
    let hard_from = if progress.floor < LATE_FLOOR { EARLY_HARD_FROM } else { LATE_HARD_FROM };
    if progress.opponent_count < hard_from {
        Difficulty::Medium
    } else {
        Difficulty::Hard
    }
}

pub fn generate_enemy(floor: u32, opponent_count: u32, race: &Race) -> Enemy {
    if opponent_count % OPPONENTS_PER_FLOOR == 0 {
        let health = race.boss.base_health + floor * BOSS_HEALTH_PER_FLOOR;
        Enemy {
            name: race.boss.name.to_string(),
            emoji: race.boss.emoji,
            max_health: health,
            health,
            dps: race.boss.base_dps + floor * BOSS_DPS_PER_FLOOR,
            flavor: format!("Boss of Floor {}: {}", floor, race.name),
            is_boss: true,
        }
    } else {
        let health = REGULAR_BASE_HEALTH + floor * REGULAR_HEALTH_PER_FLOOR;
        Enemy {
            name: format!("{} Opponent #{}", race.name, opponent_count),
            emoji: race.emoji,
            max_health: health,
            health,
            dps: REGULAR_BASE_DPS + floor * REGULAR_DPS_PER_FLOOR,
            flavor: format!("A challenger from the {} race.", race.name),
            is_boss: false,
        }
    }
}

// ── Questions ────────────────────────────────────────────────

pub fn pick_question(state: &mut QuizState, difficulty: Difficulty) -> Result<Question, QuizError> {
    let pools = state.pools.as_ref().ok_or(QuizError::NotReady)?;
    pools.pick(difficulty, &mut state.rng).cloned()
}

/// Fetch all three tiers, then open the first battle.
pub fn load_questions(state: &mut QuizState, provider: &dyn QuestionProvider) -> Result<(), QuizError> {
    cancel_timer(state);
    state.phase = SessionPhase::Loading;
    match QuestionPools::load(provider) {
        Ok(pools) => {
            state.pools = Some(pools);
            state.load_error = None;
            start_battle(state)
        }
        Err(e) => {
            console::warn(&format!("question load failed: {}", e));
            state.load_error = Some(e.clone());
            state.add_log(LOAD_ERROR_MESSAGE);
            Err(e)
        }
    }
}

// ── Countdown ────────────────────────────────────────────────

/// Drop the active countdown, if any. Returns it so callers can inspect it.
pub fn cancel_timer(state: &mut QuizState) -> Option<Countdown> {
    state.timer.take()
}

/// Cancel whatever is running, then arm a fresh countdown for `difficulty`.
pub fn arm_timer(state: &mut QuizState, difficulty: Difficulty) -> TimerId {
    cancel_timer(state);
    state.last_timer_id += 1;
    let id = TimerId(state.last_timer_id);
    state.timer = Some(Countdown::new(id, difficulty.time_limit_secs()));
    id
}

/// Advance the countdown by `delta_ticks` ticks. Returns how many timeouts fired.
pub fn tick(state: &mut QuizState, delta_ticks: u32) -> Result<u32, QuizError> {
    let step = state.timer_config.seconds_per_tick;
    let mut fired = 0;
    for _ in 0..delta_ticks {
        if state.phase != SessionPhase::AwaitingAnswer {
            break;
        }
        let expired_id = match state.timer.as_mut() {
            Some(t) => {
                t.remaining = (t.remaining - step).max(0.0);
                if t.is_expired() { Some(t.id) } else { None }
            }
            None => break,
        };
        if let Some(id) = expired_id {
            if handle_timeout(state, id)?.is_some() {
                fired += 1;
            }
        }
    }
    Ok(fired)
}

/// Expiry of countdown `fired`. Ignored unless it is still the active one, so a
/// cancelled or replaced countdown can never deal damage.
pub fn handle_timeout(state: &mut QuizState, fired: TimerId) -> Result<Option<TurnOutcome>, QuizError> {
    if state.phase != SessionPhase::AwaitingAnswer {
        return Ok(None);
    }
    if state.timer.as_ref().map(|t| t.id) != Some(fired) {
        return Ok(None);
    }
    cancel_timer(state);

    let damage = take_enemy_hit(state)?;
    state.add_log(&format!("Time's up! You took {} damage.", damage));
    if state.player.is_dead() {
        game_over(state);
        return Ok(Some(TurnOutcome::Missed { damage, died: true }));
    }
    next_question(state)?;
    Ok(Some(TurnOutcome::Missed { damage, died: false }))
}

// ── Battle ───────────────────────────────────────────────────

/// Fresh enemy, fresh question, full health, fresh countdown.
pub fn start_battle(state: &mut QuizState) -> Result<(), QuizError> {
    cancel_timer(state);
    let difficulty = current_difficulty(&state.progress);
    let question = match pick_question(state, difficulty) {
        Ok(q) => q,
        Err(e) => {
            console::warn(&format!("cannot start battle: {}", e));
            state.phase = SessionPhase::Loading;
            state.load_error = Some(e.clone());
            state.add_log(NO_QUESTIONS_MESSAGE);
            return Err(e);
        }
    };

    let floor = state.progress.floor;
    let enemy = generate_enemy(floor, state.progress.opponent_count, race_for_floor(floor));
    console::log(&format!(
        "battle: floor {} opponent {} ({}) vs {}{}",
        floor,
        state.progress.opponent_count,
        difficulty,
        enemy.name,
        if state.progress.is_boss_encounter() { " [boss]" } else { "" }
    ));
    state.enemy = Some(enemy);
    state.question = Some(question);
    state.player.restore();
    state.message.clear();
    state.phase = SessionPhase::AwaitingAnswer;
    arm_timer(state, difficulty);
    Ok(())
}

/// Replace the question at the current tier, keeping the enemy as is.
fn next_question(state: &mut QuizState) -> Result<(), QuizError> {
    let difficulty = current_difficulty(&state.progress);
    let question = pick_question(state, difficulty)?;
    state.question = Some(question);
    arm_timer(state, difficulty);
    Ok(())
}

fn take_enemy_hit(state: &mut QuizState) -> Result<u32, QuizError> {
    let dps = state.enemy.as_ref().map(|e| e.dps).ok_or(QuizError::NotReady)?;
    state.player.take_damage(dps);
    Ok(dps)
}

fn game_over(state: &mut QuizState) {
    cancel_timer(state);
    state.phase = SessionPhase::GameOver;
    state.add_log(&format!(
        "Game Over! Final Score: {} | Level: {}",
        state.progress.score, state.player.level
    ));
    console::log(&format!(
        "game over on floor {} after {} defeats",
        state.progress.floor, state.progress.defeated_total
    ));
}

/// Answer submission. While game over, any submission respawns instead.
pub fn submit(state: &mut QuizState, answer: &str) -> Result<TurnOutcome, QuizError> {
    cancel_timer(state);
    match state.phase {
        SessionPhase::Loading => Err(QuizError::NotReady),
        SessionPhase::GameOver => {
            respawn(state)?;
            Ok(TurnOutcome::Respawned)
        }
        SessionPhase::AwaitingAnswer => {
            let (correct, points) = match &state.question {
                Some(q) => (q.is_answered_by(answer), q.points),
                None => return Err(QuizError::NotReady),
            };
            if correct {
                answer_correct(state, points)
            } else {
                answer_wrong(state)
            }
        }
    }
}

fn answer_correct(state: &mut QuizState, points: u32) -> Result<TurnOutcome, QuizError> {
    let damage = state.player.attack_damage();
    let (defeated, is_boss) = match state.enemy.as_mut() {
        Some(enemy) => {
            enemy.take_damage(damage);
            (enemy.is_defeated(), enemy.is_boss)
        }
        None => return Err(QuizError::NotReady),
    };
    state.progress.score += points;
    state.add_log(&format!("Correct! You dealt {} damage.", damage));

    if defeated {
        win_battle(state, is_boss)?;
    } else {
        next_question(state)?;
    }
    Ok(TurnOutcome::Hit { damage, defeated })
}

fn answer_wrong(state: &mut QuizState) -> Result<TurnOutcome, QuizError> {
    let damage = take_enemy_hit(state)?;
    state.add_log(&format!("Wrong! You took {} damage.", damage));
    if state.player.is_dead() {
        game_over(state);
        return Ok(TurnOutcome::Missed { damage, died: true });
    }
    // Same question stays up with a full countdown.
    arm_timer(state, current_difficulty(&state.progress));
    Ok(TurnOutcome::Missed { damage, died: false })
}

fn win_battle(state: &mut QuizState, is_boss: bool) -> Result<(), QuizError> {
    award_exp(state, if is_boss { BOSS_EXP } else { REGULAR_EXP });
    state.progress.defeated_total += 1;
    state.progress.advance();
    state.enemy = None;
    start_battle(state)
}

/// Back to opponent 1 of the current floor with full health. Floor, level and
/// traits are kept.
pub fn respawn(state: &mut QuizState) -> Result<(), QuizError> {
    cancel_timer(state);
    state.progress.opponent_count = 1;
    state.player.restore();
    state.add_log(&format!("Restarted at the beginning of Floor {}.", state.progress.floor));
    start_battle(state)
}

// ── Leveling ─────────────────────────────────────────────────

/// Add experience and level up as many times as it covers. Returns levels gained.
pub fn award_exp(state: &mut QuizState, amount: u64) -> u32 {
    state.player.exp += amount;
    let mut gained = 0;
    while state.player.exp >= state.player.exp_to_next {
        level_up(state);
        gained += 1;
    }
    gained
}

fn level_up(state: &mut QuizState) {
    let p = &mut state.player;
    p.exp -= p.exp_to_next;
    p.level += 1;
    p.exp_to_next = p.exp_to_next * EXP_GROWTH_NUMERATOR / EXP_GROWTH_DENOMINATOR;
    p.unspent_points += POINTS_PER_LEVEL;
    let level = p.level;
    state.show_point_alloc = true;
    state.add_log(&format!("Level Up! Reached level {}.", level));
    console::log(&format!("level up: {}", level));

    if level % TRAIT_LEVEL_INTERVAL == 0 {
        if let Some(&granted) = TRAITS.choose(&mut state.rng) {
            state.player.traits.push(granted.to_string());
            state.add_log(&format!("Special Trait Unlocked: {}", granted));
        }
    }
}

// ── Point allocation ─────────────────────────────────────────

/// Spend one level point. HP raises max health without healing.
pub fn allocate(state: &mut QuizState, stat: Stat) -> Result<(), QuizError> {
    let p = &mut state.player;
    if p.unspent_points == 0 {
        return Err(QuizError::InvalidAllocation);
    }
    match stat {
        Stat::Hp => p.hp_points += 1,
        Stat::Atk => {
            p.atk_points += 1;
            p.base_attack += ATTACK_PER_ATK_POINT;
        }
    }
    p.unspent_points -= 1;
    if p.unspent_points == 0 {
        state.show_point_alloc = false;
    }
    Ok(())
}
