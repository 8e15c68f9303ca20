//! Quiz Arena — answer timed questions to defeat enemies floor by floor.
//!
//! Game trait implementation. Typed characters fill the answer buffer,
//! Enter submits, Up/Down (mapped to the allocation actions) spend points.

pub mod actions;
pub mod config;
pub mod error;
pub mod logic;
pub mod questions;
pub mod render;
pub mod snapshot;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::console;
use crate::games::Game;
use crate::input::{ClickState, InputEvent};

use actions::*;
use config::QuizConfig;
use logic::TurnOutcome;
use questions::QuestionProvider;
use snapshot::Snapshot;
use state::{QuizState, SessionPhase, Stat};

/// Longest answer the buffer accepts.
const MAX_ANSWER_LEN: usize = 64;

pub struct QuizGame {
    state: QuizState,
    answer: String,
    snapshot: Snapshot,
}

impl QuizGame {
    /// Build a session and load its pools. A failed load leaves the session
    /// in Loading with the error on screen.
    pub fn new(provider: &dyn QuestionProvider, config: QuizConfig) -> Self {
        let mut state = QuizState::new(&config);
        if let Err(e) = logic::load_questions(&mut state, provider) {
            if e.is_provider_error() {
                console::warn(&format!("session blocked: {}", e));
            }
        }
        let snapshot = Snapshot::capture(&state);
        Self { state, answer: String::new(), snapshot }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    fn refresh(&mut self) {
        let was_over = self.snapshot.game_over;
        self.snapshot = Snapshot::capture(&self.state);
        if self.snapshot.game_over && !was_over {
            if let Ok(json) = self.snapshot.to_json() {
                console::log(&json);
            }
        }
    }

    fn submit(&mut self) -> bool {
        if self.state.phase == SessionPhase::Loading {
            return false;
        }
        if self.state.is_game_over() {
            console::log("respawn requested");
        }
        let answer = std::mem::take(&mut self.answer);
        match logic::submit(&mut self.state, &answer) {
            Ok(outcome) => {
                match outcome {
                    TurnOutcome::Hit { damage, defeated } => {
                        console::log(&format!("hit for {} (defeated: {})", damage, defeated))
                    }
                    TurnOutcome::Missed { damage, died } => {
                        console::log(&format!("missed, took {} (died: {})", damage, died))
                    }
                    TurnOutcome::Respawned => {}
                }
                true
            }
            Err(e) => {
                console::warn(&format!("submit rejected: {}", e));
                false
            }
        }
    }

    fn allocate(&mut self, stat: Stat) -> bool {
        // InvalidAllocation stays silent.
        logic::allocate(&mut self.state, stat).is_ok()
    }

    fn dispatch(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(ch) => {
                if self.state.phase != SessionPhase::AwaitingAnswer || ch.is_control() {
                    return false;
                }
                if self.answer.chars().count() >= MAX_ANSWER_LEN {
                    return false;
                }
                self.answer.push(*ch);
                true
            }
            InputEvent::Backspace => self.answer.pop().is_some(),
            InputEvent::Enter => self.submit(),
            InputEvent::Click(id) => self.handle_click(*id),
        }
    }

    fn handle_click(&mut self, id: u16) -> bool {
        match id {
            ALLOC_HP => self.allocate(Stat::Hp),
            ALLOC_ATK => self.allocate(Stat::Atk),
            SUBMIT => self.submit(),
            CLEAR_ANSWER => {
                let had = !self.answer.is_empty();
                self.answer.clear();
                had
            }
            _ => false,
        }
    }
}

impl Game for QuizGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        let consumed = self.dispatch(event);
        if consumed {
            self.refresh();
        }
        consumed
    }

    fn tick(&mut self, delta_ticks: u32) {
        if delta_ticks == 0 {
            return;
        }
        match logic::tick(&mut self.state, delta_ticks) {
            Ok(fired) if fired > 0 => console::log(&format!("countdown expired x{}", fired)),
            Ok(_) => {}
            Err(e) => console::warn(&format!("tick failed: {}", e)),
        }
        self.refresh();
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self.snapshot(), self.answer(), f, area, click_state);
    }
}
