mod console;
mod games;
mod input;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use games::quiz::actions::{ALLOC_ATK, ALLOC_HP};
use games::quiz::config::{QuizConfig, TimerConfig};
use games::quiz::questions::BundledQuestions;
use games::quiz::QuizGame;
use games::Game;
use input::{ClickState, InputEvent};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use time::TickClock;

/// Map a viewport click to an action via the grid container's bounding rect.
fn dom_click_action(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<u16> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend renders the grid as a <div> directly under <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let x = mouse_x as f64 - rect.left();
    let y = mouse_y as f64 - rect.top();
    let action = cs.hit_test_pixels(x, y, rect.width(), rect.height());

    console::log(&format!(
        "click: px=({}, {}) action={:?} targets={}",
        mouse_x,
        mouse_y,
        action,
        cs.targets.len()
    ));
    action
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
fn entropy_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (hi << 32) | lo
}

#[cfg(not(target_arch = "wasm32"))]
fn entropy_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let config = QuizConfig::with_seed(entropy_seed());
    let game = Rc::new(RefCell::new(QuizGame::new(&BundledQuestions::default(), config)));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let clock = Rc::new(RefCell::new(TickClock::new(&TimerConfig::default())));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let action = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                dom_click_action(mouse_event.x, mouse_event.y, &cs)
            };

            if let Some(id) = action {
                game.borrow_mut().handle_input(&InputEvent::Click(id));
            }
        }
    });

    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            let event = match key_event.code {
                KeyCode::Char(c) => InputEvent::Key(c),
                KeyCode::Backspace => InputEvent::Backspace,
                KeyCode::Enter => InputEvent::Enter,
                KeyCode::Up => InputEvent::Click(ALLOC_HP),
                KeyCode::Down => InputEvent::Click(ALLOC_ATK),
                _ => return,
            };
            game.borrow_mut().handle_input(&event);
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let ticks = clock.borrow_mut().advance(now_ms());
            if ticks > 0 {
                game.borrow_mut().tick(ticks);
            }

            let size = f.area();
            click_state.borrow_mut().begin_frame(size);
            game.borrow().render(f, size, &click_state);
        }
    });

    Ok(())
}
