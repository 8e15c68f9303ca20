/// Game trait shared by everything the shell can host.

pub mod quiz;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};

pub trait Game {
    /// Handle an input event. Returns true if the event changed anything.
    fn handle_input(&mut self, event: &InputEvent) -> bool;

    /// Advance game logic by `delta_ticks` fixed ticks.
    fn tick(&mut self, delta_ticks: u32);

    /// Draw into `area` and register this frame's click targets.
    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>);
}
