//! Line builder that keeps click targets attached to the lines they label.
//!
//! Push lines while building a panel, mark the buttons with an action ID,
//! then register targets against the panel's inner area after rendering.
//! Inserting a line above a button moves its target with it.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::text::Line;

use crate::input::ClickState;

pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line index, action id)`
    actions: Vec<(usize, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_blank(&mut self) {
        self.lines.push(Line::from(""));
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len(), action_id));
        self.lines.push(line);
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register every clickable line inside `inner` (the block's content area).
    ///
    /// With `wrap` set, a line wider than `inner` spans several rows and all
    /// of them are clickable. `scroll` is in visual rows.
    pub fn register_targets(&self, inner: Rect, cs: &mut ClickState, scroll: u16, wrap: bool) {
        let width = wrap.then_some(inner.width);
        let mut starts = Vec::with_capacity(self.lines.len());
        let mut cursor: u16 = 0;
        for line in &self.lines {
            let h = rows_for(line, width);
            starts.push((cursor, h));
            cursor = cursor.saturating_add(h);
        }

        let bottom = inner.y + inner.height;
        for &(idx, action_id) in &self.actions {
            let Some(&(start, height)) = starts.get(idx) else {
                continue;
            };
            for vr in start..start + height {
                if vr < scroll {
                    continue;
                }
                let row = inner.y + (vr - scroll);
                if row >= bottom {
                    break;
                }
                cs.add_row_target(inner, row, action_id);
            }
        }
    }
}

fn rows_for(line: &Line, width: Option<u16>) -> u16 {
    match width {
        Some(w) if w > 0 => {
            let lw = line.width();
            if lw <= w as usize { 1 } else { lw.div_ceil(w as usize) as u16 }
        }
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_follow_their_lines() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("header"));
        cl.push_blank();
        cl.push_clickable(Line::from(" [Enter] Submit"), 20);
        cl.push_clickable(Line::from(" [Del] Clear"), 21);

        let inner = Rect::new(1, 6, 40, 8);
        let mut cs = ClickState::new();
        cl.register_targets(inner, &mut cs, 0, false);

        assert_eq!(cs.targets.len(), 2);
        assert_eq!(cs.hit_test(3, 8), Some(20));
        assert_eq!(cs.hit_test(3, 9), Some(21));
        assert_eq!(cs.hit_test(3, 6), None);
        assert_eq!(cs.hit_test(0, 8), None);
    }

    #[test]
    fn targets_below_panel_are_dropped() {
        let mut cl = ClickableList::new();
        for i in 0..10 {
            cl.push_clickable(Line::from(format!("item {}", i)), 50 + i as u16);
        }
        let inner = Rect::new(0, 1, 80, 3);
        let mut cs = ClickState::new();
        cl.register_targets(inner, &mut cs, 0, false);

        assert_eq!(cs.targets.len(), 3);
        assert_eq!(cs.hit_test(0, 3), Some(52));
        assert_eq!(cs.hit_test(0, 4), None);
    }

    #[test]
    fn scrolled_out_lines_are_skipped() {
        let mut cl = ClickableList::new();
        cl.push_clickable(Line::from("a"), 1);
        cl.push_clickable(Line::from("b"), 2);
        cl.push_clickable(Line::from("c"), 3);
        let inner = Rect::new(0, 10, 20, 5);
        let mut cs = ClickState::new();
        cl.register_targets(inner, &mut cs, 1, false);

        assert_eq!(cs.hit_test(0, 10), Some(2));
        assert_eq!(cs.hit_test(0, 11), Some(3));
        assert_eq!(cs.targets.len(), 2);
    }

    #[test]
    fn wrapped_lines_push_later_targets_down() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("12345678901234567890"));
        cl.push_clickable(Line::from("123456789012345"), 7);

        let inner = Rect::new(0, 0, 10, 10);
        let mut cs = ClickState::new();
        cl.register_targets(inner, &mut cs, 0, true);

        assert_eq!(cs.hit_test(0, 1), None);
        assert_eq!(cs.hit_test(0, 2), Some(7));
        assert_eq!(cs.hit_test(0, 3), Some(7));
        assert_eq!(cs.hit_test(0, 4), None);
    }

    #[test]
    fn empty_list_registers_nothing() {
        let cl = ClickableList::new();
        let mut cs = ClickState::new();
        cl.register_targets(Rect::new(0, 0, 10, 10), &mut cs, 0, true);
        assert!(cs.targets.is_empty());
        assert!(cl.into_lines().is_empty());
    }
}
