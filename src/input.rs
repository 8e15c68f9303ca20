//! Input normalization and click-target hit testing.
//!
//! Keyboard and pointer events from the DOM terminal are turned into
//! [`InputEvent`]s here; the game decides what they mean.

use ratzilla::ratatui::layout::Rect;

/// Input events after keyboard/mouse/touch normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A printable character.
    Key(char),
    Backspace,
    Enter,
    /// A tap on a registered target, identified by the game's action ID.
    Click(u16),
}

#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Hit region in terminal cells.
    pub rect: Rect,
    pub action_id: u16,
}

/// Click targets registered during the last draw, plus the terminal size
/// they were laid out for.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    /// Start a new frame: record the terminal size and drop old targets.
    pub fn begin_frame(&mut self, size: Rect) {
        self.terminal_cols = size.width;
        self.terminal_rows = size.height;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        if rect.width > 0 && rect.height > 0 {
            self.targets.push(ClickTarget { rect, action_id });
        }
    }

    /// Full-width target on one row of `area`. Rows outside the area are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Action under a cell. Later targets sit on top of earlier ones.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            let inside = col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
            inside.then_some(t.action_id)
        })
    }

    /// Map a pixel offset inside the grid element to a cell and hit-test it.
    pub fn hit_test_pixels(&self, x: f64, y: f64, grid_width: f64, grid_height: f64) -> Option<u16> {
        let col = pixel_to_cell(x, grid_width, self.terminal_cols)?;
        let row = pixel_to_cell(y, grid_height, self.terminal_rows)?;
        self.hit_test(col, row)
    }
}

/// Below this width panels stack vertically.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Convert a pixel offset along one axis of the grid to a cell index.
///
/// `None` when the offset is outside the grid or the grid has no size.
pub fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 {
        return None;
    }
    let cell = (offset / (extent / cells as f64)) as u16;
    (cell < cells).then_some(cell)
}
