//! Quiz Arena rendering — one battle screen drawn from a [`Snapshot`].
//!
//! Layout: header + combatants (side by side, stacked when narrow) +
//! question card + level points (only with points to spend) + message log.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::ClickableList;

use super::actions::*;
use super::config::OPPONENTS_PER_FLOOR;
use super::snapshot::{EnemyView, PlayerView, Snapshot};
use super::state::Difficulty;

pub fn render(
    snap: &Snapshot,
    answer: &str,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    if snap.is_loading() {
        render_loading(snap, f, area);
        return;
    }

    let narrow = is_narrow_layout(area.width);
    let combat_height = if narrow { 12 } else { 7 };
    let alloc_height = if snap.show_point_alloc { 5 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(combat_height),
            Constraint::Length(8),
            Constraint::Length(alloc_height),
            Constraint::Min(3),
        ])
        .split(area);

    render_header(snap, f, chunks[0]);
    render_combatants(snap, f, chunks[1], narrow);
    render_question(snap, answer, f, chunks[2], click_state);
    if snap.show_point_alloc {
        render_allocation(snap, f, chunks[3], click_state);
    }
    render_log(snap, f, chunks[4]);
}

// ── Helpers ─────────────────────────────────────────────────

fn hp_bar(current: u32, max: u32, width: usize) -> (String, Color) {
    let ratio = if max > 0 { current as f64 / max as f64 } else { 0.0 };
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    let bar = "\u{2588}".repeat(filled) + &"\u{2591}".repeat(empty);
    let color = if ratio > 0.5 { Color::Green } else if ratio > 0.25 { Color::Yellow } else { Color::Red };
    (bar, color)
}

fn borders_for(area_width: u16) -> Borders {
    if is_narrow_layout(area_width) { Borders::TOP | Borders::BOTTOM } else { Borders::ALL }
}

/// Bar width that leaves room for the numbers after it.
fn bar_width(area: Rect) -> usize {
    (area.width as usize).saturating_sub(18).clamp(4, 30)
}

fn difficulty_style(d: Difficulty) -> Style {
    let color = match d {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn label(text: &str) -> Span<'static> {
    Span::styled(text.to_string(), Style::default().fg(Color::DarkGray))
}

// ── Loading / blocked ───────────────────────────────────────

fn render_loading(snap: &Snapshot, f: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(""), Line::from("")];
    match &snap.load_error {
        Some(err) => {
            lines.push(Line::from(Span::styled(
                snap.message.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(err.clone(), Style::default().fg(Color::DarkGray))));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Loading questions...",
                Style::default().fg(Color::White),
            )));
        }
    }

    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Quiz Arena ");
    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

// ── Header ──────────────────────────────────────────────────

fn render_header(snap: &Snapshot, f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            format!(" Floor {} ", snap.floor),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        label(&format!("{} ", snap.race)),
        label("| Opponent "),
        Span::raw(format!("{}/{} ", snap.opponent_count, OPPONENTS_PER_FLOOR)),
        label("| Defeated "),
        Span::raw(format!("{} ", snap.defeated_total)),
        label("| Score "),
        Span::styled(snap.score.to_string(), Style::default().fg(Color::Yellow)),
    ]);
    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(" Quiz Arena ", Style::default().fg(Color::DarkGray)));
    f.render_widget(Paragraph::new(line).block(block), area);
}

// ── Enemy & player ──────────────────────────────────────────

fn render_combatants(snap: &Snapshot, f: &mut Frame, area: Rect, narrow: bool) {
    let (direction, split) = if narrow {
        (Direction::Vertical, [Constraint::Length(6), Constraint::Min(6)])
    } else {
        (Direction::Horizontal, [Constraint::Percentage(50), Constraint::Percentage(50)])
    };
    let chunks = Layout::default().direction(direction).constraints(split).split(area);

    if let Some(enemy) = &snap.enemy {
        render_enemy(enemy, f, chunks[0]);
    }
    render_player(&snap.player, f, chunks[1]);
}

fn render_enemy(enemy: &EnemyView, f: &mut Frame, area: Rect) {
    let (bar, color) = hp_bar(enemy.health, enemy.max_health, bar_width(area));
    let (title, border) = if enemy.is_boss {
        (format!(" {} BOSS ", enemy.emoji), Color::Red)
    } else {
        (format!(" {} Enemy ", enemy.emoji), Color::Magenta)
    };

    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", enemy.name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(bar, Style::default().fg(color)),
            Span::raw(format!(" {}/{}", enemy.health, enemy.max_health)),
        ]),
        Line::from(vec![label(" DPS "), Span::raw(enemy.dps.to_string())]),
        Line::from(Span::styled(
            format!(" {}", enemy.flavor),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(border))
        .title(title);
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn render_player(player: &PlayerView, f: &mut Frame, area: Rect) {
    let (bar, color) = hp_bar(player.health, player.max_health, bar_width(area));

    let mut lines = vec![
        Line::from(vec![
            Span::raw(" "),
            Span::styled(bar, Style::default().fg(color)),
            Span::raw(format!(" {}/{}", player.health, player.max_health)),
        ]),
        Line::from(vec![
            label(" Lv "),
            Span::styled(player.level.to_string(), Style::default().fg(Color::Cyan)),
            label("  EXP "),
            Span::raw(format!("{}/{}", player.exp, player.exp_to_next)),
        ]),
        Line::from(vec![
            label(" ATK "),
            Span::raw(player.attack.to_string()),
            label("  Points "),
            Span::styled(
                player.unspent_points.to_string(),
                if player.unspent_points > 0 {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                },
            ),
        ]),
    ];
    if !player.traits.is_empty() {
        let names: Vec<&str> = player
            .traits
            .iter()
            .map(|t| t.split(':').next().unwrap_or(t.as_str()))
            .collect();
        lines.push(Line::from(vec![
            label(" Traits "),
            Span::styled(names.join(", "), Style::default().fg(Color::Magenta)),
        ]));
    }

    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(Color::Green))
        .title(" You ");
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

// ── Question card ───────────────────────────────────────────

fn render_question(
    snap: &Snapshot,
    answer: &str,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(if snap.game_over { Color::Red } else { Color::Cyan }))
        .title(Line::from(vec![
            Span::raw(" Question "),
            Span::styled(format!("[{}] ", snap.difficulty), difficulty_style(snap.difficulty)),
        ]));
    let inner = block.inner(area);

    let mut cl = ClickableList::new();
    if snap.game_over {
        cl.push(Line::from(Span::styled(
            format!(" {}", snap.message),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        cl.push_blank();
        cl.push_clickable(
            Line::from(vec![
                Span::styled(" [Enter] ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::raw(format!("Restart Floor {}", snap.floor)),
            ]),
            SUBMIT,
        );
    } else {
        let urgent = snap.time_left <= 5;
        cl.push(Line::from(vec![
            Span::raw(" "),
            Span::styled(
                snap.question.clone().unwrap_or_default(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]));
        cl.push(Line::from(vec![
            label(" Time "),
            Span::styled(
                format!("{}s", snap.time_left),
                if urgent {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                },
            ),
            label(&format!(" / {}s", snap.time_total)),
        ]));
        cl.push(Line::from(vec![
            Span::styled(" > ", Style::default().fg(Color::Cyan)),
            Span::styled(answer.to_string(), Style::default().fg(Color::White)),
            Span::styled("_", Style::default().fg(Color::DarkGray).add_modifier(Modifier::SLOW_BLINK)),
        ]));
        cl.push_clickable(
            Line::from(vec![
                Span::styled(" [Enter] ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::raw("Submit"),
            ]),
            SUBMIT,
        );
        cl.push_clickable(
            Line::from(vec![
                Span::styled(" [Clear] ", Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD)),
                Span::styled("Erase answer", Style::default().fg(Color::DarkGray)),
            ]),
            CLEAR_ANSWER,
        );
    }

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(inner, &mut cs, 0, true);
    }
    f.render_widget(
        Paragraph::new(cl.into_lines()).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

// ── Level points ────────────────────────────────────────────

fn render_allocation(
    snap: &Snapshot,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" Level Up! {} point(s) ", snap.player.unspent_points));
    let inner = block.inner(area);

    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let mut cl = ClickableList::new();
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [\u{2191}] ", key),
            Span::raw("+10 Max HP"),
        ]),
        ALLOC_HP,
    );
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [\u{2193}] ", key),
            Span::raw("+5 Attack"),
        ]),
        ALLOC_ATK,
    );

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(inner, &mut cs, 0, false);
    }
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

// ── Message log ─────────────────────────────────────────────

fn render_log(snap: &Snapshot, f: &mut Frame, area: Rect) {
    let last = snap.recent_messages.len().saturating_sub(1);
    let lines: Vec<Line> = snap
        .recent_messages
        .iter()
        .enumerate()
        .map(|(i, msg)| {
            let style = if i == last {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else if msg.starts_with("Level Up") || msg.starts_with("Special Trait") {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(Span::styled(format!(" {}", msg), style))
        })
        .collect();

    let block = Block::default()
        .borders(borders_for(area.width))
        .border_style(Style::default().fg(Color::Blue))
        .title(" Log ");
    let inner = block.inner(area);
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });

    // Keep the newest message on the bottom row.
    let total = paragraph.line_count(inner.width) as u16;
    let scroll = total.saturating_sub(inner.height);
    f.render_widget(paragraph.scroll((scroll, 0)).block(block), area);
}
