// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Turns raw left-button mouse events into clicks, double-clicks and drags.
//!
//! A press followed by a release on (nearly) the same cell is a click; a second click within the
//! multi-click window is a double-click. Moving past the drag threshold while pressed starts a
//! drag, and the release then ends the drag instead of clicking.

use std::time::{Duration, Instant};

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

#[derive(Debug, Clone)]
pub(crate) struct GestureConfig {
    pub(crate) multi_click_timeout: Duration,
    /// Manhattan distance in cells before a press becomes a drag.
    pub(crate) drag_threshold: u16,
    pub(crate) click_tolerance: u16,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            multi_click_timeout: Duration::from_millis(400),
            drag_threshold: 1,
            click_tolerance: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) x: u16,
    pub(crate) y: u16,
}

impl Cell {
    pub(crate) fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    fn manhattan_distance(self, other: Self) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gesture {
    Click(Cell),
    DoubleClick(Cell),
    DragStart { start: Cell },
    DragMove { start: Cell, current: Cell },
    DragEnd { start: Cell, end: Cell },
    DragCancel,
}

#[derive(Debug, Clone, Copy)]
struct LastClick {
    cell: Cell,
    at: Instant,
    count: u8,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    start: Cell,
    dragging: bool,
}

#[derive(Debug, Default)]
pub(crate) struct GestureRecognizer {
    config: GestureConfig,
    last_click: Option<LastClick>,
    press: Option<Press>,
}

impl GestureRecognizer {
    pub(crate) fn new(config: GestureConfig) -> Self {
        Self {
            config,
            last_click: None,
            press: None,
        }
    }

    pub(crate) fn is_dragging(&self) -> bool {
        self.press.is_some_and(|press| press.dragging)
    }

    pub(crate) fn process(&mut self, event: &MouseEvent, now: Instant) -> Vec<Gesture> {
        let cell = Cell::new(event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.press = Some(Press {
                    start: cell,
                    dragging: false,
                });
                Vec::new()
            }
            MouseEventKind::Drag(MouseButton::Left) => self.on_drag(cell),
            MouseEventKind::Up(MouseButton::Left) => self.on_release(cell, now),
            _ => Vec::new(),
        }
    }

    /// Abandons any press in flight (escape, focus loss).
    pub(crate) fn cancel(&mut self) -> Option<Gesture> {
        let press = self.press.take()?;
        press.dragging.then_some(Gesture::DragCancel)
    }

    pub(crate) fn reset(&mut self) {
        self.last_click = None;
        self.press = None;
    }

    fn on_drag(&mut self, cell: Cell) -> Vec<Gesture> {
        let Some(press) = self.press.as_mut() else {
            // Drag reported without a press we saw; treat its first cell as the press.
            self.press = Some(Press {
                start: cell,
                dragging: false,
            });
            return Vec::new();
        };

        let mut out = Vec::with_capacity(2);
        if !press.dragging
            && press.start.manhattan_distance(cell) >= u32::from(self.config.drag_threshold)
        {
            press.dragging = true;
            out.push(Gesture::DragStart { start: press.start });
        }
        if press.dragging {
            out.push(Gesture::DragMove {
                start: press.start,
                current: cell,
            });
        }
        out
    }

    fn on_release(&mut self, cell: Cell, now: Instant) -> Vec<Gesture> {
        match self.press.take() {
            Some(press) if press.dragging => {
                self.last_click = None;
                return vec![Gesture::DragEnd {
                    start: press.start,
                    end: cell,
                }];
            }
            Some(_) | None => {}
        }

        let count = match self.last_click {
            Some(last)
                if last.count < 2
                    && last.cell.manhattan_distance(cell)
                        <= u32::from(self.config.click_tolerance)
                    && now.duration_since(last.at) <= self.config.multi_click_timeout =>
            {
                last.count + 1
            }
            _ => 1,
        };
        self.last_click = Some(LastClick {
            cell,
            at: now,
            count,
        });

        if count == 2 {
            vec![Gesture::DoubleClick(cell)]
        } else {
            vec![Gesture::Click(cell)]
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

    use super::{Cell, Gesture, GestureConfig, GestureRecognizer};

    fn mouse(kind: MouseEventKind, x: u16, y: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn click(rec: &mut GestureRecognizer, x: u16, y: u16, at: Instant) -> Vec<Gesture> {
        rec.process(&mouse(MouseEventKind::Down(MouseButton::Left), x, y), at);
        rec.process(&mouse(MouseEventKind::Up(MouseButton::Left), x, y), at)
    }

    #[test]
    fn single_click() {
        let mut rec = GestureRecognizer::new(GestureConfig::default());
        assert_eq!(
            click(&mut rec, 4, 2, Instant::now()),
            vec![Gesture::Click(Cell::new(4, 2))]
        );
    }

    #[test]
    fn double_click_within_window() {
        let mut rec = GestureRecognizer::new(GestureConfig::default());
        let t0 = Instant::now();
        click(&mut rec, 4, 2, t0);
        assert_eq!(
            click(&mut rec, 4, 2, t0 + Duration::from_millis(100)),
            vec![Gesture::DoubleClick(Cell::new(4, 2))]
        );
        // A third click starts over.
        assert_eq!(
            click(&mut rec, 4, 2, t0 + Duration::from_millis(200)),
            vec![Gesture::Click(Cell::new(4, 2))]
        );
    }

    #[test]
    fn slow_or_distant_second_click_is_single() {
        let mut rec = GestureRecognizer::new(GestureConfig::default());
        let t0 = Instant::now();
        click(&mut rec, 4, 2, t0);
        assert_eq!(
            click(&mut rec, 4, 2, t0 + Duration::from_secs(2)),
            vec![Gesture::Click(Cell::new(4, 2))]
        );
        assert_eq!(
            click(&mut rec, 9, 2, t0 + Duration::from_millis(2100)),
            vec![Gesture::Click(Cell::new(9, 2))]
        );
    }

    #[test]
    fn drag_replaces_click() {
        let mut rec = GestureRecognizer::new(GestureConfig::default());
        let t0 = Instant::now();
        rec.process(&mouse(MouseEventKind::Down(MouseButton::Left), 1, 1), t0);
        let moved = rec.process(&mouse(MouseEventKind::Drag(MouseButton::Left), 3, 1), t0);
        assert_eq!(
            moved,
            vec![
                Gesture::DragStart {
                    start: Cell::new(1, 1)
                },
                Gesture::DragMove {
                    start: Cell::new(1, 1),
                    current: Cell::new(3, 1)
                },
            ]
        );
        assert!(rec.is_dragging());
        let released = rec.process(&mouse(MouseEventKind::Up(MouseButton::Left), 5, 2), t0);
        assert_eq!(
            released,
            vec![Gesture::DragEnd {
                start: Cell::new(1, 1),
                end: Cell::new(5, 2)
            }]
        );
        assert!(!rec.is_dragging());
    }

    #[test]
    fn cancel_reports_only_started_drags() {
        let mut rec = GestureRecognizer::new(GestureConfig::default());
        let t0 = Instant::now();
        rec.process(&mouse(MouseEventKind::Down(MouseButton::Left), 1, 1), t0);
        assert_eq!(rec.cancel(), None);

        rec.process(&mouse(MouseEventKind::Down(MouseButton::Left), 1, 1), t0);
        rec.process(&mouse(MouseEventKind::Drag(MouseButton::Left), 2, 2), t0);
        assert_eq!(rec.cancel(), Some(Gesture::DragCancel));
        // The release after a cancel is a plain click.
        assert_eq!(
            rec.process(&mouse(MouseEventKind::Up(MouseButton::Left), 2, 2), t0),
            vec![Gesture::Click(Cell::new(2, 2))]
        );
    }

    #[test]
    fn other_buttons_are_ignored() {
        let mut rec = GestureRecognizer::new(GestureConfig::default());
        let t0 = Instant::now();
        assert!(rec
            .process(&mouse(MouseEventKind::Down(MouseButton::Right), 1, 1), t0)
            .is_empty());
        assert!(rec
            .process(&mouse(MouseEventKind::Up(MouseButton::Right), 1, 1), t0)
            .is_empty());
        assert!(rec.process(&mouse(MouseEventKind::Moved, 1, 1), t0).is_empty());
    }
}
