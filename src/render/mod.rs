// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rendering a map onto a character grid.
//!
//! The renderer produces the drawn characters plus a per-cell hit index that the TUI uses for
//! pointer interaction and cell-accurate styling.

mod canvas;
mod text;

use std::fmt;

use crate::layout::CanvasGrid;
use crate::model::{ComponentId, ComponentType, Diagram, EvolutionStage};

pub use canvas::{Canvas, CanvasError};

pub const STAGE_DIVIDER: char = '┆';
pub const REMOVE_MARKER: char = '×';
pub const DEFAULT_MAX_LABEL_WIDTH: usize = 28;

pub fn component_icon(component_type: ComponentType) -> char {
    match component_type {
        ComponentType::Software => '◆',
        ComponentType::Hardware => '■',
        ComponentType::Service => '●',
    }
}

/// What a canvas cell belongs to. Later layers win: dividers, then edges, then badges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Hit {
    #[default]
    Background,
    Divider,
    Edge {
        from: ComponentId,
        to: ComponentId,
    },
    Component(ComponentId),
    RemoveButton(ComponentId),
}

impl Hit {
    /// Dividers are decoration; pointer-wise they are background.
    pub fn is_background(&self) -> bool {
        matches!(self, Self::Background | Self::Divider)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Shows the remove marker on this component's badge.
    pub hovered_component: Option<ComponentId>,
    pub max_label_width: Option<usize>,
}

/// Where a component's badge landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub id: ComponentId,
    pub row: usize,
    pub x0: usize,
    /// Inclusive.
    pub x1: usize,
    /// The cell the badge is anchored on.
    pub anchor: (usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapCanvas {
    canvas: Canvas,
    hits: Vec<Hit>,
    badges: Vec<Badge>,
}

impl MapCanvas {
    pub fn width(&self) -> usize {
        self.canvas.width()
    }

    pub fn height(&self) -> usize {
        self.canvas.height()
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        self.canvas.get(x, y).ok()
    }

    /// The topmost owner of a cell; out-of-bounds cells are background.
    pub fn hit_at(&self, x: usize, y: usize) -> &Hit {
        const BACKGROUND: &Hit = &Hit::Background;
        if !self.canvas.in_bounds(x, y) {
            return BACKGROUND;
        }
        &self.hits[(y * self.canvas.width()) + x]
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn badge(&self, id: &ComponentId) -> Option<&Badge> {
        self.badges.iter().find(|badge| &badge.id == id)
    }

    pub fn row(&self, y: usize) -> Option<String> {
        self.canvas.row(y)
    }

    fn mark(&mut self, x: usize, y: usize, hit: Hit) {
        if self.canvas.in_bounds(x, y) {
            let idx = (y * self.canvas.width()) + x;
            self.hits[idx] = hit;
        }
    }

    fn put(&mut self, x: usize, y: usize, ch: char, hit: Hit) {
        if self.canvas.set(x, y, ch).is_ok() {
            self.mark(x, y, hit);
        }
    }
}

impl fmt::Display for MapCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.canvas, f)
    }
}

/// Renders `diagram` onto a `width x height` grid.
pub fn render_map(
    diagram: &Diagram,
    width: u16,
    height: u16,
    options: &RenderOptions,
) -> Result<MapCanvas, CanvasError> {
    let canvas = Canvas::new(usize::from(width), usize::from(height))?;
    let len = usize::from(width) * usize::from(height);
    let mut out = MapCanvas {
        canvas,
        hits: vec![Hit::Background; len],
        badges: Vec::new(),
    };
    if width == 0 || height == 0 {
        return Ok(out);
    }

    let grid = CanvasGrid::new(width, height);
    draw_stage_dividers(&mut out, width);

    for (from, to) in diagram.edges() {
        let (Some(a), Some(b)) = (diagram.component(from), diagram.component(to)) else {
            continue;
        };
        let start = cell(grid.cell_for_component(a));
        let end = cell(grid.cell_for_component(b));
        draw_edge(
            &mut out,
            start,
            end,
            Hit::Edge {
                from: from.clone(),
                to: to.clone(),
            },
        );
    }

    let max_label = options
        .max_label_width
        .unwrap_or(DEFAULT_MAX_LABEL_WIDTH)
        .max(3);
    for component in diagram.nodes() {
        let anchor = cell(grid.cell_for_component(component));
        let hovered = options.hovered_component.as_ref() == Some(component.id());
        let name = text::truncate_with_ellipsis(component.name(), max_label.saturating_sub(2));
        let label = format!("{} {name}", component_icon(component.component_type()));
        let label_len = text::text_len(&label);
        let total = if hovered { label_len + 2 } else { label_len };
        let x0 = text::centered_start(anchor.0, label_len, out.width())
            .min(out.width().saturating_sub(total));

        let id = component.id().clone();
        let mut x = x0;
        for ch in label.chars() {
            out.put(x, anchor.1, ch, Hit::Component(id.clone()));
            x += 1;
        }
        if hovered {
            out.put(x, anchor.1, ' ', Hit::Component(id.clone()));
            out.put(x + 1, anchor.1, REMOVE_MARKER, Hit::RemoveButton(id.clone()));
            x += 2;
        }

        out.badges.push(Badge {
            id,
            row: anchor.1,
            x0,
            x1: x.saturating_sub(1).min(out.width().saturating_sub(1)),
            anchor,
        });
    }

    Ok(out)
}

fn cell((col, row): (u16, u16)) -> (usize, usize) {
    (usize::from(col), usize::from(row))
}

fn stage_columns(width: u16) -> impl Iterator<Item = usize> {
    let span = f64::from(width.saturating_sub(1));
    (1..EvolutionStage::ALL.len()).map(move |i| {
        (span * i as f64 / EvolutionStage::ALL.len() as f64).round() as usize
    })
}

fn draw_stage_dividers(out: &mut MapCanvas, width: u16) {
    for x in stage_columns(width) {
        for y in 0..out.height() {
            out.put(x, y, STAGE_DIVIDER, Hit::Divider);
        }
    }
}

/// Stroke for one step of a line in screen space (y grows downward).
fn stroke(dx: i64, dy: i64) -> char {
    match (dx != 0, dy != 0) {
        (true, false) => '─',
        (false, true) => '│',
        _ if (dx > 0) == (dy > 0) => '╲',
        _ => '╱',
    }
}

/// Bresenham walk from `start` to `end`, excluding both endpoints.
fn draw_edge(out: &mut MapCanvas, start: (usize, usize), end: (usize, usize), hit: Hit) {
    let (mut x, mut y) = (start.0 as i64, start.1 as i64);
    let (x1, y1) = (end.0 as i64, end.1 as i64);
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    while (x, y) != (x1, y1) {
        let e2 = 2 * err;
        let mut step_x = 0;
        let mut step_y = 0;
        if e2 >= dy {
            err += dy;
            step_x = sx;
        }
        if e2 <= dx {
            err += dx;
            step_y = sy;
        }
        x += step_x;
        y += step_y;
        if (x, y) == (x1, y1) {
            break;
        }
        if x >= 0 && y >= 0 {
            out.put(x as usize, y as usize, stroke(step_x, step_y), hit.clone());
        }
    }
}

/// A single row naming the evolution stages, each centered in its quarter of `width`.
pub fn stage_ruler(width: u16) -> String {
    let width = usize::from(width);
    let mut row = vec![' '; width];
    let stages = EvolutionStage::ALL.len();
    for (i, stage) in EvolutionStage::ALL.into_iter().enumerate() {
        let band_start = width * i / stages;
        let band_end = width * (i + 1) / stages;
        let band = band_end.saturating_sub(band_start);
        let label = text::truncate_with_ellipsis(stage.label(), band.saturating_sub(1));
        let len = text::text_len(&label);
        let start = band_start + band.saturating_sub(len) / 2;
        for (offset, ch) in label.chars().enumerate() {
            if let Some(slot) = row.get_mut(start + offset) {
                *slot = ch;
            }
        }
    }
    row.into_iter().collect()
}
