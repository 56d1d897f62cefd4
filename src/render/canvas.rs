// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

pub const UNICODE_BOX_HORIZONTAL: char = '─';
pub const UNICODE_BOX_VERTICAL: char = '│';
pub const UNICODE_BOX_TEE_RIGHT: char = '├';
pub const UNICODE_BOX_TEE_LEFT: char = '┤';
pub const UNICODE_BOX_TEE_DOWN: char = '┬';
pub const UNICODE_BOX_TEE_UP: char = '┴';
pub const UNICODE_BOX_CROSS: char = '┼';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoxEdges(u8);

impl BoxEdges {
    const NONE: Self = Self(0);
    const LEFT: Self = Self(1 << 0);
    const RIGHT: Self = Self(1 << 1);
    const UP: Self = Self(1 << 2);
    const DOWN: Self = Self(1 << 3);

    fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn contains(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

fn box_edges_from_char(ch: char) -> Option<BoxEdges> {
    match ch {
        UNICODE_BOX_HORIZONTAL => Some(BoxEdges::LEFT.union(BoxEdges::RIGHT)),
        UNICODE_BOX_VERTICAL => Some(BoxEdges::UP.union(BoxEdges::DOWN)),
        _ => None,
    }
}

fn box_char_from_edges(edges: BoxEdges) -> char {
    match edges.0 {
        0 => ' ',
        1..=3 => UNICODE_BOX_HORIZONTAL,
        4 | 8 | 12 => UNICODE_BOX_VERTICAL,
        14 => UNICODE_BOX_TEE_RIGHT,
        13 => UNICODE_BOX_TEE_LEFT,
        11 => UNICODE_BOX_TEE_DOWN,
        7 => UNICODE_BOX_TEE_UP,
        // Corners never arise from straight strokes; a crossing covers the rest.
        _ => UNICODE_BOX_CROSS,
    }
}

/// A fixed-size, bounds-checked character grid.
///
/// Plain characters overwrite (last writer wins). Horizontal and vertical strokes that meet merge
/// into junctions instead of overwriting each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
    box_edges: Vec<BoxEdges>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Result<Self, CanvasError> {
        Self::new_filled(width, height, ' ')
    }

    pub fn new_filled(width: usize, height: usize, fill: char) -> Result<Self, CanvasError> {
        let len = width
            .checked_mul(height)
            .ok_or(CanvasError::AreaOverflow { width, height })?;

        Ok(Self {
            width,
            height,
            cells: vec![fill; len],
            box_edges: vec![BoxEdges::NONE; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Result<char, CanvasError> {
        let idx = self.index_of(x, y)?;
        Ok(self.render_at(x, y, idx))
    }

    pub fn set(&mut self, x: usize, y: usize, ch: char) -> Result<(), CanvasError> {
        let idx = self.index_of(x, y)?;
        if let Some(edges) = box_edges_from_char(ch) {
            self.box_edges[idx] = self.box_edges[idx].union(edges);
        } else {
            self.cells[idx] = ch;
            self.box_edges[idx] = BoxEdges::NONE;
        }
        Ok(())
    }

    /// Writes `text` left-to-right starting at `(x, y)`, clipping at the right edge.
    pub fn write_str(&mut self, x: usize, y: usize, text: &str) -> Result<(), CanvasError> {
        if y >= self.height {
            return Err(CanvasError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        let mut x = x;
        for ch in text.chars() {
            if x >= self.width {
                break;
            }
            self.set(x, y, ch)?;
            x += 1;
        }

        Ok(())
    }

    /// Row `y` as a string, or `None` past the bottom.
    pub fn row(&self, y: usize) -> Option<String> {
        if y >= self.height {
            return None;
        }
        Some(
            (0..self.width)
                .map(|x| self.render_at(x, y, (y * self.width) + x))
                .collect(),
        )
    }

    fn index_of(&self, x: usize, y: usize) -> Result<usize, CanvasError> {
        if !self.in_bounds(x, y) {
            return Err(CanvasError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        Ok((y * self.width) + x)
    }

    fn render_at(&self, x: usize, y: usize, idx: usize) -> char {
        let edges = self.box_edges[idx];
        if edges.is_empty() {
            return self.cells[idx];
        }

        let connected = self.connected_box_edges(x, y, edges);
        if connected.is_empty() {
            box_char_from_edges(edges)
        } else {
            box_char_from_edges(connected)
        }
    }

    fn connected_box_edges(&self, x: usize, y: usize, edges: BoxEdges) -> BoxEdges {
        let mut connected = BoxEdges::NONE;

        if edges.contains(BoxEdges::LEFT) && x > 0 {
            let left_idx = (y * self.width) + (x - 1);
            if self.box_edges[left_idx].contains(BoxEdges::RIGHT) {
                connected = connected.union(BoxEdges::LEFT);
            }
        }

        if edges.contains(BoxEdges::RIGHT) && (x + 1) < self.width {
            let right_idx = (y * self.width) + (x + 1);
            if self.box_edges[right_idx].contains(BoxEdges::LEFT) {
                connected = connected.union(BoxEdges::RIGHT);
            }
        }

        if edges.contains(BoxEdges::UP) && y > 0 {
            let up_idx = ((y - 1) * self.width) + x;
            if self.box_edges[up_idx].contains(BoxEdges::DOWN) {
                connected = connected.union(BoxEdges::UP);
            }
        }

        if edges.contains(BoxEdges::DOWN) && (y + 1) < self.height {
            let down_idx = ((y + 1) * self.width) + x;
            if self.box_edges[down_idx].contains(BoxEdges::UP) {
                connected = connected.union(BoxEdges::DOWN);
            }
        }

        connected
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        for y in 0..self.height {
            for x in 0..self.width {
                let idx = (y * self.width) + x;
                f.write_char(self.render_at(x, y, idx))?;
            }

            if y + 1 < self.height {
                f.write_char('\n')?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    AreaOverflow {
        width: usize,
        height: usize,
    },
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AreaOverflow { width, height } => {
                write!(f, "canvas area overflow: {width}*{height}")
            }
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => {
                write!(f, "out of bounds: ({x},{y}) for {width}x{height} canvas")
            }
        }
    }
}

impl std::error::Error for CanvasError {}

#[cfg(test)]
mod tests {
    use super::{Canvas, CanvasError};

    #[test]
    fn set_and_get_in_bounds() {
        let mut c = Canvas::new_filled(3, 2, '.').expect("canvas");
        c.set(1, 0, 'X').unwrap();
        assert_eq!(c.get(1, 0).unwrap(), 'X');
        assert_eq!(c.to_string(), ".X.\n...");
        assert_eq!(c.row(1).as_deref(), Some("..."));
        assert_eq!(c.row(2), None);
    }

    #[test]
    fn set_out_of_bounds_errors() {
        let mut c = Canvas::new(2, 2).expect("canvas");
        let err = c.set(2, 0, 'X').unwrap_err();
        assert_eq!(
            err,
            CanvasError::OutOfBounds {
                x: 2,
                y: 0,
                width: 2,
                height: 2
            }
        );
    }

    #[test]
    fn write_str_clips_at_right_edge() {
        let mut c = Canvas::new_filled(4, 1, '.').expect("canvas");
        c.write_str(2, 0, "abcdef").unwrap();
        assert_eq!(c.to_string(), "..ab");
    }

    #[test]
    fn crossing_strokes_merge_into_a_junction() {
        let mut c = Canvas::new_filled(3, 3, '.').expect("canvas");
        for x in 0..3 {
            c.set(x, 1, '─').unwrap();
        }
        for y in 0..3 {
            c.set(1, y, '│').unwrap();
        }
        assert_eq!(c.to_string(), ".│.\n─┼─\n.│.");
    }

    #[test]
    fn plain_characters_overwrite_strokes() {
        let mut c = Canvas::new_filled(3, 1, '.').expect("canvas");
        c.set(1, 0, '─').unwrap();
        c.set(1, 0, 'A').unwrap();
        assert_eq!(c.to_string(), ".A.");
    }
}
