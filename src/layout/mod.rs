// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Coordinate mapping between semantic positions and drawing space.
//!
//! Layout coordinates are normalized percentages with the origin at the top-left: `x` grows with
//! evolution and `y` grows as visibility falls.

use crate::model::{clamp_axis, Component, Position, AXIS_MAX};

/// A normalized point in `[0, 100] x [0, 100]`, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

pub fn position_to_layout(position: Position) -> LayoutPoint {
    LayoutPoint {
        x: position.evolution,
        y: AXIS_MAX - position.value,
    }
}

pub fn to_layout(component: &Component) -> LayoutPoint {
    position_to_layout(component.position())
}

/// Maps a pointer offset inside a `width x height` surface onto a semantic position.
///
/// Out-of-range pointers saturate at the axis bounds; NaN ratios (e.g. a zero-sized surface)
/// land on `0`.
pub fn from_pointer(px: f64, py: f64, width: f64, height: f64) -> Position {
    Position {
        evolution: clamp_axis(px / width * 100.0),
        value: clamp_axis(100.0 - py / height * 100.0),
    }
}

/// A terminal cell grid that the map is drawn onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasGrid {
    pub width: u16,
    pub height: u16,
}

impl CanvasGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    fn span(len: u16) -> f64 {
        f64::from(len.saturating_sub(1).max(1))
    }

    /// The cell a layout point falls on. Always inside the grid when it is non-empty.
    pub fn cell_for(&self, point: LayoutPoint) -> (u16, u16) {
        let col = (point.x / 100.0 * Self::span(self.width)).round();
        let row = (point.y / 100.0 * Self::span(self.height)).round();
        (
            clamp_cell(col, self.width),
            clamp_cell(row, self.height),
        )
    }

    pub fn cell_for_component(&self, component: &Component) -> (u16, u16) {
        self.cell_for(to_layout(component))
    }

    /// The semantic position under a cell; inverse of [`CanvasGrid::cell_for`] up to rounding.
    pub fn position_at(&self, col: i32, row: i32) -> Position {
        from_pointer(
            f64::from(col),
            f64::from(row),
            Self::span(self.width),
            Self::span(self.height),
        )
    }
}

fn clamp_cell(value: f64, len: u16) -> u16 {
    let max = f64::from(len.saturating_sub(1));
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, max) as u16
}

#[cfg(test)]
mod tests {
    use super::{from_pointer, to_layout, CanvasGrid, LayoutPoint};
    use crate::model::{Component, ComponentId, Position};

    #[test]
    fn to_layout_flips_the_value_axis() {
        let mut component = Component::new(ComponentId::new("a").expect("id"), "A");
        component.set_position(Position::new(30.0, 80.0));
        assert_eq!(to_layout(&component), LayoutPoint { x: 30.0, y: 20.0 });
    }

    #[test]
    fn from_pointer_maps_corners() {
        assert_eq!(from_pointer(0.0, 0.0, 200.0, 100.0), Position::new(0.0, 100.0));
        assert_eq!(from_pointer(200.0, 100.0, 200.0, 100.0), Position::new(100.0, 0.0));
        assert_eq!(from_pointer(50.0, 25.0, 200.0, 100.0), Position::new(25.0, 75.0));
    }

    #[test]
    fn from_pointer_saturates_outside_the_surface() {
        let left = from_pointer(-40.0, 500.0, 200.0, 100.0);
        assert_eq!(left.evolution, 0.0);
        assert_eq!(left.value, 0.0);

        let right = from_pointer(999.0, -10.0, 200.0, 100.0);
        assert_eq!(right.evolution, 100.0);
        assert_eq!(right.value, 100.0);
    }

    #[test]
    fn from_pointer_stays_in_range_for_degenerate_surfaces() {
        for (px, py, w, h) in [
            (0.0, 0.0, 0.0, 0.0),
            (5.0, 5.0, 0.0, 0.0),
            (-5.0, -5.0, 0.0, 0.0),
            (f64::MAX, f64::MIN, 1.0, 1.0),
        ] {
            let pos = from_pointer(px, py, w, h);
            assert!((0.0..=100.0).contains(&pos.evolution), "{px},{py},{w},{h}");
            assert!((0.0..=100.0).contains(&pos.value), "{px},{py},{w},{h}");
        }
    }

    #[test]
    fn canvas_grid_maps_axis_extremes_to_edges() {
        let grid = CanvasGrid::new(101, 21);
        assert_eq!(grid.cell_for(LayoutPoint { x: 0.0, y: 0.0 }), (0, 0));
        assert_eq!(grid.cell_for(LayoutPoint { x: 100.0, y: 100.0 }), (100, 20));
        assert_eq!(grid.cell_for(LayoutPoint { x: 50.0, y: 50.0 }), (50, 10));
    }

    #[test]
    fn canvas_grid_position_at_inverts_cell_for() {
        let grid = CanvasGrid::new(101, 21);
        let pos = grid.position_at(25, 5);
        assert_eq!(pos, Position::new(25.0, 75.0));
        assert_eq!(
            grid.cell_for(LayoutPoint {
                x: pos.evolution,
                y: 100.0 - pos.value
            }),
            (25, 5)
        );
    }

    #[test]
    fn canvas_grid_never_escapes_tiny_grids() {
        let grid = CanvasGrid::new(1, 1);
        assert_eq!(grid.cell_for(LayoutPoint { x: 100.0, y: 100.0 }), (0, 0));
        let empty = CanvasGrid::new(0, 0);
        assert_eq!(empty.cell_for(LayoutPoint { x: 70.0, y: 30.0 }), (0, 0));
    }
}
