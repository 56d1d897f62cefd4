// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Two-click dependency drawing.
//!
//! The machine never touches a map. A completed gesture hands back an [`Op::AddDependency`] for
//! the caller to apply.

use crate::model::ComponentId;

use super::Op;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DrawState {
    #[default]
    Idle,
    Armed,
    SourceSelected(ComponentId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyDraw {
    state: DrawState,
}

impl DependencyDraw {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        !matches!(self.state, DrawState::Idle)
    }

    pub fn from_id(&self) -> Option<&ComponentId> {
        match &self.state {
            DrawState::SourceSelected(from) => Some(from),
            DrawState::Idle | DrawState::Armed => None,
        }
    }

    /// Arms drawing from idle; cancels it from any drawing state.
    pub fn toggle(&mut self) {
        self.state = match self.state {
            DrawState::Idle => DrawState::Armed,
            DrawState::Armed | DrawState::SourceSelected(_) => DrawState::Idle,
        };
    }

    /// Feeds a component click. Returns the edge to commit once a distinct target is picked.
    pub fn select_component(&mut self, id: &ComponentId) -> Option<Op> {
        match &self.state {
            DrawState::Idle => None,
            DrawState::Armed => {
                self.state = DrawState::SourceSelected(id.clone());
                None
            }
            DrawState::SourceSelected(from) if from == id => None,
            DrawState::SourceSelected(from) => {
                let op = Op::AddDependency {
                    from: from.clone(),
                    to: id.clone(),
                };
                self.state = DrawState::Idle;
                Some(op)
            }
        }
    }

    pub fn background_click(&mut self) {
        self.reset();
    }

    pub fn escape(&mut self) {
        self.reset();
    }

    pub fn reset(&mut self) {
        self.state = DrawState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::{DependencyDraw, DrawState};
    use crate::model::ComponentId;
    use crate::ops::Op;

    fn cid(value: &str) -> ComponentId {
        ComponentId::new(value).expect("component id")
    }

    #[test]
    fn toggle_arms_and_cancels() {
        let mut draw = DependencyDraw::new();
        draw.toggle();
        assert_eq!(draw.state(), &DrawState::Armed);
        draw.toggle();
        assert_eq!(draw.state(), &DrawState::Idle);

        draw.toggle();
        draw.select_component(&cid("x"));
        draw.toggle();
        assert_eq!(draw.state(), &DrawState::Idle);
    }

    #[test]
    fn selecting_the_source_twice_keeps_waiting() {
        let mut draw = DependencyDraw::new();
        draw.toggle();
        assert_eq!(draw.select_component(&cid("x")), None);
        assert_eq!(draw.select_component(&cid("x")), None);
        assert_eq!(draw.state(), &DrawState::SourceSelected(cid("x")));
        assert_eq!(draw.from_id(), Some(&cid("x")));
    }

    #[test]
    fn second_distinct_selection_commits_and_returns_to_idle() {
        let mut draw = DependencyDraw::new();
        draw.toggle();
        draw.select_component(&cid("x"));
        let op = draw.select_component(&cid("y"));
        assert_eq!(
            op,
            Some(Op::AddDependency {
                from: cid("x"),
                to: cid("y")
            })
        );
        assert!(!draw.is_drawing());
    }

    #[test]
    fn selection_while_idle_is_ignored() {
        let mut draw = DependencyDraw::new();
        assert_eq!(draw.select_component(&cid("x")), None);
        assert_eq!(draw.state(), &DrawState::Idle);
    }

    #[test]
    fn escape_and_background_click_cancel_without_committing() {
        let mut draw = DependencyDraw::new();
        draw.escape();
        assert_eq!(draw.state(), &DrawState::Idle);

        draw.toggle();
        draw.escape();
        assert_eq!(draw.state(), &DrawState::Idle);

        draw.toggle();
        draw.select_component(&cid("x"));
        draw.escape();
        assert_eq!(draw.state(), &DrawState::Idle);

        draw.toggle();
        draw.select_component(&cid("x"));
        draw.background_click();
        assert_eq!(draw.state(), &DrawState::Idle);
        assert_eq!(draw.select_component(&cid("y")), None);
    }
}
