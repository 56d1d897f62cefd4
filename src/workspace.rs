// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The editing core shared by every front end.
//!
//! A [`Workspace`] owns the session, the dependency-draw machine and the storage/route
//! collaborators. Every [`Command`] runs to completion, after which the collection is persisted
//! (when it changed) and the active route is published (when it moved).

use crate::model::{now_millis, ComponentId, ComponentType, DiagramId, Position, Session};
use crate::ops::draw::DependencyDraw;
use crate::ops::{ApplyError, ComponentPatch, Delta, Op};
use crate::route::{format_fragment, navigate, RouteSink};
use crate::store::{load_session, reset, save_session, KeyValueStore, LoadReport, StoreError};

pub const UNTITLED_MAP_NAME: &str = "Untitled Map";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    NewMap,
    CopyMap,
    DeleteMap(DiagramId),
    SelectMap(DiagramId),
    Navigate(String),
    RenameMap(String),
    SetUserNeedTitle(String),
    SetUserNeedDescription(String),
    AddComponent,
    RemoveComponent(ComponentId),
    RenameComponent { id: ComponentId, name: String },
    SetComponentType { id: ComponentId, component_type: ComponentType },
    CycleComponentType(ComponentId),
    Reposition { id: ComponentId, position: Position },
    ToggleDrawing,
    ClickComponent(ComponentId),
    ClickBackground,
    RemoveDependency { from: ComponentId, to: ComponentId },
    Escape,
    ResetStorage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The collection changed. The delta lists touched components, if any.
    Applied(Delta),
    /// Nothing to do: missing target, no active map, or only transient state moved.
    Unchanged,
    /// Blank text where a value is required; the edit should revert.
    Blank,
    Rejected(ApplyError),
}

impl Outcome {
    pub fn applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

pub type Clock = fn() -> u64;

pub struct Workspace {
    session: Session,
    draw: DependencyDraw,
    kv: Box<dyn KeyValueStore>,
    router: Box<dyn RouteSink>,
    clock: Clock,
    persisted_rev: u64,
    published: Option<DiagramId>,
    load_report: LoadReport,
    error: Option<StoreError>,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("session", &self.session)
            .field("draw", &self.draw)
            .field("persisted_rev", &self.persisted_rev)
            .field("published", &self.published)
            .field("load_report", &self.load_report)
            .finish_non_exhaustive()
    }
}

impl Workspace {
    /// Loads (or seeds) the collection and activates the map addressed by `route`, falling back
    /// to the most recent one.
    pub fn open(
        kv: Box<dyn KeyValueStore>,
        router: Box<dyn RouteSink>,
        route: Option<&str>,
    ) -> Result<Self, StoreError> {
        Self::open_with_clock(kv, router, route, now_millis)
    }

    pub fn open_with_clock(
        kv: Box<dyn KeyValueStore>,
        router: Box<dyn RouteSink>,
        route: Option<&str>,
        clock: Clock,
    ) -> Result<Self, StoreError> {
        let (session, load_report) = load_session(kv.as_ref(), clock())?;
        let mut workspace = Self {
            persisted_rev: if load_report.seeded() { 0 } else { session.rev() },
            session,
            draw: DependencyDraw::new(),
            kv,
            router,
            clock,
            published: None,
            load_report,
            error: None,
        };
        navigate(&mut workspace.session, route.unwrap_or_default());
        workspace.sync();
        Ok(workspace)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn draw(&self) -> &DependencyDraw {
        &self.draw
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.kv.as_ref()
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    /// The fragment of the active map, if any.
    pub fn route(&self) -> Option<String> {
        self.session.active_diagram_id().map(format_fragment)
    }

    /// The most recent persistence or routing failure, cleared on read.
    pub fn take_error(&mut self) -> Option<StoreError> {
        self.error.take()
    }

    /// Leaves the session without an active map, as after a failed recovery.
    #[cfg(test)]
    pub(crate) fn clear_active(&mut self) {
        self.session.clear_active();
        self.published = None;
    }

    pub fn dispatch(&mut self, command: Command) -> Outcome {
        let outcome = self.run(command);
        if let Outcome::Rejected(err) = &outcome {
            tracing::debug!(error = %err, "command rejected");
        }
        self.sync();
        outcome
    }

    fn run(&mut self, command: Command) -> Outcome {
        let now = (self.clock)();
        match command {
            Command::NewMap => {
                self.session.create(UNTITLED_MAP_NAME, Vec::new(), true, now);
                Outcome::Applied(Delta::default())
            }
            Command::CopyMap => {
                let Some(id) = self.session.active_diagram_id().cloned() else {
                    return Outcome::Unchanged;
                };
                changed(self.session.copy(&id, now).is_some())
            }
            Command::DeleteMap(id) => changed(self.session.delete(&id)),
            Command::SelectMap(id) => {
                self.session.select(&id);
                Outcome::Unchanged
            }
            Command::Navigate(fragment) => {
                navigate(&mut self.session, &fragment);
                Outcome::Unchanged
            }
            Command::RenameMap(name) => self.with_active_id(|session, id| {
                if name.trim().is_empty() {
                    return Outcome::Blank;
                }
                changed(session.rename(id, &name, now))
            }),
            Command::SetUserNeedTitle(title) => self.with_active_id(|session, id| {
                if title.trim().is_empty() {
                    return Outcome::Blank;
                }
                changed(session.set_user_need_title(id, &title, now))
            }),
            Command::SetUserNeedDescription(text) => self.with_active_id(|session, id| {
                changed(session.set_user_need_description(id, &text, now))
            }),
            Command::AddComponent => {
                if self.session.active_diagram().is_none() {
                    return Outcome::Unchanged;
                }
                let component_id = self.session.next_component_id(now);
                self.apply(Op::AddComponent { component_id }, now)
            }
            Command::RemoveComponent(component_id) => {
                let removing_source = self.draw.from_id() == Some(&component_id);
                let outcome = self.apply(Op::RemoveComponent { component_id }, now);
                // A pending draw must not outlive its source.
                if removing_source && outcome.applied() {
                    self.draw.reset();
                }
                outcome
            }
            Command::RenameComponent { id, name } => {
                let name = name.trim();
                if name.is_empty() {
                    return Outcome::Blank;
                }
                let unchanged = self
                    .session
                    .active_diagram()
                    .and_then(|diagram| diagram.component(&id))
                    .map_or(true, |component| component.name() == name);
                if unchanged {
                    return Outcome::Unchanged;
                }
                self.update(id, ComponentPatch::name(name), now)
            }
            Command::SetComponentType { id, component_type } => {
                self.update(id, ComponentPatch::component_type(component_type), now)
            }
            Command::CycleComponentType(id) => {
                let Some(current) = self
                    .session
                    .active_diagram()
                    .and_then(|diagram| diagram.component(&id))
                    .map(|component| component.component_type())
                else {
                    return Outcome::Unchanged;
                };
                self.update(id, ComponentPatch::component_type(current.cycle()), now)
            }
            Command::Reposition { id, position } => {
                if self.draw.is_drawing() {
                    return Outcome::Unchanged;
                }
                self.update(
                    id,
                    ComponentPatch::position(position.evolution, position.value),
                    now,
                )
            }
            Command::ToggleDrawing => {
                self.draw.toggle();
                Outcome::Unchanged
            }
            Command::ClickComponent(id) => match self.draw.select_component(&id) {
                Some(op) => self.apply(op, now),
                None => Outcome::Unchanged,
            },
            Command::ClickBackground => {
                self.draw.background_click();
                Outcome::Unchanged
            }
            Command::RemoveDependency { from, to } => {
                self.apply(Op::RemoveDependency { from, to }, now)
            }
            Command::Escape => {
                self.draw.escape();
                Outcome::Unchanged
            }
            Command::ResetStorage => match self.reset_storage(now) {
                Ok(()) => Outcome::Applied(Delta::default()),
                Err(err) => {
                    tracing::error!(error = %err, "failed to reset storage");
                    self.error = Some(err);
                    Outcome::Unchanged
                }
            },
        }
    }

    fn with_active_id(&mut self, f: impl FnOnce(&mut Session, &DiagramId) -> Outcome) -> Outcome {
        let Some(id) = self.session.active_diagram_id().cloned() else {
            return Outcome::Unchanged;
        };
        f(&mut self.session, &id)
    }

    fn update(&mut self, component_id: ComponentId, patch: ComponentPatch, now: u64) -> Outcome {
        let exists = self
            .session
            .active_diagram()
            .is_some_and(|diagram| diagram.component(&component_id).is_some());
        if !exists {
            return Outcome::Unchanged;
        }
        self.apply(Op::UpdateComponent { component_id, patch }, now)
    }

    fn apply(&mut self, op: Op, now: u64) -> Outcome {
        match self.session.apply_to_active(&op, now) {
            None => Outcome::Unchanged,
            Some(Ok(delta)) => Outcome::Applied(delta),
            Some(Err(err)) => Outcome::Rejected(err),
        }
    }

    fn reset_storage(&mut self, now: u64) -> Result<(), StoreError> {
        reset(self.kv.as_mut())?;
        let (session, load_report) = load_session(self.kv.as_ref(), now)?;
        self.session = session;
        self.load_report = load_report;
        self.persisted_rev = 0;
        self.published = None;
        self.draw.reset();
        navigate(&mut self.session, "");
        Ok(())
    }

    fn sync(&mut self) {
        let active = self.session.active_diagram_id().cloned();
        if active != self.published {
            self.draw.reset();
            if let Some(id) = &active {
                let fragment = format_fragment(id);
                if let Err(err) = self.router.publish(&fragment) {
                    tracing::warn!(error = %err, route = %fragment, "failed to publish route");
                    self.error = Some(err);
                }
            }
            self.published = active;
        }

        if self.session.rev() != self.persisted_rev {
            match save_session(self.kv.as_mut(), &self.session) {
                Ok(_) => self.persisted_rev = self.session.rev(),
                Err(err) => {
                    tracing::error!(error = %err, "failed to save maps");
                    self.error = Some(err);
                }
            }
        }
    }
}

fn changed(flag: bool) -> Outcome {
    if flag {
        Outcome::Applied(Delta::default())
    } else {
        Outcome::Unchanged
    }
}
