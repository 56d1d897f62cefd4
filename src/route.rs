// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Addressing maps by route fragment (`#/map/<id>`).

use std::cell::RefCell;
use std::rc::Rc;

use crate::model::{DiagramId, Session};
use crate::store::{FileStore, KeyValueStore, StoreError};

pub const ROUTE_PREFIX: &str = "#/map/";
pub const ROUTE_KEY: &str = "last-route";

/// The map id a fragment addresses, if it has the `#/map/<id>` shape and a valid id.
pub fn parse_fragment(fragment: &str) -> Option<DiagramId> {
    let id = fragment.trim().strip_prefix(ROUTE_PREFIX)?;
    DiagramId::new(id).ok()
}

pub fn format_fragment(id: &DiagramId) -> String {
    format!("{ROUTE_PREFIX}{id}")
}

/// Resolves a navigation: an existing id becomes active, anything else falls back to the most
/// recently modified map. Returns whether the addressed map itself was found.
pub fn navigate(session: &mut Session, fragment: &str) -> bool {
    if let Some(id) = parse_fragment(fragment) {
        if session.select(&id) {
            tracing::debug!(route = fragment, "navigated");
            return true;
        }
    }

    let fallback = session.most_recent().map(|diagram| diagram.id().clone());
    if let Some(id) = fallback {
        tracing::debug!(route = fragment, fallback = %id, "route not found; using most recent map");
        session.select(&id);
    }
    false
}

/// Receives the fragment of the active map whenever it changes.
pub trait RouteSink {
    fn publish(&mut self, fragment: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullRouteSink;

impl RouteSink for NullRouteSink {
    fn publish(&mut self, _fragment: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Remembers the last published fragment next to the saved maps so a relaunch reopens it.
#[derive(Debug, Clone)]
pub struct FileRouteSink {
    store: FileStore,
}

impl FileRouteSink {
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }

    pub fn remembered(&self) -> Option<String> {
        match self.store.get(ROUTE_KEY) {
            Ok(value) => value.map(|raw| raw.trim().to_owned()),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read last route");
                None
            }
        }
    }
}

impl RouteSink for FileRouteSink {
    fn publish(&mut self, fragment: &str) -> Result<(), StoreError> {
        self.store.set(ROUTE_KEY, fragment)
    }
}

/// Keeps every published fragment in memory; clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct MemoryRouteSink {
    history: Rc<RefCell<Vec<String>>>,
}

impl MemoryRouteSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.history.borrow().last().cloned()
    }
}

impl RouteSink for MemoryRouteSink {
    fn publish(&mut self, fragment: &str) -> Result<(), StoreError> {
        self.history.borrow_mut().push(fragment.to_owned());
        Ok(())
    }
}
