// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for the map collection.
//!
//! The whole collection lives under one key of a [`KeyValueStore`] as a JSON array. Loading never
//! fails on malformed content: it seeds a fresh map instead and reports what happened.

mod file_store;

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::model::fixtures::{default_components, FALLBACK_MAP_NAME, SEEDED_MAP_NAME};
use crate::model::{Diagram, Session};

pub use file_store::{FileStore, WriteDurability};

pub const STORAGE_KEY: &str = "wardley-maps";

/// Minimal string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process storage for demos and tests. Nothing survives the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: impl Into<String>) -> Self {
        self.entries.insert(key.to_owned(), value.into());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Json { key: String, source: serde_json::Error },
    InvalidKey { key: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {}: {source}", path.display()),
            Self::Json { key, source } => write!(f, "json error for key {key:?}: {source}"),
            Self::InvalidKey { key } => write!(f, "invalid storage key {key:?}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidKey { .. } => None,
        }
    }
}

/// How [`load_session`] arrived at its collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    Loaded { maps: usize, backfilled: usize },
    /// Nothing stored yet.
    SeededFresh,
    /// Stored JSON parsed but held no maps.
    SeededEmpty,
    /// Stored content could not be parsed.
    Recovered { error: String },
}

impl LoadReport {
    pub fn seeded(&self) -> bool {
        !matches!(self, Self::Loaded { .. })
    }
}

/// Reads the collection, seeding a starter map when storage is empty or unreadable.
///
/// The returned session has no active map; callers pick one through routing.
pub fn load_session(
    kv: &dyn KeyValueStore,
    now: u64,
) -> Result<(Session, LoadReport), StoreError> {
    let Some(raw) = kv.get(STORAGE_KEY)?.filter(|raw| !raw.is_empty()) else {
        tracing::info!(key = STORAGE_KEY, "no saved maps; seeding default map");
        return Ok((seed(SEEDED_MAP_NAME, true, now), LoadReport::SeededFresh));
    };

    let value = match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(value) => value,
        Err(err) => return Ok(recover(err, now)),
    };

    let non_empty = value.as_array().is_some_and(|maps| !maps.is_empty());
    if !non_empty {
        tracing::info!(key = STORAGE_KEY, "saved maps are empty; seeding default map");
        return Ok((seed(FALLBACK_MAP_NAME, true, now), LoadReport::SeededEmpty));
    }

    let mut diagrams = match serde_json::from_value::<Vec<Diagram>>(value) {
        Ok(diagrams) => diagrams,
        Err(err) => return Ok(recover(err, now)),
    };

    let backfilled = diagrams
        .iter_mut()
        .map(Diagram::backfill_user_need)
        .filter(|changed| *changed)
        .count();
    tracing::debug!(maps = diagrams.len(), backfilled, "loaded saved maps");

    let maps = diagrams.len();
    Ok((
        Session::from_diagrams(diagrams),
        LoadReport::Loaded { maps, backfilled },
    ))
}

fn recover(err: serde_json::Error, now: u64) -> (Session, LoadReport) {
    tracing::error!(key = STORAGE_KEY, error = %err, "failed to load saved maps");
    (
        seed(FALLBACK_MAP_NAME, false, now),
        LoadReport::Recovered {
            error: err.to_string(),
        },
    )
}

fn seed(name: &str, with_components: bool, now: u64) -> Session {
    let mut session = Session::new();
    let components = if with_components {
        default_components()
    } else {
        Vec::new()
    };
    session.create(name, components, false, now);
    session
}

/// Writes the whole collection. An empty collection is never written.
pub fn save_session(kv: &mut dyn KeyValueStore, session: &Session) -> Result<bool, StoreError> {
    if session.is_empty() {
        return Ok(false);
    }
    let json = serde_json::to_string(session.diagrams()).map_err(|source| StoreError::Json {
        key: STORAGE_KEY.to_owned(),
        source,
    })?;
    kv.set(STORAGE_KEY, &json)?;
    Ok(true)
}

/// Forgets every saved map.
pub fn reset(kv: &mut dyn KeyValueStore) -> Result<(), StoreError> {
    tracing::warn!(key = STORAGE_KEY, "resetting saved maps");
    kv.remove(STORAGE_KEY)
}

#[cfg(test)]
mod tests;
