// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Evomap: a terminal editor for value chain / evolution maps.
//!
//! A [`model::Session`] holds every saved map. [`workspace::Workspace`] dispatches editing
//! commands against it, persists the collection through a [`store::KeyValueStore`] and publishes
//! the active map's `#/map/<id>` route. [`render`] turns a map into a character canvas with a hit
//! index and [`tui`] drives it all from a terminal.

pub mod layout;
pub mod model;
pub mod ops;
pub mod render;
pub mod route;
pub mod store;
pub mod tui;
pub mod workspace;
