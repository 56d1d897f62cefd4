// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A session holds every saved map; each map holds components positioned on the value-chain and
//! evolution axes, linked by dependency edges.

pub mod component;
pub mod diagram;
pub mod fixtures;
pub mod ids;
pub mod session;

pub use component::{
    clamp_axis, Component, ComponentType, EvolutionStage, Position, AXIS_MAX, AXIS_MIN,
    NEW_COMPONENT_EVOLUTION, NEW_COMPONENT_NAME, NEW_COMPONENT_VALUE,
};
pub use diagram::{Diagram, DEFAULT_USER_NEED_DESCRIPTION, DEFAULT_USER_NEED_TITLE};
pub use ids::{now_millis, ComponentId, DiagramId, Id, IdAllocator, IdError};
pub use session::Session;
