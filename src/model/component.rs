// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ids::ComponentId;

pub const AXIS_MIN: f64 = 0.0;
pub const AXIS_MAX: f64 = 100.0;

pub const NEW_COMPONENT_NAME: &str = "New Component";
pub const NEW_COMPONENT_VALUE: f64 = 60.0;
pub const NEW_COMPONENT_EVOLUTION: f64 = 30.0;

/// Saturating clamp onto the `[0, 100]` axis range. NaN maps to the lower bound.
pub fn clamp_axis(value: f64) -> f64 {
    if value.is_nan() {
        return AXIS_MIN;
    }
    value.clamp(AXIS_MIN, AXIS_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComponentType {
    #[default]
    Software,
    Hardware,
    Service,
}

impl ComponentType {
    pub const ALL: [Self; 3] = [Self::Software, Self::Hardware, Self::Service];

    pub const fn discriminant(self) -> u8 {
        match self {
            Self::Software => 0,
            Self::Hardware => 1,
            Self::Service => 2,
        }
    }

    pub fn from_discriminant(value: u64) -> Option<Self> {
        match value {
            0 => Some(Self::Software),
            1 => Some(Self::Hardware),
            2 => Some(Self::Service),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Software => "Software",
            Self::Hardware => "Hardware",
            Self::Service => "Service",
        }
    }

    /// The next variant in declaration order, wrapping around.
    pub const fn cycle(self) -> Self {
        match self {
            Self::Software => Self::Hardware,
            Self::Hardware => Self::Service,
            Self::Service => Self::Software,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Persisted as the numeric discriminant so stored maps stay compatible with the browser format.
impl Serialize for ComponentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.discriminant())
    }
}

impl<'de> Deserialize<'de> for ComponentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ComponentTypeVisitor;

        impl Visitor<'_> for ComponentTypeVisitor {
            type Value = ComponentType;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a component type discriminant (0..=2) or name")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                ComponentType::from_discriminant(value)
                    .ok_or_else(|| E::custom(format!("unknown component type {value}")))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                u64::try_from(value)
                    .ok()
                    .and_then(ComponentType::from_discriminant)
                    .ok_or_else(|| E::custom(format!("unknown component type {value}")))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                ComponentType::ALL
                    .into_iter()
                    .find(|ty| ty.label().eq_ignore_ascii_case(value))
                    .ok_or_else(|| E::custom(format!("unknown component type {value:?}")))
            }
        }

        deserializer.deserialize_any(ComponentTypeVisitor)
    }
}

/// A semantic position on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub evolution: f64,
    pub value: f64,
}

impl Position {
    pub fn new(evolution: f64, value: f64) -> Self {
        Self {
            evolution: clamp_axis(evolution),
            value: clamp_axis(value),
        }
    }
}

/// The four labelled bands of the evolution axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvolutionStage {
    Genesis,
    Custom,
    Product,
    Commodity,
}

impl EvolutionStage {
    pub const ALL: [Self; 4] = [Self::Genesis, Self::Custom, Self::Product, Self::Commodity];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Genesis => "Genesis",
            Self::Custom => "Custom Built",
            Self::Product => "Product (+rental)",
            Self::Commodity => "Commodity (+utility)",
        }
    }

    pub fn from_evolution(evolution: f64) -> Self {
        let band = (clamp_axis(evolution) / (AXIS_MAX / Self::ALL.len() as f64)).floor() as usize;
        Self::ALL[band.min(Self::ALL.len() - 1)]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    id: ComponentId,
    name: String,
    value: f64,
    evolution: f64,
    #[serde(rename = "type", default)]
    component_type: ComponentType,
    #[serde(default)]
    dependencies: Vec<ComponentId>,
}

impl Component {
    pub fn new(id: ComponentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            value: NEW_COMPONENT_VALUE,
            evolution: NEW_COMPONENT_EVOLUTION,
            component_type: ComponentType::Software,
            dependencies: Vec::new(),
        }
    }

    pub fn new_with(
        id: ComponentId,
        name: impl Into<String>,
        position: Position,
        component_type: ComponentType,
        dependencies: Vec<ComponentId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            value: position.value,
            evolution: position.evolution,
            component_type,
            dependencies,
        }
    }

    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = clamp_axis(value);
    }

    pub fn evolution(&self) -> f64 {
        self.evolution
    }

    pub fn set_evolution(&mut self, evolution: f64) {
        self.evolution = clamp_axis(evolution);
    }

    pub fn position(&self) -> Position {
        Position {
            evolution: self.evolution,
            value: self.value,
        }
    }

    pub fn set_position(&mut self, position: Position) {
        self.set_evolution(position.evolution);
        self.set_value(position.value);
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn set_component_type(&mut self, component_type: ComponentType) {
        self.component_type = component_type;
    }

    pub fn stage(&self) -> EvolutionStage {
        EvolutionStage::from_evolution(self.evolution)
    }

    pub fn dependencies(&self) -> &[ComponentId] {
        &self.dependencies
    }

    pub fn depends_on(&self, target: &ComponentId) -> bool {
        self.dependencies.contains(target)
    }

    /// Appends `target` unless already present. Returns whether the list changed.
    pub fn add_dependency(&mut self, target: ComponentId) -> bool {
        if self.depends_on(&target) {
            return false;
        }
        self.dependencies.push(target);
        true
    }

    /// Drops every occurrence of `target`. Returns whether the list changed.
    pub fn remove_dependency(&mut self, target: &ComponentId) -> bool {
        let before = self.dependencies.len();
        self.dependencies.retain(|dep| dep != target);
        self.dependencies.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::{clamp_axis, Component, ComponentType, EvolutionStage, Position};
    use crate::model::ComponentId;

    fn cid(value: &str) -> ComponentId {
        ComponentId::new(value).expect("component id")
    }

    #[test]
    fn new_component_uses_defaults() {
        let component = Component::new(cid("node_1"), "New Component");
        assert_eq!(component.value(), 60.0);
        assert_eq!(component.evolution(), 30.0);
        assert_eq!(component.component_type(), ComponentType::Software);
        assert!(component.dependencies().is_empty());
    }

    #[test]
    fn clamp_axis_saturates_and_swallows_nan() {
        assert_eq!(clamp_axis(-4.0), 0.0);
        assert_eq!(clamp_axis(140.0), 100.0);
        assert_eq!(clamp_axis(f64::INFINITY), 100.0);
        assert_eq!(clamp_axis(f64::NAN), 0.0);
        assert_eq!(clamp_axis(42.5), 42.5);
    }

    #[test]
    fn position_setters_clamp() {
        let mut component = Component::new(cid("a"), "A");
        component.set_position(Position {
            evolution: 120.0,
            value: -3.0,
        });
        assert_eq!(component.evolution(), 100.0);
        assert_eq!(component.value(), 0.0);
    }

    #[test]
    fn dependency_helpers_keep_set_semantics_and_order() {
        let mut component = Component::new(cid("a"), "A");
        assert!(component.add_dependency(cid("c")));
        assert!(component.add_dependency(cid("b")));
        assert!(!component.add_dependency(cid("c")));
        assert_eq!(component.dependencies(), &[cid("c"), cid("b")]);

        assert!(component.remove_dependency(&cid("c")));
        assert!(!component.remove_dependency(&cid("c")));
        assert_eq!(component.dependencies(), &[cid("b")]);
    }

    #[test]
    fn component_type_round_trips_through_its_discriminant() {
        let json = serde_json::to_string(&ComponentType::Service).expect("serialize");
        assert_eq!(json, "2");
        let parsed: ComponentType = serde_json::from_str("1").expect("numeric");
        assert_eq!(parsed, ComponentType::Hardware);
        let parsed: ComponentType = serde_json::from_str("\"service\"").expect("named");
        assert_eq!(parsed, ComponentType::Service);
        serde_json::from_str::<ComponentType>("7").unwrap_err();
    }

    #[test]
    fn component_type_cycle_visits_every_variant() {
        let mut ty = ComponentType::Software;
        for expected in [ComponentType::Hardware, ComponentType::Service, ComponentType::Software] {
            ty = ty.cycle();
            assert_eq!(ty, expected);
        }
    }

    #[test]
    fn evolution_stage_bands_split_the_axis_in_quarters() {
        assert_eq!(EvolutionStage::from_evolution(0.0), EvolutionStage::Genesis);
        assert_eq!(EvolutionStage::from_evolution(24.9), EvolutionStage::Genesis);
        assert_eq!(EvolutionStage::from_evolution(25.0), EvolutionStage::Custom);
        assert_eq!(EvolutionStage::from_evolution(60.0), EvolutionStage::Product);
        assert_eq!(EvolutionStage::from_evolution(100.0), EvolutionStage::Commodity);
    }

    #[test]
    fn component_json_uses_the_persisted_field_names() {
        let component = Component::new_with(
            cid("power"),
            "Power",
            Position::new(98.0, 2.0),
            ComponentType::Service,
            Vec::new(),
        );
        let value = serde_json::to_value(&component).expect("serialize");
        assert_eq!(value["id"], "power");
        assert_eq!(value["type"], 2);
        assert_eq!(value["evolution"], 98.0);
        assert_eq!(value["value"], 2.0);
        assert_eq!(value["dependencies"], serde_json::json!([]));
    }
}
