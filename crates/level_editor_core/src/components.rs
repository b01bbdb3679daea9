// SPDX-License-Identifier: MIT OR Apache-2.0
//! Component system for entity composition.
//!
//! Components form a closed family selected by [`ComponentKind`]. Each kind
//! exposes a fixed property table, which is what the component-level selection
//! proxy mirrors.

use crate::entity::EntityId;
use crate::error::{EditError, Result};
use crate::notify::{ChangeNotifier, ChangeOrigin};
use crate::property::{Constraint, Inspectable, PropertyDescriptor};
use crate::value::{PropertyKind, PropertyValue};

/// Tag identifying a component type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    /// Position/rotation/scale
    Transform,
    /// Gameplay script attachment
    Script,
}

impl ComponentKind {
    /// Every component kind, in inspector order
    pub const ALL: [ComponentKind; 2] = [ComponentKind::Transform, ComponentKind::Script];

    /// Display name for UI and history labels
    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentKind::Transform => "Transform",
            ComponentKind::Script => "Script",
        }
    }

    /// Properties exposed by this kind
    pub fn properties(&self) -> &'static [PropertyDescriptor] {
        match self {
            ComponentKind::Transform => TRANSFORM_PROPERTIES,
            ComponentKind::Script => SCRIPT_PROPERTIES,
        }
    }
}

const fn axis(name: &'static str) -> PropertyDescriptor {
    PropertyDescriptor::new(name, PropertyKind::Float).with_constraint(Constraint::Finite)
}

const fn scale_axis(name: &'static str) -> PropertyDescriptor {
    PropertyDescriptor::new(name, PropertyKind::Float).with_constraint(Constraint::FiniteNonZero)
}

const TRANSFORM_PROPERTIES: &[PropertyDescriptor] = &[
    axis("position.x"),
    axis("position.y"),
    axis("position.z"),
    axis("rotation.x"),
    axis("rotation.y"),
    axis("rotation.z"),
    scale_axis("scale.x"),
    scale_axis("scale.y"),
    scale_axis("scale.z"),
];

const SCRIPT_PROPERTIES: &[PropertyDescriptor] =
    &[PropertyDescriptor::new("name", PropertyKind::Text).with_constraint(Constraint::NonEmptyText)];

/// Transform component data
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position (x, y, z)
    pub position: [f32; 3],
    /// Rotation in euler angles (degrees)
    pub rotation: [f32; 3],
    /// Scale
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

impl Transform {
    fn slot(&self, field: &str) -> Option<f32> {
        let value = match field {
            "position.x" => self.position[0],
            "position.y" => self.position[1],
            "position.z" => self.position[2],
            "rotation.x" => self.rotation[0],
            "rotation.y" => self.rotation[1],
            "rotation.z" => self.rotation[2],
            "scale.x" => self.scale[0],
            "scale.y" => self.scale[1],
            "scale.z" => self.scale[2],
            _ => return None,
        };
        Some(value)
    }

    fn slot_mut(&mut self, field: &str) -> Option<&mut f32> {
        let slot = match field {
            "position.x" => &mut self.position[0],
            "position.y" => &mut self.position[1],
            "position.z" => &mut self.position[2],
            "rotation.x" => &mut self.rotation[0],
            "rotation.y" => &mut self.rotation[1],
            "rotation.z" => &mut self.rotation[2],
            "scale.x" => &mut self.scale[0],
            "scale.y" => &mut self.scale[1],
            "scale.z" => &mut self.scale[2],
            _ => return None,
        };
        Some(slot)
    }
}

/// Script component for attaching gameplay logic
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    /// Name of the script type
    pub name: String,
}

impl Script {
    /// Create a script attachment
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Component payload
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentData {
    /// Transform
    Transform(Transform),
    /// Script
    Script(Script),
}

impl ComponentData {
    /// Kind tag of this payload
    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentData::Transform(_) => ComponentKind::Transform,
            ComponentData::Script(_) => ComponentKind::Script,
        }
    }
}

impl From<Transform> for ComponentData {
    fn from(value: Transform) -> Self {
        ComponentData::Transform(value)
    }
}

impl From<Script> for ComponentData {
    fn from(value: Script) -> Self {
        ComponentData::Script(value)
    }
}

/// A component attached to an entity
#[derive(Debug)]
pub struct Component {
    owner: EntityId,
    data: ComponentData,
    notifier: ChangeNotifier,
}

impl Component {
    /// Attach `data` to `owner`
    pub fn new(owner: EntityId, data: impl Into<ComponentData>) -> Self {
        Self {
            owner,
            data: data.into(),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Owning entity
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// Kind tag
    pub fn kind(&self) -> ComponentKind {
        self.data.kind()
    }

    /// Payload
    pub fn data(&self) -> &ComponentData {
        &self.data
    }

    /// Transform payload, if this is a transform
    pub fn as_transform(&self) -> Option<&Transform> {
        match &self.data {
            ComponentData::Transform(t) => Some(t),
            ComponentData::Script(_) => None,
        }
    }

    /// Script payload, if this is a script
    pub fn as_script(&self) -> Option<&Script> {
        match &self.data {
            ComponentData::Script(s) => Some(s),
            ComponentData::Transform(_) => None,
        }
    }
}

impl Inspectable for Component {
    fn properties(&self) -> &'static [PropertyDescriptor] {
        self.kind().properties()
    }

    fn get(&self, property: &str) -> Option<PropertyValue> {
        match &self.data {
            ComponentData::Transform(t) => t.slot(property).map(PropertyValue::Float),
            ComponentData::Script(s) => match property {
                "name" => Some(PropertyValue::Text(s.name.clone())),
                _ => None,
            },
        }
    }

    fn store(&mut self, property: &'static str, value: PropertyValue) -> Result<()> {
        match (&mut self.data, value) {
            (ComponentData::Transform(t), PropertyValue::Float(v)) => {
                let slot = t
                    .slot_mut(property)
                    .ok_or_else(|| EditError::UnknownProperty(property.to_string()))?;
                *slot = v;
                Ok(())
            }
            (ComponentData::Script(s), PropertyValue::Text(v)) if property == "name" => {
                s.name = v;
                Ok(())
            }
            (data, value) => Err(EditError::InvalidOperation(format!(
                "Cannot store {value} in {:?}.{property}",
                data.kind()
            ))),
        }
    }

    fn origin(&self) -> ChangeOrigin {
        ChangeOrigin {
            entity: self.owner,
            component: Some(self.kind()),
        }
    }

    fn notifier_mut(&mut self) -> &mut ChangeNotifier {
        &mut self.notifier
    }
}
