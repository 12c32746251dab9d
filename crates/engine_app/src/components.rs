//! Components used by the breakout demo scene.

use std::any::Any;

use engine_component::{Component, ComponentError, ComponentType, Properties, Value};
use engine_math::Vec2;
use engine_resource::{Font, Handle, Material, Mesh, ShaderProgram};

/// Remaining hits before the owner is destroyed.
#[derive(Debug, Clone, PartialEq)]
pub struct Health {
    pub hits: i32,
}

impl Component for Health {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn properties(&self) -> Vec<(&'static str, Value)> {
        vec![("hits", self.hits.into())]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ComponentType for Health {
    const TYPE_NAME: &'static str = "engine_app::components::Health";

    fn from_properties(p: &mut Properties) -> Result<Self, ComponentError> {
        Ok(Self {
            hits: p.required("hits")?,
        })
    }
}

/// Axis-aligned collision box relative to the owner's position.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxCollider {
    pub offset: Vec2,
    pub dimensions: Vec2,
    /// Ids of the colliders touched during the last step.
    pub collisions: Vec<i64>,
}

impl BoxCollider {
    #[must_use]
    pub fn new(dimensions: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            dimensions,
            collisions: Vec::new(),
        }
    }
}

impl Component for BoxCollider {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn properties(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("offset", self.offset.into()),
            ("dimensions", self.dimensions.into()),
            ("collisions", self.collisions.clone().into()),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ComponentType for BoxCollider {
    const TYPE_NAME: &'static str = "engine_app::components::BoxCollider";

    fn from_properties(p: &mut Properties) -> Result<Self, ComponentError> {
        Ok(Self {
            offset: p.or_default("offset")?,
            dimensions: p.required("dimensions")?,
            collisions: p.or_default("collisions")?,
        })
    }
}

/// Drops a power-up when the owner is destroyed.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerupSpawner {
    pub probability: f32,
}

impl Default for PowerupSpawner {
    fn default() -> Self {
        Self { probability: 1.0 }
    }
}

impl Component for PowerupSpawner {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn properties(&self) -> Vec<(&'static str, Value)> {
        vec![("probability", self.probability.into())]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ComponentType for PowerupSpawner {
    const TYPE_NAME: &'static str = "engine_app::components::PowerupSpawner";

    fn from_properties(p: &mut Properties) -> Result<Self, ComponentError> {
        let probability = p.optional("probability")?;
        Ok(Self {
            probability: probability.unwrap_or(Self::default().probability),
        })
    }
}

/// Something drawn with a mesh, material and shader.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub mesh: Handle<Mesh>,
    pub material: Material,
    pub shader: Handle<ShaderProgram>,
}

impl Component for Model {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn properties(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("mesh", self.mesh.clone().into()),
            ("material", self.material.clone().into()),
            ("shader", self.shader.clone().into()),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ComponentType for Model {
    const TYPE_NAME: &'static str = "engine_app::components::Model";

    fn from_properties(p: &mut Properties) -> Result<Self, ComponentError> {
        Ok(Self {
            mesh: p.required("mesh")?,
            material: p.or_default("material")?,
            shader: p.required("shader")?,
        })
    }
}

/// On-screen text.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub font: Option<Handle<Font>>,
}

impl Component for Label {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn properties(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("text", self.text.as_str().into()),
            ("font", self.font.clone().into()),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ComponentType for Label {
    const TYPE_NAME: &'static str = "engine_app::components::Label";

    fn from_properties(p: &mut Properties) -> Result<Self, ComponentError> {
        Ok(Self {
            text: p.or_default("text")?,
            font: p.or_default("font")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_powerup_probability_defaults_to_one() {
        let spawner = PowerupSpawner::from_properties(&mut Properties::new(
            PowerupSpawner::TYPE_NAME,
        ))
        .unwrap();
        assert_eq!(spawner.probability, 1.0);
    }

    #[test]
    fn test_box_collider_properties_round_trip() {
        let collider = BoxCollider {
            offset: Vec2::new(0.5, 0.0),
            dimensions: Vec2::new(2.0, 1.0),
            collisions: vec![4, 9],
        };
        let mut props = Properties::new(BoxCollider::TYPE_NAME);
        for (name, value) in collider.properties() {
            props.insert(name, value);
        }
        assert_eq!(BoxCollider::from_properties(&mut props).unwrap(), collider);
    }
}
