//! Surface material description.

use engine_math::Vec4;

use crate::asset::Texture;
use crate::handle::Handle;

/// Visual properties used for lighting and texturing a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Diffuse lighting coefficient.
    pub kd: f32,
    /// Specular lighting coefficient.
    pub ks: f32,
    /// Specular exponent.
    pub alpha: f32,
    /// RGBA colour.
    pub color: Vec4,
    /// Optional texture sampled over the colour.
    pub texture: Option<Handle<Texture>>,
}

impl Material {
    /// An untextured material of the given colour.
    #[must_use]
    pub fn with_color(color: Vec4) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Attach a texture.
    #[must_use]
    pub fn textured(mut self, texture: Handle<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    #[must_use]
    pub fn r(&self) -> f32 {
        self.color.x
    }

    #[must_use]
    pub fn g(&self) -> f32 {
        self.color.y
    }

    #[must_use]
    pub fn b(&self) -> f32 {
        self.color.z
    }

    #[must_use]
    pub fn a(&self) -> f32 {
        self.color.w
    }

    /// Returns `true` if a texture is attached.
    #[must_use]
    pub fn uses_texture(&self) -> bool {
        self.texture.is_some()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kd: 1.0,
            ks: 0.0,
            alpha: 1.0,
            color: Vec4::ONE,
            texture: None,
        }
    }
}
