//! Resource descriptors.
//!
//! Decoding image, mesh, shader, font and audio data happens outside the
//! engine core. These types carry only what the rest of the engine needs to
//! know about a loaded resource.

use engine_math::Vec3;
use serde::{Deserialize, Serialize};

/// A loaded 2D texture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
}

impl Texture {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A loaded triangle mesh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertex_count: u32,
    pub index_count: u32,
}

impl Mesh {
    #[must_use]
    pub fn new(vertex_count: u32, index_count: u32) -> Self {
        Self {
            vertex_count,
            index_count,
        }
    }
}

/// A linked shader program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderProgram {
    /// Source label of the vertex stage.
    pub vertex: String,
    /// Source label of the fragment stage.
    pub fragment: String,
}

impl ShaderProgram {
    #[must_use]
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// A rasterised font atlas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    /// Glyph height in pixels.
    pub size: f32,
}

impl Font {
    #[must_use]
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

/// A decoded audio buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioClip {
    pub sample_rate: u32,
    pub duration_secs: f32,
}

impl AudioClip {
    #[must_use]
    pub fn new(sample_rate: u32, duration_secs: f32) -> Self {
        Self {
            sample_rate,
            duration_secs,
        }
    }
}

/// Playback state of an audio emitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioSource {
    pub pitch: f32,
    pub gain: f32,
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Default for AudioSource {
    fn default() -> Self {
        Self {
            pitch: 1.0,
            gain: 1.0,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
        }
    }
}
