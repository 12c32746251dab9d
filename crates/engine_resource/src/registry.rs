//! Name-keyed resource registries.
//!
//! A [`Registry`] maps names to loaded resources of a single category. A
//! [`ResourceKit`] bundles one registry per category. Several kits may be in
//! play at once (for example an engine-wide kit and a per-level kit); lookups
//! across kits always go in the order the kits are supplied.

use std::collections::BTreeMap;

use crate::asset::{AudioClip, Font, Mesh, ShaderProgram, Texture};
use crate::handle::Handle;

/// Named resources of one category.
#[derive(Debug)]
pub struct Registry<T> {
    resources: BTreeMap<String, Handle<T>>,
}

impl<T> Registry<T> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resources: BTreeMap::new(),
        }
    }

    /// Store `resource` under `name`.
    ///
    /// Returns the resource previously registered under that name, if any.
    pub fn insert(&mut self, name: impl Into<String>, resource: Handle<T>) -> Option<Handle<T>> {
        let name = name.into();
        let previous = self.resources.insert(name.clone(), resource);
        if previous.is_some() {
            tracing::debug!(%name, "resource name re-registered, previous handle replaced");
        }
        previous
    }

    /// Look up a resource by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Handle<T>> {
        self.resources.get(name)
    }

    /// Find the name `resource` is registered under.
    ///
    /// This is a linear scan comparing by identity. If the same handle is
    /// registered under several names, the lexicographically first name wins.
    #[must_use]
    pub fn name_of(&self, resource: &Handle<T>) -> Option<&str> {
        self.resources
            .iter()
            .find(|(_, r)| r.ptr_eq(resource))
            .map(|(name, _)| name.as_str())
    }

    /// Iterate `(name, handle)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Handle<T>)> {
        self.resources.iter().map(|(n, r)| (n.as_str(), r))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// One registry per resource category.
#[derive(Debug, Default)]
pub struct ResourceKit {
    pub shader_programs: Registry<ShaderProgram>,
    pub textures: Registry<Texture>,
    pub meshes: Registry<Mesh>,
    pub fonts: Registry<Font>,
    pub audio_clips: Registry<AudioClip>,
}

impl ResourceKit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `resource` under `name` in the registry for its category.
    pub fn insert<T: Resource>(
        &mut self,
        name: impl Into<String>,
        resource: Handle<T>,
    ) -> Option<Handle<T>> {
        T::registry_mut(self).insert(name, resource)
    }
}

/// A resource category that has a registry in every [`ResourceKit`].
pub trait Resource: Sized {
    /// Short category label used in log output.
    const CATEGORY: &'static str;

    fn registry(kit: &ResourceKit) -> &Registry<Self>;

    fn registry_mut(kit: &mut ResourceKit) -> &mut Registry<Self>;
}

impl Resource for ShaderProgram {
    const CATEGORY: &'static str = "shader program";

    fn registry(kit: &ResourceKit) -> &Registry<Self> {
        &kit.shader_programs
    }

    fn registry_mut(kit: &mut ResourceKit) -> &mut Registry<Self> {
        &mut kit.shader_programs
    }
}

impl Resource for Texture {
    const CATEGORY: &'static str = "texture";

    fn registry(kit: &ResourceKit) -> &Registry<Self> {
        &kit.textures
    }

    fn registry_mut(kit: &mut ResourceKit) -> &mut Registry<Self> {
        &mut kit.textures
    }
}

impl Resource for Mesh {
    const CATEGORY: &'static str = "mesh";

    fn registry(kit: &ResourceKit) -> &Registry<Self> {
        &kit.meshes
    }

    fn registry_mut(kit: &mut ResourceKit) -> &mut Registry<Self> {
        &mut kit.meshes
    }
}

impl Resource for Font {
    const CATEGORY: &'static str = "font";

    fn registry(kit: &ResourceKit) -> &Registry<Self> {
        &kit.fonts
    }

    fn registry_mut(kit: &mut ResourceKit) -> &mut Registry<Self> {
        &mut kit.fonts
    }
}

impl Resource for AudioClip {
    const CATEGORY: &'static str = "audio clip";

    fn registry(kit: &ResourceKit) -> &Registry<Self> {
        &kit.audio_clips
    }

    fn registry_mut(kit: &mut ResourceKit) -> &mut Registry<Self> {
        &mut kit.audio_clips
    }
}

/// Find the name of `resource` in the first kit that holds it.
pub fn name_in_kits<'k, T: Resource + 'k>(
    kits: &[&'k ResourceKit],
    resource: &Handle<T>,
) -> Option<&'k str> {
    kits.iter()
        .find_map(|&kit| T::registry(kit).name_of(resource))
}

/// Resolve `name` against each kit in order, returning the first hit.
pub fn find_in_kits<T: Resource>(kits: &[&ResourceKit], name: &str) -> Option<Handle<T>> {
    kits.iter()
        .find_map(|&kit| T::registry(kit).get(name).cloned())
}
