//! Saving a [`World`] to a file and loading it back.
//!
//! Saving walks the world's component groups, numbers their types afresh for
//! this file, and writes every component and entity line. The leaf codec
//! table is written too, so a later load can map the file's leaf codes to
//! whatever codes its own process assigned ([`Translation`]).
//!
//! Loading parses the whole file and rebuilds every component before the
//! world is touched. Entities are then added in one batch.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use engine_component::{Component, Entity, Properties};
use engine_ecs::{EntityBlueprint, World};
use engine_math::Transform;
use engine_resource::ResourceKit;
use tracing::{debug, info, warn};

use crate::codec::Translation;
use crate::config::SaveConfig;
use crate::error::SaveError;
use crate::format::{ComponentRecord, EntityRecord, SaveFile};
use crate::registry::Registry;
use crate::text::{Deserializer, Serializer};
use crate::type_code::TypeRegistry;

/// Summary of a completed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: PathBuf,
    pub entities: usize,
    pub components: usize,
    /// Leaf values written as `null` because their type has no codec.
    pub unregistered_values: usize,
}

/// Summary of a completed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub path: PathBuf,
    /// The loaded entities' identities in the new world, in file order.
    pub entities: Vec<Entity>,
    pub components: usize,
}

/// Reads and writes worlds using one [`Registry`] and [`SaveConfig`].
#[derive(Debug, Clone)]
pub struct SceneStore<'r> {
    registry: &'r Registry,
    config: SaveConfig,
}

impl<'r> SceneStore<'r> {
    #[must_use]
    pub fn new(registry: &'r Registry, config: SaveConfig) -> Self {
        Self { registry, config }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        self.registry
    }

    #[must_use]
    pub fn config(&self) -> &SaveConfig {
        &self.config
    }

    /// Save `world` as `name`.
    ///
    /// # Errors
    ///
    /// [`SaveError::Io`] if the save directory or file cannot be written.
    pub fn save(
        &self,
        name: &str,
        world: &World,
        kits: &[&ResourceKit],
    ) -> Result<SaveReport, SaveError> {
        let (file, unregistered_values) = self.encode(world, kits);
        let path = self.config.path_for(name);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;
        }
        fs::write(&path, file.render()).map_err(|source| io_error(&path, source))?;

        let report = SaveReport {
            path,
            entities: file.entities.len(),
            components: file.components.len(),
            unregistered_values,
        };
        info!(
            path = %report.path.display(),
            entities = report.entities,
            components = report.components,
            unregistered = report.unregistered_values,
            "world saved"
        );
        Ok(report)
    }

    /// Load the world saved as `name` into the empty `world`.
    ///
    /// # Errors
    ///
    /// - [`SaveError::SaveNotFound`] if there is no such save.
    /// - [`SaveError::Io`] if it cannot be read.
    /// - Any parse error from [`SaveFile::parse`] or decode error from
    ///   [`SceneStore::decode`]. The world is left untouched on error.
    pub fn load(
        &self,
        name: &str,
        world: &mut World,
        kits: &[&ResourceKit],
    ) -> Result<LoadReport, SaveError> {
        let path = self.config.path_for(name);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                return Err(SaveError::SaveNotFound {
                    name: name.to_owned(),
                    path,
                });
            }
            Err(source) => return Err(io_error(&path, source)),
        };
        let file = SaveFile::parse(&text)?;
        let entities = self.decode(&file, world, kits)?;

        let report = LoadReport {
            path,
            entities,
            components: file.components.len(),
        };
        info!(
            path = %report.path.display(),
            entities = report.entities.len(),
            components = report.components,
            "world loaded"
        );
        Ok(report)
    }

    /// Build the file model for `world`.
    ///
    /// Also returns how many leaf values had no codec and were written as
    /// `null`.
    #[must_use]
    pub fn encode(&self, world: &World, kits: &[&ResourceKit]) -> (SaveFile, usize) {
        let codecs = self.registry.codecs();
        let mut serializer = Serializer::new(codecs, kits);
        let mut component_types: TypeRegistry<&'static str> = TypeRegistry::new();
        let mut file = SaveFile {
            leaf_types: codecs
                .type_table()
                .map(|(code, name)| (code.clone(), name.to_owned()))
                .collect(),
            ..SaveFile::default()
        };

        for group in world.component_groups() {
            let type_name = group.type_name();
            if !self.registry.components().contains(type_name) {
                warn!(
                    component = type_name,
                    "component type is not registered; the save cannot be loaded until it is"
                );
            }
            component_types.register(type_name);
        }

        for group in world.component_groups() {
            let type_code = component_types.expect_code(&group.type_name());
            for slot in group.iter() {
                let fields = slot
                    .component
                    .properties()
                    .into_iter()
                    .map(|(name, value)| (name.to_owned(), serializer.serialize(&value)))
                    .collect();
                file.components.push(ComponentRecord {
                    line: 0,
                    id: slot.id.id(),
                    type_code: type_code.clone(),
                    fields,
                });
            }
        }
        file.component_types = component_types
            .iter()
            .map(|(name, code)| (code.clone(), (*name).to_owned()))
            .collect();

        file.entities = world
            .entities()
            .map(|(entity, data)| EntityRecord {
                line: 0,
                id: entity.id(),
                transform: data.transform.to_array(),
                components: data.components.iter().map(|c| c.id()).collect(),
            })
            .collect();

        debug!(
            component_types = file.component_types.len(),
            components = file.components.len(),
            entities = file.entities.len(),
            "world encoded"
        );
        (file, serializer.unregistered_count())
    }

    /// Rebuild the entities of `file` and add them to the empty `world`.
    ///
    /// Returns the new entities in file order.
    ///
    /// # Errors
    ///
    /// - [`SaveError::WorldNotEmpty`] if `world` already has entities.
    /// - [`SaveError::UnknownComponentType`] /
    ///   [`SaveError::UnregisteredComponent`] for component types that cannot
    ///   be resolved.
    /// - [`SaveError::Component`] if a component cannot be rebuilt from its
    ///   fields.
    /// - [`SaveError::DuplicateComponentId`] /
    ///   [`SaveError::UnknownComponentId`] for inconsistent ids.
    /// - Any value text error.
    pub fn decode(
        &self,
        file: &SaveFile,
        world: &mut World,
        kits: &[&ResourceKit],
    ) -> Result<Vec<Entity>, SaveError> {
        if !world.is_empty() {
            return Err(SaveError::WorldNotEmpty {
                entities: world.entity_count(),
            });
        }

        let codecs = self.registry.codecs();
        let translation = Translation::build(
            file.leaf_types.iter().map(|(code, name)| (code, name.as_str())),
            codecs,
        );
        let deserializer = Deserializer::new(codecs, kits).with_translation(&translation);
        let component_types: HashMap<&str, &str> = file
            .component_types
            .iter()
            .map(|(code, name)| (code.as_str(), name.as_str()))
            .collect();

        let mut components: HashMap<u64, Box<dyn Component>> =
            HashMap::with_capacity(file.components.len());
        for record in &file.components {
            if components.contains_key(&record.id) {
                return Err(SaveError::DuplicateComponentId {
                    line: record.line,
                    id: record.id,
                });
            }
            let component = self.build_component(record, &component_types, &deserializer)?;
            components.insert(record.id, component);
        }

        let mut blueprints = Vec::with_capacity(file.entities.len());
        for record in &file.entities {
            let mut blueprint = EntityBlueprint::new(Transform::from_array(record.transform));
            for &id in &record.components {
                let component = components.remove(&id).ok_or(SaveError::UnknownComponentId {
                    line: record.line,
                    id,
                })?;
                blueprint.components.push(component);
            }
            blueprints.push(blueprint);
        }

        if !components.is_empty() {
            let mut orphans: Vec<u64> = components.keys().copied().collect();
            orphans.sort_unstable();
            warn!(?orphans, "dropping components not attached to any entity");
        }

        Ok(world.insert_entities(blueprints))
    }

    fn build_component(
        &self,
        record: &ComponentRecord,
        component_types: &HashMap<&str, &str>,
        deserializer: &Deserializer<'_>,
    ) -> Result<Box<dyn Component>, SaveError> {
        let type_name = *component_types
            .get(record.type_code.as_str())
            .ok_or_else(|| SaveError::UnknownComponentType {
                line: record.line,
                code: record.type_code.to_string(),
            })?;
        let descriptor = self
            .registry
            .components()
            .descriptor(type_name)
            .ok_or_else(|| SaveError::UnregisteredComponent {
                type_name: type_name.to_owned(),
            })?;

        let mut properties = Properties::new(type_name);
        for (name, text) in &record.fields {
            properties.insert(name.as_str(), deserializer.deserialize(text)?);
        }
        let component = descriptor
            .build(&mut properties)
            .map_err(|source| SaveError::Component {
                line: record.line,
                source,
            })?;
        if !properties.is_empty() {
            debug!(
                component = type_name,
                fields = ?properties.remaining(),
                "ignoring saved fields the component no longer has"
            );
        }
        Ok(component)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> SaveError {
    SaveError::Io {
        path: path.to_owned(),
        source,
    }
}

/// Save `world` as `name` under the default [`SaveConfig`].
///
/// # Errors
///
/// See [`SceneStore::save`].
pub fn save(
    name: &str,
    world: &World,
    registry: &Registry,
    kits: &[&ResourceKit],
) -> Result<SaveReport, SaveError> {
    SceneStore::new(registry, SaveConfig::default()).save(name, world, kits)
}

/// Load the world saved as `name` under the default [`SaveConfig`].
///
/// # Errors
///
/// See [`SceneStore::load`].
pub fn load(
    name: &str,
    world: &mut World,
    registry: &Registry,
    kits: &[&ResourceKit],
) -> Result<LoadReport, SaveError> {
    SceneStore::new(registry, SaveConfig::default()).load(name, world, kits)
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use engine_component::{ComponentError, ComponentType, Value};
    use engine_math::Vec3;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Score {
        points: i64,
        label: Option<String>,
    }

    impl Component for Score {
        fn type_name(&self) -> &'static str {
            Self::TYPE_NAME
        }

        fn properties(&self) -> Vec<(&'static str, Value)> {
            vec![
                ("points", self.points.into()),
                ("label", self.label.clone().into()),
            ]
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    impl ComponentType for Score {
        const TYPE_NAME: &'static str = "test::Score";

        fn from_properties(p: &mut Properties) -> Result<Self, ComponentError> {
            Ok(Self {
                points: p.required("points")?,
                label: p.or_default("label")?,
            })
        }
    }

    fn registry() -> Registry {
        Registry::with_default_codecs().with_component::<Score>()
    }

    fn score(points: i64) -> Box<dyn Component> {
        Box::new(Score {
            points,
            label: Some("p1".into()),
        })
    }

    #[test]
    fn test_encode_numbers_component_types_per_save() {
        let registry = registry();
        let store = SceneStore::new(&registry, SaveConfig::default());
        let mut world = World::new();
        world.spawn(Transform::IDENTITY, vec![score(3)]);
        world.spawn(Transform::from_position(Vec3::X), vec![]);

        let (file, unregistered) = store.encode(&world, &[]);
        assert_eq!(unregistered, 0);
        assert_eq!(file.component_types.len(), 1);
        assert_eq!(file.component_types[0].0.as_str(), "0");
        assert_eq!(file.component_types[0].1, "test::Score");
        assert_eq!(file.leaf_types.len(), registry.codecs().len());
        assert_eq!(file.components.len(), 1);
        assert_eq!(file.components[0].fields[0], ("points".to_owned(), "3:3".to_owned()));
        assert_eq!(file.entities[1].components, Vec::<u64>::new());
    }

    #[test]
    fn test_decode_round_trip() {
        let registry = registry();
        let store = SceneStore::new(&registry, SaveConfig::default());
        let mut world = World::new();
        let original = world.spawn(Transform::from_position(Vec3::new(1.0, 2.0, 3.0)), vec![score(7)]);

        let (file, _) = store.encode(&world, &[]);
        let parsed = SaveFile::parse(&file.render()).unwrap();
        let mut loaded = World::new();
        let entities = store.decode(&parsed, &mut loaded, &[]).unwrap();

        assert_eq!(entities.len(), 1);
        assert_eq!(
            loaded.entity(entities[0]).unwrap().transform,
            world.entity(original).unwrap().transform
        );
        assert_eq!(loaded.get::<Score>(entities[0]), world.get::<Score>(original));
    }

    #[test]
    fn test_text_field_ending_in_spaces_survives_rendering() {
        let registry = registry();
        let store = SceneStore::new(&registry, SaveConfig::default());
        let mut world = World::new();
        let original = world.spawn(
            Transform::IDENTITY,
            vec![Box::new(Score {
                points: 2,
                label: Some("p1  ".into()),
            })],
        );

        let (file, _) = store.encode(&world, &[]);
        let parsed = SaveFile::parse(&file.render()).unwrap();
        let mut loaded = World::new();
        let entities = store.decode(&parsed, &mut loaded, &[]).unwrap();
        assert_eq!(loaded.get::<Score>(entities[0]), world.get::<Score>(original));
    }

    #[test]
    fn test_decode_into_non_empty_world() {
        let registry = registry();
        let store = SceneStore::new(&registry, SaveConfig::default());
        let mut world = World::new();
        world.spawn(Transform::IDENTITY, vec![]);
        let (file, _) = store.encode(&world, &[]);

        let err = store.decode(&file, &mut world, &[]).unwrap_err();
        assert!(matches!(err, SaveError::WorldNotEmpty { entities: 1 }));
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn test_missing_required_field_leaves_world_untouched() {
        let registry = registry();
        let store = SceneStore::new(&registry, SaveConfig::default());
        let mut world = World::new();
        world.spawn(Transform::IDENTITY, vec![score(1)]);
        let (mut file, _) = store.encode(&world, &[]);
        file.components[0].fields.retain(|(name, _)| name != "points");

        let mut loaded = World::new();
        let err = store.decode(&file, &mut loaded, &[]).unwrap_err();
        assert!(matches!(
            err,
            SaveError::Component {
                source: ComponentError::MissingField { ref field, .. },
                ..
            } if field == "points"
        ));
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_optional_field_absent_uses_default() {
        let registry = registry();
        let store = SceneStore::new(&registry, SaveConfig::default());
        let mut world = World::new();
        world.spawn(Transform::IDENTITY, vec![score(1)]);
        let (mut file, _) = store.encode(&world, &[]);
        file.components[0].fields.retain(|(name, _)| name != "label");

        let mut loaded = World::new();
        let entities = store.decode(&file, &mut loaded, &[]).unwrap();
        let loaded_score = loaded.get::<Score>(entities[0]).unwrap();
        assert_eq!(loaded_score.label, None);
    }

    #[test]
    fn test_unregistered_component_type() {
        let saving = registry();
        let loading = Registry::with_default_codecs();
        let mut world = World::new();
        world.spawn(Transform::IDENTITY, vec![score(1)]);
        let (file, _) = SceneStore::new(&saving, SaveConfig::default()).encode(&world, &[]);

        let err = SceneStore::new(&loading, SaveConfig::default())
            .decode(&file, &mut World::new(), &[])
            .unwrap_err();
        assert!(matches!(err, SaveError::UnregisteredComponent { ref type_name } if type_name == "test::Score"));
    }

    #[test]
    fn test_id_consistency_errors() {
        let registry = registry();
        let store = SceneStore::new(&registry, SaveConfig::default());
        let mut world = World::new();
        world.spawn(Transform::IDENTITY, vec![score(1)]);
        let (file, _) = store.encode(&world, &[]);

        let mut duplicate = file.clone();
        duplicate.components.push(duplicate.components[0].clone());
        assert!(matches!(
            store.decode(&duplicate, &mut World::new(), &[]),
            Err(SaveError::DuplicateComponentId { .. })
        ));

        let mut dangling = file.clone();
        dangling.entities[0].components.push(999);
        assert!(matches!(
            store.decode(&dangling, &mut World::new(), &[]),
            Err(SaveError::UnknownComponentId { id: 999, .. })
        ));

        let mut unknown_type = file;
        unknown_type.component_types.clear();
        assert!(matches!(
            store.decode(&unknown_type, &mut World::new(), &[]),
            Err(SaveError::UnknownComponentType { .. })
        ));
    }

    #[test]
    fn test_orphan_components_are_dropped() {
        let registry = registry();
        let store = SceneStore::new(&registry, SaveConfig::default());
        let mut world = World::new();
        world.spawn(Transform::IDENTITY, vec![score(1)]);
        let (mut file, _) = store.encode(&world, &[]);
        file.entities[0].components.clear();

        let mut loaded = World::new();
        store.decode(&file, &mut loaded, &[]).unwrap();
        assert_eq!(loaded.entity_count(), 1);
        assert_eq!(loaded.component_count(), 0);
    }
}
