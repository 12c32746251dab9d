//! End-to-end save/load tests against real files.

use std::any::Any;

use engine_component::{Component, ComponentError, ComponentType, LeafKind, Properties, Value};
use engine_ecs::{EntityBlueprint, World};
use engine_math::{Quat, Transform, Vec2, Vec3, Vec4};
use engine_resource::{Handle, Material, Mesh, ResourceKit, ShaderProgram, Texture};
use engine_save::{CodecTable, Registry, SaveConfig, SaveError, SaveFile, SceneStore};

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct Health {
    current: i32,
    max: i32,
}

impl Component for Health {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn properties(&self) -> Vec<(&'static str, Value)> {
        vec![("current", self.current.into()), ("max", self.max.into())]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ComponentType for Health {
    const TYPE_NAME: &'static str = "tests::Health";

    fn from_properties(p: &mut Properties) -> Result<Self, ComponentError> {
        Ok(Self {
            current: p.required("current")?,
            max: p.required("max")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct BoxCollider {
    offset: Vec2,
    dimensions: Vec2,
    collisions: Vec<i64>,
    tags: Vec<String>,
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
            ("tags", self.tags.clone().into()),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ComponentType for BoxCollider {
    const TYPE_NAME: &'static str = "tests::BoxCollider";

    fn from_properties(p: &mut Properties) -> Result<Self, ComponentError> {
        Ok(Self {
            offset: p.or_default("offset")?,
            dimensions: p.required("dimensions")?,
            collisions: p.or_default("collisions")?,
            tags: p.or_default("tags")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Model {
    mesh: Option<Handle<Mesh>>,
    material: Material,
    shader: Option<Handle<ShaderProgram>>,
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
    const TYPE_NAME: &'static str = "tests::Model";

    fn from_properties(p: &mut Properties) -> Result<Self, ComponentError> {
        Ok(Self {
            mesh: p.or_default("mesh")?,
            material: p.required("material")?,
            shader: p.or_default("shader")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Caption {
    text: String,
    separator: char,
}

impl Component for Caption {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn properties(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("text", self.text.as_str().into()),
            ("separator", self.separator.into()),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ComponentType for Caption {
    const TYPE_NAME: &'static str = "tests::Caption";

    fn from_properties(p: &mut Properties) -> Result<Self, ComponentError> {
        Ok(Self {
            text: p.required("text")?,
            separator: p.required("separator")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

struct Fixture {
    kit: ResourceKit,
    mesh: Handle<Mesh>,
    shader: Handle<ShaderProgram>,
    texture: Handle<Texture>,
}

fn fixture() -> Fixture {
    let mesh = Handle::new(Mesh::new(4, 6));
    let shader = Handle::new(ShaderProgram::new("basic.vert", "basic.frag"));
    let texture = Handle::new(Texture::new(128, 64));
    let mut kit = ResourceKit::new();
    kit.insert("quad", mesh.clone());
    kit.insert("basic", shader.clone());
    kit.insert("bricks[blue]", texture.clone());
    Fixture {
        kit,
        mesh,
        shader,
        texture,
    }
}

fn registry_with(codecs: CodecTable) -> Registry {
    Registry::new(codecs)
        .with_component::<Health>()
        .with_component::<BoxCollider>()
        .with_component::<Model>()
        .with_component::<Caption>()
}

fn populated_world(fx: &Fixture) -> World {
    let mut world = World::new();
    world.spawn_blueprint(
        EntityBlueprint::new(Transform::new(
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::splat(2.0),
            Quat::from_rotation_z(0.25),
        ))
        .with(Health { current: 3, max: 5 })
        .with(BoxCollider {
            offset: Vec2::new(0.0, 0.5),
            dimensions: Vec2::new(1.0, 0.25),
            collisions: vec![1, -2, 3],
            tags: vec!["paddle]".into(), "a;b=c|d".into()],
        })
        .with(Model {
            mesh: Some(fx.mesh.clone()),
            material: Material::with_color(Vec4::new(1.0, 0.5, 0.0, 1.0))
                .textured(fx.texture.clone()),
            shader: Some(fx.shader.clone()),
        }),
    );
    world.spawn(Transform::from_position(Vec3::new(9.0, 8.0, 7.0)), vec![]);
    world
}

fn store_in<'r>(registry: &'r Registry, dir: &tempfile::TempDir) -> SceneStore<'r> {
    SceneStore::new(registry, SaveConfig::default().with_directory(dir.path()))
}

fn assert_same_world(original: &World, loaded: &World) {
    assert_eq!(loaded.entity_count(), original.entity_count());
    assert_eq!(loaded.component_count(), original.component_count());
    for ((a, a_data), (b, b_data)) in original.entities().zip(loaded.entities()) {
        assert_eq!(a_data.transform, b_data.transform);
        assert_eq!(a_data.components.len(), b_data.components.len());
        assert_eq!(original.get::<Health>(a), loaded.get::<Health>(b));
        assert_eq!(original.get::<BoxCollider>(a), loaded.get::<BoxCollider>(b));
        assert_eq!(original.get::<Model>(a), loaded.get::<Model>(b));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_save_and_load_two_entities() {
    let fx = fixture();
    let registry = registry_with(CodecTable::with_defaults());
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&registry, &dir);
    let world = populated_world(&fx);

    let saved = store.save("level1", &world, &[&fx.kit]).unwrap();
    assert_eq!(saved.path, dir.path().join("level1.sav"));
    assert_eq!(saved.entities, 2);
    assert_eq!(saved.components, 3);
    assert_eq!(saved.unregistered_values, 0);

    let mut loaded = World::new();
    let report = store.load("level1", &mut loaded, &[&fx.kit]).unwrap();
    assert_eq!(report.entities.len(), 2);
    assert_eq!(report.components, 3);
    assert_same_world(&world, &loaded);

    let model = loaded.get::<Model>(report.entities[0]).unwrap();
    assert!(model.material.texture.as_ref().unwrap().ptr_eq(&fx.texture));
    assert!(loaded.entity(report.entities[1]).unwrap().components.is_empty());
}

#[test]
fn test_file_is_readable_text() {
    let fx = fixture();
    let registry = registry_with(CodecTable::with_defaults());
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&registry, &dir);
    store.save("text", &populated_world(&fx), &[&fx.kit]).unwrap();

    let text = std::fs::read_to_string(dir.path().join("text.sav")).unwrap();
    assert!(text.starts_with("# Storage Handler Type Encodings\n0=i8\n"));
    assert!(text.contains("0=tests::Health\n"));
    assert!(text.contains("|current=2:3|max=2:5\n"));
    assert!(text.contains(r"tags=[C:paddle\];C:a\;b\=c\|d]"));
    assert!(text.ends_with("2;9,8,7,1,1,1,0,0,0,1;\n-\n"));
}

#[test]
fn test_load_with_different_codec_order() {
    let fx = fixture();
    let dir = tempfile::tempdir().unwrap();
    let world = populated_world(&fx);

    let saving = registry_with(CodecTable::with_defaults());
    store_in(&saving, &dir).save("ported", &world, &[&fx.kit]).unwrap();

    let mut reversed = LeafKind::ALL;
    reversed.reverse();
    let loading = registry_with(CodecTable::with_order(reversed));
    assert_ne!(
        saving.codecs().code_of(LeafKind::I32),
        loading.codecs().code_of(LeafKind::I32)
    );

    let mut loaded = World::new();
    store_in(&loading, &dir)
        .load("ported", &mut loaded, &[&fx.kit])
        .unwrap();
    assert_same_world(&world, &loaded);
}

#[test]
fn test_resources_missing_from_kits_load_as_absent() {
    let fx = fixture();
    let registry = registry_with(CodecTable::with_defaults());
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&registry, &dir);
    store.save("bare", &populated_world(&fx), &[]).unwrap();

    let mut loaded = World::new();
    let report = store.load("bare", &mut loaded, &[&fx.kit]).unwrap();
    let model = loaded.get::<Model>(report.entities[0]).unwrap();
    assert_eq!(model.mesh, None);
    assert_eq!(model.shader, None);
    assert!(!model.material.uses_texture());
}

#[test]
fn test_unregistered_leaf_values_are_counted() {
    let fx = fixture();
    let codecs = CodecTable::with_order(LeafKind::ALL.into_iter().filter(|k| *k != LeafKind::String));
    let registry = registry_with(codecs);
    let dir = tempfile::tempdir().unwrap();

    let saved = store_in(&registry, &dir)
        .save("lossy", &populated_world(&fx), &[&fx.kit])
        .unwrap();
    assert_eq!(saved.unregistered_values, 2);
}

#[test]
fn test_load_missing_save() {
    let registry = registry_with(CodecTable::with_defaults());
    let dir = tempfile::tempdir().unwrap();
    let err = store_in(&registry, &dir)
        .load("nope", &mut World::new(), &[])
        .unwrap_err();
    assert!(matches!(err, SaveError::SaveNotFound { ref name, .. } if name == "nope"));
}

#[test]
fn test_load_into_non_empty_world_fails() {
    let fx = fixture();
    let registry = registry_with(CodecTable::with_defaults());
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&registry, &dir);
    let mut world = populated_world(&fx);
    store.save("busy", &world, &[&fx.kit]).unwrap();

    let err = store.load("busy", &mut world, &[&fx.kit]).unwrap_err();
    assert!(matches!(err, SaveError::WorldNotEmpty { entities: 2 }));
    assert_eq!(world.entity_count(), 2);
}

#[test]
fn test_truncated_file_fails_without_touching_world() {
    let fx = fixture();
    let registry = registry_with(CodecTable::with_defaults());
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&registry, &dir);
    store.save("cut", &populated_world(&fx), &[&fx.kit]).unwrap();

    let path = dir.path().join("cut.sav");
    let text = std::fs::read_to_string(&path).unwrap();
    let cut = &text[..text.rfind("-\n").unwrap()];
    std::fs::write(&path, cut).unwrap();

    let mut loaded = World::new();
    let err = store.load("cut", &mut loaded, &[&fx.kit]).unwrap_err();
    assert!(matches!(err, SaveError::MalformedFile { .. }));
    assert!(loaded.is_empty());
}

#[test]
fn test_unknown_leaf_code_in_file() {
    let registry = registry_with(CodecTable::with_defaults());
    let text = "\
# Storage Handler Type Encodings
0=i32
-
# Component Type Encodings
0=tests::Health
-
# Components
1|0|current=0:1|max=9:2
-
# Entities
1;0,0,0,1,1,1,0,0,0,1;1
-
";
    let file = SaveFile::parse(text).unwrap();
    let store = SceneStore::new(&registry, SaveConfig::default());
    let err = store.decode(&file, &mut World::new(), &[]).unwrap_err();
    assert!(matches!(err, SaveError::MissingCodec { ref code } if code == "9"));
}

#[test]
fn test_handwritten_file_with_foreign_codes() {
    let registry = registry_with(CodecTable::with_defaults());
    let text = "\
# Storage Handler Type Encodings
x=glam::Vec2
y=i64
-
# Component Type Encodings
Q=tests::BoxCollider
-
# Components
40|Q|dimensions=x:2,3|collisions=[y:7;y:8]
-
# Entities
12;0,0,0,1,1,1,0,0,0,1;40
-
";
    let file = SaveFile::parse(text).unwrap();
    let store = SceneStore::new(&registry, SaveConfig::default());
    let mut world = World::new();
    let entities = store.decode(&file, &mut world, &[]).unwrap();
    let collider = world.get::<BoxCollider>(entities[0]).unwrap();
    assert_eq!(collider.dimensions, Vec2::new(2.0, 3.0));
    assert_eq!(collider.offset, Vec2::ZERO);
    assert_eq!(collider.collisions, vec![7, 8]);
    assert!(collider.tags.is_empty());
}

fn round_trip_caption(caption: Caption) -> Caption {
    let registry = registry_with(CodecTable::with_defaults());
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&registry, &dir);
    let mut world = World::new();
    world.spawn_blueprint(EntityBlueprint::new(Transform::IDENTITY).with(caption));
    store.save("caption", &world, &[]).unwrap();

    let mut loaded = World::new();
    let report = store.load("caption", &mut loaded, &[]).unwrap();
    loaded.get::<Caption>(report.entities[0]).unwrap().clone()
}

#[test]
fn test_whitespace_at_end_of_line_survives() {
    for caption in [
        Caption {
            text: "x".into(),
            separator: ' ',
        },
        Caption {
            text: "x".into(),
            separator: '\t',
        },
        Caption {
            text: "padded   ".into(),
            separator: ',',
        },
    ] {
        assert_eq!(round_trip_caption(caption.clone()), caption);
    }
}

#[test]
fn test_line_breaks_in_text_survive() {
    for caption in [
        Caption {
            text: "a\nb".into(),
            separator: '\n',
        },
        Caption {
            text: "windows\r\nline\r".into(),
            separator: '\r',
        },
    ] {
        assert_eq!(round_trip_caption(caption.clone()), caption);
    }
}

#[test]
fn test_saved_lines_never_break_inside_a_value() {
    let registry = registry_with(CodecTable::with_defaults());
    let dir = tempfile::tempdir().unwrap();
    let mut world = World::new();
    world.spawn_blueprint(EntityBlueprint::new(Transform::IDENTITY).with(Caption {
        text: "one\ntwo".into(),
        separator: '\n',
    }));
    store_in(&registry, &dir).save("lines", &world, &[]).unwrap();

    let text = std::fs::read_to_string(dir.path().join("lines.sav")).unwrap();
    let component_line = text.lines().find(|l| l.starts_with("1|")).unwrap();
    assert_eq!(component_line, r"1|0|text=C:one\ntwo|separator=B:\n");
}
