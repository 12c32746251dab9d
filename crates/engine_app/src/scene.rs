//! The breakout demo scene and its resources.

use engine_ecs::{EntityBlueprint, World};
use engine_math::{Transform, Vec2, Vec3, Vec4};
use engine_resource::{Font, Handle, Material, Mesh, ResourceKit, ShaderProgram, Texture};
use engine_save::Registry;

use crate::components::{BoxCollider, Health, Label, Model, PowerupSpawner};

const BRICK_COLUMNS: usize = 8;
const BRICK_SIZE: Vec2 = Vec2::new(1.0, 0.4);

/// Shared handles plus the kit they are registered in.
pub struct Assets {
    pub kit: ResourceKit,
    pub quad: Handle<Mesh>,
    pub shader: Handle<ShaderProgram>,
    pub bricks: Handle<Texture>,
    pub font: Handle<Font>,
}

impl Assets {
    #[must_use]
    pub fn load() -> Self {
        let quad = Handle::new(Mesh::new(4, 6));
        let shader = Handle::new(ShaderProgram::new("sprite.vert", "sprite.frag"));
        let bricks = Handle::new(Texture::new(256, 64));
        let font = Handle::new(Font::new("mono", 16.0));

        let mut kit = ResourceKit::new();
        kit.insert("quad", quad.clone());
        kit.insert("sprite", shader.clone());
        kit.insert("bricks", bricks.clone());
        kit.insert("mono:16", font.clone());

        Self {
            kit,
            quad,
            shader,
            bricks,
            font,
        }
    }
}

/// Every component type the scene uses.
#[must_use]
pub fn registry() -> Registry {
    Registry::with_default_codecs()
        .with_component::<Health>()
        .with_component::<BoxCollider>()
        .with_component::<PowerupSpawner>()
        .with_component::<Model>()
        .with_component::<Label>()
}

fn sprite(assets: &Assets, material: Material) -> Model {
    Model {
        mesh: assets.quad.clone(),
        material,
        shader: assets.shader.clone(),
    }
}

/// Paddle, ball, `rows` rows of bricks, a score label and an empty anchor.
#[must_use]
pub fn breakout(assets: &Assets, rows: usize) -> World {
    let mut world = World::new();

    world.spawn_blueprint(
        EntityBlueprint::new(Transform::from_position(Vec3::new(0.0, -4.0, 0.0)))
            .with(BoxCollider::new(Vec2::new(2.0, 0.3)))
            .with(sprite(assets, Material::with_color(Vec4::new(0.9, 0.9, 1.0, 1.0)))),
    );

    world.spawn_blueprint(
        EntityBlueprint::new(Transform::from_position(Vec3::new(0.0, -3.5, 0.0)).scaled(0.25))
            .with(BoxCollider::new(Vec2::splat(0.25)))
            .with(sprite(assets, Material::default())),
    );

    for row in 0..rows {
        for column in 0..BRICK_COLUMNS {
            let x = (column as f32 - (BRICK_COLUMNS as f32 - 1.0) / 2.0) * BRICK_SIZE.x;
            let y = 3.0 - row as f32 * BRICK_SIZE.y;
            let material = Material {
                kd: 0.8,
                ks: 0.2,
                ..Material::with_color(Vec4::new(1.0, 0.3 + 0.2 * row as f32, 0.2, 1.0))
            }
            .textured(assets.bricks.clone());

            let mut brick = EntityBlueprint::new(Transform::from_position(Vec3::new(x, y, 0.0)))
                .with(Health {
                    hits: i32::try_from(row + 1).unwrap_or(i32::MAX),
                })
                .with(BoxCollider::new(BRICK_SIZE))
                .with(sprite(assets, material));
            if column % 3 == 0 {
                brick = brick.with(PowerupSpawner {
                    probability: 0.25,
                });
            }
            world.spawn_blueprint(brick);
        }
    }

    world.spawn_blueprint(
        EntityBlueprint::new(Transform::from_position(Vec3::new(-5.0, 4.5, 0.0))).with(Label {
            text: "Score: 0 | Lives: 3".to_owned(),
            font: Some(assets.font.clone()),
        }),
    );

    world.spawn(Transform::IDENTITY, Vec::new());
    world
}

/// Compare two worlds entity by entity, ignoring identities.
///
/// Returns a description of the first difference found.
pub fn first_difference(expected: &World, actual: &World) -> Option<String> {
    if expected.entity_count() != actual.entity_count() {
        return Some(format!(
            "entity count {} != {}",
            expected.entity_count(),
            actual.entity_count()
        ));
    }
    for ((a, a_data), (b, b_data)) in expected.entities().zip(actual.entities()) {
        if a_data.transform != b_data.transform {
            return Some(format!("{a}: transform differs"));
        }
        let same = expected.get::<Health>(a) == actual.get::<Health>(b)
            && expected.get::<BoxCollider>(a) == actual.get::<BoxCollider>(b)
            && expected.get::<PowerupSpawner>(a) == actual.get::<PowerupSpawner>(b)
            && expected.get::<Model>(a) == actual.get::<Model>(b)
            && expected.get::<Label>(a) == actual.get::<Label>(b)
            && a_data.components.len() == b_data.components.len();
        if !same {
            return Some(format!("{a}: components differ"));
        }
    }
    None
}
