//! # engine_app
//!
//! Builds the breakout demo scene, saves it, loads the file into a fresh
//! world and checks that nothing was lost on the way.

mod components;
mod scene;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use engine_ecs::World;
use engine_save::{SaveConfig, SceneStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "engine_app", about = "Save and reload a demo scene")]
struct Args {
    /// Name to save the scene under
    #[arg(short, long, default_value = "breakout")]
    name: String,

    /// Directory for save files, overriding the configuration
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// JSON save configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rows of bricks in the scene
    #[arg(short, long, default_value_t = 4)]
    rows: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("engine_app=info".parse()?)
                .add_directive("engine_save=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SaveConfig::from_json_file(path)
            .with_context(|| format!("reading save configuration {}", path.display()))?,
        None => SaveConfig::default(),
    };
    if let Some(dir) = args.dir {
        config = config.with_directory(dir);
    }

    let registry = scene::registry();
    let assets = scene::Assets::load();
    let store = SceneStore::new(&registry, config);

    let world = scene::breakout(&assets, args.rows);
    info!(
        entities = world.entity_count(),
        components = world.component_count(),
        "scene built"
    );

    let saved = store
        .save(&args.name, &world, &[&assets.kit])
        .with_context(|| format!("saving '{}'", args.name))?;

    let mut restored = World::new();
    let loaded = store
        .load(&args.name, &mut restored, &[&assets.kit])
        .with_context(|| format!("loading '{}'", args.name))?;

    if let Some(difference) = scene::first_difference(&world, &restored) {
        bail!("reloaded scene does not match the original: {difference}");
    }

    info!(
        path = %saved.path.display(),
        entities = loaded.entities.len(),
        components = loaded.components,
        "scene round-tripped"
    );
    Ok(())
}
