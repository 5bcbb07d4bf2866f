use std::error::Error;

use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;
use nalgebra::Point3;

use rust_orrery::assets::TextureLibrary;
use rust_orrery::config::Args;
use rust_orrery::gui::Simulation;
use rust_orrery::model::{build_system, Catalog, SceneState};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let textures = TextureLibrary::new(&args.textures)?;
    log::info!("Loading textures from {}", textures.root().display());

    let mut window = Window::new_with_size("Solar System", args.width, args.height);
    // The sun is the only light source
    window.set_light(Light::Absolute(Point3::origin()));
    window.set_framerate_limit(args.framerate_limit());

    // Resizes arrive as framebuffer sizes, so start from the framebuffer too
    let graph = build_system(&Catalog::solar_system());
    let state = SceneState::new(graph, window.width(), window.height());

    let simulation = Simulation::new(state, &textures, args.paused, &mut window);
    window.render_loop(simulation);

    Ok(())
}
