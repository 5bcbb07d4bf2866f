use std::path::PathBuf;

use clap::Parser;

/// Interactive solar system with a procedurally shaded sun.
#[derive(Debug, Clone, Parser)]
#[command(name = "orrery")]
pub struct Args {
    /// Directory holding the planet textures and the `cubeMaps/` skybox faces
    #[arg(long, default_value = "textures/solar")]
    pub textures: PathBuf,

    /// Initial window width, in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height, in pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Frame rate cap; 0 means uncapped. Orbits advance once per frame, so this also
    /// sets how fast the planets move.
    #[arg(long, default_value_t = 60)]
    pub framerate: u64,

    /// Start with the orbits frozen (Space toggles)
    #[arg(long)]
    pub paused: bool,
}

impl Args {
    pub fn framerate_limit(&self) -> Option<u64> {
        match self.framerate {
            0 => None,
            fps => Some(fps),
        }
    }
}
