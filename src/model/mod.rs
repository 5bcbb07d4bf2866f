pub mod catalog;
pub mod ring;
pub mod scene;
pub mod state;

pub use catalog::Catalog;
pub use scene::{build_system, SceneGraph};
pub use state::{SceneState, ShaderState};
