mod ring_material;
mod skybox_material;
mod sun_material;

pub use ring_material::RingMaterial;
pub use skybox_material::SkyboxMaterial;
pub use sun_material::SunMaterial;
