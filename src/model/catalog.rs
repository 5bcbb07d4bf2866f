/// Which image a body is painted with. The file names live with the asset code, this
/// is just the key.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum SurfaceTexture {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Moon,
    SaturnRing,
}

// All the immutable info about a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyInfo {
    pub name: String,
    /// Render scale of the body's sphere.
    pub radius: f32,
    /// Orbital radius, measured from the parent body.
    pub distance: f32,
    /// Radians per frame. Spin uses this directly, orbit uses a tenth of it.
    pub speed: f32,
    pub texture: SurfaceTexture,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingInfo {
    pub texture: SurfaceTexture,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    pub info: BodyInfo,
    pub ring: Option<RingInfo>,
    pub moons: Vec<CelestialBody>,
}

impl CelestialBody {
    pub fn new(name: &str, radius: f32, distance: f32, speed: f32, texture: SurfaceTexture) -> Self {
        CelestialBody {
            info: BodyInfo {
                name: name.to_owned(),
                radius,
                distance,
                speed,
                texture,
            },
            ring: None,
            moons: vec![],
        }
    }

    pub fn with_ring(mut self, texture: SurfaceTexture) -> Self {
        self.ring = Some(RingInfo { texture });
        self
    }

    pub fn with_moon(mut self, name: &str, radius: f32, distance: f32, speed: f32) -> Self {
        let moon = CelestialBody::new(name, radius, distance, speed, SurfaceTexture::Moon);
        self.moons.push(moon);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SunInfo {
    pub radius: f32,
    /// Radians per frame
    pub spin_rate: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub sun: SunInfo,
    pub planets: Vec<CelestialBody>,
}

impl Catalog {
    /// Our solar system. Sizes and distances are picked to look good on screen, not to
    /// be to scale.
    pub fn solar_system() -> Self {
        use SurfaceTexture::*;

        let planets = vec![
            CelestialBody::new("Mercury", 0.4, 20.0, 0.025, Mercury),
            CelestialBody::new("Venus", 0.9, 30.0, 0.018, Venus),
            CelestialBody::new("Earth", 1.0, 35.0, 0.012, Earth).with_moon("Moon", 0.25, 2.5, 0.04),
            CelestialBody::new("Mars", 0.6, 45.0, 0.009, Mars)
                .with_moon("Phobos", 0.1, 1.5, 0.06)
                .with_moon("Deimos", 0.08, 2.2, 0.045),
            CelestialBody::new("Jupiter", 4.5, 55.0, 0.006, Jupiter)
                .with_moon("Io", 0.3, 6.0, 0.05)
                .with_moon("Europa", 0.28, 7.5, 0.035)
                .with_moon("Ganymede", 0.4, 9.0, 0.02)
                .with_moon("Callisto", 0.35, 11.0, 0.015),
            CelestialBody::new("Saturn", 3.8, 75.0, 0.004, Saturn)
                .with_ring(SaturnRing)
                .with_moon("Titan", 0.5, 7.0, 0.03)
                .with_moon("Enceladus", 0.15, 5.0, 0.05),
            CelestialBody::new("Uranus", 2.2, 95.0, 0.0025, Uranus)
                .with_moon("Titania", 0.25, 4.0, 0.03),
            CelestialBody::new("Neptune", 2.1, 110.0, 0.0018, Neptune)
                .with_moon("Triton", 0.3, 4.5, 0.025),
        ];

        Catalog {
            sun: SunInfo {
                radius: 15.0,
                spin_rate: 0.001,
            },
            planets,
        }
    }
}
