use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

use super::catalog::{Catalog, CelestialBody, SurfaceTexture};
use super::ring::{ring_orientation, RingGeometry};

/// How much slower a body orbits than it spins.
pub const ORBIT_RATE_FACTOR: f32 = 0.1;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrameID(pub usize);

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RingID(pub usize);

/// A sphere hung off an orbit frame. Its spin is its own; nothing else is attached to
/// it, so spinning never drags moons or rings along.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyMesh {
    pub name: String,
    pub scale: f32,
    pub offset: Vector3<f32>,
    pub texture: SurfaceTexture,
    pub spin_angle: f32,
    pub spin_rate: f32,
}

impl BodyMesh {
    pub fn local_transform(&self) -> Isometry3<f32> {
        Isometry3::from_parts(Translation3::from(self.offset), spin_rotation(self.spin_angle))
    }
}

/// A transform node whose rotation about its local y-axis is the orbital position of
/// its body.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitFrame {
    pub id: FrameID,
    /// None for frames hanging directly off the system root.
    pub parent: Option<FrameID>,
    pub translation: Vector3<f32>,
    pub orbit_angle: f32,
    pub orbit_rate: f32,
    pub body: BodyMesh,
    pub ring: Option<RingID>,
    pub children: Vec<FrameID>,
}

impl OrbitFrame {
    pub fn local_transform(&self) -> Isometry3<f32> {
        Isometry3::from_parts(
            Translation3::from(self.translation),
            spin_rotation(self.orbit_angle),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RingMesh {
    pub id: RingID,
    /// The frame the ring orbits with. The ring doesn't spin.
    pub frame: FrameID,
    pub geometry: RingGeometry,
    pub offset: Vector3<f32>,
    pub orientation: UnitQuaternion<f32>,
    pub texture: SurfaceTexture,
}

impl RingMesh {
    pub fn local_transform(&self) -> Isometry3<f32> {
        Isometry3::from_parts(Translation3::from(self.offset), self.orientation)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SunMesh {
    pub scale: f32,
    pub spin_angle: f32,
    pub spin_rate: f32,
}

/// The whole orrery as plain data. Frames are stored flat and refer to each other by
/// ID; a frame's children always come after it.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    pub sun: SunMesh,
    frames: Vec<OrbitFrame>,
    rings: Vec<RingMesh>,
}

/// Rotation about the vertical axis, which is how both orbits and spins are expressed.
pub fn spin_rotation(angle: f32) -> UnitQuaternion<f32> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angle)
}

/// Lays out the catalog as a hierarchy of orbit frames. Nothing here can fail; the
/// layout is entirely determined by the catalog. A ringed body with no radius is
/// built without its ring.
pub fn build_system(catalog: &Catalog) -> SceneGraph {
    let mut graph = SceneGraph {
        sun: SunMesh {
            scale: catalog.sun.radius,
            spin_angle: 0.0,
            spin_rate: catalog.sun.spin_rate,
        },
        frames: vec![],
        rings: vec![],
    };

    for planet in catalog.planets.iter() {
        graph.add_orbit(planet, None, Vector3::zeros());
    }
    graph
}

impl SceneGraph {
    fn add_orbit(
        &mut self,
        body: &CelestialBody,
        parent: Option<FrameID>,
        translation: Vector3<f32>,
    ) -> FrameID {
        let id = FrameID(self.frames.len());
        let offset = Vector3::x() * body.info.distance;

        let ring = body.ring.and_then(|ring_info| {
            let geometry = match RingGeometry::for_planet(body.info.radius) {
                Some(geometry) => geometry,
                None => {
                    log::warn!(
                        "{} has radius {}, too small for a ring; skipping it",
                        body.info.name,
                        body.info.radius
                    );
                    return None;
                }
            };
            let ring_id = RingID(self.rings.len());
            self.rings.push(RingMesh {
                id: ring_id,
                frame: id,
                geometry,
                offset,
                orientation: ring_orientation(),
                texture: ring_info.texture,
            });
            Some(ring_id)
        });

        self.frames.push(OrbitFrame {
            id,
            parent,
            translation,
            orbit_angle: 0.0,
            orbit_rate: body.info.speed * ORBIT_RATE_FACTOR,
            body: BodyMesh {
                name: body.info.name.clone(),
                scale: body.info.radius,
                offset,
                texture: body.info.texture,
                spin_angle: 0.0,
                spin_rate: body.info.speed,
            },
            ring,
            children: vec![],
        });

        // Moon frames sit on top of this body, so their orbits are centered on it
        for moon in body.moons.iter() {
            let child = self.add_orbit(moon, Some(id), offset);
            self.frames[id.0].children.push(child);
        }

        id
    }

    pub fn frames(&self) -> impl Iterator<Item = &OrbitFrame> {
        self.frames.iter()
    }

    pub fn frames_mut(&mut self) -> impl Iterator<Item = &mut OrbitFrame> {
        self.frames.iter_mut()
    }

    pub fn top_level_frames(&self) -> impl Iterator<Item = &OrbitFrame> {
        self.frames.iter().filter(|f| f.parent.is_none())
    }

    pub fn rings(&self) -> impl Iterator<Item = &RingMesh> {
        self.rings.iter()
    }

    pub fn get_frame(&self, id: FrameID) -> &OrbitFrame {
        &self.frames[id.0]
    }

    pub fn get_ring(&self, id: RingID) -> &RingMesh {
        &self.rings[id.0]
    }

    pub fn find_frame(&self, name: &str) -> Option<&OrbitFrame> {
        self.frames.iter().find(|f| f.body.name == name)
    }

    pub fn children(&self, id: FrameID) -> impl Iterator<Item = &OrbitFrame> {
        self.get_frame(id).children.iter().map(move |c| self.get_frame(*c))
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Transform from the frame's local space to the system root.
    pub fn frame_to_root(&self, id: FrameID) -> Isometry3<f32> {
        let frame = self.get_frame(id);
        let local = frame.local_transform();
        match frame.parent {
            Some(parent) => self.frame_to_root(parent) * local,
            None => local,
        }
    }

    /// Where the frame's origin is, in root space.
    pub fn frame_origin(&self, id: FrameID) -> Point3<f32> {
        self.frame_to_root(id) * Point3::origin()
    }

    /// Where the center of the frame's body is, in root space.
    pub fn body_position(&self, id: FrameID) -> Point3<f32> {
        let frame = self.get_frame(id);
        self.frame_to_root(id) * frame.body.local_transform() * Point3::origin()
    }

    /// Transform from the ring's local space to the system root. The ring follows its
    /// frame's orbit but not the planet's spin.
    pub fn ring_to_root(&self, id: RingID) -> Isometry3<f32> {
        let ring = self.get_ring(id);
        self.frame_to_root(ring.frame) * ring.local_transform()
    }

    /// Where the center of the ring is, in root space.
    pub fn ring_position(&self, id: RingID) -> Point3<f32> {
        self.ring_to_root(id) * Point3::origin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_ids_match_storage() {
        let graph = build_system(&Catalog::solar_system());
        for (idx, frame) in graph.frames().enumerate() {
            assert_eq!(frame.id, FrameID(idx));
            for child in frame.children.iter() {
                assert!(child.0 > idx);
                assert_eq!(graph.get_frame(*child).parent, Some(frame.id));
            }
        }
    }

    #[test]
    fn test_meshes_start_at_catalog_values() {
        let catalog = Catalog::solar_system();
        let graph = build_system(&catalog);

        approx::assert_relative_eq!(graph.sun.scale, 15.0);
        approx::assert_relative_eq!(graph.sun.spin_rate, 0.001);

        for planet in catalog.planets.iter() {
            let frame = graph.find_frame(&planet.info.name).unwrap();
            assert_eq!(frame.parent, None);
            approx::assert_relative_eq!(frame.translation, Vector3::zeros());
            approx::assert_relative_eq!(frame.body.scale, planet.info.radius);
            approx::assert_relative_eq!(
                frame.body.offset,
                Vector3::new(planet.info.distance, 0.0, 0.0)
            );
            approx::assert_relative_eq!(frame.orbit_rate, planet.info.speed * 0.1);
            approx::assert_relative_eq!(frame.body.spin_rate, planet.info.speed);
            assert_eq!(frame.body.spin_angle, 0.0);
            assert_eq!(frame.orbit_angle, 0.0);
        }
    }

    #[test]
    fn test_moon_frames_sit_on_planet() {
        let graph = build_system(&Catalog::solar_system());
        let jupiter = graph.find_frame("Jupiter").unwrap();
        let moons: Vec<_> = graph.children(jupiter.id).collect();
        let names: Vec<_> = moons.iter().map(|m| m.body.name.as_str()).collect();
        assert_eq!(names, ["Io", "Europa", "Ganymede", "Callisto"]);

        for moon in moons {
            approx::assert_relative_eq!(moon.translation, Vector3::new(55.0, 0.0, 0.0));
            approx::assert_relative_eq!(
                graph.frame_origin(moon.id),
                graph.body_position(jupiter.id)
            );
        }

        let io = graph.find_frame("Io").unwrap();
        approx::assert_relative_eq!(graph.body_position(io.id), Point3::new(61.0, 0.0, 0.0));
    }

    #[test]
    fn test_ring_hangs_off_saturn() {
        let graph = build_system(&Catalog::solar_system());
        let rings: Vec<_> = graph.rings().collect();
        assert_eq!(rings.len(), 1);

        let saturn = graph.find_frame("Saturn").unwrap();
        let ring = rings[0];
        assert_eq!(ring.frame, saturn.id);
        assert_eq!(saturn.ring, Some(ring.id));
        assert_eq!(ring.texture, SurfaceTexture::SaturnRing);
        approx::assert_relative_eq!(ring.geometry.inner_radius, 3.8 * 1.4);
        approx::assert_relative_eq!(ring.geometry.outer_radius, 3.8 * 2.2);
        approx::assert_relative_eq!(graph.ring_position(ring.id), graph.body_position(saturn.id));
    }

    #[test]
    fn test_zero_radius_ring_is_skipped() {
        use crate::model::catalog::SunInfo;

        let catalog = Catalog {
            sun: SunInfo {
                radius: 15.0,
                spin_rate: 0.001,
            },
            planets: vec![
                CelestialBody::new("Dust", 0.0, 10.0, 0.01, SurfaceTexture::Saturn)
                    .with_ring(SurfaceTexture::SaturnRing)
                    .with_moon("Speck", 0.1, 1.0, 0.02),
            ],
        };
        let graph = build_system(&catalog);

        assert_eq!(graph.rings().count(), 0);
        assert_eq!(graph.num_frames(), 2);
        let dust = graph.find_frame("Dust").unwrap();
        assert_eq!(dust.ring, None);
        assert_eq!(graph.children(dust.id).count(), 1);
    }

    #[test]
    fn test_rotating_frame_moves_descendants() {
        let mut graph = build_system(&Catalog::solar_system());
        let earth = graph.find_frame("Earth").unwrap().id;
        let moon = graph.children(earth).next().unwrap().id;

        graph.frames[earth.0].orbit_angle = std::f32::consts::FRAC_PI_2;

        // Rotating by +90 degrees about y takes +x to -z
        approx::assert_relative_eq!(
            graph.body_position(earth),
            Point3::new(0.0, 0.0, -35.0),
            epsilon = 1e-4
        );
        approx::assert_relative_eq!(
            graph.body_position(moon),
            Point3::new(0.0, 0.0, -37.5),
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_ring_follows_orbit_not_spin() {
        let mut graph = build_system(&Catalog::solar_system());
        let saturn = graph.find_frame("Saturn").unwrap().id;
        let ring = graph.get_frame(saturn).ring.unwrap();
        let tilted = graph.ring_to_root(ring).rotation;

        graph.frames[saturn.0].body.spin_angle = 2.0;
        approx::assert_relative_eq!(graph.ring_to_root(ring).rotation, tilted);

        graph.frames[saturn.0].orbit_angle = std::f32::consts::PI;
        let moved = graph.ring_to_root(ring);
        approx::assert_relative_eq!(
            moved.translation.vector,
            Vector3::new(-75.0, 0.0, 0.0),
            epsilon = 1e-4
        );
        approx::assert_relative_eq!(
            moved.rotation,
            spin_rotation(std::f32::consts::PI) * tilted,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_spin_does_not_move_moons() {
        let mut graph = build_system(&Catalog::solar_system());
        let mars = graph.find_frame("Mars").unwrap().id;
        let phobos = graph.children(mars).next().unwrap().id;
        let before = graph.body_position(phobos);

        graph.frames[mars.0].body.spin_angle = 1.0;
        approx::assert_relative_eq!(graph.body_position(phobos), before);
        // The planet spins in place
        approx::assert_relative_eq!(graph.body_position(mars), Point3::new(45.0, 0.0, 0.0));
    }
}
