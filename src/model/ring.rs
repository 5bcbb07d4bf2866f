use std::f32::consts::{FRAC_PI_2, PI, TAU};

use nalgebra::{Point2, Point3, UnitQuaternion, Vector2, Vector3};

use crate::math::sampling::sample_parametric;

/// Ring edges, as multiples of the planet's radius.
pub const INNER_RADIUS_FACTOR: f32 = 1.4;
pub const OUTER_RADIUS_FACTOR: f32 = 2.2;
pub const THETA_SEGMENTS: usize = 64;

/// Extra tilt after laying the ring flat.
const RING_TILT: f32 = 0.1 * PI;

/// A flat annulus in the local xy-plane, facing +z. It has a single radial segment, so
/// there are two loops of vertices: the inner edge, then the outer edge.
#[derive(Debug, Clone, PartialEq)]
pub struct RingGeometry {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub uvs: Vec<Point2<f32>>,
    pub faces: Vec<[u16; 3]>,
}

impl RingGeometry {
    /// Builds the ring for a planet of the given radius, with texture coordinates that
    /// run radially across the band. A planet with no size gets no ring.
    pub fn for_planet(planet_radius: f32) -> Option<Self> {
        if !(planet_radius > 0.0) {
            return None;
        }
        let mut geometry = Self::annulus(
            planet_radius * INNER_RADIUS_FACTOR,
            planet_radius * OUTER_RADIUS_FACTOR,
            THETA_SEGMENTS,
        );
        geometry.remap_radial_uvs();
        Some(geometry)
    }

    /// Plain annulus, with the texture laid over it like a square decal.
    pub fn annulus(inner_radius: f32, outer_radius: f32, theta_segments: usize) -> Self {
        assert!(
            0.0 <= inner_radius && inner_radius < outer_radius,
            "Bad ring radii: {} to {}",
            inner_radius,
            outer_radius
        );
        let loop_len = theta_segments + 1;
        assert!(2 * loop_len <= u16::MAX as usize, "Too many ring segments");

        let mut positions = Vec::with_capacity(2 * loop_len);
        for &radius in [inner_radius, outer_radius].iter() {
            positions.extend(sample_parametric(
                |theta: f32| Point3::new(radius * theta.cos(), radius * theta.sin(), 0.0),
                0.0,
                TAU,
                theta_segments,
            ));
        }

        let uvs = positions
            .iter()
            .map(|p| {
                Point2::new(
                    (p.x / outer_radius + 1.0) / 2.0,
                    (p.y / outer_radius + 1.0) / 2.0,
                )
            })
            .collect();

        // Two triangles per quad between the loops
        let mut faces = Vec::with_capacity(2 * theta_segments);
        for i in 0..theta_segments {
            let a = i as u16;
            let b = (i + loop_len) as u16;
            let c = (i + loop_len + 1) as u16;
            let d = (i + 1) as u16;
            faces.push([a, b, d]);
            faces.push([b, c, d]);
        }

        RingGeometry {
            inner_radius,
            outer_radius,
            normals: vec![Vector3::z(); positions.len()],
            positions,
            uvs,
            faces,
        }
    }

    /// Replaces the texture coordinates so that u measures how far across the band a
    /// vertex is (0 on the inner edge, 1 on the outer edge) and v stays in the middle
    /// of the texture. A one-row strip texture then shows up as concentric bands.
    pub fn remap_radial_uvs(&mut self) {
        let width = self.outer_radius - self.inner_radius;
        for (uv, p) in self.uvs.iter_mut().zip(self.positions.iter()) {
            let distance = Vector2::new(p.x, p.y).norm();
            let u = ((distance - self.inner_radius) / width).clamp(0.0, 1.0);
            *uv = Point2::new(u, 0.5);
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }
}

/// Rotation that lays a ring (built facing +z) into the orbital plane, then tilts it a
/// little about its own local y-axis.
pub fn ring_orientation() -> UnitQuaternion<f32> {
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_2)
        * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), RING_TILT)
}
