use std::collections::HashMap;
use std::time::Duration;

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use rust_orrery::model::catalog::SurfaceTexture;
use rust_orrery::model::scene::FrameID;
use rust_orrery::model::{build_system, Catalog, SceneState};

fn new_state() -> SceneState {
    SceneState::new(build_system(&Catalog::solar_system()), 1280, 720)
}

fn run_frames(state: &mut SceneState, n: u32) {
    for i in 1..=n {
        state.advance_frame(Duration::from_millis(16 * i as u64));
    }
}

#[test]
fn test_system_layout() {
    let state = new_state();
    let graph = state.graph();

    let planets: Vec<_> = graph.top_level_frames().map(|f| f.body.name.as_str()).collect();
    assert_eq!(
        planets,
        ["Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune"]
    );

    let moon_counts: Vec<_> = graph
        .top_level_frames()
        .map(|f| graph.children(f.id).count())
        .collect();
    assert_eq!(moon_counts, [0, 0, 1, 2, 4, 2, 1, 1]);

    // Moons don't have moons of their own
    for planet in graph.top_level_frames() {
        for moon in graph.children(planet.id) {
            assert!(moon.children.is_empty());
            assert!(moon.ring.is_none());
            assert_eq!(moon.body.texture, SurfaceTexture::Moon);
        }
    }

    let ringed: Vec<_> = graph
        .frames()
        .filter(|f| f.ring.is_some())
        .map(|f| f.body.name.as_str())
        .collect();
    assert_eq!(ringed, ["Saturn"]);
    assert_eq!(graph.num_frames(), 8 + 11);
}

#[test]
fn test_angles_after_many_frames() {
    let mut state = new_state();
    let initial: HashMap<FrameID, (f32, f32)> = state
        .graph()
        .frames()
        .map(|f| (f.id, (f.body.spin_rate, f.orbit_rate)))
        .collect();

    let n = 600;
    run_frames(&mut state, n);
    assert_eq!(state.frame_count(), n as u64);

    let graph = state.graph();
    assert_relative_eq!(graph.sun.spin_angle, n as f32 * 0.001, max_relative = 1e-4);
    for frame in graph.frames() {
        let (spin_rate, orbit_rate) = initial[&frame.id];
        assert_relative_eq!(frame.body.spin_angle, n as f32 * spin_rate, max_relative = 1e-4);
        assert_relative_eq!(frame.orbit_angle, n as f32 * orbit_rate, max_relative = 1e-4);
        // Orbits run at a tenth of the spin
        assert_relative_eq!(frame.orbit_angle * 10.0, frame.body.spin_angle, max_relative = 1e-4);
    }
}

#[test]
fn test_moons_follow_their_planet() {
    let mut state = new_state();
    run_frames(&mut state, 250);

    let graph = state.graph();
    for planet in graph.top_level_frames() {
        let planet_pos = graph.body_position(planet.id);
        // Planets stay on their orbit circle
        assert_relative_eq!(
            planet_pos.coords.norm(),
            planet.body.offset.norm(),
            epsilon = 1e-3
        );
        assert_relative_eq!(planet_pos.y, 0.0, epsilon = 1e-4);

        for moon in graph.children(planet.id) {
            assert_relative_eq!(graph.frame_origin(moon.id), planet_pos, epsilon = 1e-3);
            let separation = graph.body_position(moon.id) - planet_pos;
            assert_relative_eq!(separation.norm(), moon.body.offset.norm(), epsilon = 1e-3);
        }

        if let Some(ring) = planet.ring {
            assert_relative_eq!(graph.ring_position(ring), planet_pos, epsilon = 1e-3);
        }
    }
}

#[test]
fn test_earth_quarter_orbit() {
    let mut state = new_state();
    // Earth's orbit rate is 0.0012 rad/frame, so this is just about a quarter turn
    let n = (std::f32::consts::FRAC_PI_2 / 0.0012).round() as u32;
    run_frames(&mut state, n);

    let graph = state.graph();
    let earth = graph.find_frame("Earth").unwrap();
    assert_relative_eq!(
        graph.body_position(earth.id),
        Point3::new(0.0, 0.0, -35.0),
        epsilon = 0.05
    );
}

#[test]
fn test_resize_only_touches_resolution() {
    let mut state = new_state();
    run_frames(&mut state, 10);
    let before = state.graph().clone();
    let time = state.shader().elapsed_time;

    state.resize(800, 600);
    assert_relative_eq!(state.shader().resolution, Vector3::new(800.0, 600.0, 1.0));
    assert_eq!(state.graph(), &before);
    assert_eq!(state.shader().elapsed_time, time);
    assert_eq!(state.frame_count(), 10);
}

#[test]
fn test_ring_uvs_are_radial() {
    let state = new_state();
    let graph = state.graph();
    let ring = graph.rings().next().unwrap();
    let geometry = &ring.geometry;
    let width = geometry.outer_radius - geometry.inner_radius;

    assert_eq!(geometry.positions.len(), geometry.uvs.len());
    for (pos, uv) in geometry.positions.iter().zip(geometry.uvs.iter()) {
        let dist = pos.coords.norm();
        assert!((0.0..=1.0).contains(&uv.x));
        assert_relative_eq!(uv.x, (dist - geometry.inner_radius) / width, epsilon = 1e-4);
        assert_relative_eq!(uv.y, 0.5);
    }
}
