use std::time::Duration;

use nalgebra::Vector3;

use super::scene::SceneGraph;

/// Uniforms read by the sun's surface shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderState {
    /// Wall-clock seconds since the scene started.
    pub elapsed_time: f32,
    /// Viewport (width, height, 1).
    pub resolution: Vector3<f32>,
}

impl ShaderState {
    pub fn new(width: u32, height: u32) -> Self {
        ShaderState {
            elapsed_time: 0.0,
            resolution: Vector3::new(width as f32, height as f32, 1.0),
        }
    }
}

/// Everything that changes from frame to frame. The renderer reads it, and only the
/// methods here write to it.
#[derive(Debug, Clone)]
pub struct SceneState {
    graph: SceneGraph,
    shader: ShaderState,
    frame_count: u64,
}

impl SceneState {
    pub fn new(graph: SceneGraph, width: u32, height: u32) -> Self {
        SceneState {
            graph,
            shader: ShaderState::new(width, height),
            frame_count: 0,
        }
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn shader(&self) -> ShaderState {
        self.shader
    }

    /// Number of frames the orrery has been stepped forward.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Steps the orrery forward by one displayed frame.
    ///
    /// Orbits and spins advance by a fixed amount per frame, regardless of how long the
    /// frame took. The sun's shader instead follows wall-clock time, so the surface
    /// animates at the same speed on any display.
    pub fn advance_frame(&mut self, elapsed: Duration) {
        let graph = &mut self.graph;
        graph.sun.spin_angle += graph.sun.spin_rate;
        for frame in graph.frames_mut() {
            frame.orbit_angle += frame.orbit_rate;
            frame.body.spin_angle += frame.body.spin_rate;
        }

        self.frame_count += 1;
        self.set_elapsed_time(elapsed);
    }

    /// Updates the shader clock without moving anything, e.g. while paused.
    pub fn set_elapsed_time(&mut self, elapsed: Duration) {
        self.shader.elapsed_time = elapsed.as_secs_f32();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.shader.resolution = Vector3::new(width as f32, height as f32, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::Catalog;
    use crate::model::scene::build_system;

    fn new_state() -> SceneState {
        SceneState::new(build_system(&Catalog::solar_system()), 1280, 720)
    }

    #[test]
    fn test_initial_state() {
        let state = new_state();
        assert_eq!(state.frame_count(), 0);
        assert_eq!(state.shader(), ShaderState::new(1280, 720));
        approx::assert_relative_eq!(state.shader().resolution, Vector3::new(1280.0, 720.0, 1.0));
    }

    #[test]
    fn test_angles_accumulate_per_frame() {
        let mut state = new_state();
        let n = 250;
        for k in 0..n {
            // Frame timing shouldn't matter for orbits
            state.advance_frame(Duration::from_millis(k * k));
        }
        assert_eq!(state.frame_count(), n);

        let n = n as f32;
        approx::assert_relative_eq!(state.graph().sun.spin_angle, n * 0.001, max_relative = 1e-4);
        for frame in state.graph().frames() {
            approx::assert_relative_eq!(
                frame.orbit_angle,
                n * frame.body.spin_rate * 0.1,
                max_relative = 1e-4
            );
            approx::assert_relative_eq!(
                frame.body.spin_angle,
                n * frame.body.spin_rate,
                max_relative = 1e-4
            );
        }
    }

    #[test]
    fn test_shader_follows_wall_clock() {
        let mut state = new_state();
        state.advance_frame(Duration::from_millis(16));
        state.advance_frame(Duration::from_millis(2500));
        approx::assert_relative_eq!(state.shader().elapsed_time, 2.5);

        // Pausing keeps the clock going but freezes the bodies
        let before = state.graph().clone();
        state.set_elapsed_time(Duration::from_secs(10));
        approx::assert_relative_eq!(state.shader().elapsed_time, 10.0);
        assert_eq!(state.graph(), &before);
        assert_eq!(state.frame_count(), 2);
    }

    #[test]
    fn test_resize_only_touches_resolution() {
        let mut state = new_state();
        for _ in 0..10 {
            state.advance_frame(Duration::from_millis(100));
        }
        let graph_before = state.graph().clone();
        let time_before = state.shader().elapsed_time;

        state.resize(800, 600);
        assert_eq!(state.shader().resolution, Vector3::new(800.0, 600.0, 1.0));
        assert_eq!(state.shader().elapsed_time, time_before);
        assert_eq!(state.graph(), &graph_before);
    }
}
