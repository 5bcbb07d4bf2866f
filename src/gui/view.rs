use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::resource::{Material, Mesh};
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use nalgebra::{Point2, Point3, Translation3, Vector3};

use super::camera::OrbitCamera;
use super::materials::{RingMaterial, SkyboxMaterial, SunMaterial};
use crate::assets::{Cubemap, TextureLibrary};
use crate::model::catalog::SurfaceTexture;
use crate::model::ring::RingGeometry;
use crate::model::scene::{spin_rotation, BodyMesh, RingMesh};
use crate::model::{SceneState, ShaderState};

const CAMERA_START: [f32; 3] = [0.0, 0.0, 50.0];

// Placeholder shade for bodies whose texture never showed up
const UNTEXTURED_COLOR: [f32; 3] = [0.6, 0.6, 0.6];

struct FrameNodes {
    frame: SceneNode,
    body: SceneNode,
}

pub struct View {
    // Object state
    state: SceneState,
    start: Instant,
    // Scene nodes, mirroring the scene graph
    sun_node: SceneNode,
    // Indexed by FrameID
    frame_nodes: Vec<FrameNodes>,
    // Indexed by RingID. Kept out of the frame hierarchy so they draw last.
    ring_nodes: Vec<SceneNode>,
    shader_uniforms: Rc<Cell<ShaderState>>,
    // Camera
    camera: OrbitCamera,
}

impl View {
    pub fn new(state: SceneState, textures: &TextureLibrary, window: &mut Window) -> Self {
        let resolution = state.shader().resolution;
        let camera = OrbitCamera::new(
            Point3::from(CAMERA_START),
            resolution.x as u32,
            resolution.y as u32,
        );

        // kiss3d draws nodes in the order they were added: sky, then solid bodies,
        // then the translucent rings on top of both.
        match textures.resolve_cubemap() {
            Ok(cubemap) => Self::create_skybox(window, &cubemap),
            Err(err) => log::warn!("{}; drawing without a skybox", err),
        }

        let shader_uniforms = Rc::new(Cell::new(state.shader()));

        let mut system_root = window.add_group();
        let sun_node = Self::create_sun_object(&mut system_root, &state, &shader_uniforms);

        let mut frame_nodes: Vec<FrameNodes> = Vec::with_capacity(state.graph().num_frames());
        let graph = state.graph();
        // Parents always precede their children, so the parent's node already exists
        for frame in graph.frames() {
            let mut frame_node = match frame.parent {
                Some(parent) => frame_nodes[parent.0].frame.add_group(),
                None => system_root.add_group(),
            };
            frame_node.set_local_translation(Translation3::from(frame.translation));

            let body_node = Self::create_body_object(&mut frame_node, &frame.body, textures);

            frame_nodes.push(FrameNodes {
                frame: frame_node,
                body: body_node,
            });
        }

        let mut ring_root = window.add_group();
        let ring_nodes = graph
            .rings()
            .map(|ring| Self::create_ring_object(&mut ring_root, ring, textures))
            .collect();

        log::info!(
            "Built scene with {} orbit frames and {} ring(s)",
            graph.num_frames(),
            graph.rings().count()
        );

        let mut view = View {
            state,
            start: Instant::now(),
            sun_node,
            frame_nodes,
            ring_nodes,
            shader_uniforms,
            camera,
        };
        view.update_scene_objects();

        view
    }

    fn create_skybox(window: &mut Window, cubemap: &Cubemap) {
        let material = Rc::new(RefCell::new(
            Box::new(SkyboxMaterial::new()) as Box<dyn Material + 'static>
        ));

        let mut sky = window.add_group();
        for (face, path) in cubemap.faces.iter() {
            let mesh = Rc::new(RefCell::new(SkyboxMaterial::face_mesh(*face)));
            let mut node = sky.add_mesh(mesh, Vector3::repeat(1.0));
            node.set_material(material.clone());
            node.set_texture_from_file(path, &format!("skybox-{}", face.file_name()));
        }
    }

    fn create_sun_object(
        system_root: &mut SceneNode,
        state: &SceneState,
        uniforms: &Rc<Cell<ShaderState>>,
    ) -> SceneNode {
        let mut sun = system_root.add_sphere(state.graph().sun.scale);
        let material = Rc::new(RefCell::new(
            Box::new(SunMaterial::new(uniforms.clone())) as Box<dyn Material + 'static>
        ));
        sun.set_material(material);
        sun
    }

    fn create_body_object(
        frame_node: &mut SceneNode,
        body: &BodyMesh,
        textures: &TextureLibrary,
    ) -> SceneNode {
        let mut sphere = frame_node.add_sphere(body.scale);
        sphere.set_local_translation(Translation3::from(body.offset));
        Self::apply_texture(&mut sphere, body.texture, textures);
        sphere
    }

    fn create_ring_object(
        ring_root: &mut SceneNode,
        ring: &RingMesh,
        textures: &TextureLibrary,
    ) -> SceneNode {
        let mesh = Rc::new(RefCell::new(ring_mesh(&ring.geometry)));
        let mut node = ring_root.add_mesh(mesh, Vector3::repeat(1.0));
        let material = Rc::new(RefCell::new(
            Box::new(RingMaterial::new()) as Box<dyn Material + 'static>
        ));
        node.set_material(material);
        Self::apply_texture(&mut node, ring.texture, textures);
        node
    }

    fn apply_texture(node: &mut SceneNode, texture: SurfaceTexture, textures: &TextureLibrary) {
        match textures.resolve_surface(texture) {
            Ok(path) => node.set_texture_from_file(&path, texture.file_name()),
            Err(err) => {
                log::warn!("{}; leaving it untextured", err);
                let [r, g, b] = UNTEXTURED_COLOR;
                node.set_color(r, g, b);
            }
        }
    }

    /// Moves the orrery forward one frame (unless paused), and keeps the shader clock
    /// on wall time either way.
    pub fn update_state(&mut self, paused: bool) {
        let elapsed = self.start.elapsed();
        if paused {
            self.state.set_elapsed_time(elapsed);
        } else {
            self.state.advance_frame(elapsed);
        }
        self.update_scene_objects();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        log::debug!("Viewport resized to {}x{}", width, height);
        self.state.resize(width, height);
        self.camera.set_viewport(width, height);
        self.shader_uniforms.set(self.state.shader());
    }

    fn update_scene_objects(&mut self) {
        let graph = self.state.graph();

        self.sun_node
            .set_local_rotation(spin_rotation(graph.sun.spin_angle));

        for (frame, nodes) in graph.frames().zip(self.frame_nodes.iter_mut()) {
            nodes
                .frame
                .set_local_rotation(spin_rotation(frame.orbit_angle));
            nodes
                .body
                .set_local_rotation(spin_rotation(frame.body.spin_angle));
        }

        for (ring, node) in graph.rings().zip(self.ring_nodes.iter_mut()) {
            node.set_local_transformation(graph.ring_to_root(ring.id));
        }

        self.shader_uniforms.set(self.state.shader());
        log::trace!(
            "Frame {}: t = {:.3}s",
            self.state.frame_count(),
            self.state.shader().elapsed_time
        );
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, None, None)
    }
}

/// Converts ring geometry into something kiss3d can upload.
fn ring_mesh(geometry: &RingGeometry) -> Mesh {
    let faces = geometry
        .faces
        .iter()
        .map(|&[a, b, c]| Point3::new(a, b, c))
        .collect();
    let uvs = geometry.uvs.iter().map(|uv| Point2::new(uv.x, uv.y)).collect();

    Mesh::new(
        geometry.positions.clone(),
        faces,
        Some(geometry.normals.clone()),
        Some(uvs),
        false,
    )
}
