use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::light::Light;
use kiss3d::resource::{Effect, Material, Mesh, ShaderAttribute, ShaderUniform};
use kiss3d::scene::ObjectData;
use nalgebra::{Isometry3, Matrix4, Point2, Point3, Translation3, Vector3};

use crate::assets::CubeFace;

/// Half the side length of the box. The vertex shader pins the box to the far plane,
/// so this only has to keep the corners in front of the camera.
const HALF_EXTENT: f32 = 10.0;

/// Draws one face of the starfield box. The box rides along with the camera so it
/// always looks infinitely far away; the node's own transform is ignored. Face nodes
/// have to be added to the scene before anything else, so that later objects (the
/// translucent ones in particular) land on top of the sky.
pub struct SkyboxMaterial {
    // OpenGL stuff
    shader: Effect,
    pos: ShaderAttribute<Point3<f32>>,
    uv: ShaderAttribute<Point2<f32>>,
    model: ShaderUniform<Matrix4<f32>>,
    view: ShaderUniform<Matrix4<f32>>,
    proj: ShaderUniform<Matrix4<f32>>,
    tex: ShaderUniform<i32>,
}

impl SkyboxMaterial {
    pub fn new() -> Self {
        let mut shader = Effect::new_from_str(VERTEX_SRC, FRAGMENT_SRC);

        shader.use_program();

        SkyboxMaterial {
            pos: shader
                .get_attrib::<Point3<f32>>("position")
                .expect("Failed to get shader attribute."),
            uv: shader
                .get_attrib::<Point2<f32>>("tex_coord")
                .expect("Failed to get shader attribute."),
            model: shader
                .get_uniform::<Matrix4<f32>>("model")
                .expect("Failed to get shader uniform."),
            view: shader
                .get_uniform::<Matrix4<f32>>("view")
                .expect("Failed to get shader uniform."),
            proj: shader
                .get_uniform::<Matrix4<f32>>("proj")
                .expect("Failed to get shader uniform."),
            tex: shader
                .get_uniform::<i32>("tex")
                .expect("Failed to get shader uniform."),
            shader,
        }
    }

    /// One face of the unit cube, seen from the inside, with the texture oriented the
    /// way cubemap images are authored.
    pub fn face_mesh(face: CubeFace) -> Mesh {
        let (coords, uvs) = face_quad(face);
        let faces = vec![Point3::new(0, 1, 2), Point3::new(0, 2, 3)];
        Mesh::new(coords, faces, None, Some(uvs), false)
    }
}

impl Material for SkyboxMaterial {
    fn render(
        &mut self,
        pass: usize,
        _: &Isometry3<f32>,
        _: &Vector3<f32>,
        camera: &mut dyn Camera,
        _: &Light,
        data: &ObjectData,
        mesh: &mut Mesh,
    ) {
        let ctxt = Context::get();
        // We're inside the box
        ctxt.disable(Context::CULL_FACE);

        self.shader.use_program();
        self.pos.enable();
        self.uv.enable();

        camera.upload(pass, &mut self.proj, &mut self.view);

        let model = Translation3::from(camera.eye().coords).to_homogeneous()
            * Matrix4::new_scaling(HALF_EXTENT);
        self.model.upload(&model);
        self.tex.upload(&0);

        mesh.bind_coords(&mut self.pos);
        mesh.bind_uvs(&mut self.uv);
        mesh.bind_faces();

        ctxt.active_texture(Context::TEXTURE0);
        ctxt.bind_texture(Context::TEXTURE_2D, Some(&*data.texture()));
        ctxt.draw_elements(
            Context::TRIANGLES,
            mesh.num_pts() as i32,
            Context::UNSIGNED_SHORT,
            0,
        );

        mesh.unbind();
        self.pos.disable();
        self.uv.disable();
        ctxt.enable(Context::CULL_FACE);
    }
}

/// Corner positions and texture coordinates, counter-clockwise from (s, t) = (0, 0).
fn face_quad(face: CubeFace) -> (Vec<Point3<f32>>, Vec<Point2<f32>>) {
    let (normal, s_axis, t_axis) = face_basis(face);
    let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

    corners
        .iter()
        .map(|&(s, t): &(f32, f32)| {
            let pos = Point3::from(normal + (2.0 * s - 1.0) * s_axis + (2.0 * t - 1.0) * t_axis);
            (pos, Point2::new(s, t))
        })
        .unzip()
}

/// Outward normal, then the directions that texture s and t increase along (t runs
/// down the image).
fn face_basis(face: CubeFace) -> (Vector3<f32>, Vector3<f32>, Vector3<f32>) {
    let (x, y, z) = (Vector3::x(), Vector3::y(), Vector3::z());
    match face {
        CubeFace::PositiveX => (x, -z, -y),
        CubeFace::NegativeX => (-x, z, -y),
        CubeFace::PositiveY => (y, x, z),
        CubeFace::NegativeY => (-y, x, -z),
        CubeFace::PositiveZ => (z, x, -y),
        CubeFace::NegativeZ => (-z, -x, -y),
    }
}

/// Vertex shader: pushes every vertex out to (almost) the far plane, so the sky never
/// hides anything in the scene.
static VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    attribute vec2 tex_coord;
    varying   vec2 vUv;
    uniform   mat4 model;
    uniform   mat4 view;
    uniform   mat4 proj;
    void main() {
        vec4 clip = proj * view * model * vec4(position, 1.0);
        gl_Position = vec4(clip.xy, clip.w * 0.99999, clip.w);
        vUv = tex_coord;
    }";

/// Fragment shader: straight texture lookup, no lighting.
static FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    uniform sampler2D tex;
    varying vec2 vUv;
    void main() {
        gl_FragColor = vec4(texture2D(tex, vUv).rgb, 1.0);
    }";
