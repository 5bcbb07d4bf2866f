use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::light::Light;
use kiss3d::resource::{Effect, Material, Mesh, ShaderAttribute, ShaderUniform};
use kiss3d::scene::ObjectData;
use nalgebra::{Isometry3, Matrix3, Matrix4, Point2, Point3, Vector3};

/// How much of the ring texture's own alpha survives. The gaps in the texture stay
/// fully see-through.
pub const RING_OPACITY: f32 = 0.9;

/// Textured, translucent and double-sided. Lit by the scene light from either side,
/// since the sun sits above the ring for half of each orbit and below for the rest.
pub struct RingMaterial {
    // OpenGL stuff
    shader: Effect,
    position: ShaderAttribute<Point3<f32>>,
    normal: ShaderAttribute<Vector3<f32>>,
    tex_coord: ShaderAttribute<Point2<f32>>,
    light: ShaderUniform<Point3<f32>>,
    color: ShaderUniform<Point3<f32>>,
    transform: ShaderUniform<Matrix4<f32>>,
    ntransform: ShaderUniform<Matrix3<f32>>,
    scale: ShaderUniform<Matrix3<f32>>,
    view: ShaderUniform<Matrix4<f32>>,
    proj: ShaderUniform<Matrix4<f32>>,
    tex: ShaderUniform<i32>,
}

impl RingMaterial {
    pub fn new() -> Self {
        let mut shader = Effect::new_from_str(VERTEX_SRC, &fragment_src());

        shader.use_program();

        RingMaterial {
            position: shader
                .get_attrib::<Point3<f32>>("position")
                .expect("Failed to get shader attribute."),
            normal: shader
                .get_attrib::<Vector3<f32>>("normal")
                .expect("Failed to get shader attribute."),
            tex_coord: shader
                .get_attrib::<Point2<f32>>("tex_coord")
                .expect("Failed to get shader attribute."),
            light: shader
                .get_uniform::<Point3<f32>>("light_position")
                .expect("Failed to get shader uniform."),
            color: shader
                .get_uniform::<Point3<f32>>("color")
                .expect("Failed to get shader uniform."),
            transform: shader
                .get_uniform::<Matrix4<f32>>("transform")
                .expect("Failed to get shader uniform."),
            ntransform: shader
                .get_uniform::<Matrix3<f32>>("ntransform")
                .expect("Failed to get shader uniform."),
            scale: shader
                .get_uniform::<Matrix3<f32>>("scale")
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
}

impl Material for RingMaterial {
    fn render(
        &mut self,
        pass: usize,
        transform: &Isometry3<f32>,
        scale: &Vector3<f32>,
        camera: &mut dyn Camera,
        light: &Light,
        data: &ObjectData,
        mesh: &mut Mesh,
    ) {
        let ctxt = Context::get();

        self.shader.use_program();
        self.position.enable();
        self.normal.enable();
        self.tex_coord.enable();

        camera.upload(pass, &mut self.proj, &mut self.view);

        let light_pos = match *light {
            Light::Absolute(ref p) => *p,
            Light::StickToCamera => camera.eye(),
        };
        self.light.upload(&light_pos);
        self.color.upload(data.color());

        self.transform.upload(&transform.to_homogeneous());
        self.ntransform
            .upload(&transform.rotation.to_rotation_matrix().into_inner());
        self.scale.upload(&Matrix3::from_diagonal(scale));
        self.tex.upload(&0);

        mesh.bind(&mut self.position, &mut self.normal, &mut self.tex_coord);

        ctxt.active_texture(Context::TEXTURE0);
        ctxt.bind_texture(Context::TEXTURE_2D, Some(&*data.texture()));

        // Both faces, blended over whatever is already drawn
        ctxt.disable(Context::CULL_FACE);
        ctxt.enable(Context::BLEND);
        ctxt.blend_func_separate(
            Context::SRC_ALPHA,
            Context::ONE_MINUS_SRC_ALPHA,
            Context::ONE,
            Context::ONE_MINUS_SRC_ALPHA,
        );

        ctxt.draw_elements(
            Context::TRIANGLES,
            mesh.num_pts() as i32,
            Context::UNSIGNED_SHORT,
            0,
        );

        ctxt.disable(Context::BLEND);
        ctxt.enable(Context::CULL_FACE);

        mesh.unbind();
        self.position.disable();
        self.normal.disable();
        self.tex_coord.disable();
    }
}

fn fragment_src() -> String {
    FRAGMENT_SRC.replace("RING_OPACITY", &format!("{:.3}", RING_OPACITY))
}

static VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    attribute vec3 normal;
    attribute vec2 tex_coord;
    uniform   mat3 ntransform, scale;
    uniform   mat4 proj, view, transform;
    uniform   vec3 light_position;
    varying   vec3 local_light_position;
    varying   vec3 normalInterp;
    varying   vec3 vertPos;
    varying   vec2 vUv;
    void main() {
        vec4 vertPos4 = view * transform * vec4(scale * position, 1.0);
        gl_Position = proj * vertPos4;
        vertPos = vec3(vertPos4) / vertPos4.w;
        normalInterp = mat3(view) * ntransform * normal;
        local_light_position = (view * vec4(light_position, 1.0)).xyz;
        vUv = tex_coord;
    }";

/// `RING_OPACITY` is substituted before compiling.
static FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    uniform sampler2D tex;
    uniform vec3 color;
    varying vec3 local_light_position;
    varying vec3 normalInterp;
    varying vec3 vertPos;
    varying vec2 vUv;

    const float opacity = RING_OPACITY;

    void main() {
        vec3 normal = normalize(normalInterp);
        vec3 lightDir = normalize(local_light_position - vertPos);
        float lambertian = abs(dot(lightDir, normal));

        vec4 texel = texture2D(tex, vUv);
        vec3 shade = color * (0.5 + 0.5 * lambertian);
        gl_FragColor = vec4(texel.rgb * shade, texel.a * opacity);
    }";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_in_fragment_source() {
        assert!(RING_OPACITY > 0.0 && RING_OPACITY <= 1.0);

        let src = fragment_src();
        assert!(src.contains("const float opacity = 0.900;"));
        assert!(!src.contains("RING_OPACITY"));
    }
}
