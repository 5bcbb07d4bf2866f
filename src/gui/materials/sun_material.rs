use std::cell::Cell;
use std::rc::Rc;

use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::light::Light;
use kiss3d::resource::{Effect, Material, Mesh, ShaderAttribute, ShaderUniform};
use kiss3d::scene::ObjectData;
use nalgebra::{Isometry3, Matrix3, Matrix4, Point3, Vector3};

use crate::model::ShaderState;

/// Draws the sun's boiling surface. Unlit; the only inputs are the fragment's position
/// on the sphere and the shared shader clock.
pub struct SunMaterial {
    // OpenGL stuff
    shader: Effect,
    position: ShaderAttribute<Point3<f32>>,
    transform: ShaderUniform<Matrix4<f32>>,
    scale: ShaderUniform<Matrix3<f32>>,
    view: ShaderUniform<Matrix4<f32>>,
    proj: ShaderUniform<Matrix4<f32>>,
    time: ShaderUniform<f32>,
    // The stock fragment program doesn't read the resolution, so the driver is free
    // to optimize the uniform away.
    resolution: Option<ShaderUniform<Vector3<f32>>>,
    // Uniform values, published once per frame by the view
    uniforms: Rc<Cell<ShaderState>>,
}

impl SunMaterial {
    pub fn new(uniforms: Rc<Cell<ShaderState>>) -> Self {
        let mut shader = Effect::new_from_str(VERTEX_SRC, FRAGMENT_SRC);

        shader.use_program();

        SunMaterial {
            position: shader
                .get_attrib::<Point3<f32>>("position")
                .expect("Failed to get shader attribute."),
            transform: shader
                .get_uniform::<Matrix4<f32>>("transform")
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
            time: shader
                .get_uniform::<f32>("iTime")
                .expect("Failed to get shader uniform."),
            resolution: shader.get_uniform::<Vector3<f32>>("iResolution"),
            shader,
            uniforms,
        }
    }
}

impl Material for SunMaterial {
    fn render(
        &mut self,
        pass: usize,
        transform: &Isometry3<f32>,
        scale: &Vector3<f32>,
        camera: &mut dyn Camera,
        _: &Light,
        _: &ObjectData,
        mesh: &mut Mesh,
    ) {
        let uniforms = self.uniforms.get();

        self.shader.use_program();
        self.position.enable();

        camera.upload(pass, &mut self.proj, &mut self.view);

        self.transform.upload(&transform.to_homogeneous());
        self.scale.upload(&Matrix3::from_diagonal(scale));
        self.time.upload(&uniforms.elapsed_time);
        if let Some(resolution) = self.resolution.as_mut() {
            resolution.upload(&uniforms.resolution);
        }

        mesh.bind_coords(&mut self.position);
        mesh.bind_faces();

        Context::get().draw_elements(
            Context::TRIANGLES,
            mesh.num_pts() as i32,
            Context::UNSIGNED_SHORT,
            0,
        );

        mesh.unbind();
        self.position.disable();
    }
}

/// Vertex shader: passes the model-space position through, so the surface pattern
/// sticks to the sun as it spins.
static VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    uniform   mat4 transform;
    uniform   mat3 scale;
    uniform   mat4 view;
    uniform   mat4 proj;
    varying   vec3 vPos;
    void main() {
        vPos = position;
        gl_Position = proj * view * transform * vec4(scale * position, 1.0);
    }";

/// Fragment shader: domain-warped fbm over simplex noise, mapped through a heat ramp.
/// Kept in step with `shading::sun`.
static FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    uniform float iTime;
    uniform vec3  iResolution;
    varying vec3  vPos;

    vec4 permute(vec4 x) { return mod(((x * 34.0) + 1.0) * x, 289.0); }
    vec4 taylorInvSqrt(vec4 r) { return 1.79284291400159 - 0.85373472095314 * r; }

    float snoise(vec3 v) {
        const vec2 C = vec2(1.0 / 6.0, 1.0 / 3.0);
        const vec4 D = vec4(0.0, 0.5, 1.0, 2.0);

        vec3 i  = floor(v + dot(v, C.yyy));
        vec3 x0 = v - i + dot(i, C.xxx);

        vec3 g = step(x0.yzx, x0.xyz);
        vec3 l = 1.0 - g;
        vec3 i1 = min(g.xyz, l.zxy);
        vec3 i2 = max(g.xyz, l.zxy);

        vec3 x1 = x0 - i1 + C.xxx;
        vec3 x2 = x0 - i2 + C.yyy;
        vec3 x3 = x0 - D.yyy;

        i = mod(i, 289.0);
        vec4 p = permute(permute(permute(
                    i.z + vec4(0.0, i1.z, i2.z, 1.0))
                  + i.y + vec4(0.0, i1.y, i2.y, 1.0))
                  + i.x + vec4(0.0, i1.x, i2.x, 1.0));

        float n_ = 0.142857142857;
        vec3  ns = n_ * D.wyz - D.xzx;

        vec4 j = p - 49.0 * floor(p * ns.z * ns.z);

        vec4 x_ = floor(j * ns.z);
        vec4 y_ = floor(j - 7.0 * x_);

        vec4 x = x_ * ns.x + ns.yyyy;
        vec4 y = y_ * ns.x + ns.yyyy;
        vec4 h = 1.0 - abs(x) - abs(y);

        vec4 b0 = vec4(x.xy, y.xy);
        vec4 b1 = vec4(x.zw, y.zw);

        vec4 s0 = floor(b0) * 2.0 + 1.0;
        vec4 s1 = floor(b1) * 2.0 + 1.0;
        vec4 sh = -step(h, vec4(0.0));

        vec4 a0 = b0.xzyw + s0.xzyw * sh.xxyy;
        vec4 a1 = b1.xzyw + s1.xzyw * sh.zzww;

        vec3 p0 = vec3(a0.xy, h.x);
        vec3 p1 = vec3(a0.zw, h.y);
        vec3 p2 = vec3(a1.xy, h.z);
        vec3 p3 = vec3(a1.zw, h.w);

        vec4 norm = taylorInvSqrt(vec4(dot(p0, p0), dot(p1, p1), dot(p2, p2), dot(p3, p3)));
        p0 *= norm.x;
        p1 *= norm.y;
        p2 *= norm.z;
        p3 *= norm.w;

        vec4 m = max(0.6 - vec4(dot(x0, x0), dot(x1, x1), dot(x2, x2), dot(x3, x3)), 0.0);
        m = m * m;
        return 42.0 * dot(m * m, vec4(dot(p0, x0), dot(p1, x1), dot(p2, x2), dot(p3, x3)));
    }

    float fbm(vec3 x) {
        float v = 0.0;
        float a = 0.5;
        vec3 shift = vec3(100.0);
        for (int i = 0; i < 6; ++i) {
            v += a * snoise(x);
            x = x * 2.0 + shift;
            a *= 0.5;
        }
        return v;
    }

    void main() {
        vec3 p = normalize(vPos) * 2.5;
        float time = iTime * 0.15;

        vec3 q = p;
        q.x += fbm(p + vec3(time, 0.0, 0.0)) * 0.4;
        q.y += fbm(p + vec3(0.0, time * 1.2, 0.0)) * 0.4;
        q.z += fbm(p + vec3(0.0, 0.0, time * 0.8)) * 0.4;

        float macroNoise = fbm(q * 2.0 + time) * 0.5 + 0.5;
        float microNoise = fbm(q * 12.0 - time * 0.5) * 0.5 + 0.5;

        float heat = mix(macroNoise, microNoise, 0.4);
        heat = smoothstep(0.1, 0.9, heat);
        heat = pow(heat, 1.2);

        vec3 darkSpot     = vec3(0.30, 0.05, 0.00);
        vec3 baseOrange   = vec3(0.90, 0.30, 0.00);
        vec3 brightYellow = vec3(1.00, 0.75, 0.05);
        vec3 whiteFlare   = vec3(1.00, 1.00, 0.90);

        vec3 color;
        if (heat < 0.4) {
            color = mix(darkSpot, baseOrange, smoothstep(0.0, 0.4, heat));
        } else if (heat < 0.75) {
            color = mix(baseOrange, brightYellow, smoothstep(0.4, 0.75, heat));
        } else {
            color = mix(brightYellow, whiteFlare, smoothstep(0.75, 1.0, heat));
        }

        gl_FragColor = vec4(color, 1.0);
    }";
