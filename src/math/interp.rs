use nalgebra::Vector3;

/// Hermite interpolation between 0 and 1 as `x` goes from `edge0` to `edge1`, clamped
/// outside that range. Same as GLSL's `smoothstep`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear blend, `a` at t = 0 and `b` at t = 1. Same as GLSL's `mix`.
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

pub fn mix_vector(a: &Vector3<f32>, b: &Vector3<f32>, t: f32) -> Vector3<f32> {
    a * (1.0 - t) + b * t
}
