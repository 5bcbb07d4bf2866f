//! CPU copy of the sun's surface shader. The GLSL program in
//! `gui::materials::sun_material` runs the same steps per fragment; this one is what we
//! test against and what the preview tool draws with.

use nalgebra::{Vector3, Vector4};

use crate::math::interp::{mix, mix_vector, smoothstep};
use crate::math::noise::fbm;

/// Scales the unit-sphere position to set the noise frequency.
pub const SURFACE_FREQUENCY: f32 = 2.5;
/// Scales elapsed seconds to set the animation speed.
pub const TIME_SCALE: f32 = 0.15;

const WARP_STRENGTH: f32 = 0.4;
// Phase multipliers of the scaled time along x, y and z.
const WARP_PHASE: [f32; 3] = [1.0, 1.2, 0.8];

const MACRO_FREQUENCY: f32 = 2.0;
const MICRO_FREQUENCY: f32 = 12.0;
const MICRO_TIME_SCALE: f32 = -0.5;
const MICRO_WEIGHT: f32 = 0.4;

const CONTRAST_LOW: f32 = 0.1;
const CONTRAST_HIGH: f32 = 0.9;
const HEAT_EXPONENT: f32 = 1.2;

/// Heat values where the color ramp switches segments.
pub const RAMP_BREAKS: [f32; 2] = [0.4, 0.75];

/// Color stops of the ramp, from coolest to hottest.
pub const PALETTE: [[f32; 3]; 4] = [
    [0.30, 0.05, 0.00], // dark reddish-brown spots
    [0.90, 0.30, 0.00], // surface orange
    [1.00, 0.75, 0.05], // active regions
    [1.00, 1.00, 0.90], // white flares
];

fn palette(idx: usize) -> Vector3<f32> {
    Vector3::from(PALETTE[idx])
}

/// Computes the shading "heat" in [0, 1] for a point on the sun's surface.
/// The point doesn't need to be normalized; only its direction matters.
pub fn heat(surface_point: &Vector3<f32>, elapsed_time: f32) -> f32 {
    let p = surface_point
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::y)
        * SURFACE_FREQUENCY;
    let time = elapsed_time * TIME_SCALE;

    // Domain warp, each axis pushed by its own fbm sample
    let mut q = p;
    for axis in 0..3 {
        let mut phase = Vector3::zeros();
        phase[axis] = time * WARP_PHASE[axis];
        q[axis] += fbm(&(p + phase)) * WARP_STRENGTH;
    }

    // Large active regions and dark spots
    let macro_noise = fbm(&(q * MACRO_FREQUENCY).add_scalar(time)) * 0.5 + 0.5;
    // Fine granulation
    let micro_noise =
        fbm(&(q * MICRO_FREQUENCY).add_scalar(time * MICRO_TIME_SCALE)) * 0.5 + 0.5;

    let heat = mix(macro_noise, micro_noise, MICRO_WEIGHT);
    smoothstep(CONTRAST_LOW, CONTRAST_HIGH, heat).powf(HEAT_EXPONENT)
}

/// Maps heat onto the sun's palette. Each segment eases between its two stops, so the
/// ramp is continuous across the breaks.
pub fn heat_to_color(heat: f32) -> Vector3<f32> {
    let [low, high] = RAMP_BREAKS;
    if heat < low {
        mix_vector(&palette(0), &palette(1), smoothstep(0.0, low, heat))
    } else if heat < high {
        mix_vector(&palette(1), &palette(2), smoothstep(low, high, heat))
    } else {
        mix_vector(&palette(2), &palette(3), smoothstep(high, 1.0, heat))
    }
}

/// The full surface shader: always opaque, never lit.
pub fn surface_color(surface_point: &Vector3<f32>, elapsed_time: f32) -> Vector4<f32> {
    let color = heat_to_color(heat(surface_point, elapsed_time));
    Vector4::new(color.x, color.y, color.z, 1.0)
}
