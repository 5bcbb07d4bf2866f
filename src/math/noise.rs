use nalgebra::Vector3;

// 3D simplex noise, following Ashima Arts' GLSL formulation so the CPU and GPU copies
// of the sun shader agree. There's no seed: the lattice hashing is the permutation
// polynomial (34x^2 + x) mod 289.

/// Empirical bound on |simplex3|. The gradients are normalized with a Taylor
/// approximation of 1/sqrt, so the output can poke slightly past 1.
pub const SIMPLEX_BOUND: f32 = 1.1;

pub const FBM_OCTAVES: usize = 6;
const FBM_SHIFT: f32 = 100.0;

fn mod289(x: f32) -> f32 {
    x - (x / 289.0).floor() * 289.0
}

fn permute(x: f32) -> f32 {
    mod289((x * 34.0 + 1.0) * x)
}

fn taylor_inv_sqrt(r: f32) -> f32 {
    1.792_842_9 - 0.853_734_73 * r
}

fn step(edge: f32, x: f32) -> f32 {
    if x < edge {
        0.0
    } else {
        1.0
    }
}

/// Seed-free 3D simplex noise. Continuous, with output roughly in [-1, 1].
pub fn simplex3(v: &Vector3<f32>) -> f32 {
    const F3: f32 = 1.0 / 3.0;
    const G3: f32 = 1.0 / 6.0;

    // Skew into the simplex lattice to find the cell, then unskew to find the first
    // corner's offset.
    let i = v.add_scalar(v.sum() * F3).map(f32::floor);
    let x0 = v - i.add_scalar(-i.sum() * G3);

    // Figure out which of the six simplices we're in, by ranking the components of x0.
    let g = Vector3::new(step(x0.y, x0.x), step(x0.z, x0.y), step(x0.x, x0.z));
    let l = Vector3::repeat(1.0) - g;
    let i1 = Vector3::new(g.x.min(l.z), g.y.min(l.x), g.z.min(l.y));
    let i2 = Vector3::new(g.x.max(l.z), g.y.max(l.x), g.z.max(l.y));

    let corners = [Vector3::zeros(), i1, i2, Vector3::repeat(1.0)];
    let i = i.map(mod289);

    let mut total = 0.0;
    for (k, corner) in corners.iter().enumerate() {
        // offset from this corner, remembering that each step along the simplex
        // picks up another unskew term
        let x = x0 - corner + Vector3::repeat(k as f32 * G3);

        let hash = permute(permute(permute(i.z + corner.z) + i.y + corner.y) + i.x + corner.x);
        let gradient = gradient_from_hash(hash);

        let m = (0.6 - x.norm_squared()).max(0.0);
        let m2 = m * m;
        total += m2 * m2 * gradient.dot(&x);
    }

    42.0 * total
}

// Maps a hash in [0, 289) onto a point on an octahedron, then folds it onto a roughly
// unit-length gradient.
fn gradient_from_hash(hash: f32) -> Vector3<f32> {
    const N: f32 = 1.0 / 7.0;
    let ns = Vector3::new(2.0 * N, 0.5 * N - 1.0, N);

    let j = hash - 49.0 * (hash * ns.z * ns.z).floor();
    let x_ = (j * ns.z).floor();
    let y_ = (j - 7.0 * x_).floor();

    let x = x_ * ns.x + ns.y;
    let y = y_ * ns.x + ns.y;
    let h = 1.0 - x.abs() - y.abs();

    // For the lower half of the octahedron, reflect across the diagonals.
    let sh = -step(h, 0.0);
    let gx = x + (x.floor() * 2.0 + 1.0) * sh;
    let gy = y + (y.floor() * 2.0 + 1.0) * sh;

    let gradient = Vector3::new(gx, gy, h);
    gradient * taylor_inv_sqrt(gradient.norm_squared())
}

/// Fractal Brownian motion: six octaves of `simplex3`, halving the amplitude and
/// doubling the frequency each time, with a fixed shift between octaves.
pub fn fbm(x: &Vector3<f32>) -> f32 {
    let shift = Vector3::repeat(FBM_SHIFT);

    let mut x = *x;
    let mut value = 0.0;
    let mut amplitude = 0.5;
    for _ in 0..FBM_OCTAVES {
        value += amplitude * simplex3(&x);
        x = x * 2.0 + shift;
        amplitude *= 0.5;
    }
    value
}

/// Sum of the octave amplitudes; |fbm| never exceeds this times `SIMPLEX_BOUND`.
pub fn fbm_amplitude_sum() -> f32 {
    (0..FBM_OCTAVES).map(|k| 0.5f32.powi(k as i32 + 1)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize, extent: f32) -> impl Iterator<Item = Vector3<f32>> {
        let step = 2.0 * extent / n as f32;
        (0..n).flat_map(move |a| {
            (0..n).flat_map(move |b| {
                (0..n).map(move |c| {
                    Vector3::new(
                        -extent + a as f32 * step + 0.013,
                        -extent + b as f32 * step + 0.029,
                        -extent + c as f32 * step + 0.047,
                    )
                })
            })
        })
    }

    #[test]
    fn test_simplex_reference_values() {
        // Computed from a double-precision port of the same algorithm
        approx::assert_abs_diff_eq!(simplex3(&Vector3::zeros()), -0.412_198_8, epsilon = 1e-4);
        approx::assert_abs_diff_eq!(
            simplex3(&Vector3::new(0.3, 0.7, 1.1)),
            -0.085_152_88,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_simplex_bounded() {
        for p in grid(20, 40.0) {
            let n = simplex3(&p);
            assert!(n.is_finite());
            assert!(n.abs() <= SIMPLEX_BOUND, "simplex3({}) = {}", p, n);
        }
    }

    #[test]
    fn test_simplex_continuous() {
        // Crossing cell boundaries shouldn't produce jumps
        let direction = Vector3::new(0.37, 0.81, -0.45).normalize();
        let origin = Vector3::new(-3.2, 1.7, 0.4);
        let dt = 1e-3;
        let mut prev = simplex3(&origin);
        for k in 1..10000 {
            let p = origin + direction * (k as f32 * dt);
            let n = simplex3(&p);
            assert!((n - prev).abs() < 0.05, "jump of {} at {}", n - prev, p);
            prev = n;
        }
    }

    #[test]
    fn test_fbm_deterministic() {
        let p = Vector3::new(0.5, 0.25, 0.125);
        let first = fbm(&p);
        for _ in 0..10 {
            assert_eq!(fbm(&p), first);
        }
        // Single-precision reference. The high octaves sample past 3000, where f32
        // rounding shifts the sum by a few thousandths against an f64 evaluation.
        approx::assert_abs_diff_eq!(first, 0.234_27, epsilon = 1e-4);
    }

    #[test]
    fn test_fbm_bounded() {
        approx::assert_relative_eq!(fbm_amplitude_sum(), 63.0 / 64.0);

        let bound = SIMPLEX_BOUND * fbm_amplitude_sum();
        for p in grid(12, 10.0) {
            let value = fbm(&p);
            assert!(value.abs() <= bound, "fbm({}) = {}", p, value);
        }
    }
}
