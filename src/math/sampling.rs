use nalgebra::RealField;
use simba::scalar::SupersetOf;

/// Evaluates `f` at `num_segments + 1` evenly spaced parameters, running from `t_start`
/// to `t_end` inclusive.
pub fn sample_parametric<F, S, T>(
    f: F,
    t_start: S,
    t_end: S,
    num_segments: usize,
) -> impl Iterator<Item = T>
where
    F: Fn(S) -> T,
    S: RealField + SupersetOf<usize> + Copy,
{
    assert!(
        num_segments >= 1,
        "Must have at least one segment, num_segments was {}",
        num_segments
    );
    let convert = nalgebra::convert::<usize, S>;
    (0..=num_segments)
        .map(move |i| convert(i) / convert(num_segments))
        // u ranges from 0 to 1 (inclusive)
        .map(move |u| t_start + u * (t_end - t_start))
        .map(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_included() {
        let samples: Vec<f32> = sample_parametric(|t| t, 0.0f32, 2.0, 4).collect();
        assert_eq!(samples.len(), 5);
        approx::assert_relative_eq!(samples[0], 0.0);
        approx::assert_relative_eq!(samples[2], 1.0);
        approx::assert_relative_eq!(samples[4], 2.0);
    }

    #[test]
    #[should_panic]
    fn test_zero_segments() {
        let _ = sample_parametric(|t: f64| t, 0.0, 1.0, 0).count();
    }
}
