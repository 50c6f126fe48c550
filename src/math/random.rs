use rand::Rng;

/// Uniform random float in [-range / 2, range / 2]
pub fn rand_float_spread<R: Rng + ?Sized>(rng: &mut R, range: f32) -> f32 {
    let half = range * 0.5;
    rng.gen_range(-half..=half)
}
