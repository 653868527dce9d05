//! Random sign perturbations.

use rand::Rng;

/// Draw a vector of independent, equiprobable ±1 entries.
pub fn sign_vector<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<f64> {
    (0..n)
        .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
        .collect()
}

/// `theta + scale * delta` and `theta - scale * delta`.
pub fn perturb(theta: &[f64], delta: &[f64], scale: f64) -> (Vec<f64>, Vec<f64>) {
    theta
        .iter()
        .zip(delta)
        .map(|(t, d)| (t + scale * d, t - scale * d))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn entries_are_plus_or_minus_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let delta = sign_vector(&mut rng, 500);
        assert_eq!(delta.len(), 500);
        assert!(delta.iter().all(|d| *d == 1.0 || *d == -1.0));
        // Both signs show up in a long draw.
        assert!(delta.contains(&1.0));
        assert!(delta.contains(&-1.0));
    }

    #[test]
    fn same_seed_same_draws() {
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(sign_vector(&mut a, 8), sign_vector(&mut b, 8));
        }
    }

    #[test]
    fn perturb_is_symmetric() {
        let (plus, minus) = perturb(&[1.0, 2.0], &[1.0, -1.0], 0.5);
        assert_eq!(plus, vec![1.5, 1.5]);
        assert_eq!(minus, vec![0.5, 2.5]);
    }
}
