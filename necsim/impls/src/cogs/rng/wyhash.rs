use serde::{Deserialize, Serialize};

use necsim_core::cogs::{PrimeableRng, RngCore, SeedableRng};

#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WyHash {
    seed: u64,
    state: u64,
}

impl WyHash {
    /// Creates the deterministic stream of one `(seed, task)` run
    #[must_use]
    pub fn for_task(seed: u64, task: u64) -> Self {
        let mut rng = Self::seed_from_u64(seed);
        rng.prime_with(task, 0);
        rng
    }
}

impl RngCore for WyHash {
    type Seed = [u8; 8];

    #[must_use]
    #[inline]
    fn from_seed(seed: Self::Seed) -> Self {
        let seed = u64::from_le_bytes(seed);

        Self { seed, state: seed }
    }

    #[must_use]
    #[inline]
    fn sample_u64(&mut self) -> u64 {
        // Added SeaHash diffuse for better avalanching
        diffuse(wyhash::wyrng(&mut self.state))
    }
}

impl PrimeableRng for WyHash {
    fn prime_with(&mut self, stream_index: u64, substream_index: u64) {
        let mut bytes = [0_u8; 16];

        bytes[..8].copy_from_slice(&stream_index.to_le_bytes());
        bytes[8..].copy_from_slice(&substream_index.to_le_bytes());

        self.state = wyhash::wyhash(&bytes, self.seed);
    }
}

const fn diffuse(mut x: u64) -> u64 {
    // Dynamic shifts derived from the PCG round, selected by the higher
    // bits so that changing those flips the lower bits
    x = x.wrapping_mul(0x6eed_0e9d_a4d9_4a4f);

    let a = x >> 32;
    let b = x >> 60;

    x ^= a >> b;

    x = x.wrapping_mul(0x6eed_0e9d_a4d9_4a4f);

    x
}

#[cfg(test)]
mod tests {
    use necsim_core::cogs::{RngCore, RngSampler};

    use super::WyHash;

    #[test]
    fn same_task_same_stream() {
        let mut a = WyHash::for_task(42, 7);
        let mut b = WyHash::for_task(42, 7);

        for _ in 0..1000 {
            assert_eq!(a.sample_u64(), b.sample_u64());
        }
    }

    #[test]
    fn different_tasks_diverge() {
        let mut a = WyHash::for_task(42, 7);
        let mut b = WyHash::for_task(42, 8);

        let a: Vec<u64> = (0..16).map(|_| a.sample_u64()).collect();
        let b: Vec<u64> = (0..16).map(|_| b.sample_u64()).collect();

        assert_ne!(a, b);
    }

    #[test]
    fn uniform_samples_stay_in_range() {
        let mut rng = WyHash::for_task(0, 0);

        for _ in 0..10_000 {
            let u = rng.sample_uniform_closed_open().get();
            assert!((0.0..1.0).contains(&u));

            assert!(rng.sample_index(3) < 3);
        }
    }

    #[test]
    fn standard_normal_moments() {
        let mut rng = WyHash::for_task(1, 2);

        let samples = 50_000;
        let (mut sum, mut sum_sq) = (0.0_f64, 0.0_f64);

        for _ in 0..samples {
            let (z0, z1) = rng.sample_2d_standard_normal();
            sum += z0 + z1;
            sum_sq += z0 * z0 + z1 * z1;
        }

        let n = f64::from(2 * samples);

        assert!((sum / n).abs() < 0.02);
        assert!((sum_sq / n - 1.0).abs() < 0.03);
    }
}
