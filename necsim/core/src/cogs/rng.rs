use serde::{de::DeserializeOwned, Serialize};

use necsim_core_bond::{ClosedOpenUnitF64, ClosedUnitF64, PositiveF64};

#[allow(clippy::module_name_repetitions)]
pub trait RngCore: Sized + Clone + core::fmt::Debug + Serialize + DeserializeOwned {
    type Seed: AsMut<[u8]> + Default + Sized;

    #[must_use]
    fn from_seed(seed: Self::Seed) -> Self;

    #[must_use]
    fn sample_u64(&mut self) -> u64;
}

#[allow(clippy::module_name_repetitions)]
pub trait SeedableRng: RngCore {
    #[must_use]
    fn seed_from_u64(mut state: u64) -> Self {
        // Implementation from:
        // https://docs.rs/rand/0.7.3/rand/trait.SeedableRng.html#method.seed_from_u64

        // We use PCG32 to generate a u32 sequence, and copy to the seed
        const MUL: u64 = 6_364_136_223_846_793_005_u64;
        const INC: u64 = 11_634_580_027_462_260_723_u64;

        let mut seed = Self::Seed::default();

        for chunk in seed.as_mut().chunks_mut(4) {
            state = state.wrapping_mul(MUL).wrapping_add(INC);

            #[allow(clippy::cast_possible_truncation)]
            let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
            #[allow(clippy::cast_possible_truncation)]
            let rot = (state >> 59) as u32;
            let x = xorshifted.rotate_right(rot).to_le_bytes();

            chunk.copy_from_slice(&x[..chunk.len()]);
        }

        Self::from_seed(seed)
    }
}

impl<R: RngCore> SeedableRng for R {}

#[allow(clippy::module_name_repetitions)]
pub trait PrimeableRng: RngCore {
    fn prime_with(&mut self, stream_index: u64, substream_index: u64);
}

#[allow(clippy::module_name_repetitions)]
pub trait RngSampler: RngCore {
    #[must_use]
    #[inline]
    /// Samples a uniform sample within `[0.0, 1.0)`, i.e. `0.0 <= X < 1.0`
    fn sample_uniform_closed_open(&mut self) -> ClosedOpenUnitF64 {
        // http://prng.di.unimi.it -> Generating uniform doubles in the unit interval
        #[allow(clippy::cast_precision_loss)]
        let u01 = ((self.sample_u64() >> 11) as f64) * f64::from_bits(0x3CA0_0000_0000_0000_u64); // 0x1.0p-53

        unsafe { ClosedOpenUnitF64::new_unchecked(u01) }
    }

    #[must_use]
    #[inline]
    /// Samples a uniform sample within `(0.0, 1.0]`, i.e. `0.0 < X <= 1.0`
    fn sample_uniform_open_closed(&mut self) -> f64 {
        1.0_f64 - self.sample_uniform_closed_open().get()
    }

    #[must_use]
    #[inline]
    #[debug_requires(length > 0, "length is non-zero")]
    #[debug_ensures(ret < length, "samples U(0, length - 1)")]
    fn sample_index(&mut self, length: usize) -> usize {
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let index =
            (self.sample_uniform_closed_open().get() * (length as f64)).floor() as usize;

        // Rounding of very long lengths can otherwise overshoot
        index.min(length - 1)
    }

    #[must_use]
    #[inline]
    #[debug_requires(length > 0, "length is non-zero")]
    #[debug_ensures(ret < length, "samples U(0, length - 1)")]
    fn sample_index_u64(&mut self, length: u64) -> u64 {
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let index = (self.sample_uniform_closed_open().get() * (length as f64)).floor() as u64;

        index.min(length - 1)
    }

    #[must_use]
    #[inline]
    fn sample_event(&mut self, probability: ClosedUnitF64) -> bool {
        self.sample_uniform_closed_open().get() < probability.get()
    }

    #[must_use]
    #[inline]
    /// Samples an exponentially distributed waiting time with rate `lambda`
    fn sample_exponential(&mut self, lambda: PositiveF64) -> f64 {
        -self.sample_uniform_open_closed().ln() / lambda.get()
    }

    #[must_use]
    #[inline]
    /// Samples a pair of independent standard normal variates using the
    ///  Box-Muller transform
    fn sample_2d_standard_normal(&mut self) -> (f64, f64) {
        let u0 = self.sample_uniform_open_closed();
        let u1 = self.sample_uniform_closed_open().get();

        let r = (-2.0_f64 * u0.ln()).sqrt();
        let theta = 2.0_f64 * core::f64::consts::PI * u1;

        (r * theta.cos(), r * theta.sin())
    }

    #[must_use]
    #[inline]
    fn sample_2d_normal(&mut self, mu: f64, sigma: f64) -> (f64, f64) {
        let (z0, z1) = self.sample_2d_standard_normal();

        (z0 * sigma + mu, z1 * sigma + mu)
    }
}

impl<R: RngCore> RngSampler for R {}
