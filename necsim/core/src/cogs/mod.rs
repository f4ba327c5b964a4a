mod dispersal_sampler;
mod habitat;
mod rng;

pub use dispersal_sampler::DispersalSampler;
pub use habitat::Habitat;
pub use rng::{PrimeableRng, RngCore, RngSampler, SeedableRng};
