use necsim_core_bond::NonNegativeF64;

use crate::{
    cogs::{Habitat, RngCore},
    landscape::WrappedLocation,
};

#[allow(clippy::module_name_repetitions)]
#[contract_trait]
pub trait DispersalSampler<H: Habitat, G: RngCore>: core::fmt::Debug {
    /// Samples the parent position of an individual at `location`, i.e. the
    ///  destination of the backwards-in-time move.
    ///
    /// Draws are retried with fresh randomness until the destination holds
    ///  at least one individual at `generation`.
    #[must_use]
    #[debug_ensures(
        habitat.get_individuals_at(&ret, generation) > 0,
        "target is habitable"
    )]
    fn sample_dispersal_from_location(
        &self,
        location: &WrappedLocation,
        habitat: &H,
        generation: NonNegativeF64,
        rng: &mut G,
    ) -> WrappedLocation;
}
