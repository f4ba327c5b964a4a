use necsim_core::{
    cogs::{DispersalSampler, Habitat, RngCore},
    landscape::WrappedLocation,
};
use necsim_core_bond::NonNegativeF64;

use crate::{
    cogs::{demography::DemographicRateMap, habitat::LandscapeGrid},
    simulation::{DispersalConfig, SetupError},
};

mod cumulative;
mod kernel;

pub use cumulative::CumulativeDispersalSampler;
pub use kernel::{DispersalKernel, KernelDispersalSampler};

/// Destination sampling through either a dispersal kernel or a dispersal
///  matrix over the fine map cells
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum LandscapeDispersalSampler {
    Kernel(KernelDispersalSampler),
    Matrix(CumulativeDispersalSampler),
}

impl LandscapeDispersalSampler {
    /// # Errors
    ///
    /// Returns a `SetupError` if a dispersal matrix is used on an
    ///  incompatible landscape or violates the matrix contract.
    pub fn new(
        config: &DispersalConfig,
        landscape: &LandscapeGrid,
        reproduction: Option<DemographicRateMap>,
    ) -> Result<Self, SetupError> {
        match config {
            DispersalConfig::Kernel(kernel) => Ok(Self::Kernel(KernelDispersalSampler::new(
                kernel.clone(),
                reproduction,
            ))),
            DispersalConfig::Matrix(matrix) => Ok(Self::Matrix(CumulativeDispersalSampler::new(
                matrix,
                landscape,
                reproduction.as_ref(),
            )?)),
        }
    }
}

#[contract_trait]
impl<G: RngCore> DispersalSampler<LandscapeGrid, G> for LandscapeDispersalSampler {
    #[must_use]
    fn sample_dispersal_from_location(
        &self,
        location: &WrappedLocation,
        habitat: &LandscapeGrid,
        generation: NonNegativeF64,
        rng: &mut G,
    ) -> WrappedLocation {
        match self {
            Self::Kernel(kernel) => {
                kernel.sample_dispersal_from_location(location, habitat, generation, rng)
            },
            Self::Matrix(matrix) => {
                matrix.sample_dispersal_from_location(location, habitat, generation, rng)
            },
        }
    }
}

/// Checks whether `target` can receive a dispersing lineage at `generation`
fn is_habitable<H: Habitat>(habitat: &H, target: &WrappedLocation, generation: NonNegativeF64) -> bool {
    habitat.get_individuals_at(target, generation) > 0
}
