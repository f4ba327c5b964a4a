use std::{fmt, sync::Arc};

use necsim_core::cogs::RngCore;

use crate::{
    community::SpeciesId,
    error::ApplicationError,
    parameters::{ExternalSpecies, MetacommunityParameters},
};

mod analytical;
mod external;
mod simulated;

pub use analytical::AnalyticalMetacommunity;
pub use external::ExternalMetacommunity;
pub use simulated::SimulatedMetacommunity;

/// Source of the immigrant species that speciating lineages draw
pub trait Metacommunity: fmt::Debug {
    fn draw_species<G: RngCore>(&mut self, rng: &mut G) -> SpeciesId;
}

#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum MetacommunityModel {
    Simulated(Arc<SimulatedMetacommunity>),
    Analytical(AnalyticalMetacommunity),
    External(ExternalMetacommunity),
}

impl MetacommunityModel {
    /// Resolves `Auto` parameters into the concrete model they select
    #[must_use]
    pub fn select(parameters: &MetacommunityParameters) -> MetacommunityParameters {
        match parameters {
            MetacommunityParameters::Auto {
                size,
                speciation_rate,
                threshold,
            } => {
                if size.get() < *threshold {
                    MetacommunityParameters::Simulated {
                        size: *size,
                        speciation_rate: *speciation_rate,
                    }
                } else {
                    MetacommunityParameters::Analytical {
                        size: *size,
                        speciation_rate: *speciation_rate,
                    }
                }
            },
            parameters => parameters.clone(),
        }
    }
}

impl Metacommunity for MetacommunityModel {
    fn draw_species<G: RngCore>(&mut self, rng: &mut G) -> SpeciesId {
        match self {
            Self::Simulated(simulated) => simulated.sample_species(rng),
            Self::Analytical(analytical) => analytical.draw_species(rng),
            Self::External(external) => external.draw_species(rng),
        }
    }
}

pub(crate) fn validate_external(species: &[ExternalSpecies]) -> Result<u64, ApplicationError> {
    let total = species
        .iter()
        .try_fold(0_u64, |total, species| total.checked_add(species.abundance))
        .ok_or(ApplicationError::InvalidMetacommunity {
            reason: "the total external abundance overflows",
        })?;

    if total == 0 {
        return Err(ApplicationError::InvalidMetacommunity {
            reason: "the external abundance table is empty",
        });
    }

    Ok(total)
}
