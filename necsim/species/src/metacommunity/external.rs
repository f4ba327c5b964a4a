use necsim_core::cogs::{RngCore, RngSampler};

use crate::{community::SpeciesId, error::ApplicationError, parameters::ExternalSpecies};

use super::{validate_external, Metacommunity};

/// A fixed species-abundance table sampled by inverse CDF
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct ExternalMetacommunity {
    species: Vec<SpeciesId>,
    cumulative_abundance: Vec<u64>,
}

impl ExternalMetacommunity {
    /// # Errors
    ///
    /// Returns `ApplicationError::InvalidMetacommunity` if the table holds
    ///  no individuals.
    pub fn new(table: &[ExternalSpecies]) -> Result<Self, ApplicationError> {
        validate_external(table)?;

        let mut species = Vec::with_capacity(table.len());
        let mut cumulative_abundance = Vec::with_capacity(table.len());
        let mut total = 0_u64;

        for entry in table.iter().filter(|entry| entry.abundance > 0) {
            total += entry.abundance;

            species.push(SpeciesId::new(entry.species));
            cumulative_abundance.push(total);
        }

        Ok(Self {
            species,
            cumulative_abundance,
        })
    }

    #[must_use]
    pub fn total_abundance(&self) -> u64 {
        self.cumulative_abundance.last().copied().unwrap_or(0)
    }
}

impl Metacommunity for ExternalMetacommunity {
    fn draw_species<G: RngCore>(&mut self, rng: &mut G) -> SpeciesId {
        let individual = rng.sample_index_u64(self.total_abundance());

        let index = self
            .cumulative_abundance
            .partition_point(|cumulative| *cumulative <= individual);

        self.species[index.min(self.species.len() - 1)]
    }
}
