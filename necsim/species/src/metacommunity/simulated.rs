use std::num::NonZeroU64;

use necsim_core::cogs::{RngCore, RngSampler};
use necsim_core_bond::PositiveUnitF64;

use crate::community::SpeciesId;

/// A cached non-spatial coalescence of the whole metacommunity.
///
/// Every individual of the metacommunity is assigned a species once, and
///  immigrants are then drawn as uniformly random individuals.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct SimulatedMetacommunity {
    species: Vec<SpeciesId>,
    richness: u64,
}

impl SimulatedMetacommunity {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn simulate<G: RngCore>(
        size: NonZeroU64,
        speciation_rate: PositiveUnitF64,
        rng: &mut G,
    ) -> Self {
        let size = size.get() as usize;

        let mut active: Vec<usize> = (0..size).collect();
        let mut parent: Vec<Option<usize>> = vec![None; size];
        let mut finished = Vec::with_capacity(size);

        while !active.is_empty() {
            let index = rng.sample_index(active.len());
            let lineage = active[index];

            if active.len() == 1 || speciation_rate.accepts(rng.sample_uniform_closed_open()) {
                active.swap_remove(index);
                finished.push(lineage);
                continue;
            }

            // The parent is any of the other individuals, most are unsampled
            let slot = rng.sample_index(size - 1);

            if slot < active.len() - 1 {
                let other = if slot < index { slot } else { slot + 1 };

                parent[lineage] = Some(active[other]);

                active.swap_remove(index);
                finished.push(lineage);
            }
        }

        let mut species = vec![SpeciesId::new(0); size];
        let mut richness = 0_u64;

        // Lineages merge into parents that finish later
        for lineage in finished.into_iter().rev() {
            species[lineage] = if let Some(parent) = parent[lineage] {
                species[parent]
            } else {
                richness += 1;
                SpeciesId::new(richness - 1)
            };
        }

        debug!(
            "Simulated a metacommunity of {} individuals with {} species.",
            size, richness
        );

        Self { species, richness }
    }

    #[must_use]
    pub fn richness(&self) -> u64 {
        self.richness
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.species.len()
    }

    #[must_use]
    pub fn sample_species<G: RngCore>(&self, rng: &mut G) -> SpeciesId {
        self.species[rng.sample_index(self.species.len())]
    }
}
