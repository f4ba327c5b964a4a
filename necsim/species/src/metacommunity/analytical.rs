use std::num::NonZeroU64;

use necsim_core::cogs::{RngCore, RngSampler};
use necsim_core_bond::{ClosedUnitF64, PositiveUnitF64};

use crate::community::SpeciesId;

use super::Metacommunity;

/// Samples successive immigrants from the neutral metacommunity of size
///  `J` through Hoppe's urn with `theta = nu (J - 1) / (1 - nu)`.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct AnalyticalMetacommunity {
    theta: f64,
    drawn: Vec<SpeciesId>,
    next_species: u64,
}

impl AnalyticalMetacommunity {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(size: NonZeroU64, speciation_rate: PositiveUnitF64) -> Self {
        let nu = speciation_rate.get();

        let theta = if nu >= 1.0 {
            f64::INFINITY
        } else {
            nu * ((size.get() - 1) as f64) / (1.0 - nu)
        };

        Self {
            theta,
            drawn: Vec::new(),
            next_species: 0,
        }
    }

    #[must_use]
    pub fn theta(&self) -> f64 {
        self.theta
    }

    #[allow(clippy::cast_precision_loss)]
    fn new_species_probability(&self) -> ClosedUnitF64 {
        let probability = if self.drawn.is_empty() || self.theta.is_infinite() {
            1.0
        } else {
            self.theta / (self.theta + self.drawn.len() as f64)
        };

        // Safety: theta is non-negative
        unsafe { ClosedUnitF64::new_unchecked(probability) }
    }
}

impl Metacommunity for AnalyticalMetacommunity {
    fn draw_species<G: RngCore>(&mut self, rng: &mut G) -> SpeciesId {
        let species = if rng.sample_event(self.new_species_probability()) {
            let species = SpeciesId::new(self.next_species);
            self.next_species += 1;
            species
        } else {
            self.drawn[rng.sample_index(self.drawn.len())]
        };

        self.drawn.push(species);

        species
    }
}
