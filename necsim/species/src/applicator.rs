use std::{
    num::NonZeroU64,
    sync::{Arc, Mutex, PoisonError},
};

use fnv::FnvHashMap;
use rayon::prelude::*;

use necsim_core::{
    cogs::{PrimeableRng, SeedableRng},
    lineage::LineageState,
};
use necsim_core_bond::PositiveUnitF64;
use necsim_impls::{cogs::rng::wyhash::WyHash, record::SimulationRecord};

use crate::{
    community::{Community, IndividualRecord, SpeciesId},
    error::ApplicationError,
    metacommunity::{
        validate_external, AnalyticalMetacommunity, ExternalMetacommunity, Metacommunity,
        MetacommunityModel, SimulatedMetacommunity,
    },
    parameters::{CommunityParameters, MetacommunityParameters},
};

/// Re-interprets the speciation draws of a complete simulation under any
///  speciation rate at least as high as the simulated minimum.
///
/// Applications only read the stored tree, so many of them can run at once.
#[derive(Debug)]
pub struct RateApplicator<'r> {
    record: &'r SimulationRecord,
    simulated: Mutex<FnvHashMap<MetacommunityParameters, Arc<SimulatedMetacommunity>>>,
}

impl<'r> RateApplicator<'r> {
    /// # Errors
    ///
    /// Returns `ApplicationError::IncompleteSimulation` if more than one
    ///  lineage of the `record` is still active.
    pub fn new(record: &'r SimulationRecord) -> Result<Self, ApplicationError> {
        let active = record.tree().number_active();

        if active > 1 {
            return Err(ApplicationError::IncompleteSimulation { active });
        }

        Ok(Self {
            record,
            simulated: Mutex::new(FnvHashMap::default()),
        })
    }

    #[must_use]
    pub fn record(&self) -> &'r SimulationRecord {
        self.record
    }

    /// Fills in the simulated protracted bounds and resolves `Auto`
    ///  metacommunities, such that equivalent requests compare equal
    #[must_use]
    pub fn normalise(&self, parameters: &CommunityParameters) -> CommunityParameters {
        CommunityParameters {
            speciation_rate: parameters.speciation_rate,
            protracted: Some(
                parameters
                    .protracted
                    .unwrap_or(self.record.metadata().protracted),
            ),
            metacommunity: parameters
                .metacommunity
                .as_ref()
                .map(MetacommunityModel::select),
        }
    }

    /// # Errors
    ///
    /// Returns an `ApplicationError` if the `parameters` ask for a rate or
    ///  protracted bounds that the simulation cannot answer, or describe an
    ///  invalid metacommunity.
    pub fn validate(&self, parameters: &CommunityParameters) -> Result<(), ApplicationError> {
        let metadata = self.record.metadata();

        if parameters.speciation_rate < metadata.min_speciation_rate {
            return Err(ApplicationError::RateBelowMinimum {
                rate: parameters.speciation_rate.get(),
                min: metadata.min_speciation_rate.get(),
            });
        }

        if let Some(requested) = parameters.protracted {
            if let (false, Some(max)) = (requested.is_consistent(), requested.max_generations) {
                return Err(ApplicationError::InconsistentProtractedBounds {
                    min: requested.min_generations,
                    max,
                });
            }

            if !requested.is_within(&metadata.protracted) {
                return Err(ApplicationError::WiderProtractedBounds {
                    requested,
                    simulated: metadata.protracted,
                });
            }
        }

        if let Some(MetacommunityParameters::External(species)) = &parameters.metacommunity {
            validate_external(species)?;
        }

        Ok(())
    }

    /// # Errors
    ///
    /// Returns an `ApplicationError` if the `parameters` are invalid for
    ///  this simulation, see [`Self::validate`].
    pub fn apply(&self, parameters: &CommunityParameters) -> Result<Community, ApplicationError> {
        self.validate(parameters)?;

        let parameters = self.normalise(parameters);
        let bounds = parameters.protracted.unwrap_or_default();

        let mut rng = self.community_rng(&parameters)?;
        let mut metacommunity = parameters
            .metacommunity
            .as_ref()
            .map(|metacommunity| self.metacommunity(metacommunity))
            .transpose()?;

        let tree = self.record.tree();

        let mut species = vec![SpeciesId::new(0); tree.len()];
        let mut next_species = 0_u64;

        // Parents are indexed above their children
        for (id, node) in tree.nodes().rev() {
            let inherited = match node.state() {
                LineageState::Coalesced { parent }
                    if !node.speciates_under(parameters.speciation_rate, &bounds) =>
                {
                    Some(species[parent.index()])
                },
                _ => None,
            };

            species[id.index()] = match (inherited, &mut metacommunity) {
                (Some(inherited), _) => inherited,
                (None, Some(metacommunity)) => metacommunity.draw_species(&mut rng),
                (None, None) => {
                    next_species += 1;
                    SpeciesId::new(next_species - 1)
                },
            };
        }

        let individuals = tree
            .leaf_origins()
            .zip(species)
            .map(|(location, species)| IndividualRecord {
                location: *location,
                species,
            })
            .collect();

        let community = Community::new(parameters, individuals);

        debug!(
            "Resolved {} species at speciation rate {}.",
            community.richness(),
            community.parameters().speciation_rate
        );

        Ok(community)
    }

    /// Applies all `parameters` in parallel, preserving their order
    ///
    /// # Errors
    ///
    /// Returns the first `ApplicationError` if any of the `parameters` are
    ///  invalid for this simulation.
    pub fn apply_all(
        &self,
        parameters: &[CommunityParameters],
    ) -> Result<Vec<Community>, ApplicationError> {
        parameters
            .par_iter()
            .map(|parameters| self.apply(parameters))
            .collect()
    }

    fn community_rng(&self, parameters: &CommunityParameters) -> Result<WyHash, ApplicationError> {
        let metadata = self.record.metadata();
        let bytes = bincode::serialize(parameters)?;

        let mut rng = WyHash::seed_from_u64(metadata.seed);
        rng.prime_with(metadata.task, wyhash::wyhash(&bytes, metadata.seed));

        Ok(rng)
    }

    fn metacommunity(
        &self,
        parameters: &MetacommunityParameters,
    ) -> Result<MetacommunityModel, ApplicationError> {
        match MetacommunityModel::select(parameters) {
            MetacommunityParameters::Analytical {
                size,
                speciation_rate,
            } => Ok(MetacommunityModel::Analytical(AnalyticalMetacommunity::new(
                size,
                speciation_rate,
            ))),
            MetacommunityParameters::External(species) => Ok(MetacommunityModel::External(
                ExternalMetacommunity::new(&species)?,
            )),
            MetacommunityParameters::Simulated {
                size,
                speciation_rate,
            }
            | MetacommunityParameters::Auto {
                size,
                speciation_rate,
                ..
            } => self
                .simulated_metacommunity(size, speciation_rate)
                .map(MetacommunityModel::Simulated),
        }
    }

    /// Simulates each distinct metacommunity only once per record
    fn simulated_metacommunity(
        &self,
        size: NonZeroU64,
        speciation_rate: PositiveUnitF64,
    ) -> Result<Arc<SimulatedMetacommunity>, ApplicationError> {
        let key = MetacommunityParameters::Simulated {
            size,
            speciation_rate,
        };
        let bytes = bincode::serialize(&key)?;

        let mut cache = self
            .simulated
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let simulated = cache.entry(key).or_insert_with(|| {
            let seed = self.record.metadata().seed;

            let mut rng = WyHash::seed_from_u64(seed);
            rng.prime_with(wyhash::wyhash(&bytes, seed), 0);

            info!(
                "Simulating a metacommunity of {} individuals at speciation rate {}.",
                size, speciation_rate
            );

            Arc::new(SimulatedMetacommunity::simulate(
                size,
                speciation_rate,
                &mut rng,
            ))
        });

        Ok(Arc::clone(simulated))
    }
}
