use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use necsim_core::landscape::WrappedLocation;

use crate::parameters::CommunityParameters;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(u64);

impl SpeciesId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "species-{}", self.0)
    }
}

/// Stable handle of a community inside a `CommunityCatalogue`
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommunityReference(u64);

impl CommunityReference {
    #[must_use]
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u64)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualRecord {
    pub location: WrappedLocation,
    pub species: SpeciesId,
}

/// The species identity of every sampled individual under one set of
///  `CommunityParameters`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    parameters: CommunityParameters,
    individuals: Vec<IndividualRecord>,
}

impl Community {
    #[must_use]
    pub(crate) fn new(parameters: CommunityParameters, individuals: Vec<IndividualRecord>) -> Self {
        Self {
            parameters,
            individuals,
        }
    }

    #[must_use]
    pub fn parameters(&self) -> &CommunityParameters {
        &self.parameters
    }

    /// The per-individual location table, indexed like the sampled leaves
    #[must_use]
    pub fn individuals(&self) -> &[IndividualRecord] {
        &self.individuals
    }

    #[must_use]
    pub fn species_of(&self, individual: usize) -> Option<SpeciesId> {
        self.individuals
            .get(individual)
            .map(|individual| individual.species)
    }

    #[must_use]
    pub fn abundances(&self) -> BTreeMap<SpeciesId, u64> {
        let mut abundances = BTreeMap::new();

        for individual in &self.individuals {
            *abundances.entry(individual.species).or_insert(0) += 1;
        }

        abundances
    }

    #[must_use]
    pub fn richness(&self) -> usize {
        self.abundances().len()
    }

    /// Species abundances per sampled location
    #[must_use]
    pub fn abundances_by_location(&self) -> BTreeMap<WrappedLocation, BTreeMap<SpeciesId, u64>> {
        let mut table: BTreeMap<WrappedLocation, BTreeMap<SpeciesId, u64>> = BTreeMap::new();

        for individual in &self.individuals {
            *table
                .entry(individual.location)
                .or_default()
                .entry(individual.species)
                .or_insert(0) += 1;
        }

        table
    }
}

#[cfg(test)]
mod tests {
    use necsim_core::landscape::{Location, WrappedLocation};
    use necsim_core_bond::PositiveUnitF64;

    use super::{Community, IndividualRecord, SpeciesId};
    use crate::parameters::CommunityParameters;

    #[test]
    fn abundance_tables() {
        let here = WrappedLocation::unwrapped(Location::new(0, 0));
        let there = WrappedLocation::unwrapped(Location::new(1, 0));

        let community = Community::new(
            CommunityParameters::new(PositiveUnitF64::new(0.1).unwrap()),
            vec![
                IndividualRecord {
                    location: here,
                    species: SpeciesId::new(3),
                },
                IndividualRecord {
                    location: here,
                    species: SpeciesId::new(1),
                },
                IndividualRecord {
                    location: there,
                    species: SpeciesId::new(3),
                },
            ],
        );

        assert_eq!(community.richness(), 2);
        assert_eq!(community.abundances()[&SpeciesId::new(3)], 2);
        assert_eq!(community.species_of(1), Some(SpeciesId::new(1)));
        assert_eq!(community.species_of(3), None);

        let by_location = community.abundances_by_location();
        assert_eq!(by_location[&here].len(), 2);
        assert_eq!(by_location[&there][&SpeciesId::new(3)], 1);
    }
}
