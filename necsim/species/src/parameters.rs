use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use necsim_core_bond::PositiveUnitF64;
use necsim_impls::simulation::ProtractedBounds;

/// Default size below which `Auto` metacommunities are simulated
pub const DEFAULT_SIMULATION_THRESHOLD: u64 = 100_000;

/// One request to resolve communities from a finished simulation
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommunityParameters {
    pub speciation_rate: PositiveUnitF64,
    /// Defaults to the simulated bounds
    #[serde(default)]
    pub protracted: Option<ProtractedBounds>,
    /// Speciating lineages found a new species if absent, otherwise they
    ///  draw an immigrant species from the metacommunity
    #[serde(default)]
    pub metacommunity: Option<MetacommunityParameters>,
}

impl CommunityParameters {
    #[must_use]
    pub fn new(speciation_rate: PositiveUnitF64) -> Self {
        Self {
            speciation_rate,
            protracted: None,
            metacommunity: None,
        }
    }

    #[must_use]
    pub fn with_protracted(mut self, protracted: ProtractedBounds) -> Self {
        self.protracted = Some(protracted);
        self
    }

    #[must_use]
    pub fn with_metacommunity(mut self, metacommunity: MetacommunityParameters) -> Self {
        self.metacommunity = Some(metacommunity);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetacommunityParameters {
    Simulated {
        size: NonZeroU64,
        speciation_rate: PositiveUnitF64,
    },
    Analytical {
        size: NonZeroU64,
        speciation_rate: PositiveUnitF64,
    },
    Auto {
        size: NonZeroU64,
        speciation_rate: PositiveUnitF64,
        #[serde(default = "default_simulation_threshold")]
        threshold: u64,
    },
    External(Vec<ExternalSpecies>),
}

fn default_simulation_threshold() -> u64 {
    DEFAULT_SIMULATION_THRESHOLD
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExternalSpecies {
    pub species: u64,
    pub abundance: u64,
}
