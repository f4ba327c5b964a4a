use serde::{Deserialize, Serialize};

use necsim_core_bond::{
    ClosedOpenUnitF64, ClosedUnitF64, NonNegativeF64, PositiveF64, PositiveUnitF64,
};

use crate::cogs::{
    dispersal_sampler::DispersalKernel,
    habitat::{LandscapeMap, LandscapeType},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    pub landscape: LandscapeConfig,
    #[serde(default)]
    pub sample: SampleConfig,
    pub dispersal: DispersalConfig,
    #[serde(default)]
    pub reproduction: Option<RateMapConfig>,
    #[serde(default)]
    pub death: Option<RateMapConfig>,
    pub speciation: SpeciationConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LandscapeConfig {
    pub fine: LandscapeMap,
    #[serde(default)]
    pub fine_offset: MapOffset,
    #[serde(default)]
    pub coarse: Option<CoarseMapConfig>,
    #[serde(default)]
    pub landscape_type: LandscapeType,
    #[serde(default)]
    pub historical: Vec<HistoricalMapConfig>,
    pub deme: PositiveF64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapOffset {
    pub x: u32,
    pub y: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoarseMapConfig {
    pub map: LandscapeMap,
    /// Number of fine cells along each side of a coarse cell
    pub scale: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoricalMapConfig {
    pub fine: LandscapeMap,
    #[serde(default)]
    pub coarse: Option<LandscapeMap>,
    pub generation: NonNegativeF64,
    /// Per-generation blending weight, zero switches abruptly
    #[serde(default = "ClosedUnitF64::zero")]
    pub rate: ClosedUnitF64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SampleConfig {
    /// Sampled proportion per fine map cell, the whole fine map if absent
    #[serde(default)]
    pub mask: Option<LandscapeMap>,
    #[serde(default)]
    pub offset: MapOffset,
    #[serde(default = "ClosedUnitF64::one")]
    pub sample_size: ClosedUnitF64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            mask: None,
            offset: MapOffset::default(),
            sample_size: ClosedUnitF64::one(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum DispersalConfig {
    Kernel(DispersalKernel),
    /// Row-major `(W*H) x (W*H)` matrix over the fine map cells
    Matrix(LandscapeMap),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateMapConfig {
    pub fine: LandscapeMap,
    #[serde(default)]
    pub coarse: Option<LandscapeMap>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeciationConfig {
    pub min_rate: PositiveUnitF64,
    #[serde(default)]
    pub protracted: Option<ProtractedBounds>,
}

/// Lineage ages (in generations since birth) between which speciation is
///  allowed, and beyond which it is forced
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtractedBounds {
    pub min_generations: u64,
    #[serde(default)]
    pub max_generations: Option<u64>,
}

impl ProtractedBounds {
    /// The bounds of a non-protracted simulation
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            min_generations: 0,
            max_generations: None,
        }
    }

    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.max_generations
            .map_or(true, |max| self.min_generations <= max)
    }

    /// Checks that these bounds are no wider than `simulated`, i.e. that
    ///  they only allow speciation at ages that were replayable
    #[must_use]
    pub fn is_within(&self, simulated: &Self) -> bool {
        let min_ok = self.min_generations <= simulated.min_generations;

        let max_ok = match (self.max_generations, simulated.max_generations) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(requested), Some(simulated)) => requested <= simulated,
        };

        min_ok && max_ok
    }

    /// Decides whether a draw `u` at lineage `age` speciates under `rate`
    #[must_use]
    pub fn speciates(&self, rate: PositiveUnitF64, age: u64, u: ClosedOpenUnitF64) -> bool {
        age >= self.min_generations
            && (rate.accepts(u) || self.max_generations.map_or(false, |max| age >= max))
    }
}

impl Default for ProtractedBounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationBudget {
    pub max_steps: Option<u64>,
    pub max_wall_time: Option<std::time::Duration>,
}

impl SimulationBudget {
    #[must_use]
    pub fn unlimited() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn steps(max_steps: u64) -> Self {
        Self {
            max_steps: Some(max_steps),
            max_wall_time: None,
        }
    }
}
