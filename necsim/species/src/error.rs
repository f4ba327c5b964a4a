use thiserror::Error;

use necsim_impls::simulation::ProtractedBounds;

#[derive(Debug, Error, displaydoc::Display)]
#[allow(clippy::module_name_repetitions)]
pub enum ApplicationError {
    /// the speciation rate {rate} is below the simulated minimum of {min}
    RateBelowMinimum { rate: f64, min: f64 },
    /// the protracted bounds {requested:?} are wider than the simulated {simulated:?}
    WiderProtractedBounds {
        requested: ProtractedBounds,
        simulated: ProtractedBounds,
    },
    /// the minimum protracted age {min} exceeds the maximum {max}
    InconsistentProtractedBounds { min: u64, max: u64 },
    /// the simulation is incomplete with {active} active lineages
    IncompleteSimulation { active: usize },
    /// invalid metacommunity: {reason}
    InvalidMetacommunity { reason: &'static str },
    /// failed to encode the community parameters: {0}
    Encoding(#[from] bincode::Error),
}
