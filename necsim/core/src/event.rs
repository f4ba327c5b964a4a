use serde::{Deserialize, Serialize};

use necsim_core_bond::{ClosedOpenUnitF64, NonNegativeF64};

use crate::{landscape::WrappedLocation, lineage::LineageId};

/// One entry of the append-only backward-time event log.
///
/// Speciation is never resolved in the log: every event carries the raw
///  uniform draw so that it can be reinterpreted under any speciation rate
///  which is at least the simulated minimum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    SpeciationDraw {
        generation: NonNegativeF64,
        lineage: LineageId,
        age: u64,
        draw: ClosedOpenUnitF64,
    },
    Dispersal {
        generation: NonNegativeF64,
        lineage: LineageId,
        origin: WrappedLocation,
        target: WrappedLocation,
    },
    Coalescence {
        generation: NonNegativeF64,
        children: [LineageId; 2],
        parent: LineageId,
        location: WrappedLocation,
    },
}

impl Event {
    #[must_use]
    pub fn generation(&self) -> NonNegativeF64 {
        match self {
            Self::SpeciationDraw { generation, .. }
            | Self::Dispersal { generation, .. }
            | Self::Coalescence { generation, .. } => *generation,
        }
    }
}
