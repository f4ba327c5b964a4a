use core::fmt;

use serde::{Deserialize, Serialize};

use necsim_core_bond::NonNegativeF64;

use crate::landscape::WrappedLocation;

/// Dense lineage identity, doubling as the index of the lineage's node in
///  the coalescence tree
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[allow(clippy::module_name_repetitions)]
pub struct LineageId(u64);

impl LineageId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LineageId {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "#{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub enum LineageState {
    Active,
    Coalesced { parent: LineageId },
    Speciated,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    id: LineageId,
    location: WrappedLocation,
    age: u64,
    birth: NonNegativeF64,
    state: LineageState,
}

impl Lineage {
    #[must_use]
    pub fn new(id: LineageId, location: WrappedLocation, birth: NonNegativeF64) -> Self {
        Self {
            id,
            location,
            age: 0,
            birth,
            state: LineageState::Active,
        }
    }

    #[must_use]
    pub fn id(&self) -> LineageId {
        self.id
    }

    #[must_use]
    pub fn location(&self) -> &WrappedLocation {
        &self.location
    }

    /// Number of backward generations (events) since this lineage's birth
    #[must_use]
    pub fn age(&self) -> u64 {
        self.age
    }

    #[must_use]
    pub fn birth(&self) -> NonNegativeF64 {
        self.birth
    }

    #[must_use]
    pub fn state(&self) -> LineageState {
        self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, LineageState::Active)
    }

    #[debug_requires(self.is_active(), "only active lineages move")]
    #[debug_ensures(self.age == old(self.age) + 1, "moving ages the lineage")]
    pub fn move_to(&mut self, location: WrappedLocation) {
        self.location = location;
        self.age += 1;
    }

    #[debug_requires(self.is_active(), "only active lineages speciate")]
    pub fn speciate(&mut self) {
        self.state = LineageState::Speciated;
    }

    #[debug_requires(self.is_active(), "only active lineages coalesce")]
    #[debug_requires(parent.get() > self.id.get(), "parents are younger than children")]
    pub fn coalesce_into(&mut self, parent: LineageId) {
        self.state = LineageState::Coalesced { parent };
    }
}
