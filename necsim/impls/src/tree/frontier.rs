use serde::{Deserialize, Serialize};

use necsim_core_bond::ClosedOpenUnitF64;

/// The speciation draws of one lineage segment that are strict suffix
///  minima by age.
///
/// Ages and draws are both strictly increasing along the frontier, so the
///  minimum draw at or above any age is the first entry at or above it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciationFrontier {
    draws: Vec<(u64, ClosedOpenUnitF64)>,
}

impl SpeciationFrontier {
    #[debug_requires(
        self.draws.last().map_or(true, |(last_age, _)| *last_age < age),
        "draws arrive in increasing age order"
    )]
    pub fn push(&mut self, age: u64, draw: ClosedOpenUnitF64) {
        while matches!(self.draws.last(), Some((_, last_draw)) if *last_draw >= draw) {
            self.draws.pop();
        }

        self.draws.push((age, draw));
    }

    /// The smallest draw recorded at an age of at least `min_age`
    #[must_use]
    pub fn min_draw_from(&self, min_age: u64) -> Option<ClosedOpenUnitF64> {
        let index = self.draws.partition_point(|(age, _)| *age < min_age);

        self.draws.get(index).map(|(_, draw)| *draw)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(u64, ClosedOpenUnitF64)> {
        self.draws.iter()
    }
}
