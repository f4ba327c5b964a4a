use necsim_core_bond::NonNegativeF64;

use crate::landscape::{LandscapeExtent, WrappedLocation};

pub trait Habitat: core::fmt::Debug {
    /// The finite grid that all positions are wrapped onto
    #[must_use]
    fn get_extent(&self) -> &LandscapeExtent;

    /// Maps unbounded coordinates onto the grid, returning `None` iff the
    ///  position lies outside a closed landscape
    #[must_use]
    fn wrap_absolute(&self, x: i64, y: i64) -> Option<WrappedLocation>;

    #[must_use]
    fn get_individuals_at(&self, location: &WrappedLocation, generation: NonNegativeF64) -> u32;

    #[must_use]
    fn get_total_individuals(&self, generation: NonNegativeF64) -> u64 {
        let extent = self.get_extent();

        (extent.y()..(extent.y() + extent.height()))
            .flat_map(|y| (extent.x()..(extent.x() + extent.width())).map(move |x| (x, y)))
            .map(|(x, y)| {
                u64::from(self.get_individuals_at(
                    &WrappedLocation::unwrapped(crate::landscape::Location::new(x, y)),
                    generation,
                ))
            })
            .sum()
    }
}
