use fnv::FnvHashMap;

use necsim_core::{
    cogs::{RngCore, RngSampler},
    landscape::WrappedLocation,
    lineage::{Lineage, LineageId},
};
use necsim_core_bond::NonNegativeF64;

/// All lineages of one simulation, indexed by their [`LineageId`].
///
/// Active lineages are kept in a dense list for uniform selection and in a
///  spatial index from their full wrapped position to the deme's lineages.
///  A lineage that moves into a deme is always appended last.
#[derive(Debug)]
pub struct LineagePool {
    lineages: Vec<Lineage>,
    active: Vec<LineageId>,
    active_index: Vec<Option<usize>>,
    occupancy: FnvHashMap<WrappedLocation, Vec<LineageId>>,
}

impl LineagePool {
    #[must_use]
    pub fn new(origins: &[WrappedLocation]) -> Self {
        let mut pool = Self {
            lineages: Vec::with_capacity(origins.len() * 2),
            active: Vec::with_capacity(origins.len()),
            active_index: Vec::with_capacity(origins.len() * 2),
            occupancy: FnvHashMap::default(),
        };

        for origin in origins {
            pool.insert(*origin, NonNegativeF64::zero());
        }

        pool
    }

    /// Number of lineages that ever existed, active or not
    #[must_use]
    pub fn len(&self) -> usize {
        self.lineages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lineages.is_empty()
    }

    #[must_use]
    pub fn number_active(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn get(&self, id: LineageId) -> Option<&Lineage> {
        self.lineages.get(id.index())
    }

    #[must_use]
    #[debug_requires(id.index() < self.len(), "lineage exists")]
    pub fn lineage(&self, id: LineageId) -> &Lineage {
        &self.lineages[id.index()]
    }

    pub fn active_lineages(&self) -> impl Iterator<Item = &Lineage> {
        self.active.iter().map(move |id| &self.lineages[id.index()])
    }

    #[must_use]
    pub fn occupants_at(&self, location: &WrappedLocation) -> &[LineageId] {
        self.occupancy.get(location).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    #[debug_requires(self.number_active() > 0, "there is an active lineage to sample")]
    pub fn sample_active<G: RngCore>(&self, rng: &mut G) -> LineageId {
        self.active[rng.sample_index(self.active.len())]
    }

    /// Moves the active lineage `id` to `target`, ageing it by one
    ///  generation, and appends it to the occupants of `target`
    #[debug_ensures(
        self.occupants_at(&target).last() == Some(&id),
        "the mover is the last occupant"
    )]
    pub fn move_lineage(&mut self, id: LineageId, target: WrappedLocation) {
        self.remove_occupant(id);

        self.lineages[id.index()].move_to(target);

        self.occupancy.entry(target).or_default().push(id);
    }

    pub fn speciate(&mut self, id: LineageId) {
        self.deactivate(id);

        self.lineages[id.index()].speciate();
    }

    /// Merges the two active lineages into a new ancestral lineage at the
    ///  position of `child`, returning the ancestor's id
    #[debug_requires(child != other, "a lineage cannot coalesce with itself")]
    #[debug_ensures(
        self.number_active() + 1 == old(self.number_active()),
        "coalescence removes one active lineage"
    )]
    pub fn coalesce(
        &mut self,
        child: LineageId,
        other: LineageId,
        generation: NonNegativeF64,
    ) -> LineageId {
        let location = *self.lineages[child.index()].location();

        self.deactivate(child);
        self.deactivate(other);

        let parent = self.insert(location, generation);

        self.lineages[child.index()].coalesce_into(parent);
        self.lineages[other.index()].coalesce_into(parent);

        parent
    }

    fn insert(&mut self, location: WrappedLocation, birth: NonNegativeF64) -> LineageId {
        let id = LineageId::new(self.lineages.len() as u64);

        self.lineages.push(Lineage::new(id, location, birth));
        self.active_index.push(Some(self.active.len()));
        self.active.push(id);
        self.occupancy.entry(location).or_default().push(id);

        id
    }

    fn deactivate(&mut self, id: LineageId) {
        self.remove_occupant(id);

        if let Some(index) = self.active_index[id.index()].take() {
            self.active.swap_remove(index);

            if let Some(moved) = self.active.get(index) {
                self.active_index[moved.index()] = Some(index);
            }
        }
    }

    fn remove_occupant(&mut self, id: LineageId) {
        let location = *self.lineages[id.index()].location();

        if let Some(occupants) = self.occupancy.get_mut(&location) {
            if let Some(position) = occupants.iter().position(|occupant| *occupant == id) {
                occupants.remove(position);
            }

            if occupants.is_empty() {
                self.occupancy.remove(&location);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use necsim_core::{
        landscape::{Location, WrappedLocation},
        lineage::{LineageId, LineageState},
    };
    use necsim_core_bond::NonNegativeF64;

    use crate::cogs::rng::wyhash::WyHash;

    use super::LineagePool;

    fn at(x: u32, y: u32, x_wrap: i32) -> WrappedLocation {
        WrappedLocation::new(Location::new(x, y), x_wrap, 0)
    }

    #[test]
    fn occupancy_is_keyed_by_wrapped_position() {
        let pool = LineagePool::new(&[at(0, 0, 0), at(0, 0, 0), at(0, 0, 1)]);

        assert_eq!(pool.occupants_at(&at(0, 0, 0)).len(), 2);
        assert_eq!(pool.occupants_at(&at(0, 0, 1)), &[LineageId::new(2)]);
        assert!(pool.occupants_at(&at(1, 0, 0)).is_empty());
    }

    #[test]
    fn moving_ages_and_appends() {
        let mut pool = LineagePool::new(&[at(0, 0, 0), at(1, 0, 0), at(1, 0, 0)]);

        pool.move_lineage(LineageId::new(0), at(1, 0, 0));

        assert_eq!(
            pool.occupants_at(&at(1, 0, 0)),
            &[LineageId::new(1), LineageId::new(2), LineageId::new(0)]
        );
        assert!(pool.occupants_at(&at(0, 0, 0)).is_empty());
        assert_eq!(pool.get(LineageId::new(0)).unwrap().age(), 1);
    }

    #[test]
    fn coalescence_creates_younger_parent() {
        let mut pool = LineagePool::new(&[at(0, 0, 0), at(1, 0, 0), at(2, 0, 0)]);

        pool.move_lineage(LineageId::new(2), at(1, 0, 0));

        let generation = NonNegativeF64::new(3.5).unwrap();
        let parent = pool.coalesce(LineageId::new(2), LineageId::new(1), generation);

        assert_eq!(parent, LineageId::new(3));
        assert_eq!(pool.number_active(), 2);
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.occupants_at(&at(1, 0, 0)), &[parent]);

        let parent_lineage = pool.get(parent).unwrap();
        assert_eq!(parent_lineage.age(), 0);
        assert_eq!(parent_lineage.birth(), generation);

        assert_eq!(
            pool.get(LineageId::new(1)).unwrap().state(),
            LineageState::Coalesced { parent }
        );
        assert_eq!(
            pool.get(LineageId::new(2)).unwrap().state(),
            LineageState::Coalesced { parent }
        );

        let mut active: Vec<_> = pool.active_lineages().map(|lineage| lineage.id()).collect();
        active.sort();
        assert_eq!(active, vec![LineageId::new(0), parent]);
    }

    #[test]
    fn speciation_deactivates() {
        let mut pool = LineagePool::new(&[at(0, 0, 0), at(1, 0, 0)]);
        pool.speciate(LineageId::new(0));

        let mut rng = WyHash::for_task(0, 0);

        for _ in 0..100 {
            assert_eq!(pool.sample_active(&mut rng), LineageId::new(1));
        }

        assert!(pool.occupants_at(&at(0, 0, 0)).is_empty());
        assert_eq!(
            pool.get(LineageId::new(0)).unwrap().state(),
            LineageState::Speciated
        );
    }
}
