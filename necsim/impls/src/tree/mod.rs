use serde::{Deserialize, Serialize};

use necsim_core::{
    landscape::WrappedLocation,
    lineage::{LineageId, LineageState},
};
use necsim_core_bond::{ClosedOpenUnitF64, NonNegativeF64, PositiveUnitF64};

use crate::simulation::ProtractedBounds;

mod builder;
mod frontier;

pub use builder::CoalescenceTreeBuilder;
pub use frontier::SpeciationFrontier;

/// One lineage segment, from its birth (sampling or coalescence) until it
///  coalesced, speciated, or the simulation ended
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    birth: NonNegativeF64,
    origin: WrappedLocation,
    state: LineageState,
    frontier: SpeciationFrontier,
    last_draw_age: Option<u64>,
}

impl TreeNode {
    #[must_use]
    pub fn new(birth: NonNegativeF64, origin: WrappedLocation) -> Self {
        Self {
            birth,
            origin,
            state: LineageState::Active,
            frontier: SpeciationFrontier::default(),
            last_draw_age: None,
        }
    }

    #[must_use]
    pub fn birth(&self) -> NonNegativeF64 {
        self.birth
    }

    #[must_use]
    pub fn origin(&self) -> &WrappedLocation {
        &self.origin
    }

    #[must_use]
    pub fn state(&self) -> LineageState {
        self.state
    }

    #[must_use]
    pub fn parent(&self) -> Option<LineageId> {
        match self.state {
            LineageState::Coalesced { parent } => Some(parent),
            LineageState::Active | LineageState::Speciated => None,
        }
    }

    #[must_use]
    pub fn frontier(&self) -> &SpeciationFrontier {
        &self.frontier
    }

    #[must_use]
    pub fn last_draw_age(&self) -> Option<u64> {
        self.last_draw_age
    }

    /// Replays this segment's draws: it speciates iff some draw at an age of
    ///  at least `min_generations` is below `rate` or happened at an age of
    ///  at least `max_generations`
    #[must_use]
    pub fn speciates_under(&self, rate: PositiveUnitF64, bounds: &ProtractedBounds) -> bool {
        if let Some(draw) = self.frontier.min_draw_from(bounds.min_generations) {
            if rate.accepts(draw) {
                return true;
            }
        }

        match (bounds.max_generations, self.last_draw_age) {
            (Some(max_generations), Some(last_draw_age)) => {
                last_draw_age >= max_generations.max(bounds.min_generations)
            },
            _ => false,
        }
    }

    fn record_draw(&mut self, age: u64, draw: ClosedOpenUnitF64) {
        self.frontier.push(age, draw);
        self.last_draw_age = Some(age);
    }
}

/// Arena of lineage segments where a node's index is its [`LineageId`].
///
/// Leaves occupy the first indices, and parents are always created after
///  (and thus indexed above) both of their children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoalescenceTree {
    nodes: Vec<TreeNode>,
    leaves: usize,
}

impl CoalescenceTree {
    #[must_use]
    pub fn leaves(&self) -> usize {
        self.leaves
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The sampled locations of the leaves, indexed by their [`LineageId`]
    pub fn leaf_origins(&self) -> impl Iterator<Item = &WrappedLocation> {
        self.nodes[..self.leaves].iter().map(TreeNode::origin)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn node(&self, id: LineageId) -> Option<&TreeNode> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = (LineageId, &TreeNode)> + ExactSizeIterator {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (LineageId::new(index as u64), node))
    }

    #[must_use]
    pub fn number_active(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.state == LineageState::Active)
            .count()
    }

    /// A simulation is complete once at most the root lineage remains active
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.number_active() <= 1
    }
}

#[cfg(test)]
mod tests {
    use necsim_core::landscape::{Location, WrappedLocation};
    use necsim_core_bond::{ClosedOpenUnitF64, NonNegativeF64, PositiveUnitF64};

    use crate::simulation::ProtractedBounds;

    use super::TreeNode;

    fn node(draws: &[f64]) -> TreeNode {
        let mut node = TreeNode::new(
            NonNegativeF64::zero(),
            WrappedLocation::unwrapped(Location::new(0, 0)),
        );

        for (age, draw) in draws.iter().enumerate() {
            node.record_draw(age as u64, ClosedOpenUnitF64::new(*draw).unwrap());
        }

        node
    }

    fn rate(rate: f64) -> PositiveUnitF64 {
        PositiveUnitF64::new(rate).unwrap()
    }

    #[test]
    fn speciation_depends_on_rate() {
        let node = node(&[0.5, 0.2, 0.7, 0.15]);
        let unbounded = ProtractedBounds::unbounded();

        assert!(!node.speciates_under(rate(0.1), &unbounded));
        assert!(!node.speciates_under(rate(0.15), &unbounded));
        assert!(node.speciates_under(rate(0.16), &unbounded));
    }

    #[test]
    fn protracted_bounds_are_respected() {
        let node = node(&[0.01, 0.5, 0.6, 0.7]);

        let min_only = ProtractedBounds {
            min_generations: 1,
            max_generations: None,
        };
        assert!(!node.speciates_under(rate(0.1), &min_only));
        assert!(node.speciates_under(rate(0.55), &min_only));

        let forced = ProtractedBounds {
            min_generations: 1,
            max_generations: Some(3),
        };
        assert!(node.speciates_under(rate(0.1), &forced));

        let too_late = ProtractedBounds {
            min_generations: 1,
            max_generations: Some(4),
        };
        assert!(!node.speciates_under(rate(0.1), &too_late));
    }
}
