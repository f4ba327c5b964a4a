use necsim_core::{
    event::Event,
    landscape::WrappedLocation,
    lineage::{LineageId, LineageState},
    reporter::Reporter,
};
use necsim_core_bond::NonNegativeF64;

use super::{CoalescenceTree, TreeNode};

/// Folds the event stream of a simulation into a [`CoalescenceTree`].
///
/// A lineage speciated iff its speciation draw is not immediately followed
///  by its own dispersal.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CoalescenceTreeBuilder {
    nodes: Vec<TreeNode>,
    leaves: usize,
    pending_draw: Option<LineageId>,
}

impl CoalescenceTreeBuilder {
    #[must_use]
    pub fn new(origins: &[WrappedLocation]) -> Self {
        Self {
            nodes: origins
                .iter()
                .map(|origin| TreeNode::new(NonNegativeF64::zero(), *origin))
                .collect(),
            leaves: origins.len(),
            pending_draw: None,
        }
    }

    #[must_use]
    pub fn build(mut self) -> CoalescenceTree {
        self.resolve_pending_draw(None);

        CoalescenceTree {
            nodes: self.nodes,
            leaves: self.leaves,
        }
    }

    /// Marks the lineage of an unmatched speciation draw as speciated
    fn resolve_pending_draw(&mut self, dispersing: Option<LineageId>) {
        if let Some(pending) = self.pending_draw.take() {
            if Some(pending) != dispersing {
                self.nodes[pending.index()].state = LineageState::Speciated;
            }
        }
    }
}

impl Reporter for CoalescenceTreeBuilder {
    fn report_event(&mut self, event: &Event) {
        match event {
            Event::SpeciationDraw {
                lineage, age, draw, ..
            } => {
                self.resolve_pending_draw(None);

                self.nodes[lineage.index()].record_draw(*age, *draw);
                self.pending_draw = Some(*lineage);
            },
            Event::Dispersal { lineage, .. } => {
                self.resolve_pending_draw(Some(*lineage));
            },
            Event::Coalescence {
                generation,
                children,
                parent,
                location,
            } => {
                self.resolve_pending_draw(None);

                debug_assert_eq!(
                    parent.index(),
                    self.nodes.len(),
                    "coalescence parents are numbered consecutively"
                );

                for child in children {
                    self.nodes[child.index()].state = LineageState::Coalesced { parent: *parent };
                }

                self.nodes.push(TreeNode::new(*generation, *location));
            },
        }
    }
}
