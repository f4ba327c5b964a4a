use fnv::FnvHashMap;

use crate::{
    applicator::RateApplicator,
    community::{Community, CommunityReference},
    error::ApplicationError,
    parameters::CommunityParameters,
};

/// Hands out stable references to communities of one simulation record and
///  resolves each distinct request only once
#[derive(Debug, Default)]
pub struct CommunityCatalogue {
    references: FnvHashMap<CommunityParameters, CommunityReference>,
    parameters: Vec<CommunityParameters>,
    communities: Vec<Option<Community>>,
}

impl CommunityCatalogue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Registers a request, returning the existing reference if an
    ///  equivalent request was registered before
    ///
    /// # Errors
    ///
    /// Returns an `ApplicationError` if the `parameters` are invalid for the
    ///  applicator's simulation.
    pub fn register(
        &mut self,
        applicator: &RateApplicator,
        parameters: &CommunityParameters,
    ) -> Result<CommunityReference, ApplicationError> {
        applicator.validate(parameters)?;

        let parameters = applicator.normalise(parameters);

        if let Some(reference) = self.references.get(&parameters) {
            return Ok(*reference);
        }

        let reference = CommunityReference::new(self.parameters.len());

        self.references.insert(parameters.clone(), reference);
        self.parameters.push(parameters);
        self.communities.push(None);

        Ok(reference)
    }

    /// Resolves all registered but not yet resolved communities and returns
    ///  how many were resolved
    ///
    /// # Errors
    ///
    /// Returns an `ApplicationError` if any of the pending applications fails.
    pub fn resolve(&mut self, applicator: &RateApplicator) -> Result<usize, ApplicationError> {
        let pending: Vec<usize> = self
            .communities
            .iter()
            .enumerate()
            .filter_map(|(index, community)| community.is_none().then_some(index))
            .collect();

        let parameters: Vec<CommunityParameters> = pending
            .iter()
            .map(|index| self.parameters[*index].clone())
            .collect();

        let communities = applicator.apply_all(&parameters)?;

        for (index, community) in pending.iter().zip(communities) {
            self.communities[*index] = Some(community);
        }

        info!(
            "Resolved {} of {} registered communities.",
            pending.len(),
            self.len()
        );

        Ok(pending.len())
    }

    #[must_use]
    pub fn parameters(&self, reference: CommunityReference) -> Option<&CommunityParameters> {
        self.parameters.get(reference.index())
    }

    /// Returns `None` for unknown or not yet resolved references
    #[must_use]
    pub fn community(&self, reference: CommunityReference) -> Option<&Community> {
        self.communities
            .get(reference.index())
            .and_then(Option::as_ref)
    }

    pub fn communities(&self) -> impl Iterator<Item = (CommunityReference, &Community)> {
        self.communities
            .iter()
            .enumerate()
            .filter_map(|(index, community)| {
                community
                    .as_ref()
                    .map(|community| (CommunityReference::new(index), community))
            })
    }
}
