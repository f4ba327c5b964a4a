#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
extern crate log;

pub mod applicator;
pub mod catalogue;
pub mod community;
pub mod error;
pub mod metacommunity;
pub mod parameters;

pub use applicator::RateApplicator;
pub use catalogue::CommunityCatalogue;
pub use community::{Community, CommunityReference, SpeciesId};
pub use error::ApplicationError;
pub use parameters::{CommunityParameters, ExternalSpecies, MetacommunityParameters};
