mod extent;
mod location;

pub use extent::LandscapeExtent;
pub use location::{Location, WrappedLocation};
