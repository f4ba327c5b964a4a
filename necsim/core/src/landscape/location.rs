use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Hash, Debug, Serialize, Deserialize)]
pub struct Location {
    x: u32,
    y: u32,
}

impl Location {
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }
}

/// A grid cell together with the number of times the position has wrapped
///  around the (finite) grid along each axis.
///
/// Two lineages only share a deme iff all four components match.
#[derive(Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Hash, Debug, Serialize, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub struct WrappedLocation {
    location: Location,
    x_wrap: i32,
    y_wrap: i32,
}

impl WrappedLocation {
    #[must_use]
    pub const fn new(location: Location, x_wrap: i32, y_wrap: i32) -> Self {
        Self {
            location,
            x_wrap,
            y_wrap,
        }
    }

    #[must_use]
    pub const fn unwrapped(location: Location) -> Self {
        Self::new(location, 0, 0)
    }

    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub const fn x(&self) -> u32 {
        self.location.x
    }

    #[must_use]
    pub const fn y(&self) -> u32 {
        self.location.y
    }

    #[must_use]
    pub const fn x_wrap(&self) -> i32 {
        self.x_wrap
    }

    #[must_use]
    pub const fn y_wrap(&self) -> i32 {
        self.y_wrap
    }

    #[must_use]
    pub const fn is_wrapped(&self) -> bool {
        self.x_wrap != 0 || self.y_wrap != 0
    }
}

impl From<Location> for WrappedLocation {
    fn from(location: Location) -> Self {
        Self::unwrapped(location)
    }
}
