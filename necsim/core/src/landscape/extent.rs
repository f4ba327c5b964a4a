use serde::{Deserialize, Serialize};

use super::{Location, WrappedLocation};

#[derive(PartialEq, Eq, Clone, Debug, Serialize, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub struct LandscapeExtent {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl LandscapeExtent {
    #[must_use]
    #[debug_requires(width > 0 && height > 0, "extent is non-empty")]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    #[must_use]
    pub fn contains(&self, location: &Location) -> bool {
        location.x() >= self.x
            && location.x() < (self.x + self.width)
            && location.y() >= self.y
            && location.y() < (self.y + self.height)
    }

    /// Checks whether `other` lies entirely inside this extent
    #[must_use]
    pub fn encloses(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && u64::from(other.x) + u64::from(other.width)
                <= u64::from(self.x) + u64::from(self.width)
            && u64::from(other.y) + u64::from(other.height)
                <= u64::from(self.y) + u64::from(self.height)
    }

    /// Unbounded coordinates of a wrapped location
    #[must_use]
    pub fn absolute(&self, location: &WrappedLocation) -> (i64, i64) {
        (
            i64::from(location.x_wrap()) * i64::from(self.width) + i64::from(location.x()),
            i64::from(location.y_wrap()) * i64::from(self.height) + i64::from(location.y()),
        )
    }

    /// Folds unbounded coordinates back onto this extent using Euclidean
    ///  division, i.e. `x = x_abs mod width` and `x_wrap = x_abs div width`
    #[must_use]
    pub fn wrap(&self, x: i64, y: i64) -> WrappedLocation {
        let (x, x_wrap) = Self::wrap_axis(x, self.width);
        let (y, y_wrap) = Self::wrap_axis(y, self.height);

        WrappedLocation::new(Location::new(x, y), x_wrap, y_wrap)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn wrap_axis(position: i64, length: u32) -> (u32, i32) {
        let length = i64::from(length);

        let wrap = position
            .div_euclid(length)
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX));

        (position.rem_euclid(length) as u32, wrap as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_negative_coordinates() {
        let extent = LandscapeExtent::new(0, 0, 10, 5);

        assert_eq!(
            extent.wrap(-1, 0),
            WrappedLocation::new(Location::new(9, 0), -1, 0)
        );
        assert_eq!(
            extent.wrap(-10, -5),
            WrappedLocation::new(Location::new(0, 0), -1, -1)
        );
        assert_eq!(
            extent.wrap(-11, 12),
            WrappedLocation::new(Location::new(9, 2), -2, 2)
        );
    }

    #[test]
    fn wrap_round_trips() {
        let extent = LandscapeExtent::new(0, 0, 7, 3);

        for x in -30..30 {
            for y in -30..30 {
                let wrapped = extent.wrap(x, y);

                assert!(wrapped.x() < 7 && wrapped.y() < 3);
                assert_eq!(extent.absolute(&wrapped), (x, y));
                assert_eq!(wrapped.is_wrapped(), !(0..7).contains(&x) || !(0..3).contains(&y));
            }
        }
    }

    #[test]
    fn same_cell_different_wraps_are_distinct() {
        let extent = LandscapeExtent::new(0, 0, 4, 4);

        let home = extent.wrap(1, 1);
        let away = extent.wrap(5, 1);

        assert_eq!(home.location(), away.location());
        assert_ne!(home, away);
    }

    #[test]
    fn encloses_and_contains() {
        let outer = LandscapeExtent::new(0, 0, 10, 10);

        assert!(outer.encloses(&LandscapeExtent::new(2, 3, 8, 7)));
        assert!(!outer.encloses(&LandscapeExtent::new(2, 3, 9, 7)));
        assert!(outer.contains(&Location::new(9, 9)));
        assert!(!outer.contains(&Location::new(10, 0)));
    }
}
