use core::{
    cmp::Ordering,
    convert::TryFrom,
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use crate::ClosedOpenUnitF64;

#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct PositiveUnitF64Error(f64);

impl fmt::Display for PositiveUnitF64Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{} is not in (0.0, 1.0].", self.0)
    }
}

/// A probability in `(0.0, 1.0]`, e.g. a per-generation speciation rate
#[derive(Copy, Clone, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(try_from = "f64", into = "f64")]
pub struct PositiveUnitF64(f64);

impl TryFrom<f64> for PositiveUnitF64 {
    type Error = PositiveUnitF64Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PositiveUnitF64> for f64 {
    fn from(value: PositiveUnitF64) -> Self {
        value.0
    }
}

impl fmt::Debug for PositiveUnitF64 {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        struct PositiveUnitF64Range(f64);

        impl fmt::Debug for PositiveUnitF64Range {
            fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
                write!(fmt, "0.0 < {} <= 1.0", self.0)
            }
        }

        fmt.debug_tuple("PositiveUnitF64")
            .field(&PositiveUnitF64Range(self.0))
            .finish()
    }
}

impl fmt::Display for PositiveUnitF64 {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, fmt)
    }
}

impl PositiveUnitF64 {
    /// # Errors
    ///
    /// Returns `PositiveUnitF64Error` if not `0.0 < value <= 1.0`
    pub fn new(value: f64) -> Result<Self, PositiveUnitF64Error> {
        if value > 0.0_f64 && value <= 1.0_f64 {
            Ok(Self(value))
        } else {
            Err(PositiveUnitF64Error(value))
        }
    }

    /// # Safety
    ///
    /// Only safe iff `0.0 < value <= 1.0`
    #[must_use]
    pub unsafe fn new_unchecked(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn one() -> Self {
        Self(1.0_f64)
    }

    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Checks whether the uniform draw `u` resolves to a speciation event
    ///  under this rate, i.e. `u < rate`
    #[must_use]
    pub fn accepts(self, u: ClosedOpenUnitF64) -> bool {
        u.get() < self.0
    }
}

impl PartialEq for PositiveUnitF64 {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for PositiveUnitF64 {}

impl PartialOrd for PositiveUnitF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PositiveUnitF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for PositiveUnitF64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialEq<f64> for PositiveUnitF64 {
    fn eq(&self, other: &f64) -> bool {
        self.0.eq(other)
    }
}

impl PartialOrd<f64> for PositiveUnitF64 {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.0.partial_cmp(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speciation_rate_bounds() {
        assert!(PositiveUnitF64::new(0.0).is_err());
        assert!(PositiveUnitF64::new(1.0).is_ok());
        assert!(PositiveUnitF64::new(1.0 + f64::EPSILON).is_err());
        assert!(PositiveUnitF64::new(f64::NAN).is_err());
    }

    #[test]
    fn accepts_is_strict() {
        let rate = PositiveUnitF64::new(0.25).unwrap();

        assert!(rate.accepts(ClosedOpenUnitF64::new(0.0).unwrap()));
        assert!(rate.accepts(ClosedOpenUnitF64::new(0.249).unwrap()));
        assert!(!rate.accepts(ClosedOpenUnitF64::new(0.25).unwrap()));
    }
}
