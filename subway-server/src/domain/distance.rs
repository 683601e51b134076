//! Track distance type.

use std::fmt;

use super::TopologyError;

/// Positive length of a section of track.
///
/// A `Distance` is always at least 1. It is a plain `Copy` value: splitting
/// or merging sections produces new distances rather than mutating shared
/// ones.
///
/// # Examples
///
/// ```
/// use subway_server::domain::Distance;
///
/// let ten = Distance::new(10).unwrap();
/// assert_eq!(ten.shrink(Distance::new(3).unwrap()).unwrap().value(), 7);
///
/// // Zero and negative distances are rejected
/// assert!(Distance::new(0).is_err());
/// assert!(Distance::new(-4).is_err());
///
/// // A split cannot consume the whole distance
/// assert!(ten.shrink(ten).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Distance(u64);

impl Distance {
    /// Smallest valid distance.
    pub const MIN: u64 = 1;

    /// Largest valid distance, the largest value [`Distance::new`] accepts.
    pub const MAX: u64 = i64::MAX as u64;

    /// Create a distance, rejecting values below 1.
    pub fn new(value: i64) -> Result<Self, TopologyError> {
        if value < Self::MIN as i64 {
            return Err(TopologyError::InvalidDistance("distance must be at least 1"));
        }
        Ok(Distance(value as u64))
    }

    /// Returns the distance as an integer.
    pub fn value(self) -> u64 {
        self.0
    }

    /// Returns the distance left after cutting `amount` off this one.
    ///
    /// Fails unless `amount` is strictly shorter, so the remainder is
    /// always a valid distance.
    pub fn shrink(self, amount: Distance) -> Result<Self, TopologyError> {
        if amount.0 >= self.0 {
            return Err(TopologyError::InvalidDistance(
                "new section must be shorter than the section it splits",
            ));
        }
        Ok(Distance(self.0 - amount.0))
    }

    /// Returns the total length of two consecutive distances.
    ///
    /// Fails if the total exceeds [`Distance::MAX`].
    pub fn combine(self, other: Distance) -> Result<Self, TopologyError> {
        self.0
            .checked_add(other.0)
            .filter(|&total| total <= Self::MAX)
            .map(Distance)
            .ok_or(TopologyError::InvalidDistance(
                "combined distance is too long",
            ))
    }
}

impl fmt::Debug for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Distance({})", self.0)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
