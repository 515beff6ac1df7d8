//! Validity constraints for gene values
//!
//! This module provides the inclusive [`GeneRange`] and the optional
//! [`GeneFilter`] predicate that together decide whether a gene is valid.

use std::fmt::{self, Debug, Display};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Constraints;
use crate::error::ConfigurationError;

/// Scalar types usable as range bounds
pub trait RangeBound: Copy + PartialOrd + Debug + Display + Send + Sync + 'static {
    /// Whether the value may be used as a bound at all
    fn is_valid_bound(&self) -> bool;

    /// Whether values can be drawn uniformly from `[lo, hi]`
    fn is_sampleable(lo: Self, hi: Self) -> bool;
}

impl RangeBound for i64 {
    fn is_valid_bound(&self) -> bool {
        true
    }

    fn is_sampleable(_lo: Self, _hi: Self) -> bool {
        true
    }
}

impl RangeBound for f64 {
    fn is_valid_bound(&self) -> bool {
        self.is_finite()
    }

    fn is_sampleable(lo: Self, hi: Self) -> bool {
        (hi - lo).is_finite()
    }
}

/// Inclusive range `[lo, hi]` of valid gene values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "(T, T)",
    into = "(T, T)",
    bound(
        serialize = "T: RangeBound + Serialize",
        deserialize = "T: RangeBound + Deserialize<'de>"
    )
)]
pub struct GeneRange<T: RangeBound> {
    pub(crate) lo: T,
    pub(crate) hi: T,
}

impl<T: RangeBound> GeneRange<T> {
    /// Create a new range
    ///
    /// Fails if `lo > hi` or either bound is not usable (e.g. an infinite float).
    pub fn new(lo: T, hi: T) -> Result<Self, ConfigurationError> {
        Constraints::new()
            .check("range.lo", lo.is_valid_bound(), "a finite bound", lo)
            .check("range.hi", hi.is_valid_bound(), "a finite bound", hi)
            .ordered("range", lo, hi)
            .check(
                "range",
                T::is_sampleable(lo, hi),
                "narrow enough to sample from",
                format_args!("[{lo}, {hi}]"),
            )
            .finish()?;
        Ok(Self { lo, hi })
    }

    /// Lower bound (inclusive)
    pub fn lo(&self) -> T {
        self.lo
    }

    /// Upper bound (inclusive)
    pub fn hi(&self) -> T {
        self.hi
    }

    /// Check if a value is within the range
    pub fn contains(&self, value: T) -> bool {
        value >= self.lo && value <= self.hi
    }
}

impl GeneRange<i64> {
    /// The widest integer range
    pub const FULL: Self = Self {
        lo: i64::MIN,
        hi: i64::MAX,
    };
}

impl GeneRange<f64> {
    /// Unit range `[0, 1]`
    pub const UNIT: Self = Self { lo: 0.0, hi: 1.0 };
}

impl<T: RangeBound> TryFrom<(T, T)> for GeneRange<T> {
    type Error = ConfigurationError;

    fn try_from((lo, hi): (T, T)) -> Result<Self, Self::Error> {
        Self::new(lo, hi)
    }
}

impl<T: RangeBound> From<GeneRange<T>> for (T, T) {
    fn from(range: GeneRange<T>) -> Self {
        (range.lo, range.hi)
    }
}

impl<T: RangeBound> Display for GeneRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Optional predicate a gene value must satisfy
///
/// The default filter accepts every value. Filters are shared between a gene
/// and all genes duplicated from it.
pub struct GeneFilter<T> {
    predicate: Option<Predicate<T>>,
}

impl<T> GeneFilter<T> {
    /// Filter that accepts every value
    pub fn accept_all() -> Self {
        Self { predicate: None }
    }

    /// Filter backed by `predicate`
    pub fn new(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Some(Arc::new(predicate)),
        }
    }

    /// Whether `value` passes the filter
    pub fn accepts(&self, value: &T) -> bool {
        self.predicate.as_ref().map_or(true, |p| p(value))
    }

    /// Whether a predicate is installed
    pub fn is_active(&self) -> bool {
        self.predicate.is_some()
    }
}

impl<T> Default for GeneFilter<T> {
    fn default() -> Self {
        Self::accept_all()
    }
}

impl<T> Clone for GeneFilter<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
        }
    }
}

impl<T> Debug for GeneFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_active() {
            f.write_str("GeneFilter(<predicate>)")
        } else {
            f.write_str("GeneFilter(<accept all>)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_contains_inclusive() {
        let range = GeneRange::new(-2, 5).unwrap();
        assert!(range.contains(-2));
        assert!(range.contains(5));
        assert!(!range.contains(6));
        assert_eq!(range.lo(), -2);
        assert_eq!(range.hi(), 5);
    }

    #[test]
    fn test_degenerate_range_is_allowed() {
        let range = GeneRange::new(1.5, 1.5).unwrap();
        assert!(range.contains(1.5));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = GeneRange::new(3, 1).unwrap_err();
        assert!(err.violates("range"));
    }

    #[test]
    fn test_infinite_float_range_rejected() {
        let err = GeneRange::new(0.0, f64::INFINITY).unwrap_err();
        assert!(err.violates("range.hi"));
        assert!(!err.violates("range.lo"));
    }

    #[test]
    fn test_unsampleable_float_range_rejected() {
        let err = GeneRange::new(f64::MIN, f64::MAX).unwrap_err();
        assert!(err.violates("range"));
    }

    #[test]
    fn test_range_serde_validates() {
        let range: GeneRange<i64> = serde_json::from_str("[0, 9]").unwrap();
        assert_eq!(range, GeneRange::new(0, 9).unwrap());
        assert_eq!(serde_json::to_string(&range).unwrap(), "[0,9]");

        let inverted: Result<GeneRange<i64>, _> = serde_json::from_str("[9, 0]");
        assert!(inverted.is_err());
    }

    #[test]
    fn test_range_display() {
        assert_eq!(GeneRange::UNIT.to_string(), "[0, 1]");
    }

    #[test]
    fn test_filter_default_accepts_all() {
        let filter: GeneFilter<i64> = GeneFilter::default();
        assert!(!filter.is_active());
        assert!(filter.accepts(&i64::MIN));
    }

    #[test]
    fn test_filter_predicate() {
        let even = GeneFilter::new(|v: &i64| v % 2 == 0);
        assert!(even.accepts(&4));
        assert!(!even.accepts(&3));
        assert!(even.clone().accepts(&0));
        assert_eq!(format!("{:?}", even), "GeneFilter(<predicate>)");
    }
}
