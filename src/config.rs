//! Eager configuration checks
//!
//! Every operator, factory and gene range validates its parameters when it
//! is constructed. [`Constraints`] collects every violated constraint of one
//! constructor call so the caller sees all problems at once.

use std::fmt::Display;

use crate::error::{ConfigurationError, ConstraintViolation};

/// Accumulator of constraint checks for a single constructor call
#[derive(Debug, Default)]
#[must_use]
pub struct Constraints {
    violations: Vec<ConstraintViolation>,
}

impl Constraints {
    /// Start a new set of checks
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation unless `holds` is true
    pub fn check(
        mut self,
        field: &'static str,
        holds: bool,
        constraint: &str,
        value: impl Display,
    ) -> Self {
        if !holds {
            self.violations
                .push(ConstraintViolation::new(field, constraint, value));
        }
        self
    }

    /// The value must be a probability in `[0.0, 1.0]` (NaN is rejected)
    pub fn probability(self, field: &'static str, value: f64) -> Self {
        self.check(field, (0.0..=1.0).contains(&value), "in [0.0, 1.0]", value)
    }

    /// The value must be at least `min`
    pub fn at_least(self, field: &'static str, value: usize, min: usize) -> Self {
        let constraint = format!("at least {min}");
        self.check(field, value >= min, &constraint, value)
    }

    /// `lo` must not exceed `hi`
    pub fn ordered<T: PartialOrd + Display>(self, field: &'static str, lo: T, hi: T) -> Self {
        let holds = lo <= hi;
        self.check(
            field,
            holds,
            "an ordered range (lower bound <= upper bound)",
            format_args!("[{lo}, {hi}]"),
        )
    }

    /// Finish checking, failing with every violation collected so far
    pub fn finish(self) -> Result<(), ConfigurationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigurationError::new(self.violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_constraints_pass() {
        let result = Constraints::new()
            .probability("rate", 0.0)
            .probability("other_rate", 1.0)
            .at_least("size", 3, 1)
            .ordered("range", -1, 1)
            .finish();
        assert!(result.is_ok());
    }

    #[test]
    fn test_all_violations_are_collected() {
        let err = Constraints::new()
            .probability("individual_rate", 1.5)
            .probability("chromosome_rate", 0.5)
            .probability("gene_rate", f64::NAN)
            .at_least("tournament_size", 0, 1)
            .finish()
            .unwrap_err();

        let fields: Vec<_> = err.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["individual_rate", "gene_rate", "tournament_size"]);
    }

    #[test]
    fn test_ordered_reports_both_bounds() {
        let err = Constraints::new().ordered("range", 5, 2).finish().unwrap_err();
        assert_eq!(err.violations()[0].value, "[5, 2]");
    }
}
