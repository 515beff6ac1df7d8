//! Error types for allele-evo
//!
//! This module defines all error types used throughout the library.

use std::fmt;

use thiserror::Error;

/// A single named constraint that a configuration value failed to satisfy
#[derive(Debug, Error, Clone, PartialEq)]
#[error("`{field}` must be {constraint}, got {value}")]
pub struct ConstraintViolation {
    /// Name of the offending field
    pub field: &'static str,
    /// Human readable description of the constraint
    pub constraint: String,
    /// The rejected value, rendered for display
    pub value: String,
}

impl ConstraintViolation {
    /// Create a new violation record
    pub fn new(
        field: &'static str,
        constraint: impl Into<String>,
        value: impl fmt::Display,
    ) -> Self {
        Self {
            field,
            constraint: constraint.into(),
            value: value.to_string(),
        }
    }
}

/// Invalid operator, factory or gene configuration
///
/// Carries every violated constraint of a single constructor call rather
/// than only the first one.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Invalid configuration: {}", join_violations(.violations))]
pub struct ConfigurationError {
    violations: Vec<ConstraintViolation>,
}

fn join_violations(violations: &[ConstraintViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ConfigurationError {
    /// Build an error from a non-empty list of violations
    pub fn new(violations: Vec<ConstraintViolation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    /// All violated constraints, in the order they were checked
    pub fn violations(&self) -> &[ConstraintViolation] {
        &self.violations
    }

    /// Whether the named field is among the violations
    pub fn violates(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl From<ConstraintViolation> for ConfigurationError {
    fn from(violation: ConstraintViolation) -> Self {
        Self::new(vec![violation])
    }
}

/// Error type for operator precondition failures
///
/// These indicate a programming error in the caller rather than a data
/// condition; nothing in the crate retries them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperatorError {
    /// A region `[start, end]` does not fit a chromosome of `size` genes
    #[error("Invalid region [{start}, {end}] for chromosome of size {size}")]
    InvalidRegion {
        start: usize,
        end: usize,
        size: usize,
    },

    /// Crossover was handed the wrong number of parent chromosomes
    #[error("Expected {expected} parent chromosomes, got {actual}")]
    ParentCount { expected: usize, actual: usize },

    /// Parent chromosomes passed to a crossover helper differ in length
    #[error("Parent chromosomes differ in length: {expected} and {actual} genes")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Top-level error type for evolution operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvolutionError {
    /// Invalid configuration
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Operator error
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    /// Individuals were requested from an empty population
    #[error("Empty population")]
    EmptyPopulation,
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;
