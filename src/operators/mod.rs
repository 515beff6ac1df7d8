//! Genetic operators
//!
//! This module provides mutation, crossover and selection operators, and the
//! alterers that apply them to a whole population.

pub mod alterer;
pub mod crossover;
pub mod mutation;
pub mod selection;
pub mod traits;

pub mod prelude {
    pub use super::alterer::*;
    pub use super::crossover::*;
    pub use super::mutation::*;
    pub use super::selection::*;
    pub use super::traits::*;
}
