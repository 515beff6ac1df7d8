//! Genome abstractions and implementations
//!
//! This module provides the `Gene` / `Chromosome` capability traits, the
//! built-in gene types and the `Genotype` that groups chromosomes.

pub mod boolean;
pub mod bounds;
pub mod genotype;
pub mod integer;
pub mod real;
pub mod traits;

pub mod prelude {
    pub use super::boolean::*;
    pub use super::bounds::*;
    pub use super::genotype::*;
    pub use super::integer::*;
    pub use super::real::*;
    pub use super::traits::*;
}
