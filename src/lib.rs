//! # allele-evo
//!
//! Building blocks for genetic algorithms: genes, chromosomes and genotypes,
//! plus the mutation, crossover and selection operators that act on them.
//!
//! The crate does not run an evolution loop. An embedding engine evaluates
//! fitness, keeps the generation counter moving and decides which operators
//! to apply; every operator here is a pure function of its input and an
//! explicit random source.
//!
//! ## Core Concepts
//!
//! - **Genes**: immutable values with constraints ([`genome::boolean`],
//!   [`genome::integer`], [`genome::real`])
//! - **Genotypes**: an ordered list of chromosomes, one individual's genome
//! - **Operators**: mutation, crossover and selection, each usable on its own
//!   or through the object-safe [`operators::traits::Operator`] interface
//!
//! ## Quick Start
//!
//! ```rust
//! use allele_evo::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! let factory = GenotypeFactory::new(vec![PermutationFactory::new(8)?])?;
//! let state = EvolutionState::initial(&factory, 20, &mut rng);
//!
//! let pipeline: Pipeline<IntChromosome> = Pipeline::new()
//!     .then(CrossoverAlterer::new(OrderedCrossover::default()))
//!     .then(MutationAlterer::new(SwapMutator::default()));
//!
//! let next = pipeline.apply(&state, 20, &mut rng)?;
//! assert_eq!(next.len(), 20);
//! # Ok::<(), allele_evo::error::EvolutionError>(())
//! ```

pub mod config;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod operators;
pub mod population;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::error::*;
    pub use crate::fitness::prelude::*;
    pub use crate::genome::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
}
