//! Individual wrapper type
//!
//! An individual pairs a genotype with its fitness. Fitness is NaN until the
//! individual has been evaluated; evaluation produces a new individual rather
//! than updating the old one in place.

use serde::{Deserialize, Serialize};

use crate::genome::genotype::Genotype;
use crate::genome::traits::Chromosome;

/// A genotype and its fitness score
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "C: Serialize", deserialize = "C: Deserialize<'de>"))]
pub struct Individual<C: Chromosome> {
    genotype: Genotype<C>,
    fitness: f64,
}

impl<C: Chromosome> Individual<C> {
    /// Create an unevaluated individual
    pub fn new(genotype: Genotype<C>) -> Self {
        Self {
            genotype,
            fitness: f64::NAN,
        }
    }

    /// Create an individual with a known fitness
    pub fn with_fitness(genotype: Genotype<C>, fitness: f64) -> Self {
        Self { genotype, fitness }
    }

    /// The same genotype carrying `fitness`
    pub fn evaluated(self, fitness: f64) -> Self {
        Self::with_fitness(self.genotype, fitness)
    }

    /// Whether a fitness value has been assigned
    pub fn is_evaluated(&self) -> bool {
        !self.fitness.is_nan()
    }

    /// The fitness, NaN when unevaluated
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn genotype(&self) -> &Genotype<C> {
        &self.genotype
    }

    /// Take the genotype out of this individual
    pub fn into_genotype(self) -> Genotype<C> {
        self.genotype
    }
}

// NaN never equals itself, so two unevaluated individuals are compared on
// their genotype alone.
impl<C: Chromosome> PartialEq for Individual<C> {
    fn eq(&self, other: &Self) -> bool {
        let same_fitness = (self.fitness.is_nan() && other.fitness.is_nan())
            || self.fitness == other.fitness;
        same_fitness && self.genotype == other.genotype
    }
}

impl<C: Chromosome> From<Genotype<C>> for Individual<C> {
    fn from(genotype: Genotype<C>) -> Self {
        Self::new(genotype)
    }
}
