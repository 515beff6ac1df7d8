//! Genotypes
//!
//! A genotype is the full genetic encoding of one individual: an ordered
//! collection of chromosomes. Mixed chromosome structures are expressed by a
//! chromosome type that is itself an enum over the concrete kinds.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Constraints;
use crate::error::ConfigurationError;
use crate::genome::traits::{Chromosome, ChromosomeFactory, Gene};

/// Ordered collection of chromosomes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "C: Serialize", deserialize = "C: Deserialize<'de>"))]
pub struct Genotype<C: Chromosome> {
    chromosomes: Vec<C>,
}

impl<C: Chromosome> Genotype<C> {
    /// Create a genotype from chromosomes
    pub fn new(chromosomes: Vec<C>) -> Self {
        Self { chromosomes }
    }

    /// The chromosomes, in order
    pub fn chromosomes(&self) -> &[C] {
        &self.chromosomes
    }

    /// Take the chromosomes out of this genotype
    pub fn into_chromosomes(self) -> Vec<C> {
        self.chromosomes
    }

    /// Number of chromosomes
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    /// Whether the genotype holds no chromosomes
    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// The chromosome at `index`, if any
    pub fn get(&self, index: usize) -> Option<&C> {
        self.chromosomes.get(index)
    }

    /// Iterate over the chromosomes
    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.chromosomes.iter()
    }

    /// Whether a structurally equal chromosome is present
    pub fn contains(&self, chromosome: &C) -> bool {
        self.chromosomes.contains(chromosome)
    }

    /// Whether every given chromosome is present
    pub fn contains_all<'a>(&self, chromosomes: impl IntoIterator<Item = &'a C>) -> bool {
        chromosomes.into_iter().all(|c| self.contains(c))
    }

    /// Non-empty and every chromosome valid
    pub fn verify(&self) -> bool {
        !self.chromosomes.is_empty() && self.chromosomes.iter().all(Chromosome::verify)
    }

    /// All gene values, chromosome by chromosome
    pub fn flatten(&self) -> Vec<<C::Gene as Gene>::Value> {
        self.chromosomes
            .iter()
            .flat_map(|c| c.genes().iter().map(|g| g.value().clone()))
            .collect()
    }

    /// Total number of genes across all chromosomes
    pub fn gene_count(&self) -> usize {
        self.chromosomes.iter().map(Chromosome::size).sum()
    }
}

impl<C: Chromosome> From<Vec<C>> for Genotype<C> {
    fn from(chromosomes: Vec<C>) -> Self {
        Self::new(chromosomes)
    }
}

impl<C: Chromosome> FromIterator<C> for Genotype<C> {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, C: Chromosome> IntoIterator for &'a Genotype<C> {
    type Item = &'a C;
    type IntoIter = std::slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.chromosomes.iter()
    }
}

impl<C: Chromosome> std::ops::Index<usize> for Genotype<C> {
    type Output = C;

    fn index(&self, index: usize) -> &C {
        &self.chromosomes[index]
    }
}

/// Builds random genotypes, one chromosome per factory
#[derive(Clone, Debug)]
pub struct GenotypeFactory<F: ChromosomeFactory> {
    factories: Vec<F>,
}

impl<F: ChromosomeFactory> GenotypeFactory<F> {
    /// Create a genotype factory from an ordered list of chromosome factories
    pub fn new(factories: Vec<F>) -> Result<Self, ConfigurationError> {
        Constraints::new()
            .at_least("factories", factories.len(), 1)
            .finish()?;
        Ok(Self { factories })
    }

    /// Number of chromosomes per genotype
    pub fn chromosome_count(&self) -> usize {
        self.factories.len()
    }

    /// Create a new random genotype
    pub fn make<R: Rng + ?Sized>(&self, rng: &mut R) -> Genotype<F::Chromosome> {
        self.factories.iter().map(|f| f.make(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::bounds::GeneRange;
    use crate::genome::integer::{IntChromosome, IntChromosomeFactory};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn genotype() -> Genotype<IntChromosome> {
        Genotype::new(vec![
            IntChromosome::from([1, 2, 3]),
            IntChromosome::from([4, 5]),
        ])
    }

    #[test]
    fn test_contains() {
        let g = genotype();
        assert!(g.contains(&IntChromosome::from([4, 5])));
        assert!(!g.contains(&IntChromosome::from([5, 4])));
    }

    #[test]
    fn test_contains_all() {
        let g = genotype();
        let present = [IntChromosome::from([4, 5]), IntChromosome::from([1, 2, 3])];
        assert!(g.contains_all(&present));

        let partly_missing = [IntChromosome::from([1, 2, 3]), IntChromosome::from([9])];
        assert!(!g.contains_all(&partly_missing));

        assert!(g.contains_all(&[]));
    }

    #[test]
    fn test_flatten_and_counts() {
        let g = genotype();
        assert_eq!(g.flatten(), vec![1, 2, 3, 4, 5]);
        assert_eq!(g.len(), 2);
        assert_eq!(g.gene_count(), 5);
        assert_eq!(g[1], IntChromosome::from([4, 5]));
    }

    #[test]
    fn test_verify() {
        assert!(genotype().verify());
        assert!(!Genotype::<IntChromosome>::new(vec![]).verify());
        assert!(!Genotype::new(vec![IntChromosome::from([1]), IntChromosome::default()]).verify());
    }

    #[test]
    fn test_factory_builds_one_chromosome_per_factory() {
        let mut rng = StdRng::seed_from_u64(9);
        let factory = GenotypeFactory::new(vec![
            IntChromosomeFactory::new(3, GeneRange::new(0, 9).unwrap()).unwrap(),
            IntChromosomeFactory::new(5, GeneRange::new(0, 9).unwrap()).unwrap(),
        ])
        .unwrap();

        let g = factory.make(&mut rng);
        assert_eq!(factory.chromosome_count(), 2);
        assert_eq!(g[0].size(), 3);
        assert_eq!(g[1].size(), 5);
        assert!(g.verify());
    }

    #[test]
    fn test_factory_requires_a_chromosome() {
        let err = GenotypeFactory::<IntChromosomeFactory>::new(vec![]).unwrap_err();
        assert!(err.violates("factories"));
    }
}
