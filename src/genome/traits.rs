//! Core genome traits
//!
//! This module defines the capability traits shared by every gene and
//! chromosome type: verification, duplication with new content and random
//! regeneration. Genes and chromosomes are immutable values; every
//! "modification" produces a new instance.

use std::fmt::Debug;

use rand::Rng;

/// Smallest unit of a genetic encoding
///
/// A gene wraps a single value together with the constraints that make the
/// value valid.
pub trait Gene: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// The allele type held by this gene
    type Value: Clone + Debug + PartialEq;

    /// The value held by this gene
    fn value(&self) -> &Self::Value;

    /// Whether the value satisfies every constraint of the gene
    fn verify(&self) -> bool;

    /// A copy of this gene (same constraints) holding `value`
    fn duplicate_with_value(&self, value: Self::Value) -> Self;

    /// A sibling gene with a freshly drawn value
    ///
    /// The draw may reproduce the current value.
    fn mutate<R: Rng + ?Sized>(&self, rng: &mut R) -> Self;
}

/// Genes whose values can be treated as real numbers
///
/// Used by arithmetic operators such as average crossover.
pub trait NumericGene: Gene {
    /// The value as `f64`
    fn to_f64(&self) -> f64;

    /// A copy of this gene holding `value` converted to the gene's value type
    fn duplicate_with_f64(&self, value: f64) -> Self;
}

/// Ordered, fixed-length sequence of genes of one type
pub trait Chromosome: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// The gene type of this chromosome
    type Gene: Gene;

    /// The genes of this chromosome, in order
    fn genes(&self) -> &[Self::Gene];

    /// A new chromosome of the same kind holding `genes`
    ///
    /// This is the only way operators derive a chromosome from another one;
    /// the receiver is never modified.
    fn duplicate_with_genes(&self, genes: Vec<Self::Gene>) -> Self;

    /// Number of genes
    fn size(&self) -> usize {
        self.genes().len()
    }

    /// Whether the chromosome has no genes
    fn is_empty(&self) -> bool {
        self.genes().is_empty()
    }

    /// The gene at `index`, if any
    fn get(&self, index: usize) -> Option<&Self::Gene> {
        self.genes().get(index)
    }

    /// Non-empty and every gene valid
    fn verify(&self) -> bool {
        !self.is_empty() && self.genes().iter().all(Gene::verify)
    }
}

/// Produces randomly initialised chromosomes
pub trait ChromosomeFactory: Send + Sync {
    /// The chromosome type produced
    type Chromosome: Chromosome;

    /// Create a new random chromosome
    fn make<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Chromosome;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // Mock gene for testing the default chromosome behaviour
    #[derive(Clone, Debug, PartialEq)]
    struct MockGene {
        value: u8,
    }

    impl Gene for MockGene {
        type Value = u8;

        fn value(&self) -> &u8 {
            &self.value
        }

        fn verify(&self) -> bool {
            self.value < 10
        }

        fn duplicate_with_value(&self, value: u8) -> Self {
            Self { value }
        }

        fn mutate<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
            Self {
                value: rng.gen_range(0..10),
            }
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    struct MockChromosome {
        genes: Vec<MockGene>,
    }

    impl Chromosome for MockChromosome {
        type Gene = MockGene;

        fn genes(&self) -> &[MockGene] {
            &self.genes
        }

        fn duplicate_with_genes(&self, genes: Vec<MockGene>) -> Self {
            Self { genes }
        }
    }

    fn chromosome(values: &[u8]) -> MockChromosome {
        MockChromosome {
            genes: values.iter().map(|&value| MockGene { value }).collect(),
        }
    }

    #[test]
    fn test_size_and_get() {
        let c = chromosome(&[1, 2, 3]);
        assert_eq!(c.size(), 3);
        assert_eq!(c.get(1), Some(&MockGene { value: 2 }));
        assert_eq!(c.get(3), None);
    }

    #[test]
    fn test_verify_requires_non_empty() {
        assert!(!chromosome(&[]).verify());
        assert!(chromosome(&[0]).verify());
    }

    #[test]
    fn test_verify_requires_every_gene_valid() {
        assert!(chromosome(&[1, 2, 9]).verify());
        assert!(!chromosome(&[1, 12, 3]).verify());
    }

    #[test]
    fn test_duplicate_with_genes_leaves_original() {
        let original = chromosome(&[1, 2, 3]);
        let copy = original.duplicate_with_genes(vec![MockGene { value: 7 }]);
        assert_eq!(original, chromosome(&[1, 2, 3]));
        assert_eq!(copy, chromosome(&[7]));
    }

    #[test]
    fn test_mutate_produces_valid_sibling() {
        let mut rng = StdRng::seed_from_u64(7);
        let gene = MockGene { value: 3 };
        for _ in 0..50 {
            assert!(gene.mutate(&mut rng).verify());
        }
        assert_eq!(gene, MockGene { value: 3 });
    }
}
