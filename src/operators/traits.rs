//! Operator traits
//!
//! Mutation, crossover and selection contracts, plus the object-safe
//! [`Operator`] entry point used to chain alterers without knowing their kind.

use std::fmt::Debug;

use rand::{Rng, RngCore};
use tracing::warn;

use crate::error::{EvoResult, OperatorError};
use crate::fitness::ranker::Ranker;
use crate::genome::genotype::Genotype;
use crate::genome::traits::Chromosome;
use crate::population::individual::Individual;
use crate::population::population::EvolutionState;

/// One Bernoulli trial: true with probability `rate`
///
/// `rate == 0.0` never fires and `rate == 1.0` always fires.
pub(crate) fn chance<R: Rng + ?Sized>(rng: &mut R, rate: f64) -> bool {
    rng.gen::<f64>() < rate
}

/// Outcome of a mutation: the new subject and how many mutations were applied
#[derive(Clone, Debug, PartialEq)]
pub struct MutationResult<T> {
    pub mutated: T,
    pub mutations: usize,
}

impl<T> MutationResult<T> {
    pub fn new(mutated: T, mutations: usize) -> Self {
        Self { mutated, mutations }
    }

    /// The subject returned as is
    pub fn unchanged(subject: T) -> Self {
        Self::new(subject, 0)
    }

    /// Whether at least one mutation was applied
    pub fn is_mutated(&self) -> bool {
        self.mutations > 0
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MutationResult<U> {
        MutationResult::new(f(self.mutated), self.mutations)
    }
}

/// Mutation operator trait
///
/// Mutation never fails: degenerate inputs such as an empty chromosome come
/// back unchanged with a count of zero.
pub trait MutationOperator<C: Chromosome>: Debug + Send + Sync {
    /// Probability that an individual is considered for mutation
    fn individual_rate(&self) -> f64;

    /// Probability that each chromosome of a considered individual is mutated
    fn chromosome_rate(&self) -> f64;

    /// Mutate one chromosome
    fn mutate_chromosome<R: Rng + ?Sized>(&self, chromosome: &C, rng: &mut R)
        -> MutationResult<C>;

    /// Mutate a genotype, one `chromosome_rate` draw per chromosome in order
    fn mutate_genotype<R: Rng + ?Sized>(
        &self,
        genotype: &Genotype<C>,
        rng: &mut R,
    ) -> MutationResult<Genotype<C>> {
        let mut mutations = 0;
        let chromosomes = genotype
            .iter()
            .map(|chromosome| {
                if chance(rng, self.chromosome_rate()) {
                    let result = self.mutate_chromosome(chromosome, rng);
                    mutations += result.mutations;
                    result.mutated
                } else {
                    chromosome.clone()
                }
            })
            .collect();
        MutationResult::new(Genotype::new(chromosomes), mutations)
    }
}

/// Mutation operator that works gene by gene
pub trait GeneMutator<C: Chromosome>: MutationOperator<C> {
    /// Probability that each gene of a mutated chromosome is replaced
    fn gene_rate(&self) -> f64;

    /// Replacement for a selected gene
    fn mutate_gene<R: Rng + ?Sized>(&self, gene: &C::Gene, rng: &mut R) -> C::Gene;
}

/// Apply a gene mutator to every gene, one `gene_rate` draw per gene
///
/// The count is the number of genes that were replaced.
pub fn mutate_genes<C, M, R>(mutator: &M, chromosome: &C, rng: &mut R) -> MutationResult<C>
where
    C: Chromosome,
    M: GeneMutator<C> + ?Sized,
    R: Rng + ?Sized,
{
    let mut mutations = 0;
    let genes = chromosome
        .genes()
        .iter()
        .map(|gene| {
            if chance(rng, mutator.gene_rate()) {
                mutations += 1;
                mutator.mutate_gene(gene, rng)
            } else {
                gene.clone()
            }
        })
        .collect();
    MutationResult::new(chromosome.duplicate_with_genes(genes), mutations)
}

/// Crossover operator trait
///
/// Inputs are assumed to have equal length; the alterer filters mismatched
/// parents before calling into the operator.
pub trait CrossoverOperator<C: Chromosome>: Debug + Send + Sync {
    /// Number of parent chromosomes consumed per crossover
    fn num_parents(&self) -> usize;

    /// Number of offspring produced per crossover
    fn num_offspring(&self) -> usize;

    /// Probability that a chromosome index takes part in crossover
    fn chromosome_rate(&self) -> f64;

    /// Whether the parents of one crossover must be distinct individuals
    fn exclusivity(&self) -> bool;

    /// Combine parent chromosomes into one gene list per offspring
    fn crossover_chromosomes<R: Rng + ?Sized>(
        &self,
        parents: &[&C],
        rng: &mut R,
    ) -> Result<Vec<Vec<C::Gene>>, OperatorError>;

    /// Combine parent genotypes chromosome by chromosome
    ///
    /// One `chromosome_rate` draw per chromosome index. Chromosomes that are
    /// not crossed, or whose lengths differ between parents, are copied from
    /// the parent with the same position as the offspring (cycling through
    /// the parents). Parents with differing chromosome counts are copied
    /// through whole. An operator taking no parents yields no offspring.
    fn crossover_genotypes<R: Rng + ?Sized>(
        &self,
        parents: &[&Genotype<C>],
        rng: &mut R,
    ) -> Result<Vec<Genotype<C>>, OperatorError> {
        if parents.len() != self.num_parents() {
            return Err(OperatorError::ParentCount {
                expected: self.num_parents(),
                actual: parents.len(),
            });
        }
        let Some(first) = parents.first() else {
            return Ok(Vec::new());
        };
        let source = |k: usize| parents[k % parents.len()];

        let count = first.len();
        if parents.iter().any(|p| p.len() != count) {
            return Ok((0..self.num_offspring()).map(|k| source(k).clone()).collect());
        }

        let mut offspring: Vec<Vec<C>> =
            vec![Vec::with_capacity(count); self.num_offspring()];
        for index in 0..count {
            let chromosomes: Vec<&C> = parents.iter().map(|p| &p[index]).collect();
            let size = chromosomes[0].size();
            let crossed = chance(rng, self.chromosome_rate())
                && chromosomes.iter().all(|c| c.size() == size);

            let mut genes = if crossed {
                self.crossover_chromosomes(&chromosomes, rng)?.into_iter()
            } else {
                Vec::new().into_iter()
            };
            for (k, child) in offspring.iter_mut().enumerate() {
                let chromosome = &source(k)[index];
                child.push(match genes.next() {
                    Some(genes) => chromosome.duplicate_with_genes(genes),
                    None => chromosome.clone(),
                });
            }
        }
        Ok(offspring.into_iter().map(Genotype::new).collect())
    }
}

/// Selection operator trait
///
/// Sampling is always with replacement.
pub trait SelectionOperator: Debug + Send + Sync {
    /// Pick the index of one individual from a non-empty population
    fn select_index<C, K, R>(
        &self,
        population: &[Individual<C>],
        ranker: &K,
        rng: &mut R,
    ) -> usize
    where
        C: Chromosome,
        K: Ranker,
        R: Rng + ?Sized;

    /// Select `count` individuals
    ///
    /// An empty population yields an empty selection.
    fn select<C, K, R>(
        &self,
        population: &[Individual<C>],
        count: usize,
        ranker: &K,
        rng: &mut R,
    ) -> Vec<Individual<C>>
    where
        C: Chromosome,
        K: Ranker,
        R: Rng + ?Sized,
    {
        if population.is_empty() {
            if count > 0 {
                warn!(count, "selection requested from an empty population");
            }
            return Vec::new();
        }
        (0..count)
            .map(|_| population[self.select_index(population, ranker, rng)].clone())
            .collect()
    }
}

/// Uniform entry point over alterers and selectors
///
/// Operators are pure transformations of an evolution state; the generation
/// counter is carried through unchanged.
pub trait Operator<C: Chromosome>: Debug + Send + Sync {
    fn apply(
        &self,
        state: &EvolutionState<C>,
        output_size: usize,
        rng: &mut dyn RngCore,
    ) -> EvoResult<EvolutionState<C>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::integer::{IntChromosome, IntGene};
    use crate::genome::traits::Gene;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // Adds one to every selected gene
    #[derive(Debug)]
    struct Increment {
        chromosome_rate: f64,
        gene_rate: f64,
    }

    impl MutationOperator<IntChromosome> for Increment {
        fn individual_rate(&self) -> f64 {
            1.0
        }

        fn chromosome_rate(&self) -> f64 {
            self.chromosome_rate
        }

        fn mutate_chromosome<R: Rng + ?Sized>(
            &self,
            chromosome: &IntChromosome,
            rng: &mut R,
        ) -> MutationResult<IntChromosome> {
            mutate_genes(self, chromosome, rng)
        }
    }

    impl GeneMutator<IntChromosome> for Increment {
        fn gene_rate(&self) -> f64 {
            self.gene_rate
        }

        fn mutate_gene<R: Rng + ?Sized>(&self, gene: &IntGene, _rng: &mut R) -> IntGene {
            gene.duplicate_with_value(gene.value() + 1)
        }
    }

    // Child k takes every gene from parent k
    #[derive(Debug)]
    struct Passthrough;

    impl CrossoverOperator<IntChromosome> for Passthrough {
        fn num_parents(&self) -> usize {
            2
        }

        fn num_offspring(&self) -> usize {
            2
        }

        fn chromosome_rate(&self) -> f64 {
            1.0
        }

        fn exclusivity(&self) -> bool {
            false
        }

        fn crossover_chromosomes<R: Rng + ?Sized>(
            &self,
            parents: &[&IntChromosome],
            _rng: &mut R,
        ) -> Result<Vec<Vec<IntGene>>, OperatorError> {
            Ok(vec![parents[1].genes().to_vec(), parents[0].genes().to_vec()])
        }
    }

    // Takes no parents at all
    #[derive(Debug)]
    struct Barren;

    impl CrossoverOperator<IntChromosome> for Barren {
        fn num_parents(&self) -> usize {
            0
        }

        fn num_offspring(&self) -> usize {
            2
        }

        fn chromosome_rate(&self) -> f64 {
            1.0
        }

        fn exclusivity(&self) -> bool {
            false
        }

        fn crossover_chromosomes<R: Rng + ?Sized>(
            &self,
            _parents: &[&IntChromosome],
            _rng: &mut R,
        ) -> Result<Vec<Vec<IntGene>>, OperatorError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            assert!(chance(&mut rng, 1.0));
            assert!(!chance(&mut rng, 0.0));
        }
    }

    #[test]
    fn test_mutation_result_map() {
        let result = MutationResult::new(3, 2).map(|v| v * 2);
        assert_eq!(result, MutationResult::new(6, 2));
        assert!(result.is_mutated());
        assert!(!MutationResult::unchanged("x").is_mutated());
    }

    #[test]
    fn test_mutate_genes_counts_replacements() {
        let mut rng = StdRng::seed_from_u64(1);
        let op = Increment {
            chromosome_rate: 1.0,
            gene_rate: 1.0,
        };
        let result = op.mutate_chromosome(&IntChromosome::from([1, 2, 3]), &mut rng);
        assert_eq!(result.mutated, IntChromosome::from([2, 3, 4]));
        assert_eq!(result.mutations, 3);
    }

    #[test]
    fn test_mutate_genotype_respects_chromosome_rate() {
        let mut rng = StdRng::seed_from_u64(2);
        let genotype = Genotype::new(vec![IntChromosome::from([1]), IntChromosome::from([2])]);

        let none = Increment {
            chromosome_rate: 0.0,
            gene_rate: 1.0,
        };
        let result = none.mutate_genotype(&genotype, &mut rng);
        assert_eq!(result, MutationResult::unchanged(genotype.clone()));

        let all = Increment {
            chromosome_rate: 1.0,
            gene_rate: 1.0,
        };
        let result = all.mutate_genotype(&genotype, &mut rng);
        assert_eq!(result.mutated.flatten(), vec![2, 3]);
        assert_eq!(result.mutations, 2);
    }

    #[test]
    fn test_crossover_genotypes_checks_parent_count() {
        let mut rng = StdRng::seed_from_u64(3);
        let g = Genotype::new(vec![IntChromosome::from([1, 2])]);
        let err = Passthrough.crossover_genotypes(&[&g], &mut rng).unwrap_err();
        assert_eq!(
            err,
            OperatorError::ParentCount {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_crossover_genotypes_without_parents_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(6);
        assert!(Barren.crossover_genotypes(&[], &mut rng).unwrap().is_empty());

        let g = Genotype::new(vec![IntChromosome::from([1])]);
        let err = Barren.crossover_genotypes(&[&g], &mut rng).unwrap_err();
        assert_eq!(
            err,
            OperatorError::ParentCount {
                expected: 0,
                actual: 1
            }
        );
    }

    #[test]
    fn test_crossover_genotypes_copies_mismatched_lengths() {
        let mut rng = StdRng::seed_from_u64(4);
        let a = Genotype::new(vec![IntChromosome::from([1, 2]), IntChromosome::from([3])]);
        let b = Genotype::new(vec![IntChromosome::from([5, 6]), IntChromosome::from([7, 8])]);

        let children = Passthrough.crossover_genotypes(&[&a, &b], &mut rng).unwrap();
        assert_eq!(children.len(), 2);
        // First chromosome is crossed, the second differs in length and is copied
        assert_eq!(children[0].flatten(), vec![5, 6, 3]);
        assert_eq!(children[1].flatten(), vec![1, 2, 7, 8]);
    }

    #[test]
    fn test_crossover_genotypes_copies_mismatched_structure() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = Genotype::new(vec![IntChromosome::from([1])]);
        let b = Genotype::new(vec![IntChromosome::from([2]), IntChromosome::from([3])]);

        let children = Passthrough.crossover_genotypes(&[&a, &b], &mut rng).unwrap();
        assert_eq!(children, vec![a, b]);
    }
}
