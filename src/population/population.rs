//! Evolution state
//!
//! One generation's population together with its generation counter. Every
//! operator consumes a state and produces the next one.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::fitness::ranker::Ranker;
use crate::genome::genotype::{Genotype, GenotypeFactory};
use crate::genome::traits::{Chromosome, ChromosomeFactory};
use crate::population::individual::Individual;

/// A population of individuals and the generation it belongs to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "C: Serialize", deserialize = "C: Deserialize<'de>"))]
pub struct EvolutionState<C: Chromosome> {
    population: Vec<Individual<C>>,
    generation: usize,
}

impl<C: Chromosome> EvolutionState<C> {
    /// Create a state from an existing population
    pub fn new(population: Vec<Individual<C>>, generation: usize) -> Self {
        Self {
            population,
            generation,
        }
    }

    /// Generation zero: `size` random, unevaluated individuals
    pub fn initial<F, R>(factory: &GenotypeFactory<F>, size: usize, rng: &mut R) -> Self
    where
        F: ChromosomeFactory<Chromosome = C>,
        R: Rng + ?Sized,
    {
        let population = (0..size)
            .map(|_| Individual::new(factory.make(rng)))
            .collect();
        Self::new(population, 0)
    }

    /// Create a state from genotypes, all unevaluated
    pub fn from_genotypes(
        genotypes: impl IntoIterator<Item = Genotype<C>>,
        generation: usize,
    ) -> Self {
        Self::new(genotypes.into_iter().map(Individual::new).collect(), generation)
    }

    /// Advance the counter, replacing the population
    pub fn next_generation(self, population: Vec<Individual<C>>) -> Self {
        Self::new(population, self.generation + 1)
    }

    /// Same generation, different population
    pub fn with_population(&self, population: Vec<Individual<C>>) -> Self {
        Self::new(population, self.generation)
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &[Individual<C>] {
        &self.population
    }

    /// Take the individuals out of this state
    pub fn into_population(self) -> Vec<Individual<C>> {
        self.population
    }

    pub fn len(&self) -> usize {
        self.population.len()
    }

    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    /// Best individual according to `ranker`
    pub fn best<K: Ranker>(&self, ranker: &K) -> Option<&Individual<C>> {
        ranker.best(&self.population)
    }

    /// Count the number of evaluated individuals
    pub fn count_evaluated(&self) -> usize {
        self.population.iter().filter(|i| i.is_evaluated()).count()
    }

    /// Check if all individuals have been evaluated
    pub fn all_evaluated(&self) -> bool {
        self.population.iter().all(Individual::is_evaluated)
    }

    /// Mean fitness of the evaluated individuals, `None` if there are none
    pub fn mean_fitness(&self) -> Option<f64> {
        let (sum, count) = self
            .population
            .iter()
            .filter(|i| i.is_evaluated())
            .fold((0.0, 0usize), |(sum, count), i| (sum + i.fitness(), count + 1));

        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }
}

impl<C: Chromosome> std::ops::Index<usize> for EvolutionState<C> {
    type Output = Individual<C>;

    fn index(&self, index: usize) -> &Individual<C> {
        &self.population[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::ranker::{FitnessMaxRanker, FitnessMinRanker};
    use crate::genome::bounds::GeneRange;
    use crate::genome::integer::{IntChromosome, IntChromosomeFactory};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_test_state() -> EvolutionState<IntChromosome> {
        let population = (1..=5)
            .map(|i| {
                Individual::with_fitness(
                    Genotype::new(vec![IntChromosome::from([i])]),
                    (i * 10) as f64,
                )
            })
            .collect();
        EvolutionState::new(population, 3)
    }

    #[test]
    fn test_initial_state() {
        let mut rng = StdRng::seed_from_u64(1);
        let factory = GenotypeFactory::new(vec![
            IntChromosomeFactory::new(4, GeneRange::new(0, 3).unwrap()).unwrap(),
        ])
        .unwrap();

        let state = EvolutionState::initial(&factory, 10, &mut rng);
        assert_eq!(state.len(), 10);
        assert_eq!(state.generation(), 0);
        assert_eq!(state.count_evaluated(), 0);
        assert!(state.population().iter().all(|i| i.genotype().verify()));
    }

    #[test]
    fn test_best_follows_ranker() {
        let state = create_test_state();
        assert_eq!(state.best(&FitnessMaxRanker).unwrap().fitness(), 50.0);
        assert_eq!(state.best(&FitnessMinRanker).unwrap().fitness(), 10.0);
    }

    #[test]
    fn test_mean_fitness_skips_unevaluated() {
        let mut population = create_test_state().into_population();
        population.push(Individual::new(Genotype::new(vec![IntChromosome::from([9])])));
        let state = EvolutionState::new(population, 0);

        assert_relative_eq!(state.mean_fitness().unwrap(), 30.0);
        assert_eq!(state.count_evaluated(), 5);
        assert!(!state.all_evaluated());
    }

    #[test]
    fn test_mean_fitness_empty() {
        let state = EvolutionState::<IntChromosome>::new(vec![], 0);
        assert!(state.mean_fitness().is_none());
        assert!(state.all_evaluated());
        assert!(state.best(&FitnessMaxRanker).is_none());
    }

    #[test]
    fn test_next_generation() {
        let state = create_test_state();
        let kept = state.population()[..2].to_vec();
        let next = state.next_generation(kept);
        assert_eq!(next.generation(), 4);
        assert_eq!(next.len(), 2);
        assert_eq!(next[1].fitness(), 20.0);
    }

    #[test]
    fn test_from_genotypes() {
        let state = EvolutionState::from_genotypes(
            vec![Genotype::new(vec![IntChromosome::from([1, 2])])],
            7,
        );
        assert_eq!(state.generation(), 7);
        assert!(!state[0].is_evaluated());
    }
}
