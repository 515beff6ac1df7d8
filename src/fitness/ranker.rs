//! Fitness rankers
//!
//! A ranker decides which of two individuals is better. Selection operators
//! never compare raw fitness values; they always go through a ranker so the
//! same operator works for maximisation and minimisation.

use std::cmp::Ordering;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::genome::traits::Chromosome;
use crate::population::individual::Individual;

/// Total order over individuals by fitness
///
/// `Ordering::Greater` means "better". Unevaluated individuals (NaN
/// fitness) always rank below evaluated ones.
pub trait Ranker: Debug + Send + Sync {
    /// Compare two fitness values
    fn compare_fitness(&self, a: f64, b: f64) -> Ordering;

    /// Map fitness values to non-negative selection weights, higher is better
    fn fitness_transform(&self, fitness: &[f64]) -> Vec<f64>;

    /// Compare two individuals
    fn compare<C: Chromosome>(&self, a: &Individual<C>, b: &Individual<C>) -> Ordering {
        self.compare_fitness(a.fitness(), b.fitness())
    }

    /// Sort a population best first; equally ranked individuals keep their order
    fn sort<C: Chromosome>(&self, mut population: Vec<Individual<C>>) -> Vec<Individual<C>> {
        population.sort_by(|a, b| self.compare(b, a));
        population
    }

    /// The best individual, the first one encountered on ties
    fn best<'a, C: Chromosome>(
        &self,
        population: &'a [Individual<C>],
    ) -> Option<&'a Individual<C>> {
        let mut iter = population.iter();
        let first = iter.next()?;
        Some(iter.fold(first, |best, candidate| {
            if self.compare(candidate, best) == Ordering::Greater {
                candidate
            } else {
                best
            }
        }))
    }
}

fn compare_nan_last(a: f64, b: f64, evaluated: impl FnOnce(f64, f64) -> Ordering) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => evaluated(a, b),
    }
}

/// Higher fitness is better
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessMaxRanker;

impl Ranker for FitnessMaxRanker {
    fn compare_fitness(&self, a: f64, b: f64) -> Ordering {
        compare_nan_last(a, b, |a, b| a.partial_cmp(&b).unwrap_or(Ordering::Equal))
    }

    fn fitness_transform(&self, fitness: &[f64]) -> Vec<f64> {
        let min = fitness
            .iter()
            .copied()
            .filter(|f| !f.is_nan())
            .fold(f64::INFINITY, f64::min);
        let offset = if min < 0.0 { -min } else { 0.0 };
        fitness
            .iter()
            .map(|&f| if f.is_nan() { 0.0 } else { f + offset })
            .collect()
    }
}

/// Lower fitness is better
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessMinRanker;

impl Ranker for FitnessMinRanker {
    fn compare_fitness(&self, a: f64, b: f64) -> Ordering {
        compare_nan_last(a, b, |a, b| b.partial_cmp(&a).unwrap_or(Ordering::Equal))
    }

    fn fitness_transform(&self, fitness: &[f64]) -> Vec<f64> {
        let max = fitness
            .iter()
            .copied()
            .filter(|f| !f.is_nan())
            .fold(f64::NEG_INFINITY, f64::max);
        fitness
            .iter()
            .map(|&f| if f.is_nan() { 0.0 } else { max - f })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::genotype::Genotype;
    use crate::genome::integer::IntChromosome;

    fn individual(id: i64, fitness: f64) -> Individual<IntChromosome> {
        Individual::with_fitness(Genotype::new(vec![IntChromosome::from([id])]), fitness)
    }

    fn ids(population: &[Individual<IntChromosome>]) -> Vec<i64> {
        population.iter().map(|i| i.genotype().flatten()[0]).collect()
    }

    #[test]
    fn test_max_ranker_compare() {
        let ranker = FitnessMaxRanker;
        let (low, high) = (individual(0, 1.0), individual(1, 2.0));
        assert_eq!(ranker.compare(&high, &low), Ordering::Greater);
        assert_eq!(ranker.compare(&low, &individual(2, 1.0)), Ordering::Equal);
    }

    #[test]
    fn test_min_ranker_compare() {
        let ranker = FitnessMinRanker;
        let (low, high) = (individual(0, 1.0), individual(1, 2.0));
        assert_eq!(ranker.compare(&high, &low), Ordering::Less);
    }

    #[test]
    fn test_unevaluated_ranks_last() {
        assert_eq!(FitnessMaxRanker.compare_fitness(f64::NAN, -1e9), Ordering::Less);
        assert_eq!(FitnessMinRanker.compare_fitness(f64::NAN, 1e9), Ordering::Less);
        assert_eq!(FitnessMinRanker.compare_fitness(1e9, f64::NAN), Ordering::Greater);
        assert_eq!(FitnessMaxRanker.compare_fitness(f64::NAN, f64::NAN), Ordering::Equal);
    }

    #[test]
    fn test_sort_best_first_and_stable() {
        let population = vec![
            individual(0, 1.0),
            individual(1, 3.0),
            individual(2, f64::NAN),
            individual(3, 3.0),
            individual(4, 2.0),
        ];

        let sorted = FitnessMaxRanker.sort(population.clone());
        assert_eq!(ids(&sorted), vec![1, 3, 4, 0, 2]);

        let sorted = FitnessMinRanker.sort(population);
        assert_eq!(ids(&sorted), vec![0, 4, 1, 3, 2]);
    }

    #[test]
    fn test_best_keeps_first_maximum() {
        let population = vec![individual(0, 1.0), individual(1, 5.0), individual(2, 5.0)];
        let best = FitnessMaxRanker.best(&population).unwrap();
        assert_eq!(best.genotype().flatten(), vec![1]);
        assert!(FitnessMaxRanker.best::<IntChromosome>(&[]).is_none());
    }

    #[test]
    fn test_max_fitness_transform_shifts_negatives() {
        let weights = FitnessMaxRanker.fitness_transform(&[-2.0, 0.0, 3.0, f64::NAN]);
        assert_eq!(weights, vec![0.0, 2.0, 5.0, 0.0]);

        let weights = FitnessMaxRanker.fitness_transform(&[1.0, 2.0]);
        assert_eq!(weights, vec![1.0, 2.0]);
    }

    #[test]
    fn test_min_fitness_transform_inverts() {
        let weights = FitnessMinRanker.fitness_transform(&[1.0, 4.0, 2.0]);
        assert_eq!(weights, vec![3.0, 0.0, 2.0]);
    }
}
