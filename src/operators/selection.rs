//! Selection operators
//!
//! Selectors sample individuals with replacement. Fitness is only ever
//! interpreted through a [`Ranker`], so the same selector serves both
//! maximisation and minimisation.

use rand::Rng;
use rand_distr::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Constraints;
use crate::error::ConfigurationError;
use crate::fitness::ranker::Ranker;
use crate::genome::traits::Chromosome;
use crate::operators::traits::SelectionOperator;
use crate::population::individual::Individual;

pub const DEFAULT_TOURNAMENT_SIZE: usize = 3;

/// Uniform selection, ignoring fitness
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomSelector;

impl SelectionOperator for RandomSelector {
    fn select_index<C, K, R>(
        &self,
        population: &[Individual<C>],
        _ranker: &K,
        rng: &mut R,
    ) -> usize
    where
        C: Chromosome,
        K: Ranker,
        R: Rng + ?Sized,
    {
        rng.gen_range(0..population.len())
    }
}

/// Tournament selection operator
///
/// Each pick draws `tournament_size` contestants uniformly with replacement
/// and keeps the best one; on ties the earliest drawn contestant wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TournamentSelectorParams")]
pub struct TournamentSelector {
    tournament_size: usize,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TournamentSelectorParams {
    tournament_size: usize,
}

impl Default for TournamentSelectorParams {
    fn default() -> Self {
        Self {
            tournament_size: DEFAULT_TOURNAMENT_SIZE,
        }
    }
}

impl TournamentSelector {
    /// Create a new tournament selection with the given size
    pub fn new(tournament_size: usize) -> Result<Self, ConfigurationError> {
        Constraints::new()
            .at_least("tournament_size", tournament_size, 1)
            .finish()?;
        Ok(Self { tournament_size })
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }
}

impl Default for TournamentSelector {
    fn default() -> Self {
        Self {
            tournament_size: DEFAULT_TOURNAMENT_SIZE,
        }
    }
}

impl TryFrom<TournamentSelectorParams> for TournamentSelector {
    type Error = ConfigurationError;

    fn try_from(p: TournamentSelectorParams) -> Result<Self, Self::Error> {
        Self::new(p.tournament_size)
    }
}

impl SelectionOperator for TournamentSelector {
    fn select_index<C, K, R>(
        &self,
        population: &[Individual<C>],
        ranker: &K,
        rng: &mut R,
    ) -> usize
    where
        C: Chromosome,
        K: Ranker,
        R: Rng + ?Sized,
    {
        let mut best = rng.gen_range(0..population.len());
        for _ in 1..self.tournament_size {
            let contestant = rng.gen_range(0..population.len());
            if ranker.compare(&population[contestant], &population[best]).is_gt() {
                best = contestant;
            }
        }
        best
    }
}

/// Roulette wheel selection (fitness proportionate)
///
/// Weights come from [`Ranker::fitness_transform`]. When no usable weights
/// remain (all zero, or the population is unevaluated) selection falls back
/// to uniform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouletteWheelSelector;

impl RouletteWheelSelector {
    fn wheel<C: Chromosome, K: Ranker>(
        population: &[Individual<C>],
        ranker: &K,
    ) -> Option<WeightedIndex<f64>> {
        let fitness: Vec<f64> = population.iter().map(Individual::fitness).collect();
        let weights = ranker.fitness_transform(&fitness);
        match WeightedIndex::new(&weights) {
            Ok(wheel) => Some(wheel),
            Err(err) => {
                debug!(%err, "degenerate roulette weights, selecting uniformly");
                None
            }
        }
    }
}

impl SelectionOperator for RouletteWheelSelector {
    fn select_index<C, K, R>(
        &self,
        population: &[Individual<C>],
        ranker: &K,
        rng: &mut R,
    ) -> usize
    where
        C: Chromosome,
        K: Ranker,
        R: Rng + ?Sized,
    {
        match Self::wheel(population, ranker) {
            Some(wheel) => wheel.sample(rng),
            None => rng.gen_range(0..population.len()),
        }
    }

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

        let wheel = Self::wheel(population, ranker);
        (0..count)
            .map(|_| {
                let index = match &wheel {
                    Some(wheel) => wheel.sample(rng),
                    None => rng.gen_range(0..population.len()),
                };
                population[index].clone()
            })
            .collect()
    }
}
