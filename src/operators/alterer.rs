//! Alterers
//!
//! Adapters that lift mutation, crossover and selection operators to the
//! object-safe [`Operator`] interface, plus a [`Pipeline`] that chains them.
//! An embedding engine can hold a `Vec<Box<dyn Operator<C>>>` without
//! knowing which kind of operator each stage is.

use std::fmt;

use rand::seq::index;
use rand::{Rng, RngCore};
use tracing::{debug, instrument};

use crate::config::Constraints;
use crate::error::{EvoResult, EvolutionError};
use crate::fitness::ranker::Ranker;
use crate::genome::genotype::Genotype;
use crate::genome::traits::Chromosome;
use crate::operators::traits::{
    chance, CrossoverOperator, MutationOperator, Operator, SelectionOperator,
};
use crate::population::individual::Individual;
use crate::population::population::EvolutionState;

/// Applies a mutation operator to a whole population
///
/// Each individual is considered with probability `individual_rate`. An
/// individual whose genotype changed loses its fitness; the population size
/// is preserved and `output_size` is ignored.
#[derive(Clone, Debug)]
pub struct MutationAlterer<M> {
    mutator: M,
}

impl<M> MutationAlterer<M> {
    pub fn new(mutator: M) -> Self {
        Self { mutator }
    }

    pub fn mutator(&self) -> &M {
        &self.mutator
    }
}

impl<C, M> Operator<C> for MutationAlterer<M>
where
    C: Chromosome,
    M: MutationOperator<C>,
{
    #[instrument(
        level = "debug",
        skip_all,
        fields(
            population = state.len(),
            generation = state.generation(),
            output_size = output_size
        )
    )]
    fn apply(
        &self,
        state: &EvolutionState<C>,
        output_size: usize,
        rng: &mut dyn RngCore,
    ) -> EvoResult<EvolutionState<C>> {
        let mut mutations = 0;
        let mut changed = 0;

        let population = state
            .population()
            .iter()
            .map(|individual| {
                if !chance(rng, self.mutator.individual_rate()) {
                    return individual.clone();
                }
                let result = self.mutator.mutate_genotype(individual.genotype(), rng);
                mutations += result.mutations;
                if &result.mutated == individual.genotype() {
                    individual.clone()
                } else {
                    changed += 1;
                    Individual::new(result.mutated)
                }
            })
            .collect();

        debug!(mutations, changed, "mutation applied");
        Ok(state.with_population(population))
    }
}

/// Breeds `output_size` offspring with a crossover operator
///
/// Parents are drawn uniformly; with `exclusivity` the parents of one
/// crossover are distinct individuals whenever the population is large
/// enough. Offspring are unevaluated.
#[derive(Clone, Debug)]
pub struct CrossoverAlterer<X> {
    crossover: X,
}

impl<X> CrossoverAlterer<X> {
    pub fn new(crossover: X) -> Self {
        Self { crossover }
    }

    pub fn crossover(&self) -> &X {
        &self.crossover
    }
}

fn pick_parents<R: Rng + ?Sized>(
    size: usize,
    count: usize,
    exclusive: bool,
    rng: &mut R,
) -> Vec<usize> {
    if exclusive && size >= count {
        index::sample(rng, size, count).into_vec()
    } else {
        (0..count).map(|_| rng.gen_range(0..size)).collect()
    }
}

impl<C, X> Operator<C> for CrossoverAlterer<X>
where
    C: Chromosome,
    X: CrossoverOperator<C>,
{
    #[instrument(
        level = "debug",
        skip_all,
        fields(
            population = state.len(),
            generation = state.generation(),
            output_size = output_size
        )
    )]
    fn apply(
        &self,
        state: &EvolutionState<C>,
        output_size: usize,
        rng: &mut dyn RngCore,
    ) -> EvoResult<EvolutionState<C>> {
        if output_size == 0 {
            return Ok(state.with_population(Vec::new()));
        }
        if state.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }
        let num_parents = self.crossover.num_parents();
        Constraints::new()
            .at_least("num_parents", num_parents, 1)
            .at_least("num_offspring", self.crossover.num_offspring(), 1)
            .finish()?;

        let population = state.population();
        let mut offspring = Vec::with_capacity(output_size);
        while offspring.len() < output_size {
            let parents: Vec<&Genotype<C>> =
                pick_parents(population.len(), num_parents, self.crossover.exclusivity(), rng)
                    .into_iter()
                    .map(|i| population[i].genotype())
                    .collect();
            let children = self.crossover.crossover_genotypes(&parents, rng)?;
            offspring.extend(children.into_iter().map(Individual::new));
        }
        offspring.truncate(output_size);

        debug!(offspring = offspring.len(), "crossover applied");
        Ok(state.with_population(offspring))
    }
}

/// Selects `output_size` individuals with a selector and a ranker
#[derive(Clone, Debug)]
pub struct SelectorOperator<S, K> {
    selector: S,
    ranker: K,
}

impl<S, K> SelectorOperator<S, K> {
    pub fn new(selector: S, ranker: K) -> Self {
        Self { selector, ranker }
    }

    pub fn selector(&self) -> &S {
        &self.selector
    }

    pub fn ranker(&self) -> &K {
        &self.ranker
    }
}

impl<C, S, K> Operator<C> for SelectorOperator<S, K>
where
    C: Chromosome,
    S: SelectionOperator,
    K: Ranker,
{
    #[instrument(
        level = "debug",
        skip_all,
        fields(
            population = state.len(),
            generation = state.generation(),
            output_size = output_size
        )
    )]
    fn apply(
        &self,
        state: &EvolutionState<C>,
        output_size: usize,
        rng: &mut dyn RngCore,
    ) -> EvoResult<EvolutionState<C>> {
        if state.is_empty() && output_size > 0 {
            return Err(EvolutionError::EmptyPopulation);
        }
        let selected = self
            .selector
            .select(state.population(), output_size, &self.ranker, rng);
        Ok(state.with_population(selected))
    }
}

/// Ordered chain of operators applied one after another
///
/// Every stage receives the previous stage's output and the same
/// `output_size`.
pub struct Pipeline<C: Chromosome> {
    stages: Vec<Box<dyn Operator<C>>>,
}

impl<C: Chromosome> Pipeline<C> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage
    pub fn then(mut self, stage: impl Operator<C> + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Append an already boxed stage
    pub fn push(&mut self, stage: Box<dyn Operator<C>>) {
        self.stages.push(stage);
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl<C: Chromosome> Default for Pipeline<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Chromosome> fmt::Debug for Pipeline<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages)
            .finish()
    }
}

impl<C: Chromosome> FromIterator<Box<dyn Operator<C>>> for Pipeline<C> {
    fn from_iter<I: IntoIterator<Item = Box<dyn Operator<C>>>>(iter: I) -> Self {
        Self {
            stages: iter.into_iter().collect(),
        }
    }
}

impl<C: Chromosome> Operator<C> for Pipeline<C> {
    #[instrument(
        level = "debug",
        skip_all,
        fields(
            stages = self.stages.len(),
            generation = state.generation(),
            output_size = output_size
        )
    )]
    fn apply(
        &self,
        state: &EvolutionState<C>,
        output_size: usize,
        rng: &mut dyn RngCore,
    ) -> EvoResult<EvolutionState<C>> {
        let mut current = state.clone();
        for stage in &self.stages {
            current = stage.apply(&current, output_size, rng)?;
        }
        Ok(current)
    }
}
