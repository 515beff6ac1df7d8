//! End-to-end tests driving a small evolution loop through the operator pipeline

use allele_evo::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn evaluate<C, F>(state: EvolutionState<C>, fitness: F) -> EvolutionState<C>
where
    C: Chromosome,
    F: Fn(&Genotype<C>) -> f64,
{
    let population = state
        .population()
        .iter()
        .map(|individual| {
            if individual.is_evaluated() {
                individual.clone()
            } else {
                let f = fitness(individual.genotype());
                individual.clone().evaluated(f)
            }
        })
        .collect();
    state.with_population(population)
}

/// Keep the previous best in place of the worst offspring
fn with_elite<C: Chromosome, K: Ranker>(
    previous: &EvolutionState<C>,
    offspring: EvolutionState<C>,
    ranker: &K,
) -> EvolutionState<C> {
    let mut population = ranker.sort(offspring.population().to_vec());
    if let (Some(elite), Some(last)) = (previous.best(ranker), population.last_mut()) {
        *last = elite.clone();
    }
    offspring.next_generation(population)
}

fn ones(genotype: &Genotype<BoolChromosome>) -> f64 {
    genotype.iter().map(|c| c.count_ones() as f64).sum()
}

#[test]
fn test_onemax_improves() {
    let mut rng = StdRng::seed_from_u64(2024);
    let factory = GenotypeFactory::new(vec![BoolChromosomeFactory::new(32, 0.5).unwrap()]).unwrap();
    let ranker = FitnessMaxRanker;

    let pipeline: Pipeline<BoolChromosome> = Pipeline::new()
        .then(SelectorOperator::new(TournamentSelector::default(), ranker))
        .then(CrossoverAlterer::new(SinglePointCrossover::new(0.9, true).unwrap()))
        .then(MutationAlterer::new(BitFlipMutator::new(0.3, 1.0, 0.05).unwrap()));

    let mut state = evaluate(EvolutionState::initial(&factory, 40, &mut rng), ones);
    let initial_best = state.best(&ranker).unwrap().fitness();

    for _ in 0..40 {
        let offspring = evaluate(pipeline.apply(&state, 40, &mut rng).unwrap(), ones);
        state = with_elite(&state, offspring, &ranker);
        assert_eq!(state.len(), 40);
        assert!(state.all_evaluated());
    }

    let final_best = state.best(&ranker).unwrap().fitness();
    assert_eq!(state.generation(), 40);
    assert!(final_best > initial_best, "{initial_best} -> {final_best}");
    assert!(state.mean_fitness().unwrap() > 20.0);
}

fn tour_length(genotype: &Genotype<IntChromosome>) -> f64 {
    // Cities on a line; the identity order is optimal
    let cities = genotype[0].values();
    cities
        .iter()
        .zip(cities.iter().cycle().skip(1))
        .map(|(a, b)| (a - b).abs() as f64)
        .sum()
}

#[test]
fn test_permutation_pipeline_from_config() {
    let mut rng = StdRng::seed_from_u64(7);
    let crossover: OrderedCrossover =
        serde_json::from_str(r#"{"chromosome_rate": 1.0, "exclusivity": true}"#).unwrap();
    let inversion: InversionMutator = serde_json::from_value(serde_json::json!({
        "individual_rate": 0.5,
        "chromosome_rate": 1.0,
        "inversion_boundary_probability": 0.3
    }))
    .unwrap();
    let selector: TournamentSelector = serde_json::from_str(r#"{"tournament_size": 4}"#).unwrap();

    let mut pipeline: Pipeline<IntChromosome> = Pipeline::new();
    pipeline.push(Box::new(SelectorOperator::new(selector, FitnessMinRanker)));
    pipeline.push(Box::new(CrossoverAlterer::new(crossover)));
    pipeline.push(Box::new(MutationAlterer::new(inversion)));

    let factory = GenotypeFactory::new(vec![PermutationFactory::new(12).unwrap()]).unwrap();
    let mut state = evaluate(EvolutionState::initial(&factory, 30, &mut rng), tour_length);
    let initial_best = state.best(&FitnessMinRanker).unwrap().fitness();

    for _ in 0..60 {
        let offspring = evaluate(pipeline.apply(&state, 30, &mut rng).unwrap(), tour_length);
        state = with_elite(&state, offspring, &FitnessMinRanker);
        for individual in state.population() {
            assert!(individual.genotype()[0].is_permutation());
        }
    }

    let final_best = state.best(&FitnessMinRanker).unwrap().fitness();
    assert!(final_best <= initial_best);
    // Optimal tour on a line of 12 cities
    assert!(final_best >= 22.0);
}

#[test]
fn test_mixed_operators_share_one_pipeline() {
    let mut rng = StdRng::seed_from_u64(99);
    let range = GeneRange::new(-5.0, 5.0).unwrap();
    let factory = GenotypeFactory::new(vec![
        DoubleChromosomeFactory::new(4, range).unwrap(),
        DoubleChromosomeFactory::new(2, range).unwrap(),
    ])
    .unwrap();
    let sphere = |g: &Genotype<DoubleChromosome>| -> f64 {
        g.flatten().iter().map(|x| x * x).sum()
    };

    let stages: Vec<Box<dyn Operator<DoubleChromosome>>> = vec![
        Box::new(SelectorOperator::new(RouletteWheelSelector, FitnessMinRanker)),
        Box::new(CrossoverAlterer::new(AverageCrossover::default())),
        Box::new(CrossoverAlterer::new(UniformCrossover::default())),
        Box::new(MutationAlterer::new(RandomMutator::new(0.2, 0.5, 0.2).unwrap())),
        Box::new(MutationAlterer::new(SwapMutator::default())),
    ];
    let pipeline: Pipeline<DoubleChromosome> = stages.into_iter().collect();
    assert_eq!(pipeline.len(), 5);

    let state = evaluate(EvolutionState::initial(&factory, 25, &mut rng), sphere);
    let next = pipeline.apply(&state, 15, &mut rng).unwrap();

    assert_eq!(next.len(), 15);
    assert_eq!(next.generation(), 0);
    for individual in next.population() {
        let genotype = individual.genotype();
        assert_eq!(genotype.len(), 2);
        assert_eq!(genotype[0].size(), 4);
        assert_eq!(genotype[1].size(), 2);
        assert!(genotype.verify());
    }
}

#[test]
fn test_pipeline_reports_empty_population() {
    let mut rng = StdRng::seed_from_u64(3);
    let pipeline: Pipeline<BoolChromosome> = Pipeline::new()
        .then(SelectorOperator::new(RandomSelector, FitnessMaxRanker))
        .then(MutationAlterer::new(BitFlipMutator::default()));

    let empty = EvolutionState::new(Vec::new(), 5);
    let err = pipeline.apply(&empty, 10, &mut rng).unwrap_err();
    assert_eq!(err, EvolutionError::EmptyPopulation);
    assert_eq!(err.to_string(), "Empty population");
}
