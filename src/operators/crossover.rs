//! Crossover operators
//!
//! Every operator produces one gene list per offspring from equally long
//! parent chromosomes. [`OrderedCrossover`] preserves permutations;
//! [`AverageCrossover`] blends numeric genes; [`SinglePointCrossover`] and
//! [`UniformCrossover`] exchange genes position by position.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::Constraints;
use crate::error::{ConfigurationError, OperatorError};
use crate::genome::traits::{Chromosome, NumericGene};
use crate::operators::traits::{chance, CrossoverOperator};

pub const DEFAULT_CROSSOVER_CHROMOSOME_RATE: f64 = 0.5;
pub const DEFAULT_AVERAGE_PARENTS: usize = 2;
pub const DEFAULT_AVERAGE_OFFSPRING: usize = 1;
pub const DEFAULT_AVERAGE_GENE_RATE: f64 = 1.0;
pub const DEFAULT_UNIFORM_GENE_RATE: f64 = 0.5;

fn expect_parents<C>(parents: &[&C], expected: usize) -> Result<(), OperatorError> {
    if parents.len() != expected {
        return Err(OperatorError::ParentCount {
            expected,
            actual: parents.len(),
        });
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PairCrossoverParams {
    chromosome_rate: f64,
    exclusivity: bool,
}

impl Default for PairCrossoverParams {
    fn default() -> Self {
        Self {
            chromosome_rate: DEFAULT_CROSSOVER_CHROMOSOME_RATE,
            exclusivity: false,
        }
    }
}

/// Order crossover (OX) for permutation encodings
///
/// Two cut points are drawn from `0..size` and sorted, giving the half-open
/// segment `[start, end)`. Child A keeps parent 1's segment in place and
/// fills the remaining positions with parent 2's other genes in parent 2's
/// order; child B is built the same way with the parents swapped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PairCrossoverParams")]
pub struct OrderedCrossover {
    chromosome_rate: f64,
    exclusivity: bool,
}

impl OrderedCrossover {
    pub fn new(chromosome_rate: f64, exclusivity: bool) -> Result<Self, ConfigurationError> {
        Constraints::new()
            .probability("chromosome_rate", chromosome_rate)
            .finish()?;
        Ok(Self {
            chromosome_rate,
            exclusivity,
        })
    }
}

impl Default for OrderedCrossover {
    fn default() -> Self {
        Self {
            chromosome_rate: DEFAULT_CROSSOVER_CHROMOSOME_RATE,
            exclusivity: false,
        }
    }
}

impl TryFrom<PairCrossoverParams> for OrderedCrossover {
    type Error = ConfigurationError;

    fn try_from(p: PairCrossoverParams) -> Result<Self, Self::Error> {
        Self::new(p.chromosome_rate, p.exclusivity)
    }
}

/// Build both OX children for the segment `[start, end)`
///
/// Requires equally long parents and `start <= end <= size - 1`. With
/// `start == end` each child is the other parent's gene order unchanged.
/// Children always have `size` genes, also when genes repeat.
pub fn ordered_offspring<G: Clone + PartialEq>(
    parent1: &[G],
    parent2: &[G],
    start: usize,
    end: usize,
) -> Result<(Vec<G>, Vec<G>), OperatorError> {
    let size = parent1.len();
    if start > end || end >= size {
        return Err(OperatorError::InvalidRegion { start, end, size });
    }
    if parent2.len() != size {
        return Err(OperatorError::LengthMismatch {
            expected: size,
            actual: parent2.len(),
        });
    }
    Ok((
        ordered_child(parent1, parent2, start, end),
        ordered_child(parent2, parent1, start, end),
    ))
}

fn ordered_child<G: Clone + PartialEq>(
    template: &[G],
    donor: &[G],
    start: usize,
    end: usize,
) -> Vec<G> {
    let segment = &template[start..end];
    // Each segment gene consumes one equal donor gene
    let mut unmatched: Vec<&G> = segment.iter().collect();
    let mut filler: Vec<&G> = donor
        .iter()
        .filter(|&g| match unmatched.iter().position(|&s| s == g) {
            Some(i) => {
                unmatched.swap_remove(i);
                false
            }
            None => true,
        })
        .collect();
    // Parents that are not rearrangements of each other leave surplus genes
    filler.truncate(template.len() - segment.len());
    let split = start.min(filler.len());

    let mut child = Vec::with_capacity(template.len());
    child.extend(filler[..split].iter().map(|&g| g.clone()));
    child.extend_from_slice(segment);
    child.extend(filler[split..].iter().map(|&g| g.clone()));
    child
}

impl<C: Chromosome> CrossoverOperator<C> for OrderedCrossover {
    fn num_parents(&self) -> usize {
        2
    }

    fn num_offspring(&self) -> usize {
        2
    }

    fn chromosome_rate(&self) -> f64 {
        self.chromosome_rate
    }

    fn exclusivity(&self) -> bool {
        self.exclusivity
    }

    fn crossover_chromosomes<R: Rng + ?Sized>(
        &self,
        parents: &[&C],
        rng: &mut R,
    ) -> Result<Vec<Vec<C::Gene>>, OperatorError> {
        expect_parents(parents, 2)?;
        let (p1, p2) = (parents[0].genes(), parents[1].genes());
        let size = p1.len();
        if size == 0 {
            return Ok(vec![p1.to_vec(), p2.to_vec()]);
        }

        let a = rng.gen_range(0..size);
        let b = rng.gen_range(0..size);
        let (start, end) = (a.min(b), a.max(b));
        trace!(start, end, "ordered crossover cut points");

        let (child1, child2) = ordered_offspring(p1, p2, start, end)?;
        Ok(vec![child1, child2])
    }
}

/// Arithmetic blend of numeric genes across all parents
///
/// Each offspring starts from the first parent; every position is replaced by
/// the mean of the parents' values with probability `gene_rate`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AverageCrossoverParams")]
pub struct AverageCrossover {
    num_parents: usize,
    num_offspring: usize,
    chromosome_rate: f64,
    gene_rate: f64,
    exclusivity: bool,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct AverageCrossoverParams {
    num_parents: usize,
    num_offspring: usize,
    chromosome_rate: f64,
    gene_rate: f64,
    exclusivity: bool,
}

impl Default for AverageCrossoverParams {
    fn default() -> Self {
        Self {
            num_parents: DEFAULT_AVERAGE_PARENTS,
            num_offspring: DEFAULT_AVERAGE_OFFSPRING,
            chromosome_rate: DEFAULT_CROSSOVER_CHROMOSOME_RATE,
            gene_rate: DEFAULT_AVERAGE_GENE_RATE,
            exclusivity: false,
        }
    }
}

impl AverageCrossover {
    pub fn new(
        num_parents: usize,
        num_offspring: usize,
        chromosome_rate: f64,
        gene_rate: f64,
        exclusivity: bool,
    ) -> Result<Self, ConfigurationError> {
        Constraints::new()
            .at_least("num_parents", num_parents, 1)
            .at_least("num_offspring", num_offspring, 1)
            .probability("chromosome_rate", chromosome_rate)
            .probability("gene_rate", gene_rate)
            .finish()?;
        Ok(Self {
            num_parents,
            num_offspring,
            chromosome_rate,
            gene_rate,
            exclusivity,
        })
    }

    pub fn gene_rate(&self) -> f64 {
        self.gene_rate
    }
}

impl Default for AverageCrossover {
    fn default() -> Self {
        Self {
            num_parents: DEFAULT_AVERAGE_PARENTS,
            num_offspring: DEFAULT_AVERAGE_OFFSPRING,
            chromosome_rate: DEFAULT_CROSSOVER_CHROMOSOME_RATE,
            gene_rate: DEFAULT_AVERAGE_GENE_RATE,
            exclusivity: false,
        }
    }
}

impl TryFrom<AverageCrossoverParams> for AverageCrossover {
    type Error = ConfigurationError;

    fn try_from(p: AverageCrossoverParams) -> Result<Self, Self::Error> {
        Self::new(
            p.num_parents,
            p.num_offspring,
            p.chromosome_rate,
            p.gene_rate,
            p.exclusivity,
        )
    }
}

impl<C> CrossoverOperator<C> for AverageCrossover
where
    C: Chromosome,
    C::Gene: NumericGene,
{
    fn num_parents(&self) -> usize {
        self.num_parents
    }

    fn num_offspring(&self) -> usize {
        self.num_offspring
    }

    fn chromosome_rate(&self) -> f64 {
        self.chromosome_rate
    }

    fn exclusivity(&self) -> bool {
        self.exclusivity
    }

    fn crossover_chromosomes<R: Rng + ?Sized>(
        &self,
        parents: &[&C],
        rng: &mut R,
    ) -> Result<Vec<Vec<C::Gene>>, OperatorError> {
        expect_parents(parents, self.num_parents)?;
        let base = parents[0].genes();
        let means: Vec<f64> = (0..base.len())
            .map(|i| {
                let n = parents.len() as f64;
                let sum: f64 = parents.iter().map(|p| p.genes()[i].to_f64()).sum();
                if sum.is_finite() {
                    sum / n
                } else {
                    // Overflowed; divide each value first
                    parents.iter().map(|p| p.genes()[i].to_f64() / n).sum()
                }
            })
            .collect();

        let offspring = (0..self.num_offspring)
            .map(|_| {
                base.iter()
                    .zip(&means)
                    .map(|(gene, &mean)| {
                        if chance(rng, self.gene_rate) {
                            gene.duplicate_with_f64(mean)
                        } else {
                            gene.clone()
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        Ok(offspring)
    }
}

/// One-point crossover
///
/// A cut index is drawn from `0..size`; child A takes parent 1's genes before
/// the cut and parent 2's from the cut on, child B the reverse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PairCrossoverParams")]
pub struct SinglePointCrossover {
    chromosome_rate: f64,
    exclusivity: bool,
}

impl SinglePointCrossover {
    pub fn new(chromosome_rate: f64, exclusivity: bool) -> Result<Self, ConfigurationError> {
        Constraints::new()
            .probability("chromosome_rate", chromosome_rate)
            .finish()?;
        Ok(Self {
            chromosome_rate,
            exclusivity,
        })
    }
}

impl Default for SinglePointCrossover {
    fn default() -> Self {
        Self {
            chromosome_rate: DEFAULT_CROSSOVER_CHROMOSOME_RATE,
            exclusivity: false,
        }
    }
}

impl TryFrom<PairCrossoverParams> for SinglePointCrossover {
    type Error = ConfigurationError;

    fn try_from(p: PairCrossoverParams) -> Result<Self, Self::Error> {
        Self::new(p.chromosome_rate, p.exclusivity)
    }
}

impl<C: Chromosome> CrossoverOperator<C> for SinglePointCrossover {
    fn num_parents(&self) -> usize {
        2
    }

    fn num_offspring(&self) -> usize {
        2
    }

    fn chromosome_rate(&self) -> f64 {
        self.chromosome_rate
    }

    fn exclusivity(&self) -> bool {
        self.exclusivity
    }

    fn crossover_chromosomes<R: Rng + ?Sized>(
        &self,
        parents: &[&C],
        rng: &mut R,
    ) -> Result<Vec<Vec<C::Gene>>, OperatorError> {
        expect_parents(parents, 2)?;
        let (p1, p2) = (parents[0].genes(), parents[1].genes());
        if p1.is_empty() {
            return Ok(vec![p1.to_vec(), p2.to_vec()]);
        }

        let cut = rng.gen_range(0..p1.len());
        trace!(cut, "single point crossover");

        let child1: Vec<C::Gene> = p1[..cut].iter().chain(&p2[cut..]).cloned().collect();
        let child2: Vec<C::Gene> = p2[..cut].iter().chain(&p1[cut..]).cloned().collect();
        Ok(vec![child1, child2])
    }
}

/// Position-wise exchange between two parents
///
/// Each position is exchanged between the two children with probability
/// `gene_rate`, one draw per position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UniformCrossoverParams")]
pub struct UniformCrossover {
    chromosome_rate: f64,
    gene_rate: f64,
    exclusivity: bool,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct UniformCrossoverParams {
    chromosome_rate: f64,
    gene_rate: f64,
    exclusivity: bool,
}

impl Default for UniformCrossoverParams {
    fn default() -> Self {
        Self {
            chromosome_rate: DEFAULT_CROSSOVER_CHROMOSOME_RATE,
            gene_rate: DEFAULT_UNIFORM_GENE_RATE,
            exclusivity: false,
        }
    }
}

impl UniformCrossover {
    pub fn new(
        chromosome_rate: f64,
        gene_rate: f64,
        exclusivity: bool,
    ) -> Result<Self, ConfigurationError> {
        Constraints::new()
            .probability("chromosome_rate", chromosome_rate)
            .probability("gene_rate", gene_rate)
            .finish()?;
        Ok(Self {
            chromosome_rate,
            gene_rate,
            exclusivity,
        })
    }

    pub fn gene_rate(&self) -> f64 {
        self.gene_rate
    }
}

impl Default for UniformCrossover {
    fn default() -> Self {
        Self {
            chromosome_rate: DEFAULT_CROSSOVER_CHROMOSOME_RATE,
            gene_rate: DEFAULT_UNIFORM_GENE_RATE,
            exclusivity: false,
        }
    }
}

impl TryFrom<UniformCrossoverParams> for UniformCrossover {
    type Error = ConfigurationError;

    fn try_from(p: UniformCrossoverParams) -> Result<Self, Self::Error> {
        Self::new(p.chromosome_rate, p.gene_rate, p.exclusivity)
    }
}

impl<C: Chromosome> CrossoverOperator<C> for UniformCrossover {
    fn num_parents(&self) -> usize {
        2
    }

    fn num_offspring(&self) -> usize {
        2
    }

    fn chromosome_rate(&self) -> f64 {
        self.chromosome_rate
    }

    fn exclusivity(&self) -> bool {
        self.exclusivity
    }

    fn crossover_chromosomes<R: Rng + ?Sized>(
        &self,
        parents: &[&C],
        rng: &mut R,
    ) -> Result<Vec<Vec<C::Gene>>, OperatorError> {
        expect_parents(parents, 2)?;
        let (p1, p2) = (parents[0].genes(), parents[1].genes());

        let mut child1 = Vec::with_capacity(p1.len());
        let mut child2 = Vec::with_capacity(p2.len());
        for (g1, g2) in p1.iter().zip(p2) {
            if chance(rng, self.gene_rate) {
                child1.push(g2.clone());
                child2.push(g1.clone());
            } else {
                child1.push(g1.clone());
                child2.push(g2.clone());
            }
        }
        Ok(vec![child1, child2])
    }
}
