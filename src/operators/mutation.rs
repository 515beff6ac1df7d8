//! Mutation operators
//!
//! Gene-level operators ([`RandomMutator`], [`BitFlipMutator`]) replace
//! individual genes; structural operators ([`InversionMutator`],
//! [`DisplacementMutator`], [`PartialShuffleMutator`], [`SwapMutator`])
//! rearrange existing genes and therefore preserve permutations.
//!
//! All rates are validated at construction. Every operator draws from the
//! random source in a fixed order, documented per operator, so a replayed
//! generator reproduces the same result.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::Constraints;
use crate::error::{ConfigurationError, OperatorError};
use crate::genome::boolean::BoolGene;
use crate::genome::traits::{Chromosome, Gene};
use crate::operators::traits::{
    chance, mutate_genes, GeneMutator, MutationOperator, MutationResult,
};

pub const DEFAULT_INDIVIDUAL_RATE: f64 = 1.0;
pub const DEFAULT_CHROMOSOME_RATE: f64 = 0.5;
pub const DEFAULT_GENE_RATE: f64 = 0.5;
pub const DEFAULT_BOUNDARY_PROBABILITY: f64 = 0.5;
pub const DEFAULT_SWAP_RATE: f64 = 0.5;
pub const DEFAULT_DISPLACEMENT: usize = 1;

/// Replaces selected genes with a fresh random draw from their valid range
///
/// The new value may equal the old one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeneMutatorParams")]
pub struct RandomMutator {
    individual_rate: f64,
    chromosome_rate: f64,
    gene_rate: f64,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GeneMutatorParams {
    individual_rate: f64,
    chromosome_rate: f64,
    gene_rate: f64,
}

impl Default for GeneMutatorParams {
    fn default() -> Self {
        Self {
            individual_rate: DEFAULT_INDIVIDUAL_RATE,
            chromosome_rate: DEFAULT_CHROMOSOME_RATE,
            gene_rate: DEFAULT_GENE_RATE,
        }
    }
}

fn check_gene_rates(
    individual_rate: f64,
    chromosome_rate: f64,
    gene_rate: f64,
) -> Result<(), ConfigurationError> {
    Constraints::new()
        .probability("individual_rate", individual_rate)
        .probability("chromosome_rate", chromosome_rate)
        .probability("gene_rate", gene_rate)
        .finish()
}

impl RandomMutator {
    pub fn new(
        individual_rate: f64,
        chromosome_rate: f64,
        gene_rate: f64,
    ) -> Result<Self, ConfigurationError> {
        check_gene_rates(individual_rate, chromosome_rate, gene_rate)?;
        Ok(Self {
            individual_rate,
            chromosome_rate,
            gene_rate,
        })
    }
}

impl Default for RandomMutator {
    fn default() -> Self {
        Self {
            individual_rate: DEFAULT_INDIVIDUAL_RATE,
            chromosome_rate: DEFAULT_CHROMOSOME_RATE,
            gene_rate: DEFAULT_GENE_RATE,
        }
    }
}

impl TryFrom<GeneMutatorParams> for RandomMutator {
    type Error = ConfigurationError;

    fn try_from(p: GeneMutatorParams) -> Result<Self, Self::Error> {
        Self::new(p.individual_rate, p.chromosome_rate, p.gene_rate)
    }
}

impl<C: Chromosome> MutationOperator<C> for RandomMutator {
    fn individual_rate(&self) -> f64 {
        self.individual_rate
    }

    fn chromosome_rate(&self) -> f64 {
        self.chromosome_rate
    }

    fn mutate_chromosome<R: Rng + ?Sized>(
        &self,
        chromosome: &C,
        rng: &mut R,
    ) -> MutationResult<C> {
        mutate_genes(self, chromosome, rng)
    }
}

impl<C: Chromosome> GeneMutator<C> for RandomMutator {
    fn gene_rate(&self) -> f64 {
        self.gene_rate
    }

    fn mutate_gene<R: Rng + ?Sized>(&self, gene: &C::Gene, rng: &mut R) -> C::Gene {
        gene.mutate(rng)
    }
}

/// Flips selected boolean genes
///
/// Unlike [`RandomMutator`], a selected gene always changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeneMutatorParams")]
pub struct BitFlipMutator {
    individual_rate: f64,
    chromosome_rate: f64,
    gene_rate: f64,
}

impl BitFlipMutator {
    pub fn new(
        individual_rate: f64,
        chromosome_rate: f64,
        gene_rate: f64,
    ) -> Result<Self, ConfigurationError> {
        check_gene_rates(individual_rate, chromosome_rate, gene_rate)?;
        Ok(Self {
            individual_rate,
            chromosome_rate,
            gene_rate,
        })
    }
}

impl Default for BitFlipMutator {
    fn default() -> Self {
        Self {
            individual_rate: DEFAULT_INDIVIDUAL_RATE,
            chromosome_rate: DEFAULT_CHROMOSOME_RATE,
            gene_rate: DEFAULT_GENE_RATE,
        }
    }
}

impl TryFrom<GeneMutatorParams> for BitFlipMutator {
    type Error = ConfigurationError;

    fn try_from(p: GeneMutatorParams) -> Result<Self, Self::Error> {
        Self::new(p.individual_rate, p.chromosome_rate, p.gene_rate)
    }
}

impl<C: Chromosome<Gene = BoolGene>> MutationOperator<C> for BitFlipMutator {
    fn individual_rate(&self) -> f64 {
        self.individual_rate
    }

    fn chromosome_rate(&self) -> f64 {
        self.chromosome_rate
    }

    fn mutate_chromosome<R: Rng + ?Sized>(
        &self,
        chromosome: &C,
        rng: &mut R,
    ) -> MutationResult<C> {
        mutate_genes(self, chromosome, rng)
    }
}

impl<C: Chromosome<Gene = BoolGene>> GeneMutator<C> for BitFlipMutator {
    fn gene_rate(&self) -> f64 {
        self.gene_rate
    }

    fn mutate_gene<R: Rng + ?Sized>(&self, gene: &BoolGene, _rng: &mut R) -> BoolGene {
        gene.flip()
    }
}

/// Pick an inclusive segment `[start, end]` by scanning left to right
///
/// `start` is the first index whose draw falls below `probability`; `end` is
/// the first later index whose draw exceeds it, or the last index. Returns
/// `None` when no start was drawn. One draw per scanned index.
pub fn segment_boundaries<R: Rng + ?Sized>(
    size: usize,
    probability: f64,
    rng: &mut R,
) -> Option<(usize, usize)> {
    let start = (0..size).find(|_| chance(rng, probability))?;
    let end = (start + 1..size)
        .find(|_| rng.gen::<f64>() > probability)
        .unwrap_or(size - 1);
    Some((start, end))
}

fn check_region(start: usize, end: usize, size: usize) -> Result<(), OperatorError> {
    if start > end || end >= size {
        return Err(OperatorError::InvalidRegion { start, end, size });
    }
    Ok(())
}

/// Reverses the genes in `[start, end]`
pub fn invert<C: Chromosome>(chromosome: &C, start: usize, end: usize) -> Result<C, OperatorError> {
    check_region(start, end, chromosome.size())?;
    let mut genes = chromosome.genes().to_vec();
    genes[start..=end].reverse();
    Ok(chromosome.duplicate_with_genes(genes))
}

/// Reverses a randomly bounded segment
///
/// Probability 0.0 never inverts; 1.0 reverses the whole chromosome.
/// Applying the operator twice with the same draws restores the input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "InversionMutatorParams")]
pub struct InversionMutator {
    individual_rate: f64,
    chromosome_rate: f64,
    inversion_boundary_probability: f64,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct InversionMutatorParams {
    individual_rate: f64,
    chromosome_rate: f64,
    inversion_boundary_probability: f64,
}

impl Default for InversionMutatorParams {
    fn default() -> Self {
        Self {
            individual_rate: DEFAULT_INDIVIDUAL_RATE,
            chromosome_rate: DEFAULT_CHROMOSOME_RATE,
            inversion_boundary_probability: DEFAULT_BOUNDARY_PROBABILITY,
        }
    }
}

impl InversionMutator {
    pub fn new(
        individual_rate: f64,
        chromosome_rate: f64,
        inversion_boundary_probability: f64,
    ) -> Result<Self, ConfigurationError> {
        Constraints::new()
            .probability("individual_rate", individual_rate)
            .probability("chromosome_rate", chromosome_rate)
            .probability(
                "inversion_boundary_probability",
                inversion_boundary_probability,
            )
            .finish()?;
        Ok(Self {
            individual_rate,
            chromosome_rate,
            inversion_boundary_probability,
        })
    }

    pub fn inversion_boundary_probability(&self) -> f64 {
        self.inversion_boundary_probability
    }
}

impl Default for InversionMutator {
    fn default() -> Self {
        Self {
            individual_rate: DEFAULT_INDIVIDUAL_RATE,
            chromosome_rate: DEFAULT_CHROMOSOME_RATE,
            inversion_boundary_probability: DEFAULT_BOUNDARY_PROBABILITY,
        }
    }
}

impl TryFrom<InversionMutatorParams> for InversionMutator {
    type Error = ConfigurationError;

    fn try_from(p: InversionMutatorParams) -> Result<Self, Self::Error> {
        Self::new(
            p.individual_rate,
            p.chromosome_rate,
            p.inversion_boundary_probability,
        )
    }
}

impl<C: Chromosome> MutationOperator<C> for InversionMutator {
    fn individual_rate(&self) -> f64 {
        self.individual_rate
    }

    fn chromosome_rate(&self) -> f64 {
        self.chromosome_rate
    }

    fn mutate_chromosome<R: Rng + ?Sized>(
        &self,
        chromosome: &C,
        rng: &mut R,
    ) -> MutationResult<C> {
        let Some((start, end)) =
            segment_boundaries(chromosome.size(), self.inversion_boundary_probability, rng)
        else {
            return MutationResult::unchanged(chromosome.clone());
        };
        trace!(start, end, "inversion boundaries");

        match invert(chromosome, start, end) {
            Ok(inverted) => MutationResult::new(inverted, usize::from(start < end)),
            Err(_) => MutationResult::unchanged(chromosome.clone()),
        }
    }
}

/// Rotation direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// The first genes move to the back
    Left,
    /// The last genes move to the front
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Rotate the genes circularly by `displacement` positions
pub fn shift<C: Chromosome>(chromosome: &C, displacement: usize, direction: Direction) -> C {
    let size = chromosome.size();
    if size == 0 {
        return chromosome.clone();
    }
    let mut genes = chromosome.genes().to_vec();
    match direction {
        Direction::Left => genes.rotate_left(displacement % size),
        Direction::Right => genes.rotate_right(displacement % size),
    }
    chromosome.duplicate_with_genes(genes)
}

/// Rotates the chromosome by a fixed displacement in a random direction
///
/// No draw is taken when the rotation would be a no-op (empty chromosome or
/// a displacement that is a multiple of the size).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DisplacementMutatorParams")]
pub struct DisplacementMutator {
    individual_rate: f64,
    chromosome_rate: f64,
    displacement: usize,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DisplacementMutatorParams {
    individual_rate: f64,
    chromosome_rate: f64,
    displacement: usize,
}

impl Default for DisplacementMutatorParams {
    fn default() -> Self {
        Self {
            individual_rate: DEFAULT_INDIVIDUAL_RATE,
            chromosome_rate: DEFAULT_CHROMOSOME_RATE,
            displacement: DEFAULT_DISPLACEMENT,
        }
    }
}

impl DisplacementMutator {
    pub fn new(
        individual_rate: f64,
        chromosome_rate: f64,
        displacement: usize,
    ) -> Result<Self, ConfigurationError> {
        Constraints::new()
            .probability("individual_rate", individual_rate)
            .probability("chromosome_rate", chromosome_rate)
            .finish()?;
        Ok(Self {
            individual_rate,
            chromosome_rate,
            displacement,
        })
    }

    pub fn displacement(&self) -> usize {
        self.displacement
    }
}

impl Default for DisplacementMutator {
    fn default() -> Self {
        Self {
            individual_rate: DEFAULT_INDIVIDUAL_RATE,
            chromosome_rate: DEFAULT_CHROMOSOME_RATE,
            displacement: DEFAULT_DISPLACEMENT,
        }
    }
}

impl TryFrom<DisplacementMutatorParams> for DisplacementMutator {
    type Error = ConfigurationError;

    fn try_from(p: DisplacementMutatorParams) -> Result<Self, Self::Error> {
        Self::new(p.individual_rate, p.chromosome_rate, p.displacement)
    }
}

impl<C: Chromosome> MutationOperator<C> for DisplacementMutator {
    fn individual_rate(&self) -> f64 {
        self.individual_rate
    }

    fn chromosome_rate(&self) -> f64 {
        self.chromosome_rate
    }

    fn mutate_chromosome<R: Rng + ?Sized>(
        &self,
        chromosome: &C,
        rng: &mut R,
    ) -> MutationResult<C> {
        let size = chromosome.size();
        if size == 0 || self.displacement % size == 0 {
            return MutationResult::unchanged(chromosome.clone());
        }

        let direction = if rng.gen_bool(0.5) {
            Direction::Right
        } else {
            Direction::Left
        };
        trace!(?direction, displacement = self.displacement, "displacement");
        MutationResult::new(shift(chromosome, self.displacement, direction), 1)
    }
}

/// Shuffles a randomly bounded segment, leaving the rest untouched
///
/// Boundaries are chosen the same way as for [`InversionMutator`]; the
/// segment is then shuffled with Fisher-Yates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PartialShuffleMutatorParams")]
pub struct PartialShuffleMutator {
    individual_rate: f64,
    chromosome_rate: f64,
    shuffle_boundary_probability: f64,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PartialShuffleMutatorParams {
    individual_rate: f64,
    chromosome_rate: f64,
    shuffle_boundary_probability: f64,
}

impl Default for PartialShuffleMutatorParams {
    fn default() -> Self {
        Self {
            individual_rate: DEFAULT_INDIVIDUAL_RATE,
            chromosome_rate: DEFAULT_CHROMOSOME_RATE,
            shuffle_boundary_probability: DEFAULT_BOUNDARY_PROBABILITY,
        }
    }
}

impl PartialShuffleMutator {
    pub fn new(
        individual_rate: f64,
        chromosome_rate: f64,
        shuffle_boundary_probability: f64,
    ) -> Result<Self, ConfigurationError> {
        Constraints::new()
            .probability("individual_rate", individual_rate)
            .probability("chromosome_rate", chromosome_rate)
            .probability("shuffle_boundary_probability", shuffle_boundary_probability)
            .finish()?;
        Ok(Self {
            individual_rate,
            chromosome_rate,
            shuffle_boundary_probability,
        })
    }

    pub fn shuffle_boundary_probability(&self) -> f64 {
        self.shuffle_boundary_probability
    }
}

impl Default for PartialShuffleMutator {
    fn default() -> Self {
        Self {
            individual_rate: DEFAULT_INDIVIDUAL_RATE,
            chromosome_rate: DEFAULT_CHROMOSOME_RATE,
            shuffle_boundary_probability: DEFAULT_BOUNDARY_PROBABILITY,
        }
    }
}

impl TryFrom<PartialShuffleMutatorParams> for PartialShuffleMutator {
    type Error = ConfigurationError;

    fn try_from(p: PartialShuffleMutatorParams) -> Result<Self, Self::Error> {
        Self::new(
            p.individual_rate,
            p.chromosome_rate,
            p.shuffle_boundary_probability,
        )
    }
}

impl<C: Chromosome> MutationOperator<C> for PartialShuffleMutator {
    fn individual_rate(&self) -> f64 {
        self.individual_rate
    }

    fn chromosome_rate(&self) -> f64 {
        self.chromosome_rate
    }

    fn mutate_chromosome<R: Rng + ?Sized>(
        &self,
        chromosome: &C,
        rng: &mut R,
    ) -> MutationResult<C> {
        let Some((start, end)) =
            segment_boundaries(chromosome.size(), self.shuffle_boundary_probability, rng)
        else {
            return MutationResult::unchanged(chromosome.clone());
        };
        trace!(start, end, "shuffle boundaries");

        if start == end {
            return MutationResult::unchanged(chromosome.clone());
        }
        let mut genes = chromosome.genes().to_vec();
        genes[start..=end].shuffle(rng);
        MutationResult::new(chromosome.duplicate_with_genes(genes), 1)
    }
}

/// Swaps genes with randomly chosen partners
///
/// Each index in turn is selected with probability `swap_rate` and swapped
/// with a uniformly drawn index (possibly itself).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SwapMutatorParams")]
pub struct SwapMutator {
    individual_rate: f64,
    chromosome_rate: f64,
    swap_rate: f64,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SwapMutatorParams {
    individual_rate: f64,
    chromosome_rate: f64,
    swap_rate: f64,
}

impl Default for SwapMutatorParams {
    fn default() -> Self {
        Self {
            individual_rate: DEFAULT_INDIVIDUAL_RATE,
            chromosome_rate: DEFAULT_CHROMOSOME_RATE,
            swap_rate: DEFAULT_SWAP_RATE,
        }
    }
}

impl SwapMutator {
    pub fn new(
        individual_rate: f64,
        chromosome_rate: f64,
        swap_rate: f64,
    ) -> Result<Self, ConfigurationError> {
        Constraints::new()
            .probability("individual_rate", individual_rate)
            .probability("chromosome_rate", chromosome_rate)
            .probability("swap_rate", swap_rate)
            .finish()?;
        Ok(Self {
            individual_rate,
            chromosome_rate,
            swap_rate,
        })
    }

    pub fn swap_rate(&self) -> f64 {
        self.swap_rate
    }
}

impl Default for SwapMutator {
    fn default() -> Self {
        Self {
            individual_rate: DEFAULT_INDIVIDUAL_RATE,
            chromosome_rate: DEFAULT_CHROMOSOME_RATE,
            swap_rate: DEFAULT_SWAP_RATE,
        }
    }
}

impl TryFrom<SwapMutatorParams> for SwapMutator {
    type Error = ConfigurationError;

    fn try_from(p: SwapMutatorParams) -> Result<Self, Self::Error> {
        Self::new(p.individual_rate, p.chromosome_rate, p.swap_rate)
    }
}

impl<C: Chromosome> MutationOperator<C> for SwapMutator {
    fn individual_rate(&self) -> f64 {
        self.individual_rate
    }

    fn chromosome_rate(&self) -> f64 {
        self.chromosome_rate
    }

    fn mutate_chromosome<R: Rng + ?Sized>(
        &self,
        chromosome: &C,
        rng: &mut R,
    ) -> MutationResult<C> {
        let size = chromosome.size();
        let mut genes = chromosome.genes().to_vec();
        let mut swaps = 0;
        for i in 0..size {
            if chance(rng, self.swap_rate) {
                let j = rng.gen_range(0..size);
                genes.swap(i, j);
                swaps += 1;
            }
        }
        if swaps == 0 {
            return MutationResult::unchanged(chromosome.clone());
        }
        MutationResult::new(chromosome.duplicate_with_genes(genes), swaps)
    }
}
