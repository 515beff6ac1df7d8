//! Integer genes and chromosomes
//!
//! Also provides [`PermutationFactory`] for ordering problems (TSP, job
//! scheduling, ...) where a chromosome is a permutation of `0..n`.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Constraints;
use crate::error::ConfigurationError;
use crate::genome::bounds::{GeneFilter, GeneRange};
use crate::genome::traits::{Chromosome, ChromosomeFactory, Gene, NumericGene};

/// Upper limit on redraws when looking for a value accepted by a filter
pub(crate) const MAX_FILTER_ATTEMPTS: usize = 100;

/// Draw from `range` until `filter` accepts the value
///
/// Returns `None` once [`MAX_FILTER_ATTEMPTS`] draws have all been rejected.
fn draw_accepted<R: Rng + ?Sized>(
    range: &GeneRange<i64>,
    filter: &GeneFilter<i64>,
    rng: &mut R,
) -> Option<i64> {
    (0..MAX_FILTER_ATTEMPTS)
        .map(|_| rng.gen_range(range.lo()..=range.hi()))
        .find(|value| filter.accepts(value))
}

/// Gene holding an `i64` constrained by a range and an optional filter
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntGene {
    value: i64,
    range: GeneRange<i64>,
    #[serde(skip)]
    filter: GeneFilter<i64>,
}

impl IntGene {
    /// Create a gene accepting any `i64`
    pub fn new(value: i64) -> Self {
        Self::with_range(value, GeneRange::FULL)
    }

    /// Create a gene constrained to `range`
    pub fn with_range(value: i64, range: GeneRange<i64>) -> Self {
        Self {
            value,
            range,
            filter: GeneFilter::accept_all(),
        }
    }

    /// Attach a filter predicate
    pub fn with_filter(mut self, filter: GeneFilter<i64>) -> Self {
        self.filter = filter;
        self
    }

    /// The valid range of this gene
    pub fn range(&self) -> &GeneRange<i64> {
        &self.range
    }
}

// Filters are opaque closures, so equality only looks at the value and range.
impl PartialEq for IntGene {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.range == other.range
    }
}

impl Eq for IntGene {}

impl Gene for IntGene {
    type Value = i64;

    fn value(&self) -> &i64 {
        &self.value
    }

    fn verify(&self) -> bool {
        self.range.contains(self.value) && self.filter.accepts(&self.value)
    }

    fn duplicate_with_value(&self, value: i64) -> Self {
        Self {
            value,
            range: self.range,
            filter: self.filter.clone(),
        }
    }

    /// Keeps the current value when the filter rejects every draw
    fn mutate<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let value = draw_accepted(&self.range, &self.filter, rng).unwrap_or(self.value);
        self.duplicate_with_value(value)
    }
}

impl NumericGene for IntGene {
    fn to_f64(&self) -> f64 {
        self.value as f64
    }

    /// Truncates toward zero, saturating at the `i64` limits
    fn duplicate_with_f64(&self, value: f64) -> Self {
        self.duplicate_with_value(value.trunc() as i64)
    }
}

/// Chromosome of integer genes
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntChromosome {
    genes: Vec<IntGene>,
}

impl IntChromosome {
    /// Create a chromosome from genes
    pub fn new(genes: Vec<IntGene>) -> Self {
        Self { genes }
    }

    /// Create a chromosome of unconstrained genes from raw values
    pub fn from_values(values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            genes: values.into_iter().map(IntGene::new).collect(),
        }
    }

    /// The raw values
    pub fn values(&self) -> Vec<i64> {
        self.genes.iter().map(|g| g.value).collect()
    }

    /// Whether the values form a permutation of `0..size`
    pub fn is_permutation(&self) -> bool {
        let n = self.genes.len();
        let mut seen = vec![false; n];
        for gene in &self.genes {
            match usize::try_from(gene.value) {
                Ok(idx) if idx < n && !seen[idx] => seen[idx] = true,
                _ => return false,
            }
        }
        true
    }
}

impl Chromosome for IntChromosome {
    type Gene = IntGene;

    fn genes(&self) -> &[IntGene] {
        &self.genes
    }

    fn duplicate_with_genes(&self, genes: Vec<IntGene>) -> Self {
        Self { genes }
    }
}

impl<const N: usize> From<[i64; N]> for IntChromosome {
    fn from(values: [i64; N]) -> Self {
        Self::from_values(values)
    }
}

impl fmt::Display for IntChromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IntChromosome(")?;
        for (i, gene) in self.genes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", gene.value)?;
        }
        f.write_str(")")
    }
}

/// Random integer chromosomes with values drawn uniformly from a range
#[derive(Clone, Debug)]
pub struct IntChromosomeFactory {
    size: usize,
    range: GeneRange<i64>,
    filter: GeneFilter<i64>,
}

impl IntChromosomeFactory {
    /// Create a factory for chromosomes of `size` genes in `range`
    pub fn new(size: usize, range: GeneRange<i64>) -> Result<Self, ConfigurationError> {
        Constraints::new().at_least("size", size, 1).finish()?;
        Ok(Self {
            size,
            range,
            filter: GeneFilter::accept_all(),
        })
    }

    /// Attach a filter predicate to every produced gene
    pub fn with_filter(mut self, filter: GeneFilter<i64>) -> Self {
        self.filter = filter;
        self
    }

    /// Number of genes per chromosome
    pub fn size(&self) -> usize {
        self.size
    }
}

impl ChromosomeFactory for IntChromosomeFactory {
    type Chromosome = IntChromosome;

    /// A filter that rejects every draw leaves an unfiltered value in place,
    /// which the chromosome's `verify` reports.
    fn make<R: Rng + ?Sized>(&self, rng: &mut R) -> IntChromosome {
        let genes = (0..self.size)
            .map(|_| {
                let value = draw_accepted(&self.range, &self.filter, rng)
                    .unwrap_or_else(|| rng.gen_range(self.range.lo()..=self.range.hi()));
                IntGene::with_range(value, self.range).with_filter(self.filter.clone())
            })
            .collect();
        IntChromosome::new(genes)
    }
}

/// Random permutations of `0..size`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PermutationFactoryParams")]
pub struct PermutationFactory {
    size: usize,
}

#[derive(Deserialize)]
struct PermutationFactoryParams {
    size: usize,
}

impl TryFrom<PermutationFactoryParams> for PermutationFactory {
    type Error = ConfigurationError;

    fn try_from(params: PermutationFactoryParams) -> Result<Self, Self::Error> {
        Self::new(params.size)
    }
}

impl PermutationFactory {
    /// Create a factory for permutations of `size` elements
    pub fn new(size: usize) -> Result<Self, ConfigurationError> {
        Constraints::new().at_least("size", size, 1).finish()?;
        Ok(Self { size })
    }

    /// Number of elements per permutation
    pub fn size(&self) -> usize {
        self.size
    }

    /// The identity permutation `[0, 1, ..., size - 1]`
    pub fn identity(&self) -> IntChromosome {
        self.chromosome((0..self.size as i64).collect())
    }

    fn chromosome(&self, values: Vec<i64>) -> IntChromosome {
        let range = GeneRange {
            lo: 0,
            hi: self.size as i64 - 1,
        };
        IntChromosome::new(
            values
                .into_iter()
                .map(|v| IntGene::with_range(v, range))
                .collect(),
        )
    }
}

impl ChromosomeFactory for PermutationFactory {
    type Chromosome = IntChromosome;

    fn make<R: Rng + ?Sized>(&self, rng: &mut R) -> IntChromosome {
        let mut values: Vec<i64> = (0..self.size as i64).collect();
        values.shuffle(rng);
        self.chromosome(values)
    }
}
