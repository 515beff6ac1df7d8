//! Real-valued genes and chromosomes

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Constraints;
use crate::error::ConfigurationError;
use crate::genome::bounds::{GeneFilter, GeneRange};
use crate::genome::integer::MAX_FILTER_ATTEMPTS;
use crate::genome::traits::{Chromosome, ChromosomeFactory, Gene, NumericGene};

/// Draw from `range` until `filter` accepts the value, `None` if none was
fn draw_accepted<R: Rng + ?Sized>(
    range: &GeneRange<f64>,
    filter: &GeneFilter<f64>,
    rng: &mut R,
) -> Option<f64> {
    (0..MAX_FILTER_ATTEMPTS)
        .map(|_| rng.gen_range(range.lo()..=range.hi()))
        .find(|value| filter.accepts(value))
}

/// Gene holding an `f64` constrained by a finite range and an optional filter
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DoubleGene {
    value: f64,
    range: GeneRange<f64>,
    #[serde(skip)]
    filter: GeneFilter<f64>,
}

impl DoubleGene {
    /// Create a gene constrained to `range`
    pub fn new(value: f64, range: GeneRange<f64>) -> Self {
        Self {
            value,
            range,
            filter: GeneFilter::accept_all(),
        }
    }

    /// Create a gene constrained to `[0, 1]`
    pub fn unit(value: f64) -> Self {
        Self::new(value, GeneRange::UNIT)
    }

    /// Attach a filter predicate
    pub fn with_filter(mut self, filter: GeneFilter<f64>) -> Self {
        self.filter = filter;
        self
    }

    /// The valid range of this gene
    pub fn range(&self) -> &GeneRange<f64> {
        &self.range
    }
}

impl PartialEq for DoubleGene {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.range == other.range
    }
}

impl Gene for DoubleGene {
    type Value = f64;

    fn value(&self) -> &f64 {
        &self.value
    }

    fn verify(&self) -> bool {
        self.value.is_finite()
            && self.range.contains(self.value)
            && self.filter.accepts(&self.value)
    }

    fn duplicate_with_value(&self, value: f64) -> Self {
        Self {
            value,
            range: self.range,
            filter: self.filter.clone(),
        }
    }

    fn mutate<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let value = draw_accepted(&self.range, &self.filter, rng).unwrap_or(self.value);
        self.duplicate_with_value(value)
    }
}

impl NumericGene for DoubleGene {
    fn to_f64(&self) -> f64 {
        self.value
    }

    fn duplicate_with_f64(&self, value: f64) -> Self {
        self.duplicate_with_value(value)
    }
}

/// Chromosome of real-valued genes
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct DoubleChromosome {
    genes: Vec<DoubleGene>,
}

impl DoubleChromosome {
    /// Create a chromosome from genes
    pub fn new(genes: Vec<DoubleGene>) -> Self {
        Self { genes }
    }

    /// Create a chromosome whose genes all share `range`
    pub fn from_values(values: impl IntoIterator<Item = f64>, range: GeneRange<f64>) -> Self {
        Self {
            genes: values
                .into_iter()
                .map(|v| DoubleGene::new(v, range))
                .collect(),
        }
    }

    /// The raw values
    pub fn values(&self) -> Vec<f64> {
        self.genes.iter().map(|g| g.value).collect()
    }

    /// Sum of all values
    pub fn sum(&self) -> f64 {
        self.genes.iter().map(|g| g.value).sum()
    }
}

impl Chromosome for DoubleChromosome {
    type Gene = DoubleGene;

    fn genes(&self) -> &[DoubleGene] {
        &self.genes
    }

    fn duplicate_with_genes(&self, genes: Vec<DoubleGene>) -> Self {
        Self { genes }
    }
}

impl fmt::Display for DoubleChromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DoubleChromosome(")?;
        for (i, gene) in self.genes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", gene.value)?;
        }
        f.write_str(")")
    }
}

/// Random real-valued chromosomes with values drawn uniformly from a range
#[derive(Clone, Debug)]
pub struct DoubleChromosomeFactory {
    size: usize,
    range: GeneRange<f64>,
    filter: GeneFilter<f64>,
}

impl DoubleChromosomeFactory {
    /// Create a factory for chromosomes of `size` genes in `range`
    pub fn new(size: usize, range: GeneRange<f64>) -> Result<Self, ConfigurationError> {
        Constraints::new().at_least("size", size, 1).finish()?;
        Ok(Self {
            size,
            range,
            filter: GeneFilter::accept_all(),
        })
    }

    /// Attach a filter predicate to every produced gene
    pub fn with_filter(mut self, filter: GeneFilter<f64>) -> Self {
        self.filter = filter;
        self
    }

    /// Number of genes per chromosome
    pub fn size(&self) -> usize {
        self.size
    }
}

impl ChromosomeFactory for DoubleChromosomeFactory {
    type Chromosome = DoubleChromosome;

    fn make<R: Rng + ?Sized>(&self, rng: &mut R) -> DoubleChromosome {
        let genes = (0..self.size)
            .map(|_| {
                // Falls back to an unfiltered draw, which fails verification
                let value = draw_accepted(&self.range, &self.filter, rng)
                    .unwrap_or_else(|| rng.gen_range(self.range.lo()..=self.range.hi()));
                DoubleGene::new(value, self.range).with_filter(self.filter.clone())
            })
            .collect();
        DoubleChromosome::new(genes)
    }
}
