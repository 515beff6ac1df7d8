//! Boolean genes and chromosomes
//!
//! Bit-string style encodings: every gene holds a `bool`.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Constraints;
use crate::error::ConfigurationError;
use crate::genome::traits::{Chromosome, ChromosomeFactory, Gene};

/// Gene holding a single boolean
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoolGene {
    value: bool,
}

impl BoolGene {
    /// Create a new gene
    pub fn new(value: bool) -> Self {
        Self { value }
    }

    /// The gene holding the opposite value
    pub fn flip(&self) -> Self {
        Self { value: !self.value }
    }
}

impl Gene for BoolGene {
    type Value = bool;

    fn value(&self) -> &bool {
        &self.value
    }

    fn verify(&self) -> bool {
        true
    }

    fn duplicate_with_value(&self, value: bool) -> Self {
        Self { value }
    }

    fn mutate<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Self { value: rng.gen() }
    }
}

impl From<bool> for BoolGene {
    fn from(value: bool) -> Self {
        Self::new(value)
    }
}

/// Chromosome of boolean genes
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BoolChromosome {
    genes: Vec<BoolGene>,
}

impl BoolChromosome {
    /// Create a chromosome from genes
    pub fn new(genes: Vec<BoolGene>) -> Self {
        Self { genes }
    }

    /// Create a chromosome from raw bits
    pub fn from_bits(bits: impl IntoIterator<Item = bool>) -> Self {
        Self {
            genes: bits.into_iter().map(BoolGene::new).collect(),
        }
    }

    /// The raw bits
    pub fn bits(&self) -> Vec<bool> {
        self.genes.iter().map(|g| g.value).collect()
    }

    /// Count the number of true genes
    pub fn count_ones(&self) -> usize {
        self.genes.iter().filter(|g| g.value).count()
    }

    /// Count the number of false genes
    pub fn count_zeros(&self) -> usize {
        self.genes.len() - self.count_ones()
    }
}

impl Chromosome for BoolChromosome {
    type Gene = BoolGene;

    fn genes(&self) -> &[BoolGene] {
        &self.genes
    }

    fn duplicate_with_genes(&self, genes: Vec<BoolGene>) -> Self {
        Self { genes }
    }
}

impl<const N: usize> From<[bool; N]> for BoolChromosome {
    fn from(bits: [bool; N]) -> Self {
        Self::from_bits(bits)
    }
}

impl fmt::Display for BoolChromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for gene in &self.genes {
            write!(f, "{}", if gene.value { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Random boolean chromosomes with a given probability of `true`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoolChromosomeFactoryParams")]
pub struct BoolChromosomeFactory {
    size: usize,
    true_rate: f64,
}

#[derive(Deserialize)]
struct BoolChromosomeFactoryParams {
    size: usize,
    #[serde(default = "default_true_rate")]
    true_rate: f64,
}

fn default_true_rate() -> f64 {
    0.5
}

impl TryFrom<BoolChromosomeFactoryParams> for BoolChromosomeFactory {
    type Error = ConfigurationError;

    fn try_from(params: BoolChromosomeFactoryParams) -> Result<Self, Self::Error> {
        Self::new(params.size, params.true_rate)
    }
}

impl BoolChromosomeFactory {
    /// Create a factory for chromosomes of `size` genes
    pub fn new(size: usize, true_rate: f64) -> Result<Self, ConfigurationError> {
        Constraints::new()
            .at_least("size", size, 1)
            .probability("true_rate", true_rate)
            .finish()?;
        Ok(Self { size, true_rate })
    }

    /// Number of genes per chromosome
    pub fn size(&self) -> usize {
        self.size
    }

    /// Probability of each gene being `true`
    pub fn true_rate(&self) -> f64 {
        self.true_rate
    }
}

impl ChromosomeFactory for BoolChromosomeFactory {
    type Chromosome = BoolChromosome;

    fn make<R: Rng + ?Sized>(&self, rng: &mut R) -> BoolChromosome {
        BoolChromosome::from_bits((0..self.size).map(|_| rng.gen_bool(self.true_rate)))
    }
}
