//! The fixed catalog of analysable genes

use std::collections::HashSet;

use crate::error::{DegSimError, Result};

/// Ordered, deduplicated set of known gene symbols
#[derive(Debug, Clone)]
pub struct GeneUniverse {
    genes: Vec<String>,
    members: HashSet<String>,
}

impl GeneUniverse {
    /// Build a universe, keeping first occurrences in input order
    pub fn new(genes: Vec<String>) -> Result<Self> {
        let mut members = HashSet::with_capacity(genes.len());
        let genes: Vec<String> = genes
            .into_iter()
            .filter(|g| !g.is_empty() && members.insert(g.clone()))
            .collect();

        if genes.is_empty() {
            return Err(DegSimError::EmptyData {
                reason: "Gene universe is empty".to_string(),
            });
        }

        Ok(Self { genes, members })
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.members.contains(gene)
    }

    /// Genes in universe order
    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.genes.iter()
    }
}
