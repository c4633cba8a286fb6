//! Reference data provider injected into the analysis pipeline

use crate::error::{DegSimError, Result};

use super::{EmbeddingTable, GeneUniverse, SimilarityMatrix};

/// Read-only source of the bundled reference tables.
///
/// The pipeline asks for each table at most once per run; implementations
/// may load on demand or hand out clones of data already in memory.
pub trait ReferenceData {
    /// Canonical gene universe
    fn gene_universe(&self) -> Result<GeneUniverse>;

    /// Gene x GO biological process similarity matrix
    fn go_bp(&self) -> Result<SimilarityMatrix>;

    /// Gene x canonical pathway similarity matrix (columns prefixed by source)
    fn pathways(&self) -> Result<SimilarityMatrix>;

    /// Gene x mechanism-of-action similarity matrix
    fn moa(&self) -> Result<SimilarityMatrix>;

    /// Gene embedding table used for customized functions
    fn gene_embeddings(&self) -> Result<EmbeddingTable>;
}

/// Reference tables held in memory, typically small fixtures
#[derive(Debug, Clone)]
pub struct InMemoryReference {
    universe: GeneUniverse,
    go_bp: Option<SimilarityMatrix>,
    pathways: Option<SimilarityMatrix>,
    moa: Option<SimilarityMatrix>,
    gene_embeddings: Option<EmbeddingTable>,
}

impl InMemoryReference {
    pub fn new(universe: GeneUniverse) -> Self {
        Self {
            universe,
            go_bp: None,
            pathways: None,
            moa: None,
            gene_embeddings: None,
        }
    }

    pub fn with_go_bp(mut self, matrix: SimilarityMatrix) -> Self {
        self.go_bp = Some(matrix);
        self
    }

    pub fn with_pathways(mut self, matrix: SimilarityMatrix) -> Self {
        self.pathways = Some(matrix);
        self
    }

    pub fn with_moa(mut self, matrix: SimilarityMatrix) -> Self {
        self.moa = Some(matrix);
        self
    }

    pub fn with_gene_embeddings(mut self, table: EmbeddingTable) -> Self {
        self.gene_embeddings = Some(table);
        self
    }
}

fn missing<T>(what: &str) -> Result<T> {
    Err(DegSimError::MissingInput {
        reason: format!("{} not available from reference data", what),
    })
}

impl ReferenceData for InMemoryReference {
    fn gene_universe(&self) -> Result<GeneUniverse> {
        Ok(self.universe.clone())
    }

    fn go_bp(&self) -> Result<SimilarityMatrix> {
        self.go_bp.clone().map_or_else(|| missing("GO-BP similarity matrix"), Ok)
    }

    fn pathways(&self) -> Result<SimilarityMatrix> {
        self.pathways.clone().map_or_else(|| missing("Pathway similarity matrix"), Ok)
    }

    fn moa(&self) -> Result<SimilarityMatrix> {
        self.moa.clone().map_or_else(|| missing("MOA similarity matrix"), Ok)
    }

    fn gene_embeddings(&self) -> Result<EmbeddingTable> {
        self.gene_embeddings.clone().map_or_else(|| missing("Gene embedding table"), Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_in_memory_reference() {
        let universe = GeneUniverse::new(vec!["A".to_string(), "B".to_string()]).unwrap();
        let matrix = SimilarityMatrix::new(
            array![[0.1], [0.2]],
            vec!["A".to_string(), "B".to_string()],
            vec!["GOBP_X".to_string()],
        )
        .unwrap();
        let reference = InMemoryReference::new(universe).with_go_bp(matrix);

        assert_eq!(reference.gene_universe().unwrap().len(), 2);
        assert_eq!(reference.go_bp().unwrap().n_functions(), 1);
        assert!(matches!(reference.moa(), Err(DegSimError::MissingInput { .. })));
    }
}
