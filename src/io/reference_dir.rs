//! Reference data loaded from a directory of delimited files

use std::path::{Path, PathBuf};

use crate::data::{EmbeddingTable, GeneUniverse, ReferenceData, SimilarityMatrix};
use crate::error::{DegSimError, Result};

use super::csv::{read_embedding_table, read_gene_list, read_similarity_matrix};

pub const GENE_UNIVERSE_FILE: &str = "gene_universe.txt";
pub const GOBP_FILE: &str = "gobp_similarity.tsv";
pub const PATHWAYS_FILE: &str = "c2cp_similarity.tsv";
pub const MOA_FILE: &str = "moa_similarity.tsv";
pub const GENE_EMBEDDINGS_FILE: &str = "gene_embeddings.tsv";

/// Reference tables stored as files in one directory.
///
/// Each accessor reads its file on demand.
#[derive(Debug, Clone)]
pub struct ReferenceDir {
    root: PathBuf,
}

impl ReferenceDir {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(DegSimError::MissingInput {
                reason: format!("Reference data directory not found: {}", root.display()),
            });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file(&self, name: &str) -> Result<PathBuf> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(DegSimError::MissingInput {
                reason: format!("Reference file not found: {}", path.display()),
            });
        }
        log::info!("Loading reference data from: {}", path.display());
        Ok(path)
    }
}

impl ReferenceData for ReferenceDir {
    fn gene_universe(&self) -> Result<GeneUniverse> {
        GeneUniverse::new(read_gene_list(self.file(GENE_UNIVERSE_FILE)?)?)
    }

    fn go_bp(&self) -> Result<SimilarityMatrix> {
        read_similarity_matrix(self.file(GOBP_FILE)?)
    }

    fn pathways(&self) -> Result<SimilarityMatrix> {
        read_similarity_matrix(self.file(PATHWAYS_FILE)?)
    }

    fn moa(&self) -> Result<SimilarityMatrix> {
        read_similarity_matrix(self.file(MOA_FILE)?)
    }

    fn gene_embeddings(&self) -> Result<EmbeddingTable> {
        read_embedding_table(self.file(GENE_EMBEDDINGS_FILE)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reference_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(GENE_UNIVERSE_FILE), "TP53\nEGFR\nBRCA1\n").unwrap();
        fs::write(
            dir.path().join(PATHWAYS_FILE),
            "gene\tKEGG_APOPTOSIS\tREACTOME_DNA_REPAIR\nTP53\t0.4\t0.5\nEGFR\t0.2\t0.1\n",
        )
        .unwrap();

        let reference = ReferenceDir::new(dir.path()).unwrap();
        assert_eq!(reference.gene_universe().unwrap().len(), 3);
        assert_eq!(reference.pathways().unwrap().n_functions(), 2);
        assert!(matches!(reference.go_bp(), Err(DegSimError::MissingInput { .. })));
    }

    #[test]
    fn test_missing_directory() {
        assert!(ReferenceDir::new("/nonexistent/reference/data").is_err());
    }
}
