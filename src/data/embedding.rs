//! Embedding tables (one labelled vector per row)

use ndarray::{Array2, ArrayView2};

use crate::error::{DegSimError, Result};

use super::similarity::deduplicate_names;

/// Dense embedding vectors, one per gene or function
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    values: Array2<f64>,
    labels: Vec<String>,
}

impl EmbeddingTable {
    /// Create a new embedding table
    pub fn new(values: Array2<f64>, labels: Vec<String>) -> Result<Self> {
        if labels.len() != values.nrows() {
            return Err(DegSimError::DimensionMismatch {
                expected: format!("{} row labels", values.nrows()),
                got: format!("{} row labels", labels.len()),
            });
        }

        if values.nrows() == 0 || values.ncols() == 0 {
            return Err(DegSimError::EmptyData {
                reason: "Embedding table has no rows or no dimensions".to_string(),
            });
        }

        if values.iter().any(|x| !x.is_finite()) {
            return Err(DegSimError::InvalidInput {
                reason: "Embedding values must be finite".to_string(),
            });
        }

        let labels = deduplicate_names(labels, "embedding row");
        Ok(Self { values, labels })
    }

    /// Number of embedded items
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Embedding width
    pub fn dim(&self) -> usize {
        self.values.ncols()
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_embedding_table() {
        let table = EmbeddingTable::new(
            array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec!["TP53".to_string(), "EGFR".to_string()],
        )
        .unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.dim(), 3);
    }

    #[test]
    fn test_label_mismatch_rejected() {
        let result = EmbeddingTable::new(array![[1.0, 0.0]], vec![]);
        assert!(matches!(result, Err(DegSimError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_empty_rejected() {
        let result = EmbeddingTable::new(Array2::zeros((0, 4)), vec![]);
        assert!(matches!(result, Err(DegSimError::EmptyData { .. })));
    }
}
