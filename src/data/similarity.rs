//! Gene x function cosine-similarity matrix

use std::collections::HashMap;

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{DegSimError, Result};

/// Deduplicate names by appending _1, _2, etc. to duplicates
pub(crate) fn deduplicate_names(names: Vec<String>, kind: &str) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for name in &names {
        *seen.entry(name.clone()).or_insert(0) += 1;
    }
    if !seen.values().any(|&c| c > 1) {
        return names;
    }
    seen.clear();
    let mut result = Vec::with_capacity(names.len());
    for name in names {
        let count = seen.entry(name.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            result.push(name);
        } else {
            let new_name = format!("{}_{}", name, *count - 1);
            log::warn!("Duplicate {} name '{}' renamed to '{}'", kind, name, new_name);
            result.push(new_name);
        }
    }
    result
}

/// Cosine similarities between gene embeddings (rows) and function embeddings (columns)
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    values: Array2<f64>,
    gene_ids: Vec<String>,
    function_names: Vec<String>,
    gene_lookup: HashMap<String, usize>,
}

impl SimilarityMatrix {
    /// Create a new similarity matrix, validating labels against the data shape
    pub fn new(values: Array2<f64>, gene_ids: Vec<String>, function_names: Vec<String>) -> Result<Self> {
        let (n_genes, n_functions) = values.dim();

        if gene_ids.len() != n_genes {
            return Err(DegSimError::DimensionMismatch {
                expected: format!("{} gene IDs", n_genes),
                got: format!("{} gene IDs", gene_ids.len()),
            });
        }

        if function_names.len() != n_functions {
            return Err(DegSimError::DimensionMismatch {
                expected: format!("{} function names", n_functions),
                got: format!("{} function names", function_names.len()),
            });
        }

        if values.iter().any(|x| !x.is_finite()) {
            return Err(DegSimError::InvalidInput {
                reason: "Similarity values must be finite".to_string(),
            });
        }

        let gene_ids = deduplicate_names(gene_ids, "gene");
        let gene_lookup = gene_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        Ok(Self {
            values,
            gene_ids,
            function_names,
            gene_lookup,
        })
    }

    pub fn n_genes(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_functions(&self) -> usize {
        self.values.ncols()
    }

    /// Get the raw values as a view
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn gene_ids(&self) -> &[String] {
        &self.gene_ids
    }

    pub fn function_names(&self) -> &[String] {
        &self.function_names
    }

    /// Similarities of every gene to one function
    pub fn function_column(&self, function_idx: usize) -> ArrayView1<'_, f64> {
        self.values.column(function_idx)
    }

    /// Row index of a gene, if present
    pub fn gene_index(&self, gene_id: &str) -> Option<usize> {
        self.gene_lookup.get(gene_id).copied()
    }

    /// Keep only the columns whose name prefix (text before the first `_`) equals `tag`
    pub fn select_prefix(&self, tag: &str) -> Result<Self> {
        let keep: Vec<usize> = self
            .function_names
            .iter()
            .enumerate()
            .filter(|(_, name)| column_prefix(name) == tag)
            .map(|(j, _)| j)
            .collect();

        if keep.is_empty() {
            return Err(DegSimError::EmptyData {
                reason: format!("No functions with prefix '{}' in similarity matrix", tag),
            });
        }

        self.subset_functions(&keep)
    }

    /// Subset to specific function columns
    pub fn subset_functions(&self, function_indices: &[usize]) -> Result<Self> {
        let new_values = self.values.select(Axis(1), function_indices);
        let new_names: Vec<String> = function_indices
            .iter()
            .map(|&j| self.function_names[j].clone())
            .collect();

        Self::new(new_values, self.gene_ids.clone(), new_names)
    }
}

/// Substring of a column name before the first `_`
pub fn column_prefix(name: &str) -> &str {
    name.split_once('_').map_or(name, |(prefix, _)| prefix)
}
