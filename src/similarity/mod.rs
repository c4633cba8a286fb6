//! Similarity matrix selection and cosine similarity from embeddings

use ndarray::{Array2, Axis};

use crate::data::{Category, EmbeddingTable, ReferenceData, SimilarityMatrix};
use crate::error::{DegSimError, Result};

/// Divide every row of an embedding table by its Euclidean norm.
///
/// A zero-norm row has no direction, so its cosine similarity is undefined;
/// it is rejected instead of producing NaN.
pub fn l2_normalize_rows(table: &EmbeddingTable, table_name: &str) -> Result<Array2<f64>> {
    let mut normalized = table.values().to_owned();

    for (mut row, label) in normalized.axis_iter_mut(Axis(0)).zip(table.labels()) {
        let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return Err(DegSimError::DegenerateEmbedding {
                table: table_name.to_string(),
                label: label.clone(),
            });
        }
        row.mapv_inplace(|x| x / norm);
    }

    Ok(normalized)
}

/// Cosine similarity between every gene and every function embedding.
///
/// Rows follow the gene table, columns follow the function table.
pub fn cosine_similarity_matrix(genes: &EmbeddingTable, functions: &EmbeddingTable) -> Result<SimilarityMatrix> {
    if genes.dim() != functions.dim() {
        return Err(DegSimError::DimensionMismatch {
            expected: format!("function embeddings of width {}", genes.dim()),
            got: format!("width {}", functions.dim()),
        });
    }

    let gene_norm = l2_normalize_rows(genes, "gene embedding")?;
    let function_norm = l2_normalize_rows(functions, "function embedding")?;

    log::debug!(
        "Cosine similarity: {} genes x {} functions ({} dimensions)",
        genes.n_rows(),
        functions.n_rows(),
        genes.dim()
    );

    // rounding can push unit-vector dot products just past +-1
    let similarities = gene_norm.dot(&function_norm.t()).mapv(|x| x.clamp(-1.0, 1.0));

    SimilarityMatrix::new(
        similarities,
        genes.labels().to_vec(),
        functions.labels().to_vec(),
    )
}

/// Select the similarity matrix a category analyses.
///
/// Precomputed categories come from `reference`; pathway sources are column
/// slices of the combined pathway matrix. `Customized` needs function
/// embeddings, and uses `gene_embeddings` when given or the reference gene
/// embeddings otherwise.
pub fn select_matrix(
    category: Category,
    reference: &dyn ReferenceData,
    function_embeddings: Option<&EmbeddingTable>,
    gene_embeddings: Option<&EmbeddingTable>,
) -> Result<SimilarityMatrix> {
    match category {
        Category::GoBp => reference.go_bp(),
        Category::PathwaysAll => reference.pathways(),
        Category::Pathway(source) => reference.pathways()?.select_prefix(source.tag()),
        Category::Moa => reference.moa(),
        Category::Customized => {
            let functions = function_embeddings.ok_or_else(|| DegSimError::MissingInput {
                reason: "customized category requires function embeddings".to_string(),
            })?;
            match gene_embeddings {
                Some(genes) => cosine_similarity_matrix(genes, functions),
                None => cosine_similarity_matrix(&reference.gene_embeddings()?, functions),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{GeneUniverse, InMemoryReference, PathwaySource};
    use ndarray::array;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn reference() -> InMemoryReference {
        let genes = labels(&["A", "B"]);
        let pathways = SimilarityMatrix::new(
            array![[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]],
            genes.clone(),
            labels(&["KEGG_X", "REACTOME_Y", "REACTOME_Z"]),
        )
        .unwrap();
        let embeddings = EmbeddingTable::new(array![[3.0, 4.0], [0.0, 2.0]], genes.clone()).unwrap();
        InMemoryReference::new(GeneUniverse::new(genes).unwrap())
            .with_pathways(pathways)
            .with_gene_embeddings(embeddings)
    }

    #[test]
    fn test_l2_normalize_rows() {
        let table = EmbeddingTable::new(array![[3.0, 4.0], [0.0, -2.0]], labels(&["A", "B"])).unwrap();
        let normalized = l2_normalize_rows(&table, "gene").unwrap();
        assert!((normalized[[0, 0]] - 0.6).abs() < 1e-12);
        assert!((normalized[[0, 1]] - 0.8).abs() < 1e-12);
        assert!((normalized[[1, 1]] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_norm_row_rejected() {
        let table = EmbeddingTable::new(array![[1.0, 1.0], [0.0, 0.0]], labels(&["A", "B"])).unwrap();
        let err = l2_normalize_rows(&table, "gene").unwrap_err();
        assert!(matches!(err, DegSimError::DegenerateEmbedding { ref label, .. } if label == "B"));
    }

    #[test]
    fn test_cosine_similarity_matrix() {
        let genes = EmbeddingTable::new(
            array![[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [1.0, 1.0, 0.0], [-5.0, 0.0, 0.0]],
            labels(&["A", "B", "C", "D"]),
        )
        .unwrap();
        let functions = EmbeddingTable::new(array![[2.0, 0.0, 0.0], [0.0, 0.0, 1.0]], labels(&["F1", "F2"])).unwrap();

        let sim = cosine_similarity_matrix(&genes, &functions).unwrap();
        assert_eq!(sim.n_genes(), 4);
        assert_eq!(sim.function_names(), &["F1", "F2"]);
        assert!((sim.values()[[0, 0]] - 1.0).abs() < 1e-12);
        assert!(sim.values()[[1, 0]].abs() < 1e-12);
        assert!((sim.values()[[2, 0]] - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert!((sim.values()[[3, 0]] + 1.0).abs() < 1e-12);
        assert!(sim.values().iter().all(|&x| (-1.0..=1.0).contains(&x)));
    }

    #[test]
    fn test_cosine_similarity_bounded_for_arbitrary_vectors() {
        let genes = EmbeddingTable::new(
            array![[0.3, -1.7, 2.2, 9.1], [1e-3, 4e-3, -2e-3, 1e-4], [7.0, 7.0, 7.0, 7.0]],
            labels(&["A", "B", "C"]),
        )
        .unwrap();
        let functions = EmbeddingTable::new(array![[7.0, 7.0, 7.0, 7.0], [-0.3, 1.7, -2.2, -9.1]], labels(&["F1", "F2"])).unwrap();
        let sim = cosine_similarity_matrix(&genes, &functions).unwrap();
        assert!(sim.values().iter().all(|&x| (-1.0..=1.0).contains(&x)));
        assert!((sim.values()[[2, 0]] - 1.0).abs() < 1e-12);
        assert!((sim.values()[[0, 1]] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_dimension_mismatch() {
        let genes = EmbeddingTable::new(array![[1.0, 0.0]], labels(&["A"])).unwrap();
        let functions = EmbeddingTable::new(array![[1.0, 0.0, 0.0]], labels(&["F"])).unwrap();
        assert!(matches!(
            cosine_similarity_matrix(&genes, &functions),
            Err(DegSimError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_select_pathway_source() {
        let reference = reference();
        let matrix = select_matrix(Category::Pathway(PathwaySource::Reactome), &reference, None, None).unwrap();
        assert_eq!(matrix.function_names(), &["REACTOME_Y", "REACTOME_Z"]);

        let all = select_matrix(Category::PathwaysAll, &reference, None, None).unwrap();
        assert_eq!(all.n_functions(), 3);
    }

    #[test]
    fn test_select_customized() {
        let reference = reference();
        let functions = EmbeddingTable::new(array![[0.0, 1.0]], labels(&["my hypothesis"])).unwrap();
        let matrix = select_matrix(Category::Customized, &reference, Some(&functions), None).unwrap();
        assert_eq!(matrix.function_names(), &["my hypothesis"]);
        assert!((matrix.values()[[0, 0]] - 0.8).abs() < 1e-12);
        assert!((matrix.values()[[1, 0]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_customized_requires_embeddings() {
        let reference = reference();
        assert!(matches!(
            select_matrix(Category::Customized, &reference, None, None),
            Err(DegSimError::MissingInput { .. })
        ));

        let bare = InMemoryReference::new(GeneUniverse::new(labels(&["A"])).unwrap());
        let functions = EmbeddingTable::new(array![[0.0, 1.0]], labels(&["F"])).unwrap();
        assert!(matches!(
            select_matrix(Category::Customized, &bare, Some(&functions), None),
            Err(DegSimError::MissingInput { .. })
        ));
    }
}
