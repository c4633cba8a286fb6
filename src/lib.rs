//! RustDEGSim: embedding-based comparison of DEGs against biological functions
//!
//! Tests whether a set of differentially expressed genes is semantically
//! closer to a biological function, in an embedding space, than a background
//! gene set is. Each function is one column of a gene x function cosine
//! similarity matrix; DEG and background similarities are compared with a
//! one-tailed rank-sum test and Cliff's delta, and functions are ranked by
//! p-value.
//!
//! # Example
//!
//! ```ignore
//! use rust_degsim::prelude::*;
//!
//! let reference = ReferenceDir::new("reference_data")?;
//! let degs = read_gene_list("degs.txt")?;
//! let request = AnalysisRequest::new(degs, "GOBP".parse()?);
//!
//! let results = run_analysis(&reference, &request, &AnalysisParams::default())?;
//! write_results("gobp_results.tsv", &results)?;
//! ```

pub mod cli;
pub mod data;
pub mod error;
pub mod groups;
pub mod io;
pub mod similarity;
pub mod stats;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::data::{Category, EmbeddingTable, GeneUniverse, InMemoryReference, PathwaySource, ReferenceData, SimilarityMatrix};
    pub use crate::error::{DegSimError, Result};
    pub use crate::groups::{resolve, BackgroundGroup, DegGroup};
    pub use crate::io::{
        read_embedding_table, read_gene_list, read_similarity_matrix, timestamped_output_path, write_results,
        write_results_json, ComparisonResults, ComparisonRow, ReferenceDir,
    };
    pub use crate::similarity::{cosine_similarity_matrix, select_matrix};
    pub use crate::testing::{aggregate, cliffs_delta, compare_all, rank_sum_greater, EffectMagnitude, GroupRows};
    pub use crate::{run_analysis, AnalysisParams, AnalysisRequest};
}

use prelude::*;

/// Configurable parameters for an analysis run
#[derive(Debug, Clone)]
pub struct AnalysisParams {
    /// Fewest DEGs (after universe intersection) accepted
    pub min_degs: usize,
    /// Most DEGs (after universe intersection) accepted
    pub max_degs: usize,
    /// DEGs listed per function in the top-DEG column
    pub top_n: usize,
    /// Decimal places of similarities in the top-DEG column
    pub decimals: usize,
    pub top_separator: String,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            min_degs: 15,
            max_degs: 500,
            top_n: 10,
            decimals: 4,
            top_separator: ", ".to_string(),
        }
    }
}

/// Caller inputs for one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub degs: Vec<String>,
    /// Background genes; `None` uses the whole gene universe
    pub background: Option<Vec<String>>,
    pub category: Category,
    /// Function embeddings, required for `Category::Customized`
    pub function_embeddings: Option<EmbeddingTable>,
    /// Overrides the reference gene embeddings for `Category::Customized`
    pub gene_embeddings: Option<EmbeddingTable>,
}

impl AnalysisRequest {
    pub fn new(degs: Vec<String>, category: Category) -> Self {
        Self {
            degs,
            background: None,
            category,
            function_embeddings: None,
            gene_embeddings: None,
        }
    }

    pub fn with_background(mut self, background: Vec<String>) -> Self {
        self.background = Some(background);
        self
    }

    pub fn with_function_embeddings(mut self, table: EmbeddingTable) -> Self {
        self.function_embeddings = Some(table);
        self
    }

    pub fn with_gene_embeddings(mut self, table: EmbeddingTable) -> Self {
        self.gene_embeddings = Some(table);
        self
    }
}

/// Run the complete comparison pipeline.
///
/// 1. Resolve DEG and background groups against the gene universe
/// 2. Select (or compute) the similarity matrix for the category
/// 3. Compare DEG and background similarities for every function
/// 4. Rank functions by ascending p-value
///
/// Any validation failure aborts the run; no partial results are returned.
pub fn run_analysis(
    reference: &dyn ReferenceData,
    request: &AnalysisRequest,
    params: &AnalysisParams,
) -> Result<ComparisonResults> {
    // Step 1: groups are validated before any matrix is loaded
    let universe = reference.gene_universe()?;
    let (degs, background) = resolve(
        &request.degs,
        request.background.as_deref(),
        &universe,
        params,
    )?;

    // Step 2: similarity matrix
    log::info!(
        "Selecting similarity matrix for {} ({})",
        request.category,
        request.category.describe()
    );
    let matrix = select_matrix(
        request.category,
        reference,
        request.function_embeddings.as_ref(),
        request.gene_embeddings.as_ref(),
    )?;
    log::info!("  {} genes, {} functions", matrix.n_genes(), matrix.n_functions());

    // Step 3: per-function comparison
    let rows = GroupRows::locate(&matrix, &degs, &background);
    let comparisons = compare_all(&matrix, &rows, params)?;

    // Step 4: ranking
    Ok(aggregate(request.category.name(), &rows, comparisons))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use std::cell::Cell;

    /// Deterministic uniform values in [0, 1)
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> f64 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (self.0 >> 11) as f64 / (1u64 << 53) as f64
        }
    }

    const N_GENES: usize = 200;

    fn genes() -> Vec<String> {
        (0..N_GENES).map(|i| format!("GENE{}", i)).collect()
    }

    /// GO-BP fixture: GENE0..GENE19 are closer to the first term
    fn go_bp_fixture() -> SimilarityMatrix {
        let terms = vec![
            "GOBP_DNA_REPAIR".to_string(),
            "GOBP_APOPTOTIC_PROCESS".to_string(),
            "GOBP_CELL_CYCLE".to_string(),
            "GOBP_LIPID_METABOLISM".to_string(),
        ];
        let mut rng = Lcg(7);
        let mut values = Array2::zeros((N_GENES, terms.len()));
        for i in 0..N_GENES {
            for j in 0..terms.len() {
                let shift = if j == 0 && i < 20 { 0.2 } else { 0.0 };
                values[[i, j]] = 0.1 + 0.3 * rng.next() + shift;
            }
        }
        SimilarityMatrix::new(values, genes(), terms).unwrap()
    }

    fn embedding_fixture(dim: usize) -> EmbeddingTable {
        let mut rng = Lcg(11);
        let values = Array2::from_shape_fn((N_GENES, dim), |_| rng.next() - 0.5);
        EmbeddingTable::new(values, genes()).unwrap()
    }

    fn reference() -> InMemoryReference {
        InMemoryReference::new(GeneUniverse::new(genes()).unwrap())
            .with_go_bp(go_bp_fixture())
            .with_gene_embeddings(embedding_fixture(64))
    }

    fn degs(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("GENE{}", i)).collect()
    }

    /// Counts matrix loads so tests can assert nothing was computed
    struct CountingReference {
        inner: InMemoryReference,
        matrix_loads: Cell<usize>,
    }

    impl ReferenceData for CountingReference {
        fn gene_universe(&self) -> Result<GeneUniverse> {
            self.inner.gene_universe()
        }
        fn go_bp(&self) -> Result<SimilarityMatrix> {
            self.matrix_loads.set(self.matrix_loads.get() + 1);
            self.inner.go_bp()
        }
        fn pathways(&self) -> Result<SimilarityMatrix> {
            self.matrix_loads.set(self.matrix_loads.get() + 1);
            self.inner.pathways()
        }
        fn moa(&self) -> Result<SimilarityMatrix> {
            self.matrix_loads.set(self.matrix_loads.get() + 1);
            self.inner.moa()
        }
        fn gene_embeddings(&self) -> Result<EmbeddingTable> {
            self.matrix_loads.set(self.matrix_loads.get() + 1);
            self.inner.gene_embeddings()
        }
    }

    #[test]
    fn test_gobp_pipeline() {
        let request = AnalysisRequest::new(degs(20), Category::GoBp);
        let results = run_analysis(&reference(), &request, &AnalysisParams::default()).unwrap();

        assert_eq!(results.n_functions(), 4);
        assert_eq!(results.n_degs, 20);
        assert_eq!(results.n_background, N_GENES - 20);
        assert!(results.rows.windows(2).all(|w| w[0].p_value <= w[1].p_value));

        let top = &results.rows[0];
        assert_eq!(top.function, "GOBP_DNA_REPAIR");
        assert!(top.p_value < 0.05);
        assert!(top.median_similarity_degs > top.median_similarity_bkgs);
        assert!(top.cliffs_delta_ci_low <= top.cliffs_delta && top.cliffs_delta <= top.cliffs_delta_ci_high);

        println!("{}", results.summary(0.05));
    }

    #[test]
    fn test_customized_pipeline() {
        let mut rng = Lcg(3);
        let function = EmbeddingTable::new(
            Array2::from_shape_fn((1, 64), |_| rng.next() - 0.5),
            vec!["T cell activation in tumour microenvironment".to_string()],
        )
        .unwrap();
        let request = AnalysisRequest::new(degs(20), Category::Customized).with_function_embeddings(function);
        let results = run_analysis(&reference(), &request, &AnalysisParams::default()).unwrap();

        assert_eq!(results.n_functions(), 1);
        let row = &results.rows[0];
        assert!((-1.0..=1.0).contains(&row.cliffs_delta));

        let values: Vec<f64> = row
            .top_degs
            .split(", ")
            .map(|entry| {
                let open = entry.find('(').unwrap();
                entry[open + 1..entry.len() - 1].parse::<f64>().unwrap()
            })
            .collect();
        assert!(!values.is_empty() && values.len() <= 10);
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
        assert!(values.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_customized_without_embeddings() {
        let request = AnalysisRequest::new(degs(20), Category::Customized);
        let err = run_analysis(&reference(), &request, &AnalysisParams::default()).unwrap_err();
        assert!(matches!(err, DegSimError::MissingInput { .. }));
    }

    #[test]
    fn test_unknown_category() {
        let err = "FOOBAR".parse::<Category>().unwrap_err();
        assert!(matches!(err, DegSimError::UnknownCategory { .. }));
    }

    #[test]
    fn test_too_few_degs_computes_nothing() {
        let reference = CountingReference {
            inner: reference(),
            matrix_loads: Cell::new(0),
        };
        let request = AnalysisRequest::new(degs(10), Category::GoBp);
        let err = run_analysis(&reference, &request, &AnalysisParams::default()).unwrap_err();
        assert!(matches!(err, DegSimError::InvalidInput { .. }));
        assert_eq!(reference.matrix_loads.get(), 0);
    }

    #[test]
    fn test_explicit_background_pipeline() {
        let background: Vec<String> = (100..N_GENES).map(|i| format!("GENE{}", i)).collect();
        let request = AnalysisRequest::new(degs(20), Category::GoBp).with_background(background);
        let results = run_analysis(&reference(), &request, &AnalysisParams::default()).unwrap();
        assert_eq!(results.n_background, 100);
        assert_eq!(results.rows[0].function, "GOBP_DNA_REPAIR");
    }

    #[test]
    fn test_background_equal_to_degs_is_degenerate() {
        let request = AnalysisRequest::new(degs(20), Category::GoBp).with_background(degs(20));
        let err = run_analysis(&reference(), &request, &AnalysisParams::default()).unwrap_err();
        assert!(matches!(err, DegSimError::DegenerateGroup { n_background: 0, .. }));
    }
}
