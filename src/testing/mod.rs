//! Per-function statistical comparison of DEG and background similarities

mod cliff;
mod pvalue;
mod rank_sum;

pub use cliff::{cliffs_delta, CliffsDelta, EffectMagnitude};
pub use pvalue::{exact_upper_tail_pvalue, upper_tail_pvalue};
pub use rank_sum::{rank_sum_greater, RankSumMethod, RankSumResult, EXACT_MAX_SAMPLE};

use rayon::prelude::*;

use crate::data::SimilarityMatrix;
use crate::error::{DegSimError, Result};
use crate::groups::{BackgroundGroup, DegGroup};
use crate::io::{ComparisonResults, ComparisonRow};
use crate::stats::median;
use crate::AnalysisParams;

/// Matrix rows belonging to each group, in matrix row order
#[derive(Debug, Clone)]
pub struct GroupRows {
    pub degs: Vec<usize>,
    pub background: Vec<usize>,
}

impl GroupRows {
    /// Locate group members among the matrix rows.
    ///
    /// DEG rows are the rows whose gene is in the DEG group. Background rows
    /// are every other row when the background is the universe default, or
    /// the non-DEG rows in the explicit background list otherwise.
    pub fn locate(matrix: &SimilarityMatrix, degs: &DegGroup, background: &BackgroundGroup) -> Self {
        let mut deg_rows = Vec::with_capacity(degs.len());
        let mut background_rows = Vec::new();

        for (i, gene) in matrix.gene_ids().iter().enumerate() {
            if degs.contains(gene) {
                deg_rows.push(i);
            } else if background.admits(gene) {
                background_rows.push(i);
            }
        }

        if deg_rows.len() < degs.len() {
            log::debug!(
                "{} of {} DEGs have no row in the similarity matrix",
                degs.len() - deg_rows.len(),
                degs.len()
            );
        }

        Self {
            degs: deg_rows,
            background: background_rows,
        }
    }
}

/// Format the `top_n` most similar DEGs as `GENE(value)` joined by `params.top_separator`.
///
/// Ordered by descending similarity; equal values keep matrix row order.
fn format_top_degs(
    matrix: &SimilarityMatrix,
    deg_rows: &[usize],
    values: &[f64],
    params: &AnalysisParams,
) -> String {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    order
        .iter()
        .take(params.top_n)
        .map(|&k| {
            format!(
                "{}({:.*})",
                matrix.gene_ids()[deg_rows[k]],
                params.decimals,
                values[k]
            )
        })
        .collect::<Vec<_>>()
        .join(params.top_separator.as_str())
}

/// Compare DEG and background similarities to a single function (matrix column)
pub fn compare_function(
    matrix: &SimilarityMatrix,
    function_idx: usize,
    rows: &GroupRows,
    params: &AnalysisParams,
) -> Result<ComparisonRow> {
    let function = &matrix.function_names()[function_idx];

    if rows.degs.len() < 2 || rows.background.len() < 2 {
        return Err(DegSimError::DegenerateGroup {
            function: function.clone(),
            n_degs: rows.degs.len(),
            n_background: rows.background.len(),
        });
    }

    let column = matrix.function_column(function_idx);
    let sim_deg: Vec<f64> = rows.degs.iter().map(|&i| column[i]).collect();
    let sim_bkg: Vec<f64> = rows.background.iter().map(|&i| column[i]).collect();

    let test = rank_sum_greater(&sim_deg, &sim_bkg)?;
    let effect = cliffs_delta(&sim_deg, &sim_bkg)?;

    let median_deg = median(&sim_deg);
    let median_bkg = median(&sim_bkg);

    Ok(ComparisonRow {
        function: function.clone(),
        p_value: test.p_value,
        median_similarity_degs: median_deg,
        median_similarity_bkgs: median_bkg,
        median_difference: median_deg - median_bkg,
        cliffs_delta: effect.estimate,
        cliffs_delta_ci_low: effect.ci_low,
        cliffs_delta_ci_high: effect.ci_high,
        magnitude: effect.magnitude,
        top_degs: format_top_degs(matrix, &rows.degs, &sim_deg, params),
    })
}

/// Compare every function column in parallel; rows come back in column order
pub fn compare_all(matrix: &SimilarityMatrix, rows: &GroupRows, params: &AnalysisParams) -> Result<Vec<ComparisonRow>> {
    log::info!(
        "Comparing {} DEGs against {} background genes across {} functions",
        rows.degs.len(),
        rows.background.len(),
        matrix.n_functions()
    );

    (0..matrix.n_functions())
        .into_par_iter()
        .map(|j| compare_function(matrix, j, rows, params))
        .collect()
}

/// Rank comparison rows by ascending p-value (stable for equal p-values)
pub fn aggregate(category: &str, rows: &GroupRows, comparisons: Vec<ComparisonRow>) -> ComparisonResults {
    ComparisonResults::from_rows(category, rows.degs.len(), rows.background.len(), comparisons)
}
