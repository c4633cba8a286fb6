//! Per-function comparison results

use serde::{Deserialize, Serialize};

use crate::testing::EffectMagnitude;

/// Comparison of DEG and background similarities to one function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Function (term, pathway, mechanism, or custom hypothesis) name
    pub function: String,
    /// One-tailed rank-sum p-value (DEGs greater than background)
    pub p_value: f64,
    #[serde(rename = "median_cosine_similarity_degs")]
    pub median_similarity_degs: f64,
    #[serde(rename = "median_cosine_similarity_bkgs")]
    pub median_similarity_bkgs: f64,
    /// DEG median minus background median
    pub median_difference: f64,
    pub cliffs_delta: f64,
    pub cliffs_delta_ci_low: f64,
    pub cliffs_delta_ci_high: f64,
    #[serde(rename = "effect_size_magnitude")]
    pub magnitude: EffectMagnitude,
    /// Most similar DEGs, formatted as `GENE(0.1234)` and joined
    pub top_degs: String,
}

/// Comparison rows ordered by ascending p-value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResults {
    /// Category the functions came from
    pub category: String,
    pub n_degs: usize,
    pub n_background: usize,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonResults {
    /// Order rows by ascending p-value; rows with equal p-values keep their
    /// encounter order.
    pub fn from_rows(category: &str, n_degs: usize, n_background: usize, mut rows: Vec<ComparisonRow>) -> Self {
        // stable sort
        rows.sort_by(|a, b| a.p_value.total_cmp(&b.p_value));
        Self {
            category: category.to_string(),
            n_degs,
            n_background,
            rows,
        }
    }

    /// Number of functions compared
    pub fn n_functions(&self) -> usize {
        self.rows.len()
    }

    /// Rows with p-value below `alpha`, in table order
    pub fn significant(&self, alpha: f64) -> Vec<&ComparisonRow> {
        self.rows
            .iter()
            .filter(|r| r.p_value.is_finite() && r.p_value < alpha)
            .collect()
    }

    /// Summary statistics
    pub fn summary(&self, alpha: f64) -> ResultsSummary {
        let significant = self.significant(alpha);
        let large_effects = significant
            .iter()
            .filter(|r| r.magnitude == EffectMagnitude::Large)
            .count();

        ResultsSummary {
            category: self.category.clone(),
            n_degs: self.n_degs,
            n_background: self.n_background,
            functions_tested: self.n_functions(),
            significant: significant.len(),
            large_effects,
            top_function: self.rows.first().map(|r| (r.function.clone(), r.p_value)),
            alpha,
        }
    }
}

/// Summary of a comparison run
#[derive(Debug, Clone)]
pub struct ResultsSummary {
    pub category: String,
    pub n_degs: usize,
    pub n_background: usize,
    pub functions_tested: usize,
    pub significant: usize,
    pub large_effects: usize,
    pub top_function: Option<(String, f64)>,
    pub alpha: f64,
}

impl std::fmt::Display for ResultsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "DEG-Function Similarity Summary ({})", self.category)?;
        writeln!(f, "======================================")?;
        writeln!(f, "DEGs: {}", self.n_degs)?;
        writeln!(f, "Background genes: {}", self.n_background)?;
        writeln!(f, "Functions tested: {}", self.functions_tested)?;
        writeln!(
            f,
            "Significant (raw p < {}): {}",
            self.alpha, self.significant
        )?;
        writeln!(f, "  with large effect size: {}", self.large_effects)?;
        if let Some((name, p)) = &self.top_function {
            writeln!(f, "Top function: {} (p = {:.3e})", name, p)?;
        }
        Ok(())
    }
}
