//! Delimited-text reading and writing for gene lists, matrices, and results

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use ndarray::Array2;

use crate::data::{EmbeddingTable, SimilarityMatrix};
use crate::error::{DegSimError, Result};

use super::results::ComparisonResults;

/// Strip surrounding quotes from a string
fn strip_quotes(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

/// Tab if the first line contains one, comma otherwise
fn detect_delimiter(path: &Path) -> Result<u8> {
    let mut first_line = String::new();
    BufReader::new(File::open(path)?).read_line(&mut first_line)?;
    Ok(if first_line.contains('\t') { b'\t' } else { b',' })
}

/// Read a gene list, one symbol per line.
///
/// Blank lines and lines starting with `#` are skipped; only the first
/// tab/comma-separated field of a line is used.
pub fn read_gene_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut genes = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let field = line.split(|c: char| c == '\t' || c == ',').next().unwrap_or(line);
        let gene = strip_quotes(field);
        if !gene.is_empty() {
            genes.push(gene);
        }
    }

    Ok(genes)
}

/// Read a labelled numeric table: header row, first column = row labels
fn read_labelled_table(path: &Path, what: &str) -> Result<(Vec<String>, Vec<String>, Array2<f64>)> {
    let delimiter = detect_delimiter(path)?;
    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_path(path)?;

    let header = reader.headers()?.clone();
    if header.len() < 2 {
        return Err(DegSimError::InvalidInput {
            reason: format!("{} header needs a label column and at least one value column", what),
        });
    }
    let column_names: Vec<String> = header.iter().skip(1).map(strip_quotes).collect();
    let n_cols = column_names.len();

    let mut row_labels = Vec::new();
    let mut data: Vec<f64> = Vec::new();

    for record in reader.records() {
        let record = record?;
        if record.len() != n_cols + 1 {
            return Err(DegSimError::InvalidInput {
                reason: format!(
                    "{} row has {} columns, expected {}",
                    what,
                    record.len(),
                    n_cols + 1
                ),
            });
        }

        row_labels.push(strip_quotes(&record[0]));
        for field in record.iter().skip(1) {
            let value = strip_quotes(field);
            data.push(value.parse::<f64>().map_err(|_| DegSimError::InvalidInput {
                reason: format!("Invalid {} value: {}", what, value),
            })?);
        }
    }

    if row_labels.is_empty() {
        return Err(DegSimError::EmptyData {
            reason: format!("No rows found in {}", what),
        });
    }

    let values = Array2::from_shape_vec((row_labels.len(), n_cols), data).map_err(|e| {
        DegSimError::DimensionMismatch {
            expected: format!("{} x {} {}", row_labels.len(), n_cols, what),
            got: e.to_string(),
        }
    })?;

    Ok((row_labels, column_names, values))
}

/// Read a gene x function similarity matrix.
/// Expected format: first column is gene IDs, first row is function names.
pub fn read_similarity_matrix<P: AsRef<Path>>(path: P) -> Result<SimilarityMatrix> {
    let (gene_ids, function_names, values) = read_labelled_table(path.as_ref(), "similarity matrix")?;
    SimilarityMatrix::new(values, gene_ids, function_names)
}

/// Read an embedding table.
/// Expected format: header row, then one row per item: label followed by the vector.
pub fn read_embedding_table<P: AsRef<Path>>(path: P) -> Result<EmbeddingTable> {
    let (labels, _, values) = read_labelled_table(path.as_ref(), "embedding table")?;
    EmbeddingTable::new(values, labels)
}

/// Write comparison results as a tab-delimited table, one row per function
pub fn write_results<P: AsRef<Path>>(path: P, results: &ComparisonResults) -> Result<()> {
    let mut writer = ::csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)?;

    if results.rows.is_empty() {
        writer.write_record([
            "function",
            "p_value",
            "median_cosine_similarity_degs",
            "median_cosine_similarity_bkgs",
            "median_difference",
            "cliffs_delta",
            "cliffs_delta_ci_low",
            "cliffs_delta_ci_high",
            "effect_size_magnitude",
            "top_degs",
        ])?;
    }
    for row in &results.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Write comparison results, including run metadata, as pretty-printed JSON
pub fn write_results_json<P: AsRef<Path>>(path: P, results: &ComparisonResults) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, results)?;
    Ok(())
}

/// `<dir>/<category>_results_<unix seconds>.<extension>`
pub fn timestamped_output_path<P: AsRef<Path>>(dir: P, category: &str, extension: &str) -> PathBuf {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    dir.as_ref()
        .join(format!("{}_results_{}.{}", category, seconds, extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ComparisonRow;
    use crate::testing::EffectMagnitude;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_gene_list() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# DEGs from contrast A").unwrap();
        writeln!(file, "TP53").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "\"EGFR\"").unwrap();
        writeln!(file, "BRCA1\t2.3").unwrap();

        let genes = read_gene_list(file.path()).unwrap();
        assert_eq!(genes, vec!["TP53", "EGFR", "BRCA1"]);
    }

    #[test]
    fn test_read_similarity_matrix_tsv() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "gene\tGOBP_APOPTOSIS\tGOBP_CELL_CYCLE").unwrap();
        writeln!(file, "TP53\t0.41\t0.38").unwrap();
        writeln!(file, "EGFR\t0.22\t0.30").unwrap();

        let matrix = read_similarity_matrix(file.path()).unwrap();
        assert_eq!(matrix.n_genes(), 2);
        assert_eq!(matrix.function_names(), &["GOBP_APOPTOSIS", "GOBP_CELL_CYCLE"]);
        assert_eq!(matrix.values()[[1, 1]], 0.30);
    }

    #[test]
    fn test_read_embedding_table_csv() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "label,0,1,2").unwrap();
        writeln!(file, "\"DNA repair in response to UV\",0.1,0.2,0.3").unwrap();

        let table = read_embedding_table(file.path()).unwrap();
        assert_eq!(table.n_rows(), 1);
        assert_eq!(table.dim(), 3);
        assert_eq!(table.labels()[0], "DNA repair in response to UV");
    }

    #[test]
    fn test_invalid_value_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "gene\tF1").unwrap();
        writeln!(file, "TP53\tabc").unwrap();
        assert!(matches!(
            read_similarity_matrix(file.path()),
            Err(DegSimError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_write_results() {
        let row = ComparisonRow {
            function: "GOBP_APOPTOSIS".to_string(),
            p_value: 0.001,
            median_similarity_degs: 0.45,
            median_similarity_bkgs: 0.40,
            median_difference: 0.05,
            cliffs_delta: 0.5,
            cliffs_delta_ci_low: 0.3,
            cliffs_delta_ci_high: 0.65,
            magnitude: EffectMagnitude::Large,
            top_degs: "TP53(0.5100), EGFR(0.4900)".to_string(),
        };
        let results = ComparisonResults::from_rows("GOBP", 20, 18000, vec![row]);

        let file = NamedTempFile::new().unwrap();
        write_results(file.path(), &results).unwrap();
        let text = std::fs::read_to_string(file.path()).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("function\tp_value\tmedian_cosine_similarity_degs"));
        assert!(header.ends_with("effect_size_magnitude\ttop_degs"));
        let data = lines.next().unwrap();
        assert!(data.starts_with("GOBP_APOPTOSIS\t0.001\t"));
        assert!(data.contains("\tlarge\t"));

        let json = NamedTempFile::new().unwrap();
        write_results_json(json.path(), &results).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(json.path()).unwrap()).unwrap();
        assert_eq!(parsed["rows"][0]["effect_size_magnitude"], "large");
        assert_eq!(parsed["n_degs"], 20);
    }

    #[test]
    fn test_timestamped_output_path() {
        let path = timestamped_output_path("/tmp/out", "GOBP", "tsv");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("GOBP_results_"));
        assert!(name.ends_with(".tsv"));
        assert_eq!(path.parent().unwrap(), Path::new("/tmp/out"));
    }
}
