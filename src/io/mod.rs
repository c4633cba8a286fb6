//! Input/Output operations for DEG/function similarity analysis

mod csv;
mod reference_dir;
mod results;

pub use self::csv::{
    read_embedding_table, read_gene_list, read_similarity_matrix, timestamped_output_path, write_results,
    write_results_json,
};
pub use reference_dir::ReferenceDir;
pub use results::{ComparisonResults, ComparisonRow, ResultsSummary};
