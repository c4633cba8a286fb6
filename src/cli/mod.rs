//! Command-line interface for rust_degsim

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rust_degsim")]
#[command(version)]
#[command(about = "Embedding-based comparison of DEGs against biological functions")]
#[command(disable_help_flag = true)]
#[command(disable_version_flag = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare DEGs against every function of a category
    #[command(
        about = "Compare DEGs against every function of a category",
        long_about = "Compare DEGs against every function of a category\n\n\
            For each function, tests whether DEGs are more similar to it than\n\
            background genes are (one-tailed Wilcoxon rank-sum test) and reports\n\
            Cliff's delta with a 95% confidence interval. Functions are ranked by\n\
            raw p-value; no multiple-testing correction is applied.",
        after_long_help = "\
Examples:
  # GO biological processes, whole gene universe as background
  rust_degsim run -g degs.txt -c GOBP -d reference_data

  # Reactome pathways against an explicit background
  rust_degsim run -g degs.txt -b expressed_genes.txt -c REACTOME -d reference_data

  # Custom hypotheses from precomputed text embeddings
  rust_degsim run -g degs.txt -c customized -d reference_data \\
    --function-embeddings hypotheses.tsv -o custom_results.tsv"
    )]
    Run {
        /// Path to DEG list (one gene symbol per line)
        #[arg(short = 'g', long)]
        degs: String,

        /// Path to background gene list [default: whole gene universe]
        #[arg(short, long)]
        background: Option<String>,

        /// Category of functions (case-insensitive)
        #[arg(short, long,
            long_help = "Category of functions to test.\n\
                GOBP:      GO biological processes\n\
                C2CP_ALL:  all canonical pathways\n\
                BIOCARTA, KEGG, PID, REACTOME, WP: one pathway source\n\
                MOA:       drug mechanisms of action\n\
                CUSTOMIZED: functions from --function-embeddings")]
        category: String,

        /// Reference data directory
        #[arg(short = 'd', long, default_value = "reference_data")]
        data_dir: String,

        /// Function embedding table (required for CUSTOMIZED)
        #[arg(long, value_name = "FILE",
            long_help = "Function embedding table for the CUSTOMIZED category.\n\
                Format: header row, then one row per function: name followed by\n\
                the embedding vector. Width must match the gene embeddings.")]
        function_embeddings: Option<String>,

        /// Gene embedding table overriding the reference one
        #[arg(long, value_name = "FILE")]
        gene_embeddings: Option<String>,

        /// Output file path [default: timestamped name in --output-dir]
        #[arg(short, long)]
        output: Option<String>,

        /// Directory for timestamped output files
        #[arg(long, default_value = ".")]
        output_dir: String,

        /// Output format: tsv or json
        #[arg(long, default_value = "tsv")]
        format: String,

        /// Number of top DEGs listed per function
        #[arg(long, default_value_t = 10)]
        top_n: usize,

        /// Significance level used in the printed summary
        #[arg(long, default_value_t = 0.05)]
        alpha: f64,

        /// Number of worker threads (0 = all cores)
        #[arg(short = 't', long, default_value_t = 0)]
        threads: usize,
    },

    /// List recognised categories
    Categories,
}
