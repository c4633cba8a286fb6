//! rust_degsim command-line interface

use std::path::PathBuf;

use clap::Parser;
use log::{info, LevelFilter};

use rust_degsim::cli::{Cli, Commands};
use rust_degsim::prelude::*;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Find the first non-flag argument (potential subcommand)
    let first_positional = args.iter().skip(1).find(|a| !a.starts_with('-'));
    let subcommands = ["run", "categories", "help"];
    let has_subcommand = first_positional.map_or(false, |a| subcommands.contains(&a.as_str()));

    if !has_subcommand {
        if args.iter().any(|a| a == "--help" || a == "-h") {
            print_help();
            return;
        }
        if args.iter().any(|a| a == "-V" || a == "--version") {
            println!("rust_degsim {}", VERSION);
            return;
        }
        print_no_args();
        return;
    }

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Some(Commands::Run {
            degs,
            background,
            category,
            data_dir,
            function_embeddings,
            gene_embeddings,
            output,
            output_dir,
            format,
            top_n,
            alpha,
            threads,
        }) => run_comparison(
            &degs,
            background.as_deref(),
            &category,
            &data_dir,
            function_embeddings.as_deref(),
            gene_embeddings.as_deref(),
            output.as_deref(),
            &output_dir,
            &format,
            top_n,
            alpha,
            threads,
        ),
        Some(Commands::Categories) => {
            print_categories();
            Ok(())
        }
        None => {
            print_no_args();
            return;
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Custom help output
// ---------------------------------------------------------------------------

fn print_no_args() {
    println!("rust_degsim v{}", VERSION);
    println!("Run `rust_degsim --help` for usage.");
}

fn print_help() {
    println!("rust_degsim v{}", VERSION);
    println!("Embedding-based comparison of differentially expressed genes against biological functions");
    println!();
    println!("Usage: rust_degsim <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  run         Compare DEGs against every function of a category");
    println!("                - One-tailed Wilcoxon rank-sum test per function");
    println!("                - Cliff's delta with 95% confidence interval");
    println!("                - Precomputed (GOBP, pathways, MOA) or custom functions");
    println!("  categories  List recognised categories");
    println!();
    println!("Global Options:");
    println!("  -v, --verbose    Enable verbose output");
    println!("  -h, --help       Print help");
    println!("  -V, --version    Print version");
    println!();
    println!("Examples:");
    println!("  rust_degsim run -g degs.txt -c GOBP -d reference_data");
    println!();
    println!("  rust_degsim run -g degs.txt -c customized -d reference_data \\");
    println!("    --function-embeddings hypotheses.tsv -o custom_results.tsv");
}

fn print_categories() {
    println!("Recognised categories (case-insensitive):");
    for category in Category::all() {
        println!("  {:<12} {}", category.name(), category.describe());
    }
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn run_comparison(
    degs_path: &str,
    background_path: Option<&str>,
    category: &str,
    data_dir: &str,
    function_embeddings_path: Option<&str>,
    gene_embeddings_path: Option<&str>,
    output_path: Option<&str>,
    output_dir: &str,
    format: &str,
    top_n: usize,
    alpha: f64,
    threads: usize,
) -> Result<()> {
    // Configure thread pool
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .ok();
    }

    // Validate cheap arguments before touching any file
    let category: Category = category.parse()?;
    if format != "tsv" && format != "json" {
        return Err(DegSimError::InvalidInput {
            reason: format!("Unknown output format '{}'. Use 'tsv' or 'json'.", format),
        });
    }

    info!("Loading DEGs from: {}", degs_path);
    let mut request = AnalysisRequest::new(read_gene_list(degs_path)?, category);

    if let Some(path) = background_path {
        info!("Loading background genes from: {}", path);
        request = request.with_background(read_gene_list(path)?);
    }

    if let Some(path) = function_embeddings_path {
        if category != Category::Customized {
            log::warn!("--function-embeddings is only used with the CUSTOMIZED category; ignoring");
        } else {
            info!("Loading function embeddings from: {}", path);
            let table = read_embedding_table(path)?;
            info!("  {} functions, {} dimensions", table.n_rows(), table.dim());
            request = request.with_function_embeddings(table);
        }
    }

    if let Some(path) = gene_embeddings_path {
        info!("Loading gene embeddings from: {}", path);
        request = request.with_gene_embeddings(read_embedding_table(path)?);
    }

    let reference = ReferenceDir::new(data_dir)?;
    let params = AnalysisParams {
        top_n,
        ..AnalysisParams::default()
    };

    let results = run_analysis(&reference, &request, &params)?;

    let output: PathBuf = match output_path {
        Some(path) => PathBuf::from(path),
        None => timestamped_output_path(output_dir, category.name(), format),
    };
    info!("Writing results to: {}", output.display());
    match format {
        "json" => write_results_json(&output, &results)?,
        _ => write_results(&output, &results)?,
    }

    println!("{}", results.summary(alpha));

    Ok(())
}
