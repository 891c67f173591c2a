use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::{Path, PathBuf};

use mpsview_mps::stats::{self, DEFAULT_BUCKETS};
use mpsview_mps::{Histogram, ParsedProblem, ProblemSummary, SparsityPattern};

#[derive(Parser)]
#[command(name = "mpsview")]
#[command(about = "Inspect MPS linear programming files", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check an MPS file for errors
    Check {
        /// The file to check
        file: PathBuf,
    },
    /// Parse an MPS file and output the model
    Show {
        /// The file to parse
        file: PathBuf,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Print counts and element distributions
    Stats {
        /// The file to analyse
        file: PathBuf,
        /// Number of histogram buckets
        #[arg(short, long, default_value_t = DEFAULT_BUCKETS)]
        buckets: usize,
    },
    /// Render the non-zero structure of the matrix
    Pattern {
        /// The file to render
        file: PathBuf,
        /// Maximum raster width
        #[arg(long, default_value_t = 120)]
        max_width: usize,
        /// Maximum raster height
        #[arg(long, default_value_t = 60)]
        max_height: usize,
        /// Output format (text, pbm)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load(file: &Path) -> ParsedProblem {
    match mpsview_mps::Parser::parse_file(file) {
        Ok(problem) => problem,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_histogram(title: &str, hist: &Histogram) {
    println!("{}:", title);
    let widest = hist.counts.iter().copied().max().unwrap_or(0).max(1);
    let width = hist.bucket_width();
    for (start, &count) in hist.bucket_starts().zip(&hist.counts) {
        let bar = "#".repeat(count * 40 / widest);
        println!("  {:>10.3} .. {:<10.3} {:>8}  {}", start, start + width, count, bar);
    }
    println!();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check { file } => match mpsview_mps::Parser::parse_file(&file) {
            Ok(problem) => {
                println!("✓ {} is valid", file.display());
                println!("  name: {}", problem.name());
                println!("  {} rows", problem.num_rows());
                println!("  {} columns", problem.num_columns());
                println!("  {} elements", problem.num_elements());
            }
            Err(e) => {
                eprintln!("✗ {} has errors:", file.display());
                eprintln!("  {}", e);
                std::process::exit(1);
            }
        },
        Commands::Show { file, format } => {
            let problem = load(&file);
            if format == "json" {
                match serde_json::to_string_pretty(&problem) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                println!("{:#?}", problem);
            }
        }
        Commands::Stats { file, buckets } => {
            let problem = load(&file);
            let summary = ProblemSummary::of(&problem);

            println!("Problem: {}", summary.name);
            println!("File: {}", file.display());
            println!();
            println!(
                "Rows:     {:>10}  (E {}, G {}, L {}, N {})",
                summary.rows,
                summary.equality_rows,
                summary.greater_rows,
                summary.less_rows,
                summary.free_rows
            );
            println!("Columns:  {:>10}", summary.columns);
            println!("Elements: {:>10}  (density {:.6})", summary.elements, summary.density);
            println!("RHS:      {:>10}", summary.rhs);
            println!("Ranges:   {:>10}", summary.ranges);
            println!("Bounds:   {:>10}", summary.bounds);
            println!();

            print_histogram("Log10(absolute value) of elements", &stats::magnitude_histogram(&problem, buckets));
            print_histogram("Elements per row", &stats::row_histogram(&problem, buckets));
            print_histogram("Elements per column", &stats::column_histogram(&problem, buckets));
        }
        Commands::Pattern { file, max_width, max_height, format } => {
            let problem = load(&file);
            let pattern = SparsityPattern::new(&problem, max_width, max_height);
            if format == "pbm" {
                print!("{}", pattern.to_pbm());
            } else {
                print!("{}", pattern.to_text());
            }
        }
    }
}
