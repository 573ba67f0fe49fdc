use chrono::Local;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use vitrine::analysis::pricing::{clamp_max_price, DEFAULT_MAX_PRICE};
use vitrine::catalog::DEFAULT_CATALOG_PATH;
use vitrine::report::{self, Digest};
use vitrine::Catalog;

#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(author, version, about = "Explore a storefront game catalog with aggregate charts")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Catalog CSV file (default: dataset/games_2021_2025.csv)
    path: Option<PathBuf>,

    /// Output report file (.csv, .json, .html)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for auto-generated reports
    #[arg(long, default_value = "vitrine-reports")]
    report_dir: PathBuf,

    /// Don't auto-generate CSV report
    #[arg(long)]
    no_report: bool,

    /// Don't prompt to open report
    #[arg(long)]
    no_open: bool,

    /// Price ceiling for the price-distribution analysis (0-100)
    #[arg(long, default_value_t = DEFAULT_MAX_PRICE)]
    max_price: u32,

    /// Only show errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start interactive dashboard in the browser
    Serve {
        /// Catalog CSV file
        path: Option<PathBuf>,

        /// Port to listen on
        #[arg(short, long, default_value = "3004")]
        port: u16,
    },
}

fn main() {
    let args = Args::parse();

    if let Some(Command::Serve { path, port }) = args.command {
        let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));
        if let Err(e) = vitrine::serve::start(port, path) {
            eprintln!("Server error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let path = args
        .path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));

    // Missing catalog is fatal: nothing renders from partial data
    let catalog = match Catalog::load(&path) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            std::process::exit(1);
        }
    };

    let max_price = clamp_max_price(args.max_price);
    let digest = Digest::from_catalog(&catalog, max_price);

    if !args.quiet {
        print_digest(&digest);
    }

    // Determine report path
    let report_path = if let Some(ref output) = args.output {
        Some(output.clone())
    } else if !args.no_report {
        // Auto-generate report
        std::fs::create_dir_all(&args.report_dir).ok();
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!("vitrine_digest_{}.csv", timestamp);
        Some(args.report_dir.join(filename))
    } else {
        None
    };

    // Generate report
    if let Some(ref output_path) = report_path {
        if let Err(e) = report::generate(output_path, &catalog, max_price) {
            eprintln!("Failed to write report: {}", e);
            std::process::exit(1);
        }
        if !args.quiet {
            eprintln!("\n\x1b[32mReport saved: {}\x1b[0m", output_path.display());
        }

        // Open report
        if !args.no_open && !args.quiet {
            eprint!("\nOpen report? [Y/n] ");
            io::stderr().flush().ok();

            let mut input = String::new();
            if io::stdin().read_line(&mut input).is_ok() {
                let input = input.trim().to_lowercase();
                if input.is_empty() || input == "y" || input == "yes" {
                    if let Err(e) = open::that(output_path) {
                        eprintln!("Failed to open report: {}", e);
                    }
                }
            }
        }
    }

    if !args.quiet {
        eprintln!("\n\x1b[90mDigest complete.\x1b[0m");
    }
}

fn print_digest(digest: &Digest) {
    let summary = &digest.summary;

    eprintln!("\x1b[1mVitrine - Catalog Explorer\x1b[0m");
    eprintln!("{}", "─".repeat(70));
    eprintln!(
        "{} games ({} paid, {} free, {} without a release date)\n",
        summary.total, summary.paid, summary.free, summary.undated
    );

    eprintln!("\x1b[1mTop 10 Most Reviewed\x1b[0m");
    for (rank, leader) in digest.top_reviewed.iter().enumerate() {
        eprintln!(
            "  {:>2}. {:<45} {:>12}",
            rank + 1,
            truncate(&leader.name, 45),
            leader.reviews_total
        );
    }

    eprintln!("\n\x1b[1mTop 10 Genres (primary)\x1b[0m");
    for entry in &digest.top_genres {
        eprintln!("  {:<30} {:>6}", entry.genre, entry.count);
    }

    eprintln!("\n\x1b[1mLaunches per Semester\x1b[0m");
    for point in &digest.launch_evolution {
        eprintln!("  {:<10} {:>6}", point.semester, point.count);
    }
    eprintln!("  \x1b[90m{}\x1b[0m", digest.launch_note);

    eprint!("\n\x1b[1mPrice vs Review Count\x1b[0m  Pearson r = ");
    match digest.correlation.pearson_r {
        Some(r) => eprintln!("\x1b[36m{:.2}\x1b[0m ({} games)", r, digest.correlation.points.len()),
        None => eprintln!("\x1b[90mn/a\x1b[0m"),
    }

    eprintln!("\n\x1b[1mBest-Rated Genres (mean positive ratio)\x1b[0m");
    match &digest.genre_ratios {
        Some(ranked) => {
            for entry in ranked {
                eprintln!(
                    "  {:<30} {:>5.1}%  ({} games)",
                    entry.genre,
                    entry.mean_positive_ratio * 100.0,
                    entry.sampled_games
                );
            }
        }
        None => {
            let reason = digest.genre_ratios_error.as_deref().unwrap_or("unavailable");
            eprintln!("  \x1b[33m{}\x1b[0m", reason);
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}
