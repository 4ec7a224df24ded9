use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use cropfit::catalog::{builtin_catalog, load_catalog, Catalog};
use cropfit::config::Config;
use cropfit::scoring::{Scorer, ScoringOptions};
use cropfit::simulate::{self, EmgSettings, PricePoint, StockParams, TrendAnalysis};
use serde::Serialize;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
enum Format {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Serialize)]
struct StockReport<'a> {
    params: &'a StockParams,
    history: &'a [PricePoint],
    analysis: &'a TrendAnalysis,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank crops for the given readings (default if no subcommand)
    Recommend {
        /// Override a reading, e.g. --set ph=6.5 (repeatable)
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Number of results to show (0 = all)
        #[arg(short = 'n', long)]
        top: Option<usize>,

        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,

        /// Let far-off readings contribute negative scores
        #[arg(long)]
        unclamped: bool,
    },
    /// List the readings the catalog scores against
    Features,
    /// List catalog crops with their ideal ranges
    Crops,
    /// Simulate a repeatable price history for a ticker
    Stock {
        ticker: String,

        /// Number of price points
        #[arg(long, default_value_t = 60)]
        points: usize,

        /// Time between points (e.g. 1m, 30s, 1h)
        #[arg(long, default_value = "1m", value_parser = humantime::parse_duration)]
        interval: Duration,

        /// Override the ticker-derived seed
        #[arg(long)]
        seed: Option<u64>,

        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Simulate EMG signals driving a prosthetic arm angle
    Emg {
        #[arg(long, default_value_t = 4)]
        channels: usize,

        #[arg(long, default_value_t = 100)]
        steps: usize,

        /// Points kept per channel
        #[arg(long, default_value_t = 100)]
        window: usize,

        /// Moving-average width
        #[arg(long, default_value_t = 5)]
        smoothing: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Target arm angle in degrees, -180 to 180
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        target: f64,

        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Write a starter config and an editable catalog to ~/.config/cropfit/
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "cropfit")]
#[command(about = "Crop suitability ranking CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/cropfit/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Catalog file to use instead of the configured or built-in one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "cropfit=debug" } else { "cropfit=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();

    let command = cli.command.unwrap_or(Commands::Recommend {
        set: Vec::new(),
        top: None,
        format: Format::Table,
        unclamped: false,
    });

    let config_path = cli.config.map(PathBuf::from);
    let use_colors = cropfit::output::should_use_colors();

    match command {
        Commands::Init { force } => {
            let dir = match cropfit::config::get_config_dir() {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("Config error: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };
            match cropfit::config::write_starter_files(&dir, force) {
                Ok(outcome) => {
                    println!("Wrote {}", outcome.config_path.display());
                    println!("Wrote {}", outcome.catalog_path.display());
                }
                Err(e) => {
                    eprintln!("Init failed: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            }
        }
        Commands::Recommend {
            set,
            top,
            format,
            unclamped,
        } => {
            let config = load_config_or_exit(config_path);
            let options = if unclamped {
                ScoringOptions::unclamped()
            } else {
                config.scoring()
            };
            let scorer = build_scorer(cli.catalog, &config, options);

            let mut input = scorer.default_input();
            for assignment in &set {
                if let Err(e) = input.apply_assignment(assignment) {
                    eprintln!("Input error: {}", e);
                    std::process::exit(EXIT_INPUT);
                }
            }
            tracing::debug!(?input, "scoring input");

            let results = match scorer.rank(&input) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Input error: {}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            let top = top.unwrap_or_else(|| config.top());
            let shown = if top == 0 {
                &results[..]
            } else {
                &results[..top.min(results.len())]
            };

            match format {
                Format::Table => {
                    println!("{}", cropfit::output::format_ranked_table(shown, use_colors));
                    if cli.verbose {
                        for result in shown {
                            println!();
                            println!("  {}", result.item.name);
                            println!(
                                "{}",
                                cropfit::output::format_breakdown(&result.breakdown, use_colors)
                            );
                        }
                    }
                }
                Format::Tsv => println!("{}", cropfit::output::format_tsv(shown)),
                Format::Json => match cropfit::output::format_json(shown) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Output error: {:#}", e);
                        std::process::exit(EXIT_CONFIG);
                    }
                },
            }

            tracing::debug!(
                ranked = results.len(),
                shown = shown.len(),
                elapsed = ?start_time.elapsed(),
                "recommend finished"
            );
        }
        Commands::Features => {
            let config = load_config_or_exit(config_path);
            let scorer = build_scorer(cli.catalog, &config, config.scoring());
            println!("{}", cropfit::output::format_features(scorer.features()));
        }
        Commands::Crops => {
            let config = load_config_or_exit(config_path);
            let scorer = build_scorer(cli.catalog, &config, config.scoring());
            println!(
                "{}",
                cropfit::output::format_catalog(scorer.catalog(), use_colors)
            );
        }
        Commands::Stock {
            ticker,
            points,
            interval,
            seed,
            format,
        } => {
            let params = match StockParams::from_ticker(&ticker) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Input error: {}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };
            let params = match seed {
                Some(s) => params.with_seed(s),
                None => params,
            };

            let end = chrono::Local::now().naive_local();
            let analyzed = simulate::generate_history(&params, points, interval, end).and_then(
                |history| simulate::analyze(&history).map(|analysis| (history, analysis)),
            );
            let (history, analysis) = match analyzed {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("Input error: {}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            match format {
                Format::Table => println!(
                    "{}",
                    cropfit::output::format_stock_report(
                        &params.ticker,
                        &history,
                        &analysis,
                        use_colors
                    )
                ),
                Format::Tsv => println!("{}", cropfit::output::format_history_tsv(&history)),
                Format::Json => {
                    let report = StockReport {
                        params: &params,
                        history: &history,
                        analysis: &analysis,
                    };
                    match serde_json::to_string_pretty(&report) {
                        Ok(json) => println!("{}", json),
                        Err(e) => {
                            eprintln!("Output error: {}", e);
                            std::process::exit(EXIT_CONFIG);
                        }
                    }
                }
            }
        }
        Commands::Emg {
            channels,
            steps,
            window,
            smoothing,
            seed,
            target,
            format,
        } => {
            let settings = EmgSettings {
                channels,
                window,
                steps,
                smoothing,
                seed,
                target,
            };
            let session = match simulate::simulate_session(&settings) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Input error: {}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            match format {
                Format::Table => println!(
                    "{}",
                    cropfit::output::format_emg_report(&session, use_colors)
                ),
                Format::Tsv => {
                    for (step, angle) in session.angles.iter().enumerate() {
                        println!("{}\t{:.3}", step + 1, angle);
                    }
                }
                Format::Json => match serde_json::to_string_pretty(&session) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Output error: {}", e);
                        std::process::exit(EXIT_CONFIG);
                    }
                },
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

fn load_config_or_exit(path: Option<PathBuf>) -> Config {
    match cropfit::config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }
}

/// Resolve the catalog (flag, then config, then built-in), validate it and
/// build the scorer. Exits with EXIT_CONFIG on any problem.
fn build_scorer(flag: Option<PathBuf>, config: &Config, options: ScoringOptions) -> Scorer {
    let catalog: Catalog = match flag.or_else(|| config.catalog.clone()) {
        Some(path) => match load_catalog(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Catalog error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
        None => builtin_catalog(),
    };

    match Scorer::new(catalog, options) {
        Ok(scorer) => {
            tracing::debug!(
                features = scorer.features().len(),
                items = scorer.catalog().items.len(),
                "catalog ready"
            );
            scorer
        }
        Err(errors) => {
            eprintln!("Catalog errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
    }
}
