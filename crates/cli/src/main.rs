mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::Catalog;
use metadata_client::{DisplayMetadata, MetadataClient};
use recommender::fuzzy::normalize;
use recommender::{RecommendError, RecommenderIndex};
use server::{MovieRecommendation, RecommendationOrchestrator};
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::info;

use config::{Config, ConfigOverrides};

/// movie-recs - content-based movie recommendations
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Find movies similar to one you like, typos welcome", long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: ConfigOverrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a title
    Recommend {
        /// Movie title (fuzzy matched)
        #[arg(long)]
        title: String,

        /// Number of recommendations to return
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show which catalog title an input resolves to
    Resolve {
        #[arg(long)]
        title: String,
    },

    /// Show provider metadata for one title
    Details {
        #[arg(long)]
        title: String,
    },

    /// List catalog titles, for picking an exact title to ask about
    Titles {
        /// Only titles containing this text, ignoring case
        #[arg(long)]
        filter: Option<String>,

        /// Maximum number of titles to print; 0 prints all
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Prompt for titles until an empty line or `quit`
    Interactive {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of requests in flight at once
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Quiet by default so results stay readable; RUST_LOG overrides
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    config.apply(cli.overrides);

    let orchestrator = build_orchestrator(&config)?;

    match cli.command {
        Commands::Recommend { title, limit } => {
            handle_recommend(&orchestrator, &title, limit.unwrap_or(config.top_n)).await?
        }
        Commands::Resolve { title } => handle_resolve(&orchestrator, &title).await?,
        Commands::Details { title } => handle_details(&orchestrator, &title).await?,
        Commands::Titles { filter, limit } => handle_titles(&orchestrator, filter.as_deref(), limit),
        Commands::Interactive { limit } => {
            handle_interactive(&orchestrator, limit.unwrap_or(config.top_n)).await?
        }
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(&orchestrator, requests, concurrent, config.top_n).await?,
    }

    Ok(())
}

/// Load the dataset, build the index and wire up enrichment.
///
/// A dataset without the title column fails here, before any prompt.
fn build_orchestrator(config: &Config) -> Result<RecommendationOrchestrator> {
    let schema = config.schema()?;
    let resolver = config.resolver()?;

    println!("Loading dataset from {}...", config.dataset_path.display());
    let start = Instant::now();
    let catalog = Catalog::load_from_file(&config.dataset_path, &schema)
        .with_context(|| format!("Failed to load dataset {}", config.dataset_path.display()))?;
    let index = Arc::new(RecommenderIndex::build(catalog, &schema.feature_columns));
    println!(
        "{} Indexed {} movies in {:?}",
        "✓".green(),
        index.catalog().len(),
        start.elapsed()
    );

    let mut orchestrator = RecommendationOrchestrator::new(index, resolver);
    if let Some(metadata) = config.metadata() {
        let client = MetadataClient::new(metadata).context("Failed to build metadata client")?;
        orchestrator = orchestrator.with_metadata(client);
    }
    info!(
        "Ready: threshold {} ({}), metadata {}",
        config.match_threshold,
        config.threshold_mode,
        if orchestrator.metadata_enabled() { "enabled" } else { "disabled" }
    );
    Ok(orchestrator)
}

/// Turn recoverable lookup failures into a message; anything else is fatal
fn user_message(err: &anyhow::Error) -> Option<String> {
    match err.downcast_ref::<RecommendError>()? {
        RecommendError::NoMatch { input } => {
            Some(format!("No close match for '{}'. Try a different spelling.", input))
        }
        RecommendError::NotFound { title } => Some(format!("'{}' is not in the dataset.", title)),
        RecommendError::DimensionMismatch { .. } => None,
    }
}

/// Handle the 'recommend' command
async fn handle_recommend(orchestrator: &RecommendationOrchestrator, title: &str, limit: usize) -> Result<()> {
    match orchestrator.get_recommendations(title, limit).await {
        Ok(report) => {
            print_match(&report.matched.title, report.matched.score);
            print_recommendations(&report.recommendations);
            Ok(())
        }
        Err(e) => match user_message(&e) {
            Some(message) => {
                println!("{}", message.yellow());
                Ok(())
            }
            None => Err(e),
        },
    }
}

/// Handle the 'resolve' command
async fn handle_resolve(orchestrator: &RecommendationOrchestrator, title: &str) -> Result<()> {
    match orchestrator.resolve(title).await {
        Ok(found) => print_match(&found.title, found.score),
        Err(e) => match user_message(&e) {
            Some(message) => println!("{}", message.yellow()),
            None => return Err(e),
        },
    }
    Ok(())
}

/// Handle the 'details' command
async fn handle_details(orchestrator: &RecommendationOrchestrator, title: &str) -> Result<()> {
    if !orchestrator.metadata_enabled() {
        println!(
            "{}",
            "Metadata disabled (set MOVIE_RECS_OMDB_API_KEY to enable)".dimmed()
        );
    }
    match orchestrator.details(title).await {
        Ok((found, metadata)) => {
            print_match(&found.title, found.score);
            print_metadata(&metadata, "");
        }
        Err(e) => match user_message(&e) {
            Some(message) => println!("{}", message.yellow()),
            None => return Err(e),
        },
    }
    Ok(())
}

/// Handle the 'titles' command
fn handle_titles(orchestrator: &RecommendationOrchestrator, filter: Option<&str>, limit: usize) {
    let (shown, total) = matching_titles(orchestrator.index().catalog(), filter, limit);
    if shown.is_empty() {
        println!("{}", "No matching titles.".yellow());
        return;
    }

    for (i, title) in shown.iter().enumerate() {
        println!("{}. {}", (i + 1).to_string().green(), title);
    }
    if shown.len() < total {
        println!("{}", format!("Showing {} of {} titles", shown.len(), total).dimmed());
    }
}

/// Distinct titles containing `filter` (case-insensitive), capped at `limit`
/// unless it is 0. Also returns how many titles matched in total.
fn matching_titles<'a>(catalog: &'a Catalog, filter: Option<&str>, limit: usize) -> (Vec<&'a str>, usize) {
    let needle = filter.map(|f| f.trim().to_lowercase()).unwrap_or_default();
    let matched: Vec<&str> = catalog
        .distinct_titles()
        .into_iter()
        .filter(|title| needle.is_empty() || title.to_lowercase().contains(&needle))
        .collect();

    let total = matched.len();
    let cap = if limit == 0 { total } else { limit };
    (matched.into_iter().take(cap).collect(), total)
}

/// Handle the 'interactive' command
async fn handle_interactive(orchestrator: &RecommendationOrchestrator, limit: usize) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{} ", "Movie title (empty to quit):".bold().blue());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            break;
        }

        handle_recommend(orchestrator, input, limit).await?;
        println!();
    }

    println!("Bye!");
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    orchestrator: &RecommendationOrchestrator,
    requests: usize,
    concurrent: usize,
    limit: usize,
) -> Result<()> {
    let titles = benchmark_titles(orchestrator.index().catalog());
    if titles.is_empty() {
        bail!("Dataset has no titles to benchmark with");
    }
    if requests == 0 {
        bail!("Benchmark needs at least one request");
    }

    // Pick random titles up front so sampling isn't timed
    let picks: Vec<String> = (0..requests)
        .map(|_| titles[rand::random::<u64>() as usize % titles.len()].clone())
        .collect();

    println!(
        "Running {} requests ({} concurrent, limit {})...",
        requests, concurrent, limit
    );

    let wall_clock = Instant::now();
    let mut timings = Vec::with_capacity(requests);
    let mut misses = 0usize;
    let mut in_flight = JoinSet::new();

    for title in picks {
        if in_flight.len() >= concurrent.max(1) {
            if let Some(joined) = in_flight.join_next().await {
                record_timing(joined?, &mut timings, &mut misses)?;
            }
        }
        let orchestrator = orchestrator.clone();
        in_flight.spawn(async move {
            let start = Instant::now();
            orchestrator.get_recommendations(&title, limit).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
    }
    while let Some(joined) = in_flight.join_next().await {
        record_timing(joined?, &mut timings, &mut misses)?;
    }

    let stats = LatencyStats::from_timings(&mut timings);
    let total = wall_clock.elapsed();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total);
    println!("Average latency: {:?}", stats.avg);
    println!("P50 latency: {:?}", stats.p50);
    println!("P95 latency: {:?}", stats.p95);
    println!("P99 latency: {:?}", stats.p99);
    println!(
        "Throughput: {:.2} requests/second",
        requests as f64 / total.as_secs_f64()
    );
    if misses > 0 {
        println!("{}", format!("Unresolved requests: {}", misses).yellow());
    }

    Ok(())
}

/// Titles worth sending through the resolver: ones that normalize to nothing
/// (e.g. `"!!!"`) can never match anything.
fn benchmark_titles(catalog: &Catalog) -> Vec<String> {
    catalog
        .distinct_titles()
        .into_iter()
        .filter(|title| !normalize(title).is_empty())
        .map(String::from)
        .collect()
}

/// Keep a successful timing, count a lookup miss, fail on anything else
fn record_timing(outcome: Result<Duration>, timings: &mut Vec<Duration>, misses: &mut usize) -> Result<()> {
    match outcome {
        Ok(elapsed) => timings.push(elapsed),
        Err(e) if user_message(&e).is_some() => *misses += 1,
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Latency summary over a set of request timings
#[derive(Debug, Clone, Copy, PartialEq)]
struct LatencyStats {
    avg: Duration,
    p50: Duration,
    p95: Duration,
    p99: Duration,
}

impl LatencyStats {
    /// Sorts `timings` in place; all zero for an empty set
    fn from_timings(timings: &mut [Duration]) -> Self {
        if timings.is_empty() {
            return Self {
                avg: Duration::ZERO,
                p50: Duration::ZERO,
                p95: Duration::ZERO,
                p99: Duration::ZERO,
            };
        }
        timings.sort();

        let total: Duration = timings.iter().sum();
        let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];

        Self {
            avg: total / timings.len() as u32,
            p50: percentile(0.50),
            p95: percentile(0.95),
            p99: percentile(0.99),
        }
    }
}

fn print_match(title: &str, score: u8) {
    println!("{} {} (match {})", "→".green(), title.bold(), score);
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[MovieRecommendation]) {
    if recommendations.is_empty() {
        println!("{}", "No other movies in the dataset.".yellow());
        return;
    }

    println!("{}", "Movie Recommendations:".bold().blue());
    for rec in recommendations {
        println!(
            "{}. {} - Similarity: {:.2}",
            rec.rank.to_string().green(),
            rec.title,
            rec.score
        );
        if let Some(metadata) = &rec.metadata {
            print_metadata(metadata, "   ");
        }
    }
}

fn print_metadata(metadata: &DisplayMetadata, indent: &str) {
    println!(
        "{}{} {} | {} {} | {} {}",
        indent,
        "Year:".cyan(),
        metadata.year,
        "IMDb:".cyan(),
        metadata.rating,
        "Genre:".cyan(),
        metadata.genre
    );
    println!("{}{} {}", indent, "Director:".cyan(), metadata.director);
    println!("{}{} {}", indent, "Plot:".cyan(), metadata.plot.dimmed());
    if let Some(poster) = &metadata.poster {
        println!("{}{} {}", indent, "Poster:".cyan(), poster);
    }
}
