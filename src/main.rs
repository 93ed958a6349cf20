mod error;
mod extractor;
mod posts;
mod report;
mod settings;
#[cfg(test)]
mod test_server;

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::info;

use extractor::ImageExtractor;
use posts::BlogPost;
use report::{ExtractionResult, RunStats};
use settings::{Overrides, Settings};

#[derive(Parser)]
#[command(
    name = "blog_images",
    about = "Fetch og:image featured images for a list of blog posts"
)]
struct Cli {
    /// Settings file (TOML). Defaults to ./blog_images.toml if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    settings.apply(cli.overrides);
    info!(settings = ?settings, "Starting blog image fetch");

    let posts = posts::load(&settings.posts_file)?;
    let extractor = ImageExtractor::new(&settings)?;

    println!("Fetching featured images for {} blog posts...\n", posts.len());

    let t0 = Instant::now();
    let (results, stats) = fetch_all(
        &extractor,
        &posts,
        Duration::from_millis(settings.delay_ms),
    );
    info!(
        elapsed_s = t0.elapsed().as_secs_f64(),
        found = stats.found,
        missing = stats.missing,
        failed = stats.failed,
        timeouts = stats.timeouts,
        "Fetch finished"
    );

    report::print_results(&results);
    report::write_json(&settings.output_file, &results)?;

    println!("Results also saved to {}", settings.output_file.display());
    println!(
        "Processed {} blog posts ({} with images, {} without, {} errors, {} timed out)",
        stats.total, stats.found, stats.missing, stats.failed, stats.timeouts
    );
    Ok(())
}

/// Check every post in order, pausing `delay` after each one.
fn fetch_all(
    extractor: &ImageExtractor,
    posts: &[BlogPost],
    delay: Duration,
) -> (Vec<ExtractionResult>, RunStats) {
    let mut results = Vec::with_capacity(posts.len());
    let mut stats = RunStats::default();

    for (i, post) in posts.iter().enumerate() {
        println!("[{}/{}] {}", i + 1, posts.len(), post.title);

        let extraction = extractor.extract(&post.url);
        stats.record(&extraction);
        results.push(ExtractionResult::new(
            post,
            extraction.featured_image().map(str::to_owned),
        ));

        if !delay.is_zero() {
            thread::sleep(delay);
        }
        println!();
    }

    (results, stats)
}
