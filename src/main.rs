//! Coffin CLI - Command-line tool for K9A game asset decryption.
//!
//! This is the main entry point for the Coffin command-line application.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use coffin::batch::{Job, DEFAULT_BENCH_SECS, DEFAULT_OUTPUT_DIR};
use coffin::prelude::*;

/// Coffin - K9A asset decryption and throughput benchmark
#[derive(Parser)]
#[command(name = "coffin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Game directory containing Game.exe or nw.exe
    #[arg(short, long, global = true, env = "COFFIN_GAME_DIR")]
    game_dir: Option<PathBuf>,

    /// Worker threads (0 = available parallelism)
    #[arg(short, long, global = true, env = "COFFIN_JOBS", default_value_t = 0)]
    jobs: usize,

    /// File name filter (glob-style)
    #[arg(short, long, global = true, env = "COFFIN_FILTER", default_value = coffin::k9a::CONTAINER_GLOB)]
    filter: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Decrypt one container, a directory tree, or the game's asset folders
    Decrypt {
        /// Input container or directory (defaults to the game's www folders)
        input: Option<PathBuf>,

        /// Output directory
        #[arg(requires = "input")]
        output: Option<PathBuf>,
    },

    /// Measure decryption throughput without writing anything
    Bench {
        /// Benchmark duration in seconds
        #[arg(default_value_t = DEFAULT_BENCH_SECS)]
        seconds: u64,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
    }

    println!("All tasks finished.");
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = PipelineConfig::default()
        .with_workers(cli.jobs)
        .with_filter(cli.filter.clone());

    let game_dir = match &cli.game_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match &cli.command {
        Commands::Decrypt { input, output } => {
            let start = Instant::now();
            match input {
                Some(input) => {
                    let output = output
                        .clone()
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
                    cmd_decrypt_path(&config, input, &output)?;
                }
                None => cmd_decrypt_game(&config, &game_dir)?,
            }
            println!("Decryption finished in {} ms.", start.elapsed().as_millis());
        }
        Commands::Bench { seconds } => {
            cmd_bench(&config, &game_dir, Duration::from_secs(*seconds))?;
        }
    }

    Ok(())
}

fn cmd_decrypt_path(config: &PipelineConfig, input: &Path, output: &Path) -> Result<()> {
    if input.is_file() {
        return decrypt_single(input, output);
    }

    if !input.is_dir() {
        anyhow::bail!("File or directory does not exist: {}", input.display());
    }

    println!("Processing directory: {}", input.display());
    let pipeline = BatchPipeline::new(config).context("Failed to start worker pool")?;
    let sink = WriterSink::new(input, output);
    let result = run_with_progress(&pipeline, &[input.to_path_buf()], &sink)?;
    print_summary(&result);

    Ok(())
}

fn decrypt_single(input: &Path, output: &Path) -> Result<()> {
    let data = std::fs::read(input).context("Failed to read input file")?;

    let asset = match coffin::k9a::decode_owned(data, input) {
        Ok(asset) => asset,
        Err(e) => {
            println!("Decryption failed. File was NOT decrypted: {} ({})", input.display(), e);
            return Ok(());
        }
    };

    let root = input.parent().unwrap_or(Path::new(""));
    let job = Job::new(input, root);
    let sink = WriterSink::new(root, output);
    let destination = sink
        .destination(&job, &asset.extension)
        .context("Failed to resolve output path")?;
    sink.accept(&job, &asset).context("Failed to write output file")?;

    println!("Single file decrypted and saved to: {}", destination.display());

    Ok(())
}

fn cmd_decrypt_game(config: &PipelineConfig, game_dir: &Path) -> Result<()> {
    if !is_game_directory(game_dir) {
        anyhow::bail!("Game not found in {}", game_dir.display());
    }

    let roots = existing_roots(game_dir);
    let pipeline = BatchPipeline::new(config).context("Failed to start worker pool")?;
    let sink = WriterSink::new(game_dir, game_dir.join(DEFAULT_OUTPUT_DIR));
    let result = run_with_progress(&pipeline, &roots, &sink)?;
    print_summary(&result);

    Ok(())
}

fn cmd_bench(config: &PipelineConfig, game_dir: &Path, target: Duration) -> Result<()> {
    println!("Starting benchmark for {} seconds...", target.as_secs());

    if !is_game_directory(game_dir) {
        anyhow::bail!("Game not found in {}", game_dir.display());
    }

    let pipeline = BatchPipeline::new(config).context("Failed to start worker pool")?;
    let roots = existing_roots(game_dir);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let report = BenchmarkLoop::new(&pipeline, roots, target).run_with(|round, totals| {
        spinner.set_message(format!("round {}: {} files", round, totals.succeeded));
    });
    spinner.finish_and_clear();

    println!("Benchmark complete. Results:");
    println!("Total files decrypted: {}", report.files);
    println!("Total size decrypted: {:.2} MB", report.megabytes());
    println!("Decryption speed: {:.2} MB/s", report.throughput());
    println!("Benchmark duration: {} ms", report.elapsed.as_millis());
    if report.totals.failed > 0 {
        println!("Failed decryptions: {}", report.totals.failed);
    }

    Ok(())
}

/// Default asset roots under `game_dir`, reporting the ones that are absent.
fn existing_roots(game_dir: &Path) -> Vec<PathBuf> {
    default_roots(game_dir)
        .into_iter()
        .filter(|root| {
            let exists = root.is_dir();
            if exists {
                println!("Processing directory: {}", root.display());
            } else {
                println!("Error: Directory does not exist: {}", root.display());
            }
            exists
        })
        .collect()
}

fn run_with_progress<S: OutputSink>(
    pipeline: &BatchPipeline,
    roots: &[PathBuf],
    sink: &S,
) -> Result<BatchResult> {
    let discovery = pipeline.discover(roots);
    println!(
        "Decrypting {} files with {} workers...",
        discovery.jobs.len(),
        pipeline.workers()
    );

    let pb = ProgressBar::new(discovery.jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let result = pipeline.run_jobs(&discovery, sink, |_| pb.inc(1));
    pb.finish_with_message("Done");

    Ok(result)
}

fn print_summary(result: &BatchResult) {
    let mb = result.bytes as f64 / (1024.0 * 1024.0);
    println!(
        "Decrypted {} files ({:.2} MB), {} failed, {} skipped",
        result.succeeded, mb, result.failed, result.skipped
    );
    if result.walk_errors > 0 {
        println!("Unreadable directory entries: {}", result.walk_errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrypt_single_writes_recovered_extension() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("Title.k9a");
        let output = dir.path().join("out");
        let data = coffin::k9a::encode(b"\x89PNG", "png", 0, &input).unwrap();
        std::fs::write(&input, data).unwrap();

        decrypt_single(&input, &output).unwrap();

        assert_eq!(std::fs::read(output.join("Title.png")).unwrap(), b"\x89PNG");
    }

    #[test]
    fn test_decrypt_single_rejects_separator_in_extension() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("Title.k9a");
        let output = dir.path().join("out");
        let data = coffin::k9a::encode(b"payload", "a/b", 0, &input).unwrap();
        std::fs::write(&input, data).unwrap();

        assert!(decrypt_single(&input, &output).is_err());
        assert!(!output.exists());
    }
}
