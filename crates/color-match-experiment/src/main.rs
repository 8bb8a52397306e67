//! Color-Match Experiment CLI.
//!
//! Commands:
//! - simulate: drive a full session with a synthetic participant
//! - inspect: display the color pool grid and background pairs

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use color_match_experiment::background::build_pairs;
use color_match_experiment::pool::ColorPool;
use color_match_experiment::session::{
    ExitOutcome, ExperimentSession, SessionConfig, SubmitOutcome,
};

#[derive(Parser)]
#[command(name = "color-match-experiment")]
#[command(version)]
#[command(about = "Color-matching perception experiment engine")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full session with a synthetic participant
    Simulate {
        /// Random seed for the session (sampling and shuffling)
        #[arg(long)]
        seed: Option<u64>,

        /// Directory the CSV export is written into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Upper bound on slider adjustments per trial
        #[arg(long, default_value = "4")]
        adjustments: u32,

        /// Confirm an early exit after this many submitted trials
        #[arg(long)]
        exit_after: Option<usize>,
    },

    /// Display the color pool grid and the background pairs
    Inspect,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    match cli.command {
        Commands::Simulate {
            seed,
            out_dir,
            adjustments,
            exit_after,
        } => run_simulation(seed, out_dir, adjustments, exit_after),
        Commands::Inspect => {
            let mut pool = ColorPool::new();
            println!("Color pool ({} swatches):", pool.remaining());
            let mut rng = StdRng::seed_from_u64(0);
            while let Ok(swatch) = pool.sample(&mut rng) {
                println!("  {swatch}");
            }

            println!("\nBackground pairs:");
            for (i, pair) in build_pairs().iter().enumerate() {
                println!("  {}: left={} right={}", i, pair.left, pair.right);
            }
            Ok(())
        }
    }
}

/// Drive a session to completion (or early exit) with random slider moves.
fn run_simulation(
    seed: Option<u64>,
    out_dir: PathBuf,
    adjustments: u32,
    exit_after: Option<usize>,
) -> Result<()> {
    let mut session = ExperimentSession::start(SessionConfig {
        seed,
        output_dir: out_dir,
    })?;

    // The synthetic participant gets its own stream so its behavior does
    // not perturb the session's sampling sequence.
    let mut participant: Box<dyn RngCore> = match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed.wrapping_add(1))),
        None => Box::new(rand::rng()),
    };

    let mut submitted = 0usize;
    loop {
        let tweaks = participant.random_range(0..=adjustments);
        for _ in 0..tweaks {
            // Slider granularity is one decimal, like the real controls.
            let value = (participant.random_range(0.0..=1000.0_f64)).round() / 10.0;
            if participant.random_bool(0.5) {
                session.adjust_saturation(value)?;
            } else {
                session.adjust_brightness(value)?;
            }
        }

        match session.submit_trial()? {
            SubmitOutcome::Continued => {}
            SubmitOutcome::RestBreak => {
                info!(group = session.displayed_group(), "taking the rest break");
                session.acknowledge_rest()?;
            }
            SubmitOutcome::Completed { export_path } => {
                println!("Session complete. Log saved to {}", export_path.display());
                break;
            }
        }
        submitted += 1;

        if exit_after == Some(submitted) {
            match session.request_exit(true)? {
                ExitOutcome::Terminated { export_path } => {
                    println!(
                        "Exited after {} trials. Log saved to {}",
                        submitted,
                        export_path.display()
                    );
                }
                ExitOutcome::Cancelled => {}
            }
            break;
        }
    }

    println!("{}", serde_json::to_string_pretty(&session.summary())?);
    Ok(())
}
