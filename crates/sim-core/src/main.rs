//! Residential Sorting Simulation
//!
//! CLI driver: selects a boundary, places the configured population, runs
//! the requested number of steps, and writes a snapshot after population
//! and after each snapshot interval for the external renderer.

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::PathBuf;

use sim_core::config::DEFAULT_TUNING_PATH;
use sim_core::output;
use sim_core::provider::{BoundaryFile, BoundaryProvider, BoundarySelection, BuiltinBoundaries};
use sim_core::setup;
use sim_core::systems::run_step;
use sim_core::{SimConfig, SimRng};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "sorting_sim")]
#[command(about = "A residential sorting simulation over polygonal districts")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of steps to simulate (overrides the tuning file)
    #[arg(long)]
    steps: Option<u64>,

    /// Boundary to run in: a name, or an index into the provider
    #[arg(long, default_value = "square_district")]
    boundary: String,

    /// JSON file of named boundaries (defaults to the built-in districts)
    #[arg(long)]
    boundary_file: Option<PathBuf>,

    /// Tuning file path
    #[arg(long, default_value = DEFAULT_TUNING_PATH)]
    config: PathBuf,

    /// Interval between snapshots, in steps (overrides the tuning file)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Output directory for snapshots
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = SimConfig::load_or_default(&args.config)?;
    if let Some(steps) = args.steps {
        config.simulation.steps = steps;
    }
    if let Some(interval) = args.snapshot_interval {
        config.simulation.snapshot_interval = interval;
    }
    config.validate()?;

    let selection = BoundarySelection::parse(&args.boundary);
    let boundary = match &args.boundary_file {
        Some(path) => BoundaryFile::load(path)?.load(&selection)?,
        None => BuiltinBoundaries.load(&selection)?,
    };

    println!("Residential Sorting Simulation");
    println!("==============================");
    println!("Seed: {}", args.seed);
    println!("Steps: {}", config.simulation.steps);
    println!("Boundary: {}", boundary.name);
    let bounds = boundary.geometry.bounds();
    println!(
        "Bounds: ({}, {}) to ({}, {})",
        bounds.min().x,
        bounds.min().y,
        bounds.max().x,
        bounds.max().y
    );
    println!();

    let mut rng = SimRng(SmallRng::seed_from_u64(args.seed));

    println!("Placing agents...");
    let steps = config.simulation.steps;
    let mut world = setup::build_world(config, boundary, &mut rng.0)?;
    let summary = setup::spawn_summary(&world);
    println!("  Placed {} agents", summary.total_agents);
    for (group, count) in &summary.by_group {
        println!("    {}: {}", group, count);
    }

    let initial = output::generate_snapshot(&mut world, 0, "population");
    output::write_snapshot_to_dir(&initial, &args.output_dir)?;
    output::write_current_state(&initial, &args.output_dir)?;
    println!("  Wrote initial snapshot (step 0)");

    println!();
    println!("Starting simulation...");
    println!();

    for step in 1..=steps {
        let report = run_step(&mut world, &mut rng.0);
        println!(
            "[Step {:>4}] moved: {}, rejected: {}, projected: {}",
            step, report.moved, report.rejected, report.projected
        );

        let due = world
            .resource::<output::SnapshotTracker>()
            .should_snapshot(step);
        if due && step != steps {
            let snapshot = output::generate_snapshot(&mut world, step, "periodic");
            output::write_snapshot_to_dir(&snapshot, &args.output_dir)?;
            output::write_current_state(&snapshot, &args.output_dir)?;
        }
    }

    let final_snapshot = output::generate_snapshot(&mut world, steps, "run_end");
    output::write_snapshot_to_dir(&final_snapshot, &args.output_dir)?;
    output::write_current_state(&final_snapshot, &args.output_dir)?;

    println!();
    println!("Simulation complete. Ran {} steps.", steps);
    let tracker = world.resource::<output::SnapshotTracker>();
    println!("Generated {} snapshots.", tracker.snapshot_count());

    Ok(())
}
