use clap::Parser;
use nalgebra::Vector3;
use std::path::PathBuf;
use tracing::{debug, info, Level};

use torque_alloc::{
    components::{demand_set, AllocationResult, CraftConfig},
    resources::AllocatorConfig,
    systems::{evaluate_craft, least_squares_limits, sweep, SweepConfig, TorqueAllocator},
};

/// Allocate demanded torques across a craft's engines
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Craft layout YAML file
    #[arg(short, long, conflicts_with = "preset")]
    craft: Option<PathBuf>,

    /// Built-in craft layout: uneven, shuttle, hover or vtol
    #[arg(short, long, default_value = "uneven")]
    preset: String,

    /// Demanded torque as x,y,z (repeatable)
    #[arg(short, long, value_parser = parse_vector, allow_hyphen_values = true)]
    demand: Vec<Vector3<f64>>,

    /// Built-in demand set: vtol_bad or hover_bad
    #[arg(long)]
    demand_set: Option<String>,

    /// Allocator config YAML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Vertical-speed factor
    #[arg(long)]
    vsf: Option<f64>,

    /// Convergence tolerance
    #[arg(long)]
    eps: Option<f64>,

    /// Iteration cap
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Run a seeded random demand sweep with this many samples
    #[arg(long)]
    sweep: Option<usize>,

    /// Seed for the demand sweep
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Per-axis range of sweep demands
    #[arg(long, default_value_t = 100.0)]
    range: f64,

    /// Also print the unconstrained least-squares solution
    #[arg(long)]
    lstsq: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Verbosity of the program:
    /// -v for info, -vv for debug, and -vvv for trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_vector(s: &str) -> Result<Vector3<f64>, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got {s:?}")),
    }
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn print_result(demand: &Vector3<f64>, result: &AllocationResult) {
    println!(
        "demand  [{:+.4}, {:+.4}, {:+.4}]",
        demand.x, demand.y, demand.z
    );
    println!(
        "clamped [{:+.4}, {:+.4}, {:+.4}]",
        result.clamped_demand.x, result.clamped_demand.y, result.clamped_demand.z
    );
    println!(
        "torque  [{:+.4}, {:+.4}, {:+.4}]",
        result.torque.x, result.torque.y, result.torque.z
    );
    println!(
        "error {:.4}, dir error {:.4} deg, {} iterations ({:?})",
        result.error, result.angle_error, result.iterations, result.termination
    );
    println!("limits  {:.4?}", result.limits);
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logging(args.verbose);
    debug!("{args:?}");

    let craft = match &args.craft {
        Some(path) => CraftConfig::from_file(path)?,
        None => CraftConfig::preset(&args.preset)?,
    };
    info!("Craft {} with {} engines", craft.name, craft.engines.len());

    let mut config = match &args.config {
        Some(path) => AllocatorConfig::load(path)?,
        None => AllocatorConfig::default(),
    };
    if let Some(vsf) = args.vsf {
        config.vertical_speed_factor = vsf;
    }
    if let Some(eps) = args.eps {
        config.convergence_eps = eps;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.max_iterations = max_iterations;
    }
    let mut allocator = TorqueAllocator::new(config);
    debug!("{:?}", allocator.config());

    if let Some(samples) = args.sweep {
        let sweep_config = SweepConfig {
            samples,
            range: args.range,
            seed: args.seed,
        };
        let report = sweep(&mut allocator, &craft.engines, &sweep_config)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!(
                "{} samples: mean error {:.2}%, max {:.2}%, mean dir error {:.2} deg, max {:.2} deg",
                report.samples.len(),
                report.mean_error_percent,
                report.max_error_percent,
                report.mean_angle_error,
                report.max_angle_error
            );
        }
        return Ok(());
    }

    let mut demands = args.demand.clone();
    if let Some(name) = &args.demand_set {
        let set = demand_set(name).ok_or_else(|| format!("unknown demand set {name:?}"))?;
        demands.extend(set);
    }
    if demands.is_empty() {
        return Err("no demands given; use --demand, --demand-set or --sweep".into());
    }

    let report = evaluate_craft(&mut allocator, &craft.engines, &demands)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for outcome in &report.outcomes {
            print_result(&outcome.demand, &outcome.result);
        }
        println!(
            "total error: {:.4} ({}/{} converged)",
            report.total_error,
            report.converged,
            report.outcomes.len()
        );
    }

    if args.lstsq {
        for demand in &demands {
            let solution = least_squares_limits(&craft.engines, demand)?;
            if args.json {
                println!("{}", serde_json::to_string(&solution)?);
            } else {
                println!(
                    "lstsq throttles {:.4?}, residual |{:.4}|",
                    solution.throttles,
                    solution.residual.norm()
                );
            }
        }
    }

    Ok(())
}
