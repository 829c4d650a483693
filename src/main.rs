use flowsim::{ScenarioConfig, Scenario, DirectoryWriter};
use flowsim::{read_positions, time_from_file_name};
use flowsim::bench_move_once;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(about = "Advect particles through a cylinder and write position snapshots")]
struct Args {
    /// Scenario YAML file
    #[arg(short, long, default_value = "scenario.yaml")]
    config: PathBuf,

    /// Initial particle positions
    #[arg(short, long, required_unless_present = "bench")]
    input: Option<PathBuf>,

    /// Output directory for the position snapshots
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Start time; defaults to the time in the input file name, or 0
    #[arg(long)]
    start_time: Option<f64>,

    /// Overwrite existing output
    #[arg(short, long)]
    force: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Time the integrator instead of running a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(path: &Path) -> Result<ScenarioConfig> {
    let file = File::open(path).with_context(|| format!("cannot open scenario {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("invalid scenario {}", path.display()))?;

    if let Some(dir) = path.parent() {
        scenario_cfg.resolve_paths(dir);
    }

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if args.bench {
        bench_move_once();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.config)?;

    let input = args.input.context("no input positions file given")?;
    let positions = read_positions(&input)
        .with_context(|| format!("cannot read particle positions {}", input.display()))?;
    let start_time = args
        .start_time
        .or_else(|| time_from_file_name(&input))
        .unwrap_or(0.0);
    info!("read {} particles from {} (t={start_time})", positions.len(), input.display());

    let mut scenario = Scenario::build_scenario(scenario_cfg, positions, start_time)
        .context("invalid scenario")?;

    let mut writer = DirectoryWriter::new(&args.output, args.force)
        .with_context(|| format!("cannot prepare output directory {}", args.output.display()))?;

    scenario.run(&mut writer).context("advection failed")?;
    info!("wrote {} snapshots to {}", writer.written(), writer.dir().display());

    Ok(())
}
