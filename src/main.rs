use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use fixed_partition_sim::api::scenario_dto::{ScenarioDto, ScenarioOptionsDto};
use fixed_partition_sim::domain::memory_model::simulation::{DisciplineChoice, RunReport, SimulationInput};
use fixed_partition_sim::loader::generator::RandomScenario;
use fixed_partition_sim::loader::parser::write_json_file;
use fixed_partition_sim::{ClockModel, DisciplineKind, PromotionPolicy, SimulationOptions, StatsCollector, compare_disciplines, load_simulation_input, logger, simulate};

/// Fixed-partition memory allocation simulator (best fit, per-partition or shared waiting queues).
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON scenario file with memorySize, partitions and processes.
    #[arg(long, conflicts_with = "random")]
    scenario: Option<PathBuf>,

    /// Generate a random scenario instead of loading one.
    #[arg(long, requires_all = ["memory_size", "partition_count"])]
    random: bool,

    #[arg(long)]
    memory_size: Option<u64>,

    #[arg(long)]
    partition_count: Option<usize>,

    /// Defaults to a random count between 10 and 20.
    #[arg(long)]
    process_count: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// per-partition, shared or both. Overrides the scenario file.
    #[arg(long)]
    discipline: Option<DisciplineChoice>,

    /// sequential or concurrent. Overrides the scenario file.
    #[arg(long)]
    clock: Option<ClockModel>,

    /// any-free or best-fit-only. Overrides the scenario file.
    #[arg(long)]
    promotion: Option<PromotionPolicy>,

    /// Write per-execution and per-round events as CSV.
    #[arg(long)]
    stats_csv: Option<PathBuf>,

    /// Write the side-by-side metrics of a dual run as CSV.
    #[arg(long)]
    comparison_csv: Option<PathBuf>,

    /// Save the (possibly generated) scenario as JSON.
    #[arg(long)]
    save_scenario: Option<PathBuf>,

    /// Print reports as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let (input, file_options) = read_input(&cli)?;

    let options = ScenarioOptionsDto {
        discipline: cli.discipline.unwrap_or(file_options.discipline),
        clock: cli.clock.unwrap_or(file_options.clock),
        promotion: cli.promotion.unwrap_or(file_options.promotion),
    };
    let run_options = SimulationOptions { clock: options.clock, promotion: options.promotion };

    if let Some(path) = &cli.save_scenario {
        write_json_file(path, &ScenarioDto::from_input(&input, options))?;
        log::info!("Scenario saved to '{}'.", path.display());
    }

    print_input(&input);

    let mut stats = match &cli.stats_csv {
        Some(path) => StatsCollector::to_file(path)?,
        None => StatsCollector::disabled(),
    };

    match options.discipline {
        DisciplineChoice::Both => {
            let comparison = compare_disciplines(&input, run_options, &mut stats)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&comparison)?);
            } else {
                for (kind, result) in [(DisciplineKind::PerPartition, &comparison.per_partition), (DisciplineKind::Shared, &comparison.shared)] {
                    match result {
                        Ok(report) => print_report(report),
                        Err(e) => println!("\n---------- Run failed ({}) ----------\n{}", kind, e),
                    }
                }

                let cell = |value: Option<f64>| value.map_or_else(|| "NA".to_string(), |v| format!("{:.2}", v));
                println!("\n---------- Comparison ----------");
                println!("{:<24}{:>16}{:>16}", "Metric", "Per-Partition", "Shared");
                for (label, multi, single) in comparison.rows() {
                    println!("{:<24}{:>16}{:>16}", label, cell(multi), cell(single));
                }
            }

            if let Some(path) = &cli.comparison_csv {
                comparison.write_csv(File::create(path)?)?;
                log::info!("Comparison written to '{}'.", path.display());
            }

            if let (Err(_), Err(e)) = (&comparison.per_partition, &comparison.shared) {
                anyhow::bail!("no discipline completed the simulation, last error: {}", e);
            }
        }
        choice => {
            for kind in choice.kinds() {
                let report = simulate(&input, kind, run_options, &mut stats)?;
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print_report(&report);
                }
            }
        }
    }

    stats.flush()?;
    Ok(())
}

fn read_input(cli: &Cli) -> anyhow::Result<(SimulationInput, ScenarioOptionsDto)> {
    if cli.random {
        let memory_size = cli.memory_size.ok_or_else(|| anyhow::anyhow!("--random needs --memory-size"))?;
        let partition_count = cli.partition_count.ok_or_else(|| anyhow::anyhow!("--random needs --partition-count"))?;

        let mut scenario = RandomScenario::new(memory_size, partition_count);
        scenario.process_count = cli.process_count;
        scenario.seed = cli.seed;

        let input = scenario.generate();
        input.validate()?;
        return Ok((input, ScenarioOptionsDto::default()));
    }

    match &cli.scenario {
        Some(path) => Ok(load_simulation_input(path)?),
        None => anyhow::bail!("either --scenario FILE or --random is required"),
    }
}

fn print_input(input: &SimulationInput) {
    println!("\n{} process(es):", input.processes.len());
    for (i, process) in input.processes.iter().enumerate() {
        println!("Process {}: Size = {}MB, Time Needed = {:.2}", i + 1, process.size, process.time_needed);
    }

    println!("\n{} partition(s):", input.partitions.len());
    for (i, partition) in input.partitions.iter().enumerate() {
        println!("Partition {}: Size = {}MB", i + 1, partition.size);
    }
}

fn print_report(report: &RunReport) {
    let s = &report.statistics;

    println!("\n---------- Memory Information ({}) ----------", report.discipline);
    println!("Memory Size: {}MB", s.memory_size);
    println!("Used Size: {}MB", s.memory_used);
    println!("Remaining Size: {}MB", s.memory_remaining);
    println!("Utilization: {:.2}%", s.memory_utilization);
    println!("Total Time Needed for Processes: {:.2}", s.total_execution_time);
    println!("Total Running Time: {:.2}", s.total_running_time);
    println!("Total Waiting Time: {:.2}", s.total_waiting_time);
    println!("Time Utilization: {:.2}%", s.time_utilization);
    println!("Busy Utilization: {:.2}%", s.busy_utilization);
    println!("Rounds: {}", s.rounds);

    println!("\nPlacement:");
    for partition in &report.initial_layout.partitions {
        let resident = partition.resident.map(|id| id.to_string()).unwrap_or_else(|| "NONE".to_string());
        let queue: Vec<String> = partition.waiting.iter().map(ToString::to_string).collect();
        println!("{} (size {}MB, occupied {}MB): {} | queue [{}]", partition.id, partition.size, partition.occupied, resident, queue.join(" - "));
    }
    if !report.initial_layout.shared_queue.is_empty() {
        let queue: Vec<String> = report.initial_layout.shared_queue.iter().map(ToString::to_string).collect();
        println!("Shared Waiting Queue: [{}]", queue.join(" - "));
    }

    for warning in &report.warnings {
        println!("Warning: {}", warning);
    }
}
