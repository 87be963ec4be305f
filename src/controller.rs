use crate::{
    config::Config,
    debugger,
    demand::random_demands_from_seed,
    error::EonResult,
    loader,
    topology::metrics::TopologyReport,
};

pub mod output;
pub mod rmsa;
pub mod simulation;
pub mod sweep;

/// Loads the network, simulates it once and, when enabled, sweeps its
/// augmented topologies. Results go to `config.simulation.outdir`.
pub fn main(config: &Config) -> EonResult<simulation::SimulationSummary> {
    let output_dir = config.simulation.outdir.as_str();
    output::save_config(config, output_dir)?;

    let (mut topology, catalog) = loader::load(config)?;

    let report = TopologyReport::new(&topology);
    debugger::log_analysis(&config.debug, &topology, &report);
    output::save_report(&report, output_dir)?;

    let mut demand_list = random_demands_from_seed(&topology, &config.simulation.data_rates, config.simulation.random_seed);
    let summary = simulation::simulate_logged(
        &mut topology,
        &mut demand_list,
        &catalog,
        config.simulation.k_shortest_paths,
        &config.debug,
    )?;
    output::save_summary(&summary, output_dir)?;
    output::save_demands(&demand_list, output_dir)?;
    output::save_links(&topology, output_dir)?;

    if config.sweep.enabled {
        let sweep_file = format!("{}/sweep.csv", output_dir);
        let sink = if config.sweep.resume_dir.is_empty() {
            output::CsvSink::create(sweep_file)?
        } else {
            output::CsvSink::resume(sweep_file)?
        };
        let written = sweep::run_sweep(config, &topology, &catalog, &sink)?;
        eprintln!("{} candidate topologies written", written);
    }

    Ok(summary)
}
