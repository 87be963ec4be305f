use std::{ env, process };

use eon_planner::{ config::Config, controller::{ self, output, sweep }, debugger, EonResult };

fn main() {
    if let Err(err) = run() {
        debugger::log_alert(&err.to_string());
        process::exit(1);
    }
}

fn run() -> EonResult<()> {
    let args: Vec<String> = env::args().collect();
    let mut config = if args.len() == 2 {
        Config::new(&args[1])?
    } else {
        Config::new("./config.toml")?
    };

    // スレッド数の確認
    let threads = sweep::thread_count(&config.sweep);
    let num_threads = num_cpus::get();
    if config.sweep.enabled && num_threads < threads {
        eprintln!("[WARNING] THREADS: {} is larger than num_cpus: {}.", threads, num_threads);
    }
    eprintln!("SLOT: {}\tK: {}\tTHREADS: {}", config.simulation.frequency_slots, config.simulation.k_shortest_paths, threads);

    output::init_master_dir(&mut config)?;

    let summary = controller::main(&config)?;
    println!(
        "{} accepted / {} blocked of {} demands ({:.4})",
        summary.accepted,
        summary.blocked,
        summary.demands,
        summary.blocking_ratio(),
    );

    Ok(())
}
