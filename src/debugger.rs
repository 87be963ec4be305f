use console::style;
use itertools::Itertools;

use crate::{
    config::debug_config::DebugConfig,
    controller::simulation::SimulationSummary,
    demand::Demand,
    topology::{ metrics::TopologyReport, Topology },
};

pub fn log_alert(msg: &str) {
    println!("{:>8}| {}", style("ALERT").red(), style(msg).bold());
}

pub fn log_demand_assign(debug: &DebugConfig, demand: &Demand) {
    if debug.log_demand_assign {
        if let Some(allocation) = demand.allocation() {
            println!(
                "{:>8}|{:5} {} {:?} {} [{}]",
                style("ASSIGN").green(),
                demand.id,
                demand,
                allocation.slot_range(),
                allocation.tier,
                allocation.route.nodes.iter().join("-"),
            );
        }
    }
}

pub fn log_demand_block(debug: &DebugConfig, demand: &Demand) {
    if debug.log_demand_block {
        println!("{:>8}|{:5} {} {}", style("BLOCK").red(), demand.id, demand, demand.status());
    }
}

pub fn log_candidate(debug: &DebugConfig, seed: usize, topology: &Topology, summary: &SimulationSummary) {
    if debug.log_candidate {
        println!(
            "{:>8}|{:3} {:3} {:5} {:5} {:.5}",
            style("CANDIDATE").yellow(),
            seed,
            topology.link_count(),
            summary.accepted,
            summary.blocked,
            summary.blocking_ratio(),
        );
    }
}

pub fn log_analysis(debug: &DebugConfig, topology: &Topology, report: &TopologyReport) {
    if debug.log_analysis {
        println!(
            "{:>8}| {} {:3} {:3} {:.3} {:.3} {:?} {:?} {}",
            style("ANALYSIS").blue(),
            topology.name,
            report.node_count,
            report.link_count,
            report.mean_degree,
            report.density,
            report.diameter_by_hops,
            report.diameter_by_length.map(|d| d.round()),
            report.edge_connectivity,
        );
    }
}

pub fn log_spectrum(debug: &DebugConfig, topology: &Topology) {
    if debug.log_spectrum {
        for (index, link) in topology.links().enumerate() {
            println!(
                "{:>8}|{index:3} | {} | {} {:3}/{:3}",
                style("SPECTRUM").magenta(),
                link.edge(),
                link.spectrum,
                link.spectrum.occupied(),
                link.spectrum.len(),
            );
        }
    }
}
