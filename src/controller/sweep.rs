//! Parallel simulation of augmented topologies.
//!
//! Work items are `(seed topology, number of added links)` pairs. Workers of a
//! fixed pool take the next item from a shared counter, enumerate its link
//! sets lazily and write one record per simulated topology.

use std::sync::atomic::{ AtomicUsize, Ordering };

use itertools::Itertools;
use rayon::ThreadPoolBuilder;

use crate::{
    candidate::{
        augmented_topologies, candidate_link_sets, candidate_links, cycle_link_sets, CandidateLink, ConnectivityBounds,
    },
    config::{ sweep_config::SweepConfig, Config },
    debugger,
    demand::{ random_demands_from_seed, Demand },
    error::EonResult,
    modulation::ModulationCatalog,
    topology::{ metrics::TopologyReport, Topology },
    utils,
};

use super::{
    output::{ RecordSink, SweepKey, SweepRecord },
    simulation::simulate_logged,
};

/// Topologies the candidate links are added to.
///
/// The loaded topology itself, or with `from_cycle` up to `max_cycles`
/// Hamiltonian cycles laid over it. Cycle links already present are kept.
pub fn seed_topologies(topology: &Topology, sweep: &SweepConfig) -> EonResult<Vec<Topology>> {
    if !sweep.from_cycle {
        let mut seed = topology.clone();
        seed.reset_spectrum();
        return Ok(vec![seed]);
    }

    let cycles = cycle_link_sets(topology, sweep.max_length)
        .take(sweep.max_cycles)
        .map(|links| {
            links
                .into_iter()
                .filter(|link| !topology.has_link(&link.source, &link.target))
                .collect::<Vec<_>>()
        });

    augmented_topologies(topology, cycles, sweep.link_capacity, sweep.link_cost, ConnectivityBounds::default()).collect()
}

/// `(seed index, link count)` pairs, smallest link counts first.
pub fn work_items(candidates: &[Vec<CandidateLink>], sweep: &SweepConfig) -> Vec<(usize, usize)> {
    let mut items = vec![];
    for (seed, links) in candidates.iter().enumerate() {
        let max_links = match sweep.max_links {
            0 => links.len(),
            n => n.min(links.len()),
        };
        items.extend((sweep.min_links..=max_links).map(|n| (seed, n)));
    }
    items.sort_by_key(|&(seed, n)| (n, seed));
    items
}

pub fn thread_count(sweep: &SweepConfig) -> usize {
    match sweep.threads {
        0 => num_cpus::get(),
        n => n,
    }
}

/// Simulates every candidate topology and returns the number of records
/// written. Records that fail to write are reported and skipped, records the
/// sink already holds are not simulated again.
pub fn run_sweep(
    config: &Config,
    topology: &Topology,
    catalog: &ModulationCatalog,
    sink: &dyn RecordSink
) -> EonResult<usize> {
    let sweep = &config.sweep;
    let demand_list = random_demands_from_seed(topology, &config.simulation.data_rates, config.simulation.random_seed);

    let seeds = seed_topologies(topology, sweep)?;
    let candidates: Vec<Vec<CandidateLink>> = seeds
        .iter()
        .map(|seed| candidate_links(seed, sweep.max_length))
        .collect();
    let items = work_items(&candidates, sweep);

    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count(sweep))
        .build()?;

    let pb = utils::progress_bar(items.len() as u64);
    let next_item = AtomicUsize::new(0);
    let written = AtomicUsize::new(0);

    pool.broadcast(|_| {
        loop {
            let index = next_item.fetch_add(1, Ordering::Relaxed);
            let Some(&(seed, n)) = items.get(index) else {
                break;
            };

            let worker = SweepWorker {
                config,
                catalog,
                sink,
                demand_list: &demand_list,
                seed_index: seed,
                seed: &seeds[seed],
            };
            written.fetch_add(worker.run(&candidates[seed], n), Ordering::Relaxed);

            pb.inc(1);
        }
    });
    pb.finish();

    Ok(written.into_inner())
}

struct SweepWorker<'a> {
    config: &'a Config,
    catalog: &'a ModulationCatalog,
    sink: &'a dyn RecordSink,
    demand_list: &'a [Demand],
    seed_index: usize,
    seed: &'a Topology,
}

impl SweepWorker<'_> {
    /// Simulates every topology with `n` of `candidates` added.
    fn run(&self, candidates: &[CandidateLink], n: usize) -> usize {
        let sweep = &self.config.sweep;
        let topologies = augmented_topologies(
            self.seed,
            candidate_link_sets(candidates, n),
            sweep.link_capacity,
            sweep.link_cost,
            sweep.connectivity_bounds(),
        );

        let mut written = 0;
        for (index, topology) in topologies.enumerate() {
            let key = SweepKey { seed: self.seed_index, added_links: n, index };
            if self.sink.contains(&key) {
                continue;
            }

            let result = topology.and_then(|topology| self.simulate(topology, key));
            match result {
                Ok(()) => written += 1,
                Err(err) => debugger::log_alert(&format!("seed {} with {} links, #{}: {}", self.seed_index, n, index, err)),
            }
        }
        written
    }

    fn simulate(&self, mut topology: Topology, key: SweepKey) -> EonResult<()> {
        let mut demand_list = self.demand_list.to_vec();
        let summary = simulate_logged(
            &mut topology,
            &mut demand_list,
            self.catalog,
            self.config.simulation.k_shortest_paths,
            &self.config.debug,
        )?;
        debugger::log_candidate(&self.config.debug, self.seed_index, &topology, &summary);

        let added = topology
            .links()
            .filter(|link| !self.seed.has_link(&link.source, &link.target))
            .map(|link| format!("{}-{}", link.source, link.target))
            .join(" ");

        let report = TopologyReport::new(&topology);
        self.sink.write(&SweepRecord::new(key, &report, &summary, added))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashSet;

    use crate::{
        controller::output::{ CsvSink, MemorySink },
        error::EonError,
        modulation::ModulationTier,
    };

    fn config(sweep: SweepConfig) -> Config {
        let mut config = Config::from_toml(r#"
            [simulation]
            random_seed = 7
            outdir = "results"
            frequency_slots = 4
            data_rates = [100.0, 200.0]

            [network]
            name = "square"
            nodes_filepath = ""
            modulation_filepath = ""
        "#).unwrap();
        config.sweep = sweep;
        config
    }

    fn square() -> Topology {
        let mut topology = Topology::new("square", 4).unwrap();
        for (i, (lat, lon)) in [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)].into_iter().enumerate() {
            topology.add_node(i.into(), lat, lon, "core").unwrap();
        }
        topology
    }

    fn catalog() -> ModulationCatalog {
        ModulationCatalog::new(vec![ModulationTier::new("QPSK", 100.0, 1000.0)]).unwrap()
    }

    fn records(config: &Config, topology: &Topology) -> Vec<SweepRecord> {
        let sink = MemorySink::default();
        let written = run_sweep(config, topology, &catalog(), &sink).unwrap();
        let mut records = sink.into_records();
        assert_eq!(written, records.len());
        records.sort_by(|a, b| (a.seed, a.added_links, &a.links).cmp(&(b.seed, b.added_links, &b.links)));
        records
    }

    #[test]
    fn single_links_on_empty_topology() {
        let config = config(SweepConfig {
            enabled: true,
            min_links: 1,
            max_links: 1,
            threads: 2,
            ..Default::default()
        });
        let records = records(&config, &square());

        assert_eq!(records.len(), 6);
        assert!(records.iter().all(|record| record.link_count == 1 && record.added_links == 1));
        // 6 demands, exactly one of them has a route
        assert!(records.iter().all(|record| record.demands == 6 && record.accepted == 1));
        assert!(records.iter().all(|record| record.blocked_no_route == 5));
    }

    #[test]
    fn sweep_is_deterministic() {
        let config = config(SweepConfig {
            enabled: true,
            min_links: 2,
            max_links: 3,
            threads: 3,
            ..Default::default()
        });
        let first = records(&config, &square());
        let second = records(&config, &square());

        assert_eq!(first.len(), 15 + 20);
        assert_eq!(first, second);
    }

    #[test]
    fn cycle_seeds() {
        let config = config(SweepConfig {
            enabled: true,
            max_length: Some(120.0),
            min_edge_connectivity: Some(2),
            from_cycle: true,
            max_cycles: 5,
            threads: 1,
            ..Default::default()
        });

        let seeds = seed_topologies(&square(), &config.sweep).unwrap();
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].link_count(), 4);

        // diagonals exceed max_length, only the bare ring is left
        let records = records(&config, &square());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].link_count, 4);
        assert_eq!(records[0].edge_connectivity, 2);
        assert_eq!(records[0].links, "");
    }

    #[test]
    fn work_items_are_bounded_by_candidates() {
        let links = candidate_links(&square(), None);
        let sweep = SweepConfig { min_links: 5, max_links: 9, ..Default::default() };
        assert_eq!(work_items(&[links.clone()], &sweep), vec![(0, 5), (0, 6)]);

        let all = SweepConfig::default();
        assert_eq!(work_items(&[links.clone(), links], &all).len(), 14);
        assert_eq!(work_items(&[vec![]], &SweepConfig { min_links: 1, ..Default::default() }), vec![]);
    }

    /// Refuses one record and keeps the rest.
    struct RefusingSink {
        refused: SweepKey,
        inner: MemorySink,
    }

    impl RecordSink for RefusingSink {
        fn write(&self, record: &SweepRecord) -> EonResult<()> {
            if record.key() == self.refused {
                return Err(EonError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")));
            }
            self.inner.write(record)
        }
    }

    #[test]
    fn failed_write_skips_only_that_record() {
        let config = config(SweepConfig {
            enabled: true,
            min_links: 1,
            max_links: 1,
            threads: 2,
            ..Default::default()
        });
        let refused = SweepKey { seed: 0, added_links: 1, index: 2 };
        let sink = RefusingSink { refused, inner: MemorySink::default() };

        let written = run_sweep(&config, &square(), &catalog(), &sink).unwrap();
        let records = sink.inner.into_records();

        assert_eq!(written, 5);
        assert_eq!(records.len(), 5);
        assert!(records.iter().all(|record| record.key() != refused));
        let indices: FxHashSet<usize> = records.iter().map(|record| record.index).collect();
        assert_eq!(indices, [0, 1, 3, 4, 5].into_iter().collect::<FxHashSet<usize>>());
    }

    #[test]
    fn connectivity_ceiling_from_config() {
        let config = config(SweepConfig {
            enabled: true,
            min_links: 4,
            max_links: 4,
            max_edge_connectivity: Some(1),
            threads: 2,
            ..Default::default()
        });
        let records = records(&config, &square());

        // a triangle plus a pendant link: 4 triangles, 3 ways to attach the
        // last node. The three 4-rings are excluded.
        assert_eq!(records.len(), 12);
        assert!(records.iter().all(|record| record.edge_connectivity == 1));
    }

    #[test]
    fn interrupted_sweep_is_resumed() {
        let config = config(SweepConfig {
            enabled: true,
            min_links: 2,
            max_links: 2,
            threads: 2,
            ..Default::default()
        });
        let path = std::env::temp_dir().join(format!("eon_planner_sweep_resume_{}.csv", std::process::id()));

        let sink = CsvSink::create(&path).unwrap();
        assert_eq!(run_sweep(&config, &square(), &catalog(), &sink).unwrap(), 15);
        drop(sink);

        // header and four records survive the interruption
        let contents = std::fs::read_to_string(&path).unwrap();
        let kept: Vec<&str> = contents.lines().take(5).collect();
        std::fs::write(&path, kept.join("\n") + "\n").unwrap();

        let sink = CsvSink::resume(&path).unwrap();
        assert_eq!(run_sweep(&config, &square(), &catalog(), &sink).unwrap(), 11);
        drop(sink);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let keys: Vec<SweepKey> = reader.deserialize().map(Result::unwrap).collect();
        let distinct: FxHashSet<SweepKey> = keys.iter().copied().collect();
        assert_eq!(keys.len(), 15);
        assert_eq!(distinct.len(), 15);

        std::fs::remove_file(&path).unwrap();
    }
}
