use std::{
    fs::{ self, File, OpenOptions },
    io::{ Read, Seek, SeekFrom },
    path::Path,
    sync::{ Mutex, PoisonError },
};

use fxhash::FxHashSet;
use serde::Serialize;
use serde_derive::{ Deserialize, Serialize };

use crate::{
    config::Config,
    demand::Demand,
    error::EonResult,
    topology::{ metrics::TopologyReport, Topology },
    utils::generate_id,
};

use super::simulation::SimulationSummary;

/// 出力先ディレクトリを作成し，configに書き戻す
/// 形式は ./{outdir}/{network}/{id}
/// sweep.resume_dirが指定されていればそのディレクトリを再利用する
pub fn init_master_dir(config: &mut Config) -> EonResult<()> {
    let master_dir: String = if config.sweep.resume_dir.is_empty() {
        format!(
            "./{}/{}/{}",
            config.simulation.outdir,
            config.network.name,
            generate_id(),
        )
    } else {
        config.sweep.resume_dir.clone()
    };

    fs::create_dir_all(&master_dir)?;
    config.simulation.outdir = master_dir;

    Ok(())
}

/// config構造体をファイルとして出力する
/// config構造体->TOMLデータ->文字列->ファイル
pub fn save_config(config: &Config, output_dir: &str) -> EonResult<()> {
    let toml_data = toml::Value::try_from(config)?;
    let toml_string = toml::to_string_pretty(&toml_data)?;
    fs::write(format!("{}/config.toml", output_dir), toml_string)?;
    Ok(())
}

pub fn save_report(report: &TopologyReport, output_dir: &str) -> EonResult<()> {
    save_json(report, &format!("{}/report.json", output_dir))
}

pub fn save_summary(summary: &SimulationSummary, output_dir: &str) -> EonResult<()> {
    save_json(summary, &format!("{}/summary.json", output_dir))
}

fn save_json<T: Serialize>(value: &T, filepath: &str) -> EonResult<()> {
    fs::write(filepath, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// One row per demand, in allocation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandRecord {
    pub id: usize,
    pub source: String,
    pub target: String,
    pub data_rate: f64,
    pub status: String,
    pub block_reason: Option<String>,
    /// Node ids joined with `-`
    pub route: Option<String>,
    pub route_length: Option<f64>,
    pub tier: Option<String>,
    pub slot_start: Option<usize>,
    pub slot_count: Option<usize>,
}

impl From<&Demand> for DemandRecord {
    fn from(demand: &Demand) -> Self {
        let allocation = demand.allocation();
        DemandRecord {
            id: demand.id.0,
            source: demand.sd.src.to_string(),
            target: demand.sd.dst.to_string(),
            data_rate: demand.data_rate,
            status: demand.status().to_string(),
            block_reason: demand.block_reason().map(|reason| reason.to_string()),
            route: allocation.map(|a| {
                a.route.nodes.iter().map(|node| node.as_str()).collect::<Vec<_>>().join("-")
            }),
            route_length: allocation.map(|a| a.route.length),
            tier: allocation.map(|a| a.tier.name.clone()),
            slot_start: allocation.map(|a| a.slot_start),
            slot_count: allocation.map(|a| a.slot_count),
        }
    }
}

/// Spectrum use of one link after a simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkRecord {
    pub source: String,
    pub target: String,
    pub length: f64,
    pub capacity: f64,
    pub cost: f64,
    pub occupied_slots: usize,
    pub slot_count: usize,
    /// Gb/s summed over occupied slots
    pub carried_rate: f64,
}

pub fn save_demands(demand_list: &[Demand], output_dir: &str) -> EonResult<()> {
    save_csv(demand_list.iter().map(DemandRecord::from), &format!("{}/demands.csv", output_dir))
}

pub fn save_links(topology: &Topology, output_dir: &str) -> EonResult<()> {
    let records = topology.links().map(|link| LinkRecord {
        source: link.source.to_string(),
        target: link.target.to_string(),
        length: link.length,
        capacity: link.capacity,
        cost: link.cost,
        occupied_slots: link.spectrum.occupied(),
        slot_count: link.spectrum.len(),
        carried_rate: link.spectrum.carried_rate(),
    });
    save_csv(records, &format!("{}/links.csv", output_dir))
}

fn save_csv<T: Serialize>(records: impl Iterator<Item = T>, filepath: &str) -> EonResult<()> {
    let mut writer = csv::Writer::from_path(filepath)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Position of a candidate topology in the sweep enumeration. Stable across
/// runs with the same configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct SweepKey {
    pub seed: usize,
    pub added_links: usize,
    pub index: usize,
}

/// One simulated candidate topology.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRecord {
    /// Index of the seed topology the links were added to
    pub seed: usize,
    pub added_links: usize,
    /// Position among the topologies with the same seed and link count
    pub index: usize,
    pub node_count: usize,
    pub link_count: usize,
    pub mean_degree: f64,
    pub degree_variance: f64,
    pub density: f64,
    pub radius_by_hops: Option<usize>,
    pub diameter_by_hops: Option<usize>,
    pub radius_by_length: Option<f64>,
    pub diameter_by_length: Option<f64>,
    pub min_length: Option<f64>,
    pub max_length: Option<f64>,
    pub edge_connectivity: usize,
    pub demands: usize,
    pub accepted: usize,
    pub blocked: usize,
    pub blocked_no_route: usize,
    pub blocked_no_modulation: usize,
    pub blocked_no_spectrum: usize,
    pub total_data_rate: f64,
    pub success_rate: Option<f64>,
    pub block_rate: Option<f64>,
    /// Added links as `a-b` pairs joined with a space
    pub links: String,
}

impl SweepRecord {
    pub fn new(
        key: SweepKey,
        report: &TopologyReport,
        summary: &SimulationSummary,
        links: String
    ) -> SweepRecord {
        SweepRecord {
            seed: key.seed,
            added_links: key.added_links,
            index: key.index,
            node_count: report.node_count,
            link_count: report.link_count,
            mean_degree: report.mean_degree,
            degree_variance: report.degree_variance,
            density: report.density,
            radius_by_hops: report.radius_by_hops,
            diameter_by_hops: report.diameter_by_hops,
            radius_by_length: report.radius_by_length,
            diameter_by_length: report.diameter_by_length,
            min_length: report.min_length,
            max_length: report.max_length,
            edge_connectivity: report.edge_connectivity,
            demands: summary.demands,
            accepted: summary.accepted,
            blocked: summary.blocked,
            blocked_no_route: summary.blocked_no_route,
            blocked_no_modulation: summary.blocked_no_modulation,
            blocked_no_spectrum: summary.blocked_no_spectrum,
            total_data_rate: summary.total_data_rate,
            success_rate: summary.success_rate,
            block_rate: summary.block_rate,
            links,
        }
    }
}

impl SweepRecord {
    pub fn key(&self) -> SweepKey {
        SweepKey {
            seed: self.seed,
            added_links: self.added_links,
            index: self.index,
        }
    }
}

/// Append-only destination of sweep records, shared by every worker.
pub trait RecordSink: Send + Sync {
    fn write(&self, record: &SweepRecord) -> EonResult<()>;

    /// Whether the record at `key` was written by an earlier run.
    fn contains(&self, _key: &SweepKey) -> bool {
        false
    }
}

/// CSV file written one flushed record at a time.
pub struct CsvSink {
    writer: Mutex<csv::Writer<File>>,
    done: FxHashSet<SweepKey>,
}

impl CsvSink {
    /// Starts a new file, truncating an existing one.
    pub fn create(filepath: impl AsRef<Path>) -> EonResult<CsvSink> {
        Ok(CsvSink {
            writer: Mutex::new(csv::Writer::from_path(filepath)?),
            done: FxHashSet::default(),
        })
    }

    /// Continues the file of an interrupted sweep.
    ///
    /// A trailing partial row is cut off. Complete rows are kept and their
    /// keys reported by `contains`. A missing or empty file is created.
    pub fn resume(filepath: impl AsRef<Path>) -> EonResult<CsvSink> {
        let filepath = filepath.as_ref();
        let mut file = match OpenOptions::new().read(true).write(true).open(filepath) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::create(filepath),
            Err(err) => return Err(err.into()),
        };

        let mut contents = vec![];
        file.read_to_end(&mut contents)?;
        let complete = contents.iter().rposition(|&b| b == b'\n').map_or(0, |end| end + 1);
        if complete == 0 {
            return Self::create(filepath);
        }
        contents.truncate(complete);
        file.set_len(complete as u64)?;
        file.seek(SeekFrom::End(0))?;

        let done = csv::Reader::from_reader(contents.as_slice())
            .deserialize::<SweepKey>()
            .filter_map(Result::ok)
            .collect();

        let writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        Ok(CsvSink {
            writer: Mutex::new(writer),
            done,
        })
    }
}

impl RecordSink for CsvSink {
    fn write(&self, record: &SweepRecord) -> EonResult<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    fn contains(&self, key: &SweepKey) -> bool {
        self.done.contains(key)
    }
}

#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<SweepRecord>>,
}

impl MemorySink {
    pub fn into_records(self) -> Vec<SweepRecord> {
        self.records.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordSink for MemorySink {
    fn write(&self, record: &SweepRecord) -> EonResult<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        controller::simulation::simulate,
        demand::{ BlockReason, DemandId },
        eon_core::SD,
        modulation::{ ModulationCatalog, ModulationTier },
    };

    fn line() -> Topology {
        let mut topology = Topology::new("line", 2).unwrap();
        for (id, lon) in [("A", 0.0), ("B", 1.0), ("C", 2.0)] {
            topology.add_node(id.into(), 0.0, lon, "core").unwrap();
        }
        topology.add_link(&"A".into(), &"B".into(), Some(80.0), 1.0, 1.0).unwrap();
        topology.add_link(&"B".into(), &"C".into(), Some(80.0), 1.0, 1.0).unwrap();
        topology
    }

    #[test]
    fn demand_records() {
        let mut topology = line();
        let catalog = ModulationCatalog::new(vec![ModulationTier::new("QPSK", 100.0, 100.0)]).unwrap();
        let mut demand_list = vec![
            Demand::new(DemandId(0), SD::new("A".into(), "B".into()), 150.0),
            Demand::new(DemandId(1), SD::new("A".into(), "C".into()), 100.0),
        ];
        simulate(&mut topology, &mut demand_list, &catalog, 2).unwrap();

        let accepted = DemandRecord::from(&demand_list[0]);
        assert_eq!(accepted.status, "accepted");
        assert_eq!(accepted.route.as_deref(), Some("A-B"));
        assert_eq!(accepted.tier.as_deref(), Some("QPSK"));
        assert_eq!((accepted.slot_start, accepted.slot_count), (Some(0), Some(2)));
        assert_eq!(accepted.block_reason, None);

        let blocked = DemandRecord::from(&demand_list[1]);
        assert_eq!(blocked.block_reason, Some(BlockReason::NoModulation.to_string()));
        assert_eq!(blocked.route, None);
        assert_eq!(blocked.slot_start, None);
    }

    #[test]
    fn files_are_written() {
        let dir = std::env::temp_dir().join(format!("eon_planner_output_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let dir_str = dir.to_str().unwrap();

        let topology = line();
        save_links(&topology, dir_str).unwrap();
        save_report(&TopologyReport::new(&topology), dir_str).unwrap();

        let links = fs::read_to_string(dir.join("links.csv")).unwrap();
        assert!(links.starts_with("source,target,length,capacity,cost,occupied_slots,slot_count,carried_rate"));
        assert_eq!(links.lines().count(), 3);

        let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(dir.join("report.json")).unwrap()).unwrap();
        assert_eq!(report["link_count"], 2);
        assert_eq!(report["diameter_by_hops"], 2);

        let sink = CsvSink::create(dir.join("sweep.csv")).unwrap();
        let record = SweepRecord::new(
            SweepKey { seed: 0, added_links: 0, index: 0 },
            &TopologyReport::new(&topology),
            &SimulationSummary::default(),
            String::new(),
        );
        sink.write(&record).unwrap();
        sink.write(&record).unwrap();
        let sweep = fs::read_to_string(dir.join("sweep.csv")).unwrap();
        assert_eq!(sweep.lines().count(), 3);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn resumed_file_keeps_complete_rows() {
        let path = std::env::temp_dir().join(format!("eon_planner_resume_{}.csv", std::process::id()));
        let topology = line();
        let report = TopologyReport::new(&topology);
        let record = |index| {
            SweepRecord::new(
                SweepKey { seed: 0, added_links: 1, index },
                &report,
                &SimulationSummary::default(),
                "A-C".to_string(),
            )
        };

        let sink = CsvSink::create(&path).unwrap();
        for index in 0..3 {
            sink.write(&record(index)).unwrap();
        }
        drop(sink);

        // an interrupted write leaves half a row behind
        let mut contents = fs::read_to_string(&path).unwrap();
        contents.push_str("0,1,3,3,2");
        fs::write(&path, &contents).unwrap();

        let resumed = CsvSink::resume(&path).unwrap();
        assert!(resumed.contains(&record(2).key()));
        assert!(!resumed.contains(&record(3).key()));
        resumed.write(&record(3)).unwrap();
        drop(resumed);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let keys: Vec<SweepKey> = reader.deserialize().map(Result::unwrap).collect();
        assert_eq!(keys.iter().map(|key| key.index).collect::<Vec<_>>(), vec![0, 1, 2, 3]);

        fs::remove_file(&path).unwrap();
        let fresh = CsvSink::resume(&path).unwrap();
        assert!(!fresh.contains(&record(0).key()));
        drop(fresh);
        fs::remove_file(&path).unwrap();
    }
}
