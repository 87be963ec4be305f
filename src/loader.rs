//! Node, link and modulation tier tables.
//!
//! Columns are looked up by the names in `[columns]`. A table whose first
//! row names none of them has no header, and its columns are read in the
//! canonical order. A header that lacks a required column is an error.

use std::{ fs, path::Path, str::FromStr };

use csv::{ ReaderBuilder, StringRecord, Trim };

use crate::{
    config::{ columns_config::ColumnsConfig, Config },
    eon_core::NodeId,
    error::{ EonError, EonResult },
    modulation::{ ModulationCatalog, ModulationTier },
    topology::Topology,
};

/// Capacity and cost of a link row that leaves them empty.
const DEFAULT_LINK_WEIGHT: f64 = 1.0;

/// Topology and modulation catalog named by `[network]`.
pub fn load(config: &Config) -> EonResult<(Topology, ModulationCatalog)> {
    let topology = load_topology(config)?;
    let catalog = load_modulation_catalog(&config.network.modulation_filepath, &config.columns)?;
    Ok((topology, catalog))
}

pub fn load_topology(config: &Config) -> EonResult<Topology> {
    let mut topology = Topology::new(&config.network.name, config.simulation.frequency_slots)?;

    let nodes = read_table(&config.network.nodes_filepath)?;
    read_nodes(&mut topology, &nodes, &config.columns)?;

    if !config.network.links_filepath.is_empty() {
        let links = read_table(&config.network.links_filepath)?;
        read_links(&mut topology, &links, &config.columns)?;
    }

    Ok(topology)
}

pub fn load_modulation_catalog(filepath: &str, columns: &ColumnsConfig) -> EonResult<ModulationCatalog> {
    let tiers = read_table(filepath)?;
    read_tiers(&tiers, columns)
}

/// File contents as text. Tables exported as Latin-1 are mapped byte by byte.
fn read_table(filepath: impl AsRef<Path>) -> EonResult<String> {
    let bytes = fs::read(filepath)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
    })
}

pub fn read_nodes(topology: &mut Topology, table: &str, columns: &ColumnsConfig) -> EonResult<()> {
    let (header, records) = Header::read(
        table,
        "nodes",
        [&columns.node_id, &columns.node_lat, &columns.node_lon, &columns.node_type],
        [true, true, true, false],
    )?;

    for record in &records {
        topology.add_node(
            NodeId::new(header.text(record, 0)?),
            header.parse(record, 1)?,
            header.parse(record, 2)?,
            header.field(record, 3).unwrap_or_default(),
        )?;
    }

    Ok(())
}

pub fn read_links(topology: &mut Topology, table: &str, columns: &ColumnsConfig) -> EonResult<()> {
    let (header, records) = Header::read(
        table,
        "links",
        [&columns.link_from, &columns.link_to, &columns.link_length, &columns.link_capacity, &columns.link_cost],
        [true, true, false, false, false],
    )?;

    for record in &records {
        topology.add_link(
            &NodeId::new(header.text(record, 0)?),
            &NodeId::new(header.text(record, 1)?),
            header.parse_optional(record, 2)?,
            header.parse_optional(record, 3)?.unwrap_or(DEFAULT_LINK_WEIGHT),
            header.parse_optional(record, 4)?.unwrap_or(DEFAULT_LINK_WEIGHT),
        )?;
    }

    Ok(())
}

pub fn read_tiers(table: &str, columns: &ColumnsConfig) -> EonResult<ModulationCatalog> {
    let (header, records) = Header::read(
        table,
        "modulation tiers",
        [
            &columns.tier_name,
            &columns.tier_data_rate,
            &columns.tier_power,
            &columns.tier_reach,
            &columns.tier_spectral_efficiency,
        ],
        [true, true, false, true, false],
    )?;

    let mut tiers = vec![];
    for record in &records {
        tiers.push(ModulationTier {
            name: header.text(record, 0)?.to_string(),
            data_rate: header.parse(record, 1)?,
            power_consumption: header.parse_optional(record, 2)?.unwrap_or_default(),
            reach: header.parse(record, 3)?,
            spectral_efficiency: header.parse_optional(record, 4)?.unwrap_or_default(),
        });
    }

    ModulationCatalog::new(tiers)
}

/// Resolved positions of the configured columns of one table.
struct Header<const N: usize> {
    table: &'static str,
    names: [String; N],
    indices: [Option<usize>; N],
}

impl<const N: usize> Header<N> {
    /// Splits `text` into its header and data rows.
    ///
    /// The first row is a header when one of its cells is a configured
    /// column name. Otherwise every row is data and columns sit at their
    /// canonical positions.
    fn read(
        text: &str,
        table: &'static str,
        names: [&String; N],
        required: [bool; N],
    ) -> EonResult<(Header<N>, Vec<StringRecord>)> {
        let mut records = ReaderBuilder::new()
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes())
            .into_records()
            .collect::<Result<Vec<_>, _>>()?;

        let names = names.map(String::clone);
        let has_header = records
            .first()
            .map_or(false, |first| first.iter().any(|cell| names.iter().any(|name| name == cell)));

        let indices = if has_header {
            let header = records.remove(0);
            names.clone().map(|name| header.iter().position(|cell| cell == name))
        } else {
            std::array::from_fn(Some)
        };

        for (column, &is_required) in required.iter().enumerate() {
            if is_required && indices[column].is_none() {
                return Err(EonError::MissingColumn(names[column].clone(), table.to_string()));
            }
        }

        Ok((Header { table, names, indices }, records))
    }

    fn field<'r>(&self, record: &'r StringRecord, column: usize) -> Option<&'r str> {
        self.indices[column].and_then(|index| record.get(index))
    }

    fn text<'r>(&self, record: &'r StringRecord, column: usize) -> EonResult<&'r str> {
        match self.field(record, column) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(EonError::MissingColumn(self.names[column].clone(), self.table.to_string())),
        }
    }

    fn parse<T: FromStr>(&self, record: &StringRecord, column: usize) -> EonResult<T> {
        let value = self.text(record, column)?;
        value.parse().map_err(|_| EonError::InvalidField {
            column: self.names[column].clone(),
            value: value.to_string(),
        })
    }

    fn parse_optional<T: FromStr>(&self, record: &StringRecord, column: usize) -> EonResult<Option<T>> {
        match self.field(record, column) {
            None | Some("") => Ok(None),
            Some(_) => self.parse(record, column).map(Some),
        }
    }
}
