use thiserror::Error;

use crate::eon_core::{Edge, NodeId};

/// Structural failures. Blocking outcomes of the RMSA engine are not errors
/// and never show up here.
#[derive(Debug, Error)]
pub enum EonError {
    #[error("Node {0} already exists")]
    DuplicateNode(NodeId),
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
    #[error("Link from {0} to itself")]
    SelfLoop(NodeId),
    #[error("Link {0} already exists")]
    DuplicateLink(Edge),
    #[error("Link {0} is not present in the topology")]
    MissingLink(Edge),
    #[error("Slot {1} is already occupied on link {0}")]
    SlotsOccupied(Edge, usize),
    #[error("The modulation catalog is empty")]
    EmptyCatalog,
    #[error("Invalid slot count: {0}")]
    InvalidSlotCount(usize),
    #[error("Column `{0}` is missing in {1}")]
    MissingColumn(String, String),
    #[error("Invalid value `{value}` in column `{column}`")]
    InvalidField { column: String, value: String },
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),
    #[error("TOML Error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML Serialization Error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Thread pool Error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type EonResult<T> = Result<T, EonError>;
