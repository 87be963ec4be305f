use serde_derive::{ Deserialize, Serialize };

use crate::{ error::EonResult, utils };

pub mod columns_config;
pub mod debug_config;
pub mod network_config;
pub mod simulation_config;
pub mod sweep_config;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub simulation: simulation_config::SimulationConfig,
    pub network: network_config::NetworkConfig,
    #[serde(default)]
    pub columns: columns_config::ColumnsConfig,
    #[serde(default)]
    pub sweep: sweep_config::SweepConfig,
    #[serde(default)]
    pub debug: debug_config::DebugConfig,
}

impl Config {
    /// Config構造体を作成する
    /// toml形式で書くこと．
    pub fn new(file_name: &str) -> EonResult<Config> {
        let contents = utils::read_file(file_name)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> EonResult<Config> {
        Ok(toml::from_str(contents)?)
    }
}
