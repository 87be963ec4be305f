use serde_derive::{ Deserialize, Serialize };

use crate::eon_core::parameters::{ DEFAULT_DATA_RATES, DEFAULT_K, DEFAULT_SLOT };

#[derive(Debug, Deserialize, Serialize, Clone)]
/// シミュレーション関連の設定
pub struct SimulationConfig {
    /// ランダムシード
    pub random_seed: u64,
    /// 統計情報出力先フォルダ
    pub outdir: String,
    /// リンクあたりの周波数スロット数
    #[serde(default = "default_frequency_slots")]
    pub frequency_slots: usize,
    /// 需要ごとに試す経路数
    #[serde(default = "default_k")]
    pub k_shortest_paths: usize,
    /// 需要のデータレート [Gb/s]
    #[serde(default = "default_data_rates")]
    pub data_rates: Vec<f64>,
}

fn default_frequency_slots() -> usize {
    DEFAULT_SLOT
}

fn default_k() -> usize {
    DEFAULT_K
}

fn default_data_rates() -> Vec<f64> {
    DEFAULT_DATA_RATES.to_vec()
}
