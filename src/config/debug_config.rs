use serde_derive::{ Deserialize, Serialize };

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
/// デバッガ関連の設定
pub struct DebugConfig {
    /// パス需要の割当を出力するか
    pub log_demand_assign: bool,
    /// ブロックされた需要とその理由を出力するか
    pub log_demand_block: bool,
    /// シミュレートした候補トポロジを出力するか
    pub log_candidate: bool,
    /// 各種統計情報を出力するか
    pub log_analysis: bool,
    /// シミュレーション後に各リンクのスペクトルを出力するか
    pub log_spectrum: bool,
}
