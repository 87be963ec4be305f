use serde_derive::{ Deserialize, Serialize };

#[derive(Debug, Deserialize, Serialize, Clone)]
/// ネットワーク関連の設定
pub struct NetworkConfig {
    /// 対象物理トポロジ
    pub name: String,
    pub nodes_filepath: String,
    /// 空ならリンクなしのトポロジから始める
    #[serde(default)]
    pub links_filepath: String,
    pub modulation_filepath: String,
}
