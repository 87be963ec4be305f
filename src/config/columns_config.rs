use serde_derive::{ Deserialize, Serialize };

/// Column names of the node, link and modulation tables.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ColumnsConfig {
    pub node_id: String,
    pub node_lat: String,
    pub node_lon: String,
    pub node_type: String,

    pub link_from: String,
    pub link_to: String,
    pub link_length: String,
    pub link_capacity: String,
    pub link_cost: String,

    pub tier_name: String,
    pub tier_data_rate: String,
    pub tier_power: String,
    pub tier_reach: String,
    pub tier_spectral_efficiency: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            node_id: "id".to_string(),
            node_lat: "lat".to_string(),
            node_lon: "long".to_string(),
            node_type: "type".to_string(),
            link_from: "from".to_string(),
            link_to: "to".to_string(),
            link_length: "length".to_string(),
            link_capacity: "capacity".to_string(),
            link_cost: "cost".to_string(),
            tier_name: "name".to_string(),
            tier_data_rate: "data_rate".to_string(),
            tier_power: "power_consumption".to_string(),
            tier_reach: "reach".to_string(),
            tier_spectral_efficiency: "spectral_efficiency".to_string(),
        }
    }
}
