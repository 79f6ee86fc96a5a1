//! Residential facility groups registered with WREGIS.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFacility {
    pub id: String,
    #[serde(alias = "facilityName")]
    pub name: String,
    #[serde(default)]
    pub system_capacity: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentialGroup {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wregis_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dcarbon_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facilities: Vec<GroupFacility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_capacity: Option<f64>,
}

impl ResidentialGroup {
    pub fn new(name: &str) -> Self {
        Self {
            id: String::new(),
            name: name.to_string(),
            wregis_id: None,
            dcarbon_id: None,
            facilities: Vec::new(),
            total_capacity: None,
        }
    }

    /// The server's aggregate when it sends one, else the sum of members.
    pub fn aggregate_capacity(&self) -> f64 {
        self.total_capacity.unwrap_or_else(|| {
            self.facilities
                .iter()
                .filter_map(|f| f.system_capacity)
                .sum()
        })
    }

    pub fn contains(&self, facility_id: &str) -> bool {
        self.facilities.iter().any(|f| f.id == facility_id)
    }
}
