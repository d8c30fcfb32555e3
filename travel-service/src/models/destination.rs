use serde::{Deserialize, Serialize};

/// Transport modes a cost can be quoted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Train,
    Bus,
}

impl Transport {
    pub const ALL: [Transport; 2] = [Transport::Train, Transport::Bus];

    pub fn key(&self) -> &'static str {
        match self {
            Transport::Train => "train",
            Transport::Bus => "bus",
        }
    }
}

/// One USD figure per transport mode; absent modes are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub train: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus: Option<f64>,
}

impl CostEntry {
    pub fn set(&mut self, transport: Transport, value: f64) {
        match transport {
            Transport::Train => self.train = Some(value),
            Transport::Bus => self.bus = Some(value),
        }
    }
}

/// A recommended destination as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cost: CostEntry,
    pub currency: String,
    pub distance: f64,
    pub travel_time: String,
    pub image: String,
}

/// Currency marker attached to every destination; costs are always USD.
pub const USD_MARKER: &str = "$";
