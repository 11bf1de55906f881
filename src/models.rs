use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Error, Result};

/// Immutable configuration for one simulation run or analytical solve.
///
/// Stations form a tandem chain: every customer visits them in order,
/// starting at index 0.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SimConfig {
    pub horizon: f64,
    pub arrival_rate: f64,
    pub stations: Vec<StationConfig>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StationConfig {
    pub name: String,
    pub service_rate: f64,
    #[serde(default = "default_servers")]
    pub servers: usize,
    #[serde(default)]
    pub queue_capacity: QueueCapacity,
}

/// Waiting-room size of a station. `Bounded(0)` makes the station a pure
/// loss system: arrivals finding every server busy are rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum QueueCapacity {
    #[default]
    Unbounded,
    Bounded(usize),
}

impl QueueCapacity {
    pub fn admits(&self, queue_length: usize) -> bool {
        match self {
            QueueCapacity::Unbounded => true,
            QueueCapacity::Bounded(limit) => queue_length < *limit,
        }
    }
}

fn default_servers() -> usize {
    1
}

pub fn validate_config(config: &SimConfig) -> Result<()> {
    if !(config.horizon > 0.0) {
        return Err(Error::InvalidHorizon(config.horizon));
    }
    if !(config.arrival_rate > 0.0) {
        return Err(Error::InvalidArrivalRate(config.arrival_rate));
    }
    if config.stations.is_empty() {
        return Err(Error::EmptyStations);
    }
    let mut names = HashSet::new();
    for station in &config.stations {
        if !(station.service_rate > 0.0) {
            return Err(Error::InvalidServiceRate {
                station: station.name.clone(),
                rate: station.service_rate,
            });
        }
        if station.servers == 0 {
            return Err(Error::InvalidServerCount(station.name.clone()));
        }
        if !names.insert(station.name.clone()) {
            return Err(Error::DuplicateStationName(station.name.clone()));
        }
    }
    Ok(())
}
