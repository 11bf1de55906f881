use serde::Serialize;

/// One stage of a customer's trajectory. Service times stay `None` while
/// the customer is still waiting or in service at the horizon.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StageVisit {
    pub station: usize,
    pub queue_enter: f64,
    pub service_start: Option<f64>,
    pub service_end: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Disposition {
    Served,
    Rejected,
    InFlight,
}

/// Mutable per-customer record owned by the engine while the run is live.
#[derive(Clone, Debug, Serialize)]
pub struct Customer {
    pub id: usize,
    pub arrival_time: f64,
    pub stages: Vec<StageVisit>,
    pub disposition: Disposition,
    pub exit_time: Option<f64>,
}

impl Customer {
    pub fn new(id: usize, arrival_time: f64) -> Self {
        Self {
            id,
            arrival_time,
            stages: Vec::new(),
            disposition: Disposition::InFlight,
            exit_time: None,
        }
    }

    /// Total time spent in service over all completed stages.
    pub fn activity_time(&self) -> f64 {
        self.stages
            .iter()
            .filter_map(|visit| Some(visit.service_end? - visit.service_start?))
            .sum()
    }

    pub fn flow_time(&self) -> Option<f64> {
        Some(self.exit_time? - self.arrival_time)
    }

    pub fn waiting_time(&self) -> Option<f64> {
        Some(self.flow_time()? - self.activity_time())
    }
}

/// One point of the per-station occupancy timeline, appended after every
/// state change of that station.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OccupancySample {
    pub station: usize,
    pub time: f64,
    pub queue_length: usize,
    pub busy_servers: usize,
}

/// Immutable per-customer output record.
#[derive(Clone, Debug, Serialize)]
pub struct CustomerRecord {
    pub id: usize,
    pub arrival_time: f64,
    pub exit_time: Option<f64>,
    pub disposition: Disposition,
    pub activity_time: f64,
    pub waiting_time: Option<f64>,
    pub flow_time: Option<f64>,
}

impl From<&Customer> for CustomerRecord {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            arrival_time: customer.arrival_time,
            exit_time: customer.exit_time,
            disposition: customer.disposition,
            activity_time: customer.activity_time(),
            waiting_time: customer.waiting_time(),
            flow_time: customer.flow_time(),
        }
    }
}

/// Raw logs of one bounded-horizon run, consumed by the metrics
/// aggregator or directly by the presentation layer.
#[derive(Clone, Debug, Serialize)]
pub struct SimulationOutput {
    pub horizon: f64,
    pub seed: u64,
    pub arrivals_generated: usize,
    pub stations: Vec<StationInfo>,
    pub occupancy: Vec<OccupancySample>,
    pub customers: Vec<CustomerRecord>,
}

/// Static station facts echoed into the output so downstream consumers
/// do not need the configuration to interpret the logs.
#[derive(Clone, Debug, Serialize)]
pub struct StationInfo {
    pub id: usize,
    pub name: String,
    pub servers: usize,
}
