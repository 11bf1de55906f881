use serde::Serialize;

use crate::state::{Disposition, SimulationOutput};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StationUsage {
    pub name: String,
    pub utilization: f64,
    pub mean_busy_servers: f64,
    pub mean_queue_length: f64,
    pub mean_in_system: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomerSummary {
    pub arrivals: usize,
    pub served: usize,
    pub rejected: usize,
    pub in_flight: usize,
    pub mean_waiting_time: f64,
    pub mean_flow_time: f64,
    pub mean_activity_time: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregateReport {
    pub horizon: f64,
    pub stations: Vec<StationUsage>,
    pub customers: CustomerSummary,
}

/// Post-processes the raw run logs into time-weighted station usage and
/// customer summary statistics. Pure: the logs are not modified.
pub fn aggregate(output: &SimulationOutput) -> AggregateReport {
    let stations = output
        .stations
        .iter()
        .map(|station| {
            let (busy_integral, queue_integral) =
                integrate_station(output, station.id, output.horizon);
            StationUsage {
                name: station.name.clone(),
                utilization: busy_integral / (station.servers as f64 * output.horizon),
                mean_busy_servers: busy_integral / output.horizon,
                mean_queue_length: queue_integral / output.horizon,
                mean_in_system: (busy_integral + queue_integral) / output.horizon,
            }
        })
        .collect();

    let mut served = 0;
    let mut rejected = 0;
    let mut in_flight = 0;
    let mut waiting_sum = 0.0;
    let mut flow_sum = 0.0;
    let mut activity_sum = 0.0;
    for customer in &output.customers {
        match customer.disposition {
            Disposition::Served => {
                served += 1;
                waiting_sum += customer.waiting_time.unwrap_or(0.0);
                flow_sum += customer.flow_time.unwrap_or(0.0);
                activity_sum += customer.activity_time;
            }
            Disposition::Rejected => rejected += 1,
            Disposition::InFlight => in_flight += 1,
        }
    }
    let divisor = if served > 0 { served as f64 } else { 1.0 };

    AggregateReport {
        horizon: output.horizon,
        stations,
        customers: CustomerSummary {
            arrivals: output.arrivals_generated,
            served,
            rejected,
            in_flight,
            mean_waiting_time: waiting_sum / divisor,
            mean_flow_time: flow_sum / divisor,
            mean_activity_time: activity_sum / divisor,
        },
    }
}

/// Single forward pass over one station's occupancy timeline, holding
/// each state constant until the next sample and extending the last one
/// to the horizon.
fn integrate_station(output: &SimulationOutput, station: usize, horizon: f64) -> (f64, f64) {
    let mut busy_integral = 0.0;
    let mut queue_integral = 0.0;
    let mut previous: Option<(f64, usize, usize)> = None;
    for sample in output.occupancy.iter().filter(|s| s.station == station) {
        if let Some((time, busy, queue)) = previous {
            let dt = sample.time - time;
            busy_integral += busy as f64 * dt;
            queue_integral += queue as f64 * dt;
        }
        previous = Some((sample.time, sample.busy_servers, sample.queue_length));
    }
    if let Some((time, busy, queue)) = previous {
        let dt = horizon - time;
        busy_integral += busy as f64 * dt;
        queue_integral += queue as f64 * dt;
    }
    (busy_integral, queue_integral)
}
