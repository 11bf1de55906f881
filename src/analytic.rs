use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{validate_config, SimConfig};

const TRAFFIC_TOLERANCE: f64 = 1e-12;
const TRAFFIC_MAX_PASSES: usize = 10_000;

/// One M/M/c station of an open Jackson network.
#[derive(Clone, Debug)]
pub struct StationSpec {
    pub name: String,
    pub external_arrival_rate: f64,
    pub service_rate: f64,
    pub servers: usize,
}

/// Row-substochastic transition matrix over the stations. The deficit of
/// a row is the probability of leaving the network after that station.
#[derive(Clone, Debug)]
pub struct RoutingMatrix {
    rows: Vec<Vec<f64>>,
}

impl RoutingMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(Error::InvalidRoutingMatrix {
                    rows: row.len(),
                    stations: n,
                });
            }
            let mut sum = 0.0;
            for (j, &p) in row.iter().enumerate() {
                if !(0.0..=1.0).contains(&p) {
                    return Err(Error::InvalidRoutingProbability {
                        row: i,
                        col: j,
                        value: p,
                    });
                }
                sum += p;
            }
            if sum > 1.0 + 1e-9 {
                return Err(Error::InvalidRoutingRow { row: i, sum });
            }
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn prob(&self, from: usize, to: usize) -> f64 {
        self.rows[from][to]
    }
}

/// Chain topology: every customer moves from station `i` to `i + 1` and
/// exits after the last one.
pub fn tandem_routing(stations: usize) -> RoutingMatrix {
    let rows = (0..stations)
        .map(|i| {
            let mut row = vec![0.0; stations];
            if i + 1 < stations {
                row[i + 1] = 1.0;
            }
            row
        })
        .collect();
    RoutingMatrix { rows }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StationMetrics {
    pub name: String,
    pub arrival_rate: f64,
    pub throughput: f64,
    pub utilization: f64,
    pub probability_empty: f64,
    pub mean_queue_length: f64,
    pub mean_in_system: f64,
    pub mean_wait: f64,
    pub mean_sojourn: f64,
}

/// Exact steady-state measures for the whole network. `probability_empty`
/// is `None` because no system-wide empty probability is defined for
/// multi-station totals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NetworkMetrics {
    pub stations: Vec<StationMetrics>,
    pub throughput: f64,
    pub mean_in_system: f64,
    pub mean_sojourn: f64,
    pub probability_empty: Option<f64>,
}

/// Solves the traffic equations and per-station Erlang-C formulas.
///
/// Refuses with [`Error::Unstable`] as soon as any station's utilization
/// reaches 1: the closed forms do not converge there and a finite answer
/// would be misleading.
pub fn solve(stations: &[StationSpec], routing: &RoutingMatrix) -> Result<NetworkMetrics> {
    if stations.is_empty() {
        return Err(Error::EmptyStations);
    }
    if routing.len() != stations.len() {
        return Err(Error::InvalidRoutingMatrix {
            rows: routing.len(),
            stations: stations.len(),
        });
    }
    for station in stations {
        if !(station.service_rate > 0.0) {
            return Err(Error::InvalidServiceRate {
                station: station.name.clone(),
                rate: station.service_rate,
            });
        }
        if station.servers == 0 {
            return Err(Error::InvalidServerCount(station.name.clone()));
        }
        if station.external_arrival_rate < 0.0 {
            return Err(Error::InvalidArrivalRate(station.external_arrival_rate));
        }
    }

    let arrival_rates = traffic_rates(stations, routing)?;

    let mut per_station = Vec::with_capacity(stations.len());
    for (station, &lambda) in stations.iter().zip(&arrival_rates) {
        per_station.push(station_metrics(station, lambda)?);
    }

    let external_total: f64 = stations.iter().map(|s| s.external_arrival_rate).sum();
    let mean_in_system: f64 = per_station.iter().map(|m| m.mean_in_system).sum();
    // Little's Law over the whole network; valid because every station
    // was just proven stable.
    let mean_sojourn = if external_total > 0.0 {
        mean_in_system / external_total
    } else {
        0.0
    };

    Ok(NetworkMetrics {
        stations: per_station,
        throughput: external_total,
        mean_in_system,
        mean_sojourn,
        probability_empty: None,
    })
}

/// Convenience entry point sharing the simulator's configuration: the
/// tandem chain with external arrivals only at the first station.
pub fn solve_config(config: &SimConfig) -> Result<NetworkMetrics> {
    validate_config(config)?;
    let stations: Vec<StationSpec> = config
        .stations
        .iter()
        .enumerate()
        .map(|(i, station)| StationSpec {
            name: station.name.clone(),
            external_arrival_rate: if i == 0 { config.arrival_rate } else { 0.0 },
            service_rate: station.service_rate,
            servers: station.servers,
        })
        .collect();
    let routing = tandem_routing(stations.len());
    solve(&stations, &routing)
}

/// Fixed-point iteration on `lambda_j = gamma_j + sum_i lambda_i * p_ij`.
/// Exact after `n` passes on an acyclic chain; converges geometrically
/// whenever the routing lets traffic exit.
fn traffic_rates(stations: &[StationSpec], routing: &RoutingMatrix) -> Result<Vec<f64>> {
    let n = stations.len();
    let external: Vec<f64> = stations.iter().map(|s| s.external_arrival_rate).collect();
    let mut rates = external.clone();
    for _ in 0..TRAFFIC_MAX_PASSES {
        let mut next = external.clone();
        for (j, value) in next.iter_mut().enumerate() {
            for i in 0..n {
                *value += rates[i] * routing.prob(i, j);
            }
        }
        let delta = rates
            .iter()
            .zip(&next)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        rates = next;
        if delta < TRAFFIC_TOLERANCE {
            return Ok(rates);
        }
    }
    Err(Error::NonConvergentRouting)
}

/// Closed-form Erlang-C measures for one M/M/c station.
fn station_metrics(station: &StationSpec, lambda: f64) -> Result<StationMetrics> {
    let c = station.servers;
    let offered = lambda / station.service_rate;
    let rho = offered / c as f64;
    if rho >= 1.0 {
        return Err(Error::Unstable {
            station: station.name.clone(),
            rho,
        });
    }

    // Sum of a^n / n! for n < c, built incrementally.
    let mut idle_sum = 0.0;
    let mut term = 1.0;
    for n in 0..c {
        idle_sum += term;
        term *= offered / (n + 1) as f64;
    }
    // After the loop, term == a^c / c!.
    let probability_empty = 1.0 / (idle_sum + term / (1.0 - rho));
    let mean_queue_length = probability_empty * term * rho / ((1.0 - rho) * (1.0 - rho));
    let mean_in_system = mean_queue_length + offered;
    let (mean_wait, mean_sojourn) = if lambda > 0.0 {
        (mean_queue_length / lambda, mean_in_system / lambda)
    } else {
        (0.0, 0.0)
    };

    Ok(StationMetrics {
        name: station.name.clone(),
        arrival_rate: lambda,
        throughput: lambda,
        utilization: rho,
        probability_empty,
        mean_queue_length,
        mean_in_system,
        mean_wait,
        mean_sojourn,
    })
}
