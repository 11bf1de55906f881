use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("stations must not be empty")]
    EmptyStations,
    #[error("duplicate station name '{0}'")]
    DuplicateStationName(String),
    #[error("horizon must be > 0 (got {0})")]
    InvalidHorizon(f64),
    #[error("arrival rate must be > 0 (got {0})")]
    InvalidArrivalRate(f64),
    #[error("service rate must be > 0 at station '{station}' (got {rate})")]
    InvalidServiceRate { station: String, rate: f64 },
    #[error("server count must be >= 1 at station '{0}'")]
    InvalidServerCount(String),
    #[error("exponential rate must be > 0 (got {0})")]
    InvalidRate(f64),
    #[error("routing matrix must be square with one row per station (got {rows} rows for {stations} stations)")]
    InvalidRoutingMatrix { rows: usize, stations: usize },
    #[error("routing row {row} is not substochastic (sum {sum})")]
    InvalidRoutingRow { row: usize, sum: f64 },
    #[error("routing probability at [{row}][{col}] must be in [0, 1] (got {value})")]
    InvalidRoutingProbability { row: usize, col: usize, value: f64 },
    #[error("station '{station}' is unstable (utilization {rho} >= 1)")]
    Unstable { station: String, rho: f64 },
    #[error("traffic equations did not converge; routing must let customers exit")]
    NonConvergentRouting,
    #[error("{0}")]
    ConfigIo(String),
    #[error("{0}")]
    ConfigParse(String),
    #[error("unsupported config format '{0}'")]
    UnsupportedConfigFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
