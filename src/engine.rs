use crate::error::Result;
use crate::events::{Event, EventScheduler};
use crate::models::{validate_config, SimConfig};
use crate::state::{
    Customer, CustomerRecord, Disposition, OccupancySample, SimulationOutput, StageVisit,
    StationInfo,
};
use crate::station::{Admission, Station};
use crate::variate::ExpSource;

/// Discrete-event engine for one bounded-horizon run over the configured
/// tandem chain. Single-threaded: every event handler runs to completion
/// before the next event is popped, so station state needs no locking.
pub struct SimulationEngine {
    config: SimConfig,
    scheduler: EventScheduler,
    stations: Vec<Station>,
    customers: Vec<Customer>,
    current_stage: Vec<usize>,
    occupancy: Vec<OccupancySample>,
    variates: ExpSource,
    seed: u64,
}

impl SimulationEngine {
    pub fn new(config: SimConfig) -> Self {
        let seed = config.seed.unwrap_or(0);
        let stations = config
            .stations
            .iter()
            .enumerate()
            .map(|(id, station)| Station::new(id, station))
            .collect();
        Self {
            config,
            scheduler: EventScheduler::default(),
            stations,
            customers: Vec::new(),
            current_stage: Vec::new(),
            occupancy: Vec::new(),
            variates: ExpSource::seeded(seed),
            seed,
        }
    }

    pub fn run(mut self) -> Result<SimulationOutput> {
        validate_config(&self.config)?;

        for station in &self.stations {
            self.occupancy.push(OccupancySample {
                station: station.id,
                time: 0.0,
                queue_length: 0,
                busy_servers: 0,
            });
        }

        self.generate_arrivals()?;

        let horizon = self.config.horizon;
        while let Some(scheduled) = self.scheduler.next_within(horizon) {
            match scheduled.event {
                Event::Arrival { customer } => {
                    self.enter_stage(customer, 0, scheduled.time);
                }
                Event::ServiceStart { customer, station } => {
                    self.start_service(customer, station, scheduled.time)?;
                }
                Event::ServiceEnd { customer, station } => {
                    self.end_service(customer, station, scheduled.time);
                }
            }
        }

        Ok(SimulationOutput {
            horizon,
            seed: self.seed,
            arrivals_generated: self.customers.len(),
            stations: self
                .stations
                .iter()
                .map(|station| StationInfo {
                    id: station.id,
                    name: station.name.clone(),
                    servers: station.servers,
                })
                .collect(),
            occupancy: self.occupancy,
            customers: self.customers.iter().map(CustomerRecord::from).collect(),
        })
    }

    /// Poisson arrival stream: sample gaps until the next arrival would
    /// land past the horizon. Customers already admitted keep flowing
    /// through the event loop after generation stops.
    fn generate_arrivals(&mut self) -> Result<()> {
        let mut clock = 0.0;
        loop {
            clock += self.variates.sample(self.config.arrival_rate)?;
            if clock > self.config.horizon {
                return Ok(());
            }
            let id = self.customers.len();
            self.customers.push(Customer::new(id, clock));
            self.current_stage.push(0);
            self.scheduler.schedule(clock, Event::Arrival { customer: id });
        }
    }

    fn enter_stage(&mut self, customer: usize, stage: usize, now: f64) {
        self.current_stage[customer] = stage;
        self.customers[customer].stages.push(StageVisit {
            station: stage,
            queue_enter: now,
            service_start: None,
            service_end: None,
        });
        match self.stations[stage].try_enqueue(customer) {
            Admission::ToService => {
                self.scheduler
                    .schedule(now, Event::ServiceStart { customer, station: stage });
            }
            Admission::ToQueue => {}
            Admission::Rejected => {
                // Trajectory ends here; later stages are never attempted.
                self.customers[customer].disposition = Disposition::Rejected;
            }
        }
        self.log_occupancy(stage, now);
    }

    fn start_service(&mut self, customer: usize, station: usize, now: f64) -> Result<()> {
        let rate = self.stations[station].service_rate;
        let duration = self.variates.sample(rate)?;
        let visit = self.customers[customer]
            .stages
            .last_mut()
            .filter(|visit| visit.station == station);
        debug_assert!(visit.is_some(), "service start without a stage visit");
        if let Some(visit) = visit {
            visit.service_start = Some(now);
        }
        self.scheduler
            .schedule(now + duration, Event::ServiceEnd { customer, station });
        Ok(())
    }

    fn end_service(&mut self, customer: usize, station: usize, now: f64) {
        if let Some(visit) = self.customers[customer]
            .stages
            .last_mut()
            .filter(|visit| visit.station == station)
        {
            visit.service_end = Some(now);
        }
        if let Some(next) = self.stations[station].release() {
            self.scheduler
                .schedule(now, Event::ServiceStart { customer: next, station });
        }
        self.log_occupancy(station, now);

        let next_stage = self.current_stage[customer] + 1;
        if next_stage < self.stations.len() {
            self.enter_stage(customer, next_stage, now);
        } else {
            self.customers[customer].disposition = Disposition::Served;
            self.customers[customer].exit_time = Some(now);
        }
    }

    fn log_occupancy(&mut self, station: usize, time: f64) {
        let state = &self.stations[station];
        self.occupancy.push(OccupancySample {
            station,
            time,
            queue_length: state.queue_length(),
            busy_servers: state.busy,
        });
    }
}

pub fn run_simulation(config: &SimConfig) -> Result<SimulationOutput> {
    SimulationEngine::new(config.clone()).run()
}

/// Runs `count` independent replicates with derived seeds, for
/// averaging across runs. Each replicate owns its rng, stations and
/// scheduler, so nothing is shared between them.
pub fn run_replications(config: &SimConfig, count: usize) -> Result<Vec<SimulationOutput>> {
    let base_seed = config.seed.unwrap_or(0);
    (0..count)
        .map(|index| {
            let mut replicate = config.clone();
            replicate.seed = Some(base_seed.wrapping_add(index as u64));
            run_simulation(&replicate)
        })
        .collect()
}
