//! Steady-state and discrete-event analysis of a tandem service
//! facility: a chain of capacitated FCFS stations fed by Poisson
//! arrivals. Two engines answer the same capacity question: an exact
//! open-Jackson-network solver ([`analytic`]) and a seeded
//! discrete-event simulator ([`engine`]) whose raw logs are reduced by
//! [`metrics`].

pub mod analytic;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod metrics;
pub mod models;
pub mod state;
pub mod station;
pub mod variate;
