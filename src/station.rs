use std::collections::VecDeque;

use crate::models::{QueueCapacity, StationConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    ToService,
    ToQueue,
    Rejected,
}

/// One capacitated service station: `servers` identical servers in front
/// of an FCFS waiting room. Mutated only from the dispatch loop.
pub struct Station {
    pub id: usize,
    pub name: String,
    pub service_rate: f64,
    pub servers: usize,
    pub queue_capacity: QueueCapacity,
    pub busy: usize,
    waiting: VecDeque<usize>,
}

impl Station {
    pub fn new(id: usize, config: &StationConfig) -> Self {
        Self {
            id,
            name: config.name.clone(),
            service_rate: config.service_rate,
            servers: config.servers,
            queue_capacity: config.queue_capacity,
            busy: 0,
            waiting: VecDeque::new(),
        }
    }

    pub fn queue_length(&self) -> usize {
        self.waiting.len()
    }

    /// Admits a customer: straight into service when a server is idle,
    /// into the waiting room when it admits one more, rejected otherwise.
    /// The caller schedules the service-start event on `ToService`.
    pub fn try_enqueue(&mut self, customer: usize) -> Admission {
        if self.busy < self.servers {
            self.busy += 1;
            Admission::ToService
        } else if self.queue_capacity.admits(self.waiting.len()) {
            self.waiting.push_back(customer);
            Admission::ToQueue
        } else {
            Admission::Rejected
        }
    }

    /// Frees a server and promotes the head-of-line waiter, if any.
    /// This is the only place a queued customer transitions to service.
    pub fn release(&mut self) -> Option<usize> {
        debug_assert!(self.busy > 0, "release on idle station");
        self.busy -= 1;
        let next = self.waiting.pop_front()?;
        self.busy += 1;
        Some(next)
    }
}
